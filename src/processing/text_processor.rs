//! Text normalization and sentence preprocessing

use std::collections::HashSet;
use std::sync::LazyLock;
use unicode_segmentation::UnicodeSegmentation;

/// Bullet glyphs that extraction leaves inline with the text.
const BULLET_GLYPHS: &[char] = &[
    '\u{2022}', // •
    '\u{2023}', // ‣
    '\u{25E6}', // ◦
    '\u{2043}', // ⁃
    '\u{2219}', // ∙
    '\u{25AA}', // ▪
    '\u{2981}', // ⦁
];

/// Bullet separator rewritten to a sentence break by [`split_into_sentences`].
const SENTENCE_BULLET: &str = " \u{25CF} ";

/// English stop words, matching the NLTK corpus list.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
        "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
        "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
        "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
        "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
        "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
        "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
        "with", "about", "against", "between", "into", "through", "during", "before", "after",
        "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
        "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
        "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
        "will", "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o", "re",
        "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn",
        "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma",
        "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
        "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
        "wouldn't",
    ]
    .into_iter()
    .collect()
});

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Canonicalize raw extracted text.
///
/// Tabs, carriage returns and bullet glyphs become spaces, then every
/// whitespace run collapses to a single space. The result is trimmed, so
/// normalizing twice gives the same string. Empty input stays empty.
pub fn normalize(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| match c {
            '\t' | '\r' => ' ',
            c if BULLET_GLYPHS.contains(&c) => ' ',
            c => c,
        })
        .collect();

    collapse_whitespace(&replaced)
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip ASCII punctuation characters.
pub(crate) fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Lowercase, strip punctuation and split into words, dropping stop words.
pub fn tokenize(sentence: &str) -> Vec<String> {
    let stripped = strip_punctuation(&sentence.to_lowercase());

    stripped
        .unicode_words()
        .filter(|word| !is_stop_word(word))
        .map(str::to_string)
        .collect()
}

/// Prepare a sentence for similarity scoring: the tokens of [`tokenize`]
/// joined with single spaces.
pub fn preprocess(sentence: &str) -> String {
    tokenize(sentence).join(" ")
}

/// Split text on sentence breaks, treating the " ● " bullet separator as one.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    text.replace(SENTENCE_BULLET, ". ")
        .split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
