//! Output formatters for score reports and section maps

use crate::config::OutputFormat;
use crate::error::{Result, ResumeScorerError};
use crate::output::report::{Assessment, ScoreReport};
use crate::processing::analyzer::ComponentMatch;
use crate::processing::document::SectionMap;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for rendering reports in one output format
pub trait OutputFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String>;
    fn format_sections(&self, sections: &SectionMap) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for structured consumers
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_assessment(&self, assessment: Assessment) -> String {
        let color = match assessment {
            Assessment::Excellent => Color::Green,
            Assessment::Good => Color::BrightGreen,
            Assessment::Fair => Color::Yellow,
            Assessment::NeedsImprovement => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", assessment.to_string().color(color).bold())
        } else {
            format!("[{}]", assessment)
        }
    }

    fn format_component(&self, label: &str, percentage: u8, component: &ComponentMatch) -> String {
        let tier = component
            .tier
            .map(|t| t.to_string())
            .unwrap_or_else(|| "not compared".to_string());
        let source = if component.used_full_text {
            "full resume text".to_string()
        } else {
            format!("{} section", component.section)
        };

        format!(
            "{}: {}% ({} via {})\n",
            label,
            percentage,
            self.colorize(&source, Color::Cyan),
            tier
        )
    }

    fn sections_body(&self, sections: &SectionMap) -> String {
        let mut output = String::new();
        for (section, content) in sections.iter() {
            let name = format!("{}:", section);
            let content = if sections.is_found(section) {
                content.to_string()
            } else {
                self.colorize(content, Color::BrightBlack)
            };
            output.push_str(&format!("{} {}\n", self.colorize(&name, Color::Magenta), content));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let summary = &report.summary;
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME MATCH REPORT", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            analysis.processing_time_ms
        ));
        output.push_str(&format!(
            "Resume: {} | Job: {}\n",
            report.metadata.resume_file, report.metadata.job_file
        ));

        output.push_str(&self.format_header("Scores", 2));
        output.push_str(&format!(
            "Overall Match: {}% {}\n",
            summary.overall_percentage,
            self.format_assessment(summary.assessment)
        ));
        output.push_str(&self.format_component(
            "Job Description Match",
            summary.job_description_percentage,
            &analysis.experience_match,
        ));
        output.push_str(&self.format_component(
            "Skills Match",
            summary.skills_percentage,
            &analysis.skills_match,
        ));

        if self.detailed {
            output.push_str(&self.format_header("Resume Sections", 3));
            output.push_str(&self.sections_body(&analysis.sections));
            output.push_str(&format!(
                "\nResume: {} characters | Job description: {} characters\n",
                analysis.resume_characters, analysis.job_description_characters
            ));
            if !report.metadata.vector_tier_available {
                output.push_str(&self.colorize(
                    "TF-IDF tier unavailable, scores start at word overlap\n",
                    Color::Yellow,
                ));
            }
        }

        Ok(output)
    }

    fn format_sections(&self, sections: &SectionMap) -> Result<String> {
        let mut output = self.format_header("RESUME SECTIONS", 1);
        output.push_str(&self.sections_body(sections));
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        self.render(report)
    }

    fn format_sections(&self, sections: &SectionMap) -> Result<String> {
        self.render(sections)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn file_name(path: &str) -> String {
        Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string())
    }

    fn sections_table(sections: &SectionMap) -> String {
        let mut output = String::from("| Section | Content |\n|---|---|\n");
        for (section, content) in sections.iter() {
            output.push_str(&format!("| {} | {} |\n", section, content.replace('|', "\\|")));
        }
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let summary = &report.summary;
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str("# Resume Match Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                analysis.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                Self::file_name(&report.metadata.resume_file),
                Self::file_name(&report.metadata.job_file)
            ));
        }

        output.push_str("## Scores\n\n");
        output.push_str("| Metric | Score | Assessment |\n|---|---|---|\n");
        output.push_str(&format!(
            "| Overall Match | {}% | {} |\n",
            summary.overall_percentage, summary.assessment
        ));
        output.push_str(&format!(
            "| Job Description Match | {}% | {} |\n",
            summary.job_description_percentage,
            Assessment::from_percentage(summary.job_description_percentage)
        ));
        output.push_str(&format!(
            "| Skills Match | {}% | {} |\n\n",
            summary.skills_percentage,
            Assessment::from_percentage(summary.skills_percentage)
        ));

        output.push_str("## Resume Sections\n\n");
        output.push_str(&Self::sections_table(&analysis.sections));

        Ok(output)
    }

    fn format_sections(&self, sections: &SectionMap) -> Result<String> {
        Ok(format!("# Resume Sections\n\n{}", Self::sections_table(sections)))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        let formatters: [&dyn OutputFormatter; 3] = [
            &self.console_formatter,
            &self.json_formatter,
            &self.markdown_formatter,
        ];
        formatters
            .into_iter()
            .find(|formatter| formatter.supports_format() == format)
            .unwrap_or(&self.console_formatter)
    }

    pub fn generate_report(&self, report: &ScoreReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn generate_sections(&self, sections: &SectionMap, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_sections(sections)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an output format name as given on the command line
pub fn parse_output_format(format: &str) -> Result<OutputFormat> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(ResumeScorerError::InvalidInput(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        ))),
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// Resolve a `--save` target. A directory gets a suggested file name inside it.
pub fn resolve_save_path(save: &Path, format: OutputFormat, resume_name: &str) -> PathBuf {
    if save.is_dir() {
        save.join(suggest_filename(format, resume_name, true))
    } else {
        save.to_path_buf()
    }
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_match{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::MatchAnalyzer;
    use crate::processing::similarity::Capabilities;

    fn sample_report() -> ScoreReport {
        let analysis = MatchAnalyzer::default().analyze(
            "Experience: Python backend services. Skills: Python, SQL",
            "Python backend engineer",
        );
        ScoreReport::new(analysis, Capabilities::default(), "resume.txt", "job.txt")
    }

    #[test]
    fn test_console_output_without_colors() {
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format_report(&sample_report()).unwrap();

        assert!(output.contains("Overall Match:"));
        assert!(output.contains("Skills Match:"));
        assert!(output.contains("Experience: Python backend services."));
        assert!(output.contains("Publications: Section not found."));
    }

    #[test]
    fn test_json_output_has_summary_and_sections() {
        let report = sample_report();
        let output = JsonFormatter::new(false).format_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(
            value["summary"]["overall_percentage"].as_u64().unwrap(),
            report.summary.overall_percentage as u64
        );
        assert_eq!(value["analysis"]["sections"]["Skills"], "Python, SQL");
    }

    #[test]
    fn test_markdown_sections_table() {
        let output = MarkdownFormatter::new(false)
            .format_sections(&SectionMap::empty())
            .unwrap();

        assert!(output.starts_with("# Resume Sections"));
        assert_eq!(output.matches("Section not found.").count(), 5);
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("md").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_suggest_filename() {
        let name = suggest_filename(OutputFormat::Json, "/tmp/jane_doe.pdf", false);
        assert_eq!(name, "jane_doe_match.json");
    }

    #[test]
    fn test_generator_dispatches_by_supported_format() {
        let generator = ReportGenerator::new();
        for format in [OutputFormat::Console, OutputFormat::Json, OutputFormat::Markdown] {
            assert_eq!(generator.formatter(format).supports_format(), format);
        }
    }

    #[test]
    fn test_resolve_save_path() {
        let dir = tempfile::tempdir().unwrap();

        let resolved = resolve_save_path(dir.path(), OutputFormat::Markdown, "cv/jane_doe.pdf");
        assert_eq!(resolved.parent(), Some(dir.path()));
        let name = resolved.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("jane_doe_match_"));
        assert!(name.ends_with(".md"));

        let file = dir.path().join("report.json");
        assert_eq!(resolve_save_path(&file, OutputFormat::Json, "cv.pdf"), file);
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.md");

        save_report_to_file("# Report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Report");
    }
}
