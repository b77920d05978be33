//! Resume scorer: section extraction and job description match scoring

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use resume_scorer::cli::{self, Cli, Commands, ConfigAction};
use resume_scorer::config::{Config, OutputFormat};
use resume_scorer::input::InputManager;
use resume_scorer::output::formatter::{
    parse_output_format, resolve_save_path, save_report_to_file, ReportGenerator,
};
use resume_scorer::output::report::ScoreReport;
use resume_scorer::processing::document::{Document, DocumentType};
use resume_scorer::MatchAnalyzer;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            job,
            job_text,
            output,
            detailed,
            save,
        } => {
            cli::validate_file_extension(&resume, cli::RESUME_EXTENSIONS)
                .map_err(anyhow::Error::msg)
                .context("Resume file")?;
            if let Some(job) = &job {
                cli::validate_file_extension(job, cli::JOB_EXTENSIONS)
                    .map_err(anyhow::Error::msg)
                    .context("Job description file")?;
            }

            let format = resolve_format(output.as_deref(), &config)?;
            let mut input_manager = InputManager::new();

            info!("Reading resume: {}", resume.display());
            let resume_text = input_manager.extract_text_or_empty(&resume).await;

            let (job_description, job_label) = match (job, job_text) {
                (Some(path), _) => {
                    let text = input_manager
                        .extract_text(&path)
                        .await
                        .with_context(|| format!("Failed to read job description {}", path.display()))?;
                    (text, path.to_string_lossy().to_string())
                }
                (None, Some(text)) => (text, "<inline>".to_string()),
                (None, None) => anyhow::bail!("Either --job or --job-text is required"),
            };

            let resume_doc = Document::new(
                resume_text,
                resume.to_string_lossy().to_string(),
                DocumentType::Resume,
            );
            let job_doc = Document::new(job_description, job_label.clone(), DocumentType::JobDescription);

            let analyzer = MatchAnalyzer::new(&config);
            let analysis = analyzer.analyze_documents(&resume_doc, &job_doc);
            let report = ScoreReport::new(
                analysis,
                analyzer.capabilities(),
                resume.to_string_lossy(),
                job_label,
            );

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, format)?;
            let save = save.map(|path| resolve_save_path(&path, format, &resume.to_string_lossy()));
            emit(&rendered, save.as_deref())?;
        }

        Commands::Sections { resume, output } => {
            cli::validate_file_extension(&resume, cli::RESUME_EXTENSIONS)
                .map_err(anyhow::Error::msg)
                .context("Resume file")?;

            let format = resolve_format(output.as_deref(), &config)?;
            let mut input_manager = InputManager::new();
            let text = input_manager.extract_text_or_empty(&resume).await;

            let document = Document::new(text, resume.to_string_lossy().to_string(), DocumentType::Resume);
            let sections = document.sections();
            info!("Found {} of 5 sections", sections.found_count());

            let generator = ReportGenerator::with_options(config.output.color_output, true, true, true);
            println!("{}", generator.generate_sections(&sections, format)?);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
                println!("# {}\n{}", config_path.display(), rendered);
            }
            Some(ConfigAction::Reset) => {
                Config::default()
                    .save_to(config_path)
                    .with_context(|| format!("Failed to write {}", config_path.display()))?;
                println!("Configuration reset: {}", config_path.display());
            }
            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

fn resolve_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(name) => Ok(parse_output_format(name)?),
        None => Ok(config.output.format),
    }
}

fn emit(content: &str, save: Option<&Path>) -> Result<()> {
    match save {
        Some(path) => {
            save_report_to_file(content, path)
                .with_context(|| format!("Failed to save report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
