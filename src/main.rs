// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use resume_ranker::utils::logging::{
    format_error, format_info, format_keyword, format_success, format_warning,
};
use resume_ranker::{
    Config, ScreeningOutcome, ScreeningPipeline, TextExtractor, Validator, highlight_with,
    job_keywords, read_job_description,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

const PREVIEW_CHARS: usize = 1000;

#[derive(Parser)]
#[command(name = "resume_ranker")]
#[command(version)]
#[command(about = "Rank resumes against a job description by semantic similarity", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every PDF and DOCX resume in a directory against a job description
    Rank {
        /// Job description text file
        #[arg(long, value_name = "FILE", conflicts_with = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long, value_name = "TEXT")]
        job_text: Option<String>,

        /// Resume directory, defaults to corpus.resumes_dir
        #[arg(short, long, value_name = "DIR")]
        resumes: Option<PathBuf>,

        #[arg(short = 'n', long, value_name = "NUM")]
        top_n: Option<usize>,

        /// Write the ranking as a two-column spreadsheet
        #[arg(long, value_name = "PATH")]
        xlsx: Option<PathBuf>,

        /// Write the full ranking report as JSON
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,

        /// Write ranking.xlsx and ranking.json into export.output_dir
        #[arg(long)]
        save: bool,

        /// Show the start of each ranked resume with job keywords highlighted
        #[arg(long)]
        preview: bool,
    },

    /// Print the text extracted from a single PDF or DOCX file
    Extract { file: PathBuf },

    /// Probe the embedding model and the resumes directory
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.color {
        colored::control::set_override(false);
    }
    resume_ranker::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Rank {
            job,
            job_text,
            resumes,
            top_n,
            xlsx,
            json,
            save,
            preview,
        } => {
            let job_description = load_job_description(job.as_deref(), job_text)?;
            let resumes_dir = resumes.unwrap_or_else(|| config.corpus.resumes_dir.clone());
            let (xlsx, json) = if save {
                let dir = &config.export.output_dir;
                (
                    xlsx.or_else(|| Some(dir.join("ranking.xlsx"))),
                    json.or_else(|| Some(dir.join("ranking.json"))),
                )
            } else {
                (xlsx, json)
            };
            cmd_rank(
                config,
                cli.color,
                &job_description,
                &resumes_dir,
                top_n,
                xlsx.as_deref(),
                json.as_deref(),
                preview,
            )
            .await?;
        }
        Commands::Extract { file } => {
            cmd_extract(&file).await?;
        }
        Commands::Check => {
            cmd_check(config).await?;
        }
    }

    Ok(())
}

fn load_job_description(job: Option<&Path>, job_text: Option<String>) -> Result<String> {
    let text = match (job, job_text) {
        (Some(path), _) => read_job_description(path)?,
        (None, Some(text)) => text,
        (None, None) => anyhow::bail!("Provide a job description with --job FILE or --job-text TEXT"),
    };

    Validator::validate_content_not_empty(&text).context("Job description is empty")?;
    Ok(text)
}

#[allow(clippy::too_many_arguments)]
async fn cmd_rank(
    config: Config,
    color: bool,
    job_description: &str,
    resumes_dir: &Path,
    top_n: Option<usize>,
    xlsx: Option<&Path>,
    json: Option<&Path>,
    preview: bool,
) -> Result<()> {
    let start_time = Instant::now();

    let pipeline = ScreeningPipeline::new(config)
        .context("Failed to initialize screening pipeline")?
        .with_progress(color);
    let top_n = pipeline.top_n(top_n)?;

    let outcome = pipeline
        .run(job_description, resumes_dir, top_n)
        .await
        .context("Ranking failed")?;

    print_ranking(&outcome, pipeline.config().ranking.score_precision);

    if preview {
        print_previews(&outcome, job_description);
    }

    pipeline
        .export(&outcome.report, xlsx, json)
        .context("Export failed")?;
    for path in xlsx.into_iter().chain(json) {
        println!("{}", format_success(&format!("Saved {}", path.display())));
    }

    info!(
        "Screening complete in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

fn print_ranking(outcome: &ScreeningOutcome, precision: u32) {
    let report = &outcome.report;

    if report.entries.is_empty() {
        println!("\n{}\n", format_warning("No resumes were ranked"));
    } else {
        println!("\nRanked Resumes ({})\n", report.model);
        println!("{}", "=".repeat(80));
        for entry in &report.entries {
            println!("{}", entry.format_line(precision));
        }
        println!("{}", "=".repeat(80));
    }

    if report.truncated_count() > 0 {
        println!(
            "{}",
            format_info(&format!(
                "{} more resumes below the top {}",
                report.truncated_count(),
                report.entries.len()
            ))
        );
    }

    for failure in &report.failures {
        println!(
            "{}",
            format_error(&format!("{}: {}", failure.name, failure.message))
        );
    }

    if !report.skipped.is_empty() {
        println!(
            "{}",
            format_warning(&format!(
                "Skipped unsupported files: {}",
                report.skipped.join(", ")
            ))
        );
    }
}

fn print_previews(outcome: &ScreeningOutcome, job_description: &str) {
    let keywords = job_keywords(job_description);

    for entry in &outcome.report.entries {
        let Some(document) = outcome.corpus.get(&entry.name) else {
            continue;
        };

        println!("\n{}. {}", entry.rank, entry.name);
        println!("{}", "-".repeat(80));
        println!(
            "{}",
            highlight_with(document.snippet(PREVIEW_CHARS), &keywords, format_keyword)
        );
    }
}

async fn cmd_extract(file: &Path) -> Result<()> {
    Validator::validate_file_path(file)?;

    let path = file.to_path_buf();
    let text = tokio::task::spawn_blocking(move || TextExtractor::new().extract_path(&path))
        .await
        .context("Extraction task failed")?
        .with_context(|| format!("Failed to extract {}", file.display()))?;

    if text.trim().is_empty() {
        warn!("No text extracted from {}", file.display());
    }

    println!("{}", text);
    Ok(())
}

async fn cmd_check(config: Config) -> Result<()> {
    let resumes_dir = config.corpus.resumes_dir.clone();
    let pipeline = ScreeningPipeline::new(config).context("Failed to initialize model")?;

    let report = pipeline.health_check(&resumes_dir).await;
    print!("{}", report);

    if !report.is_healthy() {
        let failing: Vec<&str> = report.failing().map(|c| c.component.as_str()).collect();
        anyhow::bail!("Unhealthy: {}", failing.join(", "));
    }

    Ok(())
}
