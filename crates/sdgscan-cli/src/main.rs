use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sdgscan_core::{
    AuroraClassifier, ClassificationScores, Config, Ledger, Pipeline, SqliteLedger,
};
use sdgscan_pdf_mupdf::MupdfBackend;
use sdgscan_reporting::{ReportFormat, ReportInput, write_report};
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// SDG relevance screening - find a paper's abstract and score it against the UN Sustainable Development Goals
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the abstract of a PDF and classify it
    Check {
        /// Path to the PDF to check
        file_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Dry run: extract and print the abstract without classifying it
        #[arg(long)]
        dry_run: bool,

        /// Write a report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Report format (html, md, txt, json); defaults to the report file's extension
        #[arg(long)]
        format: Option<ReportFormat>,

        /// Classifier endpoint (overrides SDGSCAN_CLASSIFIER_URL)
        #[arg(long)]
        classifier_url: Option<String>,

        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Read at most this many pages (0 = all; overrides SDGSCAN_PAGE_LIMIT)
        #[arg(long)]
        page_limit: Option<usize>,
    },

    /// Show upload activity recorded by the web service
    Insight {
        /// Number of recent uploads to list
        #[arg(long, default_value_t = sdgscan_core::DEFAULT_RECENT_LIMIT)]
        limit: usize,

        /// Path to the ledger database (overrides SDGSCAN_LEDGER_PATH)
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sdgscan_core=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Command::Check {
            file_path,
            no_color,
            dry_run,
            report,
            format,
            classifier_url,
            json,
            page_limit,
        } => {
            let mut config = config;
            if let Some(url) = classifier_url {
                config.classifier_url = url;
            }
            if let Some(pages) = page_limit {
                config.page_limit = pages;
            }
            let color = ColorMode(!no_color && !json);
            let opts = CheckOptions {
                dry_run,
                report,
                format,
                json,
            };
            check(&file_path, &config, &opts, color).await
        }
        Command::Insight {
            limit,
            ledger,
            no_color,
        } => insight(ledger.or(config.ledger_path), limit, ColorMode(!no_color)),
    }
}

struct CheckOptions {
    dry_run: bool,
    report: Option<PathBuf>,
    format: Option<ReportFormat>,
    json: bool,
}

async fn check(
    file_path: &Path,
    config: &Config,
    opts: &CheckOptions,
    color: ColorMode,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }
    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string());

    let classifier = Arc::new(AuroraClassifier::new(
        config.classifier_url.clone(),
        config.classifier_timeout(),
    ));
    let backend = MupdfBackend::new().with_page_limit(config.page_limit);
    let pipeline = Pipeline::new(Arc::new(backend), classifier);
    let mut out = std::io::stdout().lock();

    if opts.dry_run {
        let extracted = pipeline.extract(file_path).await?;
        if opts.json {
            let value = serde_json::json!({
                "abstract": extracted.text,
                "tier": extracted.tier.level(),
                "method": extracted.tier.description(),
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        } else {
            output::print_abstract(&mut out, &file_name, &extracted, color)?;
        }
        return Ok(());
    }

    let analysis = pipeline.analyze(file_path).await?;
    let scores: ClassificationScores = analysis.scores();

    if opts.json {
        let outcome = analysis.into_outcome();
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
        if let Some(path) = &opts.report {
            let sdgscan_core::ProcessOutcome::Success { abstract_text, .. } = &outcome else {
                return Ok(());
            };
            save_report(&file_name, abstract_text, &scores, config, path, opts.format)?;
        }
        return Ok(());
    }

    output::print_abstract(&mut out, &file_name, &analysis.extracted, color)?;
    match &analysis.classification {
        Ok(scores) => output::print_scores(&mut out, scores, config.relevance_threshold, color)?,
        Err(e) => output::print_classifier_error(&mut out, e, color)?,
    }

    if let Some(path) = &opts.report {
        save_report(
            &file_name,
            &analysis.extracted.text,
            &scores,
            config,
            path,
            opts.format,
        )?;
        writeln!(out, "\nReport written to {}", path.display())?;
    }
    Ok(())
}

fn save_report(
    file_name: &str,
    abstract_text: &str,
    scores: &ClassificationScores,
    config: &Config,
    path: &Path,
    format: Option<ReportFormat>,
) -> anyhow::Result<()> {
    let format = format
        .or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(|e| e.parse().ok())
        })
        .unwrap_or_default();
    let input = ReportInput::new(file_name, abstract_text, scores, config.relevance_threshold);
    write_report(&input, format, path)?;
    Ok(())
}

fn insight(ledger_path: Option<PathBuf>, limit: usize, color: ColorMode) -> anyhow::Result<()> {
    let Some(path) = ledger_path else {
        anyhow::bail!(
            "No ledger configured. Pass --ledger, set SDGSCAN_LEDGER_PATH, or add [ledger] path to the config file."
        );
    };
    if !path.exists() {
        anyhow::bail!("Ledger not found: {}", path.display());
    }

    let ledger = SqliteLedger::open(&path)?;
    let summary = ledger.summary(limit)?;
    let mut out = std::io::stdout().lock();
    output::print_insight(&mut out, &summary, color)?;
    Ok(())
}
