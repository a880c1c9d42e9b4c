//! hairscan: command-line scalp/hair image analysis.
//!
//! Validates an image, runs it through the analyzer and prints a summary or
//! a JSON report.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use hairscan_core::logging::{ERROR_KIND, ERROR_MSG};
use hairscan_core::{validate_image_file, ConfidenceTier, ImageFile};
use hairscan_inference::{FailureMode, HairscanConfig, OpenAIBackend};
use hairscan_pipeline::{AnalysisReport, Analyzer, PipelineEvent};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hairscan")]
#[command(author, version, about = "Scalp and hair image analysis")]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: <config_dir>/hairscan/hairscan.toml, then env vars)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JPEG or PNG image
    Analyze(AnalyzeArgs),

    /// Check an image against the upload rules without analyzing it
    Validate {
        /// Image file
        image: PathBuf,
    },

    /// Show whether the completion API is configured
    Status,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Image file
    image: PathBuf,

    /// Replace API failures with fallback data
    #[arg(long, conflicts_with = "strict")]
    graceful: bool,

    /// Surface API failures as errors
    #[arg(long)]
    strict: bool,

    /// Seed for fallback data
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let cli = Cli::parse();
    let json = matches!(&cli.command, Commands::Analyze(args) if args.json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                let kind = e
                    .downcast_ref::<hairscan_core::Error>()
                    .map(|err| err.kind().to_string())
                    .unwrap_or_else(|| "internal".to_string());
                let mut output = serde_json::Map::new();
                output.insert(ERROR_KIND.to_string(), kind.into());
                output.insert(ERROR_MSG.to_string(), format!("{:#}", e).into());
                println!("{}", serde_json::Value::Object(output));
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing on stderr, keeping stdout for command output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
///   RUST_LOG    - standard env filter (default: warnings from hairscan crates)
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hairscan=warn,hairscan_pipeline=warn,hairscan_inference=warn".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let file_dir = Path::new(path).parent().unwrap_or(Path::new("."));
        let file_name = Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("hairscan.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Analyze(args) => {
            let config = load_config(cli.config.as_deref())?;
            cmd_analyze(config, args).await
        }
        Commands::Validate { image } => cmd_validate(&image),
        Commands::Status => {
            let config = load_config(cli.config.as_deref())?;
            cmd_status(config)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<HairscanConfig> {
    let config = match path {
        Some(path) => HairscanConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => HairscanConfig::load().context("Failed to load config")?,
    };
    Ok(config)
}

fn read_image(path: &Path) -> anyhow::Result<ImageFile> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ImageFile::from_bytes(name, data))
}

async fn cmd_analyze(mut config: HairscanConfig, args: AnalyzeArgs) -> anyhow::Result<()> {
    if args.graceful {
        config.pipeline.failure_mode = FailureMode::Graceful;
    } else if args.strict {
        config.pipeline.failure_mode = FailureMode::Strict;
    }
    if args.seed.is_some() {
        config.pipeline.fallback_seed = args.seed;
    }

    let image = read_image(&args.image)?;
    let backend = OpenAIBackend::new(config.api)?;
    let analyzer = Analyzer::from_settings(Arc::new(backend), &config.pipeline);

    let progress = if args.json {
        None
    } else {
        let mut rx = analyzer.events();
        Some(tokio::spawn(async move {
            while let Ok(event) = rx.recv().await {
                match event {
                    PipelineEvent::StageStarted { stage, progress } => {
                        if let Some(label) = stage.step_label() {
                            eprintln!("[{:>3}%] {}", progress, label);
                        }
                    }
                    PipelineEvent::FallbackUsed { stage, reason } => {
                        eprintln!("       {} failed ({}), using fallback data", stage, reason);
                    }
                    event if event.is_terminal() => break,
                    _ => {}
                }
            }
        }))
    };

    let result = analyzer.run(image).await;
    drop(analyzer);
    if let Some(handle) = progress {
        let _ = handle.await;
    }
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    let analysis = &report.analysis;

    match analysis.stage() {
        Some(stage) => println!(
            "Stage:          {} {} ({})",
            stage.index(),
            stage.name(),
            stage.description()
        ),
        None => println!("Stage:          {} (invalid)", analysis.raw_stage),
    }
    println!(
        "Density:        {} ({})",
        analysis.density_score,
        analysis.density_status().label()
    );
    println!(
        "Scalp exposure: {}% ({})",
        analysis.scalp_exposure_percent,
        analysis.coverage_status().label()
    );
    println!("Parting width:  {} px", analysis.parting_width_px);
    println!(
        "Baby hairs:     {}",
        if analysis.baby_hairs_visible { "yes" } else { "no" }
    );
    if let Some(stable) = analysis.hairline_stability {
        println!("Hairline:       {}", if stable { "stable" } else { "unstable" });
    }
    if let Some(symmetry) = &analysis.left_right_symmetry {
        println!("Symmetry:       {}", symmetry);
    }

    let tier = match ConfidenceTier::from_score(report.confidence) {
        ConfidenceTier::High => "high",
        ConfidenceTier::Medium => "medium",
        ConfidenceTier::Low => "low",
    };
    println!("Confidence:     {} ({})", report.confidence, tier);
    println!();
    println!("{}", report.advice.summary);
    println!("{}", report.advice.advice);

    if report.used_fallback {
        println!();
        println!("Note: results include offline fallback data.");
    }
}

fn cmd_validate(path: &Path) -> anyhow::Result<()> {
    let image = read_image(path)?;
    validate_image_file(&image)
        .map_err(hairscan_core::Error::from)
        .with_context(|| format!("{} is not a usable image", image.name))?;

    let output = serde_json::json!({
        "valid": true,
        "file_name": image.name,
        "mime_type": image.mime_type,
        "file_size": image.size(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_status(config: HairscanConfig) -> anyhow::Result<()> {
    let backend = OpenAIBackend::new(config.api)?;
    let api = backend.config();

    let output = serde_json::json!({
        "api": backend.status(),
        "base_url": api.base_url,
        "vision_model": api.vision_model,
        "text_model": api.text_model,
        "timeout_seconds": api.timeout_seconds,
        "failure_mode": config.pipeline.failure_mode,
        "config_path": HairscanConfig::default_config_path(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
