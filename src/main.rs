mod batch;
mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use petsprite_core::{inspect, open_image, BackgroundMode};

use batch::{expand_pattern, run_batch, BatchReport};
use config::{Config, OptionsConfig};

#[derive(Parser)]
#[command(name = "petsprite", about = "Pet sprite cleanup tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every job listed in a TOML job file
    Run {
        /// Path to the job file
        #[arg(default_value = "sprites.toml")]
        config: PathBuf,
    },
    /// Normalize every file matching a glob pattern
    Normalize {
        /// Glob pattern, e.g. "pets/pixel_*.png"
        pattern: String,
        /// Write results here instead of overwriting the sources
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Skip files whose name contains this text (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
        /// color-key, flood-fill, flood-then-key or none
        #[arg(long, value_parser = parse_background)]
        background: Option<BackgroundMode>,
        #[arg(long)]
        key_threshold: Option<u8>,
        #[arg(long)]
        flood_tolerance: Option<u32>,
        #[arg(long)]
        alpha_threshold: Option<u8>,
        /// Output height in pixels
        #[arg(long, conflicts_with = "no_resize")]
        height: Option<u32>,
        /// Trim only, keep the cropped size
        #[arg(long)]
        no_resize: bool,
    },
    /// Print diagnostics for image files
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn parse_background(s: &str) -> Result<BackgroundMode, String> {
    BackgroundMode::from_str(s)
        .ok_or_else(|| format!("unknown background mode '{}' (color-key, flood-fill, flood-then-key, none)", s))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => cmd_run(&config),
        Commands::Normalize {
            pattern,
            out_dir,
            exclude,
            background,
            key_threshold,
            flood_tolerance,
            alpha_threshold,
            height,
            no_resize,
        } => {
            let overrides = OptionsConfig {
                background,
                key_threshold,
                flood_tolerance,
                alpha_threshold,
                target_height: height,
                resize: Some(!no_resize),
            };
            cmd_normalize(&pattern, &exclude, out_dir.as_deref(), &overrides)
        }
        Commands::Inspect { files } => cmd_inspect(&files),
    }
}

fn cmd_run(config_path: &Path) -> ExitCode {
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load job file: {}", e);
            return ExitCode::from(1);
        }
    };

    let jobs = match config.jobs() {
        Ok(jobs) => jobs,
        Err(e) => {
            log::error!("Failed to collect jobs: {}", e);
            return ExitCode::from(1);
        }
    };

    log::info!("Running {} job(s) from {}", jobs.len(), config_path.display());
    finish(run_batch(&jobs))
}

fn cmd_normalize(
    pattern: &str,
    exclude: &[String],
    out_dir: Option<&Path>,
    overrides: &OptionsConfig,
) -> ExitCode {
    let options = overrides.apply(Default::default());
    log::info!("Normalizing {} ({:?})", pattern, options);

    match expand_pattern(pattern, exclude, out_dir, &options) {
        Ok(jobs) => finish(run_batch(&jobs)),
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(1)
        }
    }
}

fn cmd_inspect(files: &[PathBuf]) -> ExitCode {
    let mut failed = 0;

    for path in files {
        match open_image(path) {
            Ok(img) => {
                println!("Analysis for {}:", path.display());
                println!("{}", inspect(&img));
            }
            Err(e) => {
                log::error!("Error analyzing {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn finish(report: BatchReport) -> ExitCode {
    if report.is_clean() {
        return ExitCode::SUCCESS;
    }
    log::error!("{} file(s) failed, see errors above", report.failed.len());
    ExitCode::from(2)
}
