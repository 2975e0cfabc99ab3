use clap::{Parser, Subcommand};
use config::PortfolioConfig;
use error::Result;
use output::Site;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

mod bootstrap;
mod config;
mod content;
mod document;
mod error;
mod output;
mod rich_text;
mod util;

const DEFAULT_CONFIG: &str = "./portfolio.toml";

/// Static personal portfolio website generator.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Portfolio content and settings. Built-in content is used if the
    /// default file is absent.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the site to the configured output directory.
    Build,
    /// Serve the site from memory.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
    /// Render everything and report problems without writing.
    Check,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();

    let config = match &cli.config {
        Some(path) => PortfolioConfig::load(path, false)?,
        None => PortfolioConfig::load(DEFAULT_CONFIG.as_ref(), true)?,
    };
    let site = Site::load(config)?;

    tracing::info!(
        "({:.1}s) Found {} projects, {} skills and {} static files",
        start.elapsed().as_secs_f32(),
        site.config.projects.len(),
        site.config.skills.len(),
        site.static_files.len(),
    );

    let output = site.output()?;

    match cli.command {
        Command::Build => output::build(start, &site.config, &output),
        Command::Serve { addr } => output::serve(start, &addr, &output),
        Command::Check => {
            for file in output.values() {
                std::sync::LazyLock::force(file);
            }
            let missing = site.missing_assets();
            tracing::info!(
                "({:.1}s) Rendered {} files, {} missing assets",
                start.elapsed().as_secs_f32(),
                output.len(),
                missing.len(),
            );
            Ok(())
        }
    }
}
