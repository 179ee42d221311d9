//! CLI application for splitting scanned case bundles into per-case PDFs.

mod commands;
mod logging;

use clap::{Parser, Subcommand};
use console::style;
use tracing::info;

use commands::{config, split};

/// Case splitter - cut bulk scans into one PDF per case using footer OCR
#[derive(Parser)]
#[command(name = "casesplit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a scanned PDF into per-case documents
    Split(split::SplitArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Split(args) => {
            let settings = config::load(cli.config.as_deref())?;
            let output_dir = args.resolve_output_dir(&settings);

            // Only runs that can start get a log folder.
            let run_log = if settings.output.write_logs && args.input.exists() {
                match logging::create_run_log(&output_dir) {
                    Ok(log) => Some(log),
                    Err(e) => {
                        eprintln!(
                            "{} Failed to set up run log: {}",
                            style("!").yellow(),
                            e
                        );
                        None
                    }
                }
            } else {
                None
            };

            let (log_path, log_file) = run_log.unzip();
            logging::init(cli.verbose, log_file)?;
            if let Some(path) = log_path {
                info!("Run log started in: {}", path.display());
            }

            split::run(args, settings, output_dir).await
        }
        Commands::Config(args) => {
            logging::init(cli.verbose, None)?;
            config::run(args, cli.config.as_deref()).await
        }
    }
}
