//! Split command - cut a scanned bundle into per-case PDFs.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use casesplit_core::{CancelFlag, RunReport, ScanEvent, ScanOutcome, SplitConfig, SplitJob};

/// Progress bar resolution; event fractions are scaled to this length.
const PROGRESS_STEPS: u64 = 1000;

/// Arguments for the split command.
#[derive(Args)]
pub struct SplitArgs {
    /// Scanned PDF to split
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output directory (default: `output.default_dir`, then Documents/OCR_Output)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Rasterization DPI
    #[arg(long)]
    dpi: Option<u32>,

    /// Height of the footer band as a fraction of the page
    #[arg(long)]
    bottom_fraction: Option<f64>,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

impl SplitArgs {
    /// Output folder from the command line, the config, or the default.
    pub fn resolve_output_dir(&self, config: &SplitConfig) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(|| config.output.default_dir.clone())
            .unwrap_or_else(default_output_dir)
    }

    fn apply_overrides(&self, config: &mut SplitConfig) {
        if let Some(dir) = &self.model_dir {
            config.models.model_dir = dir.clone();
        }
        if let Some(dpi) = self.dpi {
            config.scan.dpi = dpi;
        }
        if let Some(fraction) = self.bottom_fraction {
            config.scan.bottom_fraction = fraction;
        }
    }
}

/// `Documents/OCR_Output` in the user's home.
pub fn default_output_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("OCR_Output")
}

pub async fn run(args: SplitArgs, mut config: SplitConfig, output_dir: PathBuf) -> anyhow::Result<()> {
    let start = Instant::now();
    args.apply_overrides(&mut config);

    debug!("Writing into {}", output_dir.display());

    let job = SplitJob::new(&args.input, &output_dir, config);
    let cancel = CancelFlag::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<ScanEvent>();

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current page");
            interrupt.cancel();
        }
    });

    // The sender is dropped with the job, which ends the event loop below.
    let worker_cancel = cancel.clone();
    let worker = tokio::task::spawn_blocking(move || job.run(&tx, &worker_cancel));

    let pb = ProgressBar::new(PROGRESS_STEPS);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {percent:>3}% {msg}")?
            .progress_chars("##-"),
    );

    while let Some(event) = rx.recv().await {
        render_event(&pb, &event);
    }

    let result = worker.await?;
    pb.finish_and_clear();
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, start);
    }

    Ok(())
}

fn render_event(pb: &ProgressBar, event: &ScanEvent) {
    match event {
        ScanEvent::Progress { fraction, message } => {
            pb.set_position(scale(*fraction));
            pb.set_message(message.clone());
        }
        ScanEvent::Info { fraction, message } => {
            pb.set_position(scale(*fraction));
            pb.println(format!("{} {}", style("ℹ").blue(), message));
        }
        ScanEvent::Error { message } => {
            pb.println(format!("{} {}", style("✗").red(), message));
        }
        ScanEvent::Complete { message } => {
            pb.set_position(PROGRESS_STEPS);
            pb.println(format!("{} {}", style("✓").green(), message));
        }
        ScanEvent::Cancelled { message } | ScanEvent::NoBoundary { message } => {
            pb.println(format!("{} {}", style("!").yellow(), message));
        }
    }
}

fn scale(fraction: f64) -> u64 {
    (fraction.clamp(0.0, 1.0) * PROGRESS_STEPS as f64).round() as u64
}

fn print_report(report: &RunReport, start: Instant) {
    println!();
    println!(
        "{} Wrote {} documents to {} in {:?}",
        style("✓").green(),
        report.chunks.len(),
        report.output_dir.display(),
        start.elapsed()
    );

    for chunk in &report.chunks {
        println!(
            "  - {} (pages {}-{}, {} pages)",
            chunk.label,
            chunk.start_page + 1,
            chunk.end_page + 1,
            chunk.page_count()
        );
    }

    if !report.failed.is_empty() {
        println!();
        println!("{}", style("Failed documents:").red());
        for chunk in &report.failed {
            println!(
                "  - {} (pages {}-{})",
                chunk.label,
                chunk.start_page + 1,
                chunk.end_page + 1
            );
        }
    }

    match report.outcome {
        ScanOutcome::Completed => {}
        ScanOutcome::NoBoundaryFound => {
            let next = report
                .chunks
                .iter()
                .chain(&report.failed)
                .map(|c| c.end_page + 2)
                .max()
                .unwrap_or(1);
            println!(
                "{} No case boundary found from page {} onward; those pages were not written.",
                style("!").yellow(),
                next
            );
        }
        ScanOutcome::Cancelled => {
            println!("{} Run cancelled; documents above are complete.", style("!").yellow());
        }
    }

    if let Some(path) = &report.summary_path {
        println!("{} Summary written to {}", style("ℹ").blue(), path.display());
    }
}
