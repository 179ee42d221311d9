//! Tracing setup: console output plus an optional per-run log file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// Console verbosity follows `-v` unless `RUST_LOG` is set. The run log
/// always records at info level.
pub fn init(verbose: u8, run_log: Option<File>) -> anyhow::Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let console_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file = run_log.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .with_filter(LevelFilter::INFO)
    });

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;

    Ok(())
}

/// Create `<output_dir>/logs/log_<timestamp>.txt`.
pub fn create_run_log(output_dir: &Path) -> std::io::Result<(PathBuf, File)> {
    let dir = output_dir.join("logs");
    fs::create_dir_all(&dir)?;

    let path = dir.join(format!(
        "log_{}.txt",
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    ));
    let file = File::create(&path)?;
    Ok((path, file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_log_is_timestamped_under_logs() {
        let dir = tempfile::tempdir().unwrap();
        let (path, _file) = create_run_log(dir.path()).unwrap();

        assert_eq!(path.parent(), Some(dir.path().join("logs").as_path()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("log_"));
        assert!(name.ends_with(".txt"));
        // log_YYYY-mm-dd_HH-MM-SS.txt
        assert_eq!(name.len(), "log_2024-01-01_00-00-00.txt".len());
        assert!(path.exists());
    }
}
