use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MAX_LOG_SIZE: u64 = 1024 * 1024; // 1MB

/// Initialize logging.
///
/// Console output is always on (filtered by `RUST_LOG`, default "info").
/// With `file_enabled`, logs are also appended to `<data dir>/logs/roost.log`,
/// truncated once it grows past 1MB.
///
/// The returned guard must stay alive for the duration of the program.
pub fn init_logging(file_enabled: bool) -> io::Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if file_enabled {
        let log_dir = log_directory()?;
        fs::create_dir_all(&log_dir)?;
        let log_path = log_dir.join("roost.log");
        truncate_if_needed(&log_path)?;

        let file = OpenOptions::new().create(true).append(true).open(&log_path)?;
        let (non_blocking_file, guard) = tracing_appender::non_blocking(BufWriter::new(file));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(io::stdout).with_ansi(true))
            .with(
                fmt::layer()
                    .with_writer(non_blocking_file)
                    .with_ansi(false)
                    .with_target(true),
            )
            .init();

        tracing::info!("Logging to file: {}", log_path.display());
        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
        Ok(None)
    }
}

fn log_directory() -> io::Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "roost")
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "failed to find home directory"))?;
    Ok(dirs.data_dir().join("logs"))
}

fn truncate_if_needed(log_path: &Path) -> io::Result<()> {
    if log_path.exists() {
        let metadata = fs::metadata(log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            let file = File::create(log_path)?;
            file.set_len(0)?;
        }
    }
    Ok(())
}
