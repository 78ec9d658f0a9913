use anyhow::{Context, Result};
use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::config::ConfigManager;

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Initialize console logging for the client.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Request lines are
/// logged at `debug`, per-event undo failures at `warn`. Output goes to
/// stderr so it never mixes with data a calling program prints.
///
/// Calling this twice is harmless; the second call leaves the first logger in
/// place. The persistent log file in the config directory is rotated here.
///
/// ```bash
/// RUST_LOG=debug my-tool   # show every request
/// RUST_LOG=off my-tool     # silence the client
/// ```
pub fn init_logger() -> Result<()> {
    ConfigManager::ensure_config_dir()?;
    rotate_log_if_needed()?;

    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:5}] {}: {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .try_init()
        .ok();

    log_to_file(&format!("Logger initialized with level: {level:?}"))
}

/// Append a timestamped line to the client's log file.
pub fn log_to_file(message: &str) -> Result<()> {
    let log_path = ConfigManager::log_file_path()?;
    append_line(&log_path, message)
}

fn append_line(path: &Path, message: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        message
    )?;
    Ok(())
}

/// Move the log file aside to `.log.old` once it grows past 10 MiB.
pub fn rotate_log_if_needed() -> Result<()> {
    rotate_at(&ConfigManager::log_file_path()?, MAX_LOG_SIZE)
}

fn rotate_at(log_path: &Path, max_size: u64) -> Result<()> {
    let Ok(metadata) = fs::metadata(log_path) else {
        return Ok(());
    };
    if metadata.len() <= max_size {
        return Ok(());
    }

    let old_log_path = log_path.with_extension("log.old");
    if old_log_path.exists() {
        fs::remove_file(&old_log_path)?;
    }
    fs::rename(log_path, &old_log_path)
        .with_context(|| format!("Failed to rotate log file: {}", log_path.display()))?;

    log::info!("Log file rotated to {}", old_log_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn test_log_to_file_under_config_home() -> Result<()> {
        let temp = TempDir::new()?;
        std::env::set_var("XDG_CONFIG_HOME", temp.path());

        ConfigManager::ensure_config_dir()?;
        log_to_file("listing roots")?;

        let log_path = ConfigManager::log_file_path()?;
        std::env::remove_var("XDG_CONFIG_HOME");

        assert!(log_path.starts_with(temp.path()));
        let contents = fs::read_to_string(&log_path)?;
        assert!(contents.contains("listing roots"));
        Ok(())
    }

    #[test]
    fn test_rotate_moves_oversized_log() -> Result<()> {
        let temp = TempDir::new()?;
        let log_path = temp.path().join("jianguo-client.log");
        fs::write(&log_path, vec![b'a'; 64])?;
        fs::write(temp.path().join("jianguo-client.log.old"), "stale")?;

        rotate_at(&log_path, 32)?;

        assert!(!log_path.exists());
        let old = fs::read(temp.path().join("jianguo-client.log.old"))?;
        assert_eq!(old.len(), 64);
        Ok(())
    }

    #[test]
    fn test_rotate_leaves_small_or_missing_log() -> Result<()> {
        let temp = TempDir::new()?;
        let log_path = temp.path().join("jianguo-client.log");

        rotate_at(&log_path, 32)?;

        append_line(&log_path, "short")?;
        rotate_at(&log_path, 1024)?;
        assert!(log_path.exists());
        assert!(!temp.path().join("jianguo-client.log.old").exists());
        Ok(())
    }
}
