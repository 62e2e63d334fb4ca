use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise each `-v` raises the level one step from `base`.
fn env_filter(base: u8, verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_name(base.saturating_add(verbose))))
}

fn level_name(level: u8) -> &'static str {
    match level {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Log to stderr, for commands that print to a normal terminal.
pub fn init_stderr(verbose: u8) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(0, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}

/// Log to a file so the full-screen view is left alone. Returns the file path.
pub fn init_file(verbose: u8) -> Result<PathBuf> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(1, verbose))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(path)
}

fn log_file_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
        .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

    Ok(dirs.data_local_dir().join("cityweather.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_steps_up_and_saturates() {
        assert_eq!(level_name(0), "warn");
        assert_eq!(level_name(1), "info");
        assert_eq!(level_name(2), "debug");
        assert_eq!(level_name(3), "trace");
        assert_eq!(level_name(9), "trace");
    }
}
