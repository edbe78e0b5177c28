mod config;

pub use config::{Config, SessionConfig, ShellConfig, TickerConfig};

use std::path::PathBuf;

/// Returns `~/.config/dayfocus[-dev]/` based on DAYFOCUS_ENV.
///
/// Set DAYFOCUS_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYFOCUS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("dayfocus-dev")
    } else {
        base_dir.join("dayfocus")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
