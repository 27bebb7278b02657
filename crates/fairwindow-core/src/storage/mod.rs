mod config;

pub use config::{ActivityConfig, Config, LocationConfig};

use std::path::PathBuf;

/// Returns `~/.config/fairwindow[-dev]/` based on FAIRWINDOW_ENV.
///
/// Set FAIRWINDOW_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FAIRWINDOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("fairwindow-dev")
    } else {
        base_dir.join("fairwindow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
