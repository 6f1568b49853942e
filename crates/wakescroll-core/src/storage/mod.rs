mod log;
mod store;

pub use log::{EventLog, Insert};
pub use store::{Kv, Store};

use std::path::PathBuf;

/// Returns `~/.config/wakescroll[-dev]/` based on WAKESCROLL_ENV.
///
/// Set WAKESCROLL_ENV=dev to use the development data directory, or
/// WAKESCROLL_DATA_DIR to pin an explicit directory (used by the CLI tests).
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    if let Ok(dir) = std::env::var("WAKESCROLL_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WAKESCROLL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("wakescroll-dev")
    } else {
        base_dir.join("wakescroll")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
