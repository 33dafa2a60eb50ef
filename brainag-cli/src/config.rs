//! Environment loading
//!
//! `.env` in the working directory wins over `~/.brainag/.env`; variables
//! already set in the process environment win over both.

use std::path::PathBuf;

pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".brainag"))
}

/// Runs before logging is initialised, so it returns the files it loaded
/// instead of logging them.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            // Malformed files are skipped; clap reports what is still missing
            if dotenvy::from_path(&env_file).is_ok() {
                loaded.push(env_file);
            }
        }
    }

    loaded
}
