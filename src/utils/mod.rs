pub mod error;
pub mod fixtures;
pub mod ids;
pub mod logger;
pub mod maps;
pub mod random;
pub mod time;
pub mod validation;

use std::path::PathBuf;

/// The current user's home directory, if the platform reports one.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}
