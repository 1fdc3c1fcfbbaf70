pub mod commands;
pub mod scan;
pub mod session;
pub mod validate;

pub use commands::{Cli, Commands};

use std::path::{Path, PathBuf};

use crate::config::{self, DefensisConfig};
use crate::errors::DefensisError;

/// Load the `--config` file if one was given, otherwise the built-in defaults.
pub async fn load_config(path: Option<&str>) -> Result<DefensisConfig, DefensisError> {
    match path {
        Some(p) => config::parse_config(Path::new(p)).await,
        None => Ok(DefensisConfig::default()),
    }
}

/// `--session-dir` wins over the config file's `session.dir`.
pub fn resolve_session_dir(flag: Option<&str>, config: &DefensisConfig) -> PathBuf {
    flag.map(PathBuf::from).unwrap_or_else(|| config.session_dir())
}
