use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::{BaseDirs, UserDirs};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".atrium-praise";
/// Subfolder for exports when the platform has no Downloads directory.
const EXPORT_DIR_NAME: &str = "exports";
/// Subfolder holding the rolling log files.
const LOG_DIR_NAME: &str = "logs";

/// Filesystem locations the application writes to.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Where exported CSV files land.
    pub export_dir: PathBuf,
    /// Where the tracing appender writes.
    pub log_dir: PathBuf,
}

impl AppPaths {
    /// Resolve paths from the current user's directories. Nothing is created
    /// here; writers create their directory on first use.
    pub fn resolve() -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        let data_dir = base_dirs.home_dir().join(DATA_DIR_NAME);

        let export_dir = UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|dir| dir.to_path_buf()))
            .unwrap_or_else(|| data_dir.join(EXPORT_DIR_NAME));

        Ok(Self {
            export_dir,
            log_dir: data_dir.join(LOG_DIR_NAME),
        })
    }
}
