use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Cannot determine data directory"))?
            .join("vendor-desk");

        fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    /// Line history of the interactive shell
    pub fn history_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("shell_history.txt"))
    }
}
