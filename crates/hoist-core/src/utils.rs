//! Small shared helpers

use camino::Utf8PathBuf;

use crate::error::{Error, Result};

/// Get the user's home directory
pub fn get_home_dir() -> Result<Utf8PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?;

    Utf8PathBuf::from_path_buf(home)
        .map_err(|p| Error::invalid_config(format!("Home directory is not UTF-8: {:?}", p)))
}

/// Get the hoist state directory (~/.hoist)
pub fn get_hoist_dir() -> Result<Utf8PathBuf> {
    Ok(get_home_dir()?.join(".hoist"))
}
