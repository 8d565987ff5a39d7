use std::path::{Path, PathBuf};

use tracing::{debug, info};
use tracing_unwrap::OptionExt;

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::settings::CatalogSettings;

pub fn get_data_dir() -> std::io::Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .expect_or_log("Failed to get user data directory")
        .join("modcompat");
    if !data_dir.is_dir() {
        info!("Creating data directory");
        std::fs::create_dir_all(&data_dir)?;
    }
    Ok(data_dir)
}

pub fn get_catalog_path() -> std::io::Result<PathBuf> {
    Ok(get_data_dir()?.join("catalog.json"))
}

pub fn open_catalog(path: &Path) -> Result<Catalog> {
    debug!("Opening catalog at {}", path.display());
    if !path.is_file() {
        return Err(CatalogError::NotFound(path.to_path_buf()));
    }
    let data = std::fs::read_to_string(path)?;
    let catalog: Catalog = serde_json::from_str(&data)?;
    debug!(
        "Loaded catalog version {} with {} mods",
        catalog.version(),
        catalog.mod_count()
    );
    Ok(catalog)
}

/// Writes next to the target first so a failed write never truncates the
/// existing catalog.
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    debug!("Saving catalog version {} to {}", catalog.version(), path.display());
    let data = serde_json::to_string_pretty(catalog)?;
    let staging = path.with_extension("json.tmp");
    std::fs::write(&staging, data)?;
    std::fs::rename(&staging, path)?;
    Ok(())
}

pub fn init_catalog(path: &Path, force: bool, settings: CatalogSettings) -> Result<Catalog> {
    debug!("Initializing catalog");
    if path.is_file() {
        if force {
            info!("Deleting existing catalog...");
            std::fs::remove_file(path)?;
        } else {
            return Err(CatalogError::AlreadyExists(path.to_path_buf()));
        }
    }
    let catalog = Catalog::new(settings);
    save_catalog(path, &catalog)?;
    Ok(catalog)
}
