use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Group {group} references mod {member}, which is not in the catalog")]
    MissingGroupMember { group: u64, member: u64 },

    #[error("Catalog version {0} cannot be incremented any further")]
    VersionOverflow(u32),

    #[error("Catalog file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Catalog file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
