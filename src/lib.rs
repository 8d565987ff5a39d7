//! Compatibility catalog for game mods: the data model and the update
//! sessions that merge curated and crawled facts into it.

pub mod batch;
pub mod catalog;
pub mod error;
pub mod settings;
pub mod util;
pub mod workshop;

pub use error::{CatalogError, Result};
