use serde::{Deserialize, Serialize};

use crate::catalog::IdRanges;

pub const DEFAULT_TEXT_REPORT_WIDTH: usize = 90;

/// Catalog-wide configuration, stored alongside the catalog data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub id_ranges: IdRanges,
    /// Width budget for mod labels in text reports.
    pub text_report_width: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            id_ranges: IdRanges::default(),
            text_report_width: DEFAULT_TEXT_REPORT_WIDTH,
        }
    }
}

impl CatalogSettings {
    pub fn with_ranges(id_ranges: IdRanges) -> Self {
        CatalogSettings {
            id_ranges,
            ..Default::default()
        }
    }
}
