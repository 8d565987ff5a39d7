use serde::{Deserialize, Serialize};

/// What kind of catalog identity a numeric ID stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityClass {
    RealWorkshopEntry,
    LocalMod,
    BuiltinMod,
    Group,
    Unknown,
}

/// Configured numeric boundaries for synthetic IDs.
///
/// Everything above `highest_fake` is a real workshop ID. When ranges overlap,
/// [`IdRanges::classify`] picks the most specific class in the order
/// Group, Builtin, Local, Real.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdRanges {
    pub lowest_builtin: u64,
    pub highest_builtin: u64,
    pub lowest_local: u64,
    pub highest_local: u64,
    pub lowest_group: u64,
    pub highest_group: u64,
    pub highest_fake: u64,
}

impl Default for IdRanges {
    fn default() -> Self {
        IdRanges {
            lowest_builtin: 1,
            highest_builtin: 99,
            lowest_local: 100,
            highest_local: 99_999,
            lowest_group: 100_000,
            highest_group: 999_999,
            highest_fake: 999_999,
        }
    }
}

impl IdRanges {
    pub fn classify(&self, id: u64) -> IdentityClass {
        if (self.lowest_group..=self.highest_group).contains(&id) {
            IdentityClass::Group
        } else if (self.lowest_builtin..=self.highest_builtin).contains(&id) {
            IdentityClass::BuiltinMod
        } else if (self.lowest_local..=self.highest_local).contains(&id) {
            IdentityClass::LocalMod
        } else if id > self.highest_fake {
            IdentityClass::RealWorkshopEntry
        } else {
            IdentityClass::Unknown
        }
    }

    pub fn is_group(&self, id: u64) -> bool {
        self.classify(id) == IdentityClass::Group
    }

    /// IDs without a public workshop listing.
    pub fn is_synthetic(&self, id: u64) -> bool {
        self.classify(id) != IdentityClass::RealWorkshopEntry
    }

    /// Bracketed identity tag, e.g. `[Steam ID  123456789]` or `[local mod 500]`.
    /// `hide_id` only affects synthetic IDs.
    pub fn tag(&self, id: u64, hide_id: bool) -> String {
        self.tag_parts(id, hide_id).plain()
    }

    pub(crate) fn tag_parts(&self, id: u64, hide_id: bool) -> IdentityTag {
        let suffix = if hide_id {
            String::new()
        } else {
            format!(" {}", id)
        };
        match self.classify(id) {
            IdentityClass::RealWorkshopEntry => IdentityTag {
                word: "Steam ID".to_string(),
                rest: format!(" {:>10}", id),
            },
            IdentityClass::BuiltinMod => IdentityTag {
                word: "built-in".to_string(),
                rest: format!(" mod{}", suffix),
            },
            IdentityClass::LocalMod => IdentityTag {
                word: "local".to_string(),
                rest: format!(" mod{}", suffix),
            },
            IdentityClass::Group => IdentityTag {
                word: "Group".to_string(),
                rest: format!(" {}", id),
            },
            IdentityClass::Unknown => IdentityTag {
                word: "unknown".to_string(),
                rest: format!(" ID{}", suffix),
            },
        }
    }
}

/// A tag split into its leading word and the remainder, so rich text output
/// can mark up the word alone.
pub(crate) struct IdentityTag {
    word: String,
    rest: String,
}

impl IdentityTag {
    pub(crate) fn plain(&self) -> String {
        format!("[{}{}]", self.word, self.rest)
    }

    pub(crate) fn rich(&self) -> String {
        format!(
            "[<span class=\"id-tag\">{}</span>{}]",
            self.word, self.rest
        )
    }

    pub(crate) fn visible_len(&self) -> usize {
        self.plain().chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ranges_classify_each_class() {
        let ranges = IdRanges::default();
        assert_eq!(ranges.classify(0), IdentityClass::Unknown);
        assert_eq!(ranges.classify(5), IdentityClass::BuiltinMod);
        assert_eq!(ranges.classify(500), IdentityClass::LocalMod);
        assert_eq!(ranges.classify(100_001), IdentityClass::Group);
        assert_eq!(ranges.classify(5_000_001), IdentityClass::RealWorkshopEntry);
    }

    #[test]
    fn overlapping_ranges_prefer_narrowest_class() {
        let ranges = IdRanges {
            lowest_builtin: 1,
            highest_builtin: 50,
            lowest_local: 1,
            highest_local: 1000,
            lowest_group: 40,
            highest_group: 60,
            highest_fake: 100,
        };
        // group beats builtin and local
        assert_eq!(ranges.classify(45), IdentityClass::Group);
        // builtin beats local
        assert_eq!(ranges.classify(10), IdentityClass::BuiltinMod);
        // local beats real, even above the fake threshold
        assert_eq!(ranges.classify(500), IdentityClass::LocalMod);
        assert_eq!(ranges.classify(1001), IdentityClass::RealWorkshopEntry);
    }

    #[test]
    fn tags_show_or_hide_synthetic_ids() {
        let ranges = IdRanges::default();
        assert_eq!(ranges.tag(5_000_001, false), "[Steam ID    5000001]");
        assert_eq!(ranges.tag(5_000_001, true), "[Steam ID    5000001]");
        assert_eq!(ranges.tag(500, false), "[local mod 500]");
        assert_eq!(ranges.tag(500, true), "[local mod]");
        assert_eq!(ranges.tag(7, false), "[built-in mod 7]");
        assert_eq!(ranges.tag(100_001, true), "[Group 100001]");
    }
}
