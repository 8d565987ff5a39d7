use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::Dlc;

/// A fact the crawler may not overwrite once a curator excluded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionField {
    GameVersion,
    SourceUrl,
    NoDescription,
    RequiredDlc(Dlc),
    RequiredMod(u64),
}

impl fmt::Display for ExclusionField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExclusionField::GameVersion => write!(f, "game version"),
            ExclusionField::SourceUrl => write!(f, "source URL"),
            ExclusionField::NoDescription => write!(f, "no description"),
            ExclusionField::RequiredDlc(dlc) => write!(f, "required DLC {:?}", dlc),
            ExclusionField::RequiredMod(id) => write!(f, "required mod {}", id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exclusions {
    game_version: bool,
    source_url: bool,
    no_description: bool,
    required_dlcs: Vec<Dlc>,
    required_mods: Vec<u64>,
}

impl Exclusions {
    pub fn is_excluded(&self, field: ExclusionField) -> bool {
        match field {
            ExclusionField::GameVersion => self.game_version,
            ExclusionField::SourceUrl => self.source_url,
            ExclusionField::NoDescription => self.no_description,
            ExclusionField::RequiredDlc(dlc) => self.required_dlcs.contains(&dlc),
            ExclusionField::RequiredMod(id) => self.required_mods.contains(&id),
        }
    }

    /// Returns true when the exclusion was not set before.
    pub fn exclude(&mut self, field: ExclusionField) -> bool {
        match field {
            ExclusionField::GameVersion => !std::mem::replace(&mut self.game_version, true),
            ExclusionField::SourceUrl => !std::mem::replace(&mut self.source_url, true),
            ExclusionField::NoDescription => !std::mem::replace(&mut self.no_description, true),
            ExclusionField::RequiredDlc(dlc) => insert_unique(&mut self.required_dlcs, dlc),
            ExclusionField::RequiredMod(id) => insert_unique(&mut self.required_mods, id),
        }
    }

    /// Returns true when an exclusion was actually cleared.
    pub fn unexclude(&mut self, field: ExclusionField) -> bool {
        match field {
            ExclusionField::GameVersion => std::mem::replace(&mut self.game_version, false),
            ExclusionField::SourceUrl => std::mem::replace(&mut self.source_url, false),
            ExclusionField::NoDescription => std::mem::replace(&mut self.no_description, false),
            ExclusionField::RequiredDlc(dlc) => remove_item(&mut self.required_dlcs, &dlc),
            ExclusionField::RequiredMod(id) => remove_item(&mut self.required_mods, &id),
        }
    }

    pub fn required_dlcs(&self) -> &[Dlc] {
        &self.required_dlcs
    }

    pub fn required_mods(&self) -> &[u64] {
        &self.required_mods
    }

    /// Every active exclusion, flags first.
    pub fn active(&self) -> Vec<ExclusionField> {
        let flags = [
            (self.game_version, ExclusionField::GameVersion),
            (self.source_url, ExclusionField::SourceUrl),
            (self.no_description, ExclusionField::NoDescription),
        ];
        flags
            .into_iter()
            .filter_map(|(set, field)| set.then_some(field))
            .chain(self.required_dlcs.iter().map(|d| ExclusionField::RequiredDlc(*d)))
            .chain(self.required_mods.iter().map(|m| ExclusionField::RequiredMod(*m)))
            .collect()
    }
}

/// Ordered-set insert shared by every list on a mod.
pub(crate) fn insert_unique<T: PartialEq>(list: &mut Vec<T>, item: T) -> bool {
    if list.contains(&item) {
        false
    } else {
        list.push(item);
        true
    }
}

pub(crate) fn remove_item<T: PartialEq>(list: &mut Vec<T>, item: &T) -> bool {
    let before = list.len();
    list.retain(|x| x != item);
    list.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_toggle_and_report_change() {
        let mut exclusions = Exclusions::default();
        assert!(!exclusions.is_excluded(ExclusionField::GameVersion));
        assert!(exclusions.exclude(ExclusionField::GameVersion));
        assert!(!exclusions.exclude(ExclusionField::GameVersion));
        assert!(exclusions.is_excluded(ExclusionField::GameVersion));
        assert!(exclusions.unexclude(ExclusionField::GameVersion));
        assert!(!exclusions.unexclude(ExclusionField::GameVersion));
    }

    #[test]
    fn sets_track_individual_targets() {
        let mut exclusions = Exclusions::default();
        exclusions.exclude(ExclusionField::RequiredMod(42));
        exclusions.exclude(ExclusionField::RequiredDlc(Dlc::AfterDark));
        exclusions.exclude(ExclusionField::NoDescription);
        assert!(exclusions.is_excluded(ExclusionField::RequiredMod(42)));
        assert!(!exclusions.is_excluded(ExclusionField::RequiredMod(43)));
        assert_eq!(
            exclusions.active(),
            vec![
                ExclusionField::NoDescription,
                ExclusionField::RequiredDlc(Dlc::AfterDark),
                ExclusionField::RequiredMod(42),
            ]
        );
    }
}
