use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::exclusion::{insert_unique, remove_item};
use super::identity::IdRanges;

/// A set of interchangeable mods. A group ID in a required-mods list is
/// satisfied by any one member.
///
/// `Clone` gives a fully independent copy, which is what staging relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    members: Vec<u64>,
}

impl Group {
    /// Builds a group, dropping duplicate and nested group members. An
    /// out-of-range ID or fewer than two members only produce warnings.
    pub fn new(id: u64, name: impl Into<String>, members: Vec<u64>, ranges: &IdRanges) -> Self {
        let members: Vec<u64> = members
            .into_iter()
            .unique()
            .filter(|member| {
                let nested = ranges.is_group(*member);
                if nested {
                    warn!("Group {} cannot contain group {}; member dropped", id, member);
                }
                !nested
            })
            .collect();
        let group = Group {
            id,
            name: name.into(),
            members,
        };
        group.warn_if_suspicious(ranges);
        group
    }

    pub(crate) fn warn_if_suspicious(&self, ranges: &IdRanges) {
        if !ranges.is_group(self.id) {
            warn!(
                "Group ID out of range: {}. This might give weird results in reports.",
                self
            );
        }
        if self.members.len() < 2 {
            warn!("Found group with less than 2 members: {}", self);
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[u64] {
        &self.members
    }

    pub fn contains(&self, mod_id: u64) -> bool {
        self.members.contains(&mod_id)
    }

    pub fn add_member(&mut self, mod_id: u64) -> bool {
        insert_unique(&mut self.members, mod_id)
    }

    pub fn remove_member(&mut self, mod_id: u64) -> bool {
        remove_item(&mut self.members, &mod_id)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[Group {}] {}", self.id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undersized_and_out_of_range_groups_are_still_built() {
        let ranges = IdRanges::default();
        let group = Group::new(12, "Tiny", vec![2_000_000], &ranges);
        assert_eq!(group.id(), 12);
        assert_eq!(group.members(), [2_000_000]);
    }

    #[test]
    fn duplicates_and_nested_groups_are_dropped() {
        let ranges = IdRanges::default();
        let group = Group::new(
            100_001,
            "Traffic managers",
            vec![2_000_000, 2_000_000, 100_002, 3_000_000],
            &ranges,
        );
        assert_eq!(group.members(), [2_000_000, 3_000_000]);
    }

    #[test]
    fn clone_is_independent() {
        let ranges = IdRanges::default();
        let original = Group::new(100_001, "Pair", vec![2_000_000, 3_000_000], &ranges);
        let mut copy = original.clone();
        copy.add_member(4_000_000);
        copy.remove_member(2_000_000);
        assert_eq!(original.members(), [2_000_000, 3_000_000]);
        assert_eq!(copy.members(), [3_000_000, 4_000_000]);
    }

    #[test]
    fn display_shows_id_and_name() {
        let ranges = IdRanges::default();
        let group = Group::new(100_001, "Pair", vec![2_000_000, 3_000_000], &ranges);
        assert_eq!(group.to_string(), "[Group 100001] Pair");
    }
}
