mod catalog_mod;
mod exclusion;
mod group;
mod identity;
mod session;
mod types;
mod update;
mod version;

pub use catalog_mod::{Mod, Subscription};
pub use exclusion::{ExclusionField, Exclusions};
pub use group::Group;
pub use identity::{IdRanges, IdentityClass};
pub use session::{CommitSummary, DataQualityIssue, SessionState, UpdateOrigin, UpdateSession};
pub use types::{Dlc, RelationshipKind, ReportSeverity, Stability, Status};
pub use update::{Field, GroupUpdate, ListEdit, ModUpdate, RelationshipEdit};
pub use version::GameVersion;

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::settings::CatalogSettings;

/// Decides whether a mod counts as present when checking requirements.
pub trait ActiveMods {
    fn is_active(&self, mod_id: u64) -> bool;
}

impl ActiveMods for HashSet<u64> {
    fn is_active(&self, mod_id: u64) -> bool {
        self.contains(&mod_id)
    }
}

impl ActiveMods for BTreeSet<u64> {
    fn is_active(&self, mod_id: u64) -> bool {
        self.contains(&mod_id)
    }
}

/// Mods with a subscription that is not disabled.
pub struct SubscribedMods<'a>(pub &'a Catalog);

impl ActiveMods for SubscribedMods<'_> {
    fn is_active(&self, mod_id: u64) -> bool {
        self.0
            .get_mod(mod_id)
            .is_some_and(|m| m.subscription().is_some() && !m.is_disabled())
    }
}

/// The whole compatibility catalog.
///
/// Mutation of mods and groups goes through [`Catalog::begin_session`]; the
/// session works on a copy and swaps it in on commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    version: u32,
    built_at: Option<DateTime<Utc>>,
    settings: CatalogSettings,
    mods: BTreeMap<u64, Mod>,
    groups: BTreeMap<u64, Group>,

    #[serde(skip)]
    session_state: SessionState,
}

impl Catalog {
    pub fn new(settings: CatalogSettings) -> Self {
        Catalog {
            settings,
            ..Default::default()
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn ranges(&self) -> &IdRanges {
        &self.settings.id_ranges
    }

    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    pub fn get_mod(&self, id: u64) -> Option<&Mod> {
        self.mods.get(&id)
    }

    pub fn mods(&self) -> impl Iterator<Item = &Mod> {
        self.mods.values()
    }

    pub fn mod_count(&self) -> usize {
        self.mods.len()
    }

    pub fn get_group(&self, id: u64) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// The group `mod_id` belongs to, if any.
    pub fn group_of(&self, mod_id: u64) -> Option<&Group> {
        self.groups.values().find(|g| g.contains(mod_id))
    }

    /// Label for any ID, falling back to the bare tag for unknown mods.
    pub fn label(&self, id: u64, width: Option<usize>) -> String {
        match self.mods.get(&id) {
            Some(m) => m.render_label(self.ranges(), false, false, width, false),
            None => match self.groups.get(&id) {
                Some(group) => group.to_string(),
                None => self.ranges().tag(id, false),
            },
        }
    }

    /// Runtime-only subscription state for reporting; never persisted.
    pub fn update_subscription(&mut self, mod_id: u64, subscription: Subscription) -> bool {
        match self.mods.get_mut(&mod_id) {
            Some(m) => {
                m.update_subscription(subscription);
                true
            }
            None => false,
        }
    }

    pub fn raise_severity(&mut self, mod_id: u64, severity: ReportSeverity) {
        if let Some(m) = self.mods.get_mut(&mod_id) {
            m.raise_severity(severity);
        }
    }

    /// Whether `required_id` is satisfied for `mod_id` in `active`.
    ///
    /// A group ID is satisfied by any one active member of the group as it
    /// stands right now; any other ID must be active itself.
    pub fn resolve_requirement(
        &self,
        mod_id: u64,
        required_id: u64,
        active: &impl ActiveMods,
    ) -> bool {
        if !self.ranges().is_group(required_id) {
            return active.is_active(required_id);
        }
        match self.groups.get(&required_id) {
            Some(group) => {
                let satisfied = group.members().iter().any(|m| active.is_active(*m));
                debug!(
                    "Mod {} requires {}: {}",
                    mod_id,
                    group,
                    if satisfied { "satisfied" } else { "missing" }
                );
                satisfied
            }
            None => {
                warn!("Mod {} requires unknown group {}", mod_id, required_id);
                false
            }
        }
    }

    /// Required mods and groups of `mod_id` that `active` does not satisfy.
    pub fn unmet_requirements(&self, mod_id: u64, active: &impl ActiveMods) -> Vec<u64> {
        self.mods
            .get(&mod_id)
            .map(|m| {
                m.required_mods()
                    .iter()
                    .copied()
                    .filter(|required| !self.resolve_requirement(mod_id, *required, active))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every group member must be a mod in this catalog.
    pub fn check_group_members(&self) -> Result<()> {
        for group in self.groups.values() {
            if let Some(member) = group
                .members()
                .iter()
                .find(|member| !self.mods.contains_key(member))
            {
                return Err(CatalogError::MissingGroupMember {
                    group: group.id(),
                    member: *member,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_group() -> Catalog {
        let mut catalog = Catalog::default();
        let now = Utc::now();
        let mut session = catalog.begin_session(UpdateOrigin::Curation, now);
        session.upsert_mod(2_000_000, &ModUpdate::new().name("A"));
        session.upsert_mod(3_000_000, &ModUpdate::new().name("B"));
        session.upsert_mod(
            1_000_000_000,
            &ModUpdate::new().relationship(RelationshipEdit::add(
                RelationshipKind::RequiredMod,
                100_001,
            )),
        );
        session.upsert_group(100_001, "A or B", vec![2_000_000, 3_000_000]);
        session.commit(now).unwrap();
        catalog
    }

    #[test]
    fn group_requirement_needs_any_member() {
        let catalog = catalog_with_group();
        let only_b: HashSet<u64> = [3_000_000].into_iter().collect();
        let none: HashSet<u64> = HashSet::new();
        assert!(catalog.resolve_requirement(1_000_000_000, 100_001, &only_b));
        assert!(!catalog.resolve_requirement(1_000_000_000, 100_001, &none));
        assert_eq!(catalog.unmet_requirements(1_000_000_000, &none), [100_001]);
        assert!(catalog.unmet_requirements(1_000_000_000, &only_b).is_empty());
    }

    #[test]
    fn plain_requirement_needs_the_mod_itself() {
        let catalog = catalog_with_group();
        let active: BTreeSet<u64> = [2_000_000].into_iter().collect();
        assert!(catalog.resolve_requirement(1_000_000_000, 2_000_000, &active));
        assert!(!catalog.resolve_requirement(1_000_000_000, 3_000_000, &active));
    }

    #[test]
    fn subscribed_mods_skip_disabled_ones() {
        let mut catalog = catalog_with_group();
        catalog.update_subscription(2_000_000, Subscription::default());
        catalog.update_subscription(
            3_000_000,
            Subscription {
                disabled: true,
                ..Default::default()
            },
        );
        let active = SubscribedMods(&catalog);
        assert!(active.is_active(2_000_000));
        assert!(!active.is_active(3_000_000));
        assert!(!active.is_active(1_000_000_000));
    }

    #[test]
    fn label_falls_back_to_tag() {
        let catalog = catalog_with_group();
        assert_eq!(catalog.label(100_001, None), "[Group 100001] A or B");
        assert_eq!(catalog.label(600, None), "[local mod 600]");
        assert_eq!(catalog.label(2_000_000, None), "[Steam ID    2000000] A");
    }
}
