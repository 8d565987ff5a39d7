use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{GroupUpdate, ModUpdate, UpdateSession};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModEntry {
    pub id: u64,
    #[serde(flatten)]
    pub update: ModUpdate,
}

/// A file's worth of proposed changes, as produced by the crawler or read
/// from curation notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateBatch {
    pub groups: Vec<GroupUpdate>,
    pub mods: Vec<ModEntry>,
    pub remove_groups: Vec<u64>,
    pub remove_mods: Vec<u64>,
}

impl UpdateBatch {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
            && self.mods.is_empty()
            && self.remove_groups.is_empty()
            && self.remove_mods.is_empty()
    }

    /// Groups go first so crawler requirements can be swapped for them.
    pub fn apply(&self, session: &mut UpdateSession<'_>) {
        debug!(
            "Applying batch: {} groups, {} mods, {} group removals, {} mod removals",
            self.groups.len(),
            self.mods.len(),
            self.remove_groups.len(),
            self.remove_mods.len()
        );
        for group in &self.groups {
            session.upsert_group(group.id, group.name.clone(), group.members.clone());
        }
        for entry in &self.mods {
            session.upsert_mod(entry.id, &entry.update);
        }
        for id in &self.remove_groups {
            session.remove_group(*id);
        }
        for id in &self.remove_mods {
            session.remove_mod(*id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Field, RelationshipKind};

    #[test]
    fn reads_flattened_mod_entries() {
        let batch: UpdateBatch = serde_json::from_str(
            r#"{
                "mods": [
                    {
                        "id": 2000000,
                        "name": { "set": "Network Extensions" },
                        "relationships": [
                            { "kind": "successor", "edit": { "add": 3000000 } }
                        ]
                    }
                ],
                "remove_mods": [4000000]
            }"#,
        )
        .unwrap();
        assert_eq!(batch.mods.len(), 1);
        let entry = &batch.mods[0];
        assert_eq!(entry.id, 2_000_000);
        assert_eq!(entry.update.name, Field::Set("Network Extensions".to_string()));
        assert_eq!(entry.update.relationships[0].kind, RelationshipKind::Successor);
        assert_eq!(batch.remove_mods, [4_000_000]);
        assert!(batch.groups.is_empty());
    }
}
