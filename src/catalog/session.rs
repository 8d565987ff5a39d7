use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::catalog_mod::Mod;
use super::exclusion::ExclusionField;
use super::group::Group;
use super::types::{RelationshipKind, Status};
use super::update::{Field, ListEdit, ModUpdate, RelationshipEdit};
use super::Catalog;
use crate::error::{CatalogError, Result};

/// Lifecycle of an update session, as seen on the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    InProgress,
    Committed,
    Aborted,
}

/// Which process proposes the changes. The crawler has to respect
/// exclusions; curation sets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOrigin {
    Curation,
    Crawler,
}

/// A dropped or adjusted edit that needs curator attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQualityIssue {
    RelationshipConflict {
        mod_id: u64,
        target: u64,
        requested: RelationshipKind,
        existing: RelationshipKind,
    },
    SelfReference {
        mod_id: u64,
        kind: RelationshipKind,
    },
    GroupMembershipConflict {
        group: u64,
        member: u64,
        existing_group: u64,
    },
    NestedGroup {
        group: u64,
        member: u64,
    },
    ExcludedWrite {
        mod_id: u64,
        field: ExclusionField,
        attempted: String,
    },
    ExclusionEditByCrawler {
        mod_id: u64,
        field: ExclusionField,
    },
    InvalidUrl {
        mod_id: u64,
        url: String,
    },
    GroupIdAsMod {
        mod_id: u64,
    },
}

impl fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataQualityIssue::RelationshipConflict {
                mod_id,
                target,
                requested,
                existing,
            } => write!(
                f,
                "Mod {}: cannot add {} as {}, it is already a {}",
                mod_id, target, requested, existing
            ),
            DataQualityIssue::SelfReference { mod_id, kind } => {
                write!(f, "Mod {}: cannot be its own {}", mod_id, kind)
            }
            DataQualityIssue::GroupMembershipConflict {
                group,
                member,
                existing_group,
            } => write!(
                f,
                "Group {}: mod {} already belongs to group {}, member dropped",
                group, member, existing_group
            ),
            DataQualityIssue::NestedGroup { group, member } => write!(
                f,
                "Group {}: cannot contain group {}, member dropped",
                group, member
            ),
            DataQualityIssue::ExcludedWrite {
                mod_id,
                field,
                attempted,
            } => write!(
                f,
                "Mod {}: {} is excluded, ignoring automated value {:?}",
                mod_id, field, attempted
            ),
            DataQualityIssue::ExclusionEditByCrawler { mod_id, field } => write!(
                f,
                "Mod {}: crawler may not change the exclusion for {}",
                mod_id, field
            ),
            DataQualityIssue::InvalidUrl { mod_id, url } => {
                write!(f, "Mod {}: ignoring invalid URL {:?}", mod_id, url)
            }
            DataQualityIssue::GroupIdAsMod { mod_id } => write!(
                f,
                "Mod {}: ID lies in the group range and will shadow a group of that ID",
                mod_id
            ),
        }
    }
}

/// What a committed session changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub version: u32,
    pub added: Vec<u64>,
    pub updated: Vec<u64>,
    pub removed: Vec<u64>,
    pub issues: Vec<DataQualityIssue>,
}

fn flag(issues: &mut Vec<DataQualityIssue>, issue: DataQualityIssue) {
    warn!("{}", issue);
    issues.push(issue);
}

/// One batch of edits against a staged copy of a catalog.
///
/// The live catalog stays mutably borrowed for the session's lifetime, so no
/// reader sees it until [`UpdateSession::commit`] or
/// [`UpdateSession::abort`]. Dropping the session without committing
/// discards every staged edit.
pub struct UpdateSession<'a> {
    live: &'a mut Catalog,
    staged: Catalog,
    origin: UpdateOrigin,
    started_at: DateTime<Utc>,
    base_version: u32,
    removed: Vec<u64>,
    issues: Vec<DataQualityIssue>,
    finished: bool,
}

impl Catalog {
    pub fn begin_session(&mut self, origin: UpdateOrigin, now: DateTime<Utc>) -> UpdateSession<'_> {
        info!(
            "Starting {:?} update session on catalog version {}",
            origin, self.version
        );
        let mut staged = self.clone();
        for m in staged.mods.values_mut() {
            m.reset_session_flags();
        }
        staged.session_state = SessionState::InProgress;
        self.session_state = SessionState::InProgress;
        let base_version = self.version;
        UpdateSession {
            live: self,
            staged,
            origin,
            started_at: now,
            base_version,
            removed: Vec::new(),
            issues: Vec::new(),
            finished: false,
        }
    }
}

impl<'a> UpdateSession<'a> {
    pub fn origin(&self) -> UpdateOrigin {
        self.origin
    }

    pub fn state(&self) -> SessionState {
        self.staged.session_state
    }

    /// Version the session started from.
    pub fn base_version(&self) -> u32 {
        self.base_version
    }

    /// The catalog as it would look if committed now.
    pub fn staged(&self) -> &Catalog {
        &self.staged
    }

    pub fn get_mod(&self, id: u64) -> Option<&Mod> {
        self.staged.get_mod(id)
    }

    pub fn issues(&self) -> &[DataQualityIssue] {
        &self.issues
    }

    /// Creates the mod if needed and applies `update` to it.
    ///
    /// Scalar fields are applied in one go; relationship, DLC, status and
    /// exclusion edits one at a time. An edit that would break an invariant
    /// or touch an excluded fact is dropped and recorded as an issue, and the
    /// rest of the update still goes through.
    pub fn upsert_mod(&mut self, id: u64, update: &ModUpdate) -> &Mod {
        let relationships: Vec<(RelationshipEdit, Option<u64>)> = update
            .relationships
            .iter()
            .map(|edit| self.substitute_group(id, *edit))
            .collect();
        let crawler = self.origin == UpdateOrigin::Crawler;
        let mut scalars = update.clone();
        let mut changes: Vec<String> = Vec::new();

        if self.staged.settings.id_ranges.is_group(id) {
            flag(
                &mut self.issues,
                DataQualityIssue::GroupIdAsMod { mod_id: id },
            );
        }

        let is_new = !self.staged.mods.contains_key(&id);
        let entry = self.staged.mods.entry(id).or_insert_with(|| {
            info!("Adding mod {} to the catalog", id);
            Mod::new(id)
        });
        if is_new {
            changes.push("added to catalog".to_string());
        }

        for (field, which) in [
            (&mut scalars.author_url, "author"),
            (&mut scalars.source_url, "source"),
            (&mut scalars.archive_url, "archive"),
        ] {
            if let Field::Set(value) = field {
                if !value.is_empty() && url::Url::parse(value).is_err() {
                    debug!("Rejecting {} URL for mod {}", which, id);
                    flag(
                        &mut self.issues,
                        DataQualityIssue::InvalidUrl {
                            mod_id: id,
                            url: value.clone(),
                        },
                    );
                    *field = Field::Keep;
                }
            }
        }

        if crawler {
            for (field, exclusion) in [
                (&mut scalars.game_version, ExclusionField::GameVersion),
                (&mut scalars.source_url, ExclusionField::SourceUrl),
            ] {
                if let Field::Set(value) = field {
                    if entry.is_excluded(exclusion) {
                        flag(
                            &mut self.issues,
                            DataQualityIssue::ExcludedWrite {
                                mod_id: id,
                                field: exclusion,
                                attempted: value.clone(),
                            },
                        );
                        *field = Field::Keep;
                    }
                }
            }
        }

        if is_new {
            entry.apply_update(&scalars);
        } else {
            let before = entry.clone();
            entry.apply_update(&scalars);
            changes.extend(scalar_changes(&before, entry));
        }

        for (RelationshipEdit { kind, edit }, member) in relationships {
            let target = edit.item();
            if target == id {
                flag(
                    &mut self.issues,
                    DataQualityIssue::SelfReference { mod_id: id, kind },
                );
                continue;
            }
            let exclusion = ExclusionField::RequiredMod(target);
            if crawler && kind == RelationshipKind::RequiredMod && entry.is_excluded(exclusion) {
                flag(
                    &mut self.issues,
                    DataQualityIssue::ExcludedWrite {
                        mod_id: id,
                        field: exclusion,
                        attempted: format!("{:?}", edit),
                    },
                );
                continue;
            }
            match edit {
                ListEdit::Add(_) => {
                    if let Some(member) = member {
                        if entry.remove_relationship(RelationshipKind::RequiredMod, member) {
                            changes.push(format!(
                                "required mod {} replaced by group {}",
                                member, target
                            ));
                        }
                    }
                    if let Some(existing) = entry.relationship_of(target) {
                        if existing != kind {
                            flag(
                                &mut self.issues,
                                DataQualityIssue::RelationshipConflict {
                                    mod_id: id,
                                    target,
                                    requested: kind,
                                    existing,
                                },
                            );
                        }
                        continue;
                    }
                    if entry.add_relationship(kind, target) {
                        changes.push(format!("{} {} added", kind, target));
                    }
                }
                ListEdit::Remove(_) => {
                    if entry.remove_relationship(kind, target) {
                        changes.push(format!("{} {} removed", kind, target));
                    }
                }
            }
        }

        for edit in &update.required_dlcs {
            let dlc = edit.item();
            let exclusion = ExclusionField::RequiredDlc(dlc);
            if crawler && entry.is_excluded(exclusion) {
                flag(
                    &mut self.issues,
                    DataQualityIssue::ExcludedWrite {
                        mod_id: id,
                        field: exclusion,
                        attempted: format!("{:?}", edit),
                    },
                );
                continue;
            }
            let changed = match edit {
                ListEdit::Add(_) => entry.add_required_dlc(dlc),
                ListEdit::Remove(_) => entry.remove_required_dlc(dlc),
            };
            if changed {
                changes.push(describe("required DLC", edit));
            }
        }

        for edit in &update.statuses {
            let status = edit.item();
            if crawler
                && status == Status::NoDescription
                && entry.is_excluded(ExclusionField::NoDescription)
            {
                flag(
                    &mut self.issues,
                    DataQualityIssue::ExcludedWrite {
                        mod_id: id,
                        field: ExclusionField::NoDescription,
                        attempted: format!("{:?}", edit),
                    },
                );
                continue;
            }
            let changed = match edit {
                ListEdit::Add(_) => entry.add_status(status),
                ListEdit::Remove(_) => entry.remove_status(status),
            };
            if changed {
                changes.push(describe("status", edit));
            }
        }

        for edit in &update.exclusions {
            let field = edit.item();
            if crawler {
                flag(
                    &mut self.issues,
                    DataQualityIssue::ExclusionEditByCrawler { mod_id: id, field },
                );
                continue;
            }
            let changed = match edit {
                ListEdit::Add(_) => entry.add_exclusion(field),
                ListEdit::Remove(_) => entry.remove_exclusion(field),
            };
            if changed {
                changes.push(describe("exclusion for", edit));
            }
        }

        if !changes.is_empty() {
            entry.append_change_note(format!(
                "{}: {}",
                self.started_at.format("%Y-%m-%d"),
                changes.join(", ")
            ));
        }
        if let Some(note) = &update.change_note {
            if !note.is_empty() {
                entry.append_change_note(note.clone());
            }
        }
        entry
    }

    /// The crawler names concrete required mods; when one it adds belongs to
    /// a group, the group is required instead and the replaced member is
    /// returned alongside. Removals and curated edits are left as is.
    fn substitute_group(
        &self,
        mod_id: u64,
        edit: RelationshipEdit,
    ) -> (RelationshipEdit, Option<u64>) {
        if self.origin != UpdateOrigin::Crawler || edit.kind != RelationshipKind::RequiredMod {
            return (edit, None);
        }
        let ListEdit::Add(target) = edit.edit else {
            return (edit, None);
        };
        let excluded = self
            .staged
            .get_mod(mod_id)
            .is_some_and(|m| m.is_excluded(ExclusionField::RequiredMod(target)));
        if excluded {
            return (edit, None);
        }
        match self.staged.group_of(target) {
            Some(group) => {
                debug!(
                    "Mod {}: required mod {} replaced by {}",
                    mod_id, target, group
                );
                (
                    RelationshipEdit::add(RelationshipKind::RequiredMod, group.id()),
                    Some(target),
                )
            }
            None => (edit, None),
        }
    }

    /// Creates or replaces a group. Members that already belong to another
    /// group stay there and are left out of this one.
    pub fn upsert_group(&mut self, id: u64, name: impl Into<String>, members: Vec<u64>) -> &Group {
        let ranges = self.staged.settings.id_ranges;
        let mut kept = Vec::with_capacity(members.len());
        for member in members {
            if ranges.is_group(member) {
                flag(
                    &mut self.issues,
                    DataQualityIssue::NestedGroup { group: id, member },
                );
                continue;
            }
            let existing = self
                .staged
                .groups
                .values()
                .find(|g| g.id() != id && g.contains(member))
                .map(|g| g.id());
            match existing {
                Some(existing_group) => flag(
                    &mut self.issues,
                    DataQualityIssue::GroupMembershipConflict {
                        group: id,
                        member,
                        existing_group,
                    },
                ),
                None => kept.push(member),
            }
        }
        let group = Group::new(id, name, kept, &ranges);
        if self.staged.groups.contains_key(&id) {
            info!("Updating {}", group);
        } else {
            info!("Adding {}", group);
        }
        self.staged.groups.insert(id, group);
        &self.staged.groups[&id]
    }

    /// Removes a delisted mod, and takes it out of its group.
    pub fn remove_mod(&mut self, id: u64) -> bool {
        if self.staged.mods.remove(&id).is_none() {
            debug!("Mod {} not in catalog, nothing to remove", id);
            return false;
        }
        info!("Removing mod {} from the catalog", id);
        for group in self.staged.groups.values_mut() {
            if group.remove_member(id) {
                warn!("Removed mod {} from {}", id, group);
                group.warn_if_suspicious(&self.staged.settings.id_ranges);
            }
        }
        self.removed.push(id);
        true
    }

    pub fn remove_group(&mut self, id: u64) -> bool {
        let removed = self.staged.groups.remove(&id);
        if let Some(group) = &removed {
            info!("Removing {}", group);
        }
        removed.is_some()
    }

    /// Validates the staged catalog and swaps it in with the next version
    /// number. A group referencing a mod that does not exist aborts the
    /// whole session and leaves the live catalog as it was.
    pub fn commit(mut self, now: DateTime<Utc>) -> Result<CommitSummary> {
        self.finished = true;
        if let Err(e) = self.staged.check_group_members() {
            warn!("Aborting update session: {}", e);
            self.live.session_state = SessionState::Aborted;
            return Err(e);
        }

        let Some(version) = self.base_version.checked_add(1) else {
            let e = CatalogError::VersionOverflow(self.base_version);
            warn!("Aborting update session: {}", e);
            self.live.session_state = SessionState::Aborted;
            return Err(e);
        };

        let mut staged = std::mem::take(&mut self.staged);
        staged.version = version;
        staged.built_at = Some(now);
        staged.session_state = SessionState::Committed;

        let added: Vec<u64> = staged
            .mods()
            .filter(|m| m.added_this_session())
            .map(|m| m.id())
            .collect();
        let updated: Vec<u64> = staged
            .mods()
            .filter(|m| m.updated_this_session() && !m.added_this_session())
            .map(|m| m.id())
            .collect();
        info!(
            "Committed catalog version {}: {} added, {} updated, {} removed, {} issues",
            staged.version,
            added.len(),
            updated.len(),
            self.removed.len(),
            self.issues.len()
        );

        let summary = CommitSummary {
            version: staged.version,
            added,
            updated,
            removed: std::mem::take(&mut self.removed),
            issues: std::mem::take(&mut self.issues),
        };
        *self.live = staged;
        Ok(summary)
    }

    /// Discards every staged edit.
    pub fn abort(mut self) {
        self.finished = true;
        info!(
            "Update session aborted, catalog stays at version {}",
            self.base_version
        );
        self.live.session_state = SessionState::Aborted;
    }
}

impl Drop for UpdateSession<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("Update session dropped without commit, discarding staged edits");
            self.live.session_state = SessionState::Aborted;
        }
    }
}

/// Change note entries for the scalar facts that differ between `before`
/// and `after`.
fn scalar_changes(before: &Mod, after: &Mod) -> Vec<String> {
    let mut changes = Vec::new();
    if before.name() != after.name() {
        changes.push(format!("name changed to {:?}", after.name()));
    }
    if before.published() != after.published() {
        changes.push("published date changed".to_string());
    }
    if before.updated() != after.updated() {
        changes.push("update date changed".to_string());
    }
    if before.author_id() != after.author_id() {
        changes.push(format!("author ID changed to {}", after.author_id()));
    }
    if before.stability() != after.stability() {
        changes.push(format!("stability changed to {:?}", after.stability()));
    }
    if before.game_version_string() != after.game_version_string() {
        changes.push(format!(
            "game version changed to {}",
            after.game_version_string()
        ));
    }
    for (what, old, new) in [
        ("author URL", before.author_url(), after.author_url()),
        ("source URL", before.source_url(), after.source_url()),
        ("archive URL", before.archive_url(), after.archive_url()),
        ("stability note", before.stability_note(), after.stability_note()),
        ("note", before.note(), after.note()),
    ] {
        if old != new {
            changes.push(if new.is_empty() {
                format!("{} removed", what)
            } else {
                format!("{} changed", what)
            });
        }
    }
    changes
}

fn describe<T: fmt::Debug>(what: &str, edit: &ListEdit<T>) -> String {
    match edit {
        ListEdit::Add(item) => format!("{} {:?} added", what, item),
        ListEdit::Remove(item) => format!("{} {:?} removed", what, item),
    }
}
