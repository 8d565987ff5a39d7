use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exclusion::ExclusionField;
use super::types::{Dlc, RelationshipKind, Stability, Status};

/// One field of a partial update: either leave the stored value alone or
/// replace it. Empty strings and zero are valid values, not "absent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field<T> {
    Keep,
    Set(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Keep
    }
}

impl<T> Field<T> {
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Field::Keep => None,
            Field::Set(value) => Some(value),
        }
    }

    pub(crate) fn apply_to(&self, target: &mut T)
    where
        T: Clone,
    {
        if let Field::Set(value) = self {
            *target = value.clone();
        }
    }
}

/// `None` (an unknown or garbled value) leaves the field untouched.
impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Set(value),
            None => Field::Keep,
        }
    }
}

/// Add or remove a single item from one of a mod's lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListEdit<T> {
    Add(T),
    Remove(T),
}

impl<T: Copy> ListEdit<T> {
    pub fn item(&self) -> T {
        match self {
            ListEdit::Add(item) | ListEdit::Remove(item) => *item,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdit {
    pub kind: RelationshipKind,
    pub edit: ListEdit<u64>,
}

impl RelationshipEdit {
    pub fn add(kind: RelationshipKind, target: u64) -> Self {
        RelationshipEdit {
            kind,
            edit: ListEdit::Add(target),
        }
    }

    pub fn remove(kind: RelationshipKind, target: u64) -> Self {
        RelationshipEdit {
            kind,
            edit: ListEdit::Remove(target),
        }
    }
}

/// Proposed changes for one mod. Scalar fields go through
/// [`crate::catalog::Mod::apply_update`]; the edit lists are applied one by
/// one by the update session so a single bad edit never sinks the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModUpdate {
    pub name: Field<String>,
    pub published: Field<DateTime<Utc>>,
    pub updated: Field<DateTime<Utc>>,
    pub author_id: Field<u64>,
    pub author_url: Field<String>,
    pub source_url: Field<String>,
    pub archive_url: Field<String>,
    pub stability: Field<Stability>,
    pub stability_note: Field<String>,
    pub note: Field<String>,
    pub game_version: Field<String>,
    pub review_date: Field<DateTime<Utc>>,
    pub auto_review_date: Field<DateTime<Utc>>,
    pub relationships: Vec<RelationshipEdit>,
    pub required_dlcs: Vec<ListEdit<Dlc>>,
    pub statuses: Vec<ListEdit<Status>>,
    pub exclusions: Vec<ListEdit<ExclusionField>>,
    pub change_note: Option<String>,
}

impl ModUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Field::Set(name.into());
        self
    }

    pub fn published(mut self, published: DateTime<Utc>) -> Self {
        self.published = Field::Set(published);
        self
    }

    pub fn updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = Field::Set(updated);
        self
    }

    pub fn author_id(mut self, author_id: u64) -> Self {
        self.author_id = Field::Set(author_id);
        self
    }

    pub fn author_url(mut self, author_url: impl Into<String>) -> Self {
        self.author_url = Field::Set(author_url.into());
        self
    }

    pub fn source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Field::Set(source_url.into());
        self
    }

    pub fn stability(mut self, stability: Stability) -> Self {
        self.stability = Field::Set(stability);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Field::Set(note.into());
        self
    }

    pub fn game_version(mut self, version: impl Into<String>) -> Self {
        self.game_version = Field::Set(version.into());
        self
    }

    pub fn relationship(mut self, edit: RelationshipEdit) -> Self {
        self.relationships.push(edit);
        self
    }

    pub fn required_dlc(mut self, edit: ListEdit<Dlc>) -> Self {
        self.required_dlcs.push(edit);
        self
    }

    pub fn status(mut self, edit: ListEdit<Status>) -> Self {
        self.statuses.push(edit);
        self
    }

    pub fn exclusion(mut self, edit: ListEdit<ExclusionField>) -> Self {
        self.exclusions.push(edit);
        self
    }

    pub fn change_note(mut self, note: impl Into<String>) -> Self {
        self.change_note = Some(note.into());
        self
    }
}

/// Proposed group definition; replaces the group's name and members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUpdate {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub members: Vec<u64>,
}
