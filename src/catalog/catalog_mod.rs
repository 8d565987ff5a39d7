use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exclusion::{insert_unique, remove_item, ExclusionField, Exclusions};
use super::identity::IdRanges;
use super::types::{Dlc, RelationshipKind, ReportSeverity, Stability, Status};
use super::update::ModUpdate;
use super::version::GameVersion;

const DISABLED_PREFIX: &str = "[Disabled]";
const ELLIPSIS: &str = "...";

/// Local install state of a subscribed mod. Only the reporter uses this and it
/// is never written to the catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscription {
    pub disabled: bool,
    pub camera_script: bool,
    pub path: Option<PathBuf>,
    pub downloaded: Option<DateTime<Utc>>,
}

/// One catalog entry. State is only reachable through the methods below;
/// the update session is the only caller that mutates a live record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mod {
    id: u64,
    name: String,
    published: Option<DateTime<Utc>>,
    updated: Option<DateTime<Utc>>,
    author_id: u64,
    author_url: String,
    source_url: String,
    archive_url: String,
    stability: Stability,
    stability_note: String,
    note: String,
    game_version: String,
    required_dlcs: Vec<Dlc>,
    statuses: Vec<Status>,
    required_mods: Vec<u64>,
    successors: Vec<u64>,
    alternatives: Vec<u64>,
    recommendations: Vec<u64>,
    exclusions: Exclusions,
    review_date: Option<DateTime<Utc>>,
    auto_review_date: Option<DateTime<Utc>>,
    change_notes: Vec<String>,

    #[serde(skip)]
    added_this_session: bool,
    #[serde(skip)]
    updated_this_session: bool,
    #[serde(skip)]
    subscription: Option<Subscription>,
    #[serde(skip)]
    report_severity: ReportSeverity,
}

/// Blank record that deserialization fills in.
impl Default for Mod {
    fn default() -> Self {
        Mod {
            id: 0,
            name: String::new(),
            published: None,
            updated: None,
            author_id: 0,
            author_url: String::new(),
            source_url: String::new(),
            archive_url: String::new(),
            stability: Stability::NotReviewed,
            stability_note: String::new(),
            note: String::new(),
            game_version: GameVersion::UNKNOWN.to_string(),
            required_dlcs: Vec::new(),
            statuses: Vec::new(),
            required_mods: Vec::new(),
            successors: Vec::new(),
            alternatives: Vec::new(),
            recommendations: Vec::new(),
            exclusions: Exclusions::default(),
            review_date: None,
            auto_review_date: None,
            change_notes: Vec::new(),
            added_this_session: false,
            updated_this_session: false,
            subscription: None,
            report_severity: ReportSeverity::default(),
        }
    }
}

impl Mod {
    pub fn new(id: u64) -> Self {
        Mod {
            id,
            added_this_session: true,
            ..Default::default()
        }
    }

    /// Applies every `Set` field of `update`, leaving `Keep` fields alone.
    ///
    /// Only scalar fields are handled here; list edits in `update` are the
    /// session's business. The updated date never ends up before the
    /// published date, and unparseable game versions are stored as
    /// `0.0.0.0`. The mod counts as updated this session even when nothing
    /// changed.
    pub fn apply_update(&mut self, update: &ModUpdate) {
        update.name.apply_to(&mut self.name);

        if let Some(published) = update.published.as_set() {
            self.published = Some(*published);
        }
        if let Some(updated) = update.updated.as_set() {
            self.updated = Some(*updated);
        }
        self.clamp_updated();

        update.author_id.apply_to(&mut self.author_id);
        update.author_url.apply_to(&mut self.author_url);
        update.source_url.apply_to(&mut self.source_url);
        update.archive_url.apply_to(&mut self.archive_url);
        update.stability.apply_to(&mut self.stability);
        update.stability_note.apply_to(&mut self.stability_note);
        update.note.apply_to(&mut self.note);

        if let Some(version) = update.game_version.as_set() {
            self.game_version = GameVersion::parse(version).to_string();
        }

        if let Some(date) = update.review_date.as_set() {
            self.review_date = Some(*date);
        }
        if let Some(date) = update.auto_review_date.as_set() {
            self.auto_review_date = Some(*date);
        }

        self.updated_this_session = true;
    }

    fn clamp_updated(&mut self) {
        if let Some(published) = self.published {
            if self.updated.map_or(true, |updated| updated < published) {
                self.updated = Some(published);
            }
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    pub fn author_id(&self) -> u64 {
        self.author_id
    }

    pub fn author_url(&self) -> &str {
        &self.author_url
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn archive_url(&self) -> &str {
        &self.archive_url
    }

    pub fn stability(&self) -> Stability {
        self.stability
    }

    pub fn stability_note(&self) -> &str {
        &self.stability_note
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Normalized dotted game version string.
    pub fn game_version_string(&self) -> &str {
        &self.game_version
    }

    pub fn game_version(&self) -> GameVersion {
        GameVersion::parse(&self.game_version)
    }

    pub fn required_dlcs(&self) -> &[Dlc] {
        &self.required_dlcs
    }

    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    pub fn review_date(&self) -> Option<DateTime<Utc>> {
        self.review_date
    }

    pub fn auto_review_date(&self) -> Option<DateTime<Utc>> {
        self.auto_review_date
    }

    pub fn change_notes(&self) -> &[String] {
        &self.change_notes
    }

    pub fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    pub fn added_this_session(&self) -> bool {
        self.added_this_session
    }

    pub fn updated_this_session(&self) -> bool {
        self.updated_this_session
    }

    pub(crate) fn reset_session_flags(&mut self) {
        self.added_this_session = false;
        self.updated_this_session = false;
    }

    pub fn relationships(&self, kind: RelationshipKind) -> &[u64] {
        match kind {
            RelationshipKind::RequiredMod => &self.required_mods,
            RelationshipKind::Successor => &self.successors,
            RelationshipKind::Alternative => &self.alternatives,
            RelationshipKind::Recommendation => &self.recommendations,
        }
    }

    fn relationships_mut(&mut self, kind: RelationshipKind) -> &mut Vec<u64> {
        match kind {
            RelationshipKind::RequiredMod => &mut self.required_mods,
            RelationshipKind::Successor => &mut self.successors,
            RelationshipKind::Alternative => &mut self.alternatives,
            RelationshipKind::Recommendation => &mut self.recommendations,
        }
    }

    pub fn required_mods(&self) -> &[u64] {
        &self.required_mods
    }

    /// The first relationship list holding `target`, if any.
    pub fn relationship_of(&self, target: u64) -> Option<RelationshipKind> {
        RelationshipKind::ALL
            .into_iter()
            .find(|kind| self.relationships(*kind).contains(&target))
    }

    /// Returns true if `target` was not in the list yet. Does not look at the
    /// other three lists.
    pub fn add_relationship(&mut self, kind: RelationshipKind, target: u64) -> bool {
        insert_unique(self.relationships_mut(kind), target)
    }

    pub fn remove_relationship(&mut self, kind: RelationshipKind, target: u64) -> bool {
        remove_item(self.relationships_mut(kind), &target)
    }

    pub fn add_required_dlc(&mut self, dlc: Dlc) -> bool {
        insert_unique(&mut self.required_dlcs, dlc)
    }

    pub fn remove_required_dlc(&mut self, dlc: Dlc) -> bool {
        remove_item(&mut self.required_dlcs, &dlc)
    }

    pub fn add_status(&mut self, status: Status) -> bool {
        insert_unique(&mut self.statuses, status)
    }

    pub fn remove_status(&mut self, status: Status) -> bool {
        remove_item(&mut self.statuses, &status)
    }

    pub fn is_excluded(&self, field: ExclusionField) -> bool {
        self.exclusions.is_excluded(field)
    }

    pub fn set_exclusion(&mut self, field: ExclusionField, excluded: bool) {
        if excluded {
            self.exclusions.exclude(field);
        } else {
            self.exclusions.unexclude(field);
        }
    }

    pub fn add_exclusion(&mut self, field: ExclusionField) -> bool {
        self.exclusions.exclude(field)
    }

    pub fn remove_exclusion(&mut self, field: ExclusionField) -> bool {
        self.exclusions.unexclude(field)
    }

    pub fn append_change_note(&mut self, note: impl Into<String>) {
        self.change_notes.push(note.into());
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    pub fn update_subscription(&mut self, subscription: Subscription) {
        self.subscription = Some(subscription);
    }

    pub fn is_disabled(&self) -> bool {
        self.subscription.as_ref().is_some_and(|s| s.disabled)
    }

    pub fn report_severity(&self) -> ReportSeverity {
        self.report_severity
    }

    /// Severity only ever goes up.
    pub fn raise_severity(&mut self, severity: ReportSeverity) {
        self.report_severity = self.report_severity.max(severity);
    }

    /// Display label: optional disabled prefix, identity tag and name.
    ///
    /// With a `width` budget the name is cut (never the tag) so the visible
    /// label fits, ending in `...` when shortened. Rich text wraps the prefix
    /// and tag word in span markup; markup does not count towards the width.
    pub fn render_label(
        &self,
        ranges: &IdRanges,
        hide_id: bool,
        name_first: bool,
        width: Option<usize>,
        rich_text: bool,
    ) -> String {
        let tag = ranges.tag_parts(self.id, hide_id);
        let (prefix, prefix_len) = if self.is_disabled() {
            let visible = format!("{} ", DISABLED_PREFIX);
            let len = visible.chars().count();
            if rich_text {
                (
                    format!("<span class=\"disabled\">{}</span> ", DISABLED_PREFIX),
                    len,
                )
            } else {
                (visible, len)
            }
        } else {
            (String::new(), 0)
        };

        let name = match width {
            Some(width) => {
                let budget = width.saturating_sub(tag.visible_len() + 1 + prefix_len);
                truncate_name(&self.name, budget)
            }
            None => self.name.clone(),
        };
        let tag = if rich_text { tag.rich() } else { tag.plain() };

        if name_first {
            format!("{}{} {}", prefix, name, tag)
        } else {
            format!("{}{} {}", prefix, tag, name)
        }
    }
}

fn truncate_name(name: &str, budget: usize) -> String {
    if name.chars().count() <= budget {
        return name.to_string();
    }
    if budget < ELLIPSIS.len() {
        return ELLIPSIS[..budget].to_string();
    }
    let mut cut: String = name.chars().take(budget - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}
