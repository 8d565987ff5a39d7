use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use modcompat::catalog::{
    Catalog, DataQualityIssue, IdRanges, ModUpdate, RelationshipEdit, RelationshipKind,
    SessionState, Stability, UpdateOrigin,
};
use modcompat::settings::CatalogSettings;
use modcompat::util::{init_catalog, open_catalog, save_catalog};
use modcompat::CatalogError;
use pretty_assertions::assert_eq;

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 30, 0).unwrap()
}

fn seeded() -> Catalog {
    let mut catalog = Catalog::default();
    let mut session = catalog.begin_session(UpdateOrigin::Curation, at(2024, 1, 10));
    session.upsert_mod(
        2_000_000,
        &ModUpdate::new()
            .name("Traffic Manager")
            .author_id(77)
            .published(at(2023, 6, 1))
            .stability(Stability::Stable)
            .game_version("1.17.1-f2"),
    );
    session.upsert_mod(3_000_000, &ModUpdate::new().name("Move It"));
    session.commit(at(2024, 1, 10)).unwrap();
    catalog
}

#[test]
fn empty_update_changes_no_fields() {
    let mut catalog = seeded();
    let before = catalog.get_mod(2_000_000).unwrap().clone();

    let mut session = catalog.begin_session(UpdateOrigin::Curation, at(2024, 2, 1));
    let after = session.upsert_mod(2_000_000, &ModUpdate::new()).clone();

    assert_eq!(after.name(), before.name());
    assert_eq!(after.author_id(), before.author_id());
    assert_eq!(after.published(), before.published());
    assert_eq!(after.updated(), before.updated());
    assert_eq!(after.stability(), before.stability());
    assert_eq!(after.game_version_string(), "1.17.1.2");
    assert!(after.updated_this_session());
}

#[test]
fn updated_never_precedes_published() {
    let mut catalog = seeded();
    let mut session = catalog.begin_session(UpdateOrigin::Crawler, at(2024, 2, 1));
    let m = session.upsert_mod(2_000_000, &ModUpdate::new().updated(at(2020, 1, 1)));
    assert_eq!(m.updated(), Some(at(2023, 6, 1)));

    let m = session.upsert_mod(2_000_000, &ModUpdate::new().updated(at(2024, 1, 20)));
    assert_eq!(m.updated(), Some(at(2024, 1, 20)));
}

#[test]
fn a_target_lives_in_one_relationship_list() {
    let mut catalog = seeded();
    let mut session = catalog.begin_session(UpdateOrigin::Curation, at(2024, 2, 1));
    session.upsert_mod(
        2_000_000,
        &ModUpdate::new().relationship(RelationshipEdit::add(RelationshipKind::Successor, 3_000_000)),
    );
    let m = session.upsert_mod(
        2_000_000,
        &ModUpdate::new()
            .relationship(RelationshipEdit::add(RelationshipKind::Alternative, 3_000_000)),
    );
    assert_eq!(m.relationships(RelationshipKind::Successor), [3_000_000]);
    assert!(m.relationships(RelationshipKind::Alternative).is_empty());
    assert_eq!(
        session.issues(),
        [DataQualityIssue::RelationshipConflict {
            mod_id: 2_000_000,
            target: 3_000_000,
            requested: RelationshipKind::Alternative,
            existing: RelationshipKind::Successor,
        }]
    );
}

#[test]
fn adding_twice_keeps_one_entry() {
    let mut catalog = seeded();
    let mut session = catalog.begin_session(UpdateOrigin::Curation, at(2024, 2, 1));
    let edit = ModUpdate::new()
        .relationship(RelationshipEdit::add(RelationshipKind::Recommendation, 3_000_000));
    session.upsert_mod(2_000_000, &edit);
    let m = session.upsert_mod(2_000_000, &edit);
    assert_eq!(m.relationships(RelationshipKind::Recommendation), [3_000_000]);
    assert!(session.issues().is_empty());
}

#[test]
fn a_mod_belongs_to_at_most_one_group() {
    let mut catalog = seeded();
    let mut session = catalog.begin_session(UpdateOrigin::Curation, at(2024, 2, 1));
    session.upsert_group(100_001, "Traffic", vec![2_000_000, 3_000_000]);
    let second = session.upsert_group(100_002, "Tools", vec![3_000_000]);
    assert!(second.members().is_empty());
    assert_eq!(
        session.issues(),
        [DataQualityIssue::GroupMembershipConflict {
            group: 100_002,
            member: 3_000_000,
            existing_group: 100_001,
        }]
    );
    let summary = session.commit(at(2024, 2, 1)).unwrap();
    assert_eq!(summary.version, 2);
    assert_eq!(catalog.group_of(3_000_000).map(|g| g.id()), Some(100_001));
}

#[test]
fn group_requirement_is_met_by_any_active_member() {
    let ranges = IdRanges {
        lowest_group: 1,
        highest_group: 9,
        ..IdRanges::default()
    };
    let mut catalog = Catalog::new(CatalogSettings::with_ranges(ranges));
    let mut session = catalog.begin_session(UpdateOrigin::Curation, at(2024, 3, 1));
    session.upsert_mod(10_000_001, &ModUpdate::new().name("Member A"));
    session.upsert_mod(10_000_002, &ModUpdate::new().name("Member B"));
    session.upsert_group(5, "A or B", vec![10_000_001, 10_000_002]);
    session.upsert_mod(
        10_000_003,
        &ModUpdate::new()
            .name("Needs the group")
            .relationship(RelationshipEdit::add(RelationshipKind::RequiredMod, 5)),
    );
    session.commit(at(2024, 3, 1)).unwrap();

    let only_b: HashSet<u64> = [10_000_002].into();
    assert!(catalog.resolve_requirement(10_000_003, 5, &only_b));
    assert!(catalog.unmet_requirements(10_000_003, &only_b).is_empty());

    let neither: HashSet<u64> = [10_000_003].into();
    assert!(!catalog.resolve_requirement(10_000_003, 5, &neither));
    assert_eq!(catalog.unmet_requirements(10_000_003, &neither), [5]);
}

#[test]
fn crawler_requirement_on_member_points_at_group() {
    let mut catalog = seeded();
    let mut session = catalog.begin_session(UpdateOrigin::Curation, at(2024, 2, 1));
    session.upsert_group(100_001, "Traffic", vec![2_000_000, 3_000_000]);
    session.commit(at(2024, 2, 1)).unwrap();

    let mut session = catalog.begin_session(UpdateOrigin::Crawler, at(2024, 2, 2));
    let m = session.upsert_mod(
        4_000_000,
        &ModUpdate::new().relationship(RelationshipEdit::add(RelationshipKind::RequiredMod, 3_000_000)),
    );
    assert_eq!(m.required_mods(), [100_001]);
}

#[test]
fn labels_carry_the_identity_tag() {
    let catalog = seeded();
    assert_eq!(
        catalog.label(2_000_000, None),
        "[Steam ID    2000000] Traffic Manager"
    );
    assert_eq!(catalog.label(500, None), "[local mod 500]");
}

#[test]
fn missing_group_member_aborts_the_session() {
    let mut catalog = seeded();
    let mut session = catalog.begin_session(UpdateOrigin::Curation, at(2024, 2, 1));
    session.upsert_mod(5_000_000, &ModUpdate::new().name("New"));
    session.upsert_group(100_001, "Ghosts", vec![2_000_000, 9_999_999]);
    let result = session.commit(at(2024, 2, 1));

    assert!(matches!(
        result,
        Err(CatalogError::MissingGroupMember {
            group: 100_001,
            member: 9_999_999
        })
    ));
    assert_eq!(catalog.version(), 1);
    assert_eq!(catalog.session_state(), SessionState::Aborted);
    assert!(catalog.get_mod(5_000_000).is_none());
    assert!(catalog.get_group(100_001).is_none());
}

#[test]
fn saved_catalog_reloads_without_session_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    init_catalog(&path, false, CatalogSettings::default()).unwrap();
    assert!(matches!(
        init_catalog(&path, false, CatalogSettings::default()),
        Err(CatalogError::AlreadyExists(_))
    ));

    let catalog = seeded();
    save_catalog(&path, &catalog).unwrap();
    let reloaded = open_catalog(&path).unwrap();

    assert_eq!(reloaded.version(), 1);
    assert_eq!(reloaded.built_at(), Some(at(2024, 1, 10)));
    assert_eq!(reloaded.session_state(), SessionState::Idle);
    let m = reloaded.get_mod(2_000_000).unwrap();
    assert_eq!(m.name(), "Traffic Manager");
    assert_eq!(m.stability(), Stability::Stable);
    assert!(!m.added_this_session());
    assert!(!m.updated_this_session());
    assert_eq!(m.change_notes(), ["2024-01-10: added to catalog"]);
}

#[test]
fn opening_a_missing_catalog_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        open_catalog(&dir.path().join("nope.json")),
        Err(CatalogError::NotFound(_))
    ));
}
