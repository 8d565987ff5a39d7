use colored::Colorize;
use itertools::Itertools;
use modcompat::catalog::{Catalog, Mod, RelationshipKind};
use modcompat::util::open_catalog;
use modcompat::workshop::workshop_url;

use super::util::{print_title, print_tree, stability_colored, TreeLine};

fn date_or_unknown(date: Option<chrono::DateTime<chrono::Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn detail_lines(catalog: &Catalog, catalog_mod: &Mod) -> Vec<TreeLine> {
    let mut lines = vec![
        TreeLine::Field("Author:", catalog_mod.author_id().to_string()),
        TreeLine::Field("Published:", date_or_unknown(catalog_mod.published())),
        TreeLine::Field("Updated:", date_or_unknown(catalog_mod.updated())),
        TreeLine::Field("Game version:", catalog_mod.game_version_string().to_string()),
    ];
    let optional_text = [
        ("Author URL:", catalog_mod.author_url()),
        ("Stability note:", catalog_mod.stability_note()),
        ("Note:", catalog_mod.note()),
        ("Source:", catalog_mod.source_url()),
        ("Archive:", catalog_mod.archive_url()),
    ];
    for (label, value) in optional_text {
        if !value.is_empty() {
            lines.push(TreeLine::Field(label, value.to_string()));
        }
    }
    let workshop = workshop_url(catalog_mod.id(), catalog.ranges());
    if !workshop.is_empty() {
        lines.push(TreeLine::Field("Workshop:", workshop));
    }
    if !catalog_mod.statuses().is_empty() {
        lines.push(TreeLine::Field(
            "Statuses:",
            catalog_mod.statuses().iter().map(|s| format!("{:?}", s)).join(", "),
        ));
    }
    if !catalog_mod.required_dlcs().is_empty() {
        lines.push(TreeLine::Field(
            "Required DLC:",
            catalog_mod.required_dlcs().iter().map(|d| format!("{:?}", d)).join(", "),
        ));
    }
    for (label, kind) in [
        ("Required mods:", RelationshipKind::RequiredMod),
        ("Successors:", RelationshipKind::Successor),
        ("Alternatives:", RelationshipKind::Alternative),
        ("Recommendations:", RelationshipKind::Recommendation),
    ] {
        let related = catalog_mod.relationships(kind);
        if !related.is_empty() {
            lines.push(TreeLine::List(
                label,
                related.iter().map(|id| catalog.label(*id, None)).collect(),
            ));
        }
    }
    let exclusions = catalog_mod.exclusions().active();
    if !exclusions.is_empty() {
        lines.push(TreeLine::Field(
            "Exclusions:",
            exclusions.iter().map(|e| e.to_string()).join(", "),
        ));
    }
    lines.push(TreeLine::Field(
        "Reviewed:",
        date_or_unknown(catalog_mod.review_date()),
    ));
    lines.push(TreeLine::Field(
        "Auto reviewed:",
        date_or_unknown(catalog_mod.auto_review_date()),
    ));
    if !catalog_mod.change_notes().is_empty() {
        lines.push(TreeLine::List(
            "Change notes:",
            catalog_mod.change_notes().to_vec(),
        ));
    }
    lines
}

pub fn list(
    catalog_path: &std::path::Path,
    details: bool,
    ids: Option<Vec<u64>>,
) -> crate::Result<()> {
    let catalog = open_catalog(catalog_path)?;
    let width = catalog.settings().text_report_width;

    let mods: Vec<&Mod> = match ids {
        Some(ids) => ids
            .iter()
            .filter_map(|id| {
                let found = catalog.get_mod(*id);
                if found.is_none() {
                    eprintln!("No mod with mod ID {} found!", id);
                }
                found
            })
            .collect(),
        None => catalog.mods().collect(),
    };

    println!(
        "Catalog version {} ({} mods)",
        catalog.version().to_string().bold(),
        catalog.mod_count()
    );
    for catalog_mod in mods {
        if details {
            let title = catalog_mod.render_label(catalog.ranges(), false, false, None, false);
            print_title(&title, title.bold());
            let mut lines = vec![TreeLine::Field(
                "Stability:",
                stability_colored(catalog_mod.stability()).to_string(),
            )];
            lines.extend(detail_lines(&catalog, catalog_mod));
            print_tree(&lines);
        } else {
            println!(
                "- {} ({})",
                catalog_mod
                    .render_label(catalog.ranges(), false, false, Some(width), false)
                    .bold(),
                stability_colored(catalog_mod.stability())
            );
        }
    }
    Ok(())
}
