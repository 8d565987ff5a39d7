use colored::Colorize;
use modcompat::catalog::Group;
use modcompat::util::open_catalog;

use super::util::{print_title, print_tree, TreeLine};

pub fn groups(catalog_path: &std::path::Path, ids: Option<Vec<u64>>) -> crate::Result<()> {
    let catalog = open_catalog(catalog_path)?;

    let groups: Vec<&Group> = match ids {
        Some(ids) => ids
            .iter()
            .filter_map(|id| {
                let found = catalog.get_group(*id);
                if found.is_none() {
                    eprintln!("Group not found: {}", id);
                }
                found
            })
            .collect(),
        None => catalog.groups().collect(),
    };
    if groups.is_empty() {
        println!("No groups found.");
        return Ok(());
    }

    let width = catalog.settings().text_report_width;
    for group in groups {
        let title = group.to_string();
        print_title(&title, title.bold());
        let members = group
            .members()
            .iter()
            .map(|id| {
                let label = if catalog.get_mod(*id).is_some() {
                    catalog.label(*id, Some(width)).normal()
                } else {
                    format!("{} (not in catalog)", catalog.label(*id, None)).red()
                };
                label.to_string()
            })
            .collect();
        print_tree(&[TreeLine::List("Members:", members)]);
    }
    Ok(())
}
