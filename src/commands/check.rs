use std::collections::HashSet;

use colored::Colorize;
use modcompat::util::open_catalog;

pub fn check(catalog_path: &std::path::Path, mod_id: u64, active: Vec<u64>) -> crate::Result<()> {
    let catalog = open_catalog(catalog_path)?;
    let width = catalog.settings().text_report_width;
    if catalog.get_mod(mod_id).is_none() {
        eprintln!("No mod with mod ID {} found!", mod_id);
        return Err(Box::new(std::io::Error::from(std::io::ErrorKind::NotFound)));
    }

    let active: HashSet<u64> = active.into_iter().collect();
    let unmet = catalog.unmet_requirements(mod_id, &active);
    println!("{}", catalog.label(mod_id, Some(width)).bold());
    if unmet.is_empty() {
        println!("{}", "All requirements are met".green());
        return Ok(());
    }
    println!("{}", "Missing requirements:".red());
    for id in unmet {
        println!("  - {}", catalog.label(id, Some(width)));
    }
    Ok(())
}
