use chrono::Utc;
use colored::Colorize;
use modcompat::batch::UpdateBatch;
use modcompat::catalog::{DataQualityIssue, UpdateOrigin};
use modcompat::util::{open_catalog, save_catalog};
use tracing::info;

fn print_issues(issues: &[DataQualityIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("{}", format!("{} data quality issues:", issues.len()).yellow());
    for issue in issues {
        println!("  - {}", issue);
    }
}

pub fn apply(
    catalog_path: &std::path::Path,
    batch_path: &std::path::Path,
    origin: UpdateOrigin,
    dry_run: bool,
) -> crate::Result<()> {
    let mut catalog = open_catalog(catalog_path)?;
    let batch: UpdateBatch = serde_json::from_str(&std::fs::read_to_string(batch_path)?)?;
    if batch.is_empty() {
        println!("Nothing to apply in {}", batch_path.display());
        return Ok(());
    }
    info!("Applying {} as {:?}", batch_path.display(), origin);

    let mut session = catalog.begin_session(origin, Utc::now());
    batch.apply(&mut session);

    if dry_run {
        let issues = session.issues().to_vec();
        let staged_mods = session.staged().mod_count();
        session.abort();
        println!(
            "Dry run: catalog would hold {} mods, nothing saved",
            staged_mods
        );
        print_issues(&issues);
        return Ok(());
    }

    let summary = match session.commit(Utc::now()) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{} {}", "Session aborted:".red(), e);
            return Err(e.into());
        }
    };
    save_catalog(catalog_path, &catalog)?;

    println!(
        "Catalog version {}: {} added, {} updated, {} removed",
        summary.version.to_string().bold(),
        summary.added.len().to_string().green(),
        summary.updated.len(),
        summary.removed.len().to_string().red()
    );
    print_issues(&summary.issues);
    Ok(())
}
