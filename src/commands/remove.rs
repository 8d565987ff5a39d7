use chrono::Utc;
use inquire::Confirm;
use modcompat::catalog::UpdateOrigin;
use modcompat::util::{open_catalog, save_catalog};

pub fn remove(catalog_path: &std::path::Path, mod_id: u64, yes: bool) -> crate::Result<()> {
    let mut catalog = open_catalog(catalog_path)?;
    let label = match catalog.get_mod(mod_id) {
        Some(m) => m.render_label(catalog.ranges(), false, false, None, false),
        None => {
            eprintln!("No mod with mod ID {} found!", mod_id);
            return Err(Box::new(std::io::Error::from(std::io::ErrorKind::NotFound)));
        }
    };

    if !yes {
        let confirmed = Confirm::new(&format!("Remove {} from the catalog?", label))
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("Nothing removed");
            return Ok(());
        }
    }

    let mut session = catalog.begin_session(UpdateOrigin::Curation, Utc::now());
    session.remove_mod(mod_id);
    let summary = session.commit(Utc::now())?;
    save_catalog(catalog_path, &catalog)?;
    println!("Removed {}, catalog is now version {}", label, summary.version);
    Ok(())
}
