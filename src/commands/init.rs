use modcompat::settings::CatalogSettings;
use modcompat::util::init_catalog;
use tracing::info;

pub fn initialize(catalog_path: &std::path::Path, force: bool) -> crate::Result<()> {
    let catalog = init_catalog(catalog_path, force, CatalogSettings::default())?;
    info!(
        "Created catalog version {} at {}",
        catalog.version(),
        catalog_path.display()
    );
    println!("Catalog created at {}", catalog_path.display());
    Ok(())
}
