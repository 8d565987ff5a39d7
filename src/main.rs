mod commands;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use modcompat::catalog::UpdateOrigin;
use tracing::info;

/// Program to maintain a mod compatibility catalog
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Catalog file to use instead of the one in the user data directory
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Creates an empty catalog
    Initialize {
        /// Replace an existing catalog, if found
        #[arg(short, long)]
        force: bool,
    },
    /// Lists cataloged mods
    List {
        /// Show detailed information
        #[arg(short, long)]
        details: bool,

        /// Only show the given mod IDs
        #[arg(short, long, value_delimiter = ',')]
        ids: Option<Vec<u64>>,
    },
    /// Shows groups and their members
    Groups {
        /// Only show the given group IDs
        #[arg(short, long, value_delimiter = ',')]
        ids: Option<Vec<u64>>,
    },
    /// Applies a JSON update batch in one update session
    Apply {
        /// Batch file to apply
        batch: PathBuf,

        /// Who produced the batch; the crawler has to respect exclusions
        #[arg(short, long, value_enum, default_value_t = UpdateOrigin::Curation)]
        origin: UpdateOrigin,

        /// Run the session and report issues without saving
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
    /// Removes a delisted mod from the catalog
    Remove {
        /// Mod ID to remove
        #[arg(short, long)]
        mod_id: u64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Checks which requirements of a mod are not met by a set of active mods
    Check {
        /// Mod ID to check
        #[arg(short, long)]
        mod_id: u64,

        /// Active mod IDs
        #[arg(short, long, value_delimiter = ',')]
        active: Vec<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    info!("Starting modcompat version {}", env!("CARGO_PKG_VERSION"));
    let args = Args::parse();
    let catalog_path = match args.catalog {
        Some(path) => path,
        None => modcompat::util::get_catalog_path()?,
    };
    match args.command {
        Command::Initialize { force } => commands::initialize(&catalog_path, force),
        Command::List { details, ids } => commands::list(&catalog_path, details, ids),
        Command::Groups { ids } => commands::groups(&catalog_path, ids),
        Command::Apply {
            batch,
            origin,
            dry_run,
        } => commands::apply(&catalog_path, &batch, origin, dry_run),
        Command::Remove { mod_id, yes } => commands::remove(&catalog_path, mod_id, yes),
        Command::Check { mod_id, active } => {
            if active.is_empty() {
                eprintln!("At least one active mod ID is required");
                std::process::exit(1);
            }
            commands::check(&catalog_path, mod_id, active)
        }
    }
}
