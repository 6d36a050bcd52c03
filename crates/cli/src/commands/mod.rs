//! CLI command implementations.

pub mod order;
pub mod product;
pub mod seed;
pub mod stats;

use std::path::PathBuf;

use breadbox_ledger::{RedbStore, Storefront};
use tracing::info;

/// Resolve the store file path and open the storefront over it.
///
/// Resolution order: `--store` flag, `BREADBOX_DB_PATH`, then
/// `~/.breadbox/store.redb` (the directory is created if needed).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or the store
/// file cannot be opened.
pub fn open_storefront(
    store: Option<PathBuf>,
) -> Result<Storefront, Box<dyn std::error::Error>> {
    let path = if let Some(path) = store {
        path
    } else if let Ok(env_path) = std::env::var("BREADBOX_DB_PATH") {
        PathBuf::from(env_path)
    } else {
        let home = dirs::home_dir().ok_or("cannot determine home directory")?;
        let breadbox_dir = home.join(".breadbox");
        std::fs::create_dir_all(&breadbox_dir)?;
        breadbox_dir.join("store.redb")
    };

    info!(path = %path.display(), "opening store");
    let store = RedbStore::open(path)?;
    Ok(Storefront::open(Box::new(store)))
}
