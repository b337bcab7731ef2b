//! Cache management CLI commands.

use std::path::PathBuf;

use clap::Subcommand;

use super::common::{format_size, write_json};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// List cached collections
    List,
    /// Print a cached collection as GeoJSON
    Show {
        /// Cache key (e.g. greenway_segments-null)
        key: String,
        /// Write GeoJSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove one cached collection
    Remove {
        /// Cache key
        key: String,
    },
    /// Remove every cached collection
    Clear,
    /// Print the cache directory
    Path,
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, runner: &CliRunner) -> Result<(), CliError> {
    let directory = &runner.config().cache.directory;
    if let CacheAction::Path = action {
        println!("{}", directory.display());
        return Ok(());
    }

    let cache = runner.open_cache()?;
    match action {
        CacheAction::List => {
            let mut keys = runner.block_on(cache.list())?;
            keys.sort();
            println!("Geometry cache: {}", directory.display());
            for key in &keys {
                println!("  {}", key);
            }
            println!(
                "{} entries, {}",
                cache.entry_count(),
                format_size(cache.size_bytes())
            );
        }
        CacheAction::Show { key, output } => {
            let collection = runner
                .block_on(cache.get(&key))?
                .ok_or_else(|| CliError::NotCached(key.clone()))?;
            write_json(&collection, output.as_deref(), true)?;
        }
        CacheAction::Remove { key } => {
            if !runner.block_on(cache.remove(&key))? {
                return Err(CliError::NotCached(key));
            }
            println!("Removed {}", key);
        }
        CacheAction::Clear => {
            let removed = runner.block_on(cache.clear())?;
            println!("Removed {} cached collections from {}", removed, directory.display());
        }
        CacheAction::Path => {}
    }
    Ok(())
}
