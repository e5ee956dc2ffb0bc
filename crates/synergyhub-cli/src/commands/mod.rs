pub mod committee;
pub mod config;
pub mod graph;
pub mod offers;
pub mod synergy;
pub mod timeline;

use std::path::{Path, PathBuf};

use synergyhub_core::fixtures::{load_snapshot, sample_synergies};
use synergyhub_core::{Config, Synergy};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Synergies from `--data`, then `data.synergies_path`, then the built-in sample.
pub fn load_synergies(
    data: Option<&Path>,
    config: &Config,
) -> Result<Vec<Synergy>, Box<dyn std::error::Error>> {
    let path = data
        .map(Path::to_path_buf)
        .or_else(|| config.data.synergies_path.as_ref().map(PathBuf::from));

    match path {
        Some(path) => Ok(load_snapshot(&path)?),
        None => {
            tracing::debug!("using built-in sample synergies");
            Ok(sample_synergies())
        }
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
