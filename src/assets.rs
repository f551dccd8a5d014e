//! Load data files from disk
//!
//! Thin wrappers over the pure parsers: read the file, then parse with the
//! file name as the error source.

use std::fs;
use std::path::Path;

use crate::catalog::{Catalog, StatTable};
use crate::core::config::AppConfig;
use crate::core::error::{MatchupError, Result};

/// Everything a session needs, loaded once at startup
#[derive(Debug, Clone)]
pub struct GameData {
    pub catalog: Catalog,
    pub stats: StatTable,
    pub corpus: String,
}

impl GameData {
    /// Load catalog, stats and corpus as configured
    ///
    /// The catalog and stat table are required; a missing corpus file only
    /// produces a warning and an empty corpus.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let catalog = load_catalog(&config.catalog_path)?;
        let stats = match &config.stats_path {
            Some(path) => load_stats(path)?,
            None => StatTable::builtin()?,
        };
        let corpus = match load_corpus(&config.corpus_path) {
            Ok(corpus) => corpus,
            Err(MatchupError::IoError(e)) => {
                tracing::warn!(
                    path = %config.corpus_path.display(),
                    error = %e,
                    "strategy corpus unavailable, prompts will carry no reference text"
                );
                String::new()
            }
            Err(e) => return Err(e),
        };
        Ok(Self {
            catalog,
            stats,
            corpus,
        })
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = read(path)?;
    Catalog::parse(&path.display().to_string(), &content)
}

pub fn load_stats(path: &Path) -> Result<StatTable> {
    let content = read(path)?;
    StatTable::parse(&path.display().to_string(), &content)
}

/// Read the strategy corpus. Content is never validated, only sanity-logged.
pub fn load_corpus(path: &Path) -> Result<String> {
    let corpus = read(path)?;
    tracing::info!(path = %path.display(), bytes = corpus.len(), "strategy corpus loaded");
    if !looks_like_guide(&corpus) {
        tracing::warn!(path = %path.display(), "corpus does not look like a strategy guide");
    }
    Ok(corpus)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "failed to read data file");
        MatchupError::IoError(e)
    })
}

fn looks_like_guide(corpus: &str) -> bool {
    corpus.contains("Mechabellum") || corpus.contains("Guide")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn data_path(file: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
    }

    #[test]
    fn test_load_bundled_files() {
        let catalog = load_catalog(&data_path("units.json")).unwrap();
        assert!(catalog.contains("Crawler"));
        let stats = load_stats(&data_path("unit_stats.json")).unwrap();
        assert!(stats.contains("Factory"));
        let corpus = load_corpus(&data_path("merged_strategies.txt")).unwrap();
        assert!(looks_like_guide(&corpus));
    }

    #[test]
    fn test_missing_catalog_is_io_error() {
        let result = load_catalog(Path::new("no/such/units.json"));
        assert!(matches!(result, Err(MatchupError::IoError(_))));
    }

    #[test]
    fn test_game_data_defaults_to_builtin_stats() {
        let config = AppConfig {
            catalog_path: data_path("units.json"),
            stats_path: None,
            corpus_path: data_path("missing_corpus.txt"),
            ..AppConfig::default()
        };
        let data = GameData::load(&config).unwrap();
        assert_eq!(data.stats.len(), 28);
        assert!(data.corpus.is_empty());
    }

    #[test]
    fn test_looks_like_guide() {
        assert!(looks_like_guide("The Mechabellum Guide"));
        assert!(!looks_like_guide("lorem ipsum"));
    }
}
