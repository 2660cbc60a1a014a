//! Solver configuration.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! JSON file, then command-line flags. Missing JSON fields keep their
//! defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::movegen::MoveGenerator;
use crate::search::SearchLimits;
use crate::validator::BoardValidator;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub num_piles: usize,
    pub deck_size: usize,
    /// Cards flipped per draw advance.
    pub draw_advance: usize,
    /// Also generate moves that cannot lead anywhere new.
    pub return_redundant_moves: bool,
    pub threads: usize,
    pub max_nodes: Option<u64>,
    pub max_depth: Option<usize>,
    pub max_solutions: Option<usize>,
    /// Check every generated board against the board invariants.
    pub validate_boards: bool,
    /// Seconds between progress lines; 0 disables them.
    pub progress_interval_secs: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            num_piles: 7,
            deck_size: 52,
            draw_advance: 3,
            return_redundant_moves: false,
            threads: 8,
            max_nodes: None,
            max_depth: None,
            max_solutions: None,
            validate_boards: false,
            progress_interval_secs: 3,
        }
    }
}

impl SolverConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: SolverConfig = serde_json::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.draw_advance == 0 {
            return Err(ConfigError::Invalid("draw_advance must be at least 1"));
        }
        if self.threads == 0 {
            return Err(ConfigError::Invalid("threads must be at least 1"));
        }
        if self.num_piles == 0 {
            return Err(ConfigError::Invalid("num_piles must be at least 1"));
        }
        Ok(())
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_nodes: self.max_nodes,
            max_depth: self.max_depth,
            max_solutions: self.max_solutions,
        }
    }

    pub fn generator(&self) -> MoveGenerator {
        MoveGenerator::new(self.draw_advance, self.return_redundant_moves)
    }

    pub fn validator(&self) -> Option<BoardValidator> {
        self.validate_boards
            .then(|| BoardValidator::new(self.num_piles, self.deck_size))
    }

    pub fn progress_interval(&self) -> Option<Duration> {
        (self.progress_interval_secs > 0).then(|| Duration::from_secs(self.progress_interval_secs))
    }
}
