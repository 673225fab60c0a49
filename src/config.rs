//! Engine configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file yields the
//! standard meta-board rules and the default store retry budget.
//!
//! ```toml
//! [rules]
//! cells = 81
//! first_cells = [0, 1, 2]   # optional, defaults to every cell
//!
//! [store]
//! max_retries = 25
//! ```

use crate::grid::{MoveRules, Occupancy};
use crate::store::InMemoryStore;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Move-shape rules.
    #[serde(default)]
    rules: RulesConfig,

    /// Record store tuning.
    #[serde(default)]
    store: StoreConfig,
}

/// Per-seat legal-move universes, expressed as cell indices.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Number of addressable cells.
    #[serde(default = "default_cells")]
    cells: u32,

    /// Cells player 1 may claim. Defaults to every cell.
    #[serde(default)]
    first_cells: Option<Vec<u32>>,

    /// Cells player 2 may claim. Defaults to every cell.
    #[serde(default)]
    second_cells: Option<Vec<u32>>,
}

/// Record store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Write conflicts tolerated before a transaction is aborted.
    #[serde(default = "default_max_retries")]
    max_retries: u32,
}

#[instrument]
fn default_cells() -> u32 {
    crate::grid::META_CELLS
}

#[instrument]
fn default_max_retries() -> u32 {
    crate::store::DEFAULT_MAX_RETRIES
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            cells: default_cells(),
            first_cells: None,
            second_cells: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
        }
    }
}

impl StoreConfig {
    /// Creates a store configuration with the given retry budget.
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(
            cells = config.rules.cells,
            max_retries = config.store.max_retries,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Builds the move rules described by `[rules]`.
    pub fn move_rules(&self) -> Result<MoveRules, ConfigError> {
        self.rules.to_move_rules()
    }

    /// Builds an empty in-memory store described by `[store]`.
    pub fn in_memory_store(&self) -> InMemoryStore {
        InMemoryStore::from_config(&self.store)
    }
}

impl RulesConfig {
    /// Converts the cell lists into per-seat bitmasks.
    #[instrument(skip(self), fields(cells = self.cells))]
    pub fn to_move_rules(&self) -> Result<MoveRules, ConfigError> {
        if self.cells == 0 || self.cells > u128::BITS {
            return Err(ConfigError::new(format!(
                "Cell count {} outside 1..={}",
                self.cells,
                u128::BITS
            )));
        }
        let board = Occupancy::first_cells(self.cells);
        let first = self.universe(self.first_cells.as_deref(), board)?;
        let second = self.universe(self.second_cells.as_deref(), board)?;
        debug!(%first, %second, "Move rules built");
        Ok(MoveRules::new(first, second))
    }

    fn universe(&self, cells: Option<&[u32]>, board: Occupancy) -> Result<Occupancy, ConfigError> {
        let Some(cells) = cells else {
            return Ok(board);
        };
        cells.iter().try_fold(Occupancy::EMPTY, |mask, &index| {
            if index >= self.cells {
                return Err(ConfigError::new(format!(
                    "Cell {} outside board of {} cells",
                    index, self.cells
                )));
            }
            Occupancy::cell(index)
                .map(|cell| mask | cell)
                .ok_or_else(|| ConfigError::new(format!("Cell {} not addressable", index)))
        })
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new config error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
