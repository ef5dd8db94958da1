//! Runtime configuration.
//!
//! Read from `config.json` next to the persisted snapshot. Every field is
//! optional; missing fields fall back to the defaults below.

use crate::{
    domain::BoardConfig,
    error::{KanbanError, Result},
};
use serde::{Deserialize, Serialize};

/// Where the snapshot is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistConfig {
    /// Storage key of the snapshot
    pub key: String,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            key: "root".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanbanConfig {
    pub board: BoardConfig,
    pub persist: PersistConfig,
}

impl KanbanConfig {
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: KanbanConfig = serde_json::from_str(contents)
            .map_err(|e| KanbanError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.persist.key.trim().is_empty() {
            return Err(KanbanError::ConfigError(
                "persist.key must not be empty".to_string(),
            ));
        }
        if self
            .board
            .default_columns
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(KanbanError::ConfigError(
                "board.default_columns must not contain blank names".to_string(),
            ));
        }
        Ok(())
    }
}
