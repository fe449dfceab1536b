use crate::grid::MAX_GRID_SIZE;
use crate::world::GameState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const SAVE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("failed to read or write save file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode or decode save file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("invalid save state: {0}")]
    Invalid(String),
}

/// A saved game: the full state plus enough to regenerate on restart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub version: u32,
    /// Seed of the RNG in use when saved, if known
    pub seed: Option<u64>,
    pub state: GameState,
}

impl SaveState {
    pub fn new(state: &GameState, seed: Option<u64>) -> Self {
        SaveState {
            version: SAVE_VERSION,
            seed,
            state: state.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let save: SaveState = serde_json::from_str(json)?;
        save.validate()?;
        Ok(save)
    }

    /// Save to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Structural checks a hand-edited file could break
    pub fn validate(&self) -> Result<(), SaveError> {
        if self.version != SAVE_VERSION {
            return Err(SaveError::Version {
                found: self.version,
                expected: SAVE_VERSION,
            });
        }

        let state = &self.state;
        let size = state.grid_size;
        if size <= 0 || size > MAX_GRID_SIZE || state.grid.size != size {
            return Err(SaveError::Invalid(format!(
                "grid size {} (declared {}) must match and lie in 1..={}",
                state.grid.size, size, MAX_GRID_SIZE
            )));
        }
        let expected = (size as usize).checked_mul(size as usize);
        if expected != Some(state.grid.cells.len()) {
            return Err(SaveError::Invalid(format!(
                "expected {}x{} cells, found {}",
                size,
                size,
                state.grid.cells.len()
            )));
        }
        if !state.in_bounds(state.agent_position) {
            return Err(SaveError::Invalid(format!(
                "agent position {} is outside the grid",
                state.agent_position
            )));
        }
        if state.grid.count(|c| c.has_wumpus) > 1 {
            return Err(SaveError::Invalid("more than one wumpus".to_string()));
        }
        if state.grid.count(|c| c.has_gold) > 1 {
            return Err(SaveError::Invalid("more than one gold".to_string()));
        }
        Ok(())
    }
}
