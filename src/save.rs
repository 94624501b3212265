//! Save/load: full game state serialization to JSON and MessagePack, with
//! save-file metadata and validation. Grounded on the teacher's
//! `save.rs::SaveFile` shape; the reference JSON layout follows spec §6.3.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::state::State;

pub const SAVE_FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub metadata: SaveMetadata,
    pub state: State,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub name: String,
    pub timestamp: u64,
    pub summary: String,
    pub played_cards: usize,
}

impl SaveFile {
    pub fn from_state(state: &State, name: String, timestamp: u64) -> Self {
        let summary = format!("Card {:?} - Winter {}", state.current_card, state.winter_count);
        SaveFile {
            version: SAVE_FORMAT_VERSION,
            metadata: SaveMetadata { name, timestamp, summary, played_cards: state.played_cards.len() },
            state: state.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let save: SaveFile = serde_json::from_str(json).map_err(|e| EngineError::Deserialization(e.to_string()))?;
        save.validate()?;
        Ok(save)
    }

    pub fn to_msgpack(&self) -> Result<Vec<u8>, EngineError> {
        rmp_serde::to_vec(self).map_err(|e| EngineError::Serialization(e.to_string()))
    }

    pub fn from_msgpack(data: &[u8]) -> Result<Self, EngineError> {
        let save: SaveFile = rmp_serde::from_slice(data).map_err(|e| EngineError::Deserialization(e.to_string()))?;
        save.validate()?;
        Ok(save)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.version == 0 || self.version > SAVE_FORMAT_VERSION {
            return Err(EngineError::Deserialization(format!(
                "unsupported save format version: {} (supported: 1-{})",
                self.version, SAVE_FORMAT_VERSION
            )));
        }
        let errors = self.state.validate();
        if !errors.is_empty() {
            return Err(EngineError::Deserialization(format!("invalid save: {}", errors.join("; "))));
        }
        Ok(())
    }

    pub fn peek_metadata_json(json: &str) -> Result<SaveMetadata, EngineError> {
        #[derive(Deserialize)]
        struct SaveHeader {
            #[allow(dead_code)]
            version: u32,
            metadata: SaveMetadata,
        }
        let header: SaveHeader = serde_json::from_str(json).map_err(|e| EngineError::Deserialization(e.to_string()))?;
        Ok(header.metadata)
    }
}

/// Convenience: serialize just the state (no save-file wrapper), the
/// shape documented informatively in spec §6.3.
pub fn state_to_json(state: &State) -> Result<String, EngineError> {
    serde_json::to_string_pretty(state).map_err(|e| EngineError::Serialization(e.to_string()))
}

pub fn state_from_json(json: &str) -> Result<State, EngineError> {
    serde_json::from_str(json).map_err(|e| EngineError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Scenario;

    #[test]
    fn save_file_json_roundtrip() {
        let state = crate::setup::new_game(Scenario::PaxGallica, 7).unwrap();
        let save = SaveFile::from_state(&state, "test save".into(), 1_700_000_000);

        let json = save.to_json().unwrap();
        assert!(json.contains("test save"));
        assert!(json.contains("version"));

        let loaded = SaveFile::from_json(&json).unwrap();
        assert_eq!(loaded.state, state);
    }

    #[test]
    fn msgpack_roundtrip() {
        let state = crate::setup::new_game(Scenario::PaxGallica, 7).unwrap();
        let save = SaveFile::from_state(&state, "pack".into(), 1);
        let bytes = save.to_msgpack().unwrap();
        let loaded = SaveFile::from_msgpack(&bytes).unwrap();
        assert_eq!(loaded.state, state);
    }
}
