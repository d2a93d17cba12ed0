//! Serialized session snapshot.
//!
//! The JSON shape is the save/restore wire format:
//!
//! ```json
//! {
//!   "grid": { "size": 4, "cells": [[null, { "position": { "x": 0, "y": 1 }, "value": 2 }, ...], ...] },
//!   "score": 0,
//!   "over": false,
//!   "won": false,
//!   "keepPlaying": false
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::core::SessionError;
use crate::grid::GridSnapshot;

/// Everything needed to resume a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub grid: GridSnapshot,
    pub score: u64,
    pub over: bool,
    pub won: bool,
    pub keep_playing: bool,
}

impl SessionSnapshot {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as a compact binary checkpoint.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SessionError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a binary checkpoint.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SessionError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
