//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DieId(pub Uuid);

impl DieId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DieId {
    fn default() -> Self {
        Self::new()
    }
}

/// What a face pays out when it lands on top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SideType {
    /// Value counts toward the throw score
    #[default]
    Score,
    /// Value is paid out as currency and never scored
    Money,
}

/// 1-based round counter
pub type RoundNumber = u32;

/// 1-based throw counter within a round
pub type ThrowNumber = u32;
