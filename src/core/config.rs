//! Game configuration with documented constants
//!
//! All tuning numbers are collected here with a note on how they affect
//! pacing. Values can be overridden from a partial TOML file; missing keys
//! keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{GameError, Result};

/// Configuration for a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === HAND ===
    /// Number of dice held in hand after each draw
    pub hand_size: usize,

    /// Throws allowed per round before the round is lost
    ///
    /// With the default goal curve, three throws of a full hand of
    /// standard dice average ~52 points, enough for the first few rounds.
    pub max_throws: u32,

    /// Discard actions allowed per round
    pub discards_per_round: u32,

    /// Maximum dice set aside by a single discard action
    pub max_discard_count: usize,

    // === INVENTORY ===
    /// Copies of the standard die created at game start
    pub starting_dice: usize,

    /// Maximum number of modifiers equipped at once
    pub modifier_capacity: usize,

    // === ECONOMY ===
    /// Currency available at game start
    pub starting_currency: u32,

    /// Flat currency reward for winning a round
    pub round_reward: u32,

    /// Extra currency per throw left unused when the goal is reached
    pub unused_throw_bonus: u32,

    /// Percentage of the purchase price refunded when selling a modifier
    pub sell_refund_percent: u32,

    // === PROGRESSION ===
    /// Score goal of round 1
    pub base_goal: u32,

    /// Goal growth per round, in percent (compounding, floored)
    ///
    /// At 50%, goals run 20, 30, 45, 67, 100, ...
    pub goal_growth_percent: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_size: 5,
            max_throws: 3,
            discards_per_round: 2,
            max_discard_count: 3,

            starting_dice: 8,
            modifier_capacity: 5,

            starting_currency: 10,
            round_reward: 5,
            unused_throw_bonus: 1,
            sell_refund_percent: 50,

            base_goal: 20,
            goal_growth_percent: 50,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML override
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML override from disk
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.hand_size == 0 {
            return Err(GameError::Config("hand_size must be at least 1".into()));
        }
        if self.max_throws == 0 {
            return Err(GameError::Config("max_throws must be at least 1".into()));
        }
        if self.max_discard_count > self.hand_size {
            return Err(GameError::Config(format!(
                "max_discard_count ({}) should be <= hand_size ({})",
                self.max_discard_count, self.hand_size
            )));
        }
        if self.modifier_capacity == 0 {
            return Err(GameError::Config(
                "modifier_capacity must be at least 1".into(),
            ));
        }
        if self.starting_dice < self.hand_size {
            return Err(GameError::Config(format!(
                "starting_dice ({}) should be >= hand_size ({})",
                self.starting_dice, self.hand_size
            )));
        }
        if self.sell_refund_percent > 100 {
            return Err(GameError::Config(
                "sell_refund_percent cannot exceed 100".into(),
            ));
        }
        Ok(())
    }

    /// Score goal for a 1-based round number
    pub fn goal_for_round(&self, round_number: u32) -> u32 {
        let mut goal = self.base_goal as u64;
        for _ in 1..round_number {
            goal = goal * (100 + self.goal_growth_percent as u64) / 100;
        }
        goal.min(u32::MAX as u64) as u32
    }
}
