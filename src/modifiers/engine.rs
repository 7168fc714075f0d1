//! Active modifier set and the two scoring passes
//!
//! Both passes are left folds over the equipped list in equip order. Each
//! modifier sees the previous modifier's output as `current_score` and the
//! untouched pass input as `original_value`. Modifiers of the other timing
//! class are skipped.
//!
//! Passes borrow the engine immutably, so the set cannot change while a
//! pass is running.

use crate::core::error::{GameError, Result};
use crate::modifiers::catalog::ModifierDefinition;
use crate::modifiers::context::{RoundSummary, ScoreContext, ThrowInfo, Timing};

/// Currency paid by one round-end hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundEndAward {
    pub modifier_id: String,
    pub amount: u32,
}

#[derive(Debug, Clone)]
pub struct ModifierEngine {
    active: Vec<ModifierDefinition>,
    capacity: usize,
    /// Ids subscribed to round-end notifications, in subscription order
    round_end_subscribers: Vec<String>,
}

impl ModifierEngine {
    pub fn new(capacity: usize) -> Self {
        Self {
            active: Vec::new(),
            capacity,
            round_end_subscribers: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn active(&self) -> &[ModifierDefinition] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_at_capacity(&self) -> bool {
        self.active.len() >= self.capacity
    }

    pub fn is_equipped(&self, id: &str) -> bool {
        self.active.iter().any(|m| m.id == id)
    }

    pub fn round_end_subscriber_count(&self) -> usize {
        self.round_end_subscribers.len()
    }

    /// Check an equip without changing anything
    pub fn can_equip(&self, definition: &ModifierDefinition) -> Result<()> {
        if self.is_equipped(&definition.id) {
            return Err(GameError::AlreadyEquipped(definition.id.clone()));
        }
        if self.is_at_capacity() {
            return Err(GameError::AtCapacity(self.capacity));
        }
        Ok(())
    }

    /// Append a modifier to the end of the set and activate its hooks
    pub fn equip(&mut self, definition: ModifierDefinition) -> Result<()> {
        self.can_equip(&definition)?;
        self.activate(&definition);
        tracing::info!("Equipped modifier {} ({:?})", definition.name, definition.timing());
        self.active.push(definition);
        Ok(())
    }

    /// Remove a modifier and deactivate its hooks, returning its definition
    pub fn unequip(&mut self, id: &str) -> Result<ModifierDefinition> {
        let pos = self
            .active
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| GameError::NotEquipped(id.to_string()))?;
        let definition = self.active.remove(pos);
        self.deactivate(&definition);
        tracing::info!("Unequipped modifier {}", definition.name);
        Ok(definition)
    }

    /// Unequip everything
    pub fn clear(&mut self) {
        for definition in std::mem::take(&mut self.active) {
            self.deactivate(&definition);
        }
    }

    fn activate(&mut self, definition: &ModifierDefinition) {
        if definition.rule.has_round_end_hook()
            && !self.round_end_subscribers.contains(&definition.id)
        {
            self.round_end_subscribers.push(definition.id.clone());
        }
    }

    fn deactivate(&mut self, definition: &ModifierDefinition) {
        if let Some(pos) = self
            .round_end_subscribers
            .iter()
            .position(|id| *id == definition.id)
        {
            self.round_end_subscribers.remove(pos);
        }
    }

    /// Score one settled die
    ///
    /// `values` holds the scoring values settled so far in this throw,
    /// this die included.
    pub fn apply_per_die(
        &self,
        die_value: u32,
        die_index: usize,
        values: &[u32],
        info: ThrowInfo,
    ) -> u32 {
        self.fold(Timing::PerDie, die_value, Some(die_index), values, info)
    }

    /// Score the summed throw once every die has settled
    pub fn apply_after_throw(&self, total: u32, values: &[u32], info: ThrowInfo) -> u32 {
        self.fold(Timing::AfterThrow, total, None, values, info)
    }

    fn fold(
        &self,
        timing: Timing,
        input: u32,
        die_index: Option<usize>,
        values: &[u32],
        info: ThrowInfo,
    ) -> u32 {
        self.active
            .iter()
            .filter(|m| m.timing() == timing)
            .fold(input, |current_score, m| {
                let ctx = ScoreContext {
                    current_score,
                    original_value: input,
                    die_index,
                    values,
                    info,
                };
                m.rule.apply(&ctx)
            })
    }

    /// Notify round-end subscribers, collecting currency awards
    pub fn on_round_ended(&self, summary: &RoundSummary) -> Vec<RoundEndAward> {
        self.round_end_subscribers
            .iter()
            .filter_map(|id| self.active.iter().find(|m| m.id == *id))
            .filter_map(|m| {
                m.rule.round_end_award(summary).map(|amount| RoundEndAward {
                    modifier_id: m.id.clone(),
                    amount,
                })
            })
            .collect()
    }
}
