//! Applies enhancements to owned dice
//!
//! Validation covers the whole selection before any die changes: the die
//! count must fit the enhancement, ids must be distinct, and every die must
//! be sitting in inventory.

use serde::Serialize;

use crate::core::error::{GameError, Result};
use crate::core::types::DieId;
use crate::dice::face::FACE_COUNT;
use crate::dice::pool::DicePool;
use crate::enhancements::catalog::EnhancementDefinition;

/// What an application changed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancementOutcome {
    pub enhancement: String,
    pub transformed: Vec<DieId>,
    pub duplicates: Vec<DieId>,
}

#[derive(Debug, Default)]
pub struct EnhancementEngine {
    history: Vec<EnhancementOutcome>,
}

impl EnhancementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every application so far, oldest first
    pub fn history(&self) -> &[EnhancementOutcome] {
        &self.history
    }

    /// Check a selection without changing anything
    pub fn validate(
        &self,
        definition: &EnhancementDefinition,
        pool: &DicePool,
        selected: &[DieId],
    ) -> Result<()> {
        let requirement = definition.kind.requirement();
        if !requirement.accepts(selected.len()) {
            return Err(GameError::InvalidSelection(format!(
                "{} needs {} dice, {} selected",
                definition.name,
                requirement,
                selected.len()
            )));
        }
        for (i, id) in selected.iter().enumerate() {
            if selected[..i].contains(id) {
                return Err(GameError::InvalidSelection(format!(
                    "die {:?} selected twice",
                    id
                )));
            }
            if !pool.inventory().iter().any(|d| d.id == *id) {
                return Err(GameError::UnknownDie(*id));
            }
        }
        Ok(())
    }

    /// Rewrite the selected dice, adding duplicates to inventory if the rule asks
    pub fn apply(
        &mut self,
        definition: &EnhancementDefinition,
        pool: &mut DicePool,
        selected: &[DieId],
    ) -> Result<EnhancementOutcome> {
        self.validate(definition, pool, selected)?;

        let mut current: Vec<[u32; FACE_COUNT]> = Vec::with_capacity(selected.len());
        for id in selected {
            let die = pool.find(*id).ok_or(GameError::UnknownDie(*id))?;
            current.push(die.faces.values());
        }

        let prepared = definition.kind.prepare(&current);
        let mut duplicates = Vec::new();

        for (id, faces) in selected.iter().zip(&current) {
            let new_values = prepared.apply_to_die(faces);
            let die = pool
                .find_inventory_mut(*id)
                .ok_or(GameError::UnknownDie(*id))?;
            die.faces.set_values(&new_values);

            tracing::debug!(
                "{} rewrote die {:?}: {:?} -> {:?}",
                definition.name,
                id,
                faces,
                die.faces.values()
            );

            if definition.kind.creates_duplicate() {
                let copy = die.duplicate();
                duplicates.push(copy.id);
                pool.add_to_inventory(copy);
            }
        }

        let outcome = EnhancementOutcome {
            enhancement: definition.id.clone(),
            transformed: selected.to_vec(),
            duplicates,
        };
        tracing::info!(
            "Applied {} to {} dice ({} duplicates)",
            definition.name,
            outcome.transformed.len(),
            outcome.duplicates.len()
        );
        self.history.push(outcome.clone());
        Ok(outcome)
    }
}
