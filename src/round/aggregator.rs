//! Dice resolution - fan-in of out-of-order settle signals
//!
//! A throw registers every launched die up front. Settle signals may arrive
//! in any order; each is scored immediately through the per-die pass. Once
//! the barrier has seen every registered die, the after-throw pass runs on
//! the complete value set and the throw is finalized exactly once.
//!
//! A die that never reports stalls the throw. Hosts that lose a die must
//! `unregister_die` it so the expected count matches the live dice.

use ahash::AHashSet;
use serde::Serialize;

use crate::core::error::{GameError, Result};
use crate::core::types::{DieId, RoundNumber, SideType, ThrowNumber};
use crate::modifiers::context::ThrowInfo;
use crate::modifiers::engine::ModifierEngine;
use crate::physics::DieSettled;
use crate::round::events::{EventLog, RoundEvent};

/// Join point keyed by an expected arrival count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettleBarrier {
    expected: usize,
    arrived: usize,
}

impl SettleBarrier {
    pub fn new(expected: usize) -> Self {
        Self { expected, arrived: 0 }
    }

    pub fn register(&mut self) {
        self.expected += 1;
    }

    pub fn unregister(&mut self) {
        self.expected = self.expected.saturating_sub(1);
    }

    /// Record one arrival, returns true once the barrier is complete
    pub fn arrive(&mut self) -> bool {
        self.arrived += 1;
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.arrived >= self.expected
    }

    pub fn remaining(&self) -> usize {
        self.expected.saturating_sub(self.arrived)
    }
}

/// Final numbers for one throw
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThrowResult {
    pub throw_number: ThrowNumber,
    /// Sum of per-die scores before the after-throw pass
    pub raw_total: u32,
    pub score: u32,
    /// Scoring values in settle order
    pub values: Vec<u32>,
    /// Money settled during the throw; the owner credits it per settle
    pub currency: u32,
}

/// Per-throw transient state
#[derive(Debug, Clone)]
struct ThrowContext {
    info: ThrowInfo,
    /// Launch order; a die's position is its index in the throw
    slots: Vec<DieId>,
    pending: AHashSet<DieId>,
    barrier: SettleBarrier,
    running_total: u32,
    settled_values: Vec<u32>,
    currency: u32,
}

#[derive(Debug, Default)]
pub struct DiceResolutionAggregator {
    current: Option<ThrowContext>,
}

impl DiceResolutionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> bool {
        self.current.is_some()
    }

    /// Dice still expected to report
    pub fn remaining(&self) -> usize {
        self.current.as_ref().map_or(0, |t| t.barrier.remaining())
    }

    /// Scoring values settled so far in the current throw
    pub fn settled_values(&self) -> &[u32] {
        self.current
            .as_ref()
            .map(|t| t.settled_values.as_slice())
            .unwrap_or(&[])
    }

    /// Reset per-throw state and register the launched dice
    ///
    /// A throw with no dice finalizes immediately with a score of zero.
    pub fn begin_throw(
        &mut self,
        throw_number: ThrowNumber,
        round_number: RoundNumber,
        dice: &[DieId],
        events: &mut EventLog,
    ) -> Option<ThrowResult> {
        let info = ThrowInfo {
            throw_number,
            round_number,
            total_dice: dice.len(),
        };
        tracing::debug!("Throw {} begins with {} dice", throw_number, dice.len());

        if dice.is_empty() {
            self.current = None;
            let result = ThrowResult {
                throw_number,
                raw_total: 0,
                score: 0,
                values: Vec::new(),
                currency: 0,
            };
            events.push(RoundEvent::ThrowFinalized {
                throw_number,
                raw_total: 0,
                score: 0,
            });
            return Some(result);
        }

        self.current = Some(ThrowContext {
            info,
            slots: dice.to_vec(),
            pending: dice.iter().copied().collect(),
            barrier: SettleBarrier::new(dice.len()),
            running_total: 0,
            settled_values: Vec::with_capacity(dice.len()),
            currency: 0,
        });
        None
    }

    /// Add a die to the throw in flight, e.g. one spawned late
    pub fn register_die(&mut self, die: DieId) -> Result<()> {
        let throw = self.current.as_mut().ok_or(GameError::NoThrowInFlight)?;
        if throw.slots.contains(&die) {
            return Err(GameError::InvalidSelection(format!(
                "die {:?} already registered",
                die
            )));
        }
        throw.slots.push(die);
        throw.pending.insert(die);
        throw.barrier.register();
        throw.info.total_dice += 1;
        Ok(())
    }

    /// Stop waiting for a die that will never report
    pub fn unregister_die(
        &mut self,
        die: DieId,
        modifiers: &ModifierEngine,
        events: &mut EventLog,
    ) -> Result<Option<ThrowResult>> {
        let throw = self.current.as_mut().ok_or(GameError::NoThrowInFlight)?;
        if !throw.pending.remove(&die) {
            return Err(GameError::UnexpectedSettle(die));
        }
        throw.barrier.unregister();
        tracing::warn!("Die {:?} unregistered before settling", die);

        if throw.barrier.is_complete() {
            return Ok(self.finalize(modifiers, events));
        }
        Ok(None)
    }

    /// Consume one settle signal
    ///
    /// Money sides go to currency and are left out of the score and the
    /// value list. Score sides run the per-die pass against the values
    /// settled so far.
    pub fn on_die_settled(
        &mut self,
        signal: DieSettled,
        modifiers: &ModifierEngine,
        events: &mut EventLog,
    ) -> Result<Option<ThrowResult>> {
        let throw = self
            .current
            .as_mut()
            .ok_or(GameError::UnexpectedSettle(signal.die))?;
        if !throw.pending.remove(&signal.die) {
            return Err(GameError::UnexpectedSettle(signal.die));
        }
        let die_index = throw
            .slots
            .iter()
            .position(|d| *d == signal.die)
            .unwrap_or(throw.slots.len());

        match signal.side {
            SideType::Money => {
                throw.currency = throw.currency.saturating_add(signal.raw_value);
                events.push(RoundEvent::CurrencyEarned {
                    die: signal.die,
                    amount: signal.raw_value,
                });
                tracing::debug!("Die {} paid {} currency", die_index, signal.raw_value);
            }
            SideType::Score => {
                throw.settled_values.push(signal.raw_value);
                let score = modifiers.apply_per_die(
                    signal.raw_value,
                    die_index,
                    &throw.settled_values,
                    throw.info,
                );
                throw.running_total = throw.running_total.saturating_add(score);
                events.push(RoundEvent::DieScored {
                    die: signal.die,
                    die_index,
                    raw_value: signal.raw_value,
                    score,
                });
                tracing::debug!(
                    "Die {} settled on {} for {} (running {})",
                    die_index,
                    signal.raw_value,
                    score,
                    throw.running_total
                );
            }
        }

        if throw.barrier.arrive() {
            return Ok(self.finalize(modifiers, events));
        }
        Ok(None)
    }

    fn finalize(&mut self, modifiers: &ModifierEngine, events: &mut EventLog) -> Option<ThrowResult> {
        let throw = self.current.take()?;
        let score =
            modifiers.apply_after_throw(throw.running_total, &throw.settled_values, throw.info);

        events.push(RoundEvent::ThrowFinalized {
            throw_number: throw.info.throw_number,
            raw_total: throw.running_total,
            score,
        });
        tracing::info!(
            "Throw {} finalized: {} -> {}",
            throw.info.throw_number,
            throw.running_total,
            score
        );

        Some(ThrowResult {
            throw_number: throw.info.throw_number,
            raw_total: throw.running_total,
            score,
            values: throw.settled_values,
            currency: throw.currency,
        })
    }
}
