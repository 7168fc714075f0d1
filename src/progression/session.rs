//! Game session - wallet, inventory, shop and the round sequence
//!
//! The session is the only owner of mutable game state. Engines are built
//! here and handed to the round machine by reference on each call.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{DieId, RoundNumber, SideType};
use crate::dice::die::InventoryDie;
use crate::dice::face::DieTemplate;
use crate::dice::pool::DicePool;
use crate::enhancements::catalog::EnhancementDefinition;
use crate::enhancements::engine::{EnhancementEngine, EnhancementOutcome};
use crate::modifiers::catalog::ModifierDefinition;
use crate::modifiers::context::RoundSummary;
use crate::modifiers::engine::ModifierEngine;
use crate::physics::{DieSettled, PhysicsSubstrate, SimulatedTable};
use crate::round::aggregator::ThrowResult;
use crate::round::events::{EventLog, RoundEvent};
use crate::round::state_machine::{
    DiscardResult, RoundPhase, RoundReport, RoundRules, RoundStateMachine, RoundStep,
};

#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    rng: ChaCha8Rng,
    currency: u32,
    pool: DicePool,
    modifiers: ModifierEngine,
    enhancements: EnhancementEngine,
    round_number: RoundNumber,
    round: Option<RoundStateMachine>,
    /// Round that was lost, if any
    lost_round: Option<RoundNumber>,
    events: EventLog,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let pool = starting_pool(&config);
        let modifiers = ModifierEngine::new(config.modifier_capacity);
        tracing::info!(
            "New game: {} dice, {} currency, seed {}",
            config.starting_dice,
            config.starting_currency,
            seed
        );

        Ok(Self {
            currency: config.starting_currency,
            rng: ChaCha8Rng::seed_from_u64(seed),
            pool,
            modifiers,
            enhancements: EnhancementEngine::new(),
            round_number: 1,
            round: None,
            lost_round: None,
            events: EventLog::new(),
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn currency(&self) -> u32 {
        self.currency
    }

    pub fn pool(&self) -> &DicePool {
        &self.pool
    }

    pub fn modifiers(&self) -> &ModifierEngine {
        &self.modifiers
    }

    pub fn enhancements(&self) -> &EnhancementEngine {
        &self.enhancements
    }

    /// Round currently being played, or the next one to start
    pub fn round_number(&self) -> RoundNumber {
        self.round_number
    }

    pub fn round(&self) -> Option<&RoundStateMachine> {
        self.round.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.lost_round.is_some()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        self.events.drain()
    }

    pub fn current_goal(&self) -> u32 {
        self.config.goal_for_round(self.round_number)
    }

    /// True while a round is open (not yet ended)
    pub fn round_in_progress(&self) -> bool {
        self.round.as_ref().is_some_and(|r| !r.is_ended())
    }

    fn ensure_playing(&self) -> Result<()> {
        match self.lost_round {
            Some(round) => Err(GameError::GameOver(round)),
            None => Ok(()),
        }
    }

    /// Shop and inventory changes are refused while dice are in the air
    fn ensure_between_throws(&self) -> Result<()> {
        self.ensure_playing()?;
        match self.round.as_ref().map(|r| r.phase()) {
            Some(RoundPhase::Throwing) => Err(GameError::WrongPhase {
                expected: "HandSetup",
                actual: "Throwing",
            }),
            _ => Ok(()),
        }
    }

    // === ROUND FLOW ===

    pub fn start_round(&mut self) -> Result<()> {
        self.ensure_playing()?;
        if let Some(round) = &self.round {
            if !round.is_ended() {
                return Err(GameError::WrongPhase {
                    expected: "Ended",
                    actual: round.phase().name(),
                });
            }
        }

        let goal = self.current_goal();
        let rules = RoundRules::from(&self.config);
        self.round = Some(RoundStateMachine::start(
            self.round_number,
            goal,
            rules,
            &mut self.pool,
            &mut self.rng,
            &mut self.events,
        ));
        Ok(())
    }

    pub fn discard(&mut self, indices: &[usize]) -> Result<DiscardResult> {
        let round = self.round.as_mut().ok_or(GameError::NoActiveRound)?;
        round.discard(indices, &mut self.pool, &mut self.rng, &mut self.events)
    }

    pub fn confirm_throw(
        &mut self,
        indices: &[usize],
        table: &mut dyn PhysicsSubstrate,
    ) -> Result<Option<ThrowResult>> {
        let round = self.round.as_mut().ok_or(GameError::NoActiveRound)?;
        round.confirm_throw(indices, &mut self.pool, table, &mut self.events)
    }

    /// Feed one settle signal; a Money side pays into the wallet right away
    pub fn on_die_settled(&mut self, signal: DieSettled) -> Result<Option<ThrowResult>> {
        let round = self.round.as_mut().ok_or(GameError::NoActiveRound)?;
        let finalized = round.on_die_settled(signal, &self.modifiers, &mut self.events)?;
        if signal.side == SideType::Money {
            self.currency = self.currency.saturating_add(signal.raw_value);
        }
        Ok(finalized)
    }

    pub fn unregister_die(&mut self, die: DieId) -> Result<Option<ThrowResult>> {
        let round = self.round.as_mut().ok_or(GameError::NoActiveRound)?;
        round.unregister_die(die, &self.modifiers, &mut self.events)
    }

    /// Accept the scoring result; settles rewards when the round ends
    pub fn acknowledge(&mut self) -> Result<RoundStep> {
        let round = self.round.as_mut().ok_or(GameError::NoActiveRound)?;
        let step = round.acknowledge(&mut self.pool, &mut self.rng, &mut self.events)?;
        if let RoundStep::Ended(report) = step {
            self.finish_round(report);
        }
        Ok(step)
    }

    fn finish_round(&mut self, report: RoundReport) {
        if !report.won {
            tracing::info!("Game over in round {}", report.round_number);
            self.lost_round = Some(report.round_number);
            return;
        }

        self.award("round_reward", self.config.round_reward);
        self.award(
            "unused_throws",
            report
                .throws_remaining
                .saturating_mul(self.config.unused_throw_bonus),
        );

        let summary = RoundSummary {
            round_number: report.round_number,
            score: report.score,
            goal: report.goal,
            won: report.won,
        };
        for award in self.modifiers.on_round_ended(&summary) {
            self.award(&award.modifier_id, award.amount);
        }

        self.round_number += 1;
    }

    fn award(&mut self, source: &str, amount: u32) {
        if amount == 0 {
            return;
        }
        self.currency = self.currency.saturating_add(amount);
        self.events.push(RoundEvent::CurrencyAwarded {
            source: source.to_string(),
            amount,
        });
        tracing::debug!("+{} currency from {}", amount, source);
    }

    /// Throw and deliver every settle signal from a simulated table
    pub fn play_throw<R: Rng>(
        &mut self,
        indices: &[usize],
        table: &mut SimulatedTable<R>,
    ) -> Result<ThrowResult> {
        if let Some(result) = self.confirm_throw(indices, table)? {
            return Ok(result);
        }
        self.settle_from_table(table)
    }

    /// Deliver queued settle signals until the throw in flight finalizes
    pub fn settle_from_table<R: Rng>(&mut self, table: &mut SimulatedTable<R>) -> Result<ThrowResult> {
        while let Some(signal) = table.next_settled() {
            if let Some(result) = self.on_die_settled(signal)? {
                return Ok(result);
            }
        }
        // Table ran dry with dice still registered
        let remaining = self.round.as_ref().map_or(0, |r| r.dice_in_flight());
        tracing::warn!("Throw stalled, {} dice never settled", remaining);
        Err(GameError::ThrowStalled { remaining })
    }

    // === SHOP ===

    pub fn buy_modifier(&mut self, definition: &ModifierDefinition) -> Result<()> {
        self.ensure_between_throws()?;
        self.modifiers.can_equip(definition)?;
        self.pay(definition.cost)?;
        self.modifiers.equip(definition.clone())?;
        tracing::info!("Bought modifier {} for {}", definition.name, definition.cost);
        Ok(())
    }

    /// Returns the refund paid
    pub fn sell_modifier(&mut self, id: &str) -> Result<u32> {
        self.ensure_between_throws()?;
        let definition = self.modifiers.unequip(id)?;
        let refund = refund_for(definition.cost, self.config.sell_refund_percent);
        self.currency = self.currency.saturating_add(refund);
        tracing::info!("Sold modifier {} for {}", definition.name, refund);
        Ok(refund)
    }

    pub fn buy_enhancement(
        &mut self,
        definition: &EnhancementDefinition,
        dice: &[DieId],
    ) -> Result<EnhancementOutcome> {
        self.ensure_between_throws()?;
        self.check_funds(definition.cost)?;
        self.enhancements.validate(definition, &self.pool, dice)?;

        let outcome = self.enhancements.apply(definition, &mut self.pool, dice)?;
        self.pay(definition.cost)?;
        tracing::info!(
            "Applied {} to {} dice for {}",
            definition.name,
            dice.len(),
            definition.cost
        );
        Ok(outcome)
    }

    fn check_funds(&self, cost: u32) -> Result<()> {
        if cost > self.currency {
            return Err(GameError::InsufficientFunds {
                needed: cost,
                available: self.currency,
            });
        }
        Ok(())
    }

    fn pay(&mut self, cost: u32) -> Result<()> {
        self.check_funds(cost)?;
        self.currency -= cost;
        Ok(())
    }

    /// Start over from round 1 with a fresh inventory and wallet
    ///
    /// The RNG keeps running, so a restarted game deals differently.
    pub fn restart(&mut self) {
        self.pool = starting_pool(&self.config);
        self.modifiers.clear();
        self.enhancements = EnhancementEngine::new();
        self.currency = self.config.starting_currency;
        self.round_number = 1;
        self.round = None;
        self.lost_round = None;
        self.events = EventLog::new();
        tracing::info!("Game restarted");
    }
}

/// `cost * percent / 100`, floored, widened so large prices cannot overflow
fn refund_for(cost: u32, percent: u32) -> u32 {
    let refund = cost as u64 * percent as u64 / 100;
    refund.min(u32::MAX as u64) as u32
}

fn starting_pool(config: &GameConfig) -> DicePool {
    let dice = (0..config.starting_dice)
        .map(|_| InventoryDie::new(DieTemplate::Standard))
        .collect();
    DicePool::with_dice(config.hand_size, dice)
}
