//! Round flow - phase machine, settle aggregation and lifecycle events

pub mod aggregator;
pub mod events;
pub mod state_machine;

pub use aggregator::{DiceResolutionAggregator, SettleBarrier, ThrowResult};
pub use events::{EventLog, RoundEvent, Verdict};
pub use state_machine::{
    DiscardResult, RoundOutcome, RoundPhase, RoundReport, RoundRules, RoundState,
    RoundStateMachine, RoundStep,
};
