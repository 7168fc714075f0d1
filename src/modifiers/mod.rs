//! Modifiers - equip-able scoring rules applied per die or per throw

pub mod catalog;
pub mod context;
pub mod engine;

pub use catalog::{ModifierCatalog, ModifierDefinition, ModifierRule};
pub use context::{RoundSummary, ScoreContext, ThrowInfo, Timing};
pub use engine::{ModifierEngine, RoundEndAward};
