//! Enhancements - permanent rewrites of a die's face values

pub mod catalog;
pub mod engine;
pub mod transform;

pub use catalog::{
    DiceRequirement, EnhancementCatalog, EnhancementDefinition, EnhancementKind,
    PreparedEnhancement,
};
pub use engine::{EnhancementEngine, EnhancementOutcome};
