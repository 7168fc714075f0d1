//! Dice - face sets, owned dice, and where they live during a round

pub mod die;
pub mod face;
pub mod pool;

pub use die::{InventoryDie, ThrownDie};
pub use face::{DieTemplate, Face, FaceAxis, FaceSet, FACE_COUNT};
pub use pool::DicePool;
