//! Dice Gauntlet - round-based dice scoring with modifiers and enhancements

pub mod core;
pub mod dice;
pub mod enhancements;
pub mod modifiers;
pub mod physics;
pub mod progression;
pub mod round;
