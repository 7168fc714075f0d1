//! Progression - rounds strung into a game with a wallet and a shop

pub mod session;

pub use session::GameSession;
