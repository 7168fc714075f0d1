//! Physics substrate contract
//!
//! The engine never simulates a tumbling die. It hands thrown dice to a
//! `PhysicsSubstrate` and later receives one `DieSettled` per die, in
//! whatever order the dice come to rest.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core::types::{DieId, SideType};
use crate::dice::die::ThrownDie;
use crate::dice::face::FACE_COUNT;

/// A die came to rest showing this face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieSettled {
    pub die: DieId,
    pub raw_value: u32,
    pub side: SideType,
}

pub trait PhysicsSubstrate {
    /// Start simulating the given dice
    fn launch(&mut self, dice: &[ThrownDie]);
}

/// Rolls dice instantly with an injected RNG
///
/// Each die lands on a uniformly random face and the settle order is
/// shuffled, so consumers see out-of-order completion like a real table.
#[derive(Debug)]
pub struct SimulatedTable<R: Rng> {
    rng: R,
    settled: VecDeque<DieSettled>,
}

impl<R: Rng> SimulatedTable<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            settled: VecDeque::new(),
        }
    }

    /// Dice at rest but not yet delivered
    pub fn pending(&self) -> usize {
        self.settled.len()
    }

    pub fn next_settled(&mut self) -> Option<DieSettled> {
        self.settled.pop_front()
    }

    pub fn drain_settled(&mut self) -> Vec<DieSettled> {
        self.settled.drain(..).collect()
    }

    /// Drop a die off the table before it reports, as if destroyed mid-roll
    pub fn lose(&mut self, die: DieId) -> bool {
        match self.settled.iter().position(|s| s.die == die) {
            Some(pos) => {
                self.settled.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl<R: Rng> PhysicsSubstrate for SimulatedTable<R> {
    fn launch(&mut self, dice: &[ThrownDie]) {
        let mut landed: Vec<DieSettled> = dice
            .iter()
            .map(|d| {
                let face = d.faces.faces()[self.rng.gen_range(0..FACE_COUNT)];
                DieSettled {
                    die: d.id,
                    raw_value: face.value,
                    side: face.side,
                }
            })
            .collect();
        landed.shuffle(&mut self.rng);
        tracing::debug!("Table launched {} dice", landed.len());
        self.settled.extend(landed);
    }
}
