//! Dice pool - inventory, hand, and per-round holding areas
//!
//! Every die lives in exactly one of four places: the inventory, the hand,
//! the discarded-this-round pile, or the thrown-this-round pile. Dice only
//! ever move between these vectors, so the invariant holds by construction.

use rand::Rng;

use crate::core::error::{GameError, Result};
use crate::core::types::DieId;
use crate::dice::die::{InventoryDie, ThrownDie};

#[derive(Debug, Clone, Default)]
pub struct DicePool {
    inventory: Vec<InventoryDie>,
    hand: Vec<InventoryDie>,
    discarded: Vec<InventoryDie>,
    thrown: Vec<InventoryDie>,
    hand_size: usize,
}

impl DicePool {
    pub fn new(hand_size: usize) -> Self {
        Self {
            hand_size,
            ..Self::default()
        }
    }

    /// Pool seeded with owned dice, all in inventory
    pub fn with_dice(hand_size: usize, dice: Vec<InventoryDie>) -> Self {
        Self {
            inventory: dice,
            hand_size,
            ..Self::default()
        }
    }

    pub fn hand_size(&self) -> usize {
        self.hand_size
    }

    pub fn inventory(&self) -> &[InventoryDie] {
        &self.inventory
    }

    pub fn hand(&self) -> &[InventoryDie] {
        &self.hand
    }

    pub fn discarded(&self) -> &[InventoryDie] {
        &self.discarded
    }

    pub fn thrown(&self) -> &[InventoryDie] {
        &self.thrown
    }

    /// Every die owned, wherever it currently is
    pub fn total_dice(&self) -> usize {
        self.inventory.len() + self.hand.len() + self.discarded.len() + self.thrown.len()
    }

    pub fn add_to_inventory(&mut self, die: InventoryDie) {
        self.inventory.push(die);
    }

    pub fn find(&self, id: DieId) -> Option<&InventoryDie> {
        self.inventory
            .iter()
            .chain(&self.hand)
            .chain(&self.discarded)
            .chain(&self.thrown)
            .find(|d| d.id == id)
    }

    pub fn find_inventory_mut(&mut self, id: DieId) -> Option<&mut InventoryDie> {
        self.inventory.iter_mut().find(|d| d.id == id)
    }

    /// Draw random inventory dice until the hand is full, returns the number drawn
    pub fn draw_to_full(&mut self, rng: &mut impl Rng) -> usize {
        let mut drawn = 0;
        while self.hand.len() < self.hand_size && !self.inventory.is_empty() {
            let pick = rng.gen_range(0..self.inventory.len());
            let die = self.inventory.swap_remove(pick);
            self.hand.push(die);
            drawn += 1;
        }
        drawn
    }

    /// Remove the selected hand dice for throwing
    ///
    /// Dice come back in the order the indices were given and stay in the
    /// thrown pile until the round ends.
    pub fn extract(&mut self, indices: &[usize]) -> Result<Vec<ThrownDie>> {
        validate_indices(indices, self.hand.len())?;

        let mut taken = take_from_hand(&mut self.hand, indices);
        let snapshots = taken.iter().map(InventoryDie::snapshot).collect();
        self.thrown.append(&mut taken);
        Ok(snapshots)
    }

    /// Set the selected dice aside for the rest of the round, then refill the hand
    ///
    /// Returns the number of dice discarded.
    pub fn discard_for_round(&mut self, indices: &[usize], rng: &mut impl Rng) -> Result<usize> {
        validate_indices(indices, self.hand.len())?;

        let mut taken = take_from_hand(&mut self.hand, indices);
        let count = taken.len();
        self.discarded.append(&mut taken);
        self.draw_to_full(rng);
        Ok(count)
    }

    /// Put hand, discarded, and thrown dice back into inventory
    pub fn return_all_to_inventory(&mut self) -> usize {
        let returned = self.hand.len() + self.discarded.len() + self.thrown.len();
        self.inventory.append(&mut self.hand);
        self.inventory.append(&mut self.discarded);
        self.inventory.append(&mut self.thrown);
        returned
    }
}

/// Indices must be in range and distinct
fn validate_indices(indices: &[usize], len: usize) -> Result<()> {
    let mut seen = vec![false; len];
    for &idx in indices {
        if idx >= len {
            return Err(GameError::InvalidSelection(format!(
                "hand index {} out of range (hand has {} dice)",
                idx, len
            )));
        }
        if seen[idx] {
            return Err(GameError::InvalidSelection(format!(
                "hand index {} selected twice",
                idx
            )));
        }
        seen[idx] = true;
    }
    Ok(())
}

/// Pull dice out of the hand in the requested order; indices already validated
fn take_from_hand(hand: &mut Vec<InventoryDie>, indices: &[usize]) -> Vec<InventoryDie> {
    let taken: Vec<InventoryDie> = indices.iter().map(|&i| hand[i].clone()).collect();

    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    for idx in sorted.into_iter().rev() {
        hand.remove(idx);
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::face::DieTemplate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pool_of(count: usize, hand_size: usize) -> DicePool {
        let dice = (0..count).map(|_| InventoryDie::new(DieTemplate::Standard)).collect();
        DicePool::with_dice(hand_size, dice)
    }

    #[test]
    fn test_draw_to_full() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut pool = pool_of(8, 5);

        assert_eq!(pool.draw_to_full(&mut rng), 5);
        assert_eq!(pool.hand().len(), 5);
        assert_eq!(pool.inventory().len(), 3);

        // Already full
        assert_eq!(pool.draw_to_full(&mut rng), 0);
    }

    #[test]
    fn test_draw_stops_when_inventory_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut pool = pool_of(3, 5);
        assert_eq!(pool.draw_to_full(&mut rng), 3);
        assert!(pool.inventory().is_empty());
    }

    #[test]
    fn test_extract_preserves_requested_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut pool = pool_of(8, 5);
        pool.draw_to_full(&mut rng);
        let expected = [pool.hand()[3].id, pool.hand()[0].id];

        let thrown = pool.extract(&[3, 0]).unwrap();
        assert_eq!(thrown.iter().map(|d| d.id).collect::<Vec<_>>(), expected);
        assert_eq!(pool.hand().len(), 3);
        assert_eq!(pool.thrown().len(), 2);
        assert_eq!(pool.total_dice(), 8);
    }

    #[test]
    fn test_invalid_indices_change_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut pool = pool_of(8, 5);
        pool.draw_to_full(&mut rng);
        let before: Vec<DieId> = pool.hand().iter().map(|d| d.id).collect();

        assert!(matches!(pool.extract(&[0, 9]), Err(GameError::InvalidSelection(_))));
        assert!(matches!(pool.extract(&[1, 1]), Err(GameError::InvalidSelection(_))));
        assert!(pool
            .discard_for_round(&[5], &mut rng)
            .is_err());

        let after: Vec<DieId> = pool.hand().iter().map(|d| d.id).collect();
        assert_eq!(before, after);
        assert!(pool.thrown().is_empty());
        assert!(pool.discarded().is_empty());
    }

    #[test]
    fn test_discard_refills_hand() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pool = pool_of(8, 5);
        pool.draw_to_full(&mut rng);
        let discarded_id = pool.hand()[2].id;

        assert_eq!(pool.discard_for_round(&[2, 4], &mut rng).unwrap(), 2);
        assert_eq!(pool.hand().len(), 5);
        assert_eq!(pool.discarded().len(), 2);
        assert_eq!(pool.inventory().len(), 1);
        assert!(pool.hand().iter().all(|d| d.id != discarded_id));
    }

    #[test]
    fn test_return_all_to_inventory() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pool = pool_of(8, 5);
        pool.draw_to_full(&mut rng);
        pool.discard_for_round(&[0], &mut rng).unwrap();
        pool.extract(&[0, 1]).unwrap();

        let outside = 8 - pool.inventory().len();
        assert_eq!(pool.return_all_to_inventory(), outside);
        assert_eq!(pool.inventory().len(), 8);
        assert!(pool.hand().is_empty());
        assert!(pool.discarded().is_empty());
        assert!(pool.thrown().is_empty());
    }

    #[test]
    fn test_find_searches_every_location() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pool = pool_of(6, 5);
        pool.draw_to_full(&mut rng);
        let thrown_id = pool.hand()[0].id;
        pool.extract(&[0]).unwrap();

        assert!(pool.find(thrown_id).is_some());
        assert!(pool.find_inventory_mut(thrown_id).is_none());
    }
}
