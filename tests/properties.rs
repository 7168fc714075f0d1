//! Property-based tests for enhancements, modifier folds and settle fan-in
//!
//! ## Properties Verified
//!
//! - Every enhancement keeps six faces and leaves side types alone
//! - Degenerate (empty) face arrays pass through every transform unchanged
//! - Inserting a no-op modifier anywhere in the set never changes a score
//! - A throw's score does not depend on the order its dice settle in

use dice_gauntlet::core::types::SideType;
use dice_gauntlet::dice::{DicePool, DieTemplate, FaceSet, InventoryDie, ThrownDie, FACE_COUNT};
use dice_gauntlet::enhancements::{transform, EnhancementCatalog, EnhancementEngine};
use dice_gauntlet::modifiers::{ModifierCatalog, ModifierDefinition, ModifierEngine, ModifierRule, ThrowInfo};
use dice_gauntlet::physics::{DieSettled, PhysicsSubstrate};
use dice_gauntlet::round::{EventLog, RoundRules, RoundStateMachine};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn arb_faces() -> impl Strategy<Value = [u32; FACE_COUNT]> {
    prop::array::uniform6(0u32..=30)
}

fn gilded_with(values: [u32; FACE_COUNT]) -> InventoryDie {
    let mut die = InventoryDie::new(DieTemplate::Gilded);
    die.faces.set_values(&values);
    die
}

fn info(throw_number: u32, total_dice: usize) -> ThrowInfo {
    ThrowInfo {
        throw_number,
        round_number: 1,
        total_dice,
    }
}

#[derive(Default)]
struct HeldTable {
    launched: Vec<ThrownDie>,
}

impl PhysicsSubstrate for HeldTable {
    fn launch(&mut self, dice: &[ThrownDie]) {
        self.launched.extend_from_slice(dice);
    }
}

// ============================================================================
// Enhancements
// ============================================================================

proptest! {
    #[test]
    fn prop_enhancements_keep_shape_and_sides(
        a in arb_faces(),
        b in arb_faces(),
        c in arb_faces(),
    ) {
        let catalog = EnhancementCatalog::standard();
        for definition in catalog.all() {
            let dice = vec![gilded_with(a), gilded_with(b), gilded_with(c)];
            let sides: Vec<[SideType; FACE_COUNT]> = dice.iter().map(|d| d.faces.sides()).collect();
            let count = definition.kind.requirement().min;
            let selected: Vec<_> = dice.iter().take(count).map(|d| d.id).collect();
            let mut pool = DicePool::with_dice(5, dice);
            let mut engine = EnhancementEngine::new();

            let outcome = engine.apply(definition, &mut pool, &selected);
            prop_assert!(outcome.is_ok(), "{} failed: {:?}", definition.id, outcome);

            for (id, original_sides) in selected.iter().zip(&sides) {
                let die = pool.find(*id).unwrap();
                prop_assert_eq!(die.faces.values().len(), FACE_COUNT);
                prop_assert_eq!(&die.faces.sides(), original_sides);
            }
        }
    }

    #[test]
    fn prop_transforms_return_six_faces(values in arb_faces(), amount in 0u32..10, factor in 0.1f64..4.0) {
        let outputs = [
            transform::flatten_to_mean(&values),
            transform::add_uniform(&values, amount),
            transform::multiply_uniform(&values, factor),
            transform::double_max(&values),
            transform::raise_to_floor(&values, amount),
            transform::threshold_adjust(&values, 3, 4, amount, 1),
            transform::polarize(&values, 1, amount),
            transform::specialize(&values),
            transform::halve_ceil(&values),
        ];
        for out in outputs {
            prop_assert_eq!(out.len(), FACE_COUNT);
        }
    }

    #[test]
    fn prop_face_set_ignores_wrong_length(values in prop::collection::vec(0u32..10, 0..12)) {
        let mut faces = FaceSet::from_values([1, 2, 3, 4, 5, 6]);
        let accepted = faces.set_values(&values);
        prop_assert_eq!(accepted, values.len() == FACE_COUNT);
        if !accepted {
            prop_assert_eq!(faces.values(), [1, 2, 3, 4, 5, 6]);
        }
    }
}

#[test]
fn test_empty_faces_are_identity() {
    let empty: [u32; 0] = [];
    assert!(transform::flatten_to_mean(&empty).is_empty());
    assert!(transform::add_uniform(&empty, 3).is_empty());
    assert!(transform::multiply_uniform(&empty, 2.0).is_empty());
    assert!(transform::double_max(&empty).is_empty());
    assert!(transform::raise_to_floor(&empty, 3).is_empty());
    assert!(transform::threshold_adjust(&empty, 3, 4, 2, 1).is_empty());
    assert!(transform::polarize(&empty, 1, 2).is_empty());
    assert!(transform::specialize(&empty).is_empty());
    assert!(transform::halve_ceil(&empty).is_empty());
}

// ============================================================================
// Modifier folds
// ============================================================================

fn arb_catalog_picks() -> impl Strategy<Value = Vec<usize>> {
    let len = ModifierCatalog::standard().all().len();
    prop::collection::vec(0..len, 0..5)
}

fn engine_from(ids: &[usize], no_op_at: Option<usize>) -> ModifierEngine {
    let catalog = ModifierCatalog::standard();
    let mut engine = ModifierEngine::new(16);
    for (pos, &i) in ids.iter().enumerate() {
        if no_op_at == Some(pos) {
            let no_op = ModifierDefinition::new("no_op", "No-op", "", 0, ModifierRule::FlatBonus { amount: 0 });
            engine.equip(no_op).unwrap();
        }
        // Duplicate picks are rejected by the engine; skip them
        let _ = engine.equip(catalog.all()[i].clone());
    }
    engine
}

proptest! {
    #[test]
    fn prop_no_op_modifier_changes_nothing(
        picks in arb_catalog_picks(),
        slot in 0usize..5,
        values in prop::collection::vec(1u32..=6, 1..6),
        throw_number in 1u32..4,
    ) {
        let plain = engine_from(&picks, None);
        let padded = engine_from(&picks, Some(slot.min(picks.len().saturating_sub(1))));
        let info = info(throw_number, values.len());

        for (i, &v) in values.iter().enumerate() {
            prop_assert_eq!(
                plain.apply_per_die(v, i, &values[..=i], info),
                padded.apply_per_die(v, i, &values[..=i], info)
            );
        }
        let total: u32 = values.iter().sum();
        prop_assert_eq!(
            plain.apply_after_throw(total, &values, info),
            padded.apply_after_throw(total, &values, info)
        );
    }
}

// ============================================================================
// Settle fan-in
// ============================================================================

proptest! {
    #[test]
    fn prop_settle_order_is_irrelevant(
        faces in prop::collection::vec(1u32..=6, 1..6),
        order_seed in any::<u64>(),
        picks in arb_catalog_picks(),
    ) {
        use rand::seq::SliceRandom;

        let modifiers = engine_from(&picks, None);
        let mut outcomes = Vec::new();

        for shuffle in [false, true] {
            let dice: Vec<InventoryDie> = faces
                .iter()
                .map(|&v| {
                    let mut d = InventoryDie::new(DieTemplate::Standard);
                    d.faces.set_values(&[v; FACE_COUNT]);
                    d
                })
                .collect();
            let mut pool = DicePool::with_dice(faces.len(), dice);
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            let mut events = EventLog::new();
            let mut table = HeldTable::default();
            let rules = RoundRules { max_throws: 3, discards_per_round: 0, max_discard_count: 0 };

            let mut round = RoundStateMachine::start(1, 1000, rules, &mut pool, &mut rng, &mut events);
            let hand: Vec<usize> = (0..faces.len()).collect();
            round.confirm_throw(&hand, &mut pool, &mut table, &mut events).unwrap();

            let mut signals: Vec<DieSettled> = table
                .launched
                .iter()
                .map(|d| DieSettled { die: d.id, raw_value: d.faces.values()[0], side: SideType::Score })
                .collect();
            if shuffle {
                signals.shuffle(&mut ChaCha8Rng::seed_from_u64(order_seed));
            }

            let mut finals = Vec::new();
            for s in signals {
                if let Some(r) = round.on_die_settled(s, &modifiers, &mut events).unwrap() {
                    finals.push(r);
                }
            }
            prop_assert_eq!(finals.len(), 1);
            let mut values = finals[0].values.clone();
            values.sort_unstable();
            outcomes.push((values, finals[0].raw_total, finals[0].score));
        }

        prop_assert_eq!(&outcomes[0].0, &outcomes[1].0);
        prop_assert_eq!(outcomes[0].2, outcomes[1].2);
    }
}
