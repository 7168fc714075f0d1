//! Round flow integration tests

use dice_gauntlet::core::config::GameConfig;
use dice_gauntlet::core::types::SideType;
use dice_gauntlet::dice::*;
use dice_gauntlet::enhancements::*;
use dice_gauntlet::modifiers::*;
use dice_gauntlet::physics::{DieSettled, PhysicsSubstrate, SimulatedTable};
use dice_gauntlet::progression::GameSession;
use dice_gauntlet::round::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Holds launched dice so the test can settle them in any order
#[derive(Default)]
struct HeldTable {
    launched: Vec<ThrownDie>,
}

impl PhysicsSubstrate for HeldTable {
    fn launch(&mut self, dice: &[ThrownDie]) {
        self.launched.extend_from_slice(dice);
    }
}

impl HeldTable {
    /// Land a die on its +Y face
    fn settle(&self, index: usize) -> DieSettled {
        let die = &self.launched[index];
        let face = die.faces.face(FaceAxis::PosY);
        DieSettled {
            die: die.id,
            raw_value: face.value,
            side: face.side,
        }
    }
}

fn die_showing(value: u32) -> InventoryDie {
    let mut die = InventoryDie::new(DieTemplate::Standard);
    die.faces = FaceSet::from_values([value; FACE_COUNT]);
    die
}

fn rules() -> RoundRules {
    RoundRules::from(&GameConfig::default())
}

/// Three sixes against a goal of 20, with the given modifiers
fn throw_three_sixes(modifiers: &ModifierEngine) -> (RoundStateMachine, ThrowResult) {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut pool = DicePool::with_dice(3, (0..3).map(|_| die_showing(6)).collect());
    let mut events = EventLog::new();
    let mut table = HeldTable::default();

    let mut round = RoundStateMachine::start(1, 20, rules(), &mut pool, &mut rng, &mut events);
    round
        .confirm_throw(&[0, 1, 2], &mut pool, &mut table, &mut events)
        .unwrap();

    let mut result = None;
    for i in 0..3 {
        result = round
            .on_die_settled(table.settle(i), modifiers, &mut events)
            .unwrap();
    }
    (round, result.unwrap())
}

#[test]
fn test_three_sixes_without_modifiers_continues() {
    let modifiers = ModifierEngine::new(5);
    let (round, result) = throw_three_sixes(&modifiers);

    assert_eq!(result.raw_total, 18);
    assert_eq!(result.score, 18);
    assert_eq!(round.phase(), RoundPhase::Scoring(Verdict::Continue));
    assert_eq!(round.throws_remaining(), 2);
}

#[test]
fn test_steady_hand_reaches_goal() {
    let catalog = ModifierCatalog::standard();
    let mut modifiers = ModifierEngine::new(5);
    modifiers
        .equip(catalog.get("steady_hand").unwrap().clone())
        .unwrap();

    let (round, result) = throw_three_sixes(&modifiers);
    assert_eq!(result.raw_total, 18);
    assert_eq!(result.score, 23);
    assert_eq!(round.phase(), RoundPhase::Scoring(Verdict::GoalReached));
}

#[test]
fn test_split_halves_and_duplicates() {
    let catalog = EnhancementCatalog::standard();
    let mut die = InventoryDie::new(DieTemplate::Standard);
    die.faces = FaceSet::from_values([1, 6, 3, 4, 2, 5]);
    let id = die.id;
    let mut pool = DicePool::with_dice(5, vec![die, die_showing(3)]);
    let mut engine = EnhancementEngine::new();

    let outcome = engine
        .apply(catalog.get("split").unwrap(), &mut pool, &[id])
        .unwrap();

    assert_eq!(pool.inventory().len(), 3);
    assert_eq!(pool.find(id).unwrap().faces.values(), [1, 3, 2, 2, 1, 3]);
    let copy = pool.find(outcome.duplicates[0]).unwrap();
    assert_eq!(copy.faces.values(), [1, 3, 2, 2, 1, 3]);
    assert_ne!(copy.id, id);
}

#[test]
fn test_settle_order_does_not_change_result() {
    let modifiers = {
        let catalog = ModifierCatalog::standard();
        let mut m = ModifierEngine::new(5);
        m.equip(catalog.get("full_house").unwrap().clone()).unwrap();
        m.equip(catalog.get("high_roller").unwrap().clone()).unwrap();
        m
    };

    let mut scores = Vec::new();
    for order in [[0, 1, 2], [1, 2, 0], [2, 0, 1]] {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let dice = vec![die_showing(2), die_showing(5), die_showing(1)];
        let mut pool = DicePool::with_dice(3, dice);
        let mut events = EventLog::new();
        let mut table = HeldTable::default();

        let mut round = RoundStateMachine::start(1, 100, rules(), &mut pool, &mut rng, &mut events);
        round
            .confirm_throw(&[0, 1, 2], &mut pool, &mut table, &mut events)
            .unwrap();

        let mut finalized = Vec::new();
        for i in order {
            if let Some(result) = round
                .on_die_settled(table.settle(i), &modifiers, &mut events)
                .unwrap()
            {
                finalized.push(result);
            }
        }

        assert_eq!(finalized.len(), 1);
        assert_eq!(
            events.count(|e| matches!(e, RoundEvent::ThrowFinalized { .. })),
            1
        );
        let mut values = finalized[0].values.clone();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 5]);
        scores.push(finalized[0].score);
    }

    assert!(scores.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_lost_die_unregistered_lets_throw_finish() {
    let modifiers = ModifierEngine::new(5);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut pool = DicePool::with_dice(3, (0..3).map(|_| die_showing(4)).collect());
    let mut events = EventLog::new();
    let mut table = HeldTable::default();

    let mut round = RoundStateMachine::start(1, 20, rules(), &mut pool, &mut rng, &mut events);
    round
        .confirm_throw(&[0, 1, 2], &mut pool, &mut table, &mut events)
        .unwrap();

    assert!(round.on_die_settled(table.settle(0), &modifiers, &mut events).unwrap().is_none());
    assert!(round.on_die_settled(table.settle(1), &modifiers, &mut events).unwrap().is_none());
    assert_eq!(round.dice_in_flight(), 1);

    let lost = table.launched[2].id;
    let result = round.unregister_die(lost, &modifiers, &mut events).unwrap().unwrap();
    assert_eq!(result.score, 8);
    assert_eq!(round.phase(), RoundPhase::Scoring(Verdict::Continue));
}

#[test]
fn test_resold_interest_pays_once() {
    let modifier_catalog = ModifierCatalog::standard();
    let interest = modifier_catalog.get("interest").unwrap();
    let steady = modifier_catalog.get("steady_hand").unwrap();
    let config = GameConfig {
        starting_currency: 30,
        base_goal: 1,
        ..GameConfig::default()
    };
    let mut session = GameSession::new(config, 4).unwrap();

    session.buy_modifier(interest).unwrap();
    session.sell_modifier("interest").unwrap();
    session.buy_modifier(interest).unwrap();
    session.buy_modifier(steady).unwrap();
    assert_eq!(session.modifiers().round_end_subscriber_count(), 1);
    let before = session.currency();

    // Standard dice on +Y show 1: five dice plus Steady Hand score 10
    let mut table = HeldTable::default();
    session.start_round().unwrap();
    session.confirm_throw(&[0, 1, 2, 3, 4], &mut table).unwrap();
    let mut result = None;
    for i in 0..5 {
        result = session.on_die_settled(table.settle(i)).unwrap();
    }
    assert_eq!(result.unwrap().score, 10);
    session.acknowledge().unwrap();

    let interest_awards: Vec<u32> = session
        .events()
        .events()
        .iter()
        .filter_map(|e| match e {
            RoundEvent::CurrencyAwarded { source, amount } if source == "interest" => Some(*amount),
            _ => None,
        })
        .collect();
    assert_eq!(interest_awards, vec![1]);
    // round reward 5, two unused throws, one interest
    assert_eq!(session.currency(), before + 5 + 2 + 1);
}

#[test]
fn test_money_side_skips_score() {
    let modifiers = ModifierEngine::new(5);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut pool = DicePool::with_dice(
        2,
        vec![InventoryDie::new(DieTemplate::Gilded), die_showing(5)],
    );
    let mut events = EventLog::new();
    let mut table = HeldTable::default();

    let mut round = RoundStateMachine::start(1, 20, rules(), &mut pool, &mut rng, &mut events);
    round.confirm_throw(&[0, 1], &mut pool, &mut table, &mut events).unwrap();

    let mut result = None;
    for i in 0..2 {
        result = round.on_die_settled(table.settle(i), &modifiers, &mut events).unwrap();
    }
    let result = result.unwrap();
    assert_eq!(result.score, 5);
    assert_eq!(result.currency, 1);
    assert_eq!(result.values, vec![5]);
    assert_eq!(
        events.count(|e| matches!(e, RoundEvent::CurrencyEarned { .. })),
        1
    );
    assert!(table
        .launched
        .iter()
        .any(|d| d.faces.face(FaceAxis::PosY).side == SideType::Money));
}

#[test]
fn test_full_game_on_simulated_table_is_deterministic() {
    let run = |seed: u64| {
        let mut session = GameSession::new(GameConfig::default(), seed).unwrap();
        let mut table = SimulatedTable::new(ChaCha8Rng::seed_from_u64(seed));
        let mut scores = Vec::new();

        for _ in 0..3 {
            if session.is_game_over() {
                break;
            }
            session.start_round().unwrap();
            loop {
                let hand: Vec<usize> = (0..session.pool().hand().len()).collect();
                scores.push(session.play_throw(&hand, &mut table).unwrap().score);
                if let RoundStep::Ended(_) = session.acknowledge().unwrap() {
                    break;
                }
            }
        }
        (scores, session.currency(), session.round_number())
    };

    assert_eq!(run(42), run(42));
}
