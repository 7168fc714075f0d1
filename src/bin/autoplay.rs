//! Headless Autoplay
//!
//! Plays whole games with a greedy policy and prints a JSON summary per game.
//! Used to check goal curve and shop pricing against each other.

use dice_gauntlet::core::config::GameConfig;
use dice_gauntlet::core::error::Result;
use dice_gauntlet::enhancements::catalog::EnhancementCatalog;
use dice_gauntlet::modifiers::catalog::ModifierCatalog;
use dice_gauntlet::physics::SimulatedTable;
use dice_gauntlet::progression::GameSession;
use dice_gauntlet::round::state_machine::RoundStep;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::PathBuf;

/// Headless Autoplay - greedy games for balancing
#[derive(Parser, Debug)]
#[command(name = "autoplay")]
#[command(about = "Play games with a greedy policy and output JSON summaries")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: u32,

    /// Seed of the first game; game n uses seed + n
    #[arg(long)]
    seed: Option<u64>,

    /// Stop a game after this many rounds even if still winning
    #[arg(long, default_value_t = 30)]
    max_rounds: u32,

    /// TOML file overriding the default game config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the shop between rounds
    #[arg(long)]
    no_shop: bool,

    /// Also print every round event as a JSON line
    #[arg(long)]
    events: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct GameSummary {
    game: u32,
    seed: u64,
    rounds_won: u32,
    lost_at_round: Option<u32>,
    final_goal: u32,
    throws: u32,
    best_throw: u32,
    currency: u32,
    modifiers: Vec<String>,
    enhancements_applied: usize,
    inventory_size: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dice_gauntlet=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::from_toml_file(path)?,
        None => GameConfig::default(),
    };
    let base_seed = args.seed.unwrap_or_else(rand::random);

    for game in 0..args.games {
        let seed = base_seed.wrapping_add(game as u64);
        let summary = play_game(game, seed, config.clone(), &args)?;
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}

fn play_game(game: u32, seed: u64, config: GameConfig, args: &Args) -> Result<GameSummary> {
    let mut session = GameSession::new(config, seed)?;
    let mut table = SimulatedTable::new(ChaCha8Rng::seed_from_u64(seed ^ 0x5eed));
    let modifier_catalog = ModifierCatalog::standard();
    let enhancement_catalog = EnhancementCatalog::standard();

    let mut rounds_won = 0;
    let mut throws = 0;
    let mut best_throw = 0;

    while !session.is_game_over() && rounds_won < args.max_rounds {
        if !args.no_shop {
            shop(&mut session, &modifier_catalog, &enhancement_catalog);
        }
        session.start_round()?;

        loop {
            discard_weakest(&mut session)?;
            let hand: Vec<usize> = (0..session.pool().hand().len()).collect();
            let result = session.play_throw(&hand, &mut table)?;
            throws += 1;
            best_throw = best_throw.max(result.score);

            match session.acknowledge()? {
                RoundStep::NextThrow => continue,
                RoundStep::Ended(report) => {
                    if report.won {
                        rounds_won += 1;
                    }
                    break;
                }
            }
        }
        for event in session.drain_events() {
            if args.events {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
    }

    Ok(GameSummary {
        game,
        seed,
        rounds_won,
        lost_at_round: session.is_game_over().then(|| session.round_number()),
        final_goal: session.current_goal(),
        throws,
        best_throw,
        currency: session.currency(),
        modifiers: session
            .modifiers()
            .active()
            .iter()
            .map(|m| m.id.clone())
            .collect(),
        enhancements_applied: session.enhancements().history().len(),
        inventory_size: session.pool().inventory().len(),
    })
}

/// Discard hand dice whose face total is below the hand average
fn discard_weakest(session: &mut GameSession) -> Result<()> {
    let Some(round) = session.round() else {
        return Ok(());
    };
    if !round.can_discard() {
        return Ok(());
    }
    let limit = round.rules().max_discard_count;

    let sums: Vec<u32> = session.pool().hand().iter().map(|d| d.faces.sum()).collect();
    if sums.is_empty() {
        return Ok(());
    }
    let average = sums.iter().sum::<u32>() / sums.len() as u32;
    let mut weak: Vec<usize> = (0..sums.len()).filter(|&i| sums[i] < average).collect();
    weak.sort_by_key(|&i| sums[i]);
    weak.truncate(limit);

    if !weak.is_empty() {
        session.discard(&weak)?;
    }
    Ok(())
}

/// Buy the priciest affordable modifier, then enhance the weakest die
fn shop(session: &mut GameSession, modifiers: &ModifierCatalog, enhancements: &EnhancementCatalog) {
    if !session.modifiers().is_at_capacity() {
        let pick = modifiers
            .all()
            .iter()
            .filter(|m| m.cost <= session.currency() && !session.modifiers().is_equipped(&m.id))
            .max_by_key(|m| m.cost)
            .cloned();
        if let Some(definition) = pick {
            if let Err(e) = session.buy_modifier(&definition) {
                tracing::warn!("Autoplay purchase failed: {}", e);
            }
        }
    }

    let Some(plus_one) = enhancements.get("plus_one") else {
        return;
    };
    if plus_one.cost > session.currency() {
        return;
    }
    let weakest = session
        .pool()
        .inventory()
        .iter()
        .min_by_key(|d| d.faces.sum())
        .map(|d| d.id);
    if let Some(die) = weakest {
        if let Err(e) = session.buy_enhancement(plus_one, &[die]) {
            tracing::warn!("Autoplay enhancement failed: {}", e);
        }
    }
}
