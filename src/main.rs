//! Dice Gauntlet - Entry Point
//!
//! Interactive text front-end. Dice are rolled on a simulated table; every
//! other rule runs through the same session API a graphical host would use.

use dice_gauntlet::core::config::GameConfig;
use dice_gauntlet::core::error::Result;
use dice_gauntlet::enhancements::catalog::EnhancementCatalog;
use dice_gauntlet::modifiers::catalog::ModifierCatalog;
use dice_gauntlet::physics::SimulatedTable;
use dice_gauntlet::progression::GameSession;
use dice_gauntlet::round::events::RoundEvent;
use dice_gauntlet::round::state_machine::{DiscardResult, RoundPhase, RoundStep};

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dice-gauntlet")]
#[command(about = "Throw dice, beat the goal, build an engine of modifiers")]
struct Args {
    /// Random seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding the default game config
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dice_gauntlet=info".into()),
        )
        .init();

    // Load config overrides, falling back to defaults
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::from_toml_file(path)?,
        None => GameConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    // Create the session and a table seeded off the same value
    let mut session = GameSession::new(config, seed)?;
    let mut table = SimulatedTable::new(ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)));
    // Shop stock
    let modifier_catalog = ModifierCatalog::standard();
    let enhancement_catalog = EnhancementCatalog::standard();

    // Display welcome message
    println!("\n=== DICE GAUNTLET ===");
    println!("Seed: {}", seed);
    print_help();

    // Main game loop
    loop {
        // Display current status
        display_status(&session);

        // Prompt for input
        print!("> ");
        io::stdout().flush()?;

        // Read input; EOF ends the game
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let mut words = input.split_whitespace();
        // Handle empty input
        let Some(command) = words.next() else {
            continue;
        };
        let rest: Vec<&str> = words.collect();

        let outcome = match command {
            "quit" | "q" => break,
            "help" | "h" => {
                print_help();
                Ok(())
            }
            "start" | "s" => session.start_round(),
            "discard" | "d" => match parse_indices(&rest) {
                Some(indices) => session.discard(&indices).map(|r| match r {
                    DiscardResult::Discarded { count, redrawn } => {
                        println!("Discarded {}, drew {}", count, redrawn)
                    }
                    DiscardResult::Unavailable => println!("No discards left this round"),
                }),
                None => {
                    println!("Usage: discard <hand index>...");
                    Ok(())
                }
            },
            "throw" | "t" => {
                // No indices throws the whole hand
                let indices = if rest.is_empty() {
                    Some((0..session.pool().hand().len()).collect())
                } else {
                    parse_indices(&rest)
                };
                match indices {
                    Some(indices) => session.play_throw(&indices, &mut table).map(|result| {
                        // Money was already credited as each die settled
                        println!(
                            "Rolled {:?}: raw {} -> score {}",
                            result.values, result.raw_total, result.score
                        );
                        if result.currency > 0 {
                            println!("Collected {} currency", result.currency);
                        }
                    }),
                    None => {
                        println!("Usage: throw [hand index]...");
                        Ok(())
                    }
                }
            }
            "ack" | "a" => session.acknowledge().map(|step| match step {
                RoundStep::NextThrow => println!("Next throw."),
                RoundStep::Ended(report) if report.won => println!(
                    "Round {} won with {}/{}!",
                    report.round_number, report.score, report.goal
                ),
                RoundStep::Ended(report) => println!(
                    "Round {} lost with {}/{}. Type 'restart' to play again.",
                    report.round_number, report.score, report.goal
                ),
            }),
            "shop" => {
                display_shop(&modifier_catalog, &enhancement_catalog);
                Ok(())
            }
            "buy" => match rest.first().and_then(|id| modifier_catalog.get(id)) {
                Some(definition) => session.buy_modifier(definition),
                None => {
                    println!("Usage: buy <modifier id> (see 'shop')");
                    Ok(())
                }
            },
            "sell" => match rest.first() {
                Some(id) => session
                    .sell_modifier(id)
                    .map(|refund| println!("Refunded {}", refund)),
                None => {
                    println!("Usage: sell <modifier id>");
                    Ok(())
                }
            },
            "enhance" | "e" => {
                // Indices refer to inventory, not hand
                let definition = rest.first().and_then(|id| enhancement_catalog.get(id));
                let dice = parse_indices(rest.get(1..).unwrap_or(&[])).and_then(|indices| {
                    indices
                        .iter()
                        .map(|&i| session.pool().inventory().get(i).map(|d| d.id))
                        .collect::<Option<Vec<_>>>()
                });
                match (definition, dice) {
                    (Some(definition), Some(dice)) => session
                        .buy_enhancement(definition, &dice)
                        .map(|o| println!("{} applied to {} dice", o.enhancement, o.transformed.len())),
                    _ => {
                        println!("Usage: enhance <enhancement id> <inventory index>...");
                        Ok(())
                    }
                }
            }
            "inventory" | "i" => {
                display_inventory(&session);
                Ok(())
            }
            "restart" => {
                session.restart();
                Ok(())
            }
            _ => {
                println!("Unknown command. Type 'help' for a list.");
                Ok(())
            }
        };

        // Rejected actions leave state untouched, just report them
        if let Err(e) = outcome {
            println!("Error: {}", e);
        }
        print_events(&mut session);
    }

    println!(
        "\nGoodbye! Reached round {} with {} currency.",
        session.round_number(),
        session.currency()
    );
    Ok(())
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  start / s                 - Start the next round");
    println!("  discard / d <i>...        - Discard hand dice and redraw");
    println!("  throw / t [i]...          - Throw hand dice (all if none given)");
    println!("  ack / a                   - Accept the scoring result");
    println!("  shop                      - List modifiers and enhancements");
    println!("  buy <id>                  - Buy and equip a modifier");
    println!("  sell <id>                 - Sell an equipped modifier");
    println!("  enhance / e <id> <i>...   - Enhance inventory dice");
    println!("  inventory / i             - Show every die and its faces");
    println!("  restart                   - Start a new game");
    println!("  quit / q                  - Exit");
    println!();
}

fn parse_indices(words: &[&str]) -> Option<Vec<usize>> {
    if words.is_empty() {
        return None;
    }
    words.iter().map(|w| w.parse().ok()).collect()
}

fn print_events(session: &mut GameSession) {
    for event in session.drain_events() {
        match event {
            RoundEvent::RoundStarted { round_number, goal, max_throws } => {
                println!("Round {} begins: reach {} in {} throws", round_number, goal, max_throws)
            }
            RoundEvent::CurrencyAwarded { source, amount } => {
                println!("  +{} currency ({})", amount, source)
            }
            _ => {}
        }
    }
}

fn display_status(session: &GameSession) {
    println!();
    let Some(round) = session.round() else {
        println!(
            "--- Round {} | Currency: {} | type 'start' ---",
            session.round_number(),
            session.currency()
        );
        return;
    };
    let state = round.state();
    println!(
        "--- Round {} | {} | Score {}/{} | Throws left {} | Discards {} | Currency {} ---",
        state.round_number,
        state.phase.name(),
        state.score,
        state.goal,
        round.throws_remaining(),
        state.discards_remaining,
        session.currency()
    );

    if state.phase == RoundPhase::HandSetup {
        for (i, die) in session.pool().hand().iter().enumerate() {
            println!("  [{}] {} {:?}", i, die.template.name(), die.faces.values());
        }
    }
    if !session.modifiers().is_empty() {
        let names: Vec<&str> = session.modifiers().active().iter().map(|m| m.name.as_str()).collect();
        println!("  Modifiers: {}", names.join(", "));
    }
    if session.is_game_over() {
        println!("  GAME OVER");
    }
}

fn display_inventory(session: &GameSession) {
    println!();
    println!("=== Inventory ({} dice) ===", session.pool().total_dice());
    for (i, die) in session.pool().inventory().iter().enumerate() {
        println!("  [{}] {} {:?}", i, die.template.name(), die.faces.values());
    }
    println!();
}

fn display_shop(modifiers: &ModifierCatalog, enhancements: &EnhancementCatalog) {
    println!();
    println!("=== Modifiers ===");
    for m in modifiers.all() {
        println!("  {:<16} {:>2}  {} - {}", m.id, m.cost, m.name, m.description);
    }
    println!("=== Enhancements ===");
    for e in enhancements.all() {
        println!(
            "  {:<16} {:>2}  {} ({} dice) - {}",
            e.id,
            e.cost,
            e.name,
            e.kind.requirement(),
            e.description
        );
    }
    println!();
}
