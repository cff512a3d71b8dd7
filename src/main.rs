//! Undervault - Entry Point
//!
//! A line-oriented driver: reads commands from stdin, forwards them to
//! the core interfaces, and prints whatever messages come back.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use undervault::combat::format_round_result;
use undervault::game::{Game, GameMessage, GameState, MessageCategory};
use undervault::{Direction, GenerationStrategy, HeroClass};

const DUNGEON_WIDTH: i32 = 8;
const DUNGEON_HEIGHT: i32 = 8;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    log::info!("Starting Undervault v{}", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("=== UNDERVAULT ===");
    println!("Four pillars lie buried below. Bring them all to the far gate.");
    println!();

    let mut game = setup_game(&mut lines)?;

    loop {
        print_messages(game.drain_messages());

        match game.state() {
            GameState::Victory => {
                println!("You escaped the vault. Well fought.");
                break;
            }
            GameState::GameOver { cause } => {
                println!("The run ends here: {}.", cause);
                break;
            }
            GameState::InCombat { .. } => print!(
                "[combat] (a)ttack, (s)pecial [{}], (h)eal potion > ",
                game.hero().class().skill_name()
            ),
            GameState::Exploring => {
                print!("(n/s/e/w) move (h)eal (v)ision (m)ap s(t)atus save load (q)uit > ")
            }
        }
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let input = line.context("failed to read input")?.trim().to_lowercase();

        let in_combat = matches!(game.state(), GameState::InCombat { .. });
        if in_combat {
            handle_combat_command(&mut game, &input);
        } else {
            if input == "q" {
                break;
            }
            handle_explore_command(&mut game, &input);
        }
    }

    log::info!("Undervault shut down cleanly");
    Ok(())
}

/// Ask for class and name, then generate the run.
fn setup_game(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Game> {
    print!("Choose your class - (w)arrior, (p)riestess, (t)hief: ");
    io::stdout().flush()?;
    let class = match next_line(lines)?.trim().to_lowercase().as_str() {
        "p" | "priestess" => HeroClass::Priestess,
        "t" | "thief" => HeroClass::Thief,
        _ => HeroClass::Warrior,
    };

    print!("Name your hero: ");
    io::stdout().flush()?;
    let name_input = next_line(lines)?.trim().to_string();
    let name = if name_input.is_empty() {
        "Adventurer".to_string()
    } else {
        name_input
    };

    print!("Difficulty - (e)asy or (n)ormal: ");
    io::stdout().flush()?;
    let strategy = match next_line(lines)?.trim().to_lowercase().as_str() {
        "e" | "easy" => GenerationStrategy::OpenGrid,
        _ => GenerationStrategy::SpanningTree,
    };

    let game = Game::new(class, name, DUNGEON_WIDTH, DUNGEON_HEIGHT, strategy, None)
        .context("dungeon generation failed")?;
    println!("(seed {})", game.seed());
    Ok(game)
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<String> {
    match lines.next() {
        Some(line) => line.context("failed to read input"),
        None => Ok(String::new()),
    }
}

fn handle_explore_command(game: &mut Game, input: &str) {
    match input {
        "n" | "north" => game.handle_move(Direction::North),
        "s" | "south" => game.handle_move(Direction::South),
        "e" | "east" => game.handle_move(Direction::East),
        "w" | "west" => game.handle_move(Direction::West),
        "h" | "heal" => game.drink_healing_potion(),
        "v" | "vision" => game.drink_vision_potion(),
        "m" | "map" => {
            println!("{}", game.dungeon().ascii_map(game.hero().location(), false));
        }
        "t" | "status" => println!("{}", game.hero().status_line()),
        "save" => match undervault::save::save_game(game, 1) {
            Ok(()) => println!("Saved to slot 1."),
            Err(e) => println!("Save failed: {}", e),
        },
        "load" => match undervault::save::load_game(1) {
            Ok(loaded) => {
                *game = loaded;
                println!("Loaded slot 1.");
            }
            Err(e) => println!("Load failed: {}", e),
        },
        "" => {}
        _ => println!("Unknown command."),
    }
}

fn handle_combat_command(game: &mut Game, input: &str) {
    let result = match input {
        "a" | "attack" => game.combat_round(false),
        "s" | "special" => game.combat_round(true),
        "h" | "heal" => {
            game.drink_healing_potion();
            None
        }
        "q" | "quit" => {
            println!("There is no fleeing the vault.");
            None
        }
        _ => {
            println!("Unknown command.");
            None
        }
    };

    if let Some(round) = result {
        for line in format_round_result(&round) {
            println!("{}", line);
        }
    }
}

fn print_messages(messages: Vec<GameMessage>) {
    for message in messages {
        match message.category {
            MessageCategory::Warning => println!("! {}", message.text),
            MessageCategory::Combat => println!("* {}", message.text),
            MessageCategory::Loot => println!("+ {}", message.text),
            MessageCategory::Info => println!("{}", message.text),
        }
    }
}
