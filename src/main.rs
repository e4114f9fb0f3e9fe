//! LLM RPG - Entry Point
//!
//! Runs a fixed-tick loop over the game session. Stdin is read on its own
//! thread so the loop keeps ticking while the player thinks.

use clap::Parser;
use llm_rpg::battle::InputEvent;
use llm_rpg::core::error::{Result, RpgError};
use llm_rpg::core::types::StatType;
use llm_rpg::core::GameConfig;
use llm_rpg::entity::{Hero, HeroClass, HeroClassKind};
use llm_rpg::game::{Game, GameSceneKind};
use llm_rpg::llm::{self, LlmClient};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

const TICKS_PER_SECOND: u32 = 20;

/// Turn-based RPG where a language model judges your actions
#[derive(Parser, Debug)]
#[command(name = "llm-rpg")]
struct Args {
    /// TOML config file; defaults are used for anything it omits
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hero name
    #[arg(long, default_value = "Hero")]
    name: String,

    /// Hero class: attack, defense, or focus
    #[arg(long, default_value = "attack")]
    class: HeroClassKind,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Show full damage breakdowns
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("llm_rpg=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => GameConfig::load_from_toml(path)?,
        None => GameConfig::default(),
    };
    config.debug_mode |= args.debug;

    let client = LlmClient::from_config(&config.llm)?;
    let collaborators = llm::collaborators(client, &config.prompts);

    let class = HeroClass::from_config(args.class, &config.hero.classes);
    let hero = Hero::new(&args.name, &class, &config.hero)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, class = %class.class_name, "LLM RPG starting");

    let rt = Runtime::new()?;
    let mut game = Game::new(hero, config, collaborators, rt.handle().clone(), seed)?;

    println!("\n=== LLM RPG ===");
    println!("Type your actions in plain words. Type `quit` to leave.\n");

    let lines = spawn_stdin_reader();
    let tick = Duration::from_secs(1) / TICKS_PER_SECOND;
    let dt = tick.as_secs_f64();
    let mut last_screen = String::new();

    loop {
        let started = Instant::now();

        match lines.try_recv() {
            Ok(line) => {
                if line.trim() == "quit" {
                    break;
                }
                if let Err(e) = dispatch(&mut game, line) {
                    match e {
                        RpgError::InvalidAction(_) | RpgError::Inventory(_) => println!("{}", e),
                        other => return Err(other),
                    }
                    last_screen.clear();
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        game.update(dt)?;

        let screen = game.render();
        if screen != last_screen {
            println!("\n{}", screen);
            last_screen = screen;
        }
        if game.is_over() {
            break;
        }

        if let Some(remaining) = tick.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }

    tracing::info!(battles_won = game.battles_won(), "LLM RPG exiting");
    Ok(())
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn dispatch(game: &mut Game, line: String) -> Result<()> {
    match game.scene_kind() {
        GameSceneKind::Battle => game.handle_input(InputEvent::Line(line)),
        GameSceneKind::RestingHub => {
            let words: Vec<&str> = line.split_whitespace().collect();
            match words.as_slice() {
                ["level", stat] => game.level_up(parse_stat(stat)?),
                ["take", n] => game.pick_up(parse_index(n)?),
                ["swap", n, slot] => game
                    .replace(parse_index(n)?, parse_index(slot)?)
                    .map(|dropped| println!("Dropped {}.", dropped.name())),
                ["skip"] => game.skip_item(),
                ["fight"] => game.start_next_battle(),
                _ => Err(RpgError::InvalidAction(format!("unknown command: {}", line))),
            }
        }
        GameSceneKind::Loading | GameSceneKind::GameOver => Ok(()),
    }
}

fn parse_stat(word: &str) -> Result<StatType> {
    match word {
        "attack" => Ok(StatType::Attack),
        "defense" => Ok(StatType::Defense),
        "focus" => Ok(StatType::Focus),
        "hp" | "max_hp" => Ok(StatType::MaxHp),
        other => Err(RpgError::InvalidAction(format!("unknown stat: {}", other))),
    }
}

/// One-based index from the player to a zero-based one
fn parse_index(word: &str) -> Result<usize> {
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(RpgError::InvalidAction(format!("not a number: {}", word))),
    }
}
