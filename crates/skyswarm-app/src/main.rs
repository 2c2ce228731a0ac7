use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use skyswarm_app::autopilot::Autopilot;
use skyswarm_app::game_loop::TICK_DURATION;
use skyswarm_app::host::{self, HostError};
use skyswarm_app::state::AppState;
use skyswarm_app::store::JsonScoreStore;
use skyswarm_core::commands::PlayerCommand;
use skyswarm_core::enums::{DifficultyLevel, GamePhase};
use skyswarm_core::persistence::{MemoryStore, ScoreStore};
use skyswarm_core::state::GameStateSnapshot;
use skyswarm_sim::engine::{SimConfig, SimulationEngine};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl From<Difficulty> for DifficultyLevel {
    fn from(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => DifficultyLevel::Easy,
            Difficulty::Normal => DifficultyLevel::Normal,
            Difficulty::Hard => DifficultyLevel::Hard,
        }
    }
}

/// Run a Skyswarm session flown by the autopilot.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// RNG seed. Same seed, same game.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,

    /// Tick limit for the session.
    #[arg(long, default_value_t = 36_000)]
    ticks: u64,

    /// Directory for the high score and ranking files. In-memory when omitted.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Run on the 60Hz game loop thread instead of as fast as possible.
    #[arg(long)]
    realtime: bool,

    /// Name entered if the final score makes the ranking.
    #[arg(long, default_value = "AUTO")]
    name: String,
}

fn open_store(data_dir: Option<&PathBuf>) -> Box<dyn ScoreStore> {
    match data_dir {
        Some(dir) => Box::new(JsonScoreStore::new(dir)),
        None => Box::new(MemoryStore::default()),
    }
}

/// Drive the engine directly, one tick per loop iteration.
fn run_fast(args: &Args, config: SimConfig) -> GameStateSnapshot {
    let mut engine = SimulationEngine::with_store(config, open_store(args.data_dir.as_ref()));
    let pilot = Autopilot::new();

    engine.queue_command(PlayerCommand::NewGame {
        difficulty: config.difficulty.into(),
    });
    let mut snapshot = engine.snapshot();
    for _ in 0..args.ticks {
        let input = pilot.decide(&snapshot);
        snapshot = engine.tick(&input);
        if snapshot.phase == GamePhase::GameOver {
            break;
        }
    }

    if engine.pending_rank().is_some() {
        engine.queue_command(PlayerCommand::SubmitRankingName {
            name: args.name.clone(),
        });
        snapshot = engine.tick(&Default::default());
    }
    snapshot
}

/// Drive the game loop thread through the host entry points.
fn run_realtime(args: &Args, config: SimConfig) -> Result<GameStateSnapshot, HostError> {
    let state = AppState::new();
    host::start_simulation(&state, config, open_store(args.data_dir.as_ref()))?;
    host::send_command(
        &state,
        PlayerCommand::NewGame {
            difficulty: config.difficulty.into(),
        },
    )?;

    let pilot = Autopilot::new();
    let mut last_tick = 0;
    let mut latest = GameStateSnapshot::default();
    loop {
        std::thread::sleep(TICK_DURATION);
        let Some(snapshot) = host::get_snapshot(&state)? else {
            continue;
        };
        if snapshot.time.tick == last_tick && snapshot.phase != GamePhase::GameOver {
            continue;
        }
        last_tick = snapshot.time.tick;
        host::send_input(&state, pilot.decide(&snapshot))?;
        let done = snapshot.phase == GamePhase::GameOver || snapshot.time.tick >= args.ticks;
        latest = snapshot;
        if done {
            break;
        }
    }

    if latest.hud.pending_rank.is_some() {
        host::send_command(
            &state,
            PlayerCommand::SubmitRankingName {
                name: args.name.clone(),
            },
        )?;
        // Give the loop a few ticks to apply it.
        std::thread::sleep(Duration::from_millis(100));
        if let Some(snapshot) = host::get_snapshot(&state)? {
            latest = snapshot;
        }
    }

    host::shutdown(&state)?;
    Ok(latest)
}

fn main() -> Result<(), HostError> {
    env_logger::init();
    let args = Args::parse();
    let config = SimConfig {
        seed: args.seed,
        difficulty: args.difficulty.into(),
    };

    let snapshot = if args.realtime {
        run_realtime(&args, config)?
    } else {
        run_fast(&args, config)
    };

    let hud = &snapshot.hud;
    println!(
        "{:?} after {} ticks: wave {}, score {}, high score {}, max combo {}",
        snapshot.phase, snapshot.time.tick, hud.wave, hud.score, hud.high_score, hud.max_combo
    );
    for (i, entry) in hud.ranking.iter().enumerate() {
        println!("{:>2}. {:<10} {}", i + 1, entry.name, entry.score);
    }
    Ok(())
}
