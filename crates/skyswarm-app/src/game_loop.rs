//! The 60Hz game loop thread.
//!
//! The engine lives on this thread. Host messages arrive over an `mpsc`
//! channel and are drained at the top of every tick; the resulting
//! snapshot is parked in `SharedSnapshot` for polling.

use std::sync::mpsc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use skyswarm_core::commands::TickInput;
use skyswarm_core::constants::TICK_RATE;
use skyswarm_core::persistence::ScoreStore;
use skyswarm_core::state::GameStateSnapshot;
use skyswarm_sim::engine::{SimConfig, SimulationEngine};

use crate::state::{GameLoopCommand, SharedSnapshot};

/// Wall-clock length of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Start the loop thread and hand back its command sender.
pub fn spawn_game_loop(
    config: SimConfig,
    store: Box<dyn ScoreStore>,
    latest_snapshot: SharedSnapshot,
) -> std::io::Result<mpsc::Sender<GameLoopCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("skyswarm-game-loop".into())
        .spawn(move || {
            let engine = SimulationEngine::with_store(config, store);
            run(engine, cmd_rx, &latest_snapshot);
        })?;

    Ok(cmd_tx)
}

/// Apply every pending message. Returns false once the loop should exit.
pub fn drain_commands(
    engine: &mut SimulationEngine,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
    input: &mut TickInput,
) -> bool {
    loop {
        match cmd_rx.try_recv() {
            Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
            Ok(GameLoopCommand::Input(next)) => {
                input.held = next.held;
                input.presses.extend(next.presses);
            }
            Ok(GameLoopCommand::Shutdown) => return false,
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}

fn run(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let mut input = TickInput::idle();
    let mut deadline = Instant::now();
    log::info!("game loop started");

    while drain_commands(&mut engine, &cmd_rx, &mut input) {
        let snapshot = engine.tick(&input);
        input.presses.clear();

        if let Ok(mut slot) = latest_snapshot.lock() {
            *slot = Some(snapshot);
        }

        deadline += TICK_DURATION;
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        } else if now - deadline > TICK_DURATION * 2 {
            // More than two ticks late: drop the backlog instead of bursting.
            log::debug!("game loop fell behind by {:?}", now - deadline);
            deadline = now;
        }
    }

    log::info!("game loop stopped at tick {}", engine.time().tick);
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use skyswarm_core::commands::{HeldKeys, KeyPress, PlayerCommand};
    use skyswarm_core::enums::{DifficultyLevel, GamePhase};
    use skyswarm_core::persistence::MemoryStore;

    #[test]
    fn test_tick_duration_is_one_sixtieth() {
        assert_eq!(TICK_DURATION.as_nanos(), 1_000_000_000u128 / 60);
    }

    #[test]
    fn test_drain_queues_commands_and_merges_input() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        let mut input = TickInput::idle();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::NewGame {
            difficulty: DifficultyLevel::Hard.into(),
        }))
        .unwrap();
        tx.send(GameLoopCommand::Input(TickInput::pressing(KeyPress::NextWeapon)))
            .unwrap();
        tx.send(GameLoopCommand::Input(TickInput::holding(HeldKeys {
            fire: true,
            ..Default::default()
        })))
        .unwrap();

        assert!(drain_commands(&mut engine, &rx, &mut input));
        assert!(input.held.fire);
        assert_eq!(input.presses, vec![KeyPress::NextWeapon]);

        let snap = engine.tick(&input);
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.hud.difficulty, DifficultyLevel::Hard);

        tx.send(GameLoopCommand::Shutdown).unwrap();
        assert!(!drain_commands(&mut engine, &rx, &mut input));
        drop(tx);
        assert!(!drain_commands(&mut engine, &rx, &mut input));
    }

    #[test]
    fn test_loop_thread_publishes_snapshots() {
        let slot: SharedSnapshot = Arc::new(Mutex::new(None));
        let tx = spawn_game_loop(
            SimConfig::default(),
            Box::new(MemoryStore::default()),
            slot.clone(),
        )
        .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::NewGame {
            difficulty: DifficultyLevel::Normal.into(),
        }))
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut playing = false;
        while Instant::now() < deadline && !playing {
            std::thread::sleep(TICK_DURATION);
            playing = slot
                .lock()
                .unwrap()
                .as_ref()
                .is_some_and(|s| s.phase == GamePhase::Playing && s.time.tick > 0);
        }
        assert!(playing, "loop never reached a playing snapshot");
        tx.send(GameLoopCommand::Shutdown).unwrap();
    }

    #[test]
    fn test_snapshot_serializes_within_a_tick_budget() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.queue_command(PlayerCommand::NewGame {
            difficulty: DifficultyLevel::Normal.into(),
        });
        let mut snapshot = engine.tick(&TickInput::idle());
        for _ in 0..50 {
            snapshot = engine.tick(&TickInput::idle());
        }

        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();
        assert!(
            elapsed < Duration::from_millis(3),
            "snapshot serialization took {elapsed:?}"
        );
        assert!(json.contains("\"phase\""));
    }
}
