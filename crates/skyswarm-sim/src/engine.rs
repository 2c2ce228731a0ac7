//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes session commands
//! and per-tick input, runs all systems in a fixed order, and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skyswarm_core::commands::{HeldKeys, KeyPress, PlayerCommand, TickInput};
use skyswarm_core::components::{Behavior, BehaviorState, Enemy};
use skyswarm_core::constants::STAGE_CLEAR_DELAY_MS;
use skyswarm_core::difficulty::DifficultyConfig;
use skyswarm_core::enums::{DifficultyLevel, EffectLevel, GamePhase, SoundCue};
use skyswarm_core::events::GameEvent;
use skyswarm_core::persistence::{MemoryStore, ScoreStore};
use skyswarm_core::state::GameStateSnapshot;
use skyswarm_core::types::SimTime;

use crate::ranking::Ranking;
use crate::session::Session;
use crate::systems;
use crate::systems::collision::CollisionReport;
use crate::systems::wave_spawner::{self, WaveState};
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Preset used until a `NewGame` command picks another.
    pub difficulty: DifficultyLevel,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: DifficultyLevel::Normal,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    session: Session,
    ranking: Ranking,
    /// Rank earned by the last game, waiting for a name.
    pending_rank: Option<usize>,
    /// The high score beaten this session has already been written out.
    high_score_saved: bool,
    store: Box<dyn ScoreStore>,
}

impl SimulationEngine {
    /// Create a new simulation engine with an in-memory score store.
    pub fn new(config: SimConfig) -> Self {
        Self::with_store(config, Box::new(MemoryStore::default()))
    }

    /// Create a new simulation engine persisting through `store`.
    pub fn with_store(config: SimConfig, store: Box<dyn ScoreStore>) -> Self {
        let high_score = store.load_high_score();
        let ranking = Ranking::from_entries(store.load_ranking());
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            session: Session::new(DifficultyConfig::preset(config.difficulty), high_score),
            ranking,
            pending_rank: None,
            high_score_saved: false,
            store,
        }
    }

    /// Queue a session command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self, input: &TickInput) -> GameStateSnapshot {
        self.process_commands();
        for press in &input.presses {
            self.handle_press(*press);
        }

        match self.phase {
            GamePhase::Playing => self.run_systems(&input.held),
            GamePhase::StageClear => self.run_stage_clear(),
            GamePhase::Title | GamePhase::Paused | GamePhase::GameOver => {}
        }

        self.snapshot()
    }

    /// Build a snapshot of the current state, draining pending events.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.session.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.session,
            &self.ranking,
            self.pending_rank,
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for scripted scenarios.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable session access for scripted scenarios.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn pending_rank(&self) -> Option<usize> {
        self.pending_rank
    }

    /// Run one collision pass at the current time without moving anything,
    /// then compact the world.
    pub fn resolve_collisions(&mut self) -> CollisionReport {
        let report = systems::collision::run(&mut self.world, &mut self.rng, &mut self.session);
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        self.persist_high_score();
        if report.game_over {
            self.finish_game();
        }
        report
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single session command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::NewGame { difficulty } => self.new_game(difficulty),
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Playing {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Playing;
                }
            }
            PlayerCommand::SubmitRankingName { name } => {
                if self.phase != GamePhase::GameOver || self.pending_rank.is_none() {
                    return;
                }
                let score = self.session.score.score;
                let rank = self.ranking.insert(&name, score);
                self.pending_rank = None;
                self.store.save_ranking(&self.ranking.entries);
                log::info!("ranking entry {:?} for {score} points", rank);
            }
            PlayerCommand::ReturnToTitle => {
                if self.phase == GamePhase::GameOver {
                    self.world.clear();
                    self.pending_rank = None;
                    self.phase = GamePhase::Title;
                }
            }
        }
    }

    /// Handle a discrete key press.
    fn handle_press(&mut self, press: KeyPress) {
        match (press, self.phase) {
            (KeyPress::Pause, GamePhase::Playing) => self.phase = GamePhase::Paused,
            (KeyPress::Pause, GamePhase::Paused) => self.phase = GamePhase::Playing,
            (KeyPress::NextWeapon, GamePhase::Playing) => self.cycle_weapon(1),
            (KeyPress::PreviousWeapon, GamePhase::Playing) => self.cycle_weapon(-1),
            (KeyPress::Ultimate, GamePhase::Playing) => {
                systems::ultimate::trigger(&mut self.session);
            }
            _ => {}
        }
    }

    fn cycle_weapon(&mut self, direction: i32) {
        let name = self.session.pilot.cycle_weapon(direction);
        self.session.emit(GameEvent::Message {
            text: name.to_string(),
        });
    }

    /// Reset the world and start wave 1.
    fn new_game(&mut self, difficulty: DifficultyConfig) {
        self.world.clear();
        self.time = SimTime::default();
        let level = difficulty.level;
        self.session = Session::new(difficulty, self.store.load_high_score());
        self.pending_rank = None;
        self.high_score_saved = false;

        world_setup::spawn_player(&mut self.world, &mut self.session.next_serial);
        self.begin_wave(1);
        self.phase = GamePhase::Playing;
        log::info!("new game on {:?}", level);
    }

    fn begin_wave(&mut self, number: u32) {
        let bonus = wave_spawner::is_bonus_wave(number);
        self.session.wave = WaveState {
            number,
            bonus,
            started_ms: self.session.now_ms,
            cleared_at_ms: None,
        };
        let spawned = wave_spawner::create_wave(
            &mut self.world,
            &mut self.rng,
            &mut self.session.next_serial,
            &self.session.difficulty,
            number,
        );
        log::info!("wave {number} started with {} enemies", spawned.len());
        self.session.emit(GameEvent::WaveStarted {
            wave: number,
            bonus,
        });
        if bonus {
            self.session.emit(GameEvent::Message {
                text: "BONUS STAGE!".to_string(),
            });
        }
    }

    fn advance_clock(&mut self) {
        self.time.advance();
        let now = self.time.elapsed_ms;
        self.session.now_ms = now;
        self.session.combo.tick(now);
        self.session.buffs.update(now);
    }

    /// Run all systems in order.
    fn run_systems(&mut self, held: &HeldKeys) {
        // 1. Clock and timers
        self.advance_clock();
        // 2. Player ship
        systems::player_control::run(&mut self.world, &mut self.session, held);
        // 3. Enemy behavior, fire, beams
        systems::enemy_behavior::run(&mut self.world, &mut self.rng, &mut self.session);
        // 4. Projectiles, beams, pickups
        systems::projectiles::run(&mut self.world);
        systems::movement::run_beams(&mut self.world);
        systems::movement::run_pickups(&mut self.world, self.session.now_ms);
        // 5. Ultimate blast
        systems::ultimate::run(&mut self.world, &mut self.rng, &mut self.session);
        // 6. Collision and resolution
        let report = systems::collision::run(&mut self.world, &mut self.rng, &mut self.session);
        // 7. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        self.persist_high_score();

        // 8. Game over or wave completion
        if report.game_over {
            self.finish_game();
        } else {
            self.check_wave_complete();
        }
    }

    /// Entities hold still between waves; only timers run.
    fn run_stage_clear(&mut self) {
        self.advance_clock();
        systems::ultimate::run(&mut self.world, &mut self.rng, &mut self.session);

        let cleared_at = self.session.wave.cleared_at_ms.unwrap_or(self.session.now_ms);
        if self.session.now_ms - cleared_at >= STAGE_CLEAR_DELAY_MS {
            self.begin_wave(self.session.wave.number + 1);
            self.phase = GamePhase::Playing;
        }
    }

    fn live_enemy_count(&self) -> usize {
        self.world
            .query::<(&Enemy, &Behavior)>()
            .iter()
            .filter(|(_, (_, behavior))| behavior.state != BehaviorState::Dead)
            .count()
    }

    fn check_wave_complete(&mut self) {
        let now = self.session.now_ms;
        let wave = self.session.wave.number;

        if self.session.wave.bonus_time_remaining(now) == Some(0.0) {
            let mut remaining = 0;
            for (_entity, (_enemy, behavior)) in self.world.query_mut::<(&Enemy, &mut Behavior)>() {
                if behavior.state != BehaviorState::Dead {
                    behavior.state = BehaviorState::Dead;
                    remaining += 1;
                }
            }
            if remaining > 0 {
                log::info!("bonus stage {wave} expired with {remaining} survivors");
                self.session
                    .emit(GameEvent::BonusStageExpired { wave, remaining });
                systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
            }
        }

        if self.live_enemy_count() > 0 {
            return;
        }
        self.session.wave.cleared_at_ms = Some(now);
        self.phase = GamePhase::StageClear;
        log::info!("wave {wave} cleared at {now:.0} ms");
        self.session.emit(GameEvent::WaveCleared { wave });
        self.session.emit(GameEvent::Sound {
            cue: SoundCue::StageClear,
        });
    }

    /// Write the high score out the first time it is beaten.
    fn persist_high_score(&mut self) {
        if self.session.high_score_announced && !self.high_score_saved {
            self.store.save_high_score(self.session.score.high_score);
            self.high_score_saved = true;
        }
    }

    fn finish_game(&mut self) {
        let score = self.session.score.score;
        self.phase = GamePhase::GameOver;
        self.store.save_high_score(self.session.score.high_score);
        self.pending_rank = self.ranking.potential_rank(score);

        log::info!(
            "game over: score {score}, wave {}, rank {:?}",
            self.session.wave.number,
            self.pending_rank
        );
        self.session.emit(GameEvent::GameOver {
            score,
            rank: self.pending_rank,
        });
        self.session.emit(GameEvent::Sound {
            cue: SoundCue::GameOver,
        });
        self.session.emit(GameEvent::ScreenShake {
            level: EffectLevel::Large,
        });
    }
}
