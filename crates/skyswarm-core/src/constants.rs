//! Simulation constants and tuning parameters.
//!
//! Distances are screen units, speeds are units per tick, durations are
//! milliseconds of session time.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Milliseconds per tick.
pub const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;

// --- Play field ---

pub const FIELD_WIDTH: f64 = 720.0;
pub const FIELD_HEIGHT: f64 = 960.0;

// --- Player ship ---

pub const PLAYER_WIDTH: f64 = 40.0;
pub const PLAYER_HEIGHT: f64 = 30.0;
/// Spawn point (center) of a fresh ship.
pub const PLAYER_SPAWN_X: f64 = FIELD_WIDTH / 2.0;
pub const PLAYER_SPAWN_Y: f64 = FIELD_HEIGHT - 60.0;
/// Gap kept between the ship's bottom edge and the field bottom.
pub const PLAYER_BOTTOM_MARGIN: f64 = 20.0;
pub const PLAYER_MAX_LIVES: u32 = 5;
/// Invulnerability window after taking a hit.
pub const PLAYER_INVULNERABLE_MS: f64 = 2000.0;
/// Horizontal offset of twin shots from the ship edges when double-fighter.
pub const TWIN_SHOT_INSET: f64 = 10.0;

// --- Enemies ---

pub const ENEMY_SIZE: f64 = 30.0;
pub const TANK_WIDTH: f64 = 44.0;
pub const TANK_HEIGHT: f64 = 40.0;
pub const KAMIKAZE_SIZE: f64 = 32.0;
pub const SPLITTER_SIZE: f64 = 38.0;
pub const SPLIT_CHILD_SIZE: f64 = 24.0;
pub const BOSS_WIDTH: f64 = 50.0;
pub const BOSS_HEIGHT: f64 = 40.0;

/// Distance at which an entry waypoint counts as reached.
pub const PATH_ARRIVAL_THRESHOLD: f64 = 5.0;
/// Formation idle sway amplitude and angular rate (per ms).
pub const FORMATION_SWAY_AMPLITUDE: f64 = 2.0;
pub const FORMATION_SWAY_RATE: f64 = 0.002;
/// Per-entity sway phase is drawn from [0, this).
pub const FORMATION_PHASE_RANGE: f64 = 100.0;

/// Entering enemies spawn this far above the field.
pub const ENEMY_SPAWN_Y: f64 = -50.0;
/// Horizontal offset of each split child from its parent.
pub const SPLIT_OFFSET: f64 = 20.0;

// --- Boss patterns ---

pub const BOSS_PATTERN_CHANCE: f64 = 0.005;
pub const BOSS_DIVE_DURATION_MS: f64 = 5000.0;
pub const BOSS_SPIRAL_DURATION_MS: f64 = 3000.0;
pub const BOSS_STRAFE_DURATION_MS: f64 = 4000.0;
pub const BOSS_DIVE_MARGIN_X: f64 = 100.0;
/// Dive target sits this far above the field bottom.
pub const BOSS_DIVE_FLOOR_OFFSET: f64 = 150.0;
pub const BOSS_DIVE_ARRIVAL_THRESHOLD: f64 = 10.0;
pub const BOSS_DIVE_SPEED_FACTOR: f64 = 2.5;
pub const BOSS_RETURN_SPEED_FACTOR: f64 = 2.0;
pub const BOSS_STRAFE_SPEED_FACTOR: f64 = 2.0;
pub const BOSS_STRAFE_MARGIN: f64 = 50.0;
/// Spiral angle advance per tick (degrees).
pub const BOSS_SPIRAL_STEP_DEG: f64 = 5.0;
pub const BOSS_SPIRAL_RADIUS_X: f64 = 30.0;
pub const BOSS_SPIRAL_RADIUS_Y: f64 = 20.0;

// --- Enemy fire ---

pub const BOSS_IDLE_FIRE_COOLDOWN_MS: f64 = 500.0;
pub const BOSS_DIVE_FIRE_CHANCE: f64 = 0.1;
pub const BOSS_DIVE_FIRE_COOLDOWN_MS: f64 = 200.0;
pub const BOSS_SPIRAL_FIRE_COOLDOWN_MS: f64 = 150.0;
pub const BOSS_STRAFE_FIRE_CHANCE: f64 = 0.08;
pub const BOSS_STRAFE_FIRE_COOLDOWN_MS: f64 = 300.0;
/// Horizontal muzzle offsets of the strafe triple shot.
pub const BOSS_STRAFE_SPREAD: [f64; 3] = [-15.0, 0.0, 15.0];

// --- Kamikaze ---

pub const KAMIKAZE_ACTIVATION_CHANCE: f64 = 0.008;
pub const KAMIKAZE_CHASE_FACTOR: f64 = 2.0;

// --- Projectiles ---

pub const BULLET_SPEED: f64 = 7.0;
pub const ENEMY_BULLET_WIDTH: f64 = 4.0;
pub const ENEMY_BULLET_HEIGHT: f64 = 15.0;
/// Homing steering blend toward the target heading per tick.
pub const HOMING_TURN_RATE: f64 = 0.1;
/// Wave-pattern phase advance per tick (rad), lateral amplitude, and the
/// fraction of the amplitude applied as drift each tick.
pub const WAVE_PHASE_STEP: f64 = 0.3;
pub const WAVE_AMPLITUDE: f64 = 30.0;
pub const WAVE_DRIFT_SCALE: f64 = 0.1;

// --- Tractor beam ---

pub const TRACTOR_BEAM_WIDTH: f64 = 30.0;
pub const TRACTOR_BEAM_HEIGHT: f64 = 100.0;
pub const TRACTOR_BEAM_SPEED: f64 = 3.0;
pub const TRACTOR_BEAM_CHANCE: f64 = 0.002;
pub const TRACTOR_BEAM_COOLDOWN_MS: f64 = 5000.0;
pub const CAPTURE_TIME_MS: f64 = 1000.0;

// --- Power-ups ---

pub const POWERUP_SIZE: f64 = 24.0;
pub const POWERUP_FALL_SPEED: f64 = 2.0;
pub const POWERUP_LIFETIME_MS: f64 = 8000.0;
pub const POWERUP_BLINK_AFTER_MS: f64 = 6000.0;
pub const POWERUP_BLINK_PERIOD_MS: f64 = 100.0;
pub const BUFF_MAX_LEVEL: u32 = 3;
pub const SPEED_BUFF_DURATION_MS: f64 = 10_000.0;
pub const POWER_BUFF_DURATION_MS: f64 = 15_000.0;
pub const MULTI_SHOT_DURATION_MS: f64 = 12_000.0;
pub const SHIELD_DURATION_MS: f64 = 8000.0;
pub const RAPID_FIRE_DURATION_MS: f64 = 10_000.0;
/// Speed multiplier gained per speed-buff level.
pub const SPEED_BUFF_STEP: f64 = 0.5;

// --- Waves ---

pub const BASE_FORMATION_ROWS: u32 = 4;
pub const MAX_FORMATION_ROWS: u32 = 6;
pub const MAX_FORMATION_COLUMNS: u32 = 10;
pub const FORMATION_PADDING: f64 = 50.0;
pub const FORMATION_TOP: f64 = 80.0;
pub const FORMATION_ROW_SPACING: f64 = 50.0;
pub const BONUS_STAGE_INTERVAL: u32 = 3;
pub const BONUS_STAGE_ENEMIES: u32 = 20;
pub const BONUS_STAGE_COLUMNS: u32 = 5;
pub const BONUS_STAGE_TIME_LIMIT_MS: f64 = 20_000.0;
pub const STAGE_CLEAR_DELAY_MS: f64 = 2000.0;

// --- Circle entry path ---

pub const CIRCLE_PATH_RADIUS: f64 = 150.0;
pub const CIRCLE_PATH_STEPS: u32 = 30;

// --- Scoring / meters ---

pub const SCORE_RESCUE: u64 = 1000;
pub const COMBO_TIMEOUT_MS: f64 = 2000.0;
/// Combo count from which the streak is reported to the player.
pub const COMBO_ANNOUNCE_THRESHOLD: u32 = 3;
pub const ULTIMATE_CHARGE_MAX: u32 = 100;
pub const ULTIMATE_CHARGE_PER_KILL: u32 = 5;
pub const ULTIMATE_DURATION_MS: f64 = 1000.0;
pub const ULTIMATE_MAX_RADIUS: f64 = 800.0;
pub const ULTIMATE_DAMAGE: i32 = 999;

// --- Ranking ---

pub const RANKING_MAX: usize = 5;
pub const RANKING_NAME_MAX_LEN: usize = 8;
pub const RANKING_DEFAULT_NAME: &str = "PLAYER";
