//! Frog Dodge - steer a circle through waves of leftward-drifting frogs
//!
//! Core modules:
//! - `sim`: Simulation (movement, spawning, pruning, collisions, score)
//! - `input`: Held-key tracking and movement intent
//! - `driver`: Frame clock, per-frame update/render sequencing, HUD sinks
//! - `renderer`: Scene painting and the WebGPU SDF pipeline
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod input;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use driver::{FrameClock, Game, Hud};
pub use input::{InputState, Key};
pub use tuning::{Tuning, TuningError};

/// Default game configuration constants
pub mod consts {
    /// Playfield dimensions (logical pixels)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 450.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 12.0;
    pub const PLAYER_SPEED: f32 = 240.0;
    /// Spawn position as a fraction of the playfield
    pub const PLAYER_START_X: f32 = 0.15;
    pub const PLAYER_START_Y: f32 = 0.5;

    /// Spawn interval ramp: max(FLOOR, BASE - STEP * score)
    pub const SPAWN_INTERVAL_BASE: f32 = 0.9;
    pub const SPAWN_INTERVAL_STEP: f32 = 0.01;
    pub const SPAWN_INTERVAL_FLOOR: f32 = 0.25;

    /// Obstacle draw ranges
    pub const OBSTACLE_RADIUS_MIN: f32 = 10.0;
    pub const OBSTACLE_RADIUS_MAX: f32 = 18.0;
    pub const OBSTACLE_SPEED_MIN: f32 = 140.0;
    pub const OBSTACLE_SPEED_MAX: f32 = 260.0;

    /// Obstacles enter at x = W + r + SPAWN_MARGIN
    pub const SPAWN_MARGIN: f32 = 4.0;
    /// Obstacles leave once x <= -r - PRUNE_MARGIN
    pub const PRUNE_MARGIN: f32 = 10.0;

    /// Largest delta a single frame may advance (seconds)
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Status line shown on game over
    pub const GAME_OVER_MESSAGE: &str = "💥 You got frogged. Press R to restart.";
}
