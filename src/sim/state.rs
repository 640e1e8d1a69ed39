//! Game state and core simulation types
//!
//! A [`SimulationState`] is one session: everything in it is created by a
//! reset and discarded by the next one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{PLAYER_START_X, PLAYER_START_Y};
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Player alive, simulation advancing
    Playing,
    /// Collision happened; simulation frozen until reset
    GameOver,
}

/// Notable things that happened during a tick, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ObstacleSpawned,
    /// Obstacles pruned off the left edge this tick
    ObstaclesPassed { count: u32 },
    GameOver { score: u64 },
}

/// The player's circle
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per second
    pub speed: f32,
}

impl Player {
    fn spawn(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.width * PLAYER_START_X, tuning.height * PLAYER_START_Y),
            radius: tuning.player_radius,
            speed: tuning.player_speed,
        }
    }

    /// Keep the whole circle inside the playfield
    pub fn clamp_to(&mut self, width: f32, height: f32) {
        let r = self.radius;
        self.pos.x = self.pos.x.clamp(r, width - r);
        self.pos.y = self.pos.y.clamp(r, height - r);
    }
}

/// A frog drifting leftward at a fixed speed
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub radius: f32,
    /// Leftward speed (pixels per second, always positive)
    pub speed: f32,
}

impl Obstacle {
    /// Fully past the left edge plus the prune margin
    #[inline]
    pub fn is_gone(&self, prune_margin: f32) -> bool {
        self.pos.x <= -self.radius - prune_margin
    }
}

/// Read-only snapshot handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub width: f32,
    pub height: f32,
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub alive: bool,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    pub player: Player,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Seconds until the next spawn
    pub spawn_timer: f32,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl SimulationState {
    /// Start a fresh session
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        log::info!("New session (seed {})", seed);
        Self {
            seed,
            player: Player::spawn(&tuning),
            phase: GamePhase::Playing,
            score: 0,
            obstacles: Vec::new(),
            spawn_timer: 0.0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Throw away the current session and start another with the same tuning
    pub fn reset(&mut self, seed: u64) {
        *self = Self::new(self.tuning.clone(), seed);
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Seconds between spawns at the current score
    #[inline]
    pub fn spawn_interval(&self) -> f32 {
        self.tuning.spawn_interval(self.score)
    }

    /// Append one obstacle just past the right edge
    pub fn spawn_obstacle(&mut self) {
        let t = &self.tuning;
        let radius = self
            .rng
            .random_range(t.obstacle_radius_min..=t.obstacle_radius_max);
        let y = self.rng.random_range(radius..=t.height - radius);
        let speed = self
            .rng
            .random_range(t.obstacle_speed_min..=t.obstacle_speed_max);

        let obstacle = Obstacle {
            pos: Vec2::new(t.width + radius + t.spawn_margin, y),
            radius,
            speed,
        };
        log::trace!("Spawned obstacle {:?}", obstacle);
        self.obstacles.push(obstacle);
        self.events.push(GameEvent::ObstacleSpawned);
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn view(&self) -> SceneView<'_> {
        SceneView {
            width: self.tuning.width,
            height: self.tuning.height,
            player: &self.player,
            obstacles: &self.obstacles,
            alive: self.is_alive(),
        }
    }
}
