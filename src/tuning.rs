//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults reproduce the
//! shipped game; a JSON document may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield width (W)
    pub width: f32,
    /// Playfield height (H)
    pub height: f32,

    pub player_radius: f32,
    /// Pixels per second along an axis
    pub player_speed: f32,

    /// Spawn interval at score 0 (seconds)
    pub spawn_interval_base: f32,
    /// Interval reduction per point of score
    pub spawn_interval_step: f32,
    /// Interval never drops below this
    pub spawn_interval_floor: f32,

    pub obstacle_radius_min: f32,
    pub obstacle_radius_max: f32,
    pub obstacle_speed_min: f32,
    pub obstacle_speed_max: f32,
    /// Gap between a fresh obstacle and the right edge
    pub spawn_margin: f32,
    /// Distance past the left edge before an obstacle is pruned
    pub prune_margin: f32,

    /// Upper bound on a single frame's delta (seconds)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            spawn_interval_base: SPAWN_INTERVAL_BASE,
            spawn_interval_step: SPAWN_INTERVAL_STEP,
            spawn_interval_floor: SPAWN_INTERVAL_FLOOR,
            obstacle_radius_min: OBSTACLE_RADIUS_MIN,
            obstacle_radius_max: OBSTACLE_RADIUS_MAX,
            obstacle_speed_min: OBSTACLE_SPEED_MIN,
            obstacle_speed_max: OBSTACLE_SPEED_MAX,
            spawn_margin: SPAWN_MARGIN,
            prune_margin: PRUNE_MARGIN,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document. Absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a JSON document from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from an optional source, falling back to defaults on any failure
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning ({}x{} playfield)", tuning.width, tuning.height);
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring tuning: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("player_radius", self.player_radius),
            ("player_speed", self.player_speed),
            ("spawn_interval_base", self.spawn_interval_base),
            ("spawn_interval_step", self.spawn_interval_step),
            ("spawn_interval_floor", self.spawn_interval_floor),
            ("obstacle_radius_min", self.obstacle_radius_min),
            ("obstacle_radius_max", self.obstacle_radius_max),
            ("obstacle_speed_min", self.obstacle_speed_min),
            ("obstacle_speed_max", self.obstacle_speed_max),
            ("spawn_margin", self.spawn_margin),
            ("prune_margin", self.prune_margin),
            ("max_frame_dt", self.max_frame_dt),
        ];
        // JSON numbers past f32::MAX parse as infinity
        if let Some(&(field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(field, "must be finite");
        }

        if !(self.width > 0.0) {
            return invalid("width", "must be positive");
        }
        if !(self.height > 0.0) {
            return invalid("height", "must be positive");
        }
        if !(self.player_radius > 0.0) {
            return invalid("player_radius", "must be positive");
        }
        if 2.0 * self.player_radius > self.width.min(self.height) {
            return invalid("player_radius", "player does not fit the playfield");
        }
        if self.player_speed < 0.0 {
            return invalid("player_speed", "must not be negative");
        }
        if !(self.spawn_interval_floor > 0.0) {
            return invalid("spawn_interval_floor", "must be positive");
        }
        if self.spawn_interval_step < 0.0 {
            return invalid("spawn_interval_step", "must not be negative");
        }
        if !(self.obstacle_radius_min > 0.0) {
            return invalid("obstacle_radius_min", "must be positive");
        }
        if self.obstacle_radius_max < self.obstacle_radius_min {
            return invalid("obstacle_radius_max", "must be >= obstacle_radius_min");
        }
        if 2.0 * self.obstacle_radius_max > self.height {
            return invalid("obstacle_radius_max", "obstacle does not fit the playfield");
        }
        if !(self.obstacle_speed_min > 0.0) {
            return invalid("obstacle_speed_min", "must be positive");
        }
        if self.obstacle_speed_max < self.obstacle_speed_min {
            return invalid("obstacle_speed_max", "must be >= obstacle_speed_min");
        }
        if !(self.max_frame_dt > 0.0) {
            return invalid("max_frame_dt", "must be positive");
        }
        Ok(())
    }

    /// Seconds between spawns at the given score
    #[inline]
    pub fn spawn_interval(&self, score: u64) -> f32 {
        (self.spawn_interval_base - score as f32 * self.spawn_interval_step)
            .max(self.spawn_interval_floor)
    }
}
