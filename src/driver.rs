//! Frame driver
//!
//! Owns one session plus everything around it: the held-key set, the frame
//! clock, the score/status sinks and the recorded scene. The platform shell
//! calls [`Game::frame`] once per display refresh and forwards key events.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::GAME_OVER_MESSAGE;
use crate::input::{InputState, Key};
use crate::renderer::{DrawList, paint};
use crate::sim::{GameEvent, SimulationState, autopilot, tick};
use crate::tuning::Tuning;

/// Text outputs next to the playfield
pub trait Hud {
    /// Called every frame with the current score
    fn set_score(&mut self, score: u64);
    /// Called on game over and (with an empty string) on reset
    fn set_status(&mut self, status: &str);
}

/// Wall-clock to simulation delta conversion
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_time_ms: f64,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(now_ms: f64, max_dt: f32) -> Self {
        Self {
            last_time_ms: now_ms,
            max_dt,
        }
    }

    pub fn restart(&mut self, now_ms: f64) {
        self.last_time_ms = now_ms;
    }

    /// Seconds since the previous call, clamped to `[0, max_dt]`
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = ((now_ms - self.last_time_ms) / 1000.0) as f32;
        self.last_time_ms = now_ms;
        dt.clamp(0.0, self.max_dt)
    }
}

/// A running game: session state plus its surroundings
pub struct Game<H: Hud> {
    pub state: SimulationState,
    pub input: InputState,
    pub clock: FrameClock,
    /// Autopilot steers instead of the keyboard (demo and headless runs)
    pub idle_mode: bool,
    /// Draws seeds for sessions after the first
    seeder: Pcg32,
    scene: DrawList,
    hud: H,
}

impl<H: Hud> Game<H> {
    pub fn new(tuning: Tuning, seed: u64, now_ms: f64, hud: H) -> Self {
        let clock = FrameClock::new(now_ms, tuning.max_frame_dt);
        let mut game = Self {
            state: SimulationState::new(tuning, seed),
            input: InputState::new(),
            clock,
            idle_mode: false,
            seeder: Pcg32::seed_from_u64(seed),
            scene: DrawList::new(),
            hud,
        };
        game.publish_reset();
        game
    }

    /// Start a new session
    pub fn reset(&mut self, now_ms: f64) {
        let seed = self.seeder.random();
        self.state.reset(seed);
        self.clock.restart(now_ms);
        self.publish_reset();
    }

    fn publish_reset(&mut self) {
        self.hud.set_status("");
        self.hud.set_score(self.state.score);
    }

    /// Forward a key press. Returns the key if the game uses it.
    pub fn key_down(&mut self, label: &str, now_ms: f64) -> Option<Key> {
        let key = self.input.key_down(label)?;
        if key == Key::Restart {
            self.reset(now_ms);
        }
        Some(key)
    }

    /// Forward a key release. Returns the key if the game uses it.
    pub fn key_up(&mut self, label: &str) -> Option<Key> {
        self.input.key_up(label)
    }

    /// Run one frame: update, publish HUD, repaint.
    pub fn frame(&mut self, now_ms: f64) -> &DrawList {
        let dt = self.clock.advance(now_ms);
        let intent = if self.idle_mode {
            autopilot::steer(&self.state)
        } else {
            self.input.intent()
        };

        tick(&mut self.state, intent, dt);

        for event in self.state.drain_events() {
            if let GameEvent::GameOver { .. } = event {
                self.hud.set_status(GAME_OVER_MESSAGE);
            }
        }
        self.hud.set_score(self.state.score);

        self.scene.clear();
        paint(&self.state.view(), &mut self.scene);
        &self.scene
    }

    /// Scene recorded by the last frame
    pub fn scene(&self) -> &DrawList {
        &self.scene
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    pub fn playfield(&self) -> Vec2 {
        Vec2::new(self.state.tuning.width, self.state.tuning.height)
    }
}
