//! Held-key tracking and movement intent
//!
//! Key events only ever touch the held set; the frame driver samples it once
//! per frame through [`InputState::intent`].

use std::collections::HashSet;

use glam::Vec2;

/// Keys the game responds to, by physical label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    A,
    D,
    W,
    S,
    /// Restart (`r` or `R`)
    Restart,
}

/// Logical movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let key = match label {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "a" => Key::A,
            "d" => Key::D,
            "w" => Key::W,
            "s" => Key::S,
            "r" | "R" => Key::Restart,
            _ => return None,
        };
        Some(key)
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::ArrowLeft | Key::A => Some(Direction::Left),
            Key::ArrowRight | Key::D => Some(Direction::Right),
            Key::ArrowUp | Key::W => Some(Direction::Up),
            Key::ArrowDown | Key::S => Some(Direction::Down),
            Key::Restart => None,
        }
    }
}

/// Currently held keys
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns the recognized key, if any.
    pub fn key_down(&mut self, label: &str) -> Option<Key> {
        let key = Key::from_label(label)?;
        self.held.insert(key);
        Some(key)
    }

    /// Record a key release. Returns the recognized key, if any.
    pub fn key_up(&mut self, label: &str) -> Option<Key> {
        let key = Key::from_label(label)?;
        self.held.remove(&key);
        Some(key)
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn direction_held(&self, dir: Direction) -> bool {
        self.held.iter().any(|k| k.direction() == Some(dir))
    }

    /// Drop every held key (e.g. when the page loses focus)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Movement intent for this frame.
    ///
    /// Each axis is -1, 0 or 1 (opposite keys cancel); diagonals are scaled
    /// so the vector has unit length. Screen y grows downward.
    pub fn intent(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.direction_held(Direction::Left) {
            v.x -= 1.0;
        }
        if self.direction_held(Direction::Right) {
            v.x += 1.0;
        }
        if self.direction_held(Direction::Up) {
            v.y -= 1.0;
        }
        if self.direction_held(Direction::Down) {
            v.y += 1.0;
        }

        if v.x != 0.0 && v.y != 0.0 {
            v *= std::f32::consts::FRAC_1_SQRT_2;
        }
        v
    }
}
