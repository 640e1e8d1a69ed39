//! Scene painting
//!
//! Turns a [`SceneView`] into drawing calls on any [`Surface`]. The GPU
//! backend consumes the calls recorded by a [`DrawList`].

use glam::Vec2;

use crate::sim::SceneView;

/// Straight (non-premultiplied) RGBA, components in 0..=1
pub type Rgba = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    /// #ffd36a
    pub const PLAYER: Rgba = [1.0, 0.827, 0.416, 1.0];
    /// #66ff7a
    pub const FROG: Rgba = [0.4, 1.0, 0.478, 1.0];
    pub const FROG_EYE: Rgba = [0.0, 0.0, 0.0, 0.35];
    pub const GAME_OVER_OVERLAY: Rgba = [0.0, 0.0, 0.0, 0.35];
    pub const BACKGROUND: Rgba = [0.043, 0.063, 0.094, 1.0];
    /// Outside the playfield when the canvas aspect does not match
    pub const LETTERBOX: Rgba = [0.0, 0.0, 0.0, 1.0];
}

/// A 2D drawing target in playfield coordinates
pub trait Surface {
    /// Clear a rectangle back to the background
    fn clear_rect(&mut self, origin: Vec2, size: Vec2);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);
}

/// One recorded drawing call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    Clear { origin: Vec2, size: Vec2 },
    Circle { center: Vec2, radius: f32, color: Rgba },
    Rect { origin: Vec2, size: Vec2, color: Rgba },
}

/// Surface that records calls for later playback
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Commands after the last clear; earlier ones are painted over
    pub fn visible(&self) -> &[DrawCmd] {
        let start = self
            .cmds
            .iter()
            .rposition(|c| matches!(c, DrawCmd::Clear { .. }))
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.cmds[start..]
    }
}

impl Surface for DrawList {
    fn clear_rect(&mut self, origin: Vec2, size: Vec2) {
        self.cmds.push(DrawCmd::Clear { origin, size });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.cmds.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.cmds.push(DrawCmd::Rect {
            origin,
            size,
            color,
        });
    }
}

/// Paint one frame
pub fn paint<S: Surface + ?Sized>(view: &SceneView<'_>, surface: &mut S) {
    let field = Vec2::new(view.width, view.height);
    surface.clear_rect(Vec2::ZERO, field);

    let player = view.player;
    surface.fill_circle(player.pos, player.radius, colors::PLAYER);

    for frog in view.obstacles {
        let (c, r) = (frog.pos, frog.radius);
        surface.fill_circle(c, r, colors::FROG);

        // Eyes (cosmetic)
        let eye_r = r * 0.12;
        surface.fill_circle(Vec2::new(c.x - r * 0.25, c.y - r * 0.2), eye_r, colors::FROG_EYE);
        surface.fill_circle(Vec2::new(c.x + r * 0.25, c.y - r * 0.2), eye_r, colors::FROG_EYE);
    }

    if !view.alive {
        surface.fill_rect(Vec2::ZERO, field, colors::GAME_OVER_OVERLAY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GamePhase, Obstacle, SimulationState};
    use crate::tuning::Tuning;

    fn frog(x: f32, y: f32, radius: f32) -> Obstacle {
        Obstacle {
            pos: Vec2::new(x, y),
            radius,
            speed: 150.0,
        }
    }

    #[test]
    fn test_fresh_session_draws_player_only() {
        let state = SimulationState::new(Tuning::default(), 1);
        let mut list = DrawList::new();
        paint(&state.view(), &mut list);

        assert_eq!(
            list.cmds,
            vec![
                DrawCmd::Clear {
                    origin: Vec2::ZERO,
                    size: Vec2::new(800.0, 450.0)
                },
                DrawCmd::Circle {
                    center: Vec2::new(120.0, 225.0),
                    radius: 12.0,
                    color: colors::PLAYER
                },
            ]
        );
    }

    #[test]
    fn test_frog_has_two_eyes() {
        let mut state = SimulationState::new(Tuning::default(), 1);
        state.obstacles.push(frog(400.0, 100.0, 10.0));
        let mut list = DrawList::new();
        paint(&state.view(), &mut list);

        assert_eq!(list.len(), 5);
        assert_eq!(
            list.cmds[2],
            DrawCmd::Circle {
                center: Vec2::new(400.0, 100.0),
                radius: 10.0,
                color: colors::FROG
            }
        );
        let eyes: Vec<_> = list.cmds[3..]
            .iter()
            .map(|c| match *c {
                DrawCmd::Circle { center, radius, color } => (center, radius, color),
                _ => panic!("expected eye circle, got {:?}", c),
            })
            .collect();
        assert_eq!(eyes[0].0, Vec2::new(397.5, 98.0));
        assert_eq!(eyes[1].0, Vec2::new(402.5, 98.0));
        for (_, radius, color) in eyes {
            assert!((radius - 1.2).abs() < 1e-6);
            assert_eq!(color, colors::FROG_EYE);
        }
    }

    #[test]
    fn test_overlay_only_when_over() {
        let mut state = SimulationState::new(Tuning::default(), 1);
        let mut list = DrawList::new();
        paint(&state.view(), &mut list);
        assert!(!list.cmds.iter().any(|c| matches!(c, DrawCmd::Rect { .. })));

        state.phase = GamePhase::GameOver;
        list.clear();
        paint(&state.view(), &mut list);
        assert_eq!(
            list.cmds.last(),
            Some(&DrawCmd::Rect {
                origin: Vec2::ZERO,
                size: Vec2::new(800.0, 450.0),
                color: colors::GAME_OVER_OVERLAY
            })
        );
    }

    #[test]
    fn test_visible_skips_overdrawn_frames() {
        let mut state = SimulationState::new(Tuning::default(), 1);
        let mut list = DrawList::new();
        state.obstacles.push(frog(300.0, 300.0, 12.0));
        paint(&state.view(), &mut list);
        state.obstacles.clear();
        paint(&state.view(), &mut list);

        assert_eq!(list.len(), 7);
        assert_eq!(list.visible().len(), 1);
    }
}
