//! Idle/demo mode steering
//!
//! Picks the same kind of intent a keyboard would produce (each axis in
//! {-1, 0, 1}, diagonals normalized) so the simulation cannot tell the
//! difference.

use glam::Vec2;

use super::state::SimulationState;
use crate::consts::{PLAYER_START_X, PLAYER_START_Y};

/// How far ahead (seconds) an incoming obstacle counts as a threat
const LOOKAHEAD_SECS: f32 = 0.9;
/// Extra vertical clearance kept around threats
const CLEARANCE: f32 = 14.0;
/// Dead zone around the home position
const HOME_SLACK: f32 = 4.0;

/// Choose a movement intent for the current state
pub fn steer(state: &SimulationState) -> Vec2 {
    let player = &state.player;
    let p = player.pos;
    let height = state.tuning.height;
    let home = Vec2::new(
        state.tuning.width * PLAYER_START_X,
        height * PLAYER_START_Y,
    );

    // Most imminent obstacle on a collision course
    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.pos.x + o.radius >= p.x - player.radius)
        .filter(|o| (o.pos.y - p.y).abs() < o.radius + player.radius + CLEARANCE)
        .map(|o| {
            let gap = (o.pos.x - p.x - o.radius - player.radius).max(0.0);
            (gap / o.speed, o)
        })
        .filter(|(eta, _)| *eta <= LOOKAHEAD_SECS)
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut vx = axis_toward(p.x, home.x);
    let vy = match threat {
        Some((_, o)) => {
            let mut dir = if o.pos.y > p.y { -1.0 } else { 1.0 };
            // Cornered against a wall: go around the other side
            let room = if dir < 0.0 { p.y - player.radius } else { height - player.radius - p.y };
            if room < o.radius * 2.0 + CLEARANCE {
                dir = -dir;
            }
            // Back off while dodging
            vx = -1.0;
            dir
        }
        None => axis_toward(p.y, home.y),
    };

    Vec2::new(vx, vy).normalize_or_zero()
}

fn axis_toward(from: f32, to: f32) -> f32 {
    let diff = to - from;
    if diff.abs() <= HOME_SLACK { 0.0 } else { diff.signum() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Obstacle, tick};
    use crate::tuning::Tuning;

    fn session() -> SimulationState {
        let mut state = SimulationState::new(Tuning::default(), 5);
        state.spawn_timer = 1000.0;
        state
    }

    #[test]
    fn test_idle_at_home() {
        let state = session();
        assert_eq!(steer(&state), Vec2::ZERO);
    }

    #[test]
    fn test_returns_home() {
        let mut state = session();
        state.player.pos = Vec2::new(400.0, 100.0);
        let intent = steer(&state);
        assert!(intent.x < 0.0);
        assert!(intent.y > 0.0);
        assert!((intent.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dodges_away_from_threat() {
        let mut state = session();
        let p = state.player.pos;
        state.obstacles.push(Obstacle {
            pos: Vec2::new(p.x + 80.0, p.y + 5.0),
            radius: 14.0,
            speed: 200.0,
        });
        let intent = steer(&state);
        assert!(intent.y < 0.0);
    }

    #[test]
    fn test_ignores_obstacles_behind() {
        let mut state = session();
        let p = state.player.pos;
        state.obstacles.push(Obstacle {
            pos: Vec2::new(p.x - 60.0, p.y),
            radius: 14.0,
            speed: 200.0,
        });
        assert_eq!(steer(&state), Vec2::ZERO);
    }

    #[test]
    fn test_cornered_goes_other_way() {
        let mut state = session();
        state.player.pos = Vec2::new(120.0, 14.0);
        state.obstacles.push(Obstacle {
            pos: Vec2::new(200.0, 20.0),
            radius: 14.0,
            speed: 200.0,
        });
        let intent = steer(&state);
        assert!(intent.y > 0.0);
    }

    #[test]
    fn test_intents_look_like_keyboard_input() {
        let mut state = SimulationState::new(Tuning::default(), 2024);
        for _ in 0..60 * 10 {
            let intent = steer(&state);
            let len = intent.length();
            assert!(len == 0.0 || (len - 1.0).abs() < 1e-6);
            tick(&mut state, intent, 1.0 / 60.0);
        }
    }
}
