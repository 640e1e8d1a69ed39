//! Per-frame simulation step
//!
//! Advances a session by one (already clamped) delta time.

use glam::Vec2;

use super::circles_overlap;
use super::state::{GameEvent, GamePhase, SimulationState};

/// Advance the session by `dt` seconds under the given movement intent.
///
/// Does nothing once the session is over.
pub fn tick(state: &mut SimulationState, intent: Vec2, dt: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    // Movement
    let step = intent * state.player.speed * dt;
    state.player.pos += step;
    state
        .player
        .clamp_to(state.tuning.width, state.tuning.height);

    // Spawning (at most one per tick, no catch-up)
    state.spawn_timer -= dt;
    let interval = state.spawn_interval();
    if state.spawn_timer <= 0.0 {
        state.spawn_obstacle();
        state.spawn_timer = interval;
    }

    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= obstacle.speed * dt;
    }

    // Prune what has left the field; each one is a point
    let before = state.obstacles.len();
    let margin = state.tuning.prune_margin;
    state.obstacles.retain(|o| !o.is_gone(margin));
    let passed = (before - state.obstacles.len()) as u32;
    if passed > 0 {
        state.score += passed as u64;
        log::trace!("{} obstacle(s) passed, score {}", passed, state.score);
        state.events.push(GameEvent::ObstaclesPassed { count: passed });
    }

    // Collisions against end-of-tick positions
    let player = &state.player;
    let hit = state
        .obstacles
        .iter()
        .any(|o| circles_overlap(player.pos, player.radius, o.pos, o.radius));
    if hit {
        state.phase = GamePhase::GameOver;
        log::info!("Game over (score {})", state.score);
        state.events.push(GameEvent::GameOver { score: state.score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Obstacle;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn session() -> SimulationState {
        SimulationState::new(Tuning::default(), 12345)
    }

    /// Session whose spawn timer will not fire for a while
    fn quiet_session() -> SimulationState {
        let mut state = session();
        state.spawn_timer = 1000.0;
        state
    }

    fn obstacle(x: f32, y: f32, radius: f32, speed: f32) -> Obstacle {
        Obstacle {
            pos: Vec2::new(x, y),
            radius,
            speed,
        }
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut state = session();
        tick(&mut state, Vec2::ZERO, DT);
        assert_eq!(state.obstacles.len(), 1);
        assert!((state.spawn_timer - 0.9).abs() < 1e-6);

        // Timer not yet elapsed
        tick(&mut state, Vec2::ZERO, DT);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_spawned_obstacle_advances_same_tick() {
        let mut state = session();
        tick(&mut state, Vec2::ZERO, DT);
        let o = &state.obstacles[0];
        let expected = state.tuning.width + o.radius + 4.0 - o.speed * DT;
        assert!((o.pos.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_no_catch_up_spawning() {
        let mut state = session();
        state.spawn_timer = -10.0;
        tick(&mut state, Vec2::ZERO, 0.033);
        assert_eq!(state.obstacles.len(), 1);
        assert!((state.spawn_timer - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_interval_uses_score() {
        let mut state = session();
        state.score = 40;
        tick(&mut state, Vec2::ZERO, DT);
        assert!((state.spawn_timer - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_player_moves_with_intent() {
        let mut state = quiet_session();
        let start = state.player.pos;
        tick(&mut state, Vec2::new(1.0, 0.0), 0.01);
        assert!((state.player.pos.x - (start.x + 2.4)).abs() < 1e-4);
        assert_eq!(state.player.pos.y, start.y);
    }

    #[test]
    fn test_player_clamped_to_field() {
        let mut state = quiet_session();
        for _ in 0..1000 {
            tick(&mut state, Vec2::new(-1.0, -1.0).normalize(), 0.033);
        }
        assert_eq!(state.player.pos, Vec2::new(12.0, 12.0));

        for _ in 0..1000 {
            tick(&mut state, Vec2::new(1.0, 1.0).normalize(), 0.033);
        }
        assert_eq!(state.player.pos, Vec2::new(800.0 - 12.0, 450.0 - 12.0));
    }

    #[test]
    fn test_obstacle_pruned_at_margin() {
        let mut state = quiet_session();
        state.obstacles.push(obstacle(-15.0 - 10.0, 400.0, 15.0, 200.0));
        tick(&mut state, Vec2::ZERO, 0.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 1);
        assert_eq!(state.events, vec![GameEvent::ObstaclesPassed { count: 1 }]);
    }

    #[test]
    fn test_obstacle_kept_short_of_margin() {
        let mut state = quiet_session();
        state.obstacles.push(obstacle(-15.0 - 9.0, 400.0, 15.0, 200.0));
        tick(&mut state, Vec2::ZERO, 0.0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.score, 0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_pruning_preserves_order() {
        let mut state = quiet_session();
        state.obstacles.push(obstacle(500.0, 400.0, 10.0, 100.0));
        state.obstacles.push(obstacle(-100.0, 400.0, 10.0, 100.0));
        state.obstacles.push(obstacle(600.0, 420.0, 11.0, 100.0));
        state.obstacles.push(obstacle(-200.0, 400.0, 10.0, 100.0));
        state.obstacles.push(obstacle(700.0, 30.0, 12.0, 100.0));
        tick(&mut state, Vec2::ZERO, DT);

        assert_eq!(state.score, 2);
        let radii: Vec<f32> = state.obstacles.iter().map(|o| o.radius).collect();
        assert_eq!(radii, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_exact_touch_is_game_over() {
        let mut state = quiet_session();
        let p = state.player.pos;
        // 12 + 13 = 25 along a 3-4-5 diagonal
        state.obstacles.push(obstacle(p.x + 15.0, p.y + 20.0, 13.0, 0.0));
        tick(&mut state, Vec2::ZERO, DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.is_alive());
        assert_eq!(state.events, vec![GameEvent::GameOver { score: 0 }]);
    }

    #[test]
    fn test_near_miss_keeps_playing() {
        let mut state = quiet_session();
        let p = state.player.pos;
        state.obstacles.push(obstacle(p.x + 15.0, p.y + 20.0, 12.5, 0.0));
        tick(&mut state, Vec2::ZERO, DT);
        assert!(state.is_alive());
    }

    #[test]
    fn test_collision_uses_post_advance_position() {
        let mut state = quiet_session();
        let p = state.player.pos;
        // Out of reach at the start of the tick, overlapping after moving 100 px left
        state.obstacles.push(obstacle(p.x + 120.0, p.y, 12.0, 1000.0));
        tick(&mut state, Vec2::ZERO, 0.1);
        assert!(!state.is_alive());
    }

    #[test]
    fn test_pruned_obstacle_never_collides() {
        let mut tuning = Tuning::default();
        tuning.prune_margin = -100.0;
        let mut state = SimulationState::new(tuning, 1);
        state.spawn_timer = 1000.0;
        state.player.pos = Vec2::new(12.0, 200.0);
        // Overlaps the player but already counts as gone
        state.obstacles.push(obstacle(20.0, 200.0, 10.0, 0.0));
        tick(&mut state, Vec2::ZERO, DT);
        assert!(state.is_alive());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_score_accrues_before_collision_in_same_tick() {
        let mut state = quiet_session();
        let p = state.player.pos;
        state.obstacles.push(obstacle(-50.0, 30.0, 10.0, 100.0));
        state.obstacles.push(obstacle(p.x, p.y, 10.0, 0.0));
        tick(&mut state, Vec2::ZERO, DT);
        assert_eq!(state.score, 1);
        assert_eq!(
            state.events,
            vec![
                GameEvent::ObstaclesPassed { count: 1 },
                GameEvent::GameOver { score: 1 }
            ]
        );
    }

    #[test]
    fn test_game_over_freezes_session() {
        let mut state = quiet_session();
        let p = state.player.pos;
        state.obstacles.push(obstacle(p.x, p.y, 10.0, 50.0));
        tick(&mut state, Vec2::ZERO, DT);
        assert!(!state.is_alive());
        state.events.clear();

        let player = state.player.clone();
        let obstacles = state.obstacles.clone();
        let timer = state.spawn_timer;
        for _ in 0..100 {
            tick(&mut state, Vec2::new(1.0, 0.0), 0.033);
        }
        assert_eq!(state.player, player);
        assert_eq!(state.obstacles, obstacles);
        assert_eq!(state.score, 0);
        assert_eq!(state.spawn_timer, timer);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut state = quiet_session();
        let p = state.player.pos;
        state.obstacles.push(obstacle(p.x, p.y, 10.0, 0.0));
        state.obstacles.push(obstacle(p.x + 5.0, p.y, 10.0, 0.0));
        for _ in 0..5 {
            tick(&mut state, Vec2::ZERO, DT);
        }
        let overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = session();
        let mut b = session();
        let intents = [
            Vec2::new(0.0, 1.0),
            Vec2::ZERO,
            Vec2::new(1.0, 1.0).normalize(),
        ];
        for i in 0..600 {
            let intent = intents[i % intents.len()];
            tick(&mut a, intent, DT);
            tick(&mut b, intent, DT);
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_field(
            seed in any::<u64>(),
            steps in proptest::collection::vec(
                (-1i8..=1, -1i8..=1, 0.0f32..=0.033),
                1..200,
            ),
        ) {
            let mut state = SimulationState::new(Tuning::default(), seed);
            let r = state.player.radius;
            for (vx, vy, dt) in steps {
                let intent = Vec2::new(vx as f32, vy as f32).normalize_or_zero();
                tick(&mut state, intent, dt);
                let p = state.player.pos;
                prop_assert!(p.x >= r && p.x <= 800.0 - r);
                prop_assert!(p.y >= r && p.y <= 450.0 - r);
            }
        }

        #[test]
        fn prop_score_counts_prunes(
            seed in any::<u64>(),
            steps in proptest::collection::vec((-1i8..=1, -1i8..=1), 1..600),
        ) {
            let mut state = SimulationState::new(Tuning::default(), seed);
            let mut passed = 0u64;
            let mut last_score = 0;
            for (vx, vy) in steps {
                let intent = Vec2::new(vx as f32, vy as f32).normalize_or_zero();
                let alive_before = state.is_alive();
                tick(&mut state, intent, 0.033);
                for event in state.drain_events() {
                    if let GameEvent::ObstaclesPassed { count } = event {
                        passed += count as u64;
                    }
                }
                prop_assert!(state.score >= last_score);
                if !alive_before {
                    prop_assert_eq!(state.score, last_score);
                }
                last_score = state.score;
            }
            prop_assert_eq!(state.score, passed);
        }

        #[test]
        fn prop_frozen_after_game_over(
            dts in proptest::collection::vec(0.0f32..=0.033, 1..50),
            vx in -1i8..=1,
            vy in -1i8..=1,
        ) {
            let mut state = quiet_session();
            let p = state.player.pos;
            state.obstacles.push(obstacle(p.x, p.y, 10.0, 80.0));
            tick(&mut state, Vec2::ZERO, DT);
            prop_assert!(!state.is_alive());

            let player = state.player.clone();
            let obstacles = state.obstacles.clone();
            let score = state.score;
            for dt in dts {
                tick(&mut state, Vec2::new(vx as f32, vy as f32), dt);
            }
            prop_assert_eq!(state.player, player);
            prop_assert_eq!(state.obstacles, obstacles);
            prop_assert_eq!(state.score, score);
        }
    }
}
