//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only (one generator per session)
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::circles_overlap;
pub use state::{GameEvent, GamePhase, Obstacle, Player, SceneView, SimulationState};
pub use tick::tick;
