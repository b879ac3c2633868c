//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, by entity id)
//! - No rendering, wall-clock or platform dependencies

pub mod collision;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, resolve_collisions};
pub use state::{
    Fragment, GameEvent, GamePhase, GameState, Hazard, HazardKind, Player, PowerUp, PowerUpKind,
};
pub use tick::{TickInput, tick};
