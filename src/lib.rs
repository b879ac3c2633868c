//! Sky Dodge - a falling-hazard avoidance arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, motion, collisions)
//! - `game`: Fixed-rate loop orchestrator and screen flow
//! - `effects`: Time-limited player modifiers (speed boost, shield)
//! - `timer`: Wall-clock task queue for power-up spawns and effect expiry
//! - `tuning`: Data-driven game balance
//! - `render`: Sprite-callback frame emission

pub mod effects;
pub mod game;
pub mod render;
pub mod sim;
pub mod timer;
pub mod tuning;

pub use game::Game;
pub use sim::{GameEvent, GamePhase, GameState, TickInput};
pub use tuning::{ConfigError, Difficulty, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; entity speeds are pixels per tick)
    pub const TICK_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Fraction of spawned hazards that detonate instead of falling through.
    /// A fixed design constant, independent of difficulty.
    pub const EXPLOSIVE_RATIO: f32 = 0.05;
    /// Fragments per detonation, evenly spaced around the circle
    pub const FRAGMENT_COUNT: u32 = 5;
}
