//! Hazard and power-up creation
//!
//! Hazards are Bernoulli-sampled once per tick from the session RNG.
//! Power-ups arrive on a wall-clock timer owned by the orchestrator, which
//! calls in here when it fires.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Hazard, HazardKind, PowerUp, PowerUpKind};
use crate::consts::EXPLOSIVE_RATIO;
use crate::tuning::{DifficultyParams, Tuning};

/// Roll the per-tick hazard spawn: with probability `spawn_rate`, one new
/// hazard at a uniform random x along the top edge.
///
/// The sample is compared against the raw rate, so rates >= 1 (the
/// impossible tier) saturate to a spawn every tick instead of panicking.
pub fn roll_hazard(state: &mut GameState, params: &DifficultyParams, tuning: &Tuning) {
    if state.rng.random::<f32>() >= params.spawn_rate {
        return;
    }

    let x = state.rng.random_range(0.0..tuning.playfield.width);
    let kind = if state.rng.random::<f32>() < EXPLOSIVE_RATIO {
        HazardKind::Explosive
    } else {
        HazardKind::Normal
    };
    let id = state.next_entity_id();
    state.hazards.push(Hazard {
        id,
        kind,
        pos: Vec2::new(x, 0.0),
        size: tuning.hazard.size,
        exploded: false,
    });
}

/// Create one power-up at the top edge, kind chosen uniformly.
/// Called by the orchestrator when the spawn timer fires.
pub fn spawn_power_up(state: &mut GameState, tuning: &Tuning) {
    let x = state.rng.random_range(0.0..tuning.playfield.width);
    let kind = if state.rng.random::<f32>() < 0.5 {
        PowerUpKind::Speed
    } else {
        PowerUpKind::Shield
    };
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        kind,
        pos: Vec2::new(x, 0.0),
        size: tuning.power_up.size,
    });
}
