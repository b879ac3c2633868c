//! Motion and lifecycle
//!
//! Advances every entity by its per-tick velocity, detonates explosive
//! hazards that have reached half depth, and purges anything that has left
//! the playfield. Removal is done with `retain` passes so a scan never
//! mutates the container it is walking.

use glam::Vec2;

use super::state::{Fragment, GameState, HazardKind};
use crate::consts::FRAGMENT_COUNT;
use crate::tuning::{DifficultyParams, Tuning};

/// Advance hazards, power-ups and fragments by one tick.
pub fn advance_entities(state: &mut GameState, params: &DifficultyParams, tuning: &Tuning) {
    let width = tuning.playfield.width;
    let height = tuning.playfield.height;

    for hazard in &mut state.hazards {
        hazard.pos.y += params.fall_speed;
    }
    for power_up in &mut state.power_ups {
        power_up.pos.y += params.fall_speed;
    }
    for fragment in &mut state.fragments {
        fragment.pos += fragment.vel;
    }

    // Detonations: mark and collect burst origins first, then purge. The
    // exploded flag guarantees at most one burst per hazard.
    let mut bursts: Vec<Vec2> = Vec::new();
    for hazard in &mut state.hazards {
        if hazard.kind == HazardKind::Explosive && !hazard.exploded && hazard.pos.y >= height / 2.0
        {
            hazard.exploded = true;
            bursts.push(hazard.pos);
        }
    }

    // Hazards and power-ups only ever leave through the bottom edge.
    state
        .hazards
        .retain(|h| !h.exploded && h.pos.y <= height);
    state.power_ups.retain(|p| p.pos.y <= height);

    for origin in bursts {
        spawn_fragments(state, origin, params.fall_speed, tuning.hazard.fragment_size);
    }

    // Fragments fly in every direction and can leave through any edge;
    // their velocity is constant, so anything outside can never return.
    state.fragments.retain(|f| {
        f.pos.x >= -f.size && f.pos.x <= width && f.pos.y >= -f.size && f.pos.y <= height
    });
}

/// Radial burst: FRAGMENT_COUNT fragments at angles 2pi*i/n, each with the
/// current fall speed as its velocity magnitude.
fn spawn_fragments(state: &mut GameState, origin: Vec2, speed: f32, size: f32) {
    for i in 0..FRAGMENT_COUNT {
        let theta = std::f32::consts::TAU * i as f32 / FRAGMENT_COUNT as f32;
        let id = state.next_entity_id();
        state.fragments.push(Fragment {
            id,
            pos: origin,
            vel: Vec2::new(theta.cos(), theta.sin()) * speed,
            size,
        });
    }
}
