//! Axis-aligned collision detection and resolution
//!
//! Everything on the playfield is a box (hazards and power-ups are
//! box-approximated), so one strict AABB overlap test covers every pair.
//! Resolution runs once per tick, after motion, player against each entity
//! vec in spawn order.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState};

/// An axis-aligned box in screen coordinates (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap test. Boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Resolve player contacts for this tick.
///
/// Hazards first, then fragments, each in spawn order. A shielded hit
/// consumes the shield and removes only the colliding entity; the shield is
/// one-shot, so a second simultaneous hit resolves unshielded and ends the
/// session. Power-up contacts never end the game: the power-up is removed
/// and its kind staged in `state.collected` for effect activation.
pub fn resolve_collisions(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let player_box = state.player.aabb();

    // Snapshot hit ids before mutating, so removal never skips an entity.
    let hit_hazards: Vec<u32> = state
        .hazards
        .iter()
        .filter(|h| h.aabb().overlaps(&player_box))
        .map(|h| h.id)
        .collect();
    for id in hit_hazards {
        if !absorb_hit(state) {
            return;
        }
        state.hazards.retain(|h| h.id != id);
    }

    let hit_fragments: Vec<u32> = state
        .fragments
        .iter()
        .filter(|f| f.aabb().overlaps(&player_box))
        .map(|f| f.id)
        .collect();
    for id in hit_fragments {
        if !absorb_hit(state) {
            return;
        }
        state.fragments.retain(|f| f.id != id);
    }

    let mut collected = Vec::new();
    state.power_ups.retain(|p| {
        if p.aabb().overlaps(&player_box) {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });
    for kind in collected {
        state.events.push(GameEvent::PowerUpCollected { kind });
        state.collected.push(kind);
    }
}

/// One lethal contact: spend the shield if one is up, else end the session.
/// Returns whether the colliding entity should be removed (shield spent).
fn absorb_hit(state: &mut GameState) -> bool {
    if state.player.shielded {
        state.player.shielded = false;
        true
    } else {
        state.game_over();
        false
    }
}
