//! Fixed timestep simulation tick
//!
//! One tick, in strict order: input -> spawner -> motion -> collisions ->
//! score and win check. The orchestrator in `game` owns the 60 Hz pacing
//! and everything wall-clock (power-up spawn timer, effect expiry).

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState};
use super::{collision, motion, spawn};
use crate::tuning::{DifficultyParams, Tuning};

/// Keyboard state sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// Advance the session by one fixed tick. No-op outside `Playing`.
pub fn tick(state: &mut GameState, input: &TickInput, params: &DifficultyParams, tuning: &Tuning) {
    if state.phase != GamePhase::Playing {
        return;
    }

    move_player(state, input, tuning);
    spawn::roll_hazard(state, params, tuning);
    motion::advance_entities(state, params, tuning);
    collision::resolve_collisions(state);

    if state.phase != GamePhase::Playing {
        // An unshielded hit ended the session; the lethal tick scores nothing.
        return;
    }

    state.score += 1;
    let fraction = tuning
        .session
        .max_score
        .map(|max| (state.score as f32 / max as f32).min(1.0))
        .unwrap_or(0.0);
    state.events.push(GameEvent::Progress {
        score: state.score,
        fraction,
    });

    if let Some(max) = tuning.session.max_score {
        if state.score >= max {
            state.win();
        }
    }
}

/// Apply buffered input to the player, clamped to the horizontal bounds.
/// While boosted, each moving tick records a trail point at the trailing
/// edge.
fn move_player(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    let player = &mut state.player;
    let boosted = player.speed > tuning.player.base_speed;
    let before = player.pos.x;

    if input.left {
        player.pos.x -= player.speed;
    }
    if input.right {
        player.pos.x += player.speed;
    }
    player.pos.x = player
        .pos
        .x
        .clamp(0.0, tuning.playfield.width - player.size.x);

    if boosted {
        let mid_y = player.pos.y + player.size.y / 2.0;
        if player.pos.x < before {
            player.record_trail(Vec2::new(player.pos.x + player.size.x, mid_y));
        } else if player.pos.x > before {
            player.record_trail(Vec2::new(player.pos.x, mid_y));
        }
    } else if !player.trail.is_empty() {
        player.clear_trail();
    }
}
