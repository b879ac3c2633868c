//! Frame emission
//!
//! The core never draws. Once per frame the presentation layer hands a
//! closure to `frame`, which invokes it once per visible entity with what
//! to draw and where. Menu screens have nothing to emit; the terminal
//! screens still show the final playfield.

use glam::Vec2;

use crate::sim::{GamePhase, GameState, HazardKind, PowerUpKind};
use crate::tuning::Tuning;

/// What to draw for one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    Player { shielded: bool, boosted: bool },
    Hazard(HazardKind),
    Fragment,
    PowerUp(PowerUpKind),
    /// One point of the speed-boost trail, oldest first
    Trail,
}

/// One draw call: kind, top-left position, size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub size: Vec2,
}

/// Emit one sprite per visible entity, trail first so it draws underneath.
pub fn frame(state: &GameState, tuning: &Tuning, sink: &mut impl FnMut(Sprite)) {
    if matches!(state.phase, GamePhase::Menu | GamePhase::DifficultySelect) {
        return;
    }

    for point in &state.player.trail {
        sink(Sprite {
            kind: SpriteKind::Trail,
            pos: *point,
            size: Vec2::ZERO,
        });
    }
    sink(Sprite {
        kind: SpriteKind::Player {
            shielded: state.player.shielded,
            boosted: state.player.speed > tuning.player.base_speed,
        },
        pos: state.player.pos,
        size: state.player.size,
    });
    for hazard in &state.hazards {
        sink(Sprite {
            kind: SpriteKind::Hazard(hazard.kind),
            pos: hazard.pos,
            size: Vec2::splat(hazard.size),
        });
    }
    for fragment in &state.fragments {
        sink(Sprite {
            kind: SpriteKind::Fragment,
            pos: fragment.pos,
            size: Vec2::splat(fragment.size),
        });
    }
    for power_up in &state.power_ups {
        sink(Sprite {
            kind: SpriteKind::PowerUp(power_up.kind),
            pos: power_up.pos,
            size: Vec2::splat(power_up.size),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Hazard, PowerUp};

    #[test]
    fn test_menu_emits_nothing() {
        let tuning = Tuning::default();
        let state = GameState::new(1, &tuning);
        let mut count = 0;
        frame(&state, &tuning, &mut |_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_one_sprite_per_visible_entity() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        state.phase = GamePhase::Playing;
        for i in 0..3 {
            let id = state.next_entity_id();
            state.hazards.push(Hazard {
                id,
                kind: HazardKind::Normal,
                pos: Vec2::new(i as f32 * 40.0, 10.0),
                size: 20.0,
                exploded: false,
            });
        }
        let id = state.next_entity_id();
        state.power_ups.push(PowerUp {
            id,
            kind: PowerUpKind::Speed,
            pos: Vec2::new(90.0, 10.0),
            size: 20.0,
        });

        let mut sprites = Vec::new();
        frame(&state, &tuning, &mut |s| sprites.push(s));

        // player + 3 hazards + 1 power-up
        assert_eq!(sprites.len(), 5);
        assert!(
            sprites
                .iter()
                .any(|s| matches!(s.kind, SpriteKind::Player { .. }))
        );
        assert_eq!(
            sprites
                .iter()
                .filter(|s| matches!(s.kind, SpriteKind::Hazard(_)))
                .count(),
            3
        );
    }

    #[test]
    fn test_shield_and_boost_reach_the_sink() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        state.phase = GamePhase::Playing;
        state.player.shielded = true;
        state.player.speed = tuning.player.base_speed * tuning.player.boost_multiplier;
        state.player.record_trail(Vec2::new(10.0, 470.0));

        let mut sprites = Vec::new();
        frame(&state, &tuning, &mut |s| sprites.push(s));

        assert!(sprites.iter().any(|s| s.kind
            == SpriteKind::Player {
                shielded: true,
                boosted: true
            }));
        assert!(sprites.iter().any(|s| s.kind == SpriteKind::Trail));
    }
}
