//! Time-limited player modifiers
//!
//! Activation writes the player field immediately and (re)starts a
//! wall-clock expiry countdown in the orchestrator's timer queue.
//! Re-activating a kind resets its countdown rather than stacking, so at
//! most one speed boost and one shield are ever active.

use crate::sim::{GameEvent, GamePhase, GameState, PowerUpKind};
use crate::timer::{TaskId, TimerQueue, TimerTask};
use crate::tuning::Tuning;

/// Pending expiry handles, at most one per kind
#[derive(Debug, Default)]
pub struct EffectManager {
    speed_expiry: Option<TaskId>,
    shield_expiry: Option<TaskId>,
}

impl EffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `kind` to the player and (re)start its expiry countdown.
    pub fn activate(
        &mut self,
        kind: PowerUpKind,
        state: &mut GameState,
        timers: &mut TimerQueue,
        now: f64,
        tuning: &Tuning,
    ) {
        let (slot, duration) = match kind {
            PowerUpKind::Speed => (&mut self.speed_expiry, tuning.power_up.speed_duration),
            PowerUpKind::Shield => (&mut self.shield_expiry, tuning.power_up.shield_duration),
        };
        // Reset, never stack
        if let Some(handle) = slot.take() {
            timers.cancel(handle);
        }
        *slot = Some(timers.schedule(TimerTask::EffectExpiry(kind), now, duration));

        match kind {
            PowerUpKind::Speed => {
                state.player.speed = tuning.player.base_speed * tuning.player.boost_multiplier;
            }
            PowerUpKind::Shield => state.player.shielded = true,
        }
    }

    /// The expiry timer fired: revert to baseline. Must be a no-op once the
    /// session has ended.
    pub fn expire(&mut self, kind: PowerUpKind, state: &mut GameState, tuning: &Tuning) {
        match kind {
            PowerUpKind::Speed => self.speed_expiry = None,
            PowerUpKind::Shield => self.shield_expiry = None,
        }
        if state.phase != GamePhase::Playing {
            return;
        }
        match kind {
            PowerUpKind::Speed => {
                state.player.speed = tuning.player.base_speed;
                state.player.clear_trail();
            }
            PowerUpKind::Shield => state.player.shielded = false,
        }
        state.events.push(GameEvent::EffectExpired { kind });
    }

    /// Forget pending handles. The orchestrator clears the queue itself.
    pub fn reset(&mut self) {
        self.speed_expiry = None;
        self.shield_expiry = None;
    }
}
