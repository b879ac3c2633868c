//! Game state and core simulation types
//!
//! All state for one session lives here, in one explicit struct with an
//! explicit lifecycle. Nothing is module-global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::{Difficulty, Tuning};

/// Current screen in the game's coarse flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the player to start
    Menu,
    /// Difficulty choice before a session begins
    DifficultySelect,
    /// Active gameplay
    Playing,
    /// Session ended by an unshielded hit
    GameOver,
    /// Session ended by reaching the win threshold
    Won,
}

/// Falling hazard variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Normal,
    /// Detonates at half depth into a radial fragment burst
    Explosive,
}

/// Power-up variants; doubles as the kind tag for active effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Shield,
}

/// Maximum trail points kept while the speed boost is active
pub const TRAIL_LENGTH: usize = 10;

/// The player sprite, pinned near the bottom edge of the playfield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal speed in pixels per tick (base or boosted)
    pub speed: f32,
    /// One-shot damage immunity
    pub shielded: bool,
    /// Motion trail while boosted, oldest first (rendering only)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Player {
    /// Centered at the bottom, at base speed, unshielded.
    pub fn new(tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.player.width, tuning.player.height);
        let pos = Vec2::new(
            (tuning.playfield.width - size.x) / 2.0,
            tuning.playfield.height - size.y - tuning.player.bottom_margin,
        );
        Self {
            pos,
            size,
            speed: tuning.player.base_speed,
            shielded: false,
            trail: Vec::new(),
        }
    }

    /// Record a trail point (call each tick the boost moves the player)
    pub fn record_trail(&mut self, point: Vec2) {
        self.trail.push(point);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
    }

    /// Clear trail (on boost expiry/reset)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A falling hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    /// Set once, when an explosive hazard detonates
    pub exploded: bool,
}

impl Hazard {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.size))
    }
}

/// A radially ejected sub-projectile from a detonation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub id: u32,
    pub pos: Vec2,
    /// Per-tick velocity, fixed at detonation
    pub vel: Vec2,
    pub size: f32,
}

impl Fragment {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.size))
    }
}

/// A falling collectible granting a time-limited modifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: f32,
}

impl PowerUp {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.size))
    }
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStart { difficulty: Difficulty },
    /// Emitted every Playing tick; `fraction` is 0 for endless sessions
    Progress { score: u64, fraction: f32 },
    PowerUpCollected { kind: PowerUpKind },
    EffectExpired { kind: PowerUpKind },
    GameOver { score: u64 },
    Won { score: u64 },
}

/// Complete session state (deterministic, explicit lifecycle)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Live RNG, advanced only by the spawner
    pub rng: Pcg32,
    /// Current screen
    pub phase: GamePhase,
    pub player: Player,
    /// Falling hazards, in spawn order
    pub hazards: Vec<Hazard>,
    /// Detonation fragments, in spawn order
    pub fragments: Vec<Fragment>,
    /// Falling power-ups, in spawn order
    pub power_ups: Vec<PowerUp>,
    /// Elapsed Playing ticks; the score IS elapsed ticks
    pub score: u64,
    /// Power-ups collected this tick, staged for effect activation
    pub collected: Vec<PowerUpKind>,
    /// Pending notifications for the presentation layer
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh state on the menu screen
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            player: Player::new(tuning),
            hazards: Vec::new(),
            fragments: Vec::new(),
            power_ups: Vec::new(),
            score: 0,
            collected: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild for a new session; the caller sets the phase afterwards
    pub fn reset(&mut self, seed: u64, tuning: &Tuning) {
        *self = Self::new(seed, tuning);
    }

    /// Allocate a new entity ID. Strictly increasing, so iteration order
    /// over any entity vec is spawn order.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Terminal transition on an unshielded hit. Idempotent once ended.
    pub fn game_over(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    /// Terminal transition on reaching the win threshold. Idempotent.
    pub fn win(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::Won;
        self.events.push(GameEvent::Won { score: self.score });
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_starts_centered_at_bottom() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        assert_eq!(player.pos.x, (500.0 - 50.0) / 2.0);
        assert_eq!(player.pos.y, 500.0 - 50.0 - 4.0);
        assert!(!player.shielded);
        assert_eq!(player.speed, tuning.player.base_speed);
    }

    #[test]
    fn test_entity_ids_strictly_increase() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        let c = state.next_entity_id();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        state.phase = GamePhase::Playing;
        state.score = 42;

        state.game_over();
        state.game_over();

        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::GameOver { score: 42 }]);
    }

    #[test]
    fn test_win_requires_playing() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        state.phase = GamePhase::GameOver;
        state.win();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_trail_is_capped() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        for i in 0..25 {
            player.record_trail(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(player.trail.len(), TRAIL_LENGTH);
        // Oldest points shifted out
        assert_eq!(player.trail[0].x, 15.0);
    }
}
