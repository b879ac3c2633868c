//! Game loop orchestration and screen flow
//!
//! Owns the session state, the resolved difficulty, the wall-clock timer
//! queue and the fixed-timestep accumulator. The presentation layer calls
//! `advance` once per frame with the current wall-clock time, then drains
//! events and draws a frame through `render`.
//!
//! Screen flow: Menu -> DifficultySelect -> Playing -> GameOver | Won,
//! with terminal screens re-entering Playing (`retry`) or Menu
//! (`back_to_menu`) on explicit calls from the shell.

use log::{info, warn};

use crate::consts::{MAX_SUBSTEPS, TICK_DT};
use crate::effects::EffectManager;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, spawn, tick};
use crate::timer::{TimerQueue, TimerTask};
use crate::tuning::{ConfigError, Difficulty, DifficultyParams, Tuning};

/// Difficulty resolved at session start
#[derive(Debug, Clone, Copy)]
struct ActiveSession {
    difficulty: Difficulty,
    params: DifficultyParams,
}

/// Top-level game object: screen flow, session lifecycle, fixed-rate driver
pub struct Game {
    tuning: Tuning,
    state: GameState,
    timers: TimerQueue,
    effects: EffectManager,
    session: Option<ActiveSession>,
    accumulator: f64,
    last_time: Option<f64>,
    /// Base seed; each session runs on its own derived stream
    seed: u64,
    sessions_started: u64,
}

impl Game {
    /// Create on the menu screen.
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let state = GameState::new(seed, &tuning);
        Self {
            tuning,
            state,
            timers: TimerQueue::new(),
            effects: EffectManager::new(),
            session: None,
            accumulator: 0.0,
            last_time: None,
            seed,
            sessions_started: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Menu -> difficulty choice.
    pub fn open_difficulty_select(&mut self) {
        if self.state.phase == GamePhase::Menu {
            self.state.phase = GamePhase::DifficultySelect;
        }
    }

    /// Begin a session at `difficulty`. Validates the tuning fail-fast and
    /// cancels all previously scheduled work before the new session can
    /// observe it.
    pub fn start_session(&mut self, difficulty: Difficulty, now: f64) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        let params = self.tuning.difficulty.get(difficulty);

        self.teardown();
        let session_seed = self.seed.wrapping_add(self.sessions_started);
        self.sessions_started += 1;

        self.state.reset(session_seed, &self.tuning);
        self.state.phase = GamePhase::Playing;
        self.session = Some(ActiveSession { difficulty, params });
        self.last_time = Some(now);

        self.timers
            .schedule(TimerTask::PowerUpSpawn, now, self.tuning.power_up.spawn_interval);
        self.state.events.push(GameEvent::SessionStart { difficulty });
        info!(
            "session start: difficulty={difficulty} spawn_rate={} fall_speed={} seed={session_seed}",
            params.spawn_rate, params.fall_speed
        );
        Ok(())
    }

    /// Terminal screen -> a fresh run at the same difficulty.
    pub fn retry(&mut self, now: f64) -> Result<(), ConfigError> {
        let Some(difficulty) = self.session.as_ref().map(|s| s.difficulty) else {
            warn!("retry without a prior session");
            return Ok(());
        };
        self.start_session(difficulty, now)
    }

    /// Any screen -> menu. Tears the session down.
    pub fn back_to_menu(&mut self) {
        self.teardown();
        self.session = None;
        self.state.phase = GamePhase::Menu;
    }

    /// Drive the session up to wall-clock `now`: fire due timers, then run
    /// as many fixed ticks as the elapsed time covers.
    pub fn advance(&mut self, now: f64, input: &TickInput) {
        let Some(session) = self.session else {
            return;
        };
        if self.state.phase != GamePhase::Playing {
            // Driver halted on a terminal screen; retry or menu restarts it
            return;
        }

        // Timer callbacks fire between ticks, unsynchronized with the tick
        // grid. Their side effects are idempotent field writes.
        for task in self.timers.poll(now) {
            match task {
                TimerTask::PowerUpSpawn => {
                    spawn::spawn_power_up(&mut self.state, &self.tuning);
                    self.timers.schedule(
                        TimerTask::PowerUpSpawn,
                        now,
                        self.tuning.power_up.spawn_interval,
                    );
                }
                TimerTask::EffectExpiry(kind) => {
                    self.effects.expire(kind, &mut self.state, &self.tuning);
                }
            }
        }

        let last = self.last_time.replace(now).unwrap_or(now);
        // Clamp huge frame gaps (hidden window, debugger) before accumulating
        self.accumulator += (now - last).clamp(0.0, 0.25);

        let mut substeps = 0;
        while self.accumulator >= TICK_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, input, &session.params, &self.tuning);
            self.accumulator -= TICK_DT;
            substeps += 1;

            // Power-ups collected this tick start their countdowns now
            for kind in std::mem::take(&mut self.state.collected) {
                self.effects
                    .activate(kind, &mut self.state, &mut self.timers, now, &self.tuning);
            }

            if self.state.phase != GamePhase::Playing {
                // Terminal transition halts the driver and the spawn timer
                // until a new session starts.
                self.teardown();
                info!("session over: score={}", self.state.score);
                break;
            }
        }
    }

    /// Notifications accumulated since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Cancel every scheduled callback so nothing stale can fire into the
    /// next session.
    fn teardown(&mut self) {
        self.timers.clear();
        self.effects.reset();
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Hazard, HazardKind, PowerUp, PowerUpKind};
    use glam::Vec2;

    const FRAME: f64 = TICK_DT;
    /// First frame lands a quarter-frame off the tick grid, like a real
    /// wall clock would; the offset keeps the accumulator clear of float
    /// rounding at tick boundaries.
    const T0: f64 = FRAME / 4.0;

    /// Tuning whose normal tier never spawns, so sessions run undisturbed
    fn quiet_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.difficulty.normal.spawn_rate = 0.0;
        tuning
    }

    fn advance_frames(game: &mut Game, start: f64, frames: u64) -> f64 {
        let mut now = start;
        for _ in 0..frames {
            now += FRAME;
            game.advance(now, &TickInput::default());
        }
        now
    }

    fn place_power_up(game: &mut Game, kind: PowerUpKind) {
        let pos = game.state.player.pos;
        let id = game.state.next_entity_id();
        game.state.power_ups.push(PowerUp {
            id,
            kind,
            pos,
            size: 20.0,
        });
    }

    #[test]
    fn test_screen_flow_menu_to_playing() {
        let mut game = Game::new(quiet_tuning(), 1);
        assert_eq!(game.phase(), GamePhase::Menu);

        game.open_difficulty_select();
        assert_eq!(game.phase(), GamePhase::DifficultySelect);

        game.start_session(Difficulty::Normal, 0.0).unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(
            game.drain_events()
                .contains(&GameEvent::SessionStart {
                    difficulty: Difficulty::Normal
                })
        );
    }

    #[test]
    fn test_invalid_tuning_fails_at_session_start() {
        let mut tuning = Tuning::default();
        tuning.difficulty.normal.fall_speed = -1.0;
        let mut game = Game::new(tuning, 1);
        assert!(game.start_session(Difficulty::Normal, 0.0).is_err());
        assert_ne!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_advance_accumulates_fixed_ticks() {
        let mut game = Game::new(quiet_tuning(), 1);
        game.start_session(Difficulty::Normal, 0.0).unwrap();

        advance_frames(&mut game, T0, 60);
        assert_eq!(game.state().score, 60);
    }

    #[test]
    fn test_power_up_timer_fires_and_reschedules() {
        let mut game = Game::new(quiet_tuning(), 1);
        let interval = game.tuning().power_up.spawn_interval;
        game.start_session(Difficulty::Normal, 0.0).unwrap();

        // Drive past one interval of wall-clock time
        let frames = (interval / FRAME) as u64 + 2;
        let now = advance_frames(&mut game, T0, frames);
        assert_eq!(game.state().power_ups.len(), 1);

        // And past a second one: rescheduled, not one-shot
        advance_frames(&mut game, now, frames);
        let on_field = game.state().power_ups.len();
        assert!(on_field == 2 || on_field == 1, "second spawn expected (one may have fallen out)");
    }

    #[test]
    fn test_collected_power_up_activates_and_expires() {
        let mut game = Game::new(quiet_tuning(), 1);
        game.start_session(Difficulty::Normal, 0.0).unwrap();
        let base = game.tuning().player.base_speed;
        let boosted = base * game.tuning().player.boost_multiplier;
        let duration = game.tuning().power_up.speed_duration;

        place_power_up(&mut game, PowerUpKind::Speed);
        let now = advance_frames(&mut game, T0, 1);
        assert_eq!(game.state().player.speed, boosted);

        // Short of the duration: still boosted
        let now = advance_frames(&mut game, now, (duration / FRAME) as u64 - 10);
        assert_eq!(game.state().player.speed, boosted);

        // Past it: reverted
        advance_frames(&mut game, now, 20);
        assert_eq!(game.state().player.speed, base);
        assert!(
            game.drain_events()
                .contains(&GameEvent::EffectExpired {
                    kind: PowerUpKind::Speed
                })
        );
    }

    #[test]
    fn test_reacquiring_a_boost_resets_its_countdown() {
        let mut game = Game::new(quiet_tuning(), 1);
        game.start_session(Difficulty::Normal, 0.0).unwrap();
        let boosted = game.tuning().player.base_speed * game.tuning().player.boost_multiplier;
        let duration = game.tuning().power_up.speed_duration;

        place_power_up(&mut game, PowerUpKind::Speed);
        let now = advance_frames(&mut game, T0, 1);

        // Halfway through, pick up a second one
        let half = (duration / 2.0 / FRAME) as u64;
        let now = advance_frames(&mut game, now, half);
        place_power_up(&mut game, PowerUpKind::Speed);
        let now = advance_frames(&mut game, now, 1);

        // Beyond the first countdown's expiry: still boosted, single timer
        let now = advance_frames(&mut game, now, half + 30);
        assert_eq!(game.state().player.speed, boosted);

        // Beyond the reset countdown: back to base
        advance_frames(&mut game, now, half + 60);
        assert_eq!(game.state().player.speed, game.tuning().player.base_speed);
    }

    #[test]
    fn test_game_over_halts_driver_and_timers() {
        let mut game = Game::new(quiet_tuning(), 1);
        game.start_session(Difficulty::Normal, 0.0).unwrap();

        // Park a hazard on the player
        let pos = game.state.player.pos;
        let id = game.state.next_entity_id();
        game.state.hazards.push(Hazard {
            id,
            kind: HazardKind::Normal,
            pos: pos - Vec2::new(0.0, 5.0),
            size: 20.0,
            exploded: false,
        });

        let now = advance_frames(&mut game, T0, 2);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(game.timers.is_empty());
        let score = game.state().score;

        // Further frames change nothing
        advance_frames(&mut game, now, 120);
        assert_eq!(game.state().score, score);
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_win_at_max_score_halts_the_driver() {
        let mut tuning = quiet_tuning();
        tuning.session.max_score = Some(30);
        let mut game = Game::new(tuning, 1);
        game.start_session(Difficulty::Normal, 0.0).unwrap();

        let now = advance_frames(&mut game, T0, 45);
        assert_eq!(game.phase(), GamePhase::Won);
        assert_eq!(game.state().score, 30);

        advance_frames(&mut game, now, 45);
        assert_eq!(game.state().score, 30);
    }

    #[test]
    fn test_retry_restarts_at_the_same_difficulty() {
        let mut tuning = quiet_tuning();
        tuning.session.max_score = Some(5);
        let mut game = Game::new(tuning, 1);
        game.start_session(Difficulty::Hard, 0.0).unwrap();

        let now = advance_frames(&mut game, T0, 10);
        assert_eq!(game.phase(), GamePhase::Won);

        game.retry(now).unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().score, 0);
        game.drain_events();
        let session = game.session.unwrap();
        assert_eq!(session.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_stale_effect_expiry_cannot_reach_a_new_session() {
        let mut game = Game::new(quiet_tuning(), 1);
        game.start_session(Difficulty::Normal, 0.0).unwrap();
        let duration = game.tuning().power_up.speed_duration;

        place_power_up(&mut game, PowerUpKind::Speed);
        let now = advance_frames(&mut game, T0, 1);

        // Reset mid-boost: teardown must cancel the pending expiry
        game.back_to_menu();
        game.start_session(Difficulty::Normal, now).unwrap();
        game.drain_events();

        // Drive well past the old expiry time
        advance_frames(&mut game, now, (duration / FRAME) as u64 + 60);
        assert!(
            !game
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::EffectExpired { .. }))
        );
    }

    #[test]
    fn test_back_to_menu_tears_the_session_down() {
        let mut game = Game::new(quiet_tuning(), 1);
        game.start_session(Difficulty::Easy, 0.0).unwrap();
        advance_frames(&mut game, T0, 10);

        game.back_to_menu();
        assert_eq!(game.phase(), GamePhase::Menu);
        assert!(game.timers.is_empty());

        // Advancing on the menu is a no-op
        advance_frames(&mut game, 10.0, 10);
        assert_eq!(game.phase(), GamePhase::Menu);
    }
}
