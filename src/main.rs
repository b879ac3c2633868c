//! Sky Dodge entry point
//!
//! Headless autoplay demo: runs one full session on a simulated clock with
//! a small dodge policy standing in for keyboard input, logging session
//! events as they happen.
//!
//! Usage: `skydodge [difficulty] [seed] [tuning.json]`

use std::process::ExitCode;
use std::str::FromStr;

use log::{error, info};

use skydodge::consts::TICK_DT;
use skydodge::render;
use skydodge::sim::{GameEvent, GamePhase, GameState, TickInput};
use skydodge::tuning::ConfigError;
use skydodge::{Difficulty, Game, Tuning};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ConfigError> {
    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        Some(s) => Difficulty::from_str(&s)?,
        None => Difficulty::Normal,
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0xD0D6E);
    let tuning = match args.next() {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let mut game = Game::new(tuning, seed);
    game.open_difficulty_select();
    game.start_session(difficulty, 0.0)?;

    // Simulated clock: one frame per tick, as fast as the host allows
    let mut now = 0.0;
    let safety_stop = 1_000_000u64;
    for _ in 0..safety_stop {
        if game.phase() != GamePhase::Playing {
            break;
        }
        now += TICK_DT;
        let input = autopilot(game.state(), game.tuning());
        game.advance(now, &input);
        for event in game.drain_events() {
            match event {
                GameEvent::Progress { score, fraction } if score % 600 == 0 => {
                    info!("score {score} ({:.0}%)", fraction * 100.0);
                }
                GameEvent::PowerUpCollected { kind } => info!("collected {kind:?}"),
                GameEvent::EffectExpired { kind } => info!("{kind:?} expired"),
                GameEvent::GameOver { score } => info!("game over at score {score}"),
                GameEvent::Won { score } => info!("cleared the run at score {score}"),
                _ => {}
            }
        }
    }

    let mut sprites = 0usize;
    render::frame(game.state(), game.tuning(), &mut |_| sprites += 1);
    info!("final frame holds {sprites} sprites");
    println!("final score: {}", game.state().score);
    Ok(())
}

/// Stand-in for keyboard input: sidestep the nearest falling threat, and
/// drift toward power-ups (or back to center) when nothing is close.
fn autopilot(state: &GameState, tuning: &Tuning) -> TickInput {
    let player_mid = state.player.pos.x + state.player.size.x / 2.0;
    let danger_band = state.player.size.x * 1.6;

    // The threat is the lowest hazard or fragment falling near our column
    let mut threat: Option<(f32, f32)> = None; // (center x, y)
    let hazard_columns = state
        .hazards
        .iter()
        .map(|h| (h.pos.x + h.size / 2.0, h.pos.y))
        .chain(
            state
                .fragments
                .iter()
                .map(|f| (f.pos.x + f.size / 2.0, f.pos.y)),
        );
    for (cx, y) in hazard_columns {
        if (cx - player_mid).abs() < danger_band && y < state.player.pos.y {
            if threat.is_none_or(|(_, ty)| y > ty) {
                threat = Some((cx, y));
            }
        }
    }

    if let Some((cx, _)) = threat {
        return TickInput {
            left: cx >= player_mid,
            right: cx < player_mid,
        };
    }

    // Nothing incoming: chase the nearest power-up, else re-center
    let target = state
        .power_ups
        .iter()
        .map(|p| p.pos.x + p.size / 2.0)
        .min_by(|a, b| {
            (a - player_mid)
                .abs()
                .total_cmp(&(b - player_mid).abs())
        })
        .unwrap_or(tuning.playfield.width / 2.0);

    TickInput {
        left: target < player_mid - 2.0,
        right: target > player_mid + 2.0,
    }
}
