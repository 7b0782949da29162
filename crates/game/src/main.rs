//! SkyStrike headless runner: flies a scripted sortie at a fixed 60 Hz and
//! logs what happens.

use anyhow::{Context, Result};
use game::{GameConfig, GameMode, SimEvent, SimulationWorld};
use input::{Bindings, ElementState, InputState, KeyCode};

const STEP: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: u32 = 45;
/// Seconds to watch the wreck burn before restarting.
const RESTART_DELAY: f32 = 4.0;

/// (seconds, key, pressed)
const SCRIPT: &[(f32, KeyCode, bool)] = &[
    (0.0, KeyCode::ShiftLeft, true),
    (1.5, KeyCode::ShiftLeft, false),
    (3.0, KeyCode::KeyA, true),
    (3.8, KeyCode::KeyA, false),
    (5.0, KeyCode::Space, true),
    (5.1, KeyCode::Space, false),
    (5.5, KeyCode::Space, true),
    (5.6, KeyCode::Space, false),
    (7.0, KeyCode::ArrowRight, true),
    (7.5, KeyCode::ArrowRight, false),
    (9.0, KeyCode::KeyD, true),
    (9.8, KeyCode::KeyD, false),
    (11.0, KeyCode::KeyE, true),
    (11.4, KeyCode::KeyE, false),
    (12.0, KeyCode::KeyC, true),
    (13.5, KeyCode::KeyC, false),
    (15.0, KeyCode::KeyW, true),
    (18.0, KeyCode::KeyW, false),
    (24.0, KeyCode::Space, true),
    (24.1, KeyCode::Space, false),
];

fn run_seconds() -> Result<u32> {
    match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("expected a number of seconds, got {arg:?}")),
        None => Ok(DEFAULT_SECONDS),
    }
}

fn log_event(event: &SimEvent) {
    match event {
        SimEvent::MissileFired { kind, position } => log::debug!("{kind:?} missile away from {position}"),
        SimEvent::Explosion { position, big } => log::debug!("Explosion at {position} (big: {big})"),
        SimEvent::Crash { position } => log::info!("CRASH at {position}"),
        SimEvent::CannonDestroyed { position } => log::info!("Cannon destroyed at {position}"),
        SimEvent::ShotDown { position } => log::info!("Hit! Going down at {position}"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seconds = run_seconds()?;
    let config = GameConfig::load();
    let bindings = Bindings::default();

    log::info!("Starting SkyStrike: {} simulated seconds", seconds);
    let mut world = SimulationWorld::new(config);
    let mut input = InputState::new();

    let total_steps = seconds * 60;
    let mut script = SCRIPT.iter().peekable();
    let mut crashed_for = 0.0_f32;
    let mut restarted = false;

    for step in 0..total_steps {
        let t = step as f32 * STEP;
        while let Some(&&(at, key, pressed)) = script.peek() {
            if at > t {
                break;
            }
            let state = if pressed { ElementState::Pressed } else { ElementState::Released };
            input.process_keyboard(key, state);
            script.next();
        }

        let controls = input.controls(&bindings);
        world.tick(STEP, &controls);
        input.end_frame();

        for event in world.drain_events() {
            log_event(&event);
        }

        if world.mode() == GameMode::Crashed {
            crashed_for += STEP;
            if !restarted && crashed_for >= RESTART_DELAY {
                world.restart();
                restarted = true;
                crashed_for = 0.0;
            }
        }

        if (step + 1) % 60 == 0 {
            println!("[{:>3}s] {}", (step + 1) / 60, world.hud());
        }
    }

    let hud = world.hud();
    log::info!(
        "Sortie over: {} kills, {} cannons left, mode {:?}",
        hud.kills,
        hud.threats_remaining,
        hud.mode
    );
    Ok(())
}
