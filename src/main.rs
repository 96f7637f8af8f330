/// Entry point and frame driver.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::entity::{FrameInput, MoveDir};
use sim::event::GameEvent;
use sim::level::{self, Level};
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::Keyboard;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

fn main() {
    let config = GameConfig::load();
    let level = load_starting_level(&config);

    let mut world = WorldState::new(level, config.physics.clone());

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Boxbound!");
}

/// Level file from config when present and loadable, built-in otherwise.
fn load_starting_level(config: &GameConfig) -> Level {
    match &config.level_file {
        Some(path) => match level::load_level_file(path) {
            Ok(level) => level,
            Err(e) => {
                eprintln!("Warning: level file {}: {e}", path.display());
                eprintln!("Using the built-in level.");
                level::builtin_level()
            }
        },
        None => level::builtin_level(),
    }
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = Keyboard::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let frame_sleep = Duration::from_millis(config.frame_sleep_ms);
    let mut frame_start = Instant::now();

    loop {
        // dt is raw wall-clock time since the previous frame began,
        // deliberately unclamped: a stall becomes one large step.
        let now = Instant::now();
        let dt = now.duration_since(frame_start).as_secs_f32();
        frame_start = now;
        if dt > 0.0 {
            let instant_fps = 1.0 / dt;
            world.fps = if world.fps == 0.0 {
                instant_fps
            } else {
                world.fps * 0.95 + instant_fps * 0.05
            };
        }

        kb.drain_events();
        gp.update();

        let quit = kb.ctrl_c() || kb.any_pressed(KEYS_QUIT) || gp.quit_pressed();
        if kb.any_pressed(KEYS_PAUSE) || gp.pause_pressed() {
            world.paused = !world.paused;
        }
        if kb.any_pressed(KEYS_RESET) && !world.paused {
            world.respawn();
        }

        let input = FrameInput {
            movement: detect_movement(&kb, &gp),
            jump: kb.any_held(KEYS_JUMP) || gp.jump_held(),
        };
        let events = step::step(world, input, dt);
        process_sound_events(sound, &events);

        renderer.render(world)?;

        // Quit only after the frame that observed it fully rendered.
        if quit {
            break;
        }
        std::thread::sleep(frame_sleep);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_JUMP: &[KeyCode] = &[KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_RESET: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

fn detect_movement(kb: &Keyboard, gp: &GamepadState) -> Option<MoveDir> {
    if kb.any_held(KEYS_LEFT) || gp.left_held() {
        Some(MoveDir::Left)
    } else if kb.any_held(KEYS_RIGHT) || gp.right_held() {
        Some(MoveDir::Right)
    } else {
        None
    }
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::Jumped => sfx.play_jump(),
            GameEvent::Landed { .. } => sfx.play_land(),
            GameEvent::WallBumped { .. } | GameEvent::CeilingBumped { .. } => sfx.play_bump(),
            GameEvent::Fell => sfx.play_fall(),
        }
    }
}
