/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub gamepad: GamepadConfig,
    /// Delay appended to every frame, keeping the loop from spinning.
    pub frame_sleep_ms: u64,
    /// Optional ASCII level file; the built-in layout is used when absent.
    pub level_file: Option<PathBuf>,
}

/// The tunables the simulation consumes. All three must be positive;
/// non-positive values from the file are rejected with a warning.
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Downward acceleration, px/s². Higher is stronger.
    pub gravity: f32,
    /// Horizontal run speed, px/s.
    pub run_speed: f32,
    /// Initial upward velocity magnitude of a jump.
    pub jump_power: f32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub pause: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_run_speed")]
    run_speed: f32,
    #[serde(default = "default_jump_power")]
    jump_power: f32,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_frame_sleep")]
    frame_sleep_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_pause")]
    pause: Vec<String>,
    #[serde(default = "default_pad_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    level_file: Option<String>,
}

// ── Defaults ──

fn default_gravity() -> f32 { 8.0 }
fn default_run_speed() -> f32 { 450.0 }
fn default_jump_power() -> f32 { 2.0 }
fn default_frame_sleep() -> u64 { 5 }

fn default_pad_jump() -> Vec<String> { vec!["A".into(), "B".into()] }
fn default_pad_pause() -> Vec<String> { vec!["Start".into()] }
fn default_pad_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            gravity: default_gravity(),
            run_speed: default_run_speed(),
            jump_power: default_jump_power(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { frame_sleep_ms: default_frame_sleep() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            pause: default_pad_pause(),
            quit: default_pad_quit(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        let physics = PhysicsConfig {
            gravity: positive_or(toml_cfg.physics.gravity, "physics.gravity", default_gravity()),
            run_speed: positive_or(toml_cfg.physics.run_speed, "physics.run_speed", default_run_speed()),
            jump_power: positive_or(toml_cfg.physics.jump_power, "physics.jump_power", default_jump_power()),
        };

        GameConfig {
            physics,
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                pause: toml_cfg.gamepad.pause,
                quit: toml_cfg.gamepad.quit,
            },
            frame_sleep_ms: toml_cfg.display.frame_sleep_ms,
            level_file: toml_cfg.general.level_file.map(PathBuf::from),
        }
    }
}

fn positive_or(value: f32, key: &str, fallback: f32) -> f32 {
    if value > 0.0 && value.is_finite() {
        value
    } else {
        eprintln!("Warning: {key} must be a positive number; using {fallback}");
        fallback
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
