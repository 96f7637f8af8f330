/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Run left / right
///   A / B                 →  Jump
///   Start                 →  Pause
///   Select                →  Quit

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

const STICK_DEADZONE: f32 = 0.3;

const BTN_COUNT: usize = 6;

/// Logical button identifiers (one per physical button we track).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Btn {
    A, // South
    B, // East
    X, // West
    Y, // North
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    jump: Vec<Btn>,
    pause: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            jump: vec![Btn::A, Btn::B],
            pause: vec![Btn::Start],
            quit: vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    held: [bool; BTN_COUNT],
    pressed: [bool; BTN_COUNT],

    dpad_left: bool,
    dpad_right: bool,
    stick_x: f32,

    map: ActionMap,

    #[allow(dead_code)]
    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(_) => (None, false),
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            held: [false; BTN_COUNT],
            pressed: [false; BTN_COUNT],
            dpad_left: false,
            dpad_right: false,
            stick_x: 0.0,
            map: ActionMap::default(),
            connected,
        }
    }

    /// Replace the default action mapping with names from config.toml.
    /// Unknown names are skipped; an action with no valid names keeps its
    /// default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        let parse = |names: &[String], fallback: &[Btn]| {
            let btns: Vec<Btn> = names.iter().filter_map(|n| Btn::from_name(n)).collect();
            if btns.is_empty() { fallback.to_vec() } else { btns }
        };
        self.map = ActionMap {
            jump: parse(&cfg.jump, &ActionMap::default().jump),
            pause: parse(&cfg.pause, &ActionMap::default().pause),
            quit: parse(&cfg.quit, &ActionMap::default().quit),
        };
    }

    /// Drain pending gilrs events. Call once per frame.
    pub fn update(&mut self) {
        self.pressed = [false; BTN_COUNT];

        #[cfg(feature = "gamepad")]
        {
            let Some(gilrs) = self.gilrs.as_mut() else { return };
            while let Some(ev) = gilrs.next_event() {
                self.connected = true;
                match ev.event {
                    EventType::ButtonPressed(button, _) => match button {
                        Button::DPadLeft => self.dpad_left = true,
                        Button::DPadRight => self.dpad_right = true,
                        other => {
                            if let Some(btn) = Btn::from_gilrs(other) {
                                let i = btn as usize;
                                if !self.held[i] {
                                    self.pressed[i] = true;
                                }
                                self.held[i] = true;
                            }
                        }
                    },
                    EventType::ButtonReleased(button, _) => match button {
                        Button::DPadLeft => self.dpad_left = false,
                        Button::DPadRight => self.dpad_right = false,
                        other => {
                            if let Some(btn) = Btn::from_gilrs(other) {
                                self.held[btn as usize] = false;
                            }
                        }
                    },
                    EventType::AxisChanged(Axis::LeftStickX, value, _) => {
                        self.stick_x = value;
                    }
                    EventType::Disconnected => {
                        self.held = [false; BTN_COUNT];
                        self.dpad_left = false;
                        self.dpad_right = false;
                        self.stick_x = 0.0;
                    }
                    _ => {}
                }
            }
        }
    }

    // ── Queries ──

    pub fn left_held(&self) -> bool {
        self.dpad_left || self.stick_x < -STICK_DEADZONE
    }

    pub fn right_held(&self) -> bool {
        self.dpad_right || self.stick_x > STICK_DEADZONE
    }

    pub fn jump_held(&self) -> bool {
        self.map.jump.iter().any(|b| self.held[*b as usize])
    }

    pub fn pause_pressed(&self) -> bool {
        self.map.pause.iter().any(|b| self.pressed[*b as usize])
    }

    pub fn quit_pressed(&self) -> bool {
        self.map.quit.iter().any(|b| self.pressed[*b as usize])
    }
}
