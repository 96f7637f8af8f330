/// Keyboard state tracker.
///
/// Terminal input arrives as discrete events, so "held" is inferred: a key
/// counts as held until its last Press/Repeat is older than HOLD_TIMEOUT.
/// On terminals whose keyboard enhancement reports Release events, the
/// explicit release is honored instead.
///
/// Movement and jump use the held state (continuous); pause/reset/quit use
/// fresh presses (edge-triggered).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEventKind, KeyModifiers};

/// Without a Press/Repeat event for this long, a key is considered released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct Keyboard {
    /// Timestamp of the last Press/Repeat event for each key.
    last_seen: HashMap<KeyCode, Instant>,
    /// Keys that went from released to held during the latest drain.
    fresh: Vec<KeyCode>,
    /// Ctrl+C observed during the latest drain.
    ctrl_c: bool,
    /// Honor Release events (only once the enhancement is confirmed).
    honor_release: bool,
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard {
            last_seen: HashMap::with_capacity(16),
            fresh: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events. Call once per frame, before the
    /// simulation step.
    pub fn drain_events(&mut self) {
        self.fresh.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            let Ok(Event::Key(key)) = event::read() else { continue };

            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            {
                self.ctrl_c = true;
            }

            match key.kind {
                KeyEventKind::Release if self.honor_release => {
                    self.last_seen.remove(&key.code);
                }
                KeyEventKind::Release => {
                    // Without the enhancement, releases are unreliable;
                    // rely on the timeout expiry instead.
                }
                _ => {
                    let was_held = self.held(key.code);
                    self.last_seen.insert(key.code, Instant::now());
                    if !was_held {
                        self.fresh.push(key.code);
                    }
                }
            }
        }

        let now = Instant::now();
        self.last_seen.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Continuous: is this key currently held?
    pub fn held(&self, code: KeyCode) -> bool {
        self.last_seen
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.held(*c))
    }

    /// Edge-triggered: did this key go down during the latest drain?
    pub fn pressed(&self, code: KeyCode) -> bool {
        self.fresh.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.pressed(*c))
    }

    pub fn ctrl_c(&self) -> bool {
        self.ctrl_c
    }
}
