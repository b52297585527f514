/// Keyboard state tracker.
///
/// Movement and jump are level-triggered: the scene asks "is this key
/// down right now?" every frame, so the tracker keeps a held set rather
/// than a queue of presses.
///
/// On terminals that support the kitty keyboard protocol, release events
/// are requested and honored. Elsewhere a key counts as held until no
/// Press/Repeat has arrived for `HOLD_TIMEOUT`.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};

/// Without release events, a key is dropped after this long with no
/// Press/Repeat. Must exceed the terminal's auto-repeat delay.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the last drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// True once the terminal accepted the release-event request.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Ask the terminal for Release events. Call after raw mode is on.
    pub fn enable_release_events(&mut self) {
        let supported = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if !supported {
            log::info!("keyboard enhancement unavailable; using {:?} hold timeout", HOLD_TIMEOUT);
            return;
        }
        match execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        ) {
            Ok(()) => {
                self.honor_release = true;
                log::info!("keyboard release events enabled");
            }
            Err(e) => log::warn!("could not enable keyboard enhancement: {e}"),
        }
    }

    /// Undo `enable_release_events`. Safe to call when it was never enabled.
    pub fn restore(&mut self) {
        if !self.honor_release {
            return;
        }
        if let Err(e) = execute!(io::stdout(), PopKeyboardEnhancementFlags) {
            log::warn!("could not restore keyboard mode: {e}");
        }
        self.honor_release = false;
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            let key = match event::read() {
                Ok(Event::Key(key)) => key,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("input read failed: {e}");
                    break;
                }
            };
            self.raw_events.push(key);
            self.apply(key, Instant::now());
        }

        if !self.honor_release {
            self.expire(Instant::now());
        }
    }

    fn apply(&mut self, key: KeyEvent, now: Instant) {
        let code = normalize(key.code);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&code);
            }
            // Unconfirmed releases are ignored; the timeout handles them.
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.last_active.contains_key(&code);
                self.last_active.insert(code, now);
                if !was_held {
                    self.fresh_presses.push(code);
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active
            .retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active.contains_key(&normalize(code))
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Edge trigger: was this key pressed during the last drain?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes
            .iter()
            .any(|c| self.fresh_presses.contains(&normalize(*c)))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
        })
    }
}

/// Fold letter case so Shift or Caps Lock do not split one key in two.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
