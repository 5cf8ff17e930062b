//! Keyboard input decoding
//!
//! Key events seen during a frame are folded into one [`InputIntent`]. The
//! latest event wins for each direction, and the intent is handed to the game
//! once per frame and then reset.

use crate::game::InputIntent;
use crate::piece::Step;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Commands handled outside the game core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub rotate_left: Vec<KeyCode>,
    pub rotate_right: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let lower = s.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    tracing::warn!("ignoring unknown key binding {:?}", s);
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            rotate_left: Self::parse_keys(&settings.keys.rotate_left),
            rotate_right: Self::parse_keys(&settings.keys.rotate_right),
            restart: Self::parse_keys(&settings.keys.restart),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Accumulates key presses into the next tick's intent
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    bindings: KeyBindings,
    pending: InputIntent,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bindings: KeyBindings::from_settings(settings),
            pending: InputIntent::default(),
        }
    }

    /// Handle a key press event
    /// Returns a command when the key is not meant for the game
    pub fn key_down(&mut self, key: KeyEvent) -> Option<Command> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);
        let b = &self.bindings;

        if b.move_left.contains(&code) {
            self.pending.movement = Step::Left;
        } else if b.move_right.contains(&code) {
            self.pending.movement = Step::Right;
        } else if b.soft_drop.contains(&code) {
            self.pending.soft_drop = true;
        } else if b.rotate_left.contains(&code) {
            self.pending.rotation = Step::Left;
        } else if b.rotate_right.contains(&code) {
            self.pending.rotation = Step::Right;
        } else if b.restart.contains(&code) {
            self.pending.restart = true;
        } else if b.quit.contains(&code) {
            return Some(Command::Quit);
        }

        None
    }

    /// Return the intent collected since the last call and start a new one
    pub fn take_intent(&mut self) -> InputIntent {
        std::mem::take(&mut self.pending)
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
