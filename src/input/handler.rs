use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, GameState};

/// What a key press asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Leave the game view
    Close,
    /// Flip `game_started` on
    Start,
    /// Reset after game over
    Restart,
    /// Change direction on the next move
    Steer(Direction),
    /// Unrecognized key, or its precondition does not hold
    None,
}

impl KeyAction {
    /// Recognized keys swallow the event, everything else passes through
    pub fn is_consumed(&self) -> bool {
        !matches!(self, KeyAction::None)
    }
}

/// Maps key presses to actions, given the current game state.
///
/// Works on browser-style key names (`"Escape"`, `"ArrowUp"`, `"p"`) compared
/// case-insensitively, so it can be fed from any host. `handle_key_event`
/// is the crossterm adapter.
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, state: &GameState) -> KeyAction {
        match Self::key_name(key.code) {
            Some(name) => self.resolve(&name, state),
            None => KeyAction::None,
        }
    }

    /// Resolve a key name against the preconditions of each binding
    pub fn resolve(&self, key: &str, state: &GameState) -> KeyAction {
        let key = key.to_lowercase();

        match key.as_str() {
            "escape" => KeyAction::Close,
            "p" if !state.game_started => KeyAction::Start,
            "r" if state.game_over => KeyAction::Restart,
            "arrowup" | "arrowdown" | "arrowleft" | "arrowright" if state.is_active() => {
                match Self::arrow_direction(&key) {
                    Some(direction) => KeyAction::Steer(direction),
                    None => KeyAction::None,
                }
            }
            _ => KeyAction::None,
        }
    }

    /// Ctrl+C arrives as a key press in raw mode
    pub fn is_interrupt(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
    }

    /// Browser-style name for a crossterm key code
    pub fn key_name(code: KeyCode) -> Option<String> {
        let name = match code {
            KeyCode::Esc => "Escape".to_string(),
            KeyCode::Up => "ArrowUp".to_string(),
            KeyCode::Down => "ArrowDown".to_string(),
            KeyCode::Left => "ArrowLeft".to_string(),
            KeyCode::Right => "ArrowRight".to_string(),
            KeyCode::Char(c) => c.to_string(),
            _ => return None,
        };
        Some(name)
    }

    fn arrow_direction(key: &str) -> Option<Direction> {
        match key {
            "arrowup" => Some(Direction::Up),
            "arrowdown" => Some(Direction::Down),
            "arrowleft" => Some(Direction::Left),
            "arrowright" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
