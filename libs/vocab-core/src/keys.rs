//! Keyboard bindings for a review session.

use serde::{Deserialize, Serialize};

/// A key press relevant to reviewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowRight,
    Char(char),
}

/// Session command issued by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Flip,
    Skip,
    RepeatLater,
    Remember,
    Forget,
    Restart,
}

/// Map a key to a command. Every binding is off once the session is completed.
pub fn command_for(key: Key, revealed: bool, completed: bool) -> Option<Command> {
    if completed {
        return None;
    }

    match key {
        Key::Space if revealed => Some(Command::Remember),
        Key::Space => Some(Command::Flip),
        Key::ArrowRight => Some(Command::Skip),
        Key::Char(c) => match c.to_ascii_lowercase() {
            'r' => Some(Command::RepeatLater),
            'f' => Some(Command::Forget),
            _ => None,
        },
    }
}
