//! Facade-level events and message keys.

use serde::{Deserialize, Serialize};

use super::{BackendKind, DecodeMode};

/// Player state forwarded from the active engine.
///
/// Codes 1..=4 match the adaptive engine's playback states; `Loading` is
/// emitted by the facade itself after a media source is assigned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Loading,
    Idle,
    Buffering,
    Ready,
    Ended,
}

impl PlayerState {
    pub const fn code(self) -> i32 {
        match self {
            Self::Loading => 0,
            Self::Idle => 1,
            Self::Buffering => 2,
            Self::Ready => 3,
            Self::Ended => 4,
        }
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Loading),
            1 => Some(Self::Idle),
            2 => Some(Self::Buffering),
            3 => Some(Self::Ready),
            4 => Some(Self::Ended),
            _ => None,
        }
    }
}

/// Key into the localized message table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKey {
    /// Source URL is empty or unusable.
    ErrorLoad,
    /// Engine playback fault.
    ErrorFormat,
    /// Indirect URL resolution failed.
    ErrorParse,
    /// "Parsed by <label>" notification.
    ParseFrom(String),
    /// Display name of a backend.
    Backend(BackendKind),
    /// Display name of a decode mode.
    Decode(DecodeMode),
}

/// Error taxonomy reported upward as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Load,
    Format,
    Parse,
}

impl ErrorKind {
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Format)
    }

    pub const fn message_key(self) -> MessageKey {
        match self {
            Self::Load => MessageKey::ErrorLoad,
            Self::Format => MessageKey::ErrorFormat,
            Self::Parse => MessageKey::ErrorParse,
        }
    }
}

/// Events published by the facade to its subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacadeEvent {
    /// Playback state changed.
    StateChanged(PlayerState),
    /// An error the caller may retry, surface or give up on.
    Error { key: MessageKey, fatal: bool },
}

impl FacadeEvent {
    pub const fn error(kind: ErrorKind) -> Self {
        Self::Error {
            key: kind.message_key(),
            fatal: kind.is_fatal(),
        }
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Error { fatal: true, .. })
    }
}
