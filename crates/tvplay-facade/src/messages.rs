//! Human-readable text and transient notifications.

use tracing::info;
use tvplay_core::{BackendKind, DecodeMode, MessageKey};

/// Localized string lookup.
pub trait Messages: Send + Sync {
    fn text(&self, key: &MessageKey) -> String;
}

/// Transient on-screen notifications.
pub trait Notifier: Send + Sync {
    fn show(&self, text: &str);
}

/// English message table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl Messages for DefaultMessages {
    fn text(&self, key: &MessageKey) -> String {
        match key {
            MessageKey::ErrorLoad => "Playback URL is empty".to_string(),
            MessageKey::ErrorFormat => "Playback failed, format not supported".to_string(),
            MessageKey::ErrorParse => "Failed to resolve playback URL".to_string(),
            MessageKey::ParseFrom(label) => format!("Resolved by {label}"),
            MessageKey::Backend(BackendKind::Adaptive) => "Adaptive".to_string(),
            MessageKey::Backend(BackendKind::Decoder) => "Decoder".to_string(),
            MessageKey::Decode(DecodeMode::Software) => "Software".to_string(),
            MessageKey::Decode(DecodeMode::Hardware) => "Hardware".to_string(),
        }
    }
}

/// Notifier that writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, text: &str) {
        info!("{text}");
    }
}
