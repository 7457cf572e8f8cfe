//! Adaptive-streaming engine specifics.

use tracing::debug;
use tvplay_core::{Headers, MediaSource, PlayerState, SourceHint};

use crate::callbacks::{EngineFault, EngineSignal};

/// Container or media malformed.
pub const ERROR_PARSING_CONTAINER_MALFORMED: i32 = 3001;
/// Manifest malformed.
pub const ERROR_PARSING_MANIFEST_MALFORMED: i32 = 3002;
/// No extractor recognised the container.
pub const ERROR_PARSING_CONTAINER_UNSUPPORTED: i32 = 3003;

/// Native notices raised by an adaptive-streaming engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptiveNotice {
    /// Playback state code: 1 idle, 2 buffering, 3 ready, 4 ended.
    StateChanged(i32),
    PlayerError { code: i32 },
    AudioSinkError(String),
}

impl AdaptiveNotice {
    pub fn normalize(self) -> Option<EngineSignal> {
        match self {
            Self::StateChanged(code) => match PlayerState::from_code(code) {
                Some(PlayerState::Loading) | None => {
                    debug!("Ignoring adaptive state code {code}");
                    None
                }
                Some(state) => Some(EngineSignal::State(state)),
            },
            Self::PlayerError { code } => Some(EngineSignal::Fault(EngineFault::Playback {
                code: Some(code),
            })),
            Self::AudioSinkError(reason) => {
                debug!("Audio sink error: {reason}");
                Some(EngineSignal::Fault(EngineFault::AudioSink))
            }
        }
    }
}

/// Fallback hint after a failed attempt, if the error code calls for one.
pub const fn fallback_hint(error_code: i32) -> Option<SourceHint> {
    match error_code {
        ERROR_PARSING_CONTAINER_UNSUPPORTED => Some(SourceHint::Hls),
        ERROR_PARSING_CONTAINER_MALFORMED | ERROR_PARSING_MANIFEST_MALFORMED => {
            Some(SourceHint::Progressive)
        }
        _ => None,
    }
}

/// Build the source for a (re)try, degrading the hint when the last error
/// code says the inferred container was wrong.
pub fn source_for(url: impl Into<String>, headers: Headers, last_error_code: i32) -> MediaSource {
    let source = MediaSource::new(url, headers);
    match fallback_hint(last_error_code) {
        Some(hint) => source.with_hint(hint),
        None => source,
    }
}
