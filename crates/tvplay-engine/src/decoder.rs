//! Decoder-based engine specifics.

use tracing::{trace, warn};
use tvplay_core::PlayerState;

use crate::callbacks::{EngineFault, EngineSignal};

pub const INFO_BUFFERING_START: i32 = 701;
pub const INFO_BUFFERING_END: i32 = 702;
pub const INFO_AUDIO_SEEK_RENDERING_START: i32 = 10002;
pub const INFO_VIDEO_SEEK_RENDERING_START: i32 = 10009;

/// Native notices raised by a decoder-based engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderNotice {
    Info { what: i32, extra: i32 },
    Error { what: i32, extra: i32 },
    Prepared,
    Completion,
}

impl DecoderNotice {
    pub fn normalize(self) -> Option<EngineSignal> {
        match self {
            Self::Info { what, extra } => match what {
                INFO_BUFFERING_START => Some(EngineSignal::State(PlayerState::Buffering)),
                INFO_BUFFERING_END
                | INFO_VIDEO_SEEK_RENDERING_START
                | INFO_AUDIO_SEEK_RENDERING_START => Some(EngineSignal::State(PlayerState::Ready)),
                _ => {
                    trace!("Decoder info {what} ({extra})");
                    None
                }
            },
            Self::Error { what, extra } => {
                warn!("Decoder error {what} ({extra})");
                Some(EngineSignal::Fault(EngineFault::Playback { code: None }))
            }
            Self::Prepared => Some(EngineSignal::State(PlayerState::Ready)),
            Self::Completion => Some(EngineSignal::State(PlayerState::Ended)),
        }
    }
}
