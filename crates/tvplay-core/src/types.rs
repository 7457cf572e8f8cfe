//! Core domain types for tvplay.

pub mod backend;
pub mod common;
pub mod event;
pub mod source;
pub mod speed;

pub use backend::{BackendKind, DecodeMode};
pub use common::{format_time, RenderTarget, VideoSize};
pub use event::{ErrorKind, FacadeEvent, MessageKey, PlayerState};
pub use source::{AlternateSource, DirectSource, Headers, MediaSource, PlayRequest, PlayResult, SourceHint};
pub use speed::{cycle_speed, format_speed, toggle_speed, MAX_SPEED, MIN_SPEED, NORMAL_SPEED};
