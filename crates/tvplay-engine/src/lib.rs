//! # tvplay-engine
//!
//! Seam between the playback facade and the two media engines it drives.
//!
//! Features:
//! - One `Engine` trait for both the adaptive-streaming and decoder backends
//! - Callback table handed to engines at construction
//! - Normalization of each backend's native notices into player states and faults
//! - Fallback source hints keyed by the last adaptive error code

pub mod active;
pub mod adaptive;
pub mod callbacks;
pub mod decoder;
pub mod engine;

pub use active::ActiveEngine;
pub use adaptive::{source_for, AdaptiveNotice};
pub use callbacks::{EngineCallbacks, EngineFault, EngineSignal};
pub use decoder::DecoderNotice;
pub use engine::{Engine, EngineFactory};
