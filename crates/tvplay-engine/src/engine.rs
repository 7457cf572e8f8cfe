//! Engine trait implemented by platform bindings.

use tvplay_core::{DecodeMode, MediaSource, RenderTarget, Result, VideoSize};

use crate::callbacks::EngineCallbacks;

/// Operations the facade needs from a media engine.
///
/// Positions and durations are in milliseconds. A negative duration means
/// the engine does not know it yet (or the stream is live).
pub trait Engine: Send {
    /// Assign the media to play. Replaces any previous source.
    fn set_media_source(&mut self, source: &MediaSource) -> Result<()>;

    /// Start loading the assigned source. Engines that load on assignment
    /// keep the default no-op.
    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    /// Start or resume playback.
    fn start(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Stop playback and drop the assigned source.
    fn stop(&mut self) -> Result<()>;

    /// Seek to an absolute position.
    fn seek(&mut self, position_ms: i64) -> Result<()>;

    fn position(&self) -> i64;

    fn duration(&self) -> i64;

    fn buffered(&self) -> i64;

    fn is_playing(&self) -> bool;

    fn speed(&self) -> f32;

    fn set_speed(&mut self, speed: f32) -> Result<()>;

    fn video_size(&self) -> VideoSize;

    /// Free every native resource. The engine is unusable afterwards.
    fn release(&mut self) -> Result<()>;
}

/// Builds engines for a render target.
///
/// Both constructors register `callbacks` as the engine's only listener.
pub trait EngineFactory: Send + Sync {
    fn create_adaptive(
        &self,
        target: &RenderTarget,
        callbacks: EngineCallbacks,
    ) -> Result<Box<dyn Engine>>;

    fn create_decoder(
        &self,
        target: &RenderTarget,
        decode: DecodeMode,
        callbacks: EngineCallbacks,
    ) -> Result<Box<dyn Engine>>;
}
