//! The engine instance currently driven by the facade.

use tracing::{debug, warn};
use tvplay_core::{BackendKind, MediaSource, Result};

use crate::engine::Engine;

/// Tagged engine handle. At most one exists per facade.
pub enum ActiveEngine {
    Adaptive(Box<dyn Engine>),
    Decoder(Box<dyn Engine>),
}

impl ActiveEngine {
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Adaptive(_) => BackendKind::Adaptive,
            Self::Decoder(_) => BackendKind::Decoder,
        }
    }

    pub fn engine(&self) -> &dyn Engine {
        match self {
            Self::Adaptive(engine) | Self::Decoder(engine) => engine.as_ref(),
        }
    }

    pub fn engine_mut(&mut self) -> &mut dyn Engine {
        match self {
            Self::Adaptive(engine) | Self::Decoder(engine) => engine.as_mut(),
        }
    }

    /// Assign a source and start loading it.
    ///
    /// Only the adaptive engine needs an explicit prepare; the decoder
    /// starts loading on assignment.
    pub fn load(&mut self, source: &MediaSource) -> Result<()> {
        match self {
            Self::Adaptive(engine) => {
                engine.set_media_source(source)?;
                engine.prepare()
            }
            Self::Decoder(engine) => engine.set_media_source(source),
        }
    }

    /// Stop and free the engine.
    ///
    /// A failing stop is logged and does not prevent the release.
    pub fn release(mut self) -> Result<()> {
        let kind = self.kind();
        let engine = self.engine_mut();
        if let Err(e) = engine.stop() {
            warn!("Failed to stop {kind:?} engine before release: {e}");
        }
        engine.release()?;
        debug!("{kind:?} engine released");
        Ok(())
    }
}

impl std::fmt::Debug for ActiveEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ActiveEngine").field(&self.kind()).finish()
    }
}
