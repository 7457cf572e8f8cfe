//! Callback table handed to engines at construction.

use std::fmt;
use std::sync::Arc;

use tvplay_core::PlayerState;

use crate::adaptive::AdaptiveNotice;
use crate::decoder::DecoderNotice;

/// Fault reported by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFault {
    /// Playback failed. `code` is the adaptive engine's error code, kept
    /// for picking fallback sources on retry.
    Playback { code: Option<i32> },
    /// The audio output pipeline failed but playback may continue.
    AudioSink,
}

/// A native notice after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    State(PlayerState),
    Fault(EngineFault),
}

type StateFn = dyn Fn(PlayerState) + Send + Sync;
type FaultFn = dyn Fn(EngineFault) + Send + Sync;

/// Function handles an engine invokes on state changes and faults.
///
/// Engines may call these from their own threads.
#[derive(Clone)]
pub struct EngineCallbacks {
    on_state: Arc<StateFn>,
    on_fault: Arc<FaultFn>,
}

impl EngineCallbacks {
    pub fn new(
        on_state: impl Fn(PlayerState) + Send + Sync + 'static,
        on_fault: impl Fn(EngineFault) + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_state: Arc::new(on_state),
            on_fault: Arc::new(on_fault),
        }
    }

    /// Callbacks that drop everything.
    pub fn noop() -> Self {
        Self::new(|_| {}, |_| {})
    }

    pub fn state(&self, state: PlayerState) {
        (self.on_state)(state);
    }

    pub fn fault(&self, fault: EngineFault) {
        (self.on_fault)(fault);
    }

    pub fn emit(&self, signal: EngineSignal) {
        match signal {
            EngineSignal::State(state) => self.state(state),
            EngineSignal::Fault(fault) => self.fault(fault),
        }
    }

    /// Feed a native adaptive-engine notice.
    pub fn adaptive(&self, notice: AdaptiveNotice) {
        if let Some(signal) = notice.normalize() {
            self.emit(signal);
        }
    }

    /// Feed a native decoder-engine notice.
    pub fn decoder(&self, notice: DecoderNotice) {
        if let Some(signal) = notice.normalize() {
            self.emit(signal);
        }
    }
}

impl fmt::Debug for EngineCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineCallbacks").finish_non_exhaustive()
    }
}
