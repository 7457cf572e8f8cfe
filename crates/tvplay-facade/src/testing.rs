//! Fakes for facade tests.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tvplay_core::{
    BackendKind, DecodeMode, Error, MediaSource, PlayResult, RenderTarget, Result, VideoSize,
};
use tvplay_engine::{Engine, EngineCallbacks, EngineFactory};
use tvplay_prefs::MemoryPreferences;
use tvplay_resolver::{ResolutionCallback, ResolutionHandle, Resolver};

use crate::facade::PlaybackFacade;
use crate::messages::{DefaultMessages, Notifier};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSource(MediaSource),
    Prepare,
    Start,
    Pause,
    Stop,
    Seek(i64),
    SetSpeed(f32),
    Release,
}

pub struct FakeState {
    pub kind: BackendKind,
    pub decode: Option<DecodeMode>,
    pub calls: Vec<Call>,
    pub position: i64,
    pub duration: i64,
    pub speed: f32,
    pub playing: bool,
    pub released: bool,
    pub fail_load: bool,
    pub fail_speed: bool,
    pub callbacks: EngineCallbacks,
}

impl FakeState {
    pub fn sources(&self) -> Vec<MediaSource> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::SetSource(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn seeks(&self) -> Vec<i64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Seek(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

pub type Shared = Arc<Mutex<FakeState>>;

pub struct FakeEngine(Shared);

impl FakeEngine {
    fn record(&self, call: Call) {
        self.0.lock().calls.push(call);
    }
}

impl Engine for FakeEngine {
    fn set_media_source(&mut self, source: &MediaSource) -> Result<()> {
        if self.0.lock().fail_load {
            return Err(Error::Engine("load rejected".into()));
        }
        self.record(Call::SetSource(source.clone()));
        Ok(())
    }

    fn prepare(&mut self) -> Result<()> {
        self.record(Call::Prepare);
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.record(Call::Start);
        self.0.lock().playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.record(Call::Pause);
        self.0.lock().playing = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.record(Call::Stop);
        self.0.lock().playing = false;
        Ok(())
    }

    fn seek(&mut self, position_ms: i64) -> Result<()> {
        self.record(Call::Seek(position_ms));
        self.0.lock().position = position_ms;
        Ok(())
    }

    fn position(&self) -> i64 {
        self.0.lock().position
    }

    fn duration(&self) -> i64 {
        self.0.lock().duration
    }

    fn buffered(&self) -> i64 {
        let state = self.0.lock();
        (state.position + 5_000).min(state.duration.max(0))
    }

    fn is_playing(&self) -> bool {
        self.0.lock().playing
    }

    fn speed(&self) -> f32 {
        self.0.lock().speed
    }

    fn set_speed(&mut self, speed: f32) -> Result<()> {
        if self.0.lock().fail_speed {
            return Err(Error::Engine("speed rejected".into()));
        }
        self.record(Call::SetSpeed(speed));
        self.0.lock().speed = speed;
        Ok(())
    }

    fn video_size(&self) -> VideoSize {
        VideoSize::new(1280, 720)
    }

    fn release(&mut self) -> Result<()> {
        self.record(Call::Release);
        self.0.lock().released = true;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeFactory {
    pub created: Mutex<Vec<Shared>>,
    pub fail: AtomicBool,
}

impl FakeFactory {
    pub fn last(&self) -> Shared {
        self.created.lock().last().cloned().unwrap()
    }

    pub fn live(&self) -> usize {
        self.created.lock().iter().filter(|s| !s.lock().released).count()
    }

    fn build(
        &self,
        kind: BackendKind,
        decode: Option<DecodeMode>,
        callbacks: EngineCallbacks,
    ) -> Result<Box<dyn Engine>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::EngineConstruction("no surface".into()));
        }
        let state = Arc::new(Mutex::new(FakeState {
            kind,
            decode,
            calls: Vec::new(),
            position: 0,
            duration: 0,
            speed: 1.0,
            playing: false,
            released: false,
            fail_load: false,
            fail_speed: false,
            callbacks,
        }));
        self.created.lock().push(state.clone());
        Ok(Box::new(FakeEngine(state)))
    }
}

impl EngineFactory for FakeFactory {
    fn create_adaptive(
        &self,
        _target: &RenderTarget,
        callbacks: EngineCallbacks,
    ) -> Result<Box<dyn Engine>> {
        self.build(BackendKind::Adaptive, None, callbacks)
    }

    fn create_decoder(
        &self,
        _target: &RenderTarget,
        decode: DecodeMode,
        callbacks: EngineCallbacks,
    ) -> Result<Box<dyn Engine>> {
        self.build(BackendKind::Decoder, Some(decode), callbacks)
    }
}

/// Resolver whose tasks complete only when a test says so.
#[derive(Default)]
pub struct ManualResolver {
    pub launched: Mutex<Vec<(PlayResult, bool, ResolutionCallback)>>,
}

impl ManualResolver {
    pub fn callback(&self, index: usize) -> ResolutionCallback {
        self.launched.lock()[index].2.clone()
    }

    pub fn count(&self) -> usize {
        self.launched.lock().len()
    }
}

impl Resolver for ManualResolver {
    fn launch(
        &self,
        result: &PlayResult,
        use_alternate: bool,
        callback: ResolutionCallback,
    ) -> ResolutionHandle {
        let handle = callback.handle();
        self.launched
            .lock()
            .push((result.clone(), use_alternate, callback));
        handle
    }
}

#[derive(Default)]
pub struct RecordingNotifier(pub Mutex<Vec<String>>);

impl Notifier for RecordingNotifier {
    fn show(&self, text: &str) {
        self.0.lock().push(text.to_string());
    }
}

pub struct Harness {
    pub facade: PlaybackFacade,
    pub factory: Arc<FakeFactory>,
    pub resolver: Arc<ManualResolver>,
    pub notifier: Arc<RecordingNotifier>,
    pub prefs: Arc<MemoryPreferences>,
}

pub fn harness(backend: BackendKind) -> Harness {
    let factory = Arc::new(FakeFactory::default());
    let resolver = Arc::new(ManualResolver::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let prefs = Arc::new(MemoryPreferences::new(backend, DecodeMode::Hardware));

    let facade = PlaybackFacade::new(prefs.clone(), factory.clone(), resolver.clone())
        .with_messages(Arc::new(DefaultMessages))
        .with_notifier(notifier.clone());

    Harness {
        facade,
        factory,
        resolver,
        notifier,
        prefs,
    }
}

/// Harness with an engine of `backend` attached.
pub fn attached(backend: BackendKind) -> Harness {
    let mut h = harness(backend);
    h.facade.attach(&RenderTarget::new(1)).unwrap();
    h
}
