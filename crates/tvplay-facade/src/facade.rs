//! Playback facade connecting callers to the active media engine.

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, error, info, warn};
use tvplay_core::{
    cycle_speed, format_speed, format_time, toggle_speed, BackendKind, DecodeMode, Error,
    ErrorKind, FacadeEvent, Headers, MessageKey, PlayRequest, PlayResult, PlayerState,
    RenderTarget, Result, VideoSize, NORMAL_SPEED,
};
use tvplay_engine::{
    source_for, ActiveEngine, EngineCallbacks, EngineFactory, EngineFault, EngineSignal,
};
use tvplay_prefs::Preferences;
use tvplay_resolver::{ResolutionCallback, ResolutionHandle, ResolutionOutcome, Resolver};

use crate::config::FacadeConfig;
use crate::events::EventBus;
use crate::messages::{DefaultMessages, LogNotifier, Messages, Notifier};

/// Work queued from engine and resolver threads.
enum Inbound {
    Engine { generation: u64, signal: EngineSignal },
    Resolution { task: u64, outcome: ResolutionOutcome },
}

/// Per-session playback bookkeeping.
#[derive(Debug, Clone, Copy)]
struct Session {
    retry: u32,
    /// Last adaptive engine error code, 0 when none.
    error_code: i32,
    speed: f32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            retry: 0,
            error_code: 0,
            speed: NORMAL_SPEED,
        }
    }
}

struct PendingResolution {
    task: u64,
    handle: ResolutionHandle,
}

/// Clamp a target position to `[0, duration]`.
///
/// A non-positive duration is unknown (live or not loaded yet) and only
/// the lower bound applies.
const fn clamp_position(position: i64, duration: i64) -> i64 {
    let position = if position < 0 { 0 } else { position };
    if duration > 0 && position > duration {
        duration
    } else {
        position
    }
}

/// Playback-control facade over one adaptive or decoder engine.
///
/// All mutation happens through `&mut self`. Engine notices and resolution
/// outcomes arriving from other threads are queued and applied by
/// [`PlaybackFacade::dispatch`].
pub struct PlaybackFacade {
    prefs: Arc<dyn Preferences>,
    factory: Arc<dyn EngineFactory>,
    resolver: Arc<dyn Resolver>,
    messages: Arc<dyn Messages>,
    notifier: Arc<dyn Notifier>,
    config: FacadeConfig,
    events: EventBus,
    backend: BackendKind,
    decode: DecodeMode,
    engine: Option<ActiveEngine>,
    /// Bumped on every attach; notices tagged with an older value are stale.
    generation: u64,
    session: Session,
    pending: Option<PendingResolution>,
    next_task: u64,
    inbox_tx: Sender<Inbound>,
    inbox_rx: Receiver<Inbound>,
}

impl PlaybackFacade {
    /// Create a facade, reading the persisted backend and decode mode.
    pub fn new(
        prefs: Arc<dyn Preferences>,
        factory: Arc<dyn EngineFactory>,
        resolver: Arc<dyn Resolver>,
    ) -> Self {
        let backend = prefs.backend();
        let decode = prefs.decode_mode();
        let (inbox_tx, inbox_rx) = unbounded();

        info!("Playback facade initialized: backend {backend:?}, decode {decode:?}");

        Self {
            prefs,
            factory,
            resolver,
            messages: Arc::new(DefaultMessages),
            notifier: Arc::new(LogNotifier),
            config: FacadeConfig::default(),
            events: EventBus::new(),
            backend,
            decode,
            engine: None,
            generation: 0,
            session: Session::default(),
            pending: None,
            next_task: 0,
            inbox_tx,
            inbox_rx,
        }
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Arc<dyn Messages>) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: FacadeConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// Receive facade events. Receivers live as long as the facade.
    pub fn subscribe(&self) -> Receiver<FacadeEvent> {
        self.events.subscribe()
    }

    // ---- configuration ------------------------------------------------

    pub const fn backend(&self) -> BackendKind {
        self.backend
    }

    pub const fn decode_mode(&self) -> DecodeMode {
        self.decode
    }

    /// Kind of the live engine, if any.
    pub fn active_backend(&self) -> Option<BackendKind> {
        self.engine.as_ref().map(ActiveEngine::kind)
    }

    /// Select and persist the backend used by the next `attach`.
    pub fn select_backend(&mut self, kind: BackendKind) -> Result<()> {
        self.backend = kind;
        self.prefs.set_backend(kind)
    }

    pub fn toggle_backend(&mut self) -> Result<BackendKind> {
        let kind = self.backend.toggled();
        self.select_backend(kind)?;
        Ok(kind)
    }

    /// Select and persist the decode mode used by the next decoder engine.
    pub fn select_decode_mode(&mut self, mode: DecodeMode) -> Result<()> {
        self.decode = mode;
        self.prefs.set_decode_mode(mode)
    }

    pub fn toggle_decode_mode(&mut self) -> Result<DecodeMode> {
        let mode = self.decode.toggled();
        self.select_decode_mode(mode)?;
        Ok(mode)
    }

    // ---- engine lifecycle ---------------------------------------------

    /// Attach an engine of the selected backend to `target`.
    pub fn attach(&mut self, target: &RenderTarget) -> Result<()> {
        self.attach_kind(self.backend, target)
    }

    /// Replace any live engine with a fresh adaptive engine.
    pub fn attach_adaptive(&mut self, target: &RenderTarget) -> Result<()> {
        self.attach_kind(BackendKind::Adaptive, target)
    }

    /// Replace any live engine with a fresh decoder engine.
    pub fn attach_decoder(&mut self, target: &RenderTarget) -> Result<()> {
        self.attach_kind(BackendKind::Decoder, target)
    }

    fn attach_kind(&mut self, kind: BackendKind, target: &RenderTarget) -> Result<()> {
        self.release_engine();

        self.generation += 1;
        let callbacks = self.callbacks(self.generation);
        let created = match kind {
            BackendKind::Adaptive => self
                .factory
                .create_adaptive(target, callbacks)
                .map(ActiveEngine::Adaptive),
            BackendKind::Decoder => self
                .factory
                .create_decoder(target, self.decode, callbacks)
                .map(ActiveEngine::Decoder),
        };

        let mut engine = match created {
            Ok(engine) => engine,
            Err(e) => {
                error!("Failed to create {kind:?} engine: {e}");
                self.publish_error(ErrorKind::Format);
                return Err(e);
            }
        };

        let speed = self.session.speed;
        if (speed - NORMAL_SPEED).abs() > f32::EPSILON {
            if let Err(e) = engine.engine_mut().set_speed(speed) {
                warn!("Failed to carry speed {speed} over to new engine: {e}");
            }
        }

        info!("{kind:?} engine attached to target {}", target.handle());
        self.engine = Some(engine);
        Ok(())
    }

    /// Callback table for the engine of `generation`.
    fn callbacks(&self, generation: u64) -> EngineCallbacks {
        let state_tx = self.inbox_tx.clone();
        let fault_tx = self.inbox_tx.clone();
        EngineCallbacks::new(
            move |state| {
                let _ = state_tx.send(Inbound::Engine {
                    generation,
                    signal: EngineSignal::State(state),
                });
            },
            move |fault| {
                let _ = fault_tx.send(Inbound::Engine {
                    generation,
                    signal: EngineSignal::Fault(fault),
                });
            },
        )
    }

    fn release_engine(&mut self) {
        if let Some(engine) = self.engine.take() {
            let kind = engine.kind();
            if let Err(e) = engine.release() {
                warn!("Failed to release {kind:?} engine: {e}");
            }
        }
    }

    /// Cancel pending resolution and free the live engine.
    pub fn release(&mut self) {
        self.cancel_resolution();
        self.release_engine();
    }

    pub const fn is_released(&self) -> bool {
        self.engine.is_none()
    }

    fn active_mut(&mut self) -> Result<&mut ActiveEngine> {
        self.engine.as_mut().ok_or(Error::NoEngine)
    }

    // ---- loading --------------------------------------------------------

    /// Start playback of a direct source or a provider result.
    ///
    /// An empty URL publishes a load error. Any other request cancels the
    /// pending resolution first. Results that need resolution launch a new
    /// one; everything else is assigned to the engine right away.
    pub fn play(&mut self, request: impl Into<PlayRequest>) -> Result<()> {
        let request = request.into();
        if request.url().is_empty() {
            warn!("Refusing to play an empty URL");
            self.publish_error(ErrorKind::Load);
            return Err(Error::InvalidSource("empty URL".to_string()));
        }

        self.cancel_resolution();
        match request {
            PlayRequest::Direct(source) => self.set_media_source(source.headers, source.url),
            PlayRequest::Result {
                result,
                use_alternate,
            } => {
                if result.requires_resolution() {
                    self.start_resolution(&result, use_alternate);
                    Ok(())
                } else {
                    let url = result.play_target();
                    self.set_media_source(result.headers, url)
                }
            }
        }
    }

    fn start_resolution(&mut self, result: &PlayResult, use_alternate: bool) {
        self.next_task += 1;
        let task = self.next_task;
        let tx = self.inbox_tx.clone();
        let callback = ResolutionCallback::new(move |outcome| {
            let _ = tx.send(Inbound::Resolution { task, outcome });
        });

        debug!("Launching resolution task {task} for {}", result.url);
        let handle = self.resolver.launch(result, use_alternate, callback);
        self.pending = Some(PendingResolution { task, handle });
    }

    fn cancel_resolution(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("Cancelling resolution task {}", pending.task);
            pending.handle.cancel();
        }
    }

    /// Whether a resolution task is outstanding.
    pub const fn is_resolving(&self) -> bool {
        self.pending.is_some()
    }

    fn set_media_source(&mut self, headers: Headers, url: String) -> Result<()> {
        debug!(
            "Assigning source (last error {}): {url} {headers:?}",
            self.session.error_code
        );
        let source = source_for(url, headers, self.session.error_code);

        let loaded = self.active_mut().and_then(|engine| engine.load(&source));
        if let Err(e) = loaded {
            error!("Failed to load {}: {e}", source.url);
            self.publish_error(ErrorKind::Format);
            return Err(e);
        }

        self.publish(FacadeEvent::StateChanged(PlayerState::Loading));
        Ok(())
    }

    /// Apply a successful resolution: announce the parser, then load.
    pub fn on_resolution_success(
        &mut self,
        headers: Headers,
        url: impl Into<String>,
        label: &str,
    ) -> Result<()> {
        if !label.is_empty() {
            let text = self.messages.text(&MessageKey::ParseFrom(label.to_string()));
            self.notifier.show(&text);
        }
        self.set_media_source(headers, url.into())
    }

    pub fn on_resolution_failure(&mut self) {
        self.publish_error(ErrorKind::Parse);
    }

    // ---- callback marshalling ------------------------------------------

    /// Apply queued engine notices and resolution outcomes on this thread.
    ///
    /// Returns how many queued items were taken off the queue, stale ones included.
    pub fn dispatch(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(inbound) = self.inbox_rx.try_recv() {
            handled += 1;
            match inbound {
                Inbound::Engine { generation, signal } => self.handle_signal(generation, signal),
                Inbound::Resolution { task, outcome } => self.handle_outcome(task, outcome),
            }
        }
        handled
    }

    fn handle_signal(&mut self, generation: u64, signal: EngineSignal) {
        if generation != self.generation || self.engine.is_none() {
            debug!("Dropping {signal:?} from released engine");
            return;
        }

        match signal {
            EngineSignal::State(state) => self.publish(FacadeEvent::StateChanged(state)),
            EngineSignal::Fault(EngineFault::Playback { code }) => {
                if let Some(code) = code {
                    self.session.error_code = code;
                }
                warn!("Playback fault (code {code:?})");
                self.publish_error(ErrorKind::Format);
            }
            EngineSignal::Fault(EngineFault::AudioSink) => {
                // Recovery policy: skip a little past the faulty audio.
                let offset = self.config.audio_fault_seek_ms;
                if offset != 0 {
                    if let Err(e) = self.seek_by(offset) {
                        warn!("Audio fault recovery seek failed: {e}");
                    }
                }
            }
        }
    }

    fn handle_outcome(&mut self, task: u64, outcome: ResolutionOutcome) {
        match &self.pending {
            Some(pending) if pending.task == task => {}
            _ => {
                debug!("Dropping outcome of stale resolution task {task}");
                return;
            }
        }
        self.pending = None;

        match outcome {
            ResolutionOutcome::Success(resolution) => {
                if let Err(e) = self.on_resolution_success(
                    resolution.headers,
                    resolution.url,
                    &resolution.label,
                ) {
                    debug!("Resolved source of task {task} was not loaded: {e}");
                }
            }
            ResolutionOutcome::Failure => self.on_resolution_failure(),
        }
    }

    // ---- transport ------------------------------------------------------

    /// Start or resume playback.
    pub fn resume(&mut self) -> Result<()> {
        self.active_mut()?.engine_mut().start()
    }

    pub fn pause(&mut self) -> Result<()> {
        self.active_mut()?.engine_mut().pause()
    }

    /// Stop playback, cancel pending resolution and reset retry and error
    /// bookkeeping.
    pub fn stop(&mut self) -> Result<()> {
        self.cancel_resolution();
        self.reset();
        match self.engine.as_mut() {
            Some(engine) => engine.engine_mut().stop(),
            None => Ok(()),
        }
    }

    /// Seek relative to the current position. Returns the clamped target.
    pub fn seek_by(&mut self, delta_ms: i64) -> Result<i64> {
        let engine = self.active_mut()?.engine_mut();
        let target = clamp_position(
            engine.position().saturating_add(delta_ms),
            engine.duration(),
        );
        engine.seek(target)?;
        Ok(target)
    }

    /// Seek to an absolute position. A zero target is ignored unless forced.
    pub fn seek_to(&mut self, position_ms: i64, force: bool) -> Result<()> {
        if position_ms == 0 && !force {
            return Ok(());
        }
        let engine = self.active_mut()?.engine_mut();
        let target = clamp_position(position_ms, engine.duration());
        engine.seek(target)
    }

    /// Set the playback speed. Returns the formatted speed.
    pub fn set_speed(&mut self, speed: f32) -> Result<String> {
        if let Some(engine) = self.engine.as_mut() {
            engine.engine_mut().set_speed(speed)?;
        }
        self.session.speed = speed;
        Ok(self.speed_text())
    }

    /// Advance to the next speed step.
    pub fn cycle_speed(&mut self) -> Result<String> {
        self.set_speed(cycle_speed(self.speed()))
    }

    /// Flip between normal and fast speed.
    pub fn toggle_speed(&mut self) -> Result<String> {
        self.set_speed(toggle_speed(self.speed()))
    }

    // ---- session ----------------------------------------------------------

    pub const fn retry(&self) -> u32 {
        self.session.retry
    }

    /// Count another manual retry. Returns the new count.
    pub fn add_retry(&mut self) -> u32 {
        self.session.retry = self.session.retry.saturating_add(1);
        self.session.retry
    }

    /// Clear retry count and last error code.
    pub fn reset(&mut self) {
        self.session.retry = 0;
        self.session.error_code = 0;
    }

    pub const fn last_error_code(&self) -> i32 {
        self.session.error_code
    }

    // ---- queries ----------------------------------------------------------

    pub fn speed(&self) -> f32 {
        self.engine
            .as_ref()
            .map_or(self.session.speed, |e| e.engine().speed())
    }

    pub fn position(&self) -> i64 {
        self.engine.as_ref().map_or(0, |e| e.engine().position())
    }

    pub fn duration(&self) -> i64 {
        self.engine.as_ref().map_or(0, |e| e.engine().duration())
    }

    pub fn buffered(&self) -> i64 {
        self.engine.as_ref().map_or(0, |e| e.engine().buffered())
    }

    pub fn is_playing(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| e.engine().is_playing())
    }

    pub fn video_size(&self) -> VideoSize {
        self.engine
            .as_ref()
            .map(|e| e.engine().video_size())
            .unwrap_or_default()
    }

    /// Whether the loaded media is long enough to count as on-demand.
    pub fn is_vod(&self) -> bool {
        self.duration() > self.config.vod_threshold_ms
    }

    // ---- display ----------------------------------------------------------

    pub fn speed_text(&self) -> String {
        format_speed(self.speed())
    }

    pub fn size_text(&self) -> String {
        self.video_size().text()
    }

    pub fn backend_text(&self) -> String {
        self.messages.text(&MessageKey::Backend(self.backend))
    }

    pub fn decode_text(&self) -> String {
        self.messages.text(&MessageKey::Decode(self.decode))
    }

    /// Formatted position a relative seek of `delta_ms` would land on.
    pub fn position_time(&self, delta_ms: i64) -> String {
        format_time(clamp_position(
            self.position().saturating_add(delta_ms),
            self.duration(),
        ))
    }

    pub fn duration_time(&self) -> String {
        format_time(self.duration().max(0))
    }

    // ---- events -----------------------------------------------------------

    fn publish(&self, event: FacadeEvent) {
        self.events.publish(&event);
    }

    fn publish_error(&self, kind: ErrorKind) {
        self.publish(FacadeEvent::error(kind));
    }
}

impl Drop for PlaybackFacade {
    fn drop(&mut self) {
        self.release();
    }
}
