//! Resolution task contract.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use tvplay_core::{Headers, PlayResult};

/// A successfully resolved source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub headers: Headers,
    pub url: String,
    /// Name of the parser that produced the URL; empty when anonymous.
    pub label: String,
}

/// Final result of a resolution task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Success(Resolution),
    Failure,
}

/// Launches resolution tasks.
pub trait Resolver: Send + Sync {
    /// Start resolving `result`. The outcome is reported through `callback`,
    /// possibly from another thread, unless the returned handle is
    /// cancelled first.
    fn launch(
        &self,
        result: &PlayResult,
        use_alternate: bool,
        callback: ResolutionCallback,
    ) -> ResolutionHandle;
}

#[derive(Default)]
struct TaskState {
    cancelled: AtomicBool,
    completed: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

type Sink = dyn Fn(ResolutionOutcome) + Send + Sync;

/// Completion side of a resolution task.
///
/// Delivers at most one outcome and nothing once the task is cancelled.
#[derive(Clone)]
pub struct ResolutionCallback {
    state: Arc<TaskState>,
    sink: Arc<Sink>,
}

impl ResolutionCallback {
    pub fn new(sink: impl Fn(ResolutionOutcome) + Send + Sync + 'static) -> Self {
        Self {
            state: Arc::new(TaskState::default()),
            sink: Arc::new(sink),
        }
    }

    /// Handle controlling this task. Dropping it cancels the task.
    pub fn handle(&self) -> ResolutionHandle {
        ResolutionHandle {
            state: self.state.clone(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Report success. Returns whether the outcome was delivered.
    pub fn succeed(&self, headers: Headers, url: impl Into<String>, label: impl Into<String>) -> bool {
        self.deliver(ResolutionOutcome::Success(Resolution {
            headers,
            url: url.into(),
            label: label.into(),
        }))
    }

    /// Report failure. Returns whether the outcome was delivered.
    pub fn fail(&self) -> bool {
        self.deliver(ResolutionOutcome::Failure)
    }

    fn deliver(&self, outcome: ResolutionOutcome) -> bool {
        if self.is_cancelled() {
            debug!("Dropping outcome of cancelled resolution task");
            return false;
        }
        if self.state.completed.swap(true, Ordering::AcqRel) {
            return false;
        }
        (self.sink)(outcome);
        true
    }
}

impl fmt::Debug for ResolutionCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionCallback")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Control side of a resolution task.
pub struct ResolutionHandle {
    state: Arc<TaskState>,
}

impl ResolutionHandle {
    /// Attach the async task doing the work so cancellation can abort it.
    pub fn attach(&self, task: JoinHandle<()>) {
        if self.is_cancelled() {
            task.abort();
            return;
        }
        *self.state.task.lock() = Some(task);
    }

    /// Cancel the task. Its callback will not deliver anything afterwards.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
        if let Some(task) = self.state.task.lock().take() {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Whether an outcome has been delivered.
    pub fn is_completed(&self) -> bool {
        self.state.completed.load(Ordering::Acquire)
    }
}

impl Drop for ResolutionHandle {
    fn drop(&mut self) {
        // Dropping an unfinished handle cancels the task
        if !self.is_completed() {
            self.cancel();
        }
    }
}

impl fmt::Debug for ResolutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionHandle")
            .field("cancelled", &self.is_cancelled())
            .field("completed", &self.is_completed())
            .finish()
    }
}
