//! Background preview generation with debounced request replacement
//!
//! One worker thread owns a single pending-request slot. Submitting while a
//! request is queued but not started replaces it outright; a request already
//! in its row-parallel phase runs to completion or is explicitly aborted,
//! never silently swapped. An optional not-before instant delays the start
//! and is re-checked against newer requests before any CPU work is
//! committed, which debounces rapid UI-driven option changes.

use crate::algorithm::generator::{Outcome, Stereogram, StereogramGenerator};
use crate::algorithm::options::Options;
use crate::buffers::{DepthMap, Texture};
use crate::io::configuration::PREVIEW_MIN_DELAY_MS;
use crate::io::error::GenerationError;
use crate::io::progress::GenerationProgress;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// One queued preview generation
pub struct PreviewRequest {
    /// Options for the synthesis
    pub options: Options,
    /// Depth buffer, frozen for the duration of the synthesis
    pub depthmap: Arc<DepthMap>,
    /// Texture tile or generation parameters for procedural dots
    pub texture: Texture,
    /// Earliest instant the synthesis may start, for debouncing
    pub not_before: Option<Instant>,
}

impl PreviewRequest {
    /// Request an immediate preview
    pub const fn new(options: Options, depthmap: Arc<DepthMap>, texture: Texture) -> Self {
        Self {
            options,
            depthmap,
            texture,
            not_before: None,
        }
    }

    /// Request a preview delayed relative to when the options were composed
    pub fn delayed(
        options: Options,
        depthmap: Arc<DepthMap>,
        texture: Texture,
        delay: Duration,
    ) -> Self {
        let not_before = options.requested_at + delay;
        Self {
            options,
            depthmap,
            texture,
            not_before: Some(not_before),
        }
    }
}

/// Outcome delivered to the preview callback
pub enum PreviewEvent {
    /// A stereogram was generated
    Completed(Stereogram),
    /// The in-flight synthesis observed an abort request
    Aborted,
    /// The synthesis failed; distinct from an abort
    Failed(GenerationError),
}

struct SlotState {
    pending: Option<PreviewRequest>,
    shutdown: bool,
}

struct DriverShared {
    slot: Mutex<SlotState>,
    wakeup: Condvar,
    progress: GenerationProgress,
}

/// Background preview generator
///
/// Exactly one synthesis is in flight at a time and at most one request is
/// pending; the pending slot has last-writer-wins semantics. Dropping the
/// driver aborts any in-flight synthesis and joins the worker.
pub struct PreviewDriver {
    shared: Arc<DriverShared>,
    worker: Option<JoinHandle<()>>,
}

impl PreviewDriver {
    /// Start the worker thread with a callback for finished previews
    pub fn new(callback: impl Fn(PreviewEvent) + Send + 'static) -> Self {
        let shared = Arc::new(DriverShared {
            slot: Mutex::new(SlotState {
                pending: None,
                shutdown: false,
            }),
            wakeup: Condvar::new(),
            progress: GenerationProgress::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::spawn(move || worker_loop(&worker_shared, &callback));

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Queue a preview, replacing any request that has not started yet
    pub fn request(&self, request: PreviewRequest) {
        if let Ok(mut slot) = self.shared.slot.lock() {
            slot.pending = Some(request);
            self.shared.wakeup.notify_all();
        }
    }

    /// Advisory completion fraction of the in-flight synthesis in [0, 1]
    pub fn progress(&self) -> f64 {
        self.shared.progress.fraction()
    }

    /// Ask the in-flight synthesis to stop at the next row boundary
    pub fn abort(&self) {
        self.shared.progress.request_abort();
    }
}

impl Drop for PreviewDriver {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.shared.slot.lock() {
            slot.shutdown = true;
            slot.pending = None;
        }
        self.shared.progress.request_abort();
        self.shared.wakeup.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(shared: &DriverShared, callback: &(impl Fn(PreviewEvent) + Send)) {
    loop {
        let Some(request) = take_next_request(shared) else {
            return;
        };

        // Honor the debounce delay, yielding to any newer request that
        // arrives while we sleep
        if !wait_until_due(shared, request.not_before) {
            continue;
        }

        shared.progress.reset();

        let result = StereogramGenerator::new(
            request.options,
            Arc::clone(&request.depthmap),
            &request.texture,
        )
        .and_then(|generator| generator.generate(&shared.progress));

        match result {
            Ok(Outcome::Complete(stereogram)) => callback(PreviewEvent::Completed(stereogram)),
            Ok(Outcome::Aborted) => callback(PreviewEvent::Aborted),
            Err(error) => callback(PreviewEvent::Failed(error)),
        }
    }
}

// Block until a request is pending or shutdown is signalled
fn take_next_request(shared: &DriverShared) -> Option<PreviewRequest> {
    let mut slot = shared.slot.lock().ok()?;
    loop {
        if slot.shutdown {
            return None;
        }
        if let Some(request) = slot.pending.take() {
            return Some(request);
        }
        slot = shared.wakeup.wait(slot).ok()?;
    }
}

// Sleep out the request's delay. Returns false if the request was
// superseded or the driver shut down, true once the request is due.
fn wait_until_due(shared: &DriverShared, not_before: Option<Instant>) -> bool {
    let Some(deadline) = not_before else {
        return true;
    };

    let min_delay = Duration::from_millis(PREVIEW_MIN_DELAY_MS);
    let Ok(mut slot) = shared.slot.lock() else {
        return false;
    };
    loop {
        if slot.shutdown || slot.pending.is_some() {
            return false;
        }
        let now = Instant::now();
        let Some(remaining) = deadline.checked_duration_since(now).filter(|d| *d > Duration::ZERO)
        else {
            return true;
        };
        // Sub-threshold remainders start at once rather than busy-sleeping
        if remaining < min_delay {
            return true;
        }
        match shared.wakeup.wait_timeout(slot, remaining) {
            Ok((guard, _)) => slot = guard,
            Err(_) => return false,
        }
    }
}
