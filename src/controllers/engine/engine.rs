use crate::controllers::engine::events::EngineEvent;
use crate::controllers::engine::job::{FrameData, ScanJob};
use crate::controllers::engine::ports::event_sink::EngineEventSink;
use crate::core::actions::cancellation::{CancelToken, Flag};
use crate::core::actions::generate_frame::scan::{FractalScan, ScanStep};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_PAUSE_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("a scan is already in progress")]
    Busy,
    #[error("the generation engine has shut down")]
    ShutDown,
}

struct SharedState {
    generation: AtomicU64,
    pending: Mutex<Option<(u64, ScanJob)>>,
    wake: Condvar,
    busy: AtomicBool,
    cancel: Flag,
    pause: Flag,
    shutdown: AtomicBool,
    pause_poll: Duration,
    sink: Arc<dyn EngineEventSink>,
}

/// Runs one scan at a time on a dedicated worker thread.
///
/// Scans are started with [`start`](Self::start) and report back through the
/// [`EngineEventSink`]. The busy flag is cleared before the terminal event is
/// emitted, so a receiver of `Completed`/`Canceled` can start the next scan
/// straight away.
pub struct GenerationEngine {
    shared: Arc<SharedState>,
    worker: Option<JoinHandle<()>>,
}

impl GenerationEngine {
    pub fn new(sink: Arc<dyn EngineEventSink>, pause_poll: Duration) -> Self {
        let shared = Arc::new(SharedState {
            generation: AtomicU64::new(0),
            pending: Mutex::new(None),
            wake: Condvar::new(),
            busy: AtomicBool::new(false),
            cancel: Flag::new(),
            pause: Flag::new(),
            shutdown: AtomicBool::new(false),
            pause_poll,
            sink,
        });

        let worker_shared = Arc::clone(&shared);
        // The session subscriber is scoped to the creating thread.
        let dispatch = tracing::dispatcher::get_default(Clone::clone);

        let worker = thread::spawn(move || {
            tracing::dispatcher::with_default(&dispatch, || Self::worker_loop(&worker_shared));
        });

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Queues `job` and returns its generation number.
    pub fn start(&self, job: ScanJob) -> Result<u64, EngineError> {
        if self.shared.shutdown.load(Ordering::Acquire) {
            return Err(EngineError::ShutDown);
        }

        if self.shared.busy.swap(true, Ordering::AcqRel) {
            return Err(EngineError::Busy);
        }

        self.shared.cancel.clear();
        self.shared.pause.clear();

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut guard = self
                .shared
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *guard = Some((generation, job));
        }

        self.shared.wake.notify_one();

        Ok(generation)
    }

    /// Returns the new paused state, or `None` when no scan is running.
    pub fn toggle_pause(&self) -> Option<bool> {
        if !self.is_busy() {
            return None;
        }

        Some(self.shared.pause.toggle())
    }

    /// Requests cancellation of the running scan. Returns `false` when idle.
    pub fn cancel(&self) -> bool {
        if !self.is_busy() {
            return false;
        }

        self.shared.cancel.set();
        true
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.shared.busy.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.is_busy() && self.shared.pause.is_set()
    }

    pub fn shutdown(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.wake.notify_one();

        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    fn worker_loop(shared: &Arc<SharedState>) {
        loop {
            let (generation, job) = {
                let mut guard = shared
                    .pending
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                loop {
                    if shared.shutdown.load(Ordering::Acquire) {
                        return;
                    }

                    if let Some(request) = guard.take() {
                        break request;
                    }

                    guard = shared
                        .wake
                        .wait(guard)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            };

            let event = Self::run_scan(shared, generation, &job);
            shared.busy.store(false, Ordering::Release);
            shared.sink.emit(event);
        }
    }

    fn run_scan(shared: &SharedState, generation: u64, job: &ScanJob) -> EngineEvent {
        let mut scan = match FractalScan::for_frame(
            &job.params,
            job.width,
            job.height,
            job.colours,
            job.rows_per_yield,
        ) {
            Ok(scan) => scan,
            Err(err) => {
                tracing::error!(generation, error = %err, "scan setup failed");
                return EngineEvent::Failed {
                    generation,
                    message: err.to_string(),
                };
            }
        };

        tracing::info!(
            generation,
            width = job.width,
            height = job.height,
            family = %job.params.family(),
            iterations = job.params.max_iterations(),
            center_x = job.params.center().real,
            center_y = job.params.center().imag,
            scale = job.params.scale(),
            "scan started"
        );

        let cancel_token =
            || shared.cancel.is_set() || shared.shutdown.load(Ordering::Relaxed);
        let started = Instant::now();
        let mut was_paused = false;

        loop {
            if cancel_token.is_cancelled() {
                scan.cancel();
            } else if shared.pause.is_set() {
                scan.pause();
            } else {
                scan.resume();
            }

            match scan.step(&cancel_token) {
                ScanStep::Yielded { .. } => {
                    shared.sink.emit(EngineEvent::Progress {
                        generation,
                        progress: scan.progress(),
                    });
                }
                ScanStep::Paused { next_row } => {
                    if !was_paused {
                        tracing::info!(generation, row = next_row, "scan paused");
                        was_paused = true;
                    }
                    thread::sleep(shared.pause_poll);
                    continue;
                }
                ScanStep::Canceled { rows_completed } => {
                    tracing::info!(generation, rows_completed, "scan canceled");
                    return EngineEvent::Canceled {
                        generation,
                        rows_completed,
                    };
                }
                ScanStep::Completed => break,
            }

            if was_paused {
                tracing::info!(generation, row = scan.next_row(), "scan resumed");
                was_paused = false;
            }
        }

        let duration = started.elapsed();
        let progress = scan.progress();

        // A cancel that raced the final row still wins.
        if cancel_token.is_cancelled() {
            tracing::info!(generation, rows_completed = progress.total_rows, "scan canceled");
            return EngineEvent::Canceled {
                generation,
                rows_completed: progress.total_rows,
            };
        }

        match scan.into_frame() {
            Some(frame) => {
                tracing::info!(
                    generation,
                    duration_ms = duration.as_millis() as u64,
                    rows_per_second = progress.rows_per_second(),
                    "scan completed"
                );
                EngineEvent::Completed(FrameData {
                    generation,
                    frame,
                    duration,
                })
            }
            None => EngineEvent::Failed {
                generation,
                message: "scan finished without a frame".to_string(),
            },
        }
    }
}

impl Drop for GenerationEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
