//! Timed callbacks with explicit cancellation.
//!
//! The game engine never sleeps or spawns on its own; it asks a [`Scheduler`]
//! for one-shot and once-per-second callbacks and keeps the returned
//! [`CancelHandle`]s so teardown can stop every pending timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// One-shot callback
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Callback fired on every tick until cancelled
pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Source of timed callbacks
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`
    fn after(&self, delay: Duration, task: Task) -> CancelHandle;

    /// Run `task` every second, first one second from now
    fn every_second(&self, task: RepeatingTask) -> CancelHandle;
}

/// Stops a scheduled callback. Cloning shares the same cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    abort: Option<tokio::task::AbortHandle>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_abort(cancelled: Arc<AtomicBool>, abort: tokio::task::AbortHandle) -> Self {
        Self {
            cancelled,
            abort: Some(abort),
        }
    }

    /// Cancel the callback. Idempotent; a callback that has not started yet never runs.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(ref abort) = self.abort {
            abort.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Scheduler backed by tokio timers
#[derive(Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Scheduler on the runtime of the calling task
    pub fn current() -> Result<Self, tokio::runtime::TryCurrentError> {
        tokio::runtime::Handle::try_current().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn after(&self, delay: Duration, task: Task) -> CancelHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if !flag.load(Ordering::SeqCst) {
                task();
            }
        });
        CancelHandle::with_abort(cancelled, join.abort_handle())
    }

    fn every_second(&self, mut task: RepeatingTask) -> CancelHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let join = self.handle.spawn(async move {
            let start = tokio::time::Instant::now() + ONE_SECOND;
            let mut interval = tokio::time::interval_at(start, ONE_SECOND);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                task();
            }
        });
        CancelHandle::with_abort(cancelled, join.abort_handle())
    }
}

enum TimerTask {
    Once(Task),
    Repeating(RepeatingTask),
}

struct Timer {
    id: u64,
    due: Duration,
    handle: CancelHandle,
    task: TimerTask,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
}

/// Virtual-clock scheduler. Nothing fires until [`advance`](Self::advance)
/// moves the clock; timers fire in due order, ties in scheduling order.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of live (not cancelled) timers
    pub fn pending(&self) -> usize {
        self.lock()
            .timers
            .iter()
            .filter(|t| !t.handle.is_cancelled())
            .count()
    }

    /// Move the clock forward by `by`, firing every timer that falls due.
    ///
    /// Callbacks run without the scheduler lock held, so they may schedule or
    /// cancel other timers.
    pub fn advance(&self, by: Duration) {
        let target = self.lock().now + by;

        loop {
            let timer = {
                let mut state = self.lock();
                state.timers.retain(|t| !t.handle.is_cancelled());
                let next = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                match next {
                    Some(i) => {
                        let timer = state.timers.swap_remove(i);
                        state.now = timer.due;
                        timer
                    }
                    None => {
                        state.now = target;
                        return;
                    }
                }
            };

            let Timer {
                id,
                due,
                handle,
                task,
            } = timer;
            match task {
                TimerTask::Once(task) => task(),
                TimerTask::Repeating(mut task) => {
                    task();
                    if !handle.is_cancelled() {
                        self.lock().timers.push(Timer {
                            id,
                            due: due + ONE_SECOND,
                            handle,
                            task: TimerTask::Repeating(task),
                        });
                    }
                }
            }
        }
    }

    fn schedule(&self, delay: Duration, task: TimerTask) -> CancelHandle {
        let handle = CancelHandle::new();
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now + delay;
        state.timers.push(Timer {
            id,
            due,
            handle: handle.clone(),
            task,
        });
        handle
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn after(&self, delay: Duration, task: Task) -> CancelHandle {
        self.schedule(delay, TimerTask::Once(task))
    }

    fn every_second(&self, task: RepeatingTask) -> CancelHandle {
        self.schedule(ONE_SECOND, TimerTask::Repeating(task))
    }
}
