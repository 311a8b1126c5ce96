//! Frame and timer scheduler
//!
//! Owns every pending callback of the motion layer. Two kinds of work are
//! scheduled here:
//! - **Frame callbacks**: one-shot, receive the timestamp of the frame they run in
//! - **Timers**: one-shot, fire once the clock reaches their due time
//!
//! Animated objects never hold the scheduler itself. They receive a
//! [`SchedulerHandle`] (a weak reference) or any other implementation of the
//! [`FrameScheduler`] / [`TimerScheduler`] traits, and keep the returned id so
//! they can cancel their single pending callback.
//!
//! The scheduler is single-threaded. The host calls [`Scheduler::pump`] (or
//! [`Scheduler::advance_to`] and [`Scheduler::frame`] separately) from its own
//! event loop; tests call the same methods with simulated timestamps.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Handle to a pending frame callback
    pub struct FrameRequestId;
    /// Handle to a pending timer
    pub struct TimerId;
}

/// Callback invoked with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Callback invoked when a timer fires
pub type TimerCallback = Box<dyn FnOnce()>;

/// Source of per-frame callbacks
pub trait FrameScheduler {
    /// Request a callback on the next frame
    ///
    /// Returns `None` if the scheduler is gone; the callback is dropped unrun.
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameRequestId>;

    /// Cancel a pending frame callback
    ///
    /// Cancelling an id that already ran or was already cancelled is a no-op.
    fn cancel_frame(&self, id: FrameRequestId);
}

/// Source of deferred one-shot timers
pub trait TimerScheduler {
    /// Schedule a callback to fire `delay_ms` after the current clock time
    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Option<TimerId>;

    /// Cancel a pending timer. Idempotent.
    fn clear_timeout(&self, id: TimerId);

    /// Current clock time in milliseconds
    fn now_ms(&self) -> f64;
}

struct PendingTimer {
    due_ms: f64,
    /// Insertion order, breaks ties between timers due at the same instant
    seq: u64,
    callback: TimerCallback,
}

struct SchedulerInner {
    frames: SlotMap<FrameRequestId, FrameCallback>,
    timers: SlotMap<TimerId, PendingTimer>,
    now_ms: f64,
    next_seq: u64,
}

impl SchedulerInner {
    fn insert_frame(&mut self, callback: FrameCallback) -> FrameRequestId {
        self.frames.insert(callback)
    }

    fn insert_timer(&mut self, delay_ms: u32, callback: TimerCallback) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due_ms = self.now_ms + f64::from(delay_ms);
        self.timers.insert(PendingTimer {
            due_ms,
            seq,
            callback,
        })
    }

    /// Earliest timer due at or before `limit_ms`
    fn next_due(&self, limit_ms: f64) -> Option<TimerId> {
        self.timers
            .iter()
            .filter(|(_, timer)| timer.due_ms <= limit_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
            .map(|(id, _)| id)
    }
}

/// Counts of callbacks run by a single [`Scheduler::pump`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub timers: usize,
    pub frames: usize,
}

impl PumpStats {
    /// Whether any callback ran
    pub fn any(&self) -> bool {
        self.timers > 0 || self.frames > 0
    }
}

/// The scheduler that owns all pending frame callbacks and timers
///
/// ```ignore
/// let scheduler = Scheduler::new();
/// let fade = ValueAnimator::new(0.0, AnimatorConfig::default(), scheduler.handle());
///
/// // In the host event loop:
/// let stats = scheduler.pump(now_ms);
/// if stats.any() || scheduler.has_pending() {
///     window.request_redraw();
/// }
/// ```
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Scheduler {
    /// Create a scheduler whose clock starts at 0 ms
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a scheduler whose clock starts at `now_ms`
    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                frames: SlotMap::with_key(),
                timers: SlotMap::with_key(),
                now_ms,
                next_seq: 0,
            })),
        }
    }

    /// Get a weak handle for passing to animated objects
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current clock time in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.inner.borrow().now_ms
    }

    /// Run one frame
    ///
    /// Every callback pending when the frame starts runs once with
    /// `timestamp_ms`. Callbacks requested while the frame runs wait for the
    /// next frame. Returns the number of callbacks run.
    pub fn frame(&self, timestamp_ms: f64) -> usize {
        let ids: SmallVec<[FrameRequestId; 16]> = self.inner.borrow().frames.keys().collect();

        let mut ran = 0;
        for id in ids {
            // Removed right before running: a callback cancelled earlier in
            // this frame is already gone.
            let callback = self.inner.borrow_mut().frames.remove(id);
            if let Some(callback) = callback {
                callback(timestamp_ms);
                ran += 1;
            }
        }

        if ran > 0 {
            tracing::trace!("Scheduler: frame at {:.2}ms ran {} callbacks", timestamp_ms, ran);
        }
        ran
    }

    /// Move the timer clock forward to `now_ms`, firing every timer that
    /// becomes due
    ///
    /// Timers fire in due order, ties in scheduling order. While a timer runs
    /// the clock reads its due time, so timers it schedules inside the window
    /// fire in the same call. The clock never moves backwards.
    pub fn advance_to(&self, now_ms: f64) -> usize {
        let mut fired = 0;

        loop {
            let next = self.inner.borrow().next_due(now_ms);
            let Some(id) = next else {
                break;
            };

            let timer = {
                let mut inner = self.inner.borrow_mut();
                let timer = inner.timers.remove(id);
                if let Some(ref timer) = timer {
                    inner.now_ms = inner.now_ms.max(timer.due_ms);
                }
                timer
            };

            if let Some(timer) = timer {
                (timer.callback)();
                fired += 1;
            }
        }

        {
            let mut inner = self.inner.borrow_mut();
            inner.now_ms = inner.now_ms.max(now_ms);
        }

        if fired > 0 {
            tracing::trace!("Scheduler: advanced to {:.2}ms, fired {} timers", now_ms, fired);
        }
        fired
    }

    /// Move the timer clock forward by `delta_ms`
    pub fn advance_by(&self, delta_ms: f64) -> usize {
        let target = self.now_ms() + delta_ms.max(0.0);
        self.advance_to(target)
    }

    /// Fire due timers, then run a frame, both at `now_ms`
    pub fn pump(&self, now_ms: f64) -> PumpStats {
        let timers = self.advance_to(now_ms);
        let frames = self.frame(now_ms);
        PumpStats { timers, frames }
    }

    /// Whether any frame callback or timer is pending
    pub fn has_pending(&self) -> bool {
        let inner = self.inner.borrow();
        !inner.frames.is_empty() || !inner.timers.is_empty()
    }

    /// Number of pending frame callbacks
    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    /// Number of pending timers
    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for Scheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameRequestId> {
        Some(self.inner.borrow_mut().insert_frame(callback))
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        // Dropped after the borrow ends, in case the callback owns something
        // that touches the scheduler on drop.
        let removed = self.inner.borrow_mut().frames.remove(id);
        drop(removed);
    }
}

impl TimerScheduler for Scheduler {
    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Option<TimerId> {
        Some(self.inner.borrow_mut().insert_timer(delay_ms, callback))
    }

    fn clear_timeout(&self, id: TimerId) {
        let removed = self.inner.borrow_mut().timers.remove(id);
        drop(removed);
    }

    fn now_ms(&self) -> f64 {
        Scheduler::now_ms(self)
    }
}

/// A weak handle to the scheduler
///
/// This is passed to animated objects. It won't prevent the scheduler from
/// being dropped; once it is, every operation is a silent no-op.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl FrameScheduler for SchedulerHandle {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameRequestId> {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().insert_frame(callback))
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        if let Some(inner) = self.inner.upgrade() {
            let removed = inner.borrow_mut().frames.remove(id);
            drop(removed);
        }
    }
}

impl TimerScheduler for SchedulerHandle {
    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Option<TimerId> {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().insert_timer(delay_ms, callback))
    }

    fn clear_timeout(&self, id: TimerId) {
        if let Some(inner) = self.inner.upgrade() {
            let removed = inner.borrow_mut().timers.remove(id);
            drop(removed);
        }
    }

    fn now_ms(&self) -> f64 {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().now_ms)
            .unwrap_or(0.0)
    }
}
