//! Motif Core Runtime
//!
//! Scheduling primitives shared by every motion primitive in Motif:
//!
//! - **Frame clock**: one-shot callbacks that receive the timestamp of the
//!   next display refresh
//! - **Timer queue**: one-shot callbacks that fire after a delay
//! - **Weak handles**: animated objects hold a [`SchedulerHandle`] that never
//!   keeps the scheduler alive
//!
//! The host view layer owns the [`Scheduler`] and drives it from its own event
//! loop. Tests drive the very same scheduler with simulated time.
//!
//! # Example
//!
//! ```rust
//! use motif_core::{FrameScheduler, Scheduler, TimerScheduler};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let scheduler = Scheduler::new();
//! let handle = scheduler.handle();
//!
//! let fired = Rc::new(Cell::new(false));
//! let flag = fired.clone();
//! handle.set_timeout(100, Box::new(move || flag.set(true)));
//!
//! scheduler.advance_by(99.0);
//! assert!(!fired.get());
//! scheduler.advance_by(1.0);
//! assert!(fired.get());
//! ```

pub mod scheduler;

pub use scheduler::{
    FrameCallback, FrameRequestId, FrameScheduler, PumpStats, Scheduler, SchedulerHandle,
    TimerCallback, TimerId, TimerScheduler,
};
