//! Mount/unmount lifecycle for enter and exit transitions
//!
//! A [`TransitionController`] turns a visibility intent into a
//! [`TransitionState`]: whether the element should exist at all (`mounted`)
//! and which [`Phase`] its styling should reflect. Phase changes are driven by
//! a single pending timer per controller.
//!
//! ```text
//!             set_visible(true)                 timer
//!  unmounted ─────────────────▶ Enter ──────────────────▶ Idle
//!      ▲                          ▲                        │
//!      │ timer                    │ set_visible(true)      │ set_visible(false)
//!      │                          │                        ▼
//!      └──────────────────────── Exit ◀────────────────────┘
//! ```

use crate::easing::Easing;
use motif_core::{TimerId, TimerScheduler};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Default enter/exit duration in milliseconds
pub const DEFAULT_TRANSITION_MS: u32 = 200;

/// Lifecycle phase of a transitioning element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Just mounted, animating in
    Enter,
    /// Fully shown
    Idle,
    /// Animating away (may still be mounted)
    Exit,
}

impl Phase {
    /// `Enter` and `Idle` style the element as visible
    pub fn is_visible(self) -> bool {
        matches!(self, Phase::Enter | Phase::Idle)
    }
}

/// Output of a [`TransitionController`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TransitionState {
    /// Whether the element should exist in the render tree
    pub mounted: bool,
    pub phase: Phase,
}

impl TransitionState {
    /// State of a controller constructed with the given visibility
    pub fn initial(visible: bool) -> Self {
        if visible {
            Self {
                mounted: true,
                phase: Phase::Idle,
            }
        } else {
            Self {
                mounted: false,
                phase: Phase::Exit,
            }
        }
    }
}

/// Timing of enter and exit transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionConfig {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl TransitionConfig {
    pub fn new(duration_ms: u32, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSITION_MS, Easing::EaseOut)
    }
}

/// What the pending timer does when it fires
#[derive(Clone, Copy, Debug)]
enum PhaseAdvance {
    /// Enter → Idle
    Settle,
    /// Exit → unmounted
    Unmount,
}

struct ControllerInner {
    state: TransitionState,
    /// Latest visibility intent
    visible: bool,
    config: TransitionConfig,
    timers: Rc<dyn TimerScheduler>,
    pending: Option<TimerId>,
    destroyed: bool,
}

impl ControllerInner {
    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.timers.clear_timeout(id);
        }
    }
}

/// Drives the enter → idle → exit → unmounted lifecycle of one element
///
/// # Example
///
/// ```ignore
/// let scheduler = Scheduler::new();
/// let config = TransitionConfig::default();
/// let mut dialog = TransitionController::new(false, config, scheduler.handle());
///
/// dialog.set_visible(true);   // { mounted: true, phase: Enter }
/// scheduler.advance_by(200.0); // { mounted: true, phase: Idle }
/// dialog.set_visible(false);  // { mounted: true, phase: Exit }
/// scheduler.advance_by(200.0); // { mounted: false, phase: Exit }
/// ```
pub struct TransitionController {
    inner: Rc<RefCell<ControllerInner>>,
}

impl TransitionController {
    /// Create a controller
    ///
    /// Starting visible yields `{ mounted: true, phase: Idle }`; starting hidden
    /// yields `{ mounted: false, phase: Exit }`. No timer is scheduled either way.
    pub fn new(
        visible: bool,
        config: TransitionConfig,
        timers: impl TimerScheduler + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ControllerInner {
                state: TransitionState::initial(visible),
                visible,
                config,
                timers: Rc::new(timers),
                pending: None,
                destroyed: false,
            })),
        }
    }

    /// Feed a new visibility intent
    ///
    /// Repeating the current intent is a no-op. A change cancels the pending
    /// timer before anything else, so showing an exiting element keeps it
    /// mounted and its unmount never happens.
    pub fn set_visible(&mut self, visible: bool) {
        let advance = {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed || inner.visible == visible {
                return;
            }

            inner.visible = visible;
            inner.cancel_pending();

            if visible {
                inner.state = TransitionState {
                    mounted: true,
                    phase: Phase::Enter,
                };
                PhaseAdvance::Settle
            } else {
                inner.state.phase = Phase::Exit;
                PhaseAdvance::Unmount
            }
        };

        tracing::debug!("TransitionController: visible={} -> {:?}", visible, self.state());
        Self::schedule(&self.inner, advance);
    }

    pub fn state(&self) -> TransitionState {
        self.inner.borrow().state
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().state.mounted
    }

    pub fn phase(&self) -> Phase {
        self.inner.borrow().state.phase
    }

    /// The latest visibility intent
    pub fn is_visible(&self) -> bool {
        self.inner.borrow().visible
    }

    pub fn config(&self) -> TransitionConfig {
        self.inner.borrow().config
    }

    /// Whether a phase change is scheduled
    pub fn has_pending_change(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// Cancel the pending timer and freeze the state. Also runs on drop.
    pub fn destroy(&mut self) {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return;
        }
        inner.cancel_pending();
        inner.destroyed = true;
    }

    fn schedule(this: &Rc<RefCell<ControllerInner>>, advance: PhaseAdvance) {
        let weak = Rc::downgrade(this);
        let mut inner = this.borrow_mut();
        let delay = inner.config.duration_ms;

        let id = inner.timers.set_timeout(
            delay,
            Box::new(move || {
                if let Some(strong) = weak.upgrade() {
                    Self::on_timer(&strong, advance);
                }
            }),
        );

        match id {
            Some(id) => inner.pending = Some(id),
            None => {
                // No timer source left: apply the advance now
                drop(inner);
                Self::on_timer(this, advance);
            }
        }
    }

    fn on_timer(this: &Rc<RefCell<ControllerInner>>, advance: PhaseAdvance) {
        let mut inner = this.borrow_mut();
        inner.pending = None;
        if inner.destroyed {
            return;
        }

        match advance {
            PhaseAdvance::Settle => {
                if inner.state.phase == Phase::Enter {
                    inner.state.phase = Phase::Idle;
                }
            }
            PhaseAdvance::Unmount => {
                if inner.state.phase == Phase::Exit {
                    inner.state.mounted = false;
                }
            }
        }
        tracing::debug!("TransitionController: {:?} -> {:?}", advance, inner.state);
    }
}

impl Drop for TransitionController {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motif_core::Scheduler;

    fn state(mounted: bool, phase: Phase) -> TransitionState {
        TransitionState { mounted, phase }
    }

    fn controller(scheduler: &Scheduler, visible: bool) -> TransitionController {
        TransitionController::new(visible, TransitionConfig::default(), scheduler.handle())
    }

    #[test]
    fn test_initial_states() {
        let scheduler = Scheduler::new();

        assert_eq!(controller(&scheduler, true).state(), state(true, Phase::Idle));
        assert_eq!(controller(&scheduler, false).state(), state(false, Phase::Exit));
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn test_enter_then_idle() {
        let scheduler = Scheduler::new();
        let mut transition = controller(&scheduler, false);

        transition.set_visible(true);
        assert_eq!(transition.state(), state(true, Phase::Enter));
        assert!(transition.has_pending_change());

        scheduler.advance_by(199.0);
        assert_eq!(transition.phase(), Phase::Enter);
        scheduler.advance_by(1.0);
        assert_eq!(transition.state(), state(true, Phase::Idle));
        assert!(!transition.has_pending_change());
    }

    #[test]
    fn test_exit_then_unmount() {
        let scheduler = Scheduler::new();
        let mut transition = controller(&scheduler, true);

        transition.set_visible(false);
        assert_eq!(transition.state(), state(true, Phase::Exit));

        scheduler.advance_by(200.0);
        assert_eq!(transition.state(), state(false, Phase::Exit));
    }

    #[test]
    fn test_repeated_intent_is_noop() {
        let scheduler = Scheduler::new();
        let mut transition = controller(&scheduler, false);

        transition.set_visible(false);
        assert_eq!(scheduler.pending_timers(), 0);

        transition.set_visible(true);
        scheduler.advance_by(150.0);
        transition.set_visible(true);

        // The first settle timer is kept
        scheduler.advance_by(50.0);
        assert_eq!(transition.phase(), Phase::Idle);
    }

    #[test]
    fn test_reenter_while_exiting_keeps_mounted() {
        let scheduler = Scheduler::new();
        let mut transition = controller(&scheduler, true);

        transition.set_visible(false);
        scheduler.advance_by(150.0);
        transition.set_visible(true);
        assert_eq!(transition.state(), state(true, Phase::Enter));
        assert_eq!(scheduler.pending_timers(), 1);

        // Past the cancelled unmount time: still mounted
        scheduler.advance_by(60.0);
        assert!(transition.is_mounted());
        assert_eq!(transition.phase(), Phase::Enter);

        scheduler.advance_by(140.0);
        assert_eq!(transition.state(), state(true, Phase::Idle));
    }

    #[test]
    fn test_hide_while_entering() {
        let scheduler = Scheduler::new();
        let mut transition = controller(&scheduler, false);

        transition.set_visible(true);
        scheduler.advance_by(100.0);
        transition.set_visible(false);
        assert_eq!(transition.state(), state(true, Phase::Exit));

        scheduler.advance_by(200.0);
        assert_eq!(transition.state(), state(false, Phase::Exit));
    }

    #[test]
    fn test_zero_duration_advances_on_next_pump() {
        let scheduler = Scheduler::new();
        let mut transition = TransitionController::new(
            false,
            TransitionConfig::new(0, Easing::Linear),
            scheduler.handle(),
        );

        transition.set_visible(true);
        assert_eq!(transition.phase(), Phase::Enter);
        scheduler.advance_by(0.0);
        assert_eq!(transition.phase(), Phase::Idle);
    }

    #[test]
    fn test_destroy_freezes_state() {
        let scheduler = Scheduler::new();
        let mut transition = controller(&scheduler, true);

        transition.set_visible(false);
        transition.destroy();
        assert_eq!(scheduler.pending_timers(), 0);

        scheduler.advance_by(1000.0);
        assert_eq!(transition.state(), state(true, Phase::Exit));

        transition.set_visible(true);
        assert_eq!(transition.state(), state(true, Phase::Exit));
    }

    #[test]
    fn test_drop_cancels_timer() {
        let scheduler = Scheduler::new();
        {
            let mut transition = controller(&scheduler, false);
            transition.set_visible(true);
            assert_eq!(scheduler.pending_timers(), 1);
        }
        assert_eq!(scheduler.pending_timers(), 0);
        assert_eq!(scheduler.advance_by(500.0), 0);
    }

    #[test]
    fn test_scheduler_gone_applies_immediately() {
        let handle = Scheduler::new().handle();
        let mut transition = TransitionController::new(true, TransitionConfig::default(), handle);

        transition.set_visible(false);
        assert_eq!(transition.state(), state(false, Phase::Exit));
    }
}
