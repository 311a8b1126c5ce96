//! End-to-end motion scenarios driven by a simulated clock

use motif_animation::{
    AnimatorConfig, Easing, MotionTokens, Phase, PlayedRegistry, Presence, PresencePreset,
    PressEvent, PressFeedback, Speed, SpringAnimator, SpringConfig, TransitionConfig,
    TransitionController, TransitionState, ValueAnimator,
};
use motif_core::Scheduler;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn state(mounted: bool, phase: Phase) -> TransitionState {
    TransitionState { mounted, phase }
}

#[test]
fn linear_tween_samples_evenly() {
    init_tracing();
    let scheduler = Scheduler::new();
    let mut value = ValueAnimator::new(0.0, AnimatorConfig::linear(300), scheduler.handle());

    value.set_target(1.0);
    for (time, expected) in [(0.0, 0.0), (75.0, 0.25), (150.0, 0.5), (225.0, 0.75)] {
        scheduler.frame(time);
        assert!((value.current() - expected).abs() < 1e-12, "at {time}ms");
        assert!(value.is_animating());
    }

    scheduler.frame(300.0);
    assert_eq!(value.current(), 1.0);
    assert!(!value.is_animating());
    assert_eq!(scheduler.pending_frames(), 0);
}

#[test]
fn tween_retarget_is_continuous_and_converges() {
    init_tracing();
    let scheduler = Scheduler::new();
    let mut value = ValueAnimator::new(
        10.0,
        AnimatorConfig::new(200, Easing::EaseInOut),
        scheduler.handle(),
    );

    value.set_target(50.0);
    scheduler.frame(0.0);
    scheduler.frame(80.0);

    let before = value.current();
    value.set_target(-20.0);
    assert_eq!(value.current(), before);

    let mut time = 80.0;
    while value.is_animating() {
        time += FRAME_MS;
        scheduler.frame(time);
    }
    assert_eq!(value.current(), -20.0);
    assert!(time <= 80.0 + 200.0 + 2.0 * FRAME_MS);
}

#[test]
fn dialog_lifecycle() {
    init_tracing();
    let scheduler = Scheduler::new();
    let mut dialog = TransitionController::new(
        false,
        TransitionConfig::new(200, Easing::EaseOut),
        scheduler.handle(),
    );
    assert_eq!(dialog.state(), state(false, Phase::Exit));

    dialog.set_visible(true);
    assert_eq!(dialog.state(), state(true, Phase::Enter));
    scheduler.advance_by(200.0);
    assert_eq!(dialog.state(), state(true, Phase::Idle));

    dialog.set_visible(false);
    assert_eq!(dialog.state(), state(true, Phase::Exit));
    scheduler.advance_by(200.0);
    assert_eq!(dialog.state(), state(false, Phase::Exit));
}

#[test]
fn reentry_cancels_pending_unmount() {
    init_tracing();
    let scheduler = Scheduler::new();
    let mut dialog =
        TransitionController::new(true, TransitionConfig::default(), scheduler.handle());

    dialog.set_visible(false);
    scheduler.advance_by(120.0);
    dialog.set_visible(true);

    // Step past the cancelled unmount time one millisecond at a time
    for _ in 0..200 {
        scheduler.advance_by(1.0);
        assert!(dialog.is_mounted());
        assert!(dialog.phase().is_visible());
    }
    assert_eq!(dialog.state(), state(true, Phase::Idle));
    assert!(!scheduler.has_pending());
}

#[test]
fn spring_press_flip_settles_without_overshoot() {
    init_tracing();
    let scheduler = Scheduler::new();
    let mut scale = SpringAnimator::new(1.0, SpringConfig::new(170.0, 26.0), scheduler.handle());

    scale.set_target(0.97);
    scheduler.frame(0.0);
    scale.set_target(1.0);
    scheduler.frame(FRAME_MS);

    // Near-critical damping: the return to 1 stays under 1% of the press travel above it
    let mut peak = scale.value();
    let mut frame = 2;
    while scale.is_animating() {
        assert!(frame < 600, "spring did not settle");
        scheduler.frame(frame as f64 * FRAME_MS);
        peak = peak.max(scale.value());
        frame += 1;
    }

    assert!((scale.value() - 1.0).abs() < 1e-9);
    assert!(peak <= 1.0 + 0.03 * 0.01, "overshoot to {peak}");
}

#[test]
fn nothing_moves_after_teardown() {
    init_tracing();
    let scheduler = Scheduler::new();

    let mut value = ValueAnimator::new(0.0, AnimatorConfig::default(), scheduler.handle());
    let mut spring = SpringAnimator::new(0.0, SpringConfig::default(), scheduler.handle());
    let mut transition =
        TransitionController::new(true, TransitionConfig::default(), scheduler.handle());

    value.set_target(1.0);
    spring.set_target(1.0);
    transition.set_visible(false);
    scheduler.pump(0.0);

    let value_before = value.current();
    let spring_before = spring.value();
    let transition_before = transition.state();

    value.destroy();
    spring.destroy();
    transition.destroy();
    assert!(!scheduler.has_pending());

    let mut time = 0.0;
    for _ in 0..60 {
        time += FRAME_MS;
        scheduler.pump(time);
    }

    assert_eq!(value.current(), value_before);
    assert_eq!(spring.value(), spring_before);
    assert_eq!(transition.state(), transition_before);
}

#[test]
fn dropped_owners_leave_no_callbacks() {
    let scheduler = Scheduler::new();
    {
        let mut value = ValueAnimator::new(0.0, AnimatorConfig::default(), scheduler.handle());
        let mut presence = Presence::new(
            PresencePreset::FadeIn,
            false,
            TransitionConfig::default(),
            scheduler.handle(),
        );
        let press = PressFeedback::new(Default::default(), scheduler.handle());

        value.set_target(1.0);
        presence.set_visible(true);
        press.handle(PressEvent::Down);
        assert!(scheduler.has_pending());
    }

    assert!(!scheduler.has_pending());
    let stats = scheduler.pump(1000.0);
    assert!(!stats.any());
}

#[test]
fn themed_toast_with_reduced_motion() {
    init_tracing();
    let tokens = MotionTokens::from_toml_str(
        r#"
        reduced_motion = true

        [easing]
        default = "easeIn"
        "#,
    )
    .unwrap();

    let scheduler = Scheduler::new();
    let mut toast = Presence::from_name(
        "slideDown",
        false,
        tokens.transition_config(Speed::Normal),
        scheduler.handle(),
    )
    .unwrap();

    toast.set_visible(true);
    assert_eq!(toast.state().phase, Phase::Enter);
    scheduler.advance_by(0.0);
    assert_eq!(toast.state().phase, Phase::Idle);

    toast.set_visible(false);
    let hidden = toast.style().unwrap();
    assert_eq!(hidden.translate_y, -8.0);
    assert_eq!(hidden.timing.duration_ms, 0);
    assert_eq!(hidden.timing.easing, Easing::EaseIn);

    scheduler.advance_by(0.0);
    assert!(toast.style().is_none());
}

#[test]
fn presence_style_serializes_camel_case() {
    let scheduler = Scheduler::new();
    let mut presence = Presence::new(
        PresencePreset::SlideUp,
        true,
        TransitionConfig::default(),
        scheduler.handle(),
    );
    presence.set_visible(false);

    let style = presence.style().unwrap();
    let json = serde_json::to_value(style).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "opacity": 0.0,
            "translateX": 0.0,
            "translateY": 8.0,
            "scale": 1.0,
            "timing": { "durationMs": 200, "easing": "easeOut" }
        })
    );
}

#[test]
fn message_list_animates_each_id_once() {
    let mut played = PlayedRegistry::new(3);
    let first_render: Vec<bool> = ["m1", "m2", "m3"]
        .iter()
        .map(|id| played.mark_played(id))
        .collect();
    assert_eq!(first_render, [true, true, true]);

    let second_render: Vec<bool> = ["m2", "m3", "m4"]
        .iter()
        .map(|id| played.mark_played(id))
        .collect();
    assert_eq!(second_render, [false, false, true]);
    assert!(!played.has_played("m1"));
}

#[test]
fn host_loop_drives_press_feedback() {
    init_tracing();
    let scheduler = Scheduler::new();
    let press = PressFeedback::new(
        MotionTokens::default().press_config(),
        scheduler.handle(),
    );
    let on_pointer = press.event_handler();

    on_pointer(PressEvent::Down);
    let mut now = 0.0;
    let mut min_scale = 1.0_f64;
    for _ in 0..6 {
        scheduler.pump(now);
        min_scale = min_scale.min(press.scale());
        now += FRAME_MS;
    }
    on_pointer(PressEvent::Up);
    while scheduler.has_pending() {
        scheduler.pump(now);
        now += FRAME_MS;
    }

    assert!(min_scale < 1.0);
    assert!(min_scale >= 0.97 - 1e-3);
    assert_eq!(press.scale(), 1.0);
    assert_eq!(press.transform().to_string(), "scale(1)");
}
