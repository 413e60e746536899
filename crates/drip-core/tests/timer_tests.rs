mod common;

use common::{create_test_brew, epoch};
use drip_core::{
    alarm::AlarmOutcome, BrewParams, BrewPlan, BrewTimerBuilder, MemoryAlarms, Roast,
    SessionSnapshot, SessionState, SessionStore, TickOutcome,
};
use jiff::SignedDuration;
use tempfile::TempDir;

fn secs(n: i64) -> SignedDuration {
    SignedDuration::from_secs(n)
}

#[test]
fn test_medium_brew_from_start_to_auto_cancel() {
    let mut brew = create_test_brew("20", Roast::Medium);

    let amounts: Vec<f64> = brew
        .timer
        .plan()
        .iter()
        .map(|s| s.cumulative_target_amount)
        .collect();
    assert_eq!(amounts, vec![80.0, 200.0, 320.0]);

    brew.timer.start().expect("Failed to start");
    assert_eq!(brew.notifier.take(), vec!["Start pouring to 80 g"]);

    // Step 1 is current 30 s into its 180 s wait.
    brew.clock.set(epoch() + secs(150));
    brew.timer.tick().unwrap();
    let view = brew.timer.view();
    assert_eq!(view.current, Some(1));
    assert_eq!(view.steps[0].remaining, Some(SignedDuration::ZERO));
    assert_eq!(view.steps[1].remaining, Some(secs(150)));
    assert!(!view.steps[2].is_current);

    // Alarms deliver as the clock passes their instants.
    let fired = brew.alarms.fire_due(epoch() + secs(150));
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].payload, "Wait, then pour to 200 g");

    brew.clock.set(epoch() + secs(300));
    assert_eq!(brew.timer.tick().unwrap(), TickOutcome::Completing);
    let fired = brew.alarms.fire_due(epoch() + secs(300));
    assert_eq!(fired[0].payload, "Pour to 320 g, then done");

    brew.clock.set(epoch() + secs(330));
    assert_eq!(brew.timer.tick().unwrap(), TickOutcome::Completed);
    brew.timer.cancel();
    assert_eq!(brew.timer.state(), SessionState::Idle);
    assert!(brew.alarms.pending().is_empty());
}

#[test]
fn test_dark_boundary_belongs_to_next_step() {
    let mut brew = create_test_brew("10", Roast::Dark);
    brew.timer.start().unwrap();

    brew.clock.set(epoch() + SignedDuration::from_millis(119_999));
    brew.timer.tick().unwrap();
    let view = brew.timer.view();
    assert_eq!(view.current, Some(0));
    assert_eq!(view.steps[0].remaining, Some(SignedDuration::from_millis(1)));

    brew.clock.set(epoch() + secs(120));
    assert_eq!(brew.timer.tick().unwrap(), TickOutcome::Pouring { step: 1 });
}

#[test]
fn test_cancel_twice_leaves_nothing_pending() {
    let mut brew = create_test_brew("10", Roast::Dark);
    brew.timer.start().unwrap();
    brew.timer.cancel();
    brew.timer.cancel();

    assert_eq!(brew.timer.state(), SessionState::Idle);
    assert!(brew.alarms.pending().is_empty());
}

#[test]
fn test_plan_after_cancel_is_bit_identical() {
    let mut brew = create_test_brew("18.5", Roast::Medium);
    let before = brew.timer.plan().clone();
    brew.timer.start().unwrap();
    brew.clock.advance(secs(45));
    brew.timer.cancel();

    let rebuilt = BrewPlan::build("18.5", Roast::Medium);
    assert_eq!(rebuilt, before);
    for (a, b) in rebuilt.iter().zip(before.iter()) {
        assert_eq!(
            a.cumulative_target_amount.to_bits(),
            b.cumulative_target_amount.to_bits()
        );
    }
}

#[test]
fn test_parameter_change_preserves_elapsed_time() {
    let mut brew = create_test_brew("20", Roast::Medium);
    brew.timer.start().unwrap();
    brew.clock.set(epoch() + secs(200));

    brew.timer
        .parameter_changed(BrewParams::new("10", Roast::Dark))
        .unwrap();
    brew.timer.tick().unwrap();

    assert_eq!(brew.timer.session().started_at, Some(epoch()));
    let view = brew.timer.view();
    assert_eq!(view.current, Some(1));
    assert_eq!(view.steps[1].remaining, Some(secs(40)));
}

#[test]
fn test_past_due_step_gets_no_alarm() {
    let mut brew = create_test_brew("10", Roast::Dark);
    brew.timer.restore(SessionSnapshot {
        params: brew.timer.params().clone(),
        started_at: Some(epoch()),
    });
    brew.clock.set(epoch() + SignedDuration::from_mins(10));

    let report = brew.timer.resume_alarms().unwrap();
    assert_eq!(report.scheduled(), Vec::<usize>::new());
    assert_eq!(
        report.outcome(1),
        Some(AlarmOutcome::PastDue(epoch() + secs(120)))
    );
    assert!(brew.alarms.requests().is_empty());
}

#[test]
fn test_fire_instant_equal_to_now_is_past_due() {
    let mut brew = create_test_brew("20", Roast::Medium);
    brew.timer.start().unwrap();
    brew.clock.set(epoch() + secs(120));

    let report = brew
        .timer
        .parameter_changed(BrewParams::new("20", Roast::Medium))
        .unwrap();
    assert_eq!(report.past_due(), vec![0, 1]);
    assert_eq!(report.scheduled(), vec![2]);
}

#[test]
fn test_permission_denied_keeps_engine_running() {
    let alarms = std::sync::Arc::new(MemoryAlarms::denying());
    let mut timer = BrewTimerBuilder::new()
        .with_alarms(alarms.clone())
        .build()
        .unwrap();

    let report = timer.start().unwrap();
    assert_eq!(report.denied(), vec![1, 2, 3]);
    assert_eq!(timer.state(), SessionState::Running);
    assert!(alarms.pending().is_empty());
}

#[test]
fn test_session_survives_restart_through_store() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = SessionStore::new(temp_dir.path().join("session.json"));

    let mut first = create_test_brew("20", Roast::Medium);
    first.timer.start().unwrap();
    store.save(&first.timer.snapshot()).unwrap();
    drop(first);

    let mut second = create_test_brew("10", Roast::Dark);
    let snapshot = store.load().unwrap().expect("Snapshot was saved");
    second.timer.restore(snapshot);

    assert_eq!(second.timer.state(), SessionState::Running);
    assert!(second.timer.needs_tick());
    assert_eq!(second.timer.params().roast, Roast::Medium);

    second.clock.set(epoch() + secs(150));
    second.timer.resume_alarms();
    second.timer.tick().unwrap();
    assert_eq!(second.timer.view().current, Some(1));

    let keys: Vec<usize> = second.alarms.pending().iter().map(|a| a.key).collect();
    assert_eq!(keys, vec![2]);
}
