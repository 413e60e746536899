use std::sync::Arc;

use drip_core::{
    clock::ManualClock, BrewParams, BrewTimer, BrewTimerBuilder, MemoryAlarms, MemoryNotifier,
    Roast,
};
use jiff::Timestamp;

/// A timer wired to a manual clock and in-memory facilities.
pub struct TestBrew {
    pub clock: ManualClock,
    pub alarms: Arc<MemoryAlarms>,
    pub notifier: Arc<MemoryNotifier>,
    pub timer: BrewTimer,
}

/// Instant every test brew starts at.
pub fn epoch() -> Timestamp {
    Timestamp::from_second(1_700_000_000).expect("Failed to build epoch")
}

/// Helper function to create a test brew
pub fn create_test_brew(bean_mass: &str, roast: Roast) -> TestBrew {
    let clock = ManualClock::new(epoch());
    let alarms = Arc::new(MemoryAlarms::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let timer = BrewTimerBuilder::new()
        .with_params(BrewParams::new(bean_mass, roast))
        .with_clock(Arc::new(clock.clone()))
        .with_alarms(alarms.clone())
        .with_notifier(notifier.clone())
        .build()
        .expect("Failed to create timer");
    TestBrew {
        clock,
        alarms,
        notifier,
        timer,
    }
}
