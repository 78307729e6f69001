#![allow(dead_code)]

use checkout_session::application::controller::SessionController;
use checkout_session::domain::config::SessionConfig;
use checkout_session::domain::ports::RandomSource;
use checkout_session::domain::session::ViewState;
use checkout_session::infrastructure::clock::ManualClock;
use checkout_session::infrastructure::random::{ScriptedRandom, StdRandom};

/// A controller on a manual clock whose random draws all take the low bound
/// (80 ms progress ticks, 7000 ms check).
pub fn lowest_controller() -> (ManualClock, SessionController) {
    controller_with(ScriptedRandom::lowest())
}

pub fn seeded_controller(seed: u64) -> (ManualClock, SessionController) {
    controller_with(StdRandom::seeded(seed))
}

pub fn controller_with<R: RandomSource + 'static>(random: R) -> (ManualClock, SessionController) {
    let clock = ManualClock::new();
    let controller = SessionController::new(
        SessionConfig::default(),
        Box::new(clock.clone()),
        Box::new(random),
    )
    .expect("default config is valid");
    (clock, controller)
}

/// Advances in small steps until the controller reaches `state`, giving up
/// after `limit_ms` of simulated time.
pub fn run_until(
    clock: &ManualClock,
    controller: &mut SessionController,
    state: ViewState,
    limit_ms: u64,
) -> bool {
    let mut waited = 0;
    while controller.state() != state {
        if waited >= limit_ms {
            return false;
        }
        clock.advance_millis(10);
        waited += 10;
        controller.poll();
    }
    true
}

/// Loading takes at most 100 ticks of 180 ms.
pub fn reach_payment(clock: &ManualClock, controller: &mut SessionController) {
    assert!(
        run_until(clock, controller, ViewState::Payment, 18_000),
        "loading never completed"
    );
}
