use crate::domain::config::Delay;
use crate::domain::ports::RandomSource;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStatus {
    Armed,
    Fired,
    Cancelled,
}

/// A cancelable scheduled callback.
///
/// Holds a single deadline and never fires on its own: the owner polls it
/// against a clock. Once fired or cancelled it stays disarmed.
#[derive(Debug, Clone)]
pub struct ScheduledCallback {
    deadline: Instant,
    status: CallbackStatus,
}

impl ScheduledCallback {
    pub fn arm(deadline: Instant) -> Self {
        Self {
            deadline,
            status: CallbackStatus::Armed,
        }
    }

    pub fn status(&self) -> CallbackStatus {
        self.status
    }

    pub fn is_armed(&self) -> bool {
        self.status == CallbackStatus::Armed
    }

    /// The pending deadline, `None` once disarmed.
    pub fn deadline(&self) -> Option<Instant> {
        self.is_armed().then_some(self.deadline)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.is_armed() && self.deadline <= now
    }

    /// Disarms the callback. Cancelling a fired or cancelled callback is a
    /// no-op.
    pub fn cancel(&mut self) {
        if self.is_armed() {
            self.status = CallbackStatus::Cancelled;
        }
    }

    /// Marks the callback fired and returns the deadline it fired for.
    fn fire(&mut self) -> Instant {
        self.status = CallbackStatus::Fired;
        self.deadline
    }

    /// Moves the deadline one period forward. Periods are measured from the
    /// previous deadline, so a late poll catches up tick by tick.
    fn reschedule(&mut self, period: Duration) {
        self.deadline += period;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Progress,
    Countdown,
    Delayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressSignal {
    Advanced { progress: u8 },
    Completed { at: Instant },
}

/// Repeating tick with a randomized period that drives the loading bar.
#[derive(Debug, Clone)]
pub struct ProgressSimulator {
    callback: ScheduledCallback,
    period: Delay,
    progress: u8,
}

impl ProgressSimulator {
    pub const COMPLETE: u8 = 100;

    pub fn start(now: Instant, period: Delay, random: &mut dyn RandomSource) -> Self {
        Self {
            callback: ScheduledCallback::arm(now + period.sample(random)),
            period,
            progress: 0,
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.callback.deadline()
    }

    pub fn cancel(&mut self) {
        self.callback.cancel();
    }

    /// Handles one due tick, if any. Completion is reported exactly once.
    pub fn poll(
        &mut self,
        now: Instant,
        random: &mut dyn RandomSource,
    ) -> Option<ProgressSignal> {
        if !self.callback.is_due(now) {
            return None;
        }
        self.progress = (self.progress + 1).min(Self::COMPLETE);
        if self.progress == Self::COMPLETE {
            return Some(ProgressSignal::Completed {
                at: self.callback.fire(),
            });
        }
        self.callback.reschedule(self.period.sample(random));
        Some(ProgressSignal::Advanced {
            progress: self.progress,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownSignal {
    Tick { remaining: u32 },
    ReachedZero { at: Instant },
}

/// Fixed-period countdown of whole seconds.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    callback: ScheduledCallback,
    period: Duration,
    remaining: u32,
}

impl CountdownTimer {
    /// Arms the first tick. A uniform period is drawn once and kept for
    /// every tick.
    pub fn start(
        now: Instant,
        seconds: u32,
        period: Delay,
        random: &mut dyn RandomSource,
    ) -> Self {
        let period = period.sample(random);
        Self {
            callback: ScheduledCallback::arm(now + period),
            period,
            remaining: seconds,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.callback.deadline()
    }

    pub fn cancel(&mut self) {
        self.callback.cancel();
    }

    pub fn poll(&mut self, now: Instant) -> Option<CountdownSignal> {
        if !self.callback.is_due(now) {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            return Some(CountdownSignal::ReachedZero {
                at: self.callback.fire(),
            });
        }
        self.callback.reschedule(self.period);
        Some(CountdownSignal::Tick {
            remaining: self.remaining,
        })
    }
}

/// One-shot timer that yields `event` once its duration has elapsed.
#[derive(Debug, Clone)]
pub struct DelayedTransition<E> {
    callback: ScheduledCallback,
    event: E,
}

impl<E: Copy> DelayedTransition<E> {
    /// Arms the timer; a uniform delay is drawn once, here.
    pub fn start(
        now: Instant,
        delay: Delay,
        random: &mut dyn RandomSource,
        event: E,
    ) -> Self {
        Self {
            callback: ScheduledCallback::arm(now + delay.sample(random)),
            event,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.callback.deadline()
    }

    pub fn cancel(&mut self) {
        self.callback.cancel();
    }

    /// Returns the event and the instant it was due, at most once.
    pub fn poll(&mut self, now: Instant) -> Option<(E, Instant)> {
        if !self.callback.is_due(now) {
            return None;
        }
        Some((self.event, self.callback.fire()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal<E> {
    Progress(ProgressSignal),
    Countdown(CountdownSignal),
    Delayed { event: E, at: Instant },
}

/// The single timer a session may have armed.
#[derive(Debug, Clone)]
pub enum ArmedTimer<E> {
    Progress(ProgressSimulator),
    Countdown(CountdownTimer),
    Delayed(DelayedTransition<E>),
}

impl<E: Copy> ArmedTimer<E> {
    pub fn kind(&self) -> TimerKind {
        match self {
            Self::Progress(_) => TimerKind::Progress,
            Self::Countdown(_) => TimerKind::Countdown,
            Self::Delayed(_) => TimerKind::Delayed,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            Self::Progress(timer) => timer.deadline(),
            Self::Countdown(timer) => timer.deadline(),
            Self::Delayed(timer) => timer.deadline(),
        }
    }

    pub fn cancel(&mut self) {
        match self {
            Self::Progress(timer) => timer.cancel(),
            Self::Countdown(timer) => timer.cancel(),
            Self::Delayed(timer) => timer.cancel(),
        }
    }

    pub fn poll(
        &mut self,
        now: Instant,
        random: &mut dyn RandomSource,
    ) -> Option<TimerSignal<E>> {
        match self {
            Self::Progress(timer) => timer.poll(now, random).map(TimerSignal::Progress),
            Self::Countdown(timer) => timer.poll(now).map(TimerSignal::Countdown),
            Self::Delayed(timer) => timer
                .poll(now)
                .map(|(event, at)| TimerSignal::Delayed { event, at }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::random::ScriptedRandom;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn delay(value: u64) -> Delay {
        Delay::from_millis(value).unwrap()
    }

    fn loading_period() -> Delay {
        Delay::uniform_millis(80, 180).unwrap()
    }

    fn countdown(start: Instant, seconds: u32) -> CountdownTimer {
        CountdownTimer::start(start, seconds, delay(1000), &mut ScriptedRandom::lowest())
    }

    #[test]
    fn test_callback_cancel_is_idempotent() {
        let start = Instant::now();
        let mut callback = ScheduledCallback::arm(start + ms(10));

        callback.cancel();
        callback.cancel();
        assert_eq!(callback.status(), CallbackStatus::Cancelled);
        assert_eq!(callback.deadline(), None);
        assert!(!callback.is_due(start + ms(100)));
    }

    #[test]
    fn test_delayed_transition_fires_once() {
        let start = Instant::now();
        let mut random = ScriptedRandom::new(vec![0]);
        let mut timer = DelayedTransition::start(start, delay(500), &mut random, "elapsed");

        assert_eq!(timer.poll(start + ms(499)), None);
        assert_eq!(
            timer.poll(start + ms(10_000)),
            Some(("elapsed", start + ms(500)))
        );
        // Late polls never fire a second time.
        assert_eq!(timer.poll(start + ms(20_000)), None);
        timer.cancel();
        assert_eq!(timer.poll(start + ms(30_000)), None);
    }

    #[test]
    fn test_cancelled_delayed_transition_never_fires() {
        let start = Instant::now();
        let mut random = ScriptedRandom::new(vec![0]);
        let mut timer = DelayedTransition::start(start, delay(500), &mut random, ());

        timer.cancel();
        timer.cancel();
        assert_eq!(timer.deadline(), None);
        assert_eq!(timer.poll(start + ms(1_000)), None);
    }

    #[test]
    fn test_delayed_transition_draws_uniform_delay_once() {
        let start = Instant::now();
        let mut random = ScriptedRandom::new(vec![1500, 0]);
        let checking = Delay::uniform_millis(7000, 10000).unwrap();
        let timer = DelayedTransition::start(start, checking, &mut random, ());

        assert_eq!(timer.deadline(), Some(start + ms(8500)));
    }

    #[test]
    fn test_countdown_reaches_zero_on_last_tick() {
        let start = Instant::now();
        let mut timer = countdown(start, 3);

        assert_eq!(timer.poll(start + ms(999)), None);
        assert_eq!(
            timer.poll(start + ms(1000)),
            Some(CountdownSignal::Tick { remaining: 2 })
        );
        assert_eq!(
            timer.poll(start + ms(2000)),
            Some(CountdownSignal::Tick { remaining: 1 })
        );
        assert_eq!(
            timer.poll(start + ms(3000)),
            Some(CountdownSignal::ReachedZero { at: start + ms(3000) })
        );
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.poll(start + ms(60_000)), None);
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn test_countdown_catches_up_after_late_poll() {
        let start = Instant::now();
        let mut timer = countdown(start, 10);
        let late = start + ms(4500);

        let mut ticks = 0;
        while let Some(signal) = timer.poll(late) {
            assert!(matches!(signal, CountdownSignal::Tick { .. }));
            ticks += 1;
        }
        assert_eq!(ticks, 4);
        assert_eq!(timer.remaining(), 6);
        assert_eq!(timer.deadline(), Some(start + ms(5000)));
    }

    #[test]
    fn test_progress_completes_exactly_once() {
        let start = Instant::now();
        let mut random = ScriptedRandom::new(vec![0]);
        let mut timer = ProgressSimulator::start(start, loading_period(), &mut random);

        let mut completions = 0;
        let mut last = 0;
        while let Some(signal) = timer.poll(start + ms(60_000), &mut random) {
            match signal {
                ProgressSignal::Advanced { progress } => {
                    assert_eq!(progress, last + 1);
                    last = progress;
                }
                ProgressSignal::Completed { at } => {
                    completions += 1;
                    // 100 ticks of the minimum 80 ms period.
                    assert_eq!(at, start + ms(8000));
                }
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(last, 99);
        assert_eq!(timer.progress(), ProgressSimulator::COMPLETE);
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn test_progress_period_drawn_per_tick() {
        let start = Instant::now();
        // First draw arms the first tick, the next draws schedule later ticks.
        let mut random = ScriptedRandom::new(vec![0, 99, 50]);
        let mut timer = ProgressSimulator::start(start, loading_period(), &mut random);

        assert_eq!(timer.deadline(), Some(start + ms(80)));
        timer.poll(start + ms(80), &mut random);
        assert_eq!(timer.deadline(), Some(start + ms(80 + 179)));
        timer.poll(start + ms(259), &mut random);
        assert_eq!(timer.deadline(), Some(start + ms(259 + 130)));
    }

    #[test]
    fn test_armed_timer_cancel_disarms() {
        let start = Instant::now();
        let mut random = ScriptedRandom::new(vec![0]);
        let mut timer: ArmedTimer<()> = ArmedTimer::Countdown(countdown(start, 300));

        assert_eq!(timer.kind(), TimerKind::Countdown);
        timer.cancel();
        assert_eq!(timer.deadline(), None);
        assert_eq!(timer.poll(start + ms(5000), &mut random), None);
    }

    #[test]
    fn test_countdown_period_drawn_once_at_start() {
        let start = Instant::now();
        let mut random = ScriptedRandom::new(vec![250]);
        let period = Delay::uniform_millis(500, 1500).unwrap();
        let mut timer = CountdownTimer::start(start, 5, period, &mut random);

        assert_eq!(timer.deadline(), Some(start + ms(750)));
        timer.poll(start + ms(750));
        assert_eq!(timer.deadline(), Some(start + ms(1500)));
    }

    #[test]
    fn test_timers_only_accept_checked_delays() {
        assert!(Delay::from_millis(0).is_err());
        assert!(Delay::fixed(Duration::ZERO).is_err());
        assert!(Delay::uniform(Duration::ZERO, ms(10)).is_err());

        // The shortest delay a timer can be given still moves its deadline.
        let start = Instant::now();
        let mut timer = CountdownTimer::start(start, 300, delay(1), &mut ScriptedRandom::lowest());
        let mut signals = 0;
        while timer.poll(start).is_some() {
            signals += 1;
        }
        assert_eq!(signals, 0);
        assert_eq!(timer.deadline(), Some(start + ms(1)));
    }
}
