use crate::domain::config::SessionConfig;
use crate::domain::identifiers::SessionIdentifiers;
use crate::domain::ports::{ClockBox, RandomSourceBox};
use crate::domain::session::{Session, SessionCommand, SessionEvent, ViewState};
use crate::domain::timer::{
    ArmedTimer, CountdownSignal, CountdownTimer, DelayedTransition, ProgressSignal,
    ProgressSimulator, TimerKind, TimerSignal,
};
use crate::error::Result;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of delivering an event to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Transitioned { from: ViewState, to: ViewState },
    /// The event is not valid in the current state and changed nothing.
    Ignored,
}

/// Sole owner of the session and of the one timer armed for its state.
///
/// Every transition goes through [`SessionController::dispatch`], which
/// cancels the outgoing state's timer before the incoming state's entry
/// actions run. The controller never blocks: timers are deadlines that the
/// caller services with [`SessionController::poll`].
pub struct SessionController {
    config: SessionConfig,
    clock: ClockBox,
    random: RandomSourceBox,
    session: Session,
    timer: Option<ArmedTimer<SessionEvent>>,
}

impl SessionController {
    /// Creates a session already in `Loading`, with fresh identifiers and
    /// the progress simulator armed.
    ///
    /// Fails if any configured duration is zero or any range is empty.
    pub fn new(config: SessionConfig, clock: ClockBox, random: RandomSourceBox) -> Result<Self> {
        config.validate()?;
        let now = clock.now();
        let session = Session::new(SessionIdentifiers::default(), config.countdown_seconds);
        let mut controller = Self {
            config,
            clock,
            random,
            session,
            timer: None,
        };
        controller.enter(ViewState::Loading, now);
        info!(
            order = %controller.session.identifiers.order_number,
            "session started"
        );
        Ok(controller)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> ViewState {
        self.session.state
    }

    pub fn snapshot(&self) -> Session {
        self.session.clone()
    }

    /// The timer currently armed, if any. Never more than one.
    pub fn armed_timer(&self) -> Option<TimerKind> {
        self.timer.as_ref().map(ArmedTimer::kind)
    }

    /// When the armed timer next needs servicing.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.as_ref().and_then(ArmedTimer::deadline)
    }

    pub fn confirm_payment(&mut self) -> Dispatch {
        self.execute(SessionCommand::Confirm)
    }

    pub fn cancel_payment(&mut self) -> Dispatch {
        self.execute(SessionCommand::Cancel)
    }

    pub fn retry(&mut self) -> Dispatch {
        self.execute(SessionCommand::Retry)
    }

    /// Applies a user command at the current instant. Commands that are not
    /// valid in the current state are ignored.
    pub fn execute(&mut self, command: SessionCommand) -> Dispatch {
        let now = self.clock.now();
        let outcome = self.dispatch(command.event(), now);
        if outcome == Dispatch::Ignored {
            debug!(%command, state = %self.session.state, "command ignored");
        }
        outcome
    }

    /// Services every timer signal due at the current instant and returns
    /// how many were handled.
    ///
    /// Repeating timers catch up one tick at a time; a one-shot timer fires
    /// at most once however late the poll is.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();
        let mut handled = 0;
        while let Some(signal) = self
            .timer
            .as_mut()
            .and_then(|timer| timer.poll(now, self.random.as_mut()))
        {
            handled += 1;
            self.apply(signal);
        }
        handled
    }

    fn apply(&mut self, signal: TimerSignal<SessionEvent>) {
        match signal {
            TimerSignal::Progress(ProgressSignal::Advanced { progress }) => {
                self.session.loading_progress = progress;
            }
            TimerSignal::Progress(ProgressSignal::Completed { at }) => {
                self.session.loading_progress = ProgressSimulator::COMPLETE;
                self.dispatch(SessionEvent::ProgressCompleted, at);
            }
            TimerSignal::Countdown(CountdownSignal::Tick { remaining }) => {
                self.session.time_left = remaining;
            }
            TimerSignal::Countdown(CountdownSignal::ReachedZero { at }) => {
                self.session.time_left = 0;
                self.dispatch(SessionEvent::CountdownExpired, at);
            }
            TimerSignal::Delayed { event, at } => {
                self.dispatch(event, at);
            }
        }
    }

    /// Runs one row of the transition table. `at` is the instant the event
    /// happened; timers armed on entry are scheduled from it.
    fn dispatch(&mut self, event: SessionEvent, at: Instant) -> Dispatch {
        let from = self.session.state;
        let Some(to) = event.next_state(from) else {
            return Dispatch::Ignored;
        };

        self.cancel_timer();
        self.session.state = to;
        self.enter(to, at);

        info!(%from, %to, ?event, "session transition");
        Dispatch::Transitioned { from, to }
    }

    fn cancel_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
            debug!(kind = ?timer.kind(), "timer cancelled");
        }
    }

    fn enter(&mut self, state: ViewState, at: Instant) {
        let random = self.random.as_mut();
        let timer = match state {
            ViewState::Loading => {
                let identifiers = SessionIdentifiers::generate(random);
                self.session
                    .restart(identifiers, self.config.countdown_seconds);
                ArmedTimer::Progress(ProgressSimulator::start(
                    at,
                    self.config.progress_period,
                    random,
                ))
            }
            ViewState::Payment => ArmedTimer::Countdown(CountdownTimer::start(
                at,
                self.session.time_left,
                self.config.countdown_period,
                random,
            )),
            ViewState::Checking => ArmedTimer::Delayed(DelayedTransition::start(
                at,
                self.config.checking_delay,
                random,
                SessionEvent::Checked,
            )),
            ViewState::Cancelled => ArmedTimer::Delayed(DelayedTransition::start(
                at,
                self.config.cancelled_delay,
                random,
                SessionEvent::Elapsed,
            )),
            ViewState::Timeout => ArmedTimer::Delayed(DelayedTransition::start(
                at,
                self.config.timeout_delay,
                random,
                SessionEvent::Elapsed,
            )),
            ViewState::Success | ViewState::Info => return,
        };
        debug!(kind = ?timer.kind(), deadline = ?timer.deadline(), "timer armed");
        self.timer = Some(timer);
    }
}
