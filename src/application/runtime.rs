use crate::application::controller::{Dispatch, SessionController};
use crate::domain::config::SessionConfig;
use crate::domain::ports::RandomSourceBox;
use crate::domain::session::{Session, SessionCommand};
use crate::error::{Result, SessionError};
use crate::infrastructure::clock::TokioClock;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

const REQUEST_BUFFER: usize = 16;

enum Request {
    Execute {
        command: SessionCommand,
        reply: oneshot::Sender<Dispatch>,
    },
    Shutdown,
}

/// Drives a [`SessionController`] in real time on its own task.
///
/// The task is the only place the controller lives, so commands and timer
/// expirations are handled strictly one after another. Every change is
/// published as a [`Session`] snapshot on a `watch` channel.
pub struct SessionRuntime {
    controller: SessionController,
    requests: mpsc::Receiver<Request>,
    snapshots: watch::Sender<Session>,
}

impl SessionRuntime {
    /// Starts a session on the tokio clock and returns a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: SessionConfig, random: RandomSourceBox) -> Result<SessionHandle> {
        let controller = SessionController::new(config, Box::new(TokioClock), random)?;
        let (request_tx, request_rx) = mpsc::channel(REQUEST_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        let runtime = Self {
            controller,
            requests: request_rx,
            snapshots: snapshot_tx,
        };
        tokio::spawn(runtime.run());

        Ok(SessionHandle {
            requests: request_tx,
            snapshots: snapshot_rx,
        })
    }

    async fn run(mut self) {
        debug!("session runtime started");
        loop {
            let deadline = self.controller.next_deadline();
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(Request::Execute { command, reply }) => {
                        // Timers already overdue happened before the command.
                        self.controller.poll();
                        let outcome = self.controller.execute(command);
                        self.publish();
                        let _ = reply.send(outcome);
                    }
                    Some(Request::Shutdown) | None => break,
                },
                _ = sleep_until(deadline) => {
                    self.controller.poll();
                    self.publish();
                }
            }
        }
        debug!(state = %self.controller.state(), "session runtime stopped");
    }

    fn publish(&self) {
        let session = self.controller.session();
        self.snapshots.send_if_modified(|current| {
            if current == session {
                return false;
            }
            *current = session.clone();
            true
        });
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}

/// Cloneable handle to a running session.
///
/// The session task stops when [`SessionHandle::shutdown`] is called or
/// when every handle has been dropped.
#[derive(Clone)]
pub struct SessionHandle {
    requests: mpsc::Sender<Request>,
    snapshots: watch::Receiver<Session>,
}

impl SessionHandle {
    pub async fn confirm_payment(&self) -> Result<Dispatch> {
        self.execute(SessionCommand::Confirm).await
    }

    pub async fn cancel_payment(&self) -> Result<Dispatch> {
        self.execute(SessionCommand::Cancel).await
    }

    pub async fn retry(&self) -> Result<Dispatch> {
        self.execute(SessionCommand::Retry).await
    }

    /// Sends a command and waits for the controller's verdict. The snapshot
    /// reflects the outcome by the time this returns.
    pub async fn execute(&self, command: SessionCommand) -> Result<Dispatch> {
        let (reply, outcome) = oneshot::channel();
        self.requests
            .send(Request::Execute { command, reply })
            .await
            .map_err(|_| SessionError::RuntimeClosed)?;
        outcome.await.map_err(|_| SessionError::RuntimeClosed)
    }

    pub fn snapshot(&self) -> Session {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.snapshots.clone()
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.requests
            .send(Request::Shutdown)
            .await
            .map_err(|_| SessionError::RuntimeClosed)
    }
}
