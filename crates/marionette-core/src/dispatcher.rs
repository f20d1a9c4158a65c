//! Runs work on the UI thread on behalf of caller threads.
//!
//! The dispatcher is the only sanctioned way for a test thread to read or
//! mutate UI state. Each call posts the work to the UI thread and blocks
//! until it has run; called from the UI thread itself, the work runs inline.

use crate::error::{BoxError, PanicError, RobotError, RobotResult};
use marionette_toolkit::{panic_message, with_current_ui, EventLoopHandle, Ui};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;

/// Runs `work` and folds errors and panics into a [`RobotError`].
fn execute<T, F>(ui: &Ui, work: F) -> RobotResult<T>
where
    F: FnOnce(&Ui) -> Result<T, BoxError>,
{
    match catch_unwind(AssertUnwindSafe(|| work(ui))) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(RobotError::unexpected(err)),
        Err(payload) => Err(RobotError::Unexpected {
            source: Box::new(PanicError {
                message: panic_message(payload.as_ref()),
            }),
        }),
    }
}

/// A dispatched unit of work whose outcome the caller has not seen yet.
struct PendingAction<T> {
    reply: mpsc::Receiver<RobotResult<T>>,
}

impl<T: Send + 'static> PendingAction<T> {
    fn post<F>(handle: &EventLoopHandle, work: F) -> RobotResult<Self>
    where
        F: FnOnce(&Ui) -> Result<T, BoxError> + Send + 'static,
    {
        let (tx, reply) = mpsc::sync_channel(1);
        handle
            .post(move |ui| {
                // The caller may have given up; nobody is left to tell.
                let _ = tx.send(execute(ui, work));
            })
            .map_err(|err| RobotError::dispatcher_unavailable(err.to_string()))?;
        Ok(Self { reply })
    }

    fn wait(self) -> RobotResult<T> {
        self.reply.recv().map_err(|_| {
            RobotError::dispatcher_unavailable("UI thread stopped before running the action")
        })?
    }
}

/// Marshals queries and tasks onto one UI thread.
#[derive(Clone, Debug)]
pub struct ActionDispatcher {
    handle: EventLoopHandle,
}

impl ActionDispatcher {
    pub fn new(handle: EventLoopHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &EventLoopHandle {
        &self.handle
    }

    /// Runs `work` on the UI thread and returns its result.
    ///
    /// Errors returned by `work` come back as [`RobotError::Unexpected`]
    /// unless they are lookup, wait timeout or action failures, which come
    /// back unwrapped. A panic in `work` is reported as `Unexpected`.
    pub fn run_query<T, F>(&self, work: F) -> RobotResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Ui) -> Result<T, BoxError> + Send + 'static,
    {
        if self.handle.is_ui_thread() {
            log::trace!("running action inline on '{}'", self.handle.name());
            return with_current_ui(|ui| execute(ui, work)).unwrap_or_else(|| {
                Err(RobotError::dispatcher_unavailable(
                    "UI thread has no active event loop",
                ))
            });
        }
        PendingAction::post(&self.handle, work)?.wait()
    }

    /// Runs `work` on the UI thread and waits for it to finish.
    pub fn run_task<F>(&self, work: F) -> RobotResult<()>
    where
        F: FnOnce(&Ui) -> Result<(), BoxError> + Send + 'static,
    {
        self.run_query(work)
    }

    /// [`run_query`](Self::run_query) for work that cannot fail.
    pub fn query<T, F>(&self, work: F) -> RobotResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Ui) -> T + Send + 'static,
    {
        self.run_query(move |ui| Ok(work(ui)))
    }

    /// [`run_task`](Self::run_task) for work that cannot fail.
    pub fn task<F>(&self, work: F) -> RobotResult<()>
    where
        F: FnOnce(&Ui) + Send + 'static,
    {
        self.run_query(move |ui| {
            work(ui);
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
