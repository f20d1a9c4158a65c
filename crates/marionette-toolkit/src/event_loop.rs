//! The dedicated UI thread.
//!
//! An [`EventLoop`] owns a thread that owns the [`Ui`]: the component tree,
//! the event queue and every handler. Other threads talk to it only by
//! posting messages through an [`EventLoopHandle`].

use crate::event::InputEvent;
use crate::ui::Ui;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle, ThreadId};

pub(crate) enum UiMessage {
    Task(Box<dyn FnOnce(&Ui) + Send + 'static>),
    Input(InputEvent),
    Shutdown,
}

/// Returned when posting to an event loop whose thread has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopClosed;

impl std::fmt::Display for LoopClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UI event loop is no longer running")
    }
}

impl std::error::Error for LoopClosed {}

struct LoopShared {
    tx: mpsc::Sender<UiMessage>,
    /// Messages sent but not yet moved into the UI thread's queue.
    pending: AtomicUsize,
    alive: AtomicBool,
    ui_thread_id: ThreadId,
    name: String,
}

impl LoopShared {
    fn send(&self, message: UiMessage) -> Result<(), LoopClosed> {
        if !self.alive.load(Ordering::SeqCst) {
            return Err(LoopClosed);
        }
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.tx.send(message).map_err(|_| {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            LoopClosed
        })
    }
}

/// Cloneable, thread-safe handle used to post work to the UI thread.
#[derive(Clone)]
pub struct EventLoopHandle {
    shared: Arc<LoopShared>,
}

impl EventLoopHandle {
    /// Enqueues work from any thread to run on the UI thread.
    pub fn post(&self, task: impl FnOnce(&Ui) + Send + 'static) -> Result<(), LoopClosed> {
        self.shared.send(UiMessage::Task(Box::new(task)))
    }

    /// Enqueues a raw input event, as a hardware device would.
    pub fn post_input(&self, event: InputEvent) -> Result<(), LoopClosed> {
        self.shared.send(UiMessage::Input(event))
    }

    /// Asks the loop to stop after the messages already sent.
    pub fn shutdown(&self) {
        let _ = self.shared.send(UiMessage::Shutdown);
    }

    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.shared.ui_thread_id
    }

    pub fn is_alive(&self) -> bool {
        self.shared.alive.load(Ordering::SeqCst)
    }

    /// Messages posted from other threads that the UI thread has not picked up yet.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub(crate) fn message_accepted(&self) {
        let previous = self.shared.pending.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "event loop pending count underflowed");
    }
}

impl std::fmt::Debug for EventLoopHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoopHandle")
            .field("name", &self.shared.name)
            .field("alive", &self.is_alive())
            .finish()
    }
}

struct AliveGuard {
    shared: Arc<LoopShared>,
}

impl Drop for AliveGuard {
    fn drop(&mut self) {
        self.shared.alive.store(false, Ordering::SeqCst);
    }
}

thread_local! {
    static CURRENT_UI: RefCell<Option<Rc<Ui>>> = const { RefCell::new(None) };
}

/// Runs `f` against the UI owned by the current thread.
///
/// Returns `None` when called from any thread other than a UI thread.
pub fn with_current_ui<R>(f: impl FnOnce(&Ui) -> R) -> Option<R> {
    let ui = CURRENT_UI.with(|slot| slot.borrow().clone())?;
    Some(f(&ui))
}

/// Owns the UI thread. Dropping it shuts the loop down and joins the thread.
pub struct EventLoop {
    handle: EventLoopHandle,
    join: Option<JoinHandle<()>>,
}

impl EventLoop {
    /// Spawns a named UI thread and waits until it accepts messages.
    pub fn spawn(name: impl Into<String>) -> std::io::Result<EventLoop> {
        let name = name.into();
        let (handle_tx, handle_rx) = mpsc::channel();
        let thread_name = name.clone();

        let join = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                let (tx, rx) = mpsc::channel();
                let shared = Arc::new(LoopShared {
                    tx,
                    pending: AtomicUsize::new(0),
                    alive: AtomicBool::new(true),
                    ui_thread_id: thread::current().id(),
                    name: thread_name,
                });
                let _alive = AliveGuard {
                    shared: shared.clone(),
                };
                let handle = EventLoopHandle { shared };
                if handle_tx.send(handle.clone()).is_err() {
                    return;
                }
                run(handle, rx);
            })?;

        let handle = handle_rx
            .recv()
            .map_err(|_| std::io::Error::other("event loop thread exited during startup"))?;
        log::debug!("event loop '{}' started", name);
        Ok(EventLoop {
            handle,
            join: Some(join),
        })
    }

    pub fn handle(&self) -> EventLoopHandle {
        self.handle.clone()
    }

    /// Stops the loop and waits for the UI thread to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        let Some(join) = self.join.take() else {
            return;
        };
        self.handle.shutdown();
        if self.handle.is_ui_thread() {
            // Dropped from inside a handler; the loop exits on its own.
            return;
        }
        if join.join().is_err() {
            log::error!("event loop '{}' panicked", self.handle.name());
        } else {
            log::debug!("event loop '{}' stopped", self.handle.name());
        }
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

fn run(handle: EventLoopHandle, rx: mpsc::Receiver<UiMessage>) {
    let ui = Rc::new(Ui::new(handle));
    CURRENT_UI.with(|slot| *slot.borrow_mut() = Some(ui.clone()));

    'events: loop {
        for message in rx.try_iter() {
            if !ui.accept(message) {
                break 'events;
            }
        }

        if let Some(event) = ui.pop_event() {
            ui.dispatch(event);
            continue;
        }

        match rx.recv() {
            Ok(message) => {
                if !ui.accept(message) {
                    break;
                }
            }
            Err(_) => break,
        }
    }

    CURRENT_UI.with(|slot| slot.borrow_mut().take());
}

/// Best-effort text of a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "tests/event_loop_tests.rs"]
mod tests;
