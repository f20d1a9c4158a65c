//! The input device seam.
//!
//! A robot never touches UI state to synthesize input. It drives an
//! [`InputDevice`], which behaves like hardware: events are posted to the UI
//! thread's queue and handled whenever the UI thread gets to them.

use marionette_toolkit::{EventLoopHandle, InputEvent, KeyCode, MouseButtons, Point};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("input device disconnected: {0}")]
    Disconnected(String),
    #[error("input injection failed: {0}")]
    InjectionFailed(String),
}

pub type InputResult<T> = Result<T, InputError>;

/// Primitive mouse and keyboard events in screen coordinates.
pub trait InputDevice: Send + Sync {
    fn move_mouse(&self, to: Point) -> InputResult<()>;
    fn press_mouse(&self, buttons: MouseButtons) -> InputResult<()>;
    fn release_mouse(&self, buttons: MouseButtons) -> InputResult<()>;
    fn rotate_wheel(&self, amount: i32) -> InputResult<()>;
    fn press_key(&self, key: KeyCode) -> InputResult<()>;
    fn release_key(&self, key: KeyCode) -> InputResult<()>;
}

/// Posts raw events into a toolkit event loop.
#[derive(Clone, Debug)]
pub struct EventQueueDevice {
    handle: EventLoopHandle,
}

impl EventQueueDevice {
    pub fn new(handle: EventLoopHandle) -> Self {
        Self { handle }
    }

    fn post(&self, event: InputEvent) -> InputResult<()> {
        self.handle
            .post_input(event)
            .map_err(|err| InputError::Disconnected(format!("{}: {err}", self.handle.name())))
    }
}

impl InputDevice for EventQueueDevice {
    fn move_mouse(&self, to: Point) -> InputResult<()> {
        self.post(InputEvent::MouseMove { to })
    }

    fn press_mouse(&self, buttons: MouseButtons) -> InputResult<()> {
        self.post(InputEvent::MousePress { buttons })
    }

    fn release_mouse(&self, buttons: MouseButtons) -> InputResult<()> {
        self.post(InputEvent::MouseRelease { buttons })
    }

    fn rotate_wheel(&self, amount: i32) -> InputResult<()> {
        self.post(InputEvent::MouseWheel { amount })
    }

    fn press_key(&self, key: KeyCode) -> InputResult<()> {
        self.post(InputEvent::KeyPress { key })
    }

    fn release_key(&self, key: KeyCode) -> InputResult<()> {
        self.post(InputEvent::KeyRelease { key })
    }
}

/// Records every call instead of delivering it. Clones share one log.
#[derive(Clone, Debug, Default)]
pub struct RecordingDevice {
    events: Arc<Mutex<Vec<InputEvent>>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Key presses and releases only, as `(pressed, key)` pairs.
    pub fn key_events(&self) -> Vec<(bool, KeyCode)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                InputEvent::KeyPress { key } => Some((true, key)),
                InputEvent::KeyRelease { key } => Some((false, key)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, event: InputEvent) -> InputResult<()> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

impl InputDevice for RecordingDevice {
    fn move_mouse(&self, to: Point) -> InputResult<()> {
        self.record(InputEvent::MouseMove { to })
    }

    fn press_mouse(&self, buttons: MouseButtons) -> InputResult<()> {
        self.record(InputEvent::MousePress { buttons })
    }

    fn release_mouse(&self, buttons: MouseButtons) -> InputResult<()> {
        self.record(InputEvent::MouseRelease { buttons })
    }

    fn rotate_wheel(&self, amount: i32) -> InputResult<()> {
        self.record(InputEvent::MouseWheel { amount })
    }

    fn press_key(&self, key: KeyCode) -> InputResult<()> {
        self.record(InputEvent::KeyPress { key })
    }

    fn release_key(&self, key: KeyCode) -> InputResult<()> {
        self.record(InputEvent::KeyRelease { key })
    }
}
