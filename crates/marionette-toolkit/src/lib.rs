//! Headless UI toolkit for Marionette
//!
//! This crate provides the live application that Marionette automates: a
//! dedicated UI thread with a FIFO event queue, a component tree with
//! geometry, visibility and focus, raw input routing and event listeners.
//! Nothing is rendered.

mod component;
mod event;
mod event_loop;
mod geometry;
mod keys;
mod routing;
mod tree;
mod ui;

pub use component::*;
pub use event::*;
pub use event_loop::{panic_message, with_current_ui, EventLoop, EventLoopHandle, LoopClosed};
pub use geometry::*;
pub use keys::*;
pub use routing::MULTI_CLICK_INTERVAL;
pub use tree::*;
pub use ui::Ui;

pub mod prelude {
    pub use crate::component::{Component, ComponentId, ComponentKind};
    pub use crate::event::{ComponentEventKind, InputEvent, UiEvent};
    pub use crate::event_loop::{EventLoop, EventLoopHandle};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::keys::{KeyCode, Modifiers, MouseButton, MouseButtons};
    pub use crate::ui::Ui;
}
