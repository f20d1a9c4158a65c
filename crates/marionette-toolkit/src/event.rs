use crate::component::ComponentId;
use crate::geometry::Point;
use crate::keys::{KeyCode, Modifiers, MouseButton, MouseButtons};

/// Raw input as produced by an input device, in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    MouseMove { to: Point },
    MousePress { buttons: MouseButtons },
    MouseRelease { buttons: MouseButtons },
    MouseWheel { amount: i32 },
    KeyPress { key: KeyCode },
    KeyRelease { key: KeyCode },
}

/// Input after routing to its target component.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentEvent {
    pub target: ComponentId,
    pub kind: ComponentEventKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ComponentEventKind {
    MousePressed {
        button: MouseButton,
        position: Point,
        modifiers: Modifiers,
    },
    MouseReleased {
        button: MouseButton,
        position: Point,
        modifiers: Modifiers,
    },
    MouseClicked {
        button: MouseButton,
        position: Point,
        click_count: u32,
        modifiers: Modifiers,
    },
    MouseWheel {
        amount: i32,
        modifiers: Modifiers,
    },
    KeyPressed {
        key: KeyCode,
        modifiers: Modifiers,
    },
    KeyReleased {
        key: KeyCode,
        modifiers: Modifiers,
    },
    FocusGained,
    FocusLost,
}

/// What the event loop just dispatched, as seen by [`EventListener`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UiEvent {
    /// A posted task ran.
    Task,
    /// A raw input event was routed.
    Input(InputEvent),
}

/// Observer notified after each event the UI thread dispatches.
///
/// Listeners are registered and invoked on the UI thread only.
pub trait EventListener {
    fn event_dispatched(&self, event: &UiEvent);
}

impl<F> EventListener for F
where
    F: Fn(&UiEvent),
{
    fn event_dispatched(&self, event: &UiEvent) {
        self(event)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(pub(crate) u64);
