//! UI-thread context: the tree, the event queue, listeners and input state.

use crate::component::ComponentId;
use crate::event::{
    ComponentEvent, ComponentEventKind, EventListener, HandlerId, InputEvent, ListenerId, UiEvent,
};
use crate::event_loop::{panic_message, EventLoopHandle, UiMessage};
use crate::geometry::Point;
use crate::keys::{Modifiers, MouseButtons};
use crate::routing::InputState;
use crate::tree::{ComponentTree, TreeError};
use rustc_hash::FxHashMap;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

pub(crate) enum QueuedEvent {
    Task(Box<dyn FnOnce(&Ui) + 'static>),
    Input(InputEvent),
}

type Handler = Rc<dyn Fn(&Ui, &ComponentEvent)>;

/// Everything the UI thread owns.
///
/// A `Ui` never leaves its thread. Code running on other threads reaches it
/// through [`EventLoopHandle::post`] or an action dispatcher built on top of it.
pub struct Ui {
    tree: RefCell<ComponentTree>,
    queue: RefCell<VecDeque<QueuedEvent>>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn EventListener>)>>,
    handlers: RefCell<FxHashMap<ComponentId, Vec<(HandlerId, Handler)>>>,
    pub(crate) input: RefCell<InputState>,
    next_id: Cell<u64>,
    dispatched: Cell<u64>,
    handle: EventLoopHandle,
}

impl Ui {
    pub(crate) fn new(handle: EventLoopHandle) -> Self {
        Self {
            tree: RefCell::new(ComponentTree::new()),
            queue: RefCell::new(VecDeque::new()),
            listeners: RefCell::new(Vec::new()),
            handlers: RefCell::new(FxHashMap::default()),
            input: RefCell::new(InputState::default()),
            next_id: Cell::new(1),
            dispatched: Cell::new(0),
            handle,
        }
    }

    pub fn handle(&self) -> &EventLoopHandle {
        &self.handle
    }

    pub fn tree(&self) -> Ref<'_, ComponentTree> {
        self.tree.borrow()
    }

    /// Mutable access to the tree. Keep the borrow short: handlers invoked
    /// while it is held cannot read the tree.
    pub fn tree_mut(&self) -> RefMut<'_, ComponentTree> {
        self.tree.borrow_mut()
    }

    /// Removes a component subtree together with its handlers and focus.
    pub fn remove_component(&self, id: ComponentId) -> Result<(), TreeError> {
        let removed: Vec<ComponentId> = self.tree().descendants(id).collect();
        self.tree_mut().remove(id)?;
        let mut handlers = self.handlers.borrow_mut();
        for gone in &removed {
            handlers.remove(gone);
        }
        drop(handlers);
        self.input.borrow_mut().forget(&removed);
        Ok(())
    }

    /// Appends a task to the back of this thread's queue.
    pub fn post(&self, task: impl FnOnce(&Ui) + 'static) {
        self.queue
            .borrow_mut()
            .push_back(QueuedEvent::Task(Box::new(task)));
    }

    /// Events waiting to be dispatched, including ones still in transit from
    /// other threads.
    pub fn pending_events(&self) -> usize {
        self.queue.borrow().len() + self.handle.pending()
    }

    /// Total events dispatched since the loop started.
    pub fn dispatched_events(&self) -> u64 {
        self.dispatched.get()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Registers an observer for every event dispatched after the current one.
    pub fn add_event_listener(&self, listener: impl EventListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|(existing, _)| *existing == id)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Attaches a handler that receives events routed to `target`.
    pub fn add_handler(
        &self,
        target: ComponentId,
        handler: impl Fn(&Ui, &ComponentEvent) + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_id());
        self.handlers
            .borrow_mut()
            .entry(target)
            .or_default()
            .push((id, Rc::new(handler)));
        id
    }

    pub fn remove_handler(&self, target: ComponentId, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let Some(list) = handlers.get_mut(&target) else {
            return false;
        };
        let before = list.len();
        list.retain(|(existing, _)| *existing != id);
        list.len() != before
    }

    /// Invokes the handlers of `target` with no borrows held.
    pub fn deliver(&self, target: ComponentId, kind: ComponentEventKind) {
        let handlers: Vec<Handler> = self
            .handlers
            .borrow()
            .get(&target)
            .map(|list| list.iter().map(|(_, handler)| handler.clone()).collect())
            .unwrap_or_default();
        let event = ComponentEvent { target, kind };
        for handler in handlers {
            handler(self, &event);
        }
    }

    pub fn focus_owner(&self) -> Option<ComponentId> {
        self.input.borrow().focus_owner
    }

    /// Moves focus to `target` if it is focusable, enabled and showing.
    pub fn request_focus(&self, target: ComponentId) -> bool {
        let accepts = {
            let tree = self.tree();
            tree.get(target)
                .is_some_and(|c| c.focusable && c.enabled)
                && tree.is_showing(target)
        };
        if !accepts {
            return false;
        }
        let previous = self.input.borrow_mut().focus_owner.replace(target);
        if previous != Some(target) {
            if let Some(previous) = previous {
                self.deliver(previous, ComponentEventKind::FocusLost);
            }
            self.deliver(target, ComponentEventKind::FocusGained);
        }
        true
    }

    pub fn mouse_position(&self) -> Point {
        self.input.borrow().position
    }

    pub fn pressed_buttons(&self) -> MouseButtons {
        self.input.borrow().buttons
    }

    pub fn modifiers(&self) -> Modifiers {
        self.input.borrow().modifiers
    }

    /// Moves a message from the channel into the queue. Returns false on shutdown.
    pub(crate) fn accept(&self, message: UiMessage) -> bool {
        self.handle.message_accepted();
        let event = match message {
            UiMessage::Task(task) => QueuedEvent::Task(task),
            UiMessage::Input(input) => QueuedEvent::Input(input),
            UiMessage::Shutdown => return false,
        };
        self.queue.borrow_mut().push_back(event);
        true
    }

    pub(crate) fn pop_event(&self) -> Option<QueuedEvent> {
        self.queue.borrow_mut().pop_front()
    }

    pub(crate) fn dispatch(&self, event: QueuedEvent) {
        // Listeners added while this event runs only see later events.
        let listeners: Vec<(ListenerId, Rc<dyn EventListener>)> = self.listeners.borrow().clone();

        let seen = match event {
            QueuedEvent::Task(task) => {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(|| task(self))) {
                    log::error!(
                        "task panicked on UI thread '{}': {}",
                        self.handle.name(),
                        panic_message(payload.as_ref())
                    );
                }
                UiEvent::Task
            }
            QueuedEvent::Input(input) => {
                if let Err(payload) =
                    catch_unwind(AssertUnwindSafe(|| crate::routing::route(self, input)))
                {
                    log::error!(
                        "input handler panicked on UI thread '{}': {}",
                        self.handle.name(),
                        panic_message(payload.as_ref())
                    );
                }
                UiEvent::Input(input)
            }
        };

        self.dispatched.set(self.dispatched.get() + 1);
        for (id, listener) in listeners {
            // Removed while this event ran.
            if self.is_listening(id) {
                listener.event_dispatched(&seen);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/ui_tests.rs"]
mod tests;
