//! Routes raw input events to the components they target.
//!
//! Mouse events go to the deepest visible, enabled component under the
//! pointer. A release is delivered to whichever component received the press,
//! and a click fires only when press and release land on the same component.
//! Key events go to the focus owner.

use crate::component::ComponentId;
use crate::event::{ComponentEventKind, InputEvent};
use crate::geometry::Point;
use crate::keys::{KeyCode, Modifiers, MouseButton, MouseButtons};
use crate::ui::Ui;
use std::time::Duration;
use web_time::Instant;

/// Two clicks on the same target within this interval count as a multi-click.
pub const MULTI_CLICK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug)]
struct LastClick {
    target: ComponentId,
    button: MouseButton,
    at: Instant,
    count: u32,
}

/// Pointer, button, modifier and focus state of the UI thread.
#[derive(Debug, Default)]
pub(crate) struct InputState {
    pub(crate) position: Point,
    pub(crate) buttons: MouseButtons,
    pub(crate) modifiers: Modifiers,
    pub(crate) focus_owner: Option<ComponentId>,
    press_targets: [Option<ComponentId>; 3],
    last_click: Option<LastClick>,
}

impl InputState {
    /// Drops every reference to components that left the tree.
    pub(crate) fn forget(&mut self, removed: &[ComponentId]) {
        if self.focus_owner.is_some_and(|id| removed.contains(&id)) {
            self.focus_owner = None;
        }
        for target in &mut self.press_targets {
            if target.is_some_and(|id| removed.contains(&id)) {
                *target = None;
            }
        }
        if self
            .last_click
            .is_some_and(|click| removed.contains(&click.target))
        {
            self.last_click = None;
        }
    }

    fn click_count(&mut self, target: ComponentId, button: MouseButton, now: Instant) -> u32 {
        let count = match self.last_click {
            Some(last)
                if last.target == target
                    && last.button == button
                    && now.duration_since(last.at) <= MULTI_CLICK_INTERVAL =>
            {
                last.count + 1
            }
            _ => 1,
        };
        self.last_click = Some(LastClick {
            target,
            button,
            at: now,
            count,
        });
        count
    }
}

fn enabled_target_at(ui: &Ui, point: Point) -> Option<ComponentId> {
    let tree = ui.tree();
    let hit = tree.hit_test(point)?;
    tree.get(hit).filter(|c| c.enabled).map(|_| hit)
}

pub(crate) fn route(ui: &Ui, event: InputEvent) {
    match event {
        InputEvent::MouseMove { to } => {
            ui.input.borrow_mut().position = to;
        }
        InputEvent::MousePress { buttons } => {
            for button in buttons.iter() {
                mouse_pressed(ui, button);
            }
        }
        InputEvent::MouseRelease { buttons } => {
            for button in buttons.iter() {
                mouse_released(ui, button);
            }
        }
        InputEvent::MouseWheel { amount } => {
            let (position, modifiers) = {
                let input = ui.input.borrow();
                (input.position, input.modifiers)
            };
            if let Some(target) = enabled_target_at(ui, position) {
                ui.deliver(target, ComponentEventKind::MouseWheel { amount, modifiers });
            }
        }
        InputEvent::KeyPress { key } => key_pressed(ui, key),
        InputEvent::KeyRelease { key } => key_released(ui, key),
    }
}

fn mouse_pressed(ui: &Ui, button: MouseButton) {
    let position = {
        let mut input = ui.input.borrow_mut();
        if input.buttons.contains(button) {
            return;
        }
        input.buttons.insert(button);
        input.position
    };

    let target = enabled_target_at(ui, position);
    ui.input.borrow_mut().press_targets[button as usize] = target;
    let Some(target) = target else {
        return;
    };

    ui.request_focus(target);
    let modifiers = ui.modifiers();
    ui.deliver(
        target,
        ComponentEventKind::MousePressed {
            button,
            position,
            modifiers,
        },
    );
}

fn mouse_released(ui: &Ui, button: MouseButton) {
    let (position, modifiers, pressed_on) = {
        let mut input = ui.input.borrow_mut();
        if !input.buttons.contains(button) {
            return;
        }
        input.buttons.remove(button);
        let pressed_on = input.press_targets[button as usize].take();
        (input.position, input.modifiers, pressed_on)
    };

    let Some(pressed_on) = pressed_on else {
        return;
    };
    ui.deliver(
        pressed_on,
        ComponentEventKind::MouseReleased {
            button,
            position,
            modifiers,
        },
    );

    if enabled_target_at(ui, position) != Some(pressed_on) {
        return;
    }
    let click_count = ui
        .input
        .borrow_mut()
        .click_count(pressed_on, button, Instant::now());
    ui.deliver(
        pressed_on,
        ComponentEventKind::MouseClicked {
            button,
            position,
            click_count,
            modifiers,
        },
    );
}

fn key_pressed(ui: &Ui, key: KeyCode) {
    let (modifiers, focus_owner) = {
        let mut input = ui.input.borrow_mut();
        if let Some(flag) = key.modifier() {
            input.modifiers.insert(flag);
        }
        (input.modifiers, input.focus_owner)
    };
    if let Some(target) = focus_owner {
        ui.deliver(target, ComponentEventKind::KeyPressed { key, modifiers });
    }
}

fn key_released(ui: &Ui, key: KeyCode) {
    let (modifiers, focus_owner) = {
        let mut input = ui.input.borrow_mut();
        if let Some(flag) = key.modifier() {
            input.modifiers.remove(flag);
        }
        (input.modifiers, input.focus_owner)
    };
    if let Some(target) = focus_owner {
        ui.deliver(target, ComponentEventKind::KeyReleased { key, modifiers });
    }
}

#[cfg(test)]
#[path = "tests/routing_tests.rs"]
mod tests;
