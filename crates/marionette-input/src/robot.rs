//! Synthesized mouse and keyboard input.
//!
//! A [`Robot`] plays the part of a user at the keyboard. Its primitives post
//! raw events through an [`InputDevice`] from the calling thread, pausing
//! after each one as configured in [`Settings`]. Reading UI state to aim a
//! click goes through the [`ActionDispatcher`].

use crate::device::{EventQueueDevice, InputDevice, InputError};
use crate::idle;
use marionette_core::pause::{self, DEFAULT_POLL_INTERVAL};
use marionette_core::{
    try_condition, validation, ActionDispatcher, ActionFailedError, Condition, LockOwner,
    RobotError, RobotResult, ScreenLock, Settings,
};
use marionette_toolkit::{ComponentId, KeyCode, Modifiers, MouseButton, MouseButtons, Point};
use std::sync::Arc;
use std::time::Duration;

fn device_failed(err: InputError) -> RobotError {
    RobotError::unexpected(err)
}

pub struct Robot {
    dispatcher: ActionDispatcher,
    device: Box<dyn InputDevice>,
    settings: Arc<Settings>,
    screen_lock: Option<(Arc<ScreenLock>, LockOwner)>,
}

impl Robot {
    pub fn new(
        dispatcher: ActionDispatcher,
        device: impl InputDevice + 'static,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            dispatcher,
            device: Box::new(device),
            settings,
            screen_lock: None,
        }
    }

    /// A robot whose input goes straight into the dispatcher's event loop.
    pub fn with_event_queue(dispatcher: ActionDispatcher, settings: Arc<Settings>) -> Self {
        let device = EventQueueDevice::new(dispatcher.handle().clone());
        Self::new(dispatcher, device, settings)
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn after_mouse_event(&self) {
        pause_if_needed(self.settings.event_posting_delay());
    }

    fn after_key_event(&self) {
        pause_if_needed(self.settings.key_input_delay());
    }

    pub fn move_mouse(&self, point: Point) -> RobotResult<()> {
        self.device.move_mouse(point).map_err(device_failed)?;
        self.after_mouse_event();
        Ok(())
    }

    /// Moves the pointer to `point` relative to `component`, or to its center.
    pub fn move_mouse_to(&self, component: ComponentId, point: Option<Point>) -> RobotResult<()> {
        let target = self.screen_point(component, point)?;
        self.move_mouse(target)
    }

    pub fn press_mouse(&self, buttons: impl Into<MouseButtons>) -> RobotResult<()> {
        self.device
            .press_mouse(buttons.into())
            .map_err(device_failed)?;
        self.after_mouse_event();
        Ok(())
    }

    pub fn release_mouse(&self, buttons: impl Into<MouseButtons>) -> RobotResult<()> {
        self.device
            .release_mouse(buttons.into())
            .map_err(device_failed)?;
        self.after_mouse_event();
        Ok(())
    }

    pub fn rotate_wheel(&self, amount: i32) -> RobotResult<()> {
        self.device.rotate_wheel(amount).map_err(device_failed)?;
        self.after_mouse_event();
        Ok(())
    }

    /// Clicks `component` `times` times, then waits for the UI to go idle.
    ///
    /// `point` is relative to the component; without one the click lands on
    /// its center. The component must be showing.
    pub fn click(
        &self,
        component: ComponentId,
        point: Option<Point>,
        button: MouseButton,
        times: u32,
    ) -> RobotResult<()> {
        if times == 0 {
            return Err(ActionFailedError::new("number of clicks must be at least 1").into());
        }
        let target = self.screen_point(component, point)?;
        self.click_at(target, button, times)
    }

    /// Clicks at a screen position, then waits for the UI to go idle.
    pub fn click_at(&self, point: Point, button: MouseButton, times: u32) -> RobotResult<()> {
        if times == 0 {
            return Err(ActionFailedError::new("number of clicks must be at least 1").into());
        }
        self.move_mouse(point)?;
        for _ in 0..times {
            self.press_mouse(button)?;
            self.release_mouse(button)?;
        }
        self.wait_for_idle()
    }

    fn screen_point(&self, component: ComponentId, point: Option<Point>) -> RobotResult<Point> {
        self.dispatcher.run_query(move |ui| {
            let tree = ui.tree();
            validation::ensure_showing(&tree, component)?;
            let bounds = tree.screen_bounds(component).ok_or_else(|| {
                ActionFailedError::new(format!("component {component} has no bounds"))
            })?;
            Ok(match point {
                Some(offset) => bounds.origin() + offset,
                None => bounds.center(),
            })
        })
    }

    pub fn press_key(&self, key: KeyCode) -> RobotResult<()> {
        self.device.press_key(key).map_err(device_failed)?;
        self.after_key_event();
        Ok(())
    }

    pub fn release_key(&self, key: KeyCode) -> RobotResult<()> {
        self.device.release_key(key).map_err(device_failed)?;
        self.after_key_event();
        Ok(())
    }

    /// Presses the modifier keys in canonical order: Shift, Control, Alt,
    /// AltGraph, Meta.
    pub fn press_modifiers(&self, modifiers: Modifiers) -> RobotResult<()> {
        modifiers.keys().try_for_each(|key| self.press_key(key))
    }

    /// Releases the modifier keys in reverse canonical order.
    pub fn release_modifiers(&self, modifiers: Modifiers) -> RobotResult<()> {
        modifiers
            .keys()
            .rev()
            .try_for_each(|key| self.release_key(key))
    }

    /// Types `key` while holding `modifiers`, then waits for the UI to go idle.
    pub fn press_and_release_key(&self, key: KeyCode, modifiers: Modifiers) -> RobotResult<()> {
        self.press_modifiers(modifiers)?;
        self.press_key(key)?;
        self.release_key(key)?;
        self.release_modifiers(modifiers)?;
        self.wait_for_idle()
    }

    /// Presses every key in order, then releases them in the same order.
    pub fn press_and_release_keys(&self, keys: &[KeyCode]) -> RobotResult<()> {
        for key in keys {
            self.press_key(*key)?;
        }
        for key in keys {
            self.release_key(*key)?;
        }
        self.wait_for_idle()
    }

    /// Gives `component` keyboard focus and waits until it has it.
    pub fn focus(&self, component: ComponentId) -> RobotResult<()> {
        let description = self.dispatcher.run_query(move |ui| {
            let tree = ui.tree();
            validation::ensure_showing(&tree, component)?;
            let description = tree
                .get(component)
                .map(ToString::to_string)
                .unwrap_or_else(|| component.to_string());
            drop(tree);
            ui.request_focus(component);
            Ok(description)
        })?;

        let dispatcher = &self.dispatcher;
        pause::wait_until(
            try_condition(format!("{description} to have focus"), || {
                dispatcher.query(move |ui| ui.focus_owner() == Some(component))
            }),
            self.settings.timeout_to_be_visible(),
            DEFAULT_POLL_INTERVAL,
        )
    }

    /// Polls `condition` with this robot's default timeout.
    pub fn wait_until(&self, condition: impl Condition) -> RobotResult<()> {
        pause::wait_until_default(condition, &self.settings)
    }

    /// Waits until the UI thread has nothing left to do.
    pub fn wait_for_idle(&self) -> RobotResult<()> {
        idle::wait_for_idle(&self.dispatcher, self.settings.idle_timeout())
    }

    /// Holds `lock` until [`clean_up`](Self::clean_up) or drop.
    pub fn lock_screen(&mut self, lock: Arc<ScreenLock>) {
        if self.screen_lock.is_some() {
            return;
        }
        let owner = LockOwner::unique("robot");
        lock.acquire(&owner);
        self.screen_lock = Some((lock, owner));
    }

    pub fn is_screen_locked(&self) -> bool {
        self.screen_lock
            .as_ref()
            .is_some_and(|(lock, owner)| lock.is_acquired_by(owner))
    }

    /// Releases held mouse buttons and modifier keys, then the screen lock.
    pub fn clean_up(&mut self) {
        match self
            .dispatcher
            .query(|ui| (ui.pressed_buttons(), ui.modifiers()))
        {
            Ok((buttons, modifiers)) => {
                if !buttons.is_empty() {
                    if let Err(err) = self.device.release_mouse(buttons) {
                        log::debug!("failed to release mouse buttons: {}", err);
                    }
                }
                for key in modifiers.keys().rev() {
                    if let Err(err) = self.device.release_key(key) {
                        log::debug!("failed to release {}: {}", key, err);
                    }
                }
            }
            Err(err) => log::debug!("skipping input release during clean up: {}", err),
        }

        if let Some((lock, owner)) = self.screen_lock.take() {
            if let Err(err) = lock.release(&owner) {
                log::warn!("failed to release screen lock: {}", err);
            }
        }
    }
}

impl Drop for Robot {
    fn drop(&mut self) {
        self.clean_up();
    }
}

impl std::fmt::Debug for Robot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Robot")
            .field("dispatcher", &self.dispatcher)
            .field("settings", &self.settings)
            .field("screen_locked", &self.screen_lock.is_some())
            .finish()
    }
}

fn pause_if_needed(delay: Duration) {
    if !delay.is_zero() {
        pause::wait_for(delay);
    }
}

#[cfg(test)]
#[path = "tests/robot_tests.rs"]
mod tests;
