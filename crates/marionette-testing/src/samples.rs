//! Small component trees for driving the robot in tests.
//!
//! Every builder runs on the UI thread, usually through
//! [`RobotFixture::build`](crate::RobotFixture::build).

use marionette_toolkit::{
    Component, ComponentEventKind, ComponentId, ComponentKind, Rect, TreeError, Ui,
};
use std::sync::{Arc, Mutex, PoisonError};

/// A frame at (100, 100) holding one button named `ok`.
#[derive(Clone, Copy, Debug)]
pub struct OkWindow {
    pub window: ComponentId,
    pub button: ComponentId,
}

pub fn ok_window(ui: &Ui) -> Result<OkWindow, TreeError> {
    let mut tree = ui.tree_mut();
    let window = tree.add_root(
        Component::new(ComponentKind::Frame)
            .with_name("main")
            .with_bounds(Rect::new(100.0, 100.0, 320.0, 240.0)),
    )?;
    let button = tree.add_child(
        window,
        Component::new(ComponentKind::Button)
            .with_name("ok")
            .with_text("OK")
            .with_bounds(Rect::new(20.0, 20.0, 80.0, 24.0)),
    )?;
    Ok(OkWindow { window, button })
}

/// A frame holding two unnamed text fields, one above the other.
#[derive(Clone, Copy, Debug)]
pub struct FieldsWindow {
    pub window: ComponentId,
    pub first: ComponentId,
    pub second: ComponentId,
}

pub fn two_text_fields(ui: &Ui) -> Result<FieldsWindow, TreeError> {
    let mut tree = ui.tree_mut();
    let window = tree.add_root(
        Component::new(ComponentKind::Frame).with_bounds(Rect::new(0.0, 0.0, 300.0, 120.0)),
    )?;
    let first = tree.add_child(
        window,
        Component::new(ComponentKind::TextField).with_bounds(Rect::new(10.0, 10.0, 200.0, 24.0)),
    )?;
    let second = tree.add_child(
        window,
        Component::new(ComponentKind::TextField).with_bounds(Rect::new(10.0, 50.0, 200.0, 24.0)),
    )?;
    Ok(FieldsWindow {
        window,
        first,
        second,
    })
}

/// Relayout steps in the order they ran.
pub type RelayoutLog = Arc<Mutex<Vec<usize>>>;

/// Makes every click on `target` start a chain of `steps` relayouts.
///
/// Each step widens `target` by one pixel, records itself in `log` and posts
/// the next step, so the chain only drains one event at a time.
pub fn relayout_on_click(ui: &Ui, target: ComponentId, steps: usize, log: RelayoutLog) {
    ui.add_handler(target, move |ui, event| {
        if matches!(event.kind, ComponentEventKind::MouseClicked { .. }) {
            relayout_step(ui, target, 1, steps, log.clone());
        }
    });
}

fn relayout_step(ui: &Ui, target: ComponentId, step: usize, steps: usize, log: RelayoutLog) {
    if step > steps {
        return;
    }
    ui.post(move |ui| {
        if let Err(err) = ui
            .tree_mut()
            .update(target, |component| component.bounds.width += 1.0)
        {
            log::warn!("relayout step {} skipped: {}", step, err);
        }
        log.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(step);
        relayout_step(ui, target, step + 1, steps, log);
    });
}
