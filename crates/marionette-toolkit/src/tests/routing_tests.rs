use super::*;
use crate::component::{Component, ComponentKind};
use crate::event_loop::{EventLoop, EventLoopHandle};
use crate::geometry::Rect;
use std::sync::{mpsc, Arc, Mutex};

type Log = Arc<Mutex<Vec<(ComponentId, ComponentEventKind)>>>;

fn on_ui<R: Send + 'static>(
    handle: &EventLoopHandle,
    f: impl FnOnce(&Ui) -> R + Send + 'static,
) -> R {
    let (tx, rx) = mpsc::channel();
    handle
        .post(move |ui| {
            let _ = tx.send(f(ui));
        })
        .expect("post");
    rx.recv_timeout(Duration::from_secs(5)).expect("reply")
}

/// Frame at (0, 0) with a button at (10, 10, 100, 30) and a text field at
/// (10, 60, 100, 30). Every event routed to either is logged.
fn setup(handle: &EventLoopHandle, log: &Log) -> (ComponentId, ComponentId) {
    let log = log.clone();
    on_ui(handle, move |ui| {
        let (button, field) = {
            let mut tree = ui.tree_mut();
            let frame = tree
                .add_root(
                    Component::new(ComponentKind::Frame)
                        .with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
                )
                .expect("frame");
            let button = tree
                .add_child(
                    frame,
                    Component::new(ComponentKind::Button)
                        .with_bounds(Rect::new(10.0, 10.0, 100.0, 30.0)),
                )
                .expect("button");
            let field = tree
                .add_child(
                    frame,
                    Component::new(ComponentKind::TextField)
                        .with_bounds(Rect::new(10.0, 60.0, 100.0, 30.0)),
                )
                .expect("field");
            (button, field)
        };
        for id in [button, field] {
            let log = log.clone();
            ui.add_handler(id, move |_, event| {
                log.lock().unwrap().push((event.target, event.kind))
            });
        }
        (button, field)
    })
}

fn send(handle: &EventLoopHandle, events: &[InputEvent]) {
    for event in events {
        handle.post_input(*event).expect("input");
    }
    on_ui(handle, |_| ());
}

fn clicks(log: &Log) -> Vec<(ComponentId, u32)> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|(target, kind)| match kind {
            ComponentEventKind::MouseClicked { click_count, .. } => Some((*target, *click_count)),
            _ => None,
        })
        .collect()
}

fn left() -> MouseButtons {
    MouseButton::Left.into()
}

#[test]
fn press_and_release_on_the_same_component_clicks_and_focuses() {
    let event_loop = EventLoop::spawn("route-click").expect("spawn");
    let handle = event_loop.handle();
    let log = Log::default();
    let (button, _) = setup(&handle, &log);

    send(
        &handle,
        &[
            InputEvent::MouseMove {
                to: Point::new(50.0, 20.0),
            },
            InputEvent::MousePress { buttons: left() },
            InputEvent::MouseRelease { buttons: left() },
        ],
    );

    let kinds: Vec<_> = log.lock().unwrap().iter().map(|(_, kind)| *kind).collect();
    assert_eq!(kinds.len(), 4);
    assert_eq!(kinds[0], ComponentEventKind::FocusGained);
    assert!(matches!(kinds[1], ComponentEventKind::MousePressed { .. }));
    assert!(matches!(kinds[2], ComponentEventKind::MouseReleased { .. }));
    assert_eq!(clicks(&log), vec![(button, 1)]);
    assert_eq!(on_ui(&handle, |ui| ui.focus_owner()), Some(button));
    assert!(on_ui(&handle, |ui| ui.pressed_buttons().is_empty()));
}

#[test]
fn quick_second_click_counts_as_double_click() {
    let event_loop = EventLoop::spawn("route-double").expect("spawn");
    let handle = event_loop.handle();
    let log = Log::default();
    let (button, _) = setup(&handle, &log);

    send(
        &handle,
        &[
            InputEvent::MouseMove {
                to: Point::new(50.0, 20.0),
            },
            InputEvent::MousePress { buttons: left() },
            InputEvent::MouseRelease { buttons: left() },
            InputEvent::MousePress { buttons: left() },
            InputEvent::MouseRelease { buttons: left() },
        ],
    );

    assert_eq!(clicks(&log), vec![(button, 1), (button, 2)]);
}

#[test]
fn releasing_elsewhere_does_not_click() {
    let event_loop = EventLoop::spawn("route-drag").expect("spawn");
    let handle = event_loop.handle();
    let log = Log::default();
    let (button, _) = setup(&handle, &log);

    send(
        &handle,
        &[
            InputEvent::MouseMove {
                to: Point::new(50.0, 20.0),
            },
            InputEvent::MousePress { buttons: left() },
            InputEvent::MouseMove {
                to: Point::new(50.0, 70.0),
            },
            InputEvent::MouseRelease { buttons: left() },
        ],
    );

    assert!(clicks(&log).is_empty());
    let released_on: Vec<_> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, kind)| matches!(kind, ComponentEventKind::MouseReleased { .. }))
        .map(|(target, _)| *target)
        .collect();
    assert_eq!(released_on, vec![button]);
}

#[test]
fn disabled_components_receive_no_mouse_events() {
    let event_loop = EventLoop::spawn("route-disabled").expect("spawn");
    let handle = event_loop.handle();
    let log = Log::default();
    let (button, _) = setup(&handle, &log);
    on_ui(&handle, move |ui| {
        ui.tree_mut()
            .update(button, |c| c.enabled = false)
            .expect("disable");
    });

    send(
        &handle,
        &[
            InputEvent::MouseMove {
                to: Point::new(50.0, 20.0),
            },
            InputEvent::MousePress { buttons: left() },
            InputEvent::MouseRelease { buttons: left() },
            InputEvent::MouseWheel { amount: 2 },
        ],
    );

    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn keys_go_to_the_focus_owner_with_current_modifiers() {
    let event_loop = EventLoop::spawn("route-keys").expect("spawn");
    let handle = event_loop.handle();
    let log = Log::default();
    let (_, field) = setup(&handle, &log);
    on_ui(&handle, move |ui| assert!(ui.request_focus(field)));
    log.lock().unwrap().clear();

    send(
        &handle,
        &[
            InputEvent::KeyPress {
                key: KeyCode::SHIFT,
            },
            InputEvent::KeyPress { key: KeyCode::A },
            InputEvent::KeyRelease { key: KeyCode::A },
            InputEvent::KeyRelease {
                key: KeyCode::SHIFT,
            },
        ],
    );

    let recorded = log.lock().unwrap().clone();
    assert!(recorded.iter().all(|(target, _)| *target == field));
    assert_eq!(
        recorded.iter().map(|(_, kind)| *kind).collect::<Vec<_>>(),
        vec![
            ComponentEventKind::KeyPressed {
                key: KeyCode::SHIFT,
                modifiers: Modifiers::SHIFT,
            },
            ComponentEventKind::KeyPressed {
                key: KeyCode::A,
                modifiers: Modifiers::SHIFT,
            },
            ComponentEventKind::KeyReleased {
                key: KeyCode::A,
                modifiers: Modifiers::SHIFT,
            },
            ComponentEventKind::KeyReleased {
                key: KeyCode::SHIFT,
                modifiers: Modifiers::NONE,
            },
        ]
    );
    assert_eq!(on_ui(&handle, |ui| ui.modifiers()), Modifiers::NONE);
}

#[test]
fn forgetting_components_clears_state() {
    let mut state = InputState::default();
    let id = ComponentId(7);
    state.focus_owner = Some(id);
    state.press_targets[0] = Some(id);
    state.click_count(id, MouseButton::Left, Instant::now());

    state.forget(&[id]);

    assert_eq!(state.focus_owner, None);
    assert_eq!(state.press_targets, [None; 3]);
    assert!(state.last_click.is_none());
}
