use crate::samples::{self, RelayoutLog};
use crate::RobotFixture;
use marionette_core::{
    ComponentLookupScope, LookupError, RobotError, ScreenLock,
};
use marionette_finder::MatchCriteria;
use marionette_input::unify;
use marionette_toolkit::{
    ComponentEventKind, ComponentKind, KeyCode, Modifiers, MouseButton,
};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

fn fixture(name: &str) -> RobotFixture {
    RobotFixture::new(name).expect("spawn fixture")
}

#[test]
fn finds_the_ok_button_by_name_and_kind() {
    let fx = fixture("scenario-find-ok");
    let sample = fx
        .build(|ui| Ok(samples::ok_window(ui)?))
        .expect("sample");

    let criteria = MatchCriteria::new()
        .named("ok")
        .of_kind(ComponentKind::Button);
    assert_eq!(
        fx.finder().find(&[sample.window], &criteria).expect("find"),
        sample.button
    );
}

#[test]
fn wrong_kind_reports_not_found_with_the_criteria() {
    let fx = fixture("scenario-not-found");
    let sample = fx
        .build(|ui| Ok(samples::ok_window(ui)?))
        .expect("sample");

    let criteria = MatchCriteria::new()
        .named("ok")
        .of_kind(ComponentKind::Label);
    let err = fx
        .finder()
        .find(&[sample.window], &criteria)
        .expect_err("no label named ok");

    let RobotError::ComponentLookup(lookup @ LookupError::NotFound { .. }) = &err else {
        panic!("expected not found, got {err:?}");
    };
    let message = lookup.to_string();
    assert!(message.contains("name='ok'"), "{message}");
    assert!(message.contains("type=Label"), "{message}");
}

#[test]
fn two_unnamed_fields_are_ambiguous() {
    let fx = fixture("scenario-ambiguous");
    let sample = fx
        .build(|ui| Ok(samples::two_text_fields(ui)?))
        .expect("sample");

    let err = fx
        .finder()
        .find(
            &[sample.window],
            &MatchCriteria::new().of_kind(ComponentKind::TextField),
        )
        .expect_err("two fields");

    let RobotError::ComponentLookup(LookupError::Ambiguous { count, .. }) = &err else {
        panic!("expected ambiguous, got {err:?}");
    };
    assert_eq!(*count, 2);
    assert!(err.to_string().contains('2'));
    assert_eq!(
        fx.finder()
            .find_all(
                &[sample.window],
                &MatchCriteria::new().of_kind(ComponentKind::TextField)
            )
            .expect("find all"),
        vec![sample.first, sample.second]
    );
}

#[test]
fn alt_and_shift_unify_to_exactly_those_modifiers() {
    let unified = unify(&[Modifiers::ALT, Modifiers::SHIFT]);
    assert!(unified.is_alt_down());
    assert!(unified.is_shift_down());
    assert!(!unified.is_ctrl_down());
    assert!(!unified.is_meta_down());
    assert!(!unified.is_alt_graph_down());
}

#[test]
fn checked_error_from_a_query_is_unexpected_with_its_cause() {
    let fx = fixture("scenario-checked-error");

    let err = fx
        .dispatcher()
        .run_query::<(), _>(|_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "clipboard is locked").into())
        })
        .expect_err("query fails");

    let RobotError::Unexpected { source } = &err else {
        panic!("expected unexpected, got {err:?}");
    };
    let cause = source.downcast_ref::<io::Error>().expect("io error cause");
    assert_eq!(cause.kind(), io::ErrorKind::PermissionDenied);
    assert_eq!(cause.to_string(), "clipboard is locked");
}

#[test]
fn wait_for_idle_after_a_click_drains_the_whole_relayout_chain() {
    let fx = fixture("scenario-relayout");
    let log = RelayoutLog::default();
    let chain = log.clone();
    let sample = fx
        .build(move |ui| {
            let sample = samples::ok_window(ui)?;
            samples::relayout_on_click(ui, sample.button, 2, chain);
            Ok(sample)
        })
        .expect("sample");

    fx.robot()
        .click(sample.button, None, MouseButton::Left, 1)
        .expect("click");

    assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    let width = fx
        .dispatcher()
        .query(move |ui| ui.tree().get(sample.button).map(|c| c.bounds.width))
        .expect("width");
    assert_eq!(width, Some(82.0));
}

#[test]
fn typing_into_a_focused_field_reaches_it_in_order() {
    let fx = fixture("scenario-typing");
    let typed = Arc::new(Mutex::new(Vec::new()));
    let recorder = typed.clone();
    let sample = fx
        .build(move |ui| {
            let sample = samples::two_text_fields(ui)?;
            ui.add_handler(sample.second, move |_, event| {
                if let ComponentEventKind::KeyPressed { key, modifiers } = event.kind {
                    recorder.lock().unwrap().push((key, modifiers));
                }
            });
            Ok(sample)
        })
        .expect("sample");

    fx.robot().focus(sample.second).expect("focus");
    fx.robot()
        .press_and_release_key(KeyCode::A, Modifiers::SHIFT)
        .expect("shift+a");
    fx.robot()
        .press_and_release_keys(&[KeyCode::X, KeyCode::Z])
        .expect("x z");

    assert_eq!(
        *typed.lock().unwrap(),
        vec![
            (KeyCode::SHIFT, Modifiers::SHIFT),
            (KeyCode::A, Modifiers::SHIFT),
            (KeyCode::X, Modifiers::NONE),
            (KeyCode::Z, Modifiers::NONE),
        ]
    );
}

#[test]
fn clicking_a_component_outside_the_given_root_still_works_under_default_scope() {
    let fx = fixture("scenario-retry");
    let clicked = Arc::new(AtomicBool::new(false));
    let flag = clicked.clone();
    let (sample, other) = fx
        .build(move |ui| {
            let sample = samples::ok_window(ui)?;
            let other = samples::two_text_fields(ui)?;
            ui.add_handler(sample.button, move |_, event| {
                if matches!(event.kind, ComponentEventKind::MouseClicked { .. }) {
                    flag.store(true, Ordering::SeqCst);
                }
            });
            Ok((sample, other))
        })
        .expect("samples");

    let button = fx
        .finder()
        .find_by_name(&[other.window], "ok")
        .expect("found by retry");
    assert_eq!(button, sample.button);
    fx.robot()
        .click(button, None, MouseButton::Left, 1)
        .expect("click");
    assert!(clicked.load(Ordering::SeqCst));

    fx.settings()
        .set_component_lookup_scope(ComponentLookupScope::All);
    assert!(fx.finder().find_by_name(&[other.window], "ok").is_err());
}

#[test]
fn robots_sharing_a_screen_lock_take_turns() {
    let lock = Arc::new(ScreenLock::new());
    let mut first = fixture("scenario-lock-a");
    first.robot_mut().lock_screen(lock.clone());
    assert!(first.robot().is_screen_locked());

    let (tx, rx) = mpsc::channel();
    let contender = lock.clone();
    let waiter = thread::spawn(move || {
        let mut second = RobotFixture::new("scenario-lock-b").expect("spawn fixture");
        second.robot_mut().lock_screen(contender);
        tx.send(second.robot().is_screen_locked()).expect("report");
    });

    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    first.robot_mut().clean_up();
    let second_locked = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("second robot");
    assert!(second_locked);
    waiter.join().expect("join");
    assert!(!lock.is_acquired());
}
