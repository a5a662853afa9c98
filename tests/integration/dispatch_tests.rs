use crate::common::{ConsoleMock, SaveError};
use mock_override::{ContractViolation, DispatchError, Mock};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn test_no_override_runs_default_once() {
    let mock = ConsoleMock::new();

    assert_eq!(mock.greet(), "Howdy!");
    assert_eq!(mock.find(3), Some("row-3".to_string()));
    mock.show(1);

    assert_eq!(mock.defaults.get(), 3);
    assert_eq!(*mock.shown.borrow(), vec![1]);
}

#[test]
fn test_set_behavior_replaces_greeting() {
    let mock = ConsoleMock::new();
    mock.set_behavior(ConsoleMock::greet_key(), || "Hey!".to_string())
        .unwrap();

    assert_eq!(mock.greet(), "Hey!");
    assert_eq!(mock.greet(), "Hey!");
    assert_eq!(mock.defaults.get(), 0);
}

#[test]
fn test_set_behavior_can_return_none() {
    let mock = ConsoleMock::new();
    mock.set_behavior(ConsoleMock::find_key(), |_: &u32| None::<String>)
        .unwrap();

    assert_eq!(mock.find(1), None);
    assert_eq!(mock.defaults.get(), 0);
}

#[test]
fn test_add_behavior_runs_on_every_call() {
    let mock = ConsoleMock::new();
    let counter = Rc::new(Cell::new(0));
    let count = counter.clone();
    mock.add_behavior(ConsoleMock::show_key(), move |_: &u32| {
        count.set(count.get() + 1)
    })
    .unwrap();

    for _ in 0..3 {
        mock.show(1);
    }

    assert_eq!(counter.get(), 3);
    assert_eq!(*mock.shown.borrow(), vec![1, 1, 1]);
}

#[test]
fn test_add_behavior_run_once() {
    let mock = ConsoleMock::new();
    let counter = Rc::new(Cell::new(0));
    let count = counter.clone();
    mock.add_behavior(ConsoleMock::show_key(), move |_: &u32| {
        count.set(count.get() + 1)
    })
    .unwrap()
    .with_options(|o| o.run_once = true);

    for _ in 0..3 {
        mock.show(1);
    }

    assert_eq!(counter.get(), 1);
    assert_eq!(mock.defaults.get(), 3);
    assert!(!mock.behaviors().is_overridden(&ConsoleMock::show_key()));
}

#[test]
fn test_set_behavior_run_once_restores_default() {
    let mock = ConsoleMock::new();
    mock.set_behavior(ConsoleMock::greet_key(), || "Hey!".to_string())
        .unwrap()
        .run_once();

    assert_eq!(mock.greet(), "Hey!");
    assert_eq!(mock.greet(), "Howdy!");
    assert_eq!(mock.defaults.get(), 1);
}

#[test]
fn test_addition_runs_before_replacement() {
    let mock = ConsoleMock::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    let added = order.clone();
    mock.add_behavior(ConsoleMock::greet_key(), move || added.borrow_mut().push("add"))
        .unwrap();
    let replaced = order.clone();
    mock.set_behavior(ConsoleMock::greet_key(), move || {
        replaced.borrow_mut().push("set");
        "x".to_string()
    })
    .unwrap();

    assert_eq!(mock.greet(), "x");
    assert_eq!(*order.borrow(), vec!["add", "set"]);
    assert_eq!(mock.defaults.get(), 0);
}

#[test]
fn test_run_after_addition_follows_replacement() {
    let mock = ConsoleMock::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    let added = order.clone();
    mock.add_behavior(ConsoleMock::greet_key(), move || added.borrow_mut().push("add"))
        .unwrap()
        .run_after();
    let replaced = order.clone();
    mock.set_behavior(ConsoleMock::greet_key(), move || {
        replaced.borrow_mut().push("set");
        "x".to_string()
    })
    .unwrap();

    assert_eq!(mock.greet(), "x");
    assert_eq!(*order.borrow(), vec!["set", "add"]);
}

#[test]
fn test_second_registration_overwrites_first() {
    let mock = ConsoleMock::new();
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    let count = first.clone();
    mock.add_behavior(ConsoleMock::show_key(), move |_: &u32| {
        count.set(count.get() + 1)
    })
    .unwrap();
    let count = second.clone();
    mock.add_behavior(ConsoleMock::show_key(), move |_: &u32| {
        count.set(count.get() + 1)
    })
    .unwrap();

    mock.set_behavior(ConsoleMock::greet_key(), || "first".to_string())
        .unwrap();
    mock.set_behavior(ConsoleMock::greet_key(), || "second".to_string())
        .unwrap();

    mock.show(5);
    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
    assert_eq!(mock.greet(), "second");
}

#[test]
fn test_overloads_are_configured_separately() {
    let mock = ConsoleMock::new();
    let labels = Rc::new(RefCell::new(Vec::new()));
    let seen = labels.clone();
    mock.add_behavior(
        ConsoleMock::show_labelled_key(),
        move |_: &u32, label: &String| seen.borrow_mut().push(label.clone()),
    )
    .unwrap();

    mock.show(1);
    mock.show_labelled(2, "two".to_string());

    assert_eq!(*labels.borrow(), vec!["two".to_string()]);
    assert_eq!(*mock.shown.borrow(), vec![1, 2]);
}

#[test]
fn test_behavior_may_omit_trailing_parameters() {
    let mock = ConsoleMock::new();
    let ids = Rc::new(RefCell::new(Vec::new()));
    let seen = ids.clone();
    mock.add_behavior(ConsoleMock::show_labelled_key(), move |id: &u32| {
        seen.borrow_mut().push(*id)
    })
    .unwrap();

    mock.show_labelled(7, "seven".to_string());
    assert_eq!(*ids.borrow(), vec![7]);
    assert_eq!(*mock.labels.borrow(), vec!["seven".to_string()]);
}

#[test]
#[should_panic(expected = "behavior declares 2 parameters but the member supplies 1")]
fn test_behavior_declaring_extra_parameters_panics() {
    let mock = ConsoleMock::new();
    mock.add_behavior(ConsoleMock::show_key(), |_: &u32, _: &String| {})
        .unwrap();

    mock.show(1);
}

#[test]
fn test_mismatch_message_locates_behavior() {
    let mock = ConsoleMock::new();
    let line = line!() + 1;
    mock.add_behavior(ConsoleMock::show_key(), |_: &String| {})
        .unwrap();

    let err = mock
        .try_run_custom_behavior_or(|| (), &ConsoleMock::show_key(), &mock_override::args![1u32])
        .unwrap_err();
    let message = err.to_string();

    assert!(message.contains("ConsoleMock::show"));
    assert!(message.contains(&format!("{}:{}", file!(), line)));
    assert!(message.contains("parameter 0 expects"));
}

#[test]
#[should_panic(expected = "parameter 0 expects")]
fn test_replacement_arguments_are_validated() {
    let mock = ConsoleMock::new();
    mock.set_behavior(ConsoleMock::find_key(), |_: &String| None::<String>)
        .unwrap();

    mock.find(1);
}

#[test]
fn test_run_once_replacement_retired_after_mismatch() {
    let mock = ConsoleMock::new();
    mock.set_behavior(ConsoleMock::find_key(), |_: &String| None::<String>)
        .unwrap()
        .run_once();

    let err = mock
        .try_run_custom_behavior_or(
            || Some("unused".to_string()),
            &ConsoleMock::find_key(),
            &mock_override::args![1u32],
        )
        .unwrap_err();
    match err {
        DispatchError::ArgumentMismatch(mismatch) => {
            assert!(matches!(
                mismatch.violation,
                ContractViolation::TypeMismatch { position: 0, .. }
            ));
            assert!(mismatch.defined_at.contains(file!()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!mock.behaviors().has_replacement(&ConsoleMock::find_key()));

    assert_eq!(mock.find(2), Some("row-2".to_string()));
    assert_eq!(mock.defaults.get(), 1);
}

#[test]
fn test_run_once_addition_retired_after_mismatch() {
    let mock = ConsoleMock::new();
    mock.add_behavior(ConsoleMock::show_key(), |_: &String| {})
        .unwrap()
        .run_once();

    let err = mock
        .try_run_custom_behavior_or(|| (), &ConsoleMock::show_key(), &mock_override::args![1u32])
        .unwrap_err();
    assert!(matches!(err, DispatchError::ArgumentMismatch(_)));
    assert!(!mock.behaviors().is_overridden(&ConsoleMock::show_key()));

    mock.show(3);
    assert_eq!(*mock.shown.borrow(), vec![3]);
}

#[test]
fn test_fallible_member_passes_error_through() {
    let mock = ConsoleMock::new();
    let after = Rc::new(Cell::new(0));
    let count = after.clone();
    mock.add_behavior(ConsoleMock::save_key(), move || count.set(count.get() + 1))
        .unwrap()
        .run_after();

    assert_eq!(
        mock.save(1, String::new()),
        Err(SaveError("empty body for 1".to_string()))
    );
    assert_eq!(after.get(), 0);

    assert_eq!(mock.save(1, "body".to_string()), Ok(()));
    assert_eq!(after.get(), 1);
}

#[test]
fn test_replacement_error_is_returned_unchanged() {
    let mock = ConsoleMock::new();
    mock.set_behavior(ConsoleMock::save_key(), |id: &u32, _: &String| {
        Err::<(), _>(SaveError(format!("quota exceeded for {id}")))
    })
    .unwrap();

    assert_eq!(
        mock.save(4, "body".to_string()),
        Err(SaveError("quota exceeded for 4".to_string()))
    );
    assert_eq!(mock.defaults.get(), 0);
}

#[test]
fn test_snapshot_lists_configuration() {
    let mock = ConsoleMock::new();
    mock.add_behavior(ConsoleMock::show_key(), |_: &u32| {})
        .unwrap()
        .run_once();
    mock.set_behavior(ConsoleMock::greet_key(), || String::new())
        .unwrap();

    let snapshot = mock.behaviors().snapshot();
    assert_eq!(snapshot.additions.len(), 1);
    assert_eq!(snapshot.replacements.len(), 1);
    assert!(snapshot.additions[0].run_once);
    assert_eq!(snapshot.additions[0].parameters, vec!["u32"]);
    assert!(snapshot.replacements[0].parameters.is_empty());

    let json = snapshot.to_json().unwrap();
    assert!(json.contains("ConsoleMock::greet"));
}
