#![allow(clippy::unwrap_used, reason = "tests")]

use pretty_assertions::assert_eq;
use ren::{Engine, EngineConfig};

use super::*;

fn engine() -> Engine {
    Engine::new(EngineConfig::default())
}

fn int(value: Option<AnyValue>) -> i64 {
    value.unwrap().cast::<Integer>().unwrap().value()
}

#[test]
fn zero_and_missing_indexes_are_errors() {
    let engine = engine();
    let mut list = WatchList::new();
    let zero = AnyValue::with_engine(0, &engine);
    assert!(matches!(list.dialect(&zero, true, None), Err(WatchError::ZeroIndex)));
    let three = AnyValue::with_engine(3, &engine);
    assert!(matches!(list.dialect(&three, true, None), Err(WatchError::NoSuchIndex(3))));
    let minus = AnyValue::with_engine(-1, &engine);
    assert!(matches!(list.dialect(&minus, true, None), Err(WatchError::NoSuchIndex(1))));
}

#[test]
fn other_types_are_rejected() {
    let engine = engine();
    let mut list = WatchList::new();
    let c = AnyValue::with_engine('c', &engine);
    let err = list.dialect(&c, true, None).unwrap_err();
    assert_eq!(err.to_string(), "unexpected char! passed to the watch dialect");
}

#[test]
fn logic_values_toggle_visibility() {
    let engine = engine();
    let mut list = WatchList::new();
    assert!(!list.is_visible());
    list.dialect(&AnyValue::with_engine(true, &engine), true, None).unwrap();
    assert!(list.is_visible());
    list.dialect(&AnyValue::with_engine(false, &engine), true, None).unwrap();
    assert!(!list.is_visible());
    assert!(list.is_empty());
}

#[test]
fn slots_are_one_based() {
    let list = WatchList::new();
    assert!(matches!(list.slot(0), Err(WatchError::NoSuchIndex(0))));
    assert!(matches!(list.slot(1), Err(WatchError::NoSuchIndex(1))));
    assert!(list.get(0).is_none());
}

#[cfg(feature = "rebol")]
mod rebol {
    use pretty_assertions::assert_eq;
    use ren::{AnyString, RenError};

    use super::*;

    fn load(source: &str, engine: &Engine) -> AnyValue {
        AnyValue::load_in(source, engine).unwrap()
    }

    #[test]
    fn visibility_words() {
        let engine = engine();
        let mut list = WatchList::new();
        for (word, shown) in [("on", true), ("off", false), ("yes", true), ("no", false), ("true", true)] {
            assert!(list.dialect(&load(word, &engine), true, None).unwrap().is_none());
            assert_eq!(list.is_visible(), shown, "{word}");
        }
        assert!(list.is_empty());
    }

    #[test]
    fn words_become_watchers() {
        let engine = engine();
        engine.eval(&["x: 10".into()]).unwrap();
        let mut list = WatchList::new();
        let first = list.dialect(&load("x", &engine), true, None).unwrap();
        assert_eq!(int(first), 10);
        assert_eq!(list.len(), 1);

        engine.eval(&["x: 11".into()]).unwrap();
        assert_eq!(int(list.dialect(&AnyValue::with_engine(1, &engine), true, None).unwrap()), 10);
        list.update_all();
        assert_eq!(int(list.dialect(&AnyValue::with_engine(1, &engine), true, None).unwrap()), 11);

        let removed = list.dialect(&AnyValue::with_engine(-1, &engine), true, None).unwrap();
        assert_eq!(int(removed), 11);
        assert!(list.is_empty());
    }

    #[test]
    fn groups_and_paths_are_watchable() {
        let engine = engine();
        engine.eval(&["obj: make object! [n: 2]".into()]).unwrap();
        let mut list = WatchList::new();
        assert_eq!(int(list.dialect(&load("obj/n", &engine), true, None).unwrap()), 2);
        assert_eq!(int(list.dialect(&load("(obj/n * 3)", &engine), true, None).unwrap()), 6);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn failing_watchers_are_kept_and_report_their_error() {
        let engine = engine();
        let mut list = WatchList::new();
        let err = list.dialect(&load("undefined-thing", &engine), true, None).unwrap_err();
        assert!(matches!(err, WatchError::Ren(RenError::Evaluation(_))));
        assert_eq!(list.len(), 1);

        let watcher = list.get(1).unwrap();
        assert!(watcher.value().is_none());
        let text = watcher.value_string().unwrap();
        assert!(text.starts_with("** Script error:"), "{text}");

        // Defining the word lets the next update succeed.
        engine.eval(&["undefined-thing: 5".into()]).unwrap();
        assert!(list.update(1).unwrap());
        assert!(list.get(1).unwrap().error().is_none());
        assert_eq!(list.get(1).unwrap().value_string().unwrap(), "5");
    }

    #[test]
    fn frozen_watchers_keep_their_value() {
        let engine = engine();
        engine.eval(&["x: 1".into()]).unwrap();
        let mut list = WatchList::new();
        let label = Tag::new_in("answer", &engine).unwrap();
        list.dialect(&load("x", &engine), true, Some(label)).unwrap();
        assert_eq!(list.get(1).unwrap().watch_string(), "answer");

        list.set_frozen(1, true).unwrap();
        engine.eval(&["x: 2".into()]).unwrap();
        list.update_all();
        assert_eq!(list.get(1).unwrap().value_string().unwrap(), "1");

        let tag = Tag::new_in("answer", &engine).unwrap();
        assert_eq!(int(list.dialect(&tag.into(), true, None).unwrap()), 1);

        list.set_frozen(1, false).unwrap();
        assert_eq!(list.get(1).unwrap().value_string().unwrap(), "2");
    }

    #[test]
    fn non_recalculating_watchers_evaluate_once() {
        let engine = engine();
        engine.eval(&["y: 1".into()]).unwrap();
        let mut list = WatchList::new();
        list.dialect(&load("y", &engine), false, None).unwrap();
        engine.eval(&["y: 2".into()]).unwrap();
        assert!(!list.update(1).unwrap());
        assert_eq!(list.get(1).unwrap().value_string().unwrap(), "1");

        list.set_recalculates(1, true).unwrap();
        assert_eq!(list.get(1).unwrap().value_string().unwrap(), "2");
    }

    #[test]
    fn labels_can_be_edited_and_cleared() {
        let engine = engine();
        let mut list = WatchList::new();
        list.dialect(&load("(1 + 1)", &engine), true, None).unwrap();
        assert_eq!(list.get(1).unwrap().watch_string(), "1 + 1");

        list.set_label(1, "two").unwrap();
        assert_eq!(list.get(1).unwrap().watch_string(), "two");
        assert!(list.find_label("two").is_some());

        list.set_label(1, "").unwrap();
        assert!(list.get(1).unwrap().label().is_none());
        let unknown = Tag::new_in("two", &engine).unwrap();
        assert!(matches!(
            list.dialect(&unknown.into(), true, None),
            Err(WatchError::UnknownLabel(name)) if name == "two"
        ));
    }

    #[test]
    fn duplicates_sit_above_the_original() {
        let engine = engine();
        let mut list = WatchList::new();
        list.dialect(&load("(10)", &engine), true, None).unwrap();
        list.set_label(1, "first").unwrap();
        list.duplicate(1).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).unwrap().watch_string(), "first");
        assert_eq!(list.get(2).unwrap().watch_string(), "first");

        list.set_label(1, "copy").unwrap();
        assert_eq!(list.get(2).unwrap().watch_string(), "first");
        assert!(list.duplicate(3).is_err());
    }

    #[test]
    fn strings_mold_in_the_value_column() {
        let engine = engine();
        engine.eval(&["s: \"hi\"".into()]).unwrap();
        let mut list = WatchList::new();
        list.dialect(&load("s", &engine), true, None).unwrap();
        assert_eq!(list.get(1).unwrap().value_string().unwrap(), "\"hi\"");
        assert_eq!(list.iter().count(), 1);
    }
}
