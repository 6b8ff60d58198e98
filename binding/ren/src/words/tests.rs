#![allow(clippy::unwrap_used, reason = "tests")]

use pretty_assertions::assert_eq;

use super::*;
use crate::EngineConfig;

fn engine() -> Engine {
    Engine::new(EngineConfig::default())
}

#[test]
fn unbound_words_keep_their_spelling() {
    let engine = engine();
    let word = Word::unbound_in("Hello", &engine).unwrap();
    assert_eq!(word.spelling_of().unwrap(), "Hello");
    assert!(word.has_spelling("Hello"));
    // Spelling checks are exact even though word equality is not.
    assert!(!word.has_spelling("hello"));
}

#[test]
fn words_mold_with_their_decoration() {
    let engine = engine();
    assert_eq!(SetWord::unbound_in("x", &engine).unwrap().mold().unwrap(), "x:");
    assert_eq!(GetWord::unbound_in("x", &engine).unwrap().mold().unwrap(), ":x");
    assert_eq!(LitWord::unbound_in("x", &engine).unwrap().mold().unwrap(), "'x");
    assert_eq!(Refinement::unbound_in("x", &engine).unwrap().mold().unwrap(), "/x");
    assert_eq!(Issue::unbound_in("x", &engine).unwrap().mold().unwrap(), "#x");
}

#[test]
fn converting_between_word_types_keeps_the_name() {
    let engine = engine();
    let set = SetWord::unbound_in("total", &engine).unwrap();
    let get: GetWord = set.to_word();
    assert!(get.is_any_word());
    assert_eq!(get.datatype(), Some(Datatype::GetWord));
    assert_eq!(get.spelling_of().unwrap(), "total");
}

#[test]
fn word_equality_ignores_case() {
    let engine = engine();
    let a = Word::unbound_in("abc", &engine).unwrap();
    let b = Word::unbound_in("ABC", &engine).unwrap();
    assert!(a.is_equal_to(&b).unwrap());
    assert!(!a.is_same_as(&b));
}

#[test]
fn spelling_check_requires_the_type() {
    let engine = engine();
    let word: AnyValue = Word::unbound_in("x", &engine).unwrap().into();
    assert!(word.is_equal_to_spelling::<Word>("x"));
    assert!(!word.is_equal_to_spelling::<SetWord>("x"));
    assert!(!AnyValue::with_engine(1, &engine).is_equal_to_spelling::<Word>("1"));
}

#[cfg(feature = "rebol")]
mod rebol {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{AnyString, Integer, RenString};

    #[test]
    fn set_word_call_assigns() {
        let engine = engine();
        let x = SetWord::new_in("x", &engine).unwrap();
        let assigned = x.call(&["10 + 5".into()]).unwrap();
        assert_eq!(assigned.cast::<Integer>().unwrap().value(), 15);

        let fetched = GetWord::new_in("x", &engine).unwrap().get().unwrap().unwrap();
        assert_eq!(fetched.cast::<Integer>().unwrap().value(), 15);
    }

    #[test]
    fn word_call_runs_the_binding() {
        let engine = engine();
        let negate = Word::new_in("negate", &engine).unwrap();
        let n = negate.call(&["3".into()]).unwrap().unwrap();
        assert_eq!(n.cast::<Integer>().unwrap().value(), -3);
    }

    #[test]
    fn words_bind_into_a_given_context() {
        let engine = engine();
        let ctx = Context::new_in(&engine).unwrap();
        ctx.set("y", AnyValue::with_engine(7, &engine)).unwrap();
        let y = Word::bound_in("y", &ctx).unwrap();
        assert_eq!(y.call(&[]).unwrap().unwrap().cast::<Integer>().unwrap().value(), 7);
    }

    #[test]
    fn new_words_are_added_to_user() {
        let engine = engine();
        let user = engine.user().unwrap();
        let word = Word::new_in("fresh-name", &engine).unwrap();
        assert!(word.has_spelling("fresh-name"));
        // Present as a key, but unset, so it reads as absent.
        assert!(user.get("fresh-name").unwrap().is_none());
    }

    #[test]
    fn strings_and_words_compare_by_spelling() {
        let engine = engine();
        let s: AnyValue = RenString::new_in("print", &engine).unwrap().into();
        assert!(s.is_equal_to_spelling::<RenString>("print"));
        assert!(!s.is_equal_to_spelling::<Word>("print"));
    }
}

#[cfg(feature = "red")]
#[test]
fn red_cannot_bind_words_yet() {
    let engine = engine();
    assert!(matches!(Word::new_in("x", &engine), Err(RenError::NotImplemented { .. })));
}
