#![allow(clippy::unwrap_used, reason = "tests")]

use pretty_assertions::assert_eq;

use super::*;
use crate::{EngineConfig, Float, Integer, Logic};

fn engine() -> Engine {
    Engine::new(EngineConfig::default())
}

// Literals and predicates

#[test]
fn literals_classify() {
    let engine = engine();
    assert!(AnyValue::with_engine(true, &engine).is_logic());
    assert!(AnyValue::with_engine('x', &engine).is_character());
    assert!(AnyValue::with_engine(10, &engine).is_integer());
    assert!(AnyValue::with_engine(10_i64, &engine).is_integer());
    assert!(AnyValue::with_engine(1.5, &engine).is_float());
    assert!(AnyValue::none_in(&engine).is_none());
    assert!(AnyValue::unset_in(&engine).is_unset());
}

#[test]
fn truthiness() {
    let engine = engine();
    assert!(AnyValue::with_engine(0, &engine).truthy());
    assert!(AnyValue::with_engine(true, &engine).truthy());
    assert!(!AnyValue::with_engine(false, &engine).truthy());
    assert!(!AnyValue::none_in(&engine).truthy());
    assert!(!AnyValue::unset_in(&engine).truthy());
}

#[test]
fn logic_predicates_need_logic() {
    let engine = engine();
    let t = AnyValue::with_engine(true, &engine);
    assert!(t.is_true());
    assert!(!t.is_false());
    let n = AnyValue::with_engine(1, &engine);
    assert!(!n.is_true());
    assert!(!n.is_false());
}

#[test]
fn type_names_come_from_the_backend() {
    let engine = engine();
    assert_eq!(AnyValue::with_engine(1, &engine).type_name(), "integer!");
    assert_eq!(AnyValue::none_in(&engine).type_name(), "none!");
}

// Casting

#[test]
fn cast_matches_the_predicate() {
    let engine = engine();
    let n = AnyValue::with_engine(20, &engine);
    assert_eq!(n.cast::<Integer>().unwrap().value(), 20);
    assert!(n.try_cast::<Float>().is_none());
    let err = n.cast::<Logic>().unwrap_err();
    assert!(matches!(
        err,
        RenError::InvalidCast {
            expected: "logic!",
            actual: "integer!"
        }
    ));
}

#[test]
fn try_from_is_cast() {
    let engine = engine();
    let n = AnyValue::with_engine(2.5, &engine);
    let f = Float::try_from(n.clone()).unwrap();
    assert!((f.value() - 2.5).abs() < f64::EPSILON);
    assert!(Integer::try_from(n).is_err());
}

// Raw cells

#[test]
fn raw_cells_reattach() {
    let engine = engine();
    let n = AnyValue::with_engine(5, &engine);
    let back = AnyValue::from_raw_cell(n.raw_cell(), &engine).unwrap();
    assert!(back.is_same_as(&n));
}

#[test]
fn trash_is_not_a_value() {
    let engine = engine();
    assert!(AnyValue::try_from_raw_cell(Cell::TRASH, &engine).is_none());
    assert!(matches!(
        AnyValue::from_raw_cell(Cell::TRASH, &engine),
        Err(RenError::Unbound(_))
    ));
}

// Identity and moves

#[test]
fn immediates_are_the_same_by_bits() {
    let engine = engine();
    let a = AnyValue::with_engine(3, &engine);
    let b = AnyValue::with_engine(3, &engine);
    assert!(a.is_same_as(&b));
    assert!(!a.is_same_as(&AnyValue::with_engine(4, &engine)));
}

#[test]
fn nothing_is_the_same_across_engines() {
    let a = AnyValue::with_engine(3, &engine());
    let b = AnyValue::with_engine(3, &engine());
    assert!(!a.is_same_as(&b));
    assert!(matches!(a.is_equal_to(&b), Err(RenError::Usage(_))));
}

#[test]
fn take_leaves_none_behind() {
    let engine = engine();
    let mut source = AnyValue::with_engine(9, &engine);
    let moved = source.take();
    assert!(source.is_none());
    assert_eq!(moved.cast::<Integer>().unwrap().value(), 9);
}

#[test]
fn uninitialize_is_repeatable() {
    let engine = engine();
    let mut value = AnyValue::with_engine('q', &engine);
    value.uninitialize();
    value.uninitialize();
    assert!(value.is_none());
}

// Text

#[test]
fn scalars_form_and_mold() {
    let engine = engine();
    assert_eq!(AnyValue::with_engine(10, &engine).to_string(), "10");
    assert_eq!(AnyValue::with_engine(true, &engine).to_string(), "true");
    assert_eq!(AnyValue::with_engine('a', &engine).mold().unwrap(), "#\"a\"");
    assert_eq!(AnyValue::with_engine('a', &engine).form().unwrap(), "a");
}

#[cfg(feature = "rebol")]
mod rebol {
    use pretty_assertions::assert_eq;

    use super::engine;
    use crate::{AnyArray, AnyValue, Block, Integer, RenError};

    #[test]
    fn load_returns_single_items_bare() {
        let engine = engine();
        let n = AnyValue::load_in("42", &engine).unwrap();
        assert_eq!(n.cast::<Integer>().unwrap().value(), 42);
        let many = AnyValue::load_in("1 2", &engine).unwrap();
        assert!(many.is_block());
        assert_eq!(many.mold().unwrap(), "[1 2]");
    }

    #[test]
    fn equality_is_looser_than_identity() {
        let engine = engine();
        let a = Block::new_in(&["1 2".into()], &engine).unwrap();
        let b = Block::new_in(&["1 2".into()], &engine).unwrap();
        assert!(a.is_equal_to(&b).unwrap());
        assert!(!a.is_same_as(&b));
        assert!(a.is_same_as(&a.clone()));

        let n = AnyValue::with_engine(1, &engine);
        let f = AnyValue::with_engine(1.0, &engine);
        assert!(n.is_equal_to(&f).unwrap());
        assert!(!n.is_same_as(&f));
    }

    #[test]
    fn copies_are_independent() {
        let engine = engine();
        let original = Block::new_in(&["1 2".into()], &engine).unwrap();
        let copy = original.copy(false).unwrap();
        engine
            .eval(&["append".into(), copy.clone().into(), AnyValue::with_engine(3, &engine).into()])
            .unwrap();
        assert_eq!(original.mold().unwrap(), "[1 2]");
        assert_eq!(copy.mold().unwrap(), "[1 2 3]");
    }

    #[test]
    fn shallow_copies_share_nested_blocks() {
        let engine = engine();
        let original = Block::new_in(&["[1 2] 3".into()], &engine).unwrap();
        let shallow = original.copy(false).unwrap();
        let deep = original.copy(true).unwrap();
        assert!(shallow.is_equal_to(&original).unwrap());
        assert!(!shallow.is_same_as(&original));
        assert!(!deep.is_same_as(&original));

        engine
            .eval(&["append first".into(), original.clone().into(), "99".into()])
            .unwrap();
        assert_eq!(original.mold().unwrap(), "[[1 2 99] 3]");
        assert_eq!(shallow.mold().unwrap(), "[[1 2 99] 3]");
        assert_eq!(deep.mold().unwrap(), "[[1 2] 3]");
    }

    #[test]
    fn apply_on_a_word_fetches_or_calls() {
        let engine = engine();
        engine.eval(&["x: 5".into()]).unwrap();
        let x = AnyValue::load_in("x", &engine).unwrap();
        let fetched = x.apply(&[]).unwrap().unwrap();
        assert_eq!(fetched.cast::<Integer>().unwrap().value(), 5);

        let add = AnyValue::load_in("add", &engine).unwrap();
        let sum = add
            .apply(&[AnyValue::with_engine(2, &engine).into(), "3".into()])
            .unwrap()
            .unwrap();
        assert_eq!(sum.cast::<Integer>().unwrap().value(), 5);

        // Values from another engine are refused.
        let foreign = AnyValue::with_engine(2, &super::engine());
        assert!(matches!(add.apply(&[foreign.into(), "3".into()]), Err(RenError::Usage(_))));
    }

    #[test]
    fn errors_form_to_their_diagnostic() {
        let engine = engine();
        let err = engine.eval(&["no-such-word".into()]).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("** Script error:"), "{text}");
        assert!(err.error_value().is_some());
    }
}
