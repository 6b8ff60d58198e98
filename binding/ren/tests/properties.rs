//! Property tests over generated literals and series.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use ren::{AnyValue, Character, Engine, EngineConfig, Float, Integer, Logic, RenNone, Subtype};

fn engine() -> Engine {
    Engine::new(EngineConfig::default())
}

#[derive(Clone, Debug)]
enum Lit {
    Logic(bool),
    Int(i64),
    Float(f64),
    Char(char),
    None,
}

fn literal() -> impl Strategy<Value = Lit> {
    prop_oneof![
        any::<bool>().prop_map(Lit::Logic),
        any::<i64>().prop_map(Lit::Int),
        (-1.0e12..1.0e12_f64).prop_map(Lit::Float),
        any::<char>().prop_map(Lit::Char),
        Just(Lit::None),
    ]
}

fn make(lit: &Lit, engine: &Engine) -> AnyValue {
    match *lit {
        Lit::Logic(b) => AnyValue::with_engine(b, engine),
        Lit::Int(n) => AnyValue::with_engine(n, engine),
        Lit::Float(f) => AnyValue::with_engine(f, engine),
        Lit::Char(c) => AnyValue::with_engine(c, engine),
        Lit::None => AnyValue::none_in(engine),
    }
}

/// A cast succeeds exactly when the subtype's test accepts the value.
fn cast_is_sound<T: Subtype>(value: &AnyValue) -> bool {
    T::accepts(value) == value.cast::<T>().is_ok()
}

proptest! {
    #[test]
    fn casts_succeed_only_where_the_test_passes(lit in literal()) {
        let engine = engine();
        let value = make(&lit, &engine);
        prop_assert!(cast_is_sound::<Logic>(&value));
        prop_assert!(cast_is_sound::<Integer>(&value));
        prop_assert!(cast_is_sound::<Float>(&value));
        prop_assert!(cast_is_sound::<Character>(&value));
        prop_assert!(cast_is_sound::<RenNone>(&value));

        let accepted = [
            Logic::accepts(&value),
            Integer::accepts(&value),
            Float::accepts(&value),
            Character::accepts(&value),
            RenNone::accepts(&value),
        ];
        prop_assert_eq!(accepted.iter().filter(|a| **a).count(), 1);
    }

    #[test]
    fn integers_read_back(n in any::<i64>()) {
        let engine = engine();
        prop_assert_eq!(Integer::new_in(n, &engine).value(), n);
    }

    #[test]
    fn characters_read_back(c in any::<char>()) {
        let engine = engine();
        prop_assert_eq!(Character::new_in(c, &engine).value(), c);
    }

    #[test]
    fn copies_of_scalars_are_the_same(lit in literal()) {
        let engine = engine();
        let value = make(&lit, &engine);
        let copy = value.copy(false).unwrap();
        prop_assert!(copy.is_same_as(&value));
    }
}

#[cfg(feature = "rebol")]
mod rebol {
    use super::*;
    use ren::{AnyArray, Block, RenError, Series};

    proptest! {
        #[test]
        fn indexing_is_one_based_and_bounded(items in prop::collection::vec(any::<i32>(), 0..12)) {
            let engine = engine();
            let values: Vec<AnyValue> =
                items.iter().map(|n| AnyValue::with_engine(*n, &engine)).collect();
            let block = Block::from_values(&values).unwrap();
            let len = items.len();

            prop_assert_eq!(block.length().unwrap(), len);
            for (i, n) in items.iter().enumerate() {
                let at = block.at(i64::try_from(i).unwrap() + 1).unwrap().unwrap();
                prop_assert_eq!(at.cast::<Integer>().unwrap().value(), i64::from(*n));
            }
            let past = i64::try_from(len).unwrap() + 1;
            prop_assert!(block.at(past).unwrap().is_none());
            prop_assert!(block.at(past + 5).unwrap().is_none());
            prop_assert!(matches!(block.at(0), Err(RenError::Usage(_))));
            prop_assert!(matches!(block.at(-1), Err(RenError::Usage(_))));

            let collected: Vec<i64> = block
                .iter()
                .map(|v| v.unwrap().cast::<Integer>().unwrap().value())
                .collect();
            prop_assert_eq!(collected, items.iter().map(|n| i64::from(*n)).collect::<Vec<_>>());
        }

        #[test]
        fn scanned_integers_match_literals(n in -1_000_000_000_000_i64..1_000_000_000_000) {
            let engine = engine();
            let loaded = AnyValue::load_in(&n.to_string(), &engine).unwrap();
            prop_assert_eq!(loaded.cast::<Integer>().unwrap().value(), n);
            prop_assert_eq!(loaded.mold().unwrap(), n.to_string());
        }
    }
}
