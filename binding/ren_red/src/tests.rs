#![allow(clippy::unwrap_used, reason = "tests")]

use pretty_assertions::assert_eq;
use ren_cell::{silent_handler, Cell, Datatype, EngineConfig, Failure, Loaded, Runtime};

use super::{RedRuntime, TypeId};

fn runtime() -> RedRuntime {
    RedRuntime::new(EngineConfig::default().print_handler(silent_handler()))
}

#[test]
fn initialization_runs_once() {
    let rt = runtime();
    assert_eq!(rt.lazy_initialize(), Ok(true));
    assert_eq!(rt.lazy_initialize(), Ok(false));
    assert!(rt.is_initialized());
}

#[test]
fn header_is_the_red_type_id() {
    let cell = RedRuntime::make_integer(10);
    assert_eq!(cell.header(), TypeId::Integer.header());
    assert_eq!(RedRuntime::classify(&cell), Some(Datatype::Integer));
    assert_eq!(RedRuntime::integer_of(&cell), Some(10));
    assert_eq!(RedRuntime::datatype_name(Datatype::Float), "float!");
}

#[test]
fn runtime_internal_types_are_not_values() {
    assert_eq!(RedRuntime::classify(&Cell::TRASH), None);
    let symbol = Cell::new(TypeId::Symbol.header(), 0, 0);
    assert_eq!(RedRuntime::classify(&symbol), None);
    let op = Cell::new(TypeId::Op.header(), 0, 0);
    assert_eq!(RedRuntime::classify(&op), Some(Datatype::Native));
}

#[test]
fn stamping_round_trips_every_datatype() {
    let mut cell = RedRuntime::make_none();
    for dt in Datatype::ALL {
        RedRuntime::stamp(&mut cell, dt);
        assert_eq!(RedRuntime::classify(&cell), Some(dt));
    }
}

#[test]
fn scalars_form_and_mold() {
    let rt = runtime();
    assert_eq!(rt.form(&RedRuntime::make_float(2.0)).unwrap(), "2.0");
    assert_eq!(rt.mold(&RedRuntime::make_character('x'), false).unwrap(), "#\"x\"");
    assert_eq!(rt.form(&RedRuntime::make_logic(true)).unwrap(), "true");
    assert_eq!(rt.form(&RedRuntime::make_none()).unwrap(), "none");
}

#[test]
fn words_keep_their_spelling() {
    let rt = runtime();
    let word = rt.make_word(Datatype::SetWord, "Total", None).unwrap();
    assert_eq!(rt.spelling_of(&word).unwrap(), "Total");
    assert_eq!(rt.mold(&word, false).unwrap(), "Total:");
    let other = rt.make_word(Datatype::Word, "total", None).unwrap();
    assert!(rt.is_equal(&word, &other).unwrap());
    assert!(!rt.is_same(&word, &other));
}

#[test]
fn numbers_compare_across_types() {
    let rt = runtime();
    let one = RedRuntime::make_integer(1);
    let one_f = RedRuntime::make_float(1.0);
    assert!(rt.is_equal(&one, &one_f).unwrap());
    assert!(!rt.is_same(&one, &one_f));
    assert!(!rt.is_equal(&one, &RedRuntime::make_none()).unwrap());
}

#[test]
fn heap_operations_are_not_implemented() {
    let rt = runtime();
    assert!(matches!(
        rt.make_string(Datatype::String, "x"),
        Err(Failure::NotImplemented { .. })
    ));
    assert!(matches!(
        rt.make_array(Datatype::Block, &[Loaded::from("1 2")], None),
        Err(Failure::NotImplemented { .. })
    ));
    assert!(matches!(
        rt.apply(None, &[Loaded::from("1")], None),
        Err(Failure::NotImplemented { .. })
    ));
    assert!(matches!(
        rt.series_tail(&RedRuntime::make_none()),
        Err(Failure::NotImplemented { .. })
    ));
    assert!(matches!(rt.user_context(), Err(Failure::NotImplemented { .. })));
}

#[test]
fn non_words_have_no_spelling() {
    let rt = runtime();
    assert!(matches!(
        rt.spelling_of(&RedRuntime::make_integer(3)),
        Err(Failure::Usage(_))
    ));
    assert!(matches!(
        rt.make_word(Datatype::Integer, "x", None),
        Err(Failure::Usage(_))
    ));
}

#[test]
fn series_index_lives_in_extra() {
    let mut cell = RedRuntime::make_none();
    RedRuntime::set_series_index(&mut cell, 4);
    assert_eq!(cell.extra(), 4);
    assert_eq!(RedRuntime::series_index(&cell), 4);
}

#[test]
fn shutdown_is_final() {
    let rt = runtime();
    rt.lazy_initialize().unwrap();
    rt.shutdown();
    assert!(matches!(
        rt.make_word(Datatype::Word, "x", None),
        Err(Failure::Fatal { .. })
    ));
}
