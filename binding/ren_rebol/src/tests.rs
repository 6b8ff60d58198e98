#![allow(clippy::unwrap_used, reason = "tests")]

use pretty_assertions::assert_eq;
use ren_cell::{silent_handler, Datatype, EngineConfig, Failure, Loaded, Runtime};

use super::RebolRuntime;

fn runtime() -> RebolRuntime {
    RebolRuntime::new(EngineConfig::default().print_handler(silent_handler()))
}

#[test]
fn initialization_runs_once() {
    let rt = runtime();
    assert!(!rt.is_initialized());
    assert_eq!(rt.lazy_initialize(), Ok(true));
    assert_eq!(rt.lazy_initialize(), Ok(false));
    assert!(rt.is_initialized());
}

#[test]
fn immediates_round_trip_through_cells() {
    let cell = RebolRuntime::make_integer(-7);
    assert_eq!(RebolRuntime::classify(&cell), Some(Datatype::Integer));
    assert_eq!(RebolRuntime::integer_of(&cell), Some(-7));
    assert_eq!(RebolRuntime::float_of(&cell), None);

    let c = RebolRuntime::make_character('λ');
    assert_eq!(RebolRuntime::character_of(&c), Some('λ'));
    assert!(!RebolRuntime::needs_refcount(&c));
}

#[test]
fn stamping_changes_only_the_type() {
    let rt = runtime();
    let mut word = rt.make_word(Datatype::Word, "foo", None).unwrap();
    RebolRuntime::stamp(&mut word, Datatype::SetWord);
    assert_eq!(RebolRuntime::classify(&word), Some(Datatype::SetWord));
    assert_eq!(rt.mold(&word, false).unwrap(), "foo:");
}

#[test]
fn arrays_splice_source_and_cells() {
    let rt = runtime();
    let ten = RebolRuntime::make_integer(10);
    let block = rt
        .make_array(
            Datatype::Block,
            &[Loaded::from("print 1 +"), Loaded::Cell(ten)],
            None,
        )
        .unwrap();
    assert_eq!(rt.mold(&block, false).unwrap(), "[print 1 + 10]");
    assert_eq!(rt.series_tail(&block), Ok(4));
    assert_eq!(rt.series_pick(&block, 3), Ok(Some(ten)));
    assert_eq!(rt.series_pick(&block, 4), Ok(None));
}

#[test]
fn wrong_kinds_are_usage_errors() {
    let rt = runtime();
    assert!(matches!(
        rt.make_array(Datatype::Integer, &[], None),
        Err(Failure::Usage(_))
    ));
    assert!(matches!(
        rt.make_word(Datatype::String, "x", None),
        Err(Failure::Usage(_))
    ));
    assert!(matches!(
        rt.series_tail(&RebolRuntime::make_none()),
        Err(Failure::Usage(_))
    ));
}

#[test]
fn scan_errors_become_error_values() {
    let rt = runtime();
    let Err(Failure::Error { error }) = rt.make_array(Datatype::Block, &[Loaded::from("[1 2")], None)
    else {
        panic!("expected a syntax error");
    };
    let text = rt.form(&error).unwrap();
    assert!(text.contains("Syntax"), "{text}");
}

#[test]
fn contexts_hold_their_own_keys() {
    let rt = runtime();
    let ctx = rt.make_context(None).unwrap();
    rt.context_set(&ctx, "answer", &RebolRuntime::make_integer(42)).unwrap();
    assert_eq!(
        rt.context_get(&ctx, "answer").unwrap(),
        Some(RebolRuntime::make_integer(42))
    );
    assert_eq!(rt.context_get(&ctx, "print").unwrap(), None);

    let user = rt.user_context().unwrap();
    assert!(rt.context_get(&user, "print").unwrap().is_some());
}

#[test]
fn apply_in_a_context_binds_there() {
    let rt = runtime();
    let ctx = rt.make_context(None).unwrap();
    rt.context_set(&ctx, "x", &RebolRuntime::make_integer(5)).unwrap();
    let result = rt.apply(None, &[Loaded::from("x")], Some(&ctx)).unwrap();
    assert_eq!(result, Some(RebolRuntime::make_integer(5)));
}

#[test]
fn apply_calls_a_function_value() {
    let rt = runtime();
    let add = rt.apply(None, &[Loaded::from(":add")], None).unwrap().unwrap();
    let result = rt
        .apply(
            Some(&add),
            &[
                Loaded::Cell(RebolRuntime::make_integer(1)),
                Loaded::Cell(RebolRuntime::make_integer(2)),
            ],
            None,
        )
        .unwrap();
    assert_eq!(result, Some(RebolRuntime::make_integer(3)));
}

#[test]
fn apply_runs_a_block_applicand() {
    let rt = runtime();
    let block = rt.make_array(Datatype::Block, &[Loaded::from("1 + 1")], None).unwrap();
    let result = rt.apply(Some(&block), &[], None).unwrap();
    assert_eq!(result, Some(RebolRuntime::make_integer(2)));
}

#[test]
fn collection_keeps_roots_and_frees_the_rest() {
    let rt = runtime();
    let kept = rt.make_string(Datatype::String, "kept").unwrap();
    let _lost = rt.make_string(Datatype::String, "lost").unwrap();
    let freed = rt.collect_garbage(&mut std::iter::once(kept));
    assert!(freed >= 1);
    assert_eq!(rt.form(&kept).unwrap(), "kept");
}

#[test]
fn gc_becomes_pending_past_the_threshold() {
    let rt = RebolRuntime::new(EngineConfig::default().gc_threshold(3));
    rt.lazy_initialize().unwrap();
    rt.collect_garbage(&mut std::iter::empty());
    assert!(!rt.gc_pending());
    for _ in 0..3 {
        rt.make_string(Datatype::String, "x").unwrap();
    }
    assert!(rt.gc_pending());
}

#[test]
fn system_object_reports_options() {
    let rt = RebolRuntime::new(
        EngineConfig::default()
            .print_handler(silent_handler())
            .home_dir("/opt/ren"),
    );
    let home = rt
        .apply(None, &[Loaded::from("system/options/home")], None)
        .unwrap()
        .unwrap();
    assert_eq!(rt.mold(&home, false).unwrap(), "%/opt/ren");
}

#[test]
fn shutdown_is_final() {
    let rt = runtime();
    rt.lazy_initialize().unwrap();
    rt.shutdown();
    assert!(matches!(rt.lazy_initialize(), Err(Failure::Fatal { .. })));
    assert!(matches!(
        rt.make_string(Datatype::String, "x"),
        Err(Failure::Fatal { .. })
    ));
}
