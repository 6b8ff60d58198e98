#![allow(clippy::unwrap_used, reason = "tests")]

use pretty_assertions::assert_eq;
use ren_cell::{buffer_handler, EngineConfig, Failure, Loaded, Runtime};

use crate::RebolRuntime;

fn runtime() -> RebolRuntime {
    RebolRuntime::new(EngineConfig::default().print_handler(buffer_handler()))
}

/// Molded result, formed error, or the failure's message.
fn run_in(rt: &RebolRuntime, source: &str) -> String {
    match rt.apply(None, &[Loaded::from(source)], None) {
        Ok(Some(value)) => rt.mold(&value, false).unwrap(),
        Ok(None) => String::new(),
        Err(Failure::Error { error }) => rt.form(&error).unwrap(),
        Err(other) => other.to_string(),
    }
}

fn run(source: &str) -> String {
    run_in(&runtime(), source)
}

#[test]
fn infix_evaluates_left_to_right() {
    assert_eq!(run("1 + 2 * 3"), "9");
    assert_eq!(run("2 * (1 + 2)"), "6");
    assert_eq!(run("7 // 3"), "1");
    assert_eq!(run("1 + 0.5"), "1.5");
    assert_eq!(run("10 / 4"), "2.5");
    assert_eq!(run("10 / 5"), "2");
}

#[test]
fn comparison_operators() {
    assert_eq!(run("1 < 2"), "true");
    assert_eq!(run("\"abc\" = \"ABC\""), "true");
    assert_eq!(run("\"abc\" == \"ABC\""), "false");
    assert_eq!(run("1 <> 1.0"), "false");
}

#[test]
fn variables_persist_in_the_user_context() {
    let rt = runtime();
    assert_eq!(run_in(&rt, "x: 10"), "10");
    assert_eq!(run_in(&rt, "x + 1"), "11");
    assert_eq!(run_in(&rt, ":x"), "10");
    assert_eq!(run_in(&rt, "'x"), "x");
}

#[test]
fn unset_words_raise_no_value() {
    let out = run("undefined-thing");
    assert!(out.contains("undefined-thing has no value"), "{out}");
}

#[test]
fn set_word_needs_a_value() {
    let out = run("a:");
    assert!(out.contains("a needs a value"), "{out}");
}

#[test]
fn functions_bind_parameters_per_call() {
    let rt = runtime();
    run_in(&rt, "add-one: func [n] [n + 1]");
    assert_eq!(run_in(&rt, "add-one 41"), "42");
    assert_eq!(run_in(&rt, "add-one add-one 1"), "3");
}

#[test]
fn recursion_sees_its_own_arguments() {
    let rt = runtime();
    run_in(&rt, "fact: func [n] [either n <= 1 [1] [n * fact n - 1]]");
    assert_eq!(run_in(&rt, "fact 10"), "3628800");
}

#[test]
fn refinements_and_locals() {
    let rt = runtime();
    run_in(
        &rt,
        "greet: func [name /loud volume /local text] [
            text: join \"hi \" name
            if loud [text: append text volume]
            text
        ]",
    );
    assert_eq!(run_in(&rt, "greet \"bob\""), "\"hi bob\"");
    assert_eq!(run_in(&rt, "greet/loud \"bob\" \"!\""), "\"hi bob!\"");
    let out = run_in(&rt, "greet/quiet \"bob\"");
    assert!(out.contains("no refinement called /quiet"), "{out}");
}

#[test]
fn return_leaves_only_the_function() {
    let rt = runtime();
    run_in(&rt, "f: func [x] [if x > 0 [return 'positive] 'other]");
    assert_eq!(run_in(&rt, "f 5"), "positive");
    assert_eq!(run_in(&rt, "f 0"), "other");
}

#[test]
fn loops_and_break() {
    assert_eq!(run("n: 0 loop 5 [n: n + 1] n"), "5");
    assert_eq!(run("n: 0 while [n < 3] [n: n + 1] n"), "3");
    assert_eq!(run("sum: 0 repeat i 4 [sum: sum + i] sum"), "10");
    assert_eq!(run("out: copy [] foreach x [1 2 3] [append out x * 2] out"), "[2 4 6]");
    assert_eq!(run("foreach [k v] [a 1 b 2] [if k = 'b [break/return v]]"), "2");
    assert_eq!(run("loop 10 [break]"), "none");
}

#[test]
fn break_outside_a_loop_is_an_error() {
    let out = run("break");
    assert!(out.contains("no loop"), "{out}");
}

#[test]
fn conditionals() {
    assert_eq!(run("if 1 > 2 [3]"), "none");
    assert_eq!(run("either none ['yes] ['no]"), "no");
    assert_eq!(run("case [false [1] 2 > 1 [2] true [3]]"), "2");
    assert_eq!(run("any [none false 3]"), "3");
    assert_eq!(run("all [1 none 3]"), "none");
    assert_eq!(run("unless false [5]"), "5");
}

#[test]
fn objects_and_paths() {
    let rt = runtime();
    run_in(&rt, "point: make object! [x: 1 y: x + 1]");
    assert_eq!(run_in(&rt, "point/y"), "2");
    run_in(&rt, "point/x: 10");
    assert_eq!(run_in(&rt, "point/x"), "10");
    assert_eq!(run_in(&rt, "mold point"), "\"make object! [x: 10 y: 2]\"");

    run_in(&rt, "derived: make point [z: x * 3]");
    assert_eq!(run_in(&rt, "derived/z"), "30");
    assert_eq!(run_in(&rt, "point/x"), "10");
}

#[test]
fn paths_into_blocks() {
    let rt = runtime();
    run_in(&rt, "b: [10 20 key \"val\"]");
    assert_eq!(run_in(&rt, "b/2"), "20");
    assert_eq!(run_in(&rt, "b/key"), "\"val\"");
    assert_eq!(run_in(&rt, "b/9"), "none");
    run_in(&rt, "b/1: 99");
    assert_eq!(run_in(&rt, "first b"), "99");
    let out = run_in(&rt, "b/9: 1");
    assert!(out.contains("past end"), "{out}");
}

#[test]
fn computed_path_segments() {
    let rt = runtime();
    run_in(&rt, "b: [10 20 30] i: 1 o: make object! [n: 5] k: 'n");
    assert_eq!(run_in(&rt, "b/(i + 1)"), "20");
    assert_eq!(run_in(&rt, "o/:k"), "5");
    run_in(&rt, "b/(i + 2): 99");
    assert_eq!(run_in(&rt, "b"), "[10 20 99]");
}

#[test]
fn return_outside_a_function_is_an_error() {
    let out = run("return 1");
    assert!(out.contains("not in function"), "{out}");
    assert_eq!(run("f: func [] [loop 3 [return 'early] 'late] f"), "early");
}

#[test]
fn made_errors_are_user_errors() {
    let rt = runtime();
    run_in(&rt, "e: make error! \"boom\"");
    assert_eq!(run_in(&rt, "e/id"), "message");
    assert_eq!(run_in(&rt, "e/code"), "800");
    assert_eq!(run_in(&rt, "e/message"), "\"boom\"");
}

#[test]
fn bad_path_part_is_reported() {
    let out = run("o: make object! [a: 1] o/missing");
    assert!(out.contains("cannot access missing in path o/missing"), "{out}");
}

#[test]
fn series_navigation() {
    assert_eq!(run("next [1 2 3]"), "[2 3]");
    assert_eq!(run("index? next next [1 2 3]"), "3");
    assert_eq!(run("back head [1 2]"), "[1 2]");
    assert_eq!(run("tail? tail \"abc\""), "true");
    assert_eq!(run("length? skip [1 2 3 4] 3"), "1");
    assert_eq!(run("at [1 2 3] 2"), "[2 3]");
    assert_eq!(run("last [1 2 3]"), "3");
    assert_eq!(run("find [a b c] 'b"), "[b c]");
    assert_eq!(run("find \"hello\" \"LL\""), "\"llo\"");
    assert_eq!(run("select [a 1 b 2] 'b"), "2");
    assert_eq!(run("s: [1 2 3] clear next s s"), "[1]");
}

#[test]
fn append_splices_blocks_unless_only() {
    assert_eq!(run("append [1] [2 3]"), "[1 2 3]");
    assert_eq!(run("append/only [1] [2 3]"), "[1 [2 3]]");
    assert_eq!(run("append \"ab\" [\"c\" 1]"), "\"abc1\"");
}

#[test]
fn catch_and_throw() {
    assert_eq!(run("catch [throw 5 6]"), "5");
    assert_eq!(run("catch/name [throw/name 1 'inner] 'inner"), "1");
    assert_eq!(
        run("catch/name [catch [throw/name 2 'outer]] 'outer"),
        "2"
    );
}

#[test]
fn uncaught_throws_reach_the_host() {
    let rt = runtime();
    let result = rt.apply(None, &[Loaded::from("throw/name 7 'tag")], None);
    let Err(Failure::Throw { value, name }) = result else {
        panic!("expected a throw, got {result:?}");
    };
    assert_eq!(rt.mold(&value.unwrap(), false).unwrap(), "7");
    assert_eq!(rt.form(&name.unwrap()).unwrap(), "tag");
}

#[test]
fn try_returns_errors_as_values() {
    assert_eq!(run("error? try [1 / 0]"), "true");
    let out = run("form try [1 / 0]");
    assert!(out.contains("attempt to divide by zero"), "{out}");
    assert_eq!(run("try [1 + 1]"), "2");
    assert_eq!(run("attempt [1 / 0]"), "none");
}

#[test]
fn do_raises_made_errors() {
    let out = run("do make error! \"boom\"");
    assert!(out.contains("boom"), "{out}");
    assert_eq!(run("e: make error! [message: \"custom\"] e/message"), "\"custom\"");
}

#[test]
fn do_loads_strings() {
    assert_eq!(run("do \"1 + 2\""), "3");
    assert_eq!(run("do [x: 4 x * x]"), "16");
}

#[test]
fn reduce_and_compose_values() {
    assert_eq!(run("reduce [1 + 1 'a \"s\"]"), "[2 a \"s\"]");
    assert_eq!(run("rejoin [\"a\" 1 + 1 'c]"), "\"a2c\"");
}

#[test]
fn type_queries() {
    assert_eq!(run("type? 1"), "integer!");
    assert_eq!(run("integer! = type? 1"), "true");
    assert_eq!(run("type? [a]"), "block!");
    assert_eq!(run("integer? 1.5"), "false");
    assert_eq!(run("number? 1.5"), "true");
    assert_eq!(run("function? :print"), "true");
    assert_eq!(run("value? 'never-assigned"), "false");
}

#[test]
fn make_converts_between_types() {
    assert_eq!(run("make integer! \"42\""), "42");
    assert_eq!(run("make integer! 3.9"), "3");
    assert_eq!(run("make decimal! 2"), "2.0");
    assert_eq!(run("make string! 12"), "\"\"");
    assert_eq!(run("make word! \"abc\""), "abc");
    let out = run("make integer! \"x\"");
    assert!(out.contains("cannot MAKE integer!"), "{out}");
}

#[test]
fn copy_deep_separates_nested_blocks() {
    let rt = runtime();
    run_in(&rt, "a: [[1] 2] b: copy/deep a c: copy a");
    run_in(&rt, "append first a 9");
    assert_eq!(run_in(&rt, "b"), "[[1] 2]");
    assert_eq!(run_in(&rt, "c"), "[[1 9] 2]");
}

#[test]
fn integer_overflow_is_an_error() {
    let out = run("9223372036854775807 + 1");
    assert!(out.contains("overflow"), "{out}");
}

#[test]
fn runaway_recursion_is_stopped() {
    let out = run("f: func [n] [f n + 1] f 1");
    assert!(out.contains("stack overflow"), "{out}");
}

#[test]
fn print_goes_to_the_configured_handler() {
    let handler = buffer_handler();
    let rt = RebolRuntime::new(EngineConfig::default().print_handler(handler.clone()));
    run_in(&rt, "print [\"x is\" 1 + 2] prin \"a\" prin \"b\"");
    assert_eq!(handler.output(), "x is 3\nab");
}

#[test]
fn probe_prints_molded_and_returns() {
    let handler = buffer_handler();
    let rt = RebolRuntime::new(EngineConfig::default().print_handler(handler.clone()));
    assert_eq!(run_in(&rt, "probe \"s\""), "\"s\"");
    assert_eq!(handler.output(), "\"s\"\n");
}

#[test]
fn missing_arguments_are_reported() {
    let out = run("add 1");
    assert!(out.contains("add is missing its value2 argument"), "{out}");
    let out = run("1 +");
    assert!(out.contains("missing its value2 argument"), "{out}");
}

#[test]
fn wrong_argument_types_are_reported() {
    let out = run("1 + \"a\"");
    assert!(out.contains("does not allow string! for its value2 argument"), "{out}");
}

#[test]
fn halt_stops_evaluation() {
    let rt = runtime();
    assert_eq!(rt.apply(None, &[Loaded::from("halt 1")], None), Err(Failure::Halted));
}

#[test]
fn cancel_flag_halts_the_next_step() {
    let rt = runtime();
    rt.lazy_initialize().unwrap();
    rt.cancel();
    assert_eq!(rt.apply(None, &[Loaded::from("loop 1000000 [1]")], None), Err(Failure::Halted));
    assert_eq!(run_in(&rt, "1 + 1"), "2");
}
