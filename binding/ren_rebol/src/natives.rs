//! Built-in functions.
//!
//! Every native is a plain function over already-gathered arguments, listed
//! once in [`NATIVES`]. A native cell stores its index into that table.
//! Parameter specs use the same conventions as `func` specs: `"name"` is an
//! evaluated argument, `"'name"` is quoted, and `"/name"` starts a
//! refinement whose arguments follow it.

mod control;
mod data;
mod io;
mod math;
mod series;

use ren_cell::Cell;

use crate::errors;
use crate::eval::{Escape, EvalResult, Interp};
use crate::layout::{self, tag};

pub(crate) type NativeFn = fn(&mut Interp<'_>, &[Cell]) -> EvalResult;

pub(crate) struct NativeDef {
    pub(crate) name: &'static str,
    pub(crate) params: &'static [&'static str],
    /// Operators like `+` take their first argument from the left.
    pub(crate) infix: bool,
    pub(crate) func: NativeFn,
}

const fn prefix(name: &'static str, params: &'static [&'static str], func: NativeFn) -> NativeDef {
    NativeDef {
        name,
        params,
        infix: false,
        func,
    }
}

const fn infix(name: &'static str, func: NativeFn) -> NativeDef {
    NativeDef {
        name,
        params: &["value1", "value2"],
        infix: true,
        func,
    }
}

const ONE: &[&str] = &["value"];
const TWO: &[&str] = &["value1", "value2"];
const SERIES: &[&str] = &["series"];

pub(crate) static NATIVES: &[NativeDef] = &[
    // Math and comparison.
    prefix("add", TWO, math::add),
    prefix("subtract", TWO, math::subtract),
    prefix("multiply", TWO, math::multiply),
    prefix("divide", TWO, math::divide),
    prefix("remainder", TWO, math::remainder),
    prefix("negate", ONE, math::negate),
    infix("+", math::add),
    infix("-", math::subtract),
    infix("*", math::multiply),
    infix("/", math::divide),
    infix("//", math::remainder),
    prefix("equal?", TWO, math::equal),
    prefix("not-equal?", TWO, math::not_equal),
    prefix("strict-equal?", TWO, math::strict_equal),
    prefix("same?", TWO, math::same),
    prefix("lesser?", TWO, math::lesser),
    prefix("greater?", TWO, math::greater),
    prefix("lesser-or-equal?", TWO, math::lesser_or_equal),
    prefix("greater-or-equal?", TWO, math::greater_or_equal),
    infix("=", math::equal),
    infix("<>", math::not_equal),
    infix("==", math::strict_equal),
    infix("<", math::lesser),
    infix(">", math::greater),
    infix("<=", math::lesser_or_equal),
    infix(">=", math::greater_or_equal),
    prefix("not", ONE, math::not),
    infix("and", math::and),
    infix("or", math::or),
    // Control.
    prefix("if", &["condition", "then-block"], control::if_),
    prefix("either", &["condition", "true-block", "false-block"], control::either),
    prefix("while", &["cond-block", "body-block"], control::while_),
    prefix("loop", &["count", "block"], control::loop_),
    prefix("repeat", &["'word", "count", "body"], control::repeat),
    prefix("foreach", &["'word", "data", "body"], control::foreach),
    prefix("do", ONE, control::do_),
    prefix("reduce", ONE, control::reduce),
    prefix("case", &["block"], control::case),
    prefix("any", &["block"], control::any),
    prefix("all", &["block"], control::all),
    prefix("break", &["/return", "value"], control::break_),
    prefix("return", ONE, control::return_),
    prefix("exit", &[], control::exit),
    prefix("throw", &["value", "/name", "word"], control::throw),
    prefix("catch", &["block", "/name", "word"], control::catch),
    prefix("try", &["block"], control::try_),
    prefix("halt", &[], control::halt),
    prefix("quit", &[], control::halt),
    prefix("comment", &["'value"], control::comment),
    prefix("func", &["spec", "body"], control::func),
    // Data.
    prefix("make", &["type", "spec"], data::make),
    prefix("copy", &["value", "/deep"], data::copy),
    prefix("quote", &["'value"], data::quote),
    prefix("get", &["word"], data::get),
    prefix("set", &["word", "value"], data::set),
    prefix("value?", ONE, data::value_q),
    prefix("type?", ONE, data::type_q),
    prefix("unset?", ONE, data::unset_q),
    prefix("none?", ONE, data::none_q),
    prefix("logic?", ONE, data::logic_q),
    prefix("integer?", ONE, data::integer_q),
    prefix("decimal?", ONE, data::decimal_q),
    prefix("number?", ONE, data::number_q),
    prefix("char?", ONE, data::char_q),
    prefix("string?", ONE, data::string_q),
    prefix("word?", ONE, data::word_q),
    prefix("block?", ONE, data::block_q),
    prefix("series?", ONE, data::series_q),
    prefix("object?", ONE, data::object_q),
    prefix("error?", ONE, data::error_q),
    prefix("function?", ONE, data::function_q),
    // Series.
    prefix("first", SERIES, series::first),
    prefix("last", SERIES, series::last),
    prefix("pick", &["series", "index"], series::pick),
    prefix("poke", &["series", "index", "value"], series::poke),
    prefix("append", &["series", "value", "/only"], series::append),
    prefix("length?", SERIES, series::length_q),
    prefix("head", SERIES, series::head),
    prefix("tail", SERIES, series::tail),
    prefix("next", SERIES, series::next),
    prefix("back", SERIES, series::back),
    prefix("skip", &["series", "offset"], series::skip),
    prefix("at", &["series", "index"], series::at),
    prefix("index?", SERIES, series::index_q),
    prefix("head?", SERIES, series::head_q),
    prefix("tail?", SERIES, series::tail_q),
    prefix("find", &["series", "value"], series::find),
    prefix("select", &["series", "value"], series::select),
    prefix("clear", SERIES, series::clear),
    // Output.
    prefix("print", ONE, io::print),
    prefix("prin", ONE, io::prin),
    prefix("mold", &["value", "/all"], io::mold),
    prefix("form", ONE, io::form),
];

pub(crate) fn lookup(index: usize) -> Option<&'static NativeDef> {
    NATIVES.get(index)
}

// Argument helpers shared by the native modules.

fn arg(args: &[Cell], i: usize) -> Cell {
    args.get(i).copied().unwrap_or_else(layout::none)
}

/// Whether a refinement slot was used.
fn flag(args: &[Cell], i: usize) -> bool {
    layout::is_truthy(&arg(args, i))
}

fn type_name(cell: &Cell) -> &'static str {
    layout::datatype_of(cell).map_or("trash!", |d| d.name())
}

#[cold]
fn wrong_type(func: &str, param: &str, cell: &Cell) -> Escape {
    errors::expect_arg(func, param, type_name(cell)).into()
}

fn need_block(func: &str, param: &str, cell: Cell) -> Result<Cell, Escape> {
    match layout::tag_of(&cell) {
        tag::BLOCK | tag::PAREN => Ok(cell),
        _ => Err(wrong_type(func, param, &cell)),
    }
}

fn need_series(func: &str, param: &str, cell: Cell) -> Result<Cell, Escape> {
    if layout::is_series_tag(layout::tag_of(&cell)) {
        Ok(cell)
    } else {
        Err(wrong_type(func, param, &cell))
    }
}

fn need_integer(func: &str, param: &str, cell: &Cell) -> Result<i64, Escape> {
    layout::integer_value(cell)
        .or_else(|| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "decimal counts truncate toward zero"
            )]
            layout::decimal_value(cell).map(|d| d as i64)
        })
        .ok_or_else(|| wrong_type(func, param, cell))
}
