//! Construction, copying, variables and type queries.
//!
//! Datatypes are represented by words spelled like their names, so
//! `type? 1` gives the word `integer!`, which is what `integer!` evaluates
//! to as well.

use ren_cell::Cell;

use super::{arg, flag, need_block, type_name, wrong_type};
use crate::errors;
use crate::eval::{Escape, EvalResult, Interp};
use crate::heap::{BindMode, Frame, FrameId};
use crate::layout::{self, tag};
use crate::mold;

/// `make type spec`, or `make prototype-object spec`.
pub(super) fn make(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let kind = arg(args, 0);
    let spec = arg(args, 1);
    if layout::tag_of(&kind) == tag::OBJECT {
        let block = need_block("make", "spec", spec)?;
        let proto = interp.heap.frame(layout::frame_id(&kind))?.clone();
        return make_object(interp, proto, &block);
    }
    if !layout::is_word_tag(layout::tag_of(&kind)) {
        return Err(wrong_type("make", "type", &kind));
    }
    let name = interp.heap.name(&kind).to_ascii_lowercase();
    match name.as_str() {
        "object!" => {
            let block = need_block("make", "spec", spec)?;
            let user = interp.heap.user;
            make_object(interp, Frame::new(Some(user)), &block)
        }
        "error!" => make_error(interp, &spec),
        "block!" | "paren!" => {
            let t = if name == "block!" { tag::BLOCK } else { tag::PAREN };
            if layout::is_array_tag(layout::tag_of(&spec)) {
                let copy = interp.heap.copy_series(&spec, false)?;
                return Ok(layout::retag(&copy, t));
            }
            if layout::integer_value(&spec).is_some() {
                return Ok(interp.heap.make_array(t, Vec::new()));
            }
            Err(bad_make(interp, &name, &spec))
        }
        "string!" | "file!" | "url!" | "tag!" => {
            let t = match name.as_str() {
                "string!" => tag::STRING,
                "file!" => tag::FILE,
                "url!" => tag::URL,
                _ => tag::TAG,
            };
            if layout::integer_value(&spec).is_some() {
                return Ok(interp.heap.make_text(t, ""));
            }
            let text = mold::form(interp.heap, &spec);
            Ok(interp.heap.make_text(t, &text))
        }
        "integer!" => to_integer(interp, &spec).ok_or_else(|| bad_make(interp, &name, &spec)),
        "decimal!" => to_decimal(interp, &spec).ok_or_else(|| bad_make(interp, &name, &spec)),
        "word!" => {
            let t = layout::tag_of(&spec);
            if layout::is_word_tag(t) {
                return Ok(layout::retag(&spec, tag::WORD));
            }
            if layout::is_string_tag(t) {
                let text = interp.heap.text_string(&spec)?;
                return Ok(interp.heap.make_word(tag::WORD, &text));
            }
            Err(bad_make(interp, &name, &spec))
        }
        _ => Err(bad_make(interp, &name, &spec)),
    }
}

#[cold]
fn bad_make(interp: &Interp<'_>, type_name: &str, spec: &Cell) -> Escape {
    errors::bad_make(type_name, mold::mold(interp.heap, spec, false)).into()
}

/// Add the body's set-words to `frame`, bind a copy of the body to it and
/// evaluate that copy for its side effects.
fn make_object(interp: &mut Interp<'_>, mut frame: Frame, body: &Cell) -> EvalResult {
    let items = interp.heap.array_items(body)?;
    for key in interp.heap.collect_set_words(&items) {
        frame.add(key, layout::none());
    }
    let id = interp.heap.alloc_frame(frame);
    let object = layout::context(tag::OBJECT, id);
    run_in_frame(interp, id, body)?;
    Ok(object)
}

fn run_in_frame(interp: &mut Interp<'_>, id: FrameId, body: &Cell) -> Result<(), Escape> {
    let body = interp.heap.copy_series(body, true)?;
    interp.heap.bind_array(&body, id, BindMode::ExistingOnly)?;
    interp.do_array(&body)?;
    Ok(())
}

/// A string makes a user error with that message; a block fills in the
/// standard error fields.
fn make_error(interp: &mut Interp<'_>, spec: &Cell) -> EvalResult {
    let t = layout::tag_of(spec);
    if layout::is_string_tag(t) {
        let message = interp.heap.text_string(spec)?;
        return Ok(interp.heap.make_error(&errors::user(message)));
    }
    if t == tag::BLOCK {
        let error = interp.heap.make_error(&errors::user(""));
        run_in_frame(interp, layout::frame_id(&error), spec)?;
        return Ok(error);
    }
    Err(bad_make(interp, "error!", spec))
}

fn to_integer(interp: &Interp<'_>, spec: &Cell) -> Option<Cell> {
    if layout::integer_value(spec).is_some() {
        return Some(*spec);
    }
    if let Some(d) = layout::decimal_value(spec) {
        if !d.is_finite() || d.abs() >= 9.223_372_036_854_776e18 {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "range checked above, truncation toward zero intended"
        )]
        return Some(layout::integer(d.trunc() as i64));
    }
    if let Some(b) = layout::logic_value(spec) {
        return Some(layout::integer(i64::from(b)));
    }
    if let Some(c) = layout::char_value(spec) {
        return Some(layout::integer(i64::from(u32::from(c))));
    }
    if layout::is_string_tag(layout::tag_of(spec)) {
        let text = interp.heap.text_string(spec).ok()?;
        return text.trim().parse::<i64>().ok().map(layout::integer);
    }
    None
}

fn to_decimal(interp: &Interp<'_>, spec: &Cell) -> Option<Cell> {
    if let Some(n) = layout::number_value(spec) {
        return Some(layout::decimal(n));
    }
    if layout::is_string_tag(layout::tag_of(spec)) {
        let text = interp.heap.text_string(spec).ok()?;
        return text.trim().parse::<f64>().ok().map(layout::decimal);
    }
    None
}

pub(super) fn copy(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let value = arg(args, 0);
    let t = layout::tag_of(&value);
    if layout::is_series_tag(t) {
        return Ok(interp.heap.copy_series(&value, flag(args, 1))?);
    }
    if layout::is_context_tag(t) {
        return Ok(interp.heap.copy_frame(&value)?);
    }
    Ok(value)
}

pub(super) fn quote(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    Ok(arg(args, 0))
}

pub(super) fn get(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let word = arg(args, 0);
    if !layout::is_word_tag(layout::tag_of(&word)) {
        return Err(wrong_type("get", "word", &word));
    }
    Ok(interp.heap.get_var(&word)?)
}

/// `set word value`, or `set [a b] [1 2]` assigning pairwise.
pub(super) fn set(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let target = arg(args, 0);
    let value = arg(args, 1);
    let t = layout::tag_of(&target);
    if layout::is_word_tag(t) {
        interp.heap.set_var(&target, value)?;
        return Ok(value);
    }
    if t == tag::BLOCK {
        let words = interp.heap.array_items(&target)?;
        let values = if layout::tag_of(&value) == tag::BLOCK {
            interp.heap.array_items(&value)?
        } else {
            vec![value; words.len()]
        };
        for (i, word) in words.iter().enumerate() {
            let v = values.get(i).copied().unwrap_or_else(layout::none);
            interp.heap.set_var(word, v)?;
        }
        return Ok(value);
    }
    Err(wrong_type("set", "word", &target))
}

/// Whether a word has a value. Non-words are values.
pub(super) fn value_q(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let value = arg(args, 0);
    if !layout::is_word_tag(layout::tag_of(&value)) {
        return Ok(layout::logic(true));
    }
    let has = interp
        .heap
        .get_var(&value)
        .is_ok_and(|v| !layout::is_unset(&v));
    Ok(layout::logic(has))
}

pub(super) fn type_q(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let name = type_name(&arg(args, 0));
    let lib = interp.heap.lib;
    let word = interp.heap.make_word(tag::WORD, name);
    Ok(interp
        .heap
        .bind_word(&word, lib, BindMode::ExistingOnly)?
        .unwrap_or(word))
}

macro_rules! type_tests {
    ($($name:ident => |$t:ident| $test:expr;)*) => {
        $(
            pub(super) fn $name(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
                let $t = layout::tag_of(&arg(args, 0));
                Ok(layout::logic($test))
            }
        )*
    };
}

type_tests! {
    unset_q => |t| t == tag::UNSET;
    none_q => |t| t == tag::NONE;
    logic_q => |t| t == tag::LOGIC;
    integer_q => |t| t == tag::INTEGER;
    decimal_q => |t| t == tag::DECIMAL;
    number_q => |t| t == tag::INTEGER || t == tag::DECIMAL;
    char_q => |t| t == tag::CHAR;
    string_q => |t| t == tag::STRING;
    word_q => |t| t == tag::WORD;
    block_q => |t| t == tag::BLOCK;
    series_q => |t| layout::is_series_tag(t);
    object_q => |t| t == tag::OBJECT;
    error_q => |t| t == tag::ERROR;
    function_q => |t| t == tag::FUNCTION || t == tag::NATIVE;
}
