//! Conditionals, loops, non-local exits and `func`.

use ren_cell::Cell;

use super::{arg, flag, need_block, need_integer, wrong_type};
use crate::errors;
use crate::eval::call::parse_spec;
use crate::eval::{Escape, EvalResult, Interp};
use crate::heap::{BindMode, Frame, FrameId, FuncNode};
use crate::layout::{self, tag};
use crate::scan::scan;

/// A block branch is evaluated; any other value is the result itself.
fn branch(interp: &mut Interp<'_>, value: &Cell) -> EvalResult {
    match layout::tag_of(value) {
        tag::BLOCK => interp.do_array(value),
        _ => Ok(*value),
    }
}

enum Pass {
    Next(Cell),
    Stop(Cell),
}

/// One run of a loop body; `break` ends the loop.
fn pass(interp: &mut Interp<'_>, body: &Cell) -> Result<Pass, Escape> {
    match interp.do_array(body) {
        Ok(value) => Ok(Pass::Next(value)),
        Err(Escape::Break(value)) => Ok(Pass::Stop(value.unwrap_or_else(layout::none))),
        Err(other) => Err(other),
    }
}

pub(super) fn if_(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let body = need_block("if", "then-block", arg(args, 1))?;
    if layout::is_truthy(&arg(args, 0)) {
        interp.do_array(&body)
    } else {
        Ok(layout::none())
    }
}

pub(super) fn either(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let chosen = if layout::is_truthy(&arg(args, 0)) {
        arg(args, 1)
    } else {
        arg(args, 2)
    };
    branch(interp, &chosen)
}

pub(super) fn while_(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let cond = need_block("while", "cond-block", arg(args, 0))?;
    let body = need_block("while", "body-block", arg(args, 1))?;
    let mut last = layout::none();
    while layout::is_truthy(&interp.do_array(&cond)?) {
        match pass(interp, &body)? {
            Pass::Next(value) => last = value,
            Pass::Stop(value) => return Ok(value),
        }
    }
    Ok(last)
}

pub(super) fn loop_(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let count = need_integer("loop", "count", &arg(args, 0))?;
    let body = need_block("loop", "block", arg(args, 1))?;
    let mut last = layout::none();
    for _ in 0..count.max(0) {
        match pass(interp, &body)? {
            Pass::Next(value) => last = value,
            Pass::Stop(value) => return Ok(value),
        }
    }
    Ok(last)
}

/// A frame holding loop variables, with a copy of `body` bound to it.
fn loop_frame(
    interp: &mut Interp<'_>,
    func: &str,
    words: &[Cell],
    body: &Cell,
) -> Result<(FrameId, Cell), Escape> {
    let mut frame = Frame::new(None);
    for word in words {
        if !layout::is_word_tag(layout::tag_of(word)) {
            return Err(wrong_type(func, "word", word));
        }
        let canon = interp.heap.symbols.canon(layout::word_symbol(word));
        frame.add(canon, layout::none());
    }
    let frame = interp.heap.alloc_frame(frame);
    let body = interp.heap.copy_series(body, true)?;
    interp.heap.bind_array(&body, frame, BindMode::ExistingOnly)?;
    Ok((frame, body))
}

pub(super) fn repeat(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let word = arg(args, 0);
    let count = need_integer("repeat", "count", &arg(args, 1))?;
    let body = need_block("repeat", "body", arg(args, 2))?;
    let (frame, body) = loop_frame(interp, "repeat", &[word], &body)?;
    let mut last = layout::none();
    for i in 1..=count.max(0) {
        interp.heap.frame_mut(frame)?.set(0, layout::integer(i));
        match pass(interp, &body)? {
            Pass::Next(value) => last = value,
            Pass::Stop(value) => return Ok(value),
        }
    }
    Ok(last)
}

/// `foreach word series body` or `foreach [a b] series body`, stepping
/// through the series one group of values at a time.
pub(super) fn foreach(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let words = arg(args, 0);
    let data = arg(args, 1);
    let body = need_block("foreach", "body", arg(args, 2))?;
    let words = if layout::tag_of(&words) == tag::BLOCK {
        interp.heap.array_items(&words)?
    } else {
        vec![words]
    };
    if words.is_empty() {
        return Err(wrong_type("foreach", "word", &arg(args, 0)));
    }
    let t = layout::tag_of(&data);
    let items: Vec<Cell> = if layout::is_array_tag(t) {
        interp.heap.array_items(&data)?
    } else if layout::is_string_tag(t) {
        interp
            .heap
            .text_string(&data)?
            .chars()
            .map(layout::character)
            .collect()
    } else {
        return Err(wrong_type("foreach", "data", &data));
    };

    let (frame, body) = loop_frame(interp, "foreach", &words, &body)?;
    let mut last = layout::none();
    for group in items.chunks(words.len()) {
        let f = interp.heap.frame_mut(frame)?;
        for slot in 0..words.len() {
            f.set(slot, group.get(slot).copied().unwrap_or_else(layout::none));
        }
        match pass(interp, &body)? {
            Pass::Next(value) => last = value,
            Pass::Stop(value) => return Ok(value),
        }
    }
    Ok(last)
}

/// Blocks evaluate, strings load then evaluate, errors are raised.
pub(super) fn do_(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let value = arg(args, 0);
    match layout::tag_of(&value) {
        tag::BLOCK | tag::PAREN => interp.do_array(&value),
        tag::STRING => {
            let source = interp.heap.text_string(&value)?;
            let mut items = scan(interp.heap, &source)?;
            let user = interp.heap.user;
            interp.heap.bind_deep(&mut items, user, BindMode::AddMissing)?;
            let block = interp.heap.make_array(tag::BLOCK, items);
            interp.do_array(&block)
        }
        tag::ERROR => Err(Escape::Error(value)),
        _ => Ok(value),
    }
}

pub(super) fn reduce(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let value = arg(args, 0);
    if layout::tag_of(&value) != tag::BLOCK {
        return Ok(value);
    }
    let items = interp.reduce(&value)?;
    Ok(interp.heap.make_array(tag::BLOCK, items))
}

/// Evaluate the block after the first true condition.
pub(super) fn case(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let block = need_block("case", "block", arg(args, 0))?;
    let sid = layout::series_id(&block);
    let mut pos = layout::series_index(&block);
    while pos < interp.heap.series_len(sid)? {
        let (cond, next) = interp.eval_step(sid, pos)?;
        let Some(body) = interp.heap.array_at(sid, next)? else {
            return Err(errors::no_arg("case", "block").into());
        };
        if layout::is_truthy(&cond) {
            return branch(interp, &body);
        }
        pos = next + 1;
    }
    Ok(layout::none())
}

/// First true value, or none.
pub(super) fn any(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let block = need_block("any", "block", arg(args, 0))?;
    let sid = layout::series_id(&block);
    let mut pos = layout::series_index(&block);
    while pos < interp.heap.series_len(sid)? {
        let (value, next) = interp.eval_step(sid, pos)?;
        if layout::is_truthy(&value) {
            return Ok(value);
        }
        pos = next;
    }
    Ok(layout::none())
}

/// Last value if all are true, otherwise none.
pub(super) fn all(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let block = need_block("all", "block", arg(args, 0))?;
    let sid = layout::series_id(&block);
    let mut pos = layout::series_index(&block);
    let mut last = layout::logic(true);
    while pos < interp.heap.series_len(sid)? {
        let (value, next) = interp.eval_step(sid, pos)?;
        if !layout::is_truthy(&value) {
            return Ok(layout::none());
        }
        last = value;
        pos = next;
    }
    Ok(last)
}

pub(super) fn break_(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let value = flag(args, 0).then(|| arg(args, 1));
    Err(Escape::Break(value))
}

pub(super) fn return_(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    Err(Escape::Return(arg(args, 0)))
}

pub(super) fn exit(_: &mut Interp<'_>, _: &[Cell]) -> EvalResult {
    Err(Escape::Return(layout::unset()))
}

pub(super) fn throw(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let name = flag(args, 1).then(|| layout::retag(&arg(args, 2), tag::WORD));
    Err(Escape::Throw {
        value: arg(args, 0),
        name,
    })
}

/// Without `/name` only unnamed throws are caught. With it, throws whose
/// name matches the given word (or any word in a block of names).
pub(super) fn catch(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let block = need_block("catch", "block", arg(args, 0))?;
    let named = flag(args, 1);
    let wanted = arg(args, 2);
    match interp.do_array(&block) {
        Err(Escape::Throw { value, name }) => {
            let caught = match (named, name) {
                (false, None) => true,
                (true, Some(thrown)) => name_matches(interp, &wanted, &thrown)?,
                _ => false,
            };
            if caught {
                Ok(value)
            } else {
                Err(Escape::Throw { value, name })
            }
        }
        other => other,
    }
}

fn name_matches(interp: &Interp<'_>, wanted: &Cell, thrown: &Cell) -> Result<bool, Escape> {
    let symbols = &interp.heap.symbols;
    let thrown = layout::word_symbol(thrown);
    let t = layout::tag_of(wanted);
    if layout::is_word_tag(t) {
        return Ok(symbols.same_spelling(layout::word_symbol(wanted), thrown));
    }
    if t == tag::BLOCK {
        let names = interp.heap.array_items(wanted)?;
        return Ok(names.iter().any(|n| {
            layout::is_word_tag(layout::tag_of(n)) && symbols.same_spelling(layout::word_symbol(n), thrown)
        }));
    }
    Err(wrong_type("catch", "word", wanted))
}

/// Errors become the result instead of propagating.
pub(super) fn try_(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let block = need_block("try", "block", arg(args, 0))?;
    match interp.do_array(&block) {
        Err(escape @ (Escape::Raise(_) | Escape::Error(_))) => match interp.materialize(escape) {
            Escape::Error(error) => Ok(error),
            other => Err(other),
        },
        other => other,
    }
}

pub(super) fn halt(_: &mut Interp<'_>, _: &[Cell]) -> EvalResult {
    Err(Escape::Halt)
}

pub(super) fn comment(_: &mut Interp<'_>, _: &[Cell]) -> EvalResult {
    Ok(layout::unset())
}

/// `func spec body`. The function keeps its own copies of both blocks.
pub(super) fn func(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let spec = need_block("func", "spec", arg(args, 0))?;
    let body = need_block("func", "body", arg(args, 1))?;
    let items = interp.heap.array_items(&spec)?;
    let params = parse_spec(interp.heap, &items)?;
    let spec = interp.heap.copy_series(&spec, true)?;
    let body = interp.heap.copy_series(&body, true)?;
    let id = interp.heap.alloc_func(FuncNode { params, spec, body });
    Ok(layout::function(id))
}
