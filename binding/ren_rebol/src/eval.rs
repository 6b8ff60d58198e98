//! The evaluator.
//!
//! Evaluation walks an array cell by cell. Each step evaluates one
//! expression: a word fetches (and invokes, if it names a function), a
//! set-word assigns the following expression, groups evaluate in place,
//! paths select into objects and series or pass refinements to functions,
//! and infix operators combine left to right with the value before them.
//!
//! Non-local exits (errors, throws, `return`, `break`, cancellation) travel
//! as the `Err` side of [`EvalResult`] until something handles them.

pub(crate) mod call;
mod path;

use ren_cell::{CancelFlag, Cell, EngineConfig};

use crate::errors::{self, ErrorKind};
use crate::heap::{Heap, SeriesId};
use crate::layout::{self, tag};
use crate::natives;
use crate::stack::ensure_sufficient_stack;

/// Why evaluation stopped early.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Escape {
    /// An error raised by the backend, not yet turned into an `error!` value.
    Raise(ErrorKind),
    /// An `error!` value raised with `do`.
    Error(Cell),
    Throw { value: Cell, name: Option<Cell> },
    Return(Cell),
    Break(Option<Cell>),
    /// The cancel flag was raised, or `halt`/`quit` ran.
    Halt,
}

impl From<ErrorKind> for Escape {
    fn from(kind: ErrorKind) -> Self {
        Escape::Raise(kind)
    }
}

pub(crate) type EvalResult = Result<Cell, Escape>;

/// Evaluation state for one top-level operation.
pub(crate) struct Interp<'a> {
    pub(crate) heap: &'a mut Heap,
    pub(crate) config: &'a EngineConfig,
    cancel: &'a CancelFlag,
    depth: usize,
}

impl<'a> Interp<'a> {
    pub(crate) fn new(heap: &'a mut Heap, config: &'a EngineConfig, cancel: &'a CancelFlag) -> Self {
        Interp {
            heap,
            config,
            cancel,
            depth: 0,
        }
    }

    /// Turn a raised error into an `error!` value. Other escapes pass through.
    pub(crate) fn materialize(&mut self, escape: Escape) -> Escape {
        match escape {
            Escape::Raise(kind) => Escape::Error(self.heap.make_error(&kind)),
            other => other,
        }
    }

    fn enter(&mut self) -> Result<(), Escape> {
        if let Some(limit) = self.config.max_depth {
            if self.depth >= limit {
                return Err(errors::stack_overflow(limit).into());
            }
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Evaluate an array cell's contents from its index.
    pub(crate) fn do_array(&mut self, array: &Cell) -> EvalResult {
        let t = layout::tag_of(array);
        if !layout::is_array_tag(t) {
            return Ok(*array);
        }
        self.do_series(layout::series_id(array), layout::series_index(array))
    }

    fn do_series(&mut self, sid: SeriesId, start: usize) -> EvalResult {
        self.enter()?;
        let result = ensure_sufficient_stack(|| {
            let mut pos = start;
            let mut last = layout::unset();
            while pos < self.heap.series_len(sid)? {
                let (value, next) = self.eval_step(sid, pos)?;
                last = value;
                pos = next;
            }
            Ok(last)
        });
        self.leave();
        result
    }

    /// Evaluate every expression of an array and collect the results.
    pub(crate) fn reduce(&mut self, array: &Cell) -> Result<Vec<Cell>, Escape> {
        let sid = layout::series_id(array);
        let mut pos = layout::series_index(array);
        let mut out = Vec::new();
        while pos < self.heap.series_len(sid)? {
            let (value, next) = self.eval_step(sid, pos)?;
            out.push(value);
            pos = next;
        }
        Ok(out)
    }

    /// One full expression at `pos`, including trailing infix operators.
    /// Returns the value and the position after the expression.
    pub(crate) fn eval_step(&mut self, sid: SeriesId, pos: usize) -> Result<(Cell, usize), Escape> {
        if self.cancel.is_raised() {
            self.cancel.take();
            return Err(Escape::Halt);
        }
        let (mut value, mut next) = self.eval_prefix(sid, pos)?;
        while let Some(item) = self.heap.array_at(sid, next)? {
            let Some(op) = self.infix_native(&item) else {
                break;
            };
            if next + 1 >= self.heap.series_len(sid)? {
                let name = self.heap.name(&item).to_owned();
                return Err(errors::no_arg(&name, "value2").into());
            }
            let (rhs, after) = self.eval_prefix(sid, next + 1)?;
            value = self.call_native(op, &[value, rhs])?;
            next = after;
        }
        Ok((value, next))
    }

    /// Native table index of the infix operator a word refers to, if any.
    fn infix_native(&self, item: &Cell) -> Option<usize> {
        if layout::tag_of(item) != tag::WORD {
            return None;
        }
        let value = self.heap.get_var(item).ok()?;
        if layout::tag_of(&value) != tag::NATIVE {
            return None;
        }
        let index = layout::native_index(&value);
        natives::lookup(index)
            .filter(|def| def.infix)
            .map(|_| index)
    }

    /// One expression without infix continuation.
    fn eval_prefix(&mut self, sid: SeriesId, pos: usize) -> Result<(Cell, usize), Escape> {
        let Some(cell) = self.heap.array_at(sid, pos)? else {
            return Err(errors::past_end().into());
        };
        if self.config.trace {
            tracing::trace!(series = sid, pos, tag = layout::tag_of(&cell), "step");
        }
        match layout::tag_of(&cell) {
            tag::WORD => {
                let value = self.heap.get_var(&cell)?;
                match layout::tag_of(&value) {
                    tag::NATIVE | tag::FUNCTION => {
                        let label = self.heap.name(&cell).to_owned();
                        self.invoke(value, &label, &[], sid, pos + 1)
                    }
                    tag::UNSET => Err(errors::no_value(self.heap.name(&cell)).into()),
                    _ => Ok((value, pos + 1)),
                }
            }
            tag::SET_WORD => {
                if pos + 1 >= self.heap.series_len(sid)? {
                    return Err(errors::need_value(self.heap.name(&cell)).into());
                }
                let (value, next) = self.eval_step(sid, pos + 1)?;
                if layout::is_unset(&value) {
                    return Err(errors::need_value(self.heap.name(&cell)).into());
                }
                self.heap.set_var(&cell, value)?;
                Ok((value, next))
            }
            tag::GET_WORD => Ok((self.heap.get_var(&cell)?, pos + 1)),
            tag::LIT_WORD => Ok((layout::retag(&cell, tag::WORD), pos + 1)),
            tag::PAREN => Ok((self.do_array(&cell)?, pos + 1)),
            tag::PATH => self.eval_path(&cell, sid, pos + 1, true),
            tag::GET_PATH => self.eval_path(&cell, sid, pos + 1, false),
            tag::LIT_PATH => Ok((layout::retag(&cell, tag::PATH), pos + 1)),
            tag::SET_PATH => {
                if pos + 1 >= self.heap.series_len(sid)? {
                    let shown = crate::mold::mold(self.heap, &cell, false);
                    return Err(errors::need_value(&shown).into());
                }
                let (value, next) = self.eval_step(sid, pos + 1)?;
                self.set_path(&cell, value)?;
                Ok((value, next))
            }
            tag::NATIVE | tag::FUNCTION => {
                let label = crate::mold::form(self.heap, &cell);
                self.invoke(cell, &label, &[], sid, pos + 1)
            }
            _ => Ok((cell, pos + 1)),
        }
    }
}

#[cfg(test)]
mod tests;
