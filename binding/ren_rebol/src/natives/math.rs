//! Arithmetic, comparison and logic.

use std::cmp::Ordering;

use ren_cell::Cell;

use super::{arg, wrong_type};
use crate::compare;
use crate::errors;
use crate::eval::{EvalResult, Interp};
use crate::layout;

#[derive(Copy, Clone)]
enum Op {
    Add,
    Subtract,
    Multiply,
}

impl Op {
    fn name(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Subtract => "subtract",
            Op::Multiply => "multiply",
        }
    }

    fn integers(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Op::Add => a.checked_add(b),
            Op::Subtract => a.checked_sub(b),
            Op::Multiply => a.checked_mul(b),
        }
    }

    fn decimals(self, a: f64, b: f64) -> f64 {
        match self {
            Op::Add => a + b,
            Op::Subtract => a - b,
            Op::Multiply => a * b,
        }
    }
}

/// Both operands as numbers, naming the offending argument otherwise.
fn operands(func: &str, args: &[Cell]) -> Result<(Cell, Cell), crate::eval::Escape> {
    let (a, b) = (arg(args, 0), arg(args, 1));
    if layout::number_value(&a).is_none() {
        return Err(wrong_type(func, "value1", &a));
    }
    if layout::number_value(&b).is_none() {
        return Err(wrong_type(func, "value2", &b));
    }
    Ok((a, b))
}

fn arithmetic(args: &[Cell], op: Op) -> EvalResult {
    let (a, b) = operands(op.name(), args)?;
    if let (Some(x), Some(y)) = (layout::integer_value(&a), layout::integer_value(&b)) {
        return op
            .integers(x, y)
            .map(layout::integer)
            .ok_or_else(|| errors::overflow().into());
    }
    let (x, y) = (number(&a), number(&b));
    Ok(layout::decimal(op.decimals(x, y)))
}

fn number(cell: &Cell) -> f64 {
    layout::number_value(cell).unwrap_or_default()
}

pub(super) fn add(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    arithmetic(args, Op::Add)
}

pub(super) fn subtract(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    arithmetic(args, Op::Subtract)
}

pub(super) fn multiply(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    arithmetic(args, Op::Multiply)
}

/// Integer division stays integral when exact.
pub(super) fn divide(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let (a, b) = operands("divide", args)?;
    if number(&b) == 0.0 {
        return Err(errors::zero_divide().into());
    }
    if let (Some(x), Some(y)) = (layout::integer_value(&a), layout::integer_value(&b)) {
        if x.checked_rem(y) == Some(0) {
            return x
                .checked_div(y)
                .map(layout::integer)
                .ok_or_else(|| errors::overflow().into());
        }
    }
    Ok(layout::decimal(number(&a) / number(&b)))
}

pub(super) fn remainder(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let (a, b) = operands("remainder", args)?;
    if number(&b) == 0.0 {
        return Err(errors::zero_divide().into());
    }
    if let (Some(x), Some(y)) = (layout::integer_value(&a), layout::integer_value(&b)) {
        return x
            .checked_rem(y)
            .map(layout::integer)
            .ok_or_else(|| errors::overflow().into());
    }
    Ok(layout::decimal(number(&a) % number(&b)))
}

pub(super) fn negate(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let value = arg(args, 0);
    if let Some(i) = layout::integer_value(&value) {
        return i
            .checked_neg()
            .map(layout::integer)
            .ok_or_else(|| errors::overflow().into());
    }
    if let Some(d) = layout::decimal_value(&value) {
        return Ok(layout::decimal(-d));
    }
    Err(wrong_type("negate", "number", &value))
}

pub(super) fn equal(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let same = compare::equal(interp.heap, &arg(args, 0), &arg(args, 1), false);
    Ok(layout::logic(same))
}

pub(super) fn not_equal(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let same = compare::equal(interp.heap, &arg(args, 0), &arg(args, 1), false);
    Ok(layout::logic(!same))
}

pub(super) fn strict_equal(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let same = compare::equal(interp.heap, &arg(args, 0), &arg(args, 1), true);
    Ok(layout::logic(same))
}

/// Identical cells: the same immediate, or the same series at the same index.
pub(super) fn same(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    Ok(layout::logic(arg(args, 0) == arg(args, 1)))
}

fn ordered(interp: &Interp<'_>, func: &str, args: &[Cell], accept: fn(Ordering) -> bool) -> EvalResult {
    let (a, b) = (arg(args, 0), arg(args, 1));
    match compare::order(interp.heap, &a, &b) {
        Some(ordering) => Ok(layout::logic(accept(ordering))),
        None => Err(wrong_type(func, "value2", &b)),
    }
}

pub(super) fn lesser(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    ordered(interp, "lesser?", args, Ordering::is_lt)
}

pub(super) fn greater(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    ordered(interp, "greater?", args, Ordering::is_gt)
}

pub(super) fn lesser_or_equal(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    ordered(interp, "lesser-or-equal?", args, Ordering::is_le)
}

pub(super) fn greater_or_equal(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    ordered(interp, "greater-or-equal?", args, Ordering::is_ge)
}

pub(super) fn not(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    Ok(layout::logic(!layout::is_truthy(&arg(args, 0))))
}

pub(super) fn and(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let (a, b) = (arg(args, 0), arg(args, 1));
    if let (Some(x), Some(y)) = (layout::integer_value(&a), layout::integer_value(&b)) {
        return Ok(layout::integer(x & y));
    }
    Ok(layout::logic(layout::is_truthy(&a) && layout::is_truthy(&b)))
}

pub(super) fn or(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let (a, b) = (arg(args, 0), arg(args, 1));
    if let (Some(x), Some(y)) = (layout::integer_value(&a), layout::integer_value(&b)) {
        return Ok(layout::integer(x | y));
    }
    Ok(layout::logic(layout::is_truthy(&a) || layout::is_truthy(&b)))
}
