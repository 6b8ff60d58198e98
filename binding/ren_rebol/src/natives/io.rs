//! Output through the configured print handler, and text conversion.

use ren_cell::Cell;

use super::{arg, flag};
use crate::eval::{EvalResult, Interp};
use crate::layout::{self, tag};
use crate::mold;

/// Blocks are reduced and their values formed with spaces between them.
fn output_text(interp: &mut Interp<'_>, value: &Cell) -> Result<String, crate::eval::Escape> {
    if layout::tag_of(value) != tag::BLOCK {
        return Ok(mold::form(interp.heap, value));
    }
    let values = interp.reduce(value)?;
    let parts: Vec<String> = values
        .iter()
        .filter(|v| !layout::is_unset(v))
        .map(|v| mold::form(interp.heap, v))
        .collect();
    Ok(parts.join(" "))
}

pub(super) fn print(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let text = output_text(interp, &arg(args, 0))?;
    interp.config.print.println(&text);
    Ok(layout::unset())
}

pub(super) fn prin(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let text = output_text(interp, &arg(args, 0))?;
    interp.config.print.print(&text);
    Ok(layout::unset())
}

pub(super) fn mold(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let text = mold::mold(interp.heap, &arg(args, 0), flag(args, 1));
    Ok(interp.heap.make_text(tag::STRING, &text))
}

pub(super) fn form(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let text = mold::form(interp.heap, &arg(args, 0));
    Ok(interp.heap.make_text(tag::STRING, &text))
}
