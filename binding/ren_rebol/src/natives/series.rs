//! Series navigation and modification. Positions are 1-based and relative
//! to the series index; navigation clamps to the head and tail.

use ren_cell::Cell;

use super::{arg, flag, need_integer, need_series, wrong_type};
use crate::compare;
use crate::eval::{EvalResult, Interp};
use crate::heap::SeriesData;
use crate::layout;
use crate::mold;

/// Total length of the underlying series.
fn full_len(interp: &Interp<'_>, series: &Cell) -> Result<usize, crate::eval::Escape> {
    Ok(interp.heap.series_len(layout::series_id(series))?)
}

fn at_index(series: &Cell, index: i64, len: usize) -> Cell {
    let clamped = usize::try_from(index.max(0)).unwrap_or(usize::MAX).min(len);
    layout::with_index(series, clamped)
}

fn index_i64(series: &Cell) -> i64 {
    i64::try_from(layout::series_index(series)).unwrap_or(i64::MAX)
}

pub(super) fn first(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("first", "series", arg(args, 0))?;
    Ok(interp.pick(&series, 1)?.unwrap_or_else(layout::none))
}

pub(super) fn last(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("last", "series", arg(args, 0))?;
    let remaining = full_len(interp, &series)?.saturating_sub(layout::series_index(&series));
    let n = i64::try_from(remaining).unwrap_or(i64::MAX);
    Ok(interp.pick(&series, n)?.unwrap_or_else(layout::none))
}

pub(super) fn pick(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("pick", "series", arg(args, 0))?;
    let n = need_integer("pick", "index", &arg(args, 1))?;
    Ok(interp.pick(&series, n)?.unwrap_or_else(layout::none))
}

pub(super) fn poke(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("poke", "series", arg(args, 0))?;
    let n = need_integer("poke", "index", &arg(args, 1))?;
    let value = arg(args, 2);
    interp.poke_at(&series, n, value)?;
    Ok(value)
}

/// Appends at the tail and returns the series at its head. A block value
/// is spliced unless `/only` is used.
pub(super) fn append(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("append", "series", arg(args, 0))?;
    let value = arg(args, 1);
    let only = flag(args, 2);
    let id = layout::series_id(&series);
    if layout::is_array_tag(layout::tag_of(&series)) {
        let items = if !only && layout::tag_of(&value) == layout::tag::BLOCK {
            interp.heap.array_items(&value)?
        } else {
            vec![value]
        };
        interp.heap.array_mut(id)?.extend(items);
    } else {
        let text: String = if !only && layout::tag_of(&value) == layout::tag::BLOCK {
            let items = interp.heap.array_items(&value)?;
            items.iter().map(|item| mold::form(interp.heap, item)).collect()
        } else {
            mold::form(interp.heap, &value)
        };
        interp.heap.text_mut(id)?.extend(text.chars());
    }
    Ok(layout::with_index(&series, 0))
}

pub(super) fn length_q(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("length?", "series", arg(args, 0))?;
    let remaining = full_len(interp, &series)?.saturating_sub(layout::series_index(&series));
    Ok(layout::integer(i64::try_from(remaining).unwrap_or(i64::MAX)))
}

pub(super) fn head(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("head", "series", arg(args, 0))?;
    Ok(layout::with_index(&series, 0))
}

pub(super) fn tail(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("tail", "series", arg(args, 0))?;
    let len = full_len(interp, &series)?;
    Ok(layout::with_index(&series, len))
}

pub(super) fn next(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("next", "series", arg(args, 0))?;
    let len = full_len(interp, &series)?;
    Ok(at_index(&series, index_i64(&series).saturating_add(1), len))
}

pub(super) fn back(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("back", "series", arg(args, 0))?;
    let len = full_len(interp, &series)?;
    Ok(at_index(&series, index_i64(&series) - 1, len))
}

pub(super) fn skip(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("skip", "series", arg(args, 0))?;
    let offset = need_integer("skip", "offset", &arg(args, 1))?;
    let len = full_len(interp, &series)?;
    Ok(at_index(&series, index_i64(&series).saturating_add(offset), len))
}

/// `at s 1` is `s` itself; `at s 0` is one back.
pub(super) fn at(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("at", "series", arg(args, 0))?;
    let n = need_integer("at", "index", &arg(args, 1))?;
    let len = full_len(interp, &series)?;
    let offset = if n > 0 { n - 1 } else { n };
    Ok(at_index(&series, index_i64(&series).saturating_add(offset), len))
}

pub(super) fn index_q(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("index?", "series", arg(args, 0))?;
    Ok(layout::integer(index_i64(&series).saturating_add(1)))
}

pub(super) fn head_q(_: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("head?", "series", arg(args, 0))?;
    Ok(layout::logic(layout::series_index(&series) == 0))
}

pub(super) fn tail_q(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("tail?", "series", arg(args, 0))?;
    let len = full_len(interp, &series)?;
    Ok(layout::logic(layout::series_index(&series) >= len))
}

/// Position of `value` at or after the index, for arrays (by loose
/// equality) and strings (by case-insensitive substring).
fn position(interp: &Interp<'_>, series: &Cell, value: &Cell) -> Result<Option<usize>, crate::eval::Escape> {
    let start = layout::series_index(series);
    match interp.heap.series(layout::series_id(series))? {
        SeriesData::Array(items) => Ok(items
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, item)| compare::equal(interp.heap, item, value, false))
            .map(|(i, _)| i)),
        SeriesData::Text(chars) => {
            let needle: Vec<char> = mold::form(interp.heap, value).chars().flat_map(char::to_lowercase).collect();
            if needle.is_empty() {
                return Ok(None);
            }
            let hay: Vec<char> = chars.iter().map(|c| c.to_lowercase().next().unwrap_or(*c)).collect();
            Ok(hay
                .get(start.min(hay.len())..)
                .and_then(|rest| rest.windows(needle.len()).position(|w| w == needle.as_slice()))
                .map(|i| i + start))
        }
    }
}

pub(super) fn find(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("find", "series", arg(args, 0))?;
    let value = arg(args, 1);
    Ok(position(interp, &series, &value)?
        .map_or_else(layout::none, |i| layout::with_index(&series, i)))
}

pub(super) fn select(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = arg(args, 0);
    if !layout::is_array_tag(layout::tag_of(&series)) {
        return Err(wrong_type("select", "series", &series));
    }
    let value = arg(args, 1);
    let Some(i) = position(interp, &series, &value)? else {
        return Ok(layout::none());
    };
    Ok(interp
        .heap
        .array_at(layout::series_id(&series), i + 1)?
        .unwrap_or_else(layout::none))
}

/// Remove everything from the index to the tail.
pub(super) fn clear(interp: &mut Interp<'_>, args: &[Cell]) -> EvalResult {
    let series = need_series("clear", "series", arg(args, 0))?;
    let index = layout::series_index(&series);
    match interp.heap.series_mut(layout::series_id(&series))? {
        SeriesData::Array(items) => items.truncate(index),
        SeriesData::Text(chars) => chars.truncate(index),
    }
    Ok(series)
}
