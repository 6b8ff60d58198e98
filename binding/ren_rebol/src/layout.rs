//! How this backend lays values out in a [`Cell`].
//!
//! The low byte of the header is the type tag. The remaining fields depend on
//! the tag:
//!
//! | category        | `extra`         | `payload`                          |
//! |-----------------|-----------------|------------------------------------|
//! | logic           | 0               | 0 or 1                             |
//! | integer         | 0               | `i64` bits                         |
//! | decimal         | 0               | `f64` bits                         |
//! | char            | 0               | code point                         |
//! | series          | index           | series id                          |
//! | word            | slot in frame   | symbol (hi), frame id + 1 (lo)     |
//! | object / error  | 0               | frame id                           |
//! | function        | 0               | function node id                   |
//! | native          | 0               | index into the native table        |
//!
//! Tag 0 is never assigned, so a zeroed cell is recognizably invalid.

use ren_cell::{Cell, Datatype};

use crate::heap::{FrameId, FuncId, SeriesId};
use crate::symbols::Symbol;

pub(crate) mod tag {
    pub const UNSET: u8 = 1;
    pub const NONE: u8 = 2;
    pub const LOGIC: u8 = 3;
    pub const INTEGER: u8 = 4;
    pub const DECIMAL: u8 = 5;
    pub const CHAR: u8 = 6;

    pub const STRING: u8 = 10;
    pub const FILE: u8 = 11;
    pub const URL: u8 = 13;
    pub const TAG: u8 = 14;

    pub const BLOCK: u8 = 20;
    pub const PAREN: u8 = 21;
    pub const PATH: u8 = 22;
    pub const SET_PATH: u8 = 23;
    pub const GET_PATH: u8 = 24;
    pub const LIT_PATH: u8 = 25;

    pub const WORD: u8 = 30;
    pub const SET_WORD: u8 = 31;
    pub const GET_WORD: u8 = 32;
    pub const LIT_WORD: u8 = 33;
    pub const REFINEMENT: u8 = 34;
    pub const ISSUE: u8 = 35;

    pub const NATIVE: u8 = 40;
    pub const FUNCTION: u8 = 41;
    pub const OBJECT: u8 = 45;
    pub const ERROR: u8 = 46;
}

#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "the tag is the low byte by construction"
)]
pub(crate) fn tag_of(cell: &Cell) -> u8 {
    (cell.header() & 0xff) as u8
}

#[inline]
pub(crate) fn set_tag(cell: &mut Cell, tag: u8) {
    cell.set_header((cell.header() & !0xff) | u32::from(tag));
}

pub(crate) fn datatype_of_tag(tag: u8) -> Option<Datatype> {
    Some(match tag {
        tag::UNSET => Datatype::Unset,
        tag::NONE => Datatype::None,
        tag::LOGIC => Datatype::Logic,
        tag::INTEGER => Datatype::Integer,
        tag::DECIMAL => Datatype::Float,
        tag::CHAR => Datatype::Character,
        tag::STRING => Datatype::String,
        tag::FILE => Datatype::File,
        tag::URL => Datatype::Url,
        tag::TAG => Datatype::Tag,
        tag::BLOCK => Datatype::Block,
        tag::PAREN => Datatype::Group,
        tag::PATH => Datatype::Path,
        tag::SET_PATH => Datatype::SetPath,
        tag::GET_PATH => Datatype::GetPath,
        tag::LIT_PATH => Datatype::LitPath,
        tag::WORD => Datatype::Word,
        tag::SET_WORD => Datatype::SetWord,
        tag::GET_WORD => Datatype::GetWord,
        tag::LIT_WORD => Datatype::LitWord,
        tag::REFINEMENT => Datatype::Refinement,
        tag::ISSUE => Datatype::Issue,
        tag::NATIVE => Datatype::Native,
        tag::FUNCTION => Datatype::Function,
        tag::OBJECT => Datatype::Object,
        tag::ERROR => Datatype::Error,
        _ => return None,
    })
}

pub(crate) const fn tag_of_datatype(datatype: Datatype) -> u8 {
    match datatype {
        Datatype::Unset => tag::UNSET,
        Datatype::None => tag::NONE,
        Datatype::Logic => tag::LOGIC,
        Datatype::Integer => tag::INTEGER,
        Datatype::Float => tag::DECIMAL,
        Datatype::Character => tag::CHAR,
        Datatype::String => tag::STRING,
        Datatype::File => tag::FILE,
        Datatype::Url => tag::URL,
        Datatype::Tag => tag::TAG,
        Datatype::Block => tag::BLOCK,
        Datatype::Group => tag::PAREN,
        Datatype::Path => tag::PATH,
        Datatype::SetPath => tag::SET_PATH,
        Datatype::GetPath => tag::GET_PATH,
        Datatype::LitPath => tag::LIT_PATH,
        Datatype::Word => tag::WORD,
        Datatype::SetWord => tag::SET_WORD,
        Datatype::GetWord => tag::GET_WORD,
        Datatype::LitWord => tag::LIT_WORD,
        Datatype::Refinement => tag::REFINEMENT,
        Datatype::Issue => tag::ISSUE,
        Datatype::Native => tag::NATIVE,
        Datatype::Function => tag::FUNCTION,
        Datatype::Object => tag::OBJECT,
        Datatype::Error => tag::ERROR,
    }
}

pub(crate) fn datatype_of(cell: &Cell) -> Option<Datatype> {
    datatype_of_tag(tag_of(cell))
}

#[inline]
pub(crate) fn is_array_tag(tag: u8) -> bool {
    (tag::BLOCK..=tag::LIT_PATH).contains(&tag)
}

#[inline]
pub(crate) fn is_string_tag(tag: u8) -> bool {
    (tag::STRING..=tag::TAG).contains(&tag)
}

#[inline]
pub(crate) fn is_series_tag(tag: u8) -> bool {
    is_array_tag(tag) || is_string_tag(tag)
}

#[inline]
pub(crate) fn is_word_tag(tag: u8) -> bool {
    (tag::WORD..=tag::ISSUE).contains(&tag)
}

#[inline]
pub(crate) fn is_context_tag(tag: u8) -> bool {
    tag == tag::OBJECT || tag == tag::ERROR
}

// Immediates.

pub(crate) const fn unset() -> Cell {
    Cell::new(tag::UNSET as u32, 0, 0)
}

pub(crate) const fn none() -> Cell {
    Cell::new(tag::NONE as u32, 0, 0)
}

pub(crate) const fn logic(value: bool) -> Cell {
    Cell::new(tag::LOGIC as u32, 0, value as u64)
}

pub(crate) fn integer(value: i64) -> Cell {
    Cell::new(u32::from(tag::INTEGER), 0, u64::from_ne_bytes(value.to_ne_bytes()))
}

pub(crate) fn decimal(value: f64) -> Cell {
    Cell::new(u32::from(tag::DECIMAL), 0, value.to_bits())
}

pub(crate) fn character(value: char) -> Cell {
    Cell::new(u32::from(tag::CHAR), 0, u64::from(u32::from(value)))
}

pub(crate) fn logic_value(cell: &Cell) -> Option<bool> {
    (tag_of(cell) == tag::LOGIC).then(|| cell.payload() != 0)
}

pub(crate) fn integer_value(cell: &Cell) -> Option<i64> {
    (tag_of(cell) == tag::INTEGER).then(|| i64::from_ne_bytes(cell.payload().to_ne_bytes()))
}

pub(crate) fn decimal_value(cell: &Cell) -> Option<f64> {
    (tag_of(cell) == tag::DECIMAL).then(|| f64::from_bits(cell.payload()))
}

pub(crate) fn char_value(cell: &Cell) -> Option<char> {
    if tag_of(cell) != tag::CHAR {
        return None;
    }
    char::from_u32(cell.payload_lo())
}

/// Integer or decimal as `f64`.
#[allow(
    clippy::cast_precision_loss,
    reason = "mixed arithmetic follows decimal semantics"
)]
pub(crate) fn number_value(cell: &Cell) -> Option<f64> {
    integer_value(cell)
        .map(|i| i as f64)
        .or_else(|| decimal_value(cell))
}

/// Everything except `none`, `false` and `unset` is true.
pub(crate) fn is_truthy(cell: &Cell) -> bool {
    match tag_of(cell) {
        tag::NONE | tag::UNSET => false,
        tag::LOGIC => cell.payload() != 0,
        _ => true,
    }
}

#[inline]
pub(crate) fn is_unset(cell: &Cell) -> bool {
    tag_of(cell) == tag::UNSET
}

// Series.

pub(crate) fn series(tag: u8, id: SeriesId, index: usize) -> Cell {
    Cell::new(u32::from(tag), index_to_extra(index), u64::from(id))
}

pub(crate) fn series_id(cell: &Cell) -> SeriesId {
    cell.payload_lo()
}

pub(crate) fn series_index(cell: &Cell) -> usize {
    cell.extra() as usize
}

pub(crate) fn with_index(cell: &Cell, index: usize) -> Cell {
    let mut out = *cell;
    out.set_extra(index_to_extra(index));
    out
}

fn index_to_extra(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

// Words.

pub(crate) fn word(tag: u8, symbol: Symbol, binding: Option<(FrameId, usize)>) -> Cell {
    let mut cell = Cell::new(u32::from(tag), 0, 0);
    let (frame, slot) = binding.map_or((0, 0), |(frame, slot)| (frame + 1, slot));
    cell.set_payload_parts(symbol.raw(), frame);
    cell.set_extra(index_to_extra(slot));
    cell
}

pub(crate) fn word_symbol(cell: &Cell) -> Symbol {
    Symbol::from_raw(cell.payload_hi())
}

pub(crate) fn word_binding(cell: &Cell) -> Option<(FrameId, usize)> {
    let frame = cell.payload_lo();
    (frame != 0).then(|| (frame - 1, cell.extra() as usize))
}

pub(crate) fn rebind(cell: &Cell, binding: Option<(FrameId, usize)>) -> Cell {
    word(tag_of(cell), word_symbol(cell), binding)
}

pub(crate) fn retag(cell: &Cell, tag: u8) -> Cell {
    let mut out = *cell;
    set_tag(&mut out, tag);
    out
}

// Contexts and functions.

pub(crate) fn context(tag: u8, frame: FrameId) -> Cell {
    Cell::new(u32::from(tag), 0, u64::from(frame))
}

pub(crate) fn frame_id(cell: &Cell) -> FrameId {
    cell.payload_lo()
}

pub(crate) fn function(id: FuncId) -> Cell {
    Cell::new(u32::from(tag::FUNCTION), 0, u64::from(id))
}

pub(crate) fn func_id(cell: &Cell) -> FuncId {
    cell.payload_lo()
}

pub(crate) fn native(index: usize) -> Cell {
    Cell::new(u32::from(tag::NATIVE), 0, index as u64)
}

pub(crate) fn native_index(cell: &Cell) -> usize {
    cell.payload_lo() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_datatype_has_a_distinct_tag() {
        let mut seen = std::collections::HashSet::new();
        for dt in Datatype::ALL {
            let tag = tag_of_datatype(dt);
            assert!(seen.insert(tag), "{dt} shares tag {tag}");
            assert_eq!(datatype_of_tag(tag), Some(dt));
        }
        assert_eq!(datatype_of_tag(0), None);
    }

    #[test]
    fn categories_agree_with_datatype() {
        for dt in Datatype::ALL {
            let tag = tag_of_datatype(dt);
            assert_eq!(is_array_tag(tag), dt.is_any_array(), "{dt}");
            assert_eq!(is_string_tag(tag), dt.is_any_string(), "{dt}");
            assert_eq!(is_word_tag(tag), dt.is_any_word(), "{dt}");
        }
    }

    #[test]
    fn immediates_read_back() {
        assert_eq!(integer_value(&integer(-5)), Some(-5));
        assert_eq!(decimal_value(&decimal(2.5)), Some(2.5));
        assert_eq!(char_value(&character('λ')), Some('λ'));
        assert_eq!(logic_value(&logic(true)), Some(true));
        assert_eq!(integer_value(&decimal(1.0)), None);
    }

    #[test]
    fn word_binding_round_trips() {
        let sym = Symbol::from_raw(9);
        let bound = word(tag::WORD, sym, Some((0, 3)));
        assert_eq!(word_binding(&bound), Some((0, 3)));
        assert_eq!(word_symbol(&bound), sym);
        let unbound = word(tag::SET_WORD, sym, None);
        assert_eq!(word_binding(&unbound), None);
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&none()));
        assert!(!is_truthy(&logic(false)));
        assert!(is_truthy(&integer(0)));
    }
}
