//! The 128-bit value cell.
//!
//! A `Cell` is dead data: three fixed-width fields whose meaning is assigned
//! entirely by the backend that wrote them. The binding layer copies cells
//! around, hands them back to the backend, and (for series positions) asks the
//! backend to adjust the index, but never interprets the bits itself.

use std::fmt;

/// One interpreter datum in a fixed 16-byte layout.
///
/// # Layout
///
/// - `header`: datatype tag and flags (backend-defined encoding)
/// - `extra`: auxiliary 32 bits (series index, binding slot, ...)
/// - `payload`: 64 bits of data (integer bits, float bits, heap handles, ...)
///
/// The all-zero cell is the "trash" state. No backend assigns it a datatype,
/// so classifying it reports a structurally invalid cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Cell {
    header: u32,
    extra: u32,
    payload: u64,
}

const _: () = assert!(std::mem::size_of::<Cell>() == 16);

impl Cell {
    /// The zeroed, invalid cell.
    pub const TRASH: Cell = Cell {
        header: 0,
        extra: 0,
        payload: 0,
    };

    /// Assemble a cell from raw fields.
    #[inline]
    pub const fn new(header: u32, extra: u32, payload: u64) -> Self {
        Cell {
            header,
            extra,
            payload,
        }
    }

    #[inline]
    pub const fn header(&self) -> u32 {
        self.header
    }

    #[inline]
    pub fn set_header(&mut self, header: u32) {
        self.header = header;
    }

    #[inline]
    pub const fn extra(&self) -> u32 {
        self.extra
    }

    #[inline]
    pub fn set_extra(&mut self, extra: u32) {
        self.extra = extra;
    }

    #[inline]
    pub const fn payload(&self) -> u64 {
        self.payload
    }

    #[inline]
    pub fn set_payload(&mut self, payload: u64) {
        self.payload = payload;
    }

    /// High 32 bits of the payload.
    #[inline]
    pub const fn payload_hi(&self) -> u32 {
        (self.payload >> 32) as u32
    }

    /// Low 32 bits of the payload.
    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "truncation to the low word is the point"
    )]
    pub const fn payload_lo(&self) -> u32 {
        self.payload as u32
    }

    /// Store two 32-bit halves into the payload.
    #[inline]
    pub fn set_payload_parts(&mut self, hi: u32, lo: u32) {
        self.payload = (u64::from(hi) << 32) | u64::from(lo);
    }

    /// Whether every field is zero.
    #[inline]
    pub const fn is_trash(&self) -> bool {
        self.header == 0 && self.extra == 0 && self.payload == 0
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cell {{ header: {:#010x}, extra: {}, payload: {:#018x} }}",
            self.header, self.extra, self.payload
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_halves_round_trip() {
        let mut cell = Cell::TRASH;
        cell.set_payload_parts(7, 0xdead_beef);
        assert_eq!(cell.payload_hi(), 7);
        assert_eq!(cell.payload_lo(), 0xdead_beef);
    }

    #[test]
    fn default_is_trash() {
        assert!(Cell::default().is_trash());
        assert!(!Cell::new(1, 0, 0).is_trash());
    }
}
