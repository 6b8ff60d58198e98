//! Value comparison: `equal?`, `strict-equal?` and ordering.

use std::cmp::Ordering;

use ren_cell::Cell;

use crate::heap::Heap;
use crate::layout::{self, tag};
use crate::stack::ensure_sufficient_stack;

/// Nesting beyond which arrays compare by identity.
const MAX_COMPARE_DEPTH: usize = 256;

/// `equal?` (loose) or `strict-equal?`.
///
/// Loose equality ignores case in words, strings and characters and
/// compares integers with decimals numerically. Strict equality requires
/// identical types and exact text.
pub(crate) fn equal(heap: &Heap, a: &Cell, b: &Cell, strict: bool) -> bool {
    equal_at(heap, a, b, strict, 0)
}

fn equal_at(heap: &Heap, a: &Cell, b: &Cell, strict: bool, depth: usize) -> bool {
    let (ta, tb) = (layout::tag_of(a), layout::tag_of(b));
    if ta != tb {
        if strict {
            return false;
        }
        return match (layout::number_value(a), layout::number_value(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        };
    }
    match ta {
        tag::INTEGER | tag::LOGIC | tag::NONE | tag::UNSET => a.payload() == b.payload(),
        tag::DECIMAL => layout::decimal_value(a) == layout::decimal_value(b),
        tag::CHAR => {
            let (x, y) = (layout::char_value(a), layout::char_value(b));
            if strict {
                x == y
            } else {
                x.map(fold_char) == y.map(fold_char)
            }
        }
        t if layout::is_word_tag(t) => {
            let (x, y) = (layout::word_symbol(a), layout::word_symbol(b));
            if strict {
                x == y
            } else {
                heap.symbols.same_spelling(x, y)
            }
        }
        t if layout::is_string_tag(t) => {
            let (Ok(x), Ok(y)) = (heap.text_string(a), heap.text_string(b)) else {
                return false;
            };
            if strict {
                x == y
            } else {
                x.chars().map(fold_char).eq(y.chars().map(fold_char))
            }
        }
        t if layout::is_array_tag(t) => {
            if a == b {
                return true;
            }
            if depth >= MAX_COMPARE_DEPTH {
                return false;
            }
            let (Ok(xs), Ok(ys)) = (heap.array_items(a), heap.array_items(b)) else {
                return false;
            };
            xs.len() == ys.len()
                && ensure_sufficient_stack(|| {
                    xs.iter()
                        .zip(ys.iter())
                        .all(|(x, y)| equal_at(heap, x, y, strict, depth + 1))
                })
        }
        _ => a == b,
    }
}

/// Ordering for `<`, `>`, `<=`, `>=`. `None` when the values don't order.
pub(crate) fn order(heap: &Heap, a: &Cell, b: &Cell) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (layout::number_value(a), layout::number_value(b)) {
        if let (Some(i), Some(j)) = (layout::integer_value(a), layout::integer_value(b)) {
            return Some(i.cmp(&j));
        }
        return x.partial_cmp(&y);
    }
    let (ta, tb) = (layout::tag_of(a), layout::tag_of(b));
    if ta != tb {
        return None;
    }
    match ta {
        tag::CHAR => Some(
            layout::char_value(a)
                .map(fold_char)
                .cmp(&layout::char_value(b).map(fold_char)),
        ),
        t if layout::is_string_tag(t) => {
            let x = heap.text_string(a).ok()?;
            let y = heap.text_string(b).ok()?;
            Some(x.chars().map(fold_char).cmp(y.chars().map(fold_char)))
        }
        t if layout::is_word_tag(t) => {
            let x = heap.name(a).to_lowercase();
            let y = heap.name(b).to_lowercase();
            Some(x.cmp(&y))
        }
        _ => None,
    }
}

fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;

    fn two(heap: &mut Heap, source: &str) -> (Cell, Cell) {
        let items = scan(heap, source).unwrap_or_default();
        (items[0], items[1])
    }

    #[test]
    fn loose_equality_ignores_case_and_numeric_type() {
        let mut heap = Heap::new();
        let (a, b) = two(&mut heap, "\"Abc\" \"aBC\"");
        assert!(equal(&heap, &a, &b, false));
        assert!(!equal(&heap, &a, &b, true));

        let (a, b) = two(&mut heap, "1 1.0");
        assert!(equal(&heap, &a, &b, false));
        assert!(!equal(&heap, &a, &b, true));

        let (a, b) = two(&mut heap, "Foo foo");
        assert!(equal(&heap, &a, &b, false));
    }

    #[test]
    fn separately_loaded_blocks_are_equal_but_distinct() {
        let mut heap = Heap::new();
        let (a, b) = two(&mut heap, "[1 \"x\"] [1 \"X\"]");
        assert!(equal(&heap, &a, &b, false));
        assert_ne!(a, b);
    }

    #[test]
    fn ordering_of_mixed_numbers_and_text() {
        let mut heap = Heap::new();
        let (a, b) = two(&mut heap, "1 2.5");
        assert_eq!(order(&heap, &a, &b), Some(Ordering::Less));
        let (a, b) = two(&mut heap, "\"b\" \"A\"");
        assert_eq!(order(&heap, &a, &b), Some(Ordering::Greater));
        let (a, b) = two(&mut heap, "1 \"a\"");
        assert_eq!(order(&heap, &a, &b), None);
    }
}
