use pretty_assertions::assert_eq;

use super::*;
use crate::scan::scan;

fn first(heap: &mut Heap, source: &str) -> Cell {
    scan(heap, source)
        .ok()
        .and_then(|items| items.first().copied())
        .unwrap_or_else(layout::unset)
}

#[test]
fn mold_reproduces_source() {
    let mut heap = Heap::new();
    for source in [
        "[1 2.5 #\"a\" \"s^\"q\" <t> %f.r a b: :c 'd /e #f]",
        "(1 [2])",
        "a/b/1",
        "a/b:",
        ":a/b",
        "'a/b",
        "http://x.org",
    ] {
        let cell = first(&mut heap, source);
        assert_eq!(mold(&heap, &cell, false), source);
    }
}

#[test]
fn form_drops_delimiters() {
    let mut heap = Heap::new();
    let block = first(&mut heap, "[1 \"two\" [3 four] <t>]");
    assert_eq!(form(&heap, &block), "1 two 3 four <t>");
    assert_eq!(form(&heap, &layout::none()), "none");
    assert_eq!(form(&heap, &layout::unset()), "");
}

#[test]
fn decimals_keep_a_fraction() {
    assert_eq!(format_decimal(1.0), "1.0");
    assert_eq!(format_decimal(-0.25), "-0.25");
}

#[test]
fn mold_all_uses_construction_syntax() {
    let heap = Heap::new();
    assert_eq!(mold(&heap, &layout::none(), true), "#[none]");
    assert_eq!(mold(&heap, &layout::logic(true), true), "#[true]");
    assert_eq!(mold(&heap, &layout::logic(true), false), "true");
}

#[test]
fn control_characters_are_escaped() {
    let mut heap = Heap::new();
    let text = heap.make_text(tag::STRING, "a\tb\u{1}^");
    assert_eq!(mold(&heap, &text, false), "\"a^-b^(01)^^\"");
}

#[test]
fn self_referencing_block_terminates() {
    let mut heap = Heap::new();
    let block = heap.make_array(tag::BLOCK, vec![layout::integer(1)]);
    if let Ok(items) = heap.array_mut(layout::series_id(&block)) {
        items.push(block);
    }
    assert_eq!(mold(&heap, &block, false), "[1 [...]]");
}

#[test]
fn molds_from_the_series_index() {
    let mut heap = Heap::new();
    let block = first(&mut heap, "[1 2 3]");
    let advanced = layout::with_index(&block, 2);
    assert_eq!(mold(&heap, &advanced, false), "[3]");
}
