use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::layout::{datatype_of, tag_of};
use ren_cell::Datatype;

fn scan_ok(heap: &mut Heap, source: &str) -> Vec<Cell> {
    match scan(heap, source) {
        Ok(items) => items,
        Err(e) => panic!("scan of {source:?} failed: {e}"),
    }
}

fn types(heap: &mut Heap, source: &str) -> Vec<Datatype> {
    scan_ok(heap, source)
        .iter()
        .filter_map(datatype_of)
        .collect()
}

#[test]
fn scalar_literals() {
    let mut heap = Heap::new();
    let items = scan_ok(&mut heap, "10 -3 2.5 #\"a\" #\"^/\"");
    assert_eq!(layout::integer_value(&items[0]), Some(10));
    assert_eq!(layout::integer_value(&items[1]), Some(-3));
    assert_eq!(layout::decimal_value(&items[2]), Some(2.5));
    assert_eq!(layout::char_value(&items[3]), Some('a'));
    assert_eq!(layout::char_value(&items[4]), Some('\n'));
}

#[test]
fn word_family_sigils() {
    let mut heap = Heap::new();
    assert_eq!(
        types(&mut heap, "a b: :c 'd /e #f"),
        vec![
            Datatype::Word,
            Datatype::SetWord,
            Datatype::GetWord,
            Datatype::LitWord,
            Datatype::Refinement,
            Datatype::Issue,
        ]
    );
}

#[test]
fn operators_are_words() {
    let mut heap = Heap::new();
    let items = scan_ok(&mut heap, "+ - * / = == <> < > <= >=");
    assert_eq!(items.len(), 11);
    assert!(items.iter().all(|c| tag_of(c) == tag::WORD));
    assert_eq!(heap.name(&items[3]), "/");
    assert_eq!(heap.name(&items[6]), "<>");
}

#[test]
fn strings_and_locators() {
    let mut heap = Heap::new();
    let items = scan_ok(
        &mut heap,
        r#""a^"b^/" {x {y} z} <tag attr> %dir/file.r http://example.com/x"#,
    );
    assert_eq!(heap.text_string(&items[0]).ok().as_deref(), Some("a\"b\n"));
    assert_eq!(heap.text_string(&items[1]).ok().as_deref(), Some("x {y} z"));
    assert_eq!(tag_of(&items[2]), tag::TAG);
    assert_eq!(heap.text_string(&items[2]).ok().as_deref(), Some("tag attr"));
    assert_eq!(tag_of(&items[3]), tag::FILE);
    assert_eq!(heap.text_string(&items[3]).ok().as_deref(), Some("dir/file.r"));
    assert_eq!(tag_of(&items[4]), tag::URL);
    assert_eq!(
        heap.text_string(&items[4]).ok().as_deref(),
        Some("http://example.com/x")
    );
}

#[test]
fn nested_blocks_and_groups() {
    let mut heap = Heap::new();
    let items = scan_ok(&mut heap, "[1 [2 3] (4)] ; trailing comment");
    assert_eq!(items.len(), 1);
    let outer = heap.array_items(&items[0]).unwrap_or_default();
    assert_eq!(outer.len(), 3);
    assert_eq!(tag_of(&outer[1]), tag::BLOCK);
    assert_eq!(tag_of(&outer[2]), tag::PAREN);
}

#[test]
fn path_variants() {
    let mut heap = Heap::new();
    assert_eq!(
        types(&mut heap, "a/b a/1: :a/b 'a/b a/(1 + 1)"),
        vec![
            Datatype::Path,
            Datatype::SetPath,
            Datatype::GetPath,
            Datatype::LitPath,
            Datatype::Path,
        ]
    );
}

#[test]
fn path_segments_can_be_groups_and_get_words() {
    let mut heap = Heap::new();
    let items = scan_ok(&mut heap, "b/(i + 1) o/:k");
    assert_eq!(items.len(), 2);
    let computed = heap.array_items(&items[0]).unwrap_or_default();
    assert_eq!(computed.len(), 2);
    assert_eq!(tag_of(&computed[1]), tag::PAREN);
    let indirect = heap.array_items(&items[1]).unwrap_or_default();
    assert_eq!(tag_of(&indirect[1]), tag::GET_WORD);
}

#[test]
fn unbalanced_input_fails() {
    let mut heap = Heap::new();
    assert_eq!(scan(&mut heap, "[1 2"), Err(errors::missing(']', '[')));
    assert!(scan(&mut heap, "1 2]").is_err());
    assert!(scan(&mut heap, "\"open").is_err());
    assert!(scan(&mut heap, "12abc").is_err());
}

#[test]
fn tag_needs_a_closing_bracket_on_the_line() {
    let mut heap = Heap::new();
    let items = scan_ok(&mut heap, "a <b\n> c");
    assert_eq!(heap.name(&items[1]), "<b");
}

proptest! {
    #[test]
    fn integer_literals_round_trip(n in any::<i64>()) {
        let mut heap = Heap::new();
        let items = scan(&mut heap, &n.to_string());
        prop_assert_eq!(items.map(|v| v.first().and_then(layout::integer_value)), Ok(Some(n)));
    }
}
