#![allow(clippy::unwrap_used, reason = "tests")]

use super::*;

#[test]
fn braces_default_to_block() {
    assert_eq!(braces_of(Datatype::Block), Datatype::Block);
    assert_eq!(braces_of(Datatype::Path), Datatype::Block);
    assert_eq!(braces_of(Datatype::Group), Datatype::Block);
}

#[cfg(feature = "rebol")]
mod rebol {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{loadables, EngineConfig, Integer, Series};

    fn engine() -> Engine {
        Engine::new(EngineConfig::default())
    }

    #[test]
    fn source_and_values_splice_flat() {
        let engine = engine();
        let ten = AnyValue::with_engine(10, &engine);
        let block = Block::new_in(&["print".into(), "1 +".into(), ten.into()], &engine).unwrap();
        assert_eq!(block.mold().unwrap(), "[print 1 + 10]");
        assert_eq!(block.length().unwrap(), 4);
    }

    #[test]
    fn empty_and_default_construction_agree() {
        let engine = engine();
        let a = Block::empty_in(&engine).unwrap();
        let b = Block::new_in(&[], &engine).unwrap();
        assert!(a.is_equal_to(&b).unwrap());
        assert_eq!(a.mold().unwrap(), "[]");
        assert_eq!(Group::empty_in(&engine).unwrap().mold().unwrap(), "()");
    }

    #[test]
    fn braces_inside_a_block_are_blocks() {
        let engine = engine();
        let block = Block::new_in(&loadables!["a", {"b", {"c"}}], &engine).unwrap();
        assert_eq!(block.mold().unwrap(), "[a [b [c]]]");
    }

    #[test]
    fn braces_inside_other_arrays_defer_outward() {
        let engine = engine();
        let group = Group::new_in(&loadables!["a", {"b"}], &engine).unwrap();
        assert_eq!(group.mold().unwrap(), "(a [b])");
    }

    #[test]
    fn with_braces_names_the_outer_builder() {
        let engine = engine();
        // Group declares no brace type of its own, so nested groups keep it.
        let block = Block::with_braces_in::<Group>(&loadables!["a", {"b", {"c"}}], &engine).unwrap();
        assert_eq!(block.mold().unwrap(), "[a (b (c))]");
        // A Block brace type resets nesting to blocks.
        let group = Group::with_braces_in::<Block>(&loadables![{"x", {"y"}}], &engine).unwrap();
        assert_eq!(group.mold().unwrap(), "([x [y]])");
    }

    #[test]
    fn from_values_keeps_values_as_is() {
        let engine = engine();
        let values = [
            AnyValue::with_engine(1, &engine),
            Block::empty_in(&engine).unwrap().into(),
        ];
        let block = Block::from_values(&values).unwrap();
        assert_eq!(block.mold().unwrap(), "[1 []]");
    }

    #[test]
    fn run_evaluates_contents() {
        let engine = engine();
        let block = Block::new_in(&["1 + 2".into()], &engine).unwrap();
        assert_eq!(block.run().unwrap().unwrap().cast::<Integer>().unwrap().value(), 3);
        let group: Group = block.to_array();
        assert_eq!(group.run().unwrap().unwrap().cast::<Integer>().unwrap().value(), 3);
    }

    #[test]
    fn paths_select_and_assign() {
        let engine = engine();
        engine.eval(&["obj: make object! [n: 1]".into()]).unwrap();

        let get = AnyValue::load_in(":obj/n", &engine).unwrap().cast::<GetPath>().unwrap();
        assert_eq!(get.get().unwrap().unwrap().cast::<Integer>().unwrap().value(), 1);

        let set = AnyValue::load_in("obj/n:", &engine).unwrap().cast::<SetPath>().unwrap();
        let assigned = set.call(&["40 + 2".into()]).unwrap();
        assert_eq!(assigned.cast::<Integer>().unwrap().value(), 42);

        let path = AnyValue::load_in("obj/n", &engine).unwrap().cast::<Path>().unwrap();
        assert_eq!(path.call(&[]).unwrap().unwrap().cast::<Integer>().unwrap().value(), 42);
    }

    #[test]
    fn in_context_binds_source_there() {
        let engine = engine();
        let ctx = crate::Context::new_in(&engine).unwrap();
        ctx.set("v", AnyValue::with_engine(8, &engine)).unwrap();
        let block = Block::in_context(&["v".into()], &ctx).unwrap();
        assert_eq!(block.run().unwrap().unwrap().cast::<Integer>().unwrap().value(), 8);
    }
}

#[cfg(feature = "red")]
#[test]
fn red_arrays_are_not_ready() {
    let engine = Engine::new(crate::EngineConfig::default());
    assert!(matches!(
        Block::new_in(&[], &engine),
        Err(RenError::NotImplemented { .. })
    ));
}
