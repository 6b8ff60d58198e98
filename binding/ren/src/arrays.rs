//! The array family: block, group (paren), and the four path types.

use ren_cell::Datatype;

use crate::loadable::{build, declared_braces};
use crate::subtype::{define_subtype, restamp};
use crate::{AnyValue, Context, Engine, Loadable, RenError, RenResult, Series};

/// Shared construction for every array subtype.
///
/// Brace groups in the items become arrays of the *brace type*. A `Block`
/// declares `Block`; the others declare nothing and take the brace type of
/// the nearest builder that does, which for a top-level build is `Block`.
/// [`AnyArray::with_braces`] supplies that outer builder explicitly.
pub trait AnyArray: Series {
    fn new(items: &[Loadable]) -> RenResult<Self> {
        Self::new_in(items, &Engine::current())
    }

    fn new_in(items: &[Loadable], engine: &Engine) -> RenResult<Self> {
        build_array(engine, braces_of(Self::DATATYPE), items, None)
    }

    /// Build with source items bound into `context`.
    fn in_context(items: &[Loadable], context: &Context) -> RenResult<Self> {
        build_array(
            context.engine(),
            braces_of(Self::DATATYPE),
            items,
            Some(context),
        )
    }

    /// Scan `source` as the array's contents.
    fn from_source(source: &str) -> RenResult<Self> {
        Self::new(&[Loadable::from(source)])
    }

    /// An array holding `values` as-is. The values must share one engine;
    /// an empty slice builds in the default engine.
    fn from_values(values: &[AnyValue]) -> RenResult<Self> {
        let engine = values.first().map_or_else(Engine::current, |v| v.engine().clone());
        let items: Vec<Loadable> = values.iter().map(Loadable::from).collect();
        Self::new_in(&items, &engine)
    }

    /// The empty array. Same representation as `new(&[])`.
    fn empty() -> RenResult<Self> {
        Self::new(&[])
    }

    fn empty_in(engine: &Engine) -> RenResult<Self> {
        Self::new_in(&[], engine)
    }

    /// Build as if nested in a `B` builder: brace groups become `B` arrays,
    /// and groups inside those follow `B`'s own brace type.
    fn with_braces<B: AnyArray>(items: &[Loadable]) -> RenResult<Self> {
        Self::with_braces_in::<B>(items, &Engine::current())
    }

    fn with_braces_in<B: AnyArray>(items: &[Loadable], engine: &Engine) -> RenResult<Self> {
        build_array(engine, B::DATATYPE, items, None)
    }

    /// The same series and index as another array type.
    fn to_array<T: AnyArray>(&self) -> T {
        restamp::<T>(self.as_value())
    }
}

fn braces_of(kind: Datatype) -> Datatype {
    declared_braces(kind).unwrap_or(Datatype::Block)
}

fn build_array<T: AnyArray>(
    engine: &Engine,
    braces: Datatype,
    items: &[Loadable],
    context: Option<&Context>,
) -> RenResult<T> {
    let cell = build(engine, T::DATATYPE, braces, items, context.map(|c| c.cell()))?;
    AnyValue::from_cell(cell, engine).into_cast()
}

define_subtype! {
    /// A `block!`: brackets, not evaluated unless run.
    Block => Datatype::Block
}

define_subtype! {
    /// A `paren!`: evaluated where it appears.
    Group => Datatype::Group
}

define_subtype! {
    Path => Datatype::Path
}

define_subtype! {
    SetPath => Datatype::SetPath
}

define_subtype! {
    GetPath => Datatype::GetPath
}

define_subtype! {
    LitPath => Datatype::LitPath
}

macro_rules! array_family {
    ($($name:ident),*) => {$(
        impl Series for $name {}
        impl AnyArray for $name {}
    )*};
}

array_family!(Block, Group, Path, SetPath, GetPath, LitPath);

impl Block {
    /// Evaluate the contents; the result of the last expression.
    pub fn run(&self) -> RenResult<Option<AnyValue>> {
        self.apply(&[])
    }
}

impl Group {
    pub fn run(&self) -> RenResult<Option<AnyValue>> {
        self.apply(&[])
    }
}

impl Path {
    /// Evaluate the path followed by `args`: a refined call, or a selection.
    pub fn call(&self, args: &[Loadable]) -> RenResult<Option<AnyValue>> {
        self.apply(args)
    }
}

impl SetPath {
    /// Assign the evaluation of `args` through the path.
    pub fn call(&self, args: &[Loadable]) -> RenResult<AnyValue> {
        self.apply(args)?
            .ok_or_else(|| RenError::usage("set-path assignment produced no value"))
    }
}

impl GetPath {
    pub fn get(&self) -> RenResult<Option<AnyValue>> {
        self.apply(&[])
    }
}

#[cfg(test)]
mod tests;
