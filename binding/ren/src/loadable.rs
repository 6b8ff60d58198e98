//! Deferred array contents.
//!
//! A [`Loadable`] is one element of an array literal or an apply argument
//! list: a finished value, source text still to be scanned, or a brace group
//! of further loadables. Nothing is converted until the enclosing array is
//! built, so `["print", "1 +", 2]` becomes one flat `[print 1 + 2]`.
//!
//! Brace groups become arrays of the *brace type* of the innermost builder
//! that declares one. `Block` declares `Block`; the other array types declare
//! none and defer outward, ending at `Block`.

use ren_cell::{Cell, Datatype, Loaded, Runtime};

use crate::{AnyValue, Engine, RenError, RenResult};

#[derive(Clone, Debug)]
pub enum Loadable {
    Value(AnyValue),
    /// Source text, scanned when the enclosing array is built.
    Source(String),
    /// A brace group, typed by the enclosing builder.
    Group(Vec<Loadable>),
}

impl From<&str> for Loadable {
    fn from(source: &str) -> Loadable {
        Loadable::Source(source.to_owned())
    }
}

impl From<String> for Loadable {
    fn from(source: String) -> Loadable {
        Loadable::Source(source)
    }
}

impl From<AnyValue> for Loadable {
    fn from(value: AnyValue) -> Loadable {
        Loadable::Value(value)
    }
}

impl From<&AnyValue> for Loadable {
    fn from(value: &AnyValue) -> Loadable {
        Loadable::Value(value.clone())
    }
}

/// An absent value loads as unset.
impl From<Option<AnyValue>> for Loadable {
    fn from(value: Option<AnyValue>) -> Loadable {
        Loadable::Value(value.unwrap_or_else(AnyValue::unset))
    }
}

impl From<Vec<Loadable>> for Loadable {
    fn from(group: Vec<Loadable>) -> Loadable {
        Loadable::Group(group)
    }
}

/// Build a `Vec<Loadable>`.
///
/// Items are separated by commas. A `{ ... }` item is a brace group holding
/// further items. Any other single token tree converts with `Loadable::from`,
/// so string literals are source, numbers and values are values, and longer
/// expressions go in parentheses.
///
/// ```
/// # use ren::{loadables, Loadable};
/// let items: Vec<Loadable> = loadables!["print", 10, {"a", {1}}];
/// assert_eq!(items.len(), 3);
/// ```
#[macro_export]
macro_rules! loadables {
    (@item { $($inner:tt)* }) => {
        $crate::Loadable::Group($crate::loadables![$($inner)*])
    };
    (@item $item:expr) => {
        $crate::Loadable::from($item)
    };
    ($($item:tt),* $(,)?) => {
        vec![$($crate::loadables!(@item $item)),*]
    };
}

/// Turn `items` into backend elements. Brace groups are built into arrays of
/// `braces`; their own groups follow `braces`' declared brace type, or keep
/// `braces` when it declares none.
pub(crate) fn resolve(
    engine: &Engine,
    items: &[Loadable],
    braces: Datatype,
    context: Option<&Cell>,
) -> RenResult<Vec<Loaded>> {
    items
        .iter()
        .map(|item| match item {
            Loadable::Value(value) => {
                engine.same_engine(value)?;
                Ok(Loaded::Cell(*value.cell()))
            }
            Loadable::Source(text) => Ok(Loaded::Source(text.clone())),
            Loadable::Group(group) => {
                let inner = declared_braces(braces).unwrap_or(braces);
                build(engine, braces, inner, group, context).map(Loaded::Cell)
            }
        })
        .collect()
}

/// Build an array of `kind` whose brace groups become `braces`.
pub(crate) fn build(
    engine: &Engine,
    kind: Datatype,
    braces: Datatype,
    items: &[Loadable],
    context: Option<&Cell>,
) -> RenResult<Cell> {
    if !kind.is_any_array() {
        return Err(RenError::usage(format!("{kind} is not an array type")));
    }
    let loaded = resolve(engine, items, braces, context)?;
    engine.call(|rt| rt.make_array(kind, &loaded, context))
}

/// The brace type an array kind declares for itself.
pub(crate) fn declared_braces(kind: Datatype) -> Option<Datatype> {
    (kind == Datatype::Block).then_some(Datatype::Block)
}
