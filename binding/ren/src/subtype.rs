//! Statically typed narrowings of [`AnyValue`].
//!
//! Every subtype carries one [`CellFunction`], its dispatcher. Called without
//! an output slot the dispatcher answers "does this value hold my datatype?";
//! called with a slot it stamps its datatype into that cell and returns
//! `true`. The two forms agree: a cell stamped by a dispatcher always passes
//! that dispatcher's test.
//!
//! Subtypes are newtypes over `AnyValue` and add no storage.

use ren_cell::{Cell, Datatype, Runtime};

use crate::backend::Backend;
use crate::AnyValue;

/// Dual-purpose type test and tag writer.
pub type CellFunction = fn(&AnyValue, Option<&mut Cell>) -> bool;

pub(crate) mod sealed {
    use crate::AnyValue;

    /// Unchecked wrapping, reachable only from inside the crate.
    pub trait Wrap: Sized {
        fn wrap(value: AnyValue) -> Self;
        fn value(&self) -> &AnyValue;
        fn value_mut(&mut self) -> &mut AnyValue;
        fn into_value(self) -> AnyValue;
    }
}

pub trait Subtype: sealed::Wrap + Clone + Into<AnyValue> {
    /// The datatype the dispatcher stamps.
    const DATATYPE: Datatype;
    const DISPATCH: CellFunction;

    fn as_value(&self) -> &AnyValue {
        sealed::Wrap::value(self)
    }

    /// Whether `value` may be viewed as this subtype.
    fn accepts(value: &AnyValue) -> bool {
        (Self::DISPATCH)(value, None)
    }
}

/// Reinterpret `value` as `T` by rewriting its type tag through `T`'s
/// dispatcher. Only meaningful inside one family (word to word, array to
/// array), where backends share the payload layout.
pub(crate) fn restamp<T: Subtype>(value: &AnyValue) -> T {
    let mut cell = *value.cell();
    (T::DISPATCH)(value, Some(&mut cell));
    T::wrap(AnyValue::from_cell(cell, value.engine()))
}

/// Tag test used by generated dispatchers.
pub(crate) fn dispatch(
    value: &AnyValue,
    out: Option<&mut Cell>,
    stamps: Datatype,
    also: &[Datatype],
) -> bool {
    match out {
        Some(cell) => {
            Backend::stamp(cell, stamps);
            true
        }
        None => value
            .datatype()
            .is_some_and(|dt| dt == stamps || also.contains(&dt)),
    }
}

/// Declare a subtype newtype with its dispatcher and conversions.
///
/// `Name => Datatype::X` accepts exactly `X`;
/// `Name => Datatype::X | Datatype::Y` also accepts `Y` but stamps `X`.
macro_rules! define_subtype {
    ($(#[$meta:meta])* $name:ident => $dt:path $(| $also:path)*) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name($crate::AnyValue);

        impl $name {
            fn dispatch(
                value: &$crate::AnyValue,
                out: Option<&mut ::ren_cell::Cell>,
            ) -> bool {
                $crate::subtype::dispatch(value, out, $dt, &[$($also),*])
            }
        }

        impl $crate::subtype::sealed::Wrap for $name {
            fn wrap(value: $crate::AnyValue) -> Self {
                $name(value)
            }

            fn value(&self) -> &$crate::AnyValue {
                &self.0
            }

            fn value_mut(&mut self) -> &mut $crate::AnyValue {
                &mut self.0
            }

            fn into_value(self) -> $crate::AnyValue {
                self.0
            }
        }

        impl $crate::Subtype for $name {
            const DATATYPE: ::ren_cell::Datatype = $dt;
            const DISPATCH: $crate::CellFunction = $name::dispatch;
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::AnyValue;

            fn deref(&self) -> &$crate::AnyValue {
                &self.0
            }
        }

        impl From<$name> for $crate::AnyValue {
            fn from(value: $name) -> $crate::AnyValue {
                value.0
            }
        }

        impl From<$name> for $crate::Loadable {
            fn from(value: $name) -> $crate::Loadable {
                $crate::Loadable::Value(value.0)
            }
        }

        impl From<&$name> for $crate::Loadable {
            fn from(value: &$name) -> $crate::Loadable {
                $crate::Loadable::Value(value.0.clone())
            }
        }

        impl TryFrom<$crate::AnyValue> for $name {
            type Error = $crate::RenError;

            fn try_from(value: $crate::AnyValue) -> Result<Self, $crate::RenError> {
                value.into_cast()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }
    };
}

pub(crate) use define_subtype;
