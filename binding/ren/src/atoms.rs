//! Immediate values: none, logic, character, integer, decimal.

use ren_cell::{Datatype, Runtime};

use crate::backend::Backend;
use crate::subtype::define_subtype;
use crate::{AnyValue, Engine};

define_subtype! {
    /// The `none` value. Named to stay clear of `Option::None`.
    RenNone => Datatype::None
}

define_subtype! {
    Logic => Datatype::Logic
}

define_subtype! {
    Character => Datatype::Character
}

define_subtype! {
    Integer => Datatype::Integer
}

define_subtype! {
    /// A `decimal!`.
    Float => Datatype::Float
}

macro_rules! atom {
    ($name:ident, $t:ty, $make:ident, $read:ident, $zero:expr) => {
        impl $name {
            pub fn new(value: $t) -> $name {
                Self::new_in(value, &Engine::current())
            }

            pub fn new_in(value: $t, engine: &Engine) -> $name {
                $name(AnyValue::from_cell(Backend::$make(value), engine))
            }

            pub fn value(&self) -> $t {
                Backend::$read(self.0.cell()).unwrap_or($zero)
            }
        }

        impl From<$t> for $name {
            fn from(value: $t) -> $name {
                $name::new(value)
            }
        }

        impl From<&$name> for $t {
            fn from(atom: &$name) -> $t {
                atom.value()
            }
        }
    };
}

atom!(Logic, bool, make_logic, logic_of, false);
atom!(Character, char, make_character, character_of, '\0');
atom!(Integer, i64, make_integer, integer_of, 0);
atom!(Float, f64, make_float, float_of, 0.0);

impl RenNone {
    pub fn new() -> RenNone {
        RenNone(AnyValue::none())
    }

    pub fn new_in(engine: &Engine) -> RenNone {
        RenNone(AnyValue::none_in(engine))
    }
}

impl Default for RenNone {
    fn default() -> Self {
        RenNone::new()
    }
}
