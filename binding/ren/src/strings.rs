//! The string family: string, tag, file, url.

use ren_cell::{Datatype, Runtime};

use crate::subtype::define_subtype;
use crate::{AnyValue, Engine, HasSpelling, RenResult, Series};

/// Shared construction for every string subtype.
pub trait AnyString: HasSpelling + Series {
    fn new(text: &str) -> RenResult<Self> {
        Self::new_in(text, &Engine::current())
    }

    fn new_in(text: &str, engine: &Engine) -> RenResult<Self> {
        let cell = engine.call(|rt| rt.make_string(Self::DATATYPE, text))?;
        AnyValue::from_cell(cell, engine).into_cast()
    }
}

define_subtype! {
    /// A `string!`. Named to stay clear of `std::string::String`.
    RenString => Datatype::String
}

define_subtype! {
    /// A `tag!`, written `<text>`.
    Tag => Datatype::Tag
}

define_subtype! {
    /// A `file!`, written `%name`.
    Filename => Datatype::File
}

define_subtype! {
    Url => Datatype::Url
}

macro_rules! string_family {
    ($($name:ident),*) => {$(
        impl HasSpelling for $name {}
        impl Series for $name {}
        impl AnyString for $name {}
    )*};
}

string_family!(RenString, Tag, Filename, Url);
