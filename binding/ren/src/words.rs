//! The word family: word, set-word, get-word, lit-word, refinement, issue.

use ren_cell::{Datatype, Runtime};

use crate::subtype::{define_subtype, restamp};
use crate::{AnyValue, Context, Engine, Loadable, RenError, RenResult, Subtype};

/// Values that have a textual name: words and strings.
pub trait HasSpelling: Subtype {
    /// The name exactly as written.
    fn spelling_of(&self) -> RenResult<String> {
        let value = self.as_value();
        value.engine().call(|rt| rt.spelling_of(value.cell()))
    }

    /// Exact, case-sensitive comparison of the spelling with `text`.
    fn has_spelling(&self, text: &str) -> bool {
        self.spelling_of().is_ok_and(|s| s == text)
    }
}

/// Shared construction for every word subtype.
pub trait AnyWord: HasSpelling {
    /// A word bound into the default engine's user context, adding the key
    /// there if it is missing.
    fn new(spelling: &str) -> RenResult<Self> {
        Self::new_in(spelling, &Engine::current())
    }

    fn new_in(spelling: &str, engine: &Engine) -> RenResult<Self> {
        let user = Context::user_in(engine)?;
        Self::bound_in(spelling, &user)
    }

    /// A word bound into `context`, adding the key if missing.
    fn bound_in(spelling: &str, context: &Context) -> RenResult<Self> {
        let engine = context.engine();
        let cell =
            engine.call(|rt| rt.make_word(Self::DATATYPE, spelling, Some(context.cell())))?;
        Ok(Self::wrap(AnyValue::from_cell(cell, engine)))
    }

    /// A word with no binding.
    fn unbound_in(spelling: &str, engine: &Engine) -> RenResult<Self> {
        let cell = engine.call(|rt| rt.make_word(Self::DATATYPE, spelling, None))?;
        Ok(Self::wrap(AnyValue::from_cell(cell, engine)))
    }

    /// The same word, binding included, as another word type.
    fn to_word<W: AnyWord>(&self) -> W {
        restamp::<W>(self.as_value())
    }
}

define_subtype! {
    Word => Datatype::Word
}

define_subtype! {
    SetWord => Datatype::SetWord
}

define_subtype! {
    GetWord => Datatype::GetWord
}

define_subtype! {
    LitWord => Datatype::LitWord
}

define_subtype! {
    Refinement => Datatype::Refinement
}

define_subtype! {
    Issue => Datatype::Issue
}

macro_rules! word_family {
    ($($name:ident),*) => {$(
        impl HasSpelling for $name {}
        impl AnyWord for $name {}
    )*};
}

word_family!(Word, SetWord, GetWord, LitWord, Refinement, Issue);

impl Word {
    /// Evaluate the word followed by `args`. With no arguments this runs
    /// the bound function, or yields the bound value if it is not one.
    pub fn call(&self, args: &[Loadable]) -> RenResult<Option<AnyValue>> {
        self.apply(args)
    }
}

impl SetWord {
    /// Assign the evaluation of `args` to the word, returning what was
    /// assigned.
    pub fn call(&self, args: &[Loadable]) -> RenResult<AnyValue> {
        self.apply(args)?
            .ok_or_else(|| RenError::usage("set-word assignment produced no value"))
    }
}

impl GetWord {
    /// Fetch the bound value without invoking it.
    pub fn get(&self) -> RenResult<Option<AnyValue>> {
        self.apply(&[])
    }
}

#[cfg(test)]
mod tests;
