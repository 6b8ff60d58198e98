//! Backend-neutral datatype enumeration.
//!
//! Each backend maps its own tag numbering onto these variants in
//! `Runtime::classify` and back in `Runtime::stamp`. The host binding only
//! ever reasons in terms of `Datatype`.

use std::fmt;

/// Interpreter datatypes visible to the host binding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Datatype {
    Unset,
    None,
    Logic,
    Integer,
    Float,
    Character,

    Word,
    SetWord,
    GetWord,
    LitWord,
    Refinement,
    Issue,

    Block,
    Group,
    Path,
    SetPath,
    GetPath,
    LitPath,

    String,
    Tag,
    File,
    Url,

    Function,
    Native,
    Object,
    Error,
}

impl Datatype {
    /// Every datatype, in declaration order.
    pub const ALL: [Datatype; 26] = [
        Datatype::Unset,
        Datatype::None,
        Datatype::Logic,
        Datatype::Integer,
        Datatype::Float,
        Datatype::Character,
        Datatype::Word,
        Datatype::SetWord,
        Datatype::GetWord,
        Datatype::LitWord,
        Datatype::Refinement,
        Datatype::Issue,
        Datatype::Block,
        Datatype::Group,
        Datatype::Path,
        Datatype::SetPath,
        Datatype::GetPath,
        Datatype::LitPath,
        Datatype::String,
        Datatype::Tag,
        Datatype::File,
        Datatype::Url,
        Datatype::Function,
        Datatype::Native,
        Datatype::Object,
        Datatype::Error,
    ];

    /// The interpreter-facing name, including the trailing `!`.
    pub const fn name(self) -> &'static str {
        match self {
            Datatype::Unset => "unset!",
            Datatype::None => "none!",
            Datatype::Logic => "logic!",
            Datatype::Integer => "integer!",
            Datatype::Float => "decimal!",
            Datatype::Character => "char!",
            Datatype::Word => "word!",
            Datatype::SetWord => "set-word!",
            Datatype::GetWord => "get-word!",
            Datatype::LitWord => "lit-word!",
            Datatype::Refinement => "refinement!",
            Datatype::Issue => "issue!",
            Datatype::Block => "block!",
            Datatype::Group => "paren!",
            Datatype::Path => "path!",
            Datatype::SetPath => "set-path!",
            Datatype::GetPath => "get-path!",
            Datatype::LitPath => "lit-path!",
            Datatype::String => "string!",
            Datatype::Tag => "tag!",
            Datatype::File => "file!",
            Datatype::Url => "url!",
            Datatype::Function => "function!",
            Datatype::Native => "native!",
            Datatype::Object => "object!",
            Datatype::Error => "error!",
        }
    }

    /// Look up a datatype by its name. Accepts the name with or without `!`.
    pub fn from_name(name: &str) -> Option<Datatype> {
        let bare = name.strip_suffix('!').unwrap_or(name);
        Self::ALL
            .iter()
            .copied()
            .find(|dt| dt.name().trim_end_matches('!').eq_ignore_ascii_case(bare))
    }

    pub const fn is_any_word(self) -> bool {
        matches!(
            self,
            Datatype::Word
                | Datatype::SetWord
                | Datatype::GetWord
                | Datatype::LitWord
                | Datatype::Refinement
                | Datatype::Issue
        )
    }

    pub const fn is_any_array(self) -> bool {
        matches!(
            self,
            Datatype::Block
                | Datatype::Group
                | Datatype::Path
                | Datatype::SetPath
                | Datatype::GetPath
                | Datatype::LitPath
        )
    }

    pub const fn is_any_string(self) -> bool {
        matches!(
            self,
            Datatype::String | Datatype::Tag | Datatype::File | Datatype::Url
        )
    }

    /// Arrays and strings: everything with a position.
    pub const fn is_series(self) -> bool {
        self.is_any_array() || self.is_any_string()
    }

    pub const fn is_any_function(self) -> bool {
        matches!(self, Datatype::Function | Datatype::Native)
    }

    pub const fn is_any_context(self) -> bool {
        matches!(self, Datatype::Object | Datatype::Error)
    }

    /// Immediate values that never reference the heap.
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Datatype::Unset
                | Datatype::None
                | Datatype::Logic
                | Datatype::Integer
                | Datatype::Float
                | Datatype::Character
        )
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
