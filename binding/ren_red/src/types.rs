//! Red's datatype numbering.
//!
//! The header of a Red cell holds the type id and nothing else. The ids
//! follow the runtime's `TYPE_*` list, so several of them (symbols, typesets,
//! ports) have no counterpart on the host side and classify as invalid.

use ren_cell::Datatype;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TypeId {
    Alien,
    Datatype,
    Unset,
    None,
    Logic,
    Block,
    String,
    Integer,
    Symbol,
    Context,
    Word,
    SetWord,
    LitWord,
    GetWord,
    Refinement,
    Char,
    Native,
    Action,
    Op,
    Function,
    Path,
    LitPath,
    SetPath,
    GetPath,
    Paren,
    Routine,
    Issue,
    File,
    Url,
    Bitset,
    Point,
    Object,
    Float,
    Binary,
    Typeset,
    Error,
    Closure,
    Port,
    Tag,
}

impl TypeId {
    const ALL: [TypeId; 39] = [
        TypeId::Alien,
        TypeId::Datatype,
        TypeId::Unset,
        TypeId::None,
        TypeId::Logic,
        TypeId::Block,
        TypeId::String,
        TypeId::Integer,
        TypeId::Symbol,
        TypeId::Context,
        TypeId::Word,
        TypeId::SetWord,
        TypeId::LitWord,
        TypeId::GetWord,
        TypeId::Refinement,
        TypeId::Char,
        TypeId::Native,
        TypeId::Action,
        TypeId::Op,
        TypeId::Function,
        TypeId::Path,
        TypeId::LitPath,
        TypeId::SetPath,
        TypeId::GetPath,
        TypeId::Paren,
        TypeId::Routine,
        TypeId::Issue,
        TypeId::File,
        TypeId::Url,
        TypeId::Bitset,
        TypeId::Point,
        TypeId::Object,
        TypeId::Float,
        TypeId::Binary,
        TypeId::Typeset,
        TypeId::Error,
        TypeId::Closure,
        TypeId::Port,
        TypeId::Tag,
    ];

    pub fn from_header(header: u32) -> Option<TypeId> {
        usize::try_from(header)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    pub fn header(self) -> u32 {
        self as u32
    }

    /// Red's own name for the type.
    pub fn name(self) -> &'static str {
        match self {
            TypeId::Alien => "alien!",
            TypeId::Datatype => "datatype!",
            TypeId::Unset => "unset!",
            TypeId::None => "none!",
            TypeId::Logic => "logic!",
            TypeId::Block => "block!",
            TypeId::String => "string!",
            TypeId::Integer => "integer!",
            TypeId::Symbol => "symbol!",
            TypeId::Context => "context!",
            TypeId::Word => "word!",
            TypeId::SetWord => "set-word!",
            TypeId::LitWord => "lit-word!",
            TypeId::GetWord => "get-word!",
            TypeId::Refinement => "refinement!",
            TypeId::Char => "char!",
            TypeId::Native => "native!",
            TypeId::Action => "action!",
            TypeId::Op => "op!",
            TypeId::Function => "function!",
            TypeId::Path => "path!",
            TypeId::LitPath => "lit-path!",
            TypeId::SetPath => "set-path!",
            TypeId::GetPath => "get-path!",
            TypeId::Paren => "paren!",
            TypeId::Routine => "routine!",
            TypeId::Issue => "issue!",
            TypeId::File => "file!",
            TypeId::Url => "url!",
            TypeId::Bitset => "bitset!",
            TypeId::Point => "point!",
            TypeId::Object => "object!",
            TypeId::Float => "float!",
            TypeId::Binary => "binary!",
            TypeId::Typeset => "typeset!",
            TypeId::Error => "error!",
            TypeId::Closure => "closure!",
            TypeId::Port => "port!",
            TypeId::Tag => "tag!",
        }
    }

    /// Host datatype. Actions and ops are natives, routines and closures
    /// are functions; runtime-internal types have none.
    pub fn datatype(self) -> Option<Datatype> {
        Some(match self {
            TypeId::Unset => Datatype::Unset,
            TypeId::None => Datatype::None,
            TypeId::Logic => Datatype::Logic,
            TypeId::Integer => Datatype::Integer,
            TypeId::Float => Datatype::Float,
            TypeId::Char => Datatype::Character,
            TypeId::Word => Datatype::Word,
            TypeId::SetWord => Datatype::SetWord,
            TypeId::GetWord => Datatype::GetWord,
            TypeId::LitWord => Datatype::LitWord,
            TypeId::Refinement => Datatype::Refinement,
            TypeId::Issue => Datatype::Issue,
            TypeId::Block => Datatype::Block,
            TypeId::Paren => Datatype::Group,
            TypeId::Path => Datatype::Path,
            TypeId::SetPath => Datatype::SetPath,
            TypeId::GetPath => Datatype::GetPath,
            TypeId::LitPath => Datatype::LitPath,
            TypeId::String => Datatype::String,
            TypeId::Tag => Datatype::Tag,
            TypeId::File => Datatype::File,
            TypeId::Url => Datatype::Url,
            TypeId::Native | TypeId::Action | TypeId::Op => Datatype::Native,
            TypeId::Function | TypeId::Routine | TypeId::Closure => Datatype::Function,
            TypeId::Object => Datatype::Object,
            TypeId::Error => Datatype::Error,
            TypeId::Alien
            | TypeId::Datatype
            | TypeId::Symbol
            | TypeId::Context
            | TypeId::Bitset
            | TypeId::Point
            | TypeId::Binary
            | TypeId::Typeset
            | TypeId::Port => return None,
        })
    }

    pub fn of(datatype: Datatype) -> TypeId {
        match datatype {
            Datatype::Unset => TypeId::Unset,
            Datatype::None => TypeId::None,
            Datatype::Logic => TypeId::Logic,
            Datatype::Integer => TypeId::Integer,
            Datatype::Float => TypeId::Float,
            Datatype::Character => TypeId::Char,
            Datatype::Word => TypeId::Word,
            Datatype::SetWord => TypeId::SetWord,
            Datatype::GetWord => TypeId::GetWord,
            Datatype::LitWord => TypeId::LitWord,
            Datatype::Refinement => TypeId::Refinement,
            Datatype::Issue => TypeId::Issue,
            Datatype::Block => TypeId::Block,
            Datatype::Group => TypeId::Paren,
            Datatype::Path => TypeId::Path,
            Datatype::SetPath => TypeId::SetPath,
            Datatype::GetPath => TypeId::GetPath,
            Datatype::LitPath => TypeId::LitPath,
            Datatype::String => TypeId::String,
            Datatype::Tag => TypeId::Tag,
            Datatype::File => TypeId::File,
            Datatype::Url => TypeId::Url,
            Datatype::Function => TypeId::Function,
            Datatype::Native => TypeId::Native,
            Datatype::Object => TypeId::Object,
            Datatype::Error => TypeId::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_matches_the_runtime() {
        assert_eq!(TypeId::Alien.header(), 0);
        assert_eq!(TypeId::Block.header(), 5);
        assert_eq!(TypeId::Integer.header(), 7);
        assert_eq!(TypeId::Word.header(), 10);
        assert_eq!(TypeId::Paren.header(), 24);
        assert_eq!(TypeId::Float.header(), 32);
        assert_eq!(TypeId::Port.header(), 37);
    }

    #[test]
    fn header_round_trips() {
        for id in TypeId::ALL {
            assert_eq!(TypeId::from_header(id.header()), Some(id));
        }
        assert_eq!(TypeId::from_header(500), None);
    }

    #[test]
    fn every_datatype_maps_back_to_itself() {
        for dt in Datatype::ALL {
            assert_eq!(TypeId::of(dt).datatype(), Some(dt), "{dt}");
        }
        assert_eq!(TypeId::Symbol.datatype(), None);
    }
}
