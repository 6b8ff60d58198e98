//! Symbol table.
//!
//! Words keep the exact spelling they were written with, but binding and
//! equality are case-insensitive. Every symbol therefore records its
//! canonical (lowercased) symbol; frames are keyed by canonical symbols.

use rustc_hash::FxHashMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Symbol(u32);

impl Symbol {
    #[inline]
    pub(crate) const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn from_raw(raw: u32) -> Self {
        Symbol(raw)
    }
}

#[derive(Default)]
pub(crate) struct SymbolTable {
    map: FxHashMap<String, Symbol>,
    names: Vec<String>,
    canon: Vec<Symbol>,
}

impl SymbolTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn intern(&mut self, spelling: &str) -> Symbol {
        if let Some(&sym) = self.map.get(spelling) {
            return sym;
        }
        let lower = spelling.to_lowercase();
        let canon = if lower == spelling {
            None
        } else {
            Some(self.intern(&lower))
        };
        let sym = Symbol(u32::try_from(self.names.len()).unwrap_or(u32::MAX));
        self.names.push(spelling.to_owned());
        self.canon.push(canon.unwrap_or(sym));
        self.map.insert(spelling.to_owned(), sym);
        sym
    }

    /// Canonical symbol for `spelling` if it was ever interned.
    pub(crate) fn find_canon(&self, spelling: &str) -> Option<Symbol> {
        self.map.get(&spelling.to_lowercase()).copied()
    }

    pub(crate) fn name(&self, sym: Symbol) -> &str {
        self.names.get(sym.0 as usize).map_or("", String::as_str)
    }

    pub(crate) fn canon(&self, sym: Symbol) -> Symbol {
        self.canon.get(sym.0 as usize).copied().unwrap_or(sym)
    }

    pub(crate) fn same_spelling(&self, a: Symbol, b: Symbol) -> bool {
        self.canon(a) == self.canon(b)
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}
