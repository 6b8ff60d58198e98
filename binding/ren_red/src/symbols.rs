//! Word spellings.
//!
//! Red keeps one symbol per distinct spelling; case-insensitive comparison
//! goes through the lowercased form.

use rustc_hash::FxHashMap;

#[derive(Default)]
pub(crate) struct Symbols {
    map: FxHashMap<String, u32>,
    names: Vec<String>,
}

impl Symbols {
    pub(crate) fn intern(&mut self, spelling: &str) -> u32 {
        if let Some(&id) = self.map.get(spelling) {
            return id;
        }
        let id = u32::try_from(self.names.len()).unwrap_or(u32::MAX);
        self.names.push(spelling.to_owned());
        self.map.insert(spelling.to_owned(), id);
        id
    }

    pub(crate) fn name(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub(crate) fn same_word(&self, a: u32, b: u32) -> bool {
        a == b
            || matches!(
                (self.name(a), self.name(b)),
                (Some(x), Some(y)) if x.to_lowercase() == y.to_lowercase()
            )
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable_and_case_preserving() {
        let mut symbols = Symbols::default();
        let a = symbols.intern("Foo");
        let b = symbols.intern("foo");
        assert_ne!(a, b);
        assert_eq!(symbols.intern("Foo"), a);
        assert_eq!(symbols.name(a), Some("Foo"));
        assert!(symbols.same_word(a, b));
        assert_eq!(symbols.len(), 2);
    }
}
