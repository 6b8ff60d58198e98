//! An ordered list of watchers and the watch dialect that drives it.
//!
//! Items are numbered from 1, the way the dialect and a front end's rows
//! address them.

use ren::{AnyValue, HasSpelling, Integer, Logic, Tag, Word};

use crate::{WatchError, WatchResult, Watcher};

#[derive(Debug, Default)]
pub struct WatchList {
    watchers: Vec<Watcher>,
    visible: bool,
}

impl WatchList {
    pub fn new() -> WatchList {
        WatchList::default()
    }

    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Watcher> {
        index.checked_sub(1).and_then(|i| self.watchers.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Watcher> {
        self.watchers.iter()
    }

    /// Whether the dialect last asked for the list to be shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Append a watcher, returning its index.
    pub fn push(&mut self, watcher: Watcher) -> usize {
        self.watchers.push(watcher);
        self.watchers.len()
    }

    pub fn remove(&mut self, index: usize) -> WatchResult<Watcher> {
        let slot = self.slot(index)?;
        Ok(self.watchers.remove(slot))
    }

    /// Insert a copy of watcher `index` in its place, pushing the original
    /// down one row, and refresh the copy.
    pub fn duplicate(&mut self, index: usize) -> WatchResult<()> {
        let slot = self.slot(index)?;
        let copy = self.watchers[slot].clone();
        self.watchers.insert(slot, copy);
        self.watchers[slot].evaluate(false);
        Ok(())
    }

    pub fn set_frozen(&mut self, index: usize, frozen: bool) -> WatchResult<()> {
        let slot = self.slot(index)?;
        self.watchers[slot].set_frozen(frozen);
        self.watchers[slot].evaluate(false);
        Ok(())
    }

    pub fn set_recalculates(&mut self, index: usize, recalculates: bool) -> WatchResult<()> {
        let slot = self.slot(index)?;
        self.watchers[slot].set_recalculates(recalculates);
        self.watchers[slot].evaluate(false);
        Ok(())
    }

    /// Relabel watcher `index`. Empty text removes the label.
    pub fn set_label(&mut self, index: usize, text: &str) -> WatchResult<()> {
        let slot = self.slot(index)?;
        self.watchers[slot].set_label(text)?;
        Ok(())
    }

    /// Re-evaluate one watcher. Frozen or non-recalculating watchers keep
    /// their last outcome; the result says whether it ran.
    pub fn update(&mut self, index: usize) -> WatchResult<bool> {
        let slot = self.slot(index)?;
        Ok(self.watchers[slot].evaluate(false))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(watchers = self.watchers.len()))]
    pub fn update_all(&mut self) {
        for watcher in &mut self.watchers {
            watcher.evaluate(false);
        }
    }

    /// The first watcher whose expression column reads `text`.
    pub fn find_label(&self, text: &str) -> Option<&Watcher> {
        self.watchers.iter().find(|w| w.watch_string() == text)
    }

    /// Interpret one argument of the `watch` dialect.
    ///
    /// - A positive integer fetches that item's value, failing with its
    ///   error if the last evaluation failed. A negative one removes the
    ///   item and returns its value. Zero is an error.
    /// - `on`/`yes`/`true` show the list and `off`/`no`/`false` hide it.
    /// - A word, path or group becomes a new watcher; its first value is
    ///   returned, or its first error raised.
    /// - A tag fetches the value of the watcher with that label.
    #[tracing::instrument(level = "debug", skip_all, fields(arg = %arg))]
    pub fn dialect(
        &mut self,
        arg: &AnyValue,
        recalculates: bool,
        label: Option<Tag>,
    ) -> WatchResult<Option<AnyValue>> {
        if let Some(n) = arg.try_cast::<Integer>() {
            return self.by_number(n.value());
        }

        if let Some(show) = logic_synonym(arg) {
            self.visible = show;
            return Ok(None);
        }

        if arg.is_word() || arg.is_path() || arg.is_group() {
            let watcher = Watcher::new(arg.clone(), recalculates, label);
            let result = match watcher.error() {
                Some(err) => Err(WatchError::Ren(err.clone())),
                None => Ok(watcher.value().cloned()),
            };
            self.push(watcher);
            return result;
        }

        if let Some(tag) = arg.try_cast::<Tag>() {
            let name = tag.spelling_of()?;
            return self
                .find_label(&name)
                .map(|w| w.value().cloned())
                .ok_or(WatchError::UnknownLabel(name));
        }

        Err(WatchError::UnexpectedType(arg.type_name()))
    }

    fn by_number(&mut self, n: i64) -> WatchResult<Option<AnyValue>> {
        if n == 0 {
            return Err(WatchError::ZeroIndex);
        }
        let index = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX);
        if n < 0 {
            let removed = self.remove(index)?;
            return Ok(removed.value().cloned());
        }
        let watcher = self.get(index).ok_or(WatchError::NoSuchIndex(index))?;
        match watcher.error() {
            Some(err) => Err(WatchError::Ren(err.clone())),
            None => Ok(watcher.value().cloned()),
        }
    }

    fn slot(&self, index: usize) -> WatchResult<usize> {
        index
            .checked_sub(1)
            .filter(|&slot| slot < self.watchers.len())
            .ok_or(WatchError::NoSuchIndex(index))
    }
}

impl<'a> IntoIterator for &'a WatchList {
    type Item = &'a Watcher;
    type IntoIter = std::slice::Iter<'a, Watcher>;

    fn into_iter(self) -> Self::IntoIter {
        self.watchers.iter()
    }
}

/// `Some(true)` for `on`/`yes`/`true` and logic true, `Some(false)` for
/// their opposites, `None` for anything else.
fn logic_synonym(arg: &AnyValue) -> Option<bool> {
    if let Some(logic) = arg.try_cast::<Logic>() {
        return Some(logic.value());
    }
    let spelling = arg.try_cast::<Word>()?.spelling_of().ok()?.to_ascii_lowercase();
    match spelling.as_str() {
        "on" | "yes" | "true" => Some(true),
        "off" | "no" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
