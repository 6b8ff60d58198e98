//! A single watched expression.

use ren::{AnyString, AnyValue, HasSpelling, RenError, RenResult, Tag};

/// What the last evaluation produced.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// The result, `None` when the evaluation produced no value.
    Value(Option<AnyValue>),
    Error(RenError),
}

/// A watched word, path or group, plus its last outcome.
///
/// The expression is evaluated once on creation. Later calls to
/// [`Watcher::evaluate`] only re-run it when it recalculates and is not
/// frozen; otherwise the last outcome stands.
#[derive(Clone, Debug)]
pub struct Watcher {
    watch: AnyValue,
    recalculates: bool,
    label: Option<Tag>,
    frozen: bool,
    outcome: Outcome,
}

impl Watcher {
    pub fn new(watch: AnyValue, recalculates: bool, label: Option<Tag>) -> Watcher {
        let mut watcher = Watcher {
            watch,
            recalculates,
            label,
            frozen: false,
            outcome: Outcome::Value(None),
        };
        watcher.evaluate(true);
        watcher
    }

    /// Re-run the expression if this is the first evaluation, or if it
    /// recalculates and is not frozen. Returns whether it ran.
    pub fn evaluate(&mut self, first_time: bool) -> bool {
        if !(first_time || (self.recalculates && !self.frozen)) {
            return false;
        }
        self.outcome = match self.watch.apply(&[]) {
            Ok(value) => Outcome::Value(value),
            Err(err) => {
                tracing::debug!(watch = %self.watch, error = %err, "watch evaluation failed");
                Outcome::Error(err)
            }
        };
        true
    }

    pub fn watch(&self) -> &AnyValue {
        &self.watch
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The last value, unless the last evaluation failed.
    pub fn value(&self) -> Option<&AnyValue> {
        match &self.outcome {
            Outcome::Value(value) => value.as_ref(),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RenError> {
        match &self.outcome {
            Outcome::Value(_) => None,
            Outcome::Error(err) => Some(err),
        }
    }

    pub fn recalculates(&self) -> bool {
        self.recalculates
    }

    pub fn set_recalculates(&mut self, recalculates: bool) {
        self.recalculates = recalculates;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    pub fn label(&self) -> Option<&Tag> {
        self.label.as_ref()
    }

    /// Label the watcher with `text`. Empty text removes the label.
    pub fn set_label(&mut self, text: &str) -> RenResult<()> {
        self.label = if text.is_empty() {
            None
        } else {
            Some(Tag::new_in(text, self.watch.engine())?)
        };
        Ok(())
    }

    /// What a front end shows in the expression column: the label's text,
    /// or the watched expression itself.
    pub fn watch_string(&self) -> String {
        match &self.label {
            Some(tag) => tag.spelling_of().unwrap_or_else(|_| tag.to_string()),
            None => self.watch.to_string(),
        }
    }

    /// What a front end shows in the value column: the error's diagnostic,
    /// or the value in its fully loadable form.
    pub fn value_string(&self) -> RenResult<String> {
        match &self.outcome {
            Outcome::Error(err) => Ok(err.to_string()),
            Outcome::Value(Some(value)) => value.mold_all(),
            Outcome::Value(None) => AnyValue::unset_in(self.watch.engine()).mold_all(),
        }
    }
}
