use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation selector (e.g. `<CAPTION>`). Opaque to the core; the engine
/// decides what it means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation(String);

impl Operation {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fixed, ordered allow-list of operation selectors.
///
/// Built once at startup and never mutated afterwards, so lookups need no
/// lock. Resolution happens before enqueue; a miss must not touch the model.
#[derive(Debug, Clone)]
pub struct OperationSet {
    operations: Vec<Operation>,
}

impl OperationSet {
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operations: selectors.into_iter().map(Operation::new).collect(),
        }
    }

    /// Resolve a raw selector against the allow-list.
    pub fn resolve(&self, selector: &str) -> Option<Operation> {
        self.operations.iter().find(|op| op.as_str() == selector).cloned()
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.resolve(selector).is_some()
    }

    /// Selector strings in configured order (the `GET /operations` payload).
    pub fn names(&self) -> Vec<String> {
        self.operations.iter().map(|op| op.as_str().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
