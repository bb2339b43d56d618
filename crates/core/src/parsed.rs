use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::value_type::Value;

/// Outcome of a successful parse: which command ran and what it was given.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ParsedCommandData {
    command: String,
    flags: IndexSet<String>,
    keys: IndexMap<String, Value>,
    arguments: Vec<Value>,
}

impl ParsedCommandData {
    #[must_use]
    pub fn new(
        command: String,
        flags: IndexSet<String>,
        keys: IndexMap<String, Value>,
        arguments: Vec<Value>,
    ) -> Self {
        Self {
            command,
            flags,
            keys,
            arguments,
        }
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub fn flags(&self) -> &IndexSet<String> {
        &self.flags
    }

    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    #[must_use]
    pub fn keys(&self) -> &IndexMap<String, Value> {
        &self.keys
    }

    #[must_use]
    pub fn key(&self, name: &str) -> Option<&Value> {
        self.keys.get(name)
    }

    /// Free arguments in the order they appeared in the token stream.
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }
}
