//! Declarative text templates for turning CLI tables into records.
//!
//! A template is plain text in a TextFSM-like dialect, so parsing rules for a
//! new firmware revision can be swapped without touching code:
//!
//! ```text
//! # Neighbors are four table lines bounded by a horizontal rule.
//! Value Required localPort (\S+)
//! Value chassisId (\S+)
//! Value systemName ([^|]*[^|\s])
//!
//! Start
//!   ^\|\s*Local\s*\| -> PortTable
//!
//! PortTable
//!   ^\|\s*${localPort}\s*\|\s*Chassis Id:\s*${chassisId} -> Entrypoint
//!
//! Entrypoint
//!   ^\|\s*\|\s*System Name:\s*${systemName}\s*\|
//!   ^\+[-+]+\+?\s*$ -> Record PortTable
//! ```
//!
//! # Values
//!
//! `Value [Options] NAME (REGEX)` declares a capture. The regex must be wrapped
//! in parentheses. Options are comma separated:
//!
//! - `Required` - a record whose value is still empty is dropped
//! - `Filldown` - the value survives the reset that follows a record
//!
//! # Rules
//!
//! Each state holds indented rules `^REGEX -> ACTION`. `${NAME}` inside the
//! regex is replaced by the value's capture group. Actions:
//!
//! | Action           | Effect                                             |
//! |------------------|----------------------------------------------------|
//! | *(none)*, `Next` | stay in the current state                          |
//! | `STATE`          | move to `STATE`                                    |
//! | `Record`         | emit the record, reset, go back to `Start`         |
//! | `Record STATE`   | emit the record, reset, go to `STATE`              |
//! | `End`            | stop reading input                                 |
//!
//! The first rule of the current state that matches a line wins. Lines that
//! match nothing are skipped. A record still pending at end of input is
//! discarded.

mod matcher;
mod parse;

pub use matcher::Records;
pub use parse::{Action, Rule, State, Template, Value};

use indexmap::IndexMap;
use serde::Serialize;

/// One parsed record: value name to matched text, in declaration order.
///
/// Values that never matched are present with an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, String>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
