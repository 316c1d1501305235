//! Line-by-line state machine that drives a [`Template`] over text.

use std::str::Lines;

use log::trace;

use super::Record;
use super::parse::{Action, Template};

impl Template {
    /// Lazily parse `text` into records.
    pub fn parse_text<'t, 'a>(&'t self, text: &'a str) -> Records<'t, 'a> {
        Records {
            template: self,
            lines: text.lines(),
            state: self.start,
            buffer: vec![None; self.values.len()],
            finished: false,
        }
    }

    /// Parse `text` and collect every record.
    pub fn parse_all(&self, text: &str) -> Vec<Record> {
        self.parse_text(text).collect()
    }
}

/// Iterator over the records a template finds in some text.
///
/// Created by [`Template::parse_text`].
#[derive(Debug)]
pub struct Records<'t, 'a> {
    template: &'t Template,
    lines: Lines<'a>,
    state: usize,
    buffer: Vec<Option<String>>,
    finished: bool,
}

impl Records<'_, '_> {
    /// Build a record from the buffer and reset it.
    ///
    /// Returns `None` when nothing was captured or a required value is empty.
    fn take_record(&mut self) -> Option<Record> {
        let values = &self.template.values;

        let captured = self.buffer.iter().any(|v| v.as_deref().is_some_and(|s| !s.is_empty()));
        let complete = values
            .iter()
            .zip(&self.buffer)
            .all(|(value, slot)| !value.required || slot.as_deref().is_some_and(|s| !s.is_empty()));

        let record = (captured && complete).then(|| {
            values
                .iter()
                .zip(&self.buffer)
                .map(|(value, slot)| (value.name.clone(), slot.clone().unwrap_or_default()))
                .collect()
        });

        for (value, slot) in values.iter().zip(self.buffer.iter_mut()) {
            if !value.filldown {
                *slot = None;
            }
        }

        record
    }
}

impl Iterator for Records<'_, '_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.finished {
            return None;
        }

        while let Some(line) = self.lines.next() {
            let template = self.template;
            let state = &template.states[self.state];

            let Some((rule, caps)) = state
                .rules
                .iter()
                .find_map(|rule| rule.regex.captures(line).map(|caps| (rule, caps)))
            else {
                continue;
            };

            for &idx in &rule.values {
                if let Some(m) = caps.name(&template.values[idx].name) {
                    self.buffer[idx] = Some(m.as_str().to_string());
                }
            }

            match rule.action {
                Action::Next => {}
                Action::Goto(target) => {
                    trace!(
                        "template: {} -> {} (line {})",
                        state.name, template.states[target].name, rule.line
                    );
                    self.state = target;
                }
                Action::Record(target) => {
                    self.state = target;
                    if let Some(record) = self.take_record() {
                        return Some(record);
                    }
                }
                Action::End => break,
            }
        }

        // Anything still pending never reached a Record transition.
        self.finished = true;
        None
    }
}
