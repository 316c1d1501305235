//! Template loading: turns template text into compiled states and rules.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::TemplateError;

/// Name of the state every template starts in.
pub const START_STATE: &str = "Start";

/// Separator between a rule's pattern and its action.
static ACTION_ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+->(?:\s+|$)").expect("valid regex"));

/// A declared capture value.
#[derive(Debug, Clone)]
pub struct Value {
    /// Capture name, used as the record field name.
    pub name: String,

    /// The regex as written, including the outer parentheses.
    pub pattern: String,

    /// Drop records where this value is empty.
    pub required: bool,

    /// Keep this value across records.
    pub filldown: bool,
}

/// What a rule does after it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stay in the current state.
    Next,
    /// Move to the state at this index.
    Goto(usize),
    /// Emit the pending record, then move to the state at this index.
    Record(usize),
    /// Stop consuming input.
    End,
}

/// A compiled line rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Pattern with `${NAME}` references expanded to named groups.
    pub regex: Regex,

    /// Indexes of the values this rule captures.
    pub values: Vec<usize>,

    /// Transition taken on match.
    pub action: Action,

    /// Template line the rule was declared on.
    pub line: usize,
}

/// A named state and its ordered rules.
#[derive(Debug, Clone)]
pub struct State {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// A loaded template, ready to parse text.
#[derive(Clone)]
pub struct Template {
    pub(crate) values: Vec<Value>,
    pub(crate) states: Vec<State>,
    pub(crate) start: usize,
}

impl Template {
    /// Load a template from its text form.
    ///
    /// All structural problems are reported here so a bad template never
    /// reaches the parse step.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut values: Vec<Value> = Vec::new();
        let mut raw_states: Vec<RawState> = Vec::new();

        for (idx, raw_line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw_line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let indented = raw_line.starts_with([' ', '\t']);

            if !indented && trimmed.starts_with("Value ") {
                if !raw_states.is_empty() {
                    return Err(TemplateError::Syntax {
                        line: line_no,
                        message: "Value declared after the first state".to_string(),
                    });
                }
                let value = parse_value(trimmed, line_no)?;
                if values.iter().any(|v| v.name == value.name) {
                    return Err(TemplateError::Duplicate {
                        line: line_no,
                        name: value.name,
                    });
                }
                values.push(value);
                continue;
            }

            if !indented {
                if !is_identifier(trimmed) {
                    return Err(TemplateError::Syntax {
                        line: line_no,
                        message: format!("invalid state name '{trimmed}'"),
                    });
                }
                if raw_states.iter().any(|s| s.name == trimmed) {
                    return Err(TemplateError::Duplicate {
                        line: line_no,
                        name: trimmed.to_string(),
                    });
                }
                raw_states.push(RawState {
                    name: trimmed.to_string(),
                    rules: Vec::new(),
                });
                continue;
            }

            let Some(state) = raw_states.last_mut() else {
                return Err(TemplateError::Syntax {
                    line: line_no,
                    message: "rule outside of a state".to_string(),
                });
            };

            if !trimmed.starts_with('^') {
                return Err(TemplateError::Syntax {
                    line: line_no,
                    message: "rules must start with '^'".to_string(),
                });
            }

            state.rules.push(parse_rule(trimmed, line_no)?);
        }

        let start = raw_states
            .iter()
            .position(|s| s.name == START_STATE)
            .ok_or(TemplateError::MissingStart)?;

        let state_index = |name: &str, line: usize| {
            raw_states
                .iter()
                .position(|s| s.name == name)
                .ok_or_else(|| TemplateError::UndefinedState {
                    line,
                    state: name.to_string(),
                })
        };

        let mut states = Vec::with_capacity(raw_states.len());
        for raw in &raw_states {
            let mut rules = Vec::with_capacity(raw.rules.len());
            for rule in &raw.rules {
                let action = match &rule.action {
                    RawAction::Next => Action::Next,
                    RawAction::End => Action::End,
                    RawAction::Goto(name) => Action::Goto(state_index(name, rule.line)?),
                    RawAction::Record(None) => Action::Record(start),
                    RawAction::Record(Some(name)) => Action::Record(state_index(name, rule.line)?),
                };
                let (regex, captured) = expand_rule(&rule.pattern, &values, rule.line)?;
                rules.push(Rule {
                    regex,
                    values: captured,
                    action,
                    line: rule.line,
                });
            }
            states.push(State {
                name: raw.name.clone(),
                rules,
            });
        }

        Ok(Self {
            values,
            states,
            start,
        })
    }

    /// Declared values, in declaration order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name == name)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field(
                "values",
                &self.values.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            )
            .field(
                "states",
                &self.states.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl std::str::FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct RawState {
    name: String,
    rules: Vec<RawRule>,
}

struct RawRule {
    pattern: String,
    action: RawAction,
    line: usize,
}

enum RawAction {
    Next,
    End,
    Goto(String),
    Record(Option<String>),
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse `Value [Options] NAME (REGEX)`.
fn parse_value(line: &str, line_no: usize) -> Result<Value, TemplateError> {
    let syntax = |message: &str| TemplateError::Syntax {
        line: line_no,
        message: message.to_string(),
    };

    let rest = line["Value".len()..].trim_start();
    let (first, rest) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| syntax("expected 'Value [Options] NAME (REGEX)'"))?;
    let rest = rest.trim_start();

    let (options, name, pattern) = if rest.starts_with('(') {
        ("", first, rest)
    } else {
        let (name, pattern) = rest
            .split_once(char::is_whitespace)
            .ok_or_else(|| syntax("expected 'Value [Options] NAME (REGEX)'"))?;
        (first, name, pattern.trim_start())
    };

    if !is_identifier(name) {
        return Err(syntax(&format!("invalid value name '{name}'")));
    }

    let pattern = pattern.trim_end();
    if !(pattern.starts_with('(') && pattern.ends_with(')')) {
        return Err(syntax("value regex must be wrapped in parentheses"));
    }
    Regex::new(pattern).map_err(|source| TemplateError::InvalidRegex {
        line: line_no,
        source,
    })?;

    let mut value = Value {
        name: name.to_string(),
        pattern: pattern.to_string(),
        required: false,
        filldown: false,
    };

    for option in options.split(',').filter(|o| !o.is_empty()) {
        match option {
            "Required" => value.required = true,
            "Filldown" => value.filldown = true,
            other => return Err(syntax(&format!("unknown value option '{other}'"))),
        }
    }

    Ok(value)
}

/// Parse `^REGEX [-> ACTION]`.
fn parse_rule(line: &str, line_no: usize) -> Result<RawRule, TemplateError> {
    let (pattern, action) = match ACTION_ARROW.find_iter(line).last() {
        Some(arrow) => {
            let action = line[arrow.end()..].trim();
            if action.is_empty() {
                return Err(TemplateError::Syntax {
                    line: line_no,
                    message: "missing action after '->'".to_string(),
                });
            }
            (&line[..arrow.start()], action)
        }
        None => (line, ""),
    };

    let tokens: Vec<&str> = action.split_whitespace().collect();
    let action = match tokens.as_slice() {
        [] | ["Next"] => RawAction::Next,
        ["End"] => RawAction::End,
        ["Record"] => RawAction::Record(None),
        ["Record", state] => RawAction::Record(Some((*state).to_string())),
        [state] if is_identifier(state) => RawAction::Goto((*state).to_string()),
        _ => {
            return Err(TemplateError::Syntax {
                line: line_no,
                message: format!("invalid action '{action}'"),
            });
        }
    };

    Ok(RawRule {
        pattern: pattern.to_string(),
        action,
        line: line_no,
    })
}

/// Replace `${NAME}` with `(?P<NAME>...)` and compile.
fn expand_rule(
    pattern: &str,
    values: &[Value],
    line: usize,
) -> Result<(Regex, Vec<usize>), TemplateError> {
    let mut expanded = String::with_capacity(pattern.len() * 2);
    let mut captured = Vec::new();
    let mut rest = pattern;

    while let Some(open) = rest.find("${") {
        expanded.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after.find('}').ok_or_else(|| TemplateError::Syntax {
            line,
            message: "unterminated '${' reference".to_string(),
        })?;
        let name = &after[..close];
        let idx = values
            .iter()
            .position(|v| v.name == name)
            .ok_or_else(|| TemplateError::UndefinedValue {
                line,
                name: name.to_string(),
            })?;

        expanded.push_str("(?P<");
        expanded.push_str(name);
        expanded.push('>');
        expanded.push_str(&values[idx].pattern[1..]);
        if !captured.contains(&idx) {
            captured.push(idx);
        }
        rest = &after[close + 1..];
    }
    expanded.push_str(rest);

    let regex = Regex::new(&expanded).map_err(|source| TemplateError::InvalidRegex { line, source })?;
    Ok((regex, captured))
}
