//! A single CLI command and its send options.

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// A command to send to the device.
///
/// Deserializes from either a bare string or a mapping:
///
/// ```rust
/// use saos6_facts::Command;
///
/// let plain: Command = serde_json::from_str(r#""port show""#).unwrap();
/// assert_eq!(plain.command, "port show");
///
/// let interactive: Command = serde_json::from_str(
///     r#"{"command": "configuration reset", "prompt": "(y/n)", "answer": "y"}"#,
/// ).unwrap();
/// assert_eq!(interactive.prompt, vec!["(y/n)"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CommandRepr")]
pub struct Command {
    /// The command text, without trailing newline.
    pub command: String,

    /// Interactive prompts (regex) the device may ask while running the command.
    pub prompt: Vec<String>,

    /// Answers, one per entry in `prompt`.
    pub answer: Vec<String>,

    /// Send without waiting for a response.
    pub sendonly: bool,

    /// Append a newline to the command and to each answer.
    pub newline: bool,

    /// Every prompt must be answered, in order, before the command completes.
    pub check_all: bool,

    /// Output format. Not supported on SAOS6; any value is rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl Command {
    /// Create a plain command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            prompt: Vec::new(),
            answer: Vec::new(),
            sendonly: false,
            newline: true,
            check_all: false,
            output: None,
        }
    }

    /// Add an interactive prompt and the answer to send when it appears.
    pub fn with_prompt(mut self, prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        self.prompt.push(prompt.into());
        self.answer.push(answer.into());
        self
    }

    /// Send the command without waiting for output.
    pub fn send_only(mut self) -> Self {
        self.sendonly = true;
        self
    }

    /// Do not append a newline.
    pub fn without_newline(mut self) -> Self {
        self.newline = false;
        self
    }

    /// Require every prompt to be answered in order.
    pub fn check_all(mut self) -> Self {
        self.check_all = true;
        self
    }

    /// Request an output format.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Reject commands that cannot be sent.
    pub fn validate(&self, operation: &'static str) -> Result<(), ConfigurationError> {
        if self.command.trim().is_empty() {
            return Err(ConfigurationError::MissingCommand);
        }

        if let Some(output) = &self.output {
            return Err(ConfigurationError::UnsupportedOutput {
                output: output.clone(),
                operation,
            });
        }

        if self.prompt.len() != self.answer.len() {
            return Err(ConfigurationError::PromptAnswerMismatch {
                command: self.command.clone(),
                prompts: self.prompt.len(),
                answers: self.answer.len(),
            });
        }

        Ok(())
    }

    /// Compile the interactive prompt patterns.
    pub(crate) fn compile_prompts(&self) -> Result<Vec<Regex>, ConfigurationError> {
        self.prompt
            .iter()
            .map(|p| Regex::new(p).map_err(ConfigurationError::from))
            .collect()
    }
}

impl From<&str> for Command {
    fn from(command: &str) -> Self {
        Self::new(command)
    }
}

impl From<String> for Command {
    fn from(command: String) -> Self {
        Self::new(command)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CommandRepr {
    Text(String),
    Fields(CommandFields),
}

#[derive(Deserialize)]
struct CommandFields {
    command: String,
    #[serde(default)]
    prompt: Option<OneOrMany>,
    #[serde(default)]
    answer: Option<OneOrMany>,
    #[serde(default)]
    sendonly: bool,
    #[serde(default = "default_newline")]
    newline: bool,
    #[serde(default)]
    check_all: bool,
    #[serde(default)]
    output: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

fn default_newline() -> bool {
    true
}

impl From<CommandRepr> for Command {
    fn from(repr: CommandRepr) -> Self {
        match repr {
            CommandRepr::Text(command) => Command::new(command),
            CommandRepr::Fields(f) => Command {
                command: f.command,
                prompt: f.prompt.map(Vec::from).unwrap_or_default(),
                answer: f.answer.map(Vec::from).unwrap_or_default(),
                sendonly: f.sendonly,
                newline: f.newline,
                check_all: f.check_all,
                output: f.output,
            },
        }
    }
}
