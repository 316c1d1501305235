//! Error types for saos6-facts.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for saos6-facts operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Session-level failures (device error banners, timeouts, closed stream)
    #[error("Connection failure: {0}")]
    Connection(#[from] ConnectionError),

    /// Usage errors (bad command options, invalid patterns)
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Malformed parse template
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

/// Session-level errors raised while a command is in flight.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The device printed a known error banner.
    #[error("{message}")]
    Failure {
        message: String,
        /// The raw error text as printed by the device.
        err: String,
    },

    /// No prompt was seen before the deadline.
    #[error("Timed out after {0:?} waiting for prompt")]
    Timeout(Duration),

    /// The byte stream reached EOF.
    #[error("Connection closed")]
    Closed,

    /// A command was issued before `open()`.
    #[error("Session not open - call open() first")]
    NotOpen,

    /// I/O error on the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ConnectionError {
    /// Text substituted for a command's output when failures are not fatal.
    pub fn err_text(&self) -> String {
        match self {
            ConnectionError::Failure { err, .. } => err.clone(),
            other => other.to_string(),
        }
    }
}

/// Programming/usage errors. These are never transient.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Empty command text
    #[error("must provide value of command to execute")]
    MissingCommand,

    /// The `output` option is not supported on this platform.
    #[error("'output' value {output} is not supported for {operation}")]
    UnsupportedOutput {
        output: String,
        operation: &'static str,
    },

    /// Number of answers does not line up with the number of prompts.
    #[error("command '{command}' has {prompts} prompt(s) but {answers} answer(s)")]
    PromptAnswerMismatch {
        command: String,
        prompts: usize,
        answers: usize,
    },

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Template loading errors.
#[derive(Error, Debug, Clone)]
pub enum TemplateError {
    /// Line could not be understood.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A rule or value regex failed to compile.
    #[error("line {line}: invalid regex: {source}")]
    InvalidRegex {
        line: usize,
        #[source]
        source: regex::Error,
    },

    /// A rule transitions to a state that is never declared.
    #[error("line {line}: transition to undefined state '{state}'")]
    UndefinedState { line: usize, state: String },

    /// A rule references `${NAME}` without a matching `Value`.
    #[error("line {line}: reference to undefined value '{name}'")]
    UndefinedValue { line: usize, name: String },

    /// A value or state is declared twice.
    #[error("line {line}: '{name}' is declared twice")]
    Duplicate { line: usize, name: String },

    /// No `Start` state.
    #[error("template has no 'Start' state")]
    MissingStart,
}

/// Result type alias using saos6-facts' Error.
pub type Result<T> = std::result::Result<T, Error>;
