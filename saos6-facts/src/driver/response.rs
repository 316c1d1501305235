//! Response type for command execution results.

use std::time::Duration;

use serde::Serialize;

/// Response from a command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// The command output (normalized - command echo and trailing prompt removed).
    pub result: String,

    /// The raw output before normalization.
    pub raw_result: String,

    /// The prompt that was matched at the end.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,

    /// Set when a device failure was captured instead of raised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
}

impl Response {
    /// Create a new successful response.
    pub fn new(
        command: impl Into<String>,
        result: impl Into<String>,
        raw_result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            raw_result: raw_result.into(),
            prompt: prompt.into(),
            elapsed,
            failure_message: None,
        }
    }

    /// Create a response that stands in for a failed command.
    ///
    /// `err` (the device's error text) becomes the result.
    pub fn failed(
        command: impl Into<String>,
        err: impl Into<String>,
        failure_message: impl Into<String>,
    ) -> Self {
        let err = err.into();
        Self {
            command: command.into(),
            raw_result: err.clone(),
            result: err,
            prompt: String::new(),
            elapsed: Duration::ZERO,
            failure_message: Some(failure_message.into()),
        }
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }
}
