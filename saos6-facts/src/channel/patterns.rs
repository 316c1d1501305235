//! Prompt and error-banner classification of raw terminal output.

use std::ops::Range;

use memchr::{memchr, memrchr};
use regex::bytes::Regex;

/// Outcome of classifying a chunk of output.
///
/// The two pattern sets are independent: a chunk can carry both an error
/// banner and the prompt that follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// The line holding an error banner, if one was seen.
    pub error: Option<String>,

    /// Byte range of the trailing prompt, if the chunk ends with one.
    pub prompt: Option<Range<usize>>,
}

impl Classification {
    /// The device is ready for the next command.
    pub fn is_complete(&self) -> bool {
        self.prompt.is_some()
    }

    /// The device signalled a failure.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Compiled stdout-prompt and stderr-error pattern sets.
#[derive(Debug, Clone)]
pub struct TerminalPatterns {
    stdout: Vec<Regex>,
    stderr: Vec<Regex>,
}

impl TerminalPatterns {
    /// Compile both pattern sets.
    ///
    /// Prompt patterns are anchored to the end of output (see
    /// [`compile_prompt_pattern`]); error patterns match anywhere.
    pub fn new<S: AsRef<str>>(stdout: &[S], stderr: &[S]) -> Result<Self, regex::Error> {
        let stdout = stdout
            .iter()
            .map(|p| compile_prompt_pattern(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let stderr = stderr
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stdout, stderr })
    }

    /// Classify a chunk of output against both pattern sets.
    pub fn classify(&self, chunk: &[u8]) -> Classification {
        Classification {
            error: self.find_error(chunk),
            prompt: self.find_prompt(chunk),
        }
    }

    /// Return the full line of the first error banner found.
    pub fn find_error(&self, data: &[u8]) -> Option<String> {
        self.stderr.iter().find_map(|re| re.find(data)).map(|m| {
            let start = memrchr(b'\n', &data[..m.start()]).map_or(0, |i| i + 1);
            let end = memchr(b'\n', &data[m.end()..]).map_or(data.len(), |i| m.end() + i);
            String::from_utf8_lossy(&data[start..end]).trim().to_string()
        })
    }

    /// Return the byte range of a trailing prompt.
    pub fn find_prompt(&self, data: &[u8]) -> Option<Range<usize>> {
        self.stdout.iter().find_map(|re| re.find(data)).map(|m| m.range())
    }
}

/// Compile a prompt pattern string into a regex.
///
/// Anchors to end of output unless the pattern already ends with `$`.
/// Only spaces and tabs may follow the prompt, never a line break.
pub fn compile_prompt_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let pattern = if pattern.ends_with('$') {
        pattern.to_string()
    } else {
        format!("{pattern}[ \\t]*$")
    };

    Regex::new(&pattern)
}
