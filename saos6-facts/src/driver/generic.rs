//! Session driver over any async byte stream.

use bytes::Bytes;
use log::{debug, trace};
use regex::bytes::Regex;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{Instant, timeout_at};

use super::builder::SessionConfig;
use super::command::Command;
use super::response::Response;
use crate::channel::{PatternBuffer, TerminalPatterns};
use crate::error::{ConnectionError, Error, Result};
use crate::platform::{PlatformDefinition, TerminalNegotiator};

/// Bytes requested per read.
const READ_CHUNK: usize = 4096;

/// Already-scanned bytes re-checked for error banners split across reads.
const ERROR_OVERLAP: usize = 128;

/// Driver for one interactive shell session.
///
/// The stream is anything that moves bytes to and from the device shell:
/// an SSH channel, a telnet socket, or an in-memory mock in tests.
/// Commands are strictly sequential.
pub struct GenericDriver<S> {
    /// The device byte stream.
    stream: S,

    /// Platform definition.
    platform: PlatformDefinition,

    /// Compiled prompt and error patterns.
    patterns: TerminalPatterns,

    /// Timeouts and buffer sizing.
    config: SessionConfig,

    /// Set once the initial prompt is seen and the terminal is negotiated.
    is_open: bool,

    /// Prompt that ended the last exchange.
    last_prompt: Option<String>,
}

impl<S> GenericDriver<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Create a driver. Nothing is sent until [`open`](Self::open).
    pub fn new(stream: S, platform: PlatformDefinition, config: SessionConfig) -> Result<Self> {
        let patterns = TerminalPatterns::new(&platform.terminal_stdout_re, &platform.terminal_stderr_re)
            .map_err(crate::error::ConfigurationError::from)?;

        Ok(Self {
            stream,
            platform,
            patterns,
            config,
            is_open: false,
            last_prompt: None,
        })
    }

    /// Wait for the first prompt and negotiate the terminal.
    ///
    /// Calling this on an open session does nothing.
    pub async fn open(&mut self) -> Result<()> {
        if self.is_open {
            debug!("session already open, skipping terminal setup");
            return Ok(());
        }

        if self.platform.initial_prompt_newline {
            self.write_line(b"", true).await?;
        }

        let (raw, prompt_start) = self.read_until_prompt(None, &[], false, true).await?;
        self.remember_prompt(&raw[prompt_start..]);
        debug!("initial prompt: {:?}", self.last_prompt);

        self.is_open = true;
        let negotiator = TerminalNegotiator::from_platform(&self.platform);
        if let Err(err) = negotiator.on_open_shell(self).await {
            self.is_open = false;
            return Err(err);
        }

        Ok(())
    }

    /// Send a command and wait for the prompt.
    ///
    /// Output containing an error banner still reads through to the prompt,
    /// then fails with [`ConnectionError::Failure`].
    pub async fn send_command(&mut self, command: &Command) -> Result<Response> {
        if !self.is_open {
            return Err(ConnectionError::NotOpen.into());
        }

        command.validate("send_command")?;
        let prompts = command.compile_prompts()?;

        let start = Instant::now();
        debug!("sending command: {}", command.command);
        self.write_line(command.command.as_bytes(), command.newline).await?;

        if command.sendonly {
            return Ok(Response::new(
                &command.command,
                "",
                "",
                "",
                start.elapsed(),
            ));
        }

        let (raw, prompt_start) = self
            .read_until_prompt(Some(command), &prompts, command.check_all, command.newline)
            .await?;
        let elapsed = start.elapsed();

        self.remember_prompt(&raw[prompt_start..]);
        let result = normalize_output(&raw[..prompt_start], &command.command);
        let prompt = self.last_prompt.clone().unwrap_or_default();

        Ok(Response::new(
            &command.command,
            result,
            String::from_utf8_lossy(&raw),
            prompt,
            elapsed,
        ))
    }

    /// Read until a prompt, answering interactive prompts along the way.
    ///
    /// Returns the whole output and the offset where the prompt begins.
    async fn read_until_prompt(
        &mut self,
        command: Option<&Command>,
        prompts: &[Regex],
        check_all: bool,
        newline: bool,
    ) -> Result<(Bytes, usize)> {
        let timeout = self.config.timeout;
        let deadline = Instant::now() + timeout;
        let mut buffer = PatternBuffer::new(self.config.search_depth);
        let mut chunk = vec![0u8; READ_CHUNK];
        let mut scan_from = 0;
        let mut interactive_from = 0;
        let mut answered = vec![false; prompts.len()];
        let mut failure: Option<String> = None;

        loop {
            let n = match timeout_at(deadline, self.stream.read(&mut chunk)).await {
                Ok(read) => read.map_err(ConnectionError::Io)?,
                Err(_) => {
                    return Err(match failure {
                        Some(err) => failure_error(command, err),
                        None => ConnectionError::Timeout(timeout).into(),
                    });
                }
            };
            if n == 0 {
                return Err(ConnectionError::Closed.into());
            }
            trace!("read {n} bytes");
            buffer.extend(&chunk[..n]);

            if let Some(idx) =
                next_interactive(buffer.since(interactive_from), prompts, &answered, check_all)
            {
                // Commands validated before sending always pair prompts with answers.
                let answer = command.map_or("", |c| c.answer[idx].as_str());
                debug!("answering interactive prompt {idx}");
                self.write_line(answer.as_bytes(), newline).await?;
                answered[idx] = true;
                interactive_from = buffer.len();
                scan_from = buffer.len();
                continue;
            }

            let window_start = scan_from.min(buffer.tail_start());
            let classification = self.patterns.classify(buffer.since(window_start));

            if failure.is_none() {
                if let Some(err) = classification.error {
                    debug!("error banner: {err}");
                    failure = Some(err);
                }
            }

            if let Some(range) = classification.prompt {
                if !check_all || answered.iter().all(|a| *a) {
                    let prompt_start = window_start + range.start;
                    if let Some(err) = failure {
                        return Err(failure_error(command, err));
                    }
                    return Ok((buffer.take(), prompt_start));
                }
            }

            scan_from = buffer.len().saturating_sub(ERROR_OVERLAP);
        }
    }

    async fn write_line(&mut self, data: &[u8], newline: bool) -> Result<()> {
        let mut line = Vec::with_capacity(data.len() + 1);
        line.extend_from_slice(data);
        if newline {
            line.push(b'\n');
        }
        self.stream
            .write_all(&line)
            .await
            .map_err(ConnectionError::Io)?;
        self.stream.flush().await.map_err(ConnectionError::Io)?;
        Ok(())
    }

    fn remember_prompt(&mut self, prompt: &[u8]) {
        let prompt = String::from_utf8_lossy(prompt).trim().to_string();
        if !prompt.is_empty() {
            self.last_prompt = Some(prompt);
        }
    }
}

impl<S> GenericDriver<S> {
    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// Prompt seen at the end of the last exchange, trimmed.
    pub fn last_prompt(&self) -> Option<&str> {
        self.last_prompt.as_deref()
    }

    /// Check if the session has been opened.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Set the per-command timeout.
    pub fn set_timeout(&mut self, timeout: std::time::Duration) {
        self.config.timeout = timeout;
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S> std::fmt::Debug for GenericDriver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericDriver")
            .field("platform", &self.platform.name)
            .field("config", &self.config)
            .field("is_open", &self.is_open)
            .field("last_prompt", &self.last_prompt)
            .finish()
    }
}

/// Index of the interactive prompt to answer next, if one is showing.
///
/// With `check_all` prompts are answered strictly in order; otherwise any
/// prompt may match, and may match again later.
fn next_interactive(window: &[u8], prompts: &[Regex], answered: &[bool], check_all: bool) -> Option<usize> {
    if check_all {
        let idx = answered.iter().position(|a| !a)?;
        return prompts[idx].is_match(window).then_some(idx);
    }
    prompts.iter().position(|re| re.is_match(window))
}

fn failure_error(command: Option<&Command>, err: String) -> Error {
    let message = match command {
        Some(command) => format!("{}: {err}", command.command),
        None => format!("error at login: {err}"),
    };
    ConnectionError::Failure { message, err }.into()
}

/// Strip carriage returns, the echoed command line, and surrounding blank lines.
fn normalize_output(body: &[u8], command: &str) -> String {
    let text = String::from_utf8_lossy(body).replace('\r', "");
    let command = command.trim();

    let output = match text.split_once('\n') {
        Some((first, rest)) if first.trim_end().ends_with(command) => rest,
        None if text.trim_end().ends_with(command) => "",
        _ => text.as_str(),
    };

    output.trim_start_matches('\n').trim_end().to_string()
}
