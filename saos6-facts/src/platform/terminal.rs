//! Shell setup run once when a session opens.

use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use super::{OnOpenCommand, PlatformDefinition};
use crate::driver::{Command, GenericDriver};
use crate::error::{ConnectionError, Error, Result};

/// Puts the device shell into a scriptable state: paging off, wide terminal.
#[derive(Debug, Clone)]
pub struct TerminalNegotiator {
    commands: Vec<OnOpenCommand>,
}

impl TerminalNegotiator {
    pub fn new(commands: Vec<OnOpenCommand>) -> Self {
        Self { commands }
    }

    pub fn from_platform(platform: &PlatformDefinition) -> Self {
        Self::new(platform.on_open_commands.clone())
    }

    /// Send every on-open command.
    ///
    /// A required command failing aborts with
    /// [`ConnectionError::Failure`]; an optional one only logs its warning.
    pub async fn on_open_shell<S>(&self, driver: &mut GenericDriver<S>) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        for on_open in &self.commands {
            match driver.send_command(&Command::new(&on_open.command)).await {
                Ok(_) => debug!("terminal: '{}' applied", on_open.command),
                Err(Error::Connection(err)) if !on_open.required => {
                    let warning = on_open.warning.as_deref().unwrap_or("on-open command failed");
                    warn!("{warning}: {err}");
                }
                Err(Error::Connection(err)) => {
                    warn!("terminal: '{}' failed: {err}", on_open.command);
                    return Err(ConnectionError::Failure {
                        message: "unable to set terminal parameters".to_string(),
                        err: err.err_text(),
                    }
                    .into());
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}
