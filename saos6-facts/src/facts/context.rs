//! State shared by the collectors of one gathering run.

use std::collections::HashMap;

use log::{debug, warn};

use crate::cliconf::Cliconf;
use crate::driver::Command;
use crate::error::Result;

/// Warnings and cached command output for one `get_facts` call.
#[derive(Debug, Default)]
pub struct CollectionContext {
    warnings: Vec<String>,
    responses: HashMap<String, String>,
}

impl CollectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning for the caller.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.warnings.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    /// Run `commands`, returning one output per command in order.
    ///
    /// Successful outputs are cached, so a command asked for by several
    /// collectors is sent once. Failed outputs (`check_rc = false`) are
    /// returned but not cached.
    pub async fn run_commands<C: Cliconf>(
        &mut self,
        cliconf: &mut C,
        commands: &[&str],
        check_rc: bool,
    ) -> Result<Vec<String>> {
        let mut pending: Vec<Command> = Vec::new();
        for &command in commands {
            if !self.responses.contains_key(command) && !pending.iter().any(|c| c.command == command) {
                pending.push(Command::new(command));
            }
        }
        debug!(
            "{} of {} commands cached",
            commands.len() - pending.len(),
            commands.len()
        );

        let mut failed = HashMap::new();
        if !pending.is_empty() {
            let responses = cliconf.run_commands(&pending, check_rc).await?;
            for response in responses {
                if response.is_success() {
                    self.responses.insert(response.command, response.result);
                } else {
                    failed.insert(response.command, response.result);
                }
            }
        }

        Ok(commands
            .iter()
            .map(|&command| {
                self.responses
                    .get(command)
                    .or_else(|| failed.get(command))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect())
    }
}
