//! Command-execution interface used by the fact collectors.
//!
//! [`Cliconf`] is the seam between fact gathering and the device session:
//! collectors only ever talk to a `Cliconf`, so they can run against a live
//! [`Saos6Cliconf`] or a canned implementation in tests.

mod saos6;

pub use saos6::Saos6Cliconf;

use std::future::Future;

use log::warn;
use serde::Serialize;

use crate::driver::{Command, Response};
use crate::error::{Error, Result};

/// Network API name reported in capabilities.
pub const NETWORK_API: &str = "cliconf";

/// Device identity reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub network_os: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_os_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_os_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_os_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_os_platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_os_hostname: Option<String>,
}

impl DeviceInfo {
    /// Look up a `network_os_<item>` field by its short name.
    pub fn get(&self, item: &str) -> Option<&str> {
        let value = match item {
            "version" => &self.network_os_version,
            "model" => &self.network_os_model,
            "image" => &self.network_os_image,
            "platform" => &self.network_os_platform,
            "hostname" => &self.network_os_hostname,
            _ => return None,
        };
        value.as_deref()
    }
}

/// What the device connection supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Operations available over this interface.
    pub rpc: Vec<String>,
    pub device_info: DeviceInfo,
    pub network_api: String,
}

impl Capabilities {
    /// Capabilities with the standard rpc list.
    pub fn new(device_info: DeviceInfo) -> Self {
        Self {
            rpc: ["get_config", "get", "run_commands", "get_capabilities"]
                .into_iter()
                .map(String::from)
                .collect(),
            device_info,
            network_api: NETWORK_API.to_string(),
        }
    }
}

/// Trait for command execution against a device.
pub trait Cliconf: Send {
    /// Send a command and wait for its output.
    fn send_command(&mut self, command: &Command) -> impl Future<Output = Result<Response>> + Send;

    /// Describe the device and this interface.
    fn get_capabilities(&mut self) -> impl Future<Output = Result<Capabilities>> + Send;

    /// Run a single command.
    ///
    /// Empty commands and any `output` format are rejected before sending.
    fn get(&mut self, command: &Command) -> impl Future<Output = Result<Response>> + Send {
        async move {
            command.validate("get")?;
            self.send_command(command).await
        }
    }

    /// Run commands in order.
    ///
    /// Every command is validated before the first is sent. With
    /// `check_rc = false` a device failure does not stop the batch: the
    /// failed command's result is the device's error text and its response
    /// carries the failure message.
    fn run_commands(
        &mut self,
        commands: &[Command],
        check_rc: bool,
    ) -> impl Future<Output = Result<Vec<Response>>> + Send {
        async move {
            for command in commands {
                command.validate("run_commands")?;
            }

            let mut responses = Vec::with_capacity(commands.len());
            for command in commands {
                match self.send_command(command).await {
                    Ok(response) => responses.push(response),
                    Err(Error::Connection(err)) if !check_rc => {
                        warn!("'{}' failed, continuing: {err}", command.command);
                        responses.push(Response::failed(
                            &command.command,
                            err.err_text(),
                            err.to_string(),
                        ));
                    }
                    Err(err) => return Err(err),
                }
            }
            Ok(responses)
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Canned `Cliconf` for collector tests.

    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;
    use crate::error::ConnectionError;

    #[derive(Debug, Default)]
    pub(crate) struct MockCliconf {
        outputs: HashMap<String, std::result::Result<String, String>>,
        pub(crate) device_info: DeviceInfo,
        pub(crate) sent: Vec<String>,
    }

    impl MockCliconf {
        pub(crate) fn new() -> Self {
            Self {
                device_info: DeviceInfo {
                    network_os: "ciena.saos6.saos6".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            }
        }

        pub(crate) fn with_output(mut self, command: &str, output: &str) -> Self {
            self.outputs.insert(command.to_string(), Ok(output.to_string()));
            self
        }

        pub(crate) fn with_failure(mut self, command: &str, err: &str) -> Self {
            self.outputs.insert(command.to_string(), Err(err.to_string()));
            self
        }

        pub(crate) fn count(&self, command: &str) -> usize {
            self.sent.iter().filter(|c| *c == command).count()
        }
    }

    impl Cliconf for MockCliconf {
        async fn send_command(&mut self, command: &Command) -> Result<Response> {
            self.sent.push(command.command.clone());
            match self.outputs.get(&command.command) {
                Some(Ok(output)) => Ok(Response::new(
                    &command.command,
                    output.as_str(),
                    output.as_str(),
                    "sw*>",
                    Duration::ZERO,
                )),
                Some(Err(err)) => Err(ConnectionError::Failure {
                    message: format!("{}: {err}", command.command),
                    err: err.clone(),
                }
                .into()),
                None => Err(ConnectionError::Failure {
                    message: format!("{}: unknown command", command.command),
                    err: "SHELL PARSER FAILURE".to_string(),
                }
                .into()),
            }
        }

        async fn get_capabilities(&mut self) -> Result<Capabilities> {
            Ok(Capabilities::new(self.device_info.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockCliconf;
    use super::*;
    use crate::error::{ConfigurationError, ConnectionError};

    #[tokio::test]
    async fn test_get_rejects_output_and_empty() {
        let mut cliconf = MockCliconf::new().with_output("port show", "| 1 |");

        let err = cliconf
            .get(&Command::new("port show").with_output("json"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: 'output' value json is not supported for get"
        );

        let err = cliconf.get(&Command::new("")).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::MissingCommand)
        ));
        assert!(cliconf.sent.is_empty());

        let response = cliconf.get(&Command::new("port show")).await.unwrap();
        assert_eq!(response.result, "| 1 |");
    }

    #[tokio::test]
    async fn test_run_commands_check_rc() {
        let commands = vec![
            Command::new("port show port 1"),
            Command::new("port show port 2"),
            Command::new("port show port 3"),
        ];
        let mut cliconf = MockCliconf::new()
            .with_output("port show port 1", "one")
            .with_failure("port show port 2", "ERROR: port 2 does not exist")
            .with_output("port show port 3", "three");

        let responses = cliconf.run_commands(&commands, false).await.unwrap();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[1].result, "ERROR: port 2 does not exist");
        assert!(!responses[1].is_success());
        assert!(responses[2].is_success());

        let err = cliconf.run_commands(&commands, true).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::Failure { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_commands_validates_before_sending() {
        let commands = vec![
            Command::new("port show"),
            Command::new("lldp show neighbors").with_output("text"),
        ];
        let mut cliconf = MockCliconf::new().with_output("port show", "");

        let err = cliconf.run_commands(&commands, false).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::UnsupportedOutput { operation: "run_commands", .. })
        ));
        assert!(cliconf.sent.is_empty());
    }

    #[test]
    fn test_device_info_lookup() {
        let info = DeviceInfo {
            network_os: "ciena.saos6.saos6".to_string(),
            network_os_version: Some("SAOS-6.20".to_string()),
            ..Default::default()
        };
        assert_eq!(info.get("version"), Some("SAOS-6.20"));
        assert_eq!(info.get("model"), None);
        assert_eq!(info.get("bogus"), None);

        let json = serde_json::to_value(Capabilities::new(info)).unwrap();
        assert_eq!(json["network_api"], "cliconf");
        assert_eq!(json["device_info"]["network_os_version"], "SAOS-6.20");
        assert!(json["device_info"].get("network_os_model").is_none());
    }
}
