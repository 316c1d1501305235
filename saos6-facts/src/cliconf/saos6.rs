//! SAOS6 command-execution interface over a session driver.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use tokio::io::{AsyncRead, AsyncWrite};

use super::{Capabilities, Cliconf, DeviceInfo};
use crate::driver::{Command, GenericDriver, Response};
use crate::error::Result;

static RUNNING_PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Running Package +: (\S+)").expect("valid regex"));

static PLATFORM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Platform Name + \| (\S+)").expect("valid regex"));

/// [`Cliconf`] for SAOS6 devices.
#[derive(Debug)]
pub struct Saos6Cliconf<S> {
    driver: GenericDriver<S>,
    capabilities: Option<Capabilities>,
}

impl<S> Saos6Cliconf<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(driver: GenericDriver<S>) -> Self {
        Self {
            driver,
            capabilities: None,
        }
    }

    /// Open the underlying session (initial prompt, terminal setup).
    pub async fn open(&mut self) -> Result<()> {
        self.driver.open().await
    }

    /// Query software version and platform name.
    ///
    /// The hostname comes from the session prompt rather than a command.
    pub async fn get_device_info(&mut self) -> Result<DeviceInfo> {
        let software = self.driver.send_command(&Command::new("software show")).await?;
        let chassis = self
            .driver
            .send_command(&Command::new("chassis show capabilities"))
            .await?;

        let info = DeviceInfo {
            network_os: self.driver.platform().network_os.clone(),
            network_os_version: parse_version(&software.result),
            network_os_model: parse_model(&chassis.result),
            network_os_hostname: self.driver.last_prompt().and_then(hostname_from_prompt),
            ..Default::default()
        };
        debug!("device info: {info:?}");
        Ok(info)
    }

    /// Fetch the running configuration.
    pub async fn get_config(&mut self) -> Result<String> {
        let response = self.driver.send_command(&Command::new("conf sh brief")).await?;
        Ok(response.result)
    }

    pub fn driver(&self) -> &GenericDriver<S> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut GenericDriver<S> {
        &mut self.driver
    }

    pub fn into_inner(self) -> GenericDriver<S> {
        self.driver
    }
}

impl<S> Cliconf for Saos6Cliconf<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send_command(&mut self, command: &Command) -> Result<Response> {
        self.driver.send_command(command).await
    }

    async fn get_capabilities(&mut self) -> Result<Capabilities> {
        if let Some(capabilities) = &self.capabilities {
            return Ok(capabilities.clone());
        }

        let capabilities = Capabilities::new(self.get_device_info().await?);
        self.capabilities = Some(capabilities.clone());
        Ok(capabilities)
    }
}

/// `SAOS-6.20,` -> `SAOS-6.20`
fn parse_version(text: &str) -> Option<String> {
    RUNNING_PACKAGE
        .captures(text)
        .map(|caps| caps[1].trim_end_matches(',').to_string())
}

fn parse_model(text: &str) -> Option<String> {
    PLATFORM_NAME.captures(text).map(|caps| caps[1].to_string())
}

/// Hostname part of a prompt such as `5160-sw*>` or `lab(config)>`.
fn hostname_from_prompt(prompt: &str) -> Option<String> {
    let prompt = prompt.trim();
    let name = match prompt.split_once('@') {
        Some((_, host)) => host.split(':').next().unwrap_or_default(),
        None => prompt
            .split(['(', '*', '>'])
            .next()
            .unwrap_or_default(),
    };
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_test::io::Builder;

    use super::*;
    use crate::driver::DriverBuilder;

    const SOFTWARE_SHOW: &str = "\
+------------------------------------------------------------------------------+
| Installed Package   : saos-06-20-00-0154                                     |
| Running Package     : SAOS-6.20,                                             |
+------------------------------------------------------------------------------+";

    const CHASSIS_CAPABILITIES: &str = "\
+------------------------------ CAPABILITIES ---------------------------------+
| Platform Name        | 5160                                                  |
| Platform Description | 5160 Service Aggregation Switch                       |
+------------------------------------------------------------------------------+";

    #[test]
    fn test_parse_version_strips_comma() {
        assert_eq!(parse_version(SOFTWARE_SHOW).as_deref(), Some("SAOS-6.20"));
        assert_eq!(parse_version("Running Package : SAOS-6.20,").as_deref(), Some("SAOS-6.20"));
        assert_eq!(parse_version("nothing"), None);
    }

    #[test]
    fn test_parse_model() {
        assert_eq!(parse_model(CHASSIS_CAPABILITIES).as_deref(), Some("5160"));
        assert_eq!(parse_model(""), None);
    }

    #[test]
    fn test_hostname_from_prompt() {
        assert_eq!(hostname_from_prompt("5160-sw*>").as_deref(), Some("5160-sw"));
        assert_eq!(hostname_from_prompt("lab(config)*> ").as_deref(), Some("lab"));
        assert_eq!(hostname_from_prompt("SAOS-lab>").as_deref(), Some("SAOS-lab"));
        assert_eq!(hostname_from_prompt("diag@sw-1:/mnt$").as_deref(), Some("sw-1"));
        assert_eq!(hostname_from_prompt(">"), None);
    }

    #[tokio::test]
    async fn test_capabilities_are_cached() {
        let more_off = "system shell session set more off";
        let width = "system shell session set window-width 512";
        let mock = Builder::new()
            .read(b"5160-sw*> ")
            .write(format!("{more_off}\n").as_bytes())
            .read(format!("{more_off}\r\n5160-sw*> ").as_bytes())
            .write(format!("{width}\n").as_bytes())
            .read(format!("{width}\r\n5160-sw*> ").as_bytes())
            .write(b"software show\n")
            .read(format!("software show\r\n{SOFTWARE_SHOW}\r\n5160-sw*> ").as_bytes())
            .write(b"chassis show capabilities\n")
            .read(format!("chassis show capabilities\r\n{CHASSIS_CAPABILITIES}\r\n5160-sw*> ").as_bytes())
            .build();

        let driver = DriverBuilder::new()
            .timeout(Duration::from_secs(5))
            .build(mock)
            .unwrap();
        let mut cliconf = Saos6Cliconf::new(driver);
        cliconf.open().await.unwrap();

        let first = cliconf.get_capabilities().await.unwrap();
        assert_eq!(first.network_api, "cliconf");
        assert_eq!(first.device_info.network_os, "ciena.saos6.saos6");
        assert_eq!(first.device_info.network_os_version.as_deref(), Some("SAOS-6.20"));
        assert_eq!(first.device_info.network_os_model.as_deref(), Some("5160"));
        assert_eq!(first.device_info.network_os_hostname.as_deref(), Some("5160-sw"));

        // Served from cache; the mock has no more scripted exchanges.
        let second = cliconf.get_capabilities().await.unwrap();
        assert_eq!(first, second);
    }
}
