//! Builder for creating session drivers.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};

use super::generic::GenericDriver;
use crate::error::Result;
use crate::platform::{PlatformDefinition, saos6};

/// Per-session timing and buffer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Deadline for each command's prompt.
    pub timeout: Duration,

    /// How many trailing bytes are searched for the prompt.
    pub search_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            search_depth: 1000,
        }
    }
}

/// Builder for constructing session drivers.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use saos6_facts::DriverBuilder;
///
/// # async fn example(stream: tokio::net::TcpStream) -> Result<(), saos6_facts::Error> {
/// let mut driver = DriverBuilder::new()
///     .timeout(Duration::from_secs(10))
///     .build(stream)?;
/// driver.open().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DriverBuilder {
    platform: PlatformDefinition,
    config: SessionConfig,
}

impl DriverBuilder {
    /// Create a builder for the SAOS6 platform.
    pub fn new() -> Self {
        Self {
            platform: saos6::platform(),
            config: SessionConfig::default(),
        }
    }

    /// Use a custom platform definition.
    pub fn platform(mut self, platform: PlatformDefinition) -> Self {
        self.platform = platform;
        self
    }

    /// Set the per-command timeout (default: 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the prompt search depth in bytes (default: 1000).
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.config.search_depth = depth;
        self
    }

    /// Build the driver around an already-connected stream.
    ///
    /// Nothing is sent until `open()` is called on the returned driver.
    pub fn build<S>(self, stream: S) -> Result<GenericDriver<S>>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        GenericDriver::new(stream, self.platform, self.config)
    }
}

impl Default for DriverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
