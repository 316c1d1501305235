//! # saos6-facts
//!
//! Async CLI fact gathering for Ciena SAOS6 switches.
//!
//! The crate drives an interactive shell session over any already-connected
//! async byte stream, negotiates the terminal, runs show commands and parses
//! the table output into an ordered fact tree.
//!
//! ## Features
//!
//! - Prompt and error-banner classification with tail search
//! - ANSI escape stripping across read boundaries
//! - Interactive prompt answering
//! - TextFSM-style templates kept as data files
//! - Subset selection (`gather_subset`, `gather_network_resources`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use saos6_facts::{DriverBuilder, Facts, Saos6Cliconf, SubsetRequest};
//!
//! # async fn example(stream: tokio::net::TcpStream) -> Result<(), saos6_facts::Error> {
//! // `stream` is a logged-in shell on the switch.
//! let driver = DriverBuilder::new().build(stream)?;
//! let mut cliconf = Saos6Cliconf::new(driver);
//! cliconf.open().await?;
//!
//! let gathered = Facts::default()
//!     .get_facts(&mut cliconf, Some(SubsetRequest::new(["all"])), None)
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&gathered.facts).unwrap());
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod cliconf;
pub mod driver;
pub mod error;
pub mod facts;
pub mod platform;
pub mod template;

// Re-export main types for convenience
pub use cliconf::{Capabilities, Cliconf, DeviceInfo, Saos6Cliconf};
pub use driver::{Command, DriverBuilder, GenericDriver, Response, SessionConfig};
pub use error::{Error, Result};
pub use facts::{
    FactTree, FactValue, Facts, FactsBuilder, GatheredFacts, InterfacesMode, SubsetRequest,
};
pub use platform::PlatformDefinition;
pub use template::{Record, Template};
