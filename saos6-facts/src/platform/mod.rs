//! Platform definitions.
//!
//! This module defines the vendor-specific terminal configuration: prompt
//! and error patterns plus the commands that prepare a fresh shell.

mod definition;
pub mod saos6;
mod terminal;

pub use definition::{OnOpenCommand, PlatformDefinition};
pub use terminal::TerminalNegotiator;
