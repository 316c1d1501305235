//! Session driver for device interaction.
//!
//! The driver layer owns the byte stream, sends commands one at a time and
//! reads each response up to the device prompt.

mod builder;
mod command;
mod generic;
mod response;

pub use builder::{DriverBuilder, SessionConfig};
pub use command::Command;
pub use generic::GenericDriver;
pub use response::Response;
