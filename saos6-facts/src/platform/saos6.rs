//! Ciena SAOS6 platform definition.
//!
//! # Prompt Examples
//!
//! ```text
//! 5160-sw>                   # no unsaved changes
//! 5160-sw*>                  # unsaved configuration
//! ciena(config)*>            # with context in parentheses
//! diag@sw-1:/mnt/sysfs$      # diagnostic shell
//! ```

use crate::platform::{OnOpenCommand, PlatformDefinition};

/// Platform name for Ciena SAOS6.
pub const PLATFORM_NAME: &str = "ciena_saos6";

/// Network OS reported in device info.
pub const NETWORK_OS: &str = "ciena.saos6.saos6";

/// Terminal width requested on open.
pub const TERMINAL_WIDTH: u32 = 512;

/// Create the SAOS6 platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new(PLATFORM_NAME)
        .with_network_os(NETWORK_OS)
        // Hostname with up to three context groups, optional '*', then '> '
        .with_prompt_pattern(r"[\w+\-.:/\[\]]+(?:\([^)]+\)){0,3}[*]?> ")
        .with_prompt_pattern(r"@[\w\-.]+:\S+?[>#$] ?$")
        .with_error_pattern("SHELL PARSER FAILURE")
        .with_error_pattern(r"(?m)^[ \t]*ERROR:")
        .with_on_open_command(OnOpenCommand::required(
            "system shell session set more off",
        ))
        .with_on_open_command(OnOpenCommand::optional(
            format!("system shell session set window-width {TERMINAL_WIDTH}"),
            "unable to set terminal width, command responses may be truncated",
        ))
}
