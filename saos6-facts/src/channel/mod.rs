//! Channel layer for pattern matching.
//!
//! This module handles output accumulation with ANSI stripping and the
//! prompt/error classification that decides when a command is done.

mod buffer;
mod patterns;

pub use buffer::PatternBuffer;
pub use patterns::{Classification, TerminalPatterns, compile_prompt_pattern};
