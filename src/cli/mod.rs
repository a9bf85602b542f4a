//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes defining commands, parsing arguments, handling user interaction
//! (prompts, progress) and the command handlers themselves.

mod commands;
mod prompt;
mod rename;

pub use commands::*;
