//! Text protocol handling.
//!
//! This module implements the line-based protocol spoken by the `qubic`
//! binary: coordinate and position notation, and the command parser for
//! the main loop.

pub mod notation;
pub mod parser;

pub use notation::{encode_position, format_line, parse_coord, parse_position, NotationError};
pub use parser::{parse_command, Command, GoParams};
