//! Low-level line scanning and error reporting shared by the hierarchy parser.
//!
//! This module provides the byte cursor used to recognise node and edge
//! declarations, along with the parsing error types.

pub mod byte_parser;
pub mod parsing_error;

pub use byte_parser::ByteParser;
pub use parsing_error::{Malformation, ParsingError, ParsingErrorType};
