//! Error types for the hierarchy parser.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while reading a hierarchy, together with
//! [Malformation] describing why a node/edge set does not form a tree.

use crate::config::ConfigError;
use crate::model::NodeId;
use crate::parser::byte_parser::ByteParser;
use thiserror::Error;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

/// Maximal number of root ids listed in an error message.
const MAX_LISTED_ROOTS: usize = 5;

// =#========================================================================#=
// MALFORMATION
// =#========================================================================#=
/// Reasons why declared nodes and edges do not form a single rooted tree.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum Malformation {
    /// No node without incoming edge (includes empty input).
    #[error("hierarchy has no root")]
    NoRoot,
    /// More than one node without incoming edge.
    #[error("hierarchy has {} roots ({}), expected exactly one", .0.len(), list_ids(.0))]
    MultipleRoots(Vec<NodeId>),
    /// A node is the target of more than one edge.
    #[error("node {node} is assigned to parents {first} and {second}")]
    MultipleParents {
        node: NodeId,
        first: NodeId,
        second: NodeId,
    },
    /// A node can reach itself via parent links.
    #[error("cycle detected through node {0}")]
    Cycle(NodeId),
    /// The same node id is declared twice.
    #[error("node {0} is declared more than once")]
    DuplicateNode(NodeId),
}

fn list_ids(ids: &[NodeId]) -> String {
    let mut listed: Vec<String> = ids
        .iter()
        .take(MAX_LISTED_ROOTS)
        .map(|id| id.to_string())
        .collect();
    if ids.len() > MAX_LISTED_ROOTS {
        listed.push("...".to_string());
    }
    listed.join(", ")
}

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur while parsing a hierarchy.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    #[error("IO error - {0}")]
    IoError(String),
    #[error("Malformed hierarchy - {0}")]
    MalformedHierarchy(Malformation),
    #[error("Edge references undeclared node {0}")]
    UnknownNodeReference(NodeId),
    #[error("Invalid configuration - {0}")]
    InvalidConfig(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (line and offending text).
#[derive(Error, Debug, Clone)]
#[error("{kind}{}{}", line_suffix(.line), context_suffix(.context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    line: Option<usize>,
    context: String,
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" on line {l}")).unwrap_or_default()
}

fn context_suffix(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context: {context}")
    }
}

impl ParsingError {
    /// Create a ParsingError from an error type and the state of a line parser
    pub fn from_parser(kind: ParsingErrorType, line: usize, parser: &ByteParser<'_>) -> Self {
        Self {
            kind,
            line: Some(line),
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for UnknownNodeReference
    pub fn unknown_node_reference(id: NodeId, line: Option<usize>) -> Self {
        Self {
            kind: ParsingErrorType::UnknownNodeReference(id),
            line,
            context: String::new(),
        }
    }

    /// Convenience constructor for MalformedHierarchy
    pub fn malformed(malformation: Malformation) -> Self {
        Self::without_context(ParsingErrorType::MalformedHierarchy(malformation))
    }

    /// Create a ParsingError without line context (for builder errors)
    pub fn without_context(kind: ParsingErrorType) -> Self {
        Self {
            kind,
            line: None,
            context: String::new(),
        }
    }

    /// Attaches a line number to an error lacking one.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line.get_or_insert(line);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the (1-based) line where the error occurred, if known
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Returns whether this is a `MalformedHierarchy` error.
    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, ParsingErrorType::MalformedHierarchy(_))
    }

    /// Returns whether this is an `UnknownNodeReference` error.
    pub fn is_unknown_node_reference(&self) -> bool {
        matches!(self.kind, ParsingErrorType::UnknownNodeReference(_))
    }

    /// Returns whether the labels could not be normalised with the given config.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self.kind, ParsingErrorType::InvalidConfig(_))
    }
}

impl From<ConfigError> for ParsingError {
    fn from(err: ConfigError) -> Self {
        ParsingError::without_context(ParsingErrorType::InvalidConfig(err.to_string()))
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        ParsingError::without_context(ParsingErrorType::IoError(err.to_string()))
    }
}
