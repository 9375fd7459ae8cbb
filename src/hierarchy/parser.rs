//! Line-oriented parser turning hierarchy text into a validated [Hierarchy].

use crate::config::HierarchyConfig;
use crate::hierarchy::defs::{EDGE_SEPARATOR, INFINITY_TOKENS, NODE_SEPARATOR};
use crate::model::{Destroyer, Hierarchy, HierarchyBuilder, NodeId, PersistencePair};
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::ParsingError;
use std::io::Read;
use tracing::{debug, warn};

/// Outcome of recognising a single input line.
#[derive(Debug, Clone, PartialEq)]
enum LineKind {
    /// `<id>: <creator> <destroyer>`
    Node(NodeId, PersistencePair),
    /// `<parent> -- <child>`
    Edge(NodeId, NodeId),
    /// Starts like a node declaration, but the values are unusable.
    MalformedNode(NodeId, &'static str),
    /// Blank line, comment, or anything else.
    Ignored,
}

// =#========================================================================#=
// HIERARCHY PARSER
// =#========================================================================#=
/// Parser for the line-oriented hierarchy format.
///
/// Every line is matched against two prefixes:
/// * `<id>: <creator> <destroyer>` declares a node,
/// * `<idA> -- <idB>` declares `idA` as parent of `idB`.
///
/// All other lines are skipped. Node lines with unusable values are skipped
/// too, but reported as a warning. After the last line the collected nodes and
/// edges are validated by a [HierarchyBuilder].
///
/// # Example
/// ```
/// use ephtree::hierarchy::HierarchyParser;
///
/// let hierarchy = HierarchyParser::new()
///     .with_name("example")
///     .parse_str("1: 0 inf\n2: 1 3\n1 -- 2\n")
///     .unwrap();
/// assert_eq!(hierarchy.name(), Some("example"));
/// assert_eq!(hierarchy.num_vertices(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HierarchyParser {
    config: HierarchyConfig,
    name: Option<String>,
}

impl HierarchyParser {
    /// Creates a parser with the default [HierarchyConfig].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration used to normalise labels.
    pub fn with_config(mut self, config: HierarchyConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the name given to parsed hierarchies.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the configuration used to normalise labels.
    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// Parses a complete hierarchy from a string.
    pub fn parse_str(&self, text: &str) -> Result<Hierarchy, ParsingError> {
        self.parse_bytes(text.as_bytes())
    }

    /// Reads `reader` to the end and parses a complete hierarchy.
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Hierarchy, ParsingError> {
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents)?;
        self.parse_bytes(&contents)
    }

    /// Parses a complete hierarchy from raw bytes, one declaration per line.
    ///
    /// # Errors
    /// * `MalformedHierarchy` - duplicate ids, zero or several roots,
    ///   multiple parents, or cycles
    /// * `UnknownNodeReference` - an edge names an undeclared id
    /// * `InvalidConfig` - the configured scale factor or sentinel is out of range
    pub fn parse_bytes(&self, input: &[u8]) -> Result<Hierarchy, ParsingError> {
        self.config.validate()?;
        let mut builder = HierarchyBuilder::new(self.config);
        if let Some(name) = &self.name {
            builder.set_name(name.clone());
        }

        for (i, line) in input.split(|&b| b == b'\n').enumerate() {
            let line_number = i + 1;
            match recognize_line(line) {
                LineKind::Node(id, pair) => {
                    self.check_against_sentinel(id, &pair, line_number);
                    builder.declare_node(id, pair).map_err(|e| {
                        ParsingError::from_parser(e.kind().clone(), line_number, &ByteParser::new(line))
                    })?;
                }
                LineKind::Edge(parent, child) => builder.add_edge_on_line(parent, child, line_number),
                LineKind::MalformedNode(id, reason) => {
                    warn!(line = line_number, node = id, reason, "skipping malformed node declaration");
                }
                LineKind::Ignored => {
                    if line.iter().any(|b| !b.is_ascii_whitespace()) {
                        debug!(line = line_number, "ignoring unrecognised line");
                    }
                }
            }
        }

        let (nodes, edges) = (builder.num_nodes(), builder.num_edges());
        let hierarchy = builder.finish()?;
        debug!(
            name = hierarchy.name().unwrap_or("<unnamed>"),
            nodes,
            edges,
            depth = hierarchy.depth(),
            "parsed hierarchy"
        );
        Ok(hierarchy)
    }

    /// Finite values at or above the sentinel would make the infinite
    /// destroyer indistinguishable from a finite one.
    fn check_against_sentinel(&self, id: NodeId, pair: &PersistencePair, line: usize) {
        let sentinel = self.config.infinite_destroyer_sentinel;
        let largest = match pair.destroyer() {
            Destroyer::Finite(destroyer) => pair.creator().abs().max(destroyer.abs()),
            Destroyer::Infinite => pair.creator().abs(),
        };
        if self.config.scale_value(largest) >= sentinel {
            warn!(line, node = id, sentinel, "finite value reaches the infinite destroyer sentinel");
        }
    }
}

// ============================================================================
// Line recognition (private)
// ============================================================================
/// Classifies one line by its prefix; trailing content is ignored.
fn recognize_line(line: &[u8]) -> LineKind {
    let mut parser = ByteParser::new(line);
    parser.skip_whitespace();
    let Some(first) = parser.parse_unsigned() else {
        return LineKind::Ignored;
    };
    parser.skip_whitespace();

    if parser.consume_if(NODE_SEPARATOR) {
        return match parse_pair(&mut parser) {
            Ok(pair) => LineKind::Node(first, pair),
            Err(reason) => LineKind::MalformedNode(first, reason),
        };
    }

    if parser.consume_if_sequence(EDGE_SEPARATOR) {
        parser.skip_whitespace();
        if let Some(second) = parser.parse_unsigned() {
            return LineKind::Edge(first, second);
        }
    }

    LineKind::Ignored
}

/// Parses `<creator> <destroyer>` following a node separator.
fn parse_pair(parser: &mut ByteParser<'_>) -> Result<PersistencePair, &'static str> {
    parser.skip_whitespace();
    let creator = parser.parse_token().ok_or("missing creator")?;
    let creator = parse_finite(creator).ok_or("creator is not a finite number")?;

    if parser.skip_whitespace() == 0 {
        return Err("missing destroyer");
    }
    let destroyer = parser.parse_token().ok_or("missing destroyer")?;
    let destroyer = if is_infinity_token(destroyer) {
        Destroyer::Infinite
    } else {
        Destroyer::Finite(parse_finite(destroyer).ok_or("destroyer is neither a finite number nor infinity")?)
    };

    Ok(PersistencePair::new(creator, destroyer))
}

/// Parses a decimal number, rejecting NaN and infinities.
fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_infinity_token(token: &str) -> bool {
    let token = token.strip_prefix('+').unwrap_or(token);
    INFINITY_TOKENS.iter().any(|inf| token.eq_ignore_ascii_case(inf))
}
