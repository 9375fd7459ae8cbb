//! Low-level byte-by-byte parser for single ASCII text lines.
//!
//! This module provides [ByteParser], a cursor over the bytes of one line with
//! support for peeking, consuming, and scanning the few token shapes the
//! hierarchy format needs (unsigned identifiers, whitespace-delimited tokens,
//! literal separators). Used as the foundation of the hierarchy parser.

/// Whitespace accepted between tokens on a line.
const LINE_WHITESPACE: &[u8] = b" \t\r\n";

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser over one line of ASCII text.
///
/// [ByteParser] never allocates while scanning: tokens are returned as slices
/// of the underlying input. Matching of separators is exact (the hierarchy
/// format is case-sensitive except for infinity tokens, which are handled by
/// the caller).
///
/// # Example
/// ```
/// use ephtree::parser::byte_parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("12 -- 7");
/// assert_eq!(parser.parse_unsigned(), Some(12));
/// parser.skip_whitespace();
/// assert!(parser.consume_if_sequence(b"--"));
/// parser.skip_whitespace();
/// assert_eq!(parser.parse_unsigned(), Some(7));
/// assert!(parser.is_eof());
/// ```
pub struct ByteParser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> ByteParser<'a> {
    /// Creates a new `ByteParser` over a byte slice.
    ///
    /// # Arguments
    /// * `input` - The bytes to parse
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Creates a new `ByteParser` over the bytes of a string slice.
    ///
    /// # Arguments
    /// * `input` - The string to parse
    pub fn for_str(input: &'a str) -> Self {
        Self::new(input.as_bytes())
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of line
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of line
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space (' '), tab ('\t'), newline ('\n'), and carriage return ('\r').
    ///
    /// # Returns
    /// Number of bytes skipped
    pub fn skip_whitespace(&mut self) -> usize {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if LINE_WHITESPACE.contains(&b) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.pos - start
    }

    /// Consumes the current byte if it matches the target byte exactly.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Checks if the following bytes match the given byte sequence exactly.
    ///
    /// This is a peek operation - the parser position is not changed.
    #[inline]
    pub fn peek_is_sequence(&self, sequence: &[u8]) -> bool {
        self.input[self.pos..].starts_with(sequence)
    }

    /// Consumes the next bytes if they match the given byte sequence exactly.
    ///
    /// # Returns
    /// `true` if the sequence was matched and consumed, `false` otherwise
    pub fn consume_if_sequence(&mut self, sequence: &[u8]) -> bool {
        if !self.peek_is_sequence(sequence) {
            return false;
        }

        self.pos += sequence.len();
        true
    }

    /// Parses a run of ASCII digits as an unsigned integer.
    ///
    /// Consumes the digits only if at least one digit is present and the value
    /// fits into a `u64`; otherwise the position is left unchanged.
    ///
    /// # Returns
    /// * `Some(u64)` - The parsed value
    /// * `None` - If no digits are at the current position or the value overflows
    pub fn parse_unsigned(&mut self) -> Option<u64> {
        let start = self.pos;
        let mut value: u64 = 0;

        while let Some(b) = self.peek() {
            if !b.is_ascii_digit() {
                break;
            }
            let digit = u64::from(b - b'0');
            match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                Some(v) => value = v,
                None => {
                    self.pos = start;
                    return None;
                }
            }
            self.pos += 1;
        }

        if self.pos == start { None } else { Some(value) }
    }

    /// Parses a token, that is, a maximal run of non-whitespace bytes.
    ///
    /// # Returns
    /// * `Some(&str)` - The token (non-empty)
    /// * `None` - If at whitespace or end of line, or the token is not valid UTF-8
    pub fn parse_token(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if LINE_WHITESPACE.contains(&b) {
                break;
            }
            self.pos += 1;
        }

        if self.pos == start {
            return None;
        }

        match std::str::from_utf8(&self.input[start..self.pos]) {
            Ok(token) => Some(token),
            Err(_) => {
                self.pos = start;
                None
            }
        }
    }

    /// Returns whether the end of the line has been reached.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the current parser position in the line.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        let end = (self.pos + k).min(self.input.len());
        String::from_utf8_lossy(&self.input[self.pos..end]).into_owned()
    }

    /// Returns the remainder of the line without consuming it.
    pub fn rest(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_whitespace_counts() {
        let mut parser = ByteParser::for_str(" \t \r x");
        assert_eq!(parser.skip_whitespace(), 4);
        assert_eq!(parser.peek(), Some(b'x'));
        assert_eq!(parser.skip_whitespace(), 0);
    }

    #[test]
    fn test_parse_unsigned() {
        let mut parser = ByteParser::for_str("1234:5");
        assert_eq!(parser.parse_unsigned(), Some(1234));
        assert_eq!(parser.peek(), Some(b':'));
        assert_eq!(parser.parse_unsigned(), None);
        assert_eq!(parser.position(), 4);
    }

    #[test]
    fn test_parse_unsigned_overflow_leaves_position() {
        let mut parser = ByteParser::for_str("99999999999999999999999");
        assert_eq!(parser.parse_unsigned(), None);
        assert_eq!(parser.position(), 0);
    }

    #[test]
    fn test_parse_token() {
        let mut parser = ByteParser::for_str("0.25\tinf  trailing");
        assert_eq!(parser.parse_token(), Some("0.25"));
        parser.skip_whitespace();
        assert_eq!(parser.parse_token(), Some("inf"));
        parser.skip_whitespace();
        assert_eq!(parser.parse_token(), Some("trailing"));
        assert_eq!(parser.parse_token(), None);
        assert!(parser.is_eof());
    }

    #[test]
    fn test_consume_if_sequence() {
        let mut parser = ByteParser::for_str("--2");
        assert!(!parser.consume_if_sequence(b"---"));
        assert!(parser.consume_if_sequence(b"--"));
        assert_eq!(parser.rest(), b"2");
    }

    #[test]
    fn test_context() {
        let mut parser = ByteParser::for_str("ab: cdefgh");
        parser.next_byte();
        assert_eq!(parser.get_context_as_string(4), "b: c");
        assert_eq!(parser.get_context_as_string(100), "b: cdefgh");
    }
}
