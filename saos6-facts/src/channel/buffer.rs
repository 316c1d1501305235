//! Output buffer with tail-search for prompt detection.
//!
//! Only the last `search_depth` bytes are searched for the prompt, so
//! detection cost stays flat no matter how large a `conf show brief` gets.

use std::fmt;

use bytes::{Bytes, BytesMut};
use regex::bytes::Regex;
use vte::{Parser, Perform};

/// Buffer for accumulating command output and searching its tail.
pub struct PatternBuffer {
    /// Accumulated output, ANSI escapes already removed.
    buffer: BytesMut,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,

    /// Escape-sequence parser; keeps state across chunk boundaries.
    parser: Parser,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            search_depth,
            parser: Parser::new(),
        }
    }

    /// Extend the buffer with new data, stripping ANSI escape codes.
    pub fn extend(&mut self, data: &[u8]) {
        let mut sink = Stripper {
            out: &mut self.buffer,
        };
        self.parser.advance(&mut sink, data);
    }

    /// Offset where the searchable tail begins.
    pub fn tail_start(&self) -> usize {
        self.buffer.len().saturating_sub(self.search_depth)
    }

    /// The searchable tail.
    pub fn tail(&self) -> &[u8] {
        &self.buffer[self.tail_start()..]
    }

    /// Everything from `offset` to the end.
    pub fn since(&self, offset: usize) -> &[u8] {
        &self.buffer[offset.min(self.buffer.len())..]
    }

    /// Search only the tail of the buffer for the pattern.
    ///
    /// Returned offsets are relative to [`tail_start`](Self::tail_start).
    pub fn search_tail(&self, pattern: &Regex) -> Option<regex::bytes::Match<'_>> {
        pattern.find(self.tail())
    }

    /// Check if the tail contains a pattern match.
    pub fn tail_contains(&self, pattern: &Regex) -> bool {
        self.search_tail(pattern).is_some()
    }

    /// Take the buffer contents and reset.
    pub fn take(&mut self) -> Bytes {
        self.buffer.split().freeze()
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the buffer contents as a string (lossy UTF-8 conversion).
    pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Get the search depth setting.
    pub fn search_depth(&self) -> usize {
        self.search_depth
    }
}

impl fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("len", &self.buffer.len())
            .field("search_depth", &self.search_depth)
            .finish()
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Keeps printable text and line control, drops escape sequences.
struct Stripper<'a> {
    out: &'a mut BytesMut,
}

impl Perform for Stripper<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.out.extend_from_slice(&[byte]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extend() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"Hello, world!");
        assert_eq!(buffer.as_slice(), b"Hello, world!");
    }

    #[test]
    fn test_ansi_stripping() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"\x1b[32mGreen text\x1b[0m\r\n");
        assert_eq!(buffer.as_slice(), b"Green text\r\n");
    }

    #[test]
    fn test_escape_split_across_chunks() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"port\x1b[");
        buffer.extend(b"1mshow");
        assert_eq!(buffer.as_slice(), b"portshow");
    }

    #[test]
    fn test_tail_search() {
        let mut buffer = PatternBuffer::new(20);
        buffer.extend(&[b'x'; 100]);
        buffer.extend(b"\nswitch*> ");

        let pattern = Regex::new(r"switch\*> ").unwrap();
        assert!(buffer.tail_contains(&pattern));
        assert_eq!(buffer.tail_start(), 90);
    }

    #[test]
    fn test_tail_search_not_in_tail() {
        let mut buffer = PatternBuffer::new(10);
        buffer.extend(b"switch*> ");
        buffer.extend(&[b'x'; 100]);

        let pattern = Regex::new(r"switch\*> ").unwrap();
        assert!(buffer.search_tail(&pattern).is_none());
        assert!(pattern.is_match(buffer.as_slice()));
    }

    #[test]
    fn test_take_clears_buffer() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"test data");
        assert_eq!(&buffer.take()[..], b"test data");
        assert!(buffer.is_empty());
        assert_eq!(buffer.since(5), b"");
    }
}
