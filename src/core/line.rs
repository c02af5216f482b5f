//! Line: a single mutable row of text.
//!
//! Lines are raw bytes with no trailing newline. Offsets are byte offsets and
//! must never exceed the line length; an out-of-range offset is a bug in the
//! caller and panics.

/// An owned, growable byte sequence for one row of the buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8>,
}

impl Line {
    /// Create an empty line
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Create a line owning a copy of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte at `offset`, if any
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// Insert `data` so that it starts at `offset`
    pub fn insert(&mut self, offset: usize, data: &[u8]) {
        assert!(
            offset <= self.bytes.len(),
            "line insert at {} past length {}",
            offset,
            self.bytes.len()
        );
        self.bytes.splice(offset..offset, data.iter().copied());
    }

    pub fn insert_byte(&mut self, offset: usize, byte: u8) {
        assert!(
            offset <= self.bytes.len(),
            "line insert at {} past length {}",
            offset,
            self.bytes.len()
        );
        self.bytes.insert(offset, byte);
    }

    pub fn append(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    /// Remove the bytes in `start..end`, shifting the tail left
    pub fn delete(&mut self, start: usize, end: usize) {
        assert!(
            start <= end && end <= self.bytes.len(),
            "line delete {}..{} out of bounds (length {})",
            start,
            end,
            self.bytes.len()
        );
        self.bytes.drain(start..end);
    }

    /// Split at `offset`: `self` keeps `..offset`, the returned line owns the rest
    pub fn split_off(&mut self, offset: usize) -> Line {
        assert!(
            offset <= self.bytes.len(),
            "line split at {} past length {}",
            offset,
            self.bytes.len()
        );
        Line {
            bytes: self.bytes.split_off(offset),
        }
    }

    /// Drop everything from `offset` on
    pub fn truncate(&mut self, offset: usize) {
        assert!(
            offset <= self.bytes.len(),
            "line truncate at {} past length {}",
            offset,
            self.bytes.len()
        );
        self.bytes.truncate(offset);
    }

    /// Lossy UTF-8 view for display and status messages
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Line::from_bytes(s.as_bytes())
    }
}

impl From<Vec<u8>> for Line {
    fn from(bytes: Vec<u8>) -> Self {
        Line { bytes }
    }
}
