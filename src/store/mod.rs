//! Text content storage for a single document.
//!
//! [`TextStore`] owns the character content of one document in a rope and
//! maps between byte offsets and (line, column) coordinates. It knows
//! nothing about history: mutation here is raw, and the recording layers
//! ([`crate::buffer::Buffer`], [`crate::session::Session`]) sit on top.

use ropey::Rope;

use crate::error::Result;

/// The character content of one document.
///
/// All public offsets are byte offsets into the UTF-8 content. Offsets that
/// land inside a multi-byte scalar snap to the scalar's start; offsets past
/// the end clamp or no-op, never panic. Line boundaries are `\n` bytes only.
#[derive(Debug, Clone)]
pub struct TextStore {
    rope: Rope,
    version: u64,
    modified: bool,
}

impl TextStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create a store holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            version: 0,
            modified: false,
        }
    }

    // --- Read access ---

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Whether the store holds no content.
    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Number of lines. An empty store has one line; a trailing `\n` starts
    /// a final empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// The full content.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The byte at `pos`, or `None` past the end.
    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        self.rope.get_byte(pos)
    }

    /// The character containing byte `pos`, or `None` past the end.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.len() {
            return None;
        }
        self.rope.get_char(self.rope.byte_to_char(pos))
    }

    /// The content of byte range `start..end`, both ends snapped to
    /// character boundaries and clamped to the content length.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let start = self.rope.byte_to_char(start.min(self.len()));
        let end = self.rope.byte_to_char(end.min(self.len()));
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    /// Snap `pos` down to the nearest character boundary (clamping to the
    /// content length first).
    pub fn floor_char_boundary(&self, pos: usize) -> usize {
        let char_idx = self.rope.byte_to_char(pos.min(self.len()));
        self.rope.char_to_byte(char_idx)
    }

    /// Walk `delta` whole characters from `pos`, clamping at both ends.
    pub fn offset_by_chars(&self, pos: usize, delta: isize) -> usize {
        let char_idx = self.rope.byte_to_char(pos.min(self.len()));
        let target = char_idx.saturating_add_signed(delta).min(self.rope.len_chars());
        self.rope.char_to_byte(target)
    }

    // --- Line/column mapping ---

    /// The line containing byte `pos`. Positions at or past the end map to
    /// the last line.
    pub fn line_at(&self, pos: usize) -> usize {
        self.rope.byte_to_line(pos.min(self.len()))
    }

    /// The byte column of `pos` within its line.
    pub fn column_at(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        pos - self.line_start(self.line_at(pos))
    }

    /// The offset where `line` begins. Lines past the end map to the
    /// content length.
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return self.len();
        }
        self.rope.line_to_byte(line)
    }

    /// The offset where `line` ends, excluding its terminating `\n`.
    pub fn line_end(&self, line: usize) -> usize {
        let count = self.line_count();
        if line >= count {
            return self.len();
        }
        if line + 1 < count {
            let next = self.rope.line_to_byte(line + 1);
            if next > 0 && self.byte_at(next - 1) == Some(b'\n') {
                return next - 1;
            }
            return next;
        }
        self.len()
    }

    /// Length of `line` in bytes, excluding its terminating `\n`.
    pub fn line_len(&self, line: usize) -> usize {
        self.line_end(line) - self.line_start(line)
    }

    /// The offset of (`line`, `column`), with `column` clamped to the
    /// line's length.
    pub fn offset_from(&self, line: usize, column: usize) -> usize {
        let start = self.line_start(line);
        let max = self.line_end(line) - start;
        start + column.min(max)
    }

    // --- Mutation ---

    /// Insert `text` at byte offset `pos`.
    ///
    /// A no-op returning `false` when `pos` is past the end or `text` is
    /// empty. Returns `true` when the content changed.
    pub fn insert(&mut self, pos: usize, text: &str) -> bool {
        if pos > self.len() || text.is_empty() {
            return false;
        }
        let char_idx = self.rope.byte_to_char(pos);
        self.rope.insert(char_idx, text);
        self.touch();
        true
    }

    /// Remove `len` bytes starting at `pos`.
    ///
    /// A no-op returning `false` when `pos` is at or past the end or `len`
    /// is zero; `len` is clamped to the remaining content. Both range ends
    /// snap to character boundaries.
    pub fn remove(&mut self, pos: usize, len: usize) -> bool {
        if pos >= self.len() || len == 0 {
            return false;
        }
        let start = self.rope.byte_to_char(pos);
        let end = self.rope.byte_to_char(pos.saturating_add(len).min(self.len()));
        if start >= end {
            return false;
        }
        self.rope.remove(start..end);
        self.touch();
        true
    }

    /// Replace the whole content, clearing the modified flag.
    pub fn load(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.version += 1;
        self.modified = false;
    }

    /// Replace the whole content from raw bytes.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::InvalidUtf8`] (leaving the store
    /// unchanged) when `bytes` is not valid UTF-8.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(bytes)?;
        self.load(text);
        Ok(())
    }

    /// Reset to empty content, clearing the modified flag.
    pub fn clear(&mut self) {
        self.load("");
    }

    // --- Version and modified tracking ---

    /// Counter incremented on every successful mutation; lets callers
    /// detect staleness without comparing content.
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Whether content has diverged from the last load/save point.
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clear the modified flag (after a successful save).
    pub const fn mark_clean(&mut self) {
        self.modified = false;
    }

    fn touch(&mut self) {
        self.version += 1;
        self.modified = true;
    }
}

impl Default for TextStore {
    fn default() -> Self {
        Self::new()
    }
}
