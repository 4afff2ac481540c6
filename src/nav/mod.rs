//! Cursor and selection movement.
//!
//! Stateless algorithms over a [`TextStore`] and a [`Caret`]: every
//! operation is a pure transform from one caret to the next and never
//! mutates the store. The caret triple (cursor, selection start, selection
//! end) is always clamped to the store's content; the selection start may
//! lie after the end when a selection was extended backward.

use unicode_width::UnicodeWidthChar;

use crate::store::TextStore;

/// Movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Which end of a line to jump to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEdge {
    Start,
    End,
}

/// Cursor position plus selection endpoints, all byte offsets.
///
/// The selection is empty when both endpoints coincide. A remembered column
/// for vertical movement rides along but is not part of the clamped triple;
/// it is only consulted when the caller enables sticky-column movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caret {
    pub cursor: usize,
    pub selection_start: usize,
    pub selection_end: usize,
    sticky_column: Option<usize>,
}

impl Caret {
    /// A collapsed caret at offset 0.
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            selection_start: 0,
            selection_end: 0,
            sticky_column: None,
        }
    }

    /// A collapsed caret at `pos`.
    pub const fn at(pos: usize) -> Self {
        Self {
            cursor: pos,
            selection_start: pos,
            selection_end: pos,
            sticky_column: None,
        }
    }

    /// Whether a non-empty selection exists.
    pub const fn has_selection(&self) -> bool {
        self.selection_start != self.selection_end
    }

    /// Selection endpoints ordered low-to-high.
    pub const fn selection_range(&self) -> (usize, usize) {
        if self.selection_start <= self.selection_end {
            (self.selection_start, self.selection_end)
        } else {
            (self.selection_end, self.selection_start)
        }
    }

    /// Clamp all three offsets to the store's content.
    pub fn clamped(self, store: &TextStore) -> Self {
        let len = store.len();
        Self {
            cursor: self.cursor.min(len),
            selection_start: self.selection_start.min(len),
            selection_end: self.selection_end.min(len),
            sticky_column: self.sticky_column,
        }
    }

    // --- Movement ---

    /// Move the cursor by `delta` whole characters, clamping at the content
    /// bounds. Unchanged when no movement is possible.
    pub fn move_by_chars(self, store: &TextStore, delta: isize, extend: bool) -> Self {
        let caret = self.clamped(store);
        let new_pos = store.offset_by_chars(caret.cursor, delta);
        if new_pos == caret.cursor {
            return caret;
        }
        caret.placed(new_pos, extend)
    }

    /// Move the cursor to the previous/next word boundary. Word characters
    /// are alphanumerics and underscore; the scan skips one run of word
    /// characters and the adjoining run of non-word characters.
    pub fn move_by_words(self, store: &TextStore, direction: Direction, extend: bool) -> Self {
        let caret = self.clamped(store);
        let new_pos = match direction {
            Direction::Left => word_boundary_left(store, caret.cursor),
            Direction::Right => word_boundary_right(store, caret.cursor),
            Direction::Up | Direction::Down => caret.cursor,
        };
        if new_pos == caret.cursor {
            return caret;
        }
        caret.placed(new_pos, extend)
    }

    /// Move the cursor one line up or down, clamping the column to the
    /// destination line's length.
    ///
    /// With `sticky` disabled the column is re-derived from the landed
    /// offset, so passing through a short line loses the original column.
    /// With `sticky` enabled the remembered column is restored whenever a
    /// later line is long enough.
    pub fn move_vertically(
        self,
        store: &TextStore,
        direction: Direction,
        extend: bool,
        sticky: bool,
    ) -> Self {
        let caret = self.clamped(store);
        let line = store.line_at(caret.cursor);
        let target = match direction {
            Direction::Up => {
                if line == 0 {
                    return caret;
                }
                line - 1
            }
            Direction::Down => {
                if line + 1 >= store.line_count() {
                    return caret;
                }
                line + 1
            }
            Direction::Left | Direction::Right => return caret,
        };

        let column = store.column_at(caret.cursor);
        let desired = if sticky {
            caret.sticky_column.unwrap_or(column)
        } else {
            column
        };
        let new_pos = store.floor_char_boundary(store.offset_from(target, desired));
        let mut moved = caret.placed(new_pos, extend);
        if sticky {
            moved.sticky_column = Some(desired);
        }
        moved
    }

    /// Jump to the start or end of the cursor's line.
    pub fn move_to_line_boundary(self, store: &TextStore, edge: LineEdge, extend: bool) -> Self {
        let caret = self.clamped(store);
        let line = store.line_at(caret.cursor);
        let new_pos = match edge {
            LineEdge::Start => store.line_start(line),
            LineEdge::End => store.line_end(line),
        };
        caret.placed(new_pos, extend)
    }

    /// Place the cursor at `pos` (snapped to a character boundary),
    /// collapsing or extending the selection. This is the entry point for
    /// pointer-driven placement.
    pub fn move_to(self, store: &TextStore, pos: usize, extend: bool) -> Self {
        let caret = self.clamped(store);
        caret.placed(store.floor_char_boundary(pos), extend)
    }

    /// Select the whole content, cursor at the end.
    pub fn select_all(self, store: &TextStore) -> Self {
        Self {
            cursor: store.len(),
            selection_start: 0,
            selection_end: store.len(),
            sticky_column: None,
        }
    }

    /// Collapse or extend the selection while moving the cursor to
    /// `new_pos`. When extending from a collapsed selection, the old cursor
    /// becomes the anchor; the moving endpoint is always the selection end.
    fn placed(self, new_pos: usize, extend: bool) -> Self {
        if extend {
            let anchor = if self.has_selection() {
                self.selection_start
            } else {
                self.cursor
            };
            Self {
                cursor: new_pos,
                selection_start: anchor,
                selection_end: new_pos,
                sticky_column: None,
            }
        } else {
            Self::at(new_pos)
        }
    }
}

/// Map a pointer coordinate to a byte offset.
///
/// The target line comes from `y`; within the line, characters are probed
/// left to right comparing cumulative rendered widths against `x`, with a
/// half-cell midpoint rule so clicks land on the nearer boundary. Cell
/// widths are Unicode display widths; tabs advance to the next stop of
/// `tab_width` cells.
pub fn position_from_visual(
    store: &TextStore,
    x: f32,
    y: f32,
    line_height: f32,
    char_width: f32,
    tab_width: usize,
) -> usize {
    if line_height <= 0.0 || char_width <= 0.0 {
        return 0;
    }
    let tab_width = tab_width.max(1);

    let line = if y <= 0.0 {
        0
    } else {
        ((y / line_height) as usize).min(store.line_count().saturating_sub(1))
    };
    let start = store.line_start(line);
    let end = store.line_end(line);

    let mut offset = start;
    let mut cells = 0usize;
    for ch in store.slice(start, end).chars() {
        let width = if ch == '\t' {
            tab_width - (cells % tab_width)
        } else {
            UnicodeWidthChar::width(ch).unwrap_or(0)
        };
        let left = cells as f32 * char_width;
        let span = width as f32 * char_width;
        if x < left + span / 2.0 {
            return offset;
        }
        offset += ch.len_utf8();
        cells += width;
    }
    offset
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn char_at_is_word(store: &TextStore, pos: usize) -> bool {
    store.char_at(pos).is_some_and(is_word_char)
}

fn word_boundary_left(store: &TextStore, pos: usize) -> usize {
    if pos == 0 {
        return 0;
    }
    let mut p = store.offset_by_chars(pos, -1);
    while p > 0 && !char_at_is_word(store, p) {
        p = store.offset_by_chars(p, -1);
    }
    while p > 0 && char_at_is_word(store, store.offset_by_chars(p, -1)) {
        p = store.offset_by_chars(p, -1);
    }
    p
}

fn word_boundary_right(store: &TextStore, pos: usize) -> usize {
    let len = store.len();
    let mut p = pos;
    while p < len && char_at_is_word(store, p) {
        p = store.offset_by_chars(p, 1);
    }
    while p < len && !char_at_is_word(store, p) {
        p = store.offset_by_chars(p, 1);
    }
    p
}
