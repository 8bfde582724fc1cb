//! Selection navigation: boundaries, hit-testing, and caret geometry.
//!
//! Word boundaries scan over alphanumeric/underscore characters. Hit-testing
//! rounds to the nearest character edge (a click past a character's midpoint
//! lands after it), so approximate pointer positions resolve the way users
//! expect. Up/down movement is point-based: probe one line height above or
//! below the caret and hit-test the probe, which keeps the horizontal
//! position stable across lines of different content.

use crate::geometry::{Point, Rect};
use crate::input::{Key, Modifiers};
use crate::layout::{self, content_range};

use super::{CARET_WIDTH, Justification, TextEngine};

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

impl TextEngine {
    // ------------------------------------------------------------------
    // Boundaries
    // ------------------------------------------------------------------

    /// Offset of the start of the line containing `offset`.
    #[must_use]
    pub fn line_start_of(&self, offset: usize) -> usize {
        let offset = self.store.floor_boundary(offset);
        self.lines.start(self.lines.line_of(offset))
    }

    /// Offset of the end of the line containing `offset`, excluding the
    /// trailing terminator.
    #[must_use]
    pub fn line_end_of(&self, offset: usize) -> usize {
        let offset = self.store.floor_boundary(offset);
        let line = self.lines.line_of(offset);
        let range = self.lines.line_range(line, self.store.len());
        content_range(self.store.text(), range).end
    }

    /// The enclosing word at an offset: scan backward and forward over
    /// word characters. Clicking a non-word character selects just it.
    #[must_use]
    pub fn word_range_at(&self, offset: usize) -> std::ops::Range<usize> {
        let offset = self.store.floor_boundary(offset);
        let mut start = offset;
        while let Some((prev, ch)) = self.store.char_before(start) {
            if !is_word_char(ch) {
                break;
            }
            start = prev;
        }
        let mut end = offset;
        while let Some((next, ch)) = self.store.char_after(end) {
            if !is_word_char(ch) {
                break;
            }
            end = next;
        }
        if start == end {
            if let Some((next, _)) = self.store.char_after(end) {
                end = next;
            } else if let Some((prev, _)) = self.store.char_before(start) {
                start = prev;
            }
        }
        start..end
    }

    /// Offset just past the end of the word at or after `offset`.
    #[must_use]
    pub fn next_word_boundary(&self, offset: usize) -> usize {
        let mut pos = self.store.floor_boundary(offset);
        // Skip separators, then the word itself.
        while let Some((next, ch)) = self.store.char_after(pos) {
            if is_word_char(ch) {
                break;
            }
            pos = next;
        }
        while let Some((next, ch)) = self.store.char_after(pos) {
            if !is_word_char(ch) {
                break;
            }
            pos = next;
        }
        pos
    }

    /// Offset of the start of the word at or before `offset`.
    #[must_use]
    pub fn prev_word_boundary(&self, offset: usize) -> usize {
        let mut pos = self.store.floor_boundary(offset);
        while let Some((prev, ch)) = self.store.char_before(pos) {
            if is_word_char(ch) {
                break;
            }
            pos = prev;
        }
        while let Some((prev, ch)) = self.store.char_before(pos) {
            if !is_word_char(ch) {
                break;
            }
            pos = prev;
        }
        pos
    }

    /// Select the enclosing word (double-click).
    pub fn select_word_at(&mut self, offset: usize) {
        let range = self.word_range_at(offset);
        self.drag.anchor = range.start;
        self.set_selection(range.start, range.end);
    }

    /// Select the enclosing line without its terminator (triple-click).
    pub fn select_line_at(&mut self, offset: usize) {
        let start = self.line_start_of(offset);
        let end = self.line_end_of(offset);
        self.drag.anchor = start;
        self.set_selection(start, end);
    }

    // ------------------------------------------------------------------
    // Hit-testing and caret geometry
    // ------------------------------------------------------------------

    /// Horizontal origin of a line within the content, carrying the
    /// justification offset against the destination width.
    #[must_use]
    pub fn line_origin_x(&self, line: usize) -> i32 {
        if self.just == Justification::Left {
            return 0;
        }
        let text = self.store.text();
        let range = content_range(text, self.lines.line_range(line, text.len()));
        let source = self.style_source();
        let width = layout::advance_x(text, range, 0, &source, self.metrics.as_ref());
        let free = self.dest_rect.width() - width;
        match self.just {
            Justification::Left => 0,
            Justification::Center => (free / 2).max(0),
            Justification::Right => free.max(0),
        }
    }

    /// Content-space x of the caret position for an offset (justification
    /// included). Used for horizontal scroll-into-view.
    #[must_use]
    pub(crate) fn caret_x_content(&self, offset: usize) -> i32 {
        let offset = self.store.floor_boundary(offset);
        let line = self.lines.line_of(offset);
        let start = self.lines.start(line);
        let source = self.style_source();
        self.line_origin_x(line)
            + layout::advance_x(
                self.store.text(),
                start..offset,
                0,
                &source,
                self.metrics.as_ref(),
            )
    }

    /// Screen position of an offset: x at the leading edge of the
    /// character, y at the line's baseline.
    #[must_use]
    pub fn point_at_offset(&self, offset: usize) -> Point {
        let offset = self.store.floor_boundary(offset);
        let line = self.lines.line_of(offset);
        let x = self.view_rect.left - self.scroll.h() + self.caret_x_content(offset);
        let y = self.view_rect.top - self.scroll.v()
            + self.lines.top(line)
            + self.lines.ascent(line);
        Point::new(x, y)
    }

    /// The byte offset under a screen point, rounding to the nearest
    /// character edge. Points outside the content clamp to the nearest
    /// line or line end.
    #[must_use]
    pub fn offset_at_point(&self, pt: Point) -> usize {
        let text = self.store.text();
        let y_content = pt.y - self.view_rect.top + self.scroll.v();
        let line = self.lines.line_at_y(y_content);
        let range = content_range(text, self.lines.line_range(line, text.len()));
        let x_target = pt.x - self.view_rect.left + self.scroll.h() - self.line_origin_x(line);

        let source = self.style_source();
        let mut x = 0;
        for (i, ch) in text[range.clone()].char_indices() {
            let pos = range.start + i;
            let style = source.style_at(pos);
            let advance = layout::char_advance_at(ch, x, &style, self.metrics.as_ref());
            if x_target < x + advance / 2 {
                return pos;
            }
            x += advance;
        }
        range.end
    }

    /// The caret rectangle in screen coordinates, clipped to the view.
    #[must_use]
    pub fn caret_rect(&self) -> Rect {
        let pt = self.point_at_offset(self.sel_start);
        let line = self.lines.line_of(self.sel_start);
        let top = pt.y - self.lines.ascent(line);
        Rect::new(pt.x, top, pt.x + CARET_WIDTH, top + self.lines.height(line))
            .intersect(self.view_rect)
    }

    /// Screen rectangle spanning the lines that contain two offsets, used
    /// to invalidate selection changes.
    pub(crate) fn lines_span_rect(&self, lo: usize, hi: usize) -> Rect {
        let first = self.lines.line_of(lo.min(hi));
        let last = self.lines.line_of(lo.max(hi));
        let top = self.view_rect.top - self.scroll.v() + self.lines.top(first);
        let bottom = self.view_rect.top - self.scroll.v()
            + self.lines.top(last)
            + self.lines.height(last);
        Rect::new(self.view_rect.left, top, self.view_rect.right, bottom)
            .intersect(self.view_rect)
    }

    // ------------------------------------------------------------------
    // Extension and arrow movement
    // ------------------------------------------------------------------

    /// Extend the selection from the end not being moved to a new offset
    /// (shift-click, shift-arrow).
    pub fn extend_to(&mut self, new_pos: usize) {
        let new_pos = self.store.floor_boundary(new_pos);
        let anchor = if self.sel_start == self.sel_end {
            self.sel_start
        } else if self.drag.anchor == self.sel_start || self.drag.anchor == self.sel_end {
            self.drag.anchor
        } else if new_pos < self.sel_start {
            self.sel_end
        } else {
            self.sel_start
        };
        self.drag.anchor = anchor;
        self.set_selection(anchor.min(new_pos), anchor.max(new_pos));
    }

    /// The selection end that keyboard extension moves (the one opposite
    /// the anchor).
    fn moving_end(&self) -> usize {
        if self.sel_start == self.sel_end || self.drag.anchor == self.sel_start {
            self.sel_end
        } else if self.drag.anchor == self.sel_end {
            self.sel_start
        } else {
            self.sel_end
        }
    }

    pub(crate) fn handle_arrow(&mut self, key: Key, mods: Modifiers) {
        if !mods.shift() && self.sel_start != self.sel_end {
            // A bare arrow collapses a selection to its directional edge.
            let pos = match key {
                Key::Left | Key::Up => self.sel_start,
                _ => self.sel_end,
            };
            self.set_caret(pos);
            self.scroll_selection_into_view();
            return;
        }
        let base = if mods.shift() {
            self.moving_end()
        } else {
            self.sel_end
        };
        let target = self.arrow_target(base, key, mods);
        if mods.shift() {
            self.extend_to(target);
        } else {
            self.set_caret(target);
        }
        self.scroll_selection_into_view();
    }

    fn arrow_target(&self, base: usize, key: Key, mods: Modifiers) -> usize {
        match key {
            Key::Left => {
                if mods.line() {
                    self.line_start_of(base)
                } else if mods.word() {
                    self.prev_word_boundary(base)
                } else {
                    self.store.char_before(base).map_or(0, |(prev, _)| prev)
                }
            }
            Key::Right => {
                if mods.line() {
                    self.line_end_of(base)
                } else if mods.word() {
                    self.next_word_boundary(base)
                } else {
                    self.store
                        .char_after(base)
                        .map_or(self.store.len(), |(next, _)| next)
                }
            }
            Key::Up => {
                if mods.line() {
                    return 0;
                }
                let line = self.lines.line_of(base);
                if line == 0 {
                    return 0;
                }
                let pt = self.point_at_offset(base);
                self.offset_at_point(Point::new(pt.x, pt.y - self.lines.height(line)))
            }
            Key::Down => {
                if mods.line() {
                    return self.store.len();
                }
                let line = self.lines.line_of(base);
                if line + 1 >= self.lines.line_count() {
                    return self.store.len();
                }
                let pt = self.point_at_offset(base);
                self.offset_at_point(Point::new(pt.x, pt.y + self.lines.height(line)))
            }
            _ => base,
        }
    }

    /// Lines that fit in the view, for page movement. At least one.
    pub(crate) fn page_lines(&self) -> usize {
        let line_height = self.metrics.line_metrics(&self.default_style).height().max(1);
        ((self.view_rect.height() / line_height) as usize).saturating_sub(1).max(1)
    }
}
