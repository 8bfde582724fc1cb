//! Bounded growable text buffer.

use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use std::ops::Range;

/// Default maximum text length in bytes, the classic editing-field ceiling.
pub const MAX_TEXT_LEN: usize = 32_767;

/// Extra headroom reserved on growth to amortize reallocation.
const GROW_SLACK: usize = 256;

/// Raw text storage with a hard maximum length.
///
/// The buffer grows geometrically (with [`GROW_SLACK`] headroom) and is
/// addressed exclusively by byte offset. Offsets handed to mutating calls
/// must lie on `char` boundaries; query helpers snap arbitrary offsets to
/// the nearest boundary at or below. Any edit that would exceed the maximum
/// length is rejected without touching the buffer.
#[derive(Clone, Debug)]
pub struct TextStore {
    buf: String,
    max_len: usize,
}

impl TextStore {
    /// Create an empty store with a maximum length.
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        Self {
            buf: String::new(),
            max_len,
        }
    }

    /// Current length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The configured maximum length in bytes.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// The full text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.buf
    }

    /// A slice of the text; endpoints are clamped and boundary-snapped.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> &str {
        let start = self.floor_boundary(range.start);
        let end = self.floor_boundary(range.end.max(range.start));
        &self.buf[start..end.max(start)]
    }

    /// Snap an offset to the closest `char` boundary at or below it.
    #[must_use]
    pub fn floor_boundary(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.buf.len());
        while offset > 0 && !self.buf.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    /// The character ending at `offset` and its start, if any.
    #[must_use]
    pub fn char_before(&self, offset: usize) -> Option<(usize, char)> {
        let offset = self.floor_boundary(offset);
        self.buf[..offset]
            .chars()
            .next_back()
            .map(|ch| (offset - ch.len_utf8(), ch))
    }

    /// The character starting at `offset` and its end, if any.
    #[must_use]
    pub fn char_after(&self, offset: usize) -> Option<(usize, char)> {
        let offset = self.floor_boundary(offset);
        self.buf[offset..]
            .chars()
            .next()
            .map(|ch| (offset + ch.len_utf8(), ch))
    }

    /// Replace the entire content.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        if text.len() > self.max_len {
            return Err(Error::TextOverflow {
                requested: text.len(),
                max: self.max_len,
            });
        }
        self.ensure_capacity(text.len())?;
        self.buf.clear();
        self.buf.push_str(text);
        Ok(())
    }

    /// Replace a byte range with new text, shifting the tail.
    ///
    /// This is the fundamental edit primitive. The range must lie on `char`
    /// boundaries (callers pass selection offsets, which always do). On
    /// rejection the buffer is untouched.
    pub fn replace_range(&mut self, range: Range<usize>, ins: &str) -> Result<()> {
        let start = self.floor_boundary(range.start);
        let end = self.floor_boundary(range.end).max(start);
        let new_len = self.buf.len() - (end - start) + ins.len();
        if new_len > self.max_len {
            emit_log(
                LogLevel::Debug,
                &format!("edit rejected: {new_len} bytes exceeds limit {}", self.max_len),
            );
            return Err(Error::TextOverflow {
                requested: new_len,
                max: self.max_len,
            });
        }
        self.ensure_capacity(new_len)?;
        self.buf.replace_range(start..end, ins);
        Ok(())
    }

    /// Reserve room for `needed` bytes, with growth headroom. Allocation
    /// failure leaves the buffer intact.
    fn ensure_capacity(&mut self, needed: usize) -> Result<()> {
        if needed <= self.buf.capacity() {
            return Ok(());
        }
        let target = (needed + GROW_SLACK).min(self.max_len + GROW_SLACK);
        let additional = target - self.buf.len();
        self.buf.try_reserve(additional).map_err(|_| {
            emit_log(
                LogLevel::Warn,
                &format!("text buffer growth to {target} bytes failed"),
            );
            Error::AllocationFailed { requested: target }
        })
    }
}

impl Default for TextStore {
    fn default() -> Self {
        Self::new(MAX_TEXT_LEN)
    }
}
