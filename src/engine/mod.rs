//! The text engine: storage, selection, editing, and viewport state.
//!
//! [`TextEngine`] is one cohesive value owning everything a single editing
//! surface needs: the text store, the optional style run table, the line
//! index, the selection, scroll offsets, and interaction state. All
//! operations run synchronously on the caller's thread; the only clock the
//! engine sees is the millisecond timestamps the host puts on events.
//!
//! Every mutation invalidates layout (a full recompute, cheap at the
//! bounded document size), checks caret visibility, and accumulates an
//! invalid rectangle the host drains with
//! [`take_invalid_rect`](TextEngine::take_invalid_rect) to schedule a
//! redraw.

mod history;
mod input;
mod selection;

pub use self::input::MAX_DRAG_STEPS;

use crate::clipboard::{Scrap, ScrapStore};
use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_alert, emit_log};
use crate::geometry::{Point, Rect};
use crate::layout::{self, LayoutParams, LineIndex, StyleSource};
use crate::metrics::FontMetricsProvider;
use crate::scroll::{self, H_SCROLL_MARGIN, ScrollState};
use crate::style::TextStyle;
use crate::text::{MAX_TEXT_LEN, StyleRunTable, TextStore};
use history::{EditOp, History};
use std::ops::Range;

/// Caret width in pixels.
pub const CARET_WIDTH: i32 = 1;

/// Default caret blink interval in milliseconds.
pub const CARET_BLINK_MS: u64 = 500;

/// Default double/triple-click time threshold in milliseconds.
pub const DOUBLE_CLICK_MS: u64 = 500;

/// Default double-click distance slop in pixels.
pub const DOUBLE_CLICK_SLOP: i32 = 4;

/// Horizontal flush of each line within the destination width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
}

/// Optional engine features.
///
/// A small closed set of toggles; hooks not implemented in this build
/// report [`Error::Unsupported`] rather than failing silently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feature {
    /// Autoscroll while drag-selecting past the view edge.
    AutoScroll,
    /// Outline-style selection highlighting.
    OutlineHighlight,
    /// Inline input method composition.
    InlineInput,
}

/// Construction-time configuration for a [`TextEngine`].
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Layout rectangle; its width is the wrap width.
    pub dest_rect: Rect,
    /// Visible window, possibly smaller than the content under scroll.
    pub view_rect: Rect,
    pub word_wrap: bool,
    pub read_only: bool,
    /// Default style for text outside any run.
    pub style: TextStyle,
    /// Maximum text length in bytes.
    pub max_len: usize,
    pub caret_blink_ms: u64,
    pub double_click_ms: u64,
    pub double_click_slop: i32,
    /// Maximum retained undo groups.
    pub undo_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dest_rect: Rect::default(),
            view_rect: Rect::default(),
            word_wrap: true,
            read_only: false,
            style: TextStyle::DEFAULT,
            max_len: MAX_TEXT_LEN,
            caret_blink_ms: CARET_BLINK_MS,
            double_click_ms: DOUBLE_CLICK_MS,
            double_click_slop: DOUBLE_CLICK_SLOP,
            undo_depth: history::DEFAULT_UNDO_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Configuration with matching destination and view rectangles.
    #[must_use]
    pub fn framed(rect: Rect) -> Self {
        Self {
            dest_rect: rect,
            view_rect: rect,
            ..Self::default()
        }
    }
}

/// Pointer and multi-click tracking state.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DragState {
    pub(crate) anchor: usize,
    pub(crate) dragging: bool,
    pub(crate) steps: u32,
    pub(crate) click_count: u32,
    pub(crate) last_click_time: u64,
    pub(crate) last_click_point: Point,
    pub(crate) last_click_offset: usize,
    pub(crate) last_pointer: Point,
}

/// An embeddable text-editing surface.
pub struct TextEngine {
    pub(crate) store: TextStore,
    pub(crate) runs: Option<StyleRunTable>,
    pub(crate) lines: LineIndex,
    pub(crate) sel_start: usize,
    pub(crate) sel_end: usize,
    pub(crate) dest_rect: Rect,
    pub(crate) view_rect: Rect,
    pub(crate) scroll: ScrollState,
    pub(crate) word_wrap: bool,
    pub(crate) read_only: bool,
    pub(crate) active: bool,
    pub(crate) just: Justification,
    pub(crate) default_style: TextStyle,
    pub(crate) caret_on: bool,
    pub(crate) caret_time: u64,
    pub(crate) caret_blink_ms: u64,
    pub(crate) double_click_ms: u64,
    pub(crate) double_click_slop: i32,
    pub(crate) last_time: u64,
    pub(crate) auto_scroll: bool,
    pub(crate) drag: DragState,
    pub(crate) history: History,
    pub(crate) metrics: Box<dyn FontMetricsProvider>,
    pub(crate) invalid: Rect,
    pub(crate) max_line_width: i32,
}

impl TextEngine {
    /// Create a single-style engine.
    #[must_use]
    pub fn new(config: EngineConfig, metrics: Box<dyn FontMetricsProvider>) -> Self {
        Self::build(config, metrics, false)
    }

    /// Create a multi-style engine with a style run table.
    #[must_use]
    pub fn new_styled(config: EngineConfig, metrics: Box<dyn FontMetricsProvider>) -> Self {
        Self::build(config, metrics, true)
    }

    fn build(config: EngineConfig, metrics: Box<dyn FontMetricsProvider>, styled: bool) -> Self {
        let mut engine = Self {
            store: TextStore::new(config.max_len),
            runs: styled.then(|| StyleRunTable::new(config.style)),
            lines: LineIndex::default(),
            sel_start: 0,
            sel_end: 0,
            dest_rect: config.dest_rect,
            view_rect: config.view_rect,
            scroll: ScrollState::new(),
            word_wrap: config.word_wrap,
            read_only: config.read_only,
            active: false,
            just: Justification::Left,
            default_style: config.style,
            caret_on: false,
            caret_time: 0,
            caret_blink_ms: config.caret_blink_ms,
            double_click_ms: config.double_click_ms,
            double_click_slop: config.double_click_slop,
            last_time: 0,
            auto_scroll: true,
            drag: DragState::default(),
            history: History::with_max_depth(config.undo_depth),
            metrics,
            invalid: Rect::default(),
            max_line_width: 0,
        };
        engine.relayout();
        engine
    }

    // ------------------------------------------------------------------
    // Text access and editing
    // ------------------------------------------------------------------

    /// The full text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.store.text()
    }

    /// Text length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The configured maximum text length.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.store.max_len()
    }

    /// Replace the whole content, resetting selection, scroll, and history.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        if let Err(err) = self.store.set_text(text) {
            emit_alert(&err);
            return Err(err);
        }
        if let Some(runs) = self.runs.as_mut() {
            *runs = StyleRunTable::new(self.default_style);
        }
        self.sel_start = 0;
        self.sel_end = 0;
        self.drag = DragState::default();
        self.history.clear();
        self.relayout();
        self.scroll = ScrollState::new();
        self.invalidate_view();
        Ok(())
    }

    /// Replace the current selection with new text. The fundamental edit
    /// primitive: the caret collapses to just after the insertion, layout
    /// is rebuilt, and the caret is scrolled into view.
    ///
    /// Edits that would exceed the length limit are rejected with no state
    /// change; an alert is emitted for the host. Read-only engines ignore
    /// the call.
    pub fn replace_selection(&mut self, ins: &str) -> Result<()> {
        if self.read_only {
            emit_log(LogLevel::Debug, "edit ignored: engine is read-only");
            return Ok(());
        }
        let (start, end) = (self.sel_start, self.sel_end);
        let deleted = self.store.slice(start..end).to_string();
        if let Err(err) = self.store.replace_range(start..end, ins) {
            emit_alert(&err);
            return Err(err);
        }
        if let Some(runs) = self.runs.as_mut() {
            runs.adjust_for_edit(start, end - start, ins.len());
        }
        if !deleted.is_empty() {
            self.history.push(EditOp::Delete {
                offset: start,
                text: deleted,
            });
        }
        if !ins.is_empty() {
            self.history.push(EditOp::Insert {
                offset: start,
                text: ins.to_string(),
            });
        }
        self.sel_start = start + ins.len();
        self.sel_end = self.sel_start;
        self.drag.anchor = self.sel_start;
        self.relayout();
        self.force_caret_visible();
        self.scroll_selection_into_view();
        self.invalidate_view();
        self.assert_selection_invariant();
        Ok(())
    }

    /// Delete the selection; with an empty selection, delete one character
    /// backward first.
    pub fn delete_backward(&mut self) -> Result<()> {
        if self.sel_start == self.sel_end {
            match self.store.char_before(self.sel_start) {
                Some((start, _)) => self.sel_start = start,
                None => return Ok(()),
            }
        }
        self.replace_selection("")
    }

    /// Delete the selection; with an empty selection, delete one character
    /// forward first.
    pub fn delete_forward(&mut self) -> Result<()> {
        if self.sel_start == self.sel_end {
            match self.store.char_after(self.sel_end) {
                Some((end, _)) => self.sel_end = end,
                None => return Ok(()),
            }
        }
        self.replace_selection("")
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// The selection range `[start, end)` in byte offsets.
    #[must_use]
    pub fn selection(&self) -> (usize, usize) {
        (self.sel_start, self.sel_end)
    }

    /// The selected text, `None` when the selection is empty.
    #[must_use]
    pub fn selected_text(&self) -> Option<&str> {
        (self.sel_start < self.sel_end).then(|| self.store.slice(self.sel_start..self.sel_end))
    }

    /// Set the selection range. Offsets are clamped to the text, snapped to
    /// character boundaries, and swapped into order; this is never an
    /// error, since callers routinely pass approximate hit-test results.
    /// The caret blink is reset forced-visible.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let mut s = self.store.floor_boundary(start);
        let mut e = self.store.floor_boundary(end);
        if s > e {
            std::mem::swap(&mut s, &mut e);
        }
        if s != self.sel_start || e != self.sel_end {
            let span_lo = s.min(self.sel_start);
            let span_hi = e.max(self.sel_end);
            self.history.commit();
            self.sel_start = s;
            self.sel_end = e;
            let rect = self.lines_span_rect(span_lo, span_hi);
            self.invalidate(rect);
        }
        self.force_caret_visible();
        self.assert_selection_invariant();
    }

    /// Collapse the selection to a caret, making the offset the anchor for
    /// subsequent extension.
    pub fn set_caret(&mut self, offset: usize) {
        let offset = self.store.floor_boundary(offset);
        self.drag.anchor = offset;
        self.set_selection(offset, offset);
    }

    /// Select everything.
    pub fn select_all(&mut self) {
        self.drag.anchor = 0;
        self.set_selection(0, self.store.len());
    }

    // ------------------------------------------------------------------
    // Styles
    // ------------------------------------------------------------------

    /// Check if this engine carries a style run table.
    #[must_use]
    pub fn is_styled(&self) -> bool {
        self.runs.is_some()
    }

    /// The default style.
    #[must_use]
    pub fn default_style(&self) -> TextStyle {
        self.default_style
    }

    /// The style active at a byte offset.
    #[must_use]
    pub fn style_at(&self, offset: usize) -> TextStyle {
        self.style_source().style_at(self.store.floor_boundary(offset))
    }

    /// The single style covering a range, if uniform.
    #[must_use]
    pub fn uniform_style(&self, range: Range<usize>) -> Option<TextStyle> {
        match self.runs.as_ref() {
            Some(runs) => {
                let start = self.store.floor_boundary(range.start);
                let end = self.store.floor_boundary(range.end).max(start);
                runs.uniform_style(start..end)
            }
            None => Some(self.default_style),
        }
    }

    /// Apply a style to a byte range. In single-style mode this restyles
    /// the whole buffer by swapping the default style.
    pub fn set_style(&mut self, range: Range<usize>, style: TextStyle) {
        let start = self.store.floor_boundary(range.start);
        let end = self.store.floor_boundary(range.end).max(start);
        match self.runs.as_mut() {
            Some(runs) => runs.set_style(start..end, style),
            None => self.default_style = style,
        }
        self.relayout();
        self.invalidate_view();
    }

    /// Style lookup over the run table with default fallback.
    #[must_use]
    pub fn style_source(&self) -> StyleSource<'_> {
        StyleSource::new(self.runs.as_ref(), self.default_style)
    }

    // ------------------------------------------------------------------
    // Activation, caret, idle
    // ------------------------------------------------------------------

    /// Check if the engine is active (its field has input focus).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate the engine; the caret starts a fresh blink cycle visible.
    pub fn activate(&mut self) {
        self.active = true;
        self.force_caret_visible();
        let rect = self.caret_rect();
        self.invalidate(rect);
    }

    /// Deactivate the engine, hiding the caret and ending any drag.
    pub fn deactivate(&mut self) {
        if self.caret_on {
            let rect = self.caret_rect();
            self.invalidate(rect);
        }
        self.active = false;
        self.caret_on = false;
        self.drag.dragging = false;
    }

    /// Check if the caret should currently be painted.
    #[must_use]
    pub fn caret_visible(&self) -> bool {
        self.active && self.caret_on && self.sel_start == self.sel_end
    }

    /// Idle tick: advances the caret blink and, mid-drag with the pointer
    /// outside the view, autoscrolls toward the pointer. The host calls
    /// this at least once per blink interval.
    pub fn idle(&mut self, now: u64) {
        self.last_time = now;
        if !self.active {
            return;
        }
        if self.sel_start == self.sel_end
            && now.saturating_sub(self.caret_time) >= self.caret_blink_ms
        {
            self.caret_time = now;
            self.caret_on = !self.caret_on;
            let rect = self.caret_rect();
            self.invalidate(rect);
        }
        if self.drag.dragging && !self.view_rect.contains(self.drag.last_pointer) {
            self.autoscroll_toward(self.drag.last_pointer);
        }
    }

    pub(crate) fn force_caret_visible(&mut self) {
        self.caret_on = true;
        self.caret_time = self.last_time;
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo the most recent edit group. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        let Some(ops) = self.history.pop_undo() else {
            return false;
        };
        let mut redo_ops = Vec::new();
        for op in ops.into_iter().rev() {
            self.apply_op(&op.invert());
            redo_ops.push(op);
        }
        redo_ops.reverse();
        self.history.push_redo(redo_ops);
        self.finish_history_step();
        true
    }

    /// Redo the most recently undone edit group. Returns whether anything
    /// changed.
    pub fn redo(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        let Some(ops) = self.history.pop_redo() else {
            return false;
        };
        for op in &ops {
            self.apply_op(op);
        }
        self.history.push_undo_group(ops);
        self.finish_history_step();
        true
    }

    fn apply_op(&mut self, op: &EditOp) {
        let result = match op {
            EditOp::Insert { offset, text } => {
                let at = *offset;
                let r = self.store.replace_range(at..at, text);
                if r.is_ok() {
                    if let Some(runs) = self.runs.as_mut() {
                        runs.adjust_for_edit(at, 0, text.len());
                    }
                    self.sel_start = at + text.len();
                    self.sel_end = self.sel_start;
                }
                r
            }
            EditOp::Delete { offset, text } => {
                let at = *offset;
                let r = self.store.replace_range(at..at + text.len(), "");
                if r.is_ok() {
                    if let Some(runs) = self.runs.as_mut() {
                        runs.adjust_for_edit(at, text.len(), 0);
                    }
                    self.sel_start = at;
                    self.sel_end = at;
                }
                r
            }
        };
        if let Err(err) = result {
            // History only replays states that were legal; a failure here
            // means the host changed the limit out from under us.
            emit_log(LogLevel::Warn, &format!("history replay skipped: {err}"));
        }
        self.drag.anchor = self.sel_start;
    }

    fn finish_history_step(&mut self) {
        self.relayout();
        self.force_caret_visible();
        self.scroll_selection_into_view();
        self.invalidate_view();
        self.assert_selection_invariant();
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// Copy the selection to the host's scrap. Styled engines include the
    /// selection's resolved runs. Returns whether anything was copied.
    pub fn copy(&self, scrap: &mut dyn ScrapStore) -> bool {
        let (start, end) = (self.sel_start, self.sel_end);
        if start >= end {
            return false;
        }
        let text = self.store.slice(start..end).to_string();
        let styles = self.runs.as_ref().map(|runs| runs.extract(start..end));
        scrap.put(Scrap { text, styles });
        true
    }

    /// Copy the selection to the scrap, then delete it. On a read-only
    /// engine this degrades to a copy.
    pub fn cut(&mut self, scrap: &mut dyn ScrapStore) -> Result<bool> {
        if !self.copy(scrap) {
            return Ok(false);
        }
        self.replace_selection("")?;
        Ok(true)
    }

    /// Replace the selection with the scrap contents. When both the scrap
    /// and the engine carry styles, the pasted range takes the scrap's
    /// runs. Returns whether anything was pasted.
    pub fn paste(&mut self, scrap: &dyn ScrapStore) -> Result<bool> {
        if self.read_only {
            return Ok(false);
        }
        let Some(payload) = scrap.get() else {
            return Ok(false);
        };
        if payload.is_empty() {
            return Ok(false);
        }
        let at = self.sel_start;
        self.replace_selection(&payload.text)?;
        if let (Some(runs), Some(styles)) = (self.runs.as_mut(), payload.styles.as_ref()) {
            runs.apply_scrap(at, payload.text.len(), styles);
            self.relayout();
            self.invalidate_view();
        }
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    /// Current `(horizontal, vertical)` scroll offsets.
    #[must_use]
    pub fn scroll_offsets(&self) -> (i32, i32) {
        (self.scroll.h(), self.scroll.v())
    }

    /// Maximum vertical scroll offset.
    #[must_use]
    pub fn max_scroll_v(&self) -> i32 {
        (self.lines.total_height() - self.view_rect.height()).max(0)
    }

    /// Maximum horizontal scroll offset.
    #[must_use]
    pub fn max_scroll_h(&self) -> i32 {
        (self.max_line_width - self.view_rect.width()).max(0)
    }

    /// Scroll by a delta, clamped to the content. Any change invalidates
    /// the whole view.
    pub fn scroll_by(&mut self, dh: i32, dv: i32) {
        let (max_h, max_v) = (self.max_scroll_h(), self.max_scroll_v());
        if self.scroll.scroll_by(dh, dv, max_h, max_v) {
            self.invalidate_view();
        }
    }

    /// Scroll the minimal amount to make an offset's line fully visible;
    /// with word wrap off, also bring the exact caret x into view. A target
    /// already fully visible moves nothing.
    pub fn scroll_into_view(&mut self, offset: usize) {
        let offset = self.store.floor_boundary(offset);
        let line = self.lines.line_of(offset);
        let top = self.lines.top(line);
        let bottom = top + self.lines.height(line);
        let dv =
            scroll::vertical_delta_into_view(top, bottom, self.scroll.v(), self.view_rect.height());
        let mut dh = 0;
        if !self.word_wrap {
            let x = self.caret_x_content(offset);
            dh = scroll::horizontal_delta_into_view(
                x,
                self.scroll.h(),
                self.view_rect.width(),
                H_SCROLL_MARGIN,
            );
        }
        if dh != 0 || dv != 0 {
            self.scroll_by(dh, dv);
        }
    }

    /// Scroll the selection end into view.
    pub fn scroll_selection_into_view(&mut self) {
        self.scroll_into_view(self.sel_end);
    }

    // ------------------------------------------------------------------
    // Geometry and configuration
    // ------------------------------------------------------------------

    /// The destination (layout) rectangle.
    #[must_use]
    pub fn dest_rect(&self) -> Rect {
        self.dest_rect
    }

    /// The view (visible) rectangle.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    /// Move/resize the engine's rectangles, triggering a relayout.
    pub fn set_frames(&mut self, dest_rect: Rect, view_rect: Rect) {
        self.dest_rect = dest_rect;
        self.view_rect = view_rect;
        self.relayout();
        self.invalidate_view();
    }

    /// Check word wrap.
    #[must_use]
    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    /// Toggle word wrap, triggering a relayout.
    pub fn set_word_wrap(&mut self, wrap: bool) {
        if self.word_wrap != wrap {
            self.word_wrap = wrap;
            self.relayout();
            self.invalidate_view();
        }
    }

    /// Check read-only.
    #[must_use]
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Toggle read-only.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Toggle an optional feature. Unimplemented hooks return a
    /// distinguishable [`Error::Unsupported`] status.
    pub fn set_feature(&mut self, feature: Feature, enabled: bool) -> Result<()> {
        match feature {
            Feature::AutoScroll => {
                self.auto_scroll = enabled;
                Ok(())
            }
            Feature::OutlineHighlight => Err(Error::Unsupported("outline highlighting")),
            Feature::InlineInput => Err(Error::Unsupported("inline input")),
        }
    }

    /// Query an optional feature.
    pub fn feature(&self, feature: Feature) -> Result<bool> {
        match feature {
            Feature::AutoScroll => Ok(self.auto_scroll),
            Feature::OutlineHighlight => Err(Error::Unsupported("outline highlighting")),
            Feature::InlineInput => Err(Error::Unsupported("inline input")),
        }
    }

    /// Current justification.
    #[must_use]
    pub fn justification(&self) -> Justification {
        self.just
    }

    /// Set line justification.
    pub fn set_justification(&mut self, just: Justification) {
        if self.just != just {
            self.just = just;
            self.invalidate_view();
        }
    }

    /// The line index produced by the last layout pass.
    #[must_use]
    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// Number of display lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// The metrics provider.
    #[must_use]
    pub fn metrics(&self) -> &dyn FontMetricsProvider {
        self.metrics.as_ref()
    }

    // ------------------------------------------------------------------
    // Invalidation
    // ------------------------------------------------------------------

    /// Take the accumulated invalid rectangle, if any. The host redraws it
    /// via [`draw`](TextEngine::draw).
    pub fn take_invalid_rect(&mut self) -> Option<Rect> {
        let rect = std::mem::take(&mut self.invalid);
        (!rect.is_empty()).then_some(rect)
    }

    pub(crate) fn invalidate(&mut self, rect: Rect) {
        let clipped = rect.intersect(self.view_rect);
        if !clipped.is_empty() {
            self.invalid = self.invalid.union(clipped);
        }
    }

    pub(crate) fn invalidate_view(&mut self) {
        let rect = self.view_rect;
        self.invalidate(rect);
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    pub(crate) fn wrap_width(&self) -> Option<i32> {
        self.word_wrap.then(|| self.dest_rect.width().max(1))
    }

    pub(crate) fn relayout(&mut self) {
        let source = StyleSource::new(self.runs.as_ref(), self.default_style);
        let params = LayoutParams {
            text: self.store.text(),
            source,
            wrap_width: self.wrap_width(),
        };
        self.lines = layout::compute(&params, self.metrics.as_ref());
        self.max_line_width =
            layout::max_line_width(self.store.text(), &self.lines, &source, self.metrics.as_ref());
        // Content may have shrunk; keep the offsets legal.
        let (max_h, max_v) = (self.max_scroll_h(), self.max_scroll_v());
        self.scroll.scroll_by(0, 0, max_h, max_v);
        self.assert_line_invariant();
    }

    fn assert_selection_invariant(&self) {
        debug_assert!(self.sel_start <= self.sel_end);
        debug_assert!(self.sel_end <= self.store.len());
    }

    fn assert_line_invariant(&self) {
        debug_assert!(self.lines.line_count() >= 1);
        debug_assert_eq!(self.lines.start(0), 0);
        debug_assert!(self.lines.starts().windows(2).all(|w| w[0] < w[1]));
        debug_assert!(*self.lines.starts().last().unwrap_or(&0) <= self.store.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::metrics::{LineMetrics, MonoMetrics};

    pub(crate) fn mono10() -> Box<MonoMetrics> {
        Box::new(MonoMetrics::new(10, LineMetrics::new(12, 3, 1)))
    }

    pub(crate) fn test_engine(w: i32, h: i32) -> TextEngine {
        TextEngine::new(EngineConfig::framed(Rect::new(0, 0, w, h)), mono10())
    }

    #[test]
    fn test_set_text_round_trip() {
        let mut engine = test_engine(200, 100);
        engine.set_text("Hello, world!").unwrap();
        assert_eq!(engine.text(), "Hello, world!");
        assert_eq!(engine.selection(), (0, 0));
    }

    #[test]
    fn test_replace_selection_collapses_after_insert() {
        let mut engine = test_engine(200, 100);
        engine.set_text("Hello World").unwrap();
        engine.set_selection(0, 5);
        engine.replace_selection("Goodbye").unwrap();
        assert_eq!(engine.text(), "Goodbye World");
        assert_eq!(engine.selection(), (7, 7));
    }

    #[test]
    fn test_delete_selected_range() {
        // Buffer "Hello World", select [0,5), delete: " World", caret at 0.
        let mut engine = test_engine(200, 100);
        engine.set_text("Hello World").unwrap();
        engine.set_selection(0, 5);
        engine.delete_forward().unwrap();
        assert_eq!(engine.text(), " World");
        assert_eq!(engine.selection(), (0, 0));
    }

    #[test]
    fn test_overflow_rejected_without_state_change() {
        let mut engine = TextEngine::new(
            EngineConfig {
                max_len: 8,
                ..EngineConfig::framed(Rect::new(0, 0, 200, 100))
            },
            mono10(),
        );
        engine.set_text("abcdefgh").unwrap();
        engine.set_caret(8);
        let err = engine.replace_selection("x").unwrap_err();
        assert!(matches!(err, Error::TextOverflow { .. }));
        assert_eq!(engine.text(), "abcdefgh");
        assert_eq!(engine.selection(), (8, 8));

        // Exactly at the limit still succeeds.
        engine.set_selection(7, 8);
        engine.replace_selection("z").unwrap();
        assert_eq!(engine.text(), "abcdefgz");
    }

    #[test]
    fn test_selection_clamps_out_of_range() {
        let mut engine = test_engine(200, 100);
        engine.set_text("abc").unwrap();
        engine.set_selection(100, 2);
        assert_eq!(engine.selection(), (2, 3));
    }

    #[test]
    fn test_read_only_ignores_edits() {
        let mut engine = test_engine(200, 100);
        engine.set_text("abc").unwrap();
        engine.set_read_only(true);
        engine.set_selection(0, 3);
        engine.replace_selection("xyz").unwrap();
        assert_eq!(engine.text(), "abc");
        assert_eq!(engine.selection(), (0, 3));
    }

    #[test]
    fn test_caret_visibility_rules() {
        let mut engine = test_engine(200, 100);
        engine.set_text("abc").unwrap();
        assert!(!engine.caret_visible());

        engine.activate();
        assert!(engine.caret_visible());

        // A non-empty selection hides the caret.
        engine.set_selection(0, 2);
        assert!(!engine.caret_visible());

        engine.set_caret(1);
        assert!(engine.caret_visible());

        engine.deactivate();
        assert!(!engine.caret_visible());
    }

    #[test]
    fn test_caret_blinks_on_idle() {
        let mut engine = test_engine(200, 100);
        engine.set_text("abc").unwrap();
        engine.activate();
        assert!(engine.caret_visible());

        engine.idle(CARET_BLINK_MS);
        assert!(!engine.caret_visible());
        engine.idle(CARET_BLINK_MS * 2);
        assert!(engine.caret_visible());

        // A selection change resets the blink forced-visible.
        engine.idle(CARET_BLINK_MS * 3);
        assert!(!engine.caret_visible());
        engine.set_caret(2);
        assert!(engine.caret_visible());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut engine = test_engine(200, 100);
        engine.set_text("Hello").unwrap();
        engine.set_caret(5);
        engine.replace_selection(" World").unwrap();
        assert_eq!(engine.text(), "Hello World");

        assert!(engine.undo());
        assert_eq!(engine.text(), "Hello");
        assert!(engine.redo());
        assert_eq!(engine.text(), "Hello World");
    }

    #[test]
    fn test_undo_of_replacement_restores_deleted_text() {
        let mut engine = test_engine(200, 100);
        engine.set_text("Hello World").unwrap();
        engine.set_selection(0, 5);
        engine.replace_selection("Goodbye").unwrap();
        assert_eq!(engine.text(), "Goodbye World");

        assert!(engine.undo());
        assert_eq!(engine.text(), "Hello World");
    }

    #[test]
    fn test_line_index_after_typing() {
        // Type "A", Return, "B": two lines, line 1 renders "B".
        let mut engine = test_engine(200, 100);
        engine.replace_selection("A").unwrap();
        engine.replace_selection("\n").unwrap();
        engine.replace_selection("B").unwrap();
        assert_eq!(engine.line_index().starts(), &[0, 2]);
        let range = engine.line_index().line_range(1, engine.len());
        assert_eq!(&engine.text()[range], "B");
    }

    #[test]
    fn test_scroll_into_view_is_idempotent() {
        let mut engine = test_engine(200, 80); // 5 lines of 16px
        let text = (0..20).map(|i| format!("line {i}\n")).collect::<String>();
        engine.set_text(&text).unwrap();

        let target = engine.line_index().start(10);
        engine.scroll_into_view(target);
        let after_first = engine.scroll_offsets();
        // Line 10 is now the last fully visible line.
        assert_eq!(after_first.1, 11 * 16 - 80);

        engine.scroll_into_view(target);
        assert_eq!(engine.scroll_offsets(), after_first);
    }

    #[test]
    fn test_scroll_clamps_at_content_edges() {
        let mut engine = test_engine(200, 80);
        engine.set_text("one\ntwo").unwrap();
        engine.scroll_by(50, 50);
        assert_eq!(engine.scroll_offsets(), (0, 0));
    }

    #[test]
    fn test_styled_engine_set_and_query_style() {
        let mut engine = TextEngine::new_styled(
            EngineConfig::framed(Rect::new(0, 0, 200, 100)),
            mono10(),
        );
        engine.set_text("Hello World").unwrap();
        let bold = TextStyle::DEFAULT.with_bold();
        engine.set_style(0..5, bold);
        assert_eq!(engine.style_at(2), bold);
        assert_eq!(engine.style_at(6), TextStyle::DEFAULT);
        assert_eq!(engine.uniform_style(0..5), Some(bold));
        assert_eq!(engine.uniform_style(3..8), None);
    }

    #[test]
    fn test_styles_follow_edits() {
        let mut engine = TextEngine::new_styled(
            EngineConfig::framed(Rect::new(0, 0, 200, 100)),
            mono10(),
        );
        engine.set_text("Hello World").unwrap();
        let bold = TextStyle::DEFAULT.with_bold();
        engine.set_style(6..11, bold);

        // Delete "Hello " and the bold run moves to the front.
        engine.set_selection(0, 6);
        engine.replace_selection("").unwrap();
        assert_eq!(engine.text(), "World");
        assert_eq!(engine.style_at(0), bold);
    }

    #[test]
    fn test_cut_copy_paste_plain() {
        use crate::clipboard::MemScrap;

        let mut engine = test_engine(200, 100);
        engine.set_text("Hello World").unwrap();
        let mut scrap = MemScrap::new();

        engine.set_selection(0, 5);
        assert!(engine.copy(&mut scrap));
        assert_eq!(scrap.get().unwrap().text, "Hello");
        assert_eq!(engine.text(), "Hello World");

        assert!(engine.cut(&mut scrap).unwrap());
        assert_eq!(engine.text(), " World");

        engine.set_caret(6);
        assert!(engine.paste(&scrap).unwrap());
        assert_eq!(engine.text(), " WorldHello");

        // An empty selection copies nothing.
        engine.set_caret(0);
        assert!(!engine.copy(&mut scrap));
    }

    #[test]
    fn test_paste_carries_styles_between_styled_engines() {
        use crate::clipboard::MemScrap;

        let bold = TextStyle::DEFAULT.with_bold();
        let mut from = TextEngine::new_styled(
            EngineConfig::framed(Rect::new(0, 0, 200, 100)),
            mono10(),
        );
        from.set_text("abcdef").unwrap();
        from.set_style(2..4, bold);
        from.set_selection(1, 5);

        let mut scrap = MemScrap::new();
        assert!(from.copy(&mut scrap));

        let mut to = TextEngine::new_styled(
            EngineConfig::framed(Rect::new(0, 0, 200, 100)),
            mono10(),
        );
        to.set_text("XY").unwrap();
        to.set_caret(1);
        assert!(to.paste(&scrap).unwrap());
        assert_eq!(to.text(), "XbcdeY");
        assert_eq!(to.style_at(0), TextStyle::DEFAULT);
        // "cd" was bold in the source; it lands at offsets 2..4.
        assert_eq!(to.style_at(2), bold);
        assert_eq!(to.style_at(3), bold);
        assert_eq!(to.style_at(4), TextStyle::DEFAULT);
    }

    #[test]
    fn test_feature_flags() {
        let mut engine = test_engine(200, 100);
        assert_eq!(engine.feature(Feature::AutoScroll), Ok(true));
        engine.set_feature(Feature::AutoScroll, false).unwrap();
        assert_eq!(engine.feature(Feature::AutoScroll), Ok(false));

        assert!(matches!(
            engine.set_feature(Feature::OutlineHighlight, true),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            engine.feature(Feature::InlineInput),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_take_invalid_rect_drains() {
        let mut engine = test_engine(200, 100);
        engine.set_text("abc").unwrap();
        assert!(engine.take_invalid_rect().is_some());
        assert!(engine.take_invalid_rect().is_none());
    }
}
