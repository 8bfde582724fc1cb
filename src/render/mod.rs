//! Multi-style run rendering.
//!
//! The engine draws through a [`DrawSurface`] the host supplies per redraw;
//! it never owns the surface. For the line range intersecting the update
//! rectangle, each line is split into at most three sub-segments around the
//! selection (unselected / selected / unselected); selected segments get an
//! inverted background after their text is drawn. In multi-style mode every
//! sub-segment is further subdivided at style-run boundaries and re-measured
//! per piece so the selection background lines up with per-run font widths.
//! Tabs render as advance-only gaps. Rendering never errors.

use crate::engine::{EngineConfig, Justification, TextEngine};
use crate::event::{LogLevel, emit_log};
use crate::geometry::Rect;
use crate::layout;
use crate::metrics::FontMetricsProvider;
use crate::style::TextStyle;
use std::ops::Range;

/// Drawing primitives the host's surface provides.
///
/// `draw_text` positions text by its leading edge and baseline and is never
/// handed tab or terminator characters. `invert_rect` swaps foreground and
/// background, used for both the selection and the caret.
pub trait DrawSurface {
    /// Erase a rectangle to the background.
    fn clear_rect(&mut self, rect: Rect);

    /// Invert a rectangle.
    fn invert_rect(&mut self, rect: Rect);

    /// Draw a run of text in one style at a baseline.
    fn draw_text(&mut self, x: i32, baseline: i32, text: &str, style: &TextStyle);
}

impl TextEngine {
    /// Paint the lines intersecting `update_rect`, the selection, and the
    /// caret.
    pub fn draw(&self, surface: &mut dyn DrawSurface, update_rect: Rect) {
        let view = self.view_rect();
        let clip = update_rect.intersect(view);
        if clip.is_empty() {
            return;
        }
        surface.clear_rect(clip);

        let (_, scroll_v) = self.scroll_offsets();
        let index = self.line_index();
        let y_first = clip.top - view.top + scroll_v;
        let y_last = (clip.bottom - view.top + scroll_v - 1).max(y_first);
        let first = index.line_at_y(y_first);
        let last = index.line_at_y(y_last);
        for line in first..=last {
            draw_line(self, surface, line);
        }

        if self.caret_visible() {
            let caret = self.caret_rect();
            if !caret.is_empty() {
                surface.invert_rect(caret);
            }
        }
    }
}

fn draw_line(engine: &TextEngine, surface: &mut dyn DrawSurface, line: usize) {
    let text = engine.text();
    let index = engine.line_index();
    let content = layout::content_range(text, index.line_range(line, text.len()));
    let (scroll_h, scroll_v) = engine.scroll_offsets();
    let view = engine.view_rect();
    let origin_x = view.left - scroll_h + engine.line_origin_x(line);
    let top = view.top - scroll_v + index.top(line);
    let baseline = top + index.ascent(line);
    let height = index.height(line);

    let (sel_start, sel_end) = engine.selection();
    let has_selection = sel_start < sel_end;
    let a = sel_start.clamp(content.start, content.end);
    let b = sel_end.clamp(content.start, content.end);
    let segments = [
        (content.start..a, false),
        (a..b, has_selection),
        (b..content.end, false),
    ];

    let source = engine.style_source();
    let metrics = engine.metrics();
    let mut x = 0;
    for (segment, selected) in segments {
        if segment.start >= segment.end {
            continue;
        }
        let segment_from = x;
        for (piece, style) in source.segments(segment) {
            x = draw_piece(surface, text, piece, x, origin_x, baseline, &style, metrics);
        }
        if selected {
            let rect = Rect::new(origin_x + segment_from, top, origin_x + x, top + height)
                .intersect(view);
            if !rect.is_empty() {
                surface.invert_rect(rect);
            }
        }
    }
}

/// Draw one single-style piece, expanding tabs to advance-only gaps.
/// Returns the pen position after the piece (origin-relative, so tab stops
/// stay aligned to the line origin).
#[allow(clippy::too_many_arguments)]
fn draw_piece(
    surface: &mut dyn DrawSurface,
    text: &str,
    piece: Range<usize>,
    mut x: i32,
    origin_x: i32,
    baseline: i32,
    style: &TextStyle,
    metrics: &dyn FontMetricsProvider,
) -> i32 {
    let slice = &text[piece];
    let mut chunk_start = 0usize;
    for (i, ch) in slice.char_indices() {
        if ch == '\t' {
            if chunk_start < i {
                let run = &slice[chunk_start..i];
                surface.draw_text(origin_x + x, baseline, run, style);
                x += measure_plain(run, style, metrics);
            }
            let space = metrics.char_advance(' ', style);
            x = layout::tab_stop_after(x, space);
            chunk_start = i + 1;
        }
    }
    if chunk_start < slice.len() {
        let run = &slice[chunk_start..];
        surface.draw_text(origin_x + x, baseline, run, style);
        x += measure_plain(run, style, metrics);
    }
    x
}

fn measure_plain(run: &str, style: &TextStyle, metrics: &dyn FontMetricsProvider) -> i32 {
    run.chars().map(|ch| metrics.char_advance(ch, style)).sum()
}

/// Draw static text into a box with the given justification: a one-shot
/// helper for labels and dialogs that need no editing state. Content past
/// the length limit is skipped (rendering never errors).
pub fn text_box(
    text: &str,
    rect: Rect,
    just: Justification,
    metrics: Box<dyn FontMetricsProvider>,
    surface: &mut dyn DrawSurface,
) {
    let mut engine = TextEngine::new(EngineConfig::framed(rect), metrics);
    if engine.set_text(text).is_err() {
        emit_log(LogLevel::Debug, "text box content exceeds the length limit");
        return;
    }
    engine.set_justification(just);
    engine.draw(surface, rect);
}
