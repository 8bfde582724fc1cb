//! Line-breaking layout.
//!
//! Layout turns the text store plus the active styles and a wrap width into
//! a [`LineIndex`]: the ordered byte offsets where each display line starts,
//! with per-line vertical metrics. A full rebuild runs after every mutation;
//! documents are bounded by the text-length ceiling, so incremental reflow
//! buys nothing here.
//!
//! Breaking rules: a line ends at an explicit `'\n'` terminator, or — with
//! word wrap on — after the last soft-break candidate that fits the wrap
//! width. If nothing breakable fits, the line is cut exactly at the width
//! boundary (a single unbreakable word never overflows the destination).
//! Tabs advance to the next tab stop, a multiple of the space advance times
//! [`TAB_STOP_CHARS`].

use crate::metrics::{FontMetricsProvider, LineMetrics};
use crate::style::TextStyle;
use crate::text::StyleRunTable;
use std::ops::Range;

/// Tab stops sit every this many space widths.
pub const TAB_STOP_CHARS: i32 = 8;

/// Check if a character is a soft-break candidate. Lines may wrap after
/// spaces, tabs, hyphens, slashes, and sentence punctuation.
#[must_use]
pub fn is_break_char(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t' | '-' | '/' | '\\' | ',' | ';' | ':' | '.'
    )
}

/// The next tab stop strictly after pen position `x`.
#[must_use]
pub fn tab_stop_after(x: i32, space_advance: i32) -> i32 {
    let mut tab_width = space_advance * TAB_STOP_CHARS;
    if tab_width <= 0 {
        tab_width = TAB_STOP_CHARS * 7;
    }
    ((x / tab_width) + 1) * tab_width
}

/// Style lookup over an optional run table, falling back to one default
/// style. Shared by layout, render, and hit-testing.
#[derive(Clone, Copy)]
pub struct StyleSource<'a> {
    runs: Option<&'a StyleRunTable>,
    default: TextStyle,
}

impl<'a> StyleSource<'a> {
    /// Create a style source.
    #[must_use]
    pub fn new(runs: Option<&'a StyleRunTable>, default: TextStyle) -> Self {
        Self { runs, default }
    }

    /// The style active at a byte offset.
    #[must_use]
    pub fn style_at(&self, offset: usize) -> TextStyle {
        self.runs.map_or(self.default, |r| r.style_at(offset))
    }

    /// Subdivide a byte range at style-run boundaries.
    #[must_use]
    pub fn segments(&self, range: Range<usize>) -> Vec<(Range<usize>, TextStyle)> {
        match self.runs {
            Some(runs) => runs.segments(range),
            None => {
                if range.start >= range.end {
                    Vec::new()
                } else {
                    vec![(range, self.default)]
                }
            }
        }
    }

    /// Whether more than one style may be in play.
    #[must_use]
    pub fn is_styled(&self) -> bool {
        self.runs.is_some()
    }
}

/// Everything a layout pass needs besides the metrics provider.
pub struct LayoutParams<'a> {
    pub text: &'a str,
    pub source: StyleSource<'a>,
    /// Wrap width in pixels; `None` disables word wrap.
    pub wrap_width: Option<i32>,
}

/// Ordered table of display-line start offsets with per-line metrics.
///
/// Invariants: at least one entry, starts strictly increasing, first start
/// is 0, last start at most the text length.
#[derive(Clone, Debug, Default)]
pub struct LineIndex {
    starts: Vec<usize>,
    heights: Vec<i32>,
    ascents: Vec<i32>,
    tops: Vec<i32>,
    total_height: i32,
}

impl LineIndex {
    /// Number of display lines (always at least 1 after a rebuild).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// All line start offsets.
    #[must_use]
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    /// Start offset of a line (clamped to the last line).
    #[must_use]
    pub fn start(&self, line: usize) -> usize {
        let line = line.min(self.starts.len().saturating_sub(1));
        self.starts.get(line).copied().unwrap_or(0)
    }

    /// Height of a line in pixels.
    #[must_use]
    pub fn height(&self, line: usize) -> i32 {
        let line = line.min(self.heights.len().saturating_sub(1));
        self.heights.get(line).copied().unwrap_or(0)
    }

    /// Baseline ascent of a line in pixels.
    #[must_use]
    pub fn ascent(&self, line: usize) -> i32 {
        let line = line.min(self.ascents.len().saturating_sub(1));
        self.ascents.get(line).copied().unwrap_or(0)
    }

    /// Top of a line in content coordinates (line 0 is at 0).
    #[must_use]
    pub fn top(&self, line: usize) -> i32 {
        let line = line.min(self.tops.len().saturating_sub(1));
        self.tops.get(line).copied().unwrap_or(0)
    }

    /// Total content height.
    #[must_use]
    pub fn total_height(&self) -> i32 {
        self.total_height
    }

    /// The line containing a byte offset (offsets past the end map to the
    /// last line).
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|&s| s <= offset)
            .saturating_sub(1)
    }

    /// The line whose vertical span contains a content-space y coordinate,
    /// clamped to the first/last line.
    #[must_use]
    pub fn line_at_y(&self, y: i32) -> usize {
        if y < 0 {
            return 0;
        }
        self.tops
            .partition_point(|&top| top <= y)
            .saturating_sub(1)
    }

    /// Byte range of a line, including any trailing terminator.
    #[must_use]
    pub fn line_range(&self, line: usize, text_len: usize) -> Range<usize> {
        let line = line.min(self.starts.len().saturating_sub(1));
        let start = self.start(line);
        let end = self
            .starts
            .get(line + 1)
            .copied()
            .unwrap_or(text_len);
        start..end
    }
}

/// Byte range of a line's rendered content: the line range minus a trailing
/// terminator, which is counted but never drawn.
#[must_use]
pub fn content_range(text: &str, range: Range<usize>) -> Range<usize> {
    let mut end = range.end.min(text.len());
    if end > range.start && text.as_bytes().get(end - 1) == Some(&b'\n') {
        end -= 1;
    }
    range.start..end
}

/// Advance a pen position across a byte range of text, expanding tabs
/// against the line origin. `start_x` and the result are relative to the
/// line origin so tab stops line up.
#[must_use]
pub fn advance_x(
    text: &str,
    range: Range<usize>,
    start_x: i32,
    source: &StyleSource<'_>,
    metrics: &dyn FontMetricsProvider,
) -> i32 {
    let mut x = start_x;
    let start = range.start.min(text.len());
    let end = range.end.min(text.len()).max(start);
    for (i, ch) in text[start..end].char_indices() {
        let style = source.style_at(start + i);
        x += char_advance_at(ch, x, &style, metrics);
    }
    x
}

/// Advance for one character at pen position `x`: tab-stop distance for
/// tabs, the provider's advance otherwise.
#[must_use]
pub fn char_advance_at(
    ch: char,
    x: i32,
    style: &TextStyle,
    metrics: &dyn FontMetricsProvider,
) -> i32 {
    if ch == '\t' {
        let space = metrics.char_advance(' ', style);
        tab_stop_after(x, space) - x
    } else {
        metrics.char_advance(ch, style)
    }
}

/// Rebuild the full line index.
#[must_use]
pub fn compute(params: &LayoutParams<'_>, metrics: &dyn FontMetricsProvider) -> LineIndex {
    let text = params.text;
    let mut starts = vec![0usize];
    let mut pos = 0usize;
    while pos < text.len() {
        let next = next_line_start(text, pos, params, metrics);
        debug_assert!(next > pos, "layout must make progress");
        if next <= pos {
            break;
        }
        pos = next;
        if pos < text.len() {
            starts.push(pos);
        }
    }

    let mut heights = Vec::with_capacity(starts.len());
    let mut ascents = Vec::with_capacity(starts.len());
    let mut tops = Vec::with_capacity(starts.len());
    let mut y = 0i32;
    for (line, &start) in starts.iter().enumerate() {
        let end = starts.get(line + 1).copied().unwrap_or(text.len());
        let lm = line_metrics_for(start..end, &params.source, metrics);
        tops.push(y);
        y += lm.height();
        heights.push(lm.height());
        ascents.push(lm.ascent);
    }

    LineIndex {
        starts,
        heights,
        ascents,
        tops,
        total_height: y,
    }
}

/// Widest line in the index under the current styles, for horizontal
/// scroll limits. A full scan is fine at the bounded document size.
#[must_use]
pub fn max_line_width(
    text: &str,
    index: &LineIndex,
    source: &StyleSource<'_>,
    metrics: &dyn FontMetricsProvider,
) -> i32 {
    let mut widest = 0;
    for line in 0..index.line_count() {
        let range = content_range(text, index.line_range(line, text.len()));
        widest = widest.max(advance_x(text, range, 0, source, metrics));
    }
    widest
}

/// Find where the line starting at `line_start` ends: one past the
/// terminator, the wrap point, or the end of text.
fn next_line_start(
    text: &str,
    line_start: usize,
    params: &LayoutParams<'_>,
    metrics: &dyn FontMetricsProvider,
) -> usize {
    let mut x = 0i32;
    let mut last_break: Option<usize> = None;
    for (i, ch) in text[line_start..].char_indices() {
        let pos = line_start + i;
        if ch == '\n' {
            return pos + 1;
        }
        let style = params.source.style_at(pos);
        let advance = char_advance_at(ch, x, &style, metrics);
        if let Some(width) = params.wrap_width {
            if x + advance > width {
                if let Some(brk) = last_break {
                    return brk;
                }
                if pos > line_start {
                    // Unbreakable word wider than the destination: cut at
                    // the width boundary rather than overflow.
                    return pos;
                }
                // A single character wider than the destination still
                // occupies one line.
                return pos + ch.len_utf8();
            }
        }
        x += advance;
        if is_break_char(ch) {
            last_break = Some(pos + ch.len_utf8());
        }
    }
    text.len()
}

/// Combined metrics of every style run intersecting a line.
fn line_metrics_for(
    range: Range<usize>,
    source: &StyleSource<'_>,
    metrics: &dyn FontMetricsProvider,
) -> LineMetrics {
    if range.start >= range.end {
        return metrics.line_metrics(&source.style_at(range.start));
    }
    let mut combined: Option<LineMetrics> = None;
    for (_, style) in source.segments(range.clone()) {
        let lm = metrics.line_metrics(&style);
        combined = Some(combined.map_or(lm, |c| c.max(lm)));
    }
    combined.unwrap_or_else(|| metrics.line_metrics(&source.style_at(range.start)))
}
