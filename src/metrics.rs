//! Font metrics provider interface.
//!
//! Metric computation is the host's job: given a [`TextStyle`] the provider
//! reports line metrics and per-character advance widths. The engine
//! consults it on every layout pass and never caches results across passes,
//! so a host may swap fonts between edits.

use unicode_width::UnicodeWidthChar;

use crate::style::TextStyle;

/// Vertical metrics for one line of a given style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineMetrics {
    /// Pixels above the baseline.
    pub ascent: i32,
    /// Pixels below the baseline.
    pub descent: i32,
    /// Extra pixels between lines.
    pub leading: i32,
}

impl LineMetrics {
    /// Create new line metrics.
    #[must_use]
    pub fn new(ascent: i32, descent: i32, leading: i32) -> Self {
        Self {
            ascent,
            descent,
            leading,
        }
    }

    /// Total line height.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.ascent + self.descent + self.leading
    }

    /// Component-wise maximum, used to combine the metrics of every style
    /// run intersecting a line.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self {
            ascent: self.ascent.max(other.ascent),
            descent: self.descent.max(other.descent),
            leading: self.leading.max(other.leading),
        }
    }
}

/// Host-supplied font measurement.
///
/// Tab characters are never passed to [`char_advance`](Self::char_advance);
/// the layout engine expands them to tab stops itself.
pub trait FontMetricsProvider {
    /// Line metrics (ascent, descent, leading) for a style.
    fn line_metrics(&self, style: &TextStyle) -> LineMetrics;

    /// Advance width of a single character in a style.
    fn char_advance(&self, ch: char, style: &TextStyle) -> i32;
}

/// Fixed-advance metrics, the built-in fallback provider.
///
/// Every character advances by a fixed amount scaled by its Unicode display
/// width, so fullwidth characters take two cells. Suitable for hosts with a
/// monospaced bitmap font and for tests, where predictable widths matter
/// more than typographic fidelity.
#[derive(Clone, Copy, Debug)]
pub struct MonoMetrics {
    advance: i32,
    line: LineMetrics,
}

impl MonoMetrics {
    /// Create metrics with a given per-character advance and line metrics.
    #[must_use]
    pub fn new(advance: i32, line: LineMetrics) -> Self {
        Self { advance, line }
    }

    /// Create metrics with a given advance and proportional line metrics
    /// (ascent 12/16 of line height, classic bitmap-font proportions).
    #[must_use]
    pub fn with_advance(advance: i32) -> Self {
        Self {
            advance,
            line: LineMetrics::new(12, 3, 1),
        }
    }
}

impl Default for MonoMetrics {
    fn default() -> Self {
        Self::with_advance(7)
    }
}

impl FontMetricsProvider for MonoMetrics {
    fn line_metrics(&self, _style: &TextStyle) -> LineMetrics {
        self.line
    }

    fn char_advance(&self, ch: char, _style: &TextStyle) -> i32 {
        let cells = ch.width().unwrap_or(0) as i32;
        cells * self.advance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_metrics_height() {
        let m = LineMetrics::new(12, 3, 1);
        assert_eq!(m.height(), 16);
    }

    #[test]
    fn test_line_metrics_max() {
        let a = LineMetrics::new(12, 3, 1);
        let b = LineMetrics::new(9, 5, 0);
        assert_eq!(a.max(b), LineMetrics::new(12, 5, 1));
    }

    #[test]
    fn test_mono_advance() {
        let m = MonoMetrics::with_advance(10);
        let style = TextStyle::default();
        assert_eq!(m.char_advance('a', &style), 10);
        assert_eq!(m.char_advance(' ', &style), 10);
        // Fullwidth characters occupy two cells.
        assert_eq!(m.char_advance('中', &style), 20);
        // Control characters have no advance of their own.
        assert_eq!(m.char_advance('\n', &style), 0);
    }
}
