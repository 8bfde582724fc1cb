//! Style run table for multi-style text.

use crate::style::TextStyle;
use std::ops::Range;

/// One style run: the byte offset where it begins and an index into the
/// style table. A run extends to the start of the next run (or end of text).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleRun {
    pub start: usize,
    pub style: u16,
}

/// Resolved style runs for clipboard interchange, offsets relative to the
/// copied text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleScrap {
    pub runs: Vec<(usize, TextStyle)>,
}

/// Ordered run list plus interned style table.
///
/// Invariants: runs are sorted by `start`, strictly increasing, and the
/// first run starts at 0. Lookup-by-offset resolves to the last run whose
/// start is at or before the offset. A corrupted or empty table degrades to
/// [`TextStyle::DEFAULT`] rather than erroring.
#[derive(Clone, Debug)]
pub struct StyleRunTable {
    runs: Vec<StyleRun>,
    styles: Vec<TextStyle>,
}

impl StyleRunTable {
    /// Create a table with a single run covering everything.
    #[must_use]
    pub fn new(default: TextStyle) -> Self {
        Self {
            runs: vec![StyleRun { start: 0, style: 0 }],
            styles: vec![default],
        }
    }

    /// Number of runs.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Number of interned styles.
    #[must_use]
    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    /// The run list.
    #[must_use]
    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    /// Index of the run covering an offset.
    #[must_use]
    pub fn run_index_at(&self, offset: usize) -> usize {
        self.runs
            .partition_point(|r| r.start <= offset)
            .saturating_sub(1)
    }

    /// The style active at an offset.
    #[must_use]
    pub fn style_at(&self, offset: usize) -> TextStyle {
        let Some(run) = self.runs.get(self.run_index_at(offset)) else {
            return self.styles.first().copied().unwrap_or_default();
        };
        self.styles
            .get(run.style as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Subdivide a byte range at run boundaries, yielding `(range, style)`
    /// pieces in order. Used by layout and render.
    #[must_use]
    pub fn segments(&self, range: Range<usize>) -> Vec<(Range<usize>, TextStyle)> {
        let mut pieces = Vec::new();
        if range.start >= range.end {
            return pieces;
        }
        let mut pos = range.start;
        while pos < range.end {
            let idx = self.run_index_at(pos);
            let piece_end = self
                .runs
                .get(idx + 1)
                .map_or(range.end, |next| next.start.min(range.end));
            let style = self.style_at(pos);
            pieces.push((pos..piece_end, style));
            pos = piece_end;
        }
        pieces
    }

    /// The single style covering a range, if it is uniform.
    #[must_use]
    pub fn uniform_style(&self, range: Range<usize>) -> Option<TextStyle> {
        if range.start >= range.end {
            return Some(self.style_at(range.start));
        }
        let mut pieces = self.segments(range).into_iter();
        let (_, first) = pieces.next()?;
        pieces.all(|(_, style)| style == first).then_some(first)
    }

    /// Apply a style to a byte range, splitting runs as needed.
    pub fn set_style(&mut self, range: Range<usize>, style: TextStyle) {
        if range.start >= range.end {
            return;
        }
        let resume = self.style_at(range.end);
        let styled = self.intern(style);
        let resumed = self.intern(resume);
        self.runs
            .retain(|r| r.start < range.start || r.start > range.end);
        self.runs.push(StyleRun {
            start: range.start,
            style: styled,
        });
        self.runs.push(StyleRun {
            start: range.end,
            style: resumed,
        });
        self.coalesce();
    }

    /// Keep runs consistent across a `replace_range(at..at+removed, ins)`
    /// edit: runs inside the removed span die, later runs shift, inserted
    /// text takes the style of the character preceding the edit point, and
    /// the first surviving tail character keeps its own style.
    pub fn adjust_for_edit(&mut self, at: usize, removed: usize, inserted: usize) {
        if removed == 0 && inserted == 0 {
            return;
        }
        let removed_end = at + removed;
        // Replacement text takes the style of the first replaced character;
        // a pure insertion continues the style of the character before it.
        let ins_style = if removed > 0 {
            self.style_at(at)
        } else {
            self.style_at(at.saturating_sub(1))
        };
        let tail_style = self.style_at(removed_end);
        self.runs
            .retain(|r| r.start <= at || r.start > removed_end);
        for run in &mut self.runs {
            if run.start > at {
                run.start = run.start - removed + inserted;
            }
        }
        if inserted > 0 {
            let styled = self.intern(ins_style);
            self.runs.push(StyleRun { start: at, style: styled });
        }
        let resumed = self.intern(tail_style);
        self.runs.push(StyleRun {
            start: at + inserted,
            style: resumed,
        });
        self.coalesce();
    }

    /// Extract the resolved runs covering a range, for clipboard copy.
    #[must_use]
    pub fn extract(&self, range: Range<usize>) -> StyleScrap {
        let runs = self
            .segments(range.clone())
            .into_iter()
            .map(|(piece, style)| (piece.start - range.start, style))
            .collect();
        StyleScrap { runs }
    }

    /// Apply scrap runs to `len` bytes of freshly inserted text at `at`.
    pub fn apply_scrap(&mut self, at: usize, len: usize, scrap: &StyleScrap) {
        for (i, &(start, style)) in scrap.runs.iter().enumerate() {
            let end = scrap
                .runs
                .get(i + 1)
                .map_or(len, |&(next_start, _)| next_start)
                .min(len);
            if start < end {
                self.set_style(at + start..at + end, style);
            }
        }
    }

    fn intern(&mut self, style: TextStyle) -> u16 {
        if let Some(idx) = self.styles.iter().position(|s| *s == style) {
            return idx as u16;
        }
        self.styles.push(style);
        (self.styles.len() - 1) as u16
    }

    /// Restore the run invariants: sorted strictly-increasing starts (on a
    /// tie the later run wins), adjacent identical styles merged, first run
    /// at offset 0.
    fn coalesce(&mut self) {
        self.runs.sort_by_key(|r| r.start);
        let mut merged: Vec<StyleRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.start == run.start {
                    *last = run;
                    // The replacement may now repeat the style before it.
                    let n = merged.len();
                    if n >= 2 && merged[n - 2].style == merged[n - 1].style {
                        merged.pop();
                    }
                    continue;
                }
                if last.style == run.style {
                    continue;
                }
            }
            merged.push(run);
        }
        self.runs = merged;
        if self.runs.first().is_none_or(|r| r.start != 0) {
            let style = self.runs.first().map_or(0, |r| r.style);
            self.runs.insert(0, StyleRun { start: 0, style });
        }
    }
}

impl Default for StyleRunTable {
    fn default() -> Self {
        Self::new(TextStyle::DEFAULT)
    }
}
