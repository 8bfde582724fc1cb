//! Event dispatch: pointer tracking and keyboard handling.
//!
//! Drag selection is an explicit state machine advanced one step per
//! pointer event from the host's loop; nothing here blocks or polls. Each
//! move consumes one step of a safety cap so a stuck device cannot wedge
//! the engine in a drag forever.

use crate::event::{LogLevel, emit_log};
use crate::geometry::Point;
use crate::input::{Event, Key, Modifiers};

use super::TextEngine;

/// Safety cap on drag-tracking steps. On exhaustion the drag is abandoned:
/// the selection keeps its last extent and a warning is logged.
pub const MAX_DRAG_STEPS: u32 = 100_000;

/// Multi-click offset slop: clicks within this many bytes of the previous
/// click still count toward the same click run.
const CLICK_SLOP_BYTES: usize = 2;

/// Horizontal autoscroll step in pixels while dragging past the view edge.
const AUTOSCROLL_STEP_H: i32 = 8;

impl TextEngine {
    /// Dispatch a raw input event.
    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::PointerDown {
                point,
                modifiers,
                time_ms,
            } => self.pointer_down(point, modifiers, time_ms),
            Event::PointerMoved { point } => self.pointer_moved(point),
            Event::PointerUp { point } => self.pointer_up(point),
            Event::Key { key, modifiers } => self.handle_key(key, modifiers),
            Event::Activate => self.activate(),
            Event::Deactivate => self.deactivate(),
            Event::Idle { time_ms } => self.idle(time_ms),
        }
    }

    /// Pointer button pressed. Counts multi-clicks (same target within the
    /// time and distance thresholds), collapses or extends the selection,
    /// and arms drag tracking.
    pub fn pointer_down(&mut self, pt: Point, mods: Modifiers, now: u64) {
        self.last_time = now;
        let offset = self.offset_at_point(pt);

        if mods.shift() {
            self.extend_to(offset);
            self.drag.last_click_time = now;
            self.drag.last_click_point = pt;
            self.drag.last_click_offset = offset;
            self.drag.last_pointer = pt;
            self.drag.click_count = 1;
            return;
        }

        let same_run = now.saturating_sub(self.drag.last_click_time) <= self.double_click_ms
            && pt.slop_distance(self.drag.last_click_point) <= self.double_click_slop
            && offset.abs_diff(self.drag.last_click_offset) <= CLICK_SLOP_BYTES;
        self.drag.click_count = if same_run { self.drag.click_count + 1 } else { 1 };
        self.drag.last_click_time = now;
        self.drag.last_click_point = pt;
        self.drag.last_click_offset = offset;
        self.drag.last_pointer = pt;

        match self.drag.click_count {
            1 => {
                self.set_caret(offset);
                self.drag.anchor = offset;
                self.drag.dragging = true;
                self.drag.steps = 0;
            }
            2 => {
                self.select_word_at(offset);
                self.drag.dragging = false;
            }
            _ => {
                self.select_line_at(offset);
                self.drag.click_count = 0;
                self.drag.dragging = false;
            }
        }
    }

    /// Pointer moved. While dragging, the selection tracks
    /// `[min(anchor, offset), max(anchor, offset))`; outside the view the
    /// engine autoscrolls toward the pointer.
    pub fn pointer_moved(&mut self, pt: Point) {
        self.drag.last_pointer = pt;
        if !self.drag.dragging {
            return;
        }
        self.drag.steps += 1;
        if self.drag.steps > MAX_DRAG_STEPS {
            emit_log(
                LogLevel::Warn,
                "drag tracking abandoned after hitting the step cap",
            );
            self.drag.dragging = false;
            return;
        }
        if !self.view_rect.contains(pt) {
            self.autoscroll_toward(pt);
        }
        self.drag_select_to(pt);
    }

    /// Pointer button released; the drag ends with a final selection
    /// update.
    pub fn pointer_up(&mut self, pt: Point) {
        self.drag.last_pointer = pt;
        if self.drag.dragging {
            self.drag_select_to(pt);
            self.drag.dragging = false;
        }
    }

    fn drag_select_to(&mut self, pt: Point) {
        let offset = self.offset_at_point(pt);
        let anchor = self.drag.anchor;
        self.set_selection(anchor.min(offset), anchor.max(offset));
        self.drag.anchor = anchor;
    }

    /// One autoscroll step toward a pointer outside the view: a line
    /// height vertically, a fixed nudge horizontally. The selection
    /// follows the pointer.
    pub(crate) fn autoscroll_toward(&mut self, pt: Point) {
        if !self.auto_scroll {
            return;
        }
        let line_height = self.metrics.line_metrics(&self.default_style).height().max(1);
        let mut dv = 0;
        if pt.y < self.view_rect.top {
            dv = -line_height;
        } else if pt.y >= self.view_rect.bottom {
            dv = line_height;
        }
        let mut dh = 0;
        if pt.x < self.view_rect.left {
            dh = -AUTOSCROLL_STEP_H;
        } else if pt.x >= self.view_rect.right {
            dh = AUTOSCROLL_STEP_H;
        }
        if dh != 0 || dv != 0 {
            self.scroll_by(dh, dv);
            if self.drag.dragging {
                self.drag_select_to(pt);
            }
        }
    }

    /// Dispatch a key press.
    pub fn handle_key(&mut self, key: Key, mods: Modifiers) {
        match key {
            Key::Left | Key::Right | Key::Up | Key::Down => self.handle_arrow(key, mods),
            Key::Home => self.move_or_extend(0, mods),
            Key::End => {
                let end = self.len();
                self.move_or_extend(end, mods);
            }
            Key::PageUp => self.page_move(true, mods),
            Key::PageDown => self.page_move(false, mods),
            _ => self.handle_editing_key(key, mods),
        }
    }

    fn handle_editing_key(&mut self, key: Key, _mods: Modifiers) {
        if self.read_only {
            emit_log(LogLevel::Debug, "key ignored: engine is read-only");
            return;
        }
        // Rejections already alert the host; key handling stays non-fatal.
        let _ = match key {
            Key::Char(ch) if !ch.is_control() => {
                let mut buf = [0u8; 4];
                self.replace_selection(ch.encode_utf8(&mut buf))
            }
            Key::Return => self.replace_selection("\n"),
            Key::Tab => self.replace_selection("\t"),
            Key::Backspace => self.delete_backward(),
            Key::ForwardDelete => self.delete_forward(),
            _ => Ok(()),
        };
    }

    fn move_or_extend(&mut self, offset: usize, mods: Modifiers) {
        if mods.shift() {
            self.extend_to(offset);
        } else {
            self.set_caret(offset);
        }
        self.scroll_selection_into_view();
    }

    fn page_move(&mut self, up: bool, mods: Modifiers) {
        let page = self.page_lines();
        let current = self.lines.line_of(self.sel_end);
        let target_line = if up {
            current.saturating_sub(page)
        } else {
            (current + page).min(self.lines.line_count().saturating_sub(1))
        };
        let target = self.lines.start(target_line);
        let line_height = self.metrics.line_metrics(&self.default_style).height();
        let dv = page as i32 * line_height;
        self.scroll_by(0, if up { -dv } else { dv });
        self.move_or_extend(target, mods);
    }
}
