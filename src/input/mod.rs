//! Raw input events.
//!
//! The host's event loop translates its native events into this vocabulary
//! and feeds them to [`TextEngine::handle_event`](crate::TextEngine::handle_event).
//! Pointer events carry host timestamps (milliseconds) so multi-click
//! detection and caret blinking never read a clock; drag tracking advances
//! one step per `PointerMoved` rather than polling.

mod keyboard;

pub use keyboard::{Key, Modifiers};

use crate::geometry::Point;

/// An input event for the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Pointer button pressed at a point.
    PointerDown {
        point: Point,
        modifiers: Modifiers,
        time_ms: u64,
    },
    /// Pointer moved (polled or event-driven) while tracking.
    PointerMoved { point: Point },
    /// Pointer button released.
    PointerUp { point: Point },
    /// Key pressed.
    Key { key: Key, modifiers: Modifiers },
    /// The engine's field became the active (focused) one.
    Activate,
    /// The engine's field lost focus.
    Deactivate,
    /// Idle tick; drives caret blink and drag autoscroll.
    Idle { time_ms: u64 },
}

impl Event {
    /// Check if this is a pointer event.
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::PointerDown { .. } | Self::PointerMoved { .. } | Self::PointerUp { .. }
        )
    }

    /// Check if this is a key event.
    #[must_use]
    pub fn is_key(&self) -> bool {
        matches!(self, Self::Key { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_classification() {
        let down = Event::PointerDown {
            point: Point::new(1, 2),
            modifiers: Modifiers::empty(),
            time_ms: 0,
        };
        assert!(down.is_pointer());
        assert!(!down.is_key());

        let key = Event::Key {
            key: Key::Return,
            modifiers: Modifiers::empty(),
        };
        assert!(key.is_key());
        assert!(!key.is_pointer());
    }
}
