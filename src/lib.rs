//! `fieldedit` - Embeddable text-editing engine
//!
//! The editing surface behind document windows and dialog input fields of a
//! retro desktop environment: bounded in-memory text storage, word-wrap
//! line layout with tab stops, a click/drag/keyboard selection state
//! machine, style-run-aware rendering, and viewport scrolling.
//!
//! The engine is deliberately host-driven: drawing goes through a
//! [`DrawSurface`] the host supplies, font measurement through a
//! [`FontMetricsProvider`], clipboard traffic through a [`ScrapStore`], and
//! every timestamp arrives on the events themselves. There is no internal
//! concurrency and no clock; feed it events and idle ticks and drain
//! [`TextEngine::take_invalid_rect`] to schedule redraws.
//!
//! # Examples
//!
//! ```
//! use fieldedit::{
//!     EngineConfig, Event, Key, Modifiers, MonoMetrics, Rect, TextEngine,
//! };
//!
//! let config = EngineConfig::framed(Rect::new(0, 0, 200, 100));
//! let mut engine = TextEngine::new(config, Box::new(MonoMetrics::with_advance(10)));
//!
//! engine.set_text("Hello World").unwrap();
//! engine.handle_event(&Event::Activate);
//! engine.handle_event(&Event::Key {
//!     key: Key::End,
//!     modifiers: Modifiers::empty(),
//! });
//! engine.handle_event(&Event::Key {
//!     key: Key::Char('!'),
//!     modifiers: Modifiers::empty(),
//! });
//! assert_eq!(engine.text(), "Hello World!");
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)]
#![allow(clippy::cast_possible_truncation)] // Intentional coordinate casts
#![allow(clippy::cast_possible_wrap)] // Intentional coordinate conversions
#![allow(clippy::module_name_repetitions)] // Allow StyleRunTable etc
#![allow(clippy::missing_errors_doc)] // Error conditions documented on the type
#![allow(clippy::must_use_candidate)] // Accessors are obvious
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::items_after_statements)] // Common pattern in tests

pub mod clipboard;
pub mod engine;
pub mod error;
pub mod event;
pub mod focus;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod metrics;
pub mod render;
pub mod scroll;
pub mod style;
pub mod text;

// Re-export core types at crate root
pub use clipboard::{MemScrap, Scrap, ScrapStore};
pub use engine::{
    CARET_BLINK_MS, CARET_WIDTH, DOUBLE_CLICK_MS, EngineConfig, Feature, Justification,
    MAX_DRAG_STEPS, TextEngine,
};
pub use error::{Error, Result};
pub use event::{LogLevel, emit_alert, emit_log, set_alert_callback, set_log_callback};
pub use focus::{FieldId, FocusContext};
pub use geometry::{Point, Rect};
pub use layout::LineIndex;
pub use metrics::{FontMetricsProvider, LineMetrics, MonoMetrics};
pub use render::{DrawSurface, text_box};
pub use scroll::ScrollState;
pub use style::{FontId, TextAttributes, TextStyle};
pub use text::{MAX_TEXT_LEN, StyleRun, StyleRunTable, StyleScrap, TextStore};

// Re-export input types
pub use input::{Event, Key, Modifiers};
