//! Text storage and the style run model.
//!
//! [`TextStore`] holds the raw text as one bounded, growable buffer that the
//! engine exclusively owns; all external access is by byte offset so nothing
//! outlives a reallocation. [`StyleRunTable`] overlays the buffer with
//! ordered `{start, style}` runs plus an interned style table; when absent
//! the whole buffer renders in the engine's default style.

mod runs;
mod store;

pub use runs::{StyleRun, StyleRunTable, StyleScrap};
pub use store::{MAX_TEXT_LEN, TextStore};
