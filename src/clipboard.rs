//! Clipboard (scrap) interchange.
//!
//! The scrap is host-owned: the engine serializes the current selection into
//! a [`Scrap`] and hands it to whatever [`ScrapStore`] the host provides,
//! never retaining a reference. Styled engines carry their resolved runs
//! alongside the text so a paste into another styled engine preserves
//! formatting; plain engines ignore the runs.

use crate::text::StyleScrap;

/// A clipboard payload: text plus, in multi-style mode, its style runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scrap {
    pub text: String,
    pub styles: Option<StyleScrap>,
}

impl Scrap {
    /// Create a plain-text scrap.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            styles: None,
        }
    }

    /// Create a styled scrap.
    #[must_use]
    pub fn styled(text: impl Into<String>, styles: StyleScrap) -> Self {
        Self {
            text: text.into(),
            styles: Some(styles),
        }
    }

    /// Check if there is nothing to paste.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Host-owned scrap storage.
pub trait ScrapStore {
    /// Store a scrap, replacing any previous content.
    fn put(&mut self, scrap: Scrap);

    /// Retrieve the current scrap, if any.
    fn get(&self) -> Option<Scrap>;
}

/// In-memory scrap store for tests and hosts without a system clipboard.
#[derive(Clone, Debug, Default)]
pub struct MemScrap {
    slot: Option<Scrap>,
}

impl MemScrap {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScrapStore for MemScrap {
    fn put(&mut self, scrap: Scrap) {
        self.slot = Some(scrap);
    }

    fn get(&self) -> Option<Scrap> {
        self.slot.clone()
    }
}
