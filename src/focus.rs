//! Input-focus bookkeeping for hosts with multiple editing fields.
//!
//! A window full of dialog fields owns one `FocusContext` and routes key
//! events to whichever field holds focus. This is deliberately a plain value
//! the host owns, not process-wide state; two windows get two contexts.

/// Identifier the host assigns to an editing field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldId(pub u32);

/// Which field, if any, currently has input focus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusContext {
    focused: Option<FieldId>,
}

impl FocusContext {
    /// Create a context with no focused field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused field, if any.
    #[must_use]
    pub fn focused(&self) -> Option<FieldId> {
        self.focused
    }

    /// Check whether a field has focus.
    #[must_use]
    pub fn is_focused(&self, id: FieldId) -> bool {
        self.focused == Some(id)
    }

    /// Move focus to a field, returning the field that lost it so the host
    /// can deactivate its engine.
    pub fn focus(&mut self, id: FieldId) -> Option<FieldId> {
        let previous = self.focused.filter(|&prev| prev != id);
        self.focused = Some(id);
        previous
    }

    /// Clear focus entirely, returning the field that lost it.
    pub fn blur(&mut self) -> Option<FieldId> {
        self.focused.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_hand_off() {
        let mut ctx = FocusContext::new();
        assert_eq!(ctx.focus(FieldId(1)), None);
        assert!(ctx.is_focused(FieldId(1)));

        assert_eq!(ctx.focus(FieldId(2)), Some(FieldId(1)));
        assert!(ctx.is_focused(FieldId(2)));
        assert!(!ctx.is_focused(FieldId(1)));

        // Re-focusing the focused field reports no loser.
        assert_eq!(ctx.focus(FieldId(2)), None);
    }

    #[test]
    fn test_blur() {
        let mut ctx = FocusContext::new();
        ctx.focus(FieldId(7));
        assert_eq!(ctx.blur(), Some(FieldId(7)));
        assert_eq!(ctx.focused(), None);
        assert_eq!(ctx.blur(), None);
    }
}
