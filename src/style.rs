//! Text styling: font identity, size, and face attributes.
//!
//! A [`TextStyle`] is the unit of the multi-style run model: every style run
//! maps a span of text to one font/size/attribute combination. Styles are
//! small `Copy` values; the engine interns them in a style table and refers
//! to them by index.

use bitflags::bitflags;

bitflags! {
    /// Face attributes applied on top of a font.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TextAttributes: u8 {
        /// Bold weight.
        const BOLD      = 0x01;
        /// Italic slant.
        const ITALIC    = 0x02;
        /// Underlined text.
        const UNDERLINE = 0x04;
    }
}

/// Opaque font identifier, resolved by the host's metrics provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontId(pub u16);

/// A complete character style: font, point size, and face attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub font: FontId,
    pub size: u16,
    pub attributes: TextAttributes,
}

impl TextStyle {
    /// The system default style: font 0 at 12 points, plain face.
    pub const DEFAULT: Self = Self {
        font: FontId(0),
        size: 12,
        attributes: TextAttributes::empty(),
    };

    /// Create a plain style for a font and size.
    #[must_use]
    pub fn new(font: FontId, size: u16) -> Self {
        Self {
            font,
            size,
            attributes: TextAttributes::empty(),
        }
    }

    /// Return this style with additional attributes set.
    #[must_use]
    pub fn with_attributes(mut self, attributes: TextAttributes) -> Self {
        self.attributes |= attributes;
        self
    }

    /// Return this style with bold set.
    #[must_use]
    pub fn with_bold(self) -> Self {
        self.with_attributes(TextAttributes::BOLD)
    }

    /// Return this style with italic set.
    #[must_use]
    pub fn with_italic(self) -> Self {
        self.with_attributes(TextAttributes::ITALIC)
    }

    /// Return this style with underline set.
    #[must_use]
    pub fn with_underline(self) -> Self {
        self.with_attributes(TextAttributes::UNDERLINE)
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style() {
        let style = TextStyle::default();
        assert_eq!(style.font, FontId(0));
        assert_eq!(style.size, 12);
        assert!(style.attributes.is_empty());
    }

    #[test]
    fn test_attribute_builders() {
        let style = TextStyle::new(FontId(3), 9).with_bold().with_underline();
        assert!(style.attributes.contains(TextAttributes::BOLD));
        assert!(style.attributes.contains(TextAttributes::UNDERLINE));
        assert!(!style.attributes.contains(TextAttributes::ITALIC));
    }

    #[test]
    fn test_styles_compare_by_value() {
        let a = TextStyle::new(FontId(1), 10).with_italic();
        let b = TextStyle::new(FontId(1), 10).with_italic();
        assert_eq!(a, b);
        assert_ne!(a, a.with_bold());
    }
}
