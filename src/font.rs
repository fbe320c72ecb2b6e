//! Font configuration and symbolic trait handling
//!
//! The crate never rasterizes anything. A [`Font`] is a description the host
//! surface turns into a real platform font: family, point size, and the
//! symbolic traits (bold/italic) that select a face.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Symbolic font traits that select a face within a family
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FontTraits: u8 {
        const BOLD   = 0b0000_0001;
        const ITALIC = 0b0000_0010;
    }
}

impl FontTraits {
    pub fn is_bold(self) -> bool {
        self.contains(Self::BOLD)
    }

    pub fn is_italic(self) -> bool {
        self.contains(Self::ITALIC)
    }
}

/// Line decoration drawn over a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    Underline,
    Strikethrough,
}

/// Faces available for a font family beyond the regular one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faces {
    #[serde(default = "yes")]
    pub bold: bool,
    #[serde(default = "yes")]
    pub italic: bool,
    #[serde(default = "yes")]
    pub bold_italic: bool,
}

fn yes() -> bool {
    true
}

impl Default for Faces {
    fn default() -> Self {
        Self {
            bold: true,
            italic: true,
            bold_italic: true,
        }
    }
}

impl Faces {
    /// Only the regular face exists
    pub const fn regular_only() -> Self {
        Self {
            bold: false,
            italic: false,
            bold_italic: false,
        }
    }

    /// Whether a face with exactly these traits exists
    pub fn supports(&self, traits: FontTraits) -> bool {
        match (traits.is_bold(), traits.is_italic()) {
            (false, false) => true,
            (true, false) => self.bold,
            (false, true) => self.italic,
            (true, true) => self.bold_italic,
        }
    }
}

/// Concrete font description handed to the host surface
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: Arc<str>,
    /// Point size with the scale factor already applied
    pub size: f32,
    pub traits: FontTraits,
}

/// Base font family/size plus scale factor
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfiguration {
    pub family: Arc<str>,
    pub size: f32,
    pub scale: f32,
    pub faces: Faces,
}

pub const DEFAULT_FONT_FAMILY: &str = "Menlo";
pub const DEFAULT_FONT_SIZE: f32 = 13.0;

impl Default for FontConfiguration {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE)
    }
}

impl FontConfiguration {
    pub fn new(family: &str, size: f32) -> Self {
        Self {
            family: Arc::from(family),
            size,
            scale: 1.0,
            faces: Faces::default(),
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_faces(mut self, faces: Faces) -> Self {
        self.faces = faces;
        self
    }

    /// Effective point size (base size times scale)
    pub fn point_size(&self) -> f32 {
        self.size * self.scale
    }

    /// The un-traited base font
    pub fn font(&self) -> Font {
        Font {
            family: Arc::clone(&self.family),
            size: self.point_size(),
            traits: FontTraits::empty(),
        }
    }

    /// The base font with symbolic traits applied.
    ///
    /// Returns `None` when the family has no face for that combination.
    pub fn with_traits(&self, traits: FontTraits) -> Option<Font> {
        if !self.faces.supports(traits) {
            return None;
        }
        Some(Font {
            traits,
            ..self.font()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_size_applies_scale() {
        let config = FontConfiguration::new("Menlo", 12.0).with_scale(1.5);
        assert_eq!(config.point_size(), 18.0);
        assert_eq!(config.font().size, 18.0);
    }

    #[test]
    fn test_with_traits_on_full_family() {
        let config = FontConfiguration::default();
        let font = config
            .with_traits(FontTraits::BOLD | FontTraits::ITALIC)
            .unwrap();
        assert!(font.traits.is_bold());
        assert!(font.traits.is_italic());
    }

    #[test]
    fn test_with_traits_missing_face() {
        let config = FontConfiguration::default().with_faces(Faces {
            bold: true,
            italic: true,
            bold_italic: false,
        });
        assert!(config.with_traits(FontTraits::BOLD).is_some());
        assert!(config
            .with_traits(FontTraits::BOLD | FontTraits::ITALIC)
            .is_none());
        // Regular face always exists
        let regular_only = FontConfiguration::default().with_faces(Faces::regular_only());
        assert_eq!(
            regular_only.with_traits(FontTraits::empty()),
            Some(regular_only.font())
        );
    }

    #[test]
    fn test_trait_queries() {
        let traits = FontTraits::BOLD | FontTraits::ITALIC;
        assert!(traits.is_bold() && traits.is_italic());
        assert!(!FontTraits::BOLD.is_italic());
        assert!(!FontTraits::empty().is_bold());
    }
}
