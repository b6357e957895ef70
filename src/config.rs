//! Deployment configuration.
//!
//! Page size, margin and spacing are fixed per deployment rather than
//! per document. Enable the `serde` feature to load a [`LayoutConfig`] from
//! any serde format.

use crate::document::{DocumentStyle, GuideStyle};
use crate::geometry::CanvasColor;
use crate::grid::{Mode, PageConstants};

/// Maximum number of assets a session accepts by default.
pub const DEFAULT_MAX_FILES: usize = 50;

/// Everything a deployment fixes up front.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    pub constants: PageConstants,
    pub guide_style: GuideStyle,
    /// Blank-fill color.
    pub background: CanvasColor,
    pub max_files: usize,
    pub default_mode: Mode,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            constants: PageConstants::a4(),
            guide_style: GuideStyle::default(),
            background: CanvasColor::white(),
            max_files: DEFAULT_MAX_FILES,
            default_mode: Mode::Nine,
        }
    }
}

impl LayoutConfig {
    pub fn constants(mut self, constants: PageConstants) -> Self {
        self.constants = constants;
        self
    }

    pub fn guide_style(mut self, style: GuideStyle) -> Self {
        self.guide_style = style;
        self
    }

    pub fn background(mut self, color: CanvasColor) -> Self {
        self.background = color;
        self
    }

    pub fn max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn default_mode(mut self, mode: Mode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Paint settings for the document adapter.
    pub fn document_style(&self) -> DocumentStyle {
        DocumentStyle {
            background: self.background,
            guide: self.guide_style,
        }
    }
}
