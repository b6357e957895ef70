//! Geometry value types shared by the layout engine and both renderers.
//!
//! Physical quantities ([`Size`], [`Rect`], [`Point`]) are `f64` in the page
//! unit, millimeters by convention. Pixel quantities ([`PixelSize`],
//! [`PixelRect`]) address decoded bitmaps and only appear where a crop has to
//! be resolved against real source pixels.

/// Tolerance used when comparing physical coordinates.
pub const EPSILON: f64 = 1e-9;

/// Width × height in physical units.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// ISO A4 in portrait, 210 × 297 mm.
    pub const A4: Self = Self::new(210.0, 297.0);

    /// Same size with the axes exchanged.
    pub const fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Both axes finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// A point in physical units, origin at the top-left of the page.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in physical units.
///
/// `y` grows downward, matching both the screen box model and the document
/// writer's top-left page origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect of the given size anchored at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Shift by `(dx, dy)`.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Move a rect expressed relative to `origin`'s top-left corner into
    /// `origin`'s coordinate space.
    pub fn offset_by(self, origin: &Rect) -> Self {
        self.translate(origin.x, origin.y)
    }

    /// Finite, with strictly positive width and height.
    pub fn is_positive(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Whether `other` lies inside `self`, allowing `eps` of slack per edge.
    pub fn contains(&self, other: &Rect, eps: f64) -> bool {
        other.x >= self.x - eps
            && other.y >= self.y - eps
            && other.right() <= self.right() + eps
            && other.bottom() <= self.bottom() + eps
    }

    /// Whether the interiors of the two rects overlap by more than `eps`.
    pub fn overlaps(&self, other: &Rect, eps: f64) -> bool {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        w > eps && h > eps
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Rect, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.width - other.width).abs() <= eps
            && (self.height - other.height).abs() <= eps
    }
}

/// Width × height in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width / height, or `None` when either side is zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Create a new rect.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp this rect to fit within `(0, 0, max_w, max_h)`.
    /// Width and height are clamped to at least 1.
    pub fn clamp_to(self, max_w: u32, max_h: u32) -> Self {
        let x = self.x.min(max_w.saturating_sub(1));
        let y = self.y.min(max_h.saturating_sub(1));
        let w = self.width.min(max_w.saturating_sub(x)).max(1);
        let h = self.height.min(max_h.saturating_sub(y)).max(1);
        Self {
            x,
            y,
            width: w,
            height: h,
        }
    }

    /// Whether this rect covers the full source (no actual crop).
    pub fn is_full(&self, source: PixelSize) -> bool {
        self.x == 0 && self.y == 0 && self.width == source.width && self.height == source.height
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }
}

/// Page orientation. Landscape swaps the physical width and height.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn is_landscape(self) -> bool {
        self == Self::Landscape
    }
}

/// A physical page: its portrait dimensions plus the orientation it is used in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PageSpec {
    /// Dimensions in portrait orientation (width ≤ height for standard sizes).
    pub portrait: Size,
    pub orientation: Orientation,
}

impl PageSpec {
    pub const fn new(portrait: Size, orientation: Orientation) -> Self {
        Self {
            portrait,
            orientation,
        }
    }

    /// Effective width × height once the orientation is applied.
    pub fn dimensions(&self) -> Size {
        match self.orientation {
            Orientation::Portrait => self.portrait,
            Orientation::Landscape => self.portrait.transposed(),
        }
    }

    pub fn width(&self) -> f64 {
        self.dimensions().width
    }

    pub fn height(&self) -> f64 {
        self.dimensions().height
    }
}

/// Background color for blank-fill regions and guide strokes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CanvasColor {
    /// Transparent black `[0, 0, 0, 0]`.
    #[default]
    Transparent,
    /// sRGB color with alpha (8-bit per channel).
    Srgb { r: u8, g: u8, b: u8, a: u8 },
}

impl CanvasColor {
    /// White, fully opaque.
    pub const fn white() -> Self {
        Self::Srgb {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }
    }

    /// Opaque neutral gray.
    pub const fn gray(level: u8) -> Self {
        Self::Srgb {
            r: level,
            g: level,
            b: level,
            a: 255,
        }
    }

    /// `#rrggbb` notation, or `none` for transparent.
    pub fn to_hex(&self) -> String {
        match *self {
            Self::Transparent => String::from("none"),
            Self::Srgb { r, g, b, .. } => format!("#{r:02x}{g:02x}{b:02x}"),
        }
    }
}
