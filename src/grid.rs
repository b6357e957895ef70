//! Grid computation: tiling mode + page constants → cell geometry.
//!
//! Pure and total. Every supported [`Mode`] maps to a fixed
//! (columns, rows, orientation) triple; the cell size follows from the page
//! size, a uniform outer margin, and a uniform gap between cells:
//!
//! ```text
//! margin*2 + columns*cell_width + (columns-1)*spacing == page_width
//! ```
//!
//! # Example
//!
//! ```
//! use nuplayout::{Mode, PageConstants, compute_grid};
//!
//! let grid = compute_grid(Mode::Nine, &PageConstants::a4()).unwrap();
//! assert_eq!((grid.columns, grid.rows), (3, 3));
//! assert!((grid.cell.width - 64.2667).abs() < 0.001);
//! ```

use crate::error::LayoutError;
use crate::fit::FitPolicy;
use crate::geometry::{Orientation, PageSpec, Point, Rect, Size};

/// Supported items-per-page tiling configurations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// 1 column × 2 rows, portrait.
    Two,
    /// 2 columns × 2 rows, landscape.
    Four,
    /// 3 columns × 2 rows, portrait.
    Six,
    /// 3 columns × 3 rows, portrait.
    #[default]
    Nine,
    /// 6 columns × 2 rows, landscape.
    Twelve,
}

impl Mode {
    /// Every mode, ascending by items per page.
    pub const ALL: [Self; 5] = [Self::Two, Self::Four, Self::Six, Self::Nine, Self::Twelve];

    /// Look up the mode holding `n` items per page.
    pub fn from_per_page(n: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.per_page() == n)
    }

    /// `(columns, rows)` of the grid.
    pub const fn columns_rows(self) -> (usize, usize) {
        match self {
            Self::Two => (1, 2),
            Self::Four => (2, 2),
            Self::Six => (3, 2),
            Self::Nine => (3, 3),
            Self::Twelve => (6, 2),
        }
    }

    pub const fn per_page(self) -> usize {
        let (c, r) = self.columns_rows();
        c * r
    }

    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Two | Self::Six | Self::Nine => Orientation::Portrait,
            Self::Four | Self::Twelve => Orientation::Landscape,
        }
    }

    /// Fit policy used for every item laid out in this mode.
    ///
    /// Document grids (2-up, 4-up) and the dense 12-up landscape grid keep
    /// the whole image. The portrait screenshot grids (6-up, 9-up) fill the
    /// cell width and trim the bottom.
    pub const fn fit_policy(self) -> FitPolicy {
        match self {
            Self::Two | Self::Four | Self::Twelve => FitPolicy::Contain,
            Self::Six | Self::Nine => FitPolicy::CoverTopCrop,
        }
    }

    /// Short human label, e.g. `9 per page (portrait)`.
    pub fn label(self) -> String {
        let orientation = if self.orientation().is_landscape() { "landscape" } else { "portrait" };
        format!("{} per page ({orientation})", self.per_page())
    }
}

/// Page size, margin and spacing shared by every mode of a deployment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageConstants {
    /// Page dimensions in portrait orientation.
    pub page: Size,
    /// Uniform outer margin on all four sides.
    pub margin: f64,
    /// Uniform gap between adjacent cells.
    pub spacing: f64,
}

impl Default for PageConstants {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageConstants {
    /// Default margin and spacing, 4.3 mm.
    pub const DEFAULT_GUTTER_MM: f64 = 4.3;

    /// ISO A4 with the default margin and spacing.
    pub const fn a4() -> Self {
        Self {
            page: Size::A4,
            margin: Self::DEFAULT_GUTTER_MM,
            spacing: Self::DEFAULT_GUTTER_MM,
        }
    }

    /// Set the portrait page size.
    pub fn page(mut self, page: Size) -> Self {
        self.page = page;
        self
    }

    /// Set the outer margin.
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the gap between cells.
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }
}

/// Which way a guide line runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GuideAxis {
    /// Runs top to bottom, between two columns.
    Vertical,
    /// Runs left to right, between two rows.
    Horizontal,
}

/// A cut guide centered in the gap between two rows or columns.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GuideLine {
    pub axis: GuideAxis,
    pub from: Point,
    pub to: Point,
}

/// Resolved grid for one mode on one page.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridDescriptor {
    pub mode: Mode,
    pub columns: usize,
    pub rows: usize,
    /// Size of every cell.
    pub cell: Size,
    pub margin: f64,
    pub spacing: f64,
    /// Page with the mode's orientation applied.
    pub page: PageSpec,
}

impl GridDescriptor {
    pub fn photos_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// Effective page width × height.
    pub fn page_size(&self) -> Size {
        self.page.dimensions()
    }

    /// Pages needed for `items` items. Zero items need zero pages.
    pub fn page_count(&self, items: usize) -> usize {
        items.div_ceil(self.photos_per_page())
    }

    /// Absolute rectangle of the cell at `(row, column)`.
    pub fn cell_rect(&self, row: usize, column: usize) -> Rect {
        Rect::new(
            self.margin + column as f64 * (self.cell.width + self.spacing),
            self.margin + row as f64 * (self.cell.height + self.spacing),
            self.cell.width,
            self.cell.height,
        )
    }

    /// Cut guides at every internal column and row boundary.
    ///
    /// Each guide sits at the middle of the gap and spans the content area,
    /// from one margin to the opposite one.
    pub fn guide_lines(&self) -> Vec<GuideLine> {
        let page = self.page_size();
        let mut lines = Vec::with_capacity(self.columns + self.rows - 2);
        for col in 1..self.columns {
            let x = self.margin + col as f64 * self.cell.width + (col as f64 - 0.5) * self.spacing;
            lines.push(GuideLine {
                axis: GuideAxis::Vertical,
                from: Point::new(x, self.margin),
                to: Point::new(x, page.height - self.margin),
            });
        }
        for row in 1..self.rows {
            let y = self.margin + row as f64 * self.cell.height + (row as f64 - 0.5) * self.spacing;
            lines.push(GuideLine {
                axis: GuideAxis::Horizontal,
                from: Point::new(self.margin, y),
                to: Point::new(page.width - self.margin, y),
            });
        }
        lines
    }

    /// How far the reconstructed page size drifts from the actual page.
    ///
    /// Returns `(width_error, height_error)`; both are ~0 for a valid grid.
    pub fn residual(&self) -> (f64, f64) {
        let page = self.page_size();
        let w = self.margin * 2.0
            + self.columns as f64 * self.cell.width
            + (self.columns as f64 - 1.0) * self.spacing;
        let h = self.margin * 2.0
            + self.rows as f64 * self.cell.height
            + (self.rows as f64 - 1.0) * self.spacing;
        (w - page.width, h - page.height)
    }
}

/// Compute the grid for `mode` on the page described by `constants`.
///
/// Fails with [`LayoutError::DegenerateLayout`] when margin and spacing
/// leave a non-positive cell, or when any constant is negative or not
/// finite. Nothing is clamped.
pub fn compute_grid(mode: Mode, constants: &PageConstants) -> Result<GridDescriptor, LayoutError> {
    let (columns, rows) = mode.columns_rows();
    let page = PageSpec::new(constants.page, mode.orientation());
    let dims = page.dimensions();
    let PageConstants {
        margin, spacing, ..
    } = *constants;

    let cell_width = (dims.width - 2.0 * margin - (columns as f64 - 1.0) * spacing) / columns as f64;
    let cell_height = (dims.height - 2.0 * margin - (rows as f64 - 1.0) * spacing) / rows as f64;

    let constants_valid = margin.is_finite() && margin >= 0.0 && spacing.is_finite() && spacing >= 0.0;
    let cell = Size::new(cell_width, cell_height);
    if !constants_valid || !dims.is_positive() || !cell.is_positive() {
        return Err(LayoutError::DegenerateLayout {
            mode,
            cell_width,
            cell_height,
        });
    }

    Ok(GridDescriptor {
        mode,
        columns,
        rows,
        cell,
        margin,
        spacing,
        page,
    })
}
