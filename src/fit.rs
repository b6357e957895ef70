//! Fit/crop resolution of one image into one cell.
//!
//! Given an image's aspect ratio and a cell size, [`resolve_fit`] decides
//! where the image is drawn inside the cell, which part of the source is
//! kept, and which part of the cell must be painted with the background.
//!
//! ```text
//!   Contain (wide image)      CoverTopCrop (short)     CoverTopCrop (tall)
//!   ┌──────────────┐          ┌──────────────┐         ┌──────────────┐
//!   │░░░░░░░░░░░░░░│          │    image     │         │  top of the  │
//!   │    image     │          │              │         │    image     │
//!   │░░░░░░░░░░░░░░│          │░░░░ fill ░░░░│         │              │
//!   └──────────────┘          └──────────────┘         └──────────────┘
//!                                                        (rest cropped)
//! ```
//!
//! All rectangles are in the cell's own coordinate space (origin at the
//! cell's top-left corner). Crop regions are fractions of the source image.

use num_traits::ToPrimitive;

use crate::error::LayoutError;
use crate::geometry::{EPSILON, PixelRect, PixelSize, Rect, Size};

/// Rule for reconciling an image's aspect ratio with its cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitPolicy {
    /// Uniform scale to fit inside the cell, centered. Never crops.
    #[default]
    Contain,
    /// Fill the cell width, anchor to the top edge. Vertical overflow is
    /// cropped from the bottom; a short image gets a blank strip below it.
    CoverTopCrop,
}

/// Region of the source image to draw, as fractions of its dimensions.
///
/// All values in `0.0..=1.0`. `y = 0.0, height = 0.75` keeps the top
/// three quarters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    /// Full width, top `fraction` of the height.
    pub fn top(fraction: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: fraction,
        }
    }

    /// Resolve to whole source pixels.
    ///
    /// Rounds to the nearest pixel and clamps to the source, keeping at
    /// least one pixel on each axis.
    pub fn to_pixels(&self, source: PixelSize) -> PixelRect {
        let px = |extent: u32, fraction: f64| {
            (extent as f64 * fraction.clamp(0.0, 1.0))
                .round()
                .to_u32()
                .unwrap_or(0)
        };
        PixelRect::new(
            px(source.width, self.x),
            px(source.height, self.y),
            px(source.width, self.width),
            px(source.height, self.height),
        )
        .clamp_to(source.width, source.height)
    }
}

/// How one image is drawn into one cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FitPlan {
    pub policy: FitPolicy,
    /// Size of the cell this plan was resolved against.
    pub cell: Size,
    /// Where the (possibly cropped) image is drawn, cell-relative.
    pub placement: Rect,
    /// Sub-region of the source actually drawn. `None` = whole image.
    pub crop: Option<CropRegion>,
    /// Area painted with the background before the image is drawn,
    /// cell-relative. `None` when the image covers the cell.
    ///
    /// For [`FitPolicy::Contain`] this is the whole cell, so it overlaps
    /// `placement`; the image is painted over it. For
    /// [`FitPolicy::CoverTopCrop`] it is the strip below the image and never
    /// overlaps it.
    pub fill: Option<Rect>,
}

impl FitPlan {
    pub fn needs_crop(&self) -> bool {
        self.crop.is_some()
    }

    pub fn needs_fill(&self) -> bool {
        self.fill.is_some()
    }

    /// Height covered by the image plus any fill strip directly below it.
    ///
    /// Equals the cell height for [`FitPolicy::CoverTopCrop`].
    pub fn covered_height(&self) -> f64 {
        match (self.policy, self.fill) {
            (FitPolicy::CoverTopCrop, Some(fill)) => self.placement.height + fill.height,
            _ => self.placement.height,
        }
    }
}

/// Resolve how an image with `aspect_ratio` (width / height) fits a cell.
///
/// Fails with [`LayoutError::InvalidAspectRatio`] when the ratio is not a
/// positive finite number, and with [`LayoutError::InvariantViolation`] if
/// any resulting rectangle would be empty; the latter means a degenerate
/// cell slipped past [`compute_grid`](crate::compute_grid).
pub fn resolve_fit(aspect_ratio: f64, cell: Size, policy: FitPolicy) -> Result<FitPlan, LayoutError> {
    if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
        return Err(LayoutError::InvalidAspectRatio(aspect_ratio));
    }
    if !cell.is_positive() {
        return Err(LayoutError::InvariantViolation("cell size must be positive"));
    }

    // Both policies start from the full cell width.
    let natural_height = cell.width / aspect_ratio;
    if !natural_height.is_finite() {
        return Err(LayoutError::InvalidAspectRatio(aspect_ratio));
    }

    let plan = match policy {
        FitPolicy::Contain => {
            let (w, h) = if natural_height > cell.height {
                (cell.height * aspect_ratio, cell.height)
            } else {
                (cell.width, natural_height)
            };
            let placement = Rect::new(
                anchor_offset(cell.width - w, 0.5),
                anchor_offset(cell.height - h, 0.5),
                w,
                h,
            );
            let letterboxed = cell.width - w > EPSILON || cell.height - h > EPSILON;
            FitPlan {
                policy,
                cell,
                placement,
                crop: None,
                fill: letterboxed.then(|| Rect::from_size(cell)),
            }
        }

        FitPolicy::CoverTopCrop => {
            if natural_height <= cell.height + EPSILON {
                let h = natural_height.min(cell.height);
                let gap = cell.height - h;
                FitPlan {
                    policy,
                    cell,
                    placement: Rect::new(0.0, 0.0, cell.width, h),
                    crop: None,
                    fill: (gap > EPSILON).then(|| Rect::new(0.0, h, cell.width, gap)),
                }
            } else {
                let keep = cell.height / natural_height;
                if keep.is_nan() || keep <= 0.0 {
                    return Err(LayoutError::InvariantViolation("crop keeps no source rows"));
                }
                FitPlan {
                    policy,
                    cell,
                    placement: Rect::from_size(cell),
                    crop: Some(CropRegion::top(keep)),
                    fill: None,
                }
            }
        }
    };

    if !plan.placement.is_positive() {
        return Err(LayoutError::InvariantViolation("placement must be positive"));
    }
    if plan.fill.is_some_and(|f| !f.is_positive()) {
        return Err(LayoutError::InvariantViolation("fill must be positive"));
    }
    Ok(plan)
}

/// Offset that positions content within `space` of leftover room.
/// `anchor` 0.0 = near edge, 0.5 = centered, 1.0 = far edge.
fn anchor_offset(space: f64, anchor: f64) -> f64 {
    if space <= 0.0 { 0.0 } else { space * anchor }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: Size = Size::new(64.27, 93.27);

    #[test]
    fn tall_image_is_top_cropped() {
        let plan = resolve_fit(0.5, CELL, FitPolicy::CoverTopCrop).unwrap();
        let crop = plan.crop.unwrap();
        assert!((crop.height - 93.27 / 128.54).abs() < 1e-9);
        // 93.27 / 128.54 ≈ 0.7254, rounded; the exact quotient is 0.72562.
        assert!((crop.height - 0.7254).abs() < 5e-4);
        assert_eq!((crop.x, crop.y, crop.width), (0.0, 0.0, 1.0));
        assert_eq!(plan.placement, Rect::from_size(CELL));
        assert!(plan.fill.is_none());
    }

    #[test]
    fn short_image_gets_bottom_fill() {
        let plan = resolve_fit(2.0, CELL, FitPolicy::CoverTopCrop).unwrap();
        assert!(plan.crop.is_none());
        assert_eq!(plan.placement.y, 0.0);
        assert!((plan.placement.height - 32.135).abs() < 1e-9);
        let fill = plan.fill.unwrap();
        assert!((fill.y - plan.placement.height).abs() < 1e-12);
        assert!((fill.bottom() - CELL.height).abs() < 1e-9);
        assert_eq!(fill.width, CELL.width);
        assert!(!fill.overlaps(&plan.placement, EPSILON));
    }

    #[test]
    fn exact_fit_has_no_crop_or_fill() {
        let ar = CELL.width / CELL.height;
        for policy in [FitPolicy::Contain, FitPolicy::CoverTopCrop] {
            let plan = resolve_fit(ar, CELL, policy).unwrap();
            assert!(plan.crop.is_none(), "{policy:?}");
            assert!(plan.fill.is_none(), "{policy:?}");
            assert!(plan.placement.approx_eq(&Rect::from_size(CELL), 1e-9));
        }
    }

    #[test]
    fn contain_width_limited_is_centered_vertically() {
        let plan = resolve_fit(2.0, CELL, FitPolicy::Contain).unwrap();
        assert_eq!(plan.placement.width, CELL.width);
        let expected_y = (CELL.height - CELL.width / 2.0) / 2.0;
        assert!((plan.placement.y - expected_y).abs() < 1e-9);
        assert_eq!(plan.fill, Some(Rect::from_size(CELL)));
        // Whole-cell fill sits under the image.
        assert!(plan.fill.is_some_and(|f| f.overlaps(&plan.placement, EPSILON)));
    }

    #[test]
    fn contain_height_limited_is_centered_horizontally() {
        let plan = resolve_fit(0.25, CELL, FitPolicy::Contain).unwrap();
        assert_eq!(plan.placement.height, CELL.height);
        let w = CELL.height * 0.25;
        assert!((plan.placement.width - w).abs() < 1e-9);
        assert!((plan.placement.x - (CELL.width - w) / 2.0).abs() < 1e-9);
        assert!(plan.crop.is_none());
    }

    #[test]
    fn policy_sweep() {
        let cells = [CELL, Size::new(43.35, 96.1), Size::new(100.0, 100.0), Size::new(0.5, 300.0)];
        let ratios = [0.01, 0.1, 0.33, 0.5, 0.75, 1.0, 1.5, 2.0, 10.0, 100.0];
        let mut failures = Vec::new();
        for cell in cells {
            let cell_rect = Rect::from_size(cell);
            for ar in ratios {
                let tag = format!("ar {ar} cell {}×{}", cell.width, cell.height);

                let contain = resolve_fit(ar, cell, FitPolicy::Contain).unwrap();
                if contain.crop.is_some() {
                    failures.push(format!("{tag}: Contain cropped"));
                }
                if !cell_rect.contains(&contain.placement, 1e-9) {
                    failures.push(format!("{tag}: Contain placement {:?} escapes cell", contain.placement));
                }
                let drawn_ar = contain.placement.width / contain.placement.height;
                if (drawn_ar - ar).abs() > 1e-9 * ar.max(1.0) {
                    failures.push(format!("{tag}: Contain distorted to {drawn_ar}"));
                }

                let cover = resolve_fit(ar, cell, FitPolicy::CoverTopCrop).unwrap();
                if cover.placement.width != cell.width {
                    failures.push(format!("{tag}: CoverTopCrop width {}", cover.placement.width));
                }
                if (cover.covered_height() - cell.height).abs() > 1e-9 {
                    failures.push(format!("{tag}: CoverTopCrop covers {}", cover.covered_height()));
                }
                if cover.crop.is_some() && cover.fill.is_some() {
                    failures.push(format!("{tag}: crop and fill both set"));
                }
                if cover.placement.y != 0.0 {
                    failures.push(format!("{tag}: not top-anchored"));
                }
            }
        }
        assert!(failures.is_empty(), "{}", failures.join("\n"));
    }

    #[test]
    fn invalid_aspect_ratios_rejected() {
        for ar in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            for policy in [FitPolicy::Contain, FitPolicy::CoverTopCrop] {
                let err = resolve_fit(ar, CELL, policy).unwrap_err();
                assert!(matches!(err, LayoutError::InvalidAspectRatio(_)), "{ar} {policy:?}");
            }
        }
    }

    #[test]
    fn degenerate_cell_is_an_invariant_violation() {
        let err = resolve_fit(1.0, Size::new(-3.0, 10.0), FitPolicy::Contain).unwrap_err();
        assert!(matches!(err, LayoutError::InvariantViolation(_)));
        let err = resolve_fit(1.0, Size::new(10.0, 0.0), FitPolicy::CoverTopCrop).unwrap_err();
        assert!(matches!(err, LayoutError::InvariantViolation(_)));
    }

    #[test]
    fn crop_resolves_to_pixels() {
        let crop = CropRegion::top(0.7254);
        let px = crop.to_pixels(PixelSize::new(1080, 2160));
        assert_eq!(px, PixelRect::new(0, 0, 1080, 1567));
        // Tiny fractions still keep one row.
        let px = CropRegion::top(1e-6).to_pixels(PixelSize::new(10, 10));
        assert_eq!(px.height, 1);
    }
}
