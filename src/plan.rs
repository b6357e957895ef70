//! The layout pipeline: items → grid → slots → fit plans.
//!
//! [`plan`] is the single source of truth both renderers consume. It is
//! recomputed on every render call and holds no state between calls.

use crate::error::LayoutError;
use crate::fit::{FitPlan, FitPolicy, resolve_fit};
use crate::geometry::{PixelRect, PixelSize, Rect, Size};
use crate::grid::{GridDescriptor, GuideLine, Mode, PageConstants, compute_grid};
use crate::slot::{Slot, map_item};

/// Stable identifier of an imported asset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

/// What the pipeline needs to know about one input image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub id: AssetId,
    /// Intrinsic pixel dimensions of the decoded image.
    pub size: PixelSize,
}

impl ItemRef {
    pub const fn new(id: AssetId, width: u32, height: u32) -> Self {
        Self {
            id,
            size: PixelSize::new(width, height),
        }
    }
}

/// Knobs for one planning run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlanOptions {
    /// Emit cut guides on every page.
    pub guides: bool,
    /// Fit policy for every item. `None` uses [`Mode::fit_policy`].
    pub policy: Option<FitPolicy>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            guides: true,
            policy: None,
        }
    }
}

impl PlanOptions {
    pub fn guides(mut self, guides: bool) -> Self {
        self.guides = guides;
        self
    }

    pub fn policy(mut self, policy: FitPolicy) -> Self {
        self.policy = Some(policy);
        self
    }
}

/// One image resolved into its cell, in absolute page coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedItem {
    pub slot: Slot,
    pub id: AssetId,
    pub source: PixelSize,
    /// Absolute cell rectangle.
    pub cell: Rect,
    /// Cell-relative fit resolution.
    pub fit: FitPlan,
    /// Absolute rectangle the image is drawn into.
    pub image: Rect,
    /// Absolute background rectangle painted before the image.
    pub fill: Option<Rect>,
}

impl PlacedItem {
    /// Source pixels to pre-crop before drawing, if any.
    pub fn source_crop(&self) -> Option<PixelRect> {
        self.fit
            .crop
            .map(|c| c.to_pixels(self.source))
            .filter(|r| !r.is_full(self.source))
    }
}

/// Everything drawn on one output page.
#[derive(Clone, Debug, PartialEq)]
pub struct PagePlan {
    pub index: usize,
    /// Effective page width × height.
    pub size: Size,
    /// Placed items in slot order. Skipped items leave their slot empty.
    pub items: Vec<PlacedItem>,
    /// Cut guides, empty when guides are off.
    pub guides: Vec<GuideLine>,
}

/// An item the pipeline could not place.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SkippedItem {
    pub item_index: usize,
    pub id: AssetId,
    pub error: LayoutError,
}

/// Result of planning a whole document.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentPlan {
    pub grid: GridDescriptor,
    pub policy: FitPolicy,
    pub pages: Vec<PagePlan>,
    pub skipped: Vec<SkippedItem>,
}

impl DocumentPlan {
    /// Placed items across all pages, in input order.
    pub fn items(&self) -> impl Iterator<Item = &PlacedItem> {
        self.pages.iter().flat_map(|p| p.items.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Lay out `items` in `mode`.
///
/// Grid errors fail the whole call. Items with an invalid aspect ratio are
/// recorded in [`DocumentPlan::skipped`] and the rest are still placed;
/// an [`InvariantViolation`](LayoutError::InvariantViolation) is a defect
/// and aborts.
pub fn plan(
    items: &[ItemRef],
    mode: Mode,
    constants: &PageConstants,
    options: PlanOptions,
) -> Result<DocumentPlan, LayoutError> {
    let grid = compute_grid(mode, constants)?;
    let policy = options.policy.unwrap_or(mode.fit_policy());
    let guides = if options.guides { grid.guide_lines() } else { Vec::new() };

    let mut pages: Vec<PagePlan> = (0..grid.page_count(items.len()))
        .map(|index| PagePlan {
            index,
            size: grid.page_size(),
            items: Vec::with_capacity(grid.photos_per_page()),
            guides: guides.clone(),
        })
        .collect();
    let mut skipped = Vec::new();

    for (item_index, item) in items.iter().enumerate() {
        let slot = map_item(item_index, &grid);
        let aspect_ratio = item.size.aspect_ratio().unwrap_or(0.0);
        let fit = match resolve_fit(aspect_ratio, grid.cell, policy) {
            Ok(fit) => fit,
            Err(error @ LayoutError::InvalidAspectRatio(_)) => {
                tracing::warn!(item_index, id = item.id.0, %error, "skipping item");
                skipped.push(SkippedItem {
                    item_index,
                    id: item.id,
                    error,
                });
                continue;
            }
            Err(error) => return Err(error),
        };
        let cell = slot.cell_rect(&grid);
        pages[slot.page_index].items.push(PlacedItem {
            slot,
            id: item.id,
            source: item.size,
            cell,
            fit,
            image: fit.placement.offset_by(&cell),
            fill: fit.fill.map(|f| f.offset_by(&cell)),
        });
    }

    Ok(DocumentPlan {
        grid,
        policy,
        pages,
        skipped,
    })
}
