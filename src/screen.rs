//! Screen adapter: page-relative percentage boxes for an on-screen preview.
//!
//! Every physical rectangle from the [`DocumentPlan`] becomes a
//! [`PercentRect`] relative to its page (`percent = offset / page * 100`),
//! so the preview scales with whatever box the host gives each page.

use core::fmt::Write as _;

use crate::fit::CropRegion;
use crate::geometry::{Orientation, Point, Rect, Size};
use crate::grid::GuideAxis;
use crate::plan::{AssetId, DocumentPlan, PlacedItem};

/// Rectangle in percent of the page width (`left`, `width`) and page
/// height (`top`, `height`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PercentRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PercentRect {
    pub fn from_physical(rect: &Rect, page: Size) -> Self {
        Self {
            left: rect.x / page.width * 100.0,
            top: rect.y / page.height * 100.0,
            width: rect.width / page.width * 100.0,
            height: rect.height / page.height * 100.0,
        }
    }

    /// Convert back to physical units on a page of the given size.
    pub fn to_physical(&self, page: Size) -> Rect {
        Rect::new(
            self.left / 100.0 * page.width,
            self.top / 100.0 * page.height,
            self.width / 100.0 * page.width,
            self.height / 100.0 * page.height,
        )
    }

    /// Absolute-positioning declarations, e.g. `left:2.04%;top:1.45%;...`.
    pub fn to_css(&self) -> String {
        let mut css = String::with_capacity(64);
        let _ = write!(
            css,
            "left:{:.4}%;top:{:.4}%;width:{:.4}%;height:{:.4}%;",
            self.left, self.top, self.width, self.height
        );
        css
    }
}

/// Point in percent of the page width and height.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    pub fn from_physical(point: Point, page: Size) -> Self {
        Self {
            x: point.x / page.width * 100.0,
            y: point.y / page.height * 100.0,
        }
    }

    pub fn to_physical(&self, page: Size) -> Point {
        Point::new(self.x / 100.0 * page.width, self.y / 100.0 * page.height)
    }
}

/// The `<img>` of a preview slot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImageNode {
    pub id: AssetId,
    /// Where the visible part of the image is drawn, page-relative.
    pub rect: PercentRect,
    /// Visible part of the source. `None` = whole image.
    pub crop: Option<CropRegion>,
}

impl ImageNode {
    /// Inline style reproducing the placement with CSS object fitting.
    ///
    /// A cropped image keeps its full width and shows its top rows, which
    /// is what `object-fit: cover` with a top anchor does for a box that
    /// already has the cropped aspect ratio.
    pub fn to_css(&self) -> String {
        let mut css = self.rect.to_css();
        match self.crop {
            Some(_) => css.push_str("object-fit:cover;object-position:top center;"),
            None => css.push_str("object-fit:fill;"),
        }
        css
    }
}

/// One filled cell of the preview.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenSlot {
    pub item_index: usize,
    /// The whole cell, page-relative.
    pub slot_rect: PercentRect,
    pub image: ImageNode,
    /// Background area painted under the image, page-relative.
    pub fill: Option<PercentRect>,
}

/// A guide line in page percentages.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenGuide {
    pub axis: GuideAxis,
    pub from: PercentPoint,
    pub to: PercentPoint,
}

/// One preview page.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenPage {
    pub index: usize,
    pub orientation: Orientation,
    /// Physical page size the percentages refer to.
    pub size: Size,
    pub slots: Vec<ScreenSlot>,
    pub guides: Vec<ScreenGuide>,
}

impl ScreenPage {
    /// Width / height, for sizing the page box.
    pub fn aspect_ratio(&self) -> f64 {
        self.size.aspect_ratio()
    }
}

/// Map a document plan to preview pages.
pub fn render_screen(plan: &DocumentPlan) -> Vec<ScreenPage> {
    let orientation = plan.grid.page.orientation;
    plan.pages
        .iter()
        .map(|page| ScreenPage {
            index: page.index,
            orientation,
            size: page.size,
            slots: page.items.iter().map(|item| screen_slot(item, page.size)).collect(),
            guides: page
                .guides
                .iter()
                .map(|g| ScreenGuide {
                    axis: g.axis,
                    from: PercentPoint::from_physical(g.from, page.size),
                    to: PercentPoint::from_physical(g.to, page.size),
                })
                .collect(),
        })
        .collect()
}

fn screen_slot(item: &PlacedItem, page: Size) -> ScreenSlot {
    ScreenSlot {
        item_index: item.slot.item_index,
        slot_rect: PercentRect::from_physical(&item.cell, page),
        image: ImageNode {
            id: item.id,
            rect: PercentRect::from_physical(&item.image, page),
            crop: item.fit.crop,
        },
        fill: item.fill.map(|f| PercentRect::from_physical(&f, page)),
    }
}
