//! Flat item index → page, row and column.
//!
//! Slots fill row-major (left to right, top to bottom) and pages fill in
//! input order with no gaps. Both renderers go through [`map_item`], so the
//! same item always lands in the same cell.

use crate::geometry::Rect;
use crate::grid::GridDescriptor;

/// One cell on one page.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Position in the flat input sequence.
    pub item_index: usize,
    pub page_index: usize,
    /// Position within the page, `0..photos_per_page`.
    pub slot_index: usize,
    pub row: usize,
    pub column: usize,
}

impl Slot {
    /// Absolute rectangle of this slot's cell on its page.
    pub fn cell_rect(&self, grid: &GridDescriptor) -> Rect {
        grid.cell_rect(self.row, self.column)
    }
}

/// Map a flat item index to its slot.
pub fn map_item(item_index: usize, grid: &GridDescriptor) -> Slot {
    let per_page = grid.photos_per_page();
    let slot_index = item_index % per_page;
    Slot {
        item_index,
        page_index: item_index / per_page,
        slot_index,
        row: slot_index / grid.columns,
        column: slot_index % grid.columns,
    }
}

/// Number of pages needed for `items` items.
pub fn page_count(items: usize, grid: &GridDescriptor) -> usize {
    grid.page_count(items)
}
