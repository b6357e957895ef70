//! N-up page layout for printing many images per sheet.
//!
//! Pure geometry at the core: a tiling [`Mode`] and the deployment's
//! [`PageConstants`] give a grid, every item maps to a slot, and a
//! [`FitPolicy`] resolves how its image sits in the cell. Two adapters
//! consume the same [`DocumentPlan`], so the preview and the printed
//! document agree to the last fraction of a millimeter.
//!
//! # Modules
//!
//! - [`grid`]: Modes, page constants, cell geometry and cut guides
//! - [`slot`]: Item index → page/row/column
//! - [`fit`]: Contain and top-anchored cover-crop fitting
//! - [`plan`](mod@plan): The combined per-document layout both adapters render
//! - [`screen`]: Page-relative percentage boxes for an on-screen preview
//! - [`document`]: Draw commands for a document writer, with pre-cropping
//! - [`session`]: Import pipeline: limits, dedup, decoding, mode state
//! - [`svg`]: SVG preview (feature `svg`)
//!
//! # Example
//!
//! ```
//! use nuplayout::{AssetId, ItemRef, Mode, PageConstants, PlanOptions, plan};
//!
//! let items: Vec<ItemRef> = (0..10).map(|i| ItemRef::new(AssetId(i), 1080, 2400)).collect();
//! let doc = plan(&items, Mode::Nine, &PageConstants::a4(), PlanOptions::default()).unwrap();
//! assert_eq!(doc.pages.len(), 2);
//! assert!(doc.pages[0].items[0].fit.needs_crop());
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod grid;
pub mod plan;
pub mod screen;
pub mod session;
pub mod slot;
#[cfg(feature = "svg")]
pub mod svg;

pub use config::{DEFAULT_MAX_FILES, LayoutConfig};
pub use dedup::FileMeta;
pub use document::{
    Bitmap, CommandRecorder, DocumentStyle, DocumentWriter, DrawCommand, GuideStyle, RenderSummary,
    render_document,
};
pub use error::{DecodeError, LayoutError, SessionError};
pub use fit::{CropRegion, FitPlan, FitPolicy, resolve_fit};
pub use geometry::{CanvasColor, Orientation, PageSpec, PixelRect, PixelSize, Point, Rect, Size};
pub use grid::{GridDescriptor, GuideAxis, GuideLine, Mode, PageConstants, compute_grid};
pub use plan::{AssetId, DocumentPlan, ItemRef, PagePlan, PlacedItem, PlanOptions, SkippedItem, plan};
pub use screen::{PercentRect, ScreenPage, render_screen};
pub use session::{Decoder, ImageAsset, ImportProgress, ImportReport, RawFile, Session};
pub use slot::{Slot, map_item};
