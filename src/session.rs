//! Import session: the ordered asset list the layout pipeline consumes.
//!
//! A [`Session`] is an explicit value. It changes only through
//! [`add_assets`](Session::add_assets) (append), [`remove_asset`](Session::remove_asset)
//! (splice) and [`reset`](Session::reset) (clear); the current mode and the
//! guide toggle ride along with it. Decoding is delegated to a [`Decoder`]
//! supplied by the host.

use std::ops::ControlFlow;
use std::sync::Arc;

use crate::config::LayoutConfig;
use crate::dedup::{DuplicateIndex, FileMeta};
use crate::document::Bitmap;
use crate::error::{DecodeError, LayoutError, SessionError};
use crate::fit::FitPolicy;
use crate::geometry::PixelSize;
use crate::grid::Mode;
use crate::plan::{AssetId, DocumentPlan, ItemRef, PlanOptions, plan};

/// A file handed over by the host, before decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFile {
    pub meta: FileMeta,
    pub content: Arc<[u8]>,
}

impl RawFile {
    /// Build from a name, modification time and content. The size is taken
    /// from the content.
    pub fn new(name: impl Into<String>, modified_ms: Option<u64>, content: impl Into<Arc<[u8]>>) -> Self {
        let content = content.into();
        Self {
            meta: FileMeta::new(name, content.len() as u64, modified_ms),
            content,
        }
    }
}

/// Turns a raw file into a bitmap. Implemented for matching closures.
pub trait Decoder<P> {
    fn decode(&mut self, file: &RawFile) -> Result<P, DecodeError>;
}

impl<P, F> Decoder<P> for F
where
    F: FnMut(&RawFile) -> Result<P, DecodeError>,
{
    fn decode(&mut self, file: &RawFile) -> Result<P, DecodeError> {
        self(file)
    }
}

/// A decoded image owned by the session.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageAsset<P> {
    pub id: AssetId,
    /// Intrinsic dimensions, fixed at decode time.
    pub size: PixelSize,
    pub pixels: P,
}

impl<P> ImageAsset<P> {
    pub fn item_ref(&self) -> ItemRef {
        ItemRef {
            id: self.id,
            size: self.size,
        }
    }
}

/// Progress of an import batch, reported after every file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImportProgress {
    /// Files handled so far, including skipped and failed ones.
    pub done: usize,
    pub total: usize,
}

/// Outcome of one import batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportReport {
    pub added: Vec<AssetId>,
    pub skipped_duplicates: Vec<FileMeta>,
    pub failed: Vec<DecodeError>,
    /// Files dropped because the session limit was reached.
    pub truncated: usize,
    /// The progress callback stopped the batch early.
    pub cancelled: bool,
}

/// Ordered assets plus the current layout selection.
#[derive(Debug)]
pub struct Session<P> {
    config: LayoutConfig,
    assets: Vec<ImageAsset<P>>,
    files: Vec<FileMeta>,
    index: DuplicateIndex,
    mode: Mode,
    guides: bool,
    next_id: u64,
}

impl<P: Bitmap> Session<P> {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            mode: config.default_mode,
            config,
            assets: Vec::new(),
            files: Vec::new(),
            index: DuplicateIndex::new(),
            guides: true,
            next_id: 0,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn assets(&self) -> &[ImageAsset<P>] {
        &self.assets
    }

    /// Metadata of the originating files, parallel to [`assets`](Self::assets).
    pub fn files(&self) -> &[FileMeta] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, id: AssetId) -> Option<&ImageAsset<P>> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Pixels of the asset with `id`, for the document adapter's lookup.
    pub fn bitmap(&self, id: AssetId) -> Option<&P> {
        self.get(id).map(|a| &a.pixels)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(?mode, "mode changed");
            self.mode = mode;
        }
    }

    /// Fit policy for the current mode.
    pub fn policy(&self) -> FitPolicy {
        self.mode.fit_policy()
    }

    pub fn guides(&self) -> bool {
        self.guides
    }

    pub fn set_guides(&mut self, on: bool) {
        self.guides = on;
    }

    /// Flip the guide toggle and return the new state.
    pub fn toggle_guides(&mut self) -> bool {
        self.guides = !self.guides;
        self.guides
    }

    /// Import a batch of files. See [`add_assets_with`](Self::add_assets_with).
    pub fn add_assets<D: Decoder<P>>(
        &mut self,
        files: Vec<RawFile>,
        decoder: &mut D,
    ) -> Result<ImportReport, SessionError> {
        self.add_assets_with(files, decoder, |_| ControlFlow::Continue(()))
    }

    /// Import a batch of files, appending the decoded ones in input order.
    ///
    /// Duplicates (of the session or of earlier files in the batch) are
    /// skipped before decoding. Decode failures are reported per file and do
    /// not stop the batch. Files beyond the session limit are dropped.
    /// `on_progress` runs after every file; returning `Break` stops the batch
    /// there, keeping what was already added.
    ///
    /// The session stays mutably borrowed until the batch ends, so a second
    /// import cannot start meanwhile. `on_progress` is the in-flight signal:
    /// a host that shows a busy state sets it on the first call and clears
    /// it when this returns.
    pub fn add_assets_with<D, F>(
        &mut self,
        mut files: Vec<RawFile>,
        decoder: &mut D,
        mut on_progress: F,
    ) -> Result<ImportReport, SessionError>
    where
        D: Decoder<P>,
        F: FnMut(ImportProgress) -> ControlFlow<()>,
    {
        if files.is_empty() {
            return Err(SessionError::EmptyBatch);
        }
        let max = self.config.max_files;
        let remaining = max.saturating_sub(self.assets.len());
        if remaining == 0 {
            return Err(SessionError::LimitReached { max });
        }

        let mut report = ImportReport::default();
        if files.len() > remaining {
            report.truncated = files.len() - remaining;
            tracing::warn!(max, dropped = report.truncated, "file limit reached, truncating batch");
            files.truncate(remaining);
        }

        let total = files.len();
        tracing::info!(total, existing = self.assets.len(), "import started");

        for (i, file) in files.into_iter().enumerate() {
            if self.index.is_duplicate(&file.meta, &file.content) {
                tracing::debug!(name = %file.meta.name, "duplicate skipped");
                report.skipped_duplicates.push(file.meta);
            } else {
                match decoder.decode(&file) {
                    Ok(pixels) => {
                        let id = AssetId(self.next_id);
                        self.next_id += 1;
                        self.assets.push(ImageAsset {
                            id,
                            size: pixels.dimensions(),
                            pixels,
                        });
                        self.files.push(file.meta.clone());
                        self.index.push(file.meta, file.content);
                        report.added.push(id);
                    }
                    Err(error) => {
                        tracing::warn!(%error, "decode failed");
                        report.failed.push(error);
                    }
                }
            }

            let progress = ImportProgress { done: i + 1, total };
            if on_progress(progress).is_break() && i + 1 < total {
                report.cancelled = true;
                break;
            }
        }

        tracing::info!(
            added = report.added.len(),
            duplicates = report.skipped_duplicates.len(),
            failed = report.failed.len(),
            cancelled = report.cancelled,
            "import finished"
        );
        Ok(report)
    }

    /// Remove and return the asset at `index`.
    pub fn remove_asset(&mut self, index: usize) -> Result<ImageAsset<P>, SessionError> {
        let len = self.assets.len();
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        self.files.remove(index);
        self.index.remove(index);
        Ok(self.assets.remove(index))
    }

    /// Drop every asset and restore the default mode and guide toggle.
    pub fn reset(&mut self) {
        self.assets.clear();
        self.files.clear();
        self.index.clear();
        self.mode = self.config.default_mode;
        self.guides = true;
    }

    /// Layout inputs in session order.
    pub fn items(&self) -> Vec<ItemRef> {
        self.assets.iter().map(ImageAsset::item_ref).collect()
    }

    /// Plan the current assets with the current mode and guide toggle.
    pub fn plan(&self) -> Result<DocumentPlan, LayoutError> {
        plan(
            &self.items(),
            self.mode,
            &self.config.constants,
            PlanOptions::default().guides(self.guides),
        )
    }
}
