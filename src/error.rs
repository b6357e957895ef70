//! Error types.

use crate::grid::Mode;

/// Layout and fit computation error.
///
/// Layout errors are reported once per grid computation. Fit errors are
/// per item; the planning pipeline isolates [`InvalidAspectRatio`] so one
/// malformed image never aborts a document.
///
/// [`InvalidAspectRatio`]: LayoutError::InvalidAspectRatio
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Margin and spacing leave no positive cell for the requested mode.
    #[error("{mode:?} leaves a degenerate {cell_width}×{cell_height} cell")]
    DegenerateLayout {
        mode: Mode,
        cell_width: f64,
        cell_height: f64,
    },
    /// Image aspect ratio is zero, negative, or not finite.
    #[error("invalid image aspect ratio {0}")]
    InvalidAspectRatio(f64),
    /// A computed rectangle came out empty or non-finite.
    ///
    /// Indicates a defect: a degenerate input got past the checks above.
    #[error("layout invariant violated: {0}")]
    InvariantViolation(&'static str),
}

/// Session mutation error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session already holds the maximum number of assets.
    #[error("session is full ({max} files)")]
    LimitReached { max: usize },
    /// No asset at the requested position.
    #[error("index {index} out of range for {len} assets")]
    IndexOutOfRange { index: usize, len: usize },
    /// The batch contained no files.
    #[error("no files to import")]
    EmptyBatch,
}

/// Failure reported by the external decoder for one file.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("failed to decode {name}: {message}")]
pub struct DecodeError {
    pub name: String,
    pub message: String,
}

impl DecodeError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}
