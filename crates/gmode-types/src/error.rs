// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all g-mode kernel failures.
#[derive(Error, Debug)]
pub enum GmodeError {
    /// Fewer theoretical periods than observed periods in a segment.
    #[error(
        "insufficient theory: {theoretical} theoretical periods for {observed} observed periods"
    )]
    InsufficientTheory { theoretical: usize, observed: usize },

    /// Observable kind is neither period nor frequency.
    #[error("invalid observable: {0:?} (expected \"period\" or \"frequency\")")]
    InvalidObservable(String),

    /// Anchor-based matching needs exactly one anchor per observed segment.
    #[error(
        "inconsistent segment count: {anchors} highest-amplitude anchors for {segments} observed segments"
    )]
    InconsistentSegmentCount { anchors: usize, segments: usize },

    /// Anchor value does not occur among the observed values of its segment.
    #[error("anchor {0} is not one of the observed values of its segment")]
    AnchorNotObserved(f64),

    /// Invalid input sequence (spectrum, segment, merit table row).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Malformed grid, observation or merit table.
    #[error("table error: {0}")]
    Table(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Numerical error (NaN/Inf or vanishing normalisation).
    #[error("numerical error: {0}")]
    Numerical(String),
}

impl GmodeError {
    /// Whether the error stops the whole run rather than a single model.
    ///
    /// Configuration and file-level failures are fatal. Failures tied to
    /// one model's data are isolated by the orchestrator.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GmodeError::InvalidObservable(_)
                | GmodeError::InconsistentSegmentCount { .. }
                | GmodeError::Config(_)
                | GmodeError::Table(_)
                | GmodeError::Io(_)
        )
    }
}

pub type GmodeResult<T> = Result<T, GmodeError>;
