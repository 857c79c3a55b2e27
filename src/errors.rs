//! # Error Handling
//!
//! ## Purpose
//! Centralized fatal-error type for the citation engine. Per the error
//! taxonomy, only invariant violations abort a call — pattern failures,
//! extractor parse failures, resolution misses, and annotation snap
//! failures are all recovered locally and surfaced as
//! [`crate::model::Diagnostic`] values instead, never as an `Err`.
//!
//! ## Usage
//! ```rust
//! use citelink::errors::{CitationError, Result};
//!
//! fn translate(clean_offset: usize, text_len: usize) -> Result<usize> {
//!     if clean_offset > text_len {
//!         return Err(CitationError::Internal(format!("offset {clean_offset} out of bounds")));
//!     }
//!     Ok(clean_offset)
//! }
//! ```

use crate::model::Span;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, CitationError>;

/// Fatal errors — anything here aborts the call rather than being recovered.
#[derive(Debug, Error)]
pub enum CitationError {
    /// A `TransformationMap` anchor decreased where it must be nondecreasing.
    #[error("transformation map is non-monotonic at cleaned offset {at_clean_offset}")]
    NonMonotonicTransformationMap { at_clean_offset: usize },

    /// A citation's original span falls outside the source text.
    #[error("span {span:?} falls outside text of length {text_len}")]
    SpanOutOfBounds { span: Span, text_len: usize },

    /// A short-form citation's `resolution.resolved_to` points past the end
    /// of the citation list.
    #[error("resolved_to index {index} is out of range for {citation_count} citations")]
    ResolvedToOutOfRange { index: usize, citation_count: usize },

    /// A pattern in the registry failed to compile — this can only happen
    /// if the registry itself is malformed, since every pattern is a
    /// `&'static str` checked once at startup.
    #[error("invalid pattern regex: {0}")]
    Regex(#[from] regex::Error),

    /// Serialization/deserialization of a citation list to/from JSON failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CitationError {
    /// Every variant here is, by definition, not recoverable by re-running
    /// the same pipeline on the same input — callers must fix the input,
    /// the registry, or the citation list before calling again. Mirrors the
    /// teacher's `SearchError::is_recoverable`, which reserves `true` for
    /// errors a caller could plausibly retry (network, rate limit, timeout);
    /// none of this enum's variants are that kind of error.
    pub fn is_recoverable(&self) -> bool {
        false
    }

    /// Error category for metrics and logging, in the teacher's
    /// `SearchError::category` shape.
    pub fn category(&self) -> &'static str {
        match self {
            CitationError::NonMonotonicTransformationMap { .. } | CitationError::SpanOutOfBounds { .. } | CitationError::ResolvedToOutOfRange { .. } => {
                "invariant_violation"
            }
            CitationError::Regex(_) => "pattern_registry",
            CitationError::Json(_) => "serialization",
            CitationError::Internal(_) => "internal",
        }
    }
}
