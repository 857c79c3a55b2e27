//! # Configuration
//!
//! ## Purpose
//! Typed, `serde`-backed configuration for every tunable the original
//! specification calls out as an Open Question: confidence-scoring weights,
//! the parallel-detector proximity bound, the resolver's scope strategy and
//! boundary regex, and the annotator's escaping default. Loaded from TOML
//! with environment-variable overrides, following the same precedence order
//! as the teacher crate (CLI > env > file > defaults), minus the CLI layer
//! this crate has no binary to parse.
//!
//! ## Usage
//! ```rust
//! use citelink::config::PipelineConfig;
//!
//! let config = PipelineConfig::default();
//! assert_eq!(config.confidence.baseline, 0.4);
//! ```

use crate::errors::{CitationError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One step of the Cleaner's normalization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleanStep {
    StripHtml,
    CollapseWhitespace,
    NormalizeSectionSigns,
    NormalizeQuotes,
}

impl CleanStep {
    /// The default cleaning pipeline: every step, in the order the Cleaner
    /// must apply them (HTML stripping first, so later steps never see
    /// markup; whitespace collapse last, so it coalesces whatever stripping
    /// and normalization left behind).
    pub fn all() -> Vec<CleanStep> {
        vec![
            CleanStep::StripHtml,
            CleanStep::NormalizeSectionSigns,
            CleanStep::NormalizeQuotes,
            CleanStep::CollapseWhitespace,
        ]
    }
}

/// Incremental confidence weights for the case extractor. Exposed as
/// configuration per the original spec's Open Question — "the exact weights
/// are not specified by any external standard."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub baseline: f32,
    pub known_reporter: f32,
    pub caption_found: f32,
    pub year_found: f32,
    pub court_found: f32,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            baseline: 0.4,
            known_reporter: 0.3,
            caption_found: 0.2,
            year_found: 0.1,
            court_found: 0.1,
        }
    }
}

/// Tunables for the Parallel Detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelDetectorConfig {
    /// Maximum characters of comma/whitespace allowed between a candidate
    /// primary and its secondary. An empirical constant per the original
    /// spec's Open Question.
    pub comma_proximity_chars: usize,
}

impl Default for ParallelDetectorConfig {
    fn default() -> Self {
        Self { comma_proximity_chars: 5 }
    }
}

/// Scope strategy for short-form resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeStrategy {
    /// Document-wide: any earlier citation is a valid antecedent.
    None,
    /// Boundary is a blank line (`/\n\s*\n/`). The default.
    Paragraph,
    /// Boundary is caller-supplied via `boundary_regex`.
    Section,
    /// Boundary is caller-supplied via `boundary_regex`; intended for
    /// footnote-delimited documents.
    Footnote,
}

impl Default for ScopeStrategy {
    fn default() -> Self {
        ScopeStrategy::Paragraph
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub scope: ScopeStrategy,
    /// Overrides the default paragraph-boundary regex. Required (and used)
    /// for `Section` and `Footnote` scope; ignored for `None` and optional
    /// for `Paragraph`.
    pub boundary_regex: Option<String>,
    /// Maximum Levenshtein distance for fuzzy `supra` antecedent matching.
    pub supra_max_distance: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            scope: ScopeStrategy::default(),
            boundary_regex: None,
            supra_max_distance: 2,
        }
    }
}

/// Annotator defaults, overridable per-call via `AnnotateOptions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotateDefaults {
    pub auto_escape: bool,
    pub use_clean_text: bool,
}

impl Default for AnnotateDefaults {
    fn default() -> Self {
        Self {
            auto_escape: true,
            use_clean_text: false,
        }
    }
}

/// Logging configuration, in the teacher's shape (level + optional JSON
/// formatting). Consumed by [`crate::logging::init_tracing`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub clean_steps: Option<Vec<CleanStep>>,
    pub confidence: ConfidenceWeights,
    pub parallel_detector: ParallelDetectorConfig,
    pub resolver: ResolverConfig,
    pub annotate: AnnotateDefaults,
    pub logging: LoggingConfig,
}

impl PipelineConfig {
    /// Resolves the configured clean steps, defaulting to [`CleanStep::all`]
    /// when unset (as opposed to an empty list, which must be requested
    /// explicitly to get raw-text identity cleaning).
    pub fn clean_steps(&self) -> Vec<CleanStep> {
        self.clean_steps.clone().unwrap_or_else(CleanStep::all)
    }

    /// Loads configuration from a TOML file, falling back to defaults if the
    /// file does not exist (matching the teacher's `Config::from_file`).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("configuration file not found: {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CitationError::Internal(format!("failed to read config file {path:?}: {e}")))?;

        let mut config: PipelineConfig = toml::from_str(&content)
            .map_err(|e| CitationError::Internal(format!("failed to parse config file {path:?}: {e}")))?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("CITELINK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(distance) = std::env::var("CITELINK_SUPRA_MAX_DISTANCE") {
            if let Ok(parsed) = distance.parse() {
                self.resolver.supra_max_distance = parsed;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.confidence.baseline < 0.0 || self.confidence.baseline > 1.0 {
            return Err(CitationError::Internal("confidence.baseline must be in [0, 1]".into()));
        }
        if self.parallel_detector.comma_proximity_chars == 0 {
            return Err(CitationError::Internal(
                "parallel_detector.comma_proximity_chars must be greater than zero".into(),
            ));
        }
        if matches!(self.resolver.scope, ScopeStrategy::Section | ScopeStrategy::Footnote)
            && self.resolver.boundary_regex.is_none()
        {
            return Err(CitationError::Internal(
                "resolver.boundary_regex is required for section/footnote scope".into(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CitationError::Internal(format!("failed to serialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_literals() {
        let config = PipelineConfig::default();
        assert_eq!(config.confidence.baseline, 0.4);
        assert_eq!(config.confidence.known_reporter, 0.3);
        assert_eq!(config.parallel_detector.comma_proximity_chars, 5);
        assert_eq!(config.resolver.scope, ScopeStrategy::Paragraph);
        assert!(config.annotate.auto_escape);
    }

    #[test]
    fn clean_steps_default_to_all_when_unset() {
        let config = PipelineConfig::default();
        assert_eq!(config.clean_steps(), CleanStep::all());
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = PipelineConfig::from_file("/nonexistent/path/citelink.toml").unwrap();
        assert_eq!(config.confidence.baseline, 0.4);
    }

    #[test]
    fn validate_rejects_section_scope_without_boundary_regex() {
        let mut config = PipelineConfig::default();
        config.resolver.scope = ScopeStrategy::Section;
        assert!(config.validate().is_err());
    }
}
