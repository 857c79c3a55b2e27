//! # Public Library Surface
//!
//! ## Purpose
//! The entry points from the original specification's §6 ("External
//! Interfaces"), wired together into the single linear pipeline described in
//! §2: `clean → tokenize → dedup → parallel detect → extract → [resolve]`.
//! `annotate` is a separate, independent entry point over an already-built
//! citation list (see [`crate::annotator`]).
//!
//! ## Key Features
//! - `extract_citations` is the common-case signature; `resolve: bool` in
//!   [`ExtractOptions`] selects between the `Citation[]` / `ResolvedCitation[]`
//!   overload the original spec describes, by simply leaving each
//!   short-form citation's `resolution` field `None` or populating it —
//!   Rust has no return-type overloading, and the corpus does not model
//!   "same struct plus one optional field" as two distinct types anywhere
//!   either.
//! - `extract_citations_with_diagnostics` is the escape hatch that surfaces
//!   the `Vec<Diagnostic>` the common-case function discards, mirroring the
//!   teacher's `search` / `search_with_params` pairing.
//! - `extract_citations_async` exists only because the original spec calls
//!   for it; it does nothing but call the synchronous pipeline inline — the
//!   pipeline has no I/O suspension points to actually exploit `async` for.
//! - Invariant violations (the one fatal error category) are checked once,
//!   here, after extraction and again after resolution, rather than scattered
//!   across every stage that could theoretically violate them.

use crate::annotator;
use crate::cleaner;
use crate::config::{PipelineConfig, ResolverConfig};
use crate::dedup;
use crate::errors::{CitationError, Result};
use crate::extract;
use crate::model::{Citation, Diagnostic};
use crate::parallel;
use crate::patterns::{Pattern, REGISTRY};
use crate::tokenizer;

pub use crate::annotator::{AnnotateMode, AnnotateOptions, AnnotationResult};

/// Options for [`extract_citations`] and its variants.
pub struct ExtractOptions {
    /// Cleaning steps, confidence weights, parallel-detector bound, and
    /// resolver scope/boundary — everything the original spec calls an
    /// Open Question and resolves by "exposing it as configuration."
    pub config: PipelineConfig,
    /// When `true`, short-form citations are resolved against their
    /// antecedents before the list is returned.
    pub resolve: bool,
    /// Overrides [`crate::patterns::REGISTRY`]. `None` uses the default.
    pub patterns: Option<&'static [Pattern]>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { config: PipelineConfig::default(), resolve: false, patterns: None }
    }
}

/// Runs the cleaner → tokenizer → dedup → parallel-detect → extractor
/// pipeline, optionally followed by resolution, and discards diagnostics.
/// Use [`extract_citations_with_diagnostics`] to see what was dropped.
pub fn extract_citations(text: &str, options: &ExtractOptions) -> Vec<Citation> {
    extract_citations_with_diagnostics(text, options).0
}

/// Same as [`extract_citations`] but also returns every [`Diagnostic`]
/// recorded by a recoverable failure (§7 of the original spec: pattern
/// execution failures, extractor parse failures, resolution misses).
pub fn extract_citations_with_diagnostics(text: &str, options: &ExtractOptions) -> (Vec<Citation>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();

    let steps = options.config.clean_steps();
    let (cleaned_text, map) = cleaner::clean(text, &steps);

    let patterns: &[Pattern] = options.patterns.unwrap_or(&REGISTRY);
    let tokens = tokenizer::tokenize(&cleaned_text, patterns, &mut diagnostics);
    let tokens = dedup::dedup(tokens, &cleaned_text);

    let groups = parallel::detect_groups(&tokens, &cleaned_text, &options.config.parallel_detector);
    let mut citations = extract::extract_all(&tokens, &cleaned_text, &map, &options.config, &mut diagnostics);
    parallel::apply_groups(&mut citations, &groups);

    validate_invariants(&citations, text.len()).unwrap_or_else(|e| panic!("{e}"));

    if options.resolve {
        citations = crate::resolver::resolve(citations, text, &options.config.resolver, &mut diagnostics);
        validate_resolution_invariants(&citations).unwrap_or_else(|e| panic!("{e}"));
    }

    (citations, diagnostics)
}

/// Identical contract to [`extract_citations`]. The pipeline is
/// single-threaded and synchronous end-to-end (§5 of the original spec);
/// this wraps it for callers in an async context without introducing any
/// interleaving between documents.
pub async fn extract_citations_async(text: &str, options: &ExtractOptions) -> Vec<Citation> {
    extract_citations(text, options)
}

/// Resolves an already-extracted citation list against `text`, the original
/// source those citations' offsets are measured against.
pub fn resolve_citations(citations: Vec<Citation>, text: &str, options: &ResolverConfig) -> Vec<Citation> {
    let mut diagnostics = Vec::new();
    let resolved = crate::resolver::resolve(citations, text, options, &mut diagnostics);
    validate_resolution_invariants(&resolved).unwrap_or_else(|e| panic!("{e}"));
    resolved
}

/// Re-emits `text` with `citations` wrapped per `options`. See
/// [`crate::annotator`] for the snapping and escaping rules.
pub fn annotate(text: &str, citations: &[Citation], options: AnnotateOptions) -> AnnotationResult {
    annotator::annotate(text, citations, options)
}

/// Serializes a citation list to pretty-printed JSON, the shape an embedding
/// application would log or hand to a frontend.
pub fn citations_to_json(citations: &[Citation]) -> Result<String> {
    Ok(serde_json::to_string_pretty(citations)?)
}

/// Deserializes a citation list previously produced by [`citations_to_json`].
pub fn citations_from_json(json: &str) -> Result<Vec<Citation>> {
    Ok(serde_json::from_str(json)?)
}

/// `InvariantViolation`: a citation's original span exceeds the source
/// text's length. Anything else in the error taxonomy is recovered locally
/// as a `Diagnostic` and never reaches this check.
fn validate_invariants(citations: &[Citation], text_len: usize) -> Result<()> {
    for citation in citations {
        let span = citation.common().span;
        if span.original_start > span.original_end || span.original_end > text_len {
            return Err(CitationError::SpanOutOfBounds { span, text_len });
        }
    }
    Ok(())
}

/// `InvariantViolation`: a short-form citation's `resolution.resolved_to`
/// points past the citation list, or at itself/something that follows it.
fn validate_resolution_invariants(citations: &[Citation]) -> Result<()> {
    for (index, citation) in citations.iter().enumerate() {
        if let Some(resolution) = citation.resolution() {
            if resolution.resolved_to >= citations.len() || resolution.resolved_to >= index {
                return Err(CitationError::ResolvedToOutOfRange { index: resolution.resolved_to, citation_count: citations.len() });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_seed_scenario_case_citation() {
        let text = "See Smith v. Doe, 500 F.2d 123 (9th Cir. 2020).";
        let citations = extract_citations(text, &ExtractOptions::default());
        assert_eq!(citations.len(), 1);
        match &citations[0] {
            Citation::Case(c) => {
                assert_eq!(c.page, "123");
                assert_eq!(c.year, Some(2020));
                assert_eq!(&text[c.common.span.original_start..c.common.span.original_end], "500 F.2d 123");
            }
            other => panic!("expected case citation, got {other:?}"),
        }
    }

    #[test]
    fn citations_are_returned_in_ascending_original_start_order() {
        let text = "42 U.S.C. \u{a7} 1983. See Smith v. Doe, 500 F.2d 123 (9th Cir. 2020).";
        let citations = extract_citations(text, &ExtractOptions::default());
        assert!(citations.windows(2).all(|w| w[0].original_start() <= w[1].original_start()));
    }

    #[test]
    fn resolve_true_links_id_to_antecedent() {
        let text = "Smith v. Jones, 500 F.2d 100 (1974). Id. at 105.";
        let options = ExtractOptions { resolve: true, ..ExtractOptions::default() };
        let citations = extract_citations(text, &options);
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[1].resolution().unwrap().resolved_to, 0);
    }

    #[test]
    fn resolve_false_leaves_short_form_unresolved() {
        let text = "Smith v. Jones, 500 F.2d 100 (1974). Id. at 105.";
        let citations = extract_citations(text, &ExtractOptions::default());
        assert!(citations[1].resolution().is_none());
    }

    #[tokio::test]
    async fn async_facade_matches_sync_result() {
        let text = "42 U.S.C. \u{a7} 1983";
        let sync_result = extract_citations(text, &ExtractOptions::default());
        let async_result = extract_citations_async(text, &ExtractOptions::default()).await;
        assert_eq!(sync_result.len(), async_result.len());
    }

    #[test]
    fn citations_round_trip_through_json() {
        let text = "See Smith v. Doe, 500 F.2d 123 (9th Cir. 2020).";
        let citations = extract_citations(text, &ExtractOptions::default());
        let json = citations_to_json(&citations).unwrap();
        let restored = citations_from_json(&json).unwrap();
        assert_eq!(restored.len(), citations.len());
        assert_eq!(restored[0].original_start(), citations[0].original_start());
    }

    #[test]
    fn identity_template_annotation_is_idempotent() {
        let text = "Smith v. Doe, 500 F.2d 123 (9th Cir. 2020).";
        let citations = extract_citations(text, &ExtractOptions::default());
        let options = AnnotateOptions {
            auto_escape: false,
            mode: AnnotateMode::Template { before: String::new(), after: String::new() },
            ..AnnotateOptions::default()
        };
        let result = annotate(text, &citations, options);
        assert_eq!(result.text, text);
    }
}
