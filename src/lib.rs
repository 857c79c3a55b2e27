//! # Citelink — Legal Citation Extraction & Resolution Engine
//!
//! ## Overview
//! Extracts, classifies, and cross-links legal citations found in
//! free-form English text (judicial opinions, law review articles,
//! briefs). Given a document, it produces a structured, ordered list of
//! citation records with byte-accurate spans into both the original and a
//! normalized ("cleaned") view of the text, semantic metadata (volume,
//! reporter, page, year, parties, pincites), short-form resolution (`Id.`,
//! `supra`, short-form case cites linked to antecedents), and
//! parallel-reporter grouping. It also offers an annotation service that
//! re-emits a document with user-supplied markup around each citation.
//!
//! ## Architecture
//! The pipeline is a linear, synchronous transformation with a single
//! optional post-pass (resolution):
//!
//! `raw → [cleaner] → (cleaned, map) → [tokenizer] → tokens → [dedup] →
//! [parallel] → [extract] → Citation[] → [resolver]? → ResolvedCitation[]`
//!
//! - `cleaner`: HTML stripping, whitespace collapsing, Unicode
//!   normalization, with a bidirectional position map back to the original.
//! - `patterns`: the classified regex pattern registry.
//! - `tokenizer`: runs every pattern over the cleaned text.
//! - `dedup`: collapses exact and overlapping duplicate tokens.
//! - `parallel`: detects comma-separated parallel-citation chains.
//! - `extract`: one extractor per citation type.
//! - `resolver`: links short-form citations to antecedents.
//! - `annotator`: re-emits the document with citations wrapped.
//! - `reporters`: the reporters/journals/courts lookup contract (§6).
//! - `model`: the shared data model (`Span`, `Citation`, `Token`, ...).
//! - `config`: typed, `serde`-backed configuration for every tunable.
//! - `errors`: the fatal `CitationError` hierarchy.
//! - `logging`: `tracing-subscriber` setup for embedding applications.
//! - `api`: the public library surface (`extract_citations`, `annotate`, ...).
//!
//! ## Usage
//! ```rust
//! use citelink::{extract_citations, ExtractOptions};
//!
//! let text = "See Smith v. Doe, 500 F.2d 123 (9th Cir. 2020).";
//! let citations = extract_citations(text, &ExtractOptions::default());
//! assert_eq!(citations.len(), 1);
//! ```

pub mod annotator;
pub mod api;
pub mod cleaner;
pub mod config;
pub mod dedup;
pub mod errors;
pub mod extract;
pub mod logging;
pub mod model;
pub mod parallel;
pub mod patterns;
pub mod reporters;
pub mod resolver;
pub mod tokenizer;

pub use api::{
    annotate, citations_from_json, citations_to_json, extract_citations, extract_citations_async,
    extract_citations_with_diagnostics, resolve_citations, AnnotateMode, AnnotateOptions, AnnotationResult, ExtractOptions,
};
pub use cleaner::clean;
pub use config::{CleanStep, PipelineConfig};
pub use errors::{CitationError, Result};
pub use model::{Citation, CitationType, Diagnostic, Span, Token, TransformationMap};
pub use tokenizer::tokenize;
