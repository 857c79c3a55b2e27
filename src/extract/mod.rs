//! # Extractors
//!
//! ## Purpose
//! One extractor per full citation type, plus one for the three short-form
//! markers. Each takes a [`Token`] and the [`TransformationMap`] that
//! produced the text it was found in, and returns a fully-populated
//! [`Citation`] with both clean and original offsets. A token that cannot be
//! parsed into its required fields is dropped — not fatal for the document,
//! only for that token — and a [`Diagnostic`] is recorded.
//!
//! ## Key Features
//! - A shared `volume name page` regex covers every "number, name, number"
//!   full-citation shape (case reporters, journals, Statutes at Large, the
//!   Federal Register) so each submodule only has to interpret the pieces
//!   its type cares about.
//! - Party-name normalization (corporate suffixes, `d/b/a`/`a/k/a`/`f/k/a`
//!   tails, leading articles) lives here once and is shared by the case and
//!   short-form-case extractors.

mod case;
mod federal_register;
mod journal;
mod neutral;
mod public_law;
mod short_form;
mod statute;
mod statutes_at_large;

use crate::config::PipelineConfig;
use crate::model::{Citation, Diagnostic, DiagnosticKind, Stage, Token, TransformationMap, Volume};
use once_cell::sync::Lazy;
use regex::Regex;

static VOLUME_NAME_PAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d[\w-]*)\s+(.+?)\s+(\d[\d-]*[A-Za-z]?)$").unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(1[7-9]\d{2}|20\d{2})\b").unwrap());

/// Splits a "`<volume> <name> <page>`" match (the shape shared by case
/// reporters, journals, Statutes at Large, and the Federal Register) into
/// its three pieces.
pub(crate) fn split_volume_name_page(text: &str) -> Option<(String, String, String)> {
    VOLUME_NAME_PAGE.captures(text.trim()).map(|c| (c[1].to_string(), c[2].trim().to_string(), c[3].to_string()))
}

pub(crate) fn parse_volume(raw: &str) -> Volume {
    raw.parse::<u32>().map(Volume::Number).unwrap_or_else(|_| Volume::Hyphenated(raw.to_string()))
}

/// Looks forward from `from` for a single parenthetical within a short
/// window and extracts a four-digit year from its contents, skipping any
/// `Mon. DD,` prefix (the `federalRegister` "(Jan. 15, 2021)" shape).
pub(crate) fn scan_trailing_year_parenthetical(text: &str, from: usize) -> Option<u32> {
    let window_end = (from + 60).min(text.len());
    let window = text.get(from..window_end)?;
    let trimmed = window.trim_start();
    if !trimmed.starts_with('(') {
        return None;
    }
    let close = trimmed.find(')')?;
    let content = &trimmed[1..close];
    YEAR_RE.find(content).and_then(|m| m.as_str().parse().ok())
}

pub(crate) fn push_parse_failure(diagnostics: &mut Vec<Diagnostic>, pattern_id: &str, reason: &str) {
    tracing::warn!(pattern = pattern_id, reason, "extractor parse failure, dropping token");
    diagnostics.push(Diagnostic {
        stage: Stage::Extractor,
        kind: DiagnosticKind::ExtractorParseFailure,
        detail: format!("pattern `{pattern_id}`: {reason}"),
    });
}

/// Strips trailing `, et al.`, `d/b/a`/`a/k/a`/`f/k/a` tails, corporate
/// suffixes, and a leading `The `, in that order.
pub(crate) fn normalize_party(raw: &str) -> String {
    let mut s = raw.trim().trim_end_matches(',').trim().to_string();

    for marker in [", et al.", " et al.", ", et al", " et al"] {
        if let Some(pos) = s.find(marker) {
            s.truncate(pos);
        }
    }

    for marker in [" d/b/a ", " a/k/a ", " f/k/a "] {
        if let Some(pos) = s.find(marker) {
            s.truncate(pos);
        }
    }

    s = s.trim().trim_end_matches(',').trim().to_string();

    for suffix in [" Inc.", " Inc", " LLC", " L.L.C.", " Ltd.", " Ltd", " Co.", " Corp.", " N.A."] {
        if let Some(stripped) = s.strip_suffix(suffix) {
            s = stripped.to_string();
        }
    }

    s = s.trim().trim_end_matches(',').trim().to_string();

    if let Some(stripped) = s.strip_prefix("The ") {
        s = stripped.to_string();
    }

    s.trim().to_string()
}

/// Runs every token through its matching extractor, in source order.
/// Tokens that fail to parse are dropped with a diagnostic; the returned
/// list is therefore not guaranteed the same length as `tokens`.
pub fn extract_all(
    tokens: &[Token],
    cleaned_text: &str,
    map: &TransformationMap,
    config: &PipelineConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Citation> {
    let mut citations = Vec::with_capacity(tokens.len());

    for token in tokens {
        let citation = match token.pattern_id {
            "case-supreme-court" | "case-federal-reporter" | "case-state-reporter" => {
                case::extract(token, cleaned_text, map, config, diagnostics)
            }
            "statute-usc" | "statute-cfr" | "statute-state-code" => statute::extract(token, map, diagnostics),
            "journal" => journal::extract(token, cleaned_text, map, diagnostics),
            "neutral-westlaw" | "neutral-lexis" => neutral::extract(token, map, diagnostics),
            "public-law" => public_law::extract(token, map, diagnostics),
            "federal-register" => federal_register::extract(token, cleaned_text, map, diagnostics),
            "statutes-at-large" => statutes_at_large::extract(token, map, diagnostics),
            "short-form-id" => short_form::extract_id(token, map),
            "short-form-supra" => short_form::extract_supra(token, map, diagnostics),
            "short-form-case" => short_form::extract_short_form_case(token, map, diagnostics),
            other => {
                push_parse_failure(diagnostics, other, "no extractor registered for this pattern id");
                None
            }
        };

        if let Some(citation) = citation {
            citations.push(citation);
        }
    }

    citations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_case_reporter_shape() {
        let (volume, name, page) = split_volume_name_page("500 F.2d 123").unwrap();
        assert_eq!(volume, "500");
        assert_eq!(name, "F.2d");
        assert_eq!(page, "123");
    }

    #[test]
    fn normalizes_corporate_suffix_and_et_al() {
        assert_eq!(normalize_party("Acme Corp."), "Acme");
        assert_eq!(normalize_party("Smith, et al."), "Smith");
        assert_eq!(normalize_party("The Doe Foundation"), "Doe Foundation");
    }

    #[test]
    fn scans_federal_register_year_parenthetical() {
        let text = "85 Fed. Reg. 12345 (Jan. 15, 2021).";
        let year = scan_trailing_year_parenthetical(text, "85 Fed. Reg. 12345".len());
        assert_eq!(year, Some(2021));
    }
}
