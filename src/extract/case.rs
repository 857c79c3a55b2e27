//! Case-citation extraction: volume/reporter/page parsing, backward caption
//! scanning (party names, procedural prefixes), and forward pincite/
//! parenthetical scanning (year, court).

use super::{normalize_party, push_parse_failure, split_volume_name_page};
use crate::config::PipelineConfig;
use crate::model::{CaseCitation, Citation, CitationCommon, Diagnostic, Token, TransformationMap};
use crate::reporters;
use once_cell::sync::Lazy;
use regex::Regex;

static PROCEDURAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(In the Matter of|In re|Ex parte|Matter of|Application of|Petition of)\s+([A-Z][\w.,&'() -]*?)\s*,?\s*$").unwrap()
});

static CAPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][\w.,&'() -]*?)\s+(?:v\.|vs\.|vs)\s+([A-Z][\w.,&'() -]*?)\s*,?\s*$").unwrap());

static SEGMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:n\.\d+|note\s+\d+|\d{1,5}(?:-\d{1,5})?)").unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(1[7-9]\d{2}|20\d{2})\b").unwrap());

/// Matches a period that ends a `v.`/`vs.` abbreviation rather than a
/// sentence, so the backward boundary scan in [`scan_caption`] can skip past
/// it instead of stopping there.
static ABBREVIATION_TAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bvs?\.$").unwrap());

/// Introductory signal a citation sentence is commonly prefixed with (`See
/// Smith v. Doe, ...`). Stripped before caption matching so the signal word
/// itself is never captured as part of the plaintiff's name.
static SIGNAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:see\s+also|see\s+e\.g\.,?|but\s+see|compare|accord|cf\.|see)\s+").unwrap());

pub fn extract(
    token: &Token,
    cleaned_text: &str,
    map: &TransformationMap,
    config: &PipelineConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Citation> {
    let (volume_raw, reporter, page) = match split_volume_name_page(&token.text) {
        Some(parts) => parts,
        None => {
            push_parse_failure(diagnostics, token.pattern_id, "could not split volume/reporter/page");
            return None;
        }
    };
    let volume = super::parse_volume(&volume_raw);

    let (procedural_prefix, plaintiff, defendant) = scan_caption(cleaned_text, token.span.start);
    let (pincite, year, court_raw) = scan_forward_tail(cleaned_text, token.span.end);
    let court = court_raw.map(|raw| reporters::normalize_court(&raw).unwrap_or(raw));

    let plaintiff_normalized = plaintiff.as_deref().map(normalize_party);
    let defendant_normalized = defendant.as_deref().map(normalize_party);

    let mut confidence = config.confidence.baseline;
    if reporters::is_known_reporter(&reporter) {
        confidence += config.confidence.known_reporter;
    }
    if plaintiff.is_some() || procedural_prefix.is_some() {
        confidence += config.confidence.caption_found;
    }
    if year.is_some() {
        confidence += config.confidence.year_found;
    }
    if court.is_some() {
        confidence += config.confidence.court_found;
    }

    let span = map.translate_span(token.span);
    let mut common = CitationCommon::new(token.text.clone(), span);
    common.confidence = confidence.min(1.0);

    Some(Citation::Case(CaseCitation {
        common,
        volume,
        reporter: reporters::normalize_reporter(&reporter),
        page,
        year,
        court,
        plaintiff,
        defendant,
        plaintiff_normalized,
        defendant_normalized,
        procedural_prefix,
        pincite,
        parenthetical: None,
    }))
}

/// Scans backward from `case_start` to the preceding period or newline (or
/// the start of text) and looks for a procedural prefix first, then a
/// `Plaintiff v. Defendant` caption.
fn scan_caption(text: &str, case_start: usize) -> (Option<String>, Option<String>, Option<String>) {
    let boundary = find_caption_boundary(&text[..case_start]);
    let window = text[boundary..case_start].trim_end_matches([',', ' ']);
    let window = SIGNAL_RE.replace(window, "");
    let window = window.as_ref();

    if let Some(caps) = PROCEDURAL_RE.captures(window) {
        let prefix = caps[1].to_string();
        let party = caps[2].trim().trim_end_matches(',').trim().to_string();
        return (Some(prefix), Some(party), None);
    }

    if let Some(caps) = CAPTION_RE.captures(window) {
        let plaintiff = caps[1].trim().to_string();
        let defendant = caps[2].trim().to_string();
        return (None, Some(plaintiff), Some(defendant));
    }

    (None, None, None)
}

/// Finds the start of the sentence containing `case_start`, scanning
/// backward for a `.`/`\n` boundary. A period closing a `v.`/`vs.`
/// abbreviation is not a sentence boundary, so the scan skips past it and
/// keeps looking further back.
fn find_caption_boundary(prefix: &str) -> usize {
    let mut cursor = prefix.len();

    loop {
        let Some(rel) = prefix[..cursor].rfind(['.', '\n']) else {
            return 0;
        };

        if prefix.as_bytes()[rel] == b'\n' || !ABBREVIATION_TAIL_RE.is_match(&prefix[..=rel]) {
            return rel + 1;
        }

        cursor = rel;
    }
}

/// Scans forward from `tail_start`, skipping pincites and footnote markers,
/// looking for a trailing `(court? year)` parenthetical.
fn scan_forward_tail(text: &str, tail_start: usize) -> (Option<String>, Option<u32>, Option<String>) {
    let mut cursor = tail_start;
    let mut pincite: Option<String> = None;

    loop {
        cursor += leading_ws_len(&text[cursor..]);
        let rest = &text[cursor..];

        if rest.starts_with('(') {
            let close = match rest.find(')') {
                Some(idx) => idx,
                None => return (pincite, None, None),
            };
            let content = &rest[1..close];
            let year = YEAR_RE.find(content).and_then(|m| m.as_str().parse().ok());
            let court = match YEAR_RE.find(content) {
                Some(m) => {
                    let before = content[..m.start()].trim().trim_end_matches(',').trim();
                    if before.is_empty() { None } else { Some(before.to_string()) }
                }
                None => {
                    let trimmed = content.trim();
                    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
                }
            };
            return (pincite, year, court);
        }

        if !rest.starts_with(',') {
            return (pincite, None, None);
        }
        cursor += 1;
        cursor += leading_ws_len(&text[cursor..]);

        let after_comma = &text[cursor..];
        let at_skip = if after_comma.starts_with("at ") { 3 } else { 0 };
        let candidate = &after_comma[at_skip..];

        match SEGMENT_RE.find(candidate) {
            Some(m) if m.start() == 0 => {
                let segment = m.as_str();
                if pincite.is_none() && segment.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    pincite = Some(segment.to_string());
                }
                cursor += at_skip + m.end();
            }
            _ => return (pincite, None, None),
        }
    }
}

fn leading_ws_len(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CleanSpan;

    fn token(text: &str, start: usize, end: usize) -> Token {
        Token {
            text: text.to_string(),
            span: CleanSpan { start, end },
            kind: crate::model::CitationType::Case,
            pattern_id: "case-federal-reporter",
        }
    }

    #[test]
    fn extracts_smith_v_doe_seed_scenario() {
        let text = "See Smith v. Doe, 500 F.2d 123 (9th Cir. 2020).";
        let start = text.find("500").unwrap();
        let end = start + "500 F.2d 123".len();
        let map = TransformationMap::identity();
        let config = PipelineConfig::default();
        let mut diagnostics = Vec::new();

        let citation = extract(&token("500 F.2d 123", start, end), text, &map, &config, &mut diagnostics).unwrap();
        match citation {
            Citation::Case(c) => {
                assert_eq!(c.reporter, "F.2d");
                assert_eq!(c.page, "123");
                assert_eq!(c.year, Some(2020));
                assert_eq!(c.plaintiff_normalized.as_deref(), Some("Smith"));
                assert_eq!(c.defendant_normalized.as_deref(), Some("Doe"));
                assert_eq!(c.court.as_deref(), Some("9th Cir."));
            }
            _ => panic!("expected case citation"),
        }
    }

    #[test]
    fn detects_procedural_prefix_as_plaintiff_replacement() {
        let text = "In re Smith, 500 F.2d 123 (1999).";
        let start = text.find("500").unwrap();
        let end = start + "500 F.2d 123".len();
        let map = TransformationMap::identity();
        let config = PipelineConfig::default();
        let mut diagnostics = Vec::new();

        let citation = extract(&token("500 F.2d 123", start, end), text, &map, &config, &mut diagnostics).unwrap();
        match citation {
            Citation::Case(c) => {
                assert_eq!(c.procedural_prefix.as_deref(), Some("In re"));
                assert_eq!(c.plaintiff.as_deref(), Some("Smith"));
                assert!(c.defendant.is_none());
            }
            _ => panic!("expected case citation"),
        }
    }

    #[test]
    fn pincite_scanner_skips_footnote_markers() {
        let text = "Smith v. Doe, 500 F.2d 123, n.3, 115 (9th Cir. 2020).";
        let start = text.find("500").unwrap();
        let end = start + "500 F.2d 123".len();
        let (pincite, year, court) = scan_forward_tail(text, end);
        assert_eq!(pincite.as_deref(), Some("115"));
        assert_eq!(year, Some(2020));
        assert_eq!(court.as_deref(), Some("9th Cir."));
    }
}
