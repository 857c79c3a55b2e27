//! USC / CFR / state-code statute extraction.

use super::push_parse_failure;
use crate::model::{Citation, CitationCommon, Diagnostic, StatuteCitation, Token, TransformationMap};
use once_cell::sync::Lazy;
use regex::Regex;

static USC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3})\s+U\.S\.C\.\s*\u{a7}?\s*(\d{1,6}[A-Za-z]?)$").unwrap());
static CFR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3})\s+C\.F\.R\.\s*\u{a7}?\s*(\d{1,6}(?:\.\d+)?)$").unwrap());
static STATE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Za-z.]+(?:\s[A-Z][A-Za-z.]+)?\s(?:Code|Law|Stat(?:\.|utes)?))\s*\u{a7}\s*(\d[\d.]*[A-Za-z]?)$").unwrap());

pub fn extract(token: &Token, map: &TransformationMap, diagnostics: &mut Vec<Diagnostic>) -> Option<Citation> {
    let (title, code, section) = match token.pattern_id {
        "statute-usc" => match USC_RE.captures(token.text.trim()) {
            Some(c) => (c[1].parse().ok()?, "U.S.C.".to_string(), c[2].to_string()),
            None => {
                push_parse_failure(diagnostics, token.pattern_id, "USC pattern did not match token text");
                return None;
            }
        },
        "statute-cfr" => match CFR_RE.captures(token.text.trim()) {
            Some(c) => (c[1].parse().ok()?, "C.F.R.".to_string(), c[2].to_string()),
            None => {
                push_parse_failure(diagnostics, token.pattern_id, "CFR pattern did not match token text");
                return None;
            }
        },
        "statute-state-code" => match STATE_CODE_RE.captures(token.text.trim()) {
            // State codes carry no federal title number; 0 is the documented
            // convention for "not applicable" rather than an `Option<u32>`.
            Some(c) => (0, c[1].to_string(), c[2].to_string()),
            None => {
                push_parse_failure(diagnostics, token.pattern_id, "state code pattern did not match token text");
                return None;
            }
        },
        other => {
            push_parse_failure(diagnostics, other, "unrecognized statute pattern id");
            return None;
        }
    };

    let span = map.translate_span(token.span);
    let mut common = CitationCommon::new(token.text.clone(), span);
    common.confidence = 0.9;

    Some(Citation::Statute(StatuteCitation { common, title, code, section }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CleanSpan;

    fn usc_token(start: usize, end: usize) -> Token {
        Token {
            text: "42 U.S.C. \u{a7} 1983".to_string(),
            span: CleanSpan { start, end },
            kind: crate::model::CitationType::Statute,
            pattern_id: "statute-usc",
        }
    }

    #[test]
    fn extracts_usc_seed_scenario() {
        let map = TransformationMap::identity();
        let mut diagnostics = Vec::new();
        let citation = extract(&usc_token(0, 17), &map, &mut diagnostics).unwrap();
        match citation {
            Citation::Statute(s) => {
                assert_eq!(s.title, 42);
                assert_eq!(s.code, "U.S.C.");
                assert_eq!(s.section, "1983");
            }
            _ => panic!("expected statute citation"),
        }
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn section_carries_alphanumeric_suffix() {
        let map = TransformationMap::identity();
        let mut diagnostics = Vec::new();
        let token = Token {
            text: "42 U.S.C. \u{a7} 1983a".to_string(),
            span: CleanSpan { start: 0, end: 18 },
            kind: crate::model::CitationType::Statute,
            pattern_id: "statute-usc",
        };
        let citation = extract(&token, &map, &mut diagnostics).unwrap();
        match citation {
            Citation::Statute(s) => assert_eq!(s.section, "1983a"),
            _ => panic!("expected statute citation"),
        }
    }
}
