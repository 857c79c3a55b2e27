//! Public law citation extraction.

use super::push_parse_failure;
use crate::model::{Citation, CitationCommon, Diagnostic, PublicLawCitation, Token, TransformationMap};
use once_cell::sync::Lazy;
use regex::Regex;

static PUBLIC_LAW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Pub\.?\s*L\.?\s*No\.?\s*(\d{1,3}-\d{1,4})$").unwrap());

pub fn extract(token: &Token, map: &TransformationMap, diagnostics: &mut Vec<Diagnostic>) -> Option<Citation> {
    let number = match PUBLIC_LAW_RE.captures(token.text.trim()) {
        Some(c) => c[1].to_string(),
        None => {
            push_parse_failure(diagnostics, token.pattern_id, "public law pattern did not match token text");
            return None;
        }
    };

    let span = map.translate_span(token.span);
    let mut common = CitationCommon::new(token.text.clone(), span);
    common.confidence = 0.9;

    Some(Citation::PublicLaw(PublicLawCitation { common, number }))
}
