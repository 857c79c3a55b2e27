//! Westlaw / LEXIS neutral citation extraction.

use super::push_parse_failure;
use crate::model::{Citation, CitationCommon, Diagnostic, NeutralCitation, NeutralDatabase, Token, TransformationMap};
use once_cell::sync::Lazy;
use regex::Regex;

static WL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})\s+WL\s+(\d{3,9})$").unwrap());
static LEXIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})\s+(?:U\.S\.\s+)?(?:Dist\.|App\.)?\s*LEXIS\s+(\d{3,9})$").unwrap());

pub fn extract(token: &Token, map: &TransformationMap, diagnostics: &mut Vec<Diagnostic>) -> Option<Citation> {
    let (year, database, sequence) = match token.pattern_id {
        "neutral-westlaw" => match WL_RE.captures(token.text.trim()) {
            Some(c) => (c[1].parse().ok()?, NeutralDatabase::Wl, c[2].to_string()),
            None => {
                push_parse_failure(diagnostics, token.pattern_id, "WL pattern did not match token text");
                return None;
            }
        },
        "neutral-lexis" => match LEXIS_RE.captures(token.text.trim()) {
            Some(c) => (c[1].parse().ok()?, NeutralDatabase::Lexis, c[2].to_string()),
            None => {
                push_parse_failure(diagnostics, token.pattern_id, "LEXIS pattern did not match token text");
                return None;
            }
        },
        other => {
            push_parse_failure(diagnostics, other, "unrecognized neutral pattern id");
            return None;
        }
    };

    let span = map.translate_span(token.span);
    let mut common = CitationCommon::new(token.text.clone(), span);
    common.confidence = 0.85;

    Some(Citation::Neutral(NeutralCitation { common, year, database, sequence }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CleanSpan;

    #[test]
    fn extracts_westlaw_citation() {
        let token = Token {
            text: "2020 WL 123456".to_string(),
            span: CleanSpan { start: 0, end: 15 },
            kind: crate::model::CitationType::Neutral,
            pattern_id: "neutral-westlaw",
        };
        let map = TransformationMap::identity();
        let mut diagnostics = Vec::new();
        let citation = extract(&token, &map, &mut diagnostics).unwrap();
        match citation {
            Citation::Neutral(n) => {
                assert_eq!(n.year, 2020);
                assert_eq!(n.database, NeutralDatabase::Wl);
                assert_eq!(n.sequence, "123456");
            }
            _ => panic!("expected neutral citation"),
        }
    }
}
