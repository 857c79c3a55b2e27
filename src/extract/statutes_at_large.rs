//! Statutes at Large citation extraction.

use super::{parse_volume, push_parse_failure, split_volume_name_page};
use crate::model::{Citation, CitationCommon, Diagnostic, StatutesAtLargeCitation, Token, TransformationMap};

pub fn extract(token: &Token, map: &TransformationMap, diagnostics: &mut Vec<Diagnostic>) -> Option<Citation> {
    let (volume_raw, _name, page) = match split_volume_name_page(&token.text) {
        Some(parts) => parts,
        None => {
            push_parse_failure(diagnostics, token.pattern_id, "could not split volume/name/page");
            return None;
        }
    };
    let volume = match parse_volume(&volume_raw) {
        crate::model::Volume::Number(n) => n,
        crate::model::Volume::Hyphenated(_) => {
            push_parse_failure(diagnostics, token.pattern_id, "Statutes at Large volume must be numeric");
            return None;
        }
    };

    let span = map.translate_span(token.span);
    let mut common = CitationCommon::new(token.text.clone(), span);
    common.confidence = 0.85;

    Some(Citation::StatutesAtLarge(StatutesAtLargeCitation { common, volume, page }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CleanSpan;

    #[test]
    fn extracts_statutes_at_large_citation() {
        let token = Token {
            text: "135 Stat. 429".to_string(),
            span: CleanSpan { start: 0, end: 13 },
            kind: crate::model::CitationType::StatutesAtLarge,
            pattern_id: "statutes-at-large",
        };
        let map = TransformationMap::identity();
        let mut diagnostics = Vec::new();
        let citation = extract(&token, &map, &mut diagnostics).unwrap();
        match citation {
            Citation::StatutesAtLarge(s) => {
                assert_eq!(s.volume, 135);
                assert_eq!(s.page, "429");
            }
            _ => panic!("expected Statutes at Large citation"),
        }
    }
}
