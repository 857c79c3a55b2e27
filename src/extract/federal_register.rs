//! Federal Register citation extraction.

use super::{parse_volume, push_parse_failure, scan_trailing_year_parenthetical, split_volume_name_page};
use crate::model::{Citation, CitationCommon, Diagnostic, FederalRegisterCitation, Token, TransformationMap};

pub fn extract(token: &Token, cleaned_text: &str, map: &TransformationMap, diagnostics: &mut Vec<Diagnostic>) -> Option<Citation> {
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
            push_parse_failure(diagnostics, token.pattern_id, "Federal Register volume must be numeric");
            return None;
        }
    };

    let year = scan_trailing_year_parenthetical(cleaned_text, token.span.end);

    let span = map.translate_span(token.span);
    let mut common = CitationCommon::new(token.text.clone(), span);
    common.confidence = 0.85;

    Some(Citation::FederalRegister(FederalRegisterCitation { common, volume, page, year }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CleanSpan;

    #[test]
    fn extracts_federal_register_with_month_day_year() {
        let text = "85 Fed. Reg. 12345 (Jan. 15, 2021).";
        let end = "85 Fed. Reg. 12345".len();
        let token = Token {
            text: "85 Fed. Reg. 12345".to_string(),
            span: CleanSpan { start: 0, end },
            kind: crate::model::CitationType::FederalRegister,
            pattern_id: "federal-register",
        };
        let map = TransformationMap::identity();
        let mut diagnostics = Vec::new();
        let citation = extract(&token, text, &map, &mut diagnostics).unwrap();
        match citation {
            Citation::FederalRegister(f) => {
                assert_eq!(f.volume, 85);
                assert_eq!(f.page, "12345");
                assert_eq!(f.year, Some(2021));
            }
            _ => panic!("expected Federal Register citation"),
        }
    }
}
