//! Law review / journal citation extraction.

use super::{parse_volume, push_parse_failure, scan_trailing_year_parenthetical, split_volume_name_page};
use crate::model::{Citation, CitationCommon, Diagnostic, JournalCitation, Token, TransformationMap};

pub fn extract(token: &Token, cleaned_text: &str, map: &TransformationMap, diagnostics: &mut Vec<Diagnostic>) -> Option<Citation> {
    let (volume_raw, journal_name, page) = match split_volume_name_page(&token.text) {
        Some(parts) => parts,
        None => {
            push_parse_failure(diagnostics, token.pattern_id, "could not split volume/journal/page");
            return None;
        }
    };
    let volume = match parse_volume(&volume_raw) {
        crate::model::Volume::Number(n) => n,
        crate::model::Volume::Hyphenated(_) => {
            push_parse_failure(diagnostics, token.pattern_id, "journal volume must be numeric");
            return None;
        }
    };

    let year = scan_trailing_year_parenthetical(cleaned_text, token.span.end);

    let span = map.translate_span(token.span);
    let mut common = CitationCommon::new(token.text.clone(), span);
    common.confidence = 0.8;

    Some(Citation::Journal(JournalCitation {
        common,
        volume,
        journal: journal_name,
        page,
        year,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CleanSpan;

    #[test]
    fn extracts_journal_citation() {
        let text = "89 Harv. L. Rev. 1495 (1976).";
        let end = "89 Harv. L. Rev. 1495".len();
        let token = Token {
            text: "89 Harv. L. Rev. 1495".to_string(),
            span: CleanSpan { start: 0, end },
            kind: crate::model::CitationType::Journal,
            pattern_id: "journal",
        };
        let map = TransformationMap::identity();
        let mut diagnostics = Vec::new();

        let citation = extract(&token, text, &map, &mut diagnostics).unwrap();
        match citation {
            Citation::Journal(j) => {
                assert_eq!(j.volume, 89);
                assert_eq!(j.journal, "Harv. L. Rev.");
                assert_eq!(j.page, "1495");
                assert_eq!(j.year, Some(1976));
            }
            _ => panic!("expected journal citation"),
        }
    }
}
