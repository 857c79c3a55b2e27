//! Short-form marker extraction: `Id.`/`Ibid.`, `supra`, and short-form case
//! cites (`Smith, 500 F.2d at 105`). These extractors populate everything
//! except `resolution` — that field is left `None` until
//! [`crate::resolver`] runs.

use super::{parse_volume, push_parse_failure};
use crate::model::{Citation, CitationCommon, Diagnostic, IdCitation, ShortFormCaseCitation, SupraCitation, Token, TransformationMap};
use once_cell::sync::Lazy;
use regex::Regex;

static SUPRA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z][A-Za-z'-]*),?\s+supra$").unwrap());
static SHORT_FORM_CASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Za-z'-]*),\s+(\d{1,4})\s+([A-Z][A-Za-z.]*(?:2d|3d|4th)?\.?)\s+at\s+(\d{1,5})$").unwrap());

pub fn extract_id(token: &Token, map: &TransformationMap) -> Option<Citation> {
    let span = map.translate_span(token.span);
    let mut common = CitationCommon::new(token.text.clone(), span);
    common.confidence = 1.0;
    Some(Citation::Id(IdCitation { common, resolution: None }))
}

pub fn extract_supra(token: &Token, map: &TransformationMap, diagnostics: &mut Vec<Diagnostic>) -> Option<Citation> {
    let antecedent_guess = match SUPRA_RE.captures(token.text.trim()) {
        Some(c) => c[1].to_string(),
        None => {
            push_parse_failure(diagnostics, token.pattern_id, "supra pattern did not match token text");
            return None;
        }
    };

    let span = map.translate_span(token.span);
    let mut common = CitationCommon::new(token.text.clone(), span);
    common.confidence = 0.7;

    Some(Citation::Supra(SupraCitation { common, antecedent_guess, resolution: None }))
}

pub fn extract_short_form_case(token: &Token, map: &TransformationMap, diagnostics: &mut Vec<Diagnostic>) -> Option<Citation> {
    let caps = match SHORT_FORM_CASE_RE.captures(token.text.trim()) {
        Some(c) => c,
        None => {
            push_parse_failure(diagnostics, token.pattern_id, "short-form case pattern did not match token text");
            return None;
        }
    };
    let antecedent_guess = Some(caps[1].to_string());
    let volume = parse_volume(&caps[2]);
    let reporter = caps[3].to_string();
    let page = caps[4].to_string();

    let span = map.translate_span(token.span);
    let mut common = CitationCommon::new(token.text.clone(), span);
    common.confidence = 0.75;

    Some(Citation::ShortFormCase(ShortFormCaseCitation {
        common,
        volume,
        reporter,
        page,
        antecedent_guess,
        resolution: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CleanSpan;

    fn token(text: &str, pattern_id: &'static str, kind: crate::model::CitationType) -> Token {
        Token {
            text: text.to_string(),
            span: CleanSpan { start: 0, end: text.len() },
            kind,
            pattern_id,
        }
    }

    #[test]
    fn extracts_id_marker() {
        let map = TransformationMap::identity();
        let citation = extract_id(&token("Id.", "short-form-id", crate::model::CitationType::Id), &map).unwrap();
        assert!(matches!(citation, Citation::Id(_)));
    }

    #[test]
    fn extracts_supra_with_antecedent_guess() {
        let map = TransformationMap::identity();
        let mut diagnostics = Vec::new();
        let citation = extract_supra(&token("Smith, supra", "short-form-supra", crate::model::CitationType::Supra), &map, &mut diagnostics).unwrap();
        match citation {
            Citation::Supra(s) => assert_eq!(s.antecedent_guess, "Smith"),
            _ => panic!("expected supra citation"),
        }
    }

    #[test]
    fn extracts_short_form_case() {
        let map = TransformationMap::identity();
        let mut diagnostics = Vec::new();
        let citation = extract_short_form_case(
            &token("Smith, 500 F.2d at 105", "short-form-case", crate::model::CitationType::ShortFormCase),
            &map,
            &mut diagnostics,
        )
        .unwrap();
        match citation {
            Citation::ShortFormCase(c) => {
                assert_eq!(c.reporter, "F.2d");
                assert_eq!(c.page, "105");
                assert_eq!(c.antecedent_guess.as_deref(), Some("Smith"));
            }
            _ => panic!("expected short-form case citation"),
        }
    }
}
