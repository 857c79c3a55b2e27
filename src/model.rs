//! # Data Model
//!
//! The types shared by every pipeline stage: [`Span`], [`TransformationMap`],
//! [`Token`], and the [`Citation`] tagged union. Citations reference each
//! other only by index (`Resolution::resolved_to`) or by `group_id` string —
//! there are no back-pointers and no cyclic structures, so the whole model
//! stays `Clone` and trivially `Send`.

use serde::{Deserialize, Serialize};

/// A byte-accurate range into both the cleaned and original text.
///
/// Invariant: `clean_start <= clean_end` and `original_start <= original_end`.
/// Both ranges must refer to the same logical substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub clean_start: usize,
    pub clean_end: usize,
    pub original_start: usize,
    pub original_end: usize,
}

impl Span {
    pub fn new(clean_start: usize, clean_end: usize, original_start: usize, original_end: usize) -> Self {
        debug_assert!(clean_start <= clean_end, "clean span must be non-decreasing");
        debug_assert!(original_start <= original_end, "original span must be non-decreasing");
        Self {
            clean_start,
            clean_end,
            original_start,
            original_end,
        }
    }
}

/// A clean-text-only span, used by [`Token`] before original offsets are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanSpan {
    pub start: usize,
    pub end: usize,
}

/// Maps cleaned-text offsets back to offsets in the original, uncleaned text.
///
/// Anchors are sorted ascending by `clean_offset` and must be monotonically
/// nondecreasing in `original_offset`. Offsets past the last anchor fall
/// through to `clean_offset + tail_delta`. The reverse direction is not
/// supported — resolution only ever needs clean-to-original translation.
#[derive(Debug, Clone, Default)]
pub struct TransformationMap {
    anchors: Vec<(usize, usize)>,
    tail_delta: isize,
}

impl TransformationMap {
    /// Builds a map from anchors already sorted by `clean_offset`, validating
    /// monotonicity. `tail_delta` is added to offsets past the final anchor.
    pub fn from_anchors(anchors: Vec<(usize, usize)>, tail_delta: isize) -> Result<Self, crate::errors::CitationError> {
        for pair in anchors.windows(2) {
            let ((clean_a, orig_a), (clean_b, orig_b)) = (pair[0], pair[1]);
            if clean_b < clean_a || orig_b < orig_a {
                return Err(crate::errors::CitationError::NonMonotonicTransformationMap { at_clean_offset: clean_b });
            }
        }
        Ok(Self { anchors, tail_delta })
    }

    /// The identity map: every offset maps to itself.
    pub fn identity() -> Self {
        Self {
            anchors: Vec::new(),
            tail_delta: 0,
        }
    }

    /// Translates a single cleaned offset to its original-text offset.
    pub fn translate(&self, clean_offset: usize) -> usize {
        match self.anchors.binary_search_by_key(&clean_offset, |&(c, _)| c) {
            Ok(idx) => self.anchors[idx].1,
            Err(0) => (clean_offset as isize + self.tail_delta).max(0) as usize,
            Err(idx) => {
                let (anchor_clean, anchor_orig) = self.anchors[idx - 1];
                anchor_orig + (clean_offset - anchor_clean)
            }
        }
    }

    /// Translates a [`CleanSpan`] into a full [`Span`] with both clean and
    /// original offsets populated.
    pub fn translate_span(&self, clean: CleanSpan) -> Span {
        Span::new(
            clean.start,
            clean.end,
            self.translate(clean.start),
            self.translate(clean.end),
        )
    }

    pub fn is_identity(&self) -> bool {
        self.anchors.is_empty() && self.tail_delta == 0
    }
}

/// Classifies a [`Token`] or [`Citation`] by pattern family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CitationType {
    Case,
    Statute,
    Journal,
    Neutral,
    PublicLaw,
    FederalRegister,
    StatutesAtLarge,
    Id,
    Supra,
    ShortFormCase,
}

impl CitationType {
    /// Short-form types are the ones the resolver tries to link to an
    /// antecedent; every other type is a full citation and is itself a
    /// valid antecedent.
    pub fn is_short_form(self) -> bool {
        matches!(self, CitationType::Id | CitationType::Supra | CitationType::ShortFormCase)
    }
}

/// A candidate match produced by the tokenizer, consumed by an extractor.
/// Tokens are ephemeral — they never appear in pipeline output.
#[derive(Debug, Clone)]
pub struct Token {
    pub text: String,
    pub span: CleanSpan,
    pub kind: CitationType,
    pub pattern_id: &'static str,
}

/// Volume numbers are usually integers but some state reporters use
/// hyphenated volume designators (e.g. `"1-A"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Volume {
    Number(u32),
    Hyphenated(String),
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Volume::Number(n) => write!(f, "{n}"),
            Volume::Hyphenated(s) => write!(f, "{s}"),
        }
    }
}

/// Reporter info for one member of a parallel-citation group, preserved in
/// source order. Only the primary citation carries a `Vec` of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelCitationInfo {
    pub reporter: String,
    pub volume: Volume,
    pub page: String,
    pub span: Span,
}

/// A resolved short-form citation's antecedent, by index into the document's
/// citation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub resolved_to: usize,
}

/// Fields shared by every [`Citation`] variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationCommon {
    pub text: String,
    pub matched_text: String,
    pub span: Span,
    pub confidence: f32,
    pub process_time_ms: u64,
    pub patterns_checked: u32,
    pub group_id: Option<String>,
    pub parallel_citations: Option<Vec<ParallelCitationInfo>>,
}

impl CitationCommon {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        let text = text.into();
        Self {
            matched_text: text.clone(),
            text,
            span,
            confidence: 0.0,
            process_time_ms: 0,
            patterns_checked: 1,
            group_id: None,
            parallel_citations: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseCitation {
    pub common: CitationCommon,
    pub volume: Volume,
    pub reporter: String,
    pub page: String,
    pub year: Option<u32>,
    pub court: Option<String>,
    pub plaintiff: Option<String>,
    pub defendant: Option<String>,
    pub plaintiff_normalized: Option<String>,
    pub defendant_normalized: Option<String>,
    pub procedural_prefix: Option<String>,
    pub pincite: Option<String>,
    pub parenthetical: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatuteCitation {
    pub common: CitationCommon,
    pub title: u32,
    pub code: String,
    pub section: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalCitation {
    pub common: CitationCommon,
    pub volume: u32,
    pub journal: String,
    pub page: String,
    pub year: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeutralDatabase {
    Wl,
    Lexis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeutralCitation {
    pub common: CitationCommon,
    pub year: u32,
    pub database: NeutralDatabase,
    pub sequence: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicLawCitation {
    pub common: CitationCommon,
    pub number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederalRegisterCitation {
    pub common: CitationCommon,
    pub volume: u32,
    pub page: String,
    pub year: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatutesAtLargeCitation {
    pub common: CitationCommon,
    pub volume: u32,
    pub page: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdCitation {
    pub common: CitationCommon,
    pub resolution: Option<Resolution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupraCitation {
    pub common: CitationCommon,
    pub antecedent_guess: String,
    pub resolution: Option<Resolution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortFormCaseCitation {
    pub common: CitationCommon,
    pub volume: Volume,
    pub reporter: String,
    pub page: String,
    pub antecedent_guess: Option<String>,
    pub resolution: Option<Resolution>,
}

/// The citation tagged union. Discriminated by variant name rather than by
/// an explicit `type` field — `match` gives compile-time exhaustiveness,
/// and [`Citation::citation_type`] recovers the tag for callers that want it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Citation {
    Case(CaseCitation),
    Statute(StatuteCitation),
    Journal(JournalCitation),
    Neutral(NeutralCitation),
    PublicLaw(PublicLawCitation),
    FederalRegister(FederalRegisterCitation),
    StatutesAtLarge(StatutesAtLargeCitation),
    Id(IdCitation),
    Supra(SupraCitation),
    ShortFormCase(ShortFormCaseCitation),
}

impl Citation {
    pub fn common(&self) -> &CitationCommon {
        match self {
            Citation::Case(c) => &c.common,
            Citation::Statute(c) => &c.common,
            Citation::Journal(c) => &c.common,
            Citation::Neutral(c) => &c.common,
            Citation::PublicLaw(c) => &c.common,
            Citation::FederalRegister(c) => &c.common,
            Citation::StatutesAtLarge(c) => &c.common,
            Citation::Id(c) => &c.common,
            Citation::Supra(c) => &c.common,
            Citation::ShortFormCase(c) => &c.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut CitationCommon {
        match self {
            Citation::Case(c) => &mut c.common,
            Citation::Statute(c) => &mut c.common,
            Citation::Journal(c) => &mut c.common,
            Citation::Neutral(c) => &mut c.common,
            Citation::PublicLaw(c) => &mut c.common,
            Citation::FederalRegister(c) => &mut c.common,
            Citation::StatutesAtLarge(c) => &mut c.common,
            Citation::Id(c) => &mut c.common,
            Citation::Supra(c) => &mut c.common,
            Citation::ShortFormCase(c) => &mut c.common,
        }
    }

    pub fn citation_type(&self) -> CitationType {
        match self {
            Citation::Case(_) => CitationType::Case,
            Citation::Statute(_) => CitationType::Statute,
            Citation::Journal(_) => CitationType::Journal,
            Citation::Neutral(_) => CitationType::Neutral,
            Citation::PublicLaw(_) => CitationType::PublicLaw,
            Citation::FederalRegister(_) => CitationType::FederalRegister,
            Citation::StatutesAtLarge(_) => CitationType::StatutesAtLarge,
            Citation::Id(_) => CitationType::Id,
            Citation::Supra(_) => CitationType::Supra,
            Citation::ShortFormCase(_) => CitationType::ShortFormCase,
        }
    }

    pub fn original_start(&self) -> usize {
        self.common().span.original_start
    }

    pub fn is_short_form(&self) -> bool {
        self.citation_type().is_short_form()
    }

    /// The resolution set by the resolver, if any short-form link was found.
    pub fn resolution(&self) -> Option<Resolution> {
        match self {
            Citation::Id(c) => c.resolution,
            Citation::Supra(c) => c.resolution,
            Citation::ShortFormCase(c) => c.resolution,
            _ => None,
        }
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        match self {
            Citation::Id(c) => c.resolution = Some(resolution),
            Citation::Supra(c) => c.resolution = Some(resolution),
            Citation::ShortFormCase(c) => c.resolution = Some(resolution),
            _ => {}
        }
    }

    /// Normalized plaintiff/defendant names, used as antecedent index keys.
    /// Only case citations (full or short-form) carry party names.
    pub fn party_names(&self) -> (Option<&str>, Option<&str>) {
        match self {
            Citation::Case(c) => (c.plaintiff_normalized.as_deref(), c.defendant_normalized.as_deref()),
            _ => (None, None),
        }
    }

    pub fn as_case(&self) -> Option<&CaseCitation> {
        match self {
            Citation::Case(c) => Some(c),
            _ => None,
        }
    }
}

/// Pipeline stage a [`Diagnostic`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Tokenizer,
    Extractor,
    Resolver,
    Annotator,
}

/// Non-fatal failure kinds, per the error taxonomy. Each is recovered
/// locally by the stage that produced it; the pipeline always returns a
/// usable citation list regardless of how many diagnostics accumulate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DiagnosticKind {
    PatternExecutionFailure,
    ExtractorParseFailure,
    ResolutionFailure,
    AnnotationSnapFailure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    pub kind: DiagnosticKind,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_map_round_trips() {
        let map = TransformationMap::identity();
        assert_eq!(map.translate(0), 0);
        assert_eq!(map.translate(42), 42);
        assert!(map.is_identity());
    }

    #[test]
    fn anchored_map_translates_through_gaps() {
        // cleaned "a b" came from original "a  b" (two spaces collapsed to one)
        let map = TransformationMap::from_anchors(vec![(0, 0), (2, 3)], 1).unwrap();
        assert_eq!(map.translate(0), 0);
        assert_eq!(map.translate(1), 1);
        assert_eq!(map.translate(2), 3);
        assert_eq!(map.translate(3), 4);
    }

    #[test]
    fn rejects_non_monotonic_anchors() {
        let result = TransformationMap::from_anchors(vec![(5, 5), (3, 3)], 0);
        assert!(result.is_err());
    }
}
