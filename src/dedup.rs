//! Exact-duplicate collapsing and overlap-dominance resolution over tokenizer output.

use crate::model::Token;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Size threshold under which exact-duplicate identity is bitpacked into a
/// single `u64` key rather than a string key. A performance detail only —
/// larger documents fall back to a `"{start}-{end}-{pattern_id}"` string key
/// with identical collapsing behavior.
const BITPACK_THRESHOLD_BYTES: usize = 65_536;

/// Runs both deduplication passes and returns the surviving tokens, still
/// sorted by ascending `cleanStart`.
pub fn dedup(tokens: Vec<Token>, cleaned_text: &str) -> Vec<Token> {
    let exact_deduped = collapse_exact_duplicates(tokens, cleaned_text.len());
    resolve_overlaps(exact_deduped, cleaned_text)
}

fn collapse_exact_duplicates(tokens: Vec<Token>, doc_len: usize) -> Vec<Token> {
    let bitpacked = doc_len < BITPACK_THRESHOLD_BYTES;
    let mut seen_bits: HashSet<u64> = HashSet::new();
    let mut seen_strings: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(tokens.len());

    for token in tokens {
        let is_new = if bitpacked {
            let key = ((token.span.start as u64) << 32) | token.span.end as u64;
            let qualified = format!("{}-{}-{}", token.span.start, token.span.end, token.pattern_id);
            // Same (start, end) pair can carry different pattern ids and is still
            // an "exact duplicate" only when the pattern id also matches, so fold
            // the pattern id into the bitpacked key via a cheap string fallback
            // for the rare same-span, different-pattern case. The first sighting
            // of a span must also seed `seen_strings` with its qualified key, or
            // a true exact duplicate on that same span/pattern would find nothing
            // there to collide with and be let through.
            if seen_bits.insert(key) {
                seen_strings.insert(qualified);
                true
            } else {
                seen_strings.insert(qualified)
            }
        } else {
            seen_strings.insert(format!("{}-{}-{}", token.span.start, token.span.end, token.pattern_id))
        };

        if is_new {
            out.push(token);
        }
    }

    out
}

fn resolve_overlaps(tokens: Vec<Token>, cleaned_text: &str) -> Vec<Token> {
    let mut kept: Vec<Token> = Vec::with_capacity(tokens.len());

    'next_token: for token in tokens {
        let mut i = 0;
        while i < kept.len() {
            if overlaps(&kept[i], &token) {
                match dominance(&token, &kept[i], cleaned_text) {
                    Ordering::Greater => {
                        kept.remove(i);
                        continue;
                    }
                    _ => continue 'next_token,
                }
            }
            i += 1;
        }
        kept.push(token);
    }

    kept.sort_by_key(|t| t.span.start);
    kept
}

fn overlaps(a: &Token, b: &Token) -> bool {
    a.span.start < b.span.end && b.span.start < a.span.end
}

/// Returns `Greater` if `a` dominates `b`, `Less` if `b` dominates `a`. Never
/// returns `Equal` — ties are always broken deterministically.
fn dominance(a: &Token, b: &Token, cleaned_text: &str) -> Ordering {
    if cleaned_text.contains("LEXIS") {
        if a.pattern_id == "neutral-lexis" && b.pattern_id == "case-supreme-court" {
            return Ordering::Greater;
        }
        if b.pattern_id == "neutral-lexis" && a.pattern_id == "case-supreme-court" {
            return Ordering::Less;
        }
    }

    let a_dominant_family = matches!(a.pattern_id, "public-law" | "neutral-westlaw");
    let b_dominant_family = matches!(b.pattern_id, "public-law" | "neutral-westlaw");
    if a_dominant_family && b.pattern_id.starts_with("case-") {
        return Ordering::Greater;
    }
    if b_dominant_family && a.pattern_id.starts_with("case-") {
        return Ordering::Less;
    }

    match precedence_rank(a.pattern_id).cmp(&precedence_rank(b.pattern_id)) {
        Ordering::Equal => tie_break(a, b),
        other => other,
    }
}

/// A fixed precedence hierarchy: `supreme-court > federal-reporter >
/// state-reporter > journal`; `usc > cfr > state-code`; `federal-register >
/// state-reporter`. Patterns outside these families rank below every listed
/// one, which only matters when they happen to overlap at all.
fn precedence_rank(pattern_id: &str) -> i32 {
    match pattern_id {
        "case-supreme-court" => 90,
        "federal-register" => 85,
        "case-federal-reporter" | "statute-usc" => 80,
        "statute-cfr" => 75,
        "case-state-reporter" => 60,
        "statute-state-code" => 55,
        "journal" => 40,
        "neutral-westlaw" | "neutral-lexis" | "public-law" | "statutes-at-large" => 30,
        "short-form-id" | "short-form-supra" | "short-form-case" => 20,
        _ => 0,
    }
}

fn tie_break(a: &Token, b: &Token) -> Ordering {
    let len_a = a.span.end - a.span.start;
    let len_b = b.span.end - b.span.start;
    match len_a.cmp(&len_b) {
        Ordering::Equal => b.span.start.cmp(&a.span.start),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CitationType, CleanSpan};

    fn token(pattern_id: &'static str, start: usize, end: usize, kind: CitationType) -> Token {
        Token {
            text: String::new(),
            span: CleanSpan { start, end },
            kind,
            pattern_id,
        }
    }

    #[test]
    fn collapses_exact_duplicates() {
        let tokens = vec![
            token("case-supreme-court", 0, 10, CitationType::Case),
            token("case-supreme-court", 0, 10, CitationType::Case),
        ];
        let result = dedup(tokens, "410 U.S. 113 extra");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn first_pass_alone_collapses_exact_duplicates_without_relying_on_overlap_resolution() {
        // Exercises collapse_exact_duplicates directly, bypassing resolve_overlaps,
        // so a regression that only collapses via the second pass's tie-break
        // (rather than the first pass's own contract) would be caught here.
        let tokens = vec![
            token("case-supreme-court", 0, 10, CitationType::Case),
            token("case-supreme-court", 0, 10, CitationType::Case),
            token("case-supreme-court", 0, 10, CitationType::Case),
        ];
        let result = collapse_exact_duplicates(tokens, 18);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn supreme_court_dominates_state_reporter_on_overlap() {
        let tokens = vec![
            token("case-state-reporter", 0, 12, CitationType::Case),
            token("case-supreme-court", 2, 14, CitationType::Case),
        ];
        let result = dedup(tokens, "irrelevant text of sufficient length");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].pattern_id, "case-supreme-court");
    }

    #[test]
    fn public_law_dominates_overlapping_case_pattern() {
        let tokens = vec![
            token("case-federal-reporter", 0, 20, CitationType::Case),
            token("public-law", 5, 25, CitationType::PublicLaw),
        ];
        let result = dedup(tokens, "text");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].pattern_id, "public-law");
    }

    #[test]
    fn non_overlapping_tokens_both_survive() {
        let tokens = vec![
            token("case-supreme-court", 0, 10, CitationType::Case),
            token("statute-usc", 20, 30, CitationType::Statute),
        ];
        let result = dedup(tokens, "text");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn ties_prefer_longer_match_then_earlier_start() {
        let tokens = vec![
            token("journal", 0, 10, CitationType::Journal),
            token("journal", 5, 12, CitationType::Journal),
        ];
        let result = dedup(tokens, "text");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].span.start, 0);
        assert_eq!(result[0].span.end, 10);
    }
}
