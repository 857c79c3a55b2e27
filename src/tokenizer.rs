//! # Tokenizer
//!
//! ## Purpose
//! Runs every pattern in [`crate::patterns::REGISTRY`] over the cleaned
//! text, in registration order, and collects every match into a flat,
//! `cleanStart`-ordered `Vec<Token>`. A single span of text can yield
//! multiple overlapping tokens from different patterns — resolving that is
//! [`crate::dedup`]'s job, not this one's.
//!
//! ## Key Features
//! - Per-pattern fault isolation: `regex`'s engine doesn't panic in normal
//!   operation, but a pattern evaluated over adversarial input is still
//!   wrapped in `catch_unwind` so one misbehaving pattern can never take
//!   down the rest of the tokenizer, matching the "log and skip, remaining
//!   patterns still run" contract.
//! - Patterns carrying a `reject` callback (state-reporter journal-tail
//!   exclusion, state-code Model/Uniform exclusion) are filtered before
//!   their matches become tokens.

use crate::model::{CleanSpan, Diagnostic, DiagnosticKind, Stage, Token};
use crate::patterns::Pattern;
use std::panic::AssertUnwindSafe;

/// Runs every pattern over `cleaned_text`, returning tokens sorted by
/// ascending `cleanStart`. Pattern failures are appended to `diagnostics`
/// rather than aborting the scan.
pub fn tokenize(cleaned_text: &str, patterns: &[Pattern], diagnostics: &mut Vec<Diagnostic>) -> Vec<Token> {
    let mut tokens = Vec::new();

    for pattern in patterns {
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
            pattern.regex.find_iter(cleaned_text).collect::<Vec<_>>()
        }));

        let matches = match outcome {
            Ok(matches) => matches,
            Err(_) => {
                tracing::warn!(pattern = pattern.id, "pattern execution failed, skipping");
                diagnostics.push(Diagnostic {
                    stage: Stage::Tokenizer,
                    kind: DiagnosticKind::PatternExecutionFailure,
                    detail: format!("pattern `{}` failed to execute and was skipped", pattern.id),
                });
                continue;
            }
        };

        for m in matches {
            if let Some(reject) = pattern.reject {
                if reject(cleaned_text, m.start(), m.end()) {
                    continue;
                }
            }

            tokens.push(Token {
                text: m.as_str().to_string(),
                span: CleanSpan { start: m.start(), end: m.end() },
                kind: pattern.kind,
                pattern_id: pattern.id,
            });
        }
    }

    tokens.sort_by_key(|t| t.span.start);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::REGISTRY;

    #[test]
    fn collects_tokens_from_multiple_patterns_sorted_by_start() {
        let text = "See Smith v. Doe, 500 F.2d 123 (9th Cir. 2020). 42 U.S.C. \u{a7} 1983.";
        let mut diagnostics = Vec::new();
        let tokens = tokenize(text, &REGISTRY, &mut diagnostics);
        assert!(tokens.windows(2).all(|w| w[0].span.start <= w[1].span.start));
        assert!(tokens.iter().any(|t| t.pattern_id == "case-federal-reporter"));
        assert!(tokens.iter().any(|t| t.pattern_id == "statute-usc"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn parallel_cite_yields_tokens_from_two_distinct_case_patterns() {
        let text = "Roe v. Wade, 410 U.S. 113, 93 S. Ct. 705 (1973).";
        let mut diagnostics = Vec::new();
        let tokens = tokenize(text, &REGISTRY, &mut diagnostics);
        let supreme_court_hits = tokens.iter().filter(|t| t.pattern_id == "case-supreme-court").count();
        assert_eq!(supreme_court_hits, 1);
        let federal_reporter_hits = tokens.iter().filter(|t| t.pattern_id == "case-federal-reporter").count();
        assert_eq!(federal_reporter_hits, 1);
    }
}
