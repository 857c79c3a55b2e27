//! Detects comma-separated case-citation chains sharing a trailing
//! parenthetical and, once those tokens have been extracted into citations,
//! stamps the resulting group with a shared `groupId` and a `parallelCitations`
//! array on the primary.

use crate::config::ParallelDetectorConfig;
use crate::model::{Citation, CitationType, ParallelCitationInfo, Token};

/// A detected group, given as the `cleanStart` offsets of its member tokens
/// in source order. The first element is the primary.
pub type Group = Vec<usize>;

/// Scans the deduplicated token list for parallel-citation chains. Pure
/// function of the tokens and the surrounding cleaned text; singletons are
/// never returned since they carry no `groupId`.
pub fn detect_groups(tokens: &[Token], cleaned_text: &str, config: &ParallelDetectorConfig) -> Vec<Group> {
    let case_tokens: Vec<&Token> = tokens.iter().filter(|t| t.kind == CitationType::Case).collect();
    let mut groups = Vec::new();
    let mut i = 0;

    while i < case_tokens.len() {
        let mut chain = vec![i];
        let mut cur = i;

        while cur + 1 < case_tokens.len() && is_secondary(case_tokens[cur], case_tokens[cur + 1], cleaned_text, config) {
            chain.push(cur + 1);
            cur += 1;
        }

        if chain.len() >= 2 {
            let last = case_tokens[*chain.last().unwrap()];
            if has_trailing_parenthetical(cleaned_text, last.span.end) {
                groups.push(chain.iter().map(|&idx| case_tokens[idx].span.start).collect());
                i = cur + 1;
                continue;
            }
        }

        i += 1;
    }

    groups
}

fn is_secondary(a: &Token, b: &Token, text: &str, config: &ParallelDetectorConfig) -> bool {
    if b.span.start < a.span.end {
        return false;
    }
    let between = match text.get(a.span.end..b.span.start) {
        Some(s) => s,
        None => return false,
    };
    if between.len() > config.comma_proximity_chars {
        return false;
    }
    if between.contains(')') {
        return false;
    }
    let has_comma = between.contains(',');
    let only_comma_and_whitespace = between.chars().all(|c| c == ',' || c.is_whitespace());
    has_comma && only_comma_and_whitespace
}

fn has_trailing_parenthetical(text: &str, from: usize) -> bool {
    let window_end = (from + 80).min(text.len());
    let window = match text.get(from..window_end) {
        Some(s) => s,
        None => return false,
    };
    let trimmed = window.trim_start();
    trimmed.starts_with('(') && trimmed.contains(')')
}

/// Stamps `groupId`/`parallelCitations` onto extracted citations, using the
/// `cleanStart` offsets produced by [`detect_groups`] to find each group's
/// members among the (already independently extracted) citation list.
pub fn apply_groups(citations: &mut [Citation], groups: &[Group]) {
    for group in groups {
        let member_indices: Vec<usize> = group
            .iter()
            .filter_map(|&start| {
                citations
                    .iter()
                    .position(|c| matches!(c, Citation::Case(cc) if cc.common.span.clean_start == start))
            })
            .collect();

        if member_indices.len() < 2 {
            continue;
        }

        let primary_idx = member_indices[0];
        let (volume, reporter, page) = match &citations[primary_idx] {
            Citation::Case(cc) => (cc.volume.clone(), cc.reporter.clone(), cc.page.clone()),
            _ => continue,
        };
        let group_id = format!("{volume}-{reporter}-{page}");

        let mut parallel_infos = Vec::with_capacity(member_indices.len() - 1);
        for &idx in &member_indices[1..] {
            if let Citation::Case(cc) = &citations[idx] {
                parallel_infos.push(ParallelCitationInfo {
                    reporter: cc.reporter.clone(),
                    volume: cc.volume.clone(),
                    page: cc.page.clone(),
                    span: cc.common.span,
                });
            }
        }

        for &idx in &member_indices {
            citations[idx].common_mut().group_id = Some(group_id.clone());
        }
        citations[primary_idx].common_mut().parallel_citations = Some(parallel_infos);
    }
}
