//! # Resolver
//!
//! ## Purpose
//! Links short-form citations (`Id.`, `supra`, short-form case cites) to the
//! antecedent full citation they refer back to. Runs once, after extraction,
//! over citations already in strictly ascending `originalStart` order —
//! this is the only stage that needs to see the whole document's citation
//! list at once, since an antecedent must have been seen already.
//!
//! ## Key Features
//! - Scope boundaries (`none` / `paragraph` / `section` / `footnote`) are
//!   precomputed once as an `offset → zone id` step function over the
//!   source text, per the Design Note "Scope boundaries as a precomputed
//!   mapping" — not recomputed per resolution query.
//! - `Id.` resolution follows the chain-following state machine from the
//!   original spec verbatim: an `Id.` whose antecedent is itself an `Id.`
//!   resolves through to *that* citation's antecedent, not to the
//!   intermediate `Id.`.
//! - `supra` resolution tries an exact normalized-party match first, then
//!   falls back to Levenshtein distance (`strsim::levenshtein`) bounded by
//!   `ResolverConfig::supra_max_distance`, breaking ties by recency.
//! - Resolution failures are never fatal: an unresolved short-form citation
//!   simply keeps `resolution: None` and is recorded as a
//!   [`crate::model::Diagnostic`].

use crate::config::{ResolverConfig, ScopeStrategy};
use crate::model::{Citation, Diagnostic, DiagnosticKind, Resolution, Stage};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static DEFAULT_PARAGRAPH_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Precomputed `citationIndex → zoneId` mapping. Zone ids increase
/// monotonically with source position; two citations share a zone iff no
/// boundary match's end falls between them.
struct ScopeMap {
    /// Byte offsets (in the same text the citations' `original_start` is
    /// measured against) of each boundary match's end. `None` under `none`
    /// scope, in which case every citation is considered in-scope.
    boundaries: Option<Vec<usize>>,
}

impl ScopeMap {
    fn build(text: &str, config: &ResolverConfig) -> Self {
        let boundaries = match config.scope {
            ScopeStrategy::None => None,
            ScopeStrategy::Paragraph => {
                let regex = match &config.boundary_regex {
                    Some(pattern) => Regex::new(pattern).unwrap_or_else(|_| DEFAULT_PARAGRAPH_BOUNDARY.clone()),
                    None => DEFAULT_PARAGRAPH_BOUNDARY.clone(),
                };
                Some(regex.find_iter(text).map(|m| m.end()).collect())
            }
            ScopeStrategy::Section | ScopeStrategy::Footnote => {
                let pattern = config.boundary_regex.as_deref().unwrap_or(r"\n\s*\n");
                let regex = Regex::new(pattern).unwrap_or_else(|_| DEFAULT_PARAGRAPH_BOUNDARY.clone());
                Some(regex.find_iter(text).map(|m| m.end()).collect())
            }
        };
        Self { boundaries }
    }

    fn zone_of(&self, offset: usize) -> usize {
        match &self.boundaries {
            None => 0,
            Some(bounds) => bounds.partition_point(|&b| b <= offset),
        }
    }

    fn same_zone(&self, a: usize, b: usize) -> bool {
        self.boundaries.is_none() || self.zone_of(a) == self.zone_of(b)
    }
}

/// Index of full-citation antecedents seen so far, built incrementally in
/// source order so a citation can only resolve to something that precedes
/// it.
#[derive(Default)]
struct AntecedentIndex {
    by_party: HashMap<String, Vec<usize>>,
    by_volume_reporter_page: HashMap<String, usize>,
    by_volume_reporter: HashMap<String, Vec<usize>>,
}

impl AntecedentIndex {
    fn record(&mut self, index: usize, citation: &Citation) {
        let (plaintiff, defendant) = citation.party_names();
        // Defendant preferred per Bluebook convention, but both are indexed
        // so an exact match on either side succeeds.
        if let Some(defendant) = defendant {
            self.by_party.entry(defendant.to_string()).or_default().push(index);
        }
        if let Some(plaintiff) = plaintiff {
            self.by_party.entry(plaintiff.to_string()).or_default().push(index);
        }

        if let Citation::Case(case) = citation {
            let key = format!("{}-{}-{}", case.volume, case.reporter, case.page);
            self.by_volume_reporter_page.insert(key, index);
            let vr_key = format!("{}-{}", case.volume, case.reporter);
            self.by_volume_reporter.entry(vr_key).or_default().push(index);
        }
    }
}

/// Resolves every short-form citation in `citations` against its
/// antecedents, returning the same list with `resolution` populated where a
/// link was found. `text` is the original source text the citations'
/// `original_start`/`original_end` offsets are measured against.
pub fn resolve(mut citations: Vec<Citation>, text: &str, config: &ResolverConfig, diagnostics: &mut Vec<Diagnostic>) -> Vec<Citation> {
    let scope = ScopeMap::build(text, config);
    let mut index = AntecedentIndex::default();

    for i in 0..citations.len() {
        if citations[i].is_short_form() {
            let resolution = match &citations[i] {
                Citation::Id(_) => resolve_id(&citations, i, &scope),
                Citation::Supra(s) => {
                    let guess = s.antecedent_guess.clone();
                    resolve_supra(&citations, i, &guess, &index, &scope, config)
                }
                Citation::ShortFormCase(c) => {
                    let (volume, reporter, antecedent_guess) = (c.volume.to_string(), c.reporter.clone(), c.antecedent_guess.clone());
                    resolve_short_form_case(&citations, i, &volume, &reporter, antecedent_guess.as_deref(), &index, &scope)
                }
                _ => None,
            };

            match resolution {
                Some(resolved_to) => citations[i].set_resolution(Resolution { resolved_to }),
                None => diagnostics.push(Diagnostic {
                    stage: Stage::Resolver,
                    kind: DiagnosticKind::ResolutionFailure,
                    detail: format!("no antecedent found in scope for citation at index {i}"),
                }),
            }
        }

        if !citations[i].is_short_form() {
            index.record(i, &citations[i]);
        }
    }

    citations
}

/// `Id.` chain-following: start → seekPrev; if prev is `Id.`, goto seekPrev
/// of the prev; if prev is a full citation, resolved; if prev is itself a
/// short form (`supra`/short-form case), resolved to whatever *that*
/// citation resolved to, so the chase always bottoms out at a full citation;
/// if prev crosses a scope boundary or no prev exists, unresolved.
fn resolve_id(citations: &[Citation], index: usize, scope: &ScopeMap) -> Option<usize> {
    let this_offset = citations[index].original_start();
    let mut cursor = index;

    loop {
        if cursor == 0 {
            return None;
        }
        let prev_idx = cursor - 1;
        let prev_offset = citations[prev_idx].original_start();
        if !scope.same_zone(this_offset, prev_offset) {
            return None;
        }

        match &citations[prev_idx] {
            Citation::Id(id) => match id.resolution {
                Some(resolution) => return Some(resolution.resolved_to),
                None => {
                    cursor = prev_idx;
                    continue;
                }
            },
            // A Supra or ShortFormCase is itself a short form: chase through
            // to whatever it resolved to, never to the short form itself,
            // so resolved_to always bottoms out at a full citation.
            Citation::Supra(_) | Citation::ShortFormCase(_) => return citations[prev_idx].resolution().map(|r| r.resolved_to),
            _ => return Some(prev_idx),
        }
    }
}

fn resolve_supra(
    citations: &[Citation],
    index: usize,
    antecedent_guess: &str,
    antecedents: &AntecedentIndex,
    scope: &ScopeMap,
    config: &ResolverConfig,
) -> Option<usize> {
    let this_offset = citations[index].original_start();

    if let Some(candidates) = antecedents.by_party.get(antecedent_guess) {
        if let Some(&exact) = in_scope_candidates(citations, candidates, this_offset, scope).last() {
            return Some(exact);
        }
    }

    let mut best: Option<(usize, usize)> = None; // (distance, index)
    for (name, candidates) in &antecedents.by_party {
        let distance = strsim::levenshtein(name, antecedent_guess);
        if distance > config.supra_max_distance {
            continue;
        }
        for candidate_idx in in_scope_candidates(citations, candidates, this_offset, scope) {
            let replace = match best {
                None => true,
                Some((best_distance, best_idx)) => distance < best_distance || (distance == best_distance && candidate_idx > best_idx),
            };
            if replace {
                best = Some((distance, candidate_idx));
            }
        }
    }

    best.map(|(_, idx)| idx)
}

fn resolve_short_form_case(
    citations: &[Citation],
    index: usize,
    volume: &str,
    reporter: &str,
    antecedent_guess: Option<&str>,
    antecedents: &AntecedentIndex,
    scope: &ScopeMap,
) -> Option<usize> {
    let this_offset = citations[index].original_start();
    let key = format!("{volume}-{reporter}");
    let candidates = antecedents.by_volume_reporter.get(&key)?;
    let in_scope = in_scope_candidates(citations, candidates, this_offset, scope);

    if let Some(guess) = antecedent_guess {
        if let Some(&matched) = in_scope.iter().rev().find(|&&idx| {
            let (plaintiff, defendant) = citations[idx].party_names();
            plaintiff == Some(guess) || defendant == Some(guess)
        }) {
            return Some(matched);
        }
    }

    in_scope.last().copied()
}

/// Filters `candidates` (already in ascending index / source order) down to
/// those that precede `this_offset` and share its scope zone.
fn in_scope_candidates(citations: &[Citation], candidates: &[usize], this_offset: usize, scope: &ScopeMap) -> Vec<usize> {
    candidates
        .iter()
        .copied()
        .filter(|&idx| {
            let candidate_offset = citations[idx].original_start();
            candidate_offset <= this_offset && scope.same_zone(this_offset, candidate_offset)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner;
    use crate::extract;
    use crate::patterns::REGISTRY;
    use crate::tokenizer;
    use crate::config::PipelineConfig;

    fn run_pipeline(text: &str) -> Vec<Citation> {
        let config = PipelineConfig::default();
        let (cleaned, map) = cleaner::clean(text, &config.clean_steps());
        let mut diagnostics = Vec::new();
        let tokens = tokenizer::tokenize(&cleaned, &REGISTRY, &mut diagnostics);
        let tokens = crate::dedup::dedup(tokens, &cleaned);
        extract::extract_all(&tokens, &cleaned, &map, &config, &mut diagnostics)
    }

    #[test]
    fn id_resolves_to_preceding_full_citation() {
        let text = "See Smith v. Jones, 500 F.2d 100 (1974). Id. at 105.";
        let citations = run_pipeline(text);
        let config = ResolverConfig::default();
        let mut diagnostics = Vec::new();
        let resolved = resolve(citations, text, &config, &mut diagnostics);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[1].resolution().unwrap().resolved_to, 0);
    }

    #[test]
    fn id_chains_through_intermediate_id() {
        let text = "Smith v. Jones, 500 F.2d 100 (1974). Id. at 101. Id. at 102.";
        let citations = run_pipeline(text);
        let config = ResolverConfig::default();
        let mut diagnostics = Vec::new();
        let resolved = resolve(citations, text, &config, &mut diagnostics);

        assert_eq!(resolved[2].resolution().unwrap().resolved_to, 0);
    }

    #[test]
    fn supra_resolves_via_exact_party_match() {
        let text = "Smith v. Doe, 500 F.2d 100 (1974). Later, Smith, supra, held otherwise.";
        let citations = run_pipeline(text);
        let config = ResolverConfig::default();
        let mut diagnostics = Vec::new();
        let resolved = resolve(citations, text, &config, &mut diagnostics);

        let supra = resolved.iter().find(|c| matches!(c, Citation::Supra(_))).unwrap();
        assert_eq!(supra.resolution().unwrap().resolved_to, 0);
    }

    #[test]
    fn id_after_supra_chains_through_to_the_full_citation() {
        let text = "Smith v. Doe, 500 F.2d 100 (1974). Smith, supra, held otherwise. Id. at 105.";
        let citations = run_pipeline(text);
        let config = ResolverConfig::default();
        let mut diagnostics = Vec::new();
        let resolved = resolve(citations, text, &config, &mut diagnostics);

        let id_index = resolved.iter().position(|c| matches!(c, Citation::Id(_))).unwrap();
        let resolved_to = resolved[id_index].resolution().unwrap().resolved_to;
        assert!(!resolved[resolved_to].is_short_form());
        assert_eq!(resolved_to, 0);
    }

    #[test]
    fn unresolved_short_form_keeps_resolution_none() {
        let text = "Id. at 105.";
        let citations = run_pipeline(text);
        let config = ResolverConfig::default();
        let mut diagnostics = Vec::new();
        let resolved = resolve(citations, text, &config, &mut diagnostics);

        assert!(resolved[0].resolution().is_none());
        assert_eq!(diagnostics.len(), 1);
    }
}
