//! # Cleaner
//!
//! ## Purpose
//! Normalizes raw text into the "cleaned" view every downstream pipeline
//! stage operates on, while building a [`TransformationMap`] back to the
//! original text. This is the one place in the pipeline where a byte of
//! output can correspond to zero, one, or several bytes of input — every
//! other stage only ever narrows spans it receives, never invents new ones.
//!
//! ## Key Features
//! - HTML tag stripping (a bare `<...>` scanner, not a full parser — the
//!   annotator, not the cleaner, is responsible for HTML-safety on output)
//! - Whitespace-run collapsing
//! - Unicode compatibility normalization for section-sign lookalikes (NFKC)
//! - Curly-quote to straight-quote normalization
//!
//! A single left-to-right scan over the raw text applies every requested
//! step and records a transformation anchor whenever the cumulative
//! clean-to-original offset delta changes, per the contract in the original
//! specification: "anchors must be emitted at every non-identity position
//! boundary."

use crate::config::CleanStep;
use crate::model::TransformationMap;
use unicode_normalization::UnicodeNormalization;

/// Cleans `text` according to `steps`, returning the cleaned text and a map
/// back to original offsets. An empty `steps` slice is identity cleaning.
pub fn clean(text: &str, steps: &[CleanStep]) -> (String, TransformationMap) {
    if steps.is_empty() {
        return (text.to_string(), TransformationMap::identity());
    }

    let strip_html = steps.contains(&CleanStep::StripHtml);
    let collapse_ws = steps.contains(&CleanStep::CollapseWhitespace);
    let normalize_sections = steps.contains(&CleanStep::NormalizeSectionSigns);
    let normalize_quotes = steps.contains(&CleanStep::NormalizeQuotes);

    let mut cleaned = String::with_capacity(text.len());
    let mut anchors: Vec<(usize, usize)> = Vec::new();
    let mut current_delta: Option<isize> = None;
    let mut in_tag = false;
    let mut last_emitted_was_space = false;

    for (orig_offset, ch) in text.char_indices() {
        if strip_html {
            if in_tag {
                if ch == '>' {
                    in_tag = false;
                }
                continue;
            }
            if ch == '<' {
                in_tag = true;
                continue;
            }
        }

        let mut mapped: Vec<char> = vec![ch];

        if normalize_quotes {
            mapped = mapped.into_iter().map(normalize_quote_char).collect();
        }

        if normalize_sections {
            mapped = mapped.into_iter().flat_map(|c| c.nfkc()).collect();
        }

        if collapse_ws {
            let mut next = Vec::with_capacity(mapped.len());
            for c in mapped {
                if c.is_whitespace() {
                    if !last_emitted_was_space {
                        next.push(' ');
                        last_emitted_was_space = true;
                    }
                } else {
                    next.push(c);
                    last_emitted_was_space = false;
                }
            }
            mapped = next;
        }

        for out_ch in mapped {
            let clean_offset = cleaned.len();
            let delta = orig_offset as isize - clean_offset as isize;
            if current_delta != Some(delta) {
                anchors.push((clean_offset, orig_offset));
                current_delta = Some(delta);
            }
            cleaned.push(out_ch);
        }
    }

    let tail_delta = current_delta.unwrap_or(0);
    let map = TransformationMap::from_anchors(anchors, tail_delta)
        .expect("cleaner-built anchors are monotonic by construction");
    (cleaned, map)
}

fn normalize_quote_char(c: char) -> char {
    match c {
        '\u{201C}' | '\u{201D}' | '\u{2033}' => '"',
        '\u{2018}' | '\u{2019}' | '\u{2032}' => '\'',
        other => other,
    }
}
