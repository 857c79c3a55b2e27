//! # Annotator
//!
//! ## Purpose
//! Re-emits a document with user-supplied markup wrapped around each
//! citation's span, snapping spans out of enclosing HTML tags so an
//! annotation can never split one open. The only stage that runs back to
//! front over its input — later insertions happen first so earlier,
//! not-yet-processed spans stay valid offsets into the string being built.
//!
//! ## Key Features
//! - Snapping: if a span's start falls strictly inside a `<...>` tag, it is
//!   moved out to the tag's `<`; if its end falls inside one, it is moved
//!   past the tag's `>`. A span collapsed to empty by snapping is recorded
//!   in `skipped` instead of annotated.
//! - Two substitution modes: a `{before, after}` template (with auto-escape
//!   on by default) or a caller-supplied callback receiving the citation and
//!   ±30 characters of surrounding context, whose return value is spliced in
//!   verbatim.
//! - `position_map` is computed in a single ascending pass over surviving
//!   citations before any splicing happens, so inserted-length deltas from
//!   earlier citations are already accounted for — independent of the
//!   back-to-front order the actual string mutation uses.

use crate::model::Citation;
use std::collections::HashMap;

/// How each citation's matched text is replaced in the output.
pub enum AnnotateMode {
    Template { before: String, after: String },
    Callback(Box<dyn Fn(&Citation, &str) -> String>),
}

pub struct AnnotateOptions {
    /// Annotate the cleaned text instead of the original. Cleaned text has
    /// already had HTML stripped, so span snapping is skipped in this mode.
    pub use_clean_text: bool,
    /// Escape `& < > " ' /` in template mode. Ignored in callback mode,
    /// whose return value is inserted verbatim.
    pub auto_escape: bool,
    pub mode: AnnotateMode,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            use_clean_text: false,
            auto_escape: true,
            mode: AnnotateMode::Template { before: String::new(), after: String::new() },
        }
    }
}

pub struct AnnotationResult {
    pub text: String,
    /// Citation index → start offset of its rendered wrapper in `text`.
    pub position_map: HashMap<usize, usize>,
    /// Citation indices whose span could not be safely snapped out of an
    /// enclosing HTML tag and were therefore left unannotated.
    pub skipped: Vec<usize>,
}

struct PlannedInsertion {
    citation_index: usize,
    start: usize,
    end: usize,
    wrapper: String,
}

/// Annotates `text` with `citations`, which must be in ascending
/// `originalStart` (or `cleanStart`, under `use_clean_text`) order — the
/// same order [`crate::api::extract_citations`] returns.
pub fn annotate(text: &str, citations: &[Citation], options: AnnotateOptions) -> AnnotationResult {
    let mut order: Vec<usize> = (0..citations.len()).collect();
    order.sort_by_key(|&i| span_bounds(&citations[i], options.use_clean_text).0);

    let mut planned: Vec<PlannedInsertion> = Vec::with_capacity(citations.len());
    let mut skipped = Vec::new();

    for citation_index in order {
        let citation = &citations[citation_index];
        let (raw_start, raw_end) = span_bounds(citation, options.use_clean_text);

        let bounds = if options.use_clean_text {
            Some((raw_start, raw_end))
        } else {
            snap_out_of_html(text, raw_start, raw_end)
        };

        let (start, end) = match bounds {
            Some(b) if b.0 < b.1 => b,
            _ => {
                skipped.push(citation_index);
                continue;
            }
        };

        let matched = &text[start..end];
        let wrapper = match &options.mode {
            AnnotateMode::Template { before, after } => {
                let body = if options.auto_escape { escape_html(matched) } else { matched.to_string() };
                format!("{before}{body}{after}")
            }
            AnnotateMode::Callback(callback) => {
                let context_start = start.saturating_sub(30);
                let context_end = (end + 30).min(text.len());
                let context = &text[floor_char_boundary(text, context_start)..ceil_char_boundary(text, context_end)];
                callback(citation, context)
            }
        };

        planned.push(PlannedInsertion { citation_index, start, end, wrapper });
    }

    // Ascending pass: compute each surviving citation's final position,
    // accounting for every earlier insertion's length delta.
    planned.sort_by_key(|p| p.start);
    let mut position_map = HashMap::with_capacity(planned.len());
    let mut delta: isize = 0;
    for p in &planned {
        let final_start = (p.start as isize + delta) as usize;
        position_map.insert(p.citation_index, final_start);
        delta += p.wrapper.len() as isize - (p.end - p.start) as isize;
    }

    // Back-to-front pass: splice into the text. Original offsets remain
    // valid references throughout since every mutation happens strictly to
    // the right of spans not yet processed.
    let mut output = text.to_string();
    for p in planned.iter().rev() {
        output.replace_range(p.start..p.end, &p.wrapper);
    }

    skipped.sort_unstable();
    AnnotationResult { text: output, position_map, skipped }
}

fn span_bounds(citation: &Citation, use_clean_text: bool) -> (usize, usize) {
    let span = citation.common().span;
    if use_clean_text {
        (span.clean_start, span.clean_end)
    } else {
        (span.original_start, span.original_end)
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn ceil_char_boundary(text: &str, mut offset: usize) -> usize {
    while offset < text.len() && !text.is_char_boundary(offset) {
        offset += 1;
    }
    offset
}

/// If `pos` falls strictly inside a `<...>` tag, returns that tag's `(<`
/// index, `>` index + 1)`. Otherwise `None`.
fn enclosing_tag(text: &str, pos: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let before = &bytes[..pos];
    let last_open = before.iter().rposition(|&b| b == b'<');
    let last_close = before.iter().rposition(|&b| b == b'>');

    let open = match (last_open, last_close) {
        (Some(open), Some(close)) if open > close => open,
        (Some(open), None) => open,
        _ => return None,
    };

    let close_rel = bytes[pos..].iter().position(|&b| b == b'>')?;
    Some((open, pos + close_rel + 1))
}

/// Snaps `(start, end)` out of any enclosing HTML tag(s). Returns `None` if
/// the span collapses to empty after snapping.
fn snap_out_of_html(text: &str, mut start: usize, mut end: usize) -> Option<(usize, usize)> {
    if let Some((tag_start, _)) = enclosing_tag(text, start) {
        start = tag_start;
    }
    if let Some((_, tag_end)) = enclosing_tag(text, end) {
        end = tag_end;
    }
    if start >= end {
        None
    } else {
        Some((start, end))
    }
}

/// Escapes `& < > " ' /` to named/numeric HTML entities.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CitationCommon, CitationType, IdCitation, Span};

    fn citation_at(start: usize, end: usize) -> Citation {
        let span = Span::new(start, end, start, end);
        let mut common = CitationCommon::new("x", span);
        common.confidence = 1.0;
        Citation::Id(IdCitation { common, resolution: None })
    }

    #[test]
    fn template_mode_wraps_and_escapes_by_default() {
        let text = "See <script>X</script>";
        let start = text.find("<script>X</script>").unwrap();
        let end = start + "<script>X</script>".len();
        let citations = vec![citation_at(start, end)];
        let options = AnnotateOptions {
            mode: AnnotateMode::Template { before: "<m>".to_string(), after: "</m>".to_string() },
            ..AnnotateOptions::default()
        };
        let result = annotate(text, &citations, options);
        assert!(result.text.contains("&lt;script&gt;"));
        assert!(!result.text.contains("<script>"));
    }

    #[test]
    fn identity_template_with_no_escape_is_idempotent() {
        let text = "See Smith v. Doe, 500 F.2d 123 (9th Cir. 2020).";
        let start = text.find("500").unwrap();
        let end = start + "500 F.2d 123".len();
        let citations = vec![citation_at(start, end)];
        let options = AnnotateOptions {
            auto_escape: false,
            mode: AnnotateMode::Template { before: String::new(), after: String::new() },
            ..AnnotateOptions::default()
        };
        let result = annotate(text, &citations, options);
        assert_eq!(result.text, text);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn snaps_span_out_of_enclosing_anchor_tag() {
        let text = "145, <a href=\"#p410\">*410</a>11 N. H. 459";
        // start falls inside the opening tag's attributes; end falls inside
        // the closing tag's markup — both must snap out to the tag edges.
        let start = text.find("href").unwrap();
        let close_tag = text.find("</a>").unwrap();
        let end = close_tag + 2; // inside "</a>", between '<' and '>'
        let citations = vec![citation_at(start, end)];
        let options = AnnotateOptions {
            auto_escape: false,
            mode: AnnotateMode::Template { before: "[".to_string(), after: "]".to_string() },
            ..AnnotateOptions::default()
        };
        let result = annotate(text, &citations, options);
        assert!(result.skipped.is_empty());
        assert!(result.text.contains("[<a href=\"#p410\">*410</a>]"));
    }

    #[test]
    fn zero_length_span_is_recorded_as_skipped() {
        let text = "x <b>y</b> z";
        let citations = vec![citation_at(5, 5)];
        let result = annotate(text, &citations, AnnotateOptions::default());
        assert_eq!(result.skipped, vec![0]);
    }
}
