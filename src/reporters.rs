//! Stand-in for the reporters/journals/courts data files the original
//! specification treats as an opaque, preloaded external service (see
//! `SPEC_FULL.md` §4.6a). A small curated table, built once and shared
//! read-only for the process lifetime, behind the exact synchronous
//! contract the pipeline depends on.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Known reporter abbreviations, mapped to their canonical form. Case
/// citations whose reporter is absent here still extract successfully —
/// presence here only affects the `known_reporter` confidence bonus and
/// `normalize_reporter`'s output.
static KNOWN_REPORTERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("U.S.", "U.S."),
        ("S. Ct.", "S. Ct."),
        ("S.Ct.", "S. Ct."),
        ("L. Ed.", "L. Ed."),
        ("L. Ed. 2d", "L. Ed. 2d"),
        ("F.", "F."),
        ("F.2d", "F.2d"),
        ("F.3d", "F.3d"),
        ("F.4th", "F.4th"),
        ("F. Supp.", "F. Supp."),
        ("F. Supp. 2d", "F. Supp. 2d"),
        ("F. Supp. 3d", "F. Supp. 3d"),
        ("F. App'x", "F. App'x"),
        ("N.E.", "N.E."),
        ("N.E.2d", "N.E.2d"),
        ("N.E.3d", "N.E.3d"),
        ("N.W.", "N.W."),
        ("N.W.2d", "N.W.2d"),
        ("P.", "P."),
        ("P.2d", "P.2d"),
        ("P.3d", "P.3d"),
        ("S.E.", "S.E."),
        ("S.E.2d", "S.E.2d"),
        ("S.W.", "S.W."),
        ("S.W.2d", "S.W.2d"),
        ("S.W.3d", "S.W.3d"),
        ("So.", "So."),
        ("So.2d", "So.2d"),
        ("So.3d", "So.3d"),
        ("A.", "A."),
        ("A.2d", "A.2d"),
        ("A.3d", "A.3d"),
        ("Cal. Rptr.", "Cal. Rptr."),
        ("Cal. Rptr. 2d", "Cal. Rptr. 2d"),
        ("Cal. Rptr. 3d", "Cal. Rptr. 3d"),
    ]
    .into_iter()
    .collect()
});

/// Known law-review / journal name fragments, as they appear inside a
/// journal citation's `name` capture (e.g. `"Harv. L. Rev."`).
static KNOWN_JOURNALS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Harv. L. Rev.",
        "Yale L.J.",
        "Stan. L. Rev.",
        "Colum. L. Rev.",
        "Mich. L. Rev.",
        "Geo. L.J.",
        "Nw. U. L. Rev.",
        "U. Chi. L. Rev.",
        "Va. L. Rev.",
        "Cornell L. Rev.",
    ]
});

/// Court-token → canonical-name mappings. Keys are the raw text a case
/// extractor's forward scan finds inside a trailing parenthetical.
static KNOWN_COURTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("9th Cir.", "9th Cir."),
        ("9th Cir", "9th Cir."),
        ("2d Cir.", "2d Cir."),
        ("1st Cir.", "1st Cir."),
        ("D.C. Cir.", "D.C. Cir."),
        ("Fed. Cir.", "Fed. Cir."),
        ("S.D.N.Y.", "S.D.N.Y."),
        ("N.D. Cal.", "N.D. Cal."),
        ("E.D. Va.", "E.D. Va."),
        ("Cal.", "Cal."),
        ("N.Y.", "N.Y."),
        ("Tex.", "Tex."),
    ]
    .into_iter()
    .collect()
});

/// `isKnownReporter(reporter) → boolean` from the original spec's §6
/// data-service contract.
pub fn is_known_reporter(reporter: &str) -> bool {
    KNOWN_REPORTERS.contains_key(reporter)
}

/// `normalizeReporter(reporter) → string`. Unknown reporters pass through
/// unchanged — normalization is a convenience, not a validation gate.
pub fn normalize_reporter(reporter: &str) -> String {
    KNOWN_REPORTERS.get(reporter).map(|s| s.to_string()).unwrap_or_else(|| reporter.to_string())
}

/// `isKnownJournal(name) → boolean`.
pub fn is_known_journal(name: &str) -> bool {
    KNOWN_JOURNALS.iter().any(|j| *j == name)
}

/// `normalizeCourt(token) → string | null`.
pub fn normalize_court(token: &str) -> Option<String> {
    KNOWN_COURTS.get(token).map(|s| s.to_string())
}
