//! Canonical display labels for raw circulation statuses.
//!
//! Lookup runs in two stages, first match wins:
//! 1. an ordered table of exact status sets,
//! 2. an ordered list of substring patterns, most specific first.
//!
//! A status that matches neither is returned unchanged.
//!
//! # Examples
//!
//! ```
//! use marc_liberator::status_label;
//!
//! assert_eq!(status_label("Not charged"), "Available");
//! assert_eq!(status_label("Overdue"), "Checked out");
//! assert_eq!(status_label("Something On-site - Sorta"), "See front desk");
//! assert_eq!(status_label("Cataloging"), "Cataloging");
//! ```

use lazy_static::lazy_static;
use regex::Regex;

/// Exact-match table. Order is precedence.
const EXACT_LABELS: &[(&[&str], &str)] = &[
    (&["Lost--system applied"], "Long overdue"),
    (&["Lost--library applied"], "Lost"),
    (&["Not charged", "On shelf"], "Available"),
    (&["Discharged"], "Returned"),
    (&["In transit discharged"], "In transit"),
    (&["In process", "On-site - in process"], "In process"),
    (
        &[
            "Charged",
            "Renewed",
            "Overdue",
            "On hold",
            "In transit",
            "In transit on hold",
            "At bindery",
            "Remote storage request",
            "Hold request",
            "Recall request",
        ],
        "Checked out",
    ),
    (&["Missing", "Claims returned", "Withdrawn"], "Missing"),
];

lazy_static! {
    /// Pattern fallbacks. `On-site - ` must be tried before the bare `On-site`.
    static ref PATTERN_LABELS: Vec<(Regex, &'static str)> = [
        ("On-site - ", "See front desk"),
        ("On-site", "On-site access"),
        ("Order received", "Order received"),
        ("Pending order", "Pending order"),
        ("On-order", "On-order"),
    ]
    .iter()
    .map(|(pattern, label)| (Regex::new(&regex::escape(pattern)).unwrap(), *label))
    .collect();
}

/// Map a raw circulation status to its canonical display label.
///
/// Never fails: unmatched statuses come back as-is.
#[must_use]
pub fn status_label(raw_status: &str) -> &str {
    let label: Option<&str> = exact_label(raw_status).or_else(|| pattern_label(raw_status));
    label.unwrap_or(raw_status)
}

fn exact_label(raw_status: &str) -> Option<&'static str> {
    EXACT_LABELS
        .iter()
        .find(|(statuses, _)| statuses.contains(&raw_status))
        .map(|(_, label)| *label)
}

fn pattern_label(raw_status: &str) -> Option<&'static str> {
    PATTERN_LABELS
        .iter()
        .find(|(pattern, _)| pattern.is_match(raw_status))
        .map(|(_, label)| *label)
}
