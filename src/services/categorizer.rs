//! Deterministic type-tag and priority derivation.
//!
//! Both functions are pure and run on every read, so a change to the patterns
//! here reclassifies stored tasks the next time they are displayed.

use crate::models::task::{Priority, TypeTag};
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

// Checked top to bottom; the first group with any match decides the tag.
static TYPE_PATTERNS: LazyLock<Vec<(TypeTag, Regex)>> = LazyLock::new(|| {
    vec![
        (
            TypeTag::Homework,
            Regex::new(
                r"(?i)\b(homework|hw|worksheets?|assignments?|problem\s+sets?|psets?|readings?|essays?)\b",
            )
            .expect("Invalid regex"),
        ),
        (
            TypeTag::Quiz,
            Regex::new(r"(?i)\b(quiz|quizzes|pop\s+quiz)\b").expect("Invalid regex"),
        ),
        (
            TypeTag::Lab,
            Regex::new(r"(?i)\b(labs?|lab\s+reports?|experiments?|practicals?)\b")
                .expect("Invalid regex"),
        ),
        (
            TypeTag::Test,
            Regex::new(r"(?i)\b(tests?|exams?|midterms?|finals?|ap\s+exam|sat|act)\b")
                .expect("Invalid regex"),
        ),
        (
            TypeTag::Project,
            Regex::new(r"(?i)\b(projects?|presentations?|posters?|research\s+papers?|slides?)\b")
                .expect("Invalid regex"),
        ),
        (
            TypeTag::Event,
            Regex::new(
                r"(?i)\b(meetings?|events?|party|games?|practice|club|appointments?|rehearsals?|concerts?|tryouts?|field\s+trip)\b",
            )
            .expect("Invalid regex"),
        ),
        (
            TypeTag::Reminder,
            Regex::new(
                r"(?i)\b(remind(er)?|remember|don'?t\s+forget|buy|call|email|text|pick\s+up|bring|sign)\b",
            )
            .expect("Invalid regex"),
        ),
    ]
});

static URGENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(urgent|asap|important|high\s+priority)\b").expect("Invalid regex")
});

/// Classify a task without the language model.
///
/// Raw text, description and assignment name are searched together.
pub fn categorize(raw: &str, assignment_name: Option<&str>, description: Option<&str>) -> TypeTag {
    let haystack = [Some(raw), description, assignment_name]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    TYPE_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&haystack))
        .map(|(tag, _)| *tag)
        .unwrap_or(TypeTag::Other)
}

/// Derive display priority relative to `today`.
///
/// - High: urgency keyword in the raw text, or due within 2 days (overdue included)
/// - Medium: due within 7 days, or a Test/Quiz/Project
/// - Low: everything else
pub fn derive_priority(
    type_tag: TypeTag,
    due: Option<DateTime<Utc>>,
    raw: &str,
    today: NaiveDate,
) -> Priority {
    if URGENT_PATTERN.is_match(raw) {
        return Priority::High;
    }

    let days_left = due.map(|d| (d.date_naive() - today).num_days());
    match days_left {
        Some(days) if days <= 2 => Priority::High,
        Some(days) if days <= 7 => Priority::Medium,
        _ if matches!(type_tag, TypeTag::Test | TypeTag::Quiz | TypeTag::Project) => {
            Priority::Medium
        }
        _ => Priority::Low,
    }
}
