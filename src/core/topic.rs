//! Thread title parsing and formatting.
//!
//! Help threads are named `"<topic> (<id>)"` so the author's id survives
//! renames and shows up in `openthreads`.

use regex::Regex;
use std::sync::LazyLock;

/// Discord's maximum thread name length, in characters.
pub const THREAD_NAME_LIMIT: usize = 100;

#[allow(clippy::expect_used)] // literal pattern
static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<topic>.+) \((?<id>\d{18,21})\)$").expect("valid thread title regex")
});

/// A thread name split into its topic and embedded id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTitle<'a> {
    /// Everything before the id suffix, or the whole name
    pub topic: &'a str,
    /// The 18-21 digit id, when present
    pub id: Option<u64>,
}

/// Splits a thread name into topic and id. Names that do not follow the
/// pattern come back whole with no id.
#[must_use]
pub fn parse_title(name: &str) -> ParsedTitle<'_> {
    TITLE_PATTERN
        .captures(name)
        .and_then(|caps| {
            let topic = caps.name("topic")?.as_str();
            let id = caps.name("id")?.as_str().parse::<u64>().ok()?;
            Some(ParsedTitle {
                topic,
                id: Some(id),
            })
        })
        .unwrap_or(ParsedTitle {
            topic: name,
            id: None,
        })
}

/// Builds `"<topic> (<id>)"`, shortening the topic so the whole name fits in
/// [`THREAD_NAME_LIMIT`] without losing the id.
#[must_use]
pub fn format_title(topic: &str, id: Option<u64>) -> String {
    let suffix = id.map(|id| format!(" ({id})")).unwrap_or_default();
    let budget = THREAD_NAME_LIMIT.saturating_sub(suffix.chars().count());
    let topic = topic.trim();
    let topic = match topic.char_indices().nth(budget) {
        Some((cut, _)) => topic[..cut].trim_end(),
        None => topic,
    };
    format!("{topic}{suffix}")
}

/// Name for a freshly created thread, e.g. `"Python help (123)"`.
#[must_use]
pub fn new_thread_title(category_label: &str, requester: u64) -> String {
    format_title(&format!("{category_label} help"), Some(requester))
}
