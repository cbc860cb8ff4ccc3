//! Title hints
//!
//! Best-effort suggestions read from free-text titles such as
//! "Call John tomorrow" or "Review urgent report". The store never applies
//! these on its own; callers decide whether to accept them.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::task::TaskPriority;

/// What a title suggests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleHints {
    /// Title with the hint words removed
    pub clean_title: String,
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
}

fn today_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*\btoday\b\s*").expect("valid regex"))
}

fn tomorrow_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*\btomorrow\b\s*").expect("valid regex"))
}

fn high_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\s*\b(urgent|important|asap)\b\s*").expect("valid regex")
    })
}

fn low_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\s*\b(low priority|sometime)\b\s*").expect("valid regex")
    })
}

/// Read due-date and priority hints from `input`
///
/// "today" wins over "tomorrow"; a high-priority word wins over a low one.
/// Without a priority word `current` is kept.
pub fn suggest(input: &str, current: TaskPriority, today: NaiveDate) -> TitleHints {
    let mut title = input.to_string();
    let mut due_date = None;

    if today_re().is_match(&title) {
        due_date = Some(today);
        title = today_re().replace_all(&title, " ").into_owned();
    } else if tomorrow_re().is_match(&title) {
        due_date = today.succ_opt();
        title = tomorrow_re().replace_all(&title, " ").into_owned();
    }

    let mut priority = current;
    if high_re().is_match(&title) {
        priority = TaskPriority::High;
        title = high_re().replace_all(&title, " ").into_owned();
    } else if low_re().is_match(&title) {
        priority = TaskPriority::Low;
        title = low_re().replace_all(&title, " ").into_owned();
    }

    let trimmed = title.trim_matches(|c: char| c.is_whitespace() || matches!(c, ':' | ',' | '-'));
    let clean_title = if trimmed.is_empty() {
        input.trim().to_string()
    } else {
        trimmed.to_string()
    };

    TitleHints {
        clean_title,
        due_date,
        priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_tomorrow() {
        let hints = suggest("Call John tomorrow", TaskPriority::Medium, day(2024, 2, 28));
        assert_eq!(hints.clean_title, "Call John");
        assert_eq!(hints.due_date, Some(day(2024, 2, 29)));
        assert_eq!(hints.priority, TaskPriority::Medium);
    }

    #[test]
    fn test_urgent_in_the_middle() {
        let hints = suggest("Review urgent report", TaskPriority::Medium, day(2024, 5, 1));
        assert_eq!(hints.clean_title, "Review report");
        assert_eq!(hints.priority, TaskPriority::High);
        assert!(hints.due_date.is_none());
    }

    #[test]
    fn test_leading_label_is_stripped() {
        let hints = suggest("Urgent: Review proposal", TaskPriority::Low, day(2024, 5, 1));
        assert_eq!(hints.clean_title, "Review proposal");
        assert_eq!(hints.priority, TaskPriority::High);
    }

    #[test]
    fn test_today_wins_over_tomorrow() {
        let hints = suggest("today or tomorrow ASAP", TaskPriority::Medium, day(2024, 5, 1));
        assert_eq!(hints.due_date, Some(day(2024, 5, 1)));
        assert_eq!(hints.priority, TaskPriority::High);
    }

    #[test]
    fn test_low_priority() {
        let hints = suggest("Clean garage sometime", TaskPriority::Medium, day(2024, 5, 1));
        assert_eq!(hints.clean_title, "Clean garage");
        assert_eq!(hints.priority, TaskPriority::Low);

        let hints = suggest("low priority: sort photos", TaskPriority::High, day(2024, 5, 1));
        assert_eq!(hints.clean_title, "sort photos");
        assert_eq!(hints.priority, TaskPriority::Low);
    }

    #[test]
    fn test_words_inside_other_words_are_ignored() {
        let hints = suggest("Read todays paper", TaskPriority::Medium, day(2024, 5, 1));
        assert_eq!(hints.clean_title, "Read todays paper");
        assert!(hints.due_date.is_none());
    }

    #[test]
    fn test_title_of_only_hints_is_kept() {
        let hints = suggest("urgent", TaskPriority::Medium, day(2024, 5, 1));
        assert_eq!(hints.clean_title, "urgent");
        assert_eq!(hints.priority, TaskPriority::High);
    }

    #[test]
    fn test_no_hints_keeps_current_priority() {
        let hints = suggest("  Water plants ", TaskPriority::Low, day(2024, 5, 1));
        assert_eq!(hints.clean_title, "Water plants");
        assert_eq!(hints.priority, TaskPriority::Low);
        assert!(hints.due_date.is_none());
    }
}
