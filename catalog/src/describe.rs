//! Display strings for course cards.
//!
//! Dates are rendered in Russian with genitive month names, short
//! descriptions are padded with subject-specific text, and badges are
//! resolved through the taxonomy lookups.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate};
use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::{
    lookup::LookupTable,
    records::{Course, Difficulty, Subject},
};

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Descriptions longer than this are shown as-is.
pub const SHORT_DESCRIPTION_LIMIT: usize = 150;

/// Appended to short descriptions when the subject has no text of its own.
pub const DEFAULT_DESCRIPTION_TAIL: &str = "Программа разработана ведущими специалистами с учетом современных требований отрасли. Участники получат актуальные знания и ценные практические навыки.";

/// `"2024-03-15"` → `"15 марта 2024"`.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps; anything else, including
/// the empty string, formats as `""`.
pub fn format_date(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        return String::new();
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.date_naive()));
    match date {
        Some(date) => format!(
            "{} {} {}",
            date.day(),
            MONTHS_GENITIVE[date.month0() as usize],
            date.year()
        ),
        None => {
            debug!("unparsable date `{input}`");
            String::new()
        }
    }
}

/// Pad a short course description.
///
/// Descriptions over [`SHORT_DESCRIPTION_LIMIT`] characters are returned
/// unchanged. Shorter ones get terminal punctuation and are followed by the
/// primary subject's `additional_description`, or by
/// [`DEFAULT_DESCRIPTION_TAIL`] when it has none.
pub fn enhanced_description(primary_subject: Option<&Subject>, description: &str) -> String {
    if description.chars().count() > SHORT_DESCRIPTION_LIMIT {
        return description.to_string();
    }

    let mut text = description.to_string();
    if !text.is_empty() && !text.ends_with(['.', '!', '?']) {
        text.push('.');
    }

    let tail = match primary_subject {
        Some(subject) if !subject.additional_description.is_empty() => {
            subject.additional_description.join(" ")
        }
        _ => DEFAULT_DESCRIPTION_TAIL.to_string(),
    };

    if text.is_empty() {
        tail
    } else {
        format!("{text} {tail}")
    }
}

/// Upper-case the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectBadge {
    pub label: String,
    pub color: String,
}

/// Everything a course card shows, resolved to plain strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCard {
    pub title: String,
    pub organization: String,
    /// `"{start} — {end}"`, only when both dates format.
    pub dates: Option<String>,
    /// `"{n} класс"` per grade.
    pub grades: Vec<String>,
    /// `"Уровень: {label}"` when the difficulty is known.
    pub difficulty: Option<String>,
    /// Known subjects only, labels capitalised.
    pub subjects: Vec<SubjectBadge>,
    pub description: Option<String>,
    pub url: String,
}

impl CourseCard {
    pub fn new(
        course: &Course,
        subjects: &LookupTable<Subject>,
        difficulties: &LookupTable<Difficulty>,
    ) -> Self {
        let start = format_date(&course.start_date);
        let end = format_date(&course.end_date);
        let dates = (!start.is_empty() && !end.is_empty()).then(|| format!("{start} — {end}"));

        let difficulty = course
            .difficulty
            .as_deref()
            .and_then(|key| difficulties.get(key))
            .filter(|d| !d.label.is_empty())
            .map(|d| format!("Уровень: {}", d.label));

        let badges = course
            .subjects
            .iter()
            .filter_map(|key| subjects.get(key))
            .filter(|s| !s.label.is_empty())
            .map(|s| SubjectBadge {
                label: capitalize(&s.label),
                color: s.color.clone(),
            })
            .collect();

        let primary = course.subjects.first().and_then(|key| subjects.get(key));
        let description = (!course.description.is_empty())
            .then(|| enhanced_description(primary, &course.description));

        Self {
            title: course.title.clone(),
            organization: course.organization.clone(),
            dates,
            grades: course.grades.iter().map(|g| format!("{g} класс")).collect(),
            difficulty,
            subjects: badges,
            description,
            url: course.url.clone(),
        }
    }
}

/// `#rrggbb` → RGB, for terminal swatches.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// `text` in the record colour when it parses, plain otherwise.
pub fn paint(text: &str, color: &str) -> ColoredString {
    match parse_hex_color(color) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

impl fmt::Display for CourseCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title.bold().blue())?;
        if !self.organization.is_empty() {
            writeln!(f, "  {}", self.organization.dimmed())?;
        }
        if let Some(dates) = &self.dates {
            writeln!(f, "  {dates}")?;
        }
        let mut badges: Vec<String> = self.grades.iter().map(|g| format!("[{g}]")).collect();
        if let Some(difficulty) = &self.difficulty {
            badges.push(format!("[{}]", difficulty.cyan()));
        }
        if !badges.is_empty() {
            writeln!(f, "  {}", badges.join(" "))?;
        }
        if let Some(description) = &self.description {
            writeln!(f, "  {description}")?;
        }
        if !self.subjects.is_empty() {
            let subjects: Vec<String> = self
                .subjects
                .iter()
                .map(|s| format!("#{}", paint(&s.label, &s.color)))
                .collect();
            writeln!(f, "  {}", subjects.join(" "))?;
        }
        if !self.url.is_empty() {
            writeln!(f, "  {}", self.url.underline())?;
        }
        Ok(())
    }
}
