/// Core types used throughout the domain layer
///
/// This module defines the fundamental types like Category, Frequency and
/// HabitId, plus the calendar-date parsing used at every boundary where
/// dates arrive as `YYYY-MM-DD` strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{Datelike, NaiveDate, Weekday};
use uuid::Uuid;

use crate::domain::DomainError;

/// Calendar date format used for completion dates and tool parameters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety when ids are passed
/// between the storage layer and the tools.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Categories for organizing habits into different life areas
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    /// Health-related habits (exercise, diet, sleep)
    #[default]
    Health,
    /// Work and learning habits (studying, skill building)
    Productivity,
    /// Relationship and communication habits
    Social,
    /// Creative pursuits (art, writing, music)
    Creative,
    /// Meditation, reflection, gratitude practices
    Mindfulness,
    /// Money management and financial habits
    Financial,
    /// Home maintenance and organization
    Household,
    /// Personal growth and self-care
    Personal,
    /// User-defined category with custom name
    Custom(String),
}

impl Category {
    /// Get the display name for this category
    pub fn display_name(&self) -> &str {
        match self {
            Category::Health => "Health",
            Category::Productivity => "Productivity",
            Category::Social => "Social",
            Category::Creative => "Creative",
            Category::Mindfulness => "Mindfulness",
            Category::Financial => "Financial",
            Category::Household => "Household",
            Category::Personal => "Personal",
            Category::Custom(name) => name,
        }
    }

    /// Stable lowercase key, as stored in the database and accepted by the tools
    pub fn key(&self) -> String {
        match self {
            Category::Health => "health".to_string(),
            Category::Productivity => "productivity".to_string(),
            Category::Social => "social".to_string(),
            Category::Creative => "creative".to_string(),
            Category::Mindfulness => "mindfulness".to_string(),
            Category::Financial => "financial".to_string(),
            Category::Household => "household".to_string(),
            Category::Personal => "personal".to_string(),
            Category::Custom(name) => format!("custom:{}", name),
        }
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(name) = trimmed.strip_prefix("custom:") {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::Validation {
                    message: "Custom category name cannot be empty".to_string(),
                });
            }
            return Ok(Category::Custom(name.to_string()));
        }

        match trimmed.to_lowercase().as_str() {
            "health" => Ok(Category::Health),
            "productivity" => Ok(Category::Productivity),
            "social" => Ok(Category::Social),
            "creative" => Ok(Category::Creative),
            "mindfulness" => Ok(Category::Mindfulness),
            "financial" => Ok(Category::Financial),
            "household" => Ok(Category::Household),
            "personal" => Ok(Category::Personal),
            _ => Err(DomainError::Validation {
                message: format!(
                    "Invalid category '{}'. Valid options: health, productivity, social, creative, mindfulness, financial, household, personal, or custom:name",
                    s
                ),
            }),
        }
    }
}

/// All weekdays in Monday-first order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Lowercase three-letter token for a weekday (`mon` … `sun`)
pub fn weekday_token(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// Parse a weekday token; case and surrounding whitespace are ignored
pub fn parse_weekday_token(token: &str) -> Result<Weekday, DomainError> {
    let normalized = token.trim().to_lowercase();
    WEEKDAYS
        .iter()
        .copied()
        .find(|day| weekday_token(*day) == normalized)
        .ok_or_else(|| {
            DomainError::InvalidFrequency(format!(
                "Unknown weekday '{}'. Expected one of mon, tue, wed, thu, fri, sat, sun",
                token
            ))
        })
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_calendar_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date: {}", s, e)))
}

/// The set of weekdays a habit is scheduled on
///
/// Stored as a seven-bit mask (bit 0 is Monday). An empty set is a valid
/// value for the engine and simply means the habit is never scheduled.
/// Serializes as a list of weekday tokens in Monday-first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Frequency {
    days: u8,
}

impl Frequency {
    /// A schedule with no days; never scheduled
    pub const fn empty() -> Self {
        Self { days: 0 }
    }

    /// Scheduled on all seven days
    pub const fn every_day() -> Self {
        Self { days: 0b111_1111 }
    }

    /// Monday through Friday
    pub const fn weekdays() -> Self {
        Self { days: 0b001_1111 }
    }

    /// Saturday and Sunday
    pub const fn weekends() -> Self {
        Self { days: 0b110_0000 }
    }

    /// Build a schedule from any collection of weekdays (duplicates collapse)
    pub fn from_days<I: IntoIterator<Item = Weekday>>(days: I) -> Self {
        days.into_iter()
            .fold(Self::empty(), |acc, day| Self { days: acc.days | Self::bit(day) })
    }

    /// Parse a list of weekday tokens such as `["mon", "wed", "fri"]`
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut days = Vec::new();
        for token in tokens {
            days.push(parse_weekday_token(token.as_ref())?);
        }
        Ok(Self::from_days(days))
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    /// Whether the given weekday is part of this schedule
    pub fn contains(&self, day: Weekday) -> bool {
        self.days & Self::bit(day) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.days == 0
    }

    /// Number of scheduled weekdays (0-7)
    pub fn len(&self) -> usize {
        self.days.count_ones() as usize
    }

    /// Scheduled weekdays in Monday-first order
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEKDAYS.iter().copied().filter(move |day| self.contains(*day))
    }

    /// Scheduled weekday tokens in Monday-first order
    pub fn tokens(&self) -> Vec<&'static str> {
        self.days().map(weekday_token).collect()
    }

    /// Human readable schedule: "Every day" or abbreviated day names
    pub fn display_name(&self) -> String {
        if self.len() == 7 {
            return "Every day".to_string();
        }
        if self.is_empty() {
            return "Never".to_string();
        }
        self.days()
            .map(|day| match day {
                Weekday::Mon => "Mon",
                Weekday::Tue => "Tue",
                Weekday::Wed => "Wed",
                Weekday::Thu => "Thu",
                Weekday::Fri => "Fri",
                Weekday::Sat => "Sat",
                Weekday::Sun => "Sun",
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Check if this frequency expects the habit to be done on a given date
    pub fn is_scheduled_for_date(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    /// Count the scheduled days in `[start, end]`, both ends inclusive
    ///
    /// Returns 0 when the schedule is empty or `start > end`.
    pub fn count_scheduled_occurrences(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if self.is_empty() || start > end {
            return 0;
        }

        let total_days = (end - start).num_days() + 1;
        let full_weeks = total_days / 7;
        let mut count = full_weeks as u32 * self.len() as u32;

        // Every full week contributes each scheduled weekday exactly once;
        // the remaining (< 7) days are checked one by one.
        let mut day = start + chrono::Duration::days(full_weeks * 7);
        while day <= end {
            if self.is_scheduled_for_date(day) {
                count += 1;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        count
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    /// Accepts the presets `daily`, `weekdays`, `weekends`, or a comma
    /// separated token list such as `mon,wed,fri`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "everyday" | "every day" => Ok(Self::every_day()),
            "weekdays" => Ok(Self::weekdays()),
            "weekends" => Ok(Self::weekends()),
            "" => Ok(Self::empty()),
            list => Self::from_tokens(list.split(',').filter(|t| !t.trim().is_empty())),
        }
    }
}

impl TryFrom<Vec<String>> for Frequency {
    type Error = DomainError;

    fn try_from(tokens: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_tokens(tokens)
    }
}

impl From<Frequency> for Vec<String> {
    fn from(frequency: Frequency) -> Self {
        frequency.tokens().into_iter().map(str::to_string).collect()
    }
}
