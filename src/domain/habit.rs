/// Habit entity and related functionality
///
/// This module defines the core Habit struct: a recurring activity with a
/// weekly schedule, the set of days it was completed on, and the streak
/// values derived from that history.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

use crate::domain::{Category, DomainError, Frequency, HabitId, Streak};

/// A habit represents something the user wants to do on certain weekdays
///
/// The completion set is kept ordered, so it never contains duplicates and
/// iterates oldest first. Derivations never mutate a habit in place: the
/// `with_*` methods return an updated copy for the caller to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Category for organization (health, productivity, etc.)
    pub category: Category,
    /// Weekdays this habit is scheduled on
    pub frequency: Frequency,
    /// Optional time of day to be reminded at
    pub reminder_time: Option<NaiveTime>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// First day of the completion rate range, in the same calendar as `today`
    pub created_on: NaiveDate,
    /// Days this habit was marked done
    pub completion_dates: BTreeSet<NaiveDate>,
    /// Consecutive completed scheduled days, as of the last recomputation
    pub current_streak: u32,
    /// Best streak ever observed; never decreases
    pub longest_streak: u32,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// New habits start with no completions and zero streaks, counting from
    /// the local calendar day; see [`Habit::starting_on`]. Unlike the
    /// engine, which tolerates an empty schedule, a new habit must be
    /// scheduled on at least one day.
    pub fn new(
        name: String,
        description: Option<String>,
        category: Category,
        frequency: Frequency,
        reminder_time: Option<NaiveTime>,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;
        Self::validate_frequency(&frequency)?;

        let created_at = Utc::now();
        Ok(Self {
            id: HabitId::new(),
            name: name.trim().to_string(),
            description,
            category,
            frequency,
            reminder_time,
            created_at,
            created_on: created_at.with_timezone(&Local).date_naive(),
            completion_dates: BTreeSet::new(),
            current_streak: 0,
            longest_streak: 0,
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated.
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        name: String,
        description: Option<String>,
        category: Category,
        frequency: Frequency,
        reminder_time: Option<NaiveTime>,
        created_at: DateTime<Utc>,
        created_on: NaiveDate,
        completion_dates: BTreeSet<NaiveDate>,
        current_streak: u32,
        longest_streak: u32,
    ) -> Self {
        Self {
            id,
            name,
            description,
            category,
            frequency,
            reminder_time,
            created_at,
            created_on,
            completion_dates,
            current_streak,
            longest_streak,
        }
    }

    /// Count this habit from `day`, the caller's reference date at creation
    pub fn starting_on(self, day: NaiveDate) -> Self {
        Self { created_on: day, ..self }
    }

    /// Update the habit's editable properties with validation
    ///
    /// Completion history and streak values are preserved; callers that
    /// change the schedule should recompute streaks afterwards.
    pub fn update(
        &mut self,
        name: Option<String>,
        description: Option<Option<String>>,
        category: Option<Category>,
        frequency: Option<Frequency>,
        reminder_time: Option<Option<NaiveTime>>,
    ) -> Result<(), DomainError> {
        // Validate everything before applying anything
        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_desc) = description {
            Self::validate_description(new_desc)?;
        }
        if let Some(ref new_freq) = frequency {
            Self::validate_frequency(new_freq)?;
        }

        if let Some(new_name) = name {
            self.name = new_name.trim().to_string();
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_category) = category {
            self.category = new_category;
        }
        if let Some(new_frequency) = frequency {
            self.frequency = new_frequency;
        }
        if let Some(new_reminder) = reminder_time {
            self.reminder_time = new_reminder;
        }

        Ok(())
    }

    /// Whether the habit is scheduled on the given date
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.frequency.is_scheduled_for_date(date)
    }

    /// Whether the habit was marked done on the given date
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completion_dates.contains(&date)
    }

    /// Return a copy with streaks recomputed against `today`
    pub fn with_recomputed_streaks(&self, today: NaiveDate) -> Self {
        let streak = Streak::for_habit(self, today);
        Self {
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
            ..self.clone()
        }
    }

    /// Return a copy with `date` marked done (or undone) and streaks recomputed
    ///
    /// Marking an already completed day done, or an open day undone, only
    /// recomputes the streaks.
    pub fn with_completion(&self, date: NaiveDate, completed: bool, today: NaiveDate) -> Self {
        let mut completion_dates = self.completion_dates.clone();
        if completed {
            completion_dates.insert(date);
        } else {
            completion_dates.remove(&date);
        }

        Self {
            completion_dates,
            ..self.clone()
        }
        .with_recomputed_streaks(today)
    }

    /// Share of scheduled days completed between creation and `today`
    ///
    /// Only completions that fall on scheduled days inside the range count,
    /// so the rate is capped at 1.0. Returns 0.0 when nothing was scheduled.
    pub fn completion_rate(&self, today: NaiveDate) -> f64 {
        let start = self.created_on;
        let scheduled = self.frequency.count_scheduled_occurrences(start, today);
        if scheduled == 0 {
            return 0.0;
        }

        let completed = self
            .completion_dates
            .range(start..=today)
            .filter(|date| self.frequency.is_scheduled_for_date(**date))
            .count();

        (completed as f64 / scheduled as f64).min(1.0)
    }

    /// Most recent completion, if any
    pub fn last_completed(&self) -> Option<NaiveDate> {
        self.completion_dates.iter().next_back().copied()
    }

    // Validation helper methods

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string()
            ));
        }

        Ok(())
    }

    /// Validate optional description
    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.chars().count() > 500 {
                return Err(DomainError::Validation {
                    message: "Description cannot be longer than 500 characters".to_string()
                });
            }
        }
        Ok(())
    }

    fn validate_frequency(frequency: &Frequency) -> Result<(), DomainError> {
        if frequency.is_empty() {
            return Err(DomainError::InvalidFrequency(
                "Please select at least one day for the habit".to_string()
            ));
        }
        Ok(())
    }
}
