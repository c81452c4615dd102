/// Calendar aggregation across habits
///
/// Classifies single days as none/partial/full across a set of habits and
/// builds the Monday-first month grids and the "today" progress summary
/// the presentation layer shows.

use serde::{Deserialize, Serialize};
use chrono::{Datelike, Months, NaiveDate};

use crate::domain::{DomainError, Habit};

/// How much of a day's scheduled work was completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayClassification {
    /// Nothing scheduled, or nothing completed
    None,
    /// Some but not all scheduled habits completed
    Partial,
    /// Every scheduled habit completed
    Full,
}

impl DayClassification {
    /// Classify from the scheduled and completed counts of a day
    pub fn from_counts(scheduled_count: u32, completed_count: u32) -> Self {
        if scheduled_count > 0 && completed_count == scheduled_count {
            DayClassification::Full
        } else if completed_count > 0 && completed_count < scheduled_count {
            DayClassification::Partial
        } else {
            DayClassification::None
        }
    }

    /// Single-character marker used in text calendars
    pub fn marker(&self) -> char {
        match self {
            DayClassification::None => '·',
            DayClassification::Partial => '~',
            DayClassification::Full => '✓',
        }
    }
}

/// Scheduled/completed counts for one date across habits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub scheduled_count: u32,
    pub completed_count: u32,
    pub classification: DayClassification,
}

/// Classify a date across all habits
///
/// Only habits scheduled on the date are considered; a completion recorded
/// for a habit that is not scheduled that day does not count.
pub fn classify_day(habits: &[Habit], date: NaiveDate) -> DaySummary {
    let (scheduled_count, completed_count) = habits
        .iter()
        .filter(|habit| habit.is_scheduled_on(date))
        .fold((0u32, 0u32), |(scheduled, completed), habit| {
            (scheduled + 1, completed + u32::from(habit.is_completed_on(date)))
        });

    DaySummary {
        date,
        scheduled_count,
        completed_count,
        classification: DayClassification::from_counts(scheduled_count, completed_count),
    }
}

/// Progress for the reference date across all habits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodaySummary {
    pub date: NaiveDate,
    pub scheduled_count: u32,
    pub completed_count: u32,
    /// Completed share of scheduled habits, rounded; 0 when nothing is scheduled
    pub progress_percent: u8,
    /// Highest stored current streak across all habits
    pub highest_current_streak: u32,
}

/// Summarize the reference date's progress
pub fn today_summary(habits: &[Habit], today: NaiveDate) -> TodaySummary {
    let day = classify_day(habits, today);
    let progress_percent = if day.scheduled_count > 0 {
        ((day.completed_count as f64 / day.scheduled_count as f64) * 100.0).round() as u8
    } else {
        0
    };

    TodaySummary {
        date: today,
        scheduled_count: day.scheduled_count,
        completed_count: day.completed_count,
        progress_percent,
        highest_current_streak: habits.iter().map(|h| h.current_streak).max().unwrap_or(0),
    }
}

/// One day cell of a month grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Day of month, starting at 1
    pub day: u32,
    pub is_today: bool,
    pub summary: DaySummary,
}

/// A Monday-first month grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    /// e.g. "March 2024"
    pub label: String,
    /// Blank cells before the 1st (0 when the month starts on a Monday)
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthCalendar {
    /// Render as a plain-text grid, one week per line
    pub fn render_text(&self) -> String {
        let mut out = format!("{}\nMo  Tu  We  Th  Fr  Sa  Su\n", self.label);
        let mut cells: Vec<String> = (0..self.leading_blanks).map(|_| "    ".to_string()).collect();

        for day in &self.days {
            let marker = if day.is_today { '*' } else { day.summary.classification.marker() };
            cells.push(format!("{:>2}{} ", day.day, marker));
        }

        for week in cells.chunks(7) {
            out.push_str(week.concat().trim_end());
            out.push('\n');
        }
        out
    }
}

/// Build the grid for `year`/`month`, classifying every day across `habits`
pub fn month_calendar(
    habits: &[Habit],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<MonthCalendar, DomainError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        DomainError::InvalidDate(format!("{}-{:02} is not a valid month", year, month))
    })?;

    let days_in_month = first
        .checked_add_months(Months::new(1))
        .map(|next_first| (next_first - first).num_days() as u32)
        .ok_or_else(|| DomainError::InvalidDate(format!("{}-{:02} has no following month", year, month)))?;

    let days = first
        .iter_days()
        .take(days_in_month as usize)
        .map(|date| CalendarDay {
            day: date.day(),
            is_today: date == today,
            summary: classify_day(habits, date),
        })
        .collect();

    Ok(MonthCalendar {
        year,
        month,
        label: first.format("%B %Y").to_string(),
        leading_blanks: first.weekday().num_days_from_monday(),
        days,
    })
}

/// The month before `year`/`month`
pub fn previous_month(year: i32, month: u32) -> Result<(i32, u32), DomainError> {
    if month > 1 {
        return Ok((year, month - 1));
    }
    year.checked_sub(1)
        .map(|previous_year| (previous_year, 12))
        .ok_or_else(|| DomainError::InvalidDate(format!("No month before {}-{:02}", year, month)))
}
