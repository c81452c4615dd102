/// Streak calculation for habits
///
/// A streak counts consecutive *scheduled* days that were completed, walking
/// backward from the reference date. Unscheduled days are skipped without
/// breaking the streak; the first scheduled day that was missed ends it.
///
/// Two implementations live here. `recompute_current_streak` is the one used
/// by the rest of the crate: it short-circuits the common "today missed" and
/// "yesterday missed" cases before walking. `walk_back_streak` is the plain
/// day-by-day walk with no shortcuts. Both must always agree, and the tests
/// below check that over many schedules and histories.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use crate::domain::{Frequency, Habit};

/// How many days before the reference date the walk inspects at most
pub const WALK_BACK_LIMIT_DAYS: u32 = 366;

/// Streak values derived for a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive completed scheduled days ending at the reference date
    pub current_streak: u32,
    /// Best streak ever observed
    pub longest_streak: u32,
}

impl Streak {
    /// Zero streak, as held by a new habit
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute both streak values for a habit as of `today`
    ///
    /// The previously stored `longest_streak` is carried forward, so it
    /// never decreases.
    pub fn for_habit(habit: &Habit, today: NaiveDate) -> Self {
        Self::recompute(
            &habit.frequency,
            &habit.completion_dates,
            habit.longest_streak,
            today,
        )
    }

    /// Recompute streak values from a schedule and completion history
    pub fn recompute(
        frequency: &Frequency,
        completions: &BTreeSet<NaiveDate>,
        previous_longest: u32,
        today: NaiveDate,
    ) -> Self {
        let current_streak = recompute_current_streak(frequency, completions, today);
        Self {
            current_streak,
            longest_streak: previous_longest.max(current_streak),
        }
    }

    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self) -> String {
        match self.current_streak {
            0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
            1 => "Great start! One day down, keep the momentum going.".to_string(),
            2..=6 => format!("Nice work! {} days in a row. You're building a strong habit.", self.current_streak),
            7..=13 => format!("Excellent! {} days strong. You're in the groove now!", self.current_streak),
            14..=29 => format!("Amazing! {} days straight. This is becoming second nature.", self.current_streak),
            30..=99 => format!("Incredible! {} days of consistency. You're a habit master!", self.current_streak),
            _ => format!("Legendary! {} days of unwavering commitment. You're an inspiration!", self.current_streak),
        }
    }
}

/// Whether `date` falls on one of the weekdays in `frequency`
pub fn is_scheduled(frequency: &Frequency, date: NaiveDate) -> bool {
    frequency.is_scheduled_for_date(date)
}

/// Number of scheduled days in `[start, end]`, both ends inclusive
pub fn count_scheduled_occurrences(frequency: &Frequency, start: NaiveDate, end: NaiveDate) -> u32 {
    frequency.count_scheduled_occurrences(start, end)
}

/// Recompute a habit's streaks as of `today`; the habit itself is untouched
pub fn recompute_streaks(habit: &Habit, today: NaiveDate) -> Streak {
    Streak::for_habit(habit, today)
}

/// Current streak with the reset-rule fast paths
pub fn recompute_current_streak(
    frequency: &Frequency,
    completions: &BTreeSet<NaiveDate>,
    today: NaiveDate,
) -> u32 {
    if completions.is_empty() {
        return 0;
    }

    let today_completed = completions.contains(&today);

    // A scheduled day that is due and still open breaks the streak at once
    if frequency.is_scheduled_for_date(today) && !today_completed {
        return 0;
    }

    // A miss on yesterday caps the streak at today's own completion
    if let Some(yesterday) = today.pred_opt() {
        if frequency.is_scheduled_for_date(yesterday) && !completions.contains(&yesterday) {
            return u32::from(today_completed);
        }
    }

    let mut streak = u32::from(today_completed);
    let mut day = today;
    for _ in 0..WALK_BACK_LIMIT_DAYS {
        let Some(previous) = day.pred_opt() else { break };
        day = previous;

        if !frequency.is_scheduled_for_date(day) {
            continue;
        }
        if !completions.contains(&day) {
            break;
        }
        streak += 1;
    }

    streak
}

/// Current streak computed by walking back one day at a time, no shortcuts
///
/// Today is the first step of the walk: if it is scheduled and open the
/// streak is 0, and if it was completed it counts once whether scheduled or
/// not. Every earlier day, up to `WALK_BACK_LIMIT_DAYS` back, counts only
/// when scheduled and completed.
pub fn walk_back_streak(
    frequency: &Frequency,
    completions: &BTreeSet<NaiveDate>,
    today: NaiveDate,
) -> u32 {
    let mut streak = 0;
    let mut day = today;

    for step in 0..=WALK_BACK_LIMIT_DAYS {
        let scheduled = frequency.is_scheduled_for_date(day);
        let completed = completions.contains(&day);

        if scheduled && !completed {
            break;
        }
        if completed && (scheduled || step == 0) {
            streak += 1;
        }

        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    streak
}
