/// Unit tests for the streak and calendar engine through the public API
mod streak_scenarios;
mod calendar_tests;

use chrono::NaiveDate;
use trackify_habits::{Category, Frequency, Habit};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A habit with the given schedule and completion history
pub fn habit_with(frequency: Frequency, completions: &[NaiveDate]) -> Habit {
    let mut habit = Habit::new("Habit".to_string(), None, Category::Personal, frequency, None).unwrap();
    habit.completion_dates = completions.iter().copied().collect();
    habit
}
