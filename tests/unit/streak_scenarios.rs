/// Streak scenarios evaluated against fixed reference dates
///
/// 2024-03-13 is a Wednesday.
use trackify_habits::*;

use super::{date, habit_with};

#[test]
fn test_missed_scheduled_today_resets_streak() {
    // Five weekdays done, ending yesterday; today is due and not done yet
    let completions = [
        date(2024, 3, 6),
        date(2024, 3, 7),
        date(2024, 3, 8),
        date(2024, 3, 11),
        date(2024, 3, 12),
    ];
    let habit = habit_with(Frequency::weekdays(), &completions);

    let streak = recompute_streaks(&habit, date(2024, 3, 13));
    assert_eq!(streak.current_streak, 0);
}

#[test]
fn test_mon_wed_fri_counts_last_three_occurrences() {
    let frequency: Frequency = "mon,wed,fri".parse().unwrap();
    let habit = habit_with(
        frequency,
        &[date(2024, 3, 8), date(2024, 3, 11), date(2024, 3, 13)],
    );

    let streak = recompute_streaks(&habit, date(2024, 3, 13));
    assert_eq!(streak.current_streak, 3);
    assert_eq!(streak.longest_streak, 3);
}

#[test]
fn test_weekend_habit_survives_unscheduled_weekdays() {
    // Every weekend day of March 2024 so far; today is Tuesday the 19th
    let completions = [
        date(2024, 3, 2),
        date(2024, 3, 3),
        date(2024, 3, 9),
        date(2024, 3, 10),
        date(2024, 3, 16),
        date(2024, 3, 17),
    ];
    let habit = habit_with(Frequency::weekends(), &completions);

    let streak = recompute_streaks(&habit, date(2024, 3, 19));
    assert_eq!(streak.current_streak, 6);
}

#[test]
fn test_first_completion_starts_streak() {
    let habit = habit_with(Frequency::every_day(), &[]);
    let today = date(2024, 3, 13);

    let empty = recompute_streaks(&habit, today);
    assert_eq!(empty, Streak { current_streak: 0, longest_streak: 0 });

    let done = habit.with_completion(today, true, today);
    assert_eq!(done.current_streak, 1);
    assert_eq!(done.longest_streak, 1);
}

#[test]
fn test_old_gap_does_not_affect_recent_streak() {
    // Missed a day in January, every day since then completed
    let today = date(2024, 3, 13);
    let completions: Vec<_> = date(2024, 1, 16).iter_days().take_while(|d| *d <= today).collect();
    let habit = habit_with(Frequency::every_day(), &completions);

    let streak = recompute_streaks(&habit, today);
    assert_eq!(streak.current_streak, completions.len() as u32);
}

#[test]
fn test_recompute_is_idempotent_and_longest_dominates() {
    let frequency: Frequency = "tue,thu".parse().unwrap();
    let mut habit = habit_with(frequency, &[date(2024, 3, 5), date(2024, 3, 7), date(2024, 3, 12)]);
    habit.longest_streak = 9;
    let today = date(2024, 3, 13);

    let first = recompute_streaks(&habit, today);
    let second = recompute_streaks(&habit, today);
    assert_eq!(first, second);
    assert_eq!(first.current_streak, 3);
    assert_eq!(first.longest_streak, 9);
    assert!(first.longest_streak >= first.current_streak);
}

#[test]
fn test_occurrence_counter_boundaries() {
    let wednesday = date(2024, 3, 13);
    let mwf: Frequency = "mon,wed,fri".parse().unwrap();

    assert_eq!(count_scheduled_occurrences(&mwf, wednesday, wednesday), 1);
    assert_eq!(count_scheduled_occurrences(&Frequency::weekends(), wednesday, wednesday), 0);
    assert_eq!(count_scheduled_occurrences(&mwf, wednesday, date(2024, 3, 12)), 0);
    assert_eq!(count_scheduled_occurrences(&Frequency::empty(), date(2024, 1, 1), wednesday), 0);
    // March 2024 has 13 Mondays, Wednesdays and Fridays
    assert_eq!(count_scheduled_occurrences(&mwf, date(2024, 3, 1), date(2024, 3, 31)), 13);
    assert!(!is_scheduled(&Frequency::empty(), wednesday));
}
