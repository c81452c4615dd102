/// Day classification and month grids across several habits
use trackify_habits::*;

use super::{date, habit_with};

#[test]
fn test_two_of_three_is_partial() {
    let day = date(2024, 3, 13);
    let habits = vec![
        habit_with(Frequency::every_day(), &[day]),
        habit_with(Frequency::weekdays(), &[day]),
        habit_with("wed".parse().unwrap(), &[]),
    ];

    let summary = classify_day(&habits, day);
    assert_eq!(summary.scheduled_count, 3);
    assert_eq!(summary.completed_count, 2);
    assert_eq!(summary.classification, DayClassification::Partial);
}

#[test]
fn test_nothing_scheduled_is_none_even_with_completions() {
    let saturday = date(2024, 3, 16);
    let habits = vec![habit_with(Frequency::weekdays(), &[saturday])];

    let summary = classify_day(&habits, saturday);
    assert_eq!(summary.scheduled_count, 0);
    assert_eq!(summary.classification, DayClassification::None);
}

#[test]
fn test_today_summary_and_month_grid() {
    let today = date(2024, 3, 13);
    let mut reader = habit_with(Frequency::every_day(), &[date(2024, 3, 12), today]);
    reader = reader.with_recomputed_streaks(today);
    let habits = vec![reader, habit_with(Frequency::weekdays(), &[date(2024, 3, 12)])];

    let summary = today_summary(&habits, today);
    assert_eq!(summary.scheduled_count, 2);
    assert_eq!(summary.completed_count, 1);
    assert_eq!(summary.progress_percent, 50);
    assert_eq!(summary.highest_current_streak, 2);

    let march = month_calendar(&habits, 2024, 3, today).unwrap();
    assert_eq!(march.days.len(), 31);
    assert_eq!(march.days[11].summary.classification, DayClassification::Full);
    assert_eq!(march.days[12].summary.classification, DayClassification::Partial);

    let text = march.render_text();
    assert!(text.starts_with("March 2024\nMo  Tu  We  Th  Fr  Sa  Su\n"));
    assert!(text.contains("12✓"));
    assert!(text.contains("13*"));

    assert!(month_calendar(&habits, 2024, 0, today).is_err());
    assert_eq!(previous_month(2024, 1).unwrap(), (2023, 12));
}
