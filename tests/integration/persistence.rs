/// Habits and completions survive reopening the database file
use chrono::NaiveDate;
use tempfile::TempDir;
use trackify_habits::tools::*;
use trackify_habits::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_completions_and_streaks_persist_across_reopen() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("habits.db");
    let today = date(2024, 3, 13);

    let habit_id = {
        let storage = SqliteStorage::new(db_path.clone()).expect("Failed to create storage");
        let created = create_habit(
            &storage,
            CreateHabitParams {
                name: "Stretch".to_string(),
                description: Some("Ten minutes".to_string()),
                category: Some("health".to_string()),
                frequency: Some(FrequencyInput::Preset("daily".to_string())),
                reminder_time: Some("07:30".to_string()),
            },
            date(2024, 3, 11),
        )
        .unwrap();

        for day in [11, 12, 13] {
            toggle_habit(
                &storage,
                ToggleHabitParams {
                    habit_id: created.habit_id.clone(),
                    date: Some(date(2024, 3, day).to_string()),
                    completed: Some(true),
                },
                today,
            )
            .unwrap();
        }
        created.habit_id
    };

    let storage = SqliteStorage::new(db_path).expect("Failed to reopen storage");
    let habit = storage.get_habit(&HabitId::from_string(&habit_id).unwrap()).unwrap();
    assert_eq!(habit.name, "Stretch");
    assert_eq!(habit.frequency, Frequency::every_day());
    assert_eq!(habit.completion_dates.len(), 3);
    assert_eq!(habit.current_streak, 3);
    assert_eq!(habit.longest_streak, 3);
    assert_eq!(habit.last_completed(), Some(today));
    assert_eq!(habit.created_on, date(2024, 3, 11));
    assert!((habit.completion_rate(today) - 1.0).abs() < f64::EPSILON);
    assert_eq!(storage.habits_completed_on(date(2024, 3, 12)).unwrap(), vec![habit.id.clone()]);
}

#[test]
fn test_delete_removes_completion_history() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let storage = SqliteStorage::new(dir.path().join("habits.db")).unwrap();
    let today = date(2024, 3, 13);

    let created = create_habit(
        &storage,
        CreateHabitParams {
            name: "Floss".to_string(),
            description: None,
            category: None,
            frequency: Some(FrequencyInput::Days(vec!["wed".to_string()])),
            reminder_time: None,
        },
        today,
    )
    .unwrap();
    toggle_habit(
        &storage,
        ToggleHabitParams { habit_id: created.habit_id.clone(), date: None, completed: None },
        today,
    )
    .unwrap();

    delete_habit(&storage, DeleteHabitParams { habit_id: created.habit_id }).unwrap();

    assert!(storage.list_habits(None).unwrap().is_empty());
    assert!(storage.habits_completed_on(today).unwrap().is_empty());
}

#[tokio::test]
async fn test_server_opens_existing_database() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("habits.db");

    let first = TrackifyServer::new(db_path.clone()).expect("Failed to create server");
    create_habit(
        first.storage(),
        CreateHabitParams {
            name: "Read".to_string(),
            description: None,
            category: None,
            frequency: None,
            reminder_time: None,
        },
        first.reference_date(),
    )
    .unwrap();
    drop(first);

    let second = TrackifyServer::new(db_path)
        .expect("Failed to create second server")
        .with_reference_date(date(2024, 3, 13));
    assert_eq!(second.reference_date(), date(2024, 3, 13));
    assert_eq!(second.storage().list_habits(None).unwrap().len(), 1);
}
