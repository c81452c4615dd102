/// JSON-RPC sessions against the MCP server over in-memory streams
use std::path::Path;

use chrono::NaiveDate;
use serde_json::{json, Value};
use tempfile::TempDir;
use trackify_habits::TrackifyServer;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
}

/// Send one line per request and collect the response lines
async fn session(db_path: &Path, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
    let mut output = Vec::new();

    TrackifyServer::new(db_path.to_path_buf())
        .expect("Failed to create server")
        .with_reference_date(today())
        .serve(input.as_bytes(), &mut output)
        .await
        .expect("Server failed");

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}

#[tokio::test]
async fn test_handshake_and_tool_listing() {
    let dir = TempDir::new().unwrap();
    let responses = session(
        &dir.path().join("habits.db"),
        &[
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "test-client", "version": "1.0" }
                }
            }),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
            json!({ "jsonrpc": "2.0", "id": 3, "method": "ping" }),
        ],
    )
    .await;

    // The notification gets no response
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["result"]["protocolVersion"], json!("2024-11-05"));
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], json!("Trackify Habits"));

    let names: Vec<&str> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "habit_create",
            "habit_update",
            "habit_toggle",
            "habit_delete",
            "habit_list",
            "habit_status",
            "habit_calendar"
        ]
    );
    assert!(responses[1]["result"]["tools"][0]["inputSchema"]["properties"]["name"].is_object());
    assert_eq!(responses[2]["id"], json!(3));
}

#[tokio::test]
async fn test_create_toggle_and_calendar_session() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("habits.db");

    let created = session(
        &db_path,
        &[call(1, "habit_create", json!({ "name": "Meditate", "frequency": "mon,wed,fri" }))],
    )
    .await;
    let result = &created[0]["result"];
    assert_eq!(result["isError"], json!(false));
    let habit_id = result["structuredContent"]["habit_id"].as_str().unwrap().to_string();

    let responses = session(
        &db_path,
        &[
            call(2, "habit_toggle", json!({ "habit_id": habit_id, "date": "2024-03-08" })),
            call(3, "habit_toggle", json!({ "habit_id": habit_id, "date": "2024-03-11" })),
            call(4, "habit_toggle", json!({ "habit_id": habit_id })),
            call(5, "habit_status", json!({})),
            call(6, "habit_calendar", json!({ "include_previous": false })),
        ],
    )
    .await;

    let last_toggle = &responses[2]["result"]["structuredContent"];
    assert_eq!(last_toggle["current_streak"], json!(3));
    assert_eq!(last_toggle["date"], json!("2024-03-13"));

    let status = &responses[3]["result"]["structuredContent"];
    assert_eq!(status["habits"][0]["status"], json!("completed"));
    assert_eq!(status["today"]["progress_percent"], json!(100));

    let calendar = &responses[4]["result"]["structuredContent"]["months"];
    assert_eq!(calendar.as_array().unwrap().len(), 1);
    assert_eq!(calendar[0]["label"], json!("March 2024"));
    assert_eq!(calendar[0]["days"][7]["summary"]["classification"], json!("full"));
    assert_eq!(calendar[0]["days"][8]["summary"]["classification"], json!("none"));
    let text = responses[4]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("13*"));
}

#[tokio::test]
async fn test_errors_are_reported() {
    let dir = TempDir::new().unwrap();
    let responses = session(
        &dir.path().join("habits.db"),
        &[
            json!({ "jsonrpc": "2.0", "id": 1, "method": "resources/list" }),
            call(2, "habit_toggle", json!({ "habit_id": "not-a-uuid" })),
            call(3, "habit_create", json!({ "frequency": "daily" })),
            call(4, "habit_fly", json!({})),
            call(5, "habit_toggle", json!({
                "habit_id": "0b9d6a4e-3f5c-4c1e-9d55-2f0a8a1c7e11",
                "date": "2024-03-14"
            })),
        ],
    )
    .await;

    assert_eq!(responses[0]["error"]["code"], json!(-32601));

    assert_eq!(responses[1]["result"]["isError"], json!(true));
    let text = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Invalid habit ID"));

    // Missing required "name" does not fit the parameter type
    assert_eq!(responses[2]["error"]["code"], json!(-32602));

    assert_eq!(responses[3]["result"]["isError"], json!(true));

    // Future dates are refused before the habit is looked up
    let text = responses[4]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("future"));
}

#[tokio::test]
async fn test_malformed_json_gets_parse_error() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("habits.db");
    let mut output = Vec::new();

    TrackifyServer::new(db_path)
        .unwrap()
        .serve("{not json\n\n".as_bytes(), &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["error"]["code"], json!(-32700));
    assert_eq!(responses[0]["id"], Value::Null);
}
