/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool. Deleting a habit
/// discards its whole completion history.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for deleting a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete
    pub habit_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub message: String,
}

pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;
    storage.delete_habit(&habit_id)?;

    tracing::info!(
        "Deleted habit '{}' ({}) with {} completions",
        habit.name,
        habit.id,
        habit.completion_dates.len()
    );

    Ok(DeleteHabitResponse {
        message: format!(
            "🗑️ Deleted habit '{}' and its {} recorded completion{}",
            habit.name,
            habit.completion_dates.len(),
            if habit.completion_dates.len() == 1 { "" } else { "s" }
        ),
    })
}
