/// Public library interface for the Trackify habit server
///
/// This module exports the server, the habit domain (streaks, schedules,
/// calendars) and the storage and tool layers used by the binary and tests.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};

// Internal modules
mod domain;
mod storage;
pub mod tools;
pub mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{HabitStorage, SqliteStorage, StorageError};
pub use tools::ToolError;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit server that speaks MCP over stdio
///
/// Every tool call is evaluated against a reference date. It is the local
/// calendar date at the time of the call unless pinned with
/// [`TrackifyServer::with_reference_date`].
pub struct TrackifyServer {
    storage: SqliteStorage,
    today: Option<NaiveDate>,
}

impl TrackifyServer {
    /// Create a server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing Trackify server with database: {:?}", db_path);
        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::with_storage(storage))
    }

    /// Create a server around an already opened storage
    pub fn with_storage(storage: SqliteStorage) -> Self {
        Self { storage, today: None }
    }

    /// Pin the reference date instead of following the local clock
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The date tool calls are evaluated against
    pub fn reference_date(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Run the MCP server over stdin/stdout until stdin closes
    pub async fn run(self) -> Result<(), ServerError> {
        let habits = self.storage.list_habits(None)?;
        tracing::info!("Server started, found {} existing habits", habits.len());

        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Run the MCP server over any line-oriented reader and writer
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.serve(reader, writer).await
    }
}
