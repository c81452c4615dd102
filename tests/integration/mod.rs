/// Integration tests: SQLite persistence and the MCP protocol end to end
mod persistence;
mod mcp_protocol;
