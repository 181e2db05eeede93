//! Tool handlers for the epic-consult MCP server

pub mod consultation;
pub mod detailed_help;
pub mod lookup;
