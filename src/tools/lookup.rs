//! consultation_lookup tool handler

use crate::engine::RawBusinessContext;
use crate::error::Result;
use crate::server::{EpicConsultServer, parse_arguments};
use crate::store::lookup;
use rmcp::model::{CallToolRequestParam, CallToolResult};
use serde_json::json;

impl EpicConsultServer {
    /// Handle the consultation_lookup tool call
    pub async fn handle_consultation_lookup(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        // only the identity fields matter; the rest of the context is ignored
        let raw: RawBusinessContext = parse_arguments(request.arguments)?;
        let stored = self
            .with_tool_timeout("consultation_lookup", lookup(self.store.as_ref(), &raw))
            .await?;

        Ok(CallToolResult::structured(json!({
            "id": stored.id,
            "cache_key": stored.cache_key,
            "created_at": stored.created_at,
            "consultation": stored.consultation,
        })))
    }
}
