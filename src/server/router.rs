use crate::schemas;
use crate::server::EpicConsultServer;
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Implementation, InitializeRequestParam,
        InitializeResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo, Tool, ToolsCapability,
    },
    service::{RequestContext, RoleServer},
};
use tracing::info;

impl EpicConsultServer {
    /// Route a `tools/call` request to its handler.
    pub async fn dispatch_tool(
        &self,
        request: CallToolRequestParam,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("tools/call {}", request.name);
        match request.name.as_ref() {
            schemas::TOOL_EPIC_CONSULTATION => self
                .handle_epic_consultation(request)
                .await
                .map_err(|e| e.into()),
            schemas::TOOL_EPIC_SCORE => self.handle_epic_score(request).await.map_err(|e| e.into()),
            schemas::TOOL_CONSULTATION_LOOKUP => self
                .handle_consultation_lookup(request)
                .await
                .map_err(|e| e.into()),
            schemas::TOOL_DETAILED_HELP => self
                .handle_detailed_help(request)
                .await
                .map_err(|e| e.into()),
            _ => Err(McpError {
                code: rmcp::model::ErrorCode::METHOD_NOT_FOUND,
                message: format!("Unknown tool: {}", request.name).into(),
                data: None,
            }),
        }
    }

    /// Tool catalog advertised by `tools/list`.
    pub fn tool_list() -> Vec<Tool> {
        vec![
            Tool {
                name: schemas::TOOL_EPIC_CONSULTATION.into(),
                title: Some("EPIC Consultation".into()),
                description: Some(
                    "Full EPIC consultation with recommendations and a 180-day roadmap; cached for 30 days per company".into(),
                ),
                input_schema: schemas::epic_consultation_schema(),
                icons: None,
                annotations: None,
                output_schema: Some(schemas::epic_consultation_output_schema()),
                meta: None,
            },
            Tool {
                name: schemas::TOOL_EPIC_SCORE.into(),
                title: Some("EPIC Score".into()),
                description: Some("Score a business context and classify its primary/secondary focus".into()),
                input_schema: schemas::epic_score_schema(),
                icons: None,
                annotations: None,
                output_schema: Some(schemas::epic_score_output_schema()),
                meta: None,
            },
            Tool {
                name: schemas::TOOL_CONSULTATION_LOOKUP.into(),
                title: Some("Consultation Lookup".into()),
                description: Some(
                    "Fetch a cached consultation by company name, industry and stage".into(),
                ),
                input_schema: schemas::consultation_lookup_schema(),
                icons: None,
                annotations: None,
                output_schema: Some(schemas::consultation_lookup_output_schema()),
                meta: None,
            },
            Tool {
                name: schemas::TOOL_DETAILED_HELP.into(),
                title: Some("Detailed Help".into()),
                description: Some("Get detailed help for a specific tool".into()),
                input_schema: schemas::detailed_help_schema(),
                icons: None,
                annotations: None,
                output_schema: Some(schemas::detailed_help_output_schema()),
                meta: None,
            },
        ]
    }
}

impl ServerHandler for EpicConsultServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: self.config.system.service_name.clone(),
                title: Some("EPIC Consult".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Call epic_consultation with a business context (company_name, industry, business_stage, challenge_text). Use detailed_help for argument details.".to_string(),
            ),
            ..Default::default()
        }
    }

    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        let mut info = self.get_info();
        info.protocol_version = request.protocol_version.clone();
        Ok(info)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("tools/list requested");
        Ok(ListToolsResult {
            tools: Self::tool_list(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.dispatch_tool(request).await
    }
}
