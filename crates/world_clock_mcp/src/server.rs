use std::time::Duration;

use rmcp::{
    RoleServer, ServerHandler,
    handler::server::{
        router::{prompt::PromptRouter, tool::ToolRouter},
        wrapper::Parameters,
    },
    model::*,
    prompt, prompt_handler, prompt_router,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use rmcp::{ServiceExt, transport::stdio};
use serde::Serialize;

use crate::core::api::BASE_URL;
use crate::core::error::{McpResult, WorldClockError, WorldClockResult};
use crate::core::models::{
    CompareTimezonesRequest, ConvertTimeRequest, GetCurrentTimeRequest, GetTimeByIpRequest,
    GetTimezoneListRequest,
};
use crate::core::provider::WorldClockServer;

/// World Clock MCP Server implementation
#[derive(Clone)]
pub struct WorldClockService {
    world_clock: WorldClockServer,
    tool_router: ToolRouter<WorldClockService>,
    prompt_router: PromptRouter<WorldClockService>,
}

/// Transport-edge formatter, the single place tool outcomes become text.
///
/// A successful payload renders as pretty-printed JSON. Any failure renders
/// as a one-line `{context}: {cause}` text on a result with the error flag
/// set.
fn render_outcome<T: Serialize>(outcome: WorldClockResult<T>, context: &str) -> CallToolResult {
    let failure = match outcome {
        Ok(payload) => match serde_json::to_string_pretty(&payload) {
            Ok(text) => return CallToolResult::success(vec![Content::text(text)]),
            Err(e) => e.to_string(),
        },
        Err(e) => e.to_string(),
    };

    tracing::error!("{}: {}", context, failure);
    CallToolResult::error(vec![Content::text(format!("{context}: {failure}"))])
}

impl WorldClockService {
    pub fn new(timeout: Duration) -> WorldClockResult<Self> {
        Ok(Self::with_provider(WorldClockServer::new(timeout)?))
    }

    pub(crate) fn with_provider(world_clock: WorldClockServer) -> Self {
        Self {
            world_clock,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    fn create_resource_text(&self, uri: &str, name: &str) -> Resource {
        RawResource::new(uri, name.to_string()).no_annotation()
    }

    fn generate_status_content(&self) -> String {
        format!(
            "World Clock MCP Server Status: Running\n\
             World Time API: {}\n\
             Request timeout: {}s\n\
             Available tools: get_current_time, get_timezone_list, get_time_by_ip, compare_timezones, convert_time\n\
             Available prompts: world_clock_guidance\n\
             Server capabilities: tools, prompts, resources",
            BASE_URL,
            self.world_clock.timeout().as_secs()
        )
    }

    fn generate_help_content(&self) -> String {
        format!(
            r#"# World Clock MCP Server Help

## Available Tools

### get_current_time
Get current time for a specific timezone.
- `timezone`: Timezone in 'Area/Location' format (e.g., 'America/New_York', 'Europe/London')

### get_timezone_list
Get list of available timezones, optionally filtered by area.
- `area` (optional): Area filter (e.g., 'America', 'Europe', 'Asia')

### get_time_by_ip
Get current time based on IP address geolocation.
- `ip` (optional): IP address. The requester's address is used when omitted.

### compare_timezones
Compare current time across multiple timezones.
- `timezones`: List of timezones to compare

### convert_time
Convert a specific datetime from one timezone to another.
- `datetime`: DateTime string in ISO format or 'YYYY-MM-DD HH:MM:SS'
- `from_timezone`: Source timezone
- `to_timezone`: Target timezone

## Notes
- Timezone names use the IANA 'Area/Location' form and are passed to the
  World Time API verbatim; unknown zones surface the service's own answer.
- Conversions apply each zone's current UTC offset.
- All data comes from {BASE_URL} with a {timeout}s request timeout.
"#,
            BASE_URL = BASE_URL,
            timeout = self.world_clock.timeout().as_secs()
        )
    }

    fn generate_endpoints_content(&self) -> String {
        format!(
            r#"# World Time API Endpoints

Base URL: {BASE_URL}

- `timezone`: list all known IANA timezone names
- `timezone/{{area}}`: list timezone names within one area
- `timezone/{{area}}/{{location}}`: current time snapshot for a zone
- `ip`: current time snapshot for the requester's IP address
- `ip/{{address}}`: current time snapshot for an explicit IP address

Every snapshot carries the local datetime, the UTC datetime, the UTC offset,
the zone abbreviation, the DST flag and the Unix timestamp.
"#
        )
    }
}

#[tool_router]
impl WorldClockService {
    #[tool(description = "Get current time for a specific timezone")]
    pub(crate) async fn get_current_time(
        &self,
        Parameters(request): Parameters<GetCurrentTimeRequest>,
    ) -> McpResult<CallToolResult> {
        let outcome = self.world_clock.get_current_time(&request.timezone).await;
        Ok(render_outcome(
            outcome,
            &format!("Error getting time for {}", request.timezone),
        ))
    }

    #[tool(description = "Get list of available timezones, optionally filtered by area")]
    pub(crate) async fn get_timezone_list(
        &self,
        Parameters(request): Parameters<GetTimezoneListRequest>,
    ) -> McpResult<CallToolResult> {
        let outcome = self
            .world_clock
            .get_timezone_list(request.area.as_deref())
            .await;
        Ok(render_outcome(outcome, "Error getting timezone list"))
    }

    #[tool(description = "Get current time based on IP address geolocation")]
    pub(crate) async fn get_time_by_ip(
        &self,
        Parameters(request): Parameters<GetTimeByIpRequest>,
    ) -> McpResult<CallToolResult> {
        let outcome = self.world_clock.get_time_by_ip(request.ip.as_deref()).await;
        Ok(render_outcome(outcome, "Error getting time by IP"))
    }

    #[tool(description = "Compare current time across multiple timezones")]
    pub(crate) async fn compare_timezones(
        &self,
        Parameters(request): Parameters<CompareTimezonesRequest>,
    ) -> McpResult<CallToolResult> {
        // Per-zone failures are folded into the entries; only rendering can fail here.
        let comparison = self.world_clock.compare_timezones(&request.timezones).await;
        Ok(render_outcome(Ok(comparison), "Error comparing timezones"))
    }

    #[tool(description = "Convert a specific datetime from one timezone to another")]
    pub(crate) async fn convert_time(
        &self,
        Parameters(request): Parameters<ConvertTimeRequest>,
    ) -> McpResult<CallToolResult> {
        let outcome = self
            .world_clock
            .convert_time(
                &request.datetime,
                &request.from_timezone,
                &request.to_timezone,
            )
            .await;
        Ok(render_outcome(outcome, "Error converting time"))
    }
}

#[prompt_router]
impl WorldClockService {
    /// Guidance for working with world clock tools
    #[prompt(name = "world_clock_guidance")]
    async fn world_clock_guidance(
        &self,
        _ctx: RequestContext<RoleServer>,
    ) -> McpResult<Vec<PromptMessage>> {
        let prompt = format!(
            r#"You can work with world time data through five tools.

1. **Get current time**: Use get_current_time with an IANA zone like 'America/New_York' or 'Europe/London'.

2. **Discover zones**: Use get_timezone_list, optionally with an area filter such as 'America', 'Europe' or 'Asia'.

3. **Time by address**: Use get_time_by_ip. Omit the ip argument to use the requester's own address.

4. **Compare zones**: Use compare_timezones with a list of zone names. A zone that fails to resolve reports its error inline without hiding the other zones.

5. **Convert datetimes**: Use convert_time with a datetime in ISO format (2024-01-15T14:30:00) or 'YYYY-MM-DD HH:MM:SS' form plus source and target zones. Conversions apply each zone's current UTC offset.

All data comes from the World Time API at {BASE_URL}."#
        );

        Ok(vec![PromptMessage {
            role: PromptMessageRole::Assistant,
            content: PromptMessageContent::text(prompt),
        }])
    }
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for WorldClockService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "This server answers world clock questions from the World Time API. \
                 Use get_current_time for a single zone, get_timezone_list to discover \
                 zone names, get_time_by_ip for address-based lookup, compare_timezones \
                 for a side-by-side view and convert_time to translate a datetime \
                 between zones. Zone names use the IANA 'Area/Location' form."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> McpResult<ListResourcesResult> {
        Ok(ListResourcesResult {
            resources: vec![
                self.create_resource_text("worldclock://status", "server-status"),
                self.create_resource_text("worldclock://help", "help-documentation"),
                self.create_resource_text("worldclock://endpoints", "api-endpoints"),
            ],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> McpResult<ReadResourceResult> {
        match uri.as_str() {
            "worldclock://status" => {
                let status = self.generate_status_content();
                Ok(ReadResourceResult {
                    contents: vec![ResourceContents::text(status, uri)],
                })
            }
            "worldclock://help" => {
                let help = self.generate_help_content();
                Ok(ReadResourceResult {
                    contents: vec![ResourceContents::text(help, uri)],
                })
            }
            "worldclock://endpoints" => {
                let endpoints = self.generate_endpoints_content();
                Ok(ReadResourceResult {
                    contents: vec![ResourceContents::text(endpoints, uri)],
                })
            }
            _ => Err(WorldClockError::ResourceNotFound { uri }.into()),
        }
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> McpResult<ListResourceTemplatesResult> {
        Ok(ListResourceTemplatesResult {
            next_cursor: None,
            resource_templates: Vec::new(),
        })
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> McpResult<InitializeResult> {
        tracing::info!("World Clock MCP Server initialized successfully");
        Ok(self.get_info())
    }
}

/// Run the world clock MCP server over stdio
pub async fn run(timeout: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let service = WorldClockService::new(timeout)?
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}
