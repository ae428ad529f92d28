use rmcp::ErrorData as McpError;
use rmcp::serde_json::json;

// Error codes
const ERROR_API_STATUS: &str = "api_status";
const ERROR_TRANSPORT: &str = "transport_error";
const ERROR_HTTP_CLIENT: &str = "http_client_error";
const ERROR_INVALID_DATETIME_FORMAT: &str = "invalid_datetime_format";
const ERROR_INVALID_UTC_OFFSET: &str = "invalid_utc_offset";
const ERROR_UNEXPECTED_PAYLOAD: &str = "unexpected_payload";
const ERROR_DATETIME_OUT_OF_RANGE: &str = "datetime_out_of_range";
const ERROR_RESOURCE_NOT_FOUND: &str = "resource_not_found";

/// Custom error types for better error handling
#[derive(Debug, thiserror::Error)]
pub enum WorldClockError {
    #[error("API request failed with status {status}")]
    ApiStatus { status: u16 },
    #[error("Failed to fetch {url}: {message}")]
    Transport { url: String, message: String },
    #[error("HTTP client error: {message}")]
    HttpClient { message: String },
    #[error("Invalid datetime format: {datetime}")]
    InvalidDatetimeFormat { datetime: String },
    #[error("Invalid UTC offset: {offset}. Expected +HH:MM or -HH:MM format")]
    InvalidUtcOffset { offset: String },
    #[error("Unexpected response payload: {message}")]
    UnexpectedPayload { message: String },
    #[error("Datetime out of range: {datetime}")]
    DatetimeOutOfRange { datetime: String },
    #[error("Resource not found: {uri}")]
    ResourceNotFound { uri: String },
}

impl From<WorldClockError> for McpError {
    fn from(err: WorldClockError) -> Self {
        match err {
            WorldClockError::ApiStatus { status } => {
                McpError::internal_error(ERROR_API_STATUS, Some(json!({ "status": status })))
            }
            WorldClockError::Transport { url, message } => McpError::internal_error(
                ERROR_TRANSPORT,
                Some(json!({ "url": url, "message": message })),
            ),
            WorldClockError::HttpClient { message } => {
                McpError::internal_error(ERROR_HTTP_CLIENT, Some(json!({ "message": message })))
            }
            WorldClockError::InvalidDatetimeFormat { datetime } => McpError::invalid_params(
                ERROR_INVALID_DATETIME_FORMAT,
                Some(json!({
                    "datetime": datetime,
                    "expected_formats": ["ISO 8601 (e.g. 2024-01-15T14:30:00)", "YYYY-MM-DD HH:MM:SS"]
                })),
            ),
            WorldClockError::InvalidUtcOffset { offset } => McpError::invalid_params(
                ERROR_INVALID_UTC_OFFSET,
                Some(json!({ "offset": offset, "expected_format": "+HH:MM or -HH:MM" })),
            ),
            WorldClockError::UnexpectedPayload { message } => {
                McpError::internal_error(ERROR_UNEXPECTED_PAYLOAD, Some(json!({ "message": message })))
            }
            WorldClockError::DatetimeOutOfRange { datetime } => McpError::invalid_params(
                ERROR_DATETIME_OUT_OF_RANGE,
                Some(json!({ "datetime": datetime })),
            ),
            WorldClockError::ResourceNotFound { uri } => McpError::resource_not_found(
                ERROR_RESOURCE_NOT_FOUND,
                Some(json!({
                    "uri": uri,
                    "available_resources": [
                        "worldclock://status",
                        "worldclock://help",
                        "worldclock://endpoints"
                    ]
                })),
            ),
        }
    }
}

pub type WorldClockResult<T> = Result<T, WorldClockError>;
pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::WorldClockError;
    use crate::core::error::McpError;

    #[test]
    fn test_error_display_messages() {
        let err = WorldClockError::ApiStatus { status: 404 };
        assert_eq!(err.to_string(), "API request failed with status 404");

        let err = WorldClockError::InvalidDatetimeFormat {
            datetime: "not-a-date".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid datetime format: not-a-date");

        let err = WorldClockError::Transport {
            url: "http://worldtimeapi.org/api/ip".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("http://worldtimeapi.org/api/ip"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_conversion() {
        let error = WorldClockError::InvalidUtcOffset {
            offset: "bogus".to_string(),
        };
        let mcp_error: McpError = error.into();

        // Should convert to proper MCP error format
        assert!(mcp_error.to_string().contains("invalid_utc_offset"));
    }

    #[test]
    fn test_resource_not_found_conversion() {
        let error = WorldClockError::ResourceNotFound {
            uri: "worldclock://nope".to_string(),
        };
        let mcp_error: McpError = error.into();
        assert!(mcp_error.to_string().contains("resource_not_found"));
    }
}
