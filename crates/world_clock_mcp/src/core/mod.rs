//! # World Clock MCP Server Core
//!
//! This module provides world clock operations backed by the World Time API.
//!
//! ## Features
//! - Current time queries for any IANA timezone
//! - Timezone catalog listings with optional area filtering
//! - Time lookup by IP address geolocation
//! - Side-by-side comparison across multiple timezones
//! - Datetime conversion between timezones using current UTC offsets
//!
//! ## Modules
//! - `api`: HTTP client for the World Time API
//! - `error`: Custom error types and error handling
//! - `models`: Data structures for requests and responses
//! - `provider`: Core world clock queries and conversions
//! - `utils`: Offset parsing and datetime helpers

pub mod api;
pub mod error;
pub mod models;
pub mod provider;
pub mod utils;
