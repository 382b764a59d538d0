pub mod error;
pub mod fetch;
pub mod mcp_api;
pub mod redis;
