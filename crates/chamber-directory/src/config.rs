use std::time::Duration;

use chamber_common::fetch::DataSource;

use crate::error::AppError;

const DEFAULT_DATA_SOURCE: &str = "data/members.json";
const DEFAULT_QUIET_MS: u64 = 300;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_source: DataSource,
    pub redis_url: Option<String>,
    /// Quiet period before a typed query is applied.
    pub search_quiet: Duration,
    pub search_address: bool,
    pub fetch_timeout: Duration,
    pub mcp_tcp_addr: Option<String>,
    pub http_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `CHAMBER_DATA_SOURCE` (file path or http(s) URL, default: "data/members.json")
    /// - `REDIS_URL` (omit to run without visit tracking)
    /// - `CHAMBER_SEARCH_QUIET_MS` (default: 300)
    /// - `CHAMBER_SEARCH_ADDRESS` (1/true/yes to match queries against addresses)
    /// - `CHAMBER_FETCH_TIMEOUT_SECS` (default: 10)
    /// - `MCP_TCP_LISTEN_ADDR` (serve MCP on TCP instead of stdio)
    /// - `CHAMBER_HTTP_LISTEN_ADDR` (serve the HTML directory page)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let source = lookup("CHAMBER_DATA_SOURCE").unwrap_or_else(|| DEFAULT_DATA_SOURCE.to_string());
        let data_source = DataSource::parse(&source)
            .map_err(|e| AppError::Config(format!("CHAMBER_DATA_SOURCE: {e}")))?;

        let search_quiet = Duration::from_millis(parse_number(
            &lookup,
            "CHAMBER_SEARCH_QUIET_MS",
            DEFAULT_QUIET_MS,
        )?);
        let fetch_timeout = Duration::from_secs(parse_number(
            &lookup,
            "CHAMBER_FETCH_TIMEOUT_SECS",
            DEFAULT_FETCH_TIMEOUT_SECS,
        )?);

        let search_address = lookup("CHAMBER_SEARCH_ADDRESS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            data_source,
            redis_url: non_empty(lookup("REDIS_URL")),
            search_quiet,
            search_address,
            fetch_timeout,
            mcp_tcp_addr: non_empty(lookup("MCP_TCP_LISTEN_ADDR")),
            http_addr: non_empty(lookup("CHAMBER_HTTP_LISTEN_ADDR")),
        })
    }
}

fn parse_number(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, AppError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| AppError::Config(format!("{key} must be a non-negative integer, got '{raw}'"))),
        None => Ok(default),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.data_source, DataSource::File(PathBuf::from("data/members.json")));
        assert_eq!(config.search_quiet, Duration::from_millis(300));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert!(!config.search_address);
        assert!(config.redis_url.is_none());
        assert!(config.mcp_tcp_addr.is_none());
        assert!(config.http_addr.is_none());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("CHAMBER_DATA_SOURCE", "https://chamber.example/members.json"),
            ("CHAMBER_SEARCH_QUIET_MS", "0"),
            ("CHAMBER_SEARCH_ADDRESS", "Yes"),
            ("REDIS_URL", "redis://127.0.0.1:6379"),
            ("CHAMBER_HTTP_LISTEN_ADDR", "127.0.0.1:8080"),
            ("MCP_TCP_LISTEN_ADDR", " "),
        ])
        .unwrap();
        assert_eq!(
            config.data_source,
            DataSource::Url("https://chamber.example/members.json".to_string())
        );
        assert_eq!(config.search_quiet, Duration::ZERO);
        assert!(config.search_address);
        assert_eq!(config.redis_url.as_deref(), Some("redis://127.0.0.1:6379"));
        assert_eq!(config.http_addr.as_deref(), Some("127.0.0.1:8080"));
        assert!(config.mcp_tcp_addr.is_none());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = config(&[("CHAMBER_SEARCH_QUIET_MS", "soon")]).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("CHAMBER_SEARCH_QUIET_MS")));
    }

    #[test]
    fn empty_data_source_is_rejected() {
        assert!(matches!(config(&[("CHAMBER_DATA_SOURCE", "")]), Err(AppError::Config(_))));
    }
}
