// ABOUTME: Environment resolution for source and target connection parameters
// ABOUTME: Fails fast on missing keys before any connection is opened

use anyhow::{bail, Result};

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Connection parameters for the source cluster (plain-HTTP deployment).
#[derive(Debug, Clone)]
pub struct SourceEndpoint {
    pub host: String,
    pub http_port: u16,
    pub grpc_port: u16,
    pub api_key: String,
}

impl SourceEndpoint {
    /// REST base URL for the source. The source deployment serves plain HTTP.
    pub fn rest_url(&self) -> String {
        format!("http://{}:{}", self.host, self.http_port)
    }
}

/// Connection parameters for the target cluster (cloud REST URL).
#[derive(Debug, Clone)]
pub struct TargetEndpoint {
    pub rest_url: String,
    pub api_key: String,
}

/// Fully resolved migration configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceEndpoint,
    pub target: TargetEndpoint,
    pub batch_size: usize,
}

impl Config {
    /// Resolve configuration from the process environment.
    ///
    /// Required keys: `SOURCE_HOST`, `SOURCE_HTTP_PORT`, `SOURCE_GRPC_PORT`,
    /// `SOURCE_API_KEY`, `TARGET_REST`, `TARGET_API_KEY`. Optional: `BATCH_SIZE`
    /// (default 100). Any missing required key is an error naming the key, raised
    /// before the first network call.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => bail!("Environment variable {} is required but not set", key),
            }
        };

        let source = SourceEndpoint {
            host: require("SOURCE_HOST")?,
            http_port: parse_port("SOURCE_HTTP_PORT", &require("SOURCE_HTTP_PORT")?)?,
            grpc_port: parse_port("SOURCE_GRPC_PORT", &require("SOURCE_GRPC_PORT")?)?,
            api_key: require("SOURCE_API_KEY")?,
        };

        let target = TargetEndpoint {
            rest_url: require("TARGET_REST")?,
            api_key: require("TARGET_API_KEY")?,
        };

        let batch_size = match lookup("BATCH_SIZE") {
            Some(raw) => parse_batch_size(&raw)?,
            None => DEFAULT_BATCH_SIZE,
        };

        Ok(Config {
            source,
            target,
            batch_size,
        })
    }
}

fn parse_port(key: &str, raw: &str) -> Result<u16> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => bail!("{} must be a valid port number, got '{}'", key, raw),
    }
}

fn parse_batch_size(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => bail!("BATCH_SIZE must be a positive integer, got '{}'", raw),
    }
}
