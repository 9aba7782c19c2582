//! Daemon configuration from environment variables

use anyhow::{bail, Context, Result};
use batchpace_api_rpc::server::{RpcServerConfig, DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use batchpace_infra_system::simulated_processor::DEFAULT_LATENCY;
use std::time::Duration;

pub const ENV_RPC_HOST: &str = "BATCHPACE_RPC_HOST";
pub const ENV_RPC_PORT: &str = "BATCHPACE_RPC_PORT";
pub const ENV_LOG_FORMAT: &str = "BATCHPACE_LOG_FORMAT";
pub const ENV_PROCESSOR: &str = "BATCHPACE_PROCESSOR";
pub const ENV_ITEM_LATENCY_MS: &str = "BATCHPACE_ITEM_LATENCY_MS";
pub const ENV_FETCH_URL: &str = "BATCHPACE_FETCH_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Which per-item processor the daemon wires in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorConfig {
    Simulated { latency: Duration },
    Http { url_template: String },
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub rpc: RpcServerConfig,
    pub log_format: LogFormat,
    pub processor: ProcessorConfig,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(ENV_RPC_HOST).unwrap_or_else(|| DEFAULT_RPC_HOST.to_string());
        let port = match lookup(ENV_RPC_PORT) {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("{} must be a port number, got '{}'", ENV_RPC_PORT, raw))?,
            None => DEFAULT_RPC_PORT,
        };

        let log_format = match lookup(ENV_LOG_FORMAT).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("{} must be 'pretty' or 'json', got '{}'", ENV_LOG_FORMAT, other),
        };

        let processor = match lookup(ENV_PROCESSOR).as_deref() {
            None | Some("simulated") => {
                let latency = match lookup(ENV_ITEM_LATENCY_MS) {
                    Some(raw) => Duration::from_millis(raw.parse::<u64>().with_context(|| {
                        format!("{} must be milliseconds, got '{}'", ENV_ITEM_LATENCY_MS, raw)
                    })?),
                    None => DEFAULT_LATENCY,
                };
                ProcessorConfig::Simulated { latency }
            }
            Some("http") => {
                let url_template = lookup(ENV_FETCH_URL).with_context(|| {
                    format!("{} is required when {}=http", ENV_FETCH_URL, ENV_PROCESSOR)
                })?;
                ProcessorConfig::Http { url_template }
            }
            Some(other) => bail!(
                "{} must be 'simulated' or 'http', got '{}'",
                ENV_PROCESSOR,
                other
            ),
        };

        Ok(Self {
            rpc: RpcServerConfig { host, port },
            log_format,
            processor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio_test::{assert_err, assert_ok};

    fn config(vars: &[(&str, &str)]) -> Result<DaemonConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = assert_ok!(config(&[]));
        assert_eq!(cfg.rpc.host, "127.0.0.1");
        assert_eq!(cfg.rpc.port, 9633);
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(
            cfg.processor,
            ProcessorConfig::Simulated {
                latency: Duration::from_millis(1000)
            }
        );
    }

    #[test]
    fn test_overrides() {
        let cfg = assert_ok!(config(&[
            (ENV_RPC_HOST, "0.0.0.0"),
            (ENV_RPC_PORT, "8080"),
            (ENV_LOG_FORMAT, "json"),
            (ENV_ITEM_LATENCY_MS, "250"),
        ]));
        assert_eq!(cfg.rpc.host, "0.0.0.0");
        assert_eq!(cfg.rpc.port, 8080);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(
            cfg.processor,
            ProcessorConfig::Simulated {
                latency: Duration::from_millis(250)
            }
        );
    }

    #[test]
    fn test_http_processor_requires_url() {
        assert_err!(config(&[(ENV_PROCESSOR, "http")]));

        let cfg = assert_ok!(config(&[
            (ENV_PROCESSOR, "http"),
            (ENV_FETCH_URL, "http://svc/items/{id}"),
        ]));
        assert_eq!(
            cfg.processor,
            ProcessorConfig::Http {
                url_template: "http://svc/items/{id}".into()
            }
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_err!(config(&[(ENV_RPC_PORT, "99999")]));
        assert_err!(config(&[(ENV_LOG_FORMAT, "xml")]));
        assert_err!(config(&[(ENV_PROCESSOR, "grpc")]));
        assert_err!(config(&[(ENV_ITEM_LATENCY_MS, "soon")]));
    }
}
