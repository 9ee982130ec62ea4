use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Simulated device latency before an execution task picks its outcome.
    pub execution_delay: Duration,
    /// Upper bound on concurrently running execution tasks.
    pub max_inflight_executions: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let execution_delay_ms = env::var("EXECUTION_DELAY_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse::<u64>()
            .context("EXECUTION_DELAY_MS must be a valid u64")?;

        let max_inflight_executions = env::var("MAX_INFLIGHT_EXECUTIONS")
            .unwrap_or_else(|_| "64".to_string())
            .parse::<u32>()
            .context("MAX_INFLIGHT_EXECUTIONS must be a valid u32")?;

        Ok(Self {
            host,
            port,
            execution_delay: Duration::from_millis(execution_delay_ms),
            max_inflight_executions,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
