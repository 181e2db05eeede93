//! Server module containing the EpicConsultServer implementation

use crate::config::Config;
use crate::error::{EpicConsultError, Result};
use crate::store::{ConsultationStore, open_store};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

// Submodules
pub mod router;

/// MCP server state shared by every session. Cloned per connection.
#[derive(Clone)]
pub struct EpicConsultServer {
    pub config: Arc<Config>,
    pub store: Arc<dyn ConsultationStore>,
}

impl EpicConsultServer {
    pub fn new(config: Arc<Config>, store: Arc<dyn ConsultationStore>) -> Self {
        Self { config, store }
    }

    /// Open the configured store and build a server around it.
    pub async fn open(config: Config) -> Result<Self> {
        let store = open_store(&config).await?;
        tracing::info!(
            "consultation store ready (backend={}, ttl_days={})",
            store.backend(),
            config.system.cache_ttl_days
        );
        Ok(Self::new(Arc::new(config), store))
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_millis(self.config.runtime.tool_timeout_ms)
    }

    /// Run `fut` under the tool-call timeout budget.
    pub async fn with_tool_timeout<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.tool_timeout(), fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "{} exceeded {}ms",
                    operation,
                    self.config.runtime.tool_timeout_ms
                );
                Err(EpicConsultError::Timeout {
                    operation: operation.to_string(),
                    timeout_ms: self.config.runtime.tool_timeout_ms,
                })
            }
        }
    }
}

/// Deserialize tool arguments. Absent arguments are an empty object.
pub fn parse_arguments<T: DeserializeOwned>(arguments: Option<Map<String, Value>>) -> Result<T> {
    let args = Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(args).map_err(|e| EpicConsultError::InvalidParams {
        message: e.to_string(),
    })
}
