use serde::{Deserialize, Serialize};

/// Main configuration structure loaded from epic_consult.toml and environment variables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Service identity and consultation cache settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub service_name: String,
    /// `memory` or `file`
    pub cache_backend: String,
    pub cache_path: String,
    pub cache_ttl_days: i64,
    pub cache_max: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            service_name: "epic-consult".to_string(),
            cache_backend: "memory".to_string(),
            cache_path: "epic_consultations.json".to_string(),
            cache_ttl_days: 30,
            cache_max: 1000,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub tool_timeout_ms: u64,
    pub mcp_no_log: bool,
    pub log_level: String,
    // HTTP transport configuration
    pub transport: String,
    pub http_bind: std::net::SocketAddr,
    pub http_path: String,
    pub http_sse_keepalive_sec: u64,
    pub http_request_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tool_timeout_ms: 15_000,
            mcp_no_log: false,
            log_level: "epic_consult=info,rmcp=info".to_string(),
            transport: "stdio".to_string(),
            http_bind: std::net::SocketAddr::from(([127, 0, 0, 1], 8787)),
            http_path: "/mcp".to_string(),
            http_sse_keepalive_sec: 15,
            http_request_timeout_ms: 10_000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses EPIC_CONSULT_CONFIG environment variable or defaults to "epic_consult.toml"
    pub fn load() -> anyhow::Result<Self> {
        // EPIC_ENV_FILE if set, otherwise ./.env; missing files are fine
        if let Ok(env_path) = std::env::var("EPIC_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path = std::env::var("EPIC_CONSULT_CONFIG")
            .unwrap_or_else(|_| "epic_consult.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            Self::from_toml(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Parse the `[system]` table from TOML text. Runtime settings stay at defaults.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Env-first overrides for the system table
    pub fn apply_env_overrides(&mut self) {
        if let Ok(backend) = std::env::var("EPIC_CACHE_BACKEND") {
            self.system.cache_backend = backend.to_lowercase();
        }
        if let Ok(path) = std::env::var("EPIC_CACHE_PATH") {
            self.system.cache_path = path;
        }
        if let Some(ttl) = std::env::var("EPIC_CACHE_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
        {
            self.system.cache_ttl_days = ttl;
        }
        if let Some(max) = std::env::var("EPIC_CACHE_MAX")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            self.system.cache_max = max;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.system.cache_ttl_days < 1 {
            anyhow::bail!("EPIC_CACHE_TTL_DAYS must be at least 1");
        }
        if self.system.cache_max < 1 {
            anyhow::bail!("EPIC_CACHE_MAX must be at least 1");
        }
        match self.system.cache_backend.as_str() {
            "memory" => {}
            "file" => {
                if self.system.cache_path.trim().is_empty() {
                    anyhow::bail!("EPIC_CACHE_PATH must be set when cache_backend = \"file\"");
                }
            }
            other => anyhow::bail!(
                "Unknown cache backend '{}', expected 'memory' or 'file'",
                other
            ),
        }
        if !self.runtime.http_path.starts_with('/') {
            anyhow::bail!("EPIC_HTTP_PATH must start with '/'");
        }
        match self.runtime.transport.as_str() {
            "stdio" | "http" => Ok(()),
            other => anyhow::bail!("Unknown transport '{}', expected 'stdio' or 'http'", other),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        let mut cfg = Self {
            tool_timeout_ms: std::env::var("EPIC_TOOL_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15_000),
            mcp_no_log: std::env::var("MCP_NO_LOG")
                .ok()
                .is_some_and(|v| v == "true" || v == "1"),
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "epic_consult=info,rmcp=info".to_string()),
            ..Self::default()
        };

        // HTTP transport configuration
        cfg.transport = std::env::var("EPIC_TRANSPORT")
            .map(|t| t.to_lowercase())
            .unwrap_or_else(|_| "stdio".to_string());
        if let Ok(v) = std::env::var("EPIC_HTTP_BIND")
            && let Ok(bind) = v.parse::<std::net::SocketAddr>()
        {
            cfg.http_bind = bind;
        }
        cfg.http_path = std::env::var("EPIC_HTTP_PATH").unwrap_or_else(|_| "/mcp".to_string());
        if let Some(sse) = std::env::var("EPIC_HTTP_SSE_KEEPALIVE_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            cfg.http_sse_keepalive_sec = sse;
        }
        if let Some(timeout) = std::env::var("EPIC_HTTP_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            cfg.http_request_timeout_ms = timeout;
        }

        cfg
    }
}
