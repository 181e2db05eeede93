//! epic-consult: EPIC go-to-market consultations over HTTP, MCP and
//! function-calling descriptors.
//!
//! [`engine`] holds the deterministic scoring pipeline; everything else is
//! transport, caching and presentation around it.

pub mod config;
pub mod deserializers;
pub mod engine;
pub mod error;
pub mod http;
pub mod report;
pub mod schemas;
pub mod server;
pub mod store;
pub mod tools;

pub use engine::compute_consultation;

/// Install the stderr tracing subscriber unless `MCP_NO_LOG` is set.
///
/// stdout stays reserved for the stdio MCP transport and CLI output.
pub fn init_tracing(config: &config::Config) {
    if config.runtime.mcp_no_log {
        return;
    }
    let filter = tracing_subscriber::EnvFilter::try_new(&config.runtime.log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("epic_consult=info,rmcp=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
