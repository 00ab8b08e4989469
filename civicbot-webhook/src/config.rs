//! Command line and environment configuration.

use std::net::SocketAddr;
use std::time::Duration;

use civicbot_provider_permits as permits;
use civicbot_provider_waste as waste;
use clap::Parser;

const DEFAULT_LOG_DIRECTIVE: &str = "civicbot=info,tower_http=info";
const VERBOSE_LOG_DIRECTIVE: &str = "civicbot=debug,tower_http=debug";

/// Webhook configuration, read from flags with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "civicbot-webhook",
    version,
    about = "Dialogflow fulfillment webhook for trash pickup and building permit questions"
)]
pub(crate) struct Config {
    /// Address the webhook listens on
    #[arg(long, env = "CIVICBOT_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Root of the waste notifier address lookup
    #[arg(long, env = "CIVICBOT_WASTE_BASE_URL", default_value = waste::DEFAULT_BASE_URL)]
    pub waste_base_url: String,

    /// GraphQL endpoint serving building permits
    #[arg(long, env = "CIVICBOT_PERMITS_ENDPOINT", default_value = permits::DEFAULT_ENDPOINT)]
    pub permits_endpoint: String,

    /// Timeout for outbound requests in seconds (none when unset)
    #[arg(long, env = "CIVICBOT_HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: Option<u64>,

    /// Log request headers, bodies and upstream payloads
    #[arg(short, long, env = "CIVICBOT_VERBOSE")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "CIVICBOT_LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    pub(crate) fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    /// Filter directive used when `RUST_LOG` is not set.
    pub(crate) fn log_directive(&self) -> &'static str {
        if self.verbose {
            VERBOSE_LOG_DIRECTIVE
        } else {
            DEFAULT_LOG_DIRECTIVE
        }
    }
}
