use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

/// Vakio Agent - keeps a Vakio cloud OAuth2 credential alive
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Vakio account login
    #[arg(short = 'l', long, env = "VAKIO_LOGIN")]
    pub login: Option<String>,

    /// OAuth2 client id
    #[arg(long, env = "VAKIO_CID")]
    pub client_id: Option<String>,

    /// OAuth2 client secret
    #[arg(long, env = "VAKIO_SECRET")]
    pub client_secret: Option<String>,

    /// Vakio account password
    #[arg(long, env = "VAKIO_PASSWORD")]
    pub password: Option<String>,

    /// Base URL of the Vakio authority
    #[arg(long, env = "VAKIO_BASE_URL", default_value = "https://dev.vakio.ru")]
    pub base_url: String,

    /// Device poll interval in seconds
    #[arg(long, env = "VAKIO_POLL_INTERVAL", default_value = "300")]
    pub poll_interval: u64,

    /// Report interval in seconds
    #[arg(long, env = "VAKIO_REPORT_INTERVAL", default_value = "600")]
    pub report_interval: u64,

    /// Outbound HTTP request timeout in seconds
    #[arg(long, env = "VAKIO_HTTP_TIMEOUT", default_value = "10")]
    pub http_timeout: u64,

    /// Grace period for tasks to finish on shutdown, in seconds
    #[arg(long, env = "VAKIO_SHUTDOWN_TIMEOUT", default_value = "1")]
    pub shutdown_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    // Account credentials, fixed for the process lifetime
    pub login: String,
    pub client_id: String,
    pub client_secret: String,
    pub password: String,

    // Authority endpoint
    pub base_url: String,

    // Intervals
    pub poll_interval: Duration,
    pub report_interval: Duration,

    // Timeouts
    pub http_timeout: Duration,
    pub shutdown_timeout: Duration,

    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let args = CliArgs::parse();
        Self::from_args(args)
    }

    /// Build a config from parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Config {
            login: args
                .login
                .context("VAKIO_LOGIN is required (use -l or set VAKIO_LOGIN env var)")?,

            client_id: args
                .client_id
                .context("VAKIO_CID is required (use --client-id or set VAKIO_CID env var)")?,

            client_secret: args.client_secret.context(
                "VAKIO_SECRET is required (use --client-secret or set VAKIO_SECRET env var)",
            )?,

            password: args
                .password
                .context("VAKIO_PASSWORD is required (use --password or set VAKIO_PASSWORD env var)")?,

            base_url: normalize_base_url(&args.base_url),

            poll_interval: Duration::from_secs(args.poll_interval),
            report_interval: Duration::from_secs(args.report_interval),
            http_timeout: Duration::from_secs(args.http_timeout),
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout),

            log_level: args.log_level,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.login.is_empty() {
            anyhow::bail!("VAKIO_LOGIN must not be empty");
        }
        if self.client_id.is_empty() {
            anyhow::bail!("VAKIO_CID must not be empty");
        }
        if self.client_secret.is_empty() {
            anyhow::bail!("VAKIO_SECRET must not be empty");
        }
        if self.password.is_empty() {
            anyhow::bail!("VAKIO_PASSWORD must not be empty");
        }
        if self.http_timeout.is_zero() {
            anyhow::bail!("VAKIO_HTTP_TIMEOUT must be greater than zero");
        }

        Ok(())
    }
}

/// Strip trailing slashes so path joining stays predictable
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
