//! BI Portal Web Server
//!
//! Serves the login form, the role-gated dashboard and the report pages.

use anyhow::Context;
use biportal_core::{init_logging, LogFormat, LoggingConfig, PortalConfig};
use biportal_web::server::PortalServerBuilder;
use biportal_web::WebConfig;
use clap::Parser;

/// BI Portal Web Server - role-gated access to embedded report pages
#[derive(Parser)]
#[command(name = "biportal-web")]
#[command(about = "Web portal for embedded BI reports")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Static files directory
    #[arg(long)]
    static_dir: Option<String>,

    /// Portal configuration file (users, page policy)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Command line flags win over environment values
    fn apply(&self, config: &mut WebConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.dev {
            config.dev_mode = true;
        }
        if let Some(static_dir) = &self.static_dir {
            config.static_dir = Some(static_dir.clone());
        }
        if let Some(path) = &self.config {
            config.config_path = Some(path.clone());
        }
    }
}

/// Logging from the portal file, adjusted by `--log-level` and dev mode.
///
/// Dev mode switches to pretty output with source locations and debug level
/// unless a level was given explicitly.
fn logging_config(file: &LoggingConfig, log_level: Option<&str>, dev_mode: bool) -> LoggingConfig {
    let level = log_level.or(if dev_mode { Some("debug") } else { None });

    let mut logging = match level {
        Some(level) => LoggingConfig {
            format: file.format,
            include_location: file.include_location,
            ..LoggingConfig::for_level(level)
        },
        None => file.clone(),
    };

    if dev_mode {
        logging.format = LogFormat::Pretty;
        logging.include_location = true;
    }

    logging
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let mut config = WebConfig::from_env();
    args.apply(&mut config);

    let portal_config = match &config.config_path {
        Some(path) => PortalConfig::from_file(path)
            .with_context(|| format!("Failed to load portal config from {}", path))?,
        None => PortalConfig::default(),
    };

    let logging = logging_config(
        &portal_config.logging,
        args.log_level.as_deref(),
        config.dev_mode,
    );
    init_logging(&logging).map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))?;

    let server = PortalServerBuilder::with_config(config)
        .portal_config(portal_config)
        .build()
        .context("Failed to build server")?;

    server.start().await.context("Server failed")?;

    Ok(())
}
