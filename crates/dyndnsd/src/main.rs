// # dyndnsd - DynDNS Endpoint Daemon
//
// Thin integration layer: all update logic lives in dyndns-core. The daemon
// is responsible for:
//
// 1. Reading configuration from environment variables
// 2. Initializing tracing
// 3. Wiring the Cloudflare backend and the env secret store into a handler
// 4. Serving normalized request events
//
// The deployment transport is out of scope (the system originated behind an
// API-gateway proxy integration). The daemon stands in for it by consuming
// line-delimited JSON `ApiRequest` events on stdin and emitting one JSON
// `ApiResponse` per line on stdout.
//
// ## Configuration
//
// All configuration is via environment variables:
//
// - `DYNDNS_API_TOKEN`: Cloudflare API token (required)
// - `DYNDNS_MODE`: `live` (default) or `dry-run`
// - `DYNDNS_DEFAULT_TTL`: TTL for records with no TTL to preserve
// - `DYNDNS_USERNAME_PARAM` / `DYNDNS_PASSWORD_PARAM`: logical secret names
//   for the update credentials (resolved by the env secret store, e.g.
//   `dyndns-username` -> `DYNDNS_USERNAME`)
// - `DYNDNS_LOG_LEVEL`: trace|debug|info|warn|error
//
// ## Example
//
// ```bash
// export DYNDNS_API_TOKEN=your_token
// export DYNDNS_USERNAME=dnsuser
// export DYNDNS_PASSWORD=secret
//
// echo '{"authorization":"Basic ...","query":{"hostname":"www.example.com","myip":"1.2.3.4"}}' | dyndnsd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use dyndns_backend_cloudflare::CloudflareBackend;
use dyndns_core::{ApiRequest, DynDnsConfig, EnvSecretStore, RequestHandler};

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (stdin closed or signal received)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Daemon configuration
struct Config {
    api_token: String,
    mode: String,
    default_ttl: u32,
    username_param: String,
    password_param: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_token: env::var("DYNDNS_API_TOKEN").map_err(|_| {
                anyhow::anyhow!(
                    "DYNDNS_API_TOKEN is required. \
                    Set it via: export DYNDNS_API_TOKEN=your_token"
                )
            })?,
            mode: env::var("DYNDNS_MODE").unwrap_or_else(|_| "live".to_string()),
            default_ttl: env::var("DYNDNS_DEFAULT_TTL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
            username_param: env::var("DYNDNS_USERNAME_PARAM")
                .unwrap_or_else(|_| "dyndns-username".to_string()),
            password_param: env::var("DYNDNS_PASSWORD_PARAM")
                .unwrap_or_else(|_| "dyndns-password".to_string()),
            log_level: env::var("DYNDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            anyhow::bail!("DYNDNS_API_TOKEN cannot be empty");
        }

        // Catch obvious placeholder tokens (common mistake)
        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_token") || token_lower.contains("replace_me") {
            anyhow::bail!(
                "DYNDNS_API_TOKEN appears to be a placeholder. \
                Use an actual API token from Cloudflare."
            );
        }

        match self.mode.as_str() {
            "live" | "dry-run" => {}
            _ => anyhow::bail!(
                "DYNDNS_MODE '{}' is not supported. Supported modes: live, dry-run",
                self.mode
            ),
        }

        if self.default_ttl == 0 {
            anyhow::bail!("DYNDNS_DEFAULT_TTL must be > 0");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DYNDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting dyndnsd");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = serve(config).await {
            error!("Daemon error: {}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire the handler and serve request events until stdin closes or a
/// shutdown signal arrives
async fn serve(config: Config) -> Result<()> {
    let dry_run = config.mode == "dry-run";
    if dry_run {
        warn!("running in DRY-RUN mode - no DNS changes will be made");
    }

    let backend = CloudflareBackend::new(config.api_token, dry_run)?;

    let core_config = DynDnsConfig {
        default_ttl: config.default_ttl,
        username_param: config.username_param,
        password_param: config.password_param,
    };
    core_config.validate()?;

    let handler = RequestHandler::new(
        Arc::new(backend),
        Arc::new(EnvSecretStore::new()),
        core_config,
    );

    info!("Ready to process update request events");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed, shutting down");
                    break;
                };

                if line.trim().is_empty() {
                    continue;
                }

                let request: ApiRequest = match serde_json::from_str(&line) {
                    Ok(request) => request,
                    Err(e) => {
                        warn!("discarding malformed request event: {}", e);
                        continue;
                    }
                };

                let response = handler.handle(&request).await;
                let mut encoded = serde_json::to_string(&response)?;
                encoded.push('\n');
                stdout.write_all(encoded.as_bytes()).await?;
                stdout.flush().await?;
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            api_token: "cf_live_abcdef0123456789".to_string(),
            mode: "live".to_string(),
            default_ttl: 300,
            username_param: "dyndns-username".to_string(),
            password_param: "dyndns-password".to_string(),
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn placeholder_token_is_rejected() {
        let mut config = base_config();
        config.api_token = "your_token_here".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let mut config = base_config();
        config.mode = "simulate".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut config = base_config();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }
}
