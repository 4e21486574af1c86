//! Tracing initialization for the Lambda function.
//!
//! JSON output suits CloudWatch Logs; text output is easier to read when
//! running locally.

use std::str::FromStr;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" | "pretty" => Ok(LogFormat::Text),
            other => Err(format!("unsupported log format '{other}'")),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            default_filter: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Read `LOG_FORMAT` (`json` or `text`); unknown values fall back to JSON.
    pub fn from_env() -> Self {
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        Self {
            format,
            ..Self::default()
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// This should be called once at the start of the Lambda `main` function,
/// before calling `lambda_runtime::run()`. Later calls are ignored.
///
/// The log level can be controlled via the `RUST_LOG` environment variable.
///
/// # Example
///
/// ```no_run
/// use recipebox_lambda_shared::{init_tracing, LoggingConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), lambda_runtime::Error> {
///     init_tracing(&LoggingConfig::from_env());
///     // ... rest of Lambda setup
///     Ok(())
/// }
/// ```
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let result = match config.format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .flatten_event(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
    };

    if let Err(err) = result {
        tracing::debug!(error = %err, "tracing already initialized");
    }
}
