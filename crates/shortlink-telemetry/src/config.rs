use clap::{Args, ValueEnum};
use std::fmt::{Display, Formatter};
use typed_builder::TypedBuilder;

pub const LOG_FORMAT_ENV: &str = "SHORTLINK_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "SHORTLINK_OTLP_ENDPOINT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct TelemetryConfig {
    #[builder(setter(into))]
    pub service_name: String,
    #[builder(default)]
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    #[builder(default = "info".to_string(), setter(into))]
    pub default_filter: String,
    #[builder(default, setter(strip_option, into))]
    pub otlp_endpoint: Option<String>,
}

/// Logging flags shared by every binary.
#[derive(Debug, Clone, Args)]
pub struct TelemetryArgs {
    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// OTLP/HTTP traces endpoint; span export is off when unset.
    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl TelemetryArgs {
    pub fn into_config(self, service_name: impl Into<String>) -> TelemetryConfig {
        TelemetryConfig {
            service_name: service_name.into(),
            format: self.log_format,
            default_filter: "info".to_string(),
            otlp_endpoint: self.otlp_endpoint,
        }
    }
}
