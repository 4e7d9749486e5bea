/// Configuration schema and defaults for mldash.
///
/// Defines the TOML-serializable configuration with four sections:
/// `[api]`, `[web]`, `[display]`, and `[logging]`. Every field has a
/// built-in default, so users only set what they want to override.
use serde::{Deserialize, Serialize};

use crate::projector::ChartKind;

/// Default inference API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default address for the embedded dashboard.
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:9747";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level mldash configuration.
///
/// Maps directly to `~/.mldash/config.toml` and `.mldash.toml`. Missing
/// sections and fields fall back to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub api: ApiConfig,
    pub web: WebConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Inference API connection settings.
///
/// No timeout or retry setting: each request is a single attempt with the
/// HTTP client's default timeouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the inference API, without a trailing slash.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// `host:port` the dashboard listens on.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WEB_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Chart shown first on the Visualizations page.
    pub default_chart: ChartKind,
    /// Maximum prediction rows printed in CLI tables.
    pub max_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_chart: ChartKind::Pie,
            max_rows: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Diagnostic level on stderr: `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl DashConfig {
    /// The annotated config written by `mldash config init`.
    pub fn default_toml() -> String {
        r#"# mldash configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (MLDASH_*)
#   2. Project config (.mldash.toml in current directory)
#   3. User global config (~/.mldash/config.toml)
#   4. Built-in defaults

[api]
base_url = "http://localhost:8000"   # or MLDASH_API_URL

[web]
addr = "127.0.0.1:9747"
open_browser = true

[display]
default_chart = "pie"   # pie | bar | line | radar
max_rows = 10

[logging]
level = "warn"          # error | warn | info | debug | trace
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
