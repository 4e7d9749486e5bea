/// Configuration system for mldash.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: [`schema::DashConfig::default()`]
/// 2. **User global config**: `~/.mldash/config.toml`
/// 3. **Project local config**: `.mldash.toml` in the current working directory
/// 4. **Environment variables**: `MLDASH_*` overrides (highest precedence)
///
/// The resolved [`DashConfig`] is loaded once in `main` and passed down;
/// nothing below the CLI layer reads the environment itself.
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::DashConfig;

use crate::projector::ChartKind;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env.
pub fn load() -> DashConfig {
    let mut config = DashConfig::default();

    if let Some(global) = load_toml_file(global_config_path()) {
        merge_config(&mut config, &global);
    }

    if let Some(project) = load_toml_file(project_config_path()) {
        merge_config(&mut config, &project);
    }

    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Malformed files are ignored so a bad edit never stops the dashboard
/// from starting.
fn load_toml_file(path: Option<PathBuf>) -> Option<DashConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            None
        }
    }
}

/// Merge a loaded layer into the base.
///
/// Each file is deserialized with `serde(default)`, so unset keys already
/// hold the built-in defaults; the overlay replaces the base wholesale.
fn merge_config(base: &mut DashConfig, overlay: &DashConfig) {
    *base = overlay.clone();
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.mldash/config.toml`
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".mldash").join("config.toml"))
}

/// `.mldash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".mldash.toml"))
}

pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `MLDASH_API_URL`: inference API base URL
/// - `MLDASH_WEB_ADDR`: dashboard listen address
/// - `MLDASH_OPEN_BROWSER`: `1`/`true`/`yes`/`on`
/// - `MLDASH_CHART`: default chart (`pie`, `bar`, `line`, `radar`)
/// - `MLDASH_LOG`: log level
pub fn apply_env_overrides(config: &mut DashConfig) {
    if let Ok(val) = std::env::var("MLDASH_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("MLDASH_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Ok(val) = std::env::var("MLDASH_OPEN_BROWSER") {
        config.web.open_browser = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("MLDASH_CHART")
        && let Ok(kind) = val.parse::<ChartKind>()
    {
        config.display.default_chart = kind;
    }
    if let Ok(val) = std::env::var("MLDASH_LOG")
        && !val.is_empty()
    {
        config.logging.level = val;
    }
}

/// Check if a string value represents a truthy boolean.
pub fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.mldash/config.toml`.
///
/// Fails if the file exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.mldash/ directory")?;
    }

    fs::write(&path, DashConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a dotted key (e.g. `api.base_url`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let current = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&DashConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&current).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject values that would no longer deserialize (e.g. a bad chart name)
    let updated = toml::to_string_pretty(&root).context("failed to serialize config")?;
    toml::from_str::<DashConfig>(&updated)
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, updated).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML tree using a dotted key path, keeping the type of
/// the value already there.
pub fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((sections, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config keys have the form section.key, got '{key}'");
    };

    let mut current = root;
    for part in sections.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{sections}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults.
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective (fully resolved) config as TOML.
pub fn show_effective_config(config: &DashConfig) -> Result<String> {
    toml::to_string_pretty(config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        for v in ["1", "true", "TRUE", "yes", "on", "ON"] {
            assert!(is_truthy(v), "{v}");
        }
        for v in ["0", "false", "no", "off", ""] {
            assert!(!is_truthy(v), "{v}");
        }
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root: toml::Value = toml::from_str("[api]\nbase_url = \"http://a\"\n").unwrap();
        set_toml_value(&mut root, "api.base_url", "http://b:8000").unwrap();
        assert_eq!(root["api"]["base_url"].as_str(), Some("http://b:8000"));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let mut root: toml::Value = toml::from_str("[web]\nopen_browser = true\n").unwrap();
        set_toml_value(&mut root, "web.open_browser", "off").unwrap();
        assert_eq!(root["web"]["open_browser"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let mut root: toml::Value = toml::from_str("[display]\nmax_rows = 10\n").unwrap();
        set_toml_value(&mut root, "display.max_rows", "25").unwrap();
        assert_eq!(root["display"]["max_rows"].as_integer(), Some(25));
        assert!(set_toml_value(&mut root, "display.max_rows", "lots").is_err());
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let mut root: toml::Value = toml::from_str("[api]\nbase_url = \"x\"\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "v").is_err());
        assert!(set_toml_value(&mut root, "api.missing", "v").is_err());
        assert!(set_toml_value(&mut root, "nodot", "v").is_err());
    }

    #[test]
    fn show_effective_config_round_trips() {
        let text = show_effective_config(&DashConfig::default()).unwrap();
        let back: DashConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, DashConfig::default());
    }
}
