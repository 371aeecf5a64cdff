//! Configuration loader
//!
//! Loads the panel connection settings from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `XUI_HOST`: Panel base URL (required)
//! - `XUI_USERNAME`: Panel username (required)
//! - `XUI_PASSWORD`: Panel password
//! - `XUI_TOKEN`: Login secret
//! - `XUI_TLS_VERIFY`: Verify the server certificate (true/false, default true)
//! - `XUI_CA_CERT`: Path to an extra PEM root certificate
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./xui.toml` or `./xui.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use xui_domain::{PanelConfig, Result, XuiError};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `XuiError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<PanelConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `XuiError::Config` if `XUI_HOST` or `XUI_USERNAME` is missing,
/// `XUI_TLS_VERIFY` is not a recognised boolean, or the result fails
/// validation.
pub fn load_from_env() -> Result<PanelConfig> {
    let host = env_var("XUI_HOST")?;
    let username = env_var("XUI_USERNAME")?;
    let password = std::env::var("XUI_PASSWORD").unwrap_or_default();

    let mut config = PanelConfig::new(host, username, password)
        .with_tls_verify(env_bool("XUI_TLS_VERIFY", true)?);

    if let Some(token) = env_opt("XUI_TOKEN") {
        config = config.with_token(token);
    }
    if let Some(path) = env_opt("XUI_CA_CERT") {
        config = config.with_custom_certificate(path);
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `XuiError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<PanelConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(XuiError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            XuiError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| XuiError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<PanelConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| XuiError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| XuiError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(XuiError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["xui.toml", "xui.json", "config.toml", "config.json"];

    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| XuiError::Config(format!("Missing required environment variable: {}", key)))
}

/// Optional environment variable; empty counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Unset or empty gives `default`; anything else is a config error.
fn env_bool(key: &str, default: bool) -> Result<bool> {
    let Some(value) = env_opt(key) else {
        return Ok(default);
    };

    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(XuiError::Config(format!(
            "Invalid {key} value '{value}', expected true or false"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: [&str; 6] =
        ["XUI_HOST", "XUI_USERNAME", "XUI_PASSWORD", "XUI_TOKEN", "XUI_TLS_VERIFY", "XUI_CA_CERT"];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("XUI_TEST_BOOL_ON", "ON");
        std::env::set_var("XUI_TEST_BOOL_ZERO", "0");
        std::env::set_var("XUI_TEST_BOOL_TYPO", "ture");
        std::env::remove_var("XUI_TEST_BOOL_MISSING");

        assert!(env_bool("XUI_TEST_BOOL_ON", false).unwrap());
        assert!(!env_bool("XUI_TEST_BOOL_ZERO", true).unwrap());
        assert!(env_bool("XUI_TEST_BOOL_MISSING", true).unwrap());
        assert!(!env_bool("XUI_TEST_BOOL_MISSING", false).unwrap());
        assert!(matches!(
            env_bool("XUI_TEST_BOOL_TYPO", true),
            Err(XuiError::Config(msg)) if msg.contains("XUI_TEST_BOOL_TYPO") && msg.contains("ture")
        ));

        std::env::remove_var("XUI_TEST_BOOL_ON");
        std::env::remove_var("XUI_TEST_BOOL_ZERO");
        std::env::remove_var("XUI_TEST_BOOL_TYPO");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("XUI_HOST", "https://panel.local:2053/");
        std::env::set_var("XUI_USERNAME", "admin");
        std::env::set_var("XUI_PASSWORD", "secret");
        std::env::set_var("XUI_TOKEN", "login-secret");
        std::env::set_var("XUI_TLS_VERIFY", "false");
        std::env::set_var("XUI_CA_CERT", "/etc/ssl/panel.pem");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.base_url(), "https://panel.local:2053");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "secret");
        assert_eq!(config.token.as_deref(), Some("login-secret"));
        assert!(!config.use_tls_verify);
        assert_eq!(config.custom_certificate_path, Some(PathBuf::from("/etc/ssl/panel.pem")));
    }

    #[test]
    fn test_load_from_env_defaults_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("XUI_HOST", "http://127.0.0.1:2053");
        std::env::set_var("XUI_USERNAME", "admin");
        std::env::set_var("XUI_TOKEN", "");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert!(config.password.is_empty());
        assert!(config.token.is_none());
        assert!(config.use_tls_verify);
        assert!(config.custom_certificate_path.is_none());
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("XUI_USERNAME", "admin");
        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(XuiError::Config(msg)) if msg.contains("XUI_HOST")));
    }

    #[test]
    fn test_load_from_env_rejects_invalid_host() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("XUI_HOST", "panel.local:2053");
        std::env::set_var("XUI_USERNAME", "admin");
        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(XuiError::Config(_))));
    }

    #[test]
    fn test_load_from_env_rejects_unknown_tls_verify() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("XUI_HOST", "https://panel.local");
        std::env::set_var("XUI_USERNAME", "admin");
        std::env::set_var("XUI_TLS_VERIFY", "ture");
        let result = load_from_env();
        clear_env();

        assert!(matches!(
            result,
            Err(XuiError::Config(msg)) if msg == "Invalid XUI_TLS_VERIFY value 'ture', expected true or false"
        ));
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/xui.toml")));
        assert!(matches!(result, Err(XuiError::Config(_))));
    }

    #[test]
    fn test_parse_config_json() {
        let json_content = r#"{
            "host": "https://panel.local",
            "username": "admin",
            "password": "admin",
            "use_tls_verify": false
        }"#;

        let config = parse_config(json_content, Path::new("xui.json")).expect("valid JSON");
        assert!(!config.use_tls_verify);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
host = "https://panel.local/secret/"
username = "admin"
password = "admin"
token = "login-secret"
custom_certificate_path = "/etc/ssl/panel.pem"
"#;

        let config = parse_config(toml_content, Path::new("xui.toml")).expect("valid TOML");
        assert_eq!(config.base_url(), "https://panel.local/secret");
        assert_eq!(config.token.as_deref(), Some("login-secret"));
        assert!(config.use_tls_verify);
    }

    #[test]
    fn test_parse_config_missing_username() {
        let result = parse_config(r#"host = "https://panel.local""#, Path::new("xui.toml"));
        assert!(matches!(result, Err(XuiError::Config(msg)) if msg.contains("TOML")));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("host: x", Path::new("xui.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
