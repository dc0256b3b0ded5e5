//! Configuration loader
//!
//! Loads bridge configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If no credentials are set there, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Credentials (one shape is required):
//! - `REGBRIDGE_ZOOM_ACCOUNT_ID`, `REGBRIDGE_ZOOM_CLIENT_ID`,
//!   `REGBRIDGE_ZOOM_CLIENT_SECRET`: server-to-server OAuth app
//! - `REGBRIDGE_ZOOM_API_KEY`, `REGBRIDGE_ZOOM_API_SECRET`: API key/secret
//!
//! Optional:
//! - `REGBRIDGE_ZOOM_API_BASE_URL`: REST base URL
//! - `REGBRIDGE_ZOOM_TOKEN_URL`: OAuth token endpoint
//! - `REGBRIDGE_ZOOM_EVENTS_API_BASE_URL`: public Zoom Events base URL
//! - `REGBRIDGE_ZOOM_LISTING_LIMIT`: events fetched per listing
//! - `REGBRIDGE_ZOOM_REQUEST_TIMEOUT_SECS`: HTTP timeout in seconds
//! - `REGBRIDGE_PAYLOAD_STRATEGY`: `structured` or `template`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./regbridge.json` or `./regbridge.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. Relative to executable location

use std::path::{Path, PathBuf};

use regbridge_domain::{
    Config, Credentials, PayloadConfig, PayloadStrategy, RegBridgeError, Result, ZoomConfig,
};

/// Load configuration with automatic fallback strategy
///
/// Environment variables are used when any Zoom credential variable is set;
/// an invalid value there is an error. Otherwise the config file is loaded.
///
/// # Errors
/// Returns `RegBridgeError::Config` if:
/// - An environment variable has an invalid value
/// - No credentials are in the environment and no config file loads
/// - File format is invalid or required fields are missing
pub fn load() -> Result<Config> {
    if !env_has_credentials() {
        tracing::debug!("No Zoom credentials in environment, trying file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `RegBridgeError::Config` if neither credential shape is present
/// or a numeric/enum variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let credentials = credentials_from_env()?;
    let mut zoom = ZoomConfig::new(credentials);

    if let Some(url) = env_opt("REGBRIDGE_ZOOM_API_BASE_URL") {
        zoom.api_base_url = url;
    }
    if let Some(url) = env_opt("REGBRIDGE_ZOOM_TOKEN_URL") {
        zoom.token_url = url;
    }
    if let Some(url) = env_opt("REGBRIDGE_ZOOM_EVENTS_API_BASE_URL") {
        zoom.events_api_base_url = url;
    }
    if let Some(limit) = env_opt("REGBRIDGE_ZOOM_LISTING_LIMIT") {
        zoom.listing_limit = Some(limit.parse::<usize>().map_err(|e| {
            RegBridgeError::Config(format!("Invalid listing limit: {}", e))
        })?);
    }
    if let Some(timeout) = env_opt("REGBRIDGE_ZOOM_REQUEST_TIMEOUT_SECS") {
        zoom.request_timeout_secs = timeout.parse::<u64>().map_err(|e| {
            RegBridgeError::Config(format!("Invalid request timeout: {}", e))
        })?;
    }

    let strategy = match env_opt("REGBRIDGE_PAYLOAD_STRATEGY") {
        Some(value) => parse_strategy(&value)?,
        None => PayloadStrategy::default(),
    };

    Ok(Config { zoom, payload: PayloadConfig { strategy } })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `RegBridgeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RegBridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RegBridgeError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RegBridgeError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RegBridgeError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RegBridgeError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(RegBridgeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["regbridge.json", "regbridge.toml", "config.json", "config.toml"];

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

const CREDENTIAL_VARS: [&str; 5] = [
    "REGBRIDGE_ZOOM_ACCOUNT_ID",
    "REGBRIDGE_ZOOM_CLIENT_ID",
    "REGBRIDGE_ZOOM_CLIENT_SECRET",
    "REGBRIDGE_ZOOM_API_KEY",
    "REGBRIDGE_ZOOM_API_SECRET",
];

fn env_has_credentials() -> bool {
    CREDENTIAL_VARS.iter().any(|key| env_opt(key).is_some())
}

/// OAuth wins when any of its variables is set; otherwise API key/secret.
fn credentials_from_env() -> Result<Credentials> {
    let account_id = env_opt("REGBRIDGE_ZOOM_ACCOUNT_ID");
    let client_id = env_opt("REGBRIDGE_ZOOM_CLIENT_ID");
    let client_secret = env_opt("REGBRIDGE_ZOOM_CLIENT_SECRET");

    if account_id.is_some() || client_id.is_some() || client_secret.is_some() {
        return Ok(Credentials::OAuth { account_id, client_id, client_secret });
    }

    let api_key = env_opt("REGBRIDGE_ZOOM_API_KEY");
    let api_secret = env_opt("REGBRIDGE_ZOOM_API_SECRET");

    if api_key.is_some() || api_secret.is_some() {
        return Ok(Credentials::ApiKey { api_key, api_secret });
    }

    Err(RegBridgeError::Config(
        "Missing Zoom credentials: set REGBRIDGE_ZOOM_ACCOUNT_ID/CLIENT_ID/CLIENT_SECRET or \
         REGBRIDGE_ZOOM_API_KEY/API_SECRET"
            .to_string(),
    ))
}

fn parse_strategy(value: &str) -> Result<PayloadStrategy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "structured" => Ok(PayloadStrategy::Structured),
        "template" => Ok(PayloadStrategy::Template),
        other => Err(RegBridgeError::Config(format!("Invalid payload strategy: {}", other))),
    }
}

/// Non-empty environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: [&str; 11] = [
        "REGBRIDGE_ZOOM_ACCOUNT_ID",
        "REGBRIDGE_ZOOM_CLIENT_ID",
        "REGBRIDGE_ZOOM_CLIENT_SECRET",
        "REGBRIDGE_ZOOM_API_KEY",
        "REGBRIDGE_ZOOM_API_SECRET",
        "REGBRIDGE_ZOOM_API_BASE_URL",
        "REGBRIDGE_ZOOM_TOKEN_URL",
        "REGBRIDGE_ZOOM_EVENTS_API_BASE_URL",
        "REGBRIDGE_ZOOM_LISTING_LIMIT",
        "REGBRIDGE_ZOOM_REQUEST_TIMEOUT_SECS",
        "REGBRIDGE_PAYLOAD_STRATEGY",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_oauth() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("REGBRIDGE_ZOOM_ACCOUNT_ID", "acc");
        std::env::set_var("REGBRIDGE_ZOOM_CLIENT_ID", "cid");
        std::env::set_var("REGBRIDGE_ZOOM_CLIENT_SECRET", "secret");
        std::env::set_var("REGBRIDGE_ZOOM_LISTING_LIMIT", "7");
        std::env::set_var("REGBRIDGE_PAYLOAD_STRATEGY", "Template");

        let result = load_from_env();
        assert!(result.is_ok(), "Should load config from env vars, error: {:?}", result.err());

        let config = result.unwrap();
        assert!(matches!(config.zoom.credentials, Credentials::OAuth { .. }));
        assert_eq!(config.zoom.effective_listing_limit(), 7);
        assert_eq!(config.payload.strategy, PayloadStrategy::Template);
        assert_eq!(config.zoom.api_base_url, "https://api.zoom.us/v2");

        clear_env();
    }

    #[test]
    fn test_load_from_env_api_key() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("REGBRIDGE_ZOOM_API_KEY", "key");
        std::env::set_var("REGBRIDGE_ZOOM_API_SECRET", "secret");

        let config = load_from_env().unwrap();
        assert_eq!(
            config.zoom.credentials,
            Credentials::ApiKey { api_key: Some("key".into()), api_secret: Some("secret".into()) }
        );
        assert_eq!(config.zoom.effective_listing_limit(), 5);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_credentials() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, RegBridgeError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("REGBRIDGE_ZOOM_API_KEY", "key");
        std::env::set_var("REGBRIDGE_ZOOM_REQUEST_TIMEOUT_SECS", "soon");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, RegBridgeError::Config(msg) if msg.contains("timeout")));

        clear_env();
    }

    #[test]
    fn test_load_reports_invalid_env_instead_of_falling_back() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("REGBRIDGE_ZOOM_API_KEY", "key");
        std::env::set_var("REGBRIDGE_ZOOM_API_SECRET", "secret");
        std::env::set_var("REGBRIDGE_PAYLOAD_STRATEGY", "jinja");

        let err = load().unwrap_err();
        assert!(
            matches!(&err, RegBridgeError::Config(msg) if msg.contains("payload strategy")),
            "Should surface the env error, got {err:?}"
        );

        clear_env();
    }

    #[test]
    fn test_load_uses_env_when_credentials_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("REGBRIDGE_ZOOM_CLIENT_ID", "cid");
        std::env::set_var("REGBRIDGE_ZOOM_LISTING_LIMIT", "4");

        let config = load().unwrap();
        assert!(matches!(config.zoom.credentials, Credentials::OAuth { .. }));
        assert_eq!(config.zoom.effective_listing_limit(), 4);

        clear_env();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[zoom]
listing_limit = 3

[zoom.credentials]
kind = "oauth"
account_id = "acc"
client_id = "cid"
client_secret = "secret"

[payload]
strategy = "structured"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_ok(), "Should load config from TOML file: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.zoom.listing_limit, Some(3));
        assert_eq!(config.zoom.token_url, "https://zoom.us/oauth/token");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/regbridge.json")));

        let err = result.unwrap_err();
        assert!(matches!(err, RegBridgeError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_parse_config_json() {
        let json_content = r#"{
            "zoom": {
                "api_base_url": "http://localhost:9000/v2",
                "credentials": {"kind": "api_key", "api_key": "k", "api_secret": "s"}
            }
        }"#;

        let config = parse_config(json_content, &PathBuf::from("regbridge.json")).unwrap();
        assert_eq!(config.zoom.api_base_url, "http://localhost:9000/v2");
        assert_eq!(config.payload.strategy, PayloadStrategy::Structured);
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("zoom: {}", &PathBuf::from("regbridge.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_parse_strategy_rejects_unknown() {
        assert_eq!(parse_strategy(" structured ").unwrap(), PayloadStrategy::Structured);
        assert!(parse_strategy("jinja").is_err());
    }
}
