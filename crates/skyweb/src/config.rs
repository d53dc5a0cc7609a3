//! Application configuration loaded from environment variables.

use std::fmt;
use std::path::PathBuf;

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8100").
    pub http_address: String,

    /// Upstream API host, without a trailing slash.
    pub appview_host: String,

    /// Service account identifier (handle or DID) used for the session.
    pub auth_handle: String,

    /// Service account secret (app password).
    pub auth_password: String,

    /// Serve static assets and templates from the filesystem instead of the
    /// bundle compiled into the binary.
    pub debug: bool,

    /// Filesystem root for static assets in debug mode.
    pub static_dir: PathBuf,

    /// Filesystem root for templates in debug mode.
    pub template_dir: PathBuf,

    /// Mailmodo API key for the waitlist signup.
    pub mailmodo_api_key: String,

    /// Mailmodo list that waitlist signups are added to.
    pub mailmodo_list_name: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("http_address", &self.http_address)
            .field("appview_host", &self.appview_host)
            .field("auth_handle", &self.auth_handle)
            .field("auth_password", &"<redacted>")
            .field("debug", &self.debug)
            .field("static_dir", &self.static_dir)
            .field("template_dir", &self.template_dir)
            .field("mailmodo_api_key", &"<redacted>")
            .field("mailmodo_list_name", &self.mailmodo_list_name)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `ATP_AUTH_HANDLE`: Service account handle
    /// - `ATP_AUTH_PASSWORD`: Service account password
    ///
    /// Optional:
    /// - `HTTP_ADDRESS`: Server bind address (default: "0.0.0.0:8100")
    /// - `ATP_APPVIEW_HOST` / `ATP_PDS_HOST`: Upstream host (default: "https://bsky.social")
    /// - `DEBUG`: Load assets and templates from disk (default: false)
    /// - `STATIC_DIR`: Static asset directory in debug mode (default: "static")
    /// - `TEMPLATE_DIR`: Template directory in debug mode (default: "templates")
    /// - `MAILMODO_API_KEY`, `MAILMODO_LIST_NAME`: Waitlist signup target
    pub fn from_env() -> anyhow::Result<Self> {
        let http_address =
            std::env::var("HTTP_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8100".to_string());

        let appview_host = std::env::var("ATP_APPVIEW_HOST")
            .or_else(|_| std::env::var("ATP_PDS_HOST"))
            .unwrap_or_else(|_| "https://bsky.social".to_string())
            .trim_end_matches('/')
            .to_string();

        let auth_handle = required_var("ATP_AUTH_HANDLE")?;
        let auth_password = required_var("ATP_AUTH_PASSWORD")?;

        let debug_mode = std::env::var("DEBUG")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let static_dir = std::env::var("STATIC_DIR")
            .unwrap_or_else(|_| "static".to_string())
            .into();
        let template_dir = std::env::var("TEMPLATE_DIR")
            .unwrap_or_else(|_| "templates".to_string())
            .into();

        let mailmodo_api_key = std::env::var("MAILMODO_API_KEY").unwrap_or_default();
        let mailmodo_list_name = std::env::var("MAILMODO_LIST_NAME").unwrap_or_default();

        tracing::info!(
            http_address = %http_address,
            appview_host = %appview_host,
            auth_handle = %auth_handle,
            debug = debug_mode,
            mailmodo_list_name = %mailmodo_list_name,
            "configuration loaded"
        );

        Ok(Self {
            http_address,
            appview_host,
            auth_handle,
            auth_password,
            debug: debug_mode,
            static_dir,
            template_dir,
            mailmodo_api_key,
            mailmodo_list_name,
        })
    }
}

fn required_var(key: &str) -> anyhow::Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => anyhow::bail!("missing required environment variable {key}"),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "HTTP_ADDRESS",
        "ATP_APPVIEW_HOST",
        "ATP_PDS_HOST",
        "ATP_AUTH_HANDLE",
        "ATP_AUTH_PASSWORD",
        "DEBUG",
        "STATIC_DIR",
        "TEMPLATE_DIR",
        "MAILMODO_API_KEY",
        "MAILMODO_LIST_NAME",
    ];

    /// Helper to run config tests with isolated env vars.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    const CREDENTIALS: &[(&str, &str)] = &[
        ("ATP_AUTH_HANDLE", "web.example.test"),
        ("ATP_AUTH_PASSWORD", "hunter2"),
    ];

    #[test]
    fn config_defaults() {
        with_env_vars(CREDENTIALS, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.http_address, "0.0.0.0:8100");
            assert_eq!(config.appview_host, "https://bsky.social");
            assert_eq!(config.auth_handle, "web.example.test");
            assert!(!config.debug);
            assert_eq!(config.static_dir, PathBuf::from("static"));
            assert_eq!(config.template_dir, PathBuf::from("templates"));
            assert!(config.mailmodo_api_key.is_empty());
        });
    }

    #[test]
    fn config_requires_credentials() {
        with_env_vars(&[("ATP_AUTH_HANDLE", "web.example.test")], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("ATP_AUTH_PASSWORD"));
        });
        with_env_vars(&[("ATP_AUTH_PASSWORD", "hunter2")], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("ATP_AUTH_HANDLE"));
        });
    }

    #[test]
    fn config_host_alias_and_trailing_slash() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("ATP_PDS_HOST", "https://pds.example.test/"));
        with_env_vars(&vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.appview_host, "https://pds.example.test");
        });

        vars.push(("ATP_APPVIEW_HOST", "https://api.example.test"));
        with_env_vars(&vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.appview_host, "https://api.example.test");
        });
    }

    #[test]
    fn config_debug_flag() {
        let cases = [
            ("true", true),
            ("1", true),
            ("YES", true),
            ("0", false),
            ("", false),
        ];
        for (raw, expected) in cases {
            let mut vars = CREDENTIALS.to_vec();
            vars.push(("DEBUG", raw));
            with_env_vars(&vars, || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.debug, expected, "DEBUG={raw}");
            });
        }
    }

    #[test]
    fn config_debug_output_redacts_secrets() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("MAILMODO_API_KEY", "mm-secret"));
        with_env_vars(&vars, || {
            let config = Config::from_env().unwrap();
            let rendered = format!("{config:?}");
            assert!(!rendered.contains("hunter2"));
            assert!(!rendered.contains("mm-secret"));
            assert!(rendered.contains("web.example.test"));
        });
    }
}
