//! Runtime configuration read from the process environment (after `.env` is
//! loaded by `dotenv` in `main`).
//!
//! - `HOST` / `PORT`: listen address (default `0.0.0.0:3000`)
//! - `ANTHROPIC_API_KEY`: fallback credential when a request carries no `key`
//! - `BMAD_ENABLED`: anything but `false` turns on command interception and
//!   persona instructions
//! - `UPSTREAM_URL`, `ANTHROPIC_VERSION`, `DEFAULT_MODEL`: upstream call shape
//! - `PUBLIC_DIR`: static root (default `./public`)
//! - `MAX_BODY_BYTES`: inbound JSON body limit
//! - `REQUEST_CONNECT_TIMEOUT_SECS`, `RELAY_IDLE_TIMEOUT_SECS`,
//!   `RELAY_TOTAL_TIMEOUT_SECS`: upstream timeouts
//! - `PERSONA_SESSION_CAPACITY`, `PERSONA_SESSION_IDLE_SECS`: bounds on the
//!   per-session persona store

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_SESSION_CAPACITY: u64 = 10_000;
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub personas_enabled: bool,
    pub upstream_url: String,
    pub anthropic_version: String,
    pub default_model: String,
    pub public_dir: PathBuf,
    pub max_body_bytes: usize,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub total_timeout: Duration,
    pub session_capacity: u64,
    pub session_idle: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            personas_enabled: true,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            public_dir: PathBuf::from("public"),
            max_body_bytes: 4 * 1024 * 1024,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(60),
            total_timeout: Duration::from_secs(600),
            session_capacity: DEFAULT_SESSION_CAPACITY,
            session_idle: DEFAULT_SESSION_IDLE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unparsable values fall back to the
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(lookup("PORT"), defaults.port),
            api_key: lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()),
            personas_enabled: lookup("BMAD_ENABLED").map_or(true, |v| v != "false"),
            upstream_url: lookup("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            anthropic_version: lookup("ANTHROPIC_VERSION")
                .unwrap_or(defaults.anthropic_version),
            default_model: lookup("DEFAULT_MODEL").unwrap_or(defaults.default_model),
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            max_body_bytes: parse_or(lookup("MAX_BODY_BYTES"), defaults.max_body_bytes),
            connect_timeout: parsed("REQUEST_CONNECT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            idle_timeout: parsed("RELAY_IDLE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
            total_timeout: parsed("RELAY_TOTAL_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.total_timeout),
            session_capacity: parse_or(
                lookup("PERSONA_SESSION_CAPACITY"),
                defaults.session_capacity,
            ),
            session_idle: parsed("PERSONA_SESSION_IDLE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_idle),
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
