//! Environment-driven server configuration.
//!
//! Everything the server needs is read from the environment once at
//! startup. The session key comes from a file so rotations do not require
//! a rebuild; debug builds (or `SESSION_ALLOW_EPHEMERAL=1`) fall back to a
//! generated key so local development works without secrets.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::Key;
use tracing::warn;

/// Errors raised while assembling the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable {name}")]
    MissingVar {
        /// Variable name.
        name: &'static str,
    },
    /// A variable was present but unparseable.
    #[error("invalid value for {name}: {message}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// Parse failure description.
        message: String,
    },
    /// The session key file could not be read outside development mode.
    #[error("failed to read session key at {path}: {message}")]
    SessionKey {
        /// Configured key path.
        path: String,
        /// I/O failure description.
        message: String,
    },
}

/// Resolved server configuration.
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Session cookie signing key.
    pub key: Key,
    /// Whether the session cookie carries the `Secure` flag.
    pub cookie_secure: bool,
    /// Route notifications to the discarding stub instead of the broker.
    pub notifications_stub: bool,
}

impl ServerConfig {
    /// Assemble the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_owned())
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidVar {
                name: "BIND_ADDR",
                message: err.to_string(),
            })?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar {
            name: "DATABASE_URL",
        })?;

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);
        let notifications_stub = env::var("NOTIFICATIONS_STUB").ok().as_deref() == Some("1");

        Ok(Self {
            bind_addr,
            database_url,
            key: load_session_key()?,
            cookie_secure,
            notifications_stub,
        })
    }
}

fn load_session_key() -> Result<Key, ConfigError> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".to_owned());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(err) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %err, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(ConfigError::SessionKey {
                    path: key_path,
                    message: err.to_string(),
                })
            }
        }
    }
}
