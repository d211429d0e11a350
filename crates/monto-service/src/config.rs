//! Service configuration.
//!
//! A service is usually configured from a TOML file:
//!
//! ```toml
//! [version]
//! id = "com.example.linter"
//! name = "Example Linter"
//!
//! [extensions]
//! optional = ["com.example.fancy_errors"]
//!
//! [net]
//! host = "0.0.0.0"
//! port = 28888
//! ```

use std::path::{Path, PathBuf};

use monto_core::{ExtensionSet, SoftwareVersion};
use monto_protocol::DEFAULT_PORT;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ServeError, ServeResult};

/// Default host the service listens on.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// The service's configuration. Immutable once a `Service` is built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// The identity announced to brokers during negotiation.
    pub version: SoftwareVersion,

    /// Extensions declared during negotiation.
    #[serde(default)]
    pub extensions: ExtensionSet,

    /// Where to listen for broker connections.
    #[serde(default)]
    pub net: NetConfig,
}

impl ServiceConfig {
    /// Creates a configuration listening on the default address.
    pub fn new(version: SoftwareVersion) -> ServiceConfig {
        ServiceConfig {
            version,
            extensions: ExtensionSet::default(),
            net: NetConfig::default(),
        }
    }

    /// Builder: set the declared extensions.
    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }

    /// Builder: set the listen address.
    pub fn with_net(mut self, host: impl Into<String>, port: u16) -> Self {
        self.net = NetConfig {
            host: host.into(),
            port,
        };
        self
    }

    /// Loads configuration from a specific TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> ServeResult<ServiceConfig> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServeError::config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| ServeError::config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Loads `NAME.toml`, looking in the working directory first and the user
    /// config directory (`~/.config/NAME/NAME.toml`) second.
    pub fn load(name: &str) -> ServeResult<ServiceConfig> {
        let file = format!("{name}.toml");
        let mut candidates = vec![PathBuf::from(&file)];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join(name).join(&file));
        }

        for path in &candidates {
            if path.exists() {
                debug!(path = %path.display(), "loading service configuration");
                return Self::load_from(path);
            }
        }
        Err(ServeError::config(format!(
            "no configuration file {file} found"
        )))
    }
}

/// Where the service listens for broker connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Listen host. The empty string means `0.0.0.0`.
    pub host: String,

    /// Listen port. Zero means the default port 28888.
    pub port: u16,
}

impl Default for NetConfig {
    fn default() -> NetConfig {
        NetConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl NetConfig {
    /// The listen address, with defaults applied for the empty host and port
    /// zero.
    pub fn addr(&self) -> (String, u16) {
        let host = if self.host.is_empty() {
            DEFAULT_HOST.to_string()
        } else {
            self.host.clone()
        };
        let port = if self.port == 0 { DEFAULT_PORT } else { self.port };
        (host, port)
    }
}
