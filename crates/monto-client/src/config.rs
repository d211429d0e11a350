//! Client configuration.

use monto_core::SoftwareVersion;
use monto_protocol::DEFAULT_PORT;

/// Default broker host for client connections.
pub const DEFAULT_HOST: &str = "localhost";

/// Configuration for connecting a client to a broker.
///
/// Consumed when building a session; not re-read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Broker host. The empty string means `localhost`.
    pub host: String,

    /// Broker port. Zero means the default port 28888.
    pub port: u16,

    /// The identity announced during negotiation.
    pub version: SoftwareVersion,
}

impl ClientConfig {
    /// Creates a configuration pointing at the default broker endpoint.
    pub fn new(version: SoftwareVersion) -> ClientConfig {
        ClientConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            version,
        }
    }

    /// Builder: set the broker host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Builder: set the broker port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// The endpoint to connect to, with defaults applied for the empty host
    /// and port zero.
    pub(crate) fn endpoint(&self) -> (&str, u16) {
        let host = if self.host.is_empty() {
            DEFAULT_HOST
        } else {
            &self.host
        };
        let port = if self.port == 0 { DEFAULT_PORT } else { self.port };
        (host, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version() -> SoftwareVersion {
        SoftwareVersion::new("com.example.editor".parse().unwrap())
    }

    #[test]
    fn defaults_to_localhost() {
        let config = ClientConfig::new(version());
        assert_eq!(config.endpoint(), ("localhost", 28888));
    }

    #[test]
    fn empty_host_and_zero_port_fall_back_to_defaults() {
        let config = ClientConfig::new(version()).with_host("").with_port(0);
        assert_eq!(config.endpoint(), ("localhost", 28888));
    }

    #[test]
    fn explicit_endpoint_is_kept() {
        let config = ClientConfig::new(version())
            .with_host("broker.example.com")
            .with_port(9999);
        assert_eq!(config.endpoint(), ("broker.example.com", 9999));
    }
}
