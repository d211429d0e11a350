//! The service session: listener, negotiation, dispatch.

use std::convert::Infallible;

use monto_core::ProductDescriptor;
use monto_protocol::{Connection, ProductRequest, Role, ServiceErrors, ServiceProduct, handshake};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::dispatch;
use crate::error::ServeResult;
use crate::registry::ProviderRegistry;

/// A Monto service: a provider registry plus the connection machinery to
/// answer broker requests.
pub struct Service {
    config: ServiceConfig,
    registry: ProviderRegistry,
}

impl Service {
    /// Creates a service from its configuration. Providers are registered
    /// afterwards, before serving starts.
    pub fn new(config: ServiceConfig) -> Service {
        Service {
            config,
            registry: ProviderRegistry::new(),
        }
    }

    /// Registers a provider for a capability.
    ///
    /// See [`ProviderRegistry::register`] for the duplicate policy.
    pub fn register<F>(&mut self, descriptor: ProductDescriptor, provider: F) -> ServeResult<()>
    where
        F: FnMut(&ProductRequest) -> Result<ServiceProduct, ServiceErrors> + Send + 'static,
    {
        self.registry.register(descriptor, provider)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Handles one broker connection: negotiates, then dispatches requests
    /// until the connection ends.
    ///
    /// The connection is owned by this call for its whole lifetime and is
    /// closed before returning, whatever the outcome.
    pub async fn serve(&mut self, stream: TcpStream) -> ServeResult<()> {
        let mut conn = Connection::from_stream(stream);

        let session = match handshake(
            &mut conn,
            &self.config.version,
            Role::Service,
            &self.config.extensions,
        )
        .await
        {
            Ok(session) => session,
            Err(e) => {
                let _ = conn.close().await;
                return Err(e.into());
            }
        };
        info!(
            broker = %session.broker,
            protocol = %session.protocol,
            extensions = session.extensions.len(),
            "broker session negotiated"
        );

        let result = dispatch::run(&mut conn, &mut self.registry).await;
        let _ = conn.close().await;
        result
    }

    /// Binds the configured listen address and serves brokers, one at a
    /// time, until a fatal listener error.
    ///
    /// Failures on individual broker sessions are logged and the accept loop
    /// continues; only the listener itself failing ends this call.
    pub async fn serve_forever(&mut self) -> ServeResult<Infallible> {
        let (host, port) = self.config.net.addr();
        let listener = TcpListener::bind((host.as_str(), port)).await?;
        info!(
            host = %host,
            port,
            providers = self.registry.len(),
            identity = %self.config.version,
            "service listening"
        );

        loop {
            let (stream, remote) = listener.accept().await?;
            info!(%remote, "broker connected");
            if let Err(e) = self.serve(stream).await {
                warn!(%remote, error = %e, "broker session ended with error");
            }
        }
    }
}
