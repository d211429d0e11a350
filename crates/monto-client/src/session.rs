//! The client session: a transport facade over a negotiated connection.

use monto_core::{ExtensionSet, Product, ProductIdentifier};
use monto_protocol::{
    Connection, Message, NegotiatedSession, ProductRequest, Role, handshake,
};
use tracing::debug;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// A connected, negotiated client session.
///
/// The session owns its connection exclusively and performs no retrying: when
/// an operation fails with an IO error the session is dead, and reconnecting
/// means calling [`Client::connect`] again.
pub struct Client {
    conn: Connection,
    session: NegotiatedSession,
}

impl Client {
    /// Connects to the broker and negotiates a session.
    ///
    /// On any failure no client is returned; a half-negotiated connection is
    /// never exposed. Clients declare no extensions at connect time.
    pub async fn connect(config: &ClientConfig) -> ClientResult<Client> {
        let (host, port) = config.endpoint();
        let mut conn = Connection::open(host, port).await.map_err(|e| {
            ClientError::Connection(format!("failed to connect to {host}:{port}: {e}"))
        })?;

        let session = match handshake(
            &mut conn,
            &config.version,
            Role::Client,
            &ExtensionSet::default(),
        )
        .await
        {
            Ok(session) => session,
            Err(e) => {
                let _ = conn.close().await;
                return Err(e.into());
            }
        };

        debug!(broker = %session.broker, protocol = %session.protocol, "session negotiated");
        Ok(Client { conn, session })
    }

    /// The negotiation outcome for this session.
    pub fn session(&self) -> &NegotiatedSession {
        &self.session
    }

    /// Sends a request for a product, returning the generated request id.
    ///
    /// The id comes back in the matching response; correlation is left to
    /// the embedding application.
    pub async fn send_request(
        &mut self,
        request: ProductIdentifier,
        products: Vec<Product>,
    ) -> ClientResult<String> {
        let id = Uuid::new_v4().to_string();
        debug!(id = %id, product = %request.name, "sending product request");
        let msg = Message::Request(ProductRequest {
            id: id.clone(),
            request,
            products,
        });
        self.conn.send(&msg).await?;
        Ok(id)
    }

    /// Receives the next message from the broker, blocking until one arrives.
    ///
    /// Returns `Ok(None)` when the broker closed the connection cleanly.
    pub async fn receive_message(&mut self) -> ClientResult<Option<Message>> {
        Ok(self.conn.receive().await?)
    }

    /// Closes the session. Safe to call more than once.
    pub async fn close(&mut self) -> ClientResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}
