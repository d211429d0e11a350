//! Wire protocol shared by Monto clients and services.
//!
//! All traffic between a peer and the broker is length-prefixed JSON:
//!
//! ```text
//! +----------------+------------------+
//! | length (4 BE)  |  JSON payload    |
//! +----------------+------------------+
//! ```
//!
//! A connection starts with a hello exchange ([`handshake`]): the peer sends
//! a [`Hello`] carrying its identity, role, and declared extensions, and the
//! broker answers with a [`BrokerHello`] carrying its protocol version and
//! supported extensions. After a successful negotiation, every frame is a
//! [`Message`].

mod connection;
mod error;
mod framing;
mod handshake;
mod hello;
mod messages;

pub use connection::Connection;
pub use error::{HandshakeError, ProtocolError, ProtocolResult};
pub use framing::{decode_message, encode_message};
pub use handshake::handshake;
pub use hello::{BrokerHello, Hello, NegotiatedSession, Role};
pub use messages::{
    BrokerNotice, Message, ProductRequest, ProductResponse, ResponseBody, ServiceError,
    ServiceErrors, ServiceNotice, ServiceProduct,
};

/// The default broker port.
pub const DEFAULT_PORT: u16 = 28888;

/// Maximum size of a single framed message (1 MiB).
pub const MAX_MESSAGE_SIZE: u32 = 1024 * 1024;
