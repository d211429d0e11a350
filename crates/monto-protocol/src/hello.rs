//! Hello frames exchanged during negotiation.

use std::collections::BTreeSet;

use monto_core::{Identifier, ProtocolVersion, SoftwareVersion};
use serde::{Deserialize, Serialize};

/// Which side of the protocol a connecting peer implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A consumer of products, such as an editor integration.
    Client,
    /// A producer of products.
    Service,
}

/// The first frame a client or service sends after opening a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hello {
    /// The protocol version the sender speaks.
    pub monto: ProtocolVersion,

    /// The sender's identity.
    pub version: SoftwareVersion,

    /// Which role the sender implements.
    pub role: Role,

    /// All declared extensions, required and optional alike.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub extensions: BTreeSet<Identifier>,
}

/// The broker's reply to a [`Hello`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerHello {
    /// The protocol version the broker speaks.
    pub monto: ProtocolVersion,

    /// The broker's identity.
    pub broker: SoftwareVersion,

    /// The extensions the broker supports.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub extensions: BTreeSet<Identifier>,
}

/// The outcome of a successful handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatedSession {
    /// The protocol version in effect: the lower of the two sides' versions.
    pub protocol: ProtocolVersion,

    /// The broker's identity.
    pub broker: SoftwareVersion,

    /// The declared extensions the broker also supports.
    pub extensions: BTreeSet<Identifier>,
}
