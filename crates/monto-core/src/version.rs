//! Protocol and software version types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Identifier;

/// The version of the Monto protocol spoken by one side of a connection.
///
/// Ordering is lexicographic over (major, minor, patch).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ProtocolVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ProtocolVersion {
    /// The protocol version this implementation speaks.
    pub const CURRENT: ProtocolVersion = ProtocolVersion::new(3, 0, 0);

    pub const fn new(major: u64, minor: u64, patch: u64) -> ProtocolVersion {
        ProtocolVersion {
            major,
            minor,
            patch,
        }
    }

    /// Whether a peer speaking `self` can talk to a broker advertising
    /// `broker`.
    ///
    /// Majors must match exactly; the broker may be ahead on the minor
    /// version but never behind. Patch versions do not affect compatibility.
    pub fn accepts_broker(&self, broker: &ProtocolVersion) -> bool {
        self.major == broker.major && broker.minor >= self.minor
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The identity and version of a client, broker, or service.
///
/// Only the identifier is mandatory; all other fields default when absent
/// from the wire or a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SoftwareVersion {
    /// The identifier naming this client, broker, or service.
    pub id: Identifier,

    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Human-readable vendor name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    #[serde(default)]
    pub major: u64,

    #[serde(default)]
    pub minor: u64,

    #[serde(default)]
    pub patch: u64,
}

impl SoftwareVersion {
    /// Creates an identity with no name or vendor at version 0.0.0.
    pub fn new(id: Identifier) -> SoftwareVersion {
        SoftwareVersion {
            id,
            name: None,
            vendor: None,
            major: 0,
            minor: 0,
            patch: 0,
        }
    }

    /// Builder: set the human-readable name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set the vendor name.
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    /// Builder: set the version triple.
    pub fn with_version(mut self, major: u64, minor: u64, patch: u64) -> Self {
        self.major = major;
        self.minor = minor;
        self.patch = patch;
        self
    }
}

impl fmt::Display for SoftwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        match (&self.name, &self.vendor) {
            (Some(name), Some(vendor)) => write!(f, " ({} by {})", name, vendor)?,
            (Some(name), None) => write!(f, " ({})", name)?,
            (None, Some(vendor)) => write!(f, " by {}", vendor)?,
            (None, None) => {}
        }
        write!(f, " {}.{}.{}", self.major, self.minor, self.patch)
    }
}
