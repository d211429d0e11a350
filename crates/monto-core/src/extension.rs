//! Declared protocol extensions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Identifier;

/// The set of protocol extensions a client or service declares when
/// connecting.
///
/// Required extensions make negotiation fail when the broker does not support
/// them; optional extensions are simply dropped from the negotiated set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionSet {
    /// Extensions the broker must support for negotiation to succeed.
    pub required: BTreeSet<Identifier>,

    /// Extensions used only when the broker also supports them.
    pub optional: BTreeSet<Identifier>,
}

impl ExtensionSet {
    pub fn new() -> ExtensionSet {
        ExtensionSet::default()
    }

    /// Builder: declare an extension the broker must support.
    pub fn require(mut self, extension: Identifier) -> Self {
        self.required.insert(extension);
        self
    }

    /// Builder: declare an extension used only when the broker supports it.
    pub fn prefer(mut self, extension: Identifier) -> Self {
        self.optional.insert(extension);
        self
    }

    /// All declared extension names, required and optional alike.
    pub fn declared(&self) -> BTreeSet<Identifier> {
        self.required.union(&self.optional).cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }
}
