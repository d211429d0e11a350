//! Core types for the Monto protocol: identifiers, versions, products, extensions.

pub mod extension;
pub mod identifier;
pub mod product;
pub mod tracing;
pub mod version;

pub use extension::ExtensionSet;
pub use identifier::{Identifier, InvalidIdentifier};
pub use product::{Language, Product, ProductDescriptor, ProductIdentifier, ProductName};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use version::{ProtocolVersion, SoftwareVersion};
