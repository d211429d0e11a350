//! Service role of the Monto protocol.
//!
//! A [`Service`] pairs a [`ProviderRegistry`] with the connection machinery
//! to answer broker requests: it listens for broker connections, negotiates
//! each one, then dispatches incoming requests to registered providers until
//! the connection ends.
//!
//! # Example
//!
//! ```rust,no_run
//! use monto_core::{Language, ProductDescriptor, ProductName, SoftwareVersion};
//! use monto_protocol::{ServiceProduct};
//! use monto_service::{Service, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let version = SoftwareVersion::new("com.example.linter".parse()?);
//!     let mut service = Service::new(ServiceConfig::new(version));
//!
//!     let descriptor = ProductDescriptor::new(ProductName::Errors, Language::Text);
//!     service.register(descriptor, |request| {
//!         Ok(ServiceProduct::new(monto_core::Product {
//!             name: request.request.name.clone(),
//!             language: request.request.language.clone(),
//!             path: request.request.path.clone(),
//!             value: serde_json::json!([]),
//!         }))
//!     })?;
//!
//!     service.serve_forever().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod dispatch;
mod error;
mod registry;
mod service;

pub use config::{DEFAULT_HOST, NetConfig, ServiceConfig};
pub use error::{ServeError, ServeResult};
pub use registry::{Provider, ProviderRegistry};
pub use service::Service;
