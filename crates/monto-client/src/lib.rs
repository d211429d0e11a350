//! Client role of the Monto protocol.
//!
//! A [`Client`] is a transport facade over a negotiated broker connection:
//! it sends product requests and receives broker messages, and interprets
//! neither. Reconnection policy is left to the embedding application.
//!
//! # Example
//!
//! ```rust,no_run
//! use monto_client::{Client, ClientConfig};
//! use monto_core::SoftwareVersion;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let version = SoftwareVersion::new("com.example.editor".parse()?);
//!     let mut client = Client::connect(&ClientConfig::new(version)).await?;
//!
//!     // ... exchange messages ...
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod session;

pub use config::{ClientConfig, DEFAULT_HOST};
pub use error::{ClientError, ClientResult};
pub use session::Client;
