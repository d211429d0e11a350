//! The message envelope carried after negotiation, and service reply bodies.

use monto_core::{Product, ProductDescriptor, ProductIdentifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single protocol frame exchanged after negotiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    /// A broker-forwarded request for a product.
    Request(ProductRequest),

    /// The reply to a request.
    Response(ProductResponse),

    /// A broker-initiated notification outside the request/response flow.
    Notification(BrokerNotice),
}

/// A request for a product, forwarded by the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRequest {
    /// Correlation id, echoed back in the response.
    pub id: String,

    /// The product being requested.
    pub request: ProductIdentifier,

    /// Products supplied along with the request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
}

impl ProductRequest {
    /// The capability descriptor this request targets.
    pub fn descriptor(&self) -> ProductDescriptor {
        ProductDescriptor::from(&self.request)
    }
}

/// The reply to a [`ProductRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    /// The id of the request being answered.
    pub id: String,

    #[serde(flatten)]
    pub body: ResponseBody,
}

/// Either a produced product or the errors that prevented one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseBody {
    Product(ServiceProduct),
    Errors(ServiceErrors),
}

/// A product produced by a service, with any notices raised along the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceProduct {
    /// The product sent.
    pub product: Product,

    /// Any notices generated while producing it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<ServiceNotice>,
}

impl ServiceProduct {
    /// Wraps a product with no notices.
    pub fn new(product: Product) -> ServiceProduct {
        ServiceProduct {
            product,
            notices: Vec::new(),
        }
    }
}

/// The errors a service reports instead of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceErrors {
    /// The errors encountered.
    pub errors: Vec<ServiceError>,

    /// Any notices generated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<ServiceNotice>,
}

impl ServiceErrors {
    /// A reply carrying a single error.
    pub fn from_error(error: ServiceError) -> ServiceErrors {
        ServiceErrors {
            errors: vec![error],
            notices: Vec::new(),
        }
    }

    /// The reply for a request no registered provider can satisfy.
    pub fn unsupported(descriptor: ProductDescriptor) -> ServiceErrors {
        ServiceErrors::from_error(ServiceError::UnsupportedProduct(descriptor))
    }
}

/// A single error in a [`ServiceErrors`] reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ServiceError {
    /// A product this one depends on was not provided.
    UnmetDependency(ProductIdentifier),

    /// No provider is registered for the requested product.
    UnsupportedProduct(ProductDescriptor),

    /// A miscellaneous provider failure.
    Other(String),
}

/// A non-error special condition attached to a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ServiceNotice {
    /// A supplied dependency went unused while producing the product.
    UnusedDependency(ProductIdentifier),
}

/// A broker-initiated notification. The payload is opaque at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerNotice {
    #[serde(default)]
    pub payload: Value,
}

impl BrokerNotice {
    pub fn new(payload: Value) -> BrokerNotice {
        BrokerNotice { payload }
    }
}
