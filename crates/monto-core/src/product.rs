//! Product naming and payload types.
//!
//! Products are opaque at this layer: `Product::value` carries arbitrary JSON
//! whose meaning is a contract between the producing service and the
//! consuming client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifier::{Identifier, InvalidIdentifier};

/// The programming language a product applies to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    /// JSON, per RFC 7159.
    Json,

    /// Plain UTF-8 text.
    Text,

    /// Products with no inherent language, such as directory listings.
    None,

    /// A language not otherwise present in this enumeration.
    Other(String),
}

impl Language {
    fn as_str(&self) -> &str {
        match self {
            Language::Json => "json",
            Language::Text => "text",
            Language::None => "none",
            Language::Other(name) => name,
        }
    }
}

impl From<String> for Language {
    fn from(s: String) -> Language {
        match s.as_str() {
            "json" => Language::Json,
            "text" => Language::Text,
            "none" => Language::None,
            _ => Language::Other(s),
        }
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Language {
        Language::from(s.to_string())
    }
}

impl From<Language> for String {
    fn from(l: Language) -> String {
        l.to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The name of a product: one of the built-in names, or a vendor identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProductName {
    /// A listing of a directory.
    Directory,

    /// Syntactic or semantic errors detected in source code.
    Errors,

    /// Token information used for highlighting source code.
    Highlighting,

    /// Source code.
    Source,

    /// A vendor-specific product, named by a dotted identifier.
    Other(Identifier),
}

impl FromStr for ProductName {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "directory" => Ok(ProductName::Directory),
            "errors" => Ok(ProductName::Errors),
            "highlighting" => Ok(ProductName::Highlighting),
            "source" => Ok(ProductName::Source),
            _ => s.parse().map(ProductName::Other),
        }
    }
}

impl TryFrom<String> for ProductName {
    type Error = InvalidIdentifier;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ProductName> for String {
    fn from(name: ProductName) -> String {
        name.to_string()
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductName::Directory => write!(f, "directory"),
            ProductName::Errors => write!(f, "errors"),
            ProductName::Highlighting => write!(f, "highlighting"),
            ProductName::Source => write!(f, "source"),
            ProductName::Other(id) => id.fmt(f),
        }
    }
}

/// A product kind and the language it applies to.
///
/// This is the capability descriptor that keys a service's provider registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductDescriptor {
    /// The name of the product.
    pub name: ProductName,

    /// The language of the product.
    pub language: Language,
}

impl ProductDescriptor {
    pub fn new(name: ProductName, language: Language) -> ProductDescriptor {
        ProductDescriptor { name, language }
    }
}

impl fmt::Display for ProductDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.language)
    }
}

impl From<ProductIdentifier> for ProductDescriptor {
    fn from(p: ProductIdentifier) -> ProductDescriptor {
        ProductDescriptor {
            name: p.name,
            language: p.language,
        }
    }
}

impl From<&ProductIdentifier> for ProductDescriptor {
    fn from(p: &ProductIdentifier) -> ProductDescriptor {
        ProductDescriptor {
            name: p.name.clone(),
            language: p.language.clone(),
        }
    }
}

/// A product's name, language, and path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductIdentifier {
    /// The name of the product.
    pub name: ProductName,

    /// The language of the product.
    pub language: Language,

    /// The path the product applies to.
    pub path: String,
}

impl From<Product> for ProductIdentifier {
    fn from(p: Product) -> ProductIdentifier {
        ProductIdentifier {
            name: p.name,
            language: p.language,
            path: p.path,
        }
    }
}

impl From<&Product> for ProductIdentifier {
    fn from(p: &Product) -> ProductIdentifier {
        ProductIdentifier {
            name: p.name.clone(),
            language: p.language.clone(),
            path: p.path.clone(),
        }
    }
}

/// A product along with its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// The name of the product.
    pub name: ProductName,

    /// The language of the product.
    pub language: Language,

    /// The path the product applies to.
    pub path: String,

    /// The contents of the product, opaque at this layer.
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn language_maps_known_names() {
        assert_eq!(Language::from("json"), Language::Json);
        assert_eq!(Language::from("text"), Language::Text);
        assert_eq!(Language::from("none"), Language::None);
        assert_eq!(Language::from("rust"), Language::Other("rust".to_string()));
    }

    #[test]
    fn language_serde_is_a_plain_string() {
        assert_eq!(serde_json::to_string(&Language::Text).unwrap(), "\"text\"");
        let l: Language = serde_json::from_str("\"cobol\"").unwrap();
        assert_eq!(l, Language::Other("cobol".to_string()));
    }

    #[test]
    fn product_name_parses_builtins_and_identifiers() {
        assert_eq!("errors".parse::<ProductName>().unwrap(), ProductName::Errors);
        assert_eq!("source".parse::<ProductName>().unwrap(), ProductName::Source);
        let custom = "com.example.outline".parse::<ProductName>().unwrap();
        assert_eq!(custom.to_string(), "com.example.outline");
        assert!(matches!(custom, ProductName::Other(_)));
    }

    #[test]
    fn product_name_rejects_non_identifier_names() {
        assert!("token-stream".parse::<ProductName>().is_err());
        assert!("".parse::<ProductName>().is_err());
    }

    #[test]
    fn descriptor_from_identifier_drops_the_path() {
        let pi = ProductIdentifier {
            name: ProductName::Errors,
            language: Language::Text,
            path: "src/main.rs".to_string(),
        };
        let pd = ProductDescriptor::from(&pi);
        assert_eq!(pd, ProductDescriptor::new(ProductName::Errors, Language::Text));
    }

    #[test]
    fn product_round_trips_through_json() {
        let product = Product {
            name: ProductName::Highlighting,
            language: Language::from("rust"),
            path: "lib.rs".to_string(),
            value: json!([{ "start": 0, "end": 3, "kind": "keyword" }]),
        };
        let encoded = serde_json::to_string(&product).unwrap();
        let decoded: Product = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, product);
    }
}
