//! Product token data model.
//!
//! A [`ProductToken`] is the small flat record embedded in a product QR code.
//! It is projected out of a richer [`CatalogProduct`] at encode time and
//! rebuilt from untrusted JSON by [`validate_shape`] at decode time.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The payload carried inside a product QR token.
///
/// Field names serialize in camelCase and absent optional fields are omitted,
/// so the JSON form is `{"name":..,"productType":..,"quantity":..,"importDate":..,"expiryDate":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductToken {
    /// Product display name.
    pub name: String,

    /// Optional category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,

    /// Units on hand.
    pub quantity: u64,

    /// When the stock was imported, as an ISO-8601 string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_date: Option<String>,

    /// When the stock expires, as an ISO-8601 string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

impl ProductToken {
    /// Create a token with only the required fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: u64) -> Self {
        Self {
            name: name.into(),
            product_type: None,
            quantity,
            import_date: None,
            expiry_date: None,
        }
    }

    /// Set the product type.
    #[must_use]
    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    /// Set the import date.
    #[must_use]
    pub fn with_import_date(mut self, import_date: impl Into<String>) -> Self {
        self.import_date = Some(import_date.into());
        self
    }

    /// Set the expiry date.
    #[must_use]
    pub fn with_expiry_date(mut self, expiry_date: impl Into<String>) -> Self {
        self.expiry_date = Some(expiry_date.into());
        self
    }
}

/// Why a decoded JSON value is not a product token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// The top-level value is not a JSON object.
    #[error("product data is not a JSON object")]
    NotAnObject,

    /// A required field is missing or null.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// `name` or one of the optional date/type fields is not a string.
    #[error("field '{0}' must be a string")]
    NotAString(&'static str),

    /// `quantity` is not a non-negative integer.
    #[error("field 'quantity' must be a non-negative integer")]
    InvalidQuantity,
}

/// Check that a decoded JSON value looks like a [`ProductToken`] and build it.
///
/// Validation is deliberately loose: `name` must be a string, `quantity` a
/// non-negative integer, and the optional fields strings when present. Null
/// optional fields are treated as absent and unknown keys are ignored.
///
/// # Errors
///
/// Returns a [`ShapeError`] naming the first field that does not fit.
pub fn validate_shape(value: &Value) -> Result<ProductToken, ShapeError> {
    let object = value.as_object().ok_or(ShapeError::NotAnObject)?;

    let name = match object.get("name") {
        None | Some(Value::Null) => return Err(ShapeError::MissingField("name")),
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err(ShapeError::NotAString("name")),
    };

    let quantity = match object.get("quantity") {
        None | Some(Value::Null) => return Err(ShapeError::MissingField("quantity")),
        Some(value) => value.as_u64().ok_or(ShapeError::InvalidQuantity)?,
    };

    Ok(ProductToken {
        name,
        product_type: optional_string(object, "productType")?,
        quantity,
        import_date: optional_string(object, "importDate")?,
        expiry_date: optional_string(object, "expiryDate")?,
    })
}

fn optional_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ShapeError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ShapeError::NotAString(field)),
    }
}

/// A product record as held by the inventory catalog.
///
/// Only five of these fields travel in a QR token; converting with
/// `ProductToken::from(&product)` keeps those and drops the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    /// Catalog identifier.
    pub id: String,
    /// Product display name.
    pub name: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    /// Units on hand.
    pub quantity: u64,
    /// Weight per unit in kilograms.
    pub weight: f64,
    /// Supplier name.
    pub provider: String,
    /// Warehouse or hub holding the stock.
    pub location: String,
    /// Stock status label, e.g. "In Stock".
    pub status: String,
    /// Last modification time, ISO-8601.
    pub last_updated: String,
    /// Import date, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_date: Option<String>,
    /// Expiry date, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

impl From<&CatalogProduct> for ProductToken {
    fn from(product: &CatalogProduct) -> Self {
        Self {
            name: product.name.clone(),
            product_type: product.product_type.clone(),
            quantity: product.quantity,
            import_date: product.import_date.clone(),
            expiry_date: product.expiry_date.clone(),
        }
    }
}
