//! Line items of trade documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rest::Meta;

/// A position (line item) of an order, invoice, shipment or similar document.
///
/// Only the fields shared by every document type are typed. The assortment
/// reference and any document-specific fields are kept as JSON so a fetched
/// position can be sent back unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Price in minor currency units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Discount in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    /// VAT rate in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<i64>,
    /// Reference to the product, service, variant or bundle sold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assortment: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Position {
    /// Creates a position for `assortment` with the given quantity and price.
    #[must_use]
    pub fn new(assortment: &Meta, quantity: f64, price: f64) -> Self {
        Self {
            quantity: Some(quantity),
            price: Some(price),
            assortment: Some(serde_json::json!({ "meta": assortment })),
            ..Self::default()
        }
    }
}
