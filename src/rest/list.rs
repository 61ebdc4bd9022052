//! List envelopes returned by collection endpoints.
//!
//! Every list endpoint answers with the same shape:
//!
//! ```json
//! { "meta": { "href": "...", "size": 2500, "limit": 1000, "offset": 0 },
//!   "context": { ... },
//!   "rows": [ ... ] }
//! ```
//!
//! The same envelope is embedded in documents for sub-collections such as
//! positions, where it may carry only `meta` (a link to follow) or the
//! already materialized `rows`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata attached to entities and list envelopes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Absolute link to the entity or collection.
    #[serde(default)]
    pub href: String,
    /// Link to the metadata of the entity type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_href: Option<String>,
    /// The entity type, e.g. `product`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    /// Media type of the linked resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Link to the entity in the web interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid_href: Option<String>,
    /// Total number of items in a collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Page size the server applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Offset of the returned page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl Meta {
    /// Creates metadata that only carries a link.
    #[must_use]
    pub fn with_href(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    /// Creates the metadata object used to reference another entity.
    #[must_use]
    pub fn reference(
        href: impl Into<String>,
        entity_type: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            href: href.into(),
            entity_type: Some(entity_type.into()),
            media_type: Some(media_type.into()),
            ..Self::default()
        }
    }
}

/// One page of a collection, or an embedded sub-collection.
///
/// `rows` is `None` when the server only sent a link (`meta`) to the
/// collection, and `Some` (possibly empty) when rows were materialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntity<T> {
    /// Collection metadata, including the total size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Request context (e.g. the calling employee), kept opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    /// The rows of this page, in server order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<T>>,
}

impl<T> Default for ListEntity<T> {
    fn default() -> Self {
        Self {
            meta: None,
            context: None,
            rows: None,
        }
    }
}

impl<T> ListEntity<T> {
    /// Returns the server-reported total size, or 0 when missing.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.meta.as_ref().and_then(|m| m.size).unwrap_or(0)
    }

    /// Returns the rows of this page (empty if none were sent).
    #[must_use]
    pub fn rows(&self) -> &[T] {
        self.rows.as_deref().unwrap_or_default()
    }

    /// Consumes the envelope, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<T> {
        self.rows.unwrap_or_default()
    }

    /// Returns the collection link from `meta.href`, if non-empty.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .map(|m| m.href.as_str())
            .filter(|href| !href.is_empty())
    }
}
