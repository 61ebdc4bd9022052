//! Custom attributes attached to entities.
//!
//! An attribute carries a `type` tag and a `value` whose meaning depends on
//! that tag. [`EntityAttribute`] decodes the pair into an [`AttributeValue`]
//! using one fixed rule per tag:
//!
//! | tag            | accepted JSON                   | variant          |
//! |----------------|---------------------------------|------------------|
//! | `time`         | `"yyyy-MM-dd HH:mm:ss[.fff]"`   | `Time`           |
//! | `boolean`      | `true`/`false`, `"true"`/`"false"` | `Boolean`     |
//! | `long`         | integer, or integer string      | `Long`           |
//! | `double`       | number, or numeric string       | `Double`         |
//! | `string`       | string                          | `String`         |
//! | `text`         | string                          | `Text`           |
//! | `link`         | string                          | `Link`           |
//! | `file`         | string                          | `File`           |
//! | `customentity` | object                          | `CustomEntity`   |
//!
//! A value that does not satisfy its tag, or carries an unknown tag, is kept
//! as [`AttributeValue::Raw`]. A received attribute whose value is left
//! unchanged is written back exactly as it arrived, so `5` stays `5` and
//! `"17"` stays a string. Accessors never coerce across tags; a mismatch
//! returns `None`.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::BaseUrl;
use crate::model::ServerDateTime;
use crate::rest::Meta;

/// The type tag of an attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttributeType {
    /// `time`
    Time,
    /// `boolean`
    Boolean,
    /// `long`
    Long,
    /// `double`
    Double,
    /// `string`
    String,
    /// `text`
    Text,
    /// `link`
    Link,
    /// `file`
    File,
    /// `customentity`
    CustomEntity,
    /// A tag this client does not know.
    Other(String),
}

impl AttributeType {
    /// Returns the wire name of the tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Time => "time",
            Self::Boolean => "boolean",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
            Self::Text => "text",
            Self::Link => "link",
            Self::File => "file",
            Self::CustomEntity => "customentity",
            Self::Other(tag) => tag,
        }
    }

    fn parse(tag: &str) -> Self {
        match tag {
            "time" => Self::Time,
            "boolean" => Self::Boolean,
            "long" => Self::Long,
            "double" => Self::Double,
            "string" => Self::String,
            "text" => Self::Text,
            "link" => Self::Link,
            "file" => Self::File,
            "customentity" => Self::CustomEntity,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for AttributeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AttributeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag))
    }
}

/// A reference to another entity, as used by `customentity` attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    /// Metadata of the referenced entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Its ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Its display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining fields, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A decoded attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// A server-local timestamp.
    Time(ServerDateTime),
    /// A flag.
    Boolean(bool),
    /// An integer.
    Long(i64),
    /// A decimal number.
    Double(f64),
    /// A short string.
    String(String),
    /// A long text.
    Text(String),
    /// A URL.
    Link(String),
    /// A file name.
    File(String),
    /// A reference to a custom entity element.
    CustomEntity(EntityRef),
    /// A value that does not match its tag, kept verbatim.
    Raw(Value),
}

impl AttributeValue {
    /// Decodes `value` according to `tag`.
    #[must_use]
    pub fn decode(tag: &AttributeType, value: Value) -> Self {
        let decoded = match tag {
            AttributeType::Time => value
                .as_str()
                .and_then(|s| s.parse().ok())
                .map(Self::Time),
            AttributeType::Boolean => match &value {
                Value::Bool(b) => Some(Self::Boolean(*b)),
                Value::String(s) => s.parse().ok().map(Self::Boolean),
                _ => None,
            },
            AttributeType::Long => match &value {
                Value::Number(n) => n.as_i64().map(Self::Long),
                Value::String(s) => s.trim().parse().ok().map(Self::Long),
                _ => None,
            },
            AttributeType::Double => match &value {
                Value::Number(n) => n.as_f64().map(Self::Double),
                Value::String(s) => s.trim().parse().ok().map(Self::Double),
                _ => None,
            },
            AttributeType::String => value.as_str().map(|s| Self::String(s.to_string())),
            AttributeType::Text => value.as_str().map(|s| Self::Text(s.to_string())),
            AttributeType::Link => value.as_str().map(|s| Self::Link(s.to_string())),
            AttributeType::File => value.as_str().map(|s| Self::File(s.to_string())),
            AttributeType::CustomEntity => {
                if value.is_object() {
                    serde_json::from_value(value.clone())
                        .ok()
                        .map(Self::CustomEntity)
                } else {
                    None
                }
            }
            AttributeType::Other(_) => None,
        };
        decoded.unwrap_or(Self::Raw(value))
    }

    /// Returns the tag matching this value. `Raw` values report `string`.
    #[must_use]
    pub const fn attribute_type(&self) -> AttributeType {
        match self {
            Self::Time(_) => AttributeType::Time,
            Self::Boolean(_) => AttributeType::Boolean,
            Self::Long(_) => AttributeType::Long,
            Self::Double(_) => AttributeType::Double,
            Self::String(_) | Self::Raw(_) => AttributeType::String,
            Self::Text(_) => AttributeType::Text,
            Self::Link(_) => AttributeType::Link,
            Self::File(_) => AttributeType::File,
            Self::CustomEntity(_) => AttributeType::CustomEntity,
        }
    }

    /// Returns the flag of a `boolean` value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer of a `long` value.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number of a `double` or `long` value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(n) => Some(*n),
            Self::Long(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the text of a `string`, `text`, `link` or `file` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Text(s) | Self::Link(s) | Self::File(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the timestamp of a `time` value.
    #[must_use]
    pub const fn as_date_time(&self) -> Option<ServerDateTime> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns the reference of a `customentity` value.
    #[must_use]
    pub const fn as_entity_ref(&self) -> Option<&EntityRef> {
        match self {
            Self::CustomEntity(r) => Some(r),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Time(t) => Value::String(t.to_string()),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Long(n) => Value::from(*n),
            Self::Double(n) => Value::from(*n),
            Self::String(s) | Self::Text(s) | Self::Link(s) | Self::File(s) => {
                Value::String(s.clone())
            }
            Self::CustomEntity(r) => serde_json::to_value(r).unwrap_or(Value::Null),
            Self::Raw(v) => v.clone(),
        }
    }
}

/// A custom attribute of an entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityAttribute {
    /// The attribute definition ID.
    pub id: Option<String>,
    /// Link to the attribute definition.
    pub meta: Option<Meta>,
    /// The attribute name.
    pub name: Option<String>,
    /// The type tag.
    pub attribute_type: Option<AttributeType>,
    /// The decoded value; `None` when the attribute has no value.
    pub value: Option<AttributeValue>,
    /// File details for `file` attributes, kept opaque.
    pub file: Option<Value>,
    received: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct WireAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    attribute_type: Option<AttributeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<Value>,
}

impl<'de> Deserialize<'de> for EntityAttribute {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireAttribute::deserialize(deserializer)?;
        let received = wire.value.filter(|v| !v.is_null());
        let value = received.clone().map(|v| match &wire.attribute_type {
            Some(tag) => AttributeValue::decode(tag, v),
            None => AttributeValue::Raw(v),
        });
        Ok(Self {
            id: wire.id,
            meta: wire.meta,
            name: wire.name,
            attribute_type: wire.attribute_type,
            value,
            file: wire.file,
            received,
        })
    }
}

impl Serialize for EntityAttribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireAttribute {
            id: self.id.clone(),
            meta: self.meta.clone(),
            name: self.name.clone(),
            attribute_type: self.attribute_type.clone(),
            value: self.value.as_ref().map(|value| self.wire_value(value)),
            file: self.file.clone(),
        }
        .serialize(serializer)
    }
}

impl EntityAttribute {
    /// Returns the received JSON while it still decodes to `value`.
    fn wire_value(&self, value: &AttributeValue) -> Value {
        match (&self.received, &self.attribute_type) {
            (Some(raw), Some(tag)) if AttributeValue::decode(tag, raw.clone()) == *value => {
                raw.clone()
            }
            _ => value.to_json(),
        }
    }

    /// Creates an attribute with an ID and a value; the tag follows the value.
    #[must_use]
    pub fn new(id: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            id: Some(id.into()),
            attribute_type: Some(value.attribute_type()),
            value: Some(value),
            ..Self::default()
        }
    }

    /// Returns a copy with `value` replaced.
    #[must_use]
    pub fn with_value(mut self, value: Option<AttributeValue>) -> Self {
        self.value = value;
        self
    }

    /// See [`AttributeValue::as_bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_ref().and_then(AttributeValue::as_bool)
    }

    /// See [`AttributeValue::as_i64`].
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_ref().and_then(AttributeValue::as_i64)
    }

    /// See [`AttributeValue::as_f64`].
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_ref().and_then(AttributeValue::as_f64)
    }

    /// See [`AttributeValue::as_str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(AttributeValue::as_str)
    }

    /// See [`AttributeValue::as_date_time`].
    #[must_use]
    pub fn as_date_time(&self) -> Option<ServerDateTime> {
        self.value.as_ref().and_then(AttributeValue::as_date_time)
    }

    /// See [`AttributeValue::as_entity_ref`].
    #[must_use]
    pub fn as_entity_ref(&self) -> Option<&EntityRef> {
        self.value.as_ref().and_then(AttributeValue::as_entity_ref)
    }
}

/// Lookup and edit helpers for an entity's attribute list.
pub trait AttributesExt {
    /// Finds an attribute by name, ignoring case.
    fn attribute(&self, name: &str) -> Option<&EntityAttribute>;

    /// Finds an attribute by ID.
    fn attribute_by_id(&self, id: &str) -> Option<&EntityAttribute>;

    /// Replaces any attribute with the same ID, then appends `attribute`.
    fn upsert_attribute(&mut self, attribute: EntityAttribute);

    /// Removes attributes by name, ignoring case. Returns how many were removed.
    fn remove_attribute(&mut self, name: &str) -> usize;

    /// Removes attributes by ID. Returns how many were removed.
    fn remove_attribute_by_id(&mut self, id: &str) -> usize;
}

impl AttributesExt for Vec<EntityAttribute> {
    fn attribute(&self, name: &str) -> Option<&EntityAttribute> {
        if name.trim().is_empty() {
            return None;
        }
        self.iter().find(|a| {
            a.name
                .as_deref()
                .is_some_and(|n| n.to_lowercase() == name.to_lowercase())
        })
    }

    fn attribute_by_id(&self, id: &str) -> Option<&EntityAttribute> {
        if id.trim().is_empty() {
            return None;
        }
        self.iter().find(|a| a.id.as_deref() == Some(id))
    }

    fn upsert_attribute(&mut self, attribute: EntityAttribute) {
        if let Some(id) = attribute.id.as_deref() {
            self.retain(|a| a.id.as_deref() != Some(id));
        }
        self.push(attribute);
    }

    fn remove_attribute(&mut self, name: &str) -> usize {
        let before = self.len();
        let name = name.to_lowercase();
        self.retain(|a| a.name.as_deref().map_or(true, |n| n.to_lowercase() != name));
        before - self.len()
    }

    fn remove_attribute_by_id(&mut self, id: &str) -> usize {
        let before = self.len();
        self.retain(|a| a.id.as_deref() != Some(id));
        before - self.len()
    }
}

/// Builds the metadata that links an attribute to its definition.
///
/// The link is `{base}{entity_path}/metadata/attributes/{attribute_id}`.
#[must_use]
pub fn attribute_meta(base_url: &BaseUrl, entity_path: &str, attribute_id: &str) -> Meta {
    Meta::reference(
        format!(
            "{}{}/metadata/attributes/{attribute_id}",
            base_url.as_ref(),
            entity_path.trim_matches('/')
        ),
        "attributemetadata",
        "application/json",
    )
}

/// Builder for a list of attributes to send with an entity.
///
/// # Example
///
/// ```rust
/// use moysklad_api::BaseUrl;
/// use moysklad_api::model::AttributeBuilder;
///
/// let attributes = AttributeBuilder::new(&BaseUrl::default(), "entity/product")
///     .add_string("a1", "red", Some("Color"))
///     .add_long("a2", 3, None)
///     .build();
///
/// assert_eq!(attributes.len(), 2);
/// assert_eq!(
///     attributes[0].meta.as_ref().unwrap().href,
///     "https://api.moysklad.ru/api/remap/1.2/entity/product/metadata/attributes/a1"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct AttributeBuilder {
    base_url: BaseUrl,
    entity_path: String,
    attributes: Vec<EntityAttribute>,
}

impl AttributeBuilder {
    /// Creates a builder for attributes of the entity at `entity_path`.
    #[must_use]
    pub fn new(base_url: &BaseUrl, entity_path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.clone(),
            entity_path: entity_path.into(),
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute with an explicit value.
    #[must_use]
    pub fn add(mut self, id: &str, value: AttributeValue, name: Option<&str>) -> Self {
        let mut attribute = EntityAttribute::new(id, value);
        attribute.meta = Some(attribute_meta(&self.base_url, &self.entity_path, id));
        attribute.name = name.map(ToString::to_string);
        self.attributes.push(attribute);
        self
    }

    /// Adds a `string` attribute.
    #[must_use]
    pub fn add_string(self, id: &str, value: impl Into<String>, name: Option<&str>) -> Self {
        self.add(id, AttributeValue::String(value.into()), name)
    }

    /// Adds a `text` attribute.
    #[must_use]
    pub fn add_text(self, id: &str, value: impl Into<String>, name: Option<&str>) -> Self {
        self.add(id, AttributeValue::Text(value.into()), name)
    }

    /// Adds a `long` attribute.
    #[must_use]
    pub fn add_long(self, id: &str, value: i64, name: Option<&str>) -> Self {
        self.add(id, AttributeValue::Long(value), name)
    }

    /// Adds a `double` attribute.
    #[must_use]
    pub fn add_double(self, id: &str, value: f64, name: Option<&str>) -> Self {
        self.add(id, AttributeValue::Double(value), name)
    }

    /// Adds a `boolean` attribute.
    #[must_use]
    pub fn add_boolean(self, id: &str, value: bool, name: Option<&str>) -> Self {
        self.add(id, AttributeValue::Boolean(value), name)
    }

    /// Adds a `time` attribute.
    #[must_use]
    pub fn add_time(self, id: &str, value: ServerDateTime, name: Option<&str>) -> Self {
        self.add(id, AttributeValue::Time(value), name)
    }

    /// Adds a `link` attribute.
    #[must_use]
    pub fn add_link(self, id: &str, url: impl Into<String>, name: Option<&str>) -> Self {
        self.add(id, AttributeValue::Link(url.into()), name)
    }

    /// Adds a `file` attribute.
    #[must_use]
    pub fn add_file(self, id: &str, file_name: impl Into<String>, name: Option<&str>) -> Self {
        self.add(id, AttributeValue::File(file_name.into()), name)
    }

    /// Adds a `customentity` attribute.
    #[must_use]
    pub fn add_custom_entity(self, id: &str, reference: EntityRef, name: Option<&str>) -> Self {
        self.add(id, AttributeValue::CustomEntity(reference), name)
    }

    /// Returns the attributes.
    #[must_use]
    pub fn build(self) -> Vec<EntityAttribute> {
        self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> EntityAttribute {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decodes_each_tag() {
        assert_eq!(decode(json!({"type": "boolean", "value": true})).as_bool(), Some(true));
        assert_eq!(decode(json!({"type": "boolean", "value": "false"})).as_bool(), Some(false));
        assert_eq!(decode(json!({"type": "long", "value": 42})).as_i64(), Some(42));
        assert_eq!(decode(json!({"type": "long", "value": "17"})).as_i64(), Some(17));
        assert_eq!(decode(json!({"type": "double", "value": 1.5})).as_f64(), Some(1.5));
        assert_eq!(decode(json!({"type": "string", "value": "red"})).as_str(), Some("red"));
        assert_eq!(decode(json!({"type": "text", "value": "long"})).as_str(), Some("long"));
        assert_eq!(
            decode(json!({"type": "link", "value": "https://x"})).as_str(),
            Some("https://x")
        );
        assert_eq!(
            decode(json!({"type": "time", "value": "2024-03-15 10:00:00.000"}))
                .as_date_time()
                .map(|t| t.to_string()),
            Some("2024-03-15 10:00:00.000".to_string())
        );

        let custom = decode(json!({
            "type": "customentity",
            "value": {"meta": {"href": "https://x/ce/1"}, "name": "Gold"}
        }));
        assert_eq!(custom.as_entity_ref().unwrap().name.as_deref(), Some("Gold"));
    }

    #[test]
    fn test_mismatch_returns_none_instead_of_coercing() {
        let attribute = decode(json!({"type": "long", "value": 42}));
        assert_eq!(attribute.as_bool(), None);
        assert_eq!(attribute.as_str(), None);
        assert_eq!(attribute.as_f64(), Some(42.0));

        let attribute = decode(json!({"type": "string", "value": "42"}));
        assert_eq!(attribute.as_i64(), None);

        let attribute = decode(json!({"type": "double", "value": 2.5}));
        assert_eq!(attribute.as_i64(), None);
    }

    #[test]
    fn test_invalid_value_is_kept_raw() {
        let attribute = decode(json!({"type": "boolean", "value": "maybe"}));
        assert_eq!(attribute.value, Some(AttributeValue::Raw(json!("maybe"))));
        assert_eq!(attribute.as_bool(), None);

        let attribute = decode(json!({"type": "brandnew", "value": [1, 2]}));
        assert_eq!(
            attribute.attribute_type,
            Some(AttributeType::Other("brandnew".to_string()))
        );
        assert_eq!(attribute.value, Some(AttributeValue::Raw(json!([1, 2]))));
    }

    #[test]
    fn test_round_trip_preserves_wire_shape() {
        let wire = json!({
            "id": "a1",
            "meta": {"href": "https://x/attributes/a1", "type": "attributemetadata", "mediaType": "application/json"},
            "name": "Weight",
            "type": "double",
            "value": 2.5
        });
        let attribute = decode(wire.clone());
        assert_eq!(serde_json::to_value(&attribute).unwrap(), wire);

        let unknown = json!({"type": "brandnew", "value": {"x": 1}});
        assert_eq!(serde_json::to_value(decode(unknown.clone())).unwrap(), unknown);
    }

    #[test]
    fn test_unchanged_values_keep_their_wire_encoding() {
        for wire in [
            json!({"type": "double", "value": 5}),
            json!({"type": "long", "value": "17"}),
            json!({"type": "boolean", "value": "true"}),
            json!({"type": "time", "value": "2024-03-15 10:00:00"}),
        ] {
            assert_eq!(serde_json::to_value(decode(wire.clone())).unwrap(), wire);
        }

        let edited = decode(json!({"type": "long", "value": "17"}))
            .with_value(Some(AttributeValue::Long(18)));
        assert_eq!(
            serde_json::to_value(&edited).unwrap(),
            json!({"type": "long", "value": 18})
        );
    }

    #[test]
    fn test_null_value_is_absent() {
        let attribute = decode(json!({"id": "a1", "type": "string", "value": null}));
        assert!(attribute.value.is_none());
        assert_eq!(attribute.as_str(), None);
    }

    #[test]
    fn test_lookup_helpers() {
        let attributes = vec![
            EntityAttribute::new("a1", AttributeValue::String("red".to_string())),
            EntityAttribute {
                name: Some("Weight".to_string()),
                ..EntityAttribute::new("a2", AttributeValue::Double(2.5))
            },
        ];

        assert_eq!(attributes.attribute("weight").and_then(EntityAttribute::as_f64), Some(2.5));
        assert_eq!(attributes.attribute_by_id("a1").and_then(EntityAttribute::as_str), Some("red"));
        assert!(attributes.attribute("").is_none());
        assert!(attributes.attribute_by_id("missing").is_none());
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut attributes = vec![EntityAttribute {
            name: Some("Color".to_string()),
            ..EntityAttribute::new("a1", AttributeValue::String("red".to_string()))
        }];

        attributes.upsert_attribute(EntityAttribute::new(
            "a1",
            AttributeValue::String("blue".to_string()),
        ));
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].as_str(), Some("blue"));

        attributes.upsert_attribute(EntityAttribute::new("a2", AttributeValue::Long(1)));
        assert_eq!(attributes.len(), 2);

        assert_eq!(attributes.remove_attribute_by_id("a2"), 1);
        assert_eq!(attributes.remove_attribute("COLOR"), 0);
        assert_eq!(attributes.len(), 1);
    }

    #[test]
    fn test_builder_sets_meta_and_tags() {
        let base = BaseUrl::new("https://api.example.com/v1/").unwrap();
        let attributes = AttributeBuilder::new(&base, "/entity/customerorder/")
            .add_boolean("b1", true, Some("Paid"))
            .add_double("d1", 9.75, None)
            .build();

        let meta = attributes[0].meta.as_ref().unwrap();
        assert_eq!(
            meta.href,
            "https://api.example.com/v1/entity/customerorder/metadata/attributes/b1"
        );
        assert_eq!(meta.entity_type.as_deref(), Some("attributemetadata"));
        assert_eq!(attributes[0].attribute_type, Some(AttributeType::Boolean));
        assert_eq!(attributes[0].name.as_deref(), Some("Paid"));
        assert_eq!(
            serde_json::to_value(&attributes[1]).unwrap()["value"],
            json!(9.75)
        );
    }
}
