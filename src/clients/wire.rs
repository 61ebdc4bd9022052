//! Serialization of request bodies into their wire form.
//!
//! Struct fields are renamed to camelCase and fields whose value is `null`
//! are omitted. Maps, including [`serde_json::Value`] objects and
//! `#[serde(flatten)]` remainders, are written exactly as they are.

use serde::ser::{
    Serialize, SerializeSeq, SerializeStruct, SerializeStructVariant, SerializeTuple,
    SerializeTupleStruct, SerializeTupleVariant, Serializer,
};
use serde_json::{Error, Map, Value};

/// Serializes `value` into the JSON sent on the wire.
///
/// # Errors
///
/// Returns an error if `value` cannot be represented as JSON.
pub fn to_wire_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, Error> {
    value.serialize(WireSerializer)
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else if out.is_empty() {
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    if out.is_empty() {
        key.to_string()
    } else {
        out
    }
}

fn single_entry(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

struct WireSerializer;

macro_rules! delegate {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<Value, Error> {
                serde_json::value::Serializer.$method(v)
            }
        )*
    };
}

impl Serializer for WireSerializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = WireSeq;
    type SerializeTuple = WireSeq;
    type SerializeTupleStruct = WireSeq;
    type SerializeTupleVariant = WireTupleVariant;
    type SerializeMap = <serde_json::value::Serializer as Serializer>::SerializeMap;
    type SerializeStruct = WireStruct;
    type SerializeStructVariant = WireStructVariant;

    delegate!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
    );

    fn serialize_none(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value, Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Value, Error> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, Error> {
        Ok(single_entry(variant, value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<WireSeq, Error> {
        Ok(WireSeq {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<WireSeq, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<WireSeq, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<WireTupleVariant, Error> {
        Ok(WireTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Error> {
        serde_json::value::Serializer.serialize_map(len)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<WireStruct, Error> {
        Ok(WireStruct { fields: Map::new() })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<WireStructVariant, Error> {
        Ok(WireStructVariant {
            variant,
            fields: WireStruct { fields: Map::new() },
        })
    }
}

struct WireSeq {
    items: Vec<Value>,
}

impl SerializeSeq for WireSeq {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.items.push(value.serialize(WireSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Array(self.items))
    }
}

impl SerializeTuple for WireSeq {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        SerializeSeq::end(self)
    }
}

impl SerializeTupleStruct for WireSeq {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        SerializeSeq::end(self)
    }
}

struct WireTupleVariant {
    variant: &'static str,
    items: Vec<Value>,
}

impl SerializeTupleVariant for WireTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.items.push(value.serialize(WireSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(single_entry(self.variant, Value::Array(self.items)))
    }
}

struct WireStruct {
    fields: Map<String, Value>,
}

impl SerializeStruct for WireStruct {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        let value = value.serialize(WireSerializer)?;
        if !value.is_null() {
            self.fields.insert(camel_case(key), value);
        }
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Object(self.fields))
    }
}

struct WireStructVariant {
    variant: &'static str,
    fields: WireStruct,
}

impl SerializeStructVariant for WireStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        SerializeStruct::serialize_field(&mut self.fields, key, value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(single_entry(self.variant, SerializeStruct::end(self.fields)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Price {
        value: i64,
        currency: Option<String>,
    }

    #[derive(Serialize)]
    struct Draft {
        name: String,
        sale_prices: Vec<Price>,
        description: Option<String>,
        owner: Value,
    }

    #[test]
    fn test_struct_fields_are_renamed_and_nulls_dropped() {
        let draft = Draft {
            name: "x".to_string(),
            sale_prices: vec![Price {
                value: 100,
                currency: None,
            }],
            description: None,
            owner: json!({"id": "o1"}),
        };

        assert_eq!(
            to_wire_value(&draft).unwrap(),
            json!({"name": "x", "salePrices": [{"value": 100}], "owner": {"id": "o1"}})
        );
    }

    #[test]
    fn test_opaque_json_is_written_verbatim() {
        let draft = Draft {
            name: "x".to_string(),
            sale_prices: Vec::new(),
            description: None,
            owner: json!({"some_key": 1, "Keep": null, "list": [{"inner_key": null}]}),
        };

        let wire = to_wire_value(&draft).unwrap();
        assert_eq!(
            wire["owner"],
            json!({"some_key": 1, "Keep": null, "list": [{"inner_key": null}]})
        );

        let raw = json!({"name": "x", "owner": {"some_key": 1, "Keep": null}});
        assert_eq!(to_wire_value(&raw).unwrap(), raw);
    }

    #[test]
    fn test_maps_keep_their_keys() {
        let mut map = BTreeMap::new();
        map.insert("vat_enabled", Some(true));
        map.insert("archived", None);
        assert_eq!(
            to_wire_value(&map).unwrap(),
            json!({"vat_enabled": true, "archived": null})
        );
    }

    #[test]
    fn test_arrays_keep_null_elements() {
        let items = vec![Some(1), None, Some(3)];
        assert_eq!(to_wire_value(&items).unwrap(), json!([1, null, 3]));
    }

    #[test]
    fn test_enums_use_variant_names() {
        #[derive(Serialize)]
        enum Change {
            Archive,
            Rename(String),
            Move { target_store: String, note: Option<String> },
        }

        assert_eq!(to_wire_value(&Change::Archive).unwrap(), json!("Archive"));
        assert_eq!(
            to_wire_value(&Change::Rename("y".to_string())).unwrap(),
            json!({"Rename": "y"})
        );
        assert_eq!(
            to_wire_value(&Change::Move {
                target_store: "s1".to_string(),
                note: None
            })
            .unwrap(),
            json!({"Move": {"targetStore": "s1"}})
        );
    }

    #[test]
    fn test_camel_case_edge_cases() {
        assert_eq!(camel_case("already"), "already");
        assert_eq!(camel_case("mediaType"), "mediaType");
        assert_eq!(camel_case("vat_enabled"), "vatEnabled");
        assert_eq!(camel_case("_meta"), "meta");
        assert_eq!(camel_case("_"), "_");
    }
}
