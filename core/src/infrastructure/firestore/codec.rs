use serde_json::{Map, Value, json};

use crate::domain::storage::entities::Document;

/// Encodes a JSON value as a Firestore typed value.
pub fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // Firestore sends and expects int64 as a decimal string.
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(to_firestore_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": to_firestore_fields(map) } }),
    }
}

pub fn to_firestore_fields(document: &Document) -> Map<String, Value> {
    document
        .iter()
        .map(|(key, value)| (key.clone(), to_firestore_value(value)))
        .collect()
}

/// Decodes a Firestore typed value. Timestamps and references come back as
/// strings; unknown shapes decode to null.
pub fn from_firestore_value(value: &Value) -> Value {
    let Some(object) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = object.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or_default()),
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(n) => Value::Number(n.clone()),
            _ => Value::Null,
        },
        "doubleValue" => match inner {
            Value::Number(n) => Value::Number(n.clone()),
            // NaN and infinities are sent as strings and have no JSON form.
            _ => Value::Null,
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(from_firestore_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(from_firestore_fields)
                .unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

pub fn from_firestore_fields(fields: &Map<String, Value>) -> Document {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), from_firestore_value(value)))
        .collect()
}

/// Decoded fields of a Firestore document resource. A document with no
/// fields decodes to an empty map.
pub fn document_fields(resource: &Value) -> Document {
    resource
        .get("fields")
        .and_then(Value::as_object)
        .map(from_firestore_fields)
        .unwrap_or_default()
}

/// Last path segment of a document resource name.
pub fn document_id(resource: &Value) -> Option<String> {
    resource
        .get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .filter(|id| !id.is_empty())
        .map(|id| urlencoding::decode(id).map(|id| id.into_owned()).unwrap_or_else(|_| id.to_string()))
}
