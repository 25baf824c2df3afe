//! Map keys are scalars on the wire. Formats with string-only keys need
//! non-string keys stringified on the way out and parsed on the way in.

use tc_schema::{EnumMember, Primitive, Schema, SchemaKind, UnionMember, Value};
use tc_wire::Scalar;

/// Converts a wire key into a value of the key schema, or `None` when the
/// key does not fit it.
pub(crate) fn decode_key(key: &Scalar, schema: &Schema, string_keys: bool) -> Option<Value> {
    match schema.kind() {
        SchemaKind::Primitive(p) => primitive_key(key, *p, string_keys),
        SchemaKind::Optional(inner) => decode_key(key, inner, string_keys),
        SchemaKind::Union(members) => members.iter().enumerate().find_map(|(index, member)| {
            decode_key(key, member, string_keys).map(|v| Value::Union(UnionMember::new(index, v)))
        }),
        SchemaKind::EnumTagged(e) => {
            let tag = key.as_str()?;
            let variant = e
                .by_de_name(tag)
                .filter(|v| !v.skips_deserializing() && v.payload().is_none())
                .or_else(|| e.other())?;
            Some(Value::Enum(EnumMember::unit(variant.name())))
        }
        SchemaKind::EnumValue(e) => {
            let variant = e
                .variants()
                .iter()
                .filter(|v| !v.skips_deserializing())
                .find(|v| {
                    v.discriminant() == key
                        || (string_keys
                            && key.as_str().is_some()
                            && stringify(v.discriminant().clone()).as_ref() == Some(key))
                })
                .or_else(|| e.other())?;
            Some(Value::Enum(EnumMember::unit(variant.name())))
        }
        SchemaKind::Any => Some(Value::from_scalar(key.clone())),
        _ => None,
    }
}

fn primitive_key(key: &Scalar, primitive: Primitive, string_keys: bool) -> Option<Value> {
    match (primitive, key) {
        (Primitive::Bool, Scalar::Bool(b)) => Some(Value::Bool(*b)),
        (Primitive::Int, Scalar::Int(i)) => Some(Value::Int(*i)),
        (Primitive::Float, Scalar::Float(f)) => Some(Value::Float(*f)),
        (Primitive::Float, Scalar::Int(i)) => Some(Value::Float(*i as f64)),
        (Primitive::Str, Scalar::Str(s)) => Some(Value::Str(s.clone())),
        (Primitive::Bytes, Scalar::Bytes(b)) => Some(Value::Bytes(b.clone())),
        (Primitive::Bool, Scalar::Str(s)) if string_keys => s.parse().ok().map(Value::Bool),
        (Primitive::Int, Scalar::Str(s)) if string_keys => s.parse().ok().map(Value::Int),
        (Primitive::Float, Scalar::Str(s)) if string_keys => s.parse().ok().map(Value::Float),
        (primitive, Scalar::Str(s)) => primitive.parse_text(s),
        _ => None,
    }
}

/// Converts a key value into a wire scalar, or `None` when the value does
/// not fit the key schema or cannot be written as a key.
pub(crate) fn encode_key(value: &Value, schema: &Schema, string_keys: bool) -> Option<Scalar> {
    let scalar = match (schema.kind(), value) {
        (SchemaKind::Primitive(p), v) => primitive_scalar(*p, v)?,
        (SchemaKind::Optional(inner), v) if !v.is_none() => {
            return encode_key(v, inner, string_keys);
        }
        (SchemaKind::Union(members), Value::Union(m)) => {
            return encode_key(&m.value, members.get(m.member)?, string_keys);
        }
        (SchemaKind::EnumTagged(e), Value::Enum(m)) if m.payload.is_none() => {
            let variant = e.variant(&m.variant).filter(|v| !v.skips_serializing())?;
            Scalar::Str(variant.ser_name().to_owned())
        }
        (SchemaKind::EnumValue(e), Value::Enum(m)) => {
            let variant = e.variant(&m.variant).filter(|v| !v.skips_serializing())?;
            variant.discriminant().clone()
        }
        (SchemaKind::Any, v) => any_scalar(v)?,
        _ => return None,
    };
    if string_keys {
        stringify(scalar)
    } else {
        Some(scalar)
    }
}

fn primitive_scalar(primitive: Primitive, value: &Value) -> Option<Scalar> {
    Some(match (primitive, value) {
        (Primitive::Bool, Value::Bool(b)) => Scalar::Bool(*b),
        (Primitive::Int, Value::Int(i)) => Scalar::Int(*i),
        (Primitive::Float, Value::Float(f)) => Scalar::Float(*f),
        (Primitive::Float, Value::Int(i)) => Scalar::Float(*i as f64),
        (Primitive::Str, Value::Str(s)) => Scalar::Str(s.clone()),
        (Primitive::Bytes, Value::Bytes(b)) => Scalar::Bytes(b.clone()),
        (primitive, value) => Scalar::Str(primitive.format_text(value)?),
    })
}

pub(crate) fn any_scalar(value: &Value) -> Option<Scalar> {
    Some(match value {
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Int(i) => Scalar::Int(*i),
        Value::Float(f) => Scalar::Float(*f),
        Value::Str(s) => Scalar::Str(s.clone()),
        Value::Bytes(b) => Scalar::Bytes(b.clone()),
        Value::Enum(m) if m.payload.is_none() => Scalar::Str(m.variant.clone()),
        Value::Union(m) => return any_scalar(&m.value),
        other => Scalar::Str(other.textual()?.format_text(other)?),
    })
}

/// Hashable identity of a decoded key. Two keys with the same identity are
/// the same entry of a map.
pub(crate) fn key_identity(key: &Value) -> Option<String> {
    any_scalar(key).map(|scalar| scalar.to_string())
}

/// A wire key as it appears in a path.
pub(crate) fn key_text(key: &Scalar) -> String {
    match key {
        Scalar::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text form of a scalar key. Byte strings have none.
pub(crate) fn stringify(scalar: Scalar) -> Option<Scalar> {
    Some(Scalar::Str(match scalar {
        Scalar::Str(s) => s,
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::UInt(u) => u.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bytes(_) => return None,
    }))
}
