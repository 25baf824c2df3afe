//! Schema-directed encoding of a [`Value`] into a [`WireSink`].

mod record;

use tc_schema::{EnumSchema, Primitive, Schema, SchemaKind, SchemaRef, Value};
use tc_wire::{Capabilities, Scalar, WireError, WireSink};

use crate::key::{any_scalar, encode_key, key_text, stringify};
use crate::{EncodeError, Path, Segment};

// -----------------------------------------------------------------------------
// encode

/// Encodes `value` into `sink` against `schema`.
///
/// # Examples
///
/// ```
/// use tc_codec::encode;
/// use tc_schema::{RecordBuilder, Record, Schema, attrs};
/// use tc_wire::{Capabilities, Document, DocumentWriter};
///
/// let schema = RecordBuilder::new("Point")
///     .field_with("a", Schema::int().into_ref(), attrs! { "rename" => "x" })
///     .build()
///     .unwrap();
/// let mut writer = DocumentWriter::new(Capabilities::JSON);
/// encode(&schema, &Record::new().with("a", 1).into(), &mut writer).unwrap();
/// assert_eq!(writer.finish().unwrap().get("x"), Some(&Document::Int(1)));
/// ```
pub fn encode<S: WireSink>(schema: &Schema, value: &Value, sink: S) -> Result<(), EncodeError> {
    Encoder::new(sink).encode(schema, value)
}

// -----------------------------------------------------------------------------
// Encoder

/// Walks a schema together with a value and pushes events into a
/// [`WireSink`].
pub struct Encoder<S> {
    sink: S,
    caps: Capabilities,
    path: Vec<Segment>,
}

impl<S: WireSink> Encoder<S> {
    pub fn new(sink: S) -> Self {
        let caps = sink.capabilities();
        Self {
            sink,
            caps,
            path: Vec::new(),
        }
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Encodes `value`, which must have the shape `schema` describes.
    pub fn encode(&mut self, schema: &Schema, value: &Value) -> Result<(), EncodeError> {
        match (schema.kind(), value) {
            (SchemaKind::Primitive(p), value) => self.primitive(*p, value),
            (SchemaKind::Sequence(item), Value::Seq(items)) => {
                self.begin_seq(Some(items.len()))?;
                for (index, item_value) in items.iter().enumerate() {
                    self.path.push(Segment::Index(index));
                    self.encode(item, item_value)?;
                    self.path.pop();
                }
                self.end_seq()
            }
            (SchemaKind::Mapping { key, value: value_schema }, Value::Map(entries)) => {
                self.begin_map(Some(entries.len()))?;
                for (k, v) in entries {
                    let wire_key = self.key(k, key)?;
                    self.path.push(Segment::Key(key_text(&wire_key)));
                    self.map_key(wire_key)?;
                    self.encode(value_schema, v)?;
                    self.path.pop();
                }
                self.end_map()
            }
            (SchemaKind::Tuple { elements, open }, Value::Tuple(items)) => {
                self.tuple(elements, *open, items)
            }
            (SchemaKind::Optional(_), Value::None) => self.null(),
            (SchemaKind::Optional(inner), value) => self.encode(inner, value),
            (SchemaKind::Union(members), Value::Union(member)) => {
                let Some(member_schema) = members.get(member.member) else {
                    return Err(self.mismatch(
                        format!("member of a {}-member union", members.len()),
                        "union",
                    ));
                };
                self.encode(member_schema, &member.value)
            }
            (SchemaKind::Record(record), Value::Record(fields)) => self.record(record, fields),
            (SchemaKind::EnumValue(e), Value::Enum(member)) => {
                let variant = self.variant(e, &member.variant)?;
                if member.payload.is_some() {
                    return Err(self.mismatch("enum value without payload", "payload"));
                }
                let discriminant = variant.discriminant().clone();
                self.value(discriminant)
            }
            (SchemaKind::EnumTagged(e), Value::Enum(member)) => {
                let variant = self.variant(e, &member.variant)?;
                let tag = Scalar::Str(variant.ser_name().to_owned());
                match (variant.payload(), &member.payload) {
                    (None, None) => self.value(tag),
                    (Some(payload_schema), Some(payload)) => {
                        let segment = Segment::Variant(variant.ser_name().to_owned());
                        self.begin_map(Some(1))?;
                        self.map_key(tag)?;
                        self.path.push(segment);
                        self.encode(payload_schema, payload)?;
                        self.path.pop();
                        self.end_map()
                    }
                    (None, Some(_)) => Err(self.mismatch("unit variant", "payload")),
                    (Some(_), None) => Err(self.mismatch("variant payload", "none")),
                }
            }
            (SchemaKind::Any, value) => self.any(value),
            (kind, value) => Err(self.mismatch(kind.name(), value.kind_name())),
        }
    }

    // -------------------------------------------------------------------------
    // Errors

    fn path(&self) -> Path {
        Path::from(self.path.as_slice())
    }

    fn wire(&self, source: WireError) -> EncodeError {
        EncodeError::Wire {
            path: self.path(),
            source,
        }
    }

    fn mismatch(&self, expected: impl Into<String>, actual: &'static str) -> EncodeError {
        EncodeError::TypeMismatch {
            path: self.path(),
            expected: expected.into(),
            actual,
        }
    }

    // -------------------------------------------------------------------------
    // Sink calls

    fn begin_map(&mut self, size_hint: Option<usize>) -> Result<(), EncodeError> {
        self.sink.begin_map(size_hint).map_err(|e| self.wire(e))
    }

    fn map_key(&mut self, key: Scalar) -> Result<(), EncodeError> {
        self.sink.map_key(key).map_err(|e| self.wire(e))
    }

    fn end_map(&mut self) -> Result<(), EncodeError> {
        self.sink.end_map().map_err(|e| self.wire(e))
    }

    fn begin_seq(&mut self, size_hint: Option<usize>) -> Result<(), EncodeError> {
        self.sink.begin_seq(size_hint).map_err(|e| self.wire(e))
    }

    fn end_seq(&mut self) -> Result<(), EncodeError> {
        self.sink.end_seq().map_err(|e| self.wire(e))
    }

    fn value(&mut self, scalar: Scalar) -> Result<(), EncodeError> {
        self.sink.value(scalar).map_err(|e| self.wire(e))
    }

    fn null(&mut self) -> Result<(), EncodeError> {
        self.sink.null().map_err(|e| self.wire(e))
    }

    fn key(&self, key: &Value, schema: &Schema) -> Result<Scalar, EncodeError> {
        encode_key(key, schema, self.caps.requires_string_map_keys)
            .ok_or_else(|| self.mismatch(format!("{} key", schema.kind().name()), key.kind_name()))
    }

    // -------------------------------------------------------------------------
    // Kinds

    fn primitive(&mut self, primitive: Primitive, value: &Value) -> Result<(), EncodeError> {
        let scalar = match (primitive, value) {
            (Primitive::Bool, Value::Bool(b)) => Scalar::Bool(*b),
            (Primitive::Int, Value::Int(i)) => Scalar::Int(*i),
            (Primitive::Float, Value::Float(f)) => Scalar::Float(*f),
            (Primitive::Float, Value::Int(i)) => Scalar::Float(*i as f64),
            (Primitive::Str, Value::Str(s)) => Scalar::Str(s.clone()),
            (Primitive::Bytes, Value::Bytes(b)) => return self.bytes(b),
            (primitive, value) => match primitive.format_text(value) {
                Some(text) => Scalar::Str(text),
                None => return Err(self.mismatch(primitive.name(), value.kind_name())),
            },
        };
        self.value(scalar)
    }

    // Formats without a byte scalar get a sequence of integers.
    fn bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        if self.caps.supports_bytes_scalar {
            return self.value(Scalar::Bytes(bytes.to_vec()));
        }
        self.begin_seq(Some(bytes.len()))?;
        for byte in bytes {
            self.value(Scalar::Int(i64::from(*byte)))?;
        }
        self.end_seq()
    }

    fn tuple(
        &mut self,
        elements: &[SchemaRef],
        open: bool,
        items: &[Value],
    ) -> Result<(), EncodeError> {
        if items.len() < elements.len() || (!open && items.len() > elements.len()) {
            return Err(EncodeError::ArityMismatch {
                path: self.path(),
                expected: elements.len(),
                actual: items.len(),
            });
        }
        self.begin_seq(Some(items.len()))?;
        for (index, item) in items.iter().enumerate() {
            self.path.push(Segment::Index(index));
            match elements.get(index) {
                Some(element) => self.encode(element, item)?,
                None => self.any(item)?,
            }
            self.path.pop();
        }
        self.end_seq()
    }

    fn variant<'e>(
        &self,
        schema: &'e EnumSchema,
        name: &str,
    ) -> Result<&'e tc_schema::VariantSpec, EncodeError> {
        match schema.variant(name) {
            Some(variant) if variant.skips_serializing() => Err(EncodeError::SkippedVariant {
                path: self.path(),
                variant: variant.name().to_owned(),
            }),
            Some(variant) => Ok(variant),
            None => Err(EncodeError::UnknownVariant {
                path: self.path(),
                value: name.to_owned(),
            }),
        }
    }

    /// Encodes a value with no schema guidance, following its own structure.
    fn any(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::None => self.null(),
            Value::Bytes(b) => self.bytes(b),
            Value::Seq(items) | Value::Tuple(items) => {
                self.begin_seq(Some(items.len()))?;
                for (index, item) in items.iter().enumerate() {
                    self.path.push(Segment::Index(index));
                    self.any(item)?;
                    self.path.pop();
                }
                self.end_seq()
            }
            Value::Map(entries) => {
                self.begin_map(Some(entries.len()))?;
                for (k, v) in entries {
                    let key = any_scalar(k)
                        .and_then(|s| {
                            if self.caps.requires_string_map_keys {
                                stringify(s)
                            } else {
                                Some(s)
                            }
                        })
                        .ok_or_else(|| self.mismatch("scalar key", k.kind_name()))?;
                    self.path.push(Segment::Key(key_text(&key)));
                    self.map_key(key)?;
                    self.any(v)?;
                    self.path.pop();
                }
                self.end_map()
            }
            Value::Record(record) => {
                self.begin_map(Some(record.len()))?;
                for (name, v) in record.iter() {
                    self.path.push(Segment::Field(name.to_owned()));
                    self.map_key(Scalar::Str(name.to_owned()))?;
                    self.any(v)?;
                    self.path.pop();
                }
                self.end_map()
            }
            Value::Enum(member) => match &member.payload {
                None => self.value(Scalar::Str(member.variant.clone())),
                Some(payload) => {
                    self.begin_map(Some(1))?;
                    self.map_key(Scalar::Str(member.variant.clone()))?;
                    self.path.push(Segment::Variant(member.variant.clone()));
                    self.any(payload)?;
                    self.path.pop();
                    self.end_map()
                }
            },
            Value::Union(member) => self.any(&member.value),
            scalar => match any_scalar(scalar) {
                Some(s) => self.value(s),
                None => Err(self.mismatch("encodable value", scalar.kind_name())),
            },
        }
    }
}
