use tc_schema::{Record, RecordSchema, SchemaKind, Value};
use tc_wire::{Scalar, WireSink};

use super::Encoder;
use crate::key::key_text;
use crate::{EncodeError, Segment};

impl<S: WireSink> Encoder<S> {
    /// Encodes a record as a wire map keyed by serialized field names.
    ///
    /// Flattened fields are merged into the same map. When the format has
    /// no null, `None` fields are left out.
    pub(super) fn record(&mut self, schema: &RecordSchema, value: &Record) -> Result<(), EncodeError> {
        if schema.has_flatten() && !self.caps.supports_flatten {
            return Err(EncodeError::FlattenUnsupported { path: self.path() });
        }
        let size_hint = if schema.has_flatten() || !self.caps.supports_null {
            None
        } else {
            Some(schema.fields().iter().filter(|f| !f.skips_serializing()).count())
        };

        self.begin_map(size_hint)?;
        self.fields(schema, value)?;
        self.end_map()
    }

    fn fields(&mut self, schema: &RecordSchema, value: &Record) -> Result<(), EncodeError> {
        for field in schema.fields() {
            if field.skips_serializing() {
                continue;
            }
            let Some(field_value) = value.get(field.name()) else {
                return Err(EncodeError::MissingField {
                    path: self.path(),
                    field: field.name().to_owned(),
                });
            };

            if field.is_flatten() {
                match (field.schema().kind(), field_value) {
                    (SchemaKind::Record(inner), Value::Record(inner_value)) => {
                        self.fields(inner, inner_value)?;
                    }
                    (SchemaKind::Mapping { key, value }, Value::Map(entries)) => {
                        for (k, v) in entries {
                            let wire_key = self.key(k, key)?;
                            self.path.push(Segment::Key(key_text(&wire_key)));
                            self.map_key(wire_key)?;
                            self.encode(value, v)?;
                            self.path.pop();
                        }
                    }
                    (kind, v) => return Err(self.mismatch(kind.name(), v.kind_name())),
                }
                continue;
            }

            if field_value.is_none() && !self.caps.supports_null {
                log::trace!("omitting none field `{}`", field.ser_name());
                continue;
            }
            self.path.push(Segment::Field(field.ser_name().to_owned()));
            self.map_key(Scalar::Str(field.ser_name().to_owned()))?;
            self.encode(field.schema(), field_value)?;
            self.path.pop();
        }
        Ok(())
    }
}
