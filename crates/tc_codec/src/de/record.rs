use tc_schema::{DecodePlan, DefaultPolicy, PlanLeaf, Record, RecordSchema, Schema, SchemaKind, Value, zero_value};
use tc_wire::{WireKind, WireSource};

use super::{Decoder, Entries};
use crate::key::key_text;
use crate::{DecodeError, Segment};

impl<S: WireSource> Decoder<S> {
    /// Decodes a record from a wire map.
    ///
    /// Keys are matched against the record's decode plan, which already
    /// includes the fields of flattened records. Values are collected per
    /// plan leaf first and assembled into nested records once the map is
    /// consumed; a repeated key overwrites the earlier value.
    pub(super) fn record(
        &mut self,
        schema: &Schema,
        record: &RecordSchema,
    ) -> Result<Value, DecodeError> {
        if record.has_flatten() && !self.caps.supports_flatten {
            return Err(DecodeError::FlattenUnsupported { path: self.path() });
        }
        self.expect(WireKind::Map, "map")?;
        self.enter_map()?;

        let plan = record.plan();
        let mut slots: Vec<Option<Value>> = vec![None; plan.leaves().len()];
        let mut rest = Entries::default();

        while let Some(key) = self.next_key()? {
            if let Some(index) = key.as_str().and_then(|name| plan.lookup(name)) {
                let field = &plan.leaves()[index].field;
                if field.skips_deserializing() {
                    log::trace!(
                        "ignoring `{}` of `{}`, the field is not deserialized",
                        field.de_name(),
                        schema.name()
                    );
                    self.skip()?;
                    continue;
                }
                self.path.push(Segment::Field(field.de_name().to_owned()));
                let value = self.decode(field.schema())?;
                self.path.pop();
                slots[index] = Some(value);
            } else if let Some(catch_all) = plan.catch_all() {
                let entry_key = self.key(&key, &catch_all.key)?;
                self.path.push(Segment::Key(key_text(&key)));
                let value = self.decode(&catch_all.value)?;
                self.path.pop();
                rest.insert(entry_key, value);
            } else if record.deny_unknown_fields() {
                return Err(DecodeError::UnknownField {
                    path: self.path(),
                    field: key_text(&key),
                });
            } else {
                log::trace!("dropping unknown field {key} of `{}`", schema.name());
                self.skip()?;
            }
        }
        self.exit_map()?;

        let mut cursor = 0;
        let mut rest = Some(rest.into_vec());
        let fields = self.assemble(record, plan, &mut slots, &mut cursor, &mut rest)?;
        Ok(Value::Record(fields))
    }

    // Walks the fields in plan order. `cursor` is the index of the next leaf.
    fn assemble(
        &self,
        record: &RecordSchema,
        plan: &DecodePlan,
        slots: &mut [Option<Value>],
        cursor: &mut usize,
        rest: &mut Option<Vec<(Value, Value)>>,
    ) -> Result<Record, DecodeError> {
        let mut out = Record::new();
        for field in record.fields() {
            let value = if field.is_flatten() {
                match field.schema().kind() {
                    SchemaKind::Record(inner) => {
                        Value::Record(self.assemble(inner, plan, slots, cursor, rest)?)
                    }
                    _ => Value::Map(rest.take().unwrap_or_default()),
                }
            } else {
                let index = *cursor;
                *cursor += 1;
                match slots[index].take() {
                    Some(value) => value,
                    None => self.fill_missing(&plan.leaves()[index])?,
                }
            };
            out.insert(field.name(), value);
        }
        Ok(out)
    }

    /// The value of a field absent from the wire map.
    ///
    /// An explicit value or factory wins, then `None` for optional fields,
    /// then the zero value when the field or its record asks for one.
    fn fill_missing(&self, leaf: &PlanLeaf) -> Result<Value, DecodeError> {
        let field = &leaf.field;
        let schema = field.schema();
        let no_default = || DecodeError::MissingDefault {
            path: self.path(),
            field: field.name().to_owned(),
        };

        if let Some(policy @ (DefaultPolicy::Explicit(_) | DefaultPolicy::Factory(_))) =
            field.default()
        {
            return policy.produce(schema).map_err(|_| no_default());
        }
        if schema.is_optional() {
            return Ok(Value::None);
        }
        if matches!(field.default(), Some(DefaultPolicy::Zero)) || leaf.owner_default {
            return zero_value(schema).map_err(|e| {
                log::debug!("no zero value for `{}`: {e}", field.name());
                no_default()
            });
        }
        if field.skips_deserializing() {
            return Err(no_default());
        }
        Err(DecodeError::MissingField {
            path: self.path(),
            field: field.de_name().to_owned(),
        })
    }
}
