use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{DefaultPolicy, Primitive, Record, Schema, SchemaError, SchemaKind, UnionMember, Value};

/// Nesting limit when synthesizing zero values of recursive records.
const MAX_DEPTH: usize = 32;

/// The zero value of a schema.
///
/// Primitives give `false`, `0`, `0.0`, `""` or empty bytes; timestamps
/// and dates start at the Unix epoch, times at midnight, decimals at zero and
/// UUIDs are nil. Containers are empty; optionals are none. A record takes its fields' default policies,
/// falling back to the zero value of each field. Enums have no zero value.
///
/// # Examples
///
/// ```
/// use tc_schema::{Schema, Value, zero_value};
///
/// let schema = Schema::tuple("(i64, str)", vec![Schema::int().into_ref(), Schema::str().into_ref()]);
/// assert_eq!(
///     zero_value(&schema).unwrap(),
///     Value::Tuple(vec![Value::Int(0), Value::from("")]),
/// );
/// ```
pub fn zero_value(schema: &Schema) -> Result<Value, SchemaError> {
    zero_at(schema, 0)
}

fn zero_at(schema: &Schema, depth: usize) -> Result<Value, SchemaError> {
    if depth > MAX_DEPTH {
        return Err(SchemaError::NoZeroValue(schema.name().to_owned()));
    }

    Ok(match schema.kind() {
        SchemaKind::Primitive(p) => match p {
            Primitive::Bool => Value::Bool(false),
            Primitive::Int => Value::Int(0),
            Primitive::Float => Value::Float(0.0),
            Primitive::Str => Value::Str(String::new()),
            Primitive::Bytes => Value::Bytes(Vec::new()),
            Primitive::DateTime => Value::DateTime(DateTime::<Utc>::UNIX_EPOCH.fixed_offset()),
            Primitive::Date => Value::Date(NaiveDate::default()),
            Primitive::Time => Value::Time(NaiveTime::default()),
            Primitive::Decimal => Value::Decimal(Decimal::ZERO),
            Primitive::Uuid => Value::Uuid(Uuid::nil()),
        },
        SchemaKind::Sequence(_) => Value::Seq(Vec::new()),
        SchemaKind::Mapping { .. } => Value::Map(Vec::new()),
        SchemaKind::Tuple { elements, .. } => Value::Tuple(
            elements
                .iter()
                .map(|e| zero_at(e, depth + 1))
                .collect::<Result<_, _>>()?,
        ),
        SchemaKind::Optional(_) | SchemaKind::Any => Value::None,
        SchemaKind::Union(members) => {
            let Some(first) = members.first() else {
                return Err(SchemaError::NoZeroValue(schema.name().to_owned()));
            };
            Value::Union(UnionMember::new(0, zero_at(first, depth + 1)?))
        }
        SchemaKind::Record(record) => {
            let mut value = Record::new();
            for field in record.fields() {
                let v = match field.default() {
                    Some(DefaultPolicy::Explicit(v)) => v.clone(),
                    Some(DefaultPolicy::Factory(f)) => f(),
                    Some(DefaultPolicy::Zero) | None => zero_at(field.schema(), depth + 1)?,
                };
                value.insert(field.name(), v);
            }
            Value::Record(value)
        }
        SchemaKind::EnumValue(_) | SchemaKind::EnumTagged(_) => {
            return Err(SchemaError::NoZeroValue(schema.name().to_owned()));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::zero_value;
    use crate::{Record, RecordBuilder, Schema, SchemaError, SchemaRef, Value, attrs};

    #[test]
    fn record_uses_field_defaults() {
        let schema = RecordBuilder::new("Foo")
            .field("a", Schema::int().into_ref())
            .field_with("b", Schema::str().into_ref(), attrs! { "default_value" => "x" })
            .field(
                "c",
                Schema::optional("Option<i64>", Schema::int().into_ref()).into_ref(),
            )
            .build()
            .unwrap();
        assert_eq!(
            zero_value(&schema).unwrap(),
            Value::Record(
                Record::new()
                    .with("a", 0)
                    .with("b", "x")
                    .with("c", Value::None)
            )
        );
    }

    #[test]
    fn textual_zeros() {
        let zeros: Vec<_> = [Schema::datetime(), Schema::date(), Schema::time(), Schema::uuid()]
            .iter()
            .map(|s| zero_value(s).unwrap().to_string())
            .collect();
        assert_eq!(
            zeros,
            [
                "1970-01-01T00:00:00+00:00",
                "1970-01-01",
                "00:00:00",
                "00000000-0000-0000-0000-000000000000",
            ]
        );
        assert_eq!(zero_value(&Schema::decimal()).unwrap().to_string(), "0");
    }

    #[test]
    fn recursion_is_bounded() {
        let node = SchemaRef::placeholder("Node");
        let schema = RecordBuilder::new("Node")
            .field("child", node.clone())
            .build()
            .unwrap();
        node.fill(schema);
        assert_eq!(
            zero_value(&node),
            Err(SchemaError::NoZeroValue("Node".into()))
        );
    }
}
