//! Primitives that travel as strings: timestamps, dates, times, decimals
//! and UUIDs. Each has one canonical text form, written on encode and
//! parsed back on decode, whatever the format.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use uuid::Uuid;

use crate::{Primitive, Value};

impl Primitive {
    /// Whether values of this primitive are written as strings.
    #[inline]
    pub const fn is_textual(self) -> bool {
        matches!(
            self,
            Primitive::DateTime
                | Primitive::Date
                | Primitive::Time
                | Primitive::Decimal
                | Primitive::Uuid
        )
    }

    /// Parses the text form of a textual primitive.
    ///
    /// A date-time without an offset is taken as UTC. Returns `None` for
    /// malformed text and for primitives that are not textual.
    pub fn parse_text(self, text: &str) -> Option<Value> {
        Some(match self {
            Primitive::DateTime => Value::DateTime(parse_datetime(text)?),
            Primitive::Date => Value::Date(text.parse().ok()?),
            Primitive::Time => Value::Time(text.parse().ok()?),
            Primitive::Decimal => Value::Decimal(text.parse().ok()?),
            Primitive::Uuid => Value::Uuid(Uuid::parse_str(text).ok()?),
            _ => return None,
        })
    }

    /// The text form of `value`, when it is a value of this primitive.
    pub fn format_text(self, value: &Value) -> Option<String> {
        Some(match (self, value) {
            (Primitive::DateTime, Value::DateTime(v)) => v.to_rfc3339(),
            (Primitive::Date, Value::Date(v)) => v.to_string(),
            (Primitive::Time, Value::Time(v)) => v.to_string(),
            (Primitive::Decimal, Value::Decimal(v)) => v.to_string(),
            (Primitive::Uuid, Value::Uuid(v)) => v.hyphenated().to_string(),
            _ => return None,
        })
    }
}

impl Value {
    /// The textual primitive this value belongs to.
    pub const fn textual(&self) -> Option<Primitive> {
        Some(match self {
            Value::DateTime(_) => Primitive::DateTime,
            Value::Date(_) => Primitive::Date,
            Value::Time(_) => Primitive::Time,
            Value::Decimal(_) => Primitive::Decimal,
            Value::Uuid(_) => Primitive::Uuid,
            _ => return None,
        })
    }
}

fn parse_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).ok().or_else(|| {
        let naive: NaiveDateTime = text.parse().ok()?;
        Some(naive.and_utc().fixed_offset())
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::{Primitive, Value};

    fn again(primitive: Primitive, text: &str) -> Option<String> {
        let value = primitive.parse_text(text)?;
        primitive.format_text(&value)
    }

    #[test]
    fn canonical_text() {
        assert_eq!(
            again(Primitive::DateTime, "2021-03-04T05:06:07+09:00").as_deref(),
            Some("2021-03-04T05:06:07+09:00")
        );
        assert_eq!(again(Primitive::Date, "2021-03-04").as_deref(), Some("2021-03-04"));
        assert_eq!(again(Primitive::Time, "05:06:07.250").as_deref(), Some("05:06:07.250"));
        assert_eq!(again(Primitive::Decimal, "1.50").as_deref(), Some("1.50"));
        assert_eq!(
            again(Primitive::Uuid, "67E55044-10B1-426F-9247-BB680E5FE0C8").as_deref(),
            Some("67e55044-10b1-426f-9247-bb680e5fe0c8")
        );
    }

    #[test]
    fn naive_datetime_is_utc() {
        let value = Primitive::DateTime.parse_text("2021-03-04T05:06:07").unwrap();
        assert_eq!(value.to_string(), "2021-03-04T05:06:07+00:00");
    }

    #[test]
    fn malformed_text() {
        assert_eq!(Primitive::Date.parse_text("2021-13-01"), None);
        assert_eq!(Primitive::Time.parse_text("noon"), None);
        assert_eq!(Primitive::Decimal.parse_text("1.2.3"), None);
        assert_eq!(Primitive::Uuid.parse_text("not-a-uuid"), None);
        assert_eq!(Primitive::Str.parse_text("x"), None);
    }

    #[test]
    fn textual_kinds() {
        assert!(Primitive::Uuid.is_textual());
        assert!(!Primitive::Str.is_textual());
        assert_eq!(Value::from(Uuid::nil()).textual(), Some(Primitive::Uuid));
        assert_eq!(Value::from(Decimal::ONE).textual(), Some(Primitive::Decimal));
        assert_eq!(Value::from("x").textual(), None);
        assert_eq!(
            Primitive::Date.format_text(&Value::Time(NaiveTime::MIN)),
            None
        );
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(Primitive::Date.format_text(&date.into()).as_deref(), Some("2000-01-01"));
    }
}
