use core::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use tc_wire::{Document, Scalar};
use uuid::Uuid;

// -----------------------------------------------------------------------------
// Value

/// A typed in-memory value, shaped by a [`Schema`](crate::Schema).
///
/// `Value` is what the codec produces when decoding and consumes when
/// encoding. Optional values are represented by the inner value itself or
/// [`Value::None`]; union values remember which member they belong to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    Time(NaiveTime),
    Decimal(Decimal),
    Uuid(Uuid),
    Seq(Vec<Value>),
    Tuple(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Record(Record),
    Enum(EnumMember),
    Union(UnionMember),
}

impl Value {
    /// A short name of the value's kind, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Decimal(_) => "decimal",
            Value::Uuid(_) => "uuid",
            Value::Seq(_) => "seq",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Enum(_) => "enum",
            Value::Union(_) => "union",
        }
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Converts an untyped document into a value without a schema.
    ///
    /// Sequences become [`Value::Seq`], maps become [`Value::Map`] and
    /// unsigned integers beyond `i64` become floats.
    pub fn from_document(doc: &Document) -> Value {
        match doc {
            Document::Null => Value::None,
            Document::Bool(v) => Value::Bool(*v),
            Document::Int(v) => Value::Int(*v),
            Document::UInt(v) => match i64::try_from(*v) {
                Ok(i) => Value::Int(i),
                Err(_) => Value::Float(*v as f64),
            },
            Document::Float(v) => Value::Float(*v),
            Document::Str(v) => Value::Str(v.clone()),
            Document::Bytes(v) => Value::Bytes(v.clone()),
            Document::Seq(items) => Value::Seq(items.iter().map(Value::from_document).collect()),
            Document::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (Value::from_document(k), Value::from_document(v)))
                    .collect(),
            ),
        }
    }

    /// Converts a wire scalar without a schema.
    pub fn from_scalar(scalar: Scalar) -> Value {
        match scalar {
            Scalar::Bool(v) => Value::Bool(v),
            Scalar::Int(v) => Value::Int(v),
            Scalar::UInt(v) => Value::Float(v as f64),
            Scalar::Float(v) => Value::Float(v),
            Scalar::Str(v) => Value::Str(v),
            Scalar::Bytes(v) => Value::Bytes(v),
        }
    }
}

// -----------------------------------------------------------------------------
// Record

/// The field values of a record, keyed by host field name.
///
/// Equality ignores the order of fields.
///
/// # Examples
///
/// ```
/// use tc_schema::Record;
///
/// let a = Record::new().with("a", "yes").with("b", 3);
/// let b = Record::new().with("b", 3).with("a", "yes");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style [`insert`](Self::insert).
    #[inline]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

// -----------------------------------------------------------------------------
// EnumMember

/// An enum value: the host name of the selected variant and its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub variant: String,
    pub payload: Option<Box<Value>>,
}

impl EnumMember {
    /// A variant without payload.
    #[inline]
    pub fn unit(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            payload: None,
        }
    }

    #[inline]
    pub fn with_payload(variant: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            variant: variant.into(),
            payload: Some(Box::new(payload.into())),
        }
    }
}

// -----------------------------------------------------------------------------
// UnionMember

/// A union value: the index of the member schema and the member's value.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionMember {
    pub member: usize,
    pub value: Box<Value>,
}

impl UnionMember {
    #[inline]
    pub fn new(member: usize, value: impl Into<Value>) -> Self {
        Self {
            member,
            value: Box::new(value.into()),
        }
    }
}

// -----------------------------------------------------------------------------
// Display

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("none"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Str(v) => write!(f, "{v:?}"),
            Value::Bytes(v) => write!(f, "{}", Scalar::Bytes(v.clone())),
            Value::DateTime(v) => f.write_str(&v.to_rfc3339()),
            Value::Date(v) => write!(f, "{v}"),
            Value::Time(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::Seq(items) | Value::Tuple(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Record(record) => {
                f.write_str("{")?;
                for (i, (k, v)) in record.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Enum(member) => match &member.payload {
                Some(payload) => write!(f, "{}({payload})", member.variant),
                None => f.write_str(&member.variant),
            },
            Value::Union(member) => write!(f, "{}", member.value),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Str,
    &str => Str,
    Vec<u8> => Bytes,
    DateTime<FixedOffset> => DateTime,
    NaiveDate => Date,
    NaiveTime => Time,
    Decimal => Decimal,
    Uuid => Uuid,
    Vec<Value> => Seq,
    Record => Record,
    EnumMember => Enum,
    UnionMember => Union,
}

impl From<DateTime<Utc>> for Value {
    #[inline]
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v.fixed_offset())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::None, Into::into)
    }
}
