use core::fmt;
use core::ops::Deref;
use std::sync::{Arc, OnceLock};

use crate::{EnumSchema, RecordSchema, Value};

// -----------------------------------------------------------------------------
// Primitive

/// The scalar kinds a [`SchemaKind::Primitive`] can expect.
///
/// The last five are textual: they travel as strings in every format, see
/// [`Primitive::is_textual`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    /// An RFC 3339 timestamp with offset.
    DateTime,
    /// An ISO 8601 calendar date.
    Date,
    /// An ISO 8601 time of day.
    Time,
    Decimal,
    Uuid,
}

impl Primitive {
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Str => "str",
            Primitive::Bytes => "bytes",
            Primitive::DateTime => "datetime",
            Primitive::Date => "date",
            Primitive::Time => "time",
            Primitive::Decimal => "decimal",
            Primitive::Uuid => "uuid",
        }
    }
}

// -----------------------------------------------------------------------------
// SchemaKind

/// The shape of a type, decided once when the schema is built.
#[derive(Debug, Clone)]
pub enum SchemaKind {
    Primitive(Primitive),
    /// A homogeneous sequence.
    Sequence(SchemaRef),
    Mapping {
        key: SchemaRef,
        value: SchemaRef,
    },
    /// A fixed-arity sequence. When `open`, trailing elements beyond the
    /// declared ones are accepted as untyped values.
    Tuple {
        elements: Vec<SchemaRef>,
        open: bool,
    },
    Optional(SchemaRef),
    /// Members are tried in declaration order; the first success wins.
    Union(Vec<SchemaRef>),
    Record(RecordSchema),
    /// An enum represented by the bare discriminant of its variants.
    EnumValue(EnumSchema),
    /// An enum represented by the wire name of its variants.
    EnumTagged(EnumSchema),
    /// Any self-describing value.
    Any,
}

impl SchemaKind {
    /// A short name of the kind, used in diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            SchemaKind::Primitive(p) => p.name(),
            SchemaKind::Sequence(_) => "sequence",
            SchemaKind::Mapping { .. } => "mapping",
            SchemaKind::Tuple { .. } => "tuple",
            SchemaKind::Optional(_) => "optional",
            SchemaKind::Union(_) => "union",
            SchemaKind::Record(_) => "record",
            SchemaKind::EnumValue(_) | SchemaKind::EnumTagged(_) => "enum",
            SchemaKind::Any => "any",
        }
    }
}

// -----------------------------------------------------------------------------
// Schema

/// An immutable description of a type's shape.
///
/// Schemas are built once per host type (see
/// [`SchemaRegistry`](crate::SchemaRegistry)) and shared through
/// [`SchemaRef`].
///
/// # Examples
///
/// ```
/// use tc_schema::{Schema, SchemaKind};
///
/// let list = Schema::sequence("Vec<i64>", Schema::int().into_ref());
/// let SchemaKind::Sequence(item) = list.kind() else { unreachable!() };
/// assert_eq!(item.name(), "int");
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    kind: SchemaKind,
}

impl Schema {
    #[inline]
    pub fn new(name: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    #[inline]
    pub fn primitive(name: impl Into<String>, primitive: Primitive) -> Self {
        Self::new(name, SchemaKind::Primitive(primitive))
    }

    #[inline]
    pub fn bool() -> Self {
        Self::primitive("bool", Primitive::Bool)
    }

    #[inline]
    pub fn int() -> Self {
        Self::primitive("int", Primitive::Int)
    }

    #[inline]
    pub fn float() -> Self {
        Self::primitive("float", Primitive::Float)
    }

    #[inline]
    pub fn str() -> Self {
        Self::primitive("str", Primitive::Str)
    }

    #[inline]
    pub fn bytes() -> Self {
        Self::primitive("bytes", Primitive::Bytes)
    }

    #[inline]
    pub fn datetime() -> Self {
        Self::primitive("datetime", Primitive::DateTime)
    }

    #[inline]
    pub fn date() -> Self {
        Self::primitive("date", Primitive::Date)
    }

    #[inline]
    pub fn time() -> Self {
        Self::primitive("time", Primitive::Time)
    }

    #[inline]
    pub fn decimal() -> Self {
        Self::primitive("decimal", Primitive::Decimal)
    }

    #[inline]
    pub fn uuid() -> Self {
        Self::primitive("uuid", Primitive::Uuid)
    }

    #[inline]
    pub fn any() -> Self {
        Self::new("any", SchemaKind::Any)
    }

    #[inline]
    pub fn sequence(name: impl Into<String>, item: SchemaRef) -> Self {
        Self::new(name, SchemaKind::Sequence(item))
    }

    #[inline]
    pub fn mapping(name: impl Into<String>, key: SchemaRef, value: SchemaRef) -> Self {
        Self::new(name, SchemaKind::Mapping { key, value })
    }

    #[inline]
    pub fn tuple(name: impl Into<String>, elements: Vec<SchemaRef>) -> Self {
        Self::new(
            name,
            SchemaKind::Tuple {
                elements,
                open: false,
            },
        )
    }

    /// A tuple accepting any number of untyped trailing elements.
    #[inline]
    pub fn open_tuple(name: impl Into<String>, elements: Vec<SchemaRef>) -> Self {
        Self::new(
            name,
            SchemaKind::Tuple {
                elements,
                open: true,
            },
        )
    }

    #[inline]
    pub fn optional(name: impl Into<String>, inner: SchemaRef) -> Self {
        Self::new(name, SchemaKind::Optional(inner))
    }

    #[inline]
    pub fn union(name: impl Into<String>, members: Vec<SchemaRef>) -> Self {
        Self::new(name, SchemaKind::Union(members))
    }

    /// The host type name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name the type itself goes by on the wire: the type-level `rename`
    /// of a record or enum, the host name otherwise.
    pub fn wire_name(&self) -> &str {
        let rename = match &self.kind {
            SchemaKind::Record(record) => record.rename(),
            SchemaKind::EnumValue(e) | SchemaKind::EnumTagged(e) => e.rename(),
            _ => None,
        };
        rename.unwrap_or(&self.name)
    }

    #[inline]
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        matches!(self.kind, SchemaKind::Optional(_))
    }

    /// Wraps the schema into a shared [`SchemaRef`].
    #[inline]
    pub fn into_ref(self) -> SchemaRef {
        SchemaRef::new(self)
    }

    /// Whether `value` has the shape this schema describes.
    ///
    /// Record values may leave fields out, since defaults fill them. Children
    /// still under construction accept anything.
    pub fn accepts(&self, value: &Value) -> bool {
        fn child(schema: &SchemaRef, value: &Value) -> bool {
            !schema.is_ready() || schema.accepts(value)
        }

        match (&self.kind, value) {
            (SchemaKind::Primitive(p), value) => match (p, value) {
                (Primitive::Bool, Value::Bool(_))
                | (Primitive::Int | Primitive::Float, Value::Int(_))
                | (Primitive::Float, Value::Float(_))
                | (Primitive::Str, Value::Str(_))
                | (Primitive::Bytes, Value::Bytes(_)) => true,
                (p, value) => value.textual() == Some(*p),
            },
            (SchemaKind::Sequence(item), Value::Seq(items)) => items.iter().all(|v| child(item, v)),
            (SchemaKind::Mapping { key, value: item }, Value::Map(entries)) => entries
                .iter()
                .all(|(k, v)| child(key, k) && child(item, v)),
            (SchemaKind::Tuple { elements, open }, Value::Tuple(items)) => {
                items.len() >= elements.len()
                    && (*open || items.len() == elements.len())
                    && elements.iter().zip(items).all(|(e, v)| child(e, v))
            }
            (SchemaKind::Optional(_), Value::None) => true,
            (SchemaKind::Optional(inner), value) => child(inner, value),
            (SchemaKind::Union(members), Value::Union(m)) => members
                .get(m.member)
                .is_some_and(|member| child(member, &m.value)),
            (SchemaKind::Record(record), Value::Record(fields)) => {
                fields.iter().all(|(name, v)| {
                    record.field(name).is_some_and(|field| child(field.schema(), v))
                })
            }
            (SchemaKind::EnumValue(e) | SchemaKind::EnumTagged(e), Value::Enum(m)) => {
                e.variant(&m.variant).is_some_and(|variant| {
                    match (variant.payload(), &m.payload) {
                        (None, None) => true,
                        (Some(schema), Some(payload)) => child(schema, payload),
                        _ => false,
                    }
                })
            }
            (SchemaKind::Any, _) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind.name(), self.wire_name())
    }
}

// -----------------------------------------------------------------------------
// SchemaRef

struct SchemaNode {
    type_name: String,
    slot: OnceLock<Schema>,
}

/// A shared handle to a [`Schema`].
///
/// While a recursive type is being built, its handle exists as a forward
/// reference that children may already hold; it is filled exactly once when
/// construction finishes. Handles published by a
/// [`SchemaRegistry`](crate::SchemaRegistry) are always filled.
#[derive(Clone)]
pub struct SchemaRef(Arc<SchemaNode>);

impl SchemaRef {
    /// A filled handle.
    pub fn new(schema: Schema) -> Self {
        let type_name = schema.name.clone();
        Self(Arc::new(SchemaNode {
            type_name,
            slot: OnceLock::from(schema),
        }))
    }

    /// An empty forward reference for the type `type_name`.
    pub(crate) fn placeholder(type_name: &str) -> Self {
        Self(Arc::new(SchemaNode {
            type_name: type_name.to_owned(),
            slot: OnceLock::new(),
        }))
    }

    /// Fills a forward reference. Returns `false` if it was already filled.
    pub(crate) fn fill(&self, schema: Schema) -> bool {
        self.0.slot.set(schema).is_ok()
    }

    /// Whether construction of the referenced schema has finished.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.0.slot.get().is_some()
    }

    /// Whether both handles point to the same schema node.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// The referenced schema.
    ///
    /// # Panics
    ///
    /// Panics if the schema is still under construction. Builders only keep
    /// unfilled handles as children, they never walk into them.
    pub fn get(&self) -> &Schema {
        match self.0.slot.get() {
            Some(schema) => schema,
            None => panic!(
                "schema of `{}` used before its construction finished",
                self.0.type_name
            ),
        }
    }
}

impl Deref for SchemaRef {
    type Target = Schema;

    #[inline]
    fn deref(&self) -> &Schema {
        self.get()
    }
}

impl fmt::Debug for SchemaRef {
    // Only the name: recursive schemas would print forever.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaRef({})", self.0.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{Schema, SchemaRef};
    use crate::{Record, RecordBuilder, UnionMember, Value};

    #[test]
    fn placeholder_fills_once() {
        let node = SchemaRef::placeholder("Tree");
        assert!(!node.is_ready());
        let alias = node.clone();

        assert!(node.fill(Schema::int()));
        assert!(!node.fill(Schema::str()));
        assert!(alias.is_ready());
        assert_eq!(alias.name(), "int");
        assert!(SchemaRef::ptr_eq(&node, &alias));
    }

    #[test]
    #[should_panic(expected = "schema of `Tree` used before its construction finished")]
    fn unfilled_access_panics() {
        let node = SchemaRef::placeholder("Tree");
        let _ = node.kind();
    }

    #[test]
    fn display_names_kind() {
        let schema = Schema::optional("Option<i64>", Schema::int().into_ref());
        assert_eq!(schema.to_string(), "optional `Option<i64>`");
        assert_eq!(format!("{:?}", schema.into_ref()), "SchemaRef(Option<i64>)");
    }

    #[test]
    fn accepts_checks_shape() {
        let list = Schema::sequence("Vec<float>", Schema::float().into_ref());
        assert!(list.accepts(&Value::Seq(vec![1.into(), 2.5.into()])));
        assert!(!list.accepts(&Value::Seq(vec!["x".into()])));

        let union = Schema::union("U", vec![Schema::int().into_ref(), Schema::str().into_ref()]);
        assert!(union.accepts(&Value::Union(UnionMember::new(1, "x"))));
        assert!(!union.accepts(&Value::Union(UnionMember::new(0, "x"))));
        assert!(!union.accepts(&Value::Union(UnionMember::new(2, 1))));

        let record = RecordBuilder::new("R")
            .field("a", Schema::int().into_ref())
            .build()
            .unwrap();
        assert!(record.accepts(&Value::Record(Record::new())));
        assert!(!record.accepts(&Value::Record(Record::new().with("b", 1))));

        let late = SchemaRef::placeholder("Tree");
        let tree = Schema::optional("Option<Tree>", late);
        assert!(tree.accepts(&Value::Str("anything".into())));
    }
}
