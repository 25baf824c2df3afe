use core::fmt;

use bitflags::bitflags;
use tc_utils::hash::{HashMap, HashSet};

use crate::resolve::{DeclKind, TypeAttrs, resolve_field, resolve_type};
use crate::{Attributes, Factory, Schema, SchemaError, SchemaKind, SchemaRef, Value, zero_value};

// -----------------------------------------------------------------------------
// FieldFlags

bitflags! {
    /// Per-field behavior switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// Never written on encode.
        const SKIP_SERIALIZING   = 1 << 0;
        /// Never read on decode; the default policy supplies the value.
        const SKIP_DESERIALIZING = 1 << 1;
        /// Merged into the parent map instead of nested.
        const FLATTEN            = 1 << 2;
        const SKIP = Self::SKIP_SERIALIZING.bits() | Self::SKIP_DESERIALIZING.bits();
    }
}

// -----------------------------------------------------------------------------
// DefaultPolicy

/// How a field obtains its value when the wire map does not provide one.
#[derive(Clone)]
pub enum DefaultPolicy {
    /// The zero value of the field's schema.
    Zero,
    /// A fixed value.
    Explicit(Value),
    /// A fresh value from a factory on each use.
    Factory(Factory),
}

impl DefaultPolicy {
    /// Produces the default for a field of the given schema.
    pub fn produce(&self, schema: &Schema) -> Result<Value, SchemaError> {
        match self {
            DefaultPolicy::Zero => zero_value(schema),
            DefaultPolicy::Explicit(value) => Ok(value.clone()),
            DefaultPolicy::Factory(factory) => Ok(factory()),
        }
    }
}

impl fmt::Debug for DefaultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultPolicy::Zero => f.write_str("Zero"),
            DefaultPolicy::Explicit(value) => f.debug_tuple("Explicit").field(value).finish(),
            DefaultPolicy::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldSpec

/// A field of a record schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    ser_name: String,
    de_name: String,
    schema: SchemaRef,
    flags: FieldFlags,
    default: Option<DefaultPolicy>,
}

impl FieldSpec {
    /// The host field name; record values are keyed by it.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wire name written on encode.
    #[inline]
    pub fn ser_name(&self) -> &str {
        &self.ser_name
    }

    /// The wire name matched on decode.
    #[inline]
    pub fn de_name(&self) -> &str {
        &self.de_name
    }

    #[inline]
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    #[inline]
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    #[inline]
    pub fn default(&self) -> Option<&DefaultPolicy> {
        self.default.as_ref()
    }

    #[inline]
    pub fn is_flatten(&self) -> bool {
        self.flags.contains(FieldFlags::FLATTEN)
    }

    #[inline]
    pub fn skips_serializing(&self) -> bool {
        self.flags.contains(FieldFlags::SKIP_SERIALIZING)
    }

    #[inline]
    pub fn skips_deserializing(&self) -> bool {
        self.flags.contains(FieldFlags::SKIP_DESERIALIZING)
    }
}

// -----------------------------------------------------------------------------
// DecodePlan

/// A field reachable from the wire map of a record, possibly through
/// flattened records.
#[derive(Debug, Clone)]
pub struct PlanLeaf {
    pub field: FieldSpec,
    /// The type-level `default` of the record that declares the field.
    pub owner_default: bool,
}

/// The mapping that collects wire keys no field claims.
#[derive(Debug, Clone)]
pub struct CatchAll {
    pub key: SchemaRef,
    pub value: SchemaRef,
}

/// The lookup table used to decode a record's wire map.
///
/// Leaves are listed depth-first in declaration order, flattened records
/// expanded in place. The decoder relies on that order to reassemble nested
/// record values.
#[derive(Debug, Clone, Default)]
pub struct DecodePlan {
    leaves: Vec<PlanLeaf>,
    by_name: HashMap<String, usize>,
    catch_all: Option<CatchAll>,
}

impl DecodePlan {
    #[inline]
    pub fn leaves(&self) -> &[PlanLeaf] {
        &self.leaves
    }

    /// Index of the leaf matching a deserialized wire name.
    #[inline]
    pub fn lookup(&self, wire_name: &str) -> Option<usize> {
        self.by_name.get(wire_name).copied()
    }

    #[inline]
    pub fn catch_all(&self) -> Option<&CatchAll> {
        self.catch_all.as_ref()
    }

    fn collect(
        &mut self,
        ty: &str,
        fields: &[FieldSpec],
        owner_default: bool,
    ) -> Result<(), SchemaError> {
        for field in fields {
            if field.is_flatten() {
                match field.schema.kind() {
                    SchemaKind::Record(inner) => {
                        self.collect(ty, &inner.fields, inner.attrs.default)?
                    }
                    SchemaKind::Mapping { key, value } => {
                        if self.catch_all.is_some() {
                            return Err(SchemaError::InvalidFlatten {
                                ty: ty.to_owned(),
                                field: field.name.clone(),
                                reason: "only one flattened mapping is allowed",
                            });
                        }
                        self.catch_all = Some(CatchAll {
                            key: key.clone(),
                            value: value.clone(),
                        });
                    }
                    _ => return Err(not_flattenable(ty, field)),
                }
                continue;
            }

            let index = self.leaves.len();
            if self.by_name.insert(field.de_name.clone(), index).is_some() {
                return Err(SchemaError::DuplicateName {
                    ty: ty.to_owned(),
                    name: field.de_name.clone(),
                });
            }
            self.leaves.push(PlanLeaf {
                field: field.clone(),
                owner_default,
            });
        }
        Ok(())
    }
}

fn not_flattenable(ty: &str, field: &FieldSpec) -> SchemaError {
    SchemaError::InvalidFlatten {
        ty: ty.to_owned(),
        field: field.name.clone(),
        reason: "only records and mappings can be flattened",
    }
}

// Serialized names must be unique across flattened records as well.
fn check_ser_names<'a>(
    ty: &str,
    fields: &'a [FieldSpec],
    seen: &mut HashSet<&'a str>,
) -> Result<(), SchemaError> {
    for field in fields {
        if field.is_flatten() {
            if let SchemaKind::Record(inner) = field.schema.kind() {
                check_ser_names(ty, &inner.fields, seen)?;
            }
        } else if !seen.insert(field.ser_name.as_str()) {
            return Err(SchemaError::DuplicateName {
                ty: ty.to_owned(),
                name: field.ser_name.clone(),
            });
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// RecordSchema

/// The [`SchemaKind::Record`] payload: named fields in declaration order.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    fields: Vec<FieldSpec>,
    attrs: TypeAttrs,
    plan: DecodePlan,
}

impl RecordSchema {
    #[inline]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field by host name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[inline]
    pub fn rename(&self) -> Option<&str> {
        self.attrs.rename.as_deref()
    }

    #[inline]
    pub fn deny_unknown_fields(&self) -> bool {
        self.attrs.deny_unknown_fields
    }

    /// Whether unset fields take the zero value of their schema.
    #[inline]
    pub fn default(&self) -> bool {
        self.attrs.default
    }

    #[inline]
    pub fn has_flatten(&self) -> bool {
        self.fields.iter().any(FieldSpec::is_flatten)
    }

    #[inline]
    pub fn plan(&self) -> &DecodePlan {
        &self.plan
    }
}

// -----------------------------------------------------------------------------
// RecordBuilder

struct FieldDecl {
    name: String,
    schema: SchemaRef,
    attrs: Attributes,
}

/// Builds the schema of a record type from its declared fields.
///
/// Attributes are resolved and the record is validated in [`build`](Self::build).
///
/// # Examples
///
/// ```
/// use tc_schema::{RecordBuilder, Schema, SchemaKind, attrs};
///
/// let schema = RecordBuilder::new("Foo")
///     .attrs(attrs! { "rename_all" => "camelCase" })
///     .field_with("pen_pineapple", Schema::str().into_ref(), attrs! { "rename" => "x" })
///     .field("apple_pen", Schema::int().into_ref())
///     .build()
///     .unwrap();
///
/// let SchemaKind::Record(record) = schema.kind() else { unreachable!() };
/// assert_eq!(record.fields()[0].ser_name(), "x");
/// assert_eq!(record.fields()[1].ser_name(), "applePen");
/// ```
pub struct RecordBuilder {
    name: String,
    attrs: Attributes,
    fields: Vec<FieldDecl>,
}

impl RecordBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            fields: Vec::new(),
        }
    }

    /// Sets the type-level attributes.
    pub fn attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    /// Declares a field without attributes.
    pub fn field(self, name: impl Into<String>, schema: SchemaRef) -> Self {
        self.field_with(name, schema, Attributes::new())
    }

    /// Declares a field with attributes.
    pub fn field_with(
        mut self,
        name: impl Into<String>,
        schema: SchemaRef,
        attrs: Attributes,
    ) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            schema,
            attrs,
        });
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let ty = self.name;
        let attrs = resolve_type(&ty, DeclKind::Record, &self.attrs)?;

        let mut names: HashSet<_> = HashSet::default();
        let mut fields = Vec::with_capacity(self.fields.len());
        for decl in self.fields {
            if !names.insert(decl.name.clone()) {
                return Err(SchemaError::DuplicateName {
                    ty,
                    name: decl.name,
                });
            }

            let field_attrs = resolve_field(&ty, &decl.attrs)?;
            if let Some(DefaultPolicy::Explicit(value)) = &field_attrs.default {
                if decl.schema.is_ready() && !decl.schema.accepts(value) {
                    return Err(SchemaError::InvalidAttributeType {
                        name: "default_value".into(),
                        expected: decl.schema.kind().name(),
                        actual: value.kind_name(),
                        value: value.to_string(),
                    });
                }
            }
            let mut flags = FieldFlags::empty();
            flags.set(FieldFlags::SKIP_SERIALIZING, field_attrs.skip_serializing);
            flags.set(FieldFlags::SKIP_DESERIALIZING, field_attrs.skip_deserializing);
            flags.set(FieldFlags::FLATTEN, field_attrs.flatten);

            if field_attrs.flatten {
                if flags.intersects(FieldFlags::SKIP) {
                    return Err(SchemaError::ConflictingAttributes {
                        ty,
                        first: "flatten",
                        second: "skip",
                    });
                }
                if !decl.schema.is_ready() {
                    return Err(SchemaError::InvalidFlatten {
                        ty,
                        field: decl.name,
                        reason: "the flattened type contains the record itself",
                    });
                }
            }

            if field_attrs.skip_deserializing && field_attrs.default.is_none() && !attrs.default {
                return Err(SchemaError::MissingDefault {
                    ty,
                    field: decl.name,
                });
            }

            fields.push(FieldSpec {
                ser_name: attrs.ser_name(&decl.name, field_attrs.rename.as_deref()),
                de_name: attrs.de_name(&decl.name, field_attrs.rename.as_deref()),
                name: decl.name,
                schema: decl.schema,
                flags,
                default: field_attrs.default,
            });
        }

        let mut plan = DecodePlan::default();
        plan.collect(&ty, &fields, attrs.default)?;
        check_ser_names(&ty, &fields, &mut HashSet::default())?;

        if attrs.deny_unknown_fields && plan.catch_all.is_some() {
            return Err(SchemaError::ConflictingAttributes {
                ty,
                first: "deny_unknown_fields",
                second: "flatten",
            });
        }

        Ok(Schema::new(
            ty,
            SchemaKind::Record(RecordSchema {
                fields,
                attrs,
                plan,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{DefaultPolicy, RecordBuilder};
    use crate::{Schema, SchemaError, SchemaKind, SchemaRef, Value, attrs};

    fn str_ref() -> SchemaRef {
        Schema::str().into_ref()
    }

    fn map_ref() -> SchemaRef {
        Schema::mapping("map", str_ref(), Schema::any().into_ref()).into_ref()
    }

    #[test]
    fn explicit_default_must_fit_the_field() {
        let err = RecordBuilder::new("Foo")
            .field_with("n", Schema::int().into_ref(), attrs! { "default_value" => "three" })
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidAttributeType {
                name: "default_value".into(),
                expected: "int",
                actual: "str",
                value: "\"three\"".into(),
            }
        );
        assert!(
            RecordBuilder::new("Foo")
                .field_with("n", Schema::float().into_ref(), attrs! { "default_value" => 3 })
                .build()
                .is_ok()
        );
    }

    #[test]
    fn flattened_plan_is_depth_first() {
        let inner = RecordBuilder::new("Inner")
            .field("b", str_ref())
            .field("c", str_ref())
            .build()
            .unwrap()
            .into_ref();
        let outer = RecordBuilder::new("Outer")
            .field("a", str_ref())
            .field_with("inner", inner, attrs! { "flatten" => true })
            .field_with("rest", map_ref(), attrs! { "flatten" => true })
            .field("d", str_ref())
            .build()
            .unwrap();

        let SchemaKind::Record(record) = outer.kind() else {
            panic!("expected a record");
        };
        let names: Vec<_> = record
            .plan()
            .leaves()
            .iter()
            .map(|leaf| leaf.field.name())
            .collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
        assert_eq!(record.plan().lookup("c"), Some(2));
        assert!(record.plan().catch_all().is_some());
        assert!(record.has_flatten());
    }

    #[test]
    fn skip_requires_default() {
        let err = RecordBuilder::new("Foo")
            .field_with("a", str_ref(), attrs! { "skip" => true })
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingDefault {
                ty: "Foo".into(),
                field: "a".into()
            }
        );

        let schema = RecordBuilder::new("Foo")
            .field_with("a", str_ref(), attrs! { "skip" => true, "default_value" => "z" })
            .build()
            .unwrap();
        let SchemaKind::Record(record) = schema.kind() else {
            panic!("expected a record");
        };
        let field = record.field("a").unwrap();
        assert!(field.skips_serializing() && field.skips_deserializing());
        assert!(matches!(
            field.default(),
            Some(DefaultPolicy::Explicit(Value::Str(s))) if s == "z"
        ));
    }

    #[test]
    fn rejected_combinations() {
        let err = RecordBuilder::new("Foo")
            .attrs(attrs! { "deny_unknown_fields" => true })
            .field_with("rest", map_ref(), attrs! { "flatten" => true })
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::ConflictingAttributes {
                first: "deny_unknown_fields",
                ..
            }
        ));

        let err = RecordBuilder::new("Foo")
            .field_with("a", str_ref(), attrs! { "flatten" => true })
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFlatten { .. }));

        let err = RecordBuilder::new("Foo")
            .field_with("rest", map_ref(), attrs! { "flatten" => true })
            .field_with("more", map_ref(), attrs! { "flatten" => true })
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFlatten { .. }));

        let err = RecordBuilder::new("Foo")
            .field_with("a", str_ref(), attrs! { "rename" => "b" })
            .field("b", str_ref())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateName {
                ty: "Foo".into(),
                name: "b".into()
            }
        );
    }

    #[test]
    fn split_rename_rules() {
        let schema = RecordBuilder::new("Foo")
            .attrs(attrs! { "rename_all_deserialize" => "SCREAMING_SNAKE_CASE" })
            .field("pen_pineapple", str_ref())
            .build()
            .unwrap();
        let SchemaKind::Record(record) = schema.kind() else {
            panic!("expected a record");
        };
        let field = &record.fields()[0];
        assert_eq!(field.ser_name(), "pen_pineapple");
        assert_eq!(field.de_name(), "PEN_PINEAPPLE");
    }
}
