//! Normalizes loosely-typed [`Attributes`] into checked metadata.
//!
//! Every recognized attribute is checked against the type it expects, and
//! unknown names are rejected, so malformed annotations surface while a
//! schema is built and never during a codec call.

use crate::{AttrValue, Attributes, Convention, DefaultPolicy, SchemaError, Value};

// -----------------------------------------------------------------------------
// Declarations

/// What kind of host declaration attributes are attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Record,
    Enum,
    /// Anything else; type-level attributes cannot be resolved for it.
    Other,
}

impl DeclKind {
    const fn target(self) -> &'static str {
        match self {
            DeclKind::Record => "record",
            DeclKind::Enum => "enum",
            DeclKind::Other => "type",
        }
    }
}

const RECORD_KEYS: &[&str] = &[
    "rename",
    "rename_all",
    "rename_all_serialize",
    "rename_all_deserialize",
    "deny_unknown_fields",
    "default",
];

const ENUM_KEYS: &[&str] = &[
    "rename",
    "rename_all",
    "rename_all_serialize",
    "rename_all_deserialize",
    "as_value",
];

const FIELD_KEYS: &[&str] = &[
    "rename",
    "skip",
    "skip_serializing",
    "skip_deserializing",
    "flatten",
    "default",
    "default_value",
    "default_factory",
];

const VARIANT_KEYS: &[&str] = &[
    "rename",
    "skip",
    "skip_serializing",
    "skip_deserializing",
    "other",
];

// -----------------------------------------------------------------------------
// Resolved metadata

/// Type-level metadata of a record or enum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeAttrs {
    pub rename: Option<String>,
    pub rename_serialize: Option<Convention>,
    pub rename_deserialize: Option<Convention>,
    pub deny_unknown_fields: bool,
    pub default: bool,
    pub as_value: bool,
}

impl TypeAttrs {
    /// The serialized wire name of a member named `name`.
    ///
    /// An explicit per-member rename wins over the type's convention.
    pub fn ser_name(&self, name: &str, rename: Option<&str>) -> String {
        Self::apply(name, rename, self.rename_serialize)
    }

    /// The deserialized wire name of a member named `name`.
    pub fn de_name(&self, name: &str, rename: Option<&str>) -> String {
        Self::apply(name, rename, self.rename_deserialize)
    }

    fn apply(name: &str, rename: Option<&str>, convention: Option<Convention>) -> String {
        match (rename, convention) {
            (Some(rename), _) => rename.to_owned(),
            (None, Some(convention)) => convention.apply(name),
            (None, None) => name.to_owned(),
        }
    }
}

/// Field-level metadata of a record field.
#[derive(Debug, Clone, Default)]
pub struct FieldAttrs {
    pub rename: Option<String>,
    pub skip_serializing: bool,
    pub skip_deserializing: bool,
    pub flatten: bool,
    pub default: Option<DefaultPolicy>,
}

/// Variant-level metadata of an enum variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantAttrs {
    pub rename: Option<String>,
    pub skip_serializing: bool,
    pub skip_deserializing: bool,
    pub other: bool,
}

// -----------------------------------------------------------------------------
// Resolution

/// Resolves the type-level attributes of the declaration `type_name`.
///
/// `rename_all` sets both directions and takes precedence over
/// `rename_all_serialize` / `rename_all_deserialize`.
///
/// # Examples
///
/// ```
/// use tc_schema::resolve::{DeclKind, resolve_type};
/// use tc_schema::{SchemaError, attrs};
///
/// let attrs = resolve_type("Foo", DeclKind::Record, &attrs! { "rename_all" => "camelCase" }).unwrap();
/// assert_eq!(attrs.ser_name("pen_pineapple", None), "penPineapple");
///
/// let err = resolve_type("Foo", DeclKind::Record, &attrs! { "rename_all" => "Camel" }).unwrap_err();
/// assert_eq!(err, SchemaError::InvalidCaseName("Camel".into()));
/// ```
pub fn resolve_type(
    type_name: &str,
    kind: DeclKind,
    attrs: &Attributes,
) -> Result<TypeAttrs, SchemaError> {
    let allowed = match kind {
        DeclKind::Record => RECORD_KEYS,
        DeclKind::Enum => ENUM_KEYS,
        DeclKind::Other => return Err(SchemaError::UnsupportedType(type_name.to_owned())),
    };
    check_known(attrs, allowed, kind.target())?;

    let rename_all = opt_case(attrs, "rename_all")?;
    Ok(TypeAttrs {
        rename: opt_str(attrs, "rename")?,
        rename_serialize: rename_all.or(opt_case(attrs, "rename_all_serialize")?),
        rename_deserialize: rename_all.or(opt_case(attrs, "rename_all_deserialize")?),
        deny_unknown_fields: flag(attrs, "deny_unknown_fields")?,
        default: flag(attrs, "default")?,
        as_value: flag(attrs, "as_value")?,
    })
}

/// Resolves the attributes of a record field.
///
/// `skip` sets both skip directions. At most one of `default`,
/// `default_value` and `default_factory` may be given.
pub fn resolve_field(type_name: &str, attrs: &Attributes) -> Result<FieldAttrs, SchemaError> {
    check_known(attrs, FIELD_KEYS, "field")?;

    let skip = flag(attrs, "skip")?;
    let mut policies = Vec::new();
    if flag(attrs, "default")? {
        policies.push(("default", DefaultPolicy::Zero));
    }
    if let Some(value) = attrs.get("default_value") {
        policies.push(("default_value", DefaultPolicy::Explicit(default_value(value)?)));
    }
    if let Some(value) = attrs.get("default_factory") {
        let AttrValue::Factory(factory) = value else {
            return Err(invalid("default_factory", "factory", value));
        };
        policies.push(("default_factory", DefaultPolicy::Factory(factory.clone())));
    }
    if let [(first, _), (second, _), ..] = policies.as_slice() {
        return Err(SchemaError::ConflictingAttributes {
            ty: type_name.to_owned(),
            first: *first,
            second: *second,
        });
    }

    Ok(FieldAttrs {
        rename: opt_str(attrs, "rename")?,
        skip_serializing: skip || flag(attrs, "skip_serializing")?,
        skip_deserializing: skip || flag(attrs, "skip_deserializing")?,
        flatten: flag(attrs, "flatten")?,
        default: policies.pop().map(|(_, policy)| policy),
    })
}

/// Resolves the attributes of an enum variant.
pub fn resolve_variant(attrs: &Attributes) -> Result<VariantAttrs, SchemaError> {
    check_known(attrs, VARIANT_KEYS, "variant")?;

    let skip = flag(attrs, "skip")?;
    Ok(VariantAttrs {
        rename: opt_str(attrs, "rename")?,
        skip_serializing: skip || flag(attrs, "skip_serializing")?,
        skip_deserializing: skip || flag(attrs, "skip_deserializing")?,
        other: flag(attrs, "other")?,
    })
}

// -----------------------------------------------------------------------------
// Helpers

fn check_known(
    attrs: &Attributes,
    allowed: &[&str],
    target: &'static str,
) -> Result<(), SchemaError> {
    match attrs.iter().find(|(name, _)| !allowed.contains(name)) {
        Some((name, _)) => Err(SchemaError::UnknownAttribute {
            name: name.to_owned(),
            target,
        }),
        None => Ok(()),
    }
}

fn invalid(name: &str, expected: &'static str, value: &AttrValue) -> SchemaError {
    SchemaError::InvalidAttributeType {
        name: name.to_owned(),
        expected,
        actual: value.type_name(),
        value: format!("{value:?}"),
    }
}

fn flag(attrs: &Attributes, name: &str) -> Result<bool, SchemaError> {
    match attrs.get(name) {
        None => Ok(false),
        Some(AttrValue::Bool(v)) => Ok(*v),
        Some(other) => Err(invalid(name, "bool", other)),
    }
}

fn opt_str(attrs: &Attributes, name: &str) -> Result<Option<String>, SchemaError> {
    match attrs.get(name) {
        None => Ok(None),
        Some(AttrValue::Str(v)) => Ok(Some(v.clone())),
        Some(other) => Err(invalid(name, "str", other)),
    }
}

fn opt_case(attrs: &Attributes, name: &str) -> Result<Option<Convention>, SchemaError> {
    opt_str(attrs, name)?.map(|s| s.parse()).transpose()
}

fn default_value(value: &AttrValue) -> Result<Value, SchemaError> {
    Ok(match value {
        AttrValue::Bool(v) => Value::Bool(*v),
        AttrValue::Str(v) => Value::Str(v.clone()),
        AttrValue::Int(v) => Value::Int(*v),
        AttrValue::Float(v) => Value::Float(*v),
        AttrValue::Value(v) => v.clone(),
        AttrValue::Factory(_) => return Err(invalid("default_value", "value", value)),
    })
}

#[cfg(test)]
mod tests {
    use super::{DeclKind, resolve_field, resolve_type, resolve_variant};
    use crate::{AttrValue, Convention, DefaultPolicy, SchemaError, Value, attrs};

    #[test]
    fn rename_all_overrides_split_rules() {
        let attrs = attrs! {
            "rename_all" => "kebab-case",
            "rename_all_serialize" => "camelCase",
        };
        let resolved = resolve_type("Foo", DeclKind::Record, &attrs).unwrap();
        assert_eq!(resolved.rename_serialize, Some(Convention::Kebab));
        assert_eq!(resolved.rename_deserialize, Some(Convention::Kebab));

        let attrs = attrs! { "rename_all_serialize" => "camelCase" };
        let resolved = resolve_type("Foo", DeclKind::Record, &attrs).unwrap();
        assert_eq!(resolved.ser_name("pen_pineapple", None), "penPineapple");
        assert_eq!(resolved.de_name("pen_pineapple", None), "pen_pineapple");
        assert_eq!(resolved.ser_name("pen_pineapple", Some("pp")), "pp");
    }

    #[test]
    fn type_level_validation() {
        assert_eq!(
            resolve_type("i32", DeclKind::Other, &attrs! {}),
            Err(SchemaError::UnsupportedType("i32".into()))
        );
        assert_eq!(
            resolve_type("Foo", DeclKind::Record, &attrs! { "as_value" => true }),
            Err(SchemaError::UnknownAttribute {
                name: "as_value".into(),
                target: "record"
            })
        );
        assert_eq!(
            resolve_type("Foo", DeclKind::Enum, &attrs! { "rename" => 3 }),
            Err(SchemaError::InvalidAttributeType {
                name: "rename".into(),
                expected: "str",
                actual: "int",
                value: "3".into(),
            })
        );
        assert_eq!(
            resolve_type(
                "Foo",
                DeclKind::Record,
                &attrs! { "deny_unknown_fields" => "yes" }
            ),
            Err(SchemaError::InvalidAttributeType {
                name: "deny_unknown_fields".into(),
                expected: "bool",
                actual: "str",
                value: "\"yes\"".into(),
            })
        );
    }

    #[test]
    fn field_defaults() {
        let field = resolve_field("Foo", &attrs! { "skip" => true, "default_value" => 5 }).unwrap();
        assert!(field.skip_serializing && field.skip_deserializing);
        assert!(matches!(field.default, Some(DefaultPolicy::Explicit(Value::Int(5)))));

        let field = resolve_field(
            "Foo",
            &attrs! { "default_factory" => AttrValue::factory(|| Value::from("x")) },
        )
        .unwrap();
        assert!(matches!(field.default, Some(DefaultPolicy::Factory(_))));

        let err = resolve_field("Foo", &attrs! { "default" => true, "default_value" => 1 });
        assert!(matches!(
            err,
            Err(SchemaError::ConflictingAttributes {
                first: "default",
                second: "default_value",
                ..
            })
        ));

        let err = resolve_field("Foo", &attrs! { "default_factory" => 1 });
        assert!(matches!(
            err,
            Err(SchemaError::InvalidAttributeType {
                expected: "factory",
                ..
            })
        ));
    }

    #[test]
    fn variant_flags() {
        let variant = resolve_variant(&attrs! { "skip_serializing" => true, "other" => true }).unwrap();
        assert!(variant.skip_serializing);
        assert!(!variant.skip_deserializing);
        assert!(variant.other);

        assert!(matches!(
            resolve_variant(&attrs! { "flatten" => true }),
            Err(SchemaError::UnknownAttribute {
                target: "variant",
                ..
            })
        ));
    }
}
