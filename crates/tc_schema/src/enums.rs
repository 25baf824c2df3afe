use bitflags::bitflags;
use tc_utils::hash::HashSet;
use tc_wire::Scalar;

use crate::resolve::{DeclKind, TypeAttrs, resolve_type, resolve_variant};
use crate::{Attributes, Schema, SchemaError, SchemaKind, SchemaRef};

// -----------------------------------------------------------------------------
// VariantFlags

bitflags! {
    /// Per-variant behavior switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VariantFlags: u8 {
        /// Encoding this variant is an error.
        const SKIP_SERIALIZING   = 1 << 0;
        /// Decoding into this variant is an error.
        const SKIP_DESERIALIZING = 1 << 1;
        /// Wire values matching no variant resolve to this one.
        const OTHER              = 1 << 2;
    }
}

// -----------------------------------------------------------------------------
// VariantSpec

/// A variant of an enum schema.
#[derive(Debug, Clone)]
pub struct VariantSpec {
    name: String,
    ser_name: String,
    de_name: String,
    discriminant: Scalar,
    payload: Option<SchemaRef>,
    flags: VariantFlags,
}

impl VariantSpec {
    /// The host variant name; enum values refer to it.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ser_name(&self) -> &str {
        &self.ser_name
    }

    #[inline]
    pub fn de_name(&self) -> &str {
        &self.de_name
    }

    /// The underlying value of the variant.
    #[inline]
    pub fn discriminant(&self) -> &Scalar {
        &self.discriminant
    }

    #[inline]
    pub fn payload(&self) -> Option<&SchemaRef> {
        self.payload.as_ref()
    }

    #[inline]
    pub fn flags(&self) -> VariantFlags {
        self.flags
    }

    #[inline]
    pub fn skips_serializing(&self) -> bool {
        self.flags.contains(VariantFlags::SKIP_SERIALIZING)
    }

    #[inline]
    pub fn skips_deserializing(&self) -> bool {
        self.flags.contains(VariantFlags::SKIP_DESERIALIZING)
    }

    #[inline]
    pub fn is_other(&self) -> bool {
        self.flags.contains(VariantFlags::OTHER)
    }
}

// -----------------------------------------------------------------------------
// EnumSchema

/// The payload of [`SchemaKind::EnumValue`] and [`SchemaKind::EnumTagged`].
#[derive(Debug, Clone)]
pub struct EnumSchema {
    variants: Vec<VariantSpec>,
    attrs: TypeAttrs,
    other: Option<usize>,
}

impl EnumSchema {
    #[inline]
    pub fn variants(&self) -> &[VariantSpec] {
        &self.variants
    }

    /// Looks up a variant by host name.
    pub fn variant(&self, name: &str) -> Option<&VariantSpec> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// The first variant, in declaration order, whose deserialized wire name
    /// is `wire_name`. Skipped variants are returned too.
    pub fn by_de_name(&self, wire_name: &str) -> Option<&VariantSpec> {
        self.variants.iter().find(|v| v.de_name == wire_name)
    }

    /// The first variant, in declaration order, with the given discriminant.
    pub fn by_discriminant(&self, value: &Scalar) -> Option<&VariantSpec> {
        self.variants.iter().find(|v| v.discriminant == *value)
    }

    /// The catch-all variant, if one is declared.
    #[inline]
    pub fn other(&self) -> Option<&VariantSpec> {
        self.other.map(|i| &self.variants[i])
    }

    #[inline]
    pub fn rename(&self) -> Option<&str> {
        self.attrs.rename.as_deref()
    }
}

// -----------------------------------------------------------------------------
// EnumBuilder

struct VariantDecl {
    name: String,
    discriminant: Scalar,
    payload: Option<SchemaRef>,
    attrs: Attributes,
}

/// Builds the schema of an enum type from its declared variants.
///
/// The result is a [`SchemaKind::EnumValue`] when the `as_value` attribute is
/// set, a [`SchemaKind::EnumTagged`] otherwise.
///
/// # Examples
///
/// ```
/// use tc_schema::{EnumBuilder, SchemaKind, attrs};
///
/// let schema = EnumBuilder::new("Color")
///     .attrs(attrs! { "rename_all" => "lowercase" })
///     .variant("Red", 1)
///     .variant_with("Green", 2, attrs! { "skip_serializing" => true })
///     .build()
///     .unwrap();
///
/// let SchemaKind::EnumTagged(e) = schema.kind() else { unreachable!() };
/// assert_eq!(e.by_de_name("green").unwrap().name(), "Green");
/// ```
pub struct EnumBuilder {
    name: String,
    attrs: Attributes,
    variants: Vec<VariantDecl>,
}

impl EnumBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            variants: Vec::new(),
        }
    }

    /// Sets the type-level attributes.
    pub fn attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    /// Declares a unit variant.
    pub fn variant(self, name: impl Into<String>, discriminant: impl Into<Scalar>) -> Self {
        self.variant_with(name, discriminant, Attributes::new())
    }

    /// Declares a unit variant with attributes.
    pub fn variant_with(
        mut self,
        name: impl Into<String>,
        discriminant: impl Into<Scalar>,
        attrs: Attributes,
    ) -> Self {
        self.variants.push(VariantDecl {
            name: name.into(),
            discriminant: discriminant.into(),
            payload: None,
            attrs,
        });
        self
    }

    /// Declares a variant carrying a payload of the given schema.
    pub fn payload_variant(
        mut self,
        name: impl Into<String>,
        discriminant: impl Into<Scalar>,
        payload: SchemaRef,
        attrs: Attributes,
    ) -> Self {
        self.variants.push(VariantDecl {
            name: name.into(),
            discriminant: discriminant.into(),
            payload: Some(payload),
            attrs,
        });
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let ty = self.name;
        let attrs = resolve_type(&ty, DeclKind::Enum, &self.attrs)?;

        let mut names: HashSet<_> = HashSet::default();
        let mut ser_names = HashSet::default();
        let mut de_names = HashSet::default();
        let mut variants: Vec<VariantSpec> = Vec::with_capacity(self.variants.len());
        let mut other = None;

        for decl in self.variants {
            let variant_attrs = resolve_variant(&decl.attrs)?;

            if variants.iter().any(|v| v.discriminant == decl.discriminant) {
                return Err(SchemaError::DuplicateDiscriminant {
                    ty,
                    value: decl.discriminant.to_string(),
                });
            }
            if decl.payload.is_some() && attrs.as_value {
                return Err(SchemaError::ConflictingAttributes {
                    ty,
                    first: "as_value",
                    second: "payload",
                });
            }
            if variant_attrs.other {
                let second = if other.is_some() {
                    Some("other")
                } else if variant_attrs.skip_deserializing {
                    Some("skip_deserializing")
                } else if decl.payload.is_some() {
                    Some("payload")
                } else {
                    None
                };
                if let Some(second) = second {
                    return Err(SchemaError::ConflictingAttributes {
                        ty,
                        first: "other",
                        second,
                    });
                }
                other = Some(variants.len());
            }

            let rename = variant_attrs.rename.as_deref();
            let ser_name = attrs.ser_name(&decl.name, rename);
            let de_name = attrs.de_name(&decl.name, rename);
            for (set, name) in [
                (&mut names, &decl.name),
                (&mut ser_names, &ser_name),
                (&mut de_names, &de_name),
            ] {
                if !set.insert(name.clone()) {
                    return Err(SchemaError::DuplicateName {
                        ty,
                        name: name.clone(),
                    });
                }
            }

            let mut flags = VariantFlags::empty();
            flags.set(VariantFlags::SKIP_SERIALIZING, variant_attrs.skip_serializing);
            flags.set(VariantFlags::SKIP_DESERIALIZING, variant_attrs.skip_deserializing);
            flags.set(VariantFlags::OTHER, variant_attrs.other);

            variants.push(VariantSpec {
                name: decl.name,
                ser_name,
                de_name,
                discriminant: decl.discriminant,
                payload: decl.payload,
                flags,
            });
        }

        let as_value = attrs.as_value;
        let schema = EnumSchema {
            variants,
            attrs,
            other,
        };
        let kind = if as_value {
            SchemaKind::EnumValue(schema)
        } else {
            SchemaKind::EnumTagged(schema)
        };
        Ok(Schema::new(ty, kind))
    }
}
