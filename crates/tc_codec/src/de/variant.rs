use tc_schema::{EnumMember, EnumSchema, Value, VariantSpec};
use tc_wire::{Scalar, WireKind, WireSource};

use super::Decoder;
use crate::{DecodeError, Segment};

impl<S: WireSource> Decoder<S> {
    /// An enum written as its member's value.
    pub(super) fn enum_value(&mut self, schema: &EnumSchema) -> Result<Value, DecodeError> {
        self.expect(WireKind::Scalar, "enum value")?;
        let scalar = self.scalar()?;
        let variant = self.resolve(schema, schema.by_discriminant(&scalar), &scalar)?;
        Ok(Value::Enum(EnumMember::unit(variant.name())))
    }

    /// An enum written as a variant tag, or as a single-entry map from the
    /// tag to the payload.
    pub(super) fn enum_tagged(&mut self, schema: &EnumSchema) -> Result<Value, DecodeError> {
        match self.peek()? {
            WireKind::Scalar => {
                let tag = self.scalar()?;
                let Scalar::Str(name) = &tag else {
                    return Err(self.mismatch("variant name", tag.kind_name(), Some(tag.to_string())));
                };
                let variant = self.resolve(schema, schema.by_de_name(name), &tag)?;
                if variant.payload().is_some() {
                    return Err(self.mismatch(
                        format!("payload of variant `{}`", variant.de_name()),
                        "str",
                        Some(tag.to_string()),
                    ));
                }
                Ok(Value::Enum(EnumMember::unit(variant.name())))
            }
            WireKind::Map => {
                self.enter_map()?;
                let Some(tag) = self.next_key()? else {
                    return Err(self.mismatch("single-entry map", "empty map", None));
                };
                let found = tag.as_str().and_then(|name| schema.by_de_name(name));
                let matched = found.is_some();
                let variant = self.resolve(schema, found, &tag)?;

                let value = match variant.payload() {
                    Some(payload) => {
                        self.path.push(Segment::Variant(variant.de_name().to_owned()));
                        let payload = self.decode(payload)?;
                        self.path.pop();
                        Value::Enum(EnumMember::with_payload(variant.name(), payload))
                    }
                    // The catch-all variant drops whatever payload came with the
                    // unknown tag.
                    None if !matched => {
                        self.skip()?;
                        Value::Enum(EnumMember::unit(variant.name()))
                    }
                    None => {
                        return Err(self.mismatch(
                            format!("unit variant `{}`", variant.de_name()),
                            "map",
                            None,
                        ));
                    }
                };

                if self.next_key()?.is_some() {
                    return Err(self.mismatch("single-entry map", "map", None));
                }
                self.exit_map()?;
                Ok(value)
            }
            _ => Err(self.mismatch_here("variant")),
        }
    }

    fn resolve<'e>(
        &self,
        schema: &'e EnumSchema,
        found: Option<&'e VariantSpec>,
        raw: &Scalar,
    ) -> Result<&'e VariantSpec, DecodeError> {
        match found {
            Some(variant) if variant.skips_deserializing() => Err(DecodeError::SkippedVariant {
                path: self.path(),
                variant: variant.name().to_owned(),
            }),
            Some(variant) => Ok(variant),
            None => schema.other().ok_or_else(|| DecodeError::UnknownVariant {
                path: self.path(),
                value: raw.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use tc_schema::{EnumBuilder, EnumMember, RecordBuilder, Schema, Value, attrs};
    use tc_wire::{Capabilities, Document, DocumentReader};

    use crate::{DecodeError, Path, Segment, decode};

    fn json(schema: &Schema, doc: &Document) -> Result<Value, DecodeError> {
        decode(schema, DocumentReader::new(doc, Capabilities::JSON))
    }

    fn color() -> Schema {
        EnumBuilder::new("Color")
            .attrs(attrs! { "rename_all" => "lowercase" })
            .variant("Red", 1)
            .variant_with("Green", 2, attrs! { "skip_deserializing" => true })
            .variant_with("Blue", 3, attrs! { "skip_serializing" => true })
            .build()
            .unwrap()
    }

    #[test]
    fn tagged_by_name() {
        assert_eq!(
            json(&color(), &Document::Str("red".into())),
            Ok(Value::Enum(EnumMember::unit("Red")))
        );
        assert_eq!(
            json(&color(), &Document::Str("blue".into())),
            Ok(Value::Enum(EnumMember::unit("Blue")))
        );
    }

    #[test]
    fn skipped_and_unknown() {
        assert_eq!(
            json(&color(), &Document::Str("green".into())),
            Err(DecodeError::SkippedVariant {
                path: Path::root(),
                variant: "Green".into(),
            })
        );
        assert_eq!(
            json(&color(), &Document::Str("purple".into())),
            Err(DecodeError::UnknownVariant {
                path: Path::root(),
                value: r#""purple""#.into(),
            })
        );
    }

    #[test]
    fn as_value() {
        let schema = EnumBuilder::new("Level")
            .attrs(attrs! { "as_value" => true })
            .variant("Low", 1)
            .variant("High", 2)
            .variant_with("Unknown", 0, attrs! { "other" => true })
            .build()
            .unwrap();
        assert_eq!(
            json(&schema, &Document::Int(2)),
            Ok(Value::Enum(EnumMember::unit("High")))
        );
        assert_eq!(
            json(&schema, &Document::Int(9)),
            Ok(Value::Enum(EnumMember::unit("Unknown")))
        );
    }

    #[test]
    fn payload_variant() {
        let circle = RecordBuilder::new("Circle")
            .field("r", Schema::float().into_ref())
            .build()
            .unwrap();
        let schema = EnumBuilder::new("Shape")
            .variant("Empty", 0)
            .payload_variant("Circle", 1, circle.into_ref(), attrs! {})
            .build()
            .unwrap();

        let doc = Document::Map(vec![(
            Document::Str("Circle".into()),
            Document::Map(vec![(Document::Str("r".into()), Document::Int(2))]),
        )]);
        assert_eq!(
            json(&schema, &doc),
            Ok(Value::Enum(EnumMember::with_payload(
                "Circle",
                tc_schema::Record::new().with("r", 2.0)
            )))
        );

        let bad = Document::Map(vec![(
            Document::Str("Circle".into()),
            Document::Map(vec![(Document::Str("r".into()), Document::Str("big".into()))]),
        )]);
        let err = json(&schema, &bad).unwrap_err();
        assert_eq!(
            err.path().segments(),
            [Segment::Variant("Circle".into()), Segment::Field("r".into())]
        );
    }
}
