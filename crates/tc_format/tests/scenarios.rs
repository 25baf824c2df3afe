use tc_codec::{DecodeError, EncodeError};
use tc_format::{Error, Json, MessagePack, Toml, Yaml, dumps, dumps_of, loads, loads_as, loads_of};
use tc_schema::{
    BuildContext, Bytes, Convention, Describe, EnumBuilder, EnumMember, Record, RecordBuilder,
    Schema, SchemaError, Union, UnionMember, Value, attrs,
};
use tc_wire::Document;

fn pair() -> Schema {
    RecordBuilder::new("Pair")
        .field_with("a", Schema::str().into_ref(), attrs! { "rename" => "x" })
        .field("b", Schema::int().into_ref())
        .build()
        .unwrap()
}

fn pair_value() -> Value {
    Value::Record(Record::new().with("a", "yes").with("b", 3))
}

#[test]
fn renamed_field_in_every_text_format() {
    let schema = pair();
    let value = pair_value();

    let json = dumps::<Json>(&schema, &value).unwrap();
    assert_eq!(json, r#"{"x":"yes","b":3}"#);
    assert_eq!(loads_as::<Json>(&schema, &json).unwrap(), value);

    let yaml = dumps::<Yaml>(&schema, &value).unwrap();
    assert_eq!(loads_as::<Yaml>(&schema, &yaml).unwrap(), value);

    let toml = dumps::<Toml>(&schema, &value).unwrap();
    assert_eq!(loads_as::<Toml>(&schema, &toml).unwrap(), value);

    let packed = dumps::<MessagePack>(&schema, &value).unwrap();
    assert_eq!(loads_as::<MessagePack>(&schema, &packed).unwrap(), value);
}

#[test]
fn deny_unknown_fields() {
    let schema = RecordBuilder::new("Strict")
        .attrs(attrs! { "deny_unknown_fields" => true })
        .field("x", Schema::str().into_ref())
        .field("y", Schema::int().into_ref())
        .build()
        .unwrap();
    let err = loads_as::<Json>(&schema, r#"{"x":"a","y":1,"z":"extra"}"#).unwrap_err();
    match err {
        Error::Decode(DecodeError::UnknownField { field, .. }) => assert_eq!(field, "z"),
        other => panic!("expected an unknown field, got {other}"),
    }
}

#[test]
fn union_first_match() {
    let registry = tc_schema::SchemaRegistry::new();
    let schema = registry.schema_of::<Union<(i64, String, Bytes)>>().unwrap();
    assert_eq!(
        loads_as::<Json>(&schema, r#""hage""#).unwrap(),
        Value::Union(UnionMember::new(1, "hage"))
    );
    assert_eq!(
        loads_as::<MessagePack>(&schema, &[0xc4, 0x01, 0x07]).unwrap(),
        Value::Union(UnionMember::new(2, Value::Bytes(vec![7])))
    );
}

#[test]
fn enum_skip_asymmetry() {
    let schema = EnumBuilder::new("Color")
        .variant("Red", 1)
        .variant_with("Hidden", 2, attrs! { "skip_serializing" => true })
        .variant_with("Legacy", 3, attrs! { "skip_deserializing" => true })
        .build()
        .unwrap();
    let hidden = Value::Enum(EnumMember::unit("Hidden"));
    let legacy = Value::Enum(EnumMember::unit("Legacy"));

    assert!(matches!(
        dumps::<Json>(&schema, &hidden),
        Err(Error::Encode(EncodeError::SkippedVariant { .. }))
    ));
    assert_eq!(loads_as::<Json>(&schema, r#""Hidden""#).unwrap(), hidden);

    assert_eq!(dumps::<Json>(&schema, &legacy).unwrap(), r#""Legacy""#);
    assert!(matches!(
        loads_as::<Json>(&schema, r#""Legacy""#),
        Err(Error::Decode(DecodeError::SkippedVariant { .. }))
    ));
}

#[test]
fn flatten_depends_on_the_format() {
    let extra = Schema::mapping("Extra", Schema::str().into_ref(), Schema::any().into_ref());
    let schema = RecordBuilder::new("Tagged")
        .field("id", Schema::int().into_ref())
        .field_with("extra", extra.into_ref(), attrs! { "flatten" => true })
        .build()
        .unwrap();
    let value = Value::Record(
        Record::new()
            .with("id", 1)
            .with("extra", Value::Map(vec![("k".into(), "v".into())])),
    );

    assert_eq!(dumps::<Json>(&schema, &value).unwrap(), r#"{"id":1,"k":"v"}"#);
    assert_eq!(
        loads_as::<Json>(&schema, r#"{"k":"v","id":1}"#).unwrap(),
        value
    );
    assert!(matches!(
        dumps::<MessagePack>(&schema, &value),
        Err(Error::Encode(EncodeError::FlattenUnsupported { .. }))
    ));
}

#[test]
fn toml_tables_and_missing_null() {
    let inner = RecordBuilder::new("Inner")
        .field("n", Schema::int().into_ref())
        .build()
        .unwrap();
    let schema = RecordBuilder::new("Outer")
        .field("inner", inner.into_ref())
        .field("name", Schema::str().into_ref())
        .field(
            "nickname",
            Schema::optional("Option<str>", Schema::str().into_ref()).into_ref(),
        )
        .build()
        .unwrap();
    let value = Value::Record(
        Record::new()
            .with("inner", Record::new().with("n", 1))
            .with("name", "x")
            .with("nickname", Value::None),
    );

    let text = dumps::<Toml>(&schema, &value).unwrap();
    let name = text.find("name").unwrap();
    let table = text.find("[inner]").unwrap();
    assert!(name < table, "{text}");
    assert!(!text.contains("nickname"), "{text}");
    assert_eq!(loads_as::<Toml>(&schema, &text).unwrap(), value);
}

#[test]
fn msgpack_keeps_native_keys() {
    let schema = Schema::mapping("Map<int, bytes>", Schema::int().into_ref(), Schema::bytes().into_ref());
    let value = Value::Map(vec![(Value::Int(4), Value::Bytes(vec![1, 2, 3]))]);
    let packed = dumps::<MessagePack>(&schema, &value).unwrap();
    assert_eq!(
        loads::<MessagePack>(&packed).unwrap(),
        Document::Map(vec![(Document::Int(4), Document::Bytes(vec![1, 2, 3]))])
    );

    let json = dumps::<Json>(&schema, &value).unwrap();
    assert_eq!(json, r#"{"4":[1,2,3]}"#);
    assert_eq!(loads_as::<Json>(&schema, &json).unwrap(), value);
}

#[test]
fn map_keys_merge_after_decoding() {
    let schema = Schema::mapping("Map<int, int>", Schema::int().into_ref(), Schema::int().into_ref());
    assert_eq!(
        loads_as::<Json>(&schema, r#"{"1": 10, "01": 20}"#).unwrap(),
        Value::Map(vec![(Value::Int(1), Value::Int(20))])
    );
}

#[test]
fn textual_primitives_are_strings_everywhere() {
    let schema = RecordBuilder::new("Invoice")
        .field("issued", Schema::datetime().into_ref())
        .field("due", Schema::time().into_ref())
        .field("total", Schema::decimal().into_ref())
        .build()
        .unwrap();
    let text = r#"{"issued":"2021-03-04T05:06:07+09:00","due":"17:30:00","total":"12.50"}"#;

    let value = loads_as::<Json>(&schema, text).unwrap();
    assert_eq!(dumps::<Json>(&schema, &value).unwrap(), text);

    let packed = dumps::<MessagePack>(&schema, &value).unwrap();
    assert_eq!(
        loads::<MessagePack>(&packed).unwrap().get("total"),
        Some(&Document::Str("12.50".into()))
    );
    let toml = dumps::<Toml>(&schema, &value).unwrap();
    assert_eq!(loads_as::<Toml>(&schema, &toml).unwrap(), value);

    let err = loads_as::<Json>(
        &schema,
        r#"{"issued":"yesterday","due":"17:30:00","total":"1"}"#,
    )
    .unwrap_err();
    match err {
        Error::Decode(DecodeError::TypeMismatch { path, expected, .. }) => {
            assert_eq!(path.to_string(), "$.issued");
            assert_eq!(expected, "datetime");
        }
        other => panic!("expected a type mismatch, got {other}"),
    }
}

#[test]
fn type_mismatch_reports_path_and_raw_value() {
    let err = loads_as::<Json>(&pair(), r#"{"x":"yes","b":"three"}"#).unwrap_err();
    match err {
        Error::Decode(DecodeError::TypeMismatch {
            path,
            expected,
            actual,
            raw,
        }) => {
            assert_eq!(path.to_string(), "$.b");
            assert_eq!(expected, "int");
            assert_eq!(actual, "str");
            assert_eq!(raw.as_deref(), Some(r#""three""#));
        }
        other => panic!("expected a type mismatch, got {other}"),
    }
}

// -----------------------------------------------------------------------------
// Host types

#[allow(dead_code)]
struct Settings {
    display_name: String,
    retries: u32,
    tags: Vec<String>,
}

impl Describe for Settings {
    fn describe(cx: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
        RecordBuilder::new("Settings")
            .attrs(attrs! { "rename_all" => Convention::Kebab })
            .field("display_name", cx.schema_of::<String>()?)
            .field_with("retries", cx.schema_of::<u32>()?, attrs! { "default_value" => 3 })
            .field_with("tags", cx.schema_of::<Vec<String>>()?, attrs! { "default" => true })
            .build()
    }
}

struct Misconfigured;

impl Describe for Misconfigured {
    fn describe(cx: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
        RecordBuilder::new("Misconfigured")
            .field_with("a", cx.schema_of::<i64>()?, attrs! { "rename" => 3 })
            .build()
    }
}

#[test]
fn host_types_through_the_registry() {
    let value = loads_of::<Yaml, Settings>("display-name: main\n").unwrap();
    assert_eq!(
        value,
        Value::Record(
            Record::new()
                .with("display_name", "main")
                .with("retries", 3)
                .with("tags", Value::Seq(Vec::new()))
        )
    );
    let text = dumps_of::<Json, Settings>(&value).unwrap();
    assert_eq!(text, r#"{"display-name":"main","retries":3,"tags":[]}"#);
}

#[test]
fn construction_errors_stay_apart() {
    let err = loads_of::<Json, Misconfigured>(r#"{"a":1}"#).unwrap_err();
    assert!(err.is_construction());
    assert!(matches!(
        err,
        Error::Schema(SchemaError::InvalidAttributeType { .. })
    ));

    let err = loads_as::<Json>(&pair(), "[]").unwrap_err();
    assert!(!err.is_construction());
}
