use proptest::prelude::*;
use tc_codec::{decode, encode};
use tc_schema::{Record, RecordBuilder, Schema, SchemaRef, Value, attrs};
use tc_wire::{Capabilities, Document, DocumentReader, DocumentWriter};

fn schema() -> Schema {
    let int = Schema::int().into_ref();
    let text = Schema::str().into_ref();
    RecordBuilder::new("Sample")
        .attrs(attrs! { "rename_all" => "camelCase" })
        .field("count_total", int.clone())
        .field("label", text.clone())
        .field(
            "ratio",
            Schema::optional("Option<float>", Schema::float().into_ref()).into_ref(),
        )
        .field(
            "flags",
            Schema::sequence("Vec<bool>", Schema::bool().into_ref()).into_ref(),
        )
        .field("by_id", Schema::mapping("Map<int, str>", int, text).into_ref())
        .field("blob", Schema::bytes().into_ref())
        .build()
        .unwrap()
}

fn sample() -> impl Strategy<Value = Value> {
    (
        any::<i64>(),
        ".*",
        proptest::option::of(-1.0e9..1.0e9f64),
        proptest::collection::vec(any::<bool>(), 0..8),
        proptest::collection::btree_map(any::<i64>(), "[a-z]{0,6}", 0..6),
        proptest::collection::vec(any::<u8>(), 0..16),
    )
        .prop_map(|(count, label, ratio, flags, by_id, blob)| {
            Value::Record(
                Record::new()
                    .with("count_total", count)
                    .with("label", label)
                    .with("ratio", ratio)
                    .with("flags", Value::Seq(flags.into_iter().map(Value::Bool).collect()))
                    .with(
                        "by_id",
                        Value::Map(
                            by_id
                                .into_iter()
                                .map(|(k, v)| (Value::Int(k), Value::Str(v)))
                                .collect(),
                        ),
                    )
                    .with("blob", Value::Bytes(blob)),
            )
        })
}

fn through(schema: &Schema, value: &Value, caps: Capabilities) -> Value {
    let mut writer = DocumentWriter::new(caps);
    encode(schema, value, &mut writer).unwrap();
    let doc = writer.finish().unwrap();
    decode(schema, DocumentReader::new(&doc, caps)).unwrap()
}

proptest! {
    #[test]
    fn survives_every_capability_set(value in sample()) {
        let schema = schema();
        for caps in [
            Capabilities::JSON,
            Capabilities::TOML,
            Capabilities::MESSAGEPACK,
            Capabilities::PERMISSIVE,
        ] {
            prop_assert_eq!(&through(&schema, &value, caps), &value);
        }
    }
}

#[test]
fn missing_fields_fill_the_same_way_twice() {
    let int: SchemaRef = Schema::int().into_ref();
    let schema = RecordBuilder::new("Defaults")
        .attrs(attrs! { "default" => true })
        .field("a", int)
        .field("b", Schema::sequence("Vec<str>", Schema::str().into_ref()).into_ref())
        .build()
        .unwrap();
    let empty = Document::Map(Vec::new());

    let first = decode(&schema, DocumentReader::new(&empty, Capabilities::JSON)).unwrap();
    let second = decode(&schema, DocumentReader::new(&empty, Capabilities::JSON)).unwrap();
    assert_eq!(first, second);

    let mut writer = DocumentWriter::new(Capabilities::JSON);
    encode(&schema, &first, &mut writer).unwrap();
    let doc = writer.finish().unwrap();
    assert_eq!(
        decode(&schema, DocumentReader::new(&doc, Capabilities::JSON)).unwrap(),
        first
    );
}
