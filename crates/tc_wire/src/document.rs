use core::fmt;

use serde_core::de::{MapAccess, SeqAccess, Visitor};
use serde_core::ser::{SerializeMap, SerializeSeq};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Scalar;

// -----------------------------------------------------------------------------
// Document

/// An untyped tree in the shape every supported format shares.
///
/// Format adapters parse into a `Document` with their serde implementation
/// and print from one. Map entries keep the order in which they were read.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Document {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Seq(Vec<Document>),
    Map(Vec<(Document, Document)>),
}

impl Document {
    /// A short name of the node's kind, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "bool",
            Document::Int(_) | Document::UInt(_) => "int",
            Document::Float(_) => "float",
            Document::Str(_) => "str",
            Document::Bytes(_) => "bytes",
            Document::Seq(_) => "seq",
            Document::Map(_) => "map",
        }
    }

    /// Copies the node out as a [`Scalar`], if it is one.
    pub fn as_scalar(&self) -> Option<Scalar> {
        Some(match self {
            Document::Bool(v) => Scalar::Bool(*v),
            Document::Int(v) => Scalar::Int(*v),
            Document::UInt(v) => Scalar::from_u64(*v),
            Document::Float(v) => Scalar::Float(*v),
            Document::Str(v) => Scalar::Str(v.clone()),
            Document::Bytes(v) => Scalar::Bytes(v.clone()),
            Document::Null | Document::Seq(_) | Document::Map(_) => return None,
        })
    }

    /// Looks up the value of a string key in a map node.
    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Map(entries) => entries.iter().find_map(|(k, v)| match k {
                Document::Str(s) if s == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Whether the node is a table in the TOML sense: a map, or a
    /// non-empty sequence of maps.
    pub fn is_table(&self) -> bool {
        match self {
            Document::Map(_) => true,
            Document::Seq(items) => {
                !items.is_empty() && items.iter().all(|item| matches!(item, Document::Map(_)))
            }
            _ => false,
        }
    }
}

impl From<Scalar> for Document {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Bool(v) => Document::Bool(v),
            Scalar::Int(v) => Document::Int(v),
            Scalar::UInt(v) => Document::UInt(v),
            Scalar::Float(v) => Document::Float(v),
            Scalar::Str(v) => Document::Str(v),
            Scalar::Bytes(v) => Document::Bytes(v),
        }
    }
}

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Document::Null => serializer.serialize_none(),
            Document::Bool(v) => serializer.serialize_bool(*v),
            Document::Int(v) => serializer.serialize_i64(*v),
            Document::UInt(v) => serializer.serialize_u64(*v),
            Document::Float(v) => serializer.serialize_f64(*v),
            Document::Str(v) => serializer.serialize_str(v),
            Document::Bytes(v) => serializer.serialize_bytes(v),
            Document::Seq(items) => {
                let mut state = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    state.serialize_element(item)?;
                }
                state.end()
            }
            Document::Map(entries) => {
                let mut state = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Deserialize

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any self-describing value")
    }

    #[inline]
    fn visit_bool<E>(self, v: bool) -> Result<Document, E> {
        Ok(Document::Bool(v))
    }

    #[inline]
    fn visit_i64<E>(self, v: i64) -> Result<Document, E> {
        Ok(Document::Int(v))
    }

    #[inline]
    fn visit_u64<E>(self, v: u64) -> Result<Document, E> {
        Ok(match i64::try_from(v) {
            Ok(i) => Document::Int(i),
            Err(_) => Document::UInt(v),
        })
    }

    #[inline]
    fn visit_f64<E>(self, v: f64) -> Result<Document, E> {
        Ok(Document::Float(v))
    }

    #[inline]
    fn visit_str<E>(self, v: &str) -> Result<Document, E> {
        Ok(Document::Str(v.to_owned()))
    }

    #[inline]
    fn visit_string<E>(self, v: String) -> Result<Document, E> {
        Ok(Document::Str(v))
    }

    #[inline]
    fn visit_bytes<E>(self, v: &[u8]) -> Result<Document, E> {
        Ok(Document::Bytes(v.to_vec()))
    }

    #[inline]
    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Document, E> {
        Ok(Document::Bytes(v))
    }

    #[inline]
    fn visit_none<E>(self) -> Result<Document, E> {
        Ok(Document::Null)
    }

    #[inline]
    fn visit_unit<E>(self) -> Result<Document, E> {
        Ok(Document::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Document, D::Error> {
        Document::deserialize(deserializer)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Document, D::Error> {
        Document::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Document, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(item) = seq.next_element::<Document>()? {
            items.push(item);
        }
        Ok(Document::Seq(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0).min(4096));
        while let Some(entry) = map.next_entry::<Document, Document>()? {
            entries.push(entry);
        }
        Ok(Document::Map(entries))
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::Document;

    #[test]
    fn parse_keeps_entry_order() {
        let doc: Document = serde_json::from_str(r#"{"b": 1, "a": [true, null, 1.5]}"#).unwrap();
        let Document::Map(entries) = &doc else {
            panic!("expected a map, got {doc:?}");
        };
        assert_eq!(entries[0].0, Document::Str("b".into()));
        assert_eq!(entries[1].0, Document::Str("a".into()));
        assert_eq!(
            doc.get("a"),
            Some(&Document::Seq(vec![
                Document::Bool(true),
                Document::Null,
                Document::Float(1.5)
            ]))
        );
    }

    #[test]
    fn large_unsigned_stays_unsigned() {
        let doc: Document = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(doc, Document::UInt(u64::MAX));
        let doc: Document = serde_json::from_str("3").unwrap();
        assert_eq!(doc, Document::Int(3));
    }

    #[test]
    fn print_round_trip() {
        let doc = Document::Map(vec![
            (Document::Str("x".into()), Document::Str("yes".into())),
            (Document::Str("b".into()), Document::Int(3)),
        ]);
        let text = serde_json::to_string(&doc).unwrap();
        assert_eq!(text, r#"{"x":"yes","b":3}"#);
    }

    #[test]
    fn table_detection() {
        let map = Document::Map(Vec::new());
        assert!(map.is_table());
        assert!(Document::Seq(vec![map.clone()]).is_table());
        assert!(!Document::Seq(Vec::new()).is_table());
        assert!(!Document::Seq(vec![map, Document::Int(1)]).is_table());
    }
}
