//! Schema-directed decoding of a [`WireSource`] into a [`Value`].

mod record;
mod variant;

use tc_schema::{Primitive, Schema, SchemaKind, SchemaRef, UnionMember, Value};
use tc_utils::hash::HashMap;
use tc_wire::{Capabilities, Scalar, WireError, WireKind, WireSource};

use crate::key::{decode_key, key_identity, key_text};
use crate::{DecodeError, Path, Segment};

// -----------------------------------------------------------------------------
// decode

/// Decodes one complete document from `source` against `schema`.
///
/// Fails if the source holds anything after the decoded value.
///
/// # Examples
///
/// ```
/// use tc_codec::decode;
/// use tc_schema::{Schema, UnionMember, Value};
/// use tc_wire::{Capabilities, Document, DocumentReader};
///
/// let schema = Schema::union(
///     "Union[int, str]",
///     vec![Schema::int().into_ref(), Schema::str().into_ref()],
/// );
/// let doc = Document::Str("hage".into());
/// let value = decode(&schema, DocumentReader::new(&doc, Capabilities::JSON)).unwrap();
/// assert_eq!(value, Value::Union(UnionMember::new(1, "hage")));
/// ```
pub fn decode<S: WireSource>(schema: &Schema, source: S) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::new(source);
    let value = decoder.decode(schema)?;
    decoder.finish()?;
    Ok(value)
}

// -----------------------------------------------------------------------------
// Decoder

/// Walks a schema and pulls matching events from a [`WireSource`].
///
/// The decoder keeps the path of the value being decoded so that every
/// error names its location.
pub struct Decoder<S> {
    source: S,
    caps: Capabilities,
    path: Vec<Segment>,
}

impl<S: WireSource> Decoder<S> {
    pub fn new(source: S) -> Self {
        let caps = source.capabilities();
        Self {
            source,
            caps,
            path: Vec::new(),
        }
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Decodes the next value against `schema`.
    pub fn decode(&mut self, schema: &Schema) -> Result<Value, DecodeError> {
        match schema.kind() {
            SchemaKind::Primitive(p) => self.primitive(*p),
            SchemaKind::Sequence(item) => self.sequence(item),
            SchemaKind::Mapping { key, value } => self.mapping(key, value),
            SchemaKind::Tuple { elements, open } => self.tuple(elements, *open),
            SchemaKind::Optional(inner) => {
                if self.peek()? == WireKind::Null {
                    self.null()?;
                    Ok(Value::None)
                } else {
                    self.decode(inner)
                }
            }
            SchemaKind::Union(members) => self.union(schema, members),
            SchemaKind::Record(record) => self.record(schema, record),
            SchemaKind::EnumValue(e) => self.enum_value(e),
            SchemaKind::EnumTagged(e) => self.enum_tagged(e),
            SchemaKind::Any => self.any(),
        }
    }

    /// Checks that the source holds nothing more.
    pub fn finish(&mut self) -> Result<(), DecodeError> {
        match self.peek()? {
            WireKind::End => Ok(()),
            _ => Err(self.wire(WireError::MultipleRoots)),
        }
    }

    // -------------------------------------------------------------------------
    // Errors

    fn path(&self) -> Path {
        Path::from(self.path.as_slice())
    }

    fn wire(&self, source: WireError) -> DecodeError {
        DecodeError::Wire {
            path: self.path(),
            source,
        }
    }

    fn mismatch(
        &self,
        expected: impl Into<String>,
        actual: &'static str,
        raw: Option<String>,
    ) -> DecodeError {
        DecodeError::TypeMismatch {
            path: self.path(),
            expected: expected.into(),
            actual,
            raw,
        }
    }

    /// A mismatch against whatever comes next. A scalar is consumed so that
    /// the error can show it.
    fn mismatch_here(&mut self, expected: impl Into<String>) -> DecodeError {
        let (actual, raw) = match self.source.peek_kind() {
            Ok(WireKind::Scalar) => match self.source.next_scalar() {
                Ok(scalar) => (scalar.kind_name(), Some(scalar.to_string())),
                Err(e) => return self.wire(e),
            },
            Ok(kind) => (kind.name(), None),
            Err(e) => return self.wire(e),
        };
        self.mismatch(expected, actual, raw)
    }

    // -------------------------------------------------------------------------
    // Source calls

    fn peek(&mut self) -> Result<WireKind, DecodeError> {
        self.source.peek_kind().map_err(|e| self.wire(e))
    }

    fn expect(&mut self, kind: WireKind, expected: &str) -> Result<(), DecodeError> {
        if self.peek()? == kind {
            Ok(())
        } else {
            Err(self.mismatch_here(expected))
        }
    }

    fn scalar(&mut self) -> Result<Scalar, DecodeError> {
        self.source.next_scalar().map_err(|e| self.wire(e))
    }

    fn null(&mut self) -> Result<(), DecodeError> {
        self.source.next_null().map_err(|e| self.wire(e))
    }

    fn skip(&mut self) -> Result<(), DecodeError> {
        self.source.skip_value().map_err(|e| self.wire(e))
    }

    fn enter_map(&mut self) -> Result<Option<usize>, DecodeError> {
        self.source.enter_map().map_err(|e| self.wire(e))
    }

    fn next_key(&mut self) -> Result<Option<Scalar>, DecodeError> {
        self.source.next_map_key().map_err(|e| self.wire(e))
    }

    fn exit_map(&mut self) -> Result<(), DecodeError> {
        self.source.exit_map().map_err(|e| self.wire(e))
    }

    fn enter_seq(&mut self) -> Result<Option<usize>, DecodeError> {
        self.source.enter_seq().map_err(|e| self.wire(e))
    }

    fn exit_seq(&mut self) -> Result<(), DecodeError> {
        self.source.exit_seq().map_err(|e| self.wire(e))
    }

    fn at_end(&mut self) -> Result<bool, DecodeError> {
        Ok(self.peek()? == WireKind::End)
    }

    fn key(&self, key: &Scalar, schema: &Schema) -> Result<Value, DecodeError> {
        decode_key(key, schema, self.caps.requires_string_map_keys).ok_or_else(|| {
            self.mismatch(
                format!("{} key", schema.kind().name()),
                key.kind_name(),
                Some(key.to_string()),
            )
        })
    }

    // -------------------------------------------------------------------------
    // Kinds

    fn primitive(&mut self, primitive: Primitive) -> Result<Value, DecodeError> {
        let kind = self.peek()?;
        if primitive == Primitive::Bytes && kind == WireKind::Seq && !self.caps.supports_bytes_scalar
        {
            return self.byte_seq();
        }
        if kind != WireKind::Scalar {
            return Err(self.mismatch_here(primitive.name()));
        }

        Ok(match (primitive, self.scalar()?) {
            (Primitive::Bool, Scalar::Bool(b)) => Value::Bool(b),
            (Primitive::Int, Scalar::Int(i)) => Value::Int(i),
            (Primitive::Int, Scalar::UInt(u)) => {
                return Err(self.mismatch("int within 64 bits", "int", Some(u.to_string())));
            }
            (Primitive::Float, Scalar::Float(f)) => Value::Float(f),
            (Primitive::Float, Scalar::Int(i)) => Value::Float(i as f64),
            (Primitive::Float, Scalar::UInt(u)) => Value::Float(u as f64),
            (Primitive::Str, Scalar::Str(s)) => Value::Str(s),
            (Primitive::Bytes, Scalar::Bytes(b)) => Value::Bytes(b),
            (primitive, Scalar::Str(s)) if primitive.is_textual() => {
                match primitive.parse_text(&s) {
                    Some(value) => value,
                    None => {
                        return Err(self.mismatch(primitive.name(), "str", Some(format!("{s:?}"))));
                    }
                }
            }
            (primitive, other) => {
                return Err(self.mismatch(
                    primitive.name(),
                    other.kind_name(),
                    Some(other.to_string()),
                ));
            }
        })
    }

    // Formats without a byte scalar write bytes as a sequence of integers.
    fn byte_seq(&mut self) -> Result<Value, DecodeError> {
        let hint = self.enter_seq()?;
        let mut bytes = Vec::with_capacity(hint.unwrap_or(0));
        while !self.at_end()? {
            self.path.push(Segment::Index(bytes.len()));
            if self.peek()? != WireKind::Scalar {
                return Err(self.mismatch_here("byte"));
            }
            let scalar = self.scalar()?;
            let byte = match &scalar {
                Scalar::Int(i) => u8::try_from(*i).ok(),
                _ => None,
            };
            let Some(byte) = byte else {
                return Err(self.mismatch("byte", scalar.kind_name(), Some(scalar.to_string())));
            };
            self.path.pop();
            bytes.push(byte);
        }
        self.exit_seq()?;
        Ok(Value::Bytes(bytes))
    }

    fn sequence(&mut self, item: &Schema) -> Result<Value, DecodeError> {
        self.expect(WireKind::Seq, "sequence")?;
        let hint = self.enter_seq()?;
        let mut items = Vec::with_capacity(hint.unwrap_or(0));
        while !self.at_end()? {
            self.path.push(Segment::Index(items.len()));
            items.push(self.decode(item)?);
            self.path.pop();
        }
        self.exit_seq()?;
        Ok(Value::Seq(items))
    }

    fn mapping(&mut self, key_schema: &Schema, value_schema: &Schema) -> Result<Value, DecodeError> {
        self.expect(WireKind::Map, "map")?;
        let hint = self.enter_map()?;
        let mut entries = Entries::with_capacity(hint.unwrap_or(0));

        while let Some(wire_key) = self.next_key()? {
            let key = self.key(&wire_key, key_schema)?;
            self.path.push(Segment::Key(key_text(&wire_key)));
            let value = self.decode(value_schema)?;
            self.path.pop();
            entries.insert(key, value);
        }
        self.exit_map()?;
        Ok(Value::Map(entries.into_vec()))
    }

    fn tuple(&mut self, elements: &[SchemaRef], open: bool) -> Result<Value, DecodeError> {
        self.expect(WireKind::Seq, "tuple")?;
        self.enter_seq()?;
        let mut values = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            if self.at_end()? {
                return Err(DecodeError::ArityMismatch {
                    path: self.path(),
                    expected: elements.len(),
                    actual: index,
                });
            }
            self.path.push(Segment::Index(index));
            values.push(self.decode(element)?);
            self.path.pop();
        }

        if open {
            while !self.at_end()? {
                self.path.push(Segment::Index(values.len()));
                values.push(self.any()?);
                self.path.pop();
            }
        } else {
            let mut extra = 0;
            while !self.at_end()? {
                self.skip()?;
                extra += 1;
            }
            if extra > 0 {
                return Err(DecodeError::ArityMismatch {
                    path: self.path(),
                    expected: elements.len(),
                    actual: elements.len() + extra,
                });
            }
        }
        self.exit_seq()?;
        Ok(Value::Tuple(values))
    }

    // Members are tried in declaration order; the first one that decodes wins.
    fn union(&mut self, schema: &Schema, members: &[SchemaRef]) -> Result<Value, DecodeError> {
        let depth = self.path.len();
        for (index, member) in members.iter().enumerate() {
            let checkpoint = self.source.checkpoint();
            match self.decode(member) {
                Ok(value) => return Ok(Value::Union(UnionMember::new(index, value))),
                Err(e) => {
                    log::trace!("`{}` member {index} rejected: {e}", schema.name());
                    self.source.rewind(checkpoint);
                    self.path.truncate(depth);
                }
            }
        }

        let names: Vec<_> = members.iter().map(|m| m.kind().name()).collect();
        Err(self.mismatch_here(format!("one of [{}]", names.join(", "))))
    }

    fn any(&mut self) -> Result<Value, DecodeError> {
        match self.peek()? {
            WireKind::Null => {
                self.null()?;
                Ok(Value::None)
            }
            WireKind::Scalar => Ok(Value::from_scalar(self.scalar()?)),
            WireKind::Seq => {
                self.enter_seq()?;
                let mut items = Vec::new();
                while !self.at_end()? {
                    self.path.push(Segment::Index(items.len()));
                    items.push(self.any()?);
                    self.path.pop();
                }
                self.exit_seq()?;
                Ok(Value::Seq(items))
            }
            WireKind::Map => {
                self.enter_map()?;
                let mut entries = Vec::new();
                while let Some(key) = self.next_key()? {
                    self.path.push(Segment::Key(key_text(&key)));
                    let value = self.any()?;
                    self.path.pop();
                    entries.push((Value::from_scalar(key), value));
                }
                self.exit_map()?;
                Ok(Value::Map(entries))
            }
            WireKind::End => Err(self.wire(WireError::Exhausted)),
        }
    }
}

// -----------------------------------------------------------------------------
// Entries

/// Decoded map entries. A repeated key keeps its first position and takes
/// the last value; keys are compared after decoding, so `"1"` and `"01"`
/// under an `int` key schema are one entry.
#[derive(Default)]
pub(crate) struct Entries {
    entries: Vec<(Value, Value)>,
    index: HashMap<String, usize>,
}

impl Entries {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::default(),
        }
    }

    pub(crate) fn insert(&mut self, key: Value, value: Value) {
        let position = match key_identity(&key) {
            Some(identity) => match self.index.get(&identity) {
                Some(&position) => Some(position),
                None => {
                    self.index.insert(identity, self.entries.len());
                    None
                }
            },
            None => self.entries.iter().position(|(k, _)| *k == key),
        };
        match position {
            Some(position) => self.entries[position].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub(crate) fn into_vec(self) -> Vec<(Value, Value)> {
        self.entries
    }
}
