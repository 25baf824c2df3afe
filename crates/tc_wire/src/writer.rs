use crate::{Capabilities, Document, Scalar, WireError, WireSink};

// -----------------------------------------------------------------------------
// Builders

#[derive(Debug)]
enum Builder {
    Seq(Vec<Document>),
    Map {
        entries: Vec<(Document, Document)>,
        key: Option<Document>,
    },
}

// -----------------------------------------------------------------------------
// DocumentWriter

/// A [`WireSink`] building an owned [`Document`].
///
/// When the capabilities require ordered tables, every finished map is
/// reordered so that scalar entries precede table entries. The relative
/// order inside each group is kept.
///
/// # Examples
///
/// ```
/// use tc_wire::{Capabilities, Document, DocumentWriter, Scalar, WireSink};
///
/// let mut writer = DocumentWriter::new(Capabilities::JSON);
/// writer.begin_map(Some(1)).unwrap();
/// writer.map_key(Scalar::from("x")).unwrap();
/// writer.value(Scalar::from("yes")).unwrap();
/// writer.end_map().unwrap();
///
/// let doc = writer.finish().unwrap();
/// assert_eq!(doc.get("x"), Some(&Document::Str("yes".into())));
/// ```
#[derive(Debug)]
pub struct DocumentWriter {
    capabilities: Capabilities,
    stack: Vec<Builder>,
    root: Option<Document>,
}

impl DocumentWriter {
    pub const fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            stack: Vec::new(),
            root: None,
        }
    }

    /// Returns the finished document.
    ///
    /// Fails if a container is still open or nothing was written.
    pub fn finish(self) -> Result<Document, WireError> {
        if !self.stack.is_empty() {
            return Err(WireError::Unbalanced("finish"));
        }
        self.root.ok_or(WireError::Exhausted)
    }

    fn push(&mut self, doc: Document) -> Result<(), WireError> {
        match self.stack.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(WireError::MultipleRoots);
                }
                self.root = Some(doc);
            }
            Some(Builder::Seq(items)) => items.push(doc),
            Some(Builder::Map { entries, key }) => match key.take() {
                Some(key) => entries.push((key, doc)),
                None => return Err(WireError::KeyExpected),
            },
        }
        Ok(())
    }
}

impl WireSink for DocumentWriter {
    #[inline]
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn begin_map(&mut self, size_hint: Option<usize>) -> Result<(), WireError> {
        self.stack.push(Builder::Map {
            entries: Vec::with_capacity(size_hint.unwrap_or(0)),
            key: None,
        });
        Ok(())
    }

    fn map_key(&mut self, key: Scalar) -> Result<(), WireError> {
        match self.stack.last_mut() {
            Some(Builder::Map { key: slot, .. }) => {
                if slot.is_some() {
                    return Err(WireError::DanglingKey);
                }
                *slot = Some(Document::from(key));
                Ok(())
            }
            _ => Err(WireError::Unbalanced("map_key")),
        }
    }

    fn end_map(&mut self) -> Result<(), WireError> {
        let Some(Builder::Map { mut entries, key }) = self.stack.pop_if(|b| matches!(b, Builder::Map { .. }))
        else {
            return Err(WireError::Unbalanced("end_map"));
        };
        if key.is_some() {
            return Err(WireError::DanglingKey);
        }
        if self.capabilities.requires_ordered_tables {
            // Stable: scalars keep their order, tables keep theirs.
            entries.sort_by_key(|(_, value)| value.is_table());
        }
        self.push(Document::Map(entries))
    }

    fn begin_seq(&mut self, size_hint: Option<usize>) -> Result<(), WireError> {
        self.stack
            .push(Builder::Seq(Vec::with_capacity(size_hint.unwrap_or(0))));
        Ok(())
    }

    fn end_seq(&mut self) -> Result<(), WireError> {
        let Some(Builder::Seq(items)) = self.stack.pop_if(|b| matches!(b, Builder::Seq(_))) else {
            return Err(WireError::Unbalanced("end_seq"));
        };
        self.push(Document::Seq(items))
    }

    #[inline]
    fn value(&mut self, scalar: Scalar) -> Result<(), WireError> {
        self.push(Document::from(scalar))
    }

    #[inline]
    fn null(&mut self) -> Result<(), WireError> {
        self.push(Document::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentWriter;
    use crate::{Capabilities, Document, Scalar, WireError, WireSink};

    fn key(s: &str) -> Document {
        Document::Str(s.into())
    }

    #[test]
    fn ordered_tables_move_scalars_first() {
        let mut writer = DocumentWriter::new(Capabilities::TOML);
        writer.begin_map(None).unwrap();
        writer.map_key(Scalar::from("inner")).unwrap();
        writer.begin_map(None).unwrap();
        writer.end_map().unwrap();
        writer.map_key(Scalar::from("a")).unwrap();
        writer.value(Scalar::Int(1)).unwrap();
        writer.map_key(Scalar::from("b")).unwrap();
        writer.value(Scalar::Int(2)).unwrap();
        writer.end_map().unwrap();

        let doc = writer.finish().unwrap();
        let Document::Map(entries) = doc else {
            panic!("expected a map");
        };
        let keys: Vec<_> = entries.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![key("a"), key("b"), key("inner")]);
    }

    #[test]
    fn unordered_by_default() {
        let mut writer = DocumentWriter::new(Capabilities::JSON);
        writer.begin_map(None).unwrap();
        writer.map_key(Scalar::from("inner")).unwrap();
        writer.begin_seq(None).unwrap();
        writer.end_seq().unwrap();
        writer.map_key(Scalar::from("a")).unwrap();
        writer.null().unwrap();
        writer.end_map().unwrap();

        let doc = writer.finish().unwrap();
        assert_eq!(
            doc,
            Document::Map(vec![
                (key("inner"), Document::Seq(Vec::new())),
                (key("a"), Document::Null),
            ])
        );
    }

    #[test]
    fn protocol_violations() {
        let mut writer = DocumentWriter::new(Capabilities::JSON);
        writer.begin_map(None).unwrap();
        assert_eq!(writer.value(Scalar::Int(1)), Err(WireError::KeyExpected));
        writer.map_key(Scalar::from("k")).unwrap();
        assert_eq!(writer.map_key(Scalar::from("k")), Err(WireError::DanglingKey));
        assert_eq!(writer.end_seq(), Err(WireError::Unbalanced("end_seq")));
        assert_eq!(writer.end_map(), Err(WireError::DanglingKey));

        let mut writer = DocumentWriter::new(Capabilities::JSON);
        writer.value(Scalar::Int(1)).unwrap();
        assert_eq!(writer.value(Scalar::Int(2)), Err(WireError::MultipleRoots));
    }
}
