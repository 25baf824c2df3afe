use crate::{Capabilities, Document, Scalar, WireError, WireKind, WireSource};

// -----------------------------------------------------------------------------
// Frames

#[derive(Debug, Clone)]
enum Frame<'a> {
    Seq {
        items: &'a [Document],
        pos: usize,
    },
    Map {
        entries: &'a [(Document, Document)],
        pos: usize,
        value_pending: bool,
    },
}

/// A saved position of a [`DocumentReader`].
#[derive(Debug, Clone)]
pub struct ReaderCheckpoint<'a> {
    stack: Vec<Frame<'a>>,
    root_done: bool,
}

// -----------------------------------------------------------------------------
// DocumentReader

/// A [`WireSource`] walking a borrowed [`Document`].
///
/// # Examples
///
/// ```
/// use tc_wire::{Capabilities, Document, DocumentReader, Scalar, WireSource};
///
/// let doc = Document::Seq(vec![Document::Int(1), Document::Str("a".into())]);
/// let mut reader = DocumentReader::new(&doc, Capabilities::JSON);
///
/// reader.enter_seq().unwrap();
/// assert_eq!(reader.next_scalar().unwrap(), Scalar::Int(1));
/// assert_eq!(reader.next_scalar().unwrap(), Scalar::from("a"));
/// reader.exit_seq().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DocumentReader<'a> {
    root: &'a Document,
    root_done: bool,
    stack: Vec<Frame<'a>>,
    capabilities: Capabilities,
}

impl<'a> DocumentReader<'a> {
    pub fn new(root: &'a Document, capabilities: Capabilities) -> Self {
        Self {
            root,
            root_done: false,
            stack: Vec::new(),
            capabilities,
        }
    }

    /// Whether the whole document has been consumed.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.root_done && self.stack.is_empty()
    }

    // The value at the current position, without consuming it.
    // Before a map key this is `None`.
    fn current(&self) -> Option<&'a Document> {
        match self.stack.last() {
            None => (!self.root_done).then_some(self.root),
            Some(Frame::Seq { items, pos }) => items.get(*pos),
            Some(Frame::Map {
                entries,
                pos,
                value_pending,
            }) => {
                if *value_pending {
                    entries.get(*pos).map(|(_, v)| v)
                } else {
                    None
                }
            }
        }
    }

    // Marks the current value as consumed.
    fn advance(&mut self) {
        match self.stack.last_mut() {
            None => self.root_done = true,
            Some(Frame::Seq { pos, .. }) => *pos += 1,
            Some(Frame::Map {
                pos, value_pending, ..
            }) => {
                *pos += 1;
                *value_pending = false;
            }
        }
    }

    fn take(&mut self, expected: &'static str) -> Result<&'a Document, WireError> {
        match self.current() {
            Some(doc) => Ok(doc),
            None => match self.stack.last() {
                Some(Frame::Map {
                    value_pending: false,
                    ..
                }) => Err(WireError::Unexpected {
                    expected,
                    actual: "map key",
                }),
                _ => Err(WireError::Exhausted),
            },
        }
    }
}

impl<'a> WireSource for DocumentReader<'a> {
    type Checkpoint = ReaderCheckpoint<'a>;

    #[inline]
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn peek_kind(&mut self) -> Result<WireKind, WireError> {
        if let Some(Frame::Map {
            entries,
            pos,
            value_pending: false,
        }) = self.stack.last()
        {
            return Ok(if *pos < entries.len() {
                WireKind::Scalar
            } else {
                WireKind::End
            });
        }

        Ok(match self.current() {
            None => WireKind::End,
            Some(Document::Null) => WireKind::Null,
            Some(Document::Seq(_)) => WireKind::Seq,
            Some(Document::Map(_)) => WireKind::Map,
            Some(_) => WireKind::Scalar,
        })
    }

    fn enter_map(&mut self) -> Result<Option<usize>, WireError> {
        let doc = self.take("map")?;
        let Document::Map(entries) = doc else {
            return Err(WireError::Unexpected {
                expected: "map",
                actual: doc.kind_name(),
            });
        };
        self.advance();
        self.stack.push(Frame::Map {
            entries,
            pos: 0,
            value_pending: false,
        });
        Ok(Some(entries.len()))
    }

    fn next_map_key(&mut self) -> Result<Option<Scalar>, WireError> {
        let Some(Frame::Map {
            entries,
            pos,
            value_pending,
        }) = self.stack.last_mut()
        else {
            return Err(WireError::Unbalanced("next_map_key"));
        };
        if *value_pending {
            return Err(WireError::Unexpected {
                expected: "map key",
                actual: "map value",
            });
        }
        let Some((key, _)) = entries.get(*pos) else {
            return Ok(None);
        };
        let scalar = key
            .as_scalar()
            .ok_or(WireError::NonScalarKey(key.kind_name()))?;
        *value_pending = true;
        Ok(Some(scalar))
    }

    fn exit_map(&mut self) -> Result<(), WireError> {
        match self.stack.last() {
            Some(Frame::Map {
                entries,
                pos,
                value_pending,
            }) => {
                if *value_pending || *pos < entries.len() {
                    return Err(WireError::Trailing(entries.len() - *pos));
                }
                self.stack.pop();
                Ok(())
            }
            _ => Err(WireError::Unbalanced("exit_map")),
        }
    }

    fn enter_seq(&mut self) -> Result<Option<usize>, WireError> {
        let doc = self.take("seq")?;
        let Document::Seq(items) = doc else {
            return Err(WireError::Unexpected {
                expected: "seq",
                actual: doc.kind_name(),
            });
        };
        self.advance();
        self.stack.push(Frame::Seq { items, pos: 0 });
        Ok(Some(items.len()))
    }

    fn exit_seq(&mut self) -> Result<(), WireError> {
        match self.stack.last() {
            Some(Frame::Seq { items, pos }) => {
                if *pos < items.len() {
                    return Err(WireError::Trailing(items.len() - *pos));
                }
                self.stack.pop();
                Ok(())
            }
            _ => Err(WireError::Unbalanced("exit_seq")),
        }
    }

    fn next_scalar(&mut self) -> Result<Scalar, WireError> {
        let doc = self.take("scalar")?;
        let scalar = doc.as_scalar().ok_or(WireError::Unexpected {
            expected: "scalar",
            actual: doc.kind_name(),
        })?;
        self.advance();
        Ok(scalar)
    }

    fn next_null(&mut self) -> Result<(), WireError> {
        let doc = self.take("null")?;
        if !matches!(doc, Document::Null) {
            return Err(WireError::Unexpected {
                expected: "null",
                actual: doc.kind_name(),
            });
        }
        self.advance();
        Ok(())
    }

    fn skip_value(&mut self) -> Result<(), WireError> {
        self.take("value")?;
        self.advance();
        Ok(())
    }

    fn checkpoint(&self) -> ReaderCheckpoint<'a> {
        ReaderCheckpoint {
            stack: self.stack.clone(),
            root_done: self.root_done,
        }
    }

    fn rewind(&mut self, checkpoint: ReaderCheckpoint<'a>) {
        self.stack = checkpoint.stack;
        self.root_done = checkpoint.root_done;
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentReader;
    use crate::{Capabilities, Document, Scalar, WireError, WireKind, WireSource};

    fn sample() -> Document {
        Document::Map(vec![
            (Document::Str("x".into()), Document::Str("yes".into())),
            (
                Document::Str("list".into()),
                Document::Seq(vec![Document::Int(1), Document::Null]),
            ),
        ])
    }

    #[test]
    fn walk_map_and_seq() {
        let doc = sample();
        let mut reader = DocumentReader::new(&doc, Capabilities::JSON);

        assert_eq!(reader.peek_kind().unwrap(), WireKind::Map);
        assert_eq!(reader.enter_map().unwrap(), Some(2));
        assert_eq!(reader.peek_kind().unwrap(), WireKind::Scalar);
        assert_eq!(reader.next_map_key().unwrap(), Some(Scalar::from("x")));
        assert_eq!(reader.next_scalar().unwrap(), Scalar::from("yes"));

        assert_eq!(reader.next_map_key().unwrap(), Some(Scalar::from("list")));
        assert_eq!(reader.peek_kind().unwrap(), WireKind::Seq);
        reader.enter_seq().unwrap();
        assert_eq!(reader.next_scalar().unwrap(), Scalar::Int(1));
        assert_eq!(reader.peek_kind().unwrap(), WireKind::Null);
        reader.next_null().unwrap();
        assert_eq!(reader.peek_kind().unwrap(), WireKind::End);
        reader.exit_seq().unwrap();

        assert_eq!(reader.next_map_key().unwrap(), None);
        assert_eq!(reader.peek_kind().unwrap(), WireKind::End);
        reader.exit_map().unwrap();
        assert!(reader.is_finished());
        assert_eq!(reader.peek_kind().unwrap(), WireKind::End);
    }

    #[test]
    fn rewind_restores_position() {
        let doc = sample();
        let mut reader = DocumentReader::new(&doc, Capabilities::JSON);
        reader.enter_map().unwrap();
        reader.next_map_key().unwrap();

        let saved = reader.checkpoint();
        assert!(reader.enter_seq().is_err());
        assert_eq!(reader.next_scalar().unwrap(), Scalar::from("yes"));
        reader.rewind(saved);
        assert_eq!(reader.next_scalar().unwrap(), Scalar::from("yes"));
    }

    #[test]
    fn structural_errors() {
        let doc = sample();
        let mut reader = DocumentReader::new(&doc, Capabilities::JSON);
        assert_eq!(
            reader.next_scalar(),
            Err(WireError::Unexpected {
                expected: "scalar",
                actual: "map"
            })
        );
        reader.enter_map().unwrap();
        assert_eq!(reader.exit_map(), Err(WireError::Trailing(2)));
        assert_eq!(reader.exit_seq(), Err(WireError::Unbalanced("exit_seq")));
        reader.next_map_key().unwrap();
        reader.skip_value().unwrap();
        reader.next_map_key().unwrap();
        reader.skip_value().unwrap();
        reader.exit_map().unwrap();
        assert_eq!(reader.skip_value(), Err(WireError::Exhausted));
    }

    #[test]
    fn non_scalar_key() {
        let doc = Document::Map(vec![(Document::Seq(Vec::new()), Document::Null)]);
        let mut reader = DocumentReader::new(&doc, Capabilities::YAML);
        reader.enter_map().unwrap();
        assert_eq!(reader.next_map_key(), Err(WireError::NonScalarKey("seq")));
    }
}
