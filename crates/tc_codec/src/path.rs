use core::fmt;

// -----------------------------------------------------------------------------
// Segment

/// One step from a value to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A record field, by wire name.
    Field(String),
    /// A sequence or tuple element.
    Index(usize),
    /// A mapping entry, by its key as read or written.
    Key(String),
    /// The payload of an enum variant.
    Variant(String),
}

// -----------------------------------------------------------------------------
// Path

/// The location of a value inside the document, from the root.
///
/// # Examples
///
/// ```
/// use tc_codec::{Path, Segment};
///
/// let path = Path::from(vec![
///     Segment::Field("items".into()),
///     Segment::Index(3),
///     Segment::Key("k".into()),
/// ]);
/// assert_eq!(path.to_string(), r#"$.items[3]["k"]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The root path `$`.
    #[inline]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl From<Vec<Segment>> for Path {
    #[inline]
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl From<&[Segment]> for Path {
    #[inline]
    fn from(segments: &[Segment]) -> Self {
        Self {
            segments: segments.to_vec(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
                Segment::Key(key) => write!(f, "[{key:?}]")?,
                Segment::Variant(name) => write!(f, "::{name}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Path, Segment};

    #[test]
    fn display() {
        assert_eq!(Path::root().to_string(), "$");
        let path = Path::from(vec![
            Segment::Field("shape".into()),
            Segment::Variant("Circle".into()),
            Segment::Field("r".into()),
        ]);
        assert_eq!(path.to_string(), "$.shape::Circle.r");
    }
}
