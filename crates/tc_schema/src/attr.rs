use core::fmt;
use std::sync::Arc;

use crate::{Convention, Value};

// -----------------------------------------------------------------------------
// Factory

/// A callable producing a default value, shared between schema clones.
pub type Factory = Arc<dyn Fn() -> Value + Send + Sync>;

// -----------------------------------------------------------------------------
// AttrValue

/// A loosely-typed annotation value, as attached by a declaration front-end.
///
/// The [attribute resolver](crate::resolve) checks each value against the type
/// its attribute expects.
#[derive(Clone)]
pub enum AttrValue {
    Bool(bool),
    Str(String),
    Int(i64),
    Float(f64),
    Value(Value),
    Factory(Factory),
}

impl AttrValue {
    /// Wraps a default factory.
    #[inline]
    pub fn factory(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        AttrValue::Factory(Arc::new(f))
    }

    /// A short name of the annotation's type, used in diagnostics.
    pub const fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Str(_) => "str",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Value(_) => "value",
            AttrValue::Factory(_) => "factory",
        }
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(v) => write!(f, "{v}"),
            AttrValue::Str(v) => write!(f, "{v:?}"),
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Float(v) => write!(f, "{v:?}"),
            AttrValue::Value(v) => write!(f, "{v}"),
            AttrValue::Factory(_) => f.write_str("<factory>"),
        }
    }
}

impl From<bool> for AttrValue {
    #[inline]
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<&str> for AttrValue {
    #[inline]
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_owned())
    }
}

impl From<String> for AttrValue {
    #[inline]
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

impl From<i64> for AttrValue {
    #[inline]
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<i32> for AttrValue {
    #[inline]
    fn from(v: i32) -> Self {
        AttrValue::Int(v.into())
    }
}

impl From<f64> for AttrValue {
    #[inline]
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<Value> for AttrValue {
    #[inline]
    fn from(v: Value) -> Self {
        AttrValue::Value(v)
    }
}

impl From<Convention> for AttrValue {
    #[inline]
    fn from(v: Convention) -> Self {
        AttrValue::Str(v.name().to_owned())
    }
}

// -----------------------------------------------------------------------------
// Attributes

/// An ordered set of named annotations on a type, field or variant.
///
/// Inserting an existing name replaces its value. Use the [`attrs!`](crate::attrs)
/// macro for literals.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// Builds an [`Attributes`] set from `"name" => value` pairs.
///
/// # Examples
///
/// ```
/// use tc_schema::attrs;
///
/// let attrs = attrs! { "rename" => "x", "skip" => true };
/// assert!(attrs.get("skip").is_some());
/// assert!(attrs! {}.is_empty());
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::Attributes::new()
    };
    ($($name:literal => $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::Attributes::new();
        $( attrs.insert($name, $value); )+
        attrs
    }};
}
