use core::fmt;

// -----------------------------------------------------------------------------
// Scalar

/// A leaf value travelling through the wire event stream.
///
/// Integers keep the sign information the format reported: values that fit
/// into `i64` are always [`Scalar::Int`], only larger unsigned values use
/// [`Scalar::UInt`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl Scalar {
    /// A short name of the scalar's dynamic kind, used in diagnostics.
    ///
    /// # Examples
    ///
    /// ```
    /// use tc_wire::Scalar;
    ///
    /// assert_eq!(Scalar::UInt(u64::MAX).kind_name(), "int");
    /// assert_eq!(Scalar::from("x").kind_name(), "str");
    /// ```
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) | Scalar::UInt(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Str(_) => "str",
            Scalar::Bytes(_) => "bytes",
        }
    }

    /// Returns the string content if this is a [`Scalar::Str`].
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Normalizes an unsigned integer into [`Scalar::Int`] when it fits.
    #[inline]
    pub fn from_u64(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Scalar::Int(i),
            Err(_) => Scalar::UInt(v),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::UInt(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v:?}"),
            Scalar::Str(v) => write!(f, "{v:?}"),
            Scalar::Bytes(v) => {
                f.write_str("b\"")?;
                for byte in v {
                    write!(f, "\\x{byte:02x}")?;
                }
                f.write_str("\"")
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl From<bool> for Scalar {
    #[inline]
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    #[inline]
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    #[inline]
    fn from(v: i32) -> Self {
        Scalar::Int(v.into())
    }
}

impl From<u64> for Scalar {
    #[inline]
    fn from(v: u64) -> Self {
        Scalar::from_u64(v)
    }
}

impl From<f64> for Scalar {
    #[inline]
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    #[inline]
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_owned())
    }
}

impl From<String> for Scalar {
    #[inline]
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<Vec<u8>> for Scalar {
    #[inline]
    fn from(v: Vec<u8>) -> Self {
        Scalar::Bytes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::Scalar;

    #[test]
    fn unsigned_normalization() {
        assert_eq!(Scalar::from(7_u64), Scalar::Int(7));
        assert_eq!(Scalar::from(u64::MAX), Scalar::UInt(u64::MAX));
    }

    #[test]
    fn display_raw_values() {
        assert_eq!(Scalar::from("hage").to_string(), "\"hage\"");
        assert_eq!(Scalar::Float(1.0).to_string(), "1.0");
        assert_eq!(Scalar::Bytes(vec![0, 255]).to_string(), "b\"\\x00\\xff\"");
    }
}
