use core::any::type_name;
use core::marker::PhantomData;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use rust_decimal::Decimal;
use tc_utils::TypeIdMap;
use uuid::Uuid;

use crate::{Primitive, Schema, SchemaError, SchemaRef, SchemaRegistry};

// -----------------------------------------------------------------------------
// Describe

/// Host reflection: describes the shape of a Rust type as a [`Schema`].
///
/// Implementations call [`BuildContext::schema_of`] for every child type so
/// that recursive types resolve through forward references instead of
/// recursing forever.
///
/// `describe` runs while the registry holds its construction lock, which is
/// not reentrant. Nested lookups must go through `cx`; calling
/// [`SchemaRegistry::schema_of`] (or [`SchemaRegistry::global`]) from inside
/// `describe` deadlocks.
///
/// # Examples
///
/// ```
/// use tc_schema::{BuildContext, Describe, RecordBuilder, Schema, SchemaError, SchemaRegistry, attrs};
///
/// struct Tree {
///     value: i64,
///     children: Vec<Tree>,
/// }
///
/// impl Describe for Tree {
///     fn describe(cx: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
///         RecordBuilder::new("Tree")
///             .field("value", cx.schema_of::<i64>()?)
///             .field_with("children", cx.schema_of::<Vec<Tree>>()?, attrs! { "default" => true })
///             .build()
///     }
/// }
///
/// let registry = SchemaRegistry::new();
/// let schema = registry.schema_of::<Tree>().unwrap();
/// assert_eq!(schema.name(), "Tree");
/// ```
pub trait Describe: 'static {
    fn describe(cx: &mut BuildContext<'_>) -> Result<Schema, SchemaError>;

    /// The schema node of the type this one wraps transparently, if any.
    ///
    /// Wrappers such as `Box<T>` return the node of `T`, so both types share
    /// one schema instead of holding two copies.
    #[inline]
    fn shared(cx: &mut BuildContext<'_>) -> Option<Result<SchemaRef, SchemaError>> {
        let _ = cx;
        None
    }
}

// -----------------------------------------------------------------------------
// BuildContext

/// State of one schema construction.
///
/// Schemas built during a construction stay local to it until the whole
/// construction succeeds; the registry then publishes them together.
pub struct BuildContext<'a> {
    registry: &'a SchemaRegistry,
    pending: TypeIdMap<SchemaRef>,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            pending: TypeIdMap::new(),
        }
    }

    pub(crate) fn into_pending(self) -> TypeIdMap<SchemaRef> {
        self.pending
    }

    /// Returns the schema of `T`, building it if needed.
    ///
    /// The returned handle may still be a forward reference when `T` is an
    /// enclosing type under construction. Keep it as a child; do not inspect
    /// it before the construction finishes.
    pub fn schema_of<T: Describe>(&mut self) -> Result<SchemaRef, SchemaError> {
        if let Some(shared) = T::shared(self) {
            return shared;
        }
        if let Some(schema) = self.registry.cached::<T>() {
            return Ok(schema);
        }
        if let Some(schema) = self.pending.get_type::<T>() {
            return Ok(schema.clone());
        }

        let node = SchemaRef::placeholder(type_name::<T>());
        self.pending.insert_type::<T>(node.clone());
        let schema = T::describe(self)?;
        node.fill(schema);
        Ok(node)
    }
}

// -----------------------------------------------------------------------------
// Markers

/// A byte string. Plain `Vec<u8>` describes a sequence of integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

/// Marker describing a union of the tuple's member types, tried in order.
///
/// `Union<(i64, String)>` decodes an integer or a string, whichever matches
/// first.
pub struct Union<T>(PhantomData<fn() -> T>);

/// Marker describing an unconstrained value.
pub struct AnyValue;

// -----------------------------------------------------------------------------
// Implementations

macro_rules! impl_primitive {
    ($($ty:ty => $p:ident),* $(,)?) => {
        $(
            impl Describe for $ty {
                #[inline]
                fn describe(_: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
                    Ok(Schema::primitive(stringify!($ty), Primitive::$p))
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    isize => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    u64 => Int,
    usize => Int,
    f32 => Float,
    f64 => Float,
    char => Str,
    String => Str,
    Bytes => Bytes,
    NaiveDateTime => DateTime,
    NaiveDate => Date,
    NaiveTime => Time,
    Decimal => Decimal,
    Uuid => Uuid,
}

impl<Tz: TimeZone + 'static> Describe for DateTime<Tz> {
    #[inline]
    fn describe(_: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
        Ok(Schema::primitive(type_name::<Self>(), Primitive::DateTime))
    }
}

impl Describe for AnyValue {
    #[inline]
    fn describe(_: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
        Ok(Schema::any())
    }
}

macro_rules! impl_sequence {
    ($($ty:ident $(<$($bound:ident),*>)?),* $(,)?) => {
        $(
            impl<T: Describe $($(, $bound: 'static)*)?> Describe for $ty<T $($(, $bound)*)?> {
                fn describe(cx: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
                    Ok(Schema::sequence(type_name::<Self>(), cx.schema_of::<T>()?))
                }
            }
        )*
    };
}

impl_sequence! {
    Vec,
    VecDeque,
    BTreeSet,
    HashSet<S>,
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe(cx: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
        Ok(Schema::mapping(
            type_name::<Self>(),
            cx.schema_of::<K>()?,
            cx.schema_of::<V>()?,
        ))
    }
}

impl<K: Describe, V: Describe, S: 'static> Describe for HashMap<K, V, S> {
    fn describe(cx: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
        Ok(Schema::mapping(
            type_name::<Self>(),
            cx.schema_of::<K>()?,
            cx.schema_of::<V>()?,
        ))
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe(cx: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
        Ok(Schema::optional(type_name::<Self>(), cx.schema_of::<T>()?))
    }
}

// `Box<T>` has the shape of `T`.
impl<T: Describe> Describe for Box<T> {
    #[inline]
    fn describe(cx: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
        T::describe(cx)
    }

    #[inline]
    fn shared(cx: &mut BuildContext<'_>) -> Option<Result<SchemaRef, SchemaError>> {
        Some(cx.schema_of::<T>())
    }
}

macro_rules! impl_tuple {
    ($(($($name:ident),+)),* $(,)?) => {
        $(
            impl<$($name: Describe),+> Describe for ($($name,)+) {
                fn describe(cx: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
                    let elements = vec![$(cx.schema_of::<$name>()?),+];
                    Ok(Schema::tuple(type_name::<Self>(), elements))
                }
            }

            impl<$($name: Describe),+> Describe for Union<($($name,)+)> {
                fn describe(cx: &mut BuildContext<'_>) -> Result<Schema, SchemaError> {
                    let members = vec![$(cx.schema_of::<$name>()?),+];
                    Ok(Schema::union(type_name::<Self>(), members))
                }
            }
        )*
    };
}

impl_tuple! {
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
    (A, B, C, D, E, F),
    (A, B, C, D, E, F, G),
    (A, B, C, D, E, F, G, H),
}
