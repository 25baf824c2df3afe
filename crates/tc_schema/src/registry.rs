use core::any::type_name;
use std::sync::{Mutex, PoisonError, RwLock};

use tc_utils::TypeIdMap;

use crate::{BuildContext, Describe, SchemaError, SchemaRef};

// -----------------------------------------------------------------------------
// SchemaRegistry

/// A construct-or-fetch cache of schemas keyed by host type.
///
/// Lookups of published schemas only take a read lock. Construction is
/// serialized by a separate lock, so a schema is built at most once and a
/// half-built schema is never visible to other threads: everything created
/// during one construction is published together when it succeeds, and
/// dropped when it fails.
///
/// The registry is an ordinary value; [`SchemaRegistry::global`] is provided
/// for callers that do not want to thread one through.
///
/// # Examples
///
/// ```
/// use tc_schema::{SchemaRef, SchemaRegistry};
///
/// let registry = SchemaRegistry::new();
/// let a = registry.schema_of::<Vec<String>>().unwrap();
/// let b = registry.schema_of::<Vec<String>>().unwrap();
/// assert!(SchemaRef::ptr_eq(&a, &b));
/// assert_eq!(registry.len(), 2);
/// ```
pub struct SchemaRegistry {
    published: RwLock<TypeIdMap<SchemaRef>>,
    building: Mutex<()>,
}

impl Default for SchemaRegistry {
    /// See [`SchemaRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            published: RwLock::new(TypeIdMap::new()),
            building: Mutex::new(()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static SchemaRegistry {
        static GLOBAL: SchemaRegistry = SchemaRegistry::new();
        &GLOBAL
    }

    pub(crate) fn cached<T: Describe>(&self) -> Option<SchemaRef> {
        let published = self.published.read().unwrap_or_else(PoisonError::into_inner);
        published.get_type::<T>().cloned()
    }

    /// Returns the schema of `T`, building and publishing it on first use.
    pub fn schema_of<T: Describe>(&self) -> Result<SchemaRef, SchemaError> {
        if let Some(schema) = self.cached::<T>() {
            log::trace!("schema cache hit for `{}`", type_name::<T>());
            return Ok(schema);
        }

        let _guard = self.building.lock().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have published it while we waited.
        if let Some(schema) = self.cached::<T>() {
            return Ok(schema);
        }

        let mut cx = BuildContext::new(self);
        let schema = cx.schema_of::<T>()?;
        let pending = cx.into_pending();
        log::debug!(
            "publishing {} schema(s) built for `{}`",
            pending.len(),
            type_name::<T>()
        );

        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .absorb(pending);
        Ok(schema)
    }

    /// Whether a schema for `T` has been published.
    pub fn contains<T: Describe>(&self) -> bool {
        let published = self.published.read().unwrap_or_else(PoisonError::into_inner);
        published.contains_type::<T>()
    }

    /// Number of published schemas.
    pub fn len(&self) -> usize {
        let published = self.published.read().unwrap_or_else(PoisonError::into_inner);
        published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
