// -----------------------------------------------------------------------------
// Capabilities

/// Structural features a format adapter supports.
///
/// The codec consults these flags instead of asking which format it is
/// talking to. Presets exist for the formats shipped with the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// Nested records and catch-all maps may be merged into the parent map.
    pub supports_flatten: bool,
    /// Map keys must be strings; other key scalars are stringified.
    pub requires_string_map_keys: bool,
    /// Byte strings are a native scalar; otherwise they travel as a
    /// sequence of integers.
    pub supports_bytes_scalar: bool,
    /// The format can represent a null value.
    pub supports_null: bool,
    /// Within a map, scalar entries must come before nested tables.
    pub requires_ordered_tables: bool,
}

impl Capabilities {
    /// Everything allowed, nothing required. Useful for in-memory round trips.
    pub const PERMISSIVE: Self = Self {
        supports_flatten: true,
        requires_string_map_keys: false,
        supports_bytes_scalar: true,
        supports_null: true,
        requires_ordered_tables: false,
    };

    pub const JSON: Self = Self {
        supports_flatten: true,
        requires_string_map_keys: true,
        supports_bytes_scalar: false,
        supports_null: true,
        requires_ordered_tables: false,
    };

    pub const YAML: Self = Self::JSON;

    pub const TOML: Self = Self {
        supports_flatten: true,
        requires_string_map_keys: true,
        supports_bytes_scalar: false,
        supports_null: false,
        requires_ordered_tables: true,
    };

    /// MessagePack records may be written as compact arrays, which cannot be
    /// merged key by key.
    pub const MESSAGEPACK: Self = Self {
        supports_flatten: false,
        requires_string_map_keys: false,
        supports_bytes_scalar: true,
        supports_null: true,
        requires_ordered_tables: false,
    };
}

impl Default for Capabilities {
    #[inline]
    fn default() -> Self {
        Self::PERMISSIVE
    }
}
