//! Type identities and declared-type information for annotated code.
//!
//! This module provides the handles the engine uses to identify annotated types and the
//! collaborator interface through which declared member types are looked up.
//!
//! # Key Components
//!
//! - [`TypeHandle`]: Reference-identity handle for an annotated type
//! - [`DeclaredType`] / [`PrimitiveKind`]: What introspection reports for a member
//! - [`TypeIntrospector`]: Collaborator answering "what types did this member declare"
//! - [`DescriptorTable`]: Statically filled [`TypeIntrospector`] implementation
//!
//! # Identity
//!
//! Two handles are the same type exactly when they share an [`id`](TypeHandle::id), a 64-bit
//! number drawn once per created type. The [`Token`] of a handle is a display label. Names are
//! informational only; creating two handles with the same name yields two unrelated types, each with its own
//! registry.
//!
//! # Examples
//!
//! ```rust
//! use attrscope::metadata::typesystem::TypeHandle;
//!
//! struct UserService;
//!
//! let a = TypeHandle::of::<UserService>();
//! let b = TypeHandle::of::<UserService>();
//! assert_eq!(a, b);
//!
//! let c = TypeHandle::new("UserService");
//! let d = TypeHandle::new("UserService");
//! assert_ne!(c, d);
//! ```

mod introspector;
mod primitives;

use std::{
    any::TypeId,
    fmt,
    hash::{Hash, Hasher},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, OnceLock,
    },
};

use dashmap::DashMap;

pub use introspector::{DescriptorTable, TypeDescriptorBuilder, TypeIntrospector};
pub use primitives::{DeclaredType, PrimitiveKind};

use crate::metadata::token::Token;

/// Interned handles for Rust types annotated through [`TypeHandle::of`]
static INTERNED: OnceLock<DashMap<TypeId, TypeHandle>> = OnceLock::new();

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(1);

struct TypeInfo {
    id: u64,
    token: Token,
    name: String,
    base: Option<TypeHandle>,
    rust_type: Option<TypeId>,
}

/// Handle to an annotated type.
///
/// Cloning is cheap and preserves identity. Equality, ordering and hashing are based on the
/// handle's [`id`](TypeHandle::id) only.
#[derive(Clone)]
pub struct TypeHandle {
    info: Arc<TypeInfo>,
}

impl TypeHandle {
    /// Create a new, distinct type identity
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::create(name.into(), None, None)
    }

    /// Create a new type identity which derives from `base`
    ///
    /// The derived type is a separate identity with its own registry; annotations on `base` are
    /// not visible through it (see [`RegistryDirectory::lineage`](crate::metadata::registry::RegistryDirectory::lineage)
    /// for walking the chain).
    #[must_use]
    pub fn derived(name: impl Into<String>, base: &TypeHandle) -> Self {
        Self::create(name.into(), Some(base.clone()), None)
    }

    /// The handle of the Rust type `T`, identical across calls for the same `T`
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        let id = TypeId::of::<T>();
        INTERNED
            .get_or_init(DashMap::new)
            .entry(id)
            .or_insert_with(|| Self::create(std::any::type_name::<T>().to_string(), None, Some(id)))
            .clone()
    }

    fn create(name: String, base: Option<TypeHandle>, rust_type: Option<TypeId>) -> Self {
        TypeHandle {
            info: Arc::new(TypeInfo {
                id: NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed),
                token: Token::next_type(),
                name,
                base,
                rust_type,
            }),
        }
    }

    /// The identity of this type, unique for the lifetime of the process
    #[must_use]
    pub fn id(&self) -> u64 {
        self.info.id
    }

    /// The display token of this type
    #[must_use]
    pub fn token(&self) -> Token {
        self.info.token
    }

    /// The (informational) name of this type
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// The direct base type, if this type was created with [`TypeHandle::derived`]
    #[must_use]
    pub fn base(&self) -> Option<&TypeHandle> {
        self.info.base.as_ref()
    }

    /// The `TypeId` of the Rust type behind this handle, for handles created by [`TypeHandle::of`]
    #[must_use]
    pub fn rust_type(&self) -> Option<TypeId> {
        self.info.rust_type
    }

    /// Iterate over all base types, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = &TypeHandle> {
        std::iter::successors(self.base(), |current| current.base())
    }

    /// Returns true if `other` appears in the base chain of this type
    #[must_use]
    pub fn is_derived_from(&self, other: &TypeHandle) -> bool {
        self.ancestors().any(|ancestor| ancestor == other)
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.info.id == other.info.id
    }
}

impl Eq for TypeHandle {}

impl PartialOrd for TypeHandle {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeHandle {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.info.id.cmp(&other.info.id)
    }
}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.info.id.hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({} @ {})", self.info.name, self.info.token)
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.info.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::token::TYPE_TABLE;

    struct Controller;
    struct Repository;

    #[test]
    fn test_identity_is_not_name() {
        let first = TypeHandle::new("Controller");
        let second = TypeHandle::new("Controller");

        assert_ne!(first, second);
        assert_eq!(first, first.clone());
        assert_eq!(first.name(), second.name());
        assert_eq!(first.token().table(), TYPE_TABLE);
        assert_ne!(first.id(), second.id());
        assert_eq!(first.id(), first.clone().id());
    }

    #[test]
    fn test_interned_rust_types() {
        let controller = TypeHandle::of::<Controller>();
        assert_eq!(controller, TypeHandle::of::<Controller>());
        assert_ne!(controller, TypeHandle::of::<Repository>());
        assert_eq!(controller.rust_type(), Some(TypeId::of::<Controller>()));
        assert!(controller.name().ends_with("Controller"));
    }

    #[test]
    fn test_derived_chain() {
        let base = TypeHandle::new("Base");
        let middle = TypeHandle::derived("Middle", &base);
        let leaf = TypeHandle::derived("Leaf", &middle);

        let chain: Vec<&str> = leaf.ancestors().map(TypeHandle::name).collect();
        assert_eq!(chain, vec!["Middle", "Base"]);

        assert!(leaf.is_derived_from(&base));
        assert!(!base.is_derived_from(&leaf));
        assert_ne!(leaf, middle);
        assert!(base.base().is_none());
    }
}
