use std::sync::Arc;

use crossbeam_skiplist::SkipMap;

use crate::metadata::{
    registry::{AnnotationRegistry, AnnotationRegistryRc},
    typesystem::TypeHandle,
};

/// Side table mapping type identity to that type's [`AnnotationRegistry`].
///
/// Registries are created on first access and never removed or replaced, so every
/// [`RegistryDirectory::registry_for`] call for the same type returns the same instance for the
/// lifetime of the directory.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use attrscope::metadata::{registry::RegistryDirectory, typesystem::TypeHandle};
///
/// let directory = RegistryDirectory::new();
/// let ty = TypeHandle::new("Service");
///
/// let first = directory.registry_for(&ty);
/// let second = directory.registry_for(&ty);
/// assert!(Arc::ptr_eq(&first, &second));
/// assert!(first.is_empty());
/// ```
#[derive(Default)]
pub struct RegistryDirectory {
    registries: SkipMap<u64, AnnotationRegistryRc>,
}

impl RegistryDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of `ty`, created empty on first access
    #[must_use]
    pub fn registry_for(&self, ty: &TypeHandle) -> AnnotationRegistryRc {
        self.registries
            .get_or_insert_with(ty.id(), || Arc::new(AnnotationRegistry::new(ty.clone())))
            .value()
            .clone()
    }

    /// The registry of `ty`, without creating one
    #[must_use]
    pub fn get(&self, ty: &TypeHandle) -> Option<AnnotationRegistryRc> {
        self.registries
            .get(&ty.id())
            .map(|entry| entry.value().clone())
    }

    /// Returns true if a registry exists for `ty`
    #[must_use]
    pub fn contains(&self, ty: &TypeHandle) -> bool {
        self.registries.contains_key(&ty.id())
    }

    /// Registries of `ty` and of each of its base types, nearest first.
    ///
    /// Types without a registry are skipped, none are created.
    #[must_use]
    pub fn lineage(&self, ty: &TypeHandle) -> Vec<AnnotationRegistryRc> {
        std::iter::once(ty)
            .chain(ty.ancestors())
            .filter_map(|current| self.get(current))
            .collect()
    }

    /// All registries, in order of type creation
    #[must_use]
    pub fn registries(&self) -> Vec<AnnotationRegistryRc> {
        self.registries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of registries
    #[must_use]
    pub fn len(&self) -> usize {
        self.registries.len()
    }

    /// Returns true if no registry was created yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }
}
