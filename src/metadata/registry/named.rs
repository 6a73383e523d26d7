use dashmap::{DashMap, DashSet};

use crate::metadata::{records::AnnotationKey, typesystem::TypeHandle};

/// Index from annotation key to the types carrying a class-level annotation with that key.
///
/// Membership is a set: registering the same type twice under one key keeps a single entry.
/// Types are listed in order of their first registration.
#[derive(Default)]
pub struct NamedTypeStore {
    types_by_key: DashMap<AnnotationKey, Vec<TypeHandle>>,
    members: DashSet<(AnnotationKey, TypeHandle)>,
}

impl NamedTypeStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `ty` carries a class-level annotation with `key`.
    ///
    /// Returns `true` if the type was not yet known under this key.
    pub fn register(&self, key: &AnnotationKey, ty: &TypeHandle) -> bool {
        let mut types = self.types_by_key.entry(key.clone()).or_default();
        if !self.members.insert((key.clone(), ty.clone())) {
            return false;
        }

        types.push(ty.clone());
        true
    }

    /// All types annotated with `key`, empty if the key was never used
    #[must_use]
    pub fn classes_by_key(&self, key: &AnnotationKey) -> Vec<TypeHandle> {
        self.types_by_key
            .get(key)
            .map(|types| types.value().clone())
            .unwrap_or_default()
    }

    /// Returns true if `ty` is registered under `key`
    #[must_use]
    pub fn contains(&self, key: &AnnotationKey, ty: &TypeHandle) -> bool {
        self.members.contains(&(key.clone(), ty.clone()))
    }

    /// All keys with at least one registered type, sorted
    #[must_use]
    pub fn keys(&self) -> Vec<AnnotationKey> {
        let mut keys: Vec<AnnotationKey> = self
            .types_by_key
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    /// Number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.types_by_key.len()
    }

    /// Returns true if no type was registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types_by_key.is_empty()
    }
}
