//! The framework root.
//!
//! An [`AnnotationContext`] bundles every piece of process-wide state the engine needs: the
//! registry directory, the key index, the global hook tables, the introspector used to resolve
//! declared types, and the configuration. Builders are bound to one context and record into it.
//!
//! Contexts are cheap to clone; clones share the same state. [`AnnotationContext::global`] is the
//! instance annotation code uses by default, while [`AnnotationContext::new`] creates isolated
//! state, which is what tests want.
//!
//! The global instance is either installed once with [`AnnotationContext::init_global`], or
//! created on first use with an empty [`DescriptorTable`] that stays reachable through
//! [`AnnotationContext::descriptors`].

mod config;

pub use config::AnnotationConfig;

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use crate::{
    metadata::{
        hooks::{HookDispatcher, HookTable},
        records::AnnotationKey,
        registry::{AnnotationRegistryRc, NamedTypeStore, RegistryDirectory},
        typesystem::{DescriptorTable, TypeHandle, TypeIntrospector},
    },
    Error, Result,
};

static GLOBAL: OnceLock<AnnotationContext> = OnceLock::new();

/// Process-wide annotation state, shared by all builders created from it.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use std::sync::{Arc, Mutex};
/// use attrscope::prelude::*;
///
/// let ctx = AnnotationContext::new(Arc::new(DescriptorTable::new()));
///
/// let log = Arc::new(Mutex::new(Vec::new()));
/// let sink = log.clone();
/// ctx.set_global_after_handlers(HashMap::from([(
///     AnnotationKey::from("entity"),
///     hook(move |decoration| {
///         sink.lock().unwrap().push(decoration.target().name().to_string());
///         Ok(())
///     }),
/// )]))?;
///
/// let entity = ClassAnnotation::new(&ctx, "entity");
/// entity.apply(&TypeHandle::new("User"), AnnotationOptions::new())?;
/// entity.apply(&TypeHandle::new("Order"), AnnotationOptions::new())?;
///
/// assert_eq!(*log.lock().unwrap(), vec!["User", "Order"]);
/// assert_eq!(ctx.classes_by_key(&"entity".into()).len(), 2);
/// # Ok::<(), attrscope::Error>(())
/// ```
#[derive(Clone)]
pub struct AnnotationContext {
    directory: Arc<RegistryDirectory>,
    named_types: Arc<NamedTypeStore>,
    hooks: Arc<HookDispatcher>,
    introspector: Arc<dyn TypeIntrospector>,
    descriptors: Option<Arc<DescriptorTable>>,
    config: AnnotationConfig,
}

impl AnnotationContext {
    /// Create a context with empty state, resolving declared types through `introspector`
    #[must_use]
    pub fn new(introspector: Arc<dyn TypeIntrospector>) -> Self {
        AnnotationContext {
            directory: Arc::new(RegistryDirectory::new()),
            named_types: Arc::new(NamedTypeStore::new()),
            hooks: Arc::new(HookDispatcher::new()),
            introspector,
            descriptors: None,
            config: AnnotationConfig::default(),
        }
    }

    /// Create a context with empty state, resolving declared types through `table`.
    ///
    /// Unlike [`AnnotationContext::new`], the table stays reachable through
    /// [`AnnotationContext::descriptors`] so it can be filled after the context was built.
    #[must_use]
    pub fn with_descriptors(table: Arc<DescriptorTable>) -> Self {
        AnnotationContext {
            descriptors: Some(table.clone()),
            ..AnnotationContext::new(table)
        }
    }

    /// The process-wide context.
    ///
    /// Returns the context installed by [`AnnotationContext::init_global`], or creates one on
    /// first use with an empty [`DescriptorTable`] and the default configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use attrscope::prelude::*;
    ///
    /// let service = TypeHandle::new("GlobalService");
    /// if let Some(table) = AnnotationContext::global().descriptors() {
    ///     let _ = table.describe(&service).constructor([PrimitiveKind::String.into()]);
    /// }
    /// ```
    pub fn global() -> &'static AnnotationContext {
        GLOBAL.get_or_init(AnnotationContext::default)
    }

    /// Install `context` as the process-wide context.
    ///
    /// # Errors
    /// Returns [`Error::GlobalAlreadyInitialized`] if the global context was already installed
    /// or already created by a call to [`AnnotationContext::global`].
    pub fn init_global(context: AnnotationContext) -> Result<()> {
        GLOBAL
            .set(context)
            .map_err(|_| Error::GlobalAlreadyInitialized)
    }

    /// This context with `config` applied. Builders created earlier keep the old configuration.
    #[must_use]
    pub fn with_config(mut self, config: AnnotationConfig) -> Self {
        self.config = config;
        self
    }

    /// The registry of `ty`, created empty on first access
    #[must_use]
    pub fn registry_for(&self, ty: &TypeHandle) -> AnnotationRegistryRc {
        self.directory.registry_for(ty)
    }

    /// All types carrying a class-level annotation with `key`, in order of first annotation
    #[must_use]
    pub fn classes_by_key(&self, key: &AnnotationKey) -> Vec<TypeHandle> {
        self.named_types.classes_by_key(key)
    }

    /// Replace the global before hooks as a whole
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the hook table lock is poisoned.
    pub fn set_global_before_handlers(&self, handlers: HookTable) -> Result<()> {
        self.hooks.set_global_before(handlers)
    }

    /// Replace the global after hooks as a whole
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the hook table lock is poisoned.
    pub fn set_global_after_handlers(&self, handlers: HookTable) -> Result<()> {
        self.hooks.set_global_after(handlers)
    }

    /// The registry directory
    #[must_use]
    pub fn directory(&self) -> &RegistryDirectory {
        &self.directory
    }

    /// The key index of class-annotated types
    #[must_use]
    pub fn named_types(&self) -> &NamedTypeStore {
        &self.named_types
    }

    /// The hook dispatcher
    #[must_use]
    pub fn hooks(&self) -> &HookDispatcher {
        &self.hooks
    }

    /// The introspector used to resolve declared types
    #[must_use]
    pub fn introspector(&self) -> &dyn TypeIntrospector {
        self.introspector.as_ref()
    }

    /// The descriptor table behind the introspector, if this context was built from one
    #[must_use]
    pub fn descriptors(&self) -> Option<&Arc<DescriptorTable>> {
        self.descriptors.as_ref()
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }
}

impl Default for AnnotationContext {
    fn default() -> Self {
        AnnotationContext::with_descriptors(Arc::new(DescriptorTable::new()))
    }
}

impl fmt::Debug for AnnotationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationContext")
            .field("registries", &self.directory.len())
            .field("keys", &self.named_types.keys())
            .field("hooks", &self.hooks)
            .field("descriptors", &self.descriptors.as_ref().map(|table| table.len()))
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::metadata::{
        factory::ClassAnnotation,
        hooks::hook,
        records::AnnotationOptions,
        typesystem::{DeclaredType, PrimitiveKind},
    };

    #[test]
    fn test_contexts_are_isolated() {
        let a = AnnotationContext::default();
        let b = AnnotationContext::default();
        let ty = TypeHandle::new("Shared");

        ClassAnnotation::new(&a, "k")
            .apply(&ty, AnnotationOptions::new())
            .unwrap();

        assert_eq!(a.registry_for(&ty).classes().len(), 1);
        assert!(b.registry_for(&ty).classes().is_empty());
        assert!(b.classes_by_key(&"k".into()).is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let ctx = AnnotationContext::default();
        let clone = ctx.clone();
        let ty = TypeHandle::new("T");

        assert!(Arc::ptr_eq(&ctx.registry_for(&ty), &clone.registry_for(&ty)));

        clone
            .set_global_before_handlers(HashMap::from([(
                AnnotationKey::from("k"),
                hook(|_| Ok(())),
            )]))
            .unwrap();
        assert!(ctx
            .hooks()
            .global(crate::metadata::hooks::HookPhase::Before, &"k".into())
            .is_some());
    }

    #[test]
    fn test_global_is_one_instance() {
        let first = AnnotationContext::global();
        let second = AnnotationContext::global();
        assert!(std::ptr::eq(first, second));
        assert!(first.config().enable_named_type_index);
    }

    #[test]
    fn test_global_resolves_described_types() {
        let ctx = AnnotationContext::global();
        let service = TypeHandle::new("GlobalService");

        let table = ctx.descriptors().unwrap();
        let _ = table
            .describe(&service)
            .constructor([PrimitiveKind::String.into()]);

        let record = ClassAnnotation::new(ctx, "global-service")
            .apply(&service, AnnotationOptions::new())
            .unwrap();
        assert_eq!(
            record.constructor_parameter_types,
            vec![DeclaredType::Primitive(PrimitiveKind::String)]
        );
        assert!(AnnotationContext::init_global(AnnotationContext::default()).is_err());
    }

    #[test]
    fn test_new_has_no_descriptors() {
        let ctx = AnnotationContext::new(Arc::new(DescriptorTable::new()));
        assert!(ctx.descriptors().is_none());
        assert!(AnnotationContext::default().descriptors().is_some());
    }
}
