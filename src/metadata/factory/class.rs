use crate::{
    metadata::{
        factory::family::{family_builder, AnnotationFamily},
        records::{AnnotationKey, AnnotationOptions, ClassRecordRc},
        typesystem::TypeHandle,
    },
    AnnotationContext, Result,
};

/// Builder for class-level annotations.
///
/// Each [`apply`](ClassAnnotation::apply) stores a new [`ClassRecord`](crate::metadata::records::ClassRecord)
/// in the type's registry, carrying the constructor parameter types reported by the
/// introspector, and registers the type under the key for
/// [`AnnotationContext::classes_by_key`] lookups.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use attrscope::prelude::*;
///
/// let ctx = AnnotationContext::new(Arc::new(DescriptorTable::new()));
/// let controller = ClassAnnotation::new(&ctx, "controller");
///
/// let users = TypeHandle::new("UsersController");
/// controller.apply(&users, AnnotationOptions::new().with("path", "/users"))?;
///
/// assert_eq!(ctx.classes_by_key(&"controller".into()), vec![users.clone()]);
/// assert_eq!(ctx.registry_for(&users).classes().len(), 1);
/// # Ok::<(), attrscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClassAnnotation {
    family: AnnotationFamily,
}

impl ClassAnnotation {
    /// Create a builder for `key`, recording into `context`
    #[must_use]
    pub fn new(context: &AnnotationContext, key: impl Into<AnnotationKey>) -> Self {
        ClassAnnotation {
            family: AnnotationFamily::new(context, key.into()),
        }
    }

    /// Annotate `ty`
    ///
    /// # Errors
    /// Returns the error of a failing hook. The record is not inserted if a before hook failed.
    pub fn apply(&self, ty: &TypeHandle, options: AnnotationOptions) -> Result<ClassRecordRc> {
        self.family.annotate_type(ty, options)
    }
}

family_builder!(ClassAnnotation);

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::{
        metadata::typesystem::{DeclaredType, DescriptorTable, PrimitiveKind},
        AnnotationConfig,
    };

    #[test]
    fn test_constructor_types_are_resolved() {
        let table = Arc::new(DescriptorTable::new());
        let logger = TypeHandle::new("Logger");
        let service = TypeHandle::new("Service");
        let _ = table
            .describe(&service)
            .constructor([DeclaredType::from(&logger), PrimitiveKind::U16.into()]);

        let ctx = AnnotationContext::new(table);
        let record = ClassAnnotation::new(&ctx, "injectable")
            .apply(&service, AnnotationOptions::new())
            .unwrap();

        assert_eq!(
            record.constructor_parameter_types,
            vec![DeclaredType::Type(logger), PrimitiveKind::U16.into()]
        );
        assert_eq!(record.key, AnnotationKey::from("injectable"));
    }

    #[test]
    fn test_defaults_merge_under_explicit() {
        let ctx = AnnotationContext::new(Arc::new(DescriptorTable::new()));
        let entity = ClassAnnotation::new(&ctx, "entity").defaults(|ty, _| {
            AnnotationOptions::new()
                .with("table", ty.name().to_lowercase())
                .with("schema", "public")
        });

        let user = TypeHandle::new("User");
        let record = entity
            .apply(&user, AnnotationOptions::new().with("schema", "auth"))
            .unwrap();

        assert_eq!(record.options.get("table").and_then(|v| v.as_str()), Some("user"));
        assert_eq!(record.options.get("schema").and_then(|v| v.as_str()), Some("auth"));
    }

    #[test]
    fn test_named_index_can_be_disabled() {
        let ctx = AnnotationContext::new(Arc::new(DescriptorTable::new()))
            .with_config(AnnotationConfig::disabled());
        let ty = TypeHandle::new("Hidden");
        ClassAnnotation::new(&ctx, "hidden")
            .apply(&ty, AnnotationOptions::new())
            .unwrap();

        assert!(ctx.classes_by_key(&"hidden".into()).is_empty());
        assert_eq!(ctx.registry_for(&ty).classes().len(), 1);
    }

    #[test]
    fn test_after_hook_sees_inserted_record() {
        let ctx = AnnotationContext::new(Arc::new(DescriptorTable::new()));
        let seen = Arc::new(AtomicUsize::new(0));

        let observer_ctx = ctx.clone();
        let observer_seen = seen.clone();
        let marker = ClassAnnotation::new(&ctx, "marker").after(move |decoration| {
            let registry = observer_ctx.registry_for(decoration.target());
            observer_seen.store(registry.classes().len(), Ordering::SeqCst);
            Ok(())
        });

        marker
            .apply(&TypeHandle::new("Observed"), AnnotationOptions::new())
            .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(marker.key().as_str(), "marker");
    }
}
