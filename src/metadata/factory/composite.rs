use crate::{
    metadata::{
        factory::{
            family::{family_builder, AnnotationFamily},
            DeclarationSite,
        },
        records::{AnnotationKey, AnnotationOptions, Decoration, MemberScope, MethodDescriptor},
        typesystem::TypeHandle,
    },
    AnnotationContext, Result,
};

/// Builder for annotations usable at any declaration site.
///
/// One definition serves types, constructor parameters, properties, methods and method
/// parameters. The caller names the site through [`Annotation::apply`], or hands over the
/// optional pieces it has through [`Annotation::apply_shape`] and lets
/// [`DeclarationSite::from_shape`] route the call.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use attrscope::prelude::*;
///
/// let ctx = AnnotationContext::new(Arc::new(DescriptorTable::new()));
/// let meta = Annotation::new(&ctx, "meta");
/// let ty = TypeHandle::new("Order");
///
/// meta.apply(&ty, &DeclarationSite::Type, AnnotationOptions::new())?;
/// meta.apply_shape(&ty, Some("total"), MemberScope::Instance, None, None, AnnotationOptions::new())?;
/// meta.apply_shape(&ty, None, MemberScope::Instance, Some(0), None, AnnotationOptions::new())?;
///
/// let registry = ctx.registry_for(&ty);
/// assert_eq!(registry.classes().len(), 1);
/// assert_eq!(registry.properties().len(), 1);
/// assert_eq!(registry.constructors().len(), 1);
/// # Ok::<(), attrscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Annotation {
    family: AnnotationFamily,
}

impl Annotation {
    /// Create a builder for `key`, recording into `context`
    #[must_use]
    pub fn new(context: &AnnotationContext, key: impl Into<AnnotationKey>) -> Self {
        Annotation {
            family: AnnotationFamily::new(context, key.into()),
        }
    }

    /// Annotate `site` of `ty`.
    ///
    /// Method sites return the member's merged record; every other site returns the record the
    /// call created.
    ///
    /// # Errors
    /// Returns the error of a failing hook, or [`crate::Error::LockError`] if a method record is
    /// poisoned.
    pub fn apply(
        &self,
        ty: &TypeHandle,
        site: &DeclarationSite,
        options: AnnotationOptions,
    ) -> Result<Decoration> {
        self.family.annotate(ty, site, options)
    }

    /// Annotate the site described by the supplied pieces, see [`DeclarationSite::from_shape`]
    ///
    /// # Errors
    /// Same as [`Annotation::apply`].
    pub fn apply_shape(
        &self,
        ty: &TypeHandle,
        member: Option<&str>,
        scope: MemberScope,
        index: Option<usize>,
        descriptor: Option<MethodDescriptor>,
        options: AnnotationOptions,
    ) -> Result<Decoration> {
        let site = DeclarationSite::from_shape(member, scope, index, descriptor);
        self.family.annotate(ty, &site, options)
    }
}

family_builder!(Annotation);

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::metadata::{
        records::{DecorationKind, MethodAttributes},
        typesystem::DescriptorTable,
    };

    #[test]
    fn test_all_shapes_routed() {
        let ctx = AnnotationContext::new(Arc::new(DescriptorTable::new()));
        let kinds = Arc::new(Mutex::new(Vec::new()));
        let seen = kinds.clone();
        let any = Annotation::new(&ctx, "any").before(move |decoration| {
            seen.lock().unwrap().push(decoration.kind());
            Ok(())
        });

        let ty = TypeHandle::new("Everything");
        let scope = MemberScope::Instance;
        let descriptor = MethodDescriptor::new(MethodAttributes::empty());
        let none = AnnotationOptions::new;

        any.apply_shape(&ty, None, scope, None, None, none()).unwrap();
        any.apply_shape(&ty, None, scope, Some(1), None, none()).unwrap();
        any.apply_shape(&ty, Some("name"), scope, None, None, none()).unwrap();
        any.apply_shape(&ty, Some("run"), scope, None, Some(descriptor), none())
            .unwrap();
        any.apply_shape(&ty, Some("run"), scope, Some(1), None, none()).unwrap();

        assert_eq!(
            *kinds.lock().unwrap(),
            vec![
                DecorationKind::Class,
                DecorationKind::ConstructorParameter,
                DecorationKind::Property,
                DecorationKind::Method,
                DecorationKind::Parameter,
            ]
        );

        let registry = ctx.registry_for(&ty);
        assert_eq!(registry.classes().len(), 1);
        assert_eq!(registry.constructors().len(), 1);
        assert_eq!(registry.properties().len(), 1);
        assert_eq!(registry.methods().len(), 1);
        assert_eq!(registry.method("run").unwrap().parameter_count(), 1);
    }

    #[test]
    fn test_defaults_see_the_site() {
        let ctx = AnnotationContext::new(Arc::new(DescriptorTable::new()));
        let doc = Annotation::new(&ctx, "doc").defaults(|_, site| {
            AnnotationOptions::new().with("site", site.kind().to_string())
        });

        let ty = TypeHandle::new("Documented");
        let decoration = doc
            .apply(
                &ty,
                &DeclarationSite::Property {
                    member: "id".to_string(),
                    scope: MemberScope::Instance,
                },
                AnnotationOptions::new(),
            )
            .unwrap();

        assert_eq!(
            decoration.options().get("site").and_then(|v| v.as_str()),
            Some("property")
        );
    }
}
