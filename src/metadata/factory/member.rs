use crate::{
    metadata::{
        factory::family::{family_builder, AnnotationFamily},
        records::{
            AnnotationKey, AnnotationOptions, ConstructorParameterRecordRc, Decoration,
            MemberScope, MethodDescriptor, MethodRecordRc, PropertyRecordRc,
        },
        typesystem::TypeHandle,
    },
    AnnotationContext, Result,
};

/// Builder for property annotations.
///
/// The declared type of the property is looked up through the context's introspector and
/// stored on the [`PropertyRecord`](crate::metadata::records::PropertyRecord).
#[derive(Debug, Clone)]
pub struct PropertyAnnotation {
    family: AnnotationFamily,
}

impl PropertyAnnotation {
    /// Create a builder for `key`, recording into `context`
    #[must_use]
    pub fn new(context: &AnnotationContext, key: impl Into<AnnotationKey>) -> Self {
        PropertyAnnotation {
            family: AnnotationFamily::new(context, key.into()),
        }
    }

    /// Annotate property `member` of `ty`
    ///
    /// # Errors
    /// Returns the error of a failing hook.
    pub fn apply(
        &self,
        ty: &TypeHandle,
        member: &str,
        scope: MemberScope,
        options: AnnotationOptions,
    ) -> Result<PropertyRecordRc> {
        self.family.annotate_property(ty, member, scope, options)
    }
}

family_builder!(PropertyAnnotation);

/// Builder for method-level annotations.
///
/// Applying the annotation replaces the method-level facts (descriptor, options, return and
/// parameter types, key) of the member's [`MethodRecord`](crate::metadata::records::MethodRecord),
/// creating the record if no annotation touched the member before. Parameter annotations
/// already attached to the member are kept.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use attrscope::prelude::*;
///
/// let ctx = AnnotationContext::new(Arc::new(DescriptorTable::new()));
/// let get = MethodAnnotation::new(&ctx, "get");
/// let param = ParameterAnnotation::new(&ctx, "param");
///
/// let users = TypeHandle::new("UsersController");
/// param.apply(&users, Some("show"), MemberScope::Instance, 0, AnnotationOptions::new())?;
/// let record = get.apply(
///     &users,
///     "show",
///     MemberScope::Instance,
///     MethodDescriptor::new(MethodAttributes::empty()),
///     AnnotationOptions::new().with_arg("/users/:id"),
/// )?;
///
/// assert_eq!(record.parameter_count(), 1);
/// assert_eq!(ctx.registry_for(&users).methods().len(), 1);
/// # Ok::<(), attrscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MethodAnnotation {
    family: AnnotationFamily,
}

impl MethodAnnotation {
    /// Create a builder for `key`, recording into `context`
    #[must_use]
    pub fn new(context: &AnnotationContext, key: impl Into<AnnotationKey>) -> Self {
        MethodAnnotation {
            family: AnnotationFamily::new(context, key.into()),
        }
    }

    /// Annotate method `member` of `ty`, returning the member's merged record
    ///
    /// # Errors
    /// Returns the error of a failing hook, or [`crate::Error::LockError`] if the member's
    /// record is poisoned.
    pub fn apply(
        &self,
        ty: &TypeHandle,
        member: &str,
        scope: MemberScope,
        descriptor: MethodDescriptor,
        options: AnnotationOptions,
    ) -> Result<MethodRecordRc> {
        self.family
            .annotate_method(ty, member, scope, descriptor, options)
    }
}

family_builder!(MethodAnnotation);

/// Builder for parameter annotations.
///
/// With a member name the annotation targets a method parameter and is attached to that
/// method's [`MethodRecord`](crate::metadata::records::MethodRecord). Without one it targets a
/// constructor parameter and lands in the registry's constructor set instead.
#[derive(Debug, Clone)]
pub struct ParameterAnnotation {
    family: AnnotationFamily,
}

impl ParameterAnnotation {
    /// Create a builder for `key`, recording into `context`
    #[must_use]
    pub fn new(context: &AnnotationContext, key: impl Into<AnnotationKey>) -> Self {
        ParameterAnnotation {
            family: AnnotationFamily::new(context, key.into()),
        }
    }

    /// Annotate parameter `index` of method `member`, or of the constructor when `member` is
    /// `None`.
    ///
    /// Returns a [`Decoration::Parameter`] or a [`Decoration::ConstructorParameter`].
    ///
    /// # Errors
    /// Returns the error of a failing hook, or [`crate::Error::LockError`] if the owning
    /// method's record is poisoned.
    pub fn apply(
        &self,
        ty: &TypeHandle,
        member: Option<&str>,
        scope: MemberScope,
        index: usize,
        options: AnnotationOptions,
    ) -> Result<Decoration> {
        match member {
            Some(member) => Ok(Decoration::Parameter(
                self.family
                    .annotate_parameter(ty, member, scope, index, options)?,
            )),
            None => Ok(Decoration::ConstructorParameter(
                self.apply_constructor(ty, index, options)?,
            )),
        }
    }

    /// Annotate parameter `index` of the constructor of `ty`
    ///
    /// # Errors
    /// Returns the error of a failing hook.
    pub fn apply_constructor(
        &self,
        ty: &TypeHandle,
        index: usize,
        options: AnnotationOptions,
    ) -> Result<ConstructorParameterRecordRc> {
        self.family
            .annotate_constructor_parameter(ty, index, options)
    }
}

family_builder!(ParameterAnnotation);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::{
        records::{DecorationKind, MethodAttributes},
        typesystem::{DeclaredType, DescriptorTable, PrimitiveKind},
    };

    fn context() -> (AnnotationContext, TypeHandle) {
        let table = Arc::new(DescriptorTable::new());
        let ty = TypeHandle::new("Account");
        let _ = table
            .describe(&ty)
            .constructor([PrimitiveKind::String.into()])
            .property("balance", PrimitiveKind::I64)
            .method(
                "deposit",
                [PrimitiveKind::I64.into(), PrimitiveKind::String.into()],
                Some(PrimitiveKind::Bool.into()),
            );
        (AnnotationContext::new(table), ty)
    }

    #[test]
    fn test_property_declared_type() {
        let (ctx, ty) = context();
        let record = PropertyAnnotation::new(&ctx, "column")
            .apply(&ty, "balance", MemberScope::Instance, AnnotationOptions::new())
            .unwrap();

        assert_eq!(record.declared_type, Some(PrimitiveKind::I64.into()));
        assert_eq!(ctx.registry_for(&ty).property("balance").len(), 1);

        let unknown = PropertyAnnotation::new(&ctx, "column")
            .apply(&ty, "missing", MemberScope::Static, AnnotationOptions::new())
            .unwrap();
        assert!(unknown.declared_type.is_none());
        assert_eq!(unknown.scope, MemberScope::Static);
    }

    #[test]
    fn test_method_types_resolved() {
        let (ctx, ty) = context();
        let descriptor = MethodDescriptor::new(MethodAttributes::ASYNC);
        let record = MethodAnnotation::new(&ctx, "transactional")
            .apply(&ty, "deposit", MemberScope::Instance, descriptor, AnnotationOptions::new())
            .unwrap();

        assert_eq!(record.descriptor(), Some(descriptor));
        assert_eq!(record.return_type(), Some(PrimitiveKind::Bool.into()));
        assert_eq!(
            record.param_types(),
            vec![
                DeclaredType::Primitive(PrimitiveKind::I64),
                DeclaredType::Primitive(PrimitiveKind::String)
            ]
        );
    }

    #[test]
    fn test_parameter_routing() {
        let (ctx, ty) = context();
        let inject = ParameterAnnotation::new(&ctx, "inject");

        let ctor = inject
            .apply(&ty, None, MemberScope::Instance, 0, AnnotationOptions::new())
            .unwrap();
        let param = inject
            .apply(&ty, Some("deposit"), MemberScope::Instance, 0, AnnotationOptions::new())
            .unwrap();

        assert_eq!(ctor.kind(), DecorationKind::ConstructorParameter);
        assert_eq!(param.kind(), DecorationKind::Parameter);

        let registry = ctx.registry_for(&ty);
        assert_eq!(registry.constructors().len(), 1);
        assert_eq!(registry.constructors()[0].parameter_type(), Some(&DeclaredType::Primitive(PrimitiveKind::String)));

        let method = registry.method("deposit").unwrap();
        assert_eq!(method.parameter_count(), 1);
        assert!(method.descriptor().is_none());
        assert_eq!(
            method.parameters()[0].parameter_type(),
            Some(&DeclaredType::Primitive(PrimitiveKind::I64))
        );
    }

    #[test]
    fn test_out_of_range_index_is_recorded() {
        let (ctx, ty) = context();
        let record = ParameterAnnotation::new(&ctx, "inject")
            .apply_constructor(&ty, 5, AnnotationOptions::new())
            .unwrap();

        assert!(record.parameter_type().is_none());
        assert_eq!(ctx.registry_for(&ty).constructors().len(), 1);
    }
}
