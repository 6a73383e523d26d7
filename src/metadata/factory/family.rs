use std::sync::Arc;

use crate::{
    metadata::{
        factory::DeclarationSite,
        hooks::{HookFn, SiteHooks},
        records::{
            AnnotationKey, AnnotationOptions, ClassRecord, ClassRecordRc,
            ConstructorParameterRecord, ConstructorParameterRecordRc, Decoration, MemberScope,
            MethodDescriptor, MethodRecord, MethodRecordRc, ParameterRecord, ParameterRecordRc,
            PropertyRecord, PropertyRecordRc,
        },
        typesystem::{DeclaredType, TypeHandle},
    },
    AnnotationContext, Result,
};

/// Computes default options for an annotation from the site it is applied to
pub type DefaultsFn =
    Arc<dyn Fn(&TypeHandle, &DeclarationSite) -> AnnotationOptions + Send + Sync>;

/// State shared by every builder: the key, the site hooks and the defaults provider, bound to
/// one [`AnnotationContext`].
#[derive(Clone)]
pub(crate) struct AnnotationFamily {
    context: AnnotationContext,
    key: AnnotationKey,
    hooks: SiteHooks,
    defaults: Option<DefaultsFn>,
}

impl AnnotationFamily {
    pub(crate) fn new(context: &AnnotationContext, key: AnnotationKey) -> Self {
        AnnotationFamily {
            context: context.clone(),
            key,
            hooks: SiteHooks::default(),
            defaults: None,
        }
    }

    pub(crate) fn key(&self) -> &AnnotationKey {
        &self.key
    }

    pub(crate) fn set_before(&mut self, handler: HookFn) {
        self.hooks.before = Some(handler);
    }

    pub(crate) fn set_after(&mut self, handler: HookFn) {
        self.hooks.after = Some(handler);
    }

    pub(crate) fn set_defaults(&mut self, defaults: DefaultsFn) {
        self.defaults = Some(defaults);
    }

    /// Annotate any site, returning the record the call produced
    pub(crate) fn annotate(
        &self,
        ty: &TypeHandle,
        site: &DeclarationSite,
        options: AnnotationOptions,
    ) -> Result<Decoration> {
        Ok(match site {
            DeclarationSite::Type => Decoration::Class(self.annotate_type(ty, options)?),
            DeclarationSite::ConstructorParameter { index } => Decoration::ConstructorParameter(
                self.annotate_constructor_parameter(ty, *index, options)?,
            ),
            DeclarationSite::Property { member, scope } => {
                Decoration::Property(self.annotate_property(ty, member, *scope, options)?)
            }
            DeclarationSite::Method {
                member,
                scope,
                descriptor,
            } => Decoration::Method(self.annotate_method(ty, member, *scope, *descriptor, options)?),
            DeclarationSite::Parameter {
                member,
                scope,
                index,
            } => Decoration::Parameter(self.annotate_parameter(ty, member, *scope, *index, options)?),
        })
    }

    #[tracing::instrument(level = "debug", skip_all, fields(key = %self.key, ty = %ty))]
    pub(crate) fn annotate_type(
        &self,
        ty: &TypeHandle,
        options: AnnotationOptions,
    ) -> Result<ClassRecordRc> {
        let options = self.resolve_options(ty, &DeclarationSite::Type, options);
        let constructor_types = self
            .context
            .introspector()
            .declared_constructor_parameter_types(ty);

        let record = Arc::new(ClassRecord::new(
            ty.clone(),
            options,
            self.key.clone(),
            constructor_types,
        ));

        let registry = self.context.registry_for(ty);
        // Registry and key index are written together, before any after hook runs
        self.dispatch(&Decoration::Class(record.clone()), || {
            registry.add_class(record.clone());
            if self.context.config().enable_named_type_index
                && self.context.named_types().register(&self.key, ty)
                && self.tracing_enabled()
            {
                tracing::debug!(key = %self.key, ty = %ty, "type registered under key");
            }
            Ok(())
        })?;

        Ok(record)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(key = %self.key, ty = %ty, index = index))]
    pub(crate) fn annotate_constructor_parameter(
        &self,
        ty: &TypeHandle,
        index: usize,
        options: AnnotationOptions,
    ) -> Result<ConstructorParameterRecordRc> {
        let options =
            self.resolve_options(ty, &DeclarationSite::ConstructorParameter { index }, options);
        let parameter_types = self
            .context
            .introspector()
            .declared_constructor_parameter_types(ty);
        self.check_index(ty, "constructor", index, &parameter_types);

        let record = Arc::new(ConstructorParameterRecord::new(
            ty.clone(),
            index,
            options,
            parameter_types,
            self.key.clone(),
        ));

        let registry = self.context.registry_for(ty);
        self.dispatch(&Decoration::ConstructorParameter(record.clone()), || {
            registry.add_constructor_parameter(record.clone());
            Ok(())
        })?;

        Ok(record)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(key = %self.key, ty = %ty, member = member))]
    pub(crate) fn annotate_property(
        &self,
        ty: &TypeHandle,
        member: &str,
        scope: MemberScope,
        options: AnnotationOptions,
    ) -> Result<PropertyRecordRc> {
        let site = DeclarationSite::Property {
            member: member.to_string(),
            scope,
        };
        let options = self.resolve_options(ty, &site, options);
        let declared_type = self.context.introspector().declared_property_type(ty, member);

        let record = Arc::new(PropertyRecord::new(
            member.to_string(),
            scope,
            ty.clone(),
            options,
            declared_type,
            self.key.clone(),
        ));

        let registry = self.context.registry_for(ty);
        self.dispatch(&Decoration::Property(record.clone()), || {
            registry.add_property(record.clone());
            Ok(())
        })?;

        Ok(record)
    }

    /// Returns the member's merged record, not the detached one handed to hooks
    #[tracing::instrument(level = "debug", skip_all, fields(key = %self.key, ty = %ty, member = member))]
    pub(crate) fn annotate_method(
        &self,
        ty: &TypeHandle,
        member: &str,
        scope: MemberScope,
        descriptor: MethodDescriptor,
        options: AnnotationOptions,
    ) -> Result<MethodRecordRc> {
        let site = DeclarationSite::Method {
            member: member.to_string(),
            scope,
            descriptor,
        };
        let options = self.resolve_options(ty, &site, options);
        let introspector = self.context.introspector();
        let return_type = introspector.declared_return_type(ty, member);
        let param_types = introspector.declared_parameter_types(ty, member);

        let declared = Arc::new(MethodRecord::declared(
            member.to_string(),
            ty.clone(),
            scope,
            descriptor,
            options,
            return_type,
            param_types,
            self.key.clone(),
        ));

        let registry = self.context.registry_for(ty);
        let mut merged = None;
        self.dispatch(&Decoration::Method(declared.clone()), || {
            merged = Some(registry.add_method(&declared)?);
            Ok(())
        })?;

        Ok(merged.unwrap_or(declared))
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(key = %self.key, ty = %ty, member = member, index = index)
    )]
    pub(crate) fn annotate_parameter(
        &self,
        ty: &TypeHandle,
        member: &str,
        scope: MemberScope,
        index: usize,
        options: AnnotationOptions,
    ) -> Result<ParameterRecordRc> {
        let site = DeclarationSite::Parameter {
            member: member.to_string(),
            scope,
            index,
        };
        let options = self.resolve_options(ty, &site, options);
        let parameter_types = self.context.introspector().declared_parameter_types(ty, member);
        self.check_index(ty, member, index, &parameter_types);

        let record = Arc::new(ParameterRecord::new(
            scope,
            ty.clone(),
            member.to_string(),
            index,
            options,
            parameter_types,
            self.key.clone(),
        ));

        let registry = self.context.registry_for(ty);
        self.dispatch(&Decoration::Parameter(record.clone()), || {
            registry.add_method_parameter(record.clone())?;
            Ok(())
        })?;

        Ok(record)
    }

    /// Explicit options merged over the family's defaults for `site`
    fn resolve_options(
        &self,
        ty: &TypeHandle,
        site: &DeclarationSite,
        explicit: AnnotationOptions,
    ) -> AnnotationOptions {
        match &self.defaults {
            Some(defaults) => explicit.merged_over(&defaults(ty, site)),
            None => explicit,
        }
    }

    fn dispatch<F>(&self, decoration: &Decoration, insert: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        let trace = self.tracing_enabled();
        self.context
            .hooks()
            .dispatch(&self.key, &self.hooks, decoration, trace, || {
                insert()?;
                if trace {
                    tracing::debug!(
                        key = %self.key,
                        ty = %decoration.target(),
                        kind = %decoration.kind(),
                        member = decoration.member(),
                        "record inserted"
                    );
                }
                Ok(())
            })
    }

    /// Warns about an index beyond the known parameters; the annotation is still recorded
    fn check_index(&self, ty: &TypeHandle, member: &str, index: usize, known: &[DeclaredType]) {
        if self.context.config().enable_index_validation
            && self.tracing_enabled()
            && !known.is_empty()
            && index >= known.len()
        {
            tracing::warn!(
                key = %self.key,
                ty = %ty,
                member,
                index,
                declared = known.len(),
                "parameter index beyond declared parameters"
            );
        }
    }

    fn tracing_enabled(&self) -> bool {
        self.context.config().enable_event_tracing
    }
}

impl std::fmt::Debug for AnnotationFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationFamily")
            .field("key", &self.key)
            .field("hooks", &self.hooks)
            .field("defaults", &self.defaults.is_some())
            .finish()
    }
}

/// Implements the configuration methods every builder shares
macro_rules! family_builder {
    ($builder:ident) => {
        impl $builder {
            /// The annotation key of this family
            #[must_use]
            pub fn key(&self) -> &$crate::metadata::records::AnnotationKey {
                self.family.key()
            }

            /// Hook run before each record of this family is inserted
            #[must_use]
            pub fn before<F>(mut self, handler: F) -> Self
            where
                F: Fn(&$crate::metadata::records::Decoration) -> $crate::Result<()>
                    + Send
                    + Sync
                    + 'static,
            {
                self.family.set_before($crate::metadata::hooks::hook(handler));
                self
            }

            /// Hook run after each record of this family was inserted
            #[must_use]
            pub fn after<F>(mut self, handler: F) -> Self
            where
                F: Fn(&$crate::metadata::records::Decoration) -> $crate::Result<()>
                    + Send
                    + Sync
                    + 'static,
            {
                self.family.set_after($crate::metadata::hooks::hook(handler));
                self
            }

            /// Default options, computed per site; explicitly passed options take precedence
            #[must_use]
            pub fn defaults<F>(mut self, provider: F) -> Self
            where
                F: Fn(
                        &$crate::metadata::typesystem::TypeHandle,
                        &$crate::metadata::factory::DeclarationSite,
                    ) -> $crate::metadata::records::AnnotationOptions
                    + Send
                    + Sync
                    + 'static,
            {
                self.family.set_defaults(std::sync::Arc::new(provider));
                self
            }
        }
    };
}

pub(crate) use family_builder;
