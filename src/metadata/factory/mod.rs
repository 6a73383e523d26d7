//! Annotation builders.
//!
//! A builder binds an [`AnnotationKey`](crate::metadata::records::AnnotationKey) to an
//! [`AnnotationContext`](crate::AnnotationContext), optionally together with per-family before
//! and after hooks and a defaults provider. It is built once and applied any number of times,
//! once per declaration site carrying the annotation.
//!
//! # Builders
//!
//! - [`ClassAnnotation`] - types
//! - [`PropertyAnnotation`] - properties
//! - [`MethodAnnotation`] - methods
//! - [`ParameterAnnotation`] - method parameters, or constructor parameters without a member
//! - [`Annotation`] - any of the above, routed by [`DeclarationSite`]
//!
//! # Effect of one application
//!
//! 1. Declared types are resolved through the context's
//!    [`TypeIntrospector`](crate::metadata::typesystem::TypeIntrospector)
//! 2. Default options are computed and the explicit options merged over them
//! 3. The record is built
//! 4. The hook sequence of [`HookDispatcher`](crate::metadata::hooks::HookDispatcher) runs around
//!    the insertion into the type's registry
//! 5. For class-level annotations the type is registered under the key in the
//!    [`NamedTypeStore`](crate::metadata::registry::NamedTypeStore)

mod class;
mod composite;
mod family;
mod member;
mod site;

pub use class::ClassAnnotation;
pub use composite::Annotation;
pub use family::DefaultsFn;
pub use member::{MethodAnnotation, ParameterAnnotation, PropertyAnnotation};
pub use site::DeclarationSite;
