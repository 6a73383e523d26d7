//! # attrscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the attrscope library. Import it to get the builders, the records they produce and
//! the type system needed to describe annotated code.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all attrscope operations
pub use crate::Error;

/// The result type used throughout attrscope
pub use crate::Result;

/// Configuration of diagnostics and the key index
pub use crate::AnnotationConfig;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The framework root holding all shared annotation state
pub use crate::AnnotationContext;

/// Annotation builders and the declaration sites they apply to
pub use crate::metadata::factory::{
    Annotation, ClassAnnotation, DeclarationSite, DefaultsFn, MethodAnnotation,
    ParameterAnnotation, PropertyAnnotation,
};

// ================================================================================================
// Type System
// ================================================================================================

/// Identity tokens
pub use crate::metadata::token::Token;

/// Type handles, declared types and introspection
pub use crate::metadata::typesystem::{
    DeclaredType, DescriptorTable, PrimitiveKind, TypeHandle, TypeIntrospector,
};

// ================================================================================================
// Records and Options
// ================================================================================================

/// Annotation keys and option values
pub use crate::metadata::records::{AnnotationKey, AnnotationOptions, AnnotationValue, NamedValue};

/// Decoration records
pub use crate::metadata::records::{
    ClassRecord, ClassRecordRc, ConstructorParameterRecord, ConstructorParameterRecordRc,
    Decoration, DecorationKind, MemberScope, MethodAttributes, MethodDescriptor, MethodRecord,
    MethodRecordRc, MethodSnapshot, ParameterRecord, ParameterRecordRc, PropertyRecord,
    PropertyRecordRc,
};

// ================================================================================================
// Registries and Hooks
// ================================================================================================

/// Per-type registries, the directory and the key index
pub use crate::metadata::registry::{
    AnnotationRegistry, AnnotationRegistryRc, NamedTypeStore, RegistryDirectory,
};

/// Hook handlers and dispatch
pub use crate::metadata::hooks::{hook, HookDispatcher, HookFn, HookPhase, HookTable};
