//! Decoration records: the atomic facts produced by applying an annotation.
//!
//! Every annotation application produces exactly one record, whose kind depends on the
//! declaration site it was applied to:
//!
//! | Site | Record | Stored in |
//! |------|--------|-----------|
//! | type | [`ClassRecord`] | `classes` |
//! | constructor parameter | [`ConstructorParameterRecord`] | `constructors` |
//! | property | [`PropertyRecord`] | `properties` |
//! | method | [`MethodRecord`] (merged) | `methods` |
//! | method parameter | [`ParameterRecord`] | inside the owning [`MethodRecord`] |
//!
//! All records except [`MethodRecord`] are immutable once built. Records are compared by
//! reference identity (`Arc::ptr_eq`), never by content: applying the same annotation twice
//! yields two records.

mod class;
mod member;
mod method;
mod options;

pub use class::{
    ClassRecord, ClassRecordRc, ConstructorParameterRecord, ConstructorParameterRecordRc,
};
pub use member::{ParameterRecord, ParameterRecordRc, PropertyRecord, PropertyRecordRc};
pub use method::{
    MethodAttributes, MethodDescriptor, MethodRecord, MethodRecordRc, MethodSnapshot,
};
pub use options::{AnnotationKey, AnnotationOptions, AnnotationValue, NamedValue};

use strum::Display;

use crate::metadata::typesystem::TypeHandle;

/// Owner of an annotated member: instances of the type, or the type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MemberScope {
    /// Member is accessed through an instance (`&self` methods, struct fields)
    #[default]
    Instance,
    /// Member belongs to the type (associated functions and constants)
    Static,
}

/// The kind of a decoration record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DecorationKind {
    /// [`ClassRecord`]
    Class,
    /// [`ConstructorParameterRecord`]
    ConstructorParameter,
    /// [`PropertyRecord`]
    Property,
    /// [`MethodRecord`]
    Method,
    /// [`ParameterRecord`]
    Parameter,
}

/// A freshly built record, as handed to hooks around its insertion.
///
/// For method-level annotations the record is the detached [`MethodRecord`] describing this one
/// annotation; the registry merges its facts into the member's aggregate record.
#[derive(Debug, Clone)]
pub enum Decoration {
    /// Class-level annotation
    Class(ClassRecordRc),
    /// Constructor parameter annotation
    ConstructorParameter(ConstructorParameterRecordRc),
    /// Property annotation
    Property(PropertyRecordRc),
    /// Method-level annotation
    Method(MethodRecordRc),
    /// Method parameter annotation
    Parameter(ParameterRecordRc),
}

impl Decoration {
    /// The kind of the wrapped record
    #[must_use]
    pub fn kind(&self) -> DecorationKind {
        match self {
            Decoration::Class(_) => DecorationKind::Class,
            Decoration::ConstructorParameter(_) => DecorationKind::ConstructorParameter,
            Decoration::Property(_) => DecorationKind::Property,
            Decoration::Method(_) => DecorationKind::Method,
            Decoration::Parameter(_) => DecorationKind::Parameter,
        }
    }

    /// The annotated type
    #[must_use]
    pub fn target(&self) -> &TypeHandle {
        match self {
            Decoration::Class(record) => &record.target,
            Decoration::ConstructorParameter(record) => &record.target,
            Decoration::Property(record) => &record.target,
            Decoration::Method(record) => &record.target,
            Decoration::Parameter(record) => &record.target,
        }
    }

    /// The annotated member, `None` for class and constructor parameter records
    #[must_use]
    pub fn member(&self) -> Option<&str> {
        match self {
            Decoration::Class(_) | Decoration::ConstructorParameter(_) => None,
            Decoration::Property(record) => Some(&record.member),
            Decoration::Method(record) => Some(&record.member),
            Decoration::Parameter(record) => Some(&record.member),
        }
    }

    /// The parameter index, for constructor and method parameter records
    #[must_use]
    pub fn parameter_index(&self) -> Option<usize> {
        match self {
            Decoration::ConstructorParameter(record) => Some(record.index),
            Decoration::Parameter(record) => Some(record.index),
            _ => None,
        }
    }

    /// The options the annotation was applied with
    #[must_use]
    pub fn options(&self) -> AnnotationOptions {
        match self {
            Decoration::Class(record) => record.options.clone(),
            Decoration::ConstructorParameter(record) => record.options.clone(),
            Decoration::Property(record) => record.options.clone(),
            Decoration::Method(record) => record.options(),
            Decoration::Parameter(record) => record.options.clone(),
        }
    }
}
