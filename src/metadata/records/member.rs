use std::sync::Arc;

use crate::metadata::{
    records::{AnnotationKey, AnnotationOptions, MemberScope},
    typesystem::{DeclaredType, TypeHandle},
};

/// A reference-counted pointer to a `PropertyRecord`
pub type PropertyRecordRc = Arc<PropertyRecord>;
/// A reference-counted pointer to a `ParameterRecord`
pub type ParameterRecordRc = Arc<ParameterRecord>;

/// One annotation on a property (field).
#[derive(Debug)]
pub struct PropertyRecord {
    /// Name of the property
    pub member: String,
    /// Whether the property belongs to instances or to the type itself
    pub scope: MemberScope,
    /// The type declaring the property
    pub target: TypeHandle,
    /// The options the annotation was applied with (after merging defaults)
    pub options: AnnotationOptions,
    /// Declared type of the property, if known
    pub declared_type: Option<DeclaredType>,
    /// The annotation family
    pub key: AnnotationKey,
}

impl PropertyRecord {
    /// Create a new property record
    #[must_use]
    pub fn new(
        member: String,
        scope: MemberScope,
        target: TypeHandle,
        options: AnnotationOptions,
        declared_type: Option<DeclaredType>,
        key: AnnotationKey,
    ) -> Self {
        PropertyRecord {
            member,
            scope,
            target,
            options,
            declared_type,
            key,
        }
    }
}

/// One annotation on a method parameter.
///
/// Parameter records never live on their own in a registry; they are attached to the
/// [`MethodRecord`](crate::metadata::records::MethodRecord) of the same member name.
#[derive(Debug)]
pub struct ParameterRecord {
    /// Whether the owning method belongs to instances or to the type itself
    pub scope: MemberScope,
    /// The type declaring the method
    pub target: TypeHandle,
    /// Name of the owning method
    pub member: String,
    /// Zero based position of the parameter
    pub index: usize,
    /// The options the annotation was applied with (after merging defaults)
    pub options: AnnotationOptions,
    /// Declared parameter types of the owning method, empty if unknown
    pub parameter_types: Vec<DeclaredType>,
    /// The annotation family
    pub key: AnnotationKey,
}

impl ParameterRecord {
    /// Create a new method parameter record
    #[must_use]
    pub fn new(
        scope: MemberScope,
        target: TypeHandle,
        member: String,
        index: usize,
        options: AnnotationOptions,
        parameter_types: Vec<DeclaredType>,
        key: AnnotationKey,
    ) -> Self {
        ParameterRecord {
            scope,
            target,
            member,
            index,
            options,
            parameter_types,
            key,
        }
    }

    /// The declared type of the annotated parameter, if known
    #[must_use]
    pub fn parameter_type(&self) -> Option<&DeclaredType> {
        self.parameter_types.get(self.index)
    }
}
