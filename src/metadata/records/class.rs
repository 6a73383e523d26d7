use std::sync::Arc;

use crate::metadata::{
    records::{AnnotationKey, AnnotationOptions},
    typesystem::{DeclaredType, TypeHandle},
};

/// A reference-counted pointer to a `ClassRecord`
pub type ClassRecordRc = Arc<ClassRecord>;
/// A reference-counted pointer to a `ConstructorParameterRecord`
pub type ConstructorParameterRecordRc = Arc<ConstructorParameterRecord>;

/// One class-level annotation event.
///
/// A type may carry several of these, including multiple records under the same key when the
/// same annotation was applied more than once.
#[derive(Debug)]
pub struct ClassRecord {
    /// The annotated type
    pub target: TypeHandle,
    /// The options the annotation was applied with (after merging defaults)
    pub options: AnnotationOptions,
    /// The annotation family
    pub key: AnnotationKey,
    /// Declared constructor parameter types of `target`, empty if unknown
    pub constructor_parameter_types: Vec<DeclaredType>,
}

impl ClassRecord {
    /// Create a new class record
    #[must_use]
    pub fn new(
        target: TypeHandle,
        options: AnnotationOptions,
        key: AnnotationKey,
        constructor_parameter_types: Vec<DeclaredType>,
    ) -> Self {
        ClassRecord {
            target,
            options,
            key,
            constructor_parameter_types,
        }
    }
}

/// One annotation on a constructor parameter.
#[derive(Debug)]
pub struct ConstructorParameterRecord {
    /// The type whose constructor declares the parameter
    pub target: TypeHandle,
    /// Zero based position of the parameter
    pub index: usize,
    /// The options the annotation was applied with (after merging defaults)
    pub options: AnnotationOptions,
    /// Declared constructor parameter types of `target`, empty if unknown
    pub parameter_types: Vec<DeclaredType>,
    /// The annotation family
    pub key: AnnotationKey,
}

impl ConstructorParameterRecord {
    /// Create a new constructor parameter record
    #[must_use]
    pub fn new(
        target: TypeHandle,
        index: usize,
        options: AnnotationOptions,
        parameter_types: Vec<DeclaredType>,
        key: AnnotationKey,
    ) -> Self {
        ConstructorParameterRecord {
            target,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::PrimitiveKind;

    #[test]
    fn test_constructor_parameter_type() {
        let ty = TypeHandle::new("Service");
        let logger = TypeHandle::new("Logger");
        let record = ConstructorParameterRecord::new(
            ty.clone(),
            1,
            AnnotationOptions::new(),
            vec![PrimitiveKind::String.into(), DeclaredType::from(&logger)],
            "inject".into(),
        );

        assert_eq!(record.parameter_type(), Some(&DeclaredType::Type(logger)));

        let unknown = ConstructorParameterRecord::new(
            ty,
            0,
            AnnotationOptions::new(),
            Vec::new(),
            "inject".into(),
        );
        assert!(unknown.parameter_type().is_none());
    }
}
