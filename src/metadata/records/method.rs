use std::sync::{Arc, RwLock};

use bitflags::bitflags;

use crate::{
    metadata::{
        records::{AnnotationKey, AnnotationOptions, MemberScope, ParameterRecordRc},
        token::Token,
        typesystem::{DeclaredType, TypeHandle},
    },
    Result,
};

/// A reference-counted pointer to a `MethodRecord`
pub type MethodRecordRc = Arc<MethodRecord>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Method declaration flags
    pub struct MethodAttributes: u32 {
        /// Method has no receiver
        const STATIC = 0x0001;
        /// Method has no body (trait method without default)
        const ABSTRACT = 0x0002;
        /// Method is dispatched dynamically
        const VIRTUAL = 0x0004;
        /// Method is `async`
        const ASYNC = 0x0008;
        /// Method is `const`
        const CONST = 0x0010;
        /// Method is `unsafe`
        const UNSAFE = 0x0020;
    }
}

/// Handle describing the annotated method itself, as supplied by a method-level annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Identity of the method
    pub token: Token,
    /// Declaration flags
    pub attributes: MethodAttributes,
}

impl MethodDescriptor {
    /// Create a descriptor with a fresh method token
    #[must_use]
    pub fn new(attributes: MethodAttributes) -> Self {
        MethodDescriptor {
            token: Token::next_method(),
            attributes,
        }
    }

    /// Create a descriptor for an already known method token
    #[must_use]
    pub fn with_token(token: Token, attributes: MethodAttributes) -> Self {
        MethodDescriptor { token, attributes }
    }
}

/// The method-level facts of a [`MethodRecord`] at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSnapshot {
    /// Whether the method belongs to instances or to the type itself
    pub scope: MemberScope,
    /// The method handle, `None` until a method-level annotation was seen
    pub descriptor: Option<MethodDescriptor>,
    /// Options of the latest method-level annotation
    pub options: AnnotationOptions,
    /// Declared return type, if known
    pub return_type: Option<DeclaredType>,
    /// Declared parameter types, empty if unknown
    pub param_types: Vec<DeclaredType>,
    /// Key of the latest method-level annotation, `None` while only parameters were annotated
    pub key: Option<AnnotationKey>,
}

impl MethodSnapshot {
    fn empty(scope: MemberScope) -> Self {
        MethodSnapshot {
            scope,
            descriptor: None,
            options: AnnotationOptions::new(),
            return_type: None,
            param_types: Vec::new(),
            key: None,
        }
    }
}

/// Aggregate of everything annotated on one method of one type.
///
/// The record is created on the first method-level *or* parameter-level annotation for its
/// member name and is completed in place by later annotations, in whatever order they arrive.
/// Method-level facts are replaced as one unit under a lock, parameters are appended and never
/// removed, so a reader never observes a partially applied annotation.
pub struct MethodRecord {
    /// Name of the method
    pub member: String,
    /// The type declaring the method
    pub target: TypeHandle,
    state: RwLock<MethodSnapshot>,
    parameters: boxcar::Vec<ParameterRecordRc>,
}

impl MethodRecord {
    /// Create an empty record, as produced when a parameter is seen before its method
    #[must_use]
    pub fn placeholder(member: String, target: TypeHandle, scope: MemberScope) -> Self {
        MethodRecord {
            member,
            target,
            state: RwLock::new(MethodSnapshot::empty(scope)),
            parameters: boxcar::Vec::new(),
        }
    }

    /// Create a detached record carrying the facts of one method-level annotation
    #[must_use]
    pub fn declared(
        member: String,
        target: TypeHandle,
        scope: MemberScope,
        descriptor: MethodDescriptor,
        options: AnnotationOptions,
        return_type: Option<DeclaredType>,
        param_types: Vec<DeclaredType>,
        key: AnnotationKey,
    ) -> Self {
        MethodRecord {
            member,
            target,
            state: RwLock::new(MethodSnapshot {
                scope,
                descriptor: Some(descriptor),
                options,
                return_type,
                param_types,
                key: Some(key),
            }),
            parameters: boxcar::Vec::new(),
        }
    }

    /// A consistent copy of the method-level facts
    #[must_use]
    pub fn snapshot(&self) -> MethodSnapshot {
        read_lock!(self.state).clone()
    }

    /// Whether the method belongs to instances or to the type itself
    #[must_use]
    pub fn scope(&self) -> MemberScope {
        read_lock!(self.state).scope
    }

    /// The method handle, `None` until a method-level annotation was seen
    #[must_use]
    pub fn descriptor(&self) -> Option<MethodDescriptor> {
        read_lock!(self.state).descriptor
    }

    /// Options of the latest method-level annotation
    #[must_use]
    pub fn options(&self) -> AnnotationOptions {
        read_lock!(self.state).options.clone()
    }

    /// Declared return type, if known
    #[must_use]
    pub fn return_type(&self) -> Option<DeclaredType> {
        read_lock!(self.state).return_type.clone()
    }

    /// Declared parameter types, empty if unknown
    #[must_use]
    pub fn param_types(&self) -> Vec<DeclaredType> {
        read_lock!(self.state).param_types.clone()
    }

    /// Key of the latest method-level annotation
    #[must_use]
    pub fn key(&self) -> Option<AnnotationKey> {
        read_lock!(self.state).key.clone()
    }

    /// All parameter annotations, in arrival order
    #[must_use]
    pub fn parameters(&self) -> Vec<ParameterRecordRc> {
        self.parameters
            .iter()
            .map(|(_, parameter)| parameter.clone())
            .collect()
    }

    /// Parameter annotations on the parameter at `index`, in arrival order
    #[must_use]
    pub fn parameters_at(&self, index: usize) -> Vec<ParameterRecordRc> {
        self.parameters
            .iter()
            .filter(|(_, parameter)| parameter.index == index)
            .map(|(_, parameter)| parameter.clone())
            .collect()
    }

    /// Number of parameter annotations
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameters.count()
    }

    /// Replace the method-level facts with those carried by `declared`.
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the state lock is poisoned.
    pub(crate) fn apply_declaration(&self, declared: &MethodRecord) -> Result<()> {
        let facts = declared.snapshot();
        let mut state = write_lock!(self.state)?;
        *state = facts;
        Ok(())
    }

    /// Attach a parameter annotation
    pub(crate) fn add_parameter(&self, parameter: ParameterRecordRc) {
        self.parameters.push(parameter);
    }
}

impl std::fmt::Debug for MethodRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRecord")
            .field("member", &self.member)
            .field("target", &self.target)
            .field("state", &self.snapshot())
            .field("parameters", &self.parameter_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{records::ParameterRecord, typesystem::PrimitiveKind};

    fn parameter(target: &TypeHandle, index: usize) -> ParameterRecordRc {
        Arc::new(ParameterRecord::new(
            MemberScope::Instance,
            target.clone(),
            "save".to_string(),
            index,
            AnnotationOptions::new(),
            vec![PrimitiveKind::String.into(), PrimitiveKind::U32.into()],
            "param".into(),
        ))
    }

    #[test]
    fn test_placeholder_is_empty() {
        let ty = TypeHandle::new("Repo");
        let record = MethodRecord::placeholder("save".to_string(), ty, MemberScope::Static);

        let snapshot = record.snapshot();
        assert_eq!(snapshot.scope, MemberScope::Static);
        assert!(snapshot.descriptor.is_none());
        assert!(snapshot.key.is_none());
        assert!(snapshot.options.is_empty());
        assert_eq!(record.parameter_count(), 0);
    }

    #[test]
    fn test_apply_declaration_replaces_facts() {
        let ty = TypeHandle::new("Repo");
        let record = MethodRecord::placeholder("save".to_string(), ty.clone(), MemberScope::Instance);
        record.add_parameter(parameter(&ty, 1));

        let descriptor = MethodDescriptor::new(MethodAttributes::ASYNC);
        let declared = MethodRecord::declared(
            "save".to_string(),
            ty.clone(),
            MemberScope::Instance,
            descriptor,
            AnnotationOptions::new().with("route", "/save"),
            Some(PrimitiveKind::Bool.into()),
            vec![PrimitiveKind::String.into(), PrimitiveKind::U32.into()],
            "post".into(),
        );
        record.apply_declaration(&declared).unwrap();

        assert_eq!(record.descriptor(), Some(descriptor));
        assert_eq!(record.key(), Some(AnnotationKey::from("post")));
        assert_eq!(record.return_type(), Some(PrimitiveKind::Bool.into()));
        assert_eq!(record.param_types().len(), 2);
        assert_eq!(record.parameter_count(), 1);
        assert_eq!(record.parameters_at(1).len(), 1);
        assert!(record.parameters_at(0).is_empty());
        assert_eq!(
            record.parameters()[0].parameter_type(),
            Some(&DeclaredType::Primitive(PrimitiveKind::U32))
        );
    }

    #[test]
    fn test_method_attributes() {
        let flags = MethodAttributes::STATIC | MethodAttributes::CONST;
        let descriptor = MethodDescriptor::with_token(Token::new(0x06000042), flags);

        assert!(descriptor.attributes.contains(MethodAttributes::STATIC));
        assert!(!descriptor.attributes.contains(MethodAttributes::ASYNC));
        assert_eq!(descriptor.token.row(), 0x42);
        assert_ne!(MethodDescriptor::new(flags), MethodDescriptor::new(flags));
    }
}
