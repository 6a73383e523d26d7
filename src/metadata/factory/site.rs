use std::fmt;

use crate::metadata::records::{DecorationKind, MemberScope, MethodDescriptor};

/// The place an annotation is applied to.
///
/// Callers name the site explicitly. [`DeclarationSite::from_shape`] is available for glue code
/// that only knows which optional pieces it was handed (a member name, a parameter index, a
/// method descriptor) and wants the same routing the composite [`Annotation`](super::Annotation)
/// builder applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclarationSite {
    /// The type itself
    Type,
    /// A parameter of the type's constructor
    ConstructorParameter {
        /// Zero-based position of the parameter
        index: usize,
    },
    /// A property (field or accessor) of the type
    Property {
        /// Name of the property
        member: String,
        /// Owner of the property
        scope: MemberScope,
    },
    /// A method of the type
    Method {
        /// Name of the method
        member: String,
        /// Owner of the method
        scope: MemberScope,
        /// Handle of the method itself
        descriptor: MethodDescriptor,
    },
    /// A parameter of a method of the type
    Parameter {
        /// Name of the owning method
        member: String,
        /// Owner of the method
        scope: MemberScope,
        /// Zero-based position of the parameter
        index: usize,
    },
}

impl DeclarationSite {
    /// Infer the site from the pieces an annotation call was given.
    ///
    /// A member name with an index is a method parameter, a member name with a descriptor is a
    /// method and a bare member name is a property. Without a member name an index denotes a
    /// constructor parameter, and nothing at all denotes the type. A member name is what tells
    /// method parameters apart from constructor parameters; the index alone never does.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use attrscope::metadata::{factory::DeclarationSite, records::MemberScope};
    ///
    /// assert_eq!(
    ///     DeclarationSite::from_shape(None, MemberScope::Instance, Some(1), None),
    ///     DeclarationSite::ConstructorParameter { index: 1 }
    /// );
    /// assert!(matches!(
    ///     DeclarationSite::from_shape(Some("save"), MemberScope::Instance, Some(1), None),
    ///     DeclarationSite::Parameter { index: 1, .. }
    /// ));
    /// ```
    #[must_use]
    pub fn from_shape(
        member: Option<&str>,
        scope: MemberScope,
        index: Option<usize>,
        descriptor: Option<MethodDescriptor>,
    ) -> Self {
        match (member, index, descriptor) {
            (Some(member), Some(index), _) => DeclarationSite::Parameter {
                member: member.to_string(),
                scope,
                index,
            },
            (Some(member), None, Some(descriptor)) => DeclarationSite::Method {
                member: member.to_string(),
                scope,
                descriptor,
            },
            (Some(member), None, None) => DeclarationSite::Property {
                member: member.to_string(),
                scope,
            },
            (None, Some(index), _) => DeclarationSite::ConstructorParameter { index },
            (None, None, _) => DeclarationSite::Type,
        }
    }

    /// The kind of record an annotation at this site produces
    #[must_use]
    pub fn kind(&self) -> DecorationKind {
        match self {
            DeclarationSite::Type => DecorationKind::Class,
            DeclarationSite::ConstructorParameter { .. } => DecorationKind::ConstructorParameter,
            DeclarationSite::Property { .. } => DecorationKind::Property,
            DeclarationSite::Method { .. } => DecorationKind::Method,
            DeclarationSite::Parameter { .. } => DecorationKind::Parameter,
        }
    }

    /// The member name, if the site is a member or one of its parameters
    #[must_use]
    pub fn member(&self) -> Option<&str> {
        match self {
            DeclarationSite::Property { member, .. }
            | DeclarationSite::Method { member, .. }
            | DeclarationSite::Parameter { member, .. } => Some(member),
            DeclarationSite::Type | DeclarationSite::ConstructorParameter { .. } => None,
        }
    }

    /// The parameter index, for constructor and method parameters
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            DeclarationSite::ConstructorParameter { index }
            | DeclarationSite::Parameter { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for DeclarationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationSite::Type => write!(f, "type"),
            DeclarationSite::ConstructorParameter { index } => write!(f, "constructor[{index}]"),
            DeclarationSite::Property { member, scope } => write!(f, "{scope} property {member}"),
            DeclarationSite::Method { member, scope, .. } => write!(f, "{scope} method {member}"),
            DeclarationSite::Parameter {
                member,
                scope,
                index,
            } => write!(f, "{scope} method {member}[{index}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::records::MethodAttributes;

    #[test]
    fn test_shape_inference() {
        let descriptor = MethodDescriptor::new(MethodAttributes::empty());
        let scope = MemberScope::Instance;

        assert_eq!(
            DeclarationSite::from_shape(None, scope, None, None),
            DeclarationSite::Type
        );
        assert_eq!(
            DeclarationSite::from_shape(None, scope, Some(0), None),
            DeclarationSite::ConstructorParameter { index: 0 }
        );
        assert_eq!(
            DeclarationSite::from_shape(Some("name"), scope, None, None).kind(),
            DecorationKind::Property
        );
        assert_eq!(
            DeclarationSite::from_shape(Some("run"), scope, None, Some(descriptor)).kind(),
            DecorationKind::Method
        );
        assert_eq!(
            DeclarationSite::from_shape(Some("run"), scope, Some(2), Some(descriptor)),
            DeclarationSite::Parameter {
                member: "run".to_string(),
                scope,
                index: 2
            }
        );
    }

    #[test]
    fn test_accessors_and_display() {
        let site = DeclarationSite::Parameter {
            member: "save".to_string(),
            scope: MemberScope::Static,
            index: 1,
        };
        assert_eq!(site.member(), Some("save"));
        assert_eq!(site.index(), Some(1));
        assert_eq!(site.to_string(), "static method save[1]");

        let ctor = DeclarationSite::ConstructorParameter { index: 3 };
        assert_eq!(ctor.member(), None);
        assert_eq!(ctor.index(), Some(3));
        assert_eq!(ctor.to_string(), "constructor[3]");
        assert_eq!(DeclarationSite::Type.index(), None);
    }
}
