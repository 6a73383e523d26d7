use std::collections::HashMap;

use dashmap::DashMap;

use crate::metadata::typesystem::{DeclaredType, TypeHandle};

/// Answers questions about the declared types of a type's members.
///
/// Rust erases nothing at compile time but offers no runtime reflection either, so the engine
/// never inspects code itself. Whatever produces annotations (generated code, a registration
/// function, explicit arguments) is also responsible for describing declared types through an
/// implementation of this trait.
///
/// Absence of information is not an error: every query returns `None` or an empty vector when
/// nothing is known about the type or member.
pub trait TypeIntrospector: Send + Sync {
    /// The declared type of property `member` on `ty`
    fn declared_property_type(&self, ty: &TypeHandle, member: &str) -> Option<DeclaredType>;

    /// The declared parameter types of method `member` on `ty`, in parameter order
    fn declared_parameter_types(&self, ty: &TypeHandle, member: &str) -> Vec<DeclaredType>;

    /// The declared return type of method `member` on `ty`
    fn declared_return_type(&self, ty: &TypeHandle, member: &str) -> Option<DeclaredType>;

    /// The declared parameter types of the constructor of `ty`, in parameter order
    fn declared_constructor_parameter_types(&self, ty: &TypeHandle) -> Vec<DeclaredType>;
}

#[derive(Default)]
struct MethodSignature {
    params: Vec<DeclaredType>,
    returns: Option<DeclaredType>,
}

#[derive(Default)]
struct TypeDescriptor {
    constructor: Vec<DeclaredType>,
    properties: HashMap<String, DeclaredType>,
    methods: HashMap<String, MethodSignature>,
}

/// A statically supplied table of type descriptors.
///
/// Descriptors are registered once per type, typically next to the code that applies the
/// annotations, and are keyed by the type's [`id`](TypeHandle::id). The table is safe to fill and
/// query from multiple threads.
///
/// # Examples
///
/// ```rust
/// use attrscope::metadata::typesystem::{
///     DeclaredType, DescriptorTable, PrimitiveKind, TypeHandle, TypeIntrospector,
/// };
///
/// let logger = TypeHandle::new("Logger");
/// let service = TypeHandle::new("UserService");
///
/// let table = DescriptorTable::new();
/// table
///     .describe(&service)
///     .constructor([DeclaredType::from(&logger)])
///     .property("name", PrimitiveKind::String)
///     .method("find", [PrimitiveKind::U64.into()], Some(DeclaredType::from(&service)));
///
/// assert_eq!(table.declared_constructor_parameter_types(&service).len(), 1);
/// assert_eq!(
///     table.declared_property_type(&service, "name"),
///     Some(DeclaredType::Primitive(PrimitiveKind::String))
/// );
/// assert!(table.declared_parameter_types(&service, "unknown").is_empty());
/// ```
#[derive(Default)]
pub struct DescriptorTable {
    entries: DashMap<u64, TypeDescriptor>,
}

impl DescriptorTable {
    /// Create a new, empty descriptor table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or continue) describing `ty`
    pub fn describe(&self, ty: &TypeHandle) -> TypeDescriptorBuilder<'_> {
        TypeDescriptorBuilder {
            table: self,
            id: ty.id(),
        }
    }

    /// Returns true if anything has been described for `ty`
    #[must_use]
    pub fn contains(&self, ty: &TypeHandle) -> bool {
        self.entries.contains_key(&ty.id())
    }

    /// Number of described types
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no type has been described
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TypeIntrospector for DescriptorTable {
    fn declared_property_type(&self, ty: &TypeHandle, member: &str) -> Option<DeclaredType> {
        self.entries
            .get(&ty.id())
            .and_then(|entry| entry.properties.get(member).cloned())
    }

    fn declared_parameter_types(&self, ty: &TypeHandle, member: &str) -> Vec<DeclaredType> {
        self.entries
            .get(&ty.id())
            .and_then(|entry| entry.methods.get(member).map(|sig| sig.params.clone()))
            .unwrap_or_default()
    }

    fn declared_return_type(&self, ty: &TypeHandle, member: &str) -> Option<DeclaredType> {
        self.entries
            .get(&ty.id())
            .and_then(|entry| entry.methods.get(member).and_then(|sig| sig.returns.clone()))
    }

    fn declared_constructor_parameter_types(&self, ty: &TypeHandle) -> Vec<DeclaredType> {
        self.entries
            .get(&ty.id())
            .map(|entry| entry.constructor.clone())
            .unwrap_or_default()
    }
}

/// Fluent writer for one type's entry in a [`DescriptorTable`].
///
/// Every call writes through immediately; later calls for the same member replace earlier ones.
pub struct TypeDescriptorBuilder<'a> {
    table: &'a DescriptorTable,
    id: u64,
}

impl TypeDescriptorBuilder<'_> {
    /// Set the constructor parameter types
    #[must_use]
    pub fn constructor(self, params: impl IntoIterator<Item = DeclaredType>) -> Self {
        self.table.entries.entry(self.id).or_default().constructor = params.into_iter().collect();
        self
    }

    /// Set the declared type of a property
    #[must_use]
    pub fn property(self, member: impl Into<String>, declared: impl Into<DeclaredType>) -> Self {
        self.table
            .entries
            .entry(self.id)
            .or_default()
            .properties
            .insert(member.into(), declared.into());
        self
    }

    /// Set the parameter and return types of a method
    #[must_use]
    pub fn method(
        self,
        member: impl Into<String>,
        params: impl IntoIterator<Item = DeclaredType>,
        returns: Option<DeclaredType>,
    ) -> Self {
        self.table.entries.entry(self.id).or_default().methods.insert(
            member.into(),
            MethodSignature {
                params: params.into_iter().collect(),
                returns,
            },
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::PrimitiveKind;

    #[test]
    fn test_unknown_type_is_empty() {
        let table = DescriptorTable::new();
        let ty = TypeHandle::new("Unknown");

        assert!(table.is_empty());
        assert!(!table.contains(&ty));
        assert!(table.declared_property_type(&ty, "field").is_none());
        assert!(table.declared_parameter_types(&ty, "run").is_empty());
        assert!(table.declared_return_type(&ty, "run").is_none());
        assert!(table.declared_constructor_parameter_types(&ty).is_empty());
    }

    #[test]
    fn test_describe_and_query() {
        let table = DescriptorTable::new();
        let repo = TypeHandle::new("Repository");
        let service = TypeHandle::new("Service");

        let _ = table
            .describe(&service)
            .constructor([DeclaredType::from(&repo), PrimitiveKind::U32.into()])
            .method("save", [PrimitiveKind::String.into()], Some(PrimitiveKind::Bool.into()));
        let _ = table.describe(&service).property("count", PrimitiveKind::Usize);

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.declared_constructor_parameter_types(&service),
            vec![DeclaredType::Type(repo.clone()), PrimitiveKind::U32.into()]
        );
        assert_eq!(
            table.declared_parameter_types(&service, "save"),
            vec![DeclaredType::Primitive(PrimitiveKind::String)]
        );
        assert_eq!(
            table.declared_return_type(&service, "save"),
            Some(DeclaredType::Primitive(PrimitiveKind::Bool))
        );
        assert_eq!(
            table.declared_property_type(&service, "count"),
            Some(DeclaredType::Primitive(PrimitiveKind::Usize))
        );

        // identity, not name
        let imposter = TypeHandle::new("Service");
        assert!(table.declared_constructor_parameter_types(&imposter).is_empty());
    }

    #[test]
    fn test_void_method_has_no_return_type() {
        let table = DescriptorTable::new();
        let ty = TypeHandle::new("Handler");
        let _ = table.describe(&ty).method("handle", [], None);

        assert!(table.declared_return_type(&ty, "handle").is_none());
        assert!(table.declared_parameter_types(&ty, "handle").is_empty());
        assert!(table.contains(&ty));
    }
}
