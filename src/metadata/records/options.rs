//! Annotation keys and option values.
//!
//! Options are the arguments an annotation was applied with. They follow the shape of attribute
//! arguments in other ecosystems: an ordered list of positional values plus a list of named
//! values, where each value is a small self-describing tree ([`AnnotationValue`]).

use std::{fmt, sync::Arc};

use crate::metadata::typesystem::{DeclaredType, TypeHandle};

/// Name of one annotation family, shared by every site the family is applied to.
///
/// Cloning is cheap (`Arc<str>`); equality is by content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationKey(Arc<str>);

impl AnnotationKey {
    /// Create a key from a name
    #[must_use]
    pub fn new(name: &str) -> Self {
        AnnotationKey(Arc::from(name))
    }

    /// The key as string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnnotationKey {
    fn from(name: &str) -> Self {
        AnnotationKey::new(name)
    }
}

impl From<String> for AnnotationKey {
    fn from(name: String) -> Self {
        AnnotationKey(Arc::from(name))
    }
}

impl From<&AnnotationKey> for AnnotationKey {
    fn from(key: &AnnotationKey) -> Self {
        key.clone()
    }
}

impl fmt::Display for AnnotationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single annotation argument value
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// Boolean value
    Bool(bool),
    /// Character value
    Char(char),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Type reference
    Type(DeclaredType),
    /// Array of values
    Array(Vec<AnnotationValue>),
    /// Enum-like value (type name + underlying value)
    Enum(String, Box<AnnotationValue>),
}

impl AnnotationValue {
    /// The contained string, if this is a string value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// The contained boolean, if this is a boolean value
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The contained integer as `i64`, if this is an integer value that fits
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AnnotationValue::Int(value) => Some(*value),
            AnnotationValue::UInt(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// The contained type reference, if this is a type value
    #[must_use]
    pub fn as_type(&self) -> Option<&DeclaredType> {
        match self {
            AnnotationValue::Type(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        AnnotationValue::Bool(value)
    }
}

impl From<char> for AnnotationValue {
    fn from(value: char) -> Self {
        AnnotationValue::Char(value)
    }
}

impl From<i32> for AnnotationValue {
    fn from(value: i32) -> Self {
        AnnotationValue::Int(i64::from(value))
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        AnnotationValue::Int(value)
    }
}

impl From<u32> for AnnotationValue {
    fn from(value: u32) -> Self {
        AnnotationValue::UInt(u64::from(value))
    }
}

impl From<u64> for AnnotationValue {
    fn from(value: u64) -> Self {
        AnnotationValue::UInt(value)
    }
}

impl From<f64> for AnnotationValue {
    fn from(value: f64) -> Self {
        AnnotationValue::Float(value)
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::String(value.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::String(value)
    }
}

impl From<DeclaredType> for AnnotationValue {
    fn from(value: DeclaredType) -> Self {
        AnnotationValue::Type(value)
    }
}

impl From<&TypeHandle> for AnnotationValue {
    fn from(value: &TypeHandle) -> Self {
        AnnotationValue::Type(DeclaredType::Type(value.clone()))
    }
}

impl<T: Into<AnnotationValue>> From<Vec<T>> for AnnotationValue {
    fn from(values: Vec<T>) -> Self {
        AnnotationValue::Array(values.into_iter().map(Into::into).collect())
    }
}

/// A named annotation argument
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    /// Name of the argument
    pub name: String,
    /// Value of the argument
    pub value: AnnotationValue,
}

/// The arguments one annotation was applied with.
///
/// # Examples
///
/// ```rust
/// use attrscope::metadata::records::AnnotationOptions;
///
/// let defaults = AnnotationOptions::new().with("scope", "singleton").with("lazy", false);
/// let explicit = AnnotationOptions::new().with("lazy", true);
///
/// let merged = explicit.merged_over(&defaults);
/// assert_eq!(merged.get("scope").and_then(|v| v.as_str()), Some("singleton"));
/// assert_eq!(merged.get("lazy").and_then(|v| v.as_bool()), Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationOptions {
    /// Positional arguments, in order
    pub positional: Vec<AnnotationValue>,
    /// Named arguments, in insertion order, names are unique
    pub named: Vec<NamedValue>,
}

impl AnnotationOptions {
    /// Create empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    #[must_use]
    pub fn with_arg(mut self, value: impl Into<AnnotationValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a named argument, replacing an earlier value of the same name
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AnnotationValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a named argument in place, replacing an earlier value of the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AnnotationValue>) {
        let name = name.into();
        let value = value.into();
        match self.named.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.value = value,
            None => self.named.push(NamedValue { name, value }),
        }
    }

    /// Look up a named argument
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AnnotationValue> {
        self.named
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.value)
    }

    /// Positional argument at `index`
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&AnnotationValue> {
        self.positional.get(index)
    }

    /// True if there are neither positional nor named arguments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Layer these (explicit) options over `defaults`.
    ///
    /// Named values present here replace defaults of the same name, the remaining defaults are
    /// kept in their original order. A non-empty positional list replaces the default one.
    #[must_use]
    pub fn merged_over(self, defaults: &AnnotationOptions) -> AnnotationOptions {
        let mut merged = defaults.clone();
        if !self.positional.is_empty() {
            merged.positional = self.positional;
        }
        for entry in self.named {
            merged.set(entry.name, entry.value);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::PrimitiveKind;

    #[test]
    fn test_key_equality_by_content() {
        let a = AnnotationKey::from("inject");
        let b = AnnotationKey::from(String::from("inject"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "inject");
        assert_eq!(a.to_string(), "inject");
    }

    #[test]
    fn test_named_values_are_unique() {
        let mut options = AnnotationOptions::new().with("path", "/users");
        options.set("path", "/accounts");

        assert_eq!(options.named.len(), 1);
        assert_eq!(options.get("path").and_then(AnnotationValue::as_str), Some("/accounts"));
        assert!(options.get("method").is_none());
    }

    #[test]
    fn test_merge_over_defaults() {
        let defaults = AnnotationOptions::new()
            .with_arg("default")
            .with("a", 1)
            .with("b", 2);
        let explicit = AnnotationOptions::new().with("b", 20).with("c", 30);

        let merged = explicit.merged_over(&defaults);
        let names: Vec<&str> = merged.named.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(merged.get("b").and_then(AnnotationValue::as_int), Some(20));
        assert_eq!(merged.arg(0).and_then(AnnotationValue::as_str), Some("default"));

        let positional = AnnotationOptions::new().with_arg(7u32).merged_over(&defaults);
        assert_eq!(positional.positional, vec![AnnotationValue::UInt(7)]);
    }

    #[test]
    fn test_value_conversions() {
        let ty = TypeHandle::new("Token");
        assert_eq!(
            AnnotationValue::from(&ty).as_type(),
            Some(&DeclaredType::Type(ty.clone()))
        );
        assert_eq!(
            AnnotationValue::from(vec!["a", "b"]),
            AnnotationValue::Array(vec!["a".into(), "b".into()])
        );
        assert_eq!(AnnotationValue::UInt(u64::MAX).as_int(), None);
        assert_eq!(
            AnnotationValue::from(DeclaredType::from(PrimitiveKind::I32)).as_type(),
            Some(&DeclaredType::Primitive(PrimitiveKind::I32))
        );
        assert!(AnnotationOptions::new().is_empty());
    }
}
