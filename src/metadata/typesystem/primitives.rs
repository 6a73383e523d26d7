use std::{any::TypeId, fmt};

use strum::{Display, EnumIter, EnumString};

use crate::metadata::typesystem::TypeHandle;

/// Built-in scalar types which are described by kind rather than by an annotated [`TypeHandle`].
///
/// The textual form (via `Display` / `FromStr`) is the Rust spelling of the type, so descriptor
/// tables can be filled from generated code or configuration:
///
/// ```rust
/// use attrscope::metadata::typesystem::PrimitiveKind;
///
/// let kind: PrimitiveKind = "u32".parse().unwrap();
/// assert_eq!(kind, PrimitiveKind::U32);
/// assert_eq!(PrimitiveKind::String.to_string(), "string");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
    /// `()` - no value
    Unit,
    /// `bool` - true/false value
    Bool,
    /// `char` - Unicode scalar value
    Char,
    /// `i8` - signed 8-bit integer
    I8,
    /// `u8` - unsigned 8-bit integer
    U8,
    /// `i16` - signed 16-bit integer
    I16,
    /// `u16` - unsigned 16-bit integer
    U16,
    /// `i32` - signed 32-bit integer
    I32,
    /// `u32` - unsigned 32-bit integer
    U32,
    /// `i64` - signed 64-bit integer
    I64,
    /// `u64` - unsigned 64-bit integer
    U64,
    /// `isize` - pointer sized signed integer
    Isize,
    /// `usize` - pointer sized unsigned integer
    Usize,
    /// `f32` - 32-bit floating point
    F32,
    /// `f64` - 64-bit floating point
    F64,
    /// `String` / `str` - UTF-8 text
    String,
}

impl PrimitiveKind {
    /// Maps a Rust type to its primitive kind, if it is one
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Option<Self> {
        let id = TypeId::of::<T>();
        let kind = if id == TypeId::of::<()>() {
            PrimitiveKind::Unit
        } else if id == TypeId::of::<bool>() {
            PrimitiveKind::Bool
        } else if id == TypeId::of::<char>() {
            PrimitiveKind::Char
        } else if id == TypeId::of::<i8>() {
            PrimitiveKind::I8
        } else if id == TypeId::of::<u8>() {
            PrimitiveKind::U8
        } else if id == TypeId::of::<i16>() {
            PrimitiveKind::I16
        } else if id == TypeId::of::<u16>() {
            PrimitiveKind::U16
        } else if id == TypeId::of::<i32>() {
            PrimitiveKind::I32
        } else if id == TypeId::of::<u32>() {
            PrimitiveKind::U32
        } else if id == TypeId::of::<i64>() {
            PrimitiveKind::I64
        } else if id == TypeId::of::<u64>() {
            PrimitiveKind::U64
        } else if id == TypeId::of::<isize>() {
            PrimitiveKind::Isize
        } else if id == TypeId::of::<usize>() {
            PrimitiveKind::Usize
        } else if id == TypeId::of::<f32>() {
            PrimitiveKind::F32
        } else if id == TypeId::of::<f64>() {
            PrimitiveKind::F64
        } else if id == TypeId::of::<String>() || id == TypeId::of::<str>() {
            PrimitiveKind::String
        } else {
            return None;
        };

        Some(kind)
    }

    /// Returns true for the integer and floating point kinds
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            PrimitiveKind::Unit | PrimitiveKind::Bool | PrimitiveKind::Char | PrimitiveKind::String
        )
    }
}

/// A declared type as reported by a [`TypeIntrospector`](crate::metadata::typesystem::TypeIntrospector):
/// either a primitive or another (possibly annotated) type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    /// A built-in scalar
    Primitive(PrimitiveKind),
    /// A user defined type, identified by its handle
    Type(TypeHandle),
}

impl DeclaredType {
    /// Describes the Rust type `T`, mapping scalars to [`DeclaredType::Primitive`] and everything
    /// else to the interned [`TypeHandle::of`] identity.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        match PrimitiveKind::of::<T>() {
            Some(kind) => DeclaredType::Primitive(kind),
            None => DeclaredType::Type(TypeHandle::of::<T>()),
        }
    }

    /// The type handle, if this is not a primitive
    #[must_use]
    pub fn as_type(&self) -> Option<&TypeHandle> {
        match self {
            DeclaredType::Type(handle) => Some(handle),
            DeclaredType::Primitive(_) => None,
        }
    }

    /// The primitive kind, if this is a primitive
    #[must_use]
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            DeclaredType::Primitive(kind) => Some(*kind),
            DeclaredType::Type(_) => None,
        }
    }
}

impl From<PrimitiveKind> for DeclaredType {
    fn from(kind: PrimitiveKind) -> Self {
        DeclaredType::Primitive(kind)
    }
}

impl From<TypeHandle> for DeclaredType {
    fn from(handle: TypeHandle) -> Self {
        DeclaredType::Type(handle)
    }
}

impl From<&TypeHandle> for DeclaredType {
    fn from(handle: &TypeHandle) -> Self {
        DeclaredType::Type(handle.clone())
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Primitive(kind) => write!(f, "{kind}"),
            DeclaredType::Type(handle) => write!(f, "{}", handle.name()),
        }
    }
}
