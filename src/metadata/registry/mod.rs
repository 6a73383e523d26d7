//! Storage of decoration records.
//!
//! # Key Components
//!
//! - [`AnnotationRegistry`] - All records of one annotated type, including the method merge
//! - [`RegistryDirectory`] - Side table from type identity to its registry
//! - [`NamedTypeStore`] - Index from annotation key to class-annotated types
//!
//! # Thread Safety
//!
//! All three are `Send + Sync` and only ever grow: records and registries are appended, never
//! removed, using the same lock-free primitives (`boxcar`, `SkipMap`, `DashMap`) throughout.

mod annotations;
mod directory;
mod named;

pub use annotations::{AnnotationRegistry, AnnotationRegistryRc};
pub use directory::RegistryDirectory;
pub use named::NamedTypeStore;
