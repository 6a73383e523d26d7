//! The annotation metadata model and the machinery that fills it.
//!
//! # Key Components
//!
//! - [`token`] - Identities of annotated types and methods
//! - [`typesystem`] - Type handles and declared-type introspection
//! - [`records`] - The decoration records produced by annotations
//! - [`registry`] - Per-type registries, the registry directory and the key index
//! - [`hooks`] - Before/after hooks around record insertion
//! - [`factory`] - Builders that turn an annotation application into records
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use attrscope::prelude::*;
//!
//! let table = Arc::new(DescriptorTable::new());
//! let repo = TypeHandle::new("UserRepository");
//! let service = TypeHandle::new("UserService");
//! let _ = table.describe(&service).constructor([DeclaredType::from(&repo)]);
//!
//! let ctx = AnnotationContext::new(table);
//! ClassAnnotation::new(&ctx, "injectable").apply(&service, AnnotationOptions::new())?;
//!
//! let registry = ctx.registry_for(&service);
//! let record = &registry.classes()[0];
//! assert_eq!(record.constructor_parameter_types, vec![DeclaredType::from(&repo)]);
//! # Ok::<(), attrscope::Error>(())
//! ```

/// Construction of annotations and the effect sequence they trigger
pub mod factory;
/// Hook tables and dispatch order
pub mod hooks;
/// Decoration records
pub mod records;
/// Registry storage
pub mod registry;
/// Identity tokens
pub mod token;
/// Type handles and introspection
pub mod typesystem;
