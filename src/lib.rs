// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(clippy::too_many_arguments)]

//! # attrscope
//!
//! A metadata aggregation engine for declarative annotations. Annotations attached to types,
//! constructor parameters, properties, methods and method parameters are recorded once, when
//! the declaration site is registered, and exposed as a queryable per-type model to whatever
//! consumes them: dependency injection containers, validators, serializers, routers.
//!
//! ## Features
//!
//! - **One registry per type** - stable for the lifetime of the process, isolated for derived types
//! - **Order independent method records** - method-level and parameter-level annotations converge
//!   into one record per method, whichever arrives first
//! - **Hooks** - per-family and global before/after handlers around every insertion
//! - **Key index** - "which types carry annotation K" lookups
//! - **Declared types** - constructor, property, parameter and return types resolved through a
//!   pluggable [`TypeIntrospector`](metadata::typesystem::TypeIntrospector)
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use attrscope::prelude::*;
//!
//! let table = Arc::new(DescriptorTable::new());
//! let users = TypeHandle::new("UsersController");
//! let _ = table
//!     .describe(&users)
//!     .method("show", [PrimitiveKind::U64.into()], Some(PrimitiveKind::String.into()));
//!
//! let ctx = AnnotationContext::new(table);
//! let controller = ClassAnnotation::new(&ctx, "controller");
//! let get = MethodAnnotation::new(&ctx, "get");
//! let param = ParameterAnnotation::new(&ctx, "param");
//!
//! controller.apply(&users, AnnotationOptions::new().with_arg("/users"))?;
//! param.apply(&users, Some("show"), MemberScope::Instance, 0, AnnotationOptions::new().with_arg("id"))?;
//! get.apply(
//!     &users,
//!     "show",
//!     MemberScope::Instance,
//!     MethodDescriptor::new(MethodAttributes::empty()),
//!     AnnotationOptions::new().with_arg("/:id"),
//! )?;
//!
//! let registry = ctx.registry_for(&users);
//! let show = registry.method("show").unwrap();
//! assert_eq!(show.parameter_count(), 1);
//! assert_eq!(show.return_type(), Some(PrimitiveKind::String.into()));
//! assert_eq!(ctx.classes_by_key(&"controller".into()), vec![users.clone()]);
//! # Ok::<(), attrscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`metadata`] - Records, registries, hooks, builders and the type system
//! - [`AnnotationContext`] - The framework root bundling all shared state
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! Insertions, key registrations and hook invocations are reported through `tracing` at
//! `debug` and `trace` level, parameter indices beyond the declared parameter count at `warn`.
//! Install any `tracing` subscriber to see them; [`AnnotationConfig`] switches them off.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

mod context;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use attrscope::prelude::*;
///
/// let ctx = AnnotationContext::default();
/// let ty = TypeHandle::new("Empty");
/// assert!(ctx.registry_for(&ty).is_empty());
/// ```
pub mod prelude;

/// Annotation metadata: records, registries, hooks, builders and the type system
pub mod metadata;

/// `attrscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `attrscope` Error type
///
/// Recording annotations only fails when a hook fails or a lock is poisoned.
pub use error::Error;

/// The framework root, see [`AnnotationContext`]
pub use context::{AnnotationConfig, AnnotationContext};

/// Builders for the five declaration sites
pub use metadata::factory::{
    Annotation, ClassAnnotation, DeclarationSite, MethodAnnotation, ParameterAnnotation,
    PropertyAnnotation,
};

/// Handle identifying an annotated type
pub use metadata::typesystem::TypeHandle;
