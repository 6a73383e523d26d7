//! Engine configuration
//!
//! None of these switches change what is recorded in a registry. They control diagnostics and
//! the optional key index only.

/// Configuration of an [`AnnotationContext`](crate::AnnotationContext)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnnotationConfig {
    /// Emit `tracing` events for insertions, registrations and hook invocations
    pub enable_event_tracing: bool,

    /// Warn when a parameter index lies beyond the declared parameter count.
    /// The annotation is recorded either way.
    pub enable_index_validation: bool,

    /// Register class-annotated types under their key, backing
    /// [`AnnotationContext::classes_by_key`](crate::AnnotationContext::classes_by_key)
    pub enable_named_type_index: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            enable_event_tracing: true,
            enable_index_validation: true,
            enable_named_type_index: true,
        }
    }
}

impl AnnotationConfig {
    /// Everything off, including the key index
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enable_event_tracing: false,
            enable_index_validation: false,
            enable_named_type_index: false,
        }
    }

    /// Keeps the key index, drops all diagnostics
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            enable_event_tracing: false,
            enable_index_validation: false,
            enable_named_type_index: true,
        }
    }

    /// All diagnostics enabled
    #[must_use]
    pub fn strict() -> Self {
        Self {
            enable_event_tracing: true,
            enable_index_validation: true,
            enable_named_type_index: true,
        }
    }
}
