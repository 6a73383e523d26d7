use thiserror::Error;

use crate::metadata::{hooks::HookPhase, records::AnnotationKey};

/// Crate-internal shorthand for building an [`Error::Hook`].
///
/// Hook handlers outside the crate construct [`Error::Hook`] directly.
///
/// ```rust, ignore
/// return Err(hook_error!(key, HookPhase::Before, "missing provider for {}", ty.name()));
/// ```
#[allow(unused_macros)]
macro_rules! hook_error {
    ($key:expr, $phase:expr, $msg:expr) => {
        crate::Error::Hook {
            key: $key.clone(),
            phase: $phase,
            message: $msg.to_string(),
        }
    };

    ($key:expr, $phase:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::Hook {
            key: $key.clone(),
            phase: $phase,
            message: format!($fmt, $($arg)*),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Recording an annotation is unconditionally successful: missing type information degrades to
/// empty results and lookups of unknown types or keys return empty collections. The only way an
/// annotation call fails is when something *outside* the engine fails while it runs, namely a
/// hook handler or a poisoned lock.
///
/// # Error Categories
///
/// - [`Error::Hook`] - A before/after hook rejected an annotation event
/// - [`Error::LockError`] - Thread synchronization failure
/// - [`Error::GlobalAlreadyInitialized`] - The process-wide context exists already
/// - [`Error::Error`] - Generic error for miscellaneous failures
///
/// # Examples
///
/// ```rust
/// use attrscope::{AnnotationContext, ClassAnnotation, Error, TypeHandle};
/// use attrscope::metadata::records::AnnotationOptions;
///
/// let ctx = AnnotationContext::default();
/// let injectable = ClassAnnotation::new(&ctx, "injectable")
///     .before(|_| Err(Error::Error("registration closed".into())));
///
/// let service = TypeHandle::new("Service");
/// match injectable.apply(&service, AnnotationOptions::new()) {
///     Err(Error::Error(message)) => assert_eq!(message, "registration closed"),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A hook handler failed while an annotation event was dispatched.
    ///
    /// Hooks run at declaration time and are expected to succeed. A failing hook aborts the
    /// remaining dispatch sequence and the enclosing annotation call, so misconfiguration
    /// surfaces immediately instead of being masked.
    ///
    /// # Fields
    ///
    /// * `key` - The annotation key of the event being dispatched
    /// * `phase` - Whether the failing hook ran before or after insertion
    /// * `message` - Detailed description supplied by the hook
    #[error("Hook failed for '{key}' ({phase}): {message}")]
    Hook {
        /// The annotation key the failing hook was registered for
        key: AnnotationKey,
        /// The dispatch phase in which the hook failed
        phase: HookPhase,
        /// The message supplied by the hook
        message: String,
    },

    /// Failed to lock target.
    ///
    /// This error occurs when thread synchronization fails, typically when a thread panicked
    /// while holding the lock of a method record or a hook table.
    #[error("Failed to lock target - {0}")]
    LockError(String),

    /// The process-wide context was installed or created before.
    ///
    /// Returned by [`AnnotationContext::init_global`](crate::AnnotationContext::init_global),
    /// which must run before the first call to
    /// [`AnnotationContext::global`](crate::AnnotationContext::global).
    #[error("The global annotation context is already initialized")]
    GlobalAlreadyInitialized,

    /// Generic error for miscellaneous failures.
    ///
    /// Mostly produced by hook handlers that do not need the structured [`Error::Hook`] form.
    #[error("{0}")]
    Error(String),
}
