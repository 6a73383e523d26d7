//! Before/after hooks around record insertion.
//!
//! Two kinds of hooks observe every annotation event:
//!
//! - **Site hooks** are attached to one annotation family when its builder is configured
//!   (see [`ClassAnnotation::before`](crate::metadata::factory::ClassAnnotation::before)).
//! - **Global hooks** are registered per [`AnnotationKey`] on the [`HookDispatcher`] and apply
//!   to every family using that key. Each table is replaced as a whole.
//!
//! For every insertion the dispatch order is fixed:
//!
//! 1. site before hook
//! 2. global before hook for the key
//! 3. insertion into the registry
//! 4. site after hook
//! 5. global after hook for the key
//!
//! Hooks receive the freshly built [`Decoration`] and cannot alter or veto it. A hook returning
//! an error aborts the remaining steps and the error is returned from the annotation call.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use strum::Display;

use crate::{
    metadata::records::{AnnotationKey, Decoration},
    Result,
};

/// A hook handler
pub type HookFn = Arc<dyn Fn(&Decoration) -> Result<()> + Send + Sync>;

/// A table of global hooks, one per annotation key
pub type HookTable = HashMap<AnnotationKey, HookFn>;

/// Wrap a closure into a [`HookFn`]
pub fn hook<F>(handler: F) -> HookFn
where
    F: Fn(&Decoration) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(handler)
}

/// When a hook runs relative to the insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum HookPhase {
    /// Before the record is inserted
    Before,
    /// After the record was inserted
    After,
}

/// The hooks configured on one annotation family
#[derive(Clone, Default)]
pub struct SiteHooks {
    /// Runs first, before the global before hook
    pub before: Option<HookFn>,
    /// Runs right after insertion, before the global after hook
    pub after: Option<HookFn>,
}

impl SiteHooks {
    /// Hooks for the given phase
    #[must_use]
    pub fn get(&self, phase: HookPhase) -> Option<&HookFn> {
        match phase {
            HookPhase::Before => self.before.as_ref(),
            HookPhase::After => self.after.as_ref(),
        }
    }
}

impl std::fmt::Debug for SiteHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteHooks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Process-wide global hook tables and the dispatch sequence.
///
/// Both tables start empty. Hooks are looked up when their phase is reached, and the table is
/// released before the hook runs, so a hook may itself replace the tables.
#[derive(Default)]
pub struct HookDispatcher {
    before: RwLock<Arc<HookTable>>,
    after: RwLock<Arc<HookTable>>,
}

impl HookDispatcher {
    /// Create a dispatcher with empty global tables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole table of global before hooks
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the table lock is poisoned.
    pub fn set_global_before(&self, table: HookTable) -> Result<()> {
        *write_lock!(self.before)? = Arc::new(table);
        Ok(())
    }

    /// Replace the whole table of global after hooks
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the table lock is poisoned.
    pub fn set_global_after(&self, table: HookTable) -> Result<()> {
        *write_lock!(self.after)? = Arc::new(table);
        Ok(())
    }

    /// The global hook for `key` in `phase`, if any
    #[must_use]
    pub fn global(&self, phase: HookPhase, key: &AnnotationKey) -> Option<HookFn> {
        let table = match phase {
            HookPhase::Before => read_lock!(self.before).clone(),
            HookPhase::After => read_lock!(self.after).clone(),
        };
        table.get(key).cloned()
    }

    /// Run the five step dispatch sequence around `insert`.
    ///
    /// # Errors
    /// Returns the first error produced by a hook or by `insert`; later steps are skipped.
    pub fn dispatch<F>(
        &self,
        key: &AnnotationKey,
        site: &SiteHooks,
        decoration: &Decoration,
        trace: bool,
        insert: F,
    ) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.run_phase(HookPhase::Before, key, site, decoration, trace)?;
        insert()?;
        self.run_phase(HookPhase::After, key, site, decoration, trace)
    }

    fn run_phase(
        &self,
        phase: HookPhase,
        key: &AnnotationKey,
        site: &SiteHooks,
        decoration: &Decoration,
        trace: bool,
    ) -> Result<()> {
        if let Some(handler) = site.get(phase) {
            if trace {
                tracing::trace!(%key, %phase, kind = %decoration.kind(), "site hook");
            }
            handler(decoration)?;
        }

        if let Some(handler) = self.global(phase, key) {
            if trace {
                tracing::trace!(%key, %phase, kind = %decoration.kind(), "global hook");
            }
            handler(decoration)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for HookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let before: Vec<AnnotationKey> = read_lock!(self.before).keys().cloned().collect();
        let after: Vec<AnnotationKey> = read_lock!(self.after).keys().cloned().collect();
        f.debug_struct("HookDispatcher")
            .field("before", &before)
            .field("after", &after)
            .finish()
    }
}
