//! Per-context geometry caches
//!
//! A [`GeometryCache`] remembers, for each render context, the geometry built
//! for one description. The first request in a context builds through the
//! factory; later requests return the same key until the cache is disposed
//! or the slot disappears from the context.

use std::cell::RefCell;
use std::ops::{Add, AddAssign};

use rustc_hash::FxHashMap;

use crate::context::{ContextId, ContextRegistry, GeometryKey, RenderContext};
use crate::descriptor::GeometryDescriptor;

/// Outcome of a disposal sweep
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisposeReport {
    /// Geometries released from their context
    pub released: usize,
    /// Entries whose context or slot was already gone
    pub failed: usize,
}

impl DisposeReport {
    pub fn total(&self) -> usize {
        self.released + self.failed
    }
}

impl Add for DisposeReport {
    type Output = DisposeReport;

    fn add(self, other: DisposeReport) -> DisposeReport {
        DisposeReport {
            released: self.released + other.released,
            failed: self.failed + other.failed,
        }
    }
}

impl AddAssign for DisposeReport {
    fn add_assign(&mut self, other: DisposeReport) {
        *self = *self + other;
    }
}

impl std::iter::Sum for DisposeReport {
    fn sum<I: Iterator<Item = DisposeReport>>(iter: I) -> Self {
        iter.fold(DisposeReport::default(), Add::add)
    }
}

/// Context to geometry map owned by one description
///
/// Uses interior mutability so shared descriptions can fill their caches.
/// Cloning yields an empty cache: copies never share built geometry.
#[derive(Default)]
pub struct GeometryCache {
    entries: RefCell<FxHashMap<ContextId, GeometryKey>>,
}

impl Clone for GeometryCache {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for GeometryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryCache")
            .field("entries", &self.entries.borrow().len())
            .finish()
    }
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached geometry for `context`, building it on first use
    pub fn get_or_build(&self, context: &mut RenderContext, descriptor: &GeometryDescriptor) -> GeometryKey {
        let id = context.id();
        let cached = self.entries.borrow().get(&id).copied();
        if let Some(key) = cached {
            if context.contains(key) {
                return key;
            }
            tracing::debug!("Cached {} geometry missing from {:?}, rebuilding", descriptor.kind_name(), id);
        }

        let key = context.build(descriptor);
        self.entries.borrow_mut().insert(id, key);
        key
    }

    /// Key cached for `context`, if any
    pub fn key_for(&self, context: ContextId) -> Option<GeometryKey> {
        self.entries.borrow().get(&context).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Release every cached geometry and clear the cache
    ///
    /// Failures are logged and counted; the sweep always completes.
    pub fn dispose(&self, registry: &mut ContextRegistry) -> DisposeReport {
        let entries: Vec<_> = self.entries.borrow_mut().drain().collect();
        let mut report = DisposeReport::default();

        for (context, key) in entries {
            match registry.release(context, key) {
                Ok(()) => report.released += 1,
                Err(err) => {
                    tracing::debug!("Skipping geometry release: {}", err);
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Drop the entry for a torn-down context without releasing it
    pub fn forget_context(&self, context: ContextId) -> bool {
        self.entries.borrow_mut().remove(&context).is_some()
    }
}
