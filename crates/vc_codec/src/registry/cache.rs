use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock};

use log::debug;
use vc_introspect::hash::HashMap;
use vc_introspect::types::{RawClass, TypeDescriptor};

/// Resolved codecs of one role, keyed by type.
///
/// Entries are only inserted fully built. When two threads publish a codec
/// for the same type, the first one stays and both callers receive it.
pub(crate) struct CodecCache<C: ?Sized> {
    entries: RwLock<HashMap<TypeDescriptor, Arc<C>>>,
}

impl<C: ?Sized> CodecCache<C> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::default()),
        }
    }

    pub(crate) fn get(&self, ty: &TypeDescriptor) -> Option<Arc<C>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
            .cloned()
    }

    /// Inserts `codec` unless an entry exists, and returns the entry.
    pub(crate) fn publish(&self, ty: &TypeDescriptor, codec: Arc<C>) -> Arc<C> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let published = entries.entry(ty.clone()).or_insert_with(|| codec.clone());
        if !Arc::ptr_eq(published, &codec) {
            debug!("discarded a concurrently built codec for `{ty}`");
        }
        published.clone()
    }

    /// Drops every entry for a parameterization of `raw`.
    pub(crate) fn evict(&mut self, raw: &RawClass) {
        self.entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|ty, _| ty.raw() != raw);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
