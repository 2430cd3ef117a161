// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recycling pool of views keyed by logical index.
//!
//! Every view the pool ever built lives in one arena and is in exactly one of
//! four places:
//!
//! - **visible**: bound to a logical index (at most one view per index),
//! - **recycled**: reset and waiting to be dequeued again,
//! - **pending**: dequeued by the data source but not bound yet,
//! - **detached**: not bound to an index but still on screen (a deleted cell
//!   fading out, or the cell being dragged).
//!
//! Views are never destroyed while the pool lives; the recycled set has no
//! upper bound.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::fmt;

use hashbrown::HashSet;
use slotmap::SlotMap;
use smallvec::SmallVec;

slotmap::new_key_type! {
    /// Stable handle of a view owned by a grid.
    pub struct ViewId;
}

/// Views that can be bound to an index and reset for reuse.
pub(crate) trait Reusable {
    /// Current index, `None` while unbound.
    fn index(&self) -> Option<usize>;
    /// Records the index the view is bound to.
    fn set_index(&mut self, index: Option<usize>);
    /// Drops per-index state before the view joins the recycled set.
    fn prepare_for_reuse(&mut self);
}

type Factory<V> = Box<dyn FnMut(ViewId) -> V>;

/// Arena of views plus the index → view map.
pub(crate) struct Pool<V> {
    views: SlotMap<ViewId, V>,
    visible: BTreeMap<usize, ViewId>,
    recycled: HashSet<ViewId>,
    pending: HashSet<ViewId>,
    detached: HashSet<ViewId>,
    factory: Factory<V>,
}

impl<V> fmt::Debug for Pool<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("views", &self.views.len())
            .field("visible", &self.visible)
            .field("recycled", &self.recycled.len())
            .field("pending", &self.pending.len())
            .field("detached", &self.detached.len())
            .finish_non_exhaustive()
    }
}

impl<V> Pool<V> {
    pub(crate) fn new(factory: impl FnMut(ViewId) -> V + 'static) -> Self {
        Self {
            views: SlotMap::with_key(),
            visible: BTreeMap::new(),
            recycled: HashSet::new(),
            pending: HashSet::new(),
            detached: HashSet::new(),
            factory: Box::new(factory),
        }
    }

    /// Replaces the factory used when the recycled set is empty.
    pub(crate) fn set_factory(&mut self, factory: impl FnMut(ViewId) -> V + 'static) {
        self.factory = Box::new(factory);
    }

    /// Takes a recycled view, or builds a new one if none is available.
    ///
    /// The view is pending until it is bound.
    pub(crate) fn dequeue(&mut self) -> ViewId {
        let id = match self.recycled.iter().next().copied() {
            Some(id) => {
                self.recycled.remove(&id);
                id
            }
            None => {
                let factory = &mut self.factory;
                let id = self.views.insert_with_key(|id| factory(id));
                tracing::trace!(total = self.views.len(), "view created");
                id
            }
        };
        self.pending.insert(id);
        id
    }

    pub(crate) fn get(&self, id: ViewId) -> Option<&V> {
        self.views.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: ViewId) -> Option<&mut V> {
        self.views.get_mut(id)
    }

    /// View bound to `index`.
    pub(crate) fn id_at(&self, index: usize) -> Option<ViewId> {
        self.visible.get(&index).copied()
    }

    /// Bound views in index order.
    pub(crate) fn visible(&self) -> impl Iterator<Item = (usize, ViewId)> + '_ {
        self.visible.iter().map(|(&index, &id)| (index, id))
    }

    #[cfg(test)]
    pub(crate) fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Views on screen without an index.
    pub(crate) fn detached(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.detached.iter().copied()
    }

    #[cfg(test)]
    pub(crate) fn is_detached(&self, id: ViewId) -> bool {
        self.detached.contains(&id)
    }

    #[cfg(test)]
    pub(crate) fn is_recycled(&self, id: ViewId) -> bool {
        self.recycled.contains(&id)
    }

    #[cfg(test)]
    pub(crate) fn recycled_len(&self) -> usize {
        self.recycled.len()
    }

    /// Number of views ever built.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.views.len()
    }
}

impl<V: Reusable> Pool<V> {
    /// Binds `id` to `index`.
    ///
    /// A view already bound to `index` is recycled first. Returns `false` if
    /// `id` does not belong to this pool.
    pub(crate) fn bind(&mut self, id: ViewId, index: usize) -> bool {
        if !self.views.contains_key(id) {
            tracing::error!(?id, index, "binding a view from another pool");
            return false;
        }
        if let Some(previous) = self.visible.get(&index).copied() {
            if previous == id {
                return true;
            }
            tracing::error!(index, "index is already bound, recycling the previous view");
            self.recycle(previous);
        }
        if let Some(old) = self.views.get(id).and_then(Reusable::index) {
            if self.visible.get(&old) == Some(&id) {
                self.visible.remove(&old);
            }
        }
        self.pending.remove(&id);
        self.detached.remove(&id);
        self.recycled.remove(&id);
        if let Some(view) = self.views.get_mut(id) {
            view.set_index(Some(index));
        }
        self.visible.insert(index, id);
        tracing::trace!(?id, index, "view bound");
        true
    }

    /// Unbinds the view at `index` and keeps it on screen, detached.
    pub(crate) fn unbind(&mut self, index: usize) -> Option<ViewId> {
        let id = self.visible.remove(&index)?;
        if let Some(view) = self.views.get_mut(id) {
            view.set_index(None);
        }
        self.detached.insert(id);
        Some(id)
    }

    /// Resets `id` and moves it to the recycled set.
    pub(crate) fn recycle(&mut self, id: ViewId) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        if let Some(index) = view.index() {
            if self.visible.get(&index) == Some(&id) {
                self.visible.remove(&index);
            }
        }
        view.prepare_for_reuse();
        view.set_index(None);
        self.pending.remove(&id);
        self.detached.remove(&id);
        self.recycled.insert(id);
        tracing::trace!(?id, "view recycled");
    }

    /// Rekeys bound views after a structural change.
    ///
    /// `map` translates each old index to its new index, or `None` if the
    /// index no longer exists. Views whose index disappeared are detached and
    /// returned with their old index so the caller can animate them out.
    pub(crate) fn remap(
        &mut self,
        mut map: impl FnMut(usize) -> Option<usize>,
    ) -> SmallVec<[(usize, ViewId); 8]> {
        let old = core::mem::take(&mut self.visible);
        let mut removed = SmallVec::new();
        for (index, id) in old {
            match map(index) {
                Some(new_index) => {
                    debug_assert!(
                        !self.visible.contains_key(&new_index),
                        "index map is not injective"
                    );
                    if let Some(view) = self.views.get_mut(id) {
                        view.set_index(Some(new_index));
                    }
                    self.visible.insert(new_index, id);
                }
                None => {
                    if let Some(view) = self.views.get_mut(id) {
                        view.set_index(None);
                    }
                    self.detached.insert(id);
                    removed.push((index, id));
                }
            }
        }
        removed
    }

    /// Recycles views that were dequeued but never bound.
    pub(crate) fn reclaim_pending(&mut self) {
        let pending: SmallVec<[ViewId; 8]> = self.pending.drain().collect();
        for id in pending {
            self.recycle(id);
        }
    }

    /// Recycles every bound, pending and detached view.
    pub(crate) fn recycle_all(&mut self) {
        let ids: SmallVec<[ViewId; 32]> = self
            .visible
            .values()
            .chain(self.pending.iter())
            .chain(self.detached.iter())
            .copied()
            .collect();
        for id in ids {
            self.recycle(id);
        }
    }
}

/// Access to a grid's reuse queue while it asks for a view.
///
/// Data sources and delegates receive a `ReuseQueue` and call
/// [`dequeue`](Self::dequeue) to get a view, configure it through
/// [`get_mut`](Self::get_mut), and return its [`ViewId`]. A dequeued view is
/// either a previously recycled one (already reset) or a freshly built one.
pub struct ReuseQueue<'a, V> {
    pool: &'a mut Pool<V>,
}

impl<V> fmt::Debug for ReuseQueue<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReuseQueue")
            .field("pool", &self.pool)
            .finish()
    }
}

impl<'a, V> ReuseQueue<'a, V> {
    pub(crate) fn new(pool: &'a mut Pool<V>) -> Self {
        Self { pool }
    }

    /// Dequeues a reusable view.
    pub fn dequeue(&mut self) -> ViewId {
        self.pool.dequeue()
    }

    /// Dequeues a view and configures it with `configure`.
    pub fn dequeue_with(&mut self, configure: impl FnOnce(&mut V)) -> ViewId {
        let id = self.pool.dequeue();
        if let Some(view) = self.pool.get_mut(id) {
            configure(view);
        }
        id
    }

    /// A view of this grid.
    pub fn get(&self, id: ViewId) -> Option<&V> {
        self.pool.get(id)
    }

    /// A view of this grid, mutably.
    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut V> {
        self.pool.get_mut(id)
    }
}
