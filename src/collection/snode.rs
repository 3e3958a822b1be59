use std::{
    io::{Error, ErrorKind, Result},
    iter::FusedIterator,
    marker::PhantomData,
};

/// Index of a node inside a [`NodePool`], or [`SLink::NONE`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct SLink(u32);

impl SLink {
    pub(crate) const NONE: SLink = SLink(u32::MAX);

    /// Largest number of slots a pool can address
    pub(crate) const MAX_SLOTS: usize = u32::MAX as usize;

    #[inline(always)]
    fn from_index(index: usize) -> SLink {
        debug_assert!(index < SLink::MAX_SLOTS);
        SLink(index as u32)
    }
    #[inline(always)]
    pub(crate) fn is_none(self) -> bool {
        self == SLink::NONE
    }
    #[inline(always)]
    pub(crate) fn is_some(self) -> bool {
        !self.is_none()
    }
    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        debug_assert!(self.is_some());
        self.0 as usize
    }
}

pub(crate) struct SNode<T> {
    pub(crate) value: T,
    pub(crate) next: SLink,
}

enum Slot<T> {
    Occupied(SNode<T>),
    Vacant { next_free: SLink },
}

/// Arena holding the nodes of one list.
///
/// Removed slots are threaded onto a LIFO free list and handed out again by
/// [`NodePool::insert`] before the arena grows.
pub(crate) struct NodePool<T> {
    slots: Vec<Slot<T>>,
    free: SLink,
    len: usize,
}

impl<T> NodePool<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: SLink::NONE,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(SLink::MAX_SLOTS)),
            free: SLink::NONE,
            len: 0,
        }
    }

    /// Number of occupied slots
    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of nodes the pool can hold without reallocating
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[inline(always)]
    fn vacant(&self) -> usize {
        self.slots.len() - self.len
    }

    /// Makes room for `additional` more nodes, counting free slots first.
    ///
    /// # Errors
    ///  * `ErrorKind::OutOfMemory` when the allocation fails or the pool would
    ///    exceed its addressable size. The pool is left unchanged.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let needed = additional.saturating_sub(self.vacant());
        if needed == 0 {
            return Ok(());
        }
        if self.slots.len().saturating_add(needed) > SLink::MAX_SLOTS {
            return Err(Error::from(ErrorKind::OutOfMemory));
        }
        let before = self.slots.capacity();
        if self.slots.try_reserve(needed).is_err() {
            return Err(Error::from(ErrorKind::OutOfMemory));
        }
        self.log_growth(before);
        Ok(())
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        let needed = additional.saturating_sub(self.vacant());
        let before = self.slots.capacity();
        self.slots.reserve(needed);
        self.log_growth(before);
    }

    #[inline]
    fn log_growth(&self, before: usize) {
        if self.slots.capacity() != before {
            log::trace!(
                "node pool grew from {} to {} slots",
                before,
                self.slots.capacity()
            );
        }
    }

    /// Stores a new node and returns its link.
    ///
    /// # Complexity
    ///  * O(1) amortized
    pub(crate) fn insert(&mut self, value: T, next: SLink) -> SLink {
        let node = SNode { value, next };
        if self.free.is_some() {
            let link = self.free;
            let slot = &mut self.slots[link.index()];
            match slot {
                Slot::Vacant { next_free } => self.free = *next_free,
                Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            }
            *slot = Slot::Occupied(node);
            self.len += 1;
            link
        } else {
            if self.slots.len() >= SLink::MAX_SLOTS {
                panic!("node pool exhausted");
            }
            let before = self.slots.capacity();
            let link = SLink::from_index(self.slots.len());
            self.slots.push(Slot::Occupied(node));
            self.log_growth(before);
            self.len += 1;
            link
        }
    }

    /// Releases the slot behind `link` and returns its node.
    pub(crate) fn remove(&mut self, link: SLink) -> SNode<T> {
        let slot = std::mem::replace(
            &mut self.slots[link.index()],
            Slot::Vacant {
                next_free: self.free,
            },
        );
        match slot {
            Slot::Occupied(node) => {
                self.free = link;
                self.len -= 1;
                node
            }
            Slot::Vacant { .. } => panic!("removing vacant node slot {}", link.index()),
        }
    }

    #[inline]
    pub(crate) fn get(&self, link: SLink) -> &SNode<T> {
        match &self.slots[link.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("reading vacant node slot {}", link.index()),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, link: SLink) -> &mut SNode<T> {
        match &mut self.slots[link.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("writing vacant node slot {}", link.index()),
        }
    }

    /// Returns the link stored in the `next` field of `link`
    #[inline]
    pub(crate) fn next_of(&self, link: SLink) -> SLink {
        self.get(link).next
    }

    /// Drops every node, keeping the allocation
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free = SLink::NONE;
        self.len = 0;
    }

    /// Walks the free list, most recently freed slot first
    #[cfg(test)]
    pub(crate) fn free_list(&self) -> Vec<SLink> {
        let mut out = Vec::new();
        let mut it = self.free;
        while it.is_some() {
            out.push(it);
            it = match &self.slots[it.index()] {
                Slot::Vacant { next_free } => *next_free,
                Slot::Occupied(_) => panic!("free list reaches occupied slot {}", it.index()),
            };
        }
        out
    }

    /// Number of slots in use or on the free list
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Mutable iterator over the `len` nodes chained from `head`
    pub(crate) fn chain_mut(&mut self, head: SLink, len: usize) -> IterMut<'_, T> {
        IterMut {
            slots: self.slots.as_mut_ptr(),
            slot_count: self.slots.len(),
            pos: head,
            remaining: len,
            _phantom: PhantomData,
        }
    }
}

/// Mutable iterator over a list, front to back
pub struct IterMut<'a, T> {
    slots: *mut Slot<T>,
    slot_count: usize,
    pos: SLink,
    remaining: usize,
    _phantom: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos.is_none() {
            return None;
        }
        let index = self.pos.index();
        assert!(index < self.slot_count);
        // The chain is acyclic, so each slot is handed out at most once while
        // the pool stays mutably borrowed for 'a.
        let slot = unsafe { &mut *self.slots.add(index) };
        match slot {
            Slot::Occupied(node) => {
                self.pos = node.next;
                self.remaining -= 1;
                Some(&mut node.value)
            }
            Slot::Vacant { .. } => panic!("chain reaches vacant node slot {}", index),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_link_sentinel() {
        assert!(SLink::NONE.is_none());
        assert!(!SLink::NONE.is_some());
        assert!(SLink::from_index(0).is_some());
        assert_eq!(SLink::from_index(7).index(), 7);
    }

    #[test]
    fn test_insert_remove() {
        let mut pool = NodePool::<i32>::new();
        assert_eq!(pool.len(), 0);

        let a = pool.insert(1, SLink::NONE);
        let b = pool.insert(2, a);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(b).value, 2);
        assert_eq!(pool.next_of(b), a);
        assert!(pool.next_of(a).is_none());

        pool.get_mut(a).value = 10;
        assert_eq!(pool.get(a).value, 10);

        let node = pool.remove(b);
        assert_eq!(node.value, 2);
        assert_eq!(node.next, a);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.free_list(), vec![b]);
    }

    #[test]
    fn test_slot_reuse() {
        let mut pool = NodePool::<String>::with_capacity(4);
        let a = pool.insert("a".to_string(), SLink::NONE);
        let b = pool.insert("b".to_string(), SLink::NONE);
        let c = pool.insert("c".to_string(), SLink::NONE);
        pool.remove(a);
        pool.remove(c);
        // LIFO: the last freed slot comes back first
        assert_eq!(pool.insert("d".to_string(), SLink::NONE), c);
        assert_eq!(pool.insert("e".to_string(), SLink::NONE), a);
        assert_eq!(pool.slot_count(), 3);
        assert_eq!(pool.get(b).value, "b");
        assert!(pool.free_list().is_empty());
    }

    #[test]
    fn test_reserve() {
        let mut pool = NodePool::<u64>::new();
        assert!(pool.try_reserve(16).is_ok());
        assert!(pool.capacity() >= 16);
        let cap = pool.capacity();
        for i in 0..16 {
            pool.insert(i, SLink::NONE);
        }
        assert_eq!(pool.capacity(), cap);

        pool.reserve(1);
        assert!(pool.capacity() >= 17);

        assert!(pool
            .try_reserve(usize::MAX)
            .is_err_and(|e| e.kind() == ErrorKind::OutOfMemory));
        assert_eq!(pool.len(), 16);
    }

    #[test]
    fn test_clear() {
        let mut pool = NodePool::<u8>::new();
        let a = pool.insert(1, SLink::NONE);
        pool.insert(2, a);
        pool.remove(a);
        pool.clear();
        assert_eq!(pool.len(), 0);
        assert!(pool.free_list().is_empty());
        assert_eq!(pool.slot_count(), 0);
    }

    #[test]
    #[should_panic]
    fn test_read_vacant() {
        let mut pool = NodePool::<u8>::new();
        let a = pool.insert(1, SLink::NONE);
        pool.remove(a);
        let _ = pool.get(a);
    }
}
