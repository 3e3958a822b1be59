use std::{fmt, io::Result, iter::FusedIterator};

use super::{IterMut, NodePool, SLink};

/// Singly linked list with O(1) insertion at both ends.
///
/// Nodes live in a per-list node pool and are linked by index, so the list
/// never holds dangling references: a node is released as soon as it is
/// unlinked and its slot is reused by the next insertion.
pub struct SList<T> {
    pub(crate) head: SLink,
    pub(crate) tail: SLink,
    pub(crate) pool: NodePool<T>,
}

impl<T> SList<T> {
    /// Returns a new empty list
    pub const fn new() -> Self {
        Self {
            head: SLink::NONE,
            tail: SLink::NONE,
            pool: NodePool::new(),
        }
    }

    /// Returns a new empty list able to hold `capacity` values without
    /// reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            head: SLink::NONE,
            tail: SLink::NONE,
            pool: NodePool::with_capacity(capacity),
        }
    }

    /// Returns the number of values in the list
    ///
    /// # Complexity
    ///  * O(1)
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[inline(always)]
    /// Returns `true` if the list is empty
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the number of values the list can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Reserves room for at least `additional` more values
    pub fn reserve(&mut self, additional: usize) {
        self.pool.reserve(additional);
    }

    /// Reserves room for at least `additional` more values
    ///
    /// # Errors
    ///  * `ErrorKind::OutOfMemory` when the node pool cannot grow
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.pool.try_reserve(additional)
    }

    #[inline(always)]
    /// # Returns
    ///  * `Some(front)` the front of the list when `!self.is_empty()`
    ///  * `None` when `self.is_empty()`
    pub fn front(&self) -> Option<&T> {
        if self.head.is_none() {
            None
        } else {
            Some(&self.pool.get(self.head).value)
        }
    }

    #[inline(always)]
    /// # Returns
    ///  * `Some(back)` the back of the list when `!self.is_empty()`
    ///  * `None` when `self.is_empty()`
    pub fn back(&self) -> Option<&T> {
        if self.tail.is_none() {
            None
        } else {
            Some(&self.pool.get(self.tail).value)
        }
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        if self.head.is_none() {
            None
        } else {
            Some(&mut self.pool.get_mut(self.head).value)
        }
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.tail.is_none() {
            None
        } else {
            Some(&mut self.pool.get_mut(self.tail).value)
        }
    }

    /// Adds a value at the back of the list
    ///
    /// # Complexity
    ///  * O(1) amortized
    pub fn append(&mut self, value: T) {
        let new_tail = self.pool.insert(value, SLink::NONE);
        if self.tail.is_none() {
            self.head = new_tail;
        } else {
            self.pool.get_mut(self.tail).next = new_tail;
        }
        self.tail = new_tail;
    }

    /// Adds a value at the front of the list
    ///
    /// # Complexity
    ///  * O(1) amortized
    pub fn prepend(&mut self, value: T) {
        let new_head = self.pool.insert(value, self.head);
        if self.head.is_none() {
            self.tail = new_head;
        }
        self.head = new_head;
    }

    /// Like [`SList::append`] but reports allocation failure instead of
    /// aborting. The list is unchanged on error.
    pub fn try_append(&mut self, value: T) -> Result<()> {
        self.pool.try_reserve(1)?;
        self.append(value);
        Ok(())
    }

    /// Like [`SList::prepend`] but reports allocation failure instead of
    /// aborting. The list is unchanged on error.
    pub fn try_prepend(&mut self, value: T) -> Result<()> {
        self.pool.try_reserve(1)?;
        self.prepend(value);
        Ok(())
    }

    fn pop_front_unchecked(&mut self) -> T {
        let old_head = self.pool.remove(self.head);
        self.head = old_head.next;
        if self.head.is_none() {
            self.tail = SLink::NONE;
        }
        old_head.value
    }

    /// Removes and returns the front of the list when `!self.is_empty()`
    ///
    /// # Complexity
    ///  * O(1)
    pub fn pop_front(&mut self) -> Option<T> {
        if self.head.is_some() {
            Some(self.pop_front_unchecked())
        } else {
            None
        }
    }

    /// Removes and returns the back of the list when `!self.is_empty()`
    ///
    /// # Complexity
    ///  * O(n)
    pub fn pop_back(&mut self) -> Option<T> {
        let old_tail = self.tail;
        if old_tail.is_none() {
            return None;
        }
        if self.head == old_tail {
            self.head = SLink::NONE;
            self.tail = SLink::NONE;
            return Some(self.pool.remove(old_tail).value);
        }
        let mut it = self.head;
        loop {
            let next = self.pool.next_of(it);
            if next == old_tail {
                self.pool.get_mut(it).next = SLink::NONE;
                self.tail = it;
                return Some(self.pool.remove(old_tail).value);
            }
            it = next;
        }
    }

    /// Removes the first value, scanning from the front, that equals `value`.
    ///
    /// Equality is `PartialEq` as implemented by `T`: a value that does not
    /// compare equal to itself (such as `f64::NAN`) is never found.
    ///
    /// # Returns
    ///  * `true` when a value was removed
    ///  * `false` when no value matched; the list is unchanged
    /// # Complexity
    ///  * O(n)
    pub fn delete(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        if self.head.is_none() {
            return false;
        }
        if self.pool.get(self.head).value == *value {
            self.pop_front_unchecked();
            return true;
        }
        let mut prev = self.head;
        let mut it = self.pool.next_of(prev);
        while it.is_some() {
            if self.pool.get(it).value == *value {
                let removed = self.pool.remove(it);
                self.pool.get_mut(prev).next = removed.next;
                if it == self.tail {
                    self.tail = prev;
                }
                return true;
            }
            prev = it;
            it = self.pool.next_of(it);
        }
        false
    }

    /// Returns `true` if some value in the list equals `value`.
    ///
    /// Same equality caveat as [`SList::delete`].
    pub fn search(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|it| it == value)
    }

    /// Reverses the list in place
    ///
    /// # Complexity
    ///  * O(n), no allocation
    pub fn reverse(&mut self) {
        let mut prev = SLink::NONE;
        let mut current = self.head;
        self.tail = self.head;
        while current.is_some() {
            let next = std::mem::replace(&mut self.pool.get_mut(current).next, prev);
            prev = current;
            current = next;
        }
        self.head = prev;
    }

    /// Returns a copy of the values, front to back
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Returns the values joined by `" -> "`, or an empty string for an
    /// empty list
    pub fn render(&self) -> String
    where
        T: fmt::Display,
    {
        self.to_string()
    }

    /// Drops every value. The node pool keeps its allocation.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.head = SLink::NONE;
        self.tail = SLink::NONE;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            pool: &self.pool,
            pos: self.head,
            remaining: self.len(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let len = self.len();
        self.pool.chain_mut(self.head, len)
    }

    /// Keeps the values for which `f` returns `true`.
    ///
    /// # Returns
    ///  * the removed values, in their original order
    pub fn retain<F>(&mut self, mut f: F) -> SList<T>
    where
        F: FnMut(&mut T) -> bool,
    {
        let mut removed = SList::new();

        // First deal with head removal
        while self.head.is_some() {
            if f(&mut self.pool.get_mut(self.head).value) {
                break;
            }
            removed.append(self.pop_front_unchecked());
        }
        if self.head.is_none() {
            return removed;
        }
        // Process non-head nodes
        let mut prev = self.head;
        let mut it = self.pool.next_of(prev);
        while it.is_some() {
            if f(&mut self.pool.get_mut(it).value) {
                prev = it;
                it = self.pool.next_of(it);
            } else {
                let node = self.pool.remove(it);
                self.pool.get_mut(prev).next = node.next;
                if it == self.tail {
                    self.tail = prev;
                }
                it = node.next;
                removed.append(node.value);
            }
        }
        removed
    }

    /// Moves every value of `other` to the back of `self`, leaving `other`
    /// empty.
    ///
    /// # Complexity
    ///  * O(other.len()): values move into this list's node pool
    pub fn append_list(&mut self, other: &mut SList<T>) {
        if other.is_empty() {
            return;
        }
        let other = std::mem::take(other);
        self.reserve(other.len());
        for value in other {
            self.append(value);
        }
    }

    /// Moves every value of `other` to the front of `self`, keeping their
    /// order and leaving `other` empty.
    ///
    /// # Complexity
    ///  * O(other.len())
    pub fn prepend_list(&mut self, other: &mut SList<T>) {
        if other.is_empty() {
            return;
        }
        let mut other = std::mem::take(other);
        self.reserve(other.len());
        other.reverse();
        for value in other {
            self.prepend(value);
        }
    }

    pub fn swap(&mut self, other: &mut SList<T>) {
        std::mem::swap(self, other);
    }

    /// Rebuilds the node pool so that nodes are stored front to back in
    /// consecutive slots, releasing every vacant slot.
    pub fn compact(&mut self) {
        let len = self.len();
        let old = std::mem::replace(self, SList::with_capacity(len));
        let reclaimed = old.pool.slot_count() - len;
        for value in old {
            self.append(value);
        }
        log::debug!(
            "compacted list of {} nodes, reclaimed {} vacant slots",
            len,
            reclaimed
        );
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        use rustc_hash::FxHashSet;

        let len = self.len();
        assert_eq!(len == 0, self.head.is_none());
        assert_eq!(self.head.is_none(), self.tail.is_none());

        let mut visited = FxHashSet::<SLink>::default();
        let mut last = SLink::NONE;
        let mut it = self.head;
        while it.is_some() {
            assert!(visited.insert(it), "cycle through slot {}", it.index());
            assert!(visited.len() <= len);
            last = it;
            it = self.pool.next_of(it);
        }
        assert_eq!(visited.len(), len);
        assert_eq!(last, self.tail);
        assert_eq!(
            self.pool.free_list().len() + len,
            self.pool.slot_count()
        );
    }
}

impl<T> Default for SList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for SList<T> {
    fn clone(&self) -> Self {
        let mut list = SList::with_capacity(self.len());
        list.extend(self.iter().cloned());
        list
    }
}

impl<T> fmt::Debug for SList<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> fmt::Display for SList<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut it = self.iter();
        if let Some(first) = it.next() {
            write!(f, "{}", first)?;
            for value in it {
                write!(f, " -> {}", value)?;
            }
        }
        Ok(())
    }
}

impl<T: PartialEq> PartialEq for SList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SList<T> {}

impl<T> Extend<T> for SList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.append(value);
        }
    }
}

impl<T> FromIterator<T> for SList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = SList::new();
        list.extend(iter);
        list
    }
}

impl<T> From<Vec<T>> for SList<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

pub struct Iter<'a, T> {
    pool: &'a NodePool<T>,
    pos: SLink,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos.is_none() {
            None
        } else {
            let node = self.pool.get(self.pos);
            self.pos = node.next;
            self.remaining -= 1;
            Some(&node.value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool,
            pos: self.pos,
            remaining: self.remaining,
        }
    }
}

/// Owning iterator, front to back
pub struct IntoIter<T> {
    list: SList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for SList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a SList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
