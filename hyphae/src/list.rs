//! A doubly-linked list whose nodes live in a [`Pool`].
//!
//! See the [`List`] type for details.
use crate::{
    pool::{NodeRef, Pool},
    util::{FmtPool, OnDrop},
};
use core::{fmt, iter::FusedIterator, marker::PhantomData, mem, ptr};

mod cursor;
pub use self::cursor::{Cursor, CursorMut};


#[cfg(test)]
std::thread_local! {
    /// Counts calls to `List::link_before` on the current thread.
    static LINK_RUNS: core::cell::Cell<usize> = const { core::cell::Cell::new(0) };
}

/// A doubly-linked list that stores its values in the nodes of a [`Pool`].
///
/// A `List` never allocates: every value pushed into it is written into a node
/// taken from the pool it was created with, and the node goes back to the pool
/// when the value is removed or the list is dropped. Many lists may share one
/// pool, and nodes (together with their values) can be moved between lists
/// sharing a pool in _O_(1) with [`List::splice`], [`List::append`] and
/// friends, without moving the values themselves.
///
/// The list owns the values stored in its nodes, and drops them when it is
/// dropped. The nodes themselves belong to the pool, which must outlive every
/// list created from it.
///
/// A list does not track its length; [`List::len`] walks the list.
///
/// # Merging
///
/// [`List::merge`] and its variants merge two sorted lists by linking whole
/// runs of nodes at a time, rather than one node at a time. This makes lists
/// in a shared pool a good building block for merge sorts; see the
/// [`sort`](crate::sort) module.
///
/// ```
/// use hyphae::{List, Pool};
///
/// let pool = Pool::with_capacity(6);
/// let mut odds = List::new(&pool);
/// odds.extend([1, 3, 5]);
/// let mut evens = List::new(&pool);
/// evens.extend([2, 2, 4]);
///
/// evens.merge(&mut odds);
/// assert!(odds.is_empty());
/// assert_eq!(evens.iter().copied().collect::<Vec<_>>(), [1, 2, 2, 3, 4, 5]);
/// ```
pub struct List<'pool, T> {
    pool: &'pool Pool<T>,
    sentinel: Links,
}

/// Identifies a position in a [`List`]: either one of its nodes, or the
/// position just past its last node (returned by [`List::end`]).
///
/// Positions are used to name insertion points and the bounds of ranges
/// passed to [`List::splice`]. They are plain node identities: two positions
/// are equal if and only if they refer to the same node. A position does not
/// borrow its list, so it is up to the caller not to use a position after its
/// node has been removed, or with a list it does not belong to; this is why
/// the methods taking positions are `unsafe`. [`Cursor`] and [`CursorMut`]
/// offer a safe alternative for most uses.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position(NodeRef);

/// Iterates over the values in a [`List`] by reference.
pub struct Iter<'a, T> {
    pool: &'a Pool<T>,
    head: NodeRef,
    tail: NodeRef,
}

/// Iterates over the values in a [`List`] by mutable reference.
pub struct IterMut<'a, T> {
    pool: &'a Pool<T>,
    head: NodeRef,
    tail: NodeRef,
    _values: PhantomData<&'a mut T>,
}

/// An owning iterator over the values in a [`List`].
///
/// Each value's node is returned to the pool as soon as the value is
/// yielded.
pub struct IntoIter<'pool, T> {
    list: List<'pool, T>,
}

/// The links stored in a list's sentinel.
///
/// `next` is the first node in the list and `prev` is the last. The first
/// node's `prev` link and the last node's `next` link are
/// [`NodeRef::SENTINEL`], which always refers back to the sentinel of the list
/// being traversed. An empty list's sentinel links to itself in both
/// directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Links {
    next: NodeRef,
    prev: NodeRef,
}

/// The part of the donor list in a merge that has not been linked into the
/// target list yet.
///
/// Linking runs into the target never unlinks them from the donor: the
/// donor's sentinel is reset when the merge starts, and only the bounds of the
/// remaining run are tracked here. If a comparison panics, dropping the
/// `Donor` hands whatever is left back to the donor list.
struct Donor<'a, 'pool, T> {
    list: &'a mut List<'pool, T>,
    first: NodeRef,
    last: NodeRef,
}

// ==== impl List ====

impl<'pool, T> List<'pool, T> {
    /// Returns a new empty list that will store its values in `pool`.
    #[must_use]
    pub const fn new(pool: &'pool Pool<T>) -> Self {
        Self {
            pool,
            sentinel: Links::EMPTY,
        }
    }

    /// Returns the pool this list stores its values in.
    #[must_use]
    pub fn pool(&self) -> &'pool Pool<T> {
        self.pool
    }

    /// Returns `true` if this list is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        if self.sentinel.next.is_sentinel() {
            debug_assert!(
                self.sentinel.prev.is_sentinel(),
                "inconsistent state: a list had a tail but no head!"
            );
            return true;
        }

        false
    }

    /// Returns the number of values in this list.
    ///
    /// Lists do not keep track of their length, so this is an _O_(_n_)
    /// operation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Borrows the first value in the list, or returns `None` if the list is
    /// empty.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.get(self.sentinel.next)
    }

    /// Borrows the last value in the list, or returns `None` if the list is
    /// empty.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.get(self.sentinel.prev)
    }

    /// Mutably borrows the first value in the list, or returns `None` if the
    /// list is empty.
    #[must_use]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.sentinel.next)
    }

    /// Mutably borrows the last value in the list, or returns `None` if the
    /// list is empty.
    #[must_use]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.sentinel.prev)
    }

    /// Returns the position of the first node in the list, or [`List::end`] if
    /// the list is empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        Position(self.sentinel.next)
    }

    /// Returns the position just past the last node in the list.
    ///
    /// Every list's end position compares equal to every other list's end
    /// position.
    #[must_use]
    pub fn end(&self) -> Position {
        Position(NodeRef::SENTINEL)
    }

    /// Pushes `value` to the front of the list.
    ///
    /// # Panics
    ///
    /// If every node in the list's pool is in use.
    pub fn push_front(&mut self, value: T) {
        self.insert_node_with(self.sentinel.next, || value);
    }

    /// Pushes `value` to the back of the list.
    ///
    /// # Panics
    ///
    /// If every node in the list's pool is in use.
    pub fn push_back(&mut self, value: T) {
        self.insert_node_with(NodeRef::SENTINEL, || value);
    }

    /// Removes the first value in the list and returns it, or returns `None`
    /// if the list is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let node = self.sentinel.next;
        self.remove_node(node)
    }

    /// Removes the last value in the list and returns it, or returns `None` if
    /// the list is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let node = self.sentinel.prev;
        self.remove_node(node)
    }

    /// Inserts `value` immediately before `pos`, and returns the position of
    /// the new node.
    ///
    /// # Safety
    ///
    /// `pos` must be a position in this list: either [`List::end`], or a node
    /// currently in this list.
    ///
    /// # Panics
    ///
    /// If every node in the list's pool is in use.
    pub unsafe fn insert(&mut self, pos: Position, value: T) -> Position {
        Position(self.insert_node_with(pos.0, || value))
    }

    /// Inserts the value returned by `f` immediately before `pos`, and returns
    /// the position of the new node.
    ///
    /// The node is taken from the pool before `f` is called. If `f` panics,
    /// the node is returned to the pool and the list is left unchanged.
    ///
    /// # Safety
    ///
    /// `pos` must be a position in this list: either [`List::end`], or a node
    /// currently in this list.
    ///
    /// # Panics
    ///
    /// If every node in the list's pool is in use.
    pub unsafe fn insert_with(&mut self, pos: Position, f: impl FnOnce() -> T) -> Position {
        Position(self.insert_node_with(pos.0, f))
    }

    /// Moves the nodes in the range `[first, last)` of `other` into this list,
    /// immediately before `pos`.
    ///
    /// Only the links of the nodes at the ends of the range, and of their
    /// neighbours, are rewritten, so this is _O_(1) regardless of the length
    /// of the range. No value is moved, cloned or dropped.
    ///
    /// # Safety
    ///
    /// - `pos` must be a position in this list.
    /// - `first` must be a node in `other`, and `last` must be a position in
    ///   `other` that is reachable from `first` by moving forwards.
    ///
    /// # Panics
    ///
    /// - If `first == last`.
    /// - If `other` stores its values in a different pool.
    pub unsafe fn splice(
        &mut self,
        pos: Position,
        other: &mut List<'pool, T>,
        first: Position,
        last: Position,
    ) {
        self.assert_same_pool(other);
        assert_ne!(first, last, "cannot splice an empty range");
        assert!(
            !first.0.is_sentinel(),
            "a splice range cannot start at the end of a list"
        );
        let first = first.0;
        let run_last = other.prev_of(last.0);
        test_trace!(?first, ?run_last, ?pos, "List::splice");
        other.unlink(first, run_last);
        self.link_before(pos.0, first, run_last);
    }

    /// Moves every node in `other` into this list, immediately before `pos`.
    ///
    /// Does nothing if `other` is empty. This is _O_(1).
    ///
    /// # Safety
    ///
    /// `pos` must be a position in this list.
    ///
    /// # Panics
    ///
    /// If `other` stores its values in a different pool.
    pub unsafe fn splice_list(&mut self, pos: Position, other: &mut List<'pool, T>) {
        self.assert_same_pool(other);
        let Links { next, prev } = mem::replace(&mut other.sentinel, Links::EMPTY);
        if next.is_sentinel() {
            return;
        }
        test_trace!(first = ?next, last = ?prev, ?pos, "List::splice_list");
        self.link_before(pos.0, next, prev);
    }

    /// Moves every node in `other` to the back of this list, leaving `other`
    /// empty.
    ///
    /// This is _O_(1).
    ///
    /// # Panics
    ///
    /// If `other` stores its values in a different pool.
    pub fn append(&mut self, other: &mut List<'pool, T>) {
        let end = self.end();
        // Safety: the end position is always a position in this list.
        unsafe { self.splice_list(end, other) }
    }

    /// Moves every node in `other` to the front of this list, leaving `other`
    /// empty.
    ///
    /// This is _O_(1).
    ///
    /// # Panics
    ///
    /// If `other` stores its values in a different pool.
    pub fn prepend(&mut self, other: &mut List<'pool, T>) {
        let begin = self.begin();
        // Safety: the first node (or the end, if the list is empty) is always
        // a position in this list.
        unsafe { self.splice_list(begin, other) }
    }

    /// Merges the sorted list `other` into this sorted list, using `T`'s
    /// [`Ord`] implementation.
    ///
    /// See [`List::merge_by`] for details.
    pub fn merge(&mut self, other: &mut List<'pool, T>)
    where
        T: Ord,
    {
        self.merge_by(other, |a, b| a < b);
    }

    /// Merges the sorted list `other` into this sorted list, comparing the
    /// keys extracted by `f`.
    ///
    /// See [`List::merge_by`] for details.
    pub fn merge_by_key<K, F>(&mut self, other: &mut List<'pool, T>, mut f: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.merge_by(other, |a, b| f(a) < f(b));
    }

    /// Merges the sorted list `other` into this sorted list, comparing the
    /// keys returned by `project` with `compare`.
    ///
    /// `compare(a, b)` must return `true` if `a` is strictly ordered before
    /// `b`. See [`List::merge_by`] for details.
    pub fn merge_projected<K, C, P>(
        &mut self,
        other: &mut List<'pool, T>,
        mut compare: C,
        mut project: P,
    ) where
        C: FnMut(&K, &K) -> bool,
        P: FnMut(&T) -> K,
    {
        self.merge_by(other, |a, b| compare(&project(a), &project(b)));
    }

    /// Merges the sorted list `other` into this sorted list, using `is_less`
    /// to compare values.
    ///
    /// Both lists must already be sorted in non-decreasing order, and
    /// `is_less(a, b)` must return `true` if `a` is strictly ordered before
    /// `b`. Afterwards, this list contains every value from both lists in
    /// non-decreasing order, and `other` is empty. The merge is stable: values
    /// from `other` are placed after any equal values already in this list.
    ///
    /// Rather than moving values from `other` one at a time, the merge finds
    /// each maximal run of values in `other` that belongs before the current
    /// value of this list, and links the whole run in at once. This takes
    /// _O_(_m_ + _n_) comparisons, but only _O_(_r_) link updates, where _r_ is
    /// the number of runs moved.
    ///
    /// If the lists are not sorted, every value still ends up in this list,
    /// in an unspecified order. If `is_less` panics, both lists are left in a
    /// valid state, and every value is in one of them.
    ///
    /// # Panics
    ///
    /// If `other` stores its values in a different pool.
    pub fn merge_by<F>(&mut self, other: &mut List<'pool, T>, mut is_less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        self.assert_same_pool(other);
        if self.is_empty() {
            self.append(other);
            return;
        }
        if other.is_empty() {
            return;
        }

        let pool = self.pool;
        let mut donor = Donor::new(other);
        let mut this = self.sentinel.next;
        loop {
            // Safety: `this` is a node in this list and `donor.first` is a
            // node remaining in the donor, so both hold values. Relinking
            // nodes never touches their values, so the borrows stay valid
            // across the `link_before` below.
            let current = unsafe { pool.value(this) };
            let head = donor.first;
            if is_less(unsafe { pool.value(head) }, current) {
                // Find the longest run of donor nodes that all belong before
                // `current`.
                let mut run_last = head;
                let mut exhausted = true;
                while run_last != donor.last {
                    let next = pool.next(run_last);
                    if !is_less(unsafe { pool.value(next) }, current) {
                        exhausted = false;
                        break;
                    }
                    run_last = next;
                }

                donor.consume_through(run_last);
                test_trace!(first = ?head, last = ?run_last, before = ?this, "List::merge_by: link run");
                self.link_before(this, head, run_last);
                if exhausted {
                    return;
                }
                // The donor's new head is already known not to be less than
                // `current`, so there's no need to compare them again.
            }

            this = pool.next(this);
            if this.is_sentinel() {
                let (first, last) = (donor.first, donor.last);
                donor.consume_through(last);
                test_trace!(?first, ?last, "List::merge_by: link tail");
                self.link_before(NodeRef::SENTINEL, first, last);
                return;
            }
        }
    }

    /// Takes every value out of this list, returning them in a new list on the
    /// same pool, and leaving this list empty.
    ///
    /// This is _O_(1). The returned list owns exactly the nodes this list
    /// owned, in the same order.
    #[must_use]
    pub fn take(&mut self) -> Self {
        let pool = self.pool;
        mem::replace(self, List::new(pool))
    }

    /// Drops every value in the list, and returns all of its nodes to the
    /// pool at once.
    ///
    /// If one of the values panics while being dropped, the values after it
    /// are leaked, but the nodes are still returned to the pool.
    pub fn clear(&mut self) {
        let Links {
            next: first,
            prev: last,
        } = mem::replace(&mut self.sentinel, Links::EMPTY);
        if first.is_sentinel() {
            return;
        }

        let pool = self.pool;
        let _release = OnDrop::new(|| pool.release(first, last));
        let mut node = first;
        loop {
            let next = pool.next(node);
            // Safety: the detached nodes all held values owned by this list,
            // and nothing else can reach them now.
            unsafe { pool.drop_value(node) };
            if node == last {
                break;
            }
            node = next;
        }
    }

    /// Returns an iterator over the values in this list, by reference.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            pool: self.pool,
            head: self.sentinel.next,
            tail: self.sentinel.prev,
        }
    }

    /// Returns an iterator over the values in this list, by mutable
    /// reference.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            pool: self.pool,
            head: self.sentinel.next,
            tail: self.sentinel.prev,
            _values: PhantomData,
        }
    }

    /// Returns a [`Cursor`] starting at the first value in this list.
    ///
    /// If the list is empty, the cursor starts at the end position.
    #[must_use]
    pub fn cursor_front(&self) -> Cursor<'_, 'pool, T> {
        Cursor::new(self, self.sentinel.next)
    }

    /// Returns a [`Cursor`] starting at the last value in this list.
    ///
    /// If the list is empty, the cursor starts at the end position.
    #[must_use]
    pub fn cursor_back(&self) -> Cursor<'_, 'pool, T> {
        Cursor::new(self, self.sentinel.prev)
    }

    /// Returns a [`CursorMut`] starting at the first value in this list.
    ///
    /// The [`CursorMut`] type can be used to modify both the values in the
    /// list and the *structure* of the list, by inserting or removing values
    /// at the cursor's current position.
    #[must_use]
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, 'pool, T> {
        let curr = self.sentinel.next;
        CursorMut::new(self, curr)
    }

    /// Returns a [`CursorMut`] starting at the last value in this list.
    #[must_use]
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, 'pool, T> {
        let curr = self.sentinel.prev;
        CursorMut::new(self, curr)
    }

    /// Asserts as many of the list's invariants as possible.
    ///
    /// This walks the whole list, checking that every node's neighbours link
    /// back to it, and that the walk reaches the last node without visiting
    /// more nodes than the pool holds.
    #[track_caller]
    pub fn assert_valid(&self) {
        let Links {
            next: head,
            prev: tail,
        } = self.sentinel;
        if head.is_sentinel() || tail.is_sentinel() {
            assert_eq!(
                head, tail,
                "if either end of the list is the sentinel, both ends must be"
            );
            return;
        }

        let pool = self.pool;
        assert_eq!(
            pool.prev(head),
            NodeRef::SENTINEL,
            "the head node's prev link must be the sentinel; head={head:?}"
        );
        assert_eq!(
            pool.next(tail),
            NodeRef::SENTINEL,
            "the tail node's next link must be the sentinel; tail={tail:?}"
        );

        let mut node = head;
        let mut seen = 1;
        loop {
            let next = pool.next(node);
            if next.is_sentinel() {
                assert_eq!(
                    node, tail,
                    "reached the end of the list at {node:?}, but the tail is {tail:?}"
                );
                return;
            }
            assert_eq!(
                pool.prev(next),
                node,
                "node's next link does not link back to it; node={node:?}, next={next:?}"
            );
            seen += 1;
            assert!(
                seen <= pool.capacity(),
                "list visited more nodes than its pool holds; the list must be cyclic"
            );
            node = next;
        }
    }

    /// Returns the nodes in this list, in order.
    #[cfg(test)]
    pub(crate) fn nodes(&self) -> alloc::vec::Vec<NodeRef> {
        let mut nodes = alloc::vec::Vec::new();
        let mut node = self.sentinel.next;
        while !node.is_sentinel() {
            nodes.push(node);
            node = self.pool.next(node);
        }
        nodes
    }

    fn get(&self, node: NodeRef) -> Option<&T> {
        if node.is_sentinel() {
            return None;
        }
        // Safety: every node reachable from the sentinel holds a value owned
        // by this list, and we are borrowing the list.
        Some(unsafe { self.pool.value(node) })
    }

    fn get_mut(&mut self, node: NodeRef) -> Option<&mut T> {
        if node.is_sentinel() {
            return None;
        }
        // Safety: every node reachable from the sentinel holds a value owned
        // by this list, and we are mutably borrowing the list.
        Some(unsafe { self.pool.value_mut(node) })
    }

    fn insert_node_with(&mut self, pos: NodeRef, f: impl FnOnce() -> T) -> NodeRef {
        let pool = self.pool;
        let node = pool.acquire();
        let release = OnDrop::new(|| pool.release(node, node));
        let value = f();
        release.defuse();

        // Safety: the node was just taken off the free chain, so it holds no
        // value and nothing else refers to it.
        unsafe { pool.write(node, value) };
        self.link_before(pos, node, node);
        test_trace!(?node, ?pos, "List::insert");
        node
    }

    fn remove_node(&mut self, node: NodeRef) -> Option<T> {
        if node.is_sentinel() {
            return None;
        }
        self.unlink(node, node);
        // Safety: the node was in this list, so it holds a value, and it has
        // just been unlinked, so nothing else can reach it.
        let value = unsafe { self.pool.take(node) };
        self.pool.release(node, node);
        test_trace!(?node, "List::remove");
        Some(value)
    }

    /// Links the run of nodes from `first` to `last` immediately before `pos`.
    ///
    /// The run's interior links are left as they are, and nothing is done to
    /// whatever the run was previously linked into.
    fn link_before(&mut self, pos: NodeRef, first: NodeRef, last: NodeRef) {
        #[cfg(test)]
        LINK_RUNS.with(|runs| runs.set(runs.get() + 1));
        let prev = self.prev_of(pos);
        self.set_next_of(prev, first);
        self.pool.set_prev(first, prev);
        self.pool.set_next(last, pos);
        self.set_prev_of(pos, last);
    }

    /// Unlinks the run of nodes from `first` to `last` from this list.
    ///
    /// The run's own outward links are left dangling.
    fn unlink(&mut self, first: NodeRef, last: NodeRef) {
        let prev = self.prev_of(first);
        let next = self.next_of(last);
        self.set_next_of(prev, next);
        self.set_prev_of(next, prev);
    }

    #[inline]
    fn next_of(&self, node: NodeRef) -> NodeRef {
        if node.is_sentinel() {
            self.sentinel.next
        } else {
            self.pool.next(node)
        }
    }

    #[inline]
    fn prev_of(&self, node: NodeRef) -> NodeRef {
        if node.is_sentinel() {
            self.sentinel.prev
        } else {
            self.pool.prev(node)
        }
    }

    #[inline]
    fn set_next_of(&mut self, node: NodeRef, next: NodeRef) {
        if node.is_sentinel() {
            self.sentinel.next = next;
        } else {
            self.pool.set_next(node, next);
        }
    }

    #[inline]
    fn set_prev_of(&mut self, node: NodeRef, prev: NodeRef) {
        if node.is_sentinel() {
            self.sentinel.prev = prev;
        } else {
            self.pool.set_prev(node, prev);
        }
    }

    #[track_caller]
    fn assert_same_pool(&self, other: &Self) {
        assert!(
            ptr::eq(self.pool, other.pool),
            "lists must share a pool; self.pool={:?}, other.pool={:?}",
            FmtPool(self.pool),
            FmtPool(other.pool),
        );
    }
}

impl<T> Drop for List<'_, T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Extend<T> for List<'_, T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'pool, T> IntoIterator for List<'pool, T> {
    type Item = T;
    type IntoIter = IntoIter<'pool, T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a List<'_, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut List<'_, T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for List<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ==== impl Links ====

impl Links {
    const EMPTY: Self = Self {
        next: NodeRef::SENTINEL,
        prev: NodeRef::SENTINEL,
    };
}

// ==== impl Position ====

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_sentinel() {
            f.write_str("Position(end)")
        } else {
            f.debug_tuple("Position").field(&self.0).finish()
        }
    }
}

// ==== impl Donor ====

impl<'a, 'pool, T> Donor<'a, 'pool, T> {
    fn new(list: &'a mut List<'pool, T>) -> Self {
        let Links { next, prev } = mem::replace(&mut list.sentinel, Links::EMPTY);
        Self {
            list,
            first: next,
            last: prev,
        }
    }

    /// Marks every node up to and including `node` as linked into the target.
    fn consume_through(&mut self, node: NodeRef) {
        if node == self.last {
            self.first = NodeRef::SENTINEL;
            self.last = NodeRef::SENTINEL;
        } else {
            self.first = self.list.pool.next(node);
        }
    }
}

impl<T> Drop for Donor<'_, '_, T> {
    fn drop(&mut self) {
        if self.first.is_sentinel() {
            return;
        }
        let pool = self.list.pool;
        pool.set_prev(self.first, NodeRef::SENTINEL);
        pool.set_next(self.last, NodeRef::SENTINEL);
        self.list.sentinel = Links {
            next: self.first,
            prev: self.last,
        };
    }
}

// ==== impl Iter ====

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.head;
        if node.is_sentinel() {
            return None;
        }
        if node == self.tail {
            self.head = NodeRef::SENTINEL;
            self.tail = NodeRef::SENTINEL;
        } else {
            self.head = self.pool.next(node);
        }
        // Safety: the iterator borrows the list, and only yields nodes that
        // are in the list.
        Some(unsafe { self.pool.value(node) })
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let node = self.tail;
        if node.is_sentinel() {
            return None;
        }
        if node == self.head {
            self.head = NodeRef::SENTINEL;
            self.tail = NodeRef::SENTINEL;
        } else {
            self.tail = self.pool.prev(node);
        }
        // Safety: the iterator borrows the list, and only yields nodes that
        // are in the list.
        Some(unsafe { self.pool.value(node) })
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool,
            head: self.head,
            tail: self.tail,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// ==== impl IterMut ====

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.head;
        if node.is_sentinel() {
            return None;
        }
        if node == self.tail {
            self.head = NodeRef::SENTINEL;
            self.tail = NodeRef::SENTINEL;
        } else {
            self.head = self.pool.next(node);
        }
        // Safety: the iterator mutably borrows the list, and yields each node
        // at most once, so the returned references never alias.
        Some(unsafe { self.pool.value_mut(node) })
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let node = self.tail;
        if node.is_sentinel() {
            return None;
        }
        if node == self.head {
            self.head = NodeRef::SENTINEL;
            self.tail = NodeRef::SENTINEL;
        } else {
            self.tail = self.pool.prev(node);
        }
        // Safety: the iterator mutably borrows the list, and yields each node
        // at most once, so the returned references never alias.
        Some(unsafe { self.pool.value_mut(node) })
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

// ==== impl IntoIter ====

impl<T> Iterator for IntoIter<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }
}

impl<T> DoubleEndedIterator for IntoIter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T> FusedIterator for IntoIter<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}
