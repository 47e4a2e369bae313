//! A fixed-capacity pool of doubly-linked list nodes.
//!
//! See the [`Pool`] type for details.
use alloc::{boxed::Box, vec::Vec};
use core::{
    cell::{Cell, UnsafeCell},
    fmt, iter,
    mem::{self, MaybeUninit},
};


/// A fixed-capacity pool of nodes for [`List`]s.
///
/// A `Pool` allocates a single contiguous block of memory for all of its nodes
/// when it is created, and never allocates again. Any number of [`List`]s may
/// borrow the same pool; each node in the pool is either *free* or owned by
/// exactly one list at a time. Because the node storage is contiguous and
/// nodes are reused, a group of lists sharing a pool is usually considerably
/// more cache-friendly than a group of individually heap-allocated lists.
///
/// Free nodes are tracked as a singly-linked chain that reuses each node's
/// `next` link, starting from the pool's free head and ending at a null
/// marker. Taking a node off the chain and putting a whole run of nodes back
/// on it are both _O_(1).
///
/// The pool manages the lifetimes of the node *slots* only. The values stored
/// in those slots are written, read and dropped by the [`List`] that owns
/// them; dropping a `Pool` never drops a value.
///
/// # Capacity
///
/// The pool does not grow. Pushing a value into a [`List`] when every node in
/// its pool is in use is a programming error, and panics: callers are expected
/// to size the pool for their worst-case demand up front.
///
/// ```
/// use hyphae::{List, Pool};
///
/// let pool = Pool::with_capacity(4);
///
/// let mut evens = List::new(&pool);
/// let mut odds = List::new(&pool);
/// for i in 0..4 {
///     if i % 2 == 0 {
///         evens.push_back(i);
///     } else {
///         odds.push_back(i);
///     }
/// }
///
/// assert_eq!(pool.free_len(), 0);
/// drop(odds);
/// assert_eq!(pool.free_len(), 2);
/// ```
///
/// [`List`]: crate::List
pub struct Pool<T> {
    nodes: Box<[Node<T>]>,
    free: Cell<NodeRef>,
}

/// Errors returned by [`Pool::new`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// The requested capacity is larger than [`Pool::MAX_CAPACITY`].
    #[error("a node pool cannot hold {requested} nodes (the maximum is {})", MAX_CAPACITY)]
    CapacityOverflow {
        /// The requested capacity.
        requested: usize,
    },

    /// The allocator could not provide storage for the requested number of
    /// nodes.
    #[error("failed to allocate storage for a pool of {capacity} nodes")]
    AllocFailed {
        /// The requested capacity.
        capacity: usize,
    },
}

/// The index of a node in a [`Pool`], or one of the two reserved markers.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeRef(usize);

pub(crate) struct Node<T> {
    /// Initialized if and only if the node is owned by a list.
    value: UnsafeCell<MaybeUninit<T>>,
    prev: Cell<NodeRef>,
    next: Cell<NodeRef>,
}

const MAX_CAPACITY: usize = usize::MAX - 2;

// === impl NodeRef ===

impl NodeRef {
    /// Terminates the pool's free chain.
    pub(crate) const NULL: Self = Self(usize::MAX);

    /// Refers to the sentinel of whichever list is following the link.
    pub(crate) const SENTINEL: Self = Self(usize::MAX - 1);

    #[inline]
    pub(crate) fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }

    #[cfg(test)]
    pub(crate) fn index(self) -> usize {
        debug_assert!(self.0 < MAX_CAPACITY, "{self:?} is not a node index");
        self.0
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NULL => f.write_str("NULL"),
            Self::SENTINEL => f.write_str("SENTINEL"),
            Self(idx) => write!(f, "#{idx}"),
        }
    }
}

// === impl Node ===

impl<T> Node<T> {
    const fn new(next: NodeRef) -> Self {
        Self {
            value: UnsafeCell::new(MaybeUninit::uninit()),
            prev: Cell::new(NodeRef::NULL),
            next: Cell::new(next),
        }
    }
}

// === impl Pool ===

impl<T> Pool<T> {
    /// The largest number of nodes a pool can hold.
    ///
    /// Two node indices are reserved as markers, so this is slightly less than
    /// `usize::MAX`. In practice, allocation will fail long before this limit
    /// is reached.
    pub const MAX_CAPACITY: usize = MAX_CAPACITY;

    /// Returns a new pool with storage for exactly `capacity` nodes.
    ///
    /// All nodes start out free, linked in storage order, so that the first
    /// nodes handed out are adjacent in memory.
    ///
    /// # Errors
    ///
    /// - [`PoolError::CapacityOverflow`] if `capacity` is greater than
    ///   [`Pool::MAX_CAPACITY`].
    /// - [`PoolError::AllocFailed`] if the node storage could not be
    ///   allocated.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        if capacity > MAX_CAPACITY {
            return Err(PoolError::CapacityOverflow {
                requested: capacity,
            });
        }

        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(capacity)
            .map_err(|_| PoolError::AllocFailed { capacity })?;
        nodes.extend((0..capacity).map(|i| Node::new(Self::storage_next(i, capacity))));

        let free = if capacity == 0 {
            NodeRef::NULL
        } else {
            NodeRef(0)
        };

        tracing::debug!(
            capacity,
            node.size = mem::size_of::<Node<T>>(),
            "created node pool"
        );

        Ok(Self {
            nodes: nodes.into_boxed_slice(),
            free: Cell::new(free),
        })
    }

    /// Returns a new pool with storage for exactly `capacity` nodes.
    ///
    /// # Panics
    ///
    /// If `capacity` is greater than [`Pool::MAX_CAPACITY`], or if the node
    /// storage could not be allocated. Use [`Pool::new`] to handle these cases
    /// as errors instead.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::new(capacity) {
            Ok(pool) => pool,
            Err(error) => panic!("{error}"),
        }
    }

    /// Returns the total number of nodes in this pool.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of nodes that are currently free.
    ///
    /// This walks the free chain, so it is an _O_(_n_) operation.
    #[must_use]
    pub fn free_len(&self) -> usize {
        let len = self.free_chain().count();
        assert!(
            len <= self.capacity(),
            "the free chain of a pool of {} nodes is cyclic",
            self.capacity()
        );
        len
    }

    /// Relinks every node in the pool into a single free chain in storage
    /// order.
    ///
    /// Holding `&mut self` proves that no [`List`] is borrowing the pool, so
    /// no node can be in use. Any values left behind by lists that were
    /// leaked (e.g. with [`mem::forget`]) are leaked, not dropped.
    ///
    /// [`List`]: crate::List
    pub fn reset(&mut self) {
        let capacity = self.capacity();
        // Safety: every node is relinked, so the whole chain is well formed.
        unsafe { self.relink_prefix(capacity) }
    }

    /// Relinks the first `n` nodes of the pool into a free chain in storage
    /// order, and makes node 0 the head of the free chain.
    ///
    /// The remaining `capacity - n` nodes are not touched: node `n - 1` links
    /// to node `n` (unless `n` is the pool's capacity, in which case it ends
    /// the chain), and whatever node `n` links to is left as it was. If `n` is
    /// 0, this does nothing.
    ///
    /// This is an optimization for pools that are reused by a series of
    /// same-sized operations: once the lists from one operation are dropped,
    /// their nodes are scattered through the free chain in whatever order
    /// they were released. Relinking the prefix makes the next `n` nodes
    /// handed out adjacent in memory again, without walking the whole pool.
    ///
    /// # Safety
    ///
    /// After this call, at most `n` nodes may be taken from the pool before
    /// it is relinked again (with this method or [`Pool::reset`]). Node `n`
    /// may still link to nodes in `0..n`, so acquiring past the relinked
    /// prefix can hand the same node to two lists.
    ///
    /// # Panics
    ///
    /// If `n` is greater than the pool's capacity.
    pub unsafe fn relink_prefix(&mut self, n: usize) {
        let capacity = self.capacity();
        assert!(
            n <= capacity,
            "cannot relink {n} nodes in a pool of {capacity} nodes"
        );
        if n == 0 {
            return;
        }

        for (i, node) in self.nodes[..n].iter_mut().enumerate() {
            *node.next.get_mut() = Self::storage_next(i, capacity);
        }
        *self.free.get_mut() = NodeRef(0);

        tracing::trace!(n, capacity, "relinked node pool");
    }

    /// Takes a node off the free chain.
    ///
    /// # Panics
    ///
    /// If every node in the pool is in use.
    pub(crate) fn acquire(&self) -> NodeRef {
        let node = self.free.get();
        assert!(
            node != NodeRef::NULL,
            "node pool exhausted: all {} nodes are in use",
            self.capacity()
        );
        self.free.set(self.node(node).next.get());
        test_trace!(?node, "Pool::acquire");
        node
    }

    /// Puts the run of nodes from `first` to `last` back on the free chain.
    ///
    /// `last` must be reachable from `first` by following `next` links, and
    /// none of the nodes may hold a value. Only `last`'s `next` link is
    /// written, so this is _O_(1) regardless of the length of the run.
    pub(crate) fn release(&self, first: NodeRef, last: NodeRef) {
        test_trace!(?first, ?last, "Pool::release");
        self.node(last).next.set(self.free.get());
        self.free.set(first);
    }

    #[inline]
    pub(crate) fn next(&self, node: NodeRef) -> NodeRef {
        self.node(node).next.get()
    }

    #[inline]
    pub(crate) fn prev(&self, node: NodeRef) -> NodeRef {
        self.node(node).prev.get()
    }

    #[inline]
    pub(crate) fn set_next(&self, node: NodeRef, next: NodeRef) {
        self.node(node).next.set(next);
    }

    #[inline]
    pub(crate) fn set_prev(&self, node: NodeRef, prev: NodeRef) {
        self.node(node).prev.set(prev);
    }

    /// # Safety
    ///
    /// - `node` must hold a value.
    /// - The value must not be mutably borrowed for `'a`.
    #[inline]
    pub(crate) unsafe fn value<'a>(&'a self, node: NodeRef) -> &'a T {
        (*self.node(node).value.get()).assume_init_ref()
    }

    /// # Safety
    ///
    /// - `node` must hold a value.
    /// - The value must not be borrowed anywhere else for `'a`.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn value_mut<'a>(&'a self, node: NodeRef) -> &'a mut T {
        (*self.node(node).value.get()).assume_init_mut()
    }

    /// # Safety
    ///
    /// `node` must have just been acquired, so that it holds no value and
    /// nothing else refers to it.
    #[inline]
    pub(crate) unsafe fn write(&self, node: NodeRef, value: T) {
        (*self.node(node).value.get()).write(value);
    }

    /// Moves the value out of `node`, leaving it uninitialized.
    ///
    /// # Safety
    ///
    /// `node` must hold a value that is not borrowed.
    #[inline]
    pub(crate) unsafe fn take(&self, node: NodeRef) -> T {
        (*self.node(node).value.get()).assume_init_read()
    }

    /// Drops the value in `node` in place, leaving it uninitialized.
    ///
    /// # Safety
    ///
    /// `node` must hold a value that is not borrowed.
    #[inline]
    pub(crate) unsafe fn drop_value(&self, node: NodeRef) {
        (*self.node(node).value.get()).assume_init_drop();
    }

    #[cfg(test)]
    pub(crate) fn free_nodes(&self) -> Vec<NodeRef> {
        let nodes: Vec<_> = self.free_chain().collect();
        assert!(nodes.len() <= self.capacity(), "free chain is cyclic");
        nodes
    }

    #[inline]
    fn node(&self, node: NodeRef) -> &Node<T> {
        debug_assert!(
            node != NodeRef::NULL && node != NodeRef::SENTINEL,
            "{node:?} does not refer to a node in the pool"
        );
        &self.nodes[node.0]
    }

    fn free_chain(&self) -> impl Iterator<Item = NodeRef> + '_ {
        let head = Some(self.free.get()).filter(|&node| node != NodeRef::NULL);
        iter::successors(head, |&node| {
            Some(self.next(node)).filter(|&next| next != NodeRef::NULL)
        })
        .take(self.capacity() + 1)
    }

    /// The link a node has when the chain is in storage order.
    #[inline]
    const fn storage_next(idx: usize, capacity: usize) -> NodeRef {
        if idx + 1 == capacity {
            NodeRef::NULL
        } else {
            NodeRef(idx + 1)
        }
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("capacity", &self.capacity())
            .field("free", &self.free.get())
            .finish()
    }
}
