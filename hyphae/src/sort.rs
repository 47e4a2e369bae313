//! Stable merge sorting built on pool-backed [`List`]s.
//!
//! The sort moves every element into a [`List`], then repeatedly splits off
//! the longest non-decreasing prefix of what remains (a *natural run*) and
//! feeds it into a binary counter of sorted lists: level `i` of the counter
//! holds the merge of roughly `2^i` runs. Merging never moves an element,
//! only relinks nodes, and [`List::merge_by`] links whole runs of nodes at a
//! time, so inputs that are already partly sorted are cheap to sort.
//!
//! [`ListMergeSorter`] owns a [`Pool`] that it reuses for every sort, while
//! the [`merge_sort`] family of functions creates a pool for a single sort.
//!
//! ```
//! let mut v = vec![5, 1, 4, 2, 3];
//! hyphae::sort::merge_sort(&mut v);
//! assert_eq!(v, [1, 2, 3, 4, 5]);
//! ```
use crate::{
    list::List,
    pool::{Pool, PoolError},
};
use alloc::vec::Vec;
use core::mem;


/// A stable merge sorter that reuses one [`Pool`] across sorts.
///
/// Creating a sorter allocates storage for `capacity` list nodes up front;
/// sorting never allocates nodes, and only allocates a small vector to hold
/// the sorter's levels of sorted lists.
///
/// ```
/// use hyphae::ListMergeSorter;
///
/// let mut sorter = ListMergeSorter::with_capacity(8);
///
/// let mut words = vec!["pear", "fig", "apple"];
/// sorter.sort(&mut words);
/// assert_eq!(words, ["apple", "fig", "pear"]);
///
/// // Sort by length, longest first. Equal lengths keep their order.
/// let mut words = vec!["kiwi", "fig", "plum", "banana"];
/// sorter.sort_by(&mut words, |a, b| a.len() > b.len());
/// assert_eq!(words, ["banana", "kiwi", "plum", "fig"]);
/// ```
#[derive(Debug)]
pub struct ListMergeSorter<T> {
    pool: Pool<T>,
    /// The length of the longest sort so far. Nodes at and past this index
    /// have never been taken from the pool, so they are still linked in
    /// storage order.
    high_water: usize,
}

/// The lists making up a sort in progress.
///
/// Every element being sorted is in exactly one of these lists. When the
/// `Sort` is dropped, every element is moved back into `out`: on success
/// that is just `carry`, which holds the sorted result, but if a comparison
/// panics, every list is drained so that no element is lost.
struct Sort<'v, 'pool, T> {
    out: &'v mut Vec<T>,
    /// Elements that have not been split into a run yet.
    input: List<'pool, T>,
    /// The run being added to the levels, or the result of the final merge.
    carry: List<'pool, T>,
    /// Level `i` is empty, or holds the merge of about `2^i` runs. Higher
    /// levels hold earlier elements of the input.
    levels: Vec<List<'pool, T>>,
}

// === impl ListMergeSorter ===

impl<T> ListMergeSorter<T> {
    /// Returns a new sorter that can sort up to `capacity` elements at a
    /// time.
    ///
    /// # Errors
    ///
    /// If storage for the sorter's node pool cannot be allocated. See
    /// [`Pool::new`].
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        Ok(Self {
            pool: Pool::new(capacity)?,
            high_water: 0,
        })
    }

    /// Returns a new sorter that can sort up to `capacity` elements at a
    /// time.
    ///
    /// # Panics
    ///
    /// If storage for the sorter's node pool cannot be allocated. Use
    /// [`ListMergeSorter::new`] to handle this case instead.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pool: Pool::with_capacity(capacity),
            high_water: 0,
        }
    }

    /// Returns the largest number of elements this sorter can sort at once.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Sorts `v` in non-decreasing order, using `T`'s [`Ord`] implementation.
    ///
    /// See [`ListMergeSorter::sort_by`] for details.
    pub fn sort(&mut self, v: &mut Vec<T>)
    where
        T: Ord,
    {
        self.sort_by(v, |a, b| a < b);
    }

    /// Sorts `v` in non-decreasing order of the keys extracted by `f`.
    ///
    /// See [`ListMergeSorter::sort_by`] for details.
    pub fn sort_by_key<K, F>(&mut self, v: &mut Vec<T>, mut f: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.sort_by(v, |a, b| f(a) < f(b));
    }

    /// Sorts `v` using `is_less` to compare elements.
    ///
    /// `is_less(a, b)` must return `true` if `a` is strictly ordered before
    /// `b`. The sort is stable: equal elements keep their relative order.
    ///
    /// If `is_less` panics, every element is moved back into `v` in an
    /// unspecified order before the panic continues, and the sorter can still
    /// be used.
    ///
    /// # Panics
    ///
    /// If `v` holds more elements than the sorter's capacity.
    pub fn sort_by<F>(&mut self, v: &mut Vec<T>, is_less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let len = v.len();
        let capacity = self.capacity();
        assert!(
            len <= capacity,
            "cannot sort {len} elements with a sorter for {capacity} elements"
        );
        if len < 2 {
            return;
        }

        // Earlier, longer sorts may have released nodes below the high-water
        // mark in any order, so every node below it must be relinked, not
        // just the first `len`.
        self.high_water = self.high_water.max(len);
        // Safety: every sort returns all of the nodes it takes before it
        // returns, even if it panics, so every node is free. Nodes past the
        // high-water mark have never been taken, so they still link in
        // storage order to the end of the chain, and this sort takes only
        // `len <= high_water` nodes.
        unsafe { self.pool.relink_prefix(self.high_water) };
        sort_in(&self.pool, v, is_less);
    }
}

// === free functions ===

/// Sorts `v` in non-decreasing order with a list merge sort, using `T`'s
/// [`Ord`] implementation.
///
/// See [`merge_sort_by`] for details.
pub fn merge_sort<T: Ord>(v: &mut Vec<T>) {
    merge_sort_by(v, |a, b| a < b);
}

/// Sorts `v` with a list merge sort, using `is_less` to compare elements.
///
/// `is_less(a, b)` must return `true` if `a` is strictly ordered before `b`.
/// The sort is stable. This creates a node pool sized for `v`, and drops it
/// once `v` is sorted; to sort many vectors, a [`ListMergeSorter`] can reuse
/// one pool instead.
///
/// If `is_less` panics, every element is moved back into `v` in an
/// unspecified order before the panic continues.
///
/// # Panics
///
/// If storage for the node pool cannot be allocated.
pub fn merge_sort_by<T, F>(v: &mut Vec<T>, is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    if v.len() < 2 {
        return;
    }
    let pool = Pool::with_capacity(v.len());
    sort_in(&pool, v, is_less);
}

/// Sorts `v` in non-decreasing order of the keys extracted by `f`, with a
/// list merge sort.
///
/// See [`merge_sort_by`] for details.
pub fn merge_sort_by_key<T, K, F>(v: &mut Vec<T>, mut f: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    merge_sort_by(v, |a, b| f(a) < f(b));
}

/// Sorts `v` by comparing the keys returned by `project` with `compare`,
/// with a list merge sort.
///
/// `compare(a, b)` must return `true` if the key `a` is strictly ordered
/// before the key `b`. See [`merge_sort_by`] for details.
///
/// ```
/// let mut v = vec![(1, 'a'), (3, 'b'), (2, 'c'), (3, 'd')];
/// // Sort by the first field, in descending order.
/// hyphae::sort::merge_sort_projected(&mut v, |a: &i32, b: &i32| a > b, |&(n, _)| n);
/// assert_eq!(v, [(3, 'b'), (3, 'd'), (2, 'c'), (1, 'a')]);
/// ```
pub fn merge_sort_projected<T, K, C, P>(v: &mut Vec<T>, mut compare: C, mut project: P)
where
    C: FnMut(&K, &K) -> bool,
    P: FnMut(&T) -> K,
{
    merge_sort_by(v, |a, b| compare(&project(a), &project(b)));
}

/// Returns the number of step-downs in `v`, using `T`'s [`Ord`]
/// implementation.
///
/// See [`runs_by`] for details.
#[must_use]
pub fn runs<T: Ord>(v: &[T]) -> usize {
    runs_by(v, |a, b| a < b)
}

/// Returns the number of step-downs in `v`: adjacent pairs of elements where
/// the second is strictly less than the first, according to `is_less`.
///
/// This measures how far `v` is from being sorted. A sorted slice has no
/// step-downs, and a slice sorted in strictly decreasing order has
/// `v.len() - 1`. `v` splits into one more non-decreasing run than it has
/// step-downs.
///
/// ```
/// use hyphae::sort::runs;
///
/// assert_eq!(runs(&[1, 2, 2, 3]), 0);
/// assert_eq!(runs(&[1, 3, 2, 4, 0]), 2);
/// assert_eq!(runs::<u8>(&[]), 0);
/// ```
#[must_use]
pub fn runs_by<T, F>(v: &[T], mut is_less: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    v.windows(2).filter(|pair| is_less(&pair[1], &pair[0])).count()
}

/// Sorts `v` using nodes from `pool`, which must have at least `v.len()` free
/// nodes.
fn sort_in<T, F>(pool: &Pool<T>, v: &mut Vec<T>, mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let mut sort = Sort {
        input: List::new(pool),
        carry: List::new(pool),
        levels: Vec::new(),
        out: v,
    };
    sort.input.extend(sort.out.drain(..));

    let mut run_count = 0;
    while sort.split_run(&mut is_less) {
        run_count += 1;
        sort.push_carry(&mut is_less);
    }
    let levels = sort.levels.len();
    sort.merge_levels(&mut is_less);

    tracing::debug!(len, runs = run_count, levels, "merge sorted");
}

// === impl Sort ===

impl<T> Sort<'_, '_, T> {
    /// Moves the longest non-decreasing prefix of `input` into `carry`.
    ///
    /// Returns `false` if `input` was empty.
    fn split_run(&mut self, is_less: &mut impl FnMut(&T, &T) -> bool) -> bool {
        debug_assert!(self.carry.is_empty());
        let end = {
            let mut cursor = self.input.cursor_front();
            let Some(mut prev) = cursor.current() else {
                return false;
            };
            loop {
                cursor.move_next();
                match cursor.current() {
                    Some(next) if !is_less(next, prev) => prev = next,
                    _ => break cursor.position(),
                }
            }
        };

        let pos = self.carry.end();
        let first = self.input.begin();
        test_trace!(?first, ?end, "Sort::split_run");
        // Safety: `end` and `first` come from `input`, with `end` after
        // `first`, and `pos` is the end of `carry`.
        unsafe { self.carry.splice(pos, &mut self.input, first, end) };
        true
    }

    /// Adds the run in `carry` to the levels, merging full levels upwards
    /// like a carry propagating through a binary counter.
    fn push_carry(&mut self, is_less: &mut impl FnMut(&T, &T) -> bool) {
        for level in &mut self.levels {
            if level.is_empty() {
                mem::swap(level, &mut self.carry);
                return;
            }
            // The level holds earlier elements than the carry, so it is the
            // merge target.
            level.merge_by(&mut self.carry, &mut *is_less);
            mem::swap(level, &mut self.carry);
        }
        let carry = self.carry.take();
        self.levels.push(carry);
    }

    /// Merges every level into `carry`, oldest first.
    fn merge_levels(&mut self, is_less: &mut impl FnMut(&T, &T) -> bool) {
        debug_assert!(self.carry.is_empty());
        for level in self.levels.iter_mut().rev() {
            self.carry.merge_by(level, &mut *is_less);
        }
    }
}

impl<T> Drop for Sort<'_, '_, T> {
    fn drop(&mut self) {
        self.out.extend(self.carry.take());
        for level in &mut self.levels {
            self.out.extend(level.take());
        }
        self.out.extend(self.input.take());
    }
}
