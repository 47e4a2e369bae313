use super::{List, Position};
use crate::{pool::NodeRef, util::FmtPool};
use core::fmt;

/// A cursor over a [`List`].
///
/// A cursor points either at a value in the list, or at the list's end
/// position, which sits between the last value and the first. Moving past
/// either end of the list lands on the end position, and moving once more
/// wraps around to the other end, like the cursors of
/// `std::collections::LinkedList`.
///
/// A `Cursor` only borrows the list, so any number of them may exist at once.
/// To modify the list, use a [`CursorMut`] instead.
pub struct Cursor<'a, 'pool, T> {
    list: &'a List<'pool, T>,
    curr: NodeRef,
}

/// A cursor over a [`List`] that can modify the list.
///
/// In addition to moving through the list like a [`Cursor`], a `CursorMut`
/// can mutate the value it points at, insert and remove values around its
/// position, and splice whole lists in before or after its position. Because
/// the cursor holds a mutable borrow of its list, its position is always a
/// valid position in that list, so none of these operations need to be
/// `unsafe`.
pub struct CursorMut<'a, 'pool, T> {
    list: &'a mut List<'pool, T>,
    curr: NodeRef,
}

// === impl Cursor ====

impl<'a, 'pool, T> Cursor<'a, 'pool, T> {
    pub(super) fn new(list: &'a List<'pool, T>, curr: NodeRef) -> Self {
        Self { list, curr }
    }

    /// Returns the cursor's position in the list.
    #[must_use]
    pub fn position(&self) -> Position {
        Position(self.curr)
    }

    /// Borrows the value the cursor points at, or returns `None` if the
    /// cursor is at the end position.
    ///
    /// The returned reference borrows the list, not the cursor, so it remains
    /// usable after the cursor moves.
    #[must_use]
    pub fn current(&self) -> Option<&'a T> {
        self.list.get(self.curr)
    }

    /// Borrows the value after the cursor's position.
    ///
    /// If the cursor is at the end position, this is the first value in the
    /// list. If the cursor is at the last value, this returns `None`.
    #[must_use]
    pub fn peek_next(&self) -> Option<&'a T> {
        self.list.get(self.list.next_of(self.curr))
    }

    /// Borrows the value before the cursor's position.
    ///
    /// If the cursor is at the end position, this is the last value in the
    /// list. If the cursor is at the first value, this returns `None`.
    #[must_use]
    pub fn peek_prev(&self) -> Option<&'a T> {
        self.list.get(self.list.prev_of(self.curr))
    }

    /// Moves the cursor to the next position in the list.
    ///
    /// If the cursor is at the end position, this moves it to the first value.
    /// If it is at the last value, this moves it to the end position.
    pub fn move_next(&mut self) {
        self.curr = self.list.next_of(self.curr);
    }

    /// Moves the cursor to the previous position in the list.
    ///
    /// If the cursor is at the end position, this moves it to the last value.
    /// If it is at the first value, this moves it to the end position.
    pub fn move_prev(&mut self) {
        self.curr = self.list.prev_of(self.curr);
    }

    /// Returns `true` if the cursor is at the end position.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.curr.is_sentinel()
    }
}

impl<T> Clone for Cursor<'_, '_, T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            curr: self.curr,
        }
    }
}

impl<T> PartialEq for Cursor<'_, '_, T> {
    /// Two cursors are equal if they point at the same position.
    fn eq(&self, other: &Self) -> bool {
        self.curr == other.curr
    }
}

impl<T> Eq for Cursor<'_, '_, T> {}

impl<T> fmt::Debug for Cursor<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("curr", &self.curr)
            .field("pool", &FmtPool(self.list.pool))
            .finish()
    }
}

// === impl CursorMut ====

impl<'a, 'pool, T> CursorMut<'a, 'pool, T> {
    pub(super) fn new(list: &'a mut List<'pool, T>, curr: NodeRef) -> Self {
        Self { list, curr }
    }

    /// Returns the cursor's position in the list.
    #[must_use]
    pub fn position(&self) -> Position {
        Position(self.curr)
    }

    /// Borrows the value the cursor points at, or returns `None` if the
    /// cursor is at the end position.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.list.get(self.curr)
    }

    /// Mutably borrows the value the cursor points at, or returns `None` if
    /// the cursor is at the end position.
    #[must_use]
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.list.get_mut(self.curr)
    }

    /// Borrows the value after the cursor's position.
    ///
    /// If the cursor is at the end position, this is the first value in the
    /// list. If the cursor is at the last value, this returns `None`.
    #[must_use]
    pub fn peek_next(&self) -> Option<&T> {
        self.list.get(self.list.next_of(self.curr))
    }

    /// Borrows the value before the cursor's position.
    ///
    /// If the cursor is at the end position, this is the last value in the
    /// list. If the cursor is at the first value, this returns `None`.
    #[must_use]
    pub fn peek_prev(&self) -> Option<&T> {
        self.list.get(self.list.prev_of(self.curr))
    }

    /// Moves the cursor to the next position in the list.
    ///
    /// If the cursor is at the end position, this moves it to the first value.
    /// If it is at the last value, this moves it to the end position.
    pub fn move_next(&mut self) {
        self.curr = self.list.next_of(self.curr);
    }

    /// Moves the cursor to the previous position in the list.
    ///
    /// If the cursor is at the end position, this moves it to the last value.
    /// If it is at the first value, this moves it to the end position.
    pub fn move_prev(&mut self) {
        self.curr = self.list.prev_of(self.curr);
    }

    /// Returns `true` if the cursor is at the end position.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.curr.is_sentinel()
    }

    /// Inserts `value` before the cursor's position.
    ///
    /// If the cursor is at the end position, the value is pushed to the back
    /// of the list. The cursor does not move.
    ///
    /// # Panics
    ///
    /// If every node in the list's pool is in use.
    pub fn insert_before(&mut self, value: T) {
        self.list.insert_node_with(self.curr, || value);
    }

    /// Inserts `value` after the cursor's position.
    ///
    /// If the cursor is at the end position, the value is pushed to the front
    /// of the list. The cursor does not move.
    ///
    /// # Panics
    ///
    /// If every node in the list's pool is in use.
    pub fn insert_after(&mut self, value: T) {
        let next = self.list.next_of(self.curr);
        self.list.insert_node_with(next, || value);
    }

    /// Removes the value the cursor points at and returns it, moving the
    /// cursor to the next position.
    ///
    /// If the cursor is at the end position, nothing is removed and this
    /// returns `None`.
    pub fn remove_current(&mut self) -> Option<T> {
        let node = self.curr;
        if node.is_sentinel() {
            return None;
        }
        self.curr = self.list.next_of(node);
        self.list.remove_node(node)
    }

    /// Moves every value in `other` into this cursor's list, before the
    /// cursor's position, leaving `other` empty. The cursor does not move.
    ///
    /// This is _O_(1).
    ///
    /// # Panics
    ///
    /// If `other` stores its values in a different pool.
    pub fn splice_before(&mut self, other: &mut List<'pool, T>) {
        let pos = self.position();
        // Safety: the cursor's position is always a position in its list.
        unsafe { self.list.splice_list(pos, other) }
    }

    /// Moves every value in `other` into this cursor's list, after the
    /// cursor's position, leaving `other` empty. The cursor does not move.
    ///
    /// This is _O_(1).
    ///
    /// # Panics
    ///
    /// If `other` stores its values in a different pool.
    pub fn splice_after(&mut self, other: &mut List<'pool, T>) {
        let next = Position(self.list.next_of(self.curr));
        // Safety: the position after the cursor's is in the same list.
        unsafe { self.list.splice_list(next, other) }
    }

    /// Returns a read-only [`Cursor`] at this cursor's position.
    ///
    /// The read-only cursor borrows this one, so it cannot outlive it.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, 'pool, T> {
        Cursor::new(self.list, self.curr)
    }
}

impl<T> fmt::Debug for CursorMut<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("curr", &self.curr)
            .field("pool", &FmtPool(self.list.pool))
            .finish()
    }
}
