use super::*;

/// Based on this test from the standard library's `linked_list::Cursor`
/// interface:
/// https://github.com/rust-lang/rust/blob/ec21d7ea3ca8e96863f175fbd4a6bfee79529d6c/library/alloc/src/collections/linked_list/tests.rs#L564-L655
#[test]
fn move_peek() {
    let _trace = super::trace_init();

    let pool = Pool::with_capacity(6);
    let mut list = list_from_iter(&pool, [1, 2, 3, 4, 5, 6]);

    let mut cursor = list.cursor_front();
    assert_eq!(cursor.current(), Some(&1));
    assert_eq!(cursor.peek_next(), Some(&2));
    assert_eq!(cursor.peek_prev(), None);
    assert!(!cursor.is_end());
    cursor.move_prev();
    assert_eq!(cursor.current(), None);
    assert_eq!(cursor.peek_next(), Some(&1));
    assert_eq!(cursor.peek_prev(), Some(&6));
    assert!(cursor.is_end());
    cursor.move_next();
    cursor.move_next();
    assert_eq!(cursor.current(), Some(&2));
    assert_eq!(cursor.peek_next(), Some(&3));
    assert_eq!(cursor.peek_prev(), Some(&1));

    let mut cursor = list.cursor_back();
    assert_eq!(cursor.current(), Some(&6));
    assert_eq!(cursor.peek_next(), None);
    assert_eq!(cursor.peek_prev(), Some(&5));
    cursor.move_next();
    assert_eq!(cursor.current(), None);
    assert_eq!(cursor.peek_next(), Some(&1));
    assert_eq!(cursor.peek_prev(), Some(&6));
    cursor.move_prev();
    cursor.move_prev();
    assert_eq!(cursor.current(), Some(&5));
    assert_eq!(cursor.peek_next(), Some(&6));
    assert_eq!(cursor.peek_prev(), Some(&4));

    let mut cursor = list.cursor_front_mut();
    assert_eq!(cursor.current_mut(), Some(&mut 1));
    cursor.move_next();
    *cursor.current_mut().unwrap() = 20;
    assert_eq!(cursor.peek_prev(), Some(&1));
    assert_eq!(cursor.peek_next(), Some(&3));
    cursor.move_prev();
    cursor.move_prev();
    assert!(cursor.is_end());
    assert_eq!(cursor.current_mut(), None);
    assert_eq!(cursor.peek_prev(), Some(&6));

    assert_eq!(collect_vals(&list), vec![1, 20, 3, 4, 5, 6]);
}

#[test]
fn cursors_on_empty_list() {
    let pool = Pool::<i32>::with_capacity(0);
    let mut list = List::new(&pool);

    let mut cursor = list.cursor_front();
    assert!(cursor.is_end());
    assert_eq!(cursor.current(), None);
    assert_eq!(cursor.peek_next(), None);
    assert_eq!(cursor.peek_prev(), None);
    cursor.move_next();
    assert!(cursor.is_end());
    assert_eq!(cursor, list.cursor_back());
    assert_eq!(cursor.position(), list.end());

    let mut cursor = list.cursor_back_mut();
    assert!(cursor.is_end());
    assert_eq!(cursor.remove_current(), None);
    cursor.move_prev();
    assert!(cursor.is_end());
}

#[test]
fn cursor_positions_match_list_positions() {
    let pool = Pool::with_capacity(3);
    let list = list_from_iter(&pool, [1, 2, 3]);

    let front = list.cursor_front();
    assert_eq!(front.position(), list.begin());

    let mut back = list.cursor_back();
    assert_ne!(front, back);
    back.move_prev();
    back.move_prev();
    assert_eq!(front, back);

    let mut cloned = back.clone();
    cloned.move_next();
    assert_ne!(cloned, back);
    assert_eq!(cloned.current(), Some(&2));
}

#[test]
fn current_outlives_cursor_moves() {
    let pool = Pool::with_capacity(3);
    let list = list_from_iter(&pool, [1, 2, 3]);

    let mut cursor = list.cursor_front();
    let first = cursor.current();
    cursor.move_next();
    let second = cursor.current();
    drop(cursor);
    assert_eq!((first, second), (Some(&1), Some(&2)));
}

#[test]
fn insert_around_cursor() {
    let _trace = super::trace_init();

    let pool = Pool::with_capacity(8);
    let mut list = list_from_iter(&pool, [2, 4]);

    let mut cursor = list.cursor_front_mut();
    cursor.insert_before(1);
    cursor.insert_after(3);
    assert_eq!(cursor.current(), Some(&2));
    assert_eq!(cursor.peek_prev(), Some(&1));
    assert_eq!(cursor.peek_next(), Some(&3));

    // At the end position, inserting before pushes to the back, and inserting
    // after pushes to the front.
    cursor.move_prev();
    cursor.move_prev();
    assert!(cursor.is_end());
    cursor.insert_before(5);
    cursor.insert_after(0);
    assert!(cursor.is_end());

    list.assert_valid();
    assert_eq!(collect_vals(&list), vec![0, 1, 2, 3, 4, 5]);
    assert_nodes_partitioned(&pool, &[&list]);
}

#[test]
fn remove_current() {
    let _trace = super::trace_init();

    let pool = Pool::with_capacity(4);
    let mut list = list_from_iter(&pool, [1, 2, 3, 4]);

    let mut cursor = list.cursor_front_mut();
    cursor.move_next();
    assert_eq!(cursor.remove_current(), Some(2));
    assert_eq!(cursor.current(), Some(&3));
    assert_eq!(cursor.peek_prev(), Some(&1));

    cursor.move_next();
    assert_eq!(cursor.remove_current(), Some(4));
    // Removing the last value leaves the cursor at the end position.
    assert!(cursor.is_end());
    assert_eq!(cursor.remove_current(), None);

    cursor.move_next();
    assert_eq!(cursor.remove_current(), Some(1));
    assert_eq!(cursor.remove_current(), Some(3));
    assert!(cursor.is_end());

    list.assert_valid();
    assert!(list.is_empty());
    assert_eq!(pool.free_len(), 4);
}

#[test]
fn splice_around_cursor() {
    let _trace = super::trace_init();

    let pool = Pool::with_capacity(8);
    let mut list = list_from_iter(&pool, [1, 5]);
    let mut before = list_from_iter(&pool, [2, 3]);
    let mut after = list_from_iter(&pool, [6, 7]);
    let mut empty = List::new(&pool);

    let mut cursor = list.cursor_back_mut();
    cursor.splice_before(&mut before);
    cursor.splice_after(&mut after);
    cursor.splice_after(&mut empty);
    assert_eq!(cursor.current(), Some(&5));
    cursor.move_prev();
    cursor.insert_after(4);
    assert_eq!(cursor.current(), Some(&3));

    assert!(before.is_empty());
    assert!(after.is_empty());
    assert_eq!(collect_vals(&list), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_nodes_partitioned(&pool, &[&list, &before, &after, &empty]);
}

#[test]
#[should_panic(expected = "lists must share a pool")]
fn splice_from_another_pool() {
    let pool_a = Pool::with_capacity(1);
    let pool_b = Pool::with_capacity(1);
    let mut a = list_from_iter(&pool_a, [1]);
    let mut b = list_from_iter(&pool_b, [2]);

    a.cursor_front_mut().splice_before(&mut b);
}

#[test]
fn as_cursor() {
    let pool = Pool::with_capacity(3);
    let mut list = list_from_iter(&pool, [1, 2, 3]);

    let mut cursor = list.cursor_front_mut();
    cursor.move_next();
    let mut read_only = cursor.as_cursor();
    assert_eq!(read_only.current(), Some(&2));
    read_only.move_next();
    assert_eq!(read_only.current(), Some(&3));

    // Moving the read-only cursor doesn't move the original.
    assert_eq!(cursor.current(), Some(&2));
}

#[test]
fn debug_fmt() {
    let pool = Pool::with_capacity(1);
    let mut list = list_from_iter(&pool, [1]);
    let cursor = list.cursor_front();
    let fmt = format!("{cursor:?}");
    assert!(fmt.starts_with("Cursor { curr: #0, pool: "), "{fmt}");

    let cursor = list.cursor_back_mut();
    let fmt = format!("{cursor:?}");
    assert!(fmt.starts_with("CursorMut { curr: #0, pool: "), "{fmt}");
}
