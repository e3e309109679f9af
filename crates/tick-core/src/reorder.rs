//! Maps a drag-and-drop move over the visible (filtered) list onto the full,
//! canonical sequence.
//!
//! The drag layer only knows indices into the filtered view. To apply the
//! move without disturbing hidden items:
//!
//! 1. Move the id at `previous_index` to `current_index` within `visible_ids`.
//! 2. Collect the positions in the full sequence occupied by visible ids, in
//!    ascending order.
//! 3. Refill exactly those positions, in order, with the moved visible ids.
//!
//! Hidden items keep their positions; the set of ids in the visible slots is
//! unchanged, only their arrangement among those slots differs.

use std::collections::{HashMap, HashSet};

/// Move the element at `from` to `to`, shifting the elements in between.
///
/// Both indices are clamped into range. Returns false when nothing moved.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if items.is_empty() {
        return false;
    }
    let last = items.len() - 1;
    let from = from.min(last);
    let to = to.min(last);
    if from == to {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Apply a visible-list move to `full`.
///
/// `visible_ids` are the ids shown before the move, in display order, and
/// `key` extracts an element's id. Returns `None` when the move is a no-op or
/// when `visible_ids` does not describe a subsequence of `full` (duplicate or
/// unknown ids, which means the caller's view is stale).
pub fn reorder_visible<T, K>(
    full: &[T],
    visible_ids: &[String],
    previous_index: usize,
    current_index: usize,
    key: K,
) -> Option<Vec<T>>
where
    T: Clone,
    K: Fn(&T) -> &str,
{
    let mut next_visible: Vec<&str> = visible_ids.iter().map(String::as_str).collect();
    if !move_item(&mut next_visible, previous_index, current_index) {
        return None;
    }

    let visible_set: HashSet<&str> = visible_ids.iter().map(String::as_str).collect();
    if visible_set.len() != visible_ids.len() {
        return None;
    }

    let mut by_id: HashMap<&str, &T> = HashMap::with_capacity(visible_set.len());
    let mut visible_positions = Vec::with_capacity(visible_set.len());
    for (index, item) in full.iter().enumerate() {
        let id = key(item);
        if visible_set.contains(id) {
            visible_positions.push(index);
            by_id.insert(id, item);
        }
    }
    if visible_positions.len() != next_visible.len() || by_id.len() != next_visible.len() {
        return None;
    }

    let mut next = full.to_vec();
    for (slot, id) in visible_positions.into_iter().zip(next_visible) {
        let item = by_id.get(id)?;
        next[slot] = (*item).clone();
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    fn run(full: &[&str], visible: &[&str], from: usize, to: usize) -> Option<Vec<String>> {
        let full = ids(full);
        reorder_visible(&full, &ids(visible), from, to, String::as_str)
    }

    #[test]
    fn move_item_shifts_between() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(move_item(&mut items, 0, 2));
        assert_eq!(items, ['b', 'c', 'a', 'd']);
        assert!(move_item(&mut items, 3, 0));
        assert_eq!(items, ['d', 'b', 'c', 'a']);
    }

    #[test]
    fn move_item_clamps_and_detects_noop() {
        let mut items = vec![1, 2, 3];
        assert!(move_item(&mut items, 0, 99));
        assert_eq!(items, [2, 3, 1]);
        assert!(!move_item(&mut items, 5, 2));
        assert!(!move_item(&mut Vec::<u8>::new(), 0, 1));
    }

    #[test]
    fn unfiltered_reorder_is_plain_move() {
        let next = run(&["a", "b", "c"], &["a", "b", "c"], 2, 0).expect("moved");
        assert_eq!(next, ["c", "a", "b"]);
    }

    #[test]
    fn hidden_items_keep_their_slots() {
        // b and d are filtered out.
        let next = run(&["a", "b", "c", "d", "e"], &["a", "c", "e"], 0, 2).expect("moved");
        assert_eq!(next, ["c", "b", "e", "d", "a"]);
    }

    #[test]
    fn equal_indices_are_noop() {
        assert!(run(&["a", "b"], &["a", "b"], 1, 1).is_none());
    }

    #[test]
    fn empty_visible_list_is_noop() {
        assert!(run(&["a", "b"], &[], 0, 1).is_none());
    }

    #[test]
    fn stale_visible_ids_are_rejected() {
        assert!(run(&["a", "b", "c"], &["a", "zz"], 0, 1).is_none());
        assert!(run(&["a", "b", "c"], &["a", "a", "b"], 0, 2).is_none());
    }
}
