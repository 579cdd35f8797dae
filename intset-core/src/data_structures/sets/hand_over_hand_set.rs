use std::ptr;

use parking_lot::{Mutex, MutexGuard};

use crate::data_structures::ConcurrentSet;
use crate::data_structures::{Bound, Value};

type NodePtr = *mut HandOverHandNode;

///
/// Sorted set with fine-grained lock coupling ("hand-over-hand" locking).
///
// Every node's `next` lives inside that node's mutex, so a link can only be
// read or written by the thread holding its owner's lock.
//
// Traversal holds at most two adjacent locks. To advance from (pred, curr) it
// releases pred while still holding curr, then locks curr.next:
//
//   [pred]─[curr]── next        hold pred, curr
//    pred ─[curr]── next        release pred
//    pred ─[curr]─[next]        lock next (read through curr)
//
// Locks are taken strictly in list order, so there is no deadlock.
//
// A thread can only reach a node through its predecessor's lock. Remove holds
// both pred and curr while unlinking curr, so once it lets go nobody else
// can hold or be waiting for curr, and curr is freed immediately.
//
pub struct HandOverHandNode {
    key: Bound,
    next: Mutex<NodePtr>,
}

impl HandOverHandNode {
    fn new(key: Bound, next: NodePtr) -> Self {
        HandOverHandNode {
            key,
            next: Mutex::new(next),
        }
    }
}

// A locked (pred, curr) pair: pred.key > value >= curr.key.
//
struct LockedWindow<'a> {
    /// Lock of pred, guarding pred.next (== curr).
    pred_next: MutexGuard<'a, NodePtr>,
    curr: &'a HandOverHandNode,
    /// Lock of curr, guarding curr.next.
    curr_next: MutexGuard<'a, NodePtr>,
}

pub struct HandOverHandSet {
    head: NodePtr,
}

// Safety: nodes are only reached through `head` and every link is read or
// written under its owner's mutex.
unsafe impl Send for HandOverHandSet {}
unsafe impl Sync for HandOverHandSet {}

impl HandOverHandSet {
    pub fn new() -> Self {
        let tail = Box::into_raw(Box::new(HandOverHandNode::new(
            Bound::Tail,
            ptr::null_mut(),
        )));
        let head = Box::into_raw(Box::new(HandOverHandNode::new(Bound::Head, tail)));

        HandOverHandSet { head }
    }

    fn lock_window(&self, value: Value) -> LockedWindow<'_> {
        let head = unsafe { &*self.head };

        let mut pred_next = head.next.lock();
        let mut curr_ptr: NodePtr = *pred_next;
        let mut curr = unsafe { &*curr_ptr };
        let mut curr_next = curr.next.lock();

        // TAIL never sorts before a value, so its null next is never followed.
        while curr.key.sorts_before(value) {
            // Releases pred; curr stays locked as the new pred.
            pred_next = curr_next;
            curr_ptr = *pred_next;
            curr = unsafe { &*curr_ptr };
            curr_next = curr.next.lock();
        }

        LockedWindow {
            pred_next,
            curr,
            curr_next,
        }
    }

    fn release_chain(&mut self) -> usize {
        let mut curr = std::mem::replace(&mut self.head, ptr::null_mut());
        let mut released = 0;

        while !curr.is_null() {
            let node = unsafe { Box::from_raw(curr) };
            if !node.key.is_sentinel() {
                released += 1;
            }
            curr = node.next.into_inner();
        }

        released
    }
}

impl ConcurrentSet for HandOverHandSet {
    fn add(&self, value: Value) -> bool {
        let LockedWindow {
            mut pred_next,
            curr,
            curr_next: _curr_next,
        } = self.lock_window(value);

        if curr.key.matches(value) {
            return false;
        }

        let node = Box::new(HandOverHandNode::new(Bound::Value(value), *pred_next));
        *pred_next = Box::into_raw(node);
        true
    }

    fn remove(&self, value: Value) -> bool {
        let LockedWindow {
            mut pred_next,
            curr,
            curr_next,
        } = self.lock_window(value);

        if !curr.key.matches(value) {
            return false;
        }

        let unlinked = *pred_next;
        *pred_next = *curr_next;

        drop(curr_next);
        drop(pred_next);

        unsafe { drop(Box::from_raw(unlinked)) };
        true
    }

    fn find(&self, value: Value) -> bool {
        self.lock_window(value).curr.key.matches(value)
    }

    fn to_vec(&self) -> Vec<Value> {
        let head = unsafe { &*self.head };
        let mut result = Vec::new();
        let mut pred_next = head.next.lock();

        loop {
            let curr_ptr: NodePtr = *pred_next;
            let curr = unsafe { &*curr_ptr };
            let Some(value) = curr.key.value() else {
                break;
            };
            result.push(value);

            // Lock curr before letting go of pred.
            let curr_next = curr.next.lock();
            pred_next = curr_next;
        }

        result
    }

    fn destroy(mut self) -> usize {
        let released = self.release_chain();
        tracing::debug!(released, "hand-over-hand set destroyed");
        released
    }
}

impl Default for HandOverHandSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HandOverHandSet {
    fn drop(&mut self) {
        self.release_chain();
    }
}
