use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

use parking_lot::Mutex;

use crate::data_structures::ConcurrentSet;
use crate::data_structures::{Bound, Value};
use crate::guard::Guard;

type NodePtr = *mut LazyNode;

///
/// Optimistic "lazy" sorted set (Heller, Herlihy, Luchangco, Moir, Scherer,
/// Shavit: 'A Lazy Concurrent List-Based Set Algorithm').
///
// Traversal takes no locks. A mutation locks pred then curr, always in list
// order, and validates the window before touching any link:
//
//   !pred.marked && !curr.marked && pred.next == curr
//
// If validation fails the locks are released and the traversal restarts.
//
// Remove sets curr.marked first (logical removal, the linearization point),
// then redirects pred.next past curr. Unlocked readers may still be standing
// on curr, so it is retired through the guard instead of freed.
//
// find() is wait-free: it walks without locks and reports
// `key == value && !marked`.
//
#[derive(Debug)]
pub struct LazyNode {
    key: Bound,
    next: AtomicPtr<LazyNode>,
    marked: AtomicBool,
    lock: Mutex<()>,
}

impl LazyNode {
    fn new(key: Bound, next: NodePtr) -> Self {
        LazyNode {
            key,
            next: AtomicPtr::new(next),
            marked: AtomicBool::new(false),
            lock: Mutex::new(()),
        }
    }

    #[inline]
    fn get_next(&self) -> NodePtr {
        self.next.load(Ordering::Acquire)
    }

    #[inline]
    fn set_next(&self, ptr: NodePtr) {
        self.next.store(ptr, Ordering::Release)
    }

    #[inline]
    fn is_marked(&self) -> bool {
        self.marked.load(Ordering::Acquire)
    }

    /// # Safety
    /// `ptr` must come from `Box::into_raw` and must not be used afterwards.
    unsafe fn dealloc_ptr(ptr: NodePtr) {
        unsafe { drop(Box::from_raw(ptr)) };
    }
}

#[derive(Debug, Copy, Clone)]
struct Window {
    pred: NodePtr,
    curr: NodePtr,
}

pub struct LazySet<G: Guard> {
    head: AtomicPtr<LazyNode>,
    guard: G,
}

impl<G: Guard> LazySet<G> {
    pub fn new() -> Self {
        let tail = Box::into_raw(Box::new(LazyNode::new(Bound::Tail, ptr::null_mut())));
        let head = Box::into_raw(Box::new(LazyNode::new(Bound::Head, tail)));

        LazySet {
            head: AtomicPtr::new(head),
            guard: G::default(),
        }
    }

    pub fn guard(&self) -> &G {
        &self.guard
    }

    // Unlocked traversal. The window may be stale by the time it is used.
    fn locate(&self, value: Value) -> Window {
        let mut pred = self.head.load(Ordering::Acquire);
        let mut curr = unsafe { (*pred).get_next() };

        unsafe {
            while (*curr).key.sorts_before(value) {
                pred = curr;
                curr = (*curr).get_next();
            }
        }

        Window { pred, curr }
    }

    // Must be called with both pred and curr locked.
    #[inline]
    fn is_valid(pred: &LazyNode, curr: &LazyNode, curr_ptr: NodePtr) -> bool {
        !pred.is_marked() && !curr.is_marked() && pred.get_next() == curr_ptr
    }

    fn release_chain(&mut self) -> usize {
        let mut curr = self.head.swap(ptr::null_mut(), Ordering::AcqRel);
        let mut released = 0;

        while !curr.is_null() {
            unsafe {
                let next = (*curr).get_next();

                debug_assert!(
                    !(*curr).is_marked(),
                    "marked node {} still linked at teardown",
                    (*curr).key
                );

                if !(*curr).key.is_sentinel() {
                    released += 1;
                }

                LazyNode::dealloc_ptr(curr);
                curr = next;
            }
        }

        released
    }
}

impl<G: Guard> ConcurrentSet for LazySet<G> {
    fn add(&self, value: Value) -> bool {
        let _guard = G::pin();

        loop {
            let Window { pred, curr } = self.locate(value);
            let (pred_ref, curr_ref) = unsafe { (&*pred, &*curr) };

            let _pred_lock = pred_ref.lock.lock();
            let _curr_lock = curr_ref.lock.lock();

            if !Self::is_valid(pred_ref, curr_ref, curr) {
                continue;
            }

            if curr_ref.key.matches(value) {
                return false;
            }

            let node = Box::new(LazyNode::new(Bound::Value(value), curr));
            pred_ref.set_next(Box::into_raw(node));
            return true;
        }
    }

    fn remove(&self, value: Value) -> bool {
        let _guard = G::pin();

        loop {
            let Window { pred, curr } = self.locate(value);
            let (pred_ref, curr_ref) = unsafe { (&*pred, &*curr) };

            let pred_lock = pred_ref.lock.lock();
            let curr_lock = curr_ref.lock.lock();

            if !Self::is_valid(pred_ref, curr_ref, curr) {
                continue;
            }

            if !curr_ref.key.matches(value) {
                return false;
            }

            curr_ref.marked.store(true, Ordering::Release);
            pred_ref.set_next(curr_ref.get_next());

            drop(curr_lock);
            drop(pred_lock);

            unsafe {
                self.guard.defer_destroy(curr, LazyNode::dealloc_ptr);
            }
            return true;
        }
    }

    fn find(&self, value: Value) -> bool {
        let _guard = G::pin();
        let Window { curr, .. } = self.locate(value);
        let curr = unsafe { &*curr };

        curr.key.matches(value) && !curr.is_marked()
    }

    fn to_vec(&self) -> Vec<Value> {
        let _guard = G::pin();
        let head = self.head.load(Ordering::Acquire);
        let mut result = Vec::new();
        let mut curr = unsafe { (*head).get_next() };

        unsafe {
            while let Some(value) = (*curr).key.value() {
                if !(*curr).is_marked() {
                    result.push(value);
                }
                curr = (*curr).get_next();
            }
        }

        result
    }

    fn destroy(mut self) -> usize {
        let released = self.release_chain();
        tracing::debug!(released, "lazy set destroyed");
        released
    }
}

impl<G: Guard> Default for LazySet<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Guard> Drop for LazySet<G> {
    fn drop(&mut self) {
        self.release_chain();
    }
}
