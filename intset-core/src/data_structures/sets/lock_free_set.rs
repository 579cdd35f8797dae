use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use crate::data_structures::ConcurrentSet;
use crate::data_structures::MarkedPtr;
use crate::data_structures::{Bound, Value};
use crate::guard::Guard;

type NodePtr = *mut LockFreeNode;

///
/// Lock-free sorted set based on Harris's 'A Pragmatic Implementation of
/// Non-Blocking Linked-Lists', with Michael's retirement rule: the thread whose
/// CAS physically unlinks a node is the one that retires it.
///
// =============================================================================
// LIST STRUCTURE (sorted descending, bounded by sentinels)
// =============================================================================
//
// ┌──────┐    ┌──────┐    ┌──────┐    ┌──────┐    ┌──────┐
// │ HEAD │───►│  30  │───►│  20  │───►│  10  │───►│ TAIL │───► null
// │(+inf)│    │      │    │      │    │      │    │(-inf)│
// └──────┘    └──────┘    └──────┘    └──────┘    └──────┘
//
// Marked Pointer: the mark bit on node.next means the NODE is logically
// deleted. Once set, node.next never changes again.
//
// INVARIANTS:
// 1. Keys strictly descend from HEAD to TAIL
// 2. No duplicate values among unmarked nodes
// 3. HEAD and TAIL are never marked or removed
// 4. A node is retired exactly once, after it is unreachable from HEAD
//
// =============================================================================
// REMOVE (two-phase delete)
// =============================================================================
//
// Phase 1: LOGICAL DELETE - CAS curr.next from succ to (succ | MARK).
//          This is the linearization point.
// Phase 2: PHYSICAL UNLINK - CAS pred.next from curr to succ.
//
// Before:  pred ──────► curr ──────► succ
// Step 1:  pred ──────► curr ──╳───► succ
// Step 2:  pred ─────────────────────► succ
//
// If Phase 2 fails (pred got marked, or a node was linked in between), the
// remover runs one more traversal for its value. Traversals snip every marked
// node they pass, so the node is unreachable once that traversal returns.
//
// =============================================================================
// ADD
// =============================================================================
//
// new.next = curr, then CAS pred.next from curr to new. The CAS fails if pred
// was marked in the meantime (its next now carries the mark bit) or if another
// node was linked after pred, and the whole traversal is retried.
//
// =============================================================================
//
#[derive(Debug)]
pub struct LockFreeNode {
    key: Bound,
    next: AtomicPtr<LockFreeNode>,
}

impl LockFreeNode {
    fn new(key: Bound) -> Self {
        LockFreeNode {
            key,
            next: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// Load next pointer (Acquire ordering)
    #[inline]
    fn get_next(&self) -> NodePtr {
        self.next.load(Ordering::Acquire)
    }

    /// Store next pointer (Release ordering)
    #[inline]
    fn set_next(&self, ptr: NodePtr) {
        self.next.store(ptr, Ordering::Release)
    }

    /// CAS next pointer (AcqRel/Acquire ordering)
    #[inline]
    fn cas_next(&self, expected: NodePtr, new: NodePtr) -> Result<NodePtr, NodePtr> {
        self.next
            .compare_exchange(expected, new, Ordering::AcqRel, Ordering::Acquire)
    }

    #[inline]
    fn is_marked(&self) -> bool {
        MarkedPtr::new(self.get_next()).is_marked()
    }

    /// # Safety
    /// `ptr` must come from `Box::into_raw` and must not be used afterwards.
    unsafe fn dealloc_ptr(ptr: NodePtr) {
        unsafe { drop(Box::from_raw(ptr)) };
    }
}

// Adjacent pair found by a traversal: pred.key > value >= curr.key.
//
#[derive(Debug, Copy, Clone)]
struct Window {
    pred: NodePtr,
    curr: NodePtr,
}

pub struct LockFreeSet<G: Guard> {
    head: AtomicPtr<LockFreeNode>,
    /// Retired nodes are handed to this guard.
    guard: G,
}

impl<G: Guard> LockFreeSet<G> {
    pub fn new() -> Self {
        let tail = Box::into_raw(Box::new(LockFreeNode::new(Bound::Tail)));
        let head = Box::new(LockFreeNode::new(Bound::Head));
        head.set_next(tail);

        LockFreeSet {
            head: AtomicPtr::new(Box::into_raw(head)),
            guard: G::default(),
        }
    }

    /// The guard that retired nodes are deferred to.
    pub fn guard(&self) -> &G {
        &self.guard
    }

    // Core operation: find the window for `value`, snipping marked nodes on
    // the way. The returned curr was unmarked when it was inspected.
    //
    // When a snip CAS fails, pred was marked or changed under us, and the
    // traversal restarts from HEAD.
    //
    fn locate(&self, value: Value) -> Window {
        'retry: loop {
            let mut pred = self.head.load(Ordering::Acquire);
            let mut curr = MarkedPtr::unmask(unsafe { (*pred).get_next() });

            loop {
                // curr is never null: TAIL stops every traversal before its
                // null next is followed.
                let next = MarkedPtr::new(unsafe { (*curr).get_next() });

                if next.is_marked() {
                    let snip = unsafe { (*pred).cas_next(curr, next.as_ptr()) };
                    if snip.is_err() {
                        continue 'retry;
                    }

                    // Our CAS unlinked curr, so we retire it.
                    unsafe {
                        self.guard.defer_destroy(curr, LockFreeNode::dealloc_ptr);
                    }
                    curr = next.as_ptr();
                    continue;
                }

                if !unsafe { (*curr).key.sorts_before(value) } {
                    return Window { pred, curr };
                }

                pred = curr;
                curr = next.as_ptr();
            }
        }
    }

    // Frees the whole chain, sentinels included. Returns the number of live
    // values released. Leaves `head` null so a second call is a no-op.
    //
    fn release_chain(&mut self) -> usize {
        let mut curr = self.head.swap(ptr::null_mut(), Ordering::AcqRel);
        let mut released = 0;

        while !curr.is_null() {
            unsafe {
                let next = MarkedPtr::new((*curr).get_next());

                debug_assert!(
                    !next.is_marked(),
                    "marked node {} still linked at teardown",
                    (*curr).key
                );

                if !(*curr).key.is_sentinel() && !next.is_marked() {
                    released += 1;
                }

                LockFreeNode::dealloc_ptr(curr);
                curr = next.as_ptr();
            }
        }

        released
    }
}

impl<G: Guard> ConcurrentSet for LockFreeSet<G> {
    fn add(&self, value: Value) -> bool {
        let _guard = G::pin();
        let new_node = Box::into_raw(Box::new(LockFreeNode::new(Bound::Value(value))));

        loop {
            let Window { pred, curr } = self.locate(value);

            unsafe {
                if (*curr).key.matches(value) {
                    // Duplicate: the node was never published.
                    LockFreeNode::dealloc_ptr(new_node);
                    return false;
                }

                (*new_node).set_next(curr);

                if (*pred).cas_next(curr, new_node).is_ok() {
                    return true;
                }
            }
            // CAS failed, retry
        }
    }

    fn remove(&self, value: Value) -> bool {
        let _guard = G::pin();

        loop {
            let Window { pred, curr } = self.locate(value);

            unsafe {
                if !(*curr).key.matches(value) {
                    return false;
                }

                let succ = MarkedPtr::new((*curr).get_next());
                if succ.is_marked() {
                    // Another remover won; the next traversal snips it.
                    continue;
                }

                let marked = succ.with_mark(true);
                if (*curr).cas_next(succ.as_raw(), marked.as_raw()).is_err() {
                    // Successor changed or someone else marked curr.
                    continue;
                }

                if (*pred).cas_next(curr, succ.as_ptr()).is_ok() {
                    self.guard.defer_destroy(curr, LockFreeNode::dealloc_ptr);
                } else {
                    self.locate(value);
                }
                return true;
            }
        }
    }

    fn find(&self, value: Value) -> bool {
        let _guard = G::pin();
        let head = self.head.load(Ordering::Acquire);
        let mut curr = MarkedPtr::unmask(unsafe { (*head).get_next() });

        // Read-only walk: marked nodes are followed, never snipped. Their
        // next pointers are frozen and lead back into the live chain.
        unsafe {
            while (*curr).key.sorts_before(value) {
                curr = MarkedPtr::unmask((*curr).get_next());
            }

            (*curr).key.matches(value) && !(*curr).is_marked()
        }
    }

    fn to_vec(&self) -> Vec<Value> {
        let _guard = G::pin();
        let head = self.head.load(Ordering::Acquire);
        let mut result = Vec::new();
        let mut curr = MarkedPtr::unmask(unsafe { (*head).get_next() });

        unsafe {
            while let Some(value) = (*curr).key.value() {
                let next = MarkedPtr::new((*curr).get_next());
                if !next.is_marked() {
                    result.push(value);
                }
                curr = next.as_ptr();
            }
        }

        result
    }

    fn destroy(mut self) -> usize {
        let released = self.release_chain();
        tracing::debug!(released, "lock-free set destroyed");
        released
    }
}

impl<G: Guard> Default for LockFreeSet<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Guard> Drop for LockFreeSet<G> {
    fn drop(&mut self) {
        // Retired nodes are freed by the guard, which drops after this.
        self.release_chain();
    }
}

// ============================================================================
// Tests - Unique to LockFreeSet
// ============================================================================
// Note: Common tests are in tests/deferred_set_tests.rs
