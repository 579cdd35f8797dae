// Marked pointer operations using the least significant bit as the
// logical-deletion mark.
//
// Bit layout:
//   Bit 0: DELETE_MARK - the node owning this `next` is logically removed
//
// Node allocations are at least 8-byte aligned, so bit 0 of a real node
// address is always zero.
//
const DELETE_MARK: usize = 0b1;

/// A pointer that uses its least significant bit as a deletion flag.
pub(crate) struct MarkedPtr<T> {
    ptr: *mut T,
}

// Manual impls to avoid requiring T: Clone/Copy
impl<T> Copy for MarkedPtr<T> {}

impl<T> Clone for MarkedPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> MarkedPtr<T> {
    /// Wrap a (possibly marked) raw pointer.
    #[inline]
    pub(crate) fn new(ptr: *mut T) -> Self {
        MarkedPtr { ptr }
    }

    /// Strip the mark bit from a raw pointer.
    #[inline]
    pub(crate) fn unmask(ptr: *mut T) -> *mut T {
        (ptr as usize & !DELETE_MARK) as *mut T
    }

    /// The clean pointer, safe to dereference.
    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut T {
        Self::unmask(self.ptr)
    }

    /// The raw pointer with the mark bit intact (for CAS operations).
    #[inline]
    pub(crate) fn as_raw(&self) -> *mut T {
        self.ptr
    }

    #[inline]
    pub(crate) fn is_marked(&self) -> bool {
        (self.ptr as usize & DELETE_MARK) != 0
    }

    /// Same target, with the mark bit set or cleared.
    #[inline]
    pub(crate) fn with_mark(&self, mark: bool) -> Self {
        let ptr_bits = self.as_ptr() as usize;
        let bits = if mark {
            ptr_bits | DELETE_MARK
        } else {
            ptr_bits
        };
        MarkedPtr {
            ptr: bits as *mut T,
        }
    }
}
