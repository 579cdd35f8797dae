use std::fmt;

/// The element type stored in every set.
pub type Value = i64;

/// Key of a list node: one of the two sentinels or a real value.
///
/// The derived order is `Tail < Value(_) < Head`, so the sentinels sit
/// outside the whole `i64` domain and no legal value can collide with them.
/// Lists are kept in descending order from head to tail.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    Tail,
    Value(Value),
    Head,
}

impl Bound {
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Bound::Value(_))
    }

    #[inline]
    pub fn value(&self) -> Option<Value> {
        match self {
            Bound::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Traversal continues past a node while this holds.
    #[inline]
    pub fn sorts_before(&self, value: Value) -> bool {
        *self > Bound::Value(value)
    }

    #[inline]
    pub fn matches(&self, value: Value) -> bool {
        *self == Bound::Value(value)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Tail => write!(f, "-inf"),
            Bound::Value(v) => write!(f, "{}", v),
            Bound::Head => write!(f, "+inf"),
        }
    }
}
