use crate::cost::Cost;

/// The composite ordering key used to sort the frontier:
///
/// `key(s) = (min(g(s), rhs(s)) + h(start, s) + k_m, min(g(s), rhs(s)))`
///
/// Comparison is lexicographic on `(primary, secondary)`: derived `Ord`
/// on a two-field tuple struct gives exactly that. Nothing here ever
/// subtracts two costs to compare them: subtracting two values near
/// `Cost::INFINITY` would not behave sanely, so comparison always goes
/// through `Cost`'s own `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Key {
    pub primary: Cost,
    pub secondary: Cost,
}

impl Key {
    pub fn new(primary: Cost, secondary: Cost) -> Key {
        Key { primary, secondary }
    }
}
