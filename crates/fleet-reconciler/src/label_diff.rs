// Label/set differ. Pure functions, no I/O.
//
// Every list-valued relation (runner labels, group repositories, group
// runners) is updated by full replacement: the remote call always receives
// the complete desired collection. The differ decides what that collection
// is, whether a replacement is needed at all, and which protected values
// would be dropped by it.

use std::collections::HashSet;
use std::hash::Hash;

/// Outcome of diffing a previous and a desired set against protected values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDiff<T> {
    /// Protected values already present; the remote keeps them implicitly.
    pub to_keep: Vec<T>,
    /// The full-replacement payload: desired values minus protected ones.
    pub to_send: Vec<T>,
    /// Protected values present before but missing from the desired set.
    /// When non-empty the whole update must be abandoned.
    pub rejected: Vec<T>,
}

impl<T> LabelDiff<T> {
    pub fn is_rejected(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// Diff `previous` against `desired`, honoring `protected` values.
///
/// Order of `to_send` follows `desired`; `to_keep` and `rejected` follow
/// `previous`. Duplicates are the caller's concern and pass through as-is.
pub fn diff<T>(previous: &[T], desired: &[T], protected: &[T]) -> LabelDiff<T>
where
    T: Eq + Hash + Clone,
{
    let desired_set: HashSet<&T> = desired.iter().collect();
    let protected_set: HashSet<&T> = protected.iter().collect();

    let (to_keep, rejected): (Vec<T>, Vec<T>) = previous
        .iter()
        .filter(|v| protected_set.contains(v))
        .cloned()
        .partition(|v| desired_set.contains(v));

    if !rejected.is_empty() {
        return LabelDiff {
            to_keep,
            to_send: Vec::new(),
            rejected,
        };
    }

    let to_send = desired
        .iter()
        .filter(|v| !protected_set.contains(v))
        .cloned()
        .collect();

    LabelDiff {
        to_keep,
        to_send,
        rejected,
    }
}

/// Whether two collections differ as sets. Order and duplicates are ignored.
pub fn set_changed<T>(previous: &[T], desired: &[T]) -> bool
where
    T: Eq + Hash,
{
    let previous: HashSet<&T> = previous.iter().collect();
    let desired: HashSet<&T> = desired.iter().collect();
    previous != desired
}

/// `first` followed by the values of `second` not already in `first`.
pub fn union<T>(first: &[T], second: &[T]) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen: HashSet<&T> = HashSet::with_capacity(first.len() + second.len());
    first
        .iter()
        .chain(second.iter())
        .filter(|v| seen.insert(*v))
        .cloned()
        .collect()
}
