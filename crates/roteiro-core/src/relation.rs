//! Connect/disconnect computation for many-to-many tag lists.

use std::collections::BTreeSet;

/// Changes that turn the current id set into the desired one.
///
/// Both lists are sorted and never share an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationDiff {
    pub connect: Vec<String>,
    pub disconnect: Vec<String>,
}

impl RelationDiff {
    pub fn is_empty(&self) -> bool {
        self.connect.is_empty() && self.disconnect.is_empty()
    }

    /// Applies the diff to `current`: connect first, then disconnect.
    pub fn apply(&self, current: &BTreeSet<String>) -> BTreeSet<String> {
        let mut out = current.clone();
        out.extend(self.connect.iter().cloned());
        for id in &self.disconnect {
            out.remove(id);
        }
        out
    }
}

/// `connect = desired − current`, `disconnect = current − desired`.
pub fn diff<C, D, S1, S2>(current: C, desired: D) -> RelationDiff
where
    C: IntoIterator<Item = S1>,
    D: IntoIterator<Item = S2>,
    S1: Into<String>,
    S2: Into<String>,
{
    let current: BTreeSet<String> = current.into_iter().map(Into::into).collect();
    let desired: BTreeSet<String> = desired.into_iter().map(Into::into).collect();

    RelationDiff {
        connect: desired.difference(&current).cloned().collect(),
        disconnect: current.difference(&desired).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::{btree_set, vec};
    use proptest::prelude::*;

    #[test]
    fn computes_both_directions() {
        let d = diff(["a", "b", "c"], ["b", "c", "d"]);
        assert_eq!(d.connect, vec!["d"]);
        assert_eq!(d.disconnect, vec!["a"]);
    }

    #[test]
    fn identical_sets_produce_empty_diff() {
        let d = diff(["x", "y"], ["y", "x"]);
        assert!(d.is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        let d = diff(Vec::<String>::new(), ["t1", "t1", "t2"]);
        assert_eq!(d.connect, vec!["t1", "t2"]);
        assert!(d.disconnect.is_empty());
    }

    #[test]
    fn clearing_disconnects_everything() {
        let d = diff(["b", "a"], Vec::<&str>::new());
        assert!(d.connect.is_empty());
        assert_eq!(d.disconnect, vec!["a", "b"]);
    }

    proptest! {
        #[test]
        fn prop_connect_and_disconnect_are_disjoint(
            current in vec("[a-f]{1,2}", 0..12),
            desired in vec("[a-f]{1,2}", 0..12),
        ) {
            let d = diff(current, desired);
            let connect: BTreeSet<_> = d.connect.iter().collect();
            prop_assert!(d.disconnect.iter().all(|id| !connect.contains(id)));
        }

        #[test]
        fn prop_apply_yields_desired(
            current in btree_set("[a-f]{1,2}", 0..12),
            desired in btree_set("[a-f]{1,2}", 0..12),
        ) {
            let d = diff(current.iter().cloned(), desired.iter().cloned());
            prop_assert_eq!(d.apply(&current), desired);
        }
    }
}
