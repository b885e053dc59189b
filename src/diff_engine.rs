//! Prefix diffing between two ordered model sequences
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Patch action enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PatchAction {
    Insert,
    Remove,
}

impl fmt::Display for PatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchAction::Insert => f.write_str("INSERT"),
            PatchAction::Remove => f.write_str("REMOVE"),
        }
    }
}

/// One create or remove, addressed by position.
/// Removals index the old sequence, inserts index the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Patch {
    pub action: PatchAction,
    pub index: usize,
}

/// Everything needed to move from one model sequence to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListPatch {
    pub divergence: usize,
    pub removed: Range<usize>,
    pub inserted: Range<usize>,
    pub patches: Vec<Patch>,
}

impl ListPatch {
    pub fn is_noop(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// First index where `old` and `new` differ, or the shorter length if one is a prefix of the other.
pub fn divergence<M: PartialEq>(old: &[M], new: &[M]) -> usize {
    old.iter().zip(new).take_while(|(a, b)| a == b).count()
}

/// Everything past the divergence point is removed (in old order) and then rebuilt.
/// No reordering or interior matching is attempted.
pub fn plan<M: PartialEq>(old: &[M], new: &[M]) -> ListPatch {
    let divergence = divergence(old, new);
    let removed = divergence..old.len();
    let inserted = divergence..new.len();

    let patches = removed
        .clone()
        .map(|index| Patch { action: PatchAction::Remove, index })
        .chain(inserted.clone().map(|index| Patch { action: PatchAction::Insert, index }))
        .collect();

    ListPatch { divergence, removed, inserted, patches }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sequences_produce_no_patches() {
        let patch = plan(&["a", "b", "c"], &["a", "b", "c"]);
        assert_eq!(patch.divergence, 3);
        assert!(patch.is_noop());
    }

    #[test]
    fn change_in_the_middle_rebuilds_the_tail() {
        let patch = plan(&["a", "b", "c", "d"], &["a", "x", "c", "d"]);
        assert_eq!(patch.divergence, 1);
        assert_eq!(patch.removed, 1..4);
        assert_eq!(patch.inserted, 1..4);
        let removes: Vec<_> = patch
            .patches
            .iter()
            .filter(|p| p.action == PatchAction::Remove)
            .map(|p| p.index)
            .collect();
        assert_eq!(removes, vec![1, 2, 3]);
    }

    #[test]
    fn removals_come_before_inserts() {
        let patch = plan(&["a"], &["x", "y"]);
        assert_eq!(
            patch.patches,
            vec![
                Patch { action: PatchAction::Remove, index: 0 },
                Patch { action: PatchAction::Insert, index: 0 },
                Patch { action: PatchAction::Insert, index: 1 },
            ]
        );
    }

    #[test]
    fn truncation_and_append() {
        let shrink = plan(&[1, 2, 3], &[1]);
        assert_eq!(shrink.removed, 1..3);
        assert!(shrink.inserted.is_empty());

        let grow = plan(&[1, 2], &[1, 2, 3]);
        assert!(grow.removed.is_empty());
        assert_eq!(grow.inserted, 2..3);
    }

    #[test]
    fn empty_sides() {
        assert_eq!(divergence::<u8>(&[], &[]), 0);
        assert_eq!(plan(&[] as &[u8], &[7, 8]).inserted, 0..2);
        assert_eq!(plan(&[7, 8], &[]).removed, 0..2);
    }

    #[test]
    fn duplicate_models_are_just_equal_entries() {
        assert_eq!(divergence(&["a", "a"], &["a", "a", "a"]), 2);
    }

    #[test]
    fn serializes_with_uppercase_actions() {
        let json = plan(&["a", "b"], &["a", "c"]).to_json().unwrap();
        assert_eq!(json["divergence"], 1);
        assert_eq!(json["patches"][0]["action"], "REMOVE");
        assert_eq!(json["patches"][1]["action"], "INSERT");
        assert_eq!(json["removed"]["start"], 1);
        assert_eq!(json["removed"]["end"], 2);
    }
}
