//! Transformation Aggregator
//!
//! Cross-pair reasoning: which labels hold for every pair, how each
//! pair's labels should be ordered given the whole sequence, and how
//! pairs group by their primary label.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::label::TransformationLabel;
use crate::pairs::BeatPairRelationship;

/// Bucket for pairs without any label
pub const UNKNOWN_PATTERN: &str = "UNKNOWN";

/// Labels present in every pair, in first-seen order
pub fn find_all_common_transformations(pairs: &[BeatPairRelationship]) -> Vec<TransformationLabel> {
    let Some((first, rest)) = pairs.split_first() else {
        return Vec::new();
    };
    first
        .all_valid_transformations
        .iter()
        .copied()
        .filter(|label| rest.iter().all(|pair| pair.satisfies(label)))
        .collect()
}

/// Reorder each pair's detected labels by sequence-wide consensus.
///
/// Labels common to every pair come first (in common order), then by how
/// many pairs satisfy them; ties keep comparator order.
pub fn reprioritize_beat_pairs(pairs: &[BeatPairRelationship]) -> Vec<BeatPairRelationship> {
    let common = find_all_common_transformations(pairs);

    let mut frequency: HashMap<TransformationLabel, usize> = HashMap::new();
    for pair in pairs {
        for label in &pair.all_valid_transformations {
            *frequency.entry(*label).or_default() += 1;
        }
    }

    pairs
        .iter()
        .map(|pair| {
            let mut detected = pair.all_valid_transformations.clone();
            detected.sort_by_key(|label| {
                let rank = common.iter().position(|c| c == label).unwrap_or(usize::MAX);
                (rank, Reverse(frequency.get(label).copied().unwrap_or(0)))
            });
            BeatPairRelationship {
                detected_transformations: detected,
                ..pair.clone()
            }
        })
        .collect()
}

/// Key beats grouped by primary label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeatPairGroups(BTreeMap<String, Vec<u32>>);

impl BeatPairGroups {
    pub fn get(&self, pattern: &str) -> Option<&[u32]> {
        self.0.get(pattern).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<u32>)> {
        self.0.iter()
    }

    /// Buckets other than `UNKNOWN`
    pub fn recognized(&self) -> impl Iterator<Item = (&String, &Vec<u32>)> {
        self.0.iter().filter(|(k, _)| k.as_str() != UNKNOWN_PATTERN)
    }

    pub fn recognized_count(&self) -> usize {
        self.recognized().count()
    }

    pub fn has_unknown(&self) -> bool {
        self.0.contains_key(UNKNOWN_PATTERN)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Union with another grouping; key beats stay sorted and unique
    pub fn merge(&mut self, other: &BeatPairGroups) {
        for (pattern, beats) in &other.0 {
            let entry = self.0.entry(pattern.clone()).or_default();
            entry.extend(beats);
            entry.sort_unstable();
            entry.dedup();
        }
    }
}

pub fn group_beat_pairs_by_pattern(pairs: &[BeatPairRelationship]) -> BeatPairGroups {
    let mut groups: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for pair in pairs {
        let key = pair
            .primary()
            .map(|label| label.to_string())
            .unwrap_or_else(|| UNKNOWN_PATTERN.to_string());
        groups.entry(key).or_default().push(pair.key_beat);
    }
    BeatPairGroups(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Modifier;

    const MIRROR: TransformationLabel = TransformationLabel::Mirrored(Modifier::None);
    const FLIP: TransformationLabel = TransformationLabel::Flipped(Modifier::None);
    const SWAP: TransformationLabel = TransformationLabel::Swapped { inverted: false };

    fn pair(key: u32, labels: &[TransformationLabel]) -> BeatPairRelationship {
        BeatPairRelationship::new(key, key + 4, labels.to_vec())
    }

    #[test]
    fn test_common_intersection_keeps_first_order() {
        let pairs = vec![
            pair(1, &[SWAP, MIRROR, FLIP]),
            pair(2, &[FLIP, MIRROR]),
            pair(3, &[MIRROR, FLIP, SWAP]),
        ];
        assert_eq!(find_all_common_transformations(&pairs), vec![MIRROR, FLIP]);
    }

    #[test]
    fn test_common_empty() {
        assert!(find_all_common_transformations(&[]).is_empty());
        let pairs = vec![pair(1, &[SWAP]), pair(2, &[MIRROR])];
        assert!(find_all_common_transformations(&pairs).is_empty());
    }

    #[test]
    fn test_reprioritize_promotes_common() {
        let pairs = vec![pair(1, &[SWAP, MIRROR]), pair(2, &[FLIP, MIRROR])];
        let ordered = reprioritize_beat_pairs(&pairs);
        assert_eq!(ordered[0].primary(), Some(MIRROR));
        assert_eq!(ordered[1].primary(), Some(MIRROR));
        // input untouched
        assert_eq!(pairs[0].primary(), Some(SWAP));
    }

    #[test]
    fn test_reprioritize_by_frequency_without_common() {
        let pairs = vec![
            pair(1, &[SWAP, MIRROR]),
            pair(2, &[FLIP, MIRROR]),
            pair(3, &[FLIP]),
        ];
        let ordered = reprioritize_beat_pairs(&pairs);
        assert_eq!(ordered[0].primary(), Some(MIRROR));
        assert_eq!(ordered[1].primary(), Some(FLIP));
    }

    #[test]
    fn test_grouping_with_unknown() {
        let pairs = vec![pair(1, &[MIRROR]), pair(2, &[]), pair(3, &[MIRROR]), pair(4, &[FLIP])];
        let groups = group_beat_pairs_by_pattern(&pairs);
        assert_eq!(groups.get("mirrored"), Some(&[1, 3][..]));
        assert_eq!(groups.get(UNKNOWN_PATTERN), Some(&[2][..]));
        assert!(groups.has_unknown());
        assert_eq!(groups.recognized_count(), 2);
    }

    #[test]
    fn test_merge_groups() {
        let mut a = group_beat_pairs_by_pattern(&[pair(1, &[MIRROR])]);
        let b = group_beat_pairs_by_pattern(&[pair(1, &[MIRROR]), pair(2, &[FLIP])]);
        a.merge(&b);
        assert_eq!(a.get("mirrored"), Some(&[1][..]));
        assert_eq!(a.get("flipped"), Some(&[2][..]));
    }
}
