//! Beat-Pair Generator
//!
//! Halved pairs compare beat `i` with the beat half way around the ring,
//! quartered pairs with the beat a quarter of the way around:
//!
//! ```text
//!   N = 8   halved:    (1,5) (2,6) (3,7) (4,8)
//!           quartered: (1,3) (2,4) (3,5) (4,6) (5,7) (6,8) (7,1) (8,2)
//! ```

use serde::{Deserialize, Serialize};

use cap_core::Beat;

use crate::comparator::Comparator;
use crate::label::{Direction, TransformationLabel};

/// How one beat relates to its partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatPairRelationship {
    pub key_beat: u32,
    pub corresponding_beat: u32,
    /// Everything the pair satisfies, in comparator order
    pub all_valid_transformations: Vec<TransformationLabel>,
    /// The same labels, reordered by sequence-wide consensus
    pub detected_transformations: Vec<TransformationLabel>,
    /// Human override; the engine never writes it
    pub confirmed_transformation: Option<TransformationLabel>,
}

impl BeatPairRelationship {
    pub fn new(key_beat: u32, corresponding_beat: u32, labels: Vec<TransformationLabel>) -> Self {
        Self {
            key_beat,
            corresponding_beat,
            detected_transformations: labels.clone(),
            all_valid_transformations: labels,
            confirmed_transformation: None,
        }
    }

    /// Confirmed label if any, else the first detected one
    pub fn primary(&self) -> Option<TransformationLabel> {
        self.confirmed_transformation
            .or_else(|| self.detected_transformations.first().copied())
    }

    pub fn satisfies(&self, label: &TransformationLabel) -> bool {
        self.all_valid_transformations.contains(label)
    }

    /// First label in consensus order matching `filter`
    pub fn first_matching(&self, filter: impl Fn(&TransformationLabel) -> bool) -> Option<TransformationLabel> {
        self.detected_transformations.iter().copied().find(|l| filter(l))
    }
}

impl Comparator {
    fn pair(&self, key: &Beat, corresponding: &Beat) -> BeatPairRelationship {
        BeatPairRelationship::new(
            key.beat_number,
            corresponding.beat_number,
            self.compare(key, corresponding),
        )
    }

    /// `(i, i + N/2)` for `i` in `1..=N/2`; empty for odd or short input
    pub fn halved_pairs(&self, beats: &[Beat]) -> Vec<BeatPairRelationship> {
        let n = beats.len();
        if n < 2 || n % 2 != 0 {
            return Vec::new();
        }
        let half = n / 2;
        (0..half).map(|i| self.pair(&beats[i], &beats[i + half])).collect()
    }

    /// `(i, i + N/4)` for every beat, wrapping around the ring; empty unless
    /// `N` is a multiple of four
    pub fn quartered_pairs(&self, beats: &[Beat]) -> Vec<BeatPairRelationship> {
        let n = beats.len();
        if n == 0 || n % 4 != 0 {
            return Vec::new();
        }
        let quarter = n / 4;
        (0..n)
            .map(|i| self.pair(&beats[i], &beats[(i + quarter) % n]))
            .collect()
    }
}

pub fn generate_halved_beat_pairs(beats: &[Beat]) -> Vec<BeatPairRelationship> {
    Comparator::default().halved_pairs(beats)
}

pub fn generate_quartered_beat_pairs(beats: &[Beat]) -> Vec<BeatPairRelationship> {
    Comparator::default().quartered_pairs(beats)
}

/// Sequence-wide rotation sense of quartered pairs.
///
/// Majority of pairs with exactly one quarter-turn sense wins; a tie goes
/// to the first such pair. Advisory only: a direction encoded in the
/// winning label takes precedence.
pub fn rotation_direction_from_pairs(pairs: &[BeatPairRelationship]) -> Option<Direction> {
    let mut cw = 0usize;
    let mut ccw = 0usize;
    let mut first = None;

    for pair in pairs {
        let has = |dir| {
            pair.all_valid_transformations
                .iter()
                .any(|l| l.rotation_direction() == Some(dir))
        };
        let sense = match (has(Direction::Cw), has(Direction::Ccw)) {
            (true, false) => Direction::Cw,
            (false, true) => Direction::Ccw,
            _ => continue,
        };
        match sense {
            Direction::Cw => cw += 1,
            Direction::Ccw => ccw += 1,
        }
        first.get_or_insert(sense);
    }

    match cw.cmp(&ccw) {
        std::cmp::Ordering::Greater => Some(Direction::Cw),
        std::cmp::Ordering::Less => Some(Direction::Ccw),
        std::cmp::Ordering::Equal => first,
    }
}

pub fn detect_rotation_direction(beats: &[Beat]) -> Option<Direction> {
    rotation_direction_from_pairs(&generate_quartered_beat_pairs(beats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_core::{ColorMotion, GridLocation, LocationTransform, MotionType, RotationDirection};

    fn ring(n: u32) -> Vec<Beat> {
        let mut primary = ColorMotion::new(GridLocation::N, GridLocation::E, MotionType::Pro, RotationDirection::Cw);
        let mut secondary = ColorMotion::new(GridLocation::S, GridLocation::SW, MotionType::Anti, RotationDirection::Ccw);
        (1..=n)
            .map(|i| {
                let beat = Beat::new(i, primary, secondary);
                for m in [&mut primary, &mut secondary] {
                    m.start_location = LocationTransform::Rotate90Cw.apply(m.start_location);
                    m.end_location = LocationTransform::Rotate90Cw.apply(m.end_location);
                }
                beat
            })
            .collect()
    }

    #[test]
    fn test_halved_indices() {
        let pairs = generate_halved_beat_pairs(&ring(8));
        let idx: Vec<_> = pairs.iter().map(|p| (p.key_beat, p.corresponding_beat)).collect();
        assert_eq!(idx, vec![(1, 5), (2, 6), (3, 7), (4, 8)]);
    }

    #[test]
    fn test_halved_rejects_odd() {
        assert!(generate_halved_beat_pairs(&ring(7)).is_empty());
    }

    #[test]
    fn test_quartered_wraps() {
        let pairs = generate_quartered_beat_pairs(&ring(8));
        assert_eq!(pairs.len(), 8);
        assert_eq!((pairs[6].key_beat, pairs[6].corresponding_beat), (7, 1));
        assert_eq!((pairs[7].key_beat, pairs[7].corresponding_beat), (8, 2));
        assert!(generate_quartered_beat_pairs(&ring(6)).is_empty());
    }

    #[test]
    fn test_rotation_direction() {
        // Each beat is the previous one turned 90° cw, so i -> i+1 is a
        // quarter turn; with N = 4 the quartered partner is the next beat.
        assert_eq!(detect_rotation_direction(&ring(4)), Some(Direction::Cw));
        // N = 8: partner is two beats on, a half turn
        assert_eq!(detect_rotation_direction(&ring(8)), None);
    }

    #[test]
    fn test_primary_prefers_confirmation() {
        let mut pair = BeatPairRelationship::new(1, 3, vec![TransformationLabel::Repeated, TransformationLabel::Inverted]);
        assert_eq!(pair.primary(), Some(TransformationLabel::Repeated));
        pair.confirmed_transformation = Some(TransformationLabel::Inverted);
        assert_eq!(pair.primary(), Some(TransformationLabel::Inverted));
    }
}
