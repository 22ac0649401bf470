//! Meta-pattern detection
//!
//! Sequences that have no single uniform transformation can still be
//! structured:
//!
//! - **Axis-alternating**: the halved pairs cycle through labels from one
//!   reflection family (mirror / flip / half turn) in a regular order.
//! - **Modular**: pairs split into columns by position in the cycle; every
//!   column is individually consistent and all columns share one base
//!   transformation, differing only in swap/invert modifiers.
//! - **Compound**: a quarter-turn rotation at the quartered interval with a
//!   color swap at the halved interval.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::find_all_common_transformations;
use crate::label::{Direction, TransformationLabel};
use crate::pairs::BeatPairRelationship;

// ============================================================================
// AXIS ALTERNATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisAlternationKind {
    /// A, B, B, A
    Palindromic,
    /// A, B, A, B
    Alternating,
    /// First half repeats as second half
    Symmetric,
    /// Some other repeating period
    Structured,
}

impl fmt::Display for AxisAlternationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Palindromic => "palindromic",
            Self::Alternating => "alternating",
            Self::Symmetric => "symmetric",
            Self::Structured => "structured",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisAlternatingPattern {
    pub kind: AxisAlternationKind,
    /// Distinct labels, first-seen order
    pub labels: Vec<TransformationLabel>,
    /// Primary label of each pair, in pair order
    pub sequence: Vec<TransformationLabel>,
    pub description: String,
}

/// Smallest period `p` dividing `len` with `seq[i] == seq[i % p]`
fn smallest_period<T: PartialEq>(seq: &[T]) -> usize {
    let len = seq.len();
    (1..=len)
        .find(|&p| len % p == 0 && seq.iter().enumerate().all(|(i, x)| *x == seq[i % p]))
        .unwrap_or(len)
}

/// Regular alternation of reflection-family labels across the pairs
pub fn detect_axis_alternating(pairs: &[BeatPairRelationship]) -> Option<AxisAlternatingPattern> {
    let sequence: Vec<TransformationLabel> = pairs
        .iter()
        .map(BeatPairRelationship::primary)
        .collect::<Option<_>>()?;

    if sequence.len() < 3 || !sequence.iter().all(TransformationLabel::is_reflection_family) {
        return None;
    }

    let mut labels: Vec<TransformationLabel> = Vec::new();
    for label in &sequence {
        if !labels.contains(label) {
            labels.push(*label);
        }
    }
    if labels.len() < 2 {
        return None;
    }

    let reversed: Vec<_> = sequence.iter().rev().copied().collect();
    let period = smallest_period(&sequence);
    let kind = if reversed == sequence {
        AxisAlternationKind::Palindromic
    } else if period == 2 {
        AxisAlternationKind::Alternating
    } else if period * 2 == sequence.len() {
        AxisAlternationKind::Symmetric
    } else if period < sequence.len() {
        AxisAlternationKind::Structured
    } else {
        return None;
    };

    let names: Vec<String> = sequence.iter().map(|l| l.to_string()).collect();
    Some(AxisAlternatingPattern {
        kind,
        labels,
        description: format!("{} axis alternation: {}", kind, names.join(", ")),
        sequence,
    })
}

// ============================================================================
// MODULAR
// ============================================================================

/// Per-column swap (or invert) rhythm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapRhythm {
    #[serde(rename = "1-2-2-1")]
    OneTwoTwoOne,
    #[serde(rename = "1-2-1-2")]
    OneTwoOneTwo,
    #[serde(rename = "1-1-2-2")]
    OneOneTwoTwo,
    #[serde(rename = "2-1-1-2")]
    TwoOneOneTwo,
    #[serde(rename = "2-1-2-1")]
    TwoOneTwoOne,
    #[serde(rename = "2-2-1-1")]
    TwoTwoOneOne,
    #[serde(rename = "uniform")]
    Uniform,
    #[serde(rename = "unknown")]
    Unknown,
}

impl SwapRhythm {
    /// `true` marks a swapped column ("2")
    pub fn from_flags(flags: &[bool]) -> Self {
        if flags.windows(2).all(|w| w[0] == w[1]) {
            return Self::Uniform;
        }
        match flags {
            [false, true, true, false] => Self::OneTwoTwoOne,
            [false, true, false, true] => Self::OneTwoOneTwo,
            [false, false, true, true] => Self::OneOneTwoTwo,
            [true, false, false, true] => Self::TwoOneOneTwo,
            [true, false, true, false] => Self::TwoOneTwoOne,
            [true, true, false, false] => Self::TwoTwoOneOne,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneTwoTwoOne => "1-2-2-1",
            Self::OneTwoOneTwo => "1-2-1-2",
            Self::OneOneTwoTwo => "1-1-2-2",
            Self::TwoOneOneTwo => "2-1-1-2",
            Self::TwoOneTwoOne => "2-1-2-1",
            Self::TwoTwoOneOne => "2-2-1-1",
            Self::Uniform => "uniform",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SwapRhythm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a modular split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModularColumn {
    /// 1-based column index
    pub position: usize,
    pub transformation: TransformationLabel,
    pub is_swapped: bool,
    pub is_inverted: bool,
    pub key_beats: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModularPattern {
    pub cycle_length: usize,
    pub base_transformation: TransformationLabel,
    pub columns: Vec<ModularColumn>,
    pub swap_rhythm: SwapRhythm,
    pub invert_rhythm: SwapRhythm,
    /// 1-based indices of swapped columns
    pub swapped_positions: Vec<usize>,
    /// One `0`/`1` per column, `1` = swapped
    pub swap_bits: String,
}

impl ModularPattern {
    pub fn description(&self) -> String {
        format!(
            "Modular {} with swap rhythm {} across {} columns",
            self.base_transformation, self.swap_rhythm, self.cycle_length
        )
    }
}

/// Modular structure over any base transformation
pub fn detect_modular(pairs: &[BeatPairRelationship], cycle_length: usize) -> Option<ModularPattern> {
    detect_modular_with(pairs, cycle_length, |_| true)
}

/// Modular structure whose shared base satisfies `accept_base`.
///
/// Pair `k` (0-based, pair order) lands in column `k % cycle_length`.
/// Columns that all carry the same label are uniform, not modular.
pub fn detect_modular_with(
    pairs: &[BeatPairRelationship],
    cycle_length: usize,
    accept_base: impl Fn(&TransformationLabel) -> bool,
) -> Option<ModularPattern> {
    if cycle_length < 2 || pairs.len() < cycle_length {
        return None;
    }

    let mut buckets: Vec<Vec<BeatPairRelationship>> = vec![Vec::new(); cycle_length];
    for (index, pair) in pairs.iter().enumerate() {
        buckets[index % cycle_length].push(pair.clone());
    }

    let column_common: Vec<Vec<TransformationLabel>> = buckets
        .iter()
        .map(|bucket| find_all_common_transformations(bucket))
        .collect();
    if column_common.iter().any(Vec::is_empty) {
        return None;
    }

    // First base (in column 1 order) present in every column
    let base = column_common[0]
        .iter()
        .map(TransformationLabel::base)
        .filter(|b| accept_base(b))
        .find(|b| column_common.iter().all(|labels| labels.iter().any(|l| l.base() == *b)))?;

    let mut columns = Vec::with_capacity(cycle_length);
    for (index, (labels, bucket)) in column_common.iter().zip(&buckets).enumerate() {
        let transformation = *labels.iter().find(|l| l.base() == base)?;
        columns.push(ModularColumn {
            position: index + 1,
            transformation,
            is_swapped: transformation.is_swapped(),
            is_inverted: transformation.is_inverted(),
            key_beats: bucket.iter().map(|p| p.key_beat).collect(),
        });
    }

    if columns.iter().all(|c| c.transformation == columns[0].transformation) {
        return None;
    }

    let swap_flags: Vec<bool> = columns.iter().map(|c| c.is_swapped).collect();
    let invert_flags: Vec<bool> = columns.iter().map(|c| c.is_inverted).collect();

    Some(ModularPattern {
        cycle_length,
        base_transformation: base,
        swap_rhythm: SwapRhythm::from_flags(&swap_flags),
        invert_rhythm: SwapRhythm::from_flags(&invert_flags),
        swapped_positions: columns.iter().filter(|c| c.is_swapped).map(|c| c.position).collect(),
        swap_bits: swap_flags.iter().map(|&f| if f { '1' } else { '0' }).collect(),
        columns,
    })
}

// ============================================================================
// COMPOUND
// ============================================================================

/// Quarter-turn rotation (quartered) combined with a color swap (halved)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundPattern {
    pub quartered_transformation: TransformationLabel,
    pub halved_transformation: TransformationLabel,
    pub rotation_direction: Option<Direction>,
    pub cap_type: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{Modifier, Rotation};

    const MIRROR: TransformationLabel = TransformationLabel::Mirrored(Modifier::None);
    const FLIP: TransformationLabel = TransformationLabel::Flipped(Modifier::None);
    const CW: TransformationLabel = TransformationLabel::Rotated(Rotation::Cw90, Modifier::None);
    const CW_SWAP: TransformationLabel = TransformationLabel::Rotated(Rotation::Cw90, Modifier::Swapped);

    fn pairs(labels: &[TransformationLabel]) -> Vec<BeatPairRelationship> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| BeatPairRelationship::new(i as u32 + 1, i as u32 + 3, vec![*l]))
            .collect()
    }

    #[test]
    fn test_palindromic() {
        let found = detect_axis_alternating(&pairs(&[MIRROR, FLIP, FLIP, MIRROR])).unwrap();
        assert_eq!(found.kind, AxisAlternationKind::Palindromic);
        assert_eq!(found.labels, vec![MIRROR, FLIP]);
    }

    #[test]
    fn test_alternating() {
        let found = detect_axis_alternating(&pairs(&[MIRROR, FLIP, MIRROR, FLIP])).unwrap();
        assert_eq!(found.kind, AxisAlternationKind::Alternating);
    }

    #[test]
    fn test_symmetric_and_structured() {
        let half = TransformationLabel::Rotated(Rotation::Half, Modifier::None);
        let found = detect_axis_alternating(&pairs(&[MIRROR, FLIP, half, MIRROR, FLIP, half])).unwrap();
        assert_eq!(found.kind, AxisAlternationKind::Symmetric);

        let found = detect_axis_alternating(&pairs(&[
            MIRROR, MIRROR, FLIP, MIRROR, MIRROR, FLIP, MIRROR, MIRROR, FLIP,
        ]))
        .unwrap();
        assert_eq!(found.kind, AxisAlternationKind::Structured);
    }

    #[test]
    fn test_axis_rejects_other_families() {
        assert!(detect_axis_alternating(&pairs(&[MIRROR, CW, CW, MIRROR])).is_none());
        assert!(detect_axis_alternating(&pairs(&[MIRROR, MIRROR, MIRROR, MIRROR])).is_none());
        assert!(detect_axis_alternating(&pairs(&[MIRROR, MIRROR, FLIP, FLIP, FLIP])).is_none());
    }

    #[test]
    fn test_swap_rhythm_names() {
        assert_eq!(SwapRhythm::from_flags(&[false, true, true, false]), SwapRhythm::OneTwoTwoOne);
        assert_eq!(SwapRhythm::from_flags(&[true, true, false, false]).to_string(), "2-2-1-1");
        assert_eq!(SwapRhythm::from_flags(&[false; 4]), SwapRhythm::Uniform);
        assert_eq!(SwapRhythm::from_flags(&[true, false, false, false]), SwapRhythm::Unknown);
        assert_eq!(SwapRhythm::from_flags(&[true, false, true]), SwapRhythm::Unknown);
    }

    #[test]
    fn test_modular_columns() {
        let found = detect_modular(&pairs(&[CW, CW_SWAP, CW_SWAP, CW, CW, CW_SWAP, CW_SWAP, CW]), 4).unwrap();
        assert_eq!(found.base_transformation, CW);
        assert_eq!(found.swap_rhythm, SwapRhythm::OneTwoTwoOne);
        assert_eq!(found.swapped_positions, vec![2, 3]);
        assert_eq!(found.swap_bits, "0110");
        assert_eq!(found.columns[1].key_beats, vec![2, 6]);
    }

    #[test]
    fn test_modular_requires_consistent_columns() {
        // column 1 disagrees with itself
        assert!(detect_modular(&pairs(&[CW, CW_SWAP, CW_SWAP, CW, CW_SWAP, CW_SWAP, CW_SWAP, CW]), 4).is_none());
        // uniform is not modular
        assert!(detect_modular(&pairs(&[CW; 8]), 4).is_none());
        // no shared base
        assert!(detect_modular(&pairs(&[CW, MIRROR, CW, CW]), 4).is_none());
    }

    #[test]
    fn test_modular_base_filter() {
        let labels = [MIRROR, TransformationLabel::Mirrored(Modifier::Swapped), MIRROR, MIRROR];
        assert!(detect_modular(&pairs(&labels), 4).is_some());
        assert!(detect_modular_with(&pairs(&labels), 4, TransformationLabel::is_quarter_rotation).is_none());
    }
}
