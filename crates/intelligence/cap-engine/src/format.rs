//! Candidate Formatter
//!
//! Label strings → components, directions, human text, and ranked
//! [`CandidateDesignation`]s. String-level helpers never fail: an
//! unrecognized token is dropped.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::label::{Direction, TransformationLabel};
use crate::Error;

/// One atomic transformation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Rotated,
    Swapped,
    Mirrored,
    Flipped,
    Inverted,
    Rewound,
    Repeated,
    Modular,
}

impl Component {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "rotated" => Some(Self::Rotated),
            "swapped" => Some(Self::Swapped),
            "mirrored" => Some(Self::Mirrored),
            "flipped" => Some(Self::Flipped),
            "inverted" => Some(Self::Inverted),
            "rewound" => Some(Self::Rewound),
            "repeated" => Some(Self::Repeated),
            "modular" => Some(Self::Modular),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rotated => "rotated",
            Self::Swapped => "swapped",
            Self::Mirrored => "mirrored",
            Self::Flipped => "flipped",
            Self::Inverted => "inverted",
            Self::Rewound => "rewound",
            Self::Repeated => "repeated",
            Self::Modular => "modular",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Rotated => "Rotated",
            Self::Swapped => "Swapped",
            Self::Mirrored => "Mirrored",
            Self::Flipped => "Flipped",
            Self::Inverted => "Inverted",
            Self::Rewound => "Rewound",
            Self::Repeated => "Repeated",
            Self::Modular => "Modular",
        }
    }
}

/// Periodicity at which a component applies
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Interval {
    Halved,
    Quartered,
    /// Named per-column rhythm, e.g. `1-2-2-1`
    Positional(String),
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halved => f.write_str("halved"),
            Self::Quartered => f.write_str("quartered"),
            Self::Positional(rhythm) => write!(f, "positional:{}", rhythm),
        }
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.to_string()
    }
}

impl TryFrom<String> for Interval {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "halved" => Ok(Self::Halved),
            "quartered" => Ok(Self::Quartered),
            other => other
                .strip_prefix("positional:")
                .map(|rhythm| Self::Positional(rhythm.to_string()))
                .ok_or_else(|| Error::UnknownInterval(value.clone())),
        }
    }
}

pub type IntervalMap = BTreeMap<Component, Interval>;

/// One equally valid way to name the pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDesignation {
    pub components: BTreeSet<Component>,
    /// Canonical machine tag
    pub cap_type: Option<String>,
    pub transformation_intervals: IntervalMap,
    pub rotation_direction: Option<Direction>,
    pub label: String,
    pub description: String,
}

impl CandidateDesignation {
    /// Same components at the same intervals; text is ignored
    pub fn is_duplicate_of(&self, other: &CandidateDesignation) -> bool {
        is_duplicate_designation(self, other)
    }
}

pub fn is_duplicate_designation(a: &CandidateDesignation, b: &CandidateDesignation) -> bool {
    a.components == b.components && a.transformation_intervals == b.transformation_intervals
}

/// Append unless an equivalent candidate is already present
pub fn push_unique_designation(list: &mut Vec<CandidateDesignation>, candidate: CandidateDesignation) -> bool {
    if list.iter().any(|existing| is_duplicate_designation(existing, &candidate)) {
        return false;
    }
    list.push(candidate);
    true
}

/// Tokenize on `_` and keep the tokens that name a component
pub fn derive_components_from_pattern(label: &str) -> BTreeSet<Component> {
    label
        .to_ascii_lowercase()
        .split('_')
        .filter_map(Component::from_token)
        .collect()
}

/// `cw`/`ccw` token in the label, if any
pub fn extract_rotation_direction(label: &str) -> Option<Direction> {
    let lower = label.to_ascii_lowercase();
    let tokens: Vec<&str> = lower.split('_').collect();
    if tokens.contains(&"ccw") {
        Some(Direction::Ccw)
    } else if tokens.contains(&"cw") {
        Some(Direction::Cw)
    } else {
        None
    }
}

/// Human-readable form of a label string.
///
/// `rotated_90_cw_swapped` → `90° CW Rotated + Swapped`. A label with no
/// recognizable token is returned unchanged.
pub fn describe_pattern(label: &str) -> String {
    let lower = label.to_ascii_lowercase();
    let tokens: Vec<&str> = lower.split('_').collect();

    let angle = if tokens.contains(&"90") {
        match extract_rotation_direction(&lower) {
            Some(dir) => Some(format!("90° {}", dir.as_str().to_ascii_uppercase())),
            None => Some("90°".to_string()),
        }
    } else if tokens.contains(&"180") {
        Some("180°".to_string())
    } else {
        None
    };

    let mut parts = Vec::new();
    for token in &tokens {
        let Some(component) = Component::from_token(token) else {
            continue;
        };
        match (&angle, component) {
            (Some(angle), Component::Rotated) => parts.push(format!("{} Rotated", angle)),
            _ => parts.push(component.title().to_string()),
        }
    }

    if parts.is_empty() {
        return label.to_string();
    }
    parts.join(" + ")
}

/// Interval of each component for a label found at `interval`.
///
/// Inversion is a half-cycle property unless a positional rhythm scopes it.
pub fn intervals_for(components: &BTreeSet<Component>, interval: &Interval) -> IntervalMap {
    components
        .iter()
        .map(|&component| {
            let scoped = match (component, interval) {
                (Component::Inverted, Interval::Positional(_)) => interval.clone(),
                (Component::Inverted, _) => Interval::Halved,
                _ => interval.clone(),
            };
            (component, scoped)
        })
        .collect()
}

/// Build one candidate per label, dropping duplicates and labels without
/// components.
///
/// `rotation_direction` is the advisory sequence-wide sense; a sense
/// encoded in the label wins.
pub fn build_candidate_designations(
    labels: &[TransformationLabel],
    interval: Interval,
    rotation_direction: Option<Direction>,
) -> Vec<CandidateDesignation> {
    let mut candidates = Vec::new();

    for label in labels {
        let components = label.components();
        if components.is_empty() {
            continue;
        }

        let direction = if components.contains(&Component::Rotated) {
            label.rotation_direction().or(rotation_direction)
        } else {
            None
        };

        let text = describe_pattern(&label.to_string());
        push_unique_designation(
            &mut candidates,
            CandidateDesignation {
                transformation_intervals: intervals_for(&components, &interval),
                components,
                cap_type: Some(label.to_string()),
                rotation_direction: direction,
                description: format!("{} ({})", text, interval),
                label: text,
            },
        );
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{Modifier, Rotation};

    #[test]
    fn test_derive_components() {
        let components = derive_components_from_pattern("mirrored_swapped_inverted");
        assert_eq!(
            components,
            BTreeSet::from([Component::Mirrored, Component::Swapped, Component::Inverted])
        );
        assert!(derive_components_from_pattern("wobbly_thing").is_empty());
        assert_eq!(
            derive_components_from_pattern("rotated_90_cw_bogus"),
            BTreeSet::from([Component::Rotated])
        );
    }

    #[test]
    fn test_extract_direction() {
        assert_eq!(extract_rotation_direction("rotated_90_cw"), Some(Direction::Cw));
        assert_eq!(extract_rotation_direction("rotated_90_ccw_swapped"), Some(Direction::Ccw));
        assert_eq!(extract_rotation_direction("rotated_180"), None);
        assert_eq!(extract_rotation_direction("mirrored"), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe_pattern("rotated_90_ccw_swapped"), "90° CCW Rotated + Swapped");
        assert_eq!(describe_pattern("rotated_180_inverted"), "180° Rotated + Inverted");
        assert_eq!(describe_pattern("mirrored"), "Mirrored");
        assert_eq!(describe_pattern("nonsense"), "nonsense");
    }

    #[test]
    fn test_interval_strings() {
        assert_eq!(Interval::Positional("1-2-2-1".into()).to_string(), "positional:1-2-2-1");
        assert_eq!(Interval::try_from("quartered".to_string()).unwrap(), Interval::Quartered);
        assert!(Interval::try_from("weekly".to_string()).is_err());
    }

    #[test]
    fn test_build_candidates() {
        let labels = [
            TransformationLabel::Rotated(Rotation::Cw90, Modifier::Inverted),
            TransformationLabel::Mirrored(Modifier::None),
        ];
        let candidates = build_candidate_designations(&labels, Interval::Quartered, Some(Direction::Ccw));
        assert_eq!(candidates.len(), 2);

        let rotated = &candidates[0];
        assert_eq!(rotated.cap_type.as_deref(), Some("rotated_90_cw_inverted"));
        assert_eq!(rotated.rotation_direction, Some(Direction::Cw));
        assert_eq!(rotated.transformation_intervals[&Component::Rotated], Interval::Quartered);
        assert_eq!(rotated.transformation_intervals[&Component::Inverted], Interval::Halved);

        assert_eq!(candidates[1].rotation_direction, None);
    }

    #[test]
    fn test_advisory_direction_for_half_turn() {
        let labels = [TransformationLabel::Rotated(Rotation::Half, Modifier::None)];
        let candidates = build_candidate_designations(&labels, Interval::Halved, Some(Direction::Cw));
        assert_eq!(candidates[0].rotation_direction, Some(Direction::Cw));
    }

    #[test]
    fn test_deduplication() {
        // cw and ccw normalize to the same components and intervals
        let labels = [
            TransformationLabel::Rotated(Rotation::Cw90, Modifier::None),
            TransformationLabel::Rotated(Rotation::Ccw90, Modifier::None),
            TransformationLabel::Rotated(Rotation::Cw90, Modifier::None),
            TransformationLabel::Rotated(Rotation::Half, Modifier::Swapped),
        ];
        let candidates = build_candidate_designations(&labels, Interval::Halved, None);
        assert_eq!(candidates.len(), 2);
        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                assert!(!a.is_duplicate_of(b));
            }
        }
    }
}
