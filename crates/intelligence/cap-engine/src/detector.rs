//! Classification Orchestrator
//!
//! The decision procedure runs through fixed stages; the first stage that
//! reaches a verdict ends the run.
//!
//! ```text
//!   Circularity ──✗──► Empty
//!       │
//!   Parity ──odd──► Freeform
//!       │
//!   Halved pairs (always)
//!       │
//!   N % 4 == 0 ? ──► uniform 90° ──► Rotated (+ compound swap)
//!       │               compound ──► Compound
//!       │        modular columns ──► ModularQuartered
//!       ▼
//!   Halved common ──► Halved
//!       │
//!   Fallback (modular / axis-alternating / freeform)
//! ```

use std::fmt;

use cap_config::EngineConfig;
use cap_core::Sequence;

use crate::aggregate::{find_all_common_transformations, group_beat_pairs_by_pattern, reprioritize_beat_pairs};
use crate::collaborators::{Disabled, LayeredPathDetector, PolyrhythmicDetector};
use crate::comparator::Comparator;
use crate::format::{
    build_candidate_designations, describe_pattern, push_unique_designation, CandidateDesignation, Component, Interval,
};
use crate::label::{Direction, TransformationLabel};
use crate::pairs::{rotation_direction_from_pairs, BeatPairRelationship};
use crate::patterns::{detect_axis_alternating, detect_modular_with, CompoundPattern};
use crate::result::ClassificationResult;

/// Stage that produced the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Empty,
    Freeform,
    Rotated,
    Compound,
    ModularQuartered,
    Halved,
    Fallback,
}

impl Outcome {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Empty => "not circular or too short",
            Self::Freeform => "odd beat count",
            Self::Rotated => "uniform quarter rotation",
            Self::Compound => "quartered rotation with halved swap",
            Self::ModularQuartered => "modular quartered columns",
            Self::Halved => "uniform halved transformation",
            Self::Fallback => "no uniform transformation",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// CAP classifier with pluggable sibling detectors
pub struct CapDetector {
    config: EngineConfig,
    comparator: Comparator,
    polyrhythmic: Box<dyn PolyrhythmicDetector>,
    layered_path: Box<dyn LayeredPathDetector>,
}

impl Default for CapDetector {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl CapDetector {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            comparator: Comparator::new(config.report_ambiguous_inversions),
            config,
            polyrhythmic: Box::new(Disabled),
            layered_path: Box::new(Disabled),
        }
    }

    pub fn with_polyrhythmic_detector(mut self, detector: impl PolyrhythmicDetector + 'static) -> Self {
        self.polyrhythmic = Box::new(detector);
        self
    }

    pub fn with_layered_path_detector(mut self, detector: impl LayeredPathDetector + 'static) -> Self {
        self.layered_path = Box::new(detector);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify one sequence
    pub fn detect(&self, sequence: &Sequence) -> ClassificationResult {
        let polyrhythmic = self.polyrhythmic.detect_polyrhythmic(sequence);
        let layered_path = self.layered_path.detect_layered_path(sequence);

        let (outcome, result) = self.classify(sequence);
        tracing::info!(
            beats = sequence.len(),
            cap_type = result.cap_type.as_deref().unwrap_or("none"),
            outcome = %outcome,
            "classified sequence"
        );
        result.with_sibling_verdicts(polyrhythmic, layered_path)
    }

    fn classify(&self, sequence: &Sequence) -> (Outcome, ClassificationResult) {
        let beats = &sequence.beats;
        let n = beats.len();
        if n < self.config.min_beats || !sequence.is_circular() {
            tracing::debug!(beats = n, "sequence is not circular");
            return (Outcome::Empty, ClassificationResult::empty());
        }
        if n % 2 != 0 {
            tracing::debug!(beats = n, "odd beat count");
            return (Outcome::Freeform, ClassificationResult::freeform());
        }

        let halved = reprioritize_beat_pairs(&self.comparator.halved_pairs(beats));

        let mut advisory = None;
        if n % 4 == 0 {
            let quartered = reprioritize_beat_pairs(&self.comparator.quartered_pairs(beats));
            advisory = rotation_direction_from_pairs(&quartered);
            if let Some(found) = self.quartered_stage(&quartered, &halved, advisory) {
                return found;
            }
        }

        if let Some(result) = self.halved_stage(&halved, advisory) {
            return (Outcome::Halved, result);
        }

        (Outcome::Fallback, self.fallback_stage(halved))
    }

    fn quartered_stage(
        &self,
        quartered: &[BeatPairRelationship],
        halved: &[BeatPairRelationship],
        advisory: Option<Direction>,
    ) -> Option<(Outcome, ClassificationResult)> {
        let uniform: Vec<TransformationLabel> = find_all_common_transformations(quartered)
            .into_iter()
            .filter(TransformationLabel::is_quarter_rotation)
            .collect();
        tracing::debug!(uniform = ?uniform, direction = ?advisory, "quartered pairs");

        let halved_swap = halved_color_swap(halved);

        if !uniform.is_empty() {
            let result = self.rotated_result(&uniform, quartered, halved, halved_swap, advisory);
            return Some((Outcome::Rotated, result));
        }

        if let Some(result) = self.compound_result(quartered, halved, halved_swap, advisory) {
            return Some((Outcome::Compound, result));
        }

        self.modular_quartered_result(quartered, halved, advisory)
            .map(|result| (Outcome::ModularQuartered, result))
    }

    fn rotated_result(
        &self,
        uniform: &[TransformationLabel],
        quartered: &[BeatPairRelationship],
        halved: &[BeatPairRelationship],
        halved_swap: Option<TransformationLabel>,
        advisory: Option<Direction>,
    ) -> ClassificationResult {
        let candidates = build_candidate_designations(uniform, Interval::Quartered, advisory);
        let mut result = match candidates.first() {
            Some(primary) => ClassificationResult::circular().designate(primary),
            None => ClassificationResult::circular(),
        };
        result.beat_pairs = quartered.to_vec();
        result.beat_pair_groups = group_beat_pairs_by_pattern(quartered);
        result.candidate_designations = candidates;

        match (halved_swap, uniform.first()) {
            (Some(swap), Some(&rotation)) => {
                let direction = rotation.rotation_direction().or(advisory);
                merge_compound(result, compound_pattern(rotation, swap, direction), quartered, halved)
            }
            _ => result,
        }
    }

    /// Every quartered pair turns a quarter, the primary labels collapse to
    /// a few distinct values on one side of the swap split, and every halved
    /// pair is a color swap
    fn compound_result(
        &self,
        quartered: &[BeatPairRelationship],
        halved: &[BeatPairRelationship],
        halved_swap: Option<TransformationLabel>,
        advisory: Option<Direction>,
    ) -> Option<ClassificationResult> {
        if !quartered
            .iter()
            .all(|pair| pair.first_matching(TransformationLabel::is_quarter_rotation).is_some())
        {
            return None;
        }
        let primaries: Vec<TransformationLabel> = quartered
            .iter()
            .map(BeatPairRelationship::primary)
            .collect::<Option<_>>()?;

        let mut counts: Vec<(TransformationLabel, usize)> = Vec::new();
        for label in &primaries {
            match counts.iter_mut().find(|(l, _)| l == label) {
                Some((_, count)) => *count += 1,
                None => counts.push((*label, 1)),
            }
        }
        if counts.is_empty() || counts.len() > self.config.compound_max_distinct_patterns {
            tracing::debug!(distinct = counts.len(), "too many primary patterns for compound");
            return None;
        }
        let swapped = counts.iter().filter(|(l, _)| l.is_swapped()).count();
        if swapped != 0 && swapped != counts.len() {
            tracing::debug!("primary patterns straddle the swap split");
            return None;
        }
        let swap = halved_swap?;

        // Most frequent quarter-turn primary, first seen on ties
        let turns: Vec<(TransformationLabel, usize)> = counts
            .iter()
            .copied()
            .filter(|(l, _)| l.is_quarter_rotation())
            .collect();
        let mut dominant = *turns.first()?;
        for entry in &turns[1..] {
            if entry.1 > dominant.1 {
                dominant = *entry;
            }
        }
        let rotation = dominant.0;
        let direction = rotation.rotation_direction().or(advisory);

        let candidates: Vec<TransformationLabel> = turns.iter().map(|(l, _)| *l).collect();
        let mut result = ClassificationResult::circular();
        result.beat_pairs = quartered.to_vec();
        result.beat_pair_groups = group_beat_pairs_by_pattern(quartered);
        result.candidate_designations = build_candidate_designations(&candidates, Interval::Quartered, direction);

        Some(merge_compound(result, compound_pattern(rotation, swap, direction), quartered, halved))
    }

    fn modular_quartered_result(
        &self,
        quartered: &[BeatPairRelationship],
        halved: &[BeatPairRelationship],
        advisory: Option<Direction>,
    ) -> Option<ClassificationResult> {
        let modular = detect_modular_with(
            quartered,
            self.config.modular_cycle_length,
            TransformationLabel::is_quarter_rotation,
        )?;
        tracing::debug!(rhythm = %modular.swap_rhythm, bits = %modular.swap_bits, "modular quartered columns");

        let base = modular.base_transformation;
        let positional = Interval::Positional(modular.swap_rhythm.to_string());

        let mut result = ClassificationResult::circular();
        result.is_modular = true;
        result.cap_type = Some(format!("modular_{}_{}", base, modular.swap_bits));
        result.rotation_direction = base.rotation_direction().or(advisory);

        result.components = base.components();
        result.components.insert(Component::Modular);
        for component in &result.components {
            result
                .transformation_intervals
                .insert(*component, Interval::Quartered);
        }
        if !modular.swapped_positions.is_empty() {
            result.components.insert(Component::Swapped);
            result.transformation_intervals.insert(Component::Swapped, positional.clone());
        }
        if modular.columns.iter().any(|c| c.is_inverted) {
            result.components.insert(Component::Inverted);
            result.transformation_intervals.insert(
                Component::Inverted,
                Interval::Positional(modular.invert_rhythm.to_string()),
            );
        }

        let mut designations = vec![CandidateDesignation {
            components: result.components.clone(),
            cap_type: result.cap_type.clone(),
            transformation_intervals: result.transformation_intervals.clone(),
            rotation_direction: result.rotation_direction,
            label: format!("Modular {}", describe_pattern(&base.to_string())),
            description: modular.description(),
        }];
        for candidate in build_candidate_designations(&[base], Interval::Quartered, advisory) {
            push_unique_designation(&mut designations, candidate);
        }
        result.candidate_designations = designations;

        result.beat_pairs = quartered.iter().chain(halved).cloned().collect();
        result.beat_pair_groups = group_beat_pairs_by_pattern(quartered);
        result.modular = Some(modular);
        Some(result)
    }

    fn halved_stage(&self, halved: &[BeatPairRelationship], advisory: Option<Direction>) -> Option<ClassificationResult> {
        let common = find_all_common_transformations(halved);
        tracing::debug!(common = ?common, "halved pairs");

        let candidates = build_candidate_designations(&common, Interval::Halved, advisory);
        let primary = candidates.first()?.clone();

        let mut result = ClassificationResult::circular().designate(&primary);
        result.candidate_designations = candidates;
        result.beat_pairs = halved.to_vec();
        result.beat_pair_groups = group_beat_pairs_by_pattern(halved);
        Some(result)
    }

    fn fallback_stage(&self, halved: Vec<BeatPairRelationship>) -> ClassificationResult {
        let groups = group_beat_pairs_by_pattern(&halved);
        let recognized = groups.recognized_count();
        let is_modular = recognized >= 2 && !groups.has_unknown();

        let mut result = ClassificationResult::circular();
        result.is_freeform = groups.has_unknown() || recognized == 0;
        result.is_modular = is_modular;
        tracing::debug!(recognized, unknown = groups.has_unknown(), is_modular, "fallback grouping");

        if is_modular {
            result.cap_type = Some("modular".to_string());
            result.components.insert(Component::Modular);
            result
                .transformation_intervals
                .insert(Component::Modular, Interval::Halved);

            let axis = if self.config.detect_axis_alternation {
                detect_axis_alternating(&halved)
            } else {
                None
            };
            if let Some(axis) = axis {
                let positional = Interval::Positional(axis.kind.to_string());
                for label in &axis.labels {
                    for component in label.components() {
                        result.components.insert(component);
                        result.transformation_intervals.insert(component, positional.clone());
                    }
                }
                result.cap_type = Some(format!("axis_alternating_{}", axis.kind));
                result.axis_alternating = Some(axis);
            }
        }

        result.beat_pair_groups = groups;
        result.beat_pairs = halved;
        result
    }
}

/// A pure color swap shared by every halved pair
fn halved_color_swap(halved: &[BeatPairRelationship]) -> Option<TransformationLabel> {
    let mut representative = None;
    for pair in halved {
        let swap = pair.first_matching(TransformationLabel::is_color_swap)?;
        representative.get_or_insert(swap);
    }
    representative
}

fn compound_pattern(
    rotation: TransformationLabel,
    swap: TransformationLabel,
    direction: Option<Direction>,
) -> CompoundPattern {
    CompoundPattern {
        quartered_transformation: rotation,
        halved_transformation: swap,
        rotation_direction: direction,
        cap_type: format!("{}_swapped_180", rotation),
        description: format!("{} (quartered) + Swapped (halved)", describe_pattern(&rotation.to_string())),
    }
}

/// Fold the halved swap into a quartered-rotation result
fn merge_compound(
    mut result: ClassificationResult,
    compound: CompoundPattern,
    quartered: &[BeatPairRelationship],
    halved: &[BeatPairRelationship],
) -> ClassificationResult {
    tracing::debug!(cap_type = %compound.cap_type, "compound pattern");

    result.cap_type = Some(compound.cap_type.clone());
    result.rotation_direction = compound.rotation_direction;
    result.components = compound.quartered_transformation.components();
    result.transformation_intervals.clear();
    for component in &result.components {
        let interval = match component {
            Component::Inverted => Interval::Halved,
            _ => Interval::Quartered,
        };
        result.transformation_intervals.insert(*component, interval);
    }
    result.components.insert(Component::Swapped);
    result.transformation_intervals.insert(Component::Swapped, Interval::Halved);

    let mut designations = vec![CandidateDesignation {
        components: result.components.clone(),
        cap_type: result.cap_type.clone(),
        transformation_intervals: result.transformation_intervals.clone(),
        rotation_direction: result.rotation_direction,
        label: compound.description.clone(),
        description: compound.description.clone(),
    }];
    for candidate in result.candidate_designations.drain(..) {
        push_unique_designation(&mut designations, candidate);
    }
    result.candidate_designations = designations;

    result.beat_pairs = quartered.iter().chain(halved).cloned().collect();
    let mut groups = group_beat_pairs_by_pattern(quartered);
    groups.merge(&group_beat_pairs_by_pattern(halved));
    result.beat_pair_groups = groups;
    result.compound = Some(compound);
    result
}

/// Classify with the default configuration and no sibling detectors
pub fn detect_cap(sequence: &Sequence) -> ClassificationResult {
    CapDetector::default().detect(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::PolyrhythmicVerdict;
    use cap_core::{Beat, ColorMotion, GridLocation, MotionType, RotationDirection, StartPosition};

    fn still_beats(n: u32) -> Sequence {
        let primary = ColorMotion::new(GridLocation::N, GridLocation::N, MotionType::Static, RotationDirection::None);
        let secondary = ColorMotion::new(GridLocation::S, GridLocation::S, MotionType::Static, RotationDirection::None);
        Sequence::new((1..=n).map(|i| Beat::new(i, primary, secondary)).collect()).with_start_position(StartPosition {
            primary: GridLocation::N,
            secondary: GridLocation::S,
        })
    }

    #[test]
    fn test_odd_count_is_freeform() {
        let result = detect_cap(&still_beats(3));
        assert!(result.is_circular);
        assert!(result.is_freeform);
        assert!(result.components.is_empty());
        assert!(result.beat_pairs.is_empty());
    }

    #[test]
    fn test_too_short_is_empty() {
        assert!(!detect_cap(&still_beats(1)).is_circular);

        let config = EngineConfig {
            min_beats: 4,
            ..Default::default()
        };
        let result = CapDetector::new(config).detect(&still_beats(2));
        assert!(!result.is_circular);
        assert!(result.cap_type.is_none());
    }

    #[test]
    fn test_repeated_pair() {
        let result = detect_cap(&still_beats(2));
        assert_eq!(result.cap_type.as_deref(), Some("repeated"));
        assert!(result.components.contains(&Component::Repeated));
        assert_eq!(result.transformation_intervals[&Component::Repeated], Interval::Halved);
        assert!(!result.is_freeform);
    }

    #[test]
    fn test_sibling_verdicts_on_every_outcome() {
        let detector = CapDetector::default().with_polyrhythmic_detector(|_: &Sequence| PolyrhythmicVerdict {
            is_polyrhythmic: true,
            polyrhythm: Some("2:1".to_string()),
            ..Default::default()
        });

        let mut open = still_beats(4);
        open.start_position = None;
        let result = detector.detect(&open);
        assert!(!result.is_circular);
        assert!(result.is_polyrhythmic);

        let result = detector.detect(&still_beats(3));
        assert!(result.is_freeform);
        assert_eq!(result.polyrhythmic.polyrhythm.as_deref(), Some("2:1"));
        assert!(!result.is_layered_path);
    }

    fn pairs(labels: &[&[TransformationLabel]]) -> Vec<BeatPairRelationship> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| BeatPairRelationship::new(i as u32 + 1, i as u32 + 2, l.to_vec()))
            .collect()
    }

    #[test]
    fn test_compound_counts_primary_labels() {
        use crate::label::{Modifier, Rotation};
        let cw = TransformationLabel::Rotated(Rotation::Cw90, Modifier::None);
        let cw_inverted = TransformationLabel::Rotated(Rotation::Cw90, Modifier::Inverted);
        let mirror = TransformationLabel::Mirrored(Modifier::None);
        let flip = TransformationLabel::Flipped(Modifier::None);
        let swap = TransformationLabel::Swapped { inverted: false };

        let halved = pairs(&[&[swap], &[swap]]);
        let detector = CapDetector::default();

        // Same quarter turn everywhere, but three distinct primaries
        let quartered = pairs(&[&[mirror, cw], &[flip, cw], &[cw], &[cw]]);
        assert!(detector
            .compound_result(&quartered, &halved, halved_color_swap(&halved), None)
            .is_none());

        let quartered = pairs(&[&[cw], &[cw_inverted], &[cw], &[cw_inverted]]);
        let result = detector
            .compound_result(&quartered, &halved, halved_color_swap(&halved), None)
            .unwrap();
        assert_eq!(result.cap_type.as_deref(), Some("rotated_90_cw_swapped_180"));
        assert_eq!(result.rotation_direction, Some(Direction::Cw));
    }

    #[test]
    fn test_outcome_text() {
        assert_eq!(Outcome::Compound.to_string(), "quartered rotation with halved swap");
    }
}
