//! Classification result

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::aggregate::BeatPairGroups;
use crate::collaborators::{LayeredPathVerdict, PolyrhythmicVerdict};
use crate::format::{CandidateDesignation, Component, IntervalMap};
use crate::label::Direction;
use crate::pairs::BeatPairRelationship;
use crate::patterns::{AxisAlternatingPattern, CompoundPattern, ModularPattern};

/// Everything one classification run found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub cap_type: Option<String>,
    pub components: BTreeSet<Component>,
    pub transformation_intervals: IntervalMap,
    pub rotation_direction: Option<Direction>,
    pub candidate_designations: Vec<CandidateDesignation>,
    pub beat_pairs: Vec<BeatPairRelationship>,
    pub beat_pair_groups: BeatPairGroups,
    pub is_circular: bool,
    pub is_freeform: bool,
    pub is_modular: bool,
    pub modular: Option<ModularPattern>,
    pub compound: Option<CompoundPattern>,
    pub axis_alternating: Option<AxisAlternatingPattern>,
    pub is_polyrhythmic: bool,
    pub polyrhythmic: PolyrhythmicVerdict,
    pub is_layered_path: bool,
    pub layered_path: LayeredPathVerdict,
}

impl ClassificationResult {
    /// Not circular or too short: nothing is asserted
    pub fn empty() -> Self {
        Self {
            cap_type: None,
            components: BTreeSet::new(),
            transformation_intervals: IntervalMap::new(),
            rotation_direction: None,
            candidate_designations: Vec::new(),
            beat_pairs: Vec::new(),
            beat_pair_groups: BeatPairGroups::default(),
            is_circular: false,
            is_freeform: false,
            is_modular: false,
            modular: None,
            compound: None,
            axis_alternating: None,
            is_polyrhythmic: false,
            polyrhythmic: PolyrhythmicVerdict::default(),
            is_layered_path: false,
            layered_path: LayeredPathVerdict::default(),
        }
    }

    /// Circular but without a recognizable pattern
    pub fn freeform() -> Self {
        Self {
            is_freeform: true,
            ..Self::circular()
        }
    }

    pub(crate) fn circular() -> Self {
        Self {
            is_circular: true,
            ..Self::empty()
        }
    }

    /// Adopt one candidate as the primary designation
    pub(crate) fn designate(mut self, candidate: &CandidateDesignation) -> Self {
        self.cap_type = candidate.cap_type.clone();
        self.components = candidate.components.clone();
        self.transformation_intervals = candidate.transformation_intervals.clone();
        self.rotation_direction = candidate.rotation_direction;
        self
    }

    pub fn with_sibling_verdicts(mut self, polyrhythmic: PolyrhythmicVerdict, layered_path: LayeredPathVerdict) -> Self {
        self.is_polyrhythmic = polyrhythmic.is_polyrhythmic;
        self.polyrhythmic = polyrhythmic;
        self.is_layered_path = layered_path.is_layered_path;
        self.layered_path = layered_path;
        self
    }

    pub fn is_compound(&self) -> bool {
        self.compound.is_some()
    }

    pub fn is_axis_alternating(&self) -> bool {
        self.axis_alternating.is_some()
    }

    /// One-paragraph human summary
    pub fn summary(&self) -> String {
        if !self.is_circular {
            return "Not circular: the sequence does not return to its start position.".to_string();
        }

        let mut lines = Vec::new();
        match (&self.cap_type, self.is_freeform) {
            (Some(cap_type), _) => lines.push(format!("CAP type: {}", cap_type)),
            (None, true) => lines.push("Freeform: no cyclic pattern recognized".to_string()),
            (None, false) => lines.push("No primary designation".to_string()),
        }

        if !self.components.is_empty() {
            let parts: Vec<String> = self
                .components
                .iter()
                .map(|c| match self.transformation_intervals.get(c) {
                    Some(interval) => format!("{} ({})", c.as_str(), interval),
                    None => c.as_str().to_string(),
                })
                .collect();
            lines.push(format!("Components: {}", parts.join(", ")));
        }
        if let Some(direction) = self.rotation_direction {
            lines.push(format!("Rotation: {}", direction));
        }
        if let Some(compound) = &self.compound {
            lines.push(format!("Compound: {}", compound.description));
        }
        if let Some(modular) = &self.modular {
            lines.push(format!("Modular: {}", modular.description()));
        } else if self.is_modular {
            lines.push(format!("Modular: {} distinct column patterns", self.beat_pair_groups.recognized_count()));
        }
        if let Some(axis) = &self.axis_alternating {
            lines.push(format!("Axis alternation: {}", axis.description));
        }
        if !self.beat_pair_groups.is_empty() {
            let groups: Vec<String> = self
                .beat_pair_groups
                .iter()
                .map(|(pattern, beats)| format!("{} {:?}", pattern, beats))
                .collect();
            lines.push(format!("Groups: {}", groups.join("; ")));
        }
        if self.candidate_designations.len() > 1 {
            let names: Vec<&str> = self.candidate_designations.iter().map(|c| c.label.as_str()).collect();
            lines.push(format!("Also valid: {}", names[1..].join("; ")));
        }
        if self.is_polyrhythmic {
            lines.push(format!("Polyrhythm: {}", self.polyrhythmic.description));
        }
        if self.is_layered_path {
            lines.push(format!("Layered path: {}", self.layered_path.description));
        }

        lines.join("\n")
    }
}
