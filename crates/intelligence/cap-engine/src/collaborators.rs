//! Sibling detectors
//!
//! Polyrhythm and layered-path analysis run beside the classifier. The
//! engine only consumes their verdicts; any implementation (or a plain
//! closure) can be plugged in, and a disabled stub is used otherwise.

use serde::{Deserialize, Serialize};

use cap_core::Sequence;

/// Verdict of a polyrhythm analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyrhythmicVerdict {
    pub is_polyrhythmic: bool,
    /// Ratio such as `"3:2"`
    pub polyrhythm: Option<String>,
    pub periods: Vec<usize>,
    pub motion_period: Option<usize>,
    pub spatial_period: Option<usize>,
    pub description: String,
    pub confidence: f32,
}

impl Default for PolyrhythmicVerdict {
    fn default() -> Self {
        Self {
            is_polyrhythmic: false,
            polyrhythm: None,
            periods: Vec::new(),
            motion_period: None,
            spatial_period: None,
            description: "Polyrhythm detection disabled".to_string(),
            confidence: 0.0,
        }
    }
}

/// Verdict of a layered (independent per-color) path analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayeredPathVerdict {
    pub is_layered_path: bool,
    pub blue_cycle: Option<usize>,
    pub red_cycle: Option<usize>,
    pub rhythm_type: Option<String>,
    pub polyrhythm_ratio: Option<String>,
    pub zone_coverage: f32,
    pub description: String,
    pub confidence: f32,
}

impl Default for LayeredPathVerdict {
    fn default() -> Self {
        Self {
            is_layered_path: false,
            blue_cycle: None,
            red_cycle: None,
            rhythm_type: None,
            polyrhythm_ratio: None,
            zone_coverage: 0.0,
            description: "Layered path detection disabled".to_string(),
            confidence: 0.0,
        }
    }
}

pub trait PolyrhythmicDetector: Send + Sync {
    fn detect_polyrhythmic(&self, sequence: &Sequence) -> PolyrhythmicVerdict;
}

pub trait LayeredPathDetector: Send + Sync {
    fn detect_layered_path(&self, sequence: &Sequence) -> LayeredPathVerdict;
}

impl<F> PolyrhythmicDetector for F
where
    F: Fn(&Sequence) -> PolyrhythmicVerdict + Send + Sync,
{
    fn detect_polyrhythmic(&self, sequence: &Sequence) -> PolyrhythmicVerdict {
        self(sequence)
    }
}

impl<F> LayeredPathDetector for F
where
    F: Fn(&Sequence) -> LayeredPathVerdict + Send + Sync,
{
    fn detect_layered_path(&self, sequence: &Sequence) -> LayeredPathVerdict {
        self(sequence)
    }
}

/// Stub used when no detector is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

impl PolyrhythmicDetector for Disabled {
    fn detect_polyrhythmic(&self, _sequence: &Sequence) -> PolyrhythmicVerdict {
        PolyrhythmicVerdict::default()
    }
}

impl LayeredPathDetector for Disabled {
    fn detect_layered_path(&self, _sequence: &Sequence) -> LayeredPathVerdict {
        LayeredPathVerdict::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_verdicts() {
        let sequence = Sequence::new(Vec::new());
        assert!(!Disabled.detect_polyrhythmic(&sequence).is_polyrhythmic);
        assert!(!Disabled.detect_layered_path(&sequence).is_layered_path);
    }

    #[test]
    fn test_closure_detector() {
        let detector = |seq: &Sequence| PolyrhythmicVerdict {
            is_polyrhythmic: seq.is_empty(),
            polyrhythm: Some("3:2".to_string()),
            ..Default::default()
        };
        let verdict = detector.detect_polyrhythmic(&Sequence::new(Vec::new()));
        assert!(verdict.is_polyrhythmic);
        assert_eq!(verdict.polyrhythm.as_deref(), Some("3:2"));
    }
}
