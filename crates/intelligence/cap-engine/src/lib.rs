//! CAP Engine - cyclic-pattern classification for circular beat sequences
//!
//! A circular sequence returns to where it started. The engine explains
//! *how* it gets back: which transformation carries the first half onto
//! the second (halved), or each quarter onto the next (quartered).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         CapDetector                          │
//! │                                                              │
//! │   beats ──► pairs ──► comparator ──► aggregate ──► format    │
//! │             (½, ¼)    (labels)      (common,      (candidate │
//! │                                      groups,       designa-  │
//! │                                      patterns)     tions)    │
//! │                                                              │
//! │   polyrhythmic ─┐                                            │
//! │   layered path ─┴──► merged into ClassificationResult        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust,ignore
//! use cap_engine::{detect_cap, CapDetector};
//!
//! let result = detect_cap(&sequence);
//! println!("{}", result.summary());
//! ```

pub mod aggregate;
pub mod collaborators;
pub mod comparator;
pub mod detector;
pub mod format;
pub mod label;
pub mod pairs;
pub mod patterns;
pub mod result;

pub use aggregate::{
    find_all_common_transformations, group_beat_pairs_by_pattern, reprioritize_beat_pairs, BeatPairGroups,
    UNKNOWN_PATTERN,
};
pub use collaborators::{
    Disabled, LayeredPathDetector, LayeredPathVerdict, PolyrhythmicDetector, PolyrhythmicVerdict,
};
pub use comparator::{compare_beats, direction_evidence, Comparator, DirectionEvidence};
pub use detector::{detect_cap, CapDetector, Outcome};
pub use format::{
    build_candidate_designations, derive_components_from_pattern, describe_pattern, extract_rotation_direction,
    is_duplicate_designation, CandidateDesignation, Component, Interval, IntervalMap,
};
pub use label::{Direction, Modifier, Rotation, TransformationLabel};
pub use pairs::{
    detect_rotation_direction, generate_halved_beat_pairs, generate_quartered_beat_pairs, BeatPairRelationship,
};
pub use patterns::{
    detect_axis_alternating, detect_modular, AxisAlternatingPattern, AxisAlternationKind, CompoundPattern,
    ModularColumn, ModularPattern, SwapRhythm,
};
pub use result::ClassificationResult;

pub use cap_core::is_circular;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown transformation label: {0}")]
    UnknownLabel(String),

    #[error("Unknown interval: {0}")]
    UnknownInterval(String),
}
