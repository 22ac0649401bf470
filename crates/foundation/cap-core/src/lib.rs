//! # CAP Core
//!
//! Beat model for circular movement sequences.
//!
//! A sequence is a ring of beats. Each beat moves two independent agents
//! ("colors") across an eight-point compass grid:
//!
//! ```text
//!        NW   N   NE
//!          \  |  /
//!      W ---  +  --- E
//!          /  |  \
//!        SW   S   SE
//! ```
//!
//! Everything downstream (the CAP classification engine) consumes the
//! immutable [`Beat`]s built here by the [`normalize`] module.

pub mod beat;
pub mod location;
pub mod motion;
pub mod normalize;

pub use beat::{is_circular, Beat, Sequence, StartPosition};
pub use location::{GridLocation, LocationTransform};
pub use motion::{Color, ColorMotion, MotionType, RotationDirection, Turns};
pub use normalize::{normalize_beat, normalize_motion, normalize_sequence, RawBeat, RawMotion, RawSequence, RawStartPosition, RawTurns};

/// Result type for cap-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while normalizing raw beat records
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown grid location: {0}")]
    UnknownLocation(String),

    #[error("Unknown motion type: {0}")]
    UnknownMotionType(String),

    #[error("Unknown rotation direction: {0}")]
    UnknownRotationDirection(String),

    #[error("Invalid turns value: {0}")]
    InvalidTurns(String),

    #[error("Sequence contains no beats")]
    EmptySequence,

    #[error("Beat numbering broken: expected beat {expected}, got {got}")]
    BeatNumbering { expected: u32, got: u32 },

    #[error("Sequence declares more than one beat 0")]
    DuplicateStart,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
