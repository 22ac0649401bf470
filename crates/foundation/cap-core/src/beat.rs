//! Beats and sequences

use serde::{Deserialize, Serialize};

use crate::{Color, ColorMotion, GridLocation};

/// One discrete motion event for both colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    /// 1-based position in the sequence (0 for the start record)
    pub beat_number: u32,
    pub letter: Option<String>,
    pub primary: ColorMotion,
    pub secondary: ColorMotion,
}

impl Beat {
    pub fn new(beat_number: u32, primary: ColorMotion, secondary: ColorMotion) -> Self {
        Self {
            beat_number,
            letter: None,
            primary,
            secondary,
        }
    }

    pub fn motion(&self, color: Color) -> &ColorMotion {
        match color {
            Color::Primary => &self.primary,
            Color::Secondary => &self.secondary,
        }
    }

    /// Where both colors come to rest at the end of this beat
    pub fn end_position(&self) -> StartPosition {
        StartPosition {
            primary: self.primary.end_location,
            secondary: self.secondary.end_location,
        }
    }
}

/// Resting position of both colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StartPosition {
    pub primary: GridLocation,
    pub secondary: GridLocation,
}

/// An ordered, 1-indexed ring of beats
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sequence {
    pub beats: Vec<Beat>,
    /// Beat 0: the start state, only used for the circularity test
    #[serde(default)]
    pub start: Option<Beat>,
    /// Declared start position, used when no beat 0 is present
    #[serde(default)]
    pub start_position: Option<StartPosition>,
}

impl Sequence {
    pub fn new(beats: Vec<Beat>) -> Self {
        Self {
            beats,
            start: None,
            start_position: None,
        }
    }

    pub fn with_start(mut self, start: Beat) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_start_position(mut self, position: StartPosition) -> Self {
        self.start_position = Some(position);
        self
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// Beat by 1-based number
    pub fn beat(&self, beat_number: usize) -> Option<&Beat> {
        beat_number.checked_sub(1).and_then(|index| self.beats.get(index))
    }

    /// Position the sequence must return to. Beat 0 wins over the
    /// declared start position.
    pub fn home_position(&self) -> Option<StartPosition> {
        self.start
            .as_ref()
            .map(Beat::end_position)
            .or(self.start_position)
    }

    /// The final beat ends where the sequence started
    pub fn is_circular(&self) -> bool {
        match (self.beats.last(), self.home_position()) {
            (Some(last), Some(home)) => last.end_position() == home,
            _ => false,
        }
    }
}

/// Standalone circularity predicate
pub fn is_circular(sequence: &Sequence) -> bool {
    sequence.is_circular()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MotionType, RotationDirection};

    fn motion(start: GridLocation, end: GridLocation) -> ColorMotion {
        ColorMotion::new(start, end, MotionType::Pro, RotationDirection::Cw)
    }

    fn start_beat(primary: GridLocation, secondary: GridLocation) -> Beat {
        Beat::new(0, motion(primary, primary), motion(secondary, secondary))
    }

    #[test]
    fn test_circular_with_beat_zero() {
        let seq = Sequence::new(vec![
            Beat::new(1, motion(GridLocation::N, GridLocation::E), motion(GridLocation::S, GridLocation::W)),
            Beat::new(2, motion(GridLocation::E, GridLocation::N), motion(GridLocation::W, GridLocation::S)),
        ])
        .with_start(start_beat(GridLocation::N, GridLocation::S));

        assert!(seq.is_circular());
    }

    #[test]
    fn test_not_circular() {
        let seq = Sequence::new(vec![Beat::new(
            1,
            motion(GridLocation::N, GridLocation::E),
            motion(GridLocation::S, GridLocation::W),
        )])
        .with_start(start_beat(GridLocation::N, GridLocation::S));

        assert!(!seq.is_circular());
    }

    #[test]
    fn test_declared_start_fallback() {
        let seq = Sequence::new(vec![Beat::new(
            1,
            motion(GridLocation::N, GridLocation::E),
            motion(GridLocation::S, GridLocation::W),
        )])
        .with_start_position(StartPosition {
            primary: GridLocation::E,
            secondary: GridLocation::W,
        });

        assert!(is_circular(&seq));
    }

    #[test]
    fn test_beat_zero_wins_over_declared_start() {
        let seq = Sequence::new(vec![Beat::new(
            1,
            motion(GridLocation::N, GridLocation::E),
            motion(GridLocation::S, GridLocation::W),
        )])
        .with_start(start_beat(GridLocation::N, GridLocation::S))
        .with_start_position(StartPosition {
            primary: GridLocation::E,
            secondary: GridLocation::W,
        });

        assert!(!seq.is_circular());
    }

    #[test]
    fn test_empty_is_not_circular() {
        assert!(!Sequence::default().is_circular());
    }
}
