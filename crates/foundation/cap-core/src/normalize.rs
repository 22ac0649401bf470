//! Beat Normalizer
//!
//! Turns loosely-typed beat records (as stored by the authoring app)
//! into the uniform [`Sequence`] the engine works on. Every vocabulary
//! check happens here so the engine can stay total.

use serde::{Deserialize, Serialize};

use crate::{Beat, ColorMotion, Error, GridLocation, MotionType, Result, RotationDirection, Sequence, StartPosition, Turns};

/// Turns as stored: a number, or a float marker such as `"fl"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTurns {
    Number(f32),
    Text(String),
}

/// One color's motion, string-typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMotion {
    #[serde(alias = "start_location")]
    pub start_loc: String,
    #[serde(alias = "end_location")]
    pub end_loc: String,
    pub motion_type: String,
    #[serde(alias = "rotation_direction", default)]
    pub prop_rot_dir: String,
    #[serde(default)]
    pub turns: Option<RawTurns>,
}

/// One beat record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBeat {
    pub beat: u32,
    #[serde(default)]
    pub letter: Option<String>,
    #[serde(alias = "blue_attributes", alias = "blue")]
    pub primary: RawMotion,
    #[serde(alias = "red_attributes", alias = "red")]
    pub secondary: RawMotion,
}

/// Declared start position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStartPosition {
    #[serde(alias = "blue")]
    pub primary: String,
    #[serde(alias = "red")]
    pub secondary: String,
}

/// A whole stored sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSequence {
    pub beats: Vec<RawBeat>,
    #[serde(default)]
    pub start_position: Option<RawStartPosition>,
}

impl RawSequence {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn normalize_turns(raw: Option<&RawTurns>) -> Result<Turns> {
    match raw {
        None => Ok(Turns::default()),
        Some(RawTurns::Number(n)) if n.is_finite() && *n >= 0.0 => Ok(Turns::Value(*n)),
        Some(RawTurns::Number(n)) => Err(Error::InvalidTurns(n.to_string())),
        Some(RawTurns::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "fl" | "float" | "float-turn" => Ok(Turns::FloatTurn),
            other => other
                .parse::<f32>()
                .ok()
                .filter(|n| n.is_finite() && *n >= 0.0)
                .map(Turns::Value)
                .ok_or_else(|| Error::InvalidTurns(text.clone())),
        },
    }
}

/// Normalize one color's record
pub fn normalize_motion(raw: &RawMotion) -> Result<ColorMotion> {
    let motion = ColorMotion::new(
        raw.start_loc.parse()?,
        raw.end_loc.parse()?,
        raw.motion_type.parse::<MotionType>()?,
        raw.prop_rot_dir.parse::<RotationDirection>()?,
    );
    Ok(motion.with_turns(normalize_turns(raw.turns.as_ref())?))
}

/// Normalize one beat record
pub fn normalize_beat(raw: &RawBeat) -> Result<Beat> {
    Ok(Beat {
        beat_number: raw.beat,
        letter: raw.letter.clone(),
        primary: normalize_motion(&raw.primary)?,
        secondary: normalize_motion(&raw.secondary)?,
    })
}

/// Normalize a stored sequence.
///
/// Records are sorted by beat number; a record numbered 0 becomes the
/// start state. The remaining beats must be numbered `1..=N` exactly.
pub fn normalize_sequence(raw: &RawSequence) -> Result<Sequence> {
    let mut start = None;
    let mut beats = Vec::with_capacity(raw.beats.len());

    for record in &raw.beats {
        let beat = normalize_beat(record)?;
        if beat.beat_number == 0 {
            if start.is_some() {
                return Err(Error::DuplicateStart);
            }
            start = Some(beat);
        } else {
            beats.push(beat);
        }
    }

    if beats.is_empty() {
        return Err(Error::EmptySequence);
    }

    beats.sort_by_key(|b| b.beat_number);
    for (index, beat) in beats.iter().enumerate() {
        let expected = index as u32 + 1;
        if beat.beat_number != expected {
            return Err(Error::BeatNumbering {
                expected,
                got: beat.beat_number,
            });
        }
    }

    let start_position = match &raw.start_position {
        Some(pos) => Some(StartPosition {
            primary: pos.primary.parse::<GridLocation>()?,
            secondary: pos.secondary.parse::<GridLocation>()?,
        }),
        None => None,
    };

    Ok(Sequence {
        beats,
        start,
        start_position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "beats": [
            {"beat": 2, "letter": "B",
             "blue": {"start_loc": "e", "end_loc": "n", "motion_type": "pro", "prop_rot_dir": "cw", "turns": 1},
             "red":  {"start_loc": "w", "end_loc": "s", "motion_type": "anti", "prop_rot_dir": "ccw", "turns": "fl"}},
            {"beat": 0,
             "blue": {"start_loc": "n", "end_loc": "n", "motion_type": "static", "prop_rot_dir": "no_rot"},
             "red":  {"start_loc": "s", "end_loc": "s", "motion_type": "static", "prop_rot_dir": "no_rot"}},
            {"beat": 1, "letter": "A",
             "blue": {"start_loc": "n", "end_loc": "e", "motion_type": "pro", "prop_rot_dir": "cw", "turns": 0},
             "red":  {"start_loc": "s", "end_loc": "w", "motion_type": "anti", "prop_rot_dir": "ccw", "turns": 0.5}}
        ]
    }"#;

    #[test]
    fn test_normalize_sample() {
        let raw = RawSequence::from_json(SAMPLE).unwrap();
        let seq = normalize_sequence(&raw).unwrap();

        assert_eq!(seq.len(), 2);
        assert_eq!(seq.beats[0].beat_number, 1);
        assert_eq!(seq.beats[0].letter.as_deref(), Some("A"));
        assert_eq!(seq.beats[1].secondary.turns, Turns::FloatTurn);
        assert_eq!(seq.beats[1].primary.turns, Turns::Value(1.0));
        assert!(seq.start.is_some());
        assert!(seq.is_circular());
    }

    #[test]
    fn test_rejects_gap() {
        let mut raw = RawSequence::from_json(SAMPLE).unwrap();
        raw.beats.retain(|b| b.beat != 1);
        assert!(matches!(
            normalize_sequence(&raw),
            Err(Error::BeatNumbering { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn test_rejects_unknown_vocabulary() {
        let mut raw = RawSequence::from_json(SAMPLE).unwrap();
        raw.beats[0].primary.motion_type = "wobble".into();
        assert!(matches!(normalize_sequence(&raw), Err(Error::UnknownMotionType(_))));

        let mut raw = RawSequence::from_json(SAMPLE).unwrap();
        raw.beats[0].secondary.end_loc = "up".into();
        assert!(matches!(normalize_sequence(&raw), Err(Error::UnknownLocation(_))));
    }

    #[test]
    fn test_rejects_empty() {
        let raw = RawSequence {
            beats: Vec::new(),
            start_position: None,
        };
        assert!(matches!(normalize_sequence(&raw), Err(Error::EmptySequence)));
    }

    #[test]
    fn test_invalid_turns() {
        assert!(normalize_turns(Some(&RawTurns::Number(-1.0))).is_err());
        assert!(normalize_turns(Some(&RawTurns::Text("lots".into()))).is_err());
        assert_eq!(normalize_turns(Some(&RawTurns::Text("2".into()))).unwrap(), Turns::Value(2.0));
    }
}
