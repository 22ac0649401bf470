//! Motion primitives - what one color does during one beat

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, GridLocation};

/// The two independently moving agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Blue hand
    Primary,
    /// Red hand
    Secondary,
}

impl Color {
    pub const BOTH: [Color; 2] = [Self::Primary, Self::Secondary];

    pub fn opposite(&self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

/// Motion type of a hand during a beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionType {
    Pro,
    Anti,
    Float,
    Dash,
    Static,
}

impl MotionType {
    /// Pro and anti are each other's inversion
    pub fn inverted(&self) -> Option<Self> {
        match self {
            Self::Pro => Some(Self::Anti),
            Self::Anti => Some(Self::Pro),
            _ => None,
        }
    }

    /// Identical, or a provable pro/anti inversion
    pub fn is_compatible_with(&self, other: MotionType) -> bool {
        *self == other || self.inverted() == Some(other)
    }
}

impl FromStr for MotionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pro" => Ok(Self::Pro),
            "anti" => Ok(Self::Anti),
            "float" | "fl" => Ok(Self::Float),
            "dash" => Ok(Self::Dash),
            "static" => Ok(Self::Static),
            _ => Err(Error::UnknownMotionType(s.to_string())),
        }
    }
}

/// Prop rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationDirection {
    Cw,
    Ccw,
    None,
}

impl RotationDirection {
    pub fn reversed(&self) -> Self {
        match self {
            Self::Cw => Self::Ccw,
            Self::Ccw => Self::Cw,
            Self::None => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cw => "cw",
            Self::Ccw => "ccw",
            Self::None => "none",
        }
    }
}

impl fmt::Display for RotationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RotationDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cw" | "clockwise" => Ok(Self::Cw),
            "ccw" | "counter_clockwise" | "counterclockwise" => Ok(Self::Ccw),
            "" | "none" | "no_rot" | "norot" => Ok(Self::None),
            _ => Err(Error::UnknownRotationDirection(s.to_string())),
        }
    }
}

/// Number of prop turns, or a float turn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Turns {
    Value(f32),
    FloatTurn,
}

impl Default for Turns {
    fn default() -> Self {
        Self::Value(0.0)
    }
}

/// One color's motion during a beat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorMotion {
    pub start_location: GridLocation,
    pub end_location: GridLocation,
    pub motion_type: MotionType,
    pub rotation_direction: RotationDirection,
    #[serde(default)]
    pub turns: Turns,
}

impl ColorMotion {
    pub fn new(
        start_location: GridLocation,
        end_location: GridLocation,
        motion_type: MotionType,
        rotation_direction: RotationDirection,
    ) -> Self {
        Self {
            start_location,
            end_location,
            motion_type,
            rotation_direction,
            turns: Turns::default(),
        }
    }

    pub fn with_turns(mut self, turns: Turns) -> Self {
        self.turns = turns;
        self
    }

    /// No rotation evidence: the direction cannot tell a reflection apart
    /// from an inverted reflection.
    pub fn is_reflection_undeterminable(&self) -> bool {
        self.rotation_direction == RotationDirection::None || self.motion_type == MotionType::Static
    }
}
