//! Transformation Labels - the closed vocabulary of beat-pair relations
//!
//! The legacy string form (`rotated_90_cw_swapped_inverted`, ...) is only
//! produced by `Display` and consumed by `FromStr`; inside the engine
//! labels are always this enum.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::format::Component;
use crate::Error;

/// Sense of a quarter turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Cw,
    Ccw,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cw => "cw",
            Self::Ccw => "ccw",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rotation {
    Cw90,
    Ccw90,
    Half,
}

impl Rotation {
    pub const ALL: [Rotation; 3] = [Self::Cw90, Self::Ccw90, Self::Half];

    fn token(&self) -> &'static str {
        match self {
            Self::Cw90 => "90_cw",
            Self::Ccw90 => "90_ccw",
            Self::Half => "180",
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Cw90 => Some(Direction::Cw),
            Self::Ccw90 => Some(Direction::Ccw),
            Self::Half => None,
        }
    }
}

/// Swap/invert modifier on a spatial transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    None,
    Swapped,
    Inverted,
    SwappedInverted,
}

impl Modifier {
    pub const ALL: [Modifier; 4] = [Self::None, Self::Swapped, Self::Inverted, Self::SwappedInverted];

    pub fn new(swapped: bool, inverted: bool) -> Self {
        match (swapped, inverted) {
            (false, false) => Self::None,
            (true, false) => Self::Swapped,
            (false, true) => Self::Inverted,
            (true, true) => Self::SwappedInverted,
        }
    }

    pub fn is_swapped(&self) -> bool {
        matches!(self, Self::Swapped | Self::SwappedInverted)
    }

    pub fn is_inverted(&self) -> bool {
        matches!(self, Self::Inverted | Self::SwappedInverted)
    }

    fn suffix(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Swapped => "_swapped",
            Self::Inverted => "_inverted",
            Self::SwappedInverted => "_swapped_inverted",
        }
    }
}

/// A relation satisfied between two beats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TransformationLabel {
    Rotated(Rotation, Modifier),
    /// Reflection across the vertical axis
    Mirrored(Modifier),
    /// Reflection across the horizontal axis
    Flipped(Modifier),
    /// Colors trade places, no spatial change
    Swapped { inverted: bool },
    /// Same locations, rotation reversed
    Inverted,
    Repeated,
}

impl TransformationLabel {
    /// Every label in the vocabulary
    pub fn all() -> Vec<TransformationLabel> {
        let mut labels = Vec::with_capacity(24);
        for rotation in Rotation::ALL {
            for modifier in Modifier::ALL {
                labels.push(Self::Rotated(rotation, modifier));
            }
        }
        for modifier in Modifier::ALL {
            labels.push(Self::Mirrored(modifier));
        }
        for modifier in Modifier::ALL {
            labels.push(Self::Flipped(modifier));
        }
        labels.push(Self::Swapped { inverted: false });
        labels.push(Self::Swapped { inverted: true });
        labels.push(Self::Inverted);
        labels.push(Self::Repeated);
        labels
    }

    pub fn modifier(&self) -> Modifier {
        match self {
            Self::Rotated(_, m) | Self::Mirrored(m) | Self::Flipped(m) => *m,
            Self::Swapped { inverted } => Modifier::new(true, *inverted),
            Self::Inverted => Modifier::Inverted,
            Self::Repeated => Modifier::None,
        }
    }

    /// Same family, modifiers stripped
    pub fn base(&self) -> TransformationLabel {
        match self {
            Self::Rotated(r, _) => Self::Rotated(*r, Modifier::None),
            Self::Mirrored(_) => Self::Mirrored(Modifier::None),
            Self::Flipped(_) => Self::Flipped(Modifier::None),
            Self::Swapped { .. } => Self::Swapped { inverted: false },
            Self::Inverted => Self::Inverted,
            Self::Repeated => Self::Repeated,
        }
    }

    pub fn is_swapped(&self) -> bool {
        self.modifier().is_swapped()
    }

    pub fn is_inverted(&self) -> bool {
        self.modifier().is_inverted()
    }

    pub fn is_quarter_rotation(&self) -> bool {
        matches!(self, Self::Rotated(Rotation::Cw90 | Rotation::Ccw90, _))
    }

    /// Pure color swap (`swapped` / `swapped_inverted`)
    pub fn is_color_swap(&self) -> bool {
        matches!(self, Self::Swapped { .. })
    }

    /// Mirror, flip, and their composition (half turn)
    pub fn is_reflection_family(&self) -> bool {
        matches!(self, Self::Mirrored(_) | Self::Flipped(_) | Self::Rotated(Rotation::Half, _))
    }

    pub fn rotation_direction(&self) -> Option<Direction> {
        match self {
            Self::Rotated(r, _) => r.direction(),
            _ => None,
        }
    }

    /// Atomic components this label asserts
    pub fn components(&self) -> BTreeSet<Component> {
        let mut components = BTreeSet::new();
        match self {
            Self::Rotated(..) => {
                components.insert(Component::Rotated);
            }
            Self::Mirrored(_) => {
                components.insert(Component::Mirrored);
            }
            Self::Flipped(_) => {
                components.insert(Component::Flipped);
            }
            Self::Swapped { .. } | Self::Inverted => {}
            Self::Repeated => {
                components.insert(Component::Repeated);
            }
        }
        let modifier = self.modifier();
        if modifier.is_swapped() {
            components.insert(Component::Swapped);
        }
        if modifier.is_inverted() {
            components.insert(Component::Inverted);
        }
        components
    }
}

impl fmt::Display for TransformationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rotated(r, m) => write!(f, "rotated_{}{}", r.token(), m.suffix()),
            Self::Mirrored(m) => write!(f, "mirrored{}", m.suffix()),
            Self::Flipped(m) => write!(f, "flipped{}", m.suffix()),
            Self::Swapped { inverted: false } => f.write_str("swapped"),
            Self::Swapped { inverted: true } => f.write_str("swapped_inverted"),
            Self::Inverted => f.write_str("inverted"),
            Self::Repeated => f.write_str("repeated"),
        }
    }
}

impl FromStr for TransformationLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|label| label.to_string() == wanted)
            .ok_or_else(|| Error::UnknownLabel(s.to_string()))
    }
}

impl From<TransformationLabel> for String {
    fn from(label: TransformationLabel) -> Self {
        label.to_string()
    }
}

impl TryFrom<String> for TransformationLabel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
