//! Grid Locations - the eight compass points and their symmetry tables
//!
//! Rotation and reflection are pure lookups. The tables are built once
//! and shared read-only by every caller.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::Error;

/// One of the eight compass points a hand can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridLocation {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl GridLocation {
    /// All locations, clockwise from north
    pub const ALL: [GridLocation; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N => "n",
            Self::NE => "ne",
            Self::E => "e",
            Self::SE => "se",
            Self::S => "s",
            Self::SW => "sw",
            Self::W => "w",
            Self::NW => "nw",
        }
    }

    pub fn rotated_90_cw(self) -> Self {
        LocationTransform::Rotate90Cw.apply(self)
    }

    pub fn rotated_90_ccw(self) -> Self {
        LocationTransform::Rotate90Ccw.apply(self)
    }

    pub fn rotated_180(self) -> Self {
        LocationTransform::Rotate180.apply(self)
    }

    pub fn mirrored(self) -> Self {
        LocationTransform::Mirror.apply(self)
    }

    pub fn flipped(self) -> Self {
        LocationTransform::Flip.apply(self)
    }
}

impl fmt::Display for GridLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Self::N),
            "ne" | "northeast" => Ok(Self::NE),
            "e" | "east" => Ok(Self::E),
            "se" | "southeast" => Ok(Self::SE),
            "s" | "south" => Ok(Self::S),
            "sw" | "southwest" => Ok(Self::SW),
            "w" | "west" => Ok(Self::W),
            "nw" | "northwest" => Ok(Self::NW),
            _ => Err(Error::UnknownLocation(s.to_string())),
        }
    }
}

/// A spatial symmetry of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationTransform {
    Rotate90Cw,
    Rotate90Ccw,
    Rotate180,
    /// Reflection across the vertical (north-south) axis
    Mirror,
    /// Reflection across the horizontal (east-west) axis
    Flip,
}

impl LocationTransform {
    pub const ALL: [LocationTransform; 5] = [
        Self::Rotate90Cw,
        Self::Rotate90Ccw,
        Self::Rotate180,
        Self::Mirror,
        Self::Flip,
    ];

    /// Map one location through this transform
    pub fn apply(&self, location: GridLocation) -> GridLocation {
        // Every table is total over GridLocation::ALL
        LOCATION_TABLES[self][&location]
    }

    /// The transform that undoes this one
    pub fn inverse(&self) -> Self {
        match self {
            Self::Rotate90Cw => Self::Rotate90Ccw,
            Self::Rotate90Ccw => Self::Rotate90Cw,
            other => *other,
        }
    }

    pub fn is_reflection(&self) -> bool {
        matches!(self, Self::Mirror | Self::Flip)
    }
}

type LocationTable = HashMap<GridLocation, GridLocation>;

fn table(pairs: &[(GridLocation, GridLocation)]) -> LocationTable {
    pairs.iter().copied().collect()
}

lazy_static! {
    static ref LOCATION_TABLES: HashMap<LocationTransform, LocationTable> = {
        use GridLocation::*;

        let mut tables = HashMap::new();
        tables.insert(
            LocationTransform::Rotate90Cw,
            table(&[(N, E), (NE, SE), (E, S), (SE, SW), (S, W), (SW, NW), (W, N), (NW, NE)]),
        );
        tables.insert(
            LocationTransform::Rotate90Ccw,
            table(&[(N, W), (NE, NW), (E, N), (SE, NE), (S, E), (SW, SE), (W, S), (NW, SW)]),
        );
        tables.insert(
            LocationTransform::Rotate180,
            table(&[(N, S), (NE, SW), (E, W), (SE, NW), (S, N), (SW, NE), (W, E), (NW, SE)]),
        );
        tables.insert(
            LocationTransform::Mirror,
            table(&[(N, N), (NE, NW), (E, W), (SE, SW), (S, S), (SW, SE), (W, E), (NW, NE)]),
        );
        tables.insert(
            LocationTransform::Flip,
            table(&[(N, S), (NE, SE), (E, E), (SE, NE), (S, N), (SW, NW), (W, W), (NW, SW)]),
        );
        tables
    };
}
