//! Beat builders shared by the scenario tests

#![allow(dead_code)]

use cap_core::{Beat, ColorMotion, GridLocation, LocationTransform, MotionType, RotationDirection, Sequence};

pub fn pro(start: GridLocation, end: GridLocation, dir: RotationDirection) -> ColorMotion {
    ColorMotion::new(start, end, MotionType::Pro, dir)
}

pub fn beat(n: u32, primary: ColorMotion, secondary: ColorMotion) -> Beat {
    Beat::new(n, primary, secondary)
}

/// `source` moved by `transform`, optionally with colors traded and
/// rotation directions reversed
pub fn transformed(source: &Beat, n: u32, transform: LocationTransform, swap: bool, reverse: bool) -> Beat {
    let apply = |m: &ColorMotion| ColorMotion {
        start_location: transform.apply(m.start_location),
        end_location: transform.apply(m.end_location),
        rotation_direction: if reverse {
            m.rotation_direction.reversed()
        } else {
            m.rotation_direction
        },
        ..*m
    };
    let (primary, secondary) = (apply(&source.primary), apply(&source.secondary));
    if swap {
        beat(n, secondary, primary)
    } else {
        beat(n, primary, secondary)
    }
}

pub fn rotated_cw(source: &Beat, n: u32) -> Beat {
    transformed(source, n, LocationTransform::Rotate90Cw, false, false)
}

pub fn rotated_cw_swapped(source: &Beat, n: u32) -> Beat {
    transformed(source, n, LocationTransform::Rotate90Cw, true, false)
}

pub fn renumbered(source: &Beat, n: u32) -> Beat {
    Beat {
        beat_number: n,
        ..source.clone()
    }
}

/// Sequence whose declared start is where the last beat ends
pub fn closed(beats: Vec<Beat>) -> Sequence {
    let home = beats.last().map(Beat::end_position);
    let sequence = Sequence::new(beats);
    match home {
        Some(home) => sequence.with_start_position(home),
        None => sequence,
    }
}
