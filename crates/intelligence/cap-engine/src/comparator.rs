//! Pairwise Transformation Comparator
//!
//! Reports every label a pair of beats satisfies. Checks are independent;
//! disambiguation is left to the sequence-wide aggregator.
//!
//! ```text
//!   beat A ──┬── rotation  90 cw / 90 ccw / 180   (same color | swapped)
//!            ├── reflection mirror / flip          (same color | swapped)
//!            ├── pure swap / pure inversion
//!            └── identity (repeated)
//!                     │
//!                     ▼
//!   direction evidence decides the `_inverted` suffix
//! ```

use cap_core::{Beat, Color, ColorMotion, GridLocation, LocationTransform};

use crate::label::{Modifier, Rotation, TransformationLabel};

/// What the prop rotation directions say about a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionEvidence {
    /// Directions agree
    Same,
    /// Directions reversed
    Opposite,
    /// Neither side carries rotation evidence
    Ambiguous,
}

/// Which `_inverted` variants a check yields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inversion {
    Plain,
    Inverted,
    Both,
}

impl Inversion {
    /// Inverted flags to emit; `Both` yields two labels
    pub fn variants(self) -> &'static [bool] {
        match self {
            Self::Plain => &[false],
            Self::Inverted => &[true],
            Self::Both => &[false, true],
        }
    }
}

/// Compare the rotation directions of two motions
fn color_evidence(a: &ColorMotion, b: &ColorMotion) -> Option<DirectionEvidence> {
    match (a.is_reflection_undeterminable(), b.is_reflection_undeterminable()) {
        (true, true) => Some(DirectionEvidence::Ambiguous),
        (false, false) if a.rotation_direction == b.rotation_direction => Some(DirectionEvidence::Same),
        (false, false) => Some(DirectionEvidence::Opposite),
        // One side rotates, the other cannot: no consistent reading
        _ => None,
    }
}

/// Combine evidence from both colors. `swapped` compares each color of A
/// with the opposite color of B.
pub fn direction_evidence(a: &Beat, b: &Beat, swapped: bool) -> Option<DirectionEvidence> {
    let mut verdict = DirectionEvidence::Ambiguous;
    for color in Color::BOTH {
        let target = if swapped { color.opposite() } else { color };
        match color_evidence(a.motion(color), b.motion(target))? {
            DirectionEvidence::Ambiguous => {}
            evidence if verdict == DirectionEvidence::Ambiguous => verdict = evidence,
            evidence if evidence != verdict => return None,
            _ => {}
        }
    }
    Some(verdict)
}

/// Comparator options
#[derive(Debug, Clone, Copy)]
pub struct Comparator {
    /// Emit both variants when rotation evidence is missing
    pub report_ambiguous_inversions: bool,
}

impl Default for Comparator {
    fn default() -> Self {
        Self {
            report_ambiguous_inversions: true,
        }
    }
}

impl Comparator {
    pub fn new(report_ambiguous_inversions: bool) -> Self {
        Self {
            report_ambiguous_inversions,
        }
    }

    /// Rotations keep their direction; reflections reverse it
    fn inversion(&self, evidence: DirectionEvidence, reverses_direction: bool) -> Inversion {
        match (evidence, reverses_direction) {
            (DirectionEvidence::Ambiguous, _) if self.report_ambiguous_inversions => Inversion::Both,
            (DirectionEvidence::Ambiguous, _) => Inversion::Plain,
            (DirectionEvidence::Same, false) | (DirectionEvidence::Opposite, true) => Inversion::Plain,
            (DirectionEvidence::Opposite, false) | (DirectionEvidence::Same, true) => Inversion::Inverted,
        }
    }

    /// Every label satisfied by the pair (A, B), most specific first
    pub fn compare(&self, a: &Beat, b: &Beat) -> Vec<TransformationLabel> {
        let mut labels = Vec::new();

        if is_repeated(a, b) {
            labels.push(TransformationLabel::Repeated);
        }

        for rotation in Rotation::ALL {
            let transform = match rotation {
                Rotation::Cw90 => LocationTransform::Rotate90Cw,
                Rotation::Ccw90 => LocationTransform::Rotate90Ccw,
                Rotation::Half => LocationTransform::Rotate180,
            };
            for swapped in [false, true] {
                if let Some(inversion) = self.spatial_match(a, b, Some(transform), swapped, false) {
                    for &inverted in inversion.variants() {
                        labels.push(TransformationLabel::Rotated(rotation, Modifier::new(swapped, inverted)));
                    }
                }
            }
        }

        for transform in LocationTransform::ALL.into_iter().filter(LocationTransform::is_reflection) {
            for swapped in [false, true] {
                if let Some(inversion) = self.spatial_match(a, b, Some(transform), swapped, true) {
                    for &inverted in inversion.variants() {
                        let modifier = Modifier::new(swapped, inverted);
                        labels.push(match transform {
                            LocationTransform::Mirror => TransformationLabel::Mirrored(modifier),
                            _ => TransformationLabel::Flipped(modifier),
                        });
                    }
                }
            }
        }

        if let Some(inversion) = self.spatial_match(a, b, None, true, false) {
            for &inverted in inversion.variants() {
                labels.push(TransformationLabel::Swapped { inverted });
            }
        }

        if is_inverted(a, b) {
            labels.push(TransformationLabel::Inverted);
        }

        tracing::trace!(
            key = a.beat_number,
            corresponding = b.beat_number,
            labels = ?labels,
            "compared beat pair"
        );
        labels
    }

    /// Locations of B are `transform` of A's (identity when `None`).
    fn spatial_match(
        &self,
        a: &Beat,
        b: &Beat,
        transform: Option<LocationTransform>,
        swapped: bool,
        reverses_direction: bool,
    ) -> Option<Inversion> {
        for color in Color::BOTH {
            let target = if swapped { color.opposite() } else { color };
            let from = a.motion(color);
            let to = b.motion(target);
            if !locations_map(from, to, transform) {
                return None;
            }
            if swapped && !from.motion_type.is_compatible_with(to.motion_type) {
                return None;
            }
        }
        let evidence = direction_evidence(a, b, swapped)?;
        Some(self.inversion(evidence, reverses_direction))
    }
}

fn locations_map(from: &ColorMotion, to: &ColorMotion, transform: Option<LocationTransform>) -> bool {
    let map = |loc: GridLocation| transform.map_or(loc, |t| t.apply(loc));
    map(from.start_location) == to.start_location && map(from.end_location) == to.end_location
}

/// All location, type and rotation fields identical
fn is_repeated(a: &Beat, b: &Beat) -> bool {
    Color::BOTH.iter().all(|&color| {
        let (x, y) = (a.motion(color), b.motion(color));
        x.start_location == y.start_location
            && x.end_location == y.end_location
            && x.motion_type == y.motion_type
            && x.rotation_direction == y.rotation_direction
    })
}

/// Same locations per color, rotation or pro/anti reversed
fn is_inverted(a: &Beat, b: &Beat) -> bool {
    let mut any_type_inverted = false;
    for color in Color::BOTH {
        let (x, y) = (a.motion(color), b.motion(color));
        if !locations_map(x, y, None) || !x.motion_type.is_compatible_with(y.motion_type) {
            return false;
        }
        any_type_inverted |= x.motion_type.inverted() == Some(y.motion_type);
    }
    any_type_inverted || direction_evidence(a, b, false) == Some(DirectionEvidence::Opposite)
}

/// Compare with default options
pub fn compare_beats(a: &Beat, b: &Beat) -> Vec<TransformationLabel> {
    Comparator::default().compare(a, b)
}
