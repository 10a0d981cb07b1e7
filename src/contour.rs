//! Two-master contours in cubic-only encoding.
//!
//! A contour is a cyclic sequence of on-curve `Corner` points with
//! optional `Lead` → `Follow` control-point pairs between them.

use kurbo::Point;

use crate::error::RoundError;
use crate::master::{Master, TwoMasterValue};

/// Role of a point in the cubic encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
    /// On-curve point.
    Corner,
    /// First off-curve control point of a cubic.
    Lead,
    /// Second off-curve control point of a cubic.
    Follow,
}

impl PointKind {
    pub fn is_on_curve(self) -> bool {
        self == PointKind::Corner
    }
}

/// A point whose coordinates are defined in both masters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourPoint {
    pub x: TwoMasterValue,
    pub y: TwoMasterValue,
    pub kind: PointKind,
}

impl ContourPoint {
    pub fn new(x: TwoMasterValue, y: TwoMasterValue, kind: PointKind) -> Self {
        Self { x, y, kind }
    }

    /// Combine a light and a heavy position into one point.
    pub fn from_masters(light: Point, heavy: Point, kind: PointKind) -> Self {
        Self {
            x: TwoMasterValue::make(light.x, heavy.x),
            y: TwoMasterValue::make(light.y, heavy.y),
            kind,
        }
    }

    /// Build a point by computing its position once per master.
    pub fn from_fn(kind: PointKind, mut f: impl FnMut(Master) -> Point) -> Self {
        let light = f(Master::Light);
        let heavy = f(Master::Heavy);
        Self::from_masters(light, heavy, kind)
    }

    /// Position of this point in one master.
    pub fn at(&self, master: Master) -> Point {
        Point::new(self.x.at(master), self.y.at(master))
    }

    /// True when both points sit at the same position in both masters.
    pub fn coincides_with(&self, other: &ContourPoint) -> bool {
        Master::BOTH
            .iter()
            .all(|&m| self.at(m) == other.at(m))
    }
}

/// A closed outline owned by a glyph record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<ContourPoint>,
}

impl Contour {
    pub fn new(points: Vec<ContourPoint>) -> Self {
        Self { points }
    }

    /// Pair a light and a heavy point list into one contour.
    ///
    /// Both lists must have the same length and the same kind at every
    /// index.
    pub fn from_masters(
        light: &[(Point, PointKind)],
        heavy: &[(Point, PointKind)],
    ) -> Result<Self, RoundError> {
        if light.len() != heavy.len() {
            return Err(RoundError::MasterMismatch(format!(
                "light has {} points, heavy has {}",
                light.len(),
                heavy.len()
            )));
        }
        let points = light
            .iter()
            .zip(heavy)
            .enumerate()
            .map(|(i, (&(lp, lk), &(hp, hk)))| {
                if lk != hk {
                    return Err(RoundError::MasterMismatch(format!(
                        "point {} is {:?} in light but {:?} in heavy",
                        i, lk, hk
                    )));
                }
                Ok(ContourPoint::from_masters(lp, hp, lk))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sequence of point kinds; identical in both masters by construction.
    pub fn kinds(&self) -> Vec<PointKind> {
        self.points.iter().map(|p| p.kind).collect()
    }

    /// The contour as seen in a single master.
    pub fn project(&self, master: Master) -> Vec<(Point, PointKind)> {
        self.points.iter().map(|p| (p.at(master), p.kind)).collect()
    }

    pub fn corner_count(&self) -> usize {
        self.points.iter().filter(|p| p.kind.is_on_curve()).count()
    }

    /// Whether the last point repeats the first (an explicit close).
    pub fn is_implicitly_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 2 => {
                first.kind.is_on_curve()
                    && last.kind.is_on_curve()
                    && first.coincides_with(last)
            }
            _ => false,
        }
    }

    /// A copy of this contour rotated so that it starts on a `Corner`.
    ///
    /// Contours without any on-curve point are returned as they are.
    pub fn normalized_start(&self) -> Contour {
        self.clone().into_normalized_start()
    }

    /// Owned variant of [`Contour::normalized_start`].
    pub fn into_normalized_start(mut self) -> Contour {
        if let Some(start) = self.points.iter().position(|p| p.kind.is_on_curve()) {
            self.points.rotate_left(start);
        }
        self
    }

    /// Check the Lead → Follow → Corner ordering of the cubic encoding.
    pub fn validate(&self) -> Result<(), RoundError> {
        let n = self.points.len();
        if n == 0 {
            return Err(RoundError::InvalidContour("empty contour".into()));
        }
        if self.corner_count() == 0 {
            return Err(RoundError::InvalidContour(
                "contour has no on-curve point".into(),
            ));
        }
        for i in 0..n {
            let kind = self.points[i].kind;
            let next = self.points[(i + 1) % n].kind;
            let ok = match kind {
                PointKind::Lead => next == PointKind::Follow,
                PointKind::Follow => next == PointKind::Corner,
                PointKind::Corner => true,
            };
            if !ok {
                return Err(RoundError::InvalidContour(format!(
                    "{:?} at index {} followed by {:?}",
                    kind, i, next
                )));
            }
        }
        Ok(())
    }
}
