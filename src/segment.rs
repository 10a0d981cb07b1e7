//! Contour → segment decomposition.
//!
//! A segment spans two consecutive on-curve points and carries its
//! geometry in both masters, plus the departure/arrival tangents used
//! to measure corner angles.

use kurbo::{CubicBez, Point, Vec2};

use crate::contour::{Contour, ContourPoint, PointKind};
use crate::geom::CoefficientForm;
use crate::master::Master;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Line,
    Curve,
}

/// Geometry of a segment in one master.
///
/// Lines keep their control points at the thirds so that they can be
/// treated as cubics by the curve math. A collapsed curve keeps its real
/// handles but carries line tangents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterSegment {
    pub p1: Point,
    pub c1: Point,
    pub c2: Point,
    pub p2: Point,
    /// Departure tangent.
    pub t1: Vec2,
    /// Arrival tangent.
    pub t2: Vec2,
}

impl MasterSegment {
    pub fn line(p1: Point, p2: Point) -> Self {
        let third = (p2 - p1) / 3.0;
        Self {
            p1,
            c1: p1 + third,
            c2: p2 - third,
            p2,
            t1: third,
            t2: third,
        }
    }

    pub fn curve(p1: Point, c1: Point, c2: Point, p2: Point) -> Self {
        Self {
            p1,
            c1,
            c2,
            p2,
            t1: c1 - p1,
            t2: p2 - c2,
        }
    }

    /// A curve with a retracted handle: original shape, line tangents.
    pub fn collapsed(p1: Point, c1: Point, c2: Point, p2: Point) -> Self {
        let third = (p2 - p1) / 3.0;
        Self {
            p1,
            c1,
            c2,
            p2,
            t1: third,
            t2: third,
        }
    }

    pub fn cubic(&self) -> CubicBez {
        CubicBez::new(self.p1, self.c1, self.c2, self.p2)
    }

    pub fn coefficient_form(&self) -> CoefficientForm {
        CoefficientForm::from_cubic(self.cubic())
    }

    /// Straight direction from start to end.
    pub fn chord(&self) -> Vec2 {
        self.p2 - self.p1
    }
}

/// One line or cubic of a contour, in both masters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub light: MasterSegment,
    pub heavy: MasterSegment,
    /// A curve treated as a line for corner angles because one of its
    /// handles is retracted. Its Lead/Follow points are still emitted.
    pub collapsed: bool,
    /// Ordinal, among the contour's on-curve points, of the corner this
    /// segment departs from.
    pub start_corner: usize,
}

impl Segment {
    pub fn master(&self, master: Master) -> &MasterSegment {
        match master {
            Master::Light => &self.light,
            Master::Heavy => &self.heavy,
        }
    }

    pub fn is_curve(&self) -> bool {
        self.kind == SegmentKind::Curve
    }

    /// Whether the segment is written out with Lead/Follow points.
    pub fn has_handles(&self) -> bool {
        self.is_curve() || self.collapsed
    }

    fn line(from: &ContourPoint, to: &ContourPoint, start_corner: usize) -> Self {
        let build = |m| MasterSegment::line(from.at(m), to.at(m));
        Self {
            kind: SegmentKind::Line,
            light: build(Master::Light),
            heavy: build(Master::Heavy),
            collapsed: false,
            start_corner,
        }
    }

    fn collapsed(
        from: &ContourPoint,
        lead: &ContourPoint,
        follow: &ContourPoint,
        to: &ContourPoint,
        start_corner: usize,
    ) -> Self {
        let build = |m| MasterSegment::collapsed(from.at(m), lead.at(m), follow.at(m), to.at(m));
        Self {
            kind: SegmentKind::Line,
            light: build(Master::Light),
            heavy: build(Master::Heavy),
            collapsed: true,
            start_corner,
        }
    }

    fn curve(
        from: &ContourPoint,
        lead: &ContourPoint,
        follow: &ContourPoint,
        to: &ContourPoint,
        start_corner: usize,
    ) -> Self {
        let build = |m| MasterSegment::curve(from.at(m), lead.at(m), follow.at(m), to.at(m));
        Self {
            kind: SegmentKind::Curve,
            light: build(Master::Light),
            heavy: build(Master::Heavy),
            collapsed: false,
            start_corner,
        }
    }
}

/// Split a contour into its cyclic list of segments.
///
/// Lines whose ends coincide in both masters are dropped. A curve whose
/// first handle sits on its start point, or whose second handle sits on
/// its end point, in either master is treated as a line in both; it keeps
/// its handles unless all four of its points coincide.
/// Returns an empty list for contours that are too short or do not
/// follow the cubic encoding.
pub fn split_contour(contour: &Contour) -> Vec<Segment> {
    if contour.len() < 2 {
        return Vec::new();
    }
    let contour = contour.normalized_start();
    let closed = contour.is_implicitly_closed();
    let mut points = contour.points;
    if !closed {
        points.push(points[0]);
    }

    let mut segments = Vec::new();
    let mut ordinal = 0;
    let mut i = 0;
    while i + 1 < points.len() {
        let from = &points[i];
        match points[i + 1].kind {
            PointKind::Corner => {
                let to = &points[i + 1];
                if !from.coincides_with(to) {
                    segments.push(Segment::line(from, to, ordinal));
                }
                i += 1;
            }
            PointKind::Lead => {
                let (Some(lead), Some(follow), Some(to)) =
                    (points.get(i + 1), points.get(i + 2), points.get(i + 3))
                else {
                    tracing::debug!("contour ends inside a curve; not rounding");
                    return Vec::new();
                };
                if follow.kind != PointKind::Follow || to.kind != PointKind::Corner {
                    tracing::debug!("malformed curve at point {}; not rounding", i);
                    return Vec::new();
                }
                let collapsed = Master::BOTH
                    .iter()
                    .any(|&m| lead.at(m) == from.at(m) || follow.at(m) == to.at(m));
                let vanished =
                    from.coincides_with(lead) && from.coincides_with(follow) && from.coincides_with(to);
                if !collapsed {
                    segments.push(Segment::curve(from, lead, follow, to, ordinal));
                } else if !vanished {
                    segments.push(Segment::collapsed(from, lead, follow, to, ordinal));
                }
                i += 3;
            }
            PointKind::Follow => {
                tracing::debug!("Follow without Lead at point {}; not rounding", i + 1);
                return Vec::new();
            }
        }
        ordinal += 1;
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64, kind: PointKind) -> ContourPoint {
        ContourPoint::from_masters(Point::new(x, y), Point::new(x + 5.0, y), kind)
    }

    #[test]
    fn square_gives_four_lines() {
        let contour = Contour::new(vec![
            pt(0.0, 0.0, PointKind::Corner),
            pt(100.0, 0.0, PointKind::Corner),
            pt(100.0, 100.0, PointKind::Corner),
            pt(0.0, 100.0, PointKind::Corner),
        ]);
        let segments = split_contour(&contour);
        assert_eq!(segments.len(), 4);
        assert!(segments.iter().all(|s| s.kind == SegmentKind::Line));
        assert_eq!(segments[3].light.p2, Point::new(0.0, 0.0));
        assert_eq!(segments[0].light.t1, Vec2::new(100.0 / 3.0, 0.0));
        let ordinals: Vec<usize> = segments.iter().map(|s| s.start_corner).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
    }

    #[test]
    fn explicit_close_is_not_doubled() {
        let contour = Contour::new(vec![
            pt(0.0, 0.0, PointKind::Corner),
            pt(100.0, 0.0, PointKind::Corner),
            pt(100.0, 100.0, PointKind::Corner),
            pt(0.0, 0.0, PointKind::Corner),
        ]);
        assert_eq!(split_contour(&contour).len(), 3);
    }

    #[test]
    fn coincident_corners_are_dropped() {
        let contour = Contour::new(vec![
            pt(0.0, 0.0, PointKind::Corner),
            pt(100.0, 0.0, PointKind::Corner),
            pt(100.0, 0.0, PointKind::Corner),
            pt(100.0, 100.0, PointKind::Corner),
        ]);
        let segments = split_contour(&contour);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].start_corner, 2);
    }

    #[test]
    fn curve_tangents_follow_handles() {
        let contour = Contour::new(vec![
            pt(0.0, 0.0, PointKind::Corner),
            pt(0.0, 50.0, PointKind::Lead),
            pt(50.0, 100.0, PointKind::Follow),
            pt(100.0, 100.0, PointKind::Corner),
        ]);
        let segments = split_contour(&contour);
        assert_eq!(segments.len(), 2);
        assert!(segments[0].is_curve());
        assert_eq!(segments[0].light.t1, Vec2::new(0.0, 50.0));
        assert_eq!(segments[0].light.t2, Vec2::new(50.0, 0.0));
        assert_eq!(segments[1].kind, SegmentKind::Line);
    }

    #[test]
    fn retracted_handle_in_one_master_downgrades_both() {
        let contour = Contour::new(vec![
            ContourPoint::from_masters(Point::new(0.0, 0.0), Point::new(0.0, 0.0), PointKind::Corner),
            // Lead sits on the start point in the heavy master only.
            ContourPoint::from_masters(Point::new(0.0, 40.0), Point::new(0.0, 0.0), PointKind::Lead),
            ContourPoint::from_masters(Point::new(60.0, 100.0), Point::new(60.0, 100.0), PointKind::Follow),
            ContourPoint::from_masters(Point::new(100.0, 100.0), Point::new(100.0, 100.0), PointKind::Corner),
        ]);
        let segments = split_contour(&contour);
        assert_eq!(segments[0].kind, SegmentKind::Line);
        assert!(segments[0].collapsed && segments[0].has_handles());
        // Tangents are the line's, the handles are the curve's.
        assert_eq!(segments[0].heavy.t1, Vec2::new(100.0 / 3.0, 100.0 / 3.0));
        assert_eq!(segments[0].light.c1, Point::new(0.0, 40.0));
    }

    #[test]
    fn short_contours_have_no_segments() {
        let contour = Contour::new(vec![pt(0.0, 0.0, PointKind::Corner)]);
        assert!(split_contour(&contour).is_empty());
    }
}
