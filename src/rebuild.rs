//! Contour reassembly with fillets.
//!
//! For each segment the retained part (between the two fillets) is kept;
//! every rounded corner is replaced by a short cubic whose handles run
//! along the neighbouring tangents. Both masters emit the same sequence
//! of point kinds: a corner that is rounded in one master only gets a
//! zero-length fillet in the other. Pass-through corners keep their
//! original handles on both sides.

use kurbo::{CubicBez, Point, Vec2};

use crate::config::RoundingConfig;
use crate::contour::{Contour, ContourPoint, PointKind};
use crate::corner::{calculate_radius, SegmentRounding};
use crate::geom::{subdivide, unit_or};
use crate::master::Master;
use crate::policy::ContourPolicy;
use crate::segment::{split_contour, Segment};

/// Part of a segment that survives rounding, in one master.
#[derive(Debug, Clone, Copy)]
struct Retained {
    cubic: CubicBez,
    /// Unit direction of travel where the retained part begins.
    entry: Vec2,
    /// Unit direction of travel where the retained part ends.
    exit: Vec2,
}

impl Retained {
    fn new(segment: &Segment, rounding: &SegmentRounding, master: Master) -> Self {
        let geometry = segment.master(master);
        let r = rounding.at(master);
        let mut cubic = if r.is_untouched() {
            geometry.cubic()
        } else {
            subdivide(geometry.cubic(), r.t_start, r.t_end)
        };
        if r.start_fixed {
            cubic.p0 = geometry.p1;
            cubic.p1 = geometry.c1;
        }
        if r.end_fixed {
            cubic.p2 = geometry.c2;
            cubic.p3 = geometry.p2;
        }
        let form = geometry.coefficient_form();
        let chord = geometry.chord();
        Self {
            cubic,
            entry: unit_or(form.deriv(r.t_start), chord),
            exit: unit_or(form.deriv(r.t_end), chord),
        }
    }
}

/// Both masters' retained geometry of one segment.
struct Piece {
    segment: Segment,
    rounding: SegmentRounding,
    light: Retained,
    heavy: Retained,
}

impl Piece {
    fn at(&self, master: Master) -> &Retained {
        match master {
            Master::Light => &self.light,
            Master::Heavy => &self.heavy,
        }
    }
}

/// Round every corner of `contour`.
///
/// Contours that are too short, malformed, marked `skip`, or left without
/// a single fillet come back unchanged.
pub fn transform_contour(
    contour: &Contour,
    policy: &ContourPolicy,
    config: &RoundingConfig,
) -> Contour {
    rebuild(contour, policy, config).0
}

/// Like [`transform_contour`], also returning the number of fillets.
pub(crate) fn rebuild(
    contour: &Contour,
    policy: &ContourPolicy,
    config: &RoundingConfig,
) -> (Contour, usize) {
    if contour.len() < 2 || policy.skip {
        return (contour.clone(), 0);
    }
    let segments = split_contour(contour);
    if segments.is_empty() {
        return (contour.clone(), 0);
    }

    let n = segments.len();
    let pieces: Vec<Piece> = (0..n)
        .map(|j| {
            let prev = &segments[(j + n - 1) % n];
            let cur = &segments[j];
            let next = &segments[(j + 1) % n];
            let rounding = calculate_radius(prev, cur, next, policy, config);
            Piece {
                segment: *cur,
                rounding,
                light: Retained::new(cur, &rounding, Master::Light),
                heavy: Retained::new(cur, &rounding, Master::Heavy),
            }
        })
        .collect();

    let mut points: Vec<ContourPoint> = Vec::with_capacity(contour.len() * 2);
    let mut fillets = 0;
    for j in 0..n {
        let piece = &pieces[j];
        let next = &pieces[(j + 1) % n];

        points.push(ContourPoint::from_fn(PointKind::Corner, |m| piece.at(m).cubic.p0));
        if piece.segment.has_handles() {
            points.push(ContourPoint::from_fn(PointKind::Lead, |m| piece.at(m).cubic.p1));
            points.push(ContourPoint::from_fn(PointKind::Follow, |m| piece.at(m).cubic.p2));
        }

        let rounded = Master::BOTH
            .iter()
            .any(|&m| piece.rounding.at(m).t_end < 1.0 || next.rounding.at(m).t_start > 0.0);
        if !rounded {
            // The next piece starts exactly on the shared corner.
            continue;
        }

        fillets += 1;
        let ratio = config.fillet_handle_ratio;
        points.push(ContourPoint::from_fn(PointKind::Corner, |m| piece.at(m).cubic.p3));
        points.push(ContourPoint::from_fn(PointKind::Lead, |m| {
            let corner = piece.segment.master(m).p2;
            let from = piece.at(m);
            handle(from.cubic.p3, from.exit, ratio * corner.distance(from.cubic.p3))
        }));
        points.push(ContourPoint::from_fn(PointKind::Follow, |m| {
            let corner = next.segment.master(m).p1;
            let to = next.at(m);
            handle(to.cubic.p0, -to.entry, ratio * corner.distance(to.cubic.p0))
        }));
    }

    if fillets == 0 {
        tracing::debug!("Contour {} points: nothing to round", contour.len());
        return (contour.clone(), 0);
    }

    let rebuilt = Contour::new(points).into_normalized_start();
    tracing::debug!(
        "Contour {} points \u{2192} {} points, {} fillets",
        contour.len(),
        rebuilt.len(),
        fillets
    );
    (rebuilt, fillets)
}

fn handle(anchor: Point, direction: Vec2, length: f64) -> Point {
    anchor + direction * length
}
