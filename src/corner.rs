//! Corner radius estimation.
//!
//! Each segment owns the two corners at its ends. For every master the
//! radius at a corner follows from the signed turning angle there, and
//! the radius in turn fixes how far along the segment the fillet starts.

use kurbo::Vec2;

use crate::config::RoundingConfig;
use crate::geom::{find_distance_from_begin, find_distance_from_end, turning_angle};
use crate::master::Master;
use crate::policy::ContourPolicy;
use crate::segment::Segment;

/// Rounding of one segment in one master.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerRadii {
    /// Radius at the corner the segment departs from.
    pub start_radius: f64,
    /// Radius at the corner the segment arrives at.
    pub end_radius: f64,
    /// Parameter where the retained part of the segment begins.
    pub t_start: f64,
    /// Parameter where the retained part of the segment ends.
    pub t_end: f64,
    /// The departure corner is pass-through; its handle stays put.
    pub start_fixed: bool,
    /// The arrival corner is pass-through; its handle stays put.
    pub end_fixed: bool,
}

impl CornerRadii {
    /// Whether the whole segment survives unchanged.
    pub fn is_untouched(&self) -> bool {
        self.t_start == 0.0 && self.t_end == 1.0
    }
}

/// Rounding of one segment in both masters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRounding {
    pub light: CornerRadii,
    pub heavy: CornerRadii,
}

impl SegmentRounding {
    pub fn at(&self, master: Master) -> &CornerRadii {
        match master {
            Master::Light => &self.light,
            Master::Heavy => &self.heavy,
        }
    }
}

/// Radius for a corner turning from `incoming` to `outgoing`.
///
/// Near-straight joins get 0. Concave corners get the inner radius;
/// convex ones scale the base radius by `1 - cos(angle)` and never drop
/// below the inner radius.
pub fn corner_radius(
    incoming: Vec2,
    outgoing: Vec2,
    master: Master,
    policy: &ContourPolicy,
    config: &RoundingConfig,
) -> f64 {
    let angle = turning_angle(incoming, outgoing);
    if angle.abs() <= config.straight_threshold {
        return 0.0;
    }
    let inner = policy.inner_radius(master);
    if angle < 0.0 {
        inner
    } else {
        (policy.base_radius(master) * (1.0 - angle.cos())).max(inner)
    }
}

/// Radii and retained parameter range of `cur`, given its neighbours.
///
/// When the two fillets would overlap on `cur` they are pulled back so
/// that they meet at a single parameter.
pub fn calculate_radius(
    prev: &Segment,
    cur: &Segment,
    next: &Segment,
    policy: &ContourPolicy,
    config: &RoundingConfig,
) -> SegmentRounding {
    let start_fixed = policy.is_pass_through(cur.start_corner);
    let end_fixed = policy.is_pass_through(next.start_corner);

    let per_master = |master: Master| {
        let geometry = cur.master(master);
        let start_radius = if start_fixed {
            0.0
        } else {
            corner_radius(prev.master(master).t2, geometry.t1, master, policy, config)
        };
        let end_radius = if end_fixed {
            0.0
        } else {
            corner_radius(geometry.t2, next.master(master).t1, master, policy, config)
        };

        let form = geometry.coefficient_form();
        let mut t_start = find_distance_from_begin(
            &form,
            start_radius,
            config.chord_tolerance,
            config.max_bisection_steps,
        );
        let mut t_end = find_distance_from_end(
            &form,
            end_radius,
            config.chord_tolerance,
            config.max_bisection_steps,
        );
        if t_start > t_end {
            let meet = t_start / (t_start + (1.0 - t_end));
            t_start = meet;
            t_end = meet;
        }

        tracing::trace!(
            corner = cur.start_corner,
            %master,
            start_radius,
            end_radius,
            t_start,
            t_end,
            "segment rounding"
        );

        CornerRadii {
            start_radius,
            end_radius,
            t_start,
            t_end,
            start_fixed,
            end_fixed,
        }
    };

    SegmentRounding {
        light: per_master(Master::Light),
        heavy: per_master(Master::Heavy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::{Contour, ContourPoint, PointKind};
    use crate::segment::split_contour;
    use kurbo::Point;

    fn square(size: f64) -> Vec<Segment> {
        let corner = |x: f64, y: f64| {
            ContourPoint::from_masters(Point::new(x, y), Point::new(x, y), PointKind::Corner)
        };
        split_contour(&Contour::new(vec![
            corner(0.0, 0.0),
            corner(size, 0.0),
            corner(size, size),
            corner(0.0, size),
        ]))
    }

    #[test]
    fn right_angle_uses_full_base_radius() {
        let policy = ContourPolicy::new(35.0, 175.0, 12.0);
        let config = RoundingConfig::default();
        let east = Vec2::new(1.0, 0.0);
        let north = Vec2::new(0.0, 1.0);
        let light = corner_radius(east, north, Master::Light, &policy, &config);
        let heavy = corner_radius(east, north, Master::Heavy, &policy, &config);
        assert!((light - 35.0).abs() < 1e-9);
        assert!((heavy - 175.0).abs() < 1e-9);
    }

    #[test]
    fn shallow_convex_corner_is_bounded_by_inner_radius() {
        let policy = ContourPolicy::new(35.0, 175.0, 12.0);
        let config = RoundingConfig::default();
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(1.0, 0.3);
        let r = corner_radius(a, b, Master::Light, &policy, &config);
        assert_eq!(r, 12.0);
    }

    #[test]
    fn straight_and_degenerate_joins_get_no_radius() {
        let policy = ContourPolicy::new(35.0, 175.0, 12.0);
        let config = RoundingConfig::default();
        let a = Vec2::new(1.0, 0.0);
        assert_eq!(corner_radius(a, Vec2::new(1.0, 0.05), Master::Heavy, &policy, &config), 0.0);
        assert_eq!(corner_radius(Vec2::ZERO, a, Master::Heavy, &policy, &config), 0.0);
    }

    #[test]
    fn overlapping_fillets_meet_at_one_parameter() {
        let segments = square(100.0);
        let policy = ContourPolicy::new(80.0, 80.0, 12.0);
        let config = RoundingConfig::default();
        let rounding = calculate_radius(&segments[3], &segments[0], &segments[1], &policy, &config);
        for m in Master::BOTH {
            let r = rounding.at(m);
            assert_eq!(r.t_start, r.t_end);
            assert!((r.t_start - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn pass_through_corner_keeps_its_end() {
        let segments = square(500.0);
        let mut policy = ContourPolicy::new(35.0, 175.0, 12.0);
        policy.pass_through.insert(0);
        let config = RoundingConfig::default();
        let rounding = calculate_radius(&segments[3], &segments[0], &segments[1], &policy, &config);
        assert_eq!(rounding.heavy.start_radius, 0.0);
        assert_eq!(rounding.heavy.t_start, 0.0);
        assert!(rounding.heavy.end_radius > 0.0);
        assert!(rounding.heavy.start_fixed && !rounding.heavy.end_fixed);
    }

    #[test]
    fn radius_below_tolerance_leaves_segment_whole() {
        let segments = square(500.0);
        let policy = ContourPolicy::new(0.0, 0.0, 0.5);
        let config = RoundingConfig::default();
        let rounding = calculate_radius(&segments[3], &segments[0], &segments[1], &policy, &config);
        for m in Master::BOTH {
            let r = rounding.at(m);
            assert_eq!(r.start_radius, 0.5);
            assert!(r.is_untouched(), "{} master: {:?}", m, r);
        }
    }
}
