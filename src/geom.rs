//! Single-master curve math.
//!
//! Everything here works on plain `kurbo` points of one master; the
//! callers are responsible for running it once per master.

use kurbo::{CubicBez, Point, Vec2};

/// Monomial form of a cubic: `point(t) = d + c·t + b·t² + a·t³`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientForm {
    pub a: Vec2,
    pub b: Vec2,
    pub c: Vec2,
    pub d: Point,
}

impl CoefficientForm {
    pub fn from_cubic(cubic: CubicBez) -> Self {
        let p0 = cubic.p0.to_vec2();
        let p1 = cubic.p1.to_vec2();
        let p2 = cubic.p2.to_vec2();
        let p3 = cubic.p3.to_vec2();
        Self {
            a: p3 - p0 + (p1 - p2) * 3.0,
            b: (p0 - p1 * 2.0 + p2) * 3.0,
            c: (p1 - p0) * 3.0,
            d: cubic.p0,
        }
    }

    pub fn eval(&self, t: f64) -> Point {
        self.d + ((self.a * t + self.b) * t + self.c) * t
    }

    /// First derivative at `t`.
    pub fn deriv(&self, t: f64) -> Vec2 {
        (self.a * (3.0 * t) + self.b * 2.0) * t + self.c
    }
}

/// Signed angle that turns `incoming` onto `outgoing`, in `(-π, π]`.
///
/// This is the argument of the complex quotient `outgoing / incoming`.
/// A zero-length vector on either side yields 0 (no corner).
pub fn turning_angle(incoming: Vec2, outgoing: Vec2) -> f64 {
    if is_zero(incoming) || is_zero(outgoing) {
        return 0.0;
    }
    let re = incoming.dot(outgoing);
    let im = incoming.cross(outgoing);
    im.atan2(re)
}

/// Parameter at which the chord from `point(0)` is `distance` long.
///
/// Returns 0 for distances below `tolerance` and 1 when the far endpoint
/// is closer than `distance`.
pub fn find_distance_from_begin(
    form: &CoefficientForm,
    distance: f64,
    tolerance: f64,
    max_steps: usize,
) -> f64 {
    if distance < tolerance {
        return 0.0;
    }
    let anchor = form.eval(0.0);
    let chord = |t: f64| anchor.distance(form.eval(t));
    if distance > chord(1.0) {
        return 1.0;
    }
    let (lo, hi) = if distance <= chord(0.5) {
        (0.0, 0.5)
    } else {
        (0.5, 1.0)
    };
    bisect(lo, hi, |t| chord(t) - distance, tolerance, max_steps)
}

/// Parameter at which the chord back to `point(1)` is `distance` long.
///
/// Returns 1 for distances below `tolerance` and 0 when the start point
/// is closer than `distance`.
pub fn find_distance_from_end(
    form: &CoefficientForm,
    distance: f64,
    tolerance: f64,
    max_steps: usize,
) -> f64 {
    if distance < tolerance {
        return 1.0;
    }
    let anchor = form.eval(1.0);
    let chord = |t: f64| anchor.distance(form.eval(t));
    if distance > chord(0.0) {
        return 0.0;
    }
    let (lo, hi) = if distance <= chord(0.5) {
        (0.5, 1.0)
    } else {
        (0.0, 0.5)
    };
    bisect(lo, hi, |t| distance - chord(t), tolerance, max_steps)
}

/// Bisect `[lo, hi]` for a zero of `error`.
///
/// `error(t) < 0` means the answer lies above `t`. Stops as soon as
/// `|error| <= tolerance`.
fn bisect(
    mut lo: f64,
    mut hi: f64,
    error: impl Fn(f64) -> f64,
    tolerance: f64,
    max_steps: usize,
) -> f64 {
    for _ in 0..max_steps {
        let mid = 0.5 * (lo + hi);
        let e = error(mid);
        if e.abs() <= tolerance {
            return mid;
        }
        if e < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// De Casteljau split of a cubic at `t`.
pub fn split(cubic: CubicBez, t: f64) -> (CubicBez, CubicBez) {
    let p01 = cubic.p0.lerp(cubic.p1, t);
    let p12 = cubic.p1.lerp(cubic.p2, t);
    let p23 = cubic.p2.lerp(cubic.p3, t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    let mid = p012.lerp(p123, t);
    (
        CubicBez::new(cubic.p0, p01, p012, mid),
        CubicBez::new(mid, p123, p23, cubic.p3),
    )
}

/// The part of `cubic` between parameters `t1` and `t2`.
///
/// When `t1 >= t2` the result collapses to the single point at the
/// midpoint parameter.
pub fn subdivide(cubic: CubicBez, t1: f64, t2: f64) -> CubicBez {
    if t1 >= t2 {
        let p = split(cubic, 0.5 * (t1 + t2)).0.p3;
        return CubicBez::new(p, p, p, p);
    }
    let (head, _) = split(cubic, t2);
    let (_, middle) = split(head, t1 / t2);
    middle
}

/// Unit vector along `v`, or along `fallback` when `v` vanishes.
/// Returns zero when both vanish.
pub fn unit_or(v: Vec2, fallback: Vec2) -> Vec2 {
    if !is_zero(v) {
        v / v.hypot()
    } else if !is_zero(fallback) {
        fallback / fallback.hypot()
    } else {
        Vec2::ZERO
    }
}

fn is_zero(v: Vec2) -> bool {
    v.hypot2() < 1e-18
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn sample_curve() -> CubicBez {
        CubicBez::new((0.0, 0.0), (100.0, 300.0), (400.0, 300.0), (500.0, 0.0))
    }

    #[test]
    fn coefficient_form_matches_bernstein() {
        let cubic = sample_curve();
        let form = CoefficientForm::from_cubic(cubic);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let expected = split(cubic, t).0.p3;
            assert!(form.eval(t).distance(expected) < 1e-9, "t = {}", t);
        }
    }

    #[test]
    fn turning_angle_sign_follows_direction() {
        let east = Vec2::new(1.0, 0.0);
        let north = Vec2::new(0.0, 1.0);
        let south = Vec2::new(0.0, -1.0);
        assert!((turning_angle(east, north) - FRAC_PI_2).abs() < 1e-12);
        assert!((turning_angle(east, south) + FRAC_PI_2).abs() < 1e-12);
        assert_eq!(turning_angle(Vec2::ZERO, north), 0.0);
    }

    #[test]
    fn begin_search_short_circuits() {
        let form = CoefficientForm::from_cubic(sample_curve());
        assert_eq!(find_distance_from_begin(&form, 0.5, 1.0, 64), 0.0);
        assert_eq!(find_distance_from_begin(&form, 10_000.0, 1.0, 64), 1.0);
        assert_eq!(find_distance_from_end(&form, 0.5, 1.0, 64), 1.0);
        assert_eq!(find_distance_from_end(&form, 10_000.0, 1.0, 64), 0.0);
    }

    #[test]
    fn end_search_hits_target_chord() {
        let form = CoefficientForm::from_cubic(sample_curve());
        let anchor = form.eval(1.0);
        for &d in &[5.0, 60.0, 250.0, 480.0] {
            let t = find_distance_from_end(&form, d, 1.0, 64);
            let got = anchor.distance(form.eval(t));
            assert!((got - d).abs() <= 1.0, "d = {}, got {}", d, got);
        }
    }

    #[test]
    fn subdivide_keeps_the_middle() {
        let cubic = sample_curve();
        let middle = subdivide(cubic, 0.25, 0.75);
        let form = CoefficientForm::from_cubic(cubic);
        assert!(middle.p0.distance(form.eval(0.25)) < 1e-9);
        assert!(middle.p3.distance(form.eval(0.75)) < 1e-9);
        // The sub-curve's own midpoint is the original's t = 0.5.
        let sub = CoefficientForm::from_cubic(middle);
        assert!(sub.eval(0.5).distance(form.eval(0.5)) < 1e-9);
    }

    #[test]
    fn subdivide_collapses_inverted_range() {
        let collapsed = subdivide(sample_curve(), 0.6, 0.4);
        assert_eq!(collapsed.p0, collapsed.p3);
        assert_eq!(collapsed.p1, collapsed.p2);
    }
}
