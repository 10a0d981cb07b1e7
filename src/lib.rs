//! roundcorner: rounded corners for two-master variable font outlines.
//!
//! Turns the sharp stroke corners of a light/heavy outline pair into
//! short filleted arcs, keeping one point structure across both masters
//! so the result still interpolates.
//!
//! # Example
//!
//! ```
//! use roundcorner::{round_contour, Contour, ContourPoint, ContourPolicy, PointKind, RoundingConfig};
//!
//! let corner = |x: f64, y: f64| {
//!     ContourPoint::from_masters((x, y).into(), (x * 1.2, y * 1.2).into(), PointKind::Corner)
//! };
//! let square = Contour::new(vec![
//!     corner(0.0, 0.0),
//!     corner(500.0, 0.0),
//!     corner(500.0, 500.0),
//!     corner(0.0, 500.0),
//! ]);
//! let policy = ContourPolicy::new(35.0, 175.0, 12.0);
//! let rounded = round_contour(&square, &policy, &RoundingConfig::default());
//! assert_eq!(rounded.corner_count(), 8);
//! ```

#![forbid(unsafe_code)]

mod config;
mod contour;
mod corner;
mod geom;
mod master;
mod policy;
mod rebuild;
mod segment;

pub mod error;

#[cfg(feature = "ufo")]
pub mod ufo;

// Re-export kurbo so downstream users get the same version used by
// `ContourPoint::at` and the segment geometry.
pub use kurbo;

pub use config::RoundingConfig;
pub use contour::{Contour, ContourPoint, PointKind};
pub use corner::{calculate_radius, corner_radius, CornerRadii, SegmentRounding};
pub use error::RoundError;
pub use geom::{
    find_distance_from_begin, find_distance_from_end, subdivide, turning_angle, CoefficientForm,
};
pub use master::{Master, TwoMasterValue};
pub use policy::{
    ContourEntry, ContourOverride, ContourPolicy, DefaultRadii, GlyphEntry, PolicyTable, Radii,
    RadiusMode, RadiusPolicy,
};
pub use rebuild::transform_contour;
pub use segment::{split_contour, MasterSegment, Segment, SegmentKind};

use std::iter::Sum;
use std::ops::Add;

use rayon::prelude::*;

/// The outline of one glyph: its name and its two-master contours.
///
/// The name is only used to look up the glyph's policy; the engine
/// never branches on it.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphOutline {
    pub name: String,
    pub contours: Vec<Contour>,
}

/// Counters collected while rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundingStats {
    pub glyphs: usize,
    /// Contours that received at least one fillet.
    pub contours_rounded: usize,
    /// Contours left as they were (skipped, too short, or nothing to round).
    pub contours_untouched: usize,
    pub fillets: usize,
}

impl Add for RoundingStats {
    type Output = RoundingStats;

    fn add(self, other: RoundingStats) -> RoundingStats {
        RoundingStats {
            glyphs: self.glyphs + other.glyphs,
            contours_rounded: self.contours_rounded + other.contours_rounded,
            contours_untouched: self.contours_untouched + other.contours_untouched,
            fillets: self.fillets + other.fillets,
        }
    }
}

impl Sum for RoundingStats {
    fn sum<I: Iterator<Item = RoundingStats>>(iter: I) -> Self {
        iter.fold(RoundingStats::default(), Add::add)
    }
}

/// Round one contour under an already resolved policy.
pub fn round_contour(contour: &Contour, policy: &ContourPolicy, config: &RoundingConfig) -> Contour {
    transform_contour(contour, policy, config)
}

/// Round every contour of a glyph.
pub fn round_glyph(glyph: &GlyphOutline, policy: &RadiusPolicy, config: &RoundingConfig) -> GlyphOutline {
    round_glyph_with_stats(glyph, policy, config).0
}

/// Like [`round_glyph`], also returning counters.
pub fn round_glyph_with_stats(
    glyph: &GlyphOutline,
    policy: &RadiusPolicy,
    config: &RoundingConfig,
) -> (GlyphOutline, RoundingStats) {
    let mut stats = RoundingStats {
        glyphs: 1,
        ..RoundingStats::default()
    };
    let contours = glyph
        .contours
        .iter()
        .enumerate()
        .map(|(index, contour)| {
            let (rounded, fillets) = rebuild::rebuild(contour, &policy.for_contour(index), config);
            if fillets > 0 {
                stats.contours_rounded += 1;
            } else {
                stats.contours_untouched += 1;
            }
            stats.fillets += fillets;
            rounded
        })
        .collect();
    tracing::debug!(
        "Glyph {}: {} contours, {} fillets",
        glyph.name,
        glyph.contours.len(),
        stats.fillets
    );
    (
        GlyphOutline {
            name: glyph.name.clone(),
            contours,
        },
        stats,
    )
}

/// Round a batch of glyphs, resolving each glyph's policy from `table`.
///
/// Glyphs are independent, so the batch is processed in parallel.
pub fn round_glyphs(
    glyphs: &[GlyphOutline],
    table: &PolicyTable,
    config: &RoundingConfig,
) -> Vec<GlyphOutline> {
    round_glyphs_with_stats(glyphs, table, config).0
}

/// Like [`round_glyphs`], also returning the summed counters.
pub fn round_glyphs_with_stats(
    glyphs: &[GlyphOutline],
    table: &PolicyTable,
    config: &RoundingConfig,
) -> (Vec<GlyphOutline>, RoundingStats) {
    let results: Vec<(GlyphOutline, RoundingStats)> = glyphs
        .par_iter()
        .map(|glyph| round_glyph_with_stats(glyph, &table.resolve(&glyph.name), config))
        .collect();
    let stats: RoundingStats = results.iter().map(|(_, s)| *s).sum();
    let outlines = results.into_iter().map(|(g, _)| g).collect();
    (outlines, stats)
}
