use serde::Deserialize;

use crate::error::RoundError;

/// Engine tunables shared by every glyph.
///
/// Radii live in the policy; this struct only holds the numeric knobs of
/// the rounding algorithm itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoundingConfig {
    /// Fillet handle length as a fraction of the fillet chord.
    /// 0.6 is the tuned value; an exact circular quarter arc would use
    /// about 0.5523.
    pub fillet_handle_ratio: f64,
    /// Chord-distance tolerance of the bisection search, in font units.
    /// Radii below this are treated as "stay on the corner".
    pub chord_tolerance: f64,
    /// Turning angles within ± this many radians are not corners.
    pub straight_threshold: f64,
    /// Upper bound on bisection steps per search.
    pub max_bisection_steps: usize,
}

impl Default for RoundingConfig {
    fn default() -> Self {
        Self {
            fillet_handle_ratio: 0.6,
            chord_tolerance: 1.0,
            straight_threshold: 0.1,
            max_bisection_steps: 64,
        }
    }
}

impl RoundingConfig {
    pub fn validate(&self) -> Result<(), RoundError> {
        if !(self.fillet_handle_ratio > 0.0 && self.fillet_handle_ratio <= 1.0) {
            return Err(RoundError::InvalidPolicy(format!(
                "fillet_handle_ratio must be in (0, 1], got {}",
                self.fillet_handle_ratio
            )));
        }
        if !(self.chord_tolerance > 0.0) {
            return Err(RoundError::InvalidPolicy(format!(
                "chord_tolerance must be positive, got {}",
                self.chord_tolerance
            )));
        }
        if !(self.straight_threshold >= 0.0) {
            return Err(RoundError::InvalidPolicy(format!(
                "straight_threshold must not be negative, got {}",
                self.straight_threshold
            )));
        }
        if self.max_bisection_steps == 0 {
            return Err(RoundError::InvalidPolicy(
                "max_bisection_steps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
