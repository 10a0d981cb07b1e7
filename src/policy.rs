//! Radius policy: which radius every corner of a glyph receives.
//!
//! The rounding engine only ever sees a [`ContourPolicy`]. Glyph-name
//! lookups happen here, in [`PolicyTable::resolve`], before the engine
//! runs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::config::RoundingConfig;
use crate::error::RoundError;
use crate::master::Master;

/// A light/heavy radius pair.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Radii {
    pub light: f64,
    pub heavy: f64,
}

/// How base radii are assigned to the two masters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadiusMode {
    /// Light master gets the light radius, heavy master the heavy one.
    #[default]
    Standard,
    /// Both masters use the smaller base radius.
    Min,
    /// Light and heavy radii are exchanged (reversed winding outlines).
    Swapped,
}

/// Fully resolved radii for one contour.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContourPolicy {
    pub light_radius: f64,
    pub heavy_radius: f64,
    pub inner_radius: f64,
    pub mode: RadiusMode,
    /// Corner ordinals that are left untouched.
    pub pass_through: BTreeSet<usize>,
    /// Leave the whole contour alone.
    pub skip: bool,
}

impl ContourPolicy {
    pub fn new(light_radius: f64, heavy_radius: f64, inner_radius: f64) -> Self {
        Self {
            light_radius,
            heavy_radius,
            inner_radius,
            ..Self::default()
        }
    }

    /// Base radius for convex corners in `master`.
    pub fn base_radius(&self, master: Master) -> f64 {
        match (self.mode, master) {
            (RadiusMode::Min, _) => self.light_radius.min(self.heavy_radius),
            (RadiusMode::Standard, Master::Light) | (RadiusMode::Swapped, Master::Heavy) => {
                self.light_radius
            }
            (RadiusMode::Standard, Master::Heavy) | (RadiusMode::Swapped, Master::Light) => {
                self.heavy_radius
            }
        }
    }

    /// Radius for concave corners in `master`, also the lower bound for
    /// convex ones.
    pub fn inner_radius(&self, master: Master) -> f64 {
        match self.mode {
            RadiusMode::Standard => self.inner_radius,
            RadiusMode::Min | RadiusMode::Swapped => {
                self.inner_radius.min(self.base_radius(master))
            }
        }
    }

    pub fn is_pass_through(&self, corner: usize) -> bool {
        self.pass_through.contains(&corner)
    }
}

/// Per-contour adjustments on top of a glyph's radii.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContourOverride {
    /// Replaces the glyph's light/heavy base radii for this contour.
    pub custom_radius: Option<Radii>,
    pub min_radii: bool,
    pub swap_radii: bool,
    pub pass_through: BTreeSet<usize>,
    pub skip: bool,
}

/// Radii for one glyph, with its per-contour overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusPolicy {
    pub light_radius: f64,
    pub heavy_radius: f64,
    pub inner_radius: f64,
    pub contours: BTreeMap<usize, ContourOverride>,
}

impl RadiusPolicy {
    pub fn new(light_radius: f64, heavy_radius: f64, inner_radius: f64) -> Self {
        Self {
            light_radius,
            heavy_radius,
            inner_radius,
            contours: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, contour: usize, over: ContourOverride) -> Self {
        self.contours.insert(contour, over);
        self
    }

    /// Custom radius for a contour, if one is configured.
    pub fn custom_radius(&self, contour: usize) -> Option<Radii> {
        self.contours.get(&contour).and_then(|o| o.custom_radius)
    }

    /// Resolve the radii that apply to contour `index`.
    pub fn for_contour(&self, index: usize) -> ContourPolicy {
        let mut policy = ContourPolicy::new(self.light_radius, self.heavy_radius, self.inner_radius);
        if let Some(over) = self.contours.get(&index) {
            if let Some(r) = over.custom_radius {
                policy.light_radius = r.light;
                policy.heavy_radius = r.heavy;
            }
            policy.mode = if over.min_radii {
                RadiusMode::Min
            } else if over.swap_radii {
                RadiusMode::Swapped
            } else {
                RadiusMode::Standard
            };
            policy.pass_through = over.pass_through.clone();
            policy.skip = over.skip;
        }
        policy
    }
}

/// Default radii section of a policy file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultRadii {
    pub light: f64,
    pub heavy: f64,
    pub inner: f64,
}

impl Default for DefaultRadii {
    fn default() -> Self {
        Self {
            light: 35.0,
            heavy: 175.0,
            inner: 12.0,
        }
    }
}

/// Overrides for one glyph in a policy file.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlyphEntry {
    pub light: Option<f64>,
    pub heavy: Option<f64>,
    pub inner: Option<f64>,
    pub contours: Vec<ContourEntry>,
}

/// One `[[glyphs.NAME.contours]]` entry of a policy file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContourEntry {
    pub index: usize,
    #[serde(default)]
    pub radius: Option<Radii>,
    #[serde(default)]
    pub min_radii: bool,
    #[serde(default)]
    pub swap_radii: bool,
    #[serde(default)]
    pub pass_through: BTreeSet<usize>,
    #[serde(default)]
    pub skip: bool,
}

impl ContourEntry {
    fn to_override(&self) -> ContourOverride {
        ContourOverride {
            custom_radius: self.radius,
            min_radii: self.min_radii,
            swap_radii: self.swap_radii,
            pass_through: self.pass_through.clone(),
            skip: self.skip,
        }
    }
}

/// Name-keyed policy table, usually loaded from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyTable {
    pub engine: RoundingConfig,
    pub radius: DefaultRadii,
    pub glyphs: BTreeMap<String, GlyphEntry>,
}

impl PolicyTable {
    /// A table with only default radii.
    pub fn with_defaults(light: f64, heavy: f64, inner: f64) -> Self {
        Self {
            radius: DefaultRadii { light, heavy, inner },
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, RoundError> {
        let table: PolicyTable = toml::from_str(text)?;
        table.validate()?;
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, RoundError> {
        let text = std::fs::read_to_string(path).map_err(|source| RoundError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_toml_str(&text)?;
        tracing::info!(
            "Loaded policy {} ({} glyph overrides)",
            path.display(),
            table.glyphs.len()
        );
        Ok(table)
    }

    /// Reject negative radii and out-of-range engine settings.
    pub fn validate(&self) -> Result<(), RoundError> {
        self.engine.validate()?;
        check_radius("radius.light", self.radius.light)?;
        check_radius("radius.heavy", self.radius.heavy)?;
        check_radius("radius.inner", self.radius.inner)?;
        for (name, entry) in &self.glyphs {
            for (field, value) in [("light", entry.light), ("heavy", entry.heavy), ("inner", entry.inner)] {
                if let Some(v) = value {
                    check_radius(&format!("glyphs.{}.{}", name, field), v)?;
                }
            }
            for contour in &entry.contours {
                if let Some(r) = contour.radius {
                    let field = format!("glyphs.{}.contours[{}].radius", name, contour.index);
                    check_radius(&field, r.light)?;
                    check_radius(&field, r.heavy)?;
                }
            }
        }
        Ok(())
    }

    /// Radii for the glyph called `name`.
    pub fn resolve(&self, name: &str) -> RadiusPolicy {
        let defaults = self.radius;
        let Some(entry) = self.glyphs.get(name) else {
            return RadiusPolicy::new(defaults.light, defaults.heavy, defaults.inner);
        };
        let mut policy = RadiusPolicy::new(
            entry.light.unwrap_or(defaults.light),
            entry.heavy.unwrap_or(defaults.heavy),
            entry.inner.unwrap_or(defaults.inner),
        );
        for contour in &entry.contours {
            policy.contours.insert(contour.index, contour.to_override());
        }
        policy
    }
}

fn check_radius(field: &str, value: f64) -> Result<(), RoundError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RoundError::InvalidPolicy(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[engine]
fillet_handle_ratio = 0.55

[radius]
light = 35.0
heavy = 175.0
inner = 12.0

[glyphs.uni4E00]
light = 30.0

[[glyphs.uni4E00.contours]]
index = 1
radius = { light = 20.0, heavy = 90.0 }
swap_radii = true
pass_through = [2, 3]
"#;

    #[test]
    fn parses_and_resolves_overrides() {
        let table = PolicyTable::from_toml_str(SAMPLE).unwrap();
        assert_eq!(table.engine.fillet_handle_ratio, 0.55);
        assert_eq!(table.engine.chord_tolerance, 1.0);

        let policy = table.resolve("uni4E00");
        assert_eq!(policy.light_radius, 30.0);
        assert_eq!(policy.heavy_radius, 175.0);
        assert_eq!(policy.custom_radius(1), Some(Radii { light: 20.0, heavy: 90.0 }));

        let contour = policy.for_contour(1);
        assert_eq!(contour.mode, RadiusMode::Swapped);
        assert_eq!(contour.base_radius(Master::Light), 90.0);
        assert_eq!(contour.base_radius(Master::Heavy), 20.0);
        assert!(contour.is_pass_through(3));
        assert!(!contour.is_pass_through(0));

        let untouched = policy.for_contour(0);
        assert_eq!(untouched.mode, RadiusMode::Standard);
        assert_eq!(untouched.base_radius(Master::Light), 30.0);
    }

    #[test]
    fn unknown_glyph_gets_defaults() {
        let table = PolicyTable::from_toml_str(SAMPLE).unwrap();
        assert_eq!(table.resolve("a"), RadiusPolicy::new(35.0, 175.0, 12.0));
    }

    #[test]
    fn min_radii_uses_smaller_base_for_both() {
        let policy = RadiusPolicy::new(35.0, 175.0, 50.0).with_override(
            0,
            ContourOverride {
                min_radii: true,
                ..ContourOverride::default()
            },
        );
        let contour = policy.for_contour(0);
        assert_eq!(contour.base_radius(Master::Light), 35.0);
        assert_eq!(contour.base_radius(Master::Heavy), 35.0);
        assert_eq!(contour.inner_radius(Master::Heavy), 35.0);
    }

    #[test]
    fn rejects_negative_radius() {
        let err = PolicyTable::from_toml_str("[radius]\nlight = -1.0\nheavy = 2.0\ninner = 1.0\n");
        assert!(matches!(err, Err(RoundError::InvalidPolicy(_))));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = PolicyTable::from_toml_str("[radius]\nlite = 1.0\n");
        assert!(matches!(err, Err(RoundError::PolicyParse(_))));
    }
}
