//! Two-master UFO adapter.
//!
//! Pairs the glyphs of a light and a heavy UFO by name, converts their
//! contours into two-master [`Contour`]s, and writes rounded outlines
//! back into both masters.

use std::path::Path;

use kurbo::Point;
use norad::{Font, Glyph, PointType};

use crate::contour::{Contour, PointKind};
use crate::error::RoundError;
use crate::master::Master;
use crate::GlyphOutline;

/// A light and a heavy master loaded from disk.
pub struct MasterPair {
    pub light: Font,
    pub heavy: Font,
}

impl MasterPair {
    pub fn load(light: &Path, heavy: &Path) -> Result<Self, RoundError> {
        tracing::info!("Loading light master {}", light.display());
        let light = Font::load(light)?;
        tracing::info!("Loading heavy master {}", heavy.display());
        let heavy = Font::load(heavy)?;
        Ok(Self { light, heavy })
    }

    pub fn save(&self, light: &Path, heavy: &Path) -> Result<(), RoundError> {
        self.light.save(light)?;
        self.heavy.save(heavy)?;
        Ok(())
    }

    /// Outlines of every glyph present in both masters.
    ///
    /// When `only` is non-empty, glyphs not named there are ignored.
    /// Glyphs without contours are ignored; glyphs that cannot be paired
    /// or encoded are logged and left out.
    pub fn outlines(&self, only: &[String]) -> Vec<GlyphOutline> {
        let mut outlines = Vec::new();
        for light in self.light.default_layer().iter() {
            let name = light.name().to_string();
            if !only.is_empty() && !only.contains(&name) {
                continue;
            }
            if light.contours.is_empty() {
                continue;
            }
            let Some(heavy) = self.heavy.default_layer().get_glyph(&name) else {
                tracing::warn!("Glyph {} missing from heavy master; skipped", name);
                continue;
            };
            match glyph_outline(light, heavy) {
                Ok(outline) => outlines.push(outline),
                Err(e) => tracing::warn!("Glyph {} skipped: {}", name, e),
            }
        }
        outlines
    }

    /// Replace the contours of each named glyph in both masters.
    pub fn apply(&mut self, outlines: &[GlyphOutline]) {
        for outline in outlines {
            for (font, master) in [(&mut self.light, Master::Light), (&mut self.heavy, Master::Heavy)] {
                if let Some(glyph) = font.default_layer_mut().get_glyph_mut(&outline.name) {
                    glyph.contours = outline
                        .contours
                        .iter()
                        .map(|c| to_contour(c, master))
                        .collect();
                }
            }
        }
    }
}

/// Pair the contours of a glyph's light and heavy instances.
pub fn glyph_outline(light: &Glyph, heavy: &Glyph) -> Result<GlyphOutline, RoundError> {
    let name = light.name().to_string();
    if light.contours.len() != heavy.contours.len() {
        return Err(RoundError::MasterMismatch(format!(
            "{}: light has {} contours, heavy has {}",
            name,
            light.contours.len(),
            heavy.contours.len()
        )));
    }
    let contours = light
        .contours
        .iter()
        .zip(&heavy.contours)
        .map(|(l, h)| from_contours(l, h))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(GlyphOutline { name, contours })
}

/// Build a two-master contour from matching UFO contours.
pub fn from_contours(light: &norad::Contour, heavy: &norad::Contour) -> Result<Contour, RoundError> {
    let contour = Contour::from_masters(&encode(light)?, &encode(heavy)?)?;
    contour.validate()?;
    Ok(contour.into_normalized_start())
}

/// Convert one master of a contour back to UFO points.
pub fn to_contour(contour: &Contour, master: Master) -> norad::Contour {
    let n = contour.len();
    let points = contour
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let typ = match p.kind {
                PointKind::Lead | PointKind::Follow => PointType::OffCurve,
                PointKind::Corner => {
                    if contour.points[(i + n - 1) % n].kind == PointKind::Follow {
                        PointType::Curve
                    } else {
                        PointType::Line
                    }
                }
            };
            let at = p.at(master);
            norad::ContourPoint::new(at.x, at.y, typ, false, None, None, None)
        })
        .collect();
    norad::Contour::new(points, None, None)
}

/// Map UFO point types onto the Corner/Lead/Follow encoding.
fn encode(contour: &norad::Contour) -> Result<Vec<(Point, PointKind)>, RoundError> {
    let points = &contour.points;
    let n = points.len();
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let kind = match p.typ {
                PointType::Line | PointType::Curve => PointKind::Corner,
                PointType::OffCurve => {
                    if points[(i + n - 1) % n].typ == PointType::OffCurve {
                        PointKind::Follow
                    } else {
                        PointKind::Lead
                    }
                }
                PointType::Move => {
                    return Err(RoundError::InvalidContour("open contour".into()))
                }
                PointType::QCurve => {
                    return Err(RoundError::InvalidContour("quadratic contour".into()))
                }
            };
            Ok((Point::new(p.x, p.y), kind))
        })
        .collect()
}
