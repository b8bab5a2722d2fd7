//! Graphics context, the style of a single drawing call

use crate::bbox::Bbox;
use crate::color::Rgba;
use crate::dash::Dash;
use crate::error::{RenderError, Result};
use crate::paths::Path;
use crate::snap::SnapMode;
use crate::stroke::{LineCap, LineJoin};
use crate::transform::Transform;
use crate::VertexSource;

/// Convert a length in points to pixels
pub fn points_to_pixels(points: f64, dpi: f64) -> f64 {
    points * dpi / 72.0
}

/// Dash pattern, lengths in points
///
/// An empty pattern draws a solid line
#[derive(Debug,Clone,Default,PartialEq)]
pub struct Dashes {
    offset: f64,
    dashes: Vec<(f64, f64)>,
}

impl Dashes {
    /// Create a pattern from an offset and a flat on, off, on, off ... list
    pub fn new(offset: f64, seq: &[f64]) -> Result<Self> {
        if seq.len() % 2 != 0 {
            return Err(RenderError::OddDashes(seq.len()));
        }
        let dashes = seq.chunks(2).map(|c| (c[0], c[1])).collect();
        Ok(Self { offset, dashes })
    }
    /// Solid line
    pub fn solid() -> Self {
        Self::default()
    }
    pub fn is_solid(&self) -> bool {
        self.dashes.is_empty()
    }
    pub fn offset(&self) -> f64 {
        self.offset
    }
    /// On and off pairs
    pub fn pairs(&self) -> &[(f64, f64)] {
        &self.dashes
    }
    /// Load the pattern into a dash generator, converting to pixels
    ///
    /// Without antialiasing every length is snapped to floor(len) + 0.5
    pub fn apply<T: VertexSource>(&self, dash: &mut Dash<T>, dpi: f64, isaa: bool) {
        let px = |v: f64| {
            let v = points_to_pixels(v, dpi);
            if isaa { v } else { v.floor() + 0.5 }
        };
        dash.remove_all_dashes();
        for &(on, off) in &self.dashes {
            dash.add_dash(px(on), px(off));
        }
        dash.dash_start(points_to_pixels(self.offset, dpi));
    }
}

/// Style and clipping of a drawing call
#[derive(Debug,Clone)]
pub struct GraphicsContext {
    /// Line width in points
    pub linewidth: f64,
    /// Alpha, used when `forced_alpha` is set
    pub alpha: f64,
    /// Replace the alpha of the stroke and face colors by `alpha`
    pub forced_alpha: bool,
    /// Stroke color
    pub color: Rgba,
    pub antialiased: bool,
    pub cap: LineCap,
    pub join: LineJoin,
    pub dashes: Dashes,
    /// Clip rectangle in user space, bottom left origin
    pub cliprect: Option<Bbox>,
    /// Clip path and its transform
    pub clippath: Option<(Path, Transform)>,
    /// Hatch pattern in a unit square, drawn with the stroke color
    pub hatch_path: Option<Path>,
    pub snap_mode: SnapMode,
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsContext {
    /// Black, 1 point wide, solid, butt caps, round joins and antialiased
    pub fn new() -> Self {
        Self { linewidth: 1.0, alpha: 1.0, forced_alpha: false,
               color: Rgba::black(), antialiased: true,
               cap: LineCap::Butt, join: LineJoin::Round,
               dashes: Dashes::solid(), cliprect: None, clippath: None,
               hatch_path: None, snap_mode: SnapMode::Auto,
        }
    }
    /// Set the dash offset and on/off sequence, both in points
    pub fn set_dashes(&mut self, offset: f64, seq: &[f64]) -> Result<()> {
        self.dashes = Dashes::new(offset, seq)?;
        Ok(())
    }
    /// Set the cap style by name: butt, round or projecting
    pub fn set_capstyle(&mut self, name: &str) -> Result<()> {
        self.cap = name.parse()?;
        Ok(())
    }
    /// Set the join style by name: miter, round or bevel
    pub fn set_joinstyle(&mut self, name: &str) -> Result<()> {
        self.join = name.parse()?;
        Ok(())
    }
    /// Set the snap mode by name: auto, true or false
    pub fn set_snap(&mut self, name: &str) -> Result<()> {
        self.snap_mode = name.parse()?;
        Ok(())
    }
    /// Set the alpha, it overrides the alpha of every color drawn
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
        self.forced_alpha = true;
    }
    /// Stroke color with the forced alpha applied
    pub fn stroke_color(&self) -> Rgba {
        self.apply_alpha(self.color)
    }
    /// Face color with the forced alpha applied
    pub fn face_color(&self, face: Rgba) -> Rgba {
        self.apply_alpha(face)
    }
    fn apply_alpha(&self, c: Rgba) -> Rgba {
        if self.forced_alpha {
            c.with_alpha(self.alpha)
        } else {
            c
        }
    }
}
