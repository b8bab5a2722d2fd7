//! Scanline Rasterizer

use crate::POLY_SUBPIXEL_SHIFT;
use crate::POLY_SUBPIXEL_SCALE;

use crate::clip::Clip;
use crate::scan::ScanlineU8;
use crate::cell::RasterizerCell;
use crate::paths::PathCommand;

use crate::Rasterize;
use crate::VertexSource;

use std::cmp::min;
use std::cmp::max;

/// Largest subpixel coordinate, differences of two stay well inside i64
const POLY_MAX_COORD : i64 = (1 << 30) - 1;

/// Conversion between floating point and subpixel coordinates
pub struct RasConvInt {
}
impl RasConvInt {
    /// Subpixel coordinate of `v`, saturated to +/- POLY_MAX_COORD
    pub fn upscale(v: f64) -> i64 {
        let max = POLY_MAX_COORD as f64;
        (v * POLY_SUBPIXEL_SCALE as f64).round().clamp(-max, max) as i64
    }
}

#[derive(Debug,PartialEq,Copy,Clone)]
pub enum PathStatus {
    Initial,
    Closed,
    MoveTo,
    LineTo
}
impl Default for PathStatus {
    fn default() -> PathStatus {
        PathStatus::Initial
    }
}

/// Rasterizer Anti-Alias using Scanline
#[derive(Debug)]
pub struct RasterizerScanline {
    /// Clipping Region
    pub clipper: Clip,
    /// Collection of Rasterizing Cells
    pub outline: RasterizerCell,
    /// Status of Path
    pub status: PathStatus,
    /// Current x position
    pub x0: i64,
    /// Current y position
    pub y0: i64,
    /// Current y row being swept
    scan_y: i64,
    /// Gamma Corection Values
    gamma: Vec<u64>,
}

impl Default for RasterizerScanline {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterize for RasterizerScanline {
    /// Sort the cells, returns false if nothing was rasterized
    fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        self.outline.sort_cells();
        if self.outline.total_cells() == 0 {
            false
        } else {
            self.scan_y = self.outline.min_y;
            true
        }
    }
    /// Sweep the next non-empty row into the scanline
    fn sweep_scanline(&mut self, sl: &mut ScanlineU8) -> bool {
        loop {
            if self.scan_y > self.outline.max_y {
                return false;
            }
            sl.reset_spans();
            let cells = self.outline.scanline_cells( self.scan_y );
            let num_cells = cells.len();
            let mut cover = 0;
            let mut i = 0;
            while i < num_cells {
                let mut x = cells[i].x;
                let mut area = cells[i].area;
                cover += cells[i].cover;
                i += 1;
                // Accumulate all cells with the same X
                while i < num_cells && cells[i].x == x {
                    area  += cells[i].area;
                    cover += cells[i].cover;
                    i += 1;
                }
                if area != 0 {
                    let alpha = self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - area);
                    if alpha > 0 {
                        sl.add_cell(x, alpha);
                    }
                    x += 1;
                }
                if i < num_cells && cells[i].x > x {
                    let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                    if alpha > 0 {
                        sl.add_span(x, cells[i].x - x, alpha);
                    }
                }
            }
            if sl.num_spans() != 0 {
                break;
            }
            self.scan_y += 1;
        }
        sl.finalize(self.scan_y);
        self.scan_y += 1;
        true
    }
    fn min_x(&self) -> i64 {
        self.outline.min_x
    }
    fn max_x(&self) -> i64 {
        self.outline.max_x
    }
}

impl RasterizerScanline {
    /// Create a new rasterizer, linear gamma and no clip box
    pub fn new() -> Self {
        Self { clipper: Clip::new(), status: PathStatus::Initial,
               outline: RasterizerCell::new(),
               x0: 0, y0: 0, scan_y: 0,
               gamma: (0..256).collect(),
        }
    }
    /// Reset the outline, keeps the clip box and gamma
    pub fn reset(&mut self) {
        self.outline.reset();
        self.status = PathStatus::Initial;
    }
    /// Set the gamma function
    ///
    /// The function maps a coverage in [0,1] to [0,1]
    pub fn gamma<F>(&mut self, gfunc: F)
        where F: Fn(f64) -> f64
    {
        let aa_shift  = 8;
        let aa_scale  = 1 << aa_shift;
        let aa_mask   = f64::from(aa_scale - 1);

        self.gamma = (0..256)
            .map(|i| gfunc(f64::from(i) / aa_mask ))
            .map(|v| (v * aa_mask).round().max(0.0).min(aa_mask) as u64)
            .collect();
    }
    /// Linear gamma, coverage is used as is
    pub fn gamma_linear(&mut self) {
        self.gamma = (0..256).collect();
    }
    /// Threshold gamma, coverage below `t` is dropped, all other is full
    pub fn gamma_threshold(&mut self, t: f64) {
        self.gamma(|v| if v < t { 0.0 } else { 1.0 });
    }
    /// Set the clip box in pixel coordinates
    pub fn clip_box(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.reset();
        self.clipper.clip_box(RasConvInt::upscale(x1),
                              RasConvInt::upscale(y1),
                              RasConvInt::upscale(x2),
                              RasConvInt::upscale(y2));
    }
    /// Remove the clip box
    pub fn reset_clipping(&mut self) {
        self.reset();
        self.clipper.reset_clipping();
    }
    /// Add a vertex source, each vertex is added as a move to, line to or close
    pub fn add_path<VS: VertexSource>(&mut self, path: &mut VS) {
        if self.outline.sorted() {
            self.reset();
        }
        path.rewind(0);
        loop {
            let v = path.vertex();
            match v.cmd {
                PathCommand::Stop => break,
                PathCommand::MoveTo => self.move_to_d(v.x, v.y),
                PathCommand::LineTo |
                PathCommand::Curve3 |
                PathCommand::Curve4 => self.line_to_d(v.x, v.y),
                PathCommand::Close => self.close_polygon(),
            }
        }
    }
    /// Start a new contour, the previous one is closed
    pub fn move_to_d(&mut self, x: f64, y: f64) {
        if self.outline.sorted() {
            self.reset();
        }
        self.close_polygon();
        self.x0 = RasConvInt::upscale( x );
        self.y0 = RasConvInt::upscale( y );
        self.clipper.move_to(self.x0,self.y0);
        self.status = PathStatus::MoveTo;
    }
    /// Add a line to the current contour
    pub fn line_to_d(&mut self, x: f64, y: f64) {
        if self.status == PathStatus::Initial {
            return;
        }
        let x = RasConvInt::upscale( x );
        let y = RasConvInt::upscale( y );
        self.clipper.line_to(&mut self.outline, x,y);
        self.status = PathStatus::LineTo;
    }
    /// Close the current contour back to its first point
    pub fn close_polygon(&mut self) {
        if self.status == PathStatus::LineTo {
            self.clipper.line_to(&mut self.outline, self.x0, self.y0);
            self.status = PathStatus::Closed;
        }
    }
    /// Convert an accumulated area into a coverage value, non zero winding
    pub fn calculate_alpha(&self, area: i64) -> u64 {
        let aa_shift  = 8;
        let aa_mask   = (1 << aa_shift) - 1;

        let mut cover = area >> (POLY_SUBPIXEL_SHIFT*2 + 1 - aa_shift);
        cover = cover.abs();
        cover = max(0, min(cover, aa_mask));
        self.gamma[cover as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::Path;

    fn sweep_all(ras: &mut RasterizerScanline) -> Vec<(i64, i64, i64, Vec<u64>)> {
        let mut out = vec![];
        let mut sl = ScanlineU8::new();
        if ras.rewind_scanlines() {
            sl.reset(ras.min_x(), ras.max_x());
            while ras.sweep_scanline(&mut sl) {
                for s in &sl.spans {
                    out.push((sl.y, s.x, s.len, s.covers.clone()));
                }
            }
        }
        out
    }
    #[test]
    fn square_full_coverage() {
        let mut ras = RasterizerScanline::new();
        let mut p = Path::new();
        p.move_to(1.0, 1.0);
        p.line_to(3.0, 1.0);
        p.line_to(3.0, 3.0);
        p.line_to(1.0, 3.0);
        p.close_polygon();
        ras.add_path(&mut p.iter());
        let spans = sweep_all(&mut ras);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], (1, 1, 2, vec![255, 255]));
        assert_eq!(spans[1], (2, 1, 2, vec![255, 255]));
    }
    #[test]
    fn half_pixel_coverage() {
        let mut ras = RasterizerScanline::new();
        let mut p = Path::new();
        p.move_to(0.0, 0.0);
        p.line_to(0.5, 0.0);
        p.line_to(0.5, 1.0);
        p.line_to(0.0, 1.0);
        ras.add_path(&mut p.iter());
        let spans = sweep_all(&mut ras);
        assert_eq!(spans, vec![(0, 0, 1, vec![128])]);
        // Threshold gamma rounds half coverage up to full
        ras.reset();
        ras.gamma_threshold(0.5);
        ras.add_path(&mut p.iter());
        let spans = sweep_all(&mut ras);
        assert_eq!(spans, vec![(0, 0, 1, vec![255])]);
    }
    #[test]
    fn overlap_is_non_zero() {
        let mut p = Path::polygon(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        p.move_to(1.0, 0.0);
        p.line_to(3.0, 0.0);
        p.line_to(3.0, 2.0);
        p.line_to(1.0, 2.0);
        p.close_polygon();
        let mut ras = RasterizerScanline::new();
        ras.add_path(&mut p.iter());
        let spans = sweep_all(&mut ras);
        assert_eq!(spans[0], (0, 0, 3, vec![255, 255, 255]));
    }
    #[test]
    fn clip_box_limits_cells() {
        let mut ras = RasterizerScanline::new();
        ras.clip_box(0.0, 0.0, 2.0, 2.0);
        let mut p = Path::new();
        p.move_to(-5.0, -5.0);
        p.line_to(10.0, -5.0);
        p.line_to(10.0, 10.0);
        p.line_to(-5.0, 10.0);
        ras.add_path(&mut p.iter());
        let spans = sweep_all(&mut ras);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], (0, 0, 2, vec![255, 255]));
        assert_eq!(spans[1], (1, 0, 2, vec![255, 255]));
    }
    #[test]
    fn repeated_contour_saturates() {
        let mut ras = RasterizerScanline::new();
        let mut p = Path::new();
        for _ in 0 .. 2 {
            p.move_to(0.0, 0.0);
            p.line_to(1.0, 0.0);
            p.line_to(1.0, 1.0);
            p.line_to(0.0, 1.0);
            p.close_polygon();
        }
        ras.add_path(&mut p.iter());
        assert_eq!(sweep_all(&mut ras), vec![(0, 0, 1, vec![255])]);
    }
    #[test]
    fn upscale_saturates() {
        assert_eq!(RasConvInt::upscale(1.5), 384);
        assert_eq!(RasConvInt::upscale(1e17), POLY_MAX_COORD);
        assert_eq!(RasConvInt::upscale(-1e300), -POLY_MAX_COORD);
    }
    #[test]
    fn huge_coordinates_clipped() {
        let mut ras = RasterizerScanline::new();
        ras.clip_box(0.0, 0.0, 4.0, 4.0);
        let mut p = Path::new();
        p.move_to(-1e30, 1.0);
        p.line_to(1e30, 1.0);
        p.line_to(1e30, 1e30);
        p.line_to(-1e30, 1e30);
        ras.add_path(&mut p.iter());
        let spans = sweep_all(&mut ras);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0], (1, 0, 4, vec![255, 255, 255, 255]));
        assert_eq!(spans[2], (3, 0, 4, vec![255, 255, 255, 255]));
    }
}
