//! Renderer

use crate::scan::ScanlineU8;
use crate::base::RenderingBase;
use crate::color::Rgba8;
use crate::pixfmt::Pixfmt;
use crate::math::multiply_u8;

use crate::Render;
use crate::Rasterize;
use crate::Color;
use crate::Pixel;

/// Aliased Renderer
#[derive(Debug)]
pub struct RenderingScanlineBinSolid<'a,T> where T: Pixel, T: 'a {
    pub base: &'a mut RenderingBase<T>,
    pub color: Rgba8,
}
/// Anti-Aliased Renderer
#[derive(Debug)]
pub struct RenderingScanlineAASolid<'a,T> where T: Pixel, T: 'a {
    pub base: &'a mut RenderingBase<T>,
    pub color: Rgba8,
}
/// Anti-Aliased Renderer filling with a repeating pattern
///
/// The pattern is tiled from the device origin, pixel (x,y) takes its
/// color from pattern pixel (x mod w, y mod h)
#[derive(Debug)]
pub struct RenderingScanlinePattern<'a,T> where T: Pixel, T: 'a {
    pub base: &'a mut RenderingBase<T>,
    pub pattern: &'a Pixfmt<Rgba8>,
}

/// Anti-Aliased Renderer of a single color scaled by a coverage callback
///
/// The callback returns the coverage of device pixel (x,y), it is
/// multiplied with the coverage from the rasterizer
pub struct RenderingScanlineSpanSolid<'a,T,F> where T: Pixel, T: 'a, F: FnMut(i64, i64) -> u8 {
    pub base: &'a mut RenderingBase<T>,
    pub color: Rgba8,
    coverage: F,
}

/// Render a single Scanline (y-row) without Anti-Aliasing
fn render_scanline_bin_solid<T,C: Color>(sl: &ScanlineU8,
                                         ren: &mut RenderingBase<T>,
                                         color: &C)
    where T: Pixel
{
    let cover_full = 255;
    for span in &sl.spans {
        ren.blend_hline(span.x, sl.y, span.x - 1 + span.len.abs(),
                        color, cover_full);
    }
}

/// Render a single Scanline (y-row) with Anti Aliasing
fn render_scanline_aa_solid<T,C: Color>(sl: &ScanlineU8,
                                        ren: &mut RenderingBase<T>,
                                        color: &C)
    where T: Pixel
{
    let y = sl.y;
    for span in & sl.spans {
        if span.len > 0 {
            ren.blend_solid_hspan(span.x, y, span.len, color, &span.covers);
        }
    }
}

/// Render a single Scanline (y-row) from a tiled pattern
fn render_scanline_pattern<T>(sl: &ScanlineU8,
                              ren: &mut RenderingBase<T>,
                              pattern: &Pixfmt<Rgba8>)
    where T: Pixel
{
    let (pw, ph) = (pattern.width() as i64, pattern.height() as i64);
    if pw == 0 || ph == 0 {
        return;
    }
    let y = sl.y;
    let py = y.rem_euclid(ph) as usize;
    for span in & sl.spans {
        let colors : Vec<_> = (span.x .. span.x + span.len)
            .map(|x| pattern.get((x.rem_euclid(pw) as usize, py)))
            .collect();
        ren.blend_color_hspan(span.x, y, span.len, &colors, &span.covers, 255);
    }
}

impl<'a,T> Render for RenderingScanlineAASolid<'a,T> where T: Pixel {
    /// Render a single Scanline Row
    fn render(&mut self, sl: &ScanlineU8) {
        render_scanline_aa_solid(sl, &mut self.base, &self.color);
    }
    /// Set the current color
    fn color<C: Color>(&mut self, color: &C) {
        self.color = Rgba8::from_trait(color);
    }
}
impl<'a,T> Render for RenderingScanlineBinSolid<'a,T> where T: Pixel {
    /// Render a single Scanline Row
    fn render(&mut self, sl: &ScanlineU8) {
        render_scanline_bin_solid(sl, &mut self.base, &self.color);
    }
    /// Set the current Color
    fn color<C: Color>(&mut self, color: &C) {
        self.color = Rgba8::from_trait(color);
    }
}
impl<'a,T> Render for RenderingScanlinePattern<'a,T> where T: Pixel {
    fn render(&mut self, sl: &ScanlineU8) {
        render_scanline_pattern(sl, &mut self.base, self.pattern);
    }
    /// Colors come from the pattern
    fn color<C: Color>(&mut self, _color: &C) {
    }
}
impl<'a,T,F> Render for RenderingScanlineSpanSolid<'a,T,F>
    where T: Pixel, F: FnMut(i64, i64) -> u8
{
    fn render(&mut self, sl: &ScanlineU8) {
        let y = sl.y;
        for span in &sl.spans {
            let covers : Vec<u64> = span.covers.iter().enumerate()
                .map(|(i, &c)| {
                    let g = (self.coverage)(span.x + i as i64, y);
                    u64::from(multiply_u8(c.min(255) as u8, g))
                })
                .collect();
            self.base.blend_solid_hspan(span.x, y, span.len, &self.color, &covers);
        }
    }
    fn color<C: Color>(&mut self, color: &C) {
        self.color = Rgba8::from_trait(color);
    }
}
impl<'a,T> RenderingScanlineBinSolid<'a,T> where T: Pixel {
    /// Create a new Renderer from a Rendering Base
    pub fn with_base(base: &'a mut RenderingBase<T>) -> Self {
        let color = Rgba8::black();
        Self { base, color }
    }
}
impl<'a,T> RenderingScanlineAASolid<'a,T> where T: Pixel {
    /// Create a new Renderer from a Rendering Base
    pub fn with_base(base: &'a mut RenderingBase<T>) -> Self {
        let color = Rgba8::black();
        Self { base, color }
    }
}
impl<'a,T> RenderingScanlinePattern<'a,T> where T: Pixel {
    /// Create a new Renderer from a Rendering Base and a pattern tile
    pub fn with_base(base: &'a mut RenderingBase<T>, pattern: &'a Pixfmt<Rgba8>) -> Self {
        Self { base, pattern }
    }
}
impl<'a,T,F> RenderingScanlineSpanSolid<'a,T,F> where T: Pixel, F: FnMut(i64, i64) -> u8 {
    /// Create a new Renderer from a Rendering Base and a coverage callback
    pub fn with_base(base: &'a mut RenderingBase<T>, coverage: F) -> Self {
        Self { base, color: Rgba8::black(), coverage }
    }
}

/// Render rasterized data to an image using a single color, Binary
pub fn render_scanlines_bin_solid<RAS,C,T>(ras: &mut RAS,
                                           sl: &mut ScanlineU8,
                                           ren: &mut RenderingBase<T>,
                                           color: &C)
    where RAS: Rasterize,
          C: Color,
          T: Pixel
{
    if ras.rewind_scanlines() {
        sl.reset(ras.min_x(), ras.max_x());
        while ras.sweep_scanline(sl) {
            render_scanline_bin_solid(sl, ren, color);
        }
    }
}

/// Render rasterized data to an image using a single color, Anti-aliased
pub fn render_scanlines_aa_solid<RAS,C,T>(ras: &mut RAS,
                                          sl: &mut ScanlineU8,
                                          ren: &mut RenderingBase<T>,
                                          color: &C)
    where RAS: Rasterize,
          C: Color,
          T: Pixel
{
    if ras.rewind_scanlines() {
        sl.reset(ras.min_x(), ras.max_x());
        while ras.sweep_scanline(sl) {
            render_scanline_aa_solid(sl, ren, color);
        }
    }
}

/// Render rasterized data to an image using the current color
pub fn render_scanlines<REN, RAS>(ras: &mut RAS,
                                  sl: &mut ScanlineU8,
                                  ren: &mut REN)
    where REN: Render,
          RAS: Rasterize
{
    if ras.rewind_scanlines() {
        sl.reset( ras.min_x(), ras.max_x() );
        ren.prepare();
        while ras.sweep_scanline(sl) {
            ren.render(&sl);
        }
    }
}
