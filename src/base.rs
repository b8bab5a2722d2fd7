//! Rendering Base

use crate::buffer::RenderingBuffer;
use crate::clip::Rectangle;
use crate::color::Rgba8;
use crate::Color;
use crate::Pixel;

use std::cmp::min;
use std::cmp::max;

/// Rendering Base
///
/// Clips every operation to a box inside the pixel format
#[derive(Debug,Clone)]
pub struct RenderingBase<T> {
    /// Pixel Format
    pub pixf: T,
    clip_box: Rectangle<i64>,
}

impl<T> RenderingBase<T> where T: Pixel {
    /// Create new Rendering Base from Pixel Format, clipped to the full buffer
    pub fn new(pixf: T) -> RenderingBase<T> {
        let w = pixf.width() as i64;
        let h = pixf.height() as i64;
        RenderingBase { pixf, clip_box: Rectangle::new(0, 0, w-1, h-1) }
    }
    /// Set every pixel to a color, ignoring the clip box
    pub fn clear<C: Color>(&mut self, color: &C) {
        let (w, h) = (self.pixf.width(), self.pixf.height());
        for y in 0 .. h {
            for x in 0 .. w {
                self.pixf.set((x,y), color);
            }
        }
    }
    /// Current clip limits as (xmin, xmax, ymin, ymax), inclusive
    pub fn limits(&self) -> (i64,i64,i64,i64) {
        let c = &self.clip_box;
        (c.x1, c.x2, c.y1, c.y2)
    }
    /// Clip to the full buffer
    pub fn reset_clipping(&mut self) {
        let w = self.pixf.width() as i64;
        let h = self.pixf.height() as i64;
        self.clip_box = Rectangle::new(0, 0, w-1, h-1);
    }
    /// Set the clip box, inclusive pixel coordinates
    ///
    /// The box is intersected with the buffer; returns false, and clips
    /// everything, if the intersection is empty
    pub fn clip_box(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) -> bool {
        let w = self.pixf.width() as i64;
        let h = self.pixf.height() as i64;
        let r = Rectangle::new(x1, y1, x2, y2);
        let x1 = max(r.x1, 0);
        let y1 = max(r.y1, 0);
        let x2 = min(r.x2, w-1);
        let y2 = min(r.y2, h-1);
        if x1 > x2 || y1 > y2 {
            // Empty box, nothing is drawn
            self.clip_box = Rectangle { x1: 1, y1: 1, x2: 0, y2: 0 };
            return false;
        }
        self.clip_box = Rectangle::new(x1, y1, x2, y2);
        true
    }
    /// Point is inside the clip box
    pub fn inbox(&self, x: i64, y: i64) -> bool {
        let (xmin,xmax,ymin,ymax) = self.limits();
        x >= xmin && x <= xmax && y >= ymin && y <= ymax
    }
    /// Blend a single pixel
    pub fn blend_pixel<C: Color>(&mut self, x: i64, y: i64, c: &C, cover: u64) {
        if self.inbox(x, y) {
            self.pixf.copy_or_blend_pix_with_cover((x as usize, y as usize), c, cover);
        }
    }
    /// Blend a horizontal line from x1 to x2, inclusive
    pub fn blend_hline<C: Color>(&mut self, x1: i64, y: i64, x2: i64, c: &C, cover: u64) {
        let (xmin,xmax,ymin,ymax) = self.limits();
        let (x1,x2) = if x2 > x1 { (x1,x2) } else { (x2,x1) };
        if y > ymax || y < ymin || x1 > xmax || x2 < xmin {
            return;
        }
        let x1 = max(x1, xmin);
        let x2 = min(x2, xmax);
        self.pixf.blend_hline(x1, y, x2 - x1 + 1, c, cover);
    }
    /// Blend a span of per pixel coverage values
    pub fn blend_solid_hspan<C: Color>(&mut self, x: i64, y: i64, len: i64, c: &C, covers: &[u64]) {
        if let Some((x, len, off)) = self.clip_span(x, y, len) {
            self.pixf.blend_solid_hspan(x, y, len, c, &covers[off ..]);
        }
    }
    /// Blend a span of colors
    ///
    /// If `covers` is empty, `cover` is used for every pixel
    pub fn blend_color_hspan(&mut self, x: i64, y: i64, len: i64, colors: &[Rgba8], covers: &[u64], cover: u64) {
        if let Some((x, len, off)) = self.clip_span(x, y, len) {
            let covers = if covers.is_empty() { covers } else { &covers[off ..] };
            self.pixf.blend_color_hspan(x, y, len, &colors[off ..], covers, cover);
        }
    }
    /// Clip a span to the clip box, returns (x, len, offset into span)
    fn clip_span(&self, x: i64, y: i64, len: i64) -> Option<(i64, i64, usize)> {
        let (xmin,xmax,ymin,ymax) = self.limits();
        if y > ymax || y < ymin {
            return None;
        }
        let (mut x, mut len, mut off) = (x, len, 0);
        if x < xmin {
            len -= xmin - x;
            if len <= 0 {
                return None;
            }
            off = xmin - x;
            x = xmin;
        }
        if x + len - 1 > xmax {
            len = xmax - x + 1;
            if len <= 0 {
                return None;
            }
        }
        Some((x, len, off as usize))
    }
    /// Copy pixels from another buffer of the same pixel size
    ///
    /// `rect` is an (x1,y1,x2,y2) half open rectangle in `src`, it is copied
    /// to (x1+dx, y1+dy) and clipped to this clip box
    pub fn copy_from(&mut self, src: &RenderingBuffer, rect: &Rectangle<i64>, dx: i64, dy: i64) {
        let bpp = T::bpp();
        if src.bpp != bpp {
            return;
        }
        let (xmin,xmax,ymin,ymax) = self.limits();
        let sx1 = max(rect.x1, max(0, xmin - dx));
        let sx2 = min(rect.x2, min(src.width as i64, xmax + 1 - dx));
        let sy1 = max(rect.y1, max(0, ymin - dy));
        let sy2 = min(rect.y2, min(src.height as i64, ymax + 1 - dy));
        if sx1 >= sx2 || sy1 >= sy2 {
            return;
        }
        for sy in sy1 .. sy2 {
            let row = src.row(sy as usize);
            let from = &row[sx1 as usize * bpp .. sx2 as usize * bpp];
            for (i, px) in from.chunks(bpp).enumerate() {
                let id = ((sx1 + dx) as usize + i, (sy + dy) as usize);
                let c = if bpp == 4 {
                    Rgba8::new(px[0], px[1], px[2], px[3])
                } else {
                    Rgba8::new(px[0], px[0], px[0], 255)
                };
                self.pixf.set(id, &c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixfmt::Pixfmt;
    #[test]
    fn clipped_hline() {
        let mut base = RenderingBase::new(Pixfmt::<Rgba8>::new(10,10));
        let red = Rgba8::new(255,0,0,255);
        base.clip_box(2, 2, 5, 5);
        base.blend_hline(-5, 3, 20, &red, 255);
        assert_eq!(base.pixf.get((1,3)), Rgba8::new(0,0,0,0));
        assert_eq!(base.pixf.get((2,3)), red);
        assert_eq!(base.pixf.get((5,3)), red);
        assert_eq!(base.pixf.get((6,3)), Rgba8::new(0,0,0,0));
        base.blend_hline(0, 1, 9, &red, 255);
        assert_eq!(base.pixf.get((3,1)), Rgba8::new(0,0,0,0));
    }
    #[test]
    fn clipped_span() {
        let mut base = RenderingBase::new(Pixfmt::<Rgba8>::new(4,1));
        let red = Rgba8::new(255,0,0,255);
        base.blend_solid_hspan(-2, 0, 4, &red, &[0, 0, 255, 255]);
        assert_eq!(base.pixf.get((0,0)), red);
        assert_eq!(base.pixf.get((1,0)), red);
        assert_eq!(base.pixf.get((2,0)), Rgba8::new(0,0,0,0));
    }
    #[test]
    fn empty_clip_box() {
        let mut base = RenderingBase::new(Pixfmt::<Rgba8>::new(4,4));
        assert!( ! base.clip_box(10, 10, 20, 20));
        base.blend_pixel(0, 0, &Rgba8::black(), 255);
        assert_eq!(base.pixf.get((0,0)), Rgba8::new(0,0,0,0));
    }
}
