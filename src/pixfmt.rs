//! Pixel Format

use crate::buffer::RenderingBuffer;
use crate::color::*;
use crate::math::*;

use crate::Color;
use crate::Pixel;

use std::marker::PhantomData;

/// Pixel Format Wrapper around raw pixel component data
///
/// `Pixfmt<Rgba8>` stores straight (non premultiplied) RGBA, 4 bytes per
/// pixel; `Pixfmt<Gray8>` stores a single coverage byte per pixel.
#[derive(Debug,Clone)]
pub struct Pixfmt<T> {
    rbuf: RenderingBuffer,
    phantom: PhantomData<T>,
}

impl<T> Pixfmt<T> where Pixfmt<T>: Pixel {
    /// Create new Pixel Format of width * height * bpp
    ///
    /// Allocates memory of width * height * bpp, all zero
    pub fn new(width: usize, height: usize) -> Self {
        Self { rbuf: RenderingBuffer::new(width, height, Self::bpp()),
               phantom: PhantomData
        }
    }
    /// Size of Rendering Buffer in bytes; width * height * bpp
    pub fn size(&self) -> usize {
        self.rbuf.len()
    }
    /// Underlying buffer
    pub fn rbuf(&self) -> &RenderingBuffer {
        &self.rbuf
    }
    /// Raw pixel data
    pub fn pixeldata(&self) -> &[u8] {
        &self.rbuf.data
    }
    /// Copy a color into every pixel
    pub fn fill<C: Color>(&mut self, c: &C) {
        let (w, h) = (self.width(), self.height());
        for y in 0 .. h {
            for x in 0 .. w {
                self.set((x,y), c);
            }
        }
    }
}

impl Pixfmt<Rgba8> {
    fn mix_pix(p: Rgba8, c: Rgba8, alpha: u8) -> Rgba8 {
        let red   =    lerp_u8(p.r, c.r, alpha);
        let green =    lerp_u8(p.g, c.g, alpha);
        let blue  =    lerp_u8(p.b, c.b, alpha);
        let alpha =    prelerp_u8(p.a, alpha, alpha);
        Rgba8::new(red, green, blue, alpha)
    }
}

impl Pixel for Pixfmt<Rgba8> {
    fn bpp() -> usize { 4 }
    /// Height of rendering buffer in pixels
    fn height(&self) -> usize {
        self.rbuf.height
    }
    /// Width of rendering buffer in pixels
    fn width(&self) -> usize {
        self.rbuf.width
    }
    fn get(&self, id: (usize, usize)) -> Rgba8 {
        let p = &self.rbuf[id];
        Rgba8::new(p[0],p[1],p[2],p[3])
    }
    fn set<C: Color>(&mut self, id: (usize, usize), c: &C) {
        let p = &mut self.rbuf[id];
        p[0] = c.red8();
        p[1] = c.green8();
        p[2] = c.blue8();
        p[3] = c.alpha8();
    }
    fn blend_pix<C: Color>(&mut self, id: (usize, usize), c: &C, cover: u64) {
        let alpha = multiply_u8(c.alpha8(), cover.min(255) as u8);
        let pix0 = self.get(id);
        let pix  = Self::mix_pix(pix0, Rgba8::from_trait(c), alpha);
        self.set(id, &pix);
    }
}

impl Pixel for Pixfmt<Gray8> {
    fn bpp() -> usize { 1 }
    fn height(&self) -> usize {
        self.rbuf.height
    }
    fn width(&self) -> usize {
        self.rbuf.width
    }
    fn get(&self, id: (usize, usize)) -> Rgba8 {
        let v = self.rbuf[id][0];
        Rgba8::new(v, v, v, 255)
    }
    fn set<C: Color>(&mut self, id: (usize, usize), c: &C) {
        self.rbuf[id][0] = Gray8::from_trait(c).value;
    }
    fn blend_pix<C: Color>(&mut self, id: (usize, usize), c: &C, cover: u64) {
        let alpha = multiply_u8(c.alpha8(), cover.min(255) as u8);
        let g = Gray8::from_trait(c);
        let p = self.rbuf[id][0];
        self.rbuf[id][0] = lerp_u8(p, g.value, alpha);
    }
}

impl Pixfmt<Gray8> {
    /// Raw gray value at (`x`,`y`)
    pub fn value(&self, x: usize, y: usize) -> u8 {
        self.rbuf[(x,y)][0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn pixfmt_rgba8_blend() {
        let mut pix = Pixfmt::<Rgba8>::new(1,1);
        let black  = Rgba8::new(0,0,0,128);
        let white  = Rgba8::new(255,255,255,128);

        pix.set((0,0), &white);
        pix.copy_or_blend_pix_with_cover((0,0), &black, 255);
        assert_eq!(pix.get((0,0)), Rgba8::new(127,127,127,192));

        pix.set((0,0), &white);
        pix.copy_or_blend_pix_with_cover((0,0), &black, 128);
        assert_eq!(pix.get((0,0)), Rgba8::new(191,191,191,160));
    }
    #[test]
    fn pixfmt_rgba8_copy_opaque() {
        let mut pix = Pixfmt::<Rgba8>::new(2,1);
        pix.fill(&Rgba8::new(255,255,255,0));
        pix.copy_or_blend_pix_with_cover((1,0), &Rgba8::new(255,0,0,255), 255);
        assert_eq!(pix.get((0,0)), Rgba8::new(255,255,255,0));
        assert_eq!(pix.get((1,0)), Rgba8::new(255,0,0,255));
        // Transparent colors are ignored
        pix.copy_or_blend_pix_with_cover((1,0), &Rgba8::new(0,0,0,0), 255);
        assert_eq!(pix.get((1,0)), Rgba8::new(255,0,0,255));
    }
    #[test]
    fn pixfmt_gray8() {
        let mut pix = Pixfmt::<Gray8>::new(3,1);
        assert_eq!(pix.size(), 3);
        pix.blend_hline(0, 0, 3, &Gray8::new(255), 255);
        assert_eq!(pix.value(2,0), 255);
        pix.fill(&Gray8::new(0));
        pix.blend_solid_hspan(0, 0, 3, &Gray8::new(255), &[255, 128, 0]);
        assert_eq!(pix.value(0,0), 255);
        assert_eq!(pix.value(1,0), 128);
        assert_eq!(pix.value(2,0), 0);
    }
}
