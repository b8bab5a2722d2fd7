//! Alpha Mask for clip paths

use crate::color::Gray8;
use crate::color::Rgba8;
use crate::math::mask_cover;
use crate::paths::PathId;
use crate::pixfmt::Pixfmt;
use crate::transform::Transform;

use crate::Color;
use crate::Pixel;

/// Pixel format adaptor that multiplies every coverage by a mask value
///
/// Used to draw through a clip path: mask value 255 draws normally, 0
/// blocks the pixel
#[derive(Debug)]
pub struct AlphaMaskAdaptor<'a, T> {
    pub pixf: &'a mut T,
    pub mask: &'a Pixfmt<Gray8>,
}

impl<'a, T> AlphaMaskAdaptor<'a, T> where T: Pixel {
    /// Create a new adaptor, mask and pixel format must have the same size
    pub fn new(pixf: &'a mut T, mask: &'a Pixfmt<Gray8>) -> Self {
        Self { pixf, mask }
    }
    fn masked(&self, id: (usize, usize), cover: u64) -> u64 {
        mask_cover(cover, self.mask.value(id.0, id.1))
    }
}

impl<'a, T> Pixel for AlphaMaskAdaptor<'a, T> where T: Pixel {
    fn bpp() -> usize { T::bpp() }
    fn width(&self) -> usize {
        self.pixf.width()
    }
    fn height(&self) -> usize {
        self.pixf.height()
    }
    fn get(&self, id: (usize, usize)) -> Rgba8 {
        self.pixf.get(id)
    }
    fn set<C: Color>(&mut self, id: (usize, usize), c: &C) {
        let cover = self.masked(id, T::cover_mask());
        self.pixf.copy_or_blend_pix_with_cover(id, c, cover);
    }
    fn blend_pix<C: Color>(&mut self, id: (usize, usize), c: &C, cover: u64) {
        let cover = self.masked(id, cover);
        self.pixf.blend_pix(id, c, cover);
    }
    fn copy_or_blend_pix_with_cover<C: Color>(&mut self, id: (usize, usize), c: &C, cover: u64) {
        let cover = self.masked(id, cover);
        self.pixf.copy_or_blend_pix_with_cover(id, c, cover);
    }
}

/// Single entry cache of a rendered clip path
///
/// The mask is only re-rendered when the path identity or the transform
/// differs from the last one rendered
#[derive(Debug,Clone)]
pub struct ClipMask {
    /// Mask coverage, one byte per pixel
    pub mask: Pixfmt<Gray8>,
    key: Option<(PathId, Transform)>,
}

impl ClipMask {
    /// Create an empty mask
    pub fn new(width: usize, height: usize) -> Self {
        Self { mask: Pixfmt::<Gray8>::new(width, height), key: None }
    }
    /// Mask was rendered from this path and transform
    pub fn is_current(&self, id: PathId, trans: &Transform) -> bool {
        match self.key {
            Some((kid, ref ktrans)) => kid == id && ktrans == trans,
            None => false,
        }
    }
    /// Clear the mask to 0 and forget the cached key
    pub fn clear(&mut self) {
        self.mask.fill(&Gray8::new(0));
        self.key = None;
    }
    /// Record the key of the freshly rendered mask
    pub fn set_key(&mut self, id: PathId, trans: Transform) {
        self.key = Some((id, trans));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn masked_blend() {
        let mut pix = Pixfmt::<Rgba8>::new(3,1);
        let mut mask = Pixfmt::<Gray8>::new(3,1);
        mask.set((0,0), &Gray8::new(255));
        mask.set((1,0), &Gray8::new(0));
        mask.set((2,0), &Gray8::new(128));
        let red = Rgba8::new(255,0,0,255);
        {
            let mut ad = AlphaMaskAdaptor::new(&mut pix, &mask);
            ad.blend_hline(0, 0, 3, &red, 255);
        }
        assert_eq!(pix.get((0,0)), red);
        assert_eq!(pix.get((1,0)), Rgba8::new(0,0,0,0));
        assert_eq!(pix.get((2,0)).a, 128);
    }
    #[test]
    fn cache_key() {
        let mut cm = ClipMask::new(2,2);
        let t = Transform::new();
        let id = PathId::next();
        assert!( ! cm.is_current(id, &t));
        cm.set_key(id, t);
        assert!(cm.is_current(id, &t));
        assert!( ! cm.is_current(id, &Transform::new_translate(1.0, 0.0)));
        assert!( ! cm.is_current(PathId::next(), &t));
        cm.clear();
        assert!( ! cm.is_current(id, &t));
    }
}
