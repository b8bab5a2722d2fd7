//! Saved regions of the pixel buffer

use log::debug;

use crate::base::RenderingBase;
use crate::clip::Rectangle;
use crate::color::Rgba8;
use crate::error::{RenderError, Result};
use crate::pixfmt::Pixfmt;
use crate::Pixel;

/// Copy of a rectangle of the pixel buffer
///
/// `rect` is half open, in device pixels with a top left origin
#[derive(Debug,Clone)]
pub struct BufferRegion {
    rect: Rectangle<i64>,
    pixf: Pixfmt<Rgba8>,
}

impl BufferRegion {
    /// Copy `rect` out of `src`, pixels outside of `src` are transparent
    pub fn copy_from(src: &Pixfmt<Rgba8>, rect: Rectangle<i64>) -> Self {
        let w = (rect.x2 - rect.x1).max(0) as usize;
        let h = (rect.y2 - rect.y1).max(0) as usize;
        let mut base = RenderingBase::new(Pixfmt::<Rgba8>::new(w, h));
        if w > 0 && h > 0 {
            base.copy_from(src.rbuf(), &rect, -rect.x1, -rect.y1);
        }
        debug!("copy region {:?}", rect);
        Self { rect, pixf: base.pixf }
    }
    /// Saved rectangle, (x1, y1, x2, y2) half open
    pub fn rect(&self) -> Rectangle<i64> {
        self.rect
    }
    pub fn width(&self) -> usize {
        self.pixf.width()
    }
    pub fn height(&self) -> usize {
        self.pixf.height()
    }
    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.pixf.rbuf().stride()
    }
    /// Saved pixels, RGBA, top row first
    pub fn data(&self) -> &[u8] {
        self.pixf.pixeldata()
    }
    /// Saved pixels as ARGB
    pub fn to_string_argb(&self) -> Vec<u8> {
        self.data().chunks(4)
            .flat_map(|p| vec![p[3], p[0], p[1], p[2]])
            .collect()
    }
    /// Move the region, later restores go to the new location
    pub fn set_origin(&mut self, x: i64, y: i64) {
        let (w, h) = (self.rect.x2 - self.rect.x1, self.rect.y2 - self.rect.y1);
        self.rect = Rectangle::new(x, y, x + w, y + h);
    }
    /// Copy the whole region back to where it was saved
    pub fn restore<T: Pixel>(&self, dst: &mut RenderingBase<T>) -> Result<()> {
        if self.width() == 0 || self.height() == 0 {
            return Err(RenderError::EmptyRegion);
        }
        let all = Rectangle::new(0, 0, self.width() as i64, self.height() as i64);
        dst.copy_from(self.pixf.rbuf(), &all, self.rect.x1, self.rect.y1);
        Ok(())
    }
    /// Copy the part `sub` of the region to (`x`,`y`)
    ///
    /// `sub` is given in device pixels and must lie inside the saved
    /// rectangle
    pub fn restore_rect<T: Pixel>(&self, dst: &mut RenderingBase<T>,
                                  sub: Rectangle<i64>, x: i64, y: i64) -> Result<()> {
        if self.width() == 0 || self.height() == 0 || sub.x1 == sub.x2 || sub.y1 == sub.y2 {
            return Err(RenderError::EmptyRegion);
        }
        let r = &self.rect;
        if sub.x1 < r.x1 || sub.y1 < r.y1 || sub.x2 > r.x2 || sub.y2 > r.y2 {
            return Err(RenderError::RegionOutOfBounds);
        }
        let local = Rectangle::new(sub.x1 - r.x1, sub.y1 - r.y1,
                                   sub.x2 - r.x1, sub.y2 - r.y1);
        dst.copy_from(self.pixf.rbuf(), &local, x - local.x1, y - local.y1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Pixfmt<Rgba8> {
        let mut pix = Pixfmt::<Rgba8>::new(4, 4);
        for y in 0 .. 4 {
            for x in 0 .. 4 {
                pix.set((x, y), &Rgba8::new(x as u8, y as u8, 0, 255));
            }
        }
        pix
    }
    #[test]
    fn copy_and_restore() {
        let pix = canvas();
        let region = BufferRegion::copy_from(&pix, Rectangle::new(1, 1, 3, 4));
        assert_eq!((region.width(), region.height(), region.stride()), (2, 3, 8));
        assert_eq!(region.rect(), Rectangle::new(1, 1, 3, 4));
        assert_eq!(&region.data()[0..4], &[1, 1, 0, 255]);
        assert_eq!(&region.to_string_argb()[0..4], &[255, 1, 1, 0]);

        let mut base = RenderingBase::new(Pixfmt::<Rgba8>::new(4, 4));
        region.restore(&mut base).unwrap();
        assert_eq!(base.pixf.get((2, 3)), Rgba8::new(2, 3, 0, 255));
        assert_eq!(base.pixf.get((0, 0)), Rgba8::new(0, 0, 0, 0));
    }
    #[test]
    fn restore_part() {
        let pix = canvas();
        let region = BufferRegion::copy_from(&pix, Rectangle::new(0, 0, 4, 4));
        let mut base = RenderingBase::new(Pixfmt::<Rgba8>::new(4, 4));
        region.restore_rect(&mut base, Rectangle::new(2, 2, 3, 3), 0, 0).unwrap();
        assert_eq!(base.pixf.get((0, 0)), Rgba8::new(2, 2, 0, 255));
        assert_eq!(base.pixf.get((1, 1)), Rgba8::new(0, 0, 0, 0));
    }
    #[test]
    fn restore_errors() {
        let pix = canvas();
        let region = BufferRegion::copy_from(&pix, Rectangle::new(1, 1, 3, 3));
        let mut base = RenderingBase::new(Pixfmt::<Rgba8>::new(4, 4));
        let e = region.restore_rect(&mut base, Rectangle::new(0, 0, 2, 2), 0, 0);
        assert!(matches!(e, Err(RenderError::RegionOutOfBounds)));
        let empty = BufferRegion::copy_from(&pix, Rectangle::new(1, 1, 1, 3));
        assert!(matches!(empty.restore(&mut base), Err(RenderError::EmptyRegion)));
    }
}
