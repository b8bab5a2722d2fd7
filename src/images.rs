//! Images and glyph bitmaps handed to the renderer

use std::str::FromStr;

use crate::color::Rgba8;
use crate::error::{RenderError, Result};

/// Row order of a [`RasterImage`]
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum Origin {
    /// Row 0 is the top row
    Upper,
    /// Row 0 is the bottom row
    Lower,
}

impl FromStr for Origin {
    type Err = RenderError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "upper" => Ok(Origin::Upper),
            "lower" => Ok(Origin::Lower),
            _ => Err(RenderError::InvalidOrigin(s.to_string())),
        }
    }
}

/// RGBA8 image, `rows` x `cols`, rows packed without padding
#[derive(Debug,Clone,PartialEq)]
pub struct RasterImage {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Create an image, `data` must hold rows * cols * 4 bytes
    pub fn new(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self> {
        let expected = rows * cols * 4;
        if data.len() != expected {
            return Err(RenderError::LengthMismatch { what: "image data",
                                                     expected,
                                                     found: data.len() });
        }
        Ok(Self { rows, cols, data })
    }
    /// Image filled with a single color
    pub fn filled(rows: usize, cols: usize, c: Rgba8) -> Self {
        let data = [c.r, c.g, c.b, c.a].iter().cloned()
            .cycle()
            .take(rows * cols * 4)
            .collect();
        Self { rows, cols, data }
    }
    /// Pixel at (`col`, `row`)
    pub fn get(&self, col: usize, row: usize) -> Rgba8 {
        let i = (row * self.cols + col) * 4;
        let p = &self.data[i .. i + 4];
        Rgba8::new(p[0], p[1], p[2], p[3])
    }
}

/// 8 bit coverage bitmap of rendered text
///
/// `offset_x` and `offset_y` shift the bitmap from the drawing position
#[derive(Debug,Clone,PartialEq)]
pub struct GlyphImage {
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub offset_x: i64,
    pub offset_y: i64,
    pub buffer: Vec<u8>,
}

impl GlyphImage {
    /// Create a bitmap, `buffer` must hold stride * height bytes
    pub fn new(width: usize, height: usize, stride: usize, buffer: Vec<u8>) -> Result<Self> {
        let glyph = Self { width, height, stride, offset_x: 0, offset_y: 0, buffer };
        glyph.check()?;
        Ok(glyph)
    }
    /// Check that rows fit in the stride and the buffer holds every row
    pub fn check(&self) -> Result<()> {
        if self.stride < self.width {
            return Err(RenderError::LengthMismatch { what: "glyph stride",
                                                     expected: self.width,
                                                     found: self.stride });
        }
        let needed = self.stride * self.height;
        if self.buffer.len() < needed {
            return Err(RenderError::LengthMismatch { what: "glyph buffer",
                                                     expected: needed,
                                                     found: self.buffer.len() });
        }
        Ok(())
    }
    /// Coverage at (`x`, `y`), 0 outside of the bitmap
    pub fn coverage(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0;
        }
        self.buffer[y as usize * self.stride + x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn origin_names() {
        assert_eq!("upper".parse::<Origin>().unwrap(), Origin::Upper);
        assert_eq!("lower".parse::<Origin>().unwrap(), Origin::Lower);
        let e = "middle".parse::<Origin>().unwrap_err();
        assert!(e.to_string().contains("middle"));
    }
    #[test]
    fn image_sizes() {
        assert!(RasterImage::new(2, 2, vec![0; 15]).is_err());
        let im = RasterImage::filled(2, 3, Rgba8::new(1, 2, 3, 4));
        assert_eq!(im.data.len(), 24);
        assert_eq!(im.get(2, 1), Rgba8::new(1, 2, 3, 4));
    }
    #[test]
    fn glyph_coverage() {
        let g = GlyphImage::new(2, 2, 3, vec![1, 2, 0, 3, 4, 0]).unwrap();
        assert_eq!(g.coverage(1, 1), 4);
        assert_eq!(g.coverage(2, 0), 0);
        assert_eq!(g.coverage(-1, 0), 0);
        assert!(GlyphImage::new(2, 2, 1, vec![0; 4]).is_err());
    }
}
