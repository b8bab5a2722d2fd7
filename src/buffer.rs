//! Rendering buffer

use std::ops::Index;
use std::ops::IndexMut;

/// Rendering Buffer
///
/// Data is stored as row-major order (C-format), top row first
#[derive(Debug,Default,Clone,PartialEq)]
pub struct RenderingBuffer {
    /// Pixel / Component level data of Image
    pub data: Vec<u8>,
    /// Image Width in pixels
    pub width: usize,
    /// Image Height in pixels
    pub height: usize,
    /// Bytes per pixel or number of color components
    pub bpp: usize,
}

impl RenderingBuffer {
    /// Create a new buffer of width, height, and bpp
    ///
    /// Data for the Image is allocated and zeroed
    pub fn new(width: usize, height: usize, bpp: usize) -> Self {
        RenderingBuffer {
            width, height, bpp, data: vec![0u8; width * height * bpp]
        }
    }
    /// Size of underlying Rendering Buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }
    /// Buffer holds no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.width * self.bpp
    }
    /// Slice of a single row
    pub fn row(&self, y: usize) -> &[u8] {
        let s = self.stride();
        &self.data[y * s .. (y+1) * s]
    }
    /// Set every byte to `v`
    pub fn fill(&mut self, v: u8) {
        self.data.iter_mut().for_each(|x| *x = v);
    }
}

impl Index<(usize,usize)> for RenderingBuffer {
    type Output = [u8];
    fn index(&self, index: (usize, usize)) -> &[u8] {
        debug_assert!(index.0 < self.width, "request {} >= {} width :: index", index.0, self.width);
        debug_assert!(index.1 < self.height, "request {} >= {} height :: index", index.1, self.height);
        let i = ((index.1 * self.width) + index.0) * self.bpp;
        &self.data[i .. i + self.bpp]
    }
}
impl IndexMut<(usize,usize)> for RenderingBuffer {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut [u8] {
        debug_assert!(index.0 < self.width, "request {} >= {} width :: index_mut", index.0, self.width);
        debug_assert!(index.1 < self.height, "request {} >= {} height :: index_mut", index.1, self.height);
        let i = ((index.1 * self.width) + index.0) * self.bpp;
        &mut self.data[i .. i + self.bpp]
    }
}
