//! Bounding boxes and offset arrays

use crate::error::{RenderError, Result};

/// Axis aligned box given by two corners
///
/// The corners are not required to be ordered, see [`Bbox::normalized`]
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Bbox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Bbox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }
    /// Box that contains nothing, every point expands it
    pub fn null() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY)
    }
    /// Build from [x0, y0, x1, y1]
    pub fn from_slice(v: &[f64]) -> Result<Self> {
        match *v {
            [x0, y0, x1, y1] => Ok(Self::new(x0, y0, x1, y1)),
            _ => Err(RenderError::InvalidBbox(v.len())),
        }
    }
    pub fn to_array(&self) -> [f64; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
    /// Corners ordered so that x0 <= x1 and y0 <= y1
    pub fn normalized(&self) -> Self {
        Self::new(self.x0.min(self.x1), self.y0.min(self.y1),
                  self.x0.max(self.x1), self.y0.max(self.y1))
    }
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
    /// Interiors intersect; boxes that only touch do not overlap
    pub fn overlaps(&self, other: &Bbox) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        !(b.x1 <= a.x0 || b.y1 <= a.y0 || b.x0 >= a.x1 || b.y0 >= a.y1)
    }
    /// Grow to include (`x`,`y`)
    pub fn expand(&mut self, x: f64, y: f64) {
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }
}

/// Interpret a flat array as N (x,y) pairs
pub fn offsets_from_slice(v: &[f64]) -> Result<Vec<(f64,f64)>> {
    if v.len() % 2 != 0 {
        return Err(RenderError::InvalidOffsets(v.len()));
    }
    Ok(v.chunks(2).map(|c| (c[0], c[1])).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn from_slice() {
        assert_eq!(Bbox::from_slice(&[0.,1.,2.,3.]).unwrap(), Bbox::new(0.,1.,2.,3.));
        assert!(matches!(Bbox::from_slice(&[0.,1.,2.]), Err(RenderError::InvalidBbox(3))));
    }
    #[test]
    fn overlap_is_strict() {
        let a = Bbox::new(0., 0., 10., 10.);
        assert!(a.overlaps(&Bbox::new(5., 5., 15., 15.)));
        assert!(a.overlaps(&Bbox::new(15., 15., 5., 5.)));
        assert!( ! a.overlaps(&Bbox::new(10., 0., 20., 10.)));
    }
    #[test]
    fn offsets() {
        assert_eq!(offsets_from_slice(&[1.,2.,3.,4.]).unwrap(), vec![(1.,2.),(3.,4.)]);
        let e = offsets_from_slice(&[1.,2.,3.]).unwrap_err();
        assert!(e.to_string().contains("Nx2"));
    }
}
