//! Colors

use crate::Color;

/// Convert an f64 [0,1] component to a u8 [0,255] component
///
/// Values outside of [0,1] are clamped
pub fn cu8(v: f64) -> u8 {
    let v = if v.is_nan() { 0.0 } else { v };
    (v.max(0.0).min(1.0) * 255.0).round() as u8
}

fn color_u8_to_f64(x: u8) -> f64 {
    f64::from(x) / 255.0
}

/// Color as Red, Green, Blue, and Alpha
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct Rgba8 {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba8 {
    /// White Color (255,255,255,255)
    pub fn white() -> Self {
        Self::new(255,255,255,255)
    }
    /// Black Color (0,0,0,255)
    pub fn black() -> Self {
        Self::new(0,0,0,255)
    }
    /// Create new color
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba8 { r, g, b, a }
    }
    /// Convert from any color
    pub fn from_trait<C: Color>(c: &C) -> Self {
        Self::new(c.red8(), c.green8(), c.blue8(), c.alpha8())
    }
}

impl Color for Rgba8 {
    fn   red(&self) -> f64 { color_u8_to_f64(self.r) }
    fn green(&self) -> f64 { color_u8_to_f64(self.g) }
    fn  blue(&self) -> f64 { color_u8_to_f64(self.b) }
    fn alpha(&self) -> f64 { color_u8_to_f64(self.a) }
    fn alpha8(&self) -> u8 { self.a }
    fn red8(&self) -> u8 { self.r }
    fn green8(&self) -> u8 { self.g }
    fn blue8(&self) -> u8 { self.b }
}

/// Gray scale with Alpha
///
/// Used for the clip path alpha mask
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct Gray8 {
    /// Gray value
    pub value: u8,
    /// Alpha
    pub alpha: u8,
}

impl Gray8 {
    /// Create a new, opaque gray scale value
    pub fn new(value: u8) -> Self {
        Self { value, alpha: 255 }
    }
    /// Create a new gray scale value with an alpha
    pub fn new_with_alpha(value: u8, alpha: u8) -> Self {
        Self { value, alpha }
    }
    /// Convert from any color using the luminance of the color
    pub fn from_trait<C: Color>(c: &C) -> Self {
        let lum = (u32::from(c.red8()) * 77 +
                   u32::from(c.green8()) * 150 +
                   u32::from(c.blue8()) * 29) >> 8;
        Self::new_with_alpha(lum as u8, c.alpha8())
    }
}

impl Color for Gray8 {
    fn   red(&self) -> f64 { color_u8_to_f64(self.value) }
    fn green(&self) -> f64 { color_u8_to_f64(self.value) }
    fn  blue(&self) -> f64 { color_u8_to_f64(self.value) }
    fn alpha(&self) -> f64 { color_u8_to_f64(self.alpha) }
    fn alpha8(&self) -> u8 { self.alpha }
    fn red8(&self) -> u8 { self.value }
    fn green8(&self) -> u8 { self.value }
    fn blue8(&self) -> u8 { self.value }
}

/// Color as floating point Red, Green, Blue, Alpha in [0,1]
///
/// This is the color representation handed to the drawing operations
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Create a new color
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
    /// Black
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
    /// Same color with a new alpha
    pub fn with_alpha(&self, a: f64) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

impl Color for Rgba {
    fn   red(&self) -> f64 { self.r }
    fn green(&self) -> f64 { self.g }
    fn  blue(&self) -> f64 { self.b }
    fn alpha(&self) -> f64 { self.a }
    fn alpha8(&self) -> u8 { cu8(self.a) }
    fn red8(&self) -> u8 { cu8(self.r) }
    fn green8(&self) -> u8 { cu8(self.g) }
    fn blue8(&self) -> u8 { cu8(self.b) }
}

impl From<Rgba> for Rgba8 {
    fn from(c: Rgba) -> Rgba8 {
        Rgba8::from_trait(&c)
    }
}
