//! Transformations

use crate::error::{RenderError, Result};
use crate::paths::Vertex;
use crate::paths::PathSource;

use crate::VertexSource;

use std::ops::Mul;

/// Affine Transformation
///
/// ```text
///     x' = sx  * x + shx * y + tx
///     y' = shy * x + sy  * y + ty
/// ```
///
/// Multiplication applies the left hand side first: `a * b` transforms by
/// `a` then by `b`
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Transform {
    pub sx: f64,
    pub sy: f64,
    pub shx: f64,
    pub shy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Creates a new identity Transform
    pub fn new() -> Self {
        Self { sx: 1.0,  sy: 1.0,
               shx: 0.0, shy: 0.0,
               tx: 0.0,  ty: 0.0,
        }
    }
    /// Create from the six matrix coefficients (a,b,c,d,e,f)
    ///
    /// ```text
    ///     x' = a * x + c * y + e
    ///     y' = b * x + d * y + f
    /// ```
    pub fn from_matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { sx: a, shy: b, shx: c, sy: d, tx: e, ty: f }
    }
    /// Coefficients as (a,b,c,d,e,f)
    pub fn to_matrix(&self) -> [f64; 6] {
        [self.sx, self.shy, self.shx, self.sy, self.tx, self.ty]
    }
    /// Add a translation to the transform
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.tx += dx;
        self.ty += dy;
    }
    /// Add a scaling to the transform
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.sx  *= sx;
        self.shx *= sx;
        self.tx  *= sx;
        self.sy  *= sy;
        self.shy *= sy;
        self.ty  *= sy;
    }
    /// Add a rotation to the transform
    ///
    /// angle is in radians
    pub fn rotate(&mut self, angle: f64) {
        let ca = angle.cos();
        let sa = angle.sin();
        let t0   = self.sx  * ca - self.shy * sa;
        let t2   = self.shx * ca - self.sy  * sa;
        let t4   = self.tx  * ca - self.ty  * sa;
        self.shy = self.sx  * sa + self.shy * ca;
        self.sy  = self.shx * sa + self.sy  * ca;
        self.ty  = self.tx  * sa + self.ty  * ca;
        self.sx  = t0;
        self.shx = t2;
        self.tx  = t4;
    }

    /// Perform the transform
    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.sx  + y * self.shx + self.tx,
         x * self.shy + y * self.sy  + self.ty)
    }
    /// Transform a single point, `None` if the result is not finite
    pub fn transform_finite(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (x, y) = self.transform(x, y);
        if x.is_finite() && y.is_finite() {
            Some((x, y))
        } else {
            None
        }
    }
    fn determinant(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }
    /// Return the inverse transform
    pub fn invert(&self) -> Result<Transform> {
        let det = self.determinant();
        if det == 0.0 || ! det.is_finite() {
            return Err(RenderError::SingularTransform);
        }
        let d = 1.0 / det;
        let sx  =  self.sy * d;
        let sy  =  self.sx * d;
        let shy = -self.shy * d;
        let shx = -self.shx * d;
        let tx  = -self.tx * sx  - self.ty * shx;
        let ty  = -self.tx * shy - self.ty * sy;
        Ok(Transform { sx, sy, shx, shy, tx, ty })
    }
    /// Apply `self` then `m`
    pub fn mul_transform(&self, m: &Transform) -> Self {
        let t0  = self.sx  * m.sx  + self.shy * m.shx;
        let t2  = self.shx * m.sx  + self.sy  * m.shx;
        let t4  = self.tx  * m.sx  + self.ty  * m.shx + m.tx;
        let shy = self.sx  * m.shy + self.shy * m.sy;
        let sy  = self.shx * m.shy + self.sy  * m.sy;
        let ty  = self.tx  * m.shy + self.ty  * m.sy + m.ty;
        let sx  = t0;
        let shx = t2;
        let tx  = t4;
        Transform { sx, sy, tx, ty, shx, shy }
    }
    pub fn new_scale(sx: f64, sy: f64) -> Transform {
        let mut t = Self::new();
        t.scale(sx,sy);
        t
    }
    pub fn new_translate(tx: f64, ty: f64) -> Transform {
        let mut t = Self::new();
        t.translate(tx,ty);
        t
    }
    pub fn new_rotate(ang: f64) -> Transform {
        let mut t = Self::new();
        t.rotate(ang);
        t
    }
}

impl Mul<Transform> for Transform {
    type Output = Transform;
    fn mul(self, rhs: Transform) -> Self {
        self.mul_transform(&rhs)
    }
}

/// Path Transform
///
/// Stop and Close vertices pass through untouched
#[derive(Debug)]
pub struct ConvTransform<T> {
    /// Source Path to Transform
    pub source: T,
    /// Transform to apply
    pub trans: Transform,
}

impl<T: VertexSource> VertexSource for ConvTransform<T> {
    fn rewind(&mut self, path_id: usize) {
        self.source.rewind(path_id);
    }
    fn vertex(&mut self) -> Vertex<f64> {
        let v = self.source.vertex();
        if v.cmd.is_vertex() {
            let (x,y) = self.trans.transform(v.x, v.y);
            Vertex::new(x, y, v.cmd)
        } else {
            v
        }
    }
}

impl<T: PathSource> PathSource for ConvTransform<T> {
    fn total_vertices(&self) -> usize { self.source.total_vertices() }
    fn has_curves(&self) -> bool { self.source.has_curves() }
    fn should_simplify(&self) -> bool { self.source.should_simplify() }
    fn simplify_threshold(&self) -> f64 { self.source.simplify_threshold() }
}

impl<T: VertexSource> ConvTransform<T> {
    /// Create a new Path Transform
    pub fn new(source: T, trans: Transform) -> Self {
        Self { source, trans }
    }
}

/// Transform a list of points
pub fn affine_transform(points: &[(f64,f64)], trans: &Transform) -> Vec<(f64,f64)> {
    points.iter().map(|&(x,y)| trans.transform(x,y)).collect()
}
