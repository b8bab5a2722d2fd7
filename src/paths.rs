//! Paths, Vertices and Path Commands

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{RenderError, Result};
use crate::VertexSource;

/// Command attached to each vertex
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum PathCommand {
    /// End of the vertex stream
    Stop,
    /// Start a new sub path
    MoveTo,
    /// Straight line from the previous vertex
    LineTo,
    /// Quadratic Bezier, control point followed by the end point
    Curve3,
    /// Cubic Bezier, two control points followed by the end point
    Curve4,
    /// Close the current sub path; the coordinates are not used
    Close,
}
impl Default for PathCommand {
    fn default() -> PathCommand {
        PathCommand::MoveTo
    }
}

/// Path code of the end of the stream
pub const STOP : u8 = 0;
/// Path code of a move to
pub const MOVETO : u8 = 1;
/// Path code of a line to
pub const LINETO : u8 = 2;
/// Path code of a quadratic curve point
pub const CURVE3 : u8 = 3;
/// Path code of a cubic curve point
pub const CURVE4 : u8 = 4;
/// Path code closing a polygon
pub const CLOSEPOLY : u8 = 79;

impl PathCommand {
    /// Convert from the numeric path code
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            STOP => Ok(PathCommand::Stop),
            MOVETO => Ok(PathCommand::MoveTo),
            LINETO => Ok(PathCommand::LineTo),
            CURVE3 => Ok(PathCommand::Curve3),
            CURVE4 => Ok(PathCommand::Curve4),
            CLOSEPOLY => Ok(PathCommand::Close),
            _ => Err(RenderError::InvalidPathCode(code)),
        }
    }
    /// Numeric path code
    pub fn code(self) -> u8 {
        match self {
            PathCommand::Stop => STOP,
            PathCommand::MoveTo => MOVETO,
            PathCommand::LineTo => LINETO,
            PathCommand::Curve3 => CURVE3,
            PathCommand::Curve4 => CURVE4,
            PathCommand::Close => CLOSEPOLY,
        }
    }
    /// Command carries a real vertex (not Stop or Close)
    pub fn is_vertex(self) -> bool {
        match self {
            PathCommand::Stop | PathCommand::Close => false,
            _ => true,
        }
    }
    /// Command is part of a curve
    pub fn is_curve(self) -> bool {
        self == PathCommand::Curve3 || self == PathCommand::Curve4
    }
}

/// Point with a Path Command
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Vertex<T> {
    pub x: T,
    pub y: T,
    pub cmd: PathCommand
}

impl<T> Vertex<T> {
    pub fn new(x: T, y: T, cmd: PathCommand) -> Self {
        Self { x, y, cmd }
    }
    pub fn move_to(x: T, y: T) -> Self {
        Self { x, y, cmd: PathCommand::MoveTo }
    }
    pub fn line_to(x: T, y: T) -> Self {
        Self { x, y, cmd: PathCommand::LineTo }
    }
    pub fn close_polygon(x: T, y: T) -> Self {
        Self { x, y, cmd: PathCommand::Close }
    }
}
impl Vertex<f64> {
    /// End of the stream
    pub fn stop() -> Self {
        Self { x: 0.0, y: 0.0, cmd: PathCommand::Stop }
    }
    /// Both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Distance between two vertices
pub fn len(a: &Vertex<f64>, b: &Vertex<f64>) -> f64 {
    ((a.x-b.x).powi(2) + (a.y-b.y).powi(2)).sqrt()
}
/// Cross product of (p - p2) and (p2 - p1)
pub fn cross(p1: &Vertex<f64>, p2: &Vertex<f64>, p: &Vertex<f64>) -> f64 {
    (p.x - p2.x) * (p2.y - p1.y) - (p.y - p2.y) * (p2.x - p1.x)
}

/// Split a vertex stream into sub paths
///
/// Returns (start, end, closed) with `end` exclusive; Close vertices are
/// not included in the range
pub fn split(path: &[Vertex<f64>]) -> Vec<(usize, usize, bool)> {
    let mut out = vec![];
    let mut start : Option<usize> = None;
    for (i, v) in path.iter().enumerate() {
        match v.cmd {
            PathCommand::MoveTo => {
                if let Some(s) = start {
                    out.push((s, i, false));
                }
                start = Some(i);
            },
            PathCommand::LineTo | PathCommand::Curve3 | PathCommand::Curve4 => {
                if start.is_none() {
                    start = Some(i);
                }
            },
            PathCommand::Close => {
                if let Some(s) = start {
                    out.push((s, i, true));
                }
                start = None;
            },
            PathCommand::Stop => break,
        }
    }
    if let Some(s) = start {
        out.push((s, path.len(), false));
    }
    out
}

static NEXT_PATH_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a Path
///
/// Every constructed or cloned path has a distinct identity; two paths
/// with the same geometry are different paths
#[derive(Debug,Copy,Clone,PartialEq,Eq,Hash)]
pub struct PathId(u64);

impl PathId {
    /// Allocate a new identity
    pub fn next() -> Self {
        PathId(NEXT_PATH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Paths with at least this many vertices are simplified
const SIMPLIFY_MIN_VERTICES : usize = 128;
/// Default simplification threshold, in pixels
pub const SIMPLIFY_THRESHOLD : f64 = 1.0 / 9.0;

/// Properties of a path needed by the drawing pipeline
pub trait PathSource: VertexSource {
    /// Number of stored vertices
    fn total_vertices(&self) -> usize;
    /// Path contains Curve3 or Curve4 vertices
    fn has_curves(&self) -> bool;
    /// Path should be run through the simplifier
    fn should_simplify(&self) -> bool;
    /// Simplification threshold in pixels
    fn simplify_threshold(&self) -> f64;
}

/// Vertices with commands
///
/// The path is built once and then only iterated
#[derive(Debug)]
pub struct Path {
    vertices: Vec<Vertex<f64>>,
    id: PathId,
    simplify: bool,
    simplify_threshold: f64,
}

impl Default for Path {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Path {
    /// Cloned paths get a new identity
    fn clone(&self) -> Self {
        Self { vertices: self.vertices.clone(),
               id: PathId::next(),
               simplify: self.simplify,
               simplify_threshold: self.simplify_threshold,
        }
    }
}

impl Path {
    /// Create an empty path
    pub fn new() -> Self {
        Self { vertices: vec![], id: PathId::next(),
               simplify: true, simplify_threshold: SIMPLIFY_THRESHOLD }
    }
    /// Create a path from vertices and optional numeric codes
    ///
    /// Without codes the first vertex is a move to and all others are
    /// line tos
    pub fn from_codes(vertices: &[(f64,f64)], codes: Option<&[u8]>) -> Result<Self> {
        let mut p = Self::new();
        match codes {
            Some(codes) => {
                if codes.len() != vertices.len() {
                    return Err(RenderError::LengthMismatch {
                        what: "path codes", expected: vertices.len(), found: codes.len()
                    });
                }
                for (&(x,y), &c) in vertices.iter().zip(codes.iter()) {
                    let cmd = PathCommand::from_code(c)?;
                    if cmd == PathCommand::Stop {
                        break;
                    }
                    p.vertices.push(Vertex::new(x, y, cmd));
                }
            },
            None => {
                for (i, &(x,y)) in vertices.iter().enumerate() {
                    let cmd = if i == 0 { PathCommand::MoveTo } else { PathCommand::LineTo };
                    p.vertices.push(Vertex::new(x, y, cmd));
                }
            },
        }
        Ok(p)
    }
    /// Create a closed polygon from points
    pub fn polygon(points: &[(f64,f64)]) -> Self {
        let mut p = Self::new();
        for (i, &(x,y)) in points.iter().enumerate() {
            if i == 0 {
                p.move_to(x, y);
            } else {
                p.line_to(x, y);
            }
        }
        p.close_polygon();
        p
    }
    /// Identity of the path
    pub fn id(&self) -> PathId {
        self.id
    }
    /// Stored vertices
    pub fn vertices(&self) -> &[Vertex<f64>] {
        &self.vertices
    }
    /// Numeric codes of the stored vertices
    pub fn codes(&self) -> Vec<u8> {
        self.vertices.iter().map(|v| v.cmd.code()).collect()
    }
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.vertices.push( Vertex::move_to(x,y) );
    }
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.vertices.push( Vertex::line_to(x,y) );
    }
    /// Quadratic Bezier from the current point through control (`cx`,`cy`)
    pub fn curve3(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.vertices.push( Vertex::new(cx, cy, PathCommand::Curve3) );
        self.vertices.push( Vertex::new(x, y, PathCommand::Curve3) );
    }
    /// Cubic Bezier from the current point through two control points
    pub fn curve4(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) {
        self.vertices.push( Vertex::new(cx1, cy1, PathCommand::Curve4) );
        self.vertices.push( Vertex::new(cx2, cy2, PathCommand::Curve4) );
        self.vertices.push( Vertex::new(x, y, PathCommand::Curve4) );
    }
    /// Close the current sub path
    ///
    /// Ignored on an empty path or directly after another close
    pub fn close_polygon(&mut self) {
        let last = match self.vertices.last() {
            Some(v) => *v,
            None => return,
        };
        if last.cmd != PathCommand::Close {
            self.vertices.push( Vertex::close_polygon(0.0, 0.0) );
        }
    }
    /// Enable or disable simplification of this path
    pub fn set_simplify(&mut self, simplify: bool) {
        self.simplify = simplify;
    }
    /// Set the simplification threshold in pixels
    pub fn set_simplify_threshold(&mut self, threshold: f64) {
        self.simplify_threshold = threshold;
    }
    /// Path contains curves
    pub fn has_curves(&self) -> bool {
        self.vertices.iter().any(|v| v.cmd.is_curve())
    }
    /// Simplification is enabled, the path is long and has only straight lines
    pub fn should_simplify(&self) -> bool {
        self.simplify &&
            self.vertices.len() >= SIMPLIFY_MIN_VERTICES &&
            self.vertices.iter().all(|v| match v.cmd {
                PathCommand::MoveTo | PathCommand::LineTo => true,
                _ => false,
            })
    }
    pub fn simplify_threshold(&self) -> f64 {
        self.simplify_threshold
    }
    pub fn total_vertices(&self) -> usize {
        self.vertices.len()
    }
    /// Iterate over the path as a vertex source
    pub fn iter(&self) -> PathIterator<'_> {
        PathIterator::new(self)
    }
}

/// Vertex source over a borrowed Path
#[derive(Debug,Clone)]
pub struct PathIterator<'a> {
    path: &'a Path,
    pos: usize,
}

impl<'a> PathIterator<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self { path, pos: 0 }
    }
}

impl<'a> VertexSource for PathIterator<'a> {
    fn rewind(&mut self, _path_id: usize) {
        self.pos = 0;
    }
    fn vertex(&mut self) -> Vertex<f64> {
        match self.path.vertices.get(self.pos) {
            Some(v) => {
                self.pos += 1;
                *v
            },
            None => Vertex::stop(),
        }
    }
}

impl<'a> PathSource for PathIterator<'a> {
    fn total_vertices(&self) -> usize {
        self.path.total_vertices()
    }
    fn has_curves(&self) -> bool {
        self.path.has_curves()
    }
    fn should_simplify(&self) -> bool {
        self.path.should_simplify()
    }
    fn simplify_threshold(&self) -> f64 {
        self.path.simplify_threshold()
    }
}

/// Vertex source over an owned list of vertices
///
/// Used for generated outlines, e.g. strokes and dashes
#[derive(Debug,Clone,Default)]
pub struct VertexList {
    pub vertices: Vec<Vertex<f64>>,
    pos: usize,
}

impl VertexList {
    pub fn new(vertices: Vec<Vertex<f64>>) -> Self {
        Self { vertices, pos: 0 }
    }
}

impl VertexSource for VertexList {
    fn rewind(&mut self, _path_id: usize) {
        self.pos = 0;
    }
    fn vertex(&mut self) -> Vertex<f64> {
        match self.vertices.get(self.pos) {
            Some(v) => {
                self.pos += 1;
                *v
            },
            None => Vertex::stop(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn codes_round_trip() {
        let p = Path::from_codes(&[(0.,0.),(1.,0.),(2.,1.),(3.,1.),(0.,0.)],
                                 Some(&[MOVETO, LINETO, CURVE3, CURVE3, CLOSEPOLY])).unwrap();
        assert_eq!(p.codes(), vec![1, 2, 3, 3, 79]);
        assert!(p.has_curves());
        assert!( ! p.should_simplify());
    }
    #[test]
    fn bad_codes() {
        let e = Path::from_codes(&[(0.,0.),(1.,0.)], Some(&[MOVETO, 7]));
        assert!(matches!(e, Err(RenderError::InvalidPathCode(7))));
        let e = Path::from_codes(&[(0.,0.),(1.,0.)], Some(&[MOVETO]));
        assert!(matches!(e, Err(RenderError::LengthMismatch { expected: 2, found: 1, .. })));
    }
    #[test]
    fn identity_on_clone() {
        let p = Path::polygon(&[(0.,0.),(1.,0.),(1.,1.)]);
        let q = p.clone();
        assert_ne!(p.id(), q.id());
        assert_eq!(p.vertices(), q.vertices());
    }
    #[test]
    fn simplify_heuristic() {
        let pts : Vec<_> = (0..200).map(|i| (i as f64, 0.0)).collect();
        let mut p = Path::from_codes(&pts, None).unwrap();
        assert!(p.should_simplify());
        p.set_simplify(false);
        assert!( ! p.should_simplify());
    }
    #[test]
    fn split_subpaths() {
        let mut p = Path::new();
        p.move_to(0.,0.);
        p.line_to(1.,0.);
        p.line_to(1.,1.);
        p.close_polygon();
        p.move_to(5.,5.);
        p.line_to(6.,5.);
        assert_eq!(split(p.vertices()), vec![(0,3,true), (4,6,false)]);
    }
    #[test]
    fn iterate() {
        let p = Path::polygon(&[(0.,0.),(1.,0.),(1.,1.)]);
        let v = p.iter().xconvert();
        assert_eq!(v.len(), 4);
        assert_eq!(v[3].cmd, PathCommand::Close);
    }
}
