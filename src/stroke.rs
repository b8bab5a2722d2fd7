//! Path Stroking
//!
//! # Example
//!
//!     use agg_backend::{Path, Stroke, LineCap, LineJoin, VertexSource};
//!
//!     // Input Path
//!     let mut path = Path::new();
//!     path.move_to(  0.0,   0.0);
//!     path.line_to(100.0, 100.0);
//!     path.line_to(200.0,  50.0);
//!
//!     // Stroke
//!     let mut stroke = Stroke::new( path.iter() );
//!     stroke.width(2.5);
//!     stroke.line_cap(LineCap::Square);
//!     stroke.line_join(LineJoin::Miter);
//!     stroke.miter_limit(5.0);
//!
//!     let outline = stroke.xconvert();
//!     assert!(outline.len() > 4);
//!

use std::f64::consts::PI;
use std::str::FromStr;

use crate::error::RenderError;
use crate::paths::PathCommand;
use crate::paths::Vertex;
use crate::paths::len;
use crate::paths::cross;
use crate::paths::split;
use crate::VertexSource;

/// Vertices closer than this are merged before stroking
const VERTEX_DIST_EPSILON : f64 = 1e-6;

/// Line End or Cap Style
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum LineCap {
    Butt, Square, Round
}
/// Lines Join Style on the outside
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum LineJoin {
    Miter, MiterRevert, MiterRound, Round, Bevel,
}
/// Lines Join Style on the inside
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum InnerJoin {
    Bevel, Miter, Jag, Round
}

impl FromStr for LineCap {
    type Err = RenderError;
    /// Parse "butt", "round" or "projecting"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "butt" => Ok(LineCap::Butt),
            "round" => Ok(LineCap::Round),
            "projecting" => Ok(LineCap::Square),
            _ => Err(RenderError::InvalidCapStyle(s.to_string())),
        }
    }
}

impl FromStr for LineJoin {
    type Err = RenderError;
    /// Parse "miter", "round" or "bevel"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miter" => Ok(LineJoin::MiterRevert),
            "round" => Ok(LineJoin::Round),
            "bevel" => Ok(LineJoin::Bevel),
            _ => Err(RenderError::InvalidJoinStyle(s.to_string())),
        }
    }
}

/// Stroke for Paths and Vertex Sources
///
/// The outline is generated when the stroke is rewound and then returned
/// one vertex at a time. Every sub path produces closed polygons: an open
/// sub path gives a single polygon going out along one side and back along
/// the other, a closed sub path gives an outer and an inner polygon.
#[derive(Debug)]
pub struct Stroke<T> {
    /// Source of Verticies
    source: T,
    /// Half the width of line in pixels, 0.5
    width: f64,
    /// Absolute value of the half width in pixel, 0.5
    width_abs: f64,
    /// Minimum Limit to determine if segments are almost co-linear, 0.5/1024
    width_eps: f64,
    /// Sign of the width, +1.0
    width_sign: f64,
    /// Maximum Length of miter at segment intersection, 4.0
    miter_limit: f64,
    /// Maximum Length of the inner miter at segment intersections, 1.01
    inner_miter_limit: f64,
    /// Approximation scale, 1.0
    approx_scale: f64,
    /// Line Cap Style
    line_cap: LineCap,
    /// Line Join Style
    line_join: LineJoin,
    /// Line Join Style, Inner Angle
    inner_join: InnerJoin,
    /// Generated outline
    out: Vec<Vertex<f64>>,
    pos: usize,
}

impl<T> VertexSource for Stroke<T> where T: VertexSource {
    fn rewind(&mut self, _path_id: usize) {
        let input = self.source.xconvert();
        self.out = self.stroke(&input);
        self.pos = 0;
    }
    fn vertex(&mut self) -> Vertex<f64> {
        match self.out.get(self.pos) {
            Some(v) => {
                self.pos += 1;
                *v
            },
            None => Vertex::stop(),
        }
    }
}

macro_rules! prev {
    ($i:expr, $n:expr) => ( ($i + $n - 1) % $n )
}
macro_rules! curr {
    ($i:expr, $n:expr) => ( $i )
}
macro_rules! next {
    ($i:expr, $n:expr) => ( ($i + 1) % $n )
}

impl<T> Stroke<T> where T: VertexSource {
    /// Create a new Stroke from a Vertex Source
    pub fn new(source: T) -> Self {
        Self {
            source,
            width: 0.5,
            width_abs: 0.5,
            width_eps: 0.5/1024.0,
            width_sign: 1.0,
            miter_limit: 4.0,
            inner_miter_limit: 1.01,
            approx_scale: 1.0,
            inner_join: InnerJoin::Miter,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            out: vec![],
            pos: 0,
        }
    }
    /// Set the Stroke Width
    pub fn width(&mut self, width: f64) {
        self.width = width / 2.0;
        self.width_abs = self.width.abs();
        self.width_sign = if self.width < 0.0 { -1.0 } else { 1.0 };
    }
    /// Set Line cap style
    pub fn line_cap(&mut self, line_cap: LineCap) {
        self.line_cap = line_cap;
    }
    /// Set Line Join style
    pub fn line_join(&mut self, line_join: LineJoin) {
        self.line_join = line_join;
    }
    /// Set Inner Join style
    pub fn inner_join(&mut self, inner_join: InnerJoin) {
        self.inner_join = inner_join;
    }
    /// Set miter limit
    pub fn miter_limit(&mut self, miter_limit: f64) {
        self.miter_limit = miter_limit;
    }
    /// Set inner miter limit
    pub fn inner_miter_limit(&mut self, inner_miter_limit: f64) {
        self.inner_miter_limit = inner_miter_limit;
    }
    /// Set approximation scale
    pub fn approximation_scale(&mut self, scale: f64) {
        self.approx_scale = scale;
    }
    /// Angular step of round caps and joins
    fn arc_step(&self) -> f64 {
        2.0 * (self.width_abs / (self.width_abs + 0.125 / self.approx_scale)).acos()
    }
    /// Calculate Line End Cap
    fn calc_cap(&self, v0: &Vertex<f64>, v1: &Vertex<f64>) -> Vec<Vertex<f64>> {
        let mut out = vec![];
        let dx = v1.x-v0.x;
        let dy = v1.y-v0.y;
        let len = (dx*dx + dy*dy).sqrt();
        let dx1 = self.width * dy / len;
        let dy1 = self.width * dx / len;

        match self.line_cap {
            LineCap::Square => {
                let dx2 = dy1 * self.width_sign;
                let dy2 = dx1 * self.width_sign;
                out.push(Vertex::line_to(v0.x - dx1 - dx2, v0.y + dy1 - dy2));
                out.push(Vertex::line_to(v0.x + dx1 - dx2, v0.y - dy1 - dy2));
            },
            LineCap::Butt => {
                out.push(Vertex::line_to(v0.x - dx1, v0.y + dy1));
                out.push(Vertex::line_to(v0.x + dx1, v0.y - dy1));
            },
            LineCap::Round => {
                let n = (PI / self.arc_step()).round() as usize;
                let da = PI / (n + 1) as f64;
                out.push(Vertex::line_to(v0.x - dx1, v0.y + dy1));
                if self.width_sign > 0.0 {
                    let mut a1 = dy1.atan2(-dx1) + da;
                    for _ in 0 .. n {
                        out.push(Vertex::line_to(v0.x + a1.cos() * self.width,
                                                 v0.y + a1.sin() * self.width));
                        a1 += da;
                    }
                } else {
                    let mut a1 = (-dy1).atan2(dx1) - da;
                    for _ in 0 .. n {
                        out.push(Vertex::line_to(v0.x + a1.cos() * self.width,
                                                 v0.y + a1.sin() * self.width));
                        a1 -= da;
                    }
                }
                out.push(Vertex::line_to(v0.x + dx1, v0.y - dy1));
            }
        }
        out
    }

    /// Calculate an Arc around (`x`,`y`) between two offsets
    fn calc_arc(&self, x: f64, y: f64, dx1: f64, dy1: f64, dx2: f64, dy2: f64) -> Vec<Vertex<f64>> {
        let mut out = vec![];
        let mut a1 = (dy1 * self.width_sign).atan2(dx1 * self.width_sign);
        let mut a2 = (dy2 * self.width_sign).atan2(dx2 * self.width_sign);
        let da = self.arc_step();
        out.push(Vertex::line_to(x + dx1, y + dy1));
        if self.width_sign > 0.0 {
            if a1 > a2 {
                a2 += 2.0 * PI;
            }
            let n = ((a2 - a1) / da) as i64;
            let da = (a2 - a1) / (n + 1) as f64;
            a1 += da;
            for _ in 0 .. n {
                out.push(Vertex::line_to(x + a1.cos() * self.width,
                                         y + a1.sin() * self.width));
                a1 += da;
            }
        } else {
            if a1 < a2 {
                a2 -= 2.0 * PI;
            }
            let n = ((a1 - a2) / da) as i64;
            let da = (a1 - a2) / (n + 1) as f64;
            a1 -= da;
            for _ in 0 .. n {
                out.push(Vertex::line_to(x + a1.cos() * self.width,
                                         y + a1.sin() * self.width));
                a1 -= da;
            }
        }
        out.push(Vertex::line_to(x + dx2, y + dy2));
        out
    }
    /// Calculate a Miter Join for 3 points
    #[allow(clippy::too_many_arguments)]
    fn calc_miter(&self,
                  p0: &Vertex<f64>,
                  p1: &Vertex<f64>,
                  p2: &Vertex<f64>,
                  dx1: f64, dy1: f64, dx2: f64, dy2: f64,
                  join: LineJoin, mlimit: f64, dbevel: f64)
                  -> Vec<Vertex<f64>>{
        let mut out = vec![];
        let mut xi  = p1.x;
        let mut yi  = p1.y;
        let mut di  = 1.0;
        let lim = self.width_abs * mlimit;
        let mut miter_limit_exceeded = true;
        let mut intersection_failed  = true;
        // a--b-p
        // 0   1 c
        // -----  \
        //      \  \
        //       \2 d
        if let Some((xit,yit)) = calc_intersection(p0.x + dx1, p0.y - dy1,
                                                   p1.x + dx1, p1.y - dy1,
                                                   p1.x + dx2, p1.y - dy2,
                                                   p2.x + dx2, p2.y - dy2) {
            xi = xit;
            yi = yit;
            di = len(p1, &Vertex::line_to(xi, yi));
            if di <= lim {
                out.push(Vertex::line_to(xi, yi));
                miter_limit_exceeded = false;
            }
            intersection_failed = false;
        } else {
            // Points are collinear; the next segment either continues
            // this one or turns straight back
            let pz = Vertex::line_to(p1.x + dx1, p1.y - dy1);
            if (cross(p0, p1, &pz) < 0.0) == (cross(p1, p2, &pz) < 0.0) {
                out.push(pz);
                miter_limit_exceeded = false;
            }
        }

        if miter_limit_exceeded {
            match join {
                LineJoin::MiterRevert => {
                    out.push(Vertex::line_to(p1.x + dx1, p1.y - dy1));
                    out.push(Vertex::line_to(p1.x + dx2, p1.y - dy2));
                },
                LineJoin::MiterRound => out.extend( self.calc_arc(p1.x, p1.y, dx1, -dy1, dx2, -dy2)),
                _ => {
                    if intersection_failed {
                        let mlimit = mlimit * self.width_sign;
                        out.push(Vertex::line_to(p1.x + dx1 + dy1 * mlimit,
                                                 p1.y - dy1 + dx1 * mlimit));
                        out.push(Vertex::line_to(p1.x + dx2 - dy2 * mlimit,
                                                 p1.y - dy2 - dx2 * mlimit));
                    } else {
                        let x1 = p1.x + dx1;
                        let y1 = p1.y - dy1;
                        let x2 = p1.x + dx2;
                        let y2 = p1.y - dy2;
                        let di = (lim - dbevel) / (di - dbevel);
                        out.push(Vertex::line_to(x1 + (xi - x1) * di,
                                                 y1 + (yi - y1) * di));
                        out.push(Vertex::line_to(x2 + (xi - x2) * di,
                                                 y2 + (yi - y2) * di));
                    }
                }
            }
        }
        out
    }
    /// Calculate the Join of Two Line Segments
    ///
    /// Points must be distinct, see [`clean_path`]
    fn calc_join(&self,
                 p0: &Vertex<f64>,
                 p1: &Vertex<f64>,
                 p2: &Vertex<f64>) -> Vec<Vertex<f64>> {
        let mut out = vec![];
        let len1 = len(p1,p0);
        let len2 = len(p2,p1);

        // Perpendicular offsets
        let dx1 = self.width * (p1.y-p0.y) / len1;
        let dy1 = self.width * (p1.x-p0.x) / len1;
        let dx2 = self.width * (p2.y-p1.y) / len2;
        let dy2 = self.width * (p2.x-p1.x) / len2;
        let cp = cross(p0, p1, p2);

        if cp != 0.0 && cp.is_sign_positive() == self.width.is_sign_positive() {
            // Inner Join
            let limit = (len1.min(len2) / self.width_abs).max(self.inner_miter_limit);
            match self.inner_join {
                InnerJoin::Bevel => {
                    out.push(Vertex::line_to(p1.x + dx1, p1.y - dy1));
                    out.push(Vertex::line_to(p1.x + dx2, p1.y - dy2));
                },
                InnerJoin::Miter => {
                    out.extend(self.calc_miter(p0, p1, p2, dx1, dy1, dx2, dy2,
                                               LineJoin::MiterRevert, limit, 0.0));
                }
                InnerJoin::Jag |
                InnerJoin::Round => {
                    let cp = (dx1-dx2).powi(2) + (dy1-dy2).powi(2);
                    if cp < len1.powi(2) && cp < len2.powi(2) {
                        out.extend(self.calc_miter(p0, p1, p2, dx1, dy1, dx2, dy2,
                                                   LineJoin::MiterRevert, limit, 0.0));
                    } else if self.inner_join == InnerJoin::Jag {
                        out.push(Vertex::line_to(p1.x + dx1, p1.y - dy1));
                        out.push(Vertex::line_to(p1.x,       p1.y      ));
                        out.push(Vertex::line_to(p1.x + dx2, p1.y - dy2));
                    } else {
                        out.push(Vertex::line_to(p1.x + dx1, p1.y - dy1));
                        out.push(Vertex::line_to(p1.x,       p1.y      ));
                        out.extend(self.calc_arc(p1.x, p1.y, dx2, -dy2, dx1, -dy1));
                        out.push(Vertex::line_to(p1.x,       p1.y      ));
                        out.push(Vertex::line_to(p1.x + dx2, p1.y - dy2));
                    }
                }
            }
        } else {
            // Outer Join
            let dx = (dx1 + dx2) / 2.0;
            let dy = (dy1 + dy2) / 2.0;
            let dbevel = (dx*dx + dy*dy).sqrt();

            if (self.line_join == LineJoin::Round || self.line_join == LineJoin::Bevel) &&
                self.approx_scale * (self.width_abs - dbevel) < self.width_eps {
                // Almost collinear, a single miter point is indistinguishable
                if let Some((x,y)) = calc_intersection(p0.x + dx1, p0.y - dy1,
                                                       p1.x + dx1, p1.y - dy1,
                                                       p1.x + dx2, p1.y - dy2,
                                                       p2.x + dx2, p2.y - dy2) {
                    out.push(Vertex::line_to(x, y));
                } else {
                    out.push(Vertex::line_to(p1.x + dx1, p1.y - dy1));
                }
                return out;
            }
            match self.line_join {
                LineJoin::Miter |
                LineJoin::MiterRevert |
                LineJoin::MiterRound =>
                    out.extend(self.calc_miter(p0,p1,p2, dx1,dy1,dx2,dy2,
                                               self.line_join,
                                               self.miter_limit,
                                               dbevel)),
                LineJoin::Round => out.extend(
                    self.calc_arc(p1.x, p1.y, dx1, -dy1, dx2, -dy2)
                ),
                LineJoin::Bevel => {
                    out.push(Vertex::line_to(p1.x + dx1, p1.y - dy1));
                    out.push(Vertex::line_to(p1.x + dx2, p1.y - dy2));
                },
            }
        }
        out
    }
    /// Stroke a list of vertices
    fn stroke(&self, input: &[Vertex<f64>]) -> Vec<Vertex<f64>> {
        let mut all_out = vec![];
        if self.width_abs == 0.0 {
            return all_out;
        }
        for (m1, m2, closed) in split(input) {
            let v = clean_path(&input[m1..m2], closed);
            let n = v.len();
            // Closed sub paths need a triangle, open ones a segment
            let closed = closed && n >= 3;
            if n < 2 {
                continue;
            }
            let (n1,n2) = if closed { (0, n) } else { (1,n-1) };

            // Forward Path
            let mut outf = vec![];
            if ! closed {
                outf.extend( self.calc_cap(&v[0], &v[1]) );
            }
            for i in n1 .. n2 {
                outf.extend(
                    self.calc_join(&v[prev!(i,n)], &v[curr!(i,n)], &v[next!(i,n)])
                );
            }
            if closed {
                outf.push( Vertex::close_polygon(0.0, 0.0) );
            }

            // Backward Path
            let mut outb = vec![];
            if ! closed {
                outb.extend( self.calc_cap(&v[n-1], &v[n-2]) );
            }
            for i in (n1 .. n2).rev() {
                outb.extend(
                    self.calc_join(&v[next!(i,n)], &v[curr!(i,n)], &v[prev!(i,n)])
                );
            }
            if closed {
                outb[0].cmd = PathCommand::MoveTo;
            }
            outb.push( Vertex::close_polygon(0.0, 0.0) );

            outf[0].cmd = PathCommand::MoveTo;
            all_out.extend(outf);
            all_out.extend(outb);
        }
        all_out
    }
}

/// Calculate Intersection of two lines
///
/// Parallel Line are return as `None` otherwise the Intersection
///    (`px`,`py`) is returned
///
/// Lines are specified to pairs of points
///   - (`ax`, `ay`) -> (`bx`, `by`)
///   - (`cv`, `cy`) -> (`dx`, `dy`)
///
/// The intersection is defined at
///```text
///     px = ax + t (bx-ax)
///     py = ay + y (by-ay)
///```
///   where
///```text
///          (ay-cy)(dx-cx) - (ax-cx)(dy-cy)
///     t = ----------------------------------
///          (bx-ax)(dy-cy) - (by-ay)(dx-cx)
///```
#[allow(clippy::too_many_arguments)]
fn calc_intersection(ax: f64, ay: f64, bx: f64, by: f64,
                     cx: f64, cy: f64, dx: f64, dy: f64)
                     -> Option<(f64, f64)> {
    let intersection_epsilon = 1.0e-30;
    let num = (ay-cy) * (dx-cx) - (ax-cx) * (dy-cy);
    let den = (bx-ax) * (dy-cy) - (by-ay) * (dx-cx);
    if den.abs() < intersection_epsilon {
        return None;
    }
    let r = num / den;
    Some((ax + r * (bx-ax), ay + r * (by-ay)))
}

/// Remove repeated vertices of a sub path
///
/// Consecutive vertices closer than 1e-6 are merged. For closed sub paths
/// trailing vertices equal to the first are dropped as well.
fn clean_path(v: &[Vertex<f64>], closed: bool) -> Vec<Vertex<f64>>{
    let mut out : Vec<Vertex<f64>> = Vec::with_capacity(v.len());
    for p in v {
        match out.last() {
            Some(last) if len(last, p) < VERTEX_DIST_EPSILON => {},
            _ => out.push(*p),
        }
    }
    if closed {
        while out.len() > 1 && len(&out[0], &out[out.len()-1]) < VERTEX_DIST_EPSILON {
            out.pop();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::Path;

    fn bounds(v: &[Vertex<f64>]) -> (f64, f64, f64, f64) {
        v.iter().filter(|v| v.cmd.is_vertex())
            .fold((f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
                  |(x0,y0,x1,y1), v| (x0.min(v.x), y0.min(v.y), x1.max(v.x), y1.max(v.y)))
    }
    #[test]
    fn butt_segment() {
        let p = Path::from_codes(&[(0.0, 5.0), (10.0, 5.0)], None).unwrap();
        let mut s = Stroke::new(p.iter());
        s.width(2.0);
        let v = s.xconvert();
        assert_eq!(v[0].cmd, PathCommand::MoveTo);
        assert_eq!(v[v.len()-1].cmd, PathCommand::Close);
        assert_eq!(bounds(&v), (0.0, 4.0, 10.0, 6.0));
    }
    #[test]
    fn square_cap_extends() {
        let p = Path::from_codes(&[(0.0, 5.0), (10.0, 5.0)], None).unwrap();
        let mut s = Stroke::new(p.iter());
        s.width(2.0);
        s.line_cap(LineCap::Square);
        assert_eq!(bounds(&s.xconvert()), (-1.0, 4.0, 11.0, 6.0));
    }
    #[test]
    fn closed_two_polygons() {
        let p = Path::polygon(&[(0.,0.),(10.,0.),(10.,10.),(0.,10.)]);
        let mut s = Stroke::new(p.iter());
        s.width(2.0);
        let v = s.xconvert();
        let moves = v.iter().filter(|v| v.cmd == PathCommand::MoveTo).count();
        let closes = v.iter().filter(|v| v.cmd == PathCommand::Close).count();
        assert_eq!((moves, closes), (2, 2));
        let (x0, y0, x1, y1) = bounds(&v);
        for (a, b) in [(x0, -1.0), (y0, -1.0), (x1, 11.0), (y1, 11.0)].iter() {
            assert!((a - b).abs() < 1e-9);
        }
    }
    #[test]
    fn repeated_points_no_panic() {
        let p = Path::from_codes(&[(0.,0.),(0.,0.),(5.,0.),(5.,0.),(5.,5.)], None).unwrap();
        let mut s = Stroke::new(p.iter());
        s.width(1.0);
        assert!(!s.xconvert().is_empty());
        let p = Path::from_codes(&[(3.,3.),(3.,3.)], None).unwrap();
        let mut s = Stroke::new(p.iter());
        assert!(s.xconvert().is_empty());
    }
    #[test]
    fn round_cap_approximation() {
        let p = Path::from_codes(&[(0.0, 0.0), (10.0, 0.0)], None).unwrap();
        let count = |scale: f64| {
            let mut s = Stroke::new(p.iter());
            s.width(8.0);
            s.line_cap(LineCap::Round);
            s.approximation_scale(scale);
            s.xconvert().len()
        };
        assert!(count(4.0) > count(1.0));
    }
    #[test]
    fn sharp_turn_inner_join() {
        let p = Path::from_codes(&[(0.0, 0.0), (10.0, 0.0), (0.0, 1.0)], None).unwrap();
        for &join in &[InnerJoin::Bevel, InnerJoin::Miter, InnerJoin::Jag, InnerJoin::Round] {
            let mut s = Stroke::new(p.iter());
            s.width(2.0);
            s.inner_join(join);
            s.inner_miter_limit(1.5);
            s.miter_limit(2.0);
            let (x0, _, x1, _) = bounds(&s.xconvert());
            assert!(x0 < 0.0 && x1 < 13.0, "{:?}", join);
        }
    }
    #[test]
    fn parse_styles() {
        assert_eq!("projecting".parse::<LineCap>().unwrap(), LineCap::Square);
        assert_eq!("bevel".parse::<LineJoin>().unwrap(), LineJoin::Bevel);
        assert!(matches!("square".parse::<LineCap>(), Err(RenderError::InvalidCapStyle(_))));
        assert!(matches!("sharp".parse::<LineJoin>(), Err(RenderError::InvalidJoinStyle(_))));
    }
}
