//! Curve flattening
//!
//! Quadratic and cubic Bezier segments are subdivided recursively until
//! each piece is within a distance tolerance of a straight line.

use crate::paths::{PathCommand, PathSource, Vertex};
use crate::VertexSource;

const CURVE_COLLINEARITY_EPSILON : f64 = 1e-30;
const CURVE_RECURSION_LIMIT : u32 = 32;

fn calc_sq_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy
}

/// Tolerance used for a given approximation scale, squared
fn distance_tolerance_square(approximation_scale: f64) -> f64 {
    let d = 0.5 / approximation_scale;
    d * d
}

/// Flatten a quadratic Bezier, end points included
pub fn curve3_div(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64,
                  approximation_scale: f64) -> Vec<(f64,f64)> {
    let mut points = vec![(x1, y1)];
    let tol = distance_tolerance_square(approximation_scale);
    recursive_bezier3(&mut points, tol, x1, y1, x2, y2, x3, y3, 0);
    points.push((x3, y3));
    points
}

#[allow(clippy::too_many_arguments)]
fn recursive_bezier3(points: &mut Vec<(f64,f64)>, tol: f64,
                     x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64,
                     level: u32) {
    if level > CURVE_RECURSION_LIMIT {
        return;
    }
    let x12  = (x1 + x2) / 2.0;
    let y12  = (y1 + y2) / 2.0;
    let x23  = (x2 + x3) / 2.0;
    let y23  = (y2 + y3) / 2.0;
    let x123 = (x12 + x23) / 2.0;
    let y123 = (y12 + y23) / 2.0;

    let dx = x3 - x1;
    let dy = y3 - y1;
    let d = ((x2 - x3) * dy - (y2 - y3) * dx).abs();

    if d > CURVE_COLLINEARITY_EPSILON {
        // Regular case
        if d * d <= tol * (dx * dx + dy * dy) {
            points.push((x123, y123));
            return;
        }
    } else {
        // Collinear case
        let da = dx * dx + dy * dy;
        let d = if da == 0.0 {
            calc_sq_distance(x1, y1, x2, y2)
        } else {
            let d = ((x2 - x1) * dx + (y2 - y1) * dy) / da;
            if d > 0.0 && d < 1.0 {
                // Simple collinear case, 1---2---3
                return;
            }
            if d <= 0.0 {
                calc_sq_distance(x2, y2, x1, y1)
            } else {
                calc_sq_distance(x2, y2, x3, y3)
            }
        };
        if d < tol {
            points.push((x2, y2));
            return;
        }
    }
    recursive_bezier3(points, tol, x1, y1, x12, y12, x123, y123, level + 1);
    recursive_bezier3(points, tol, x123, y123, x23, y23, x3, y3, level + 1);
}

/// Flatten a cubic Bezier, end points included
#[allow(clippy::too_many_arguments)]
pub fn curve4_div(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, x4: f64, y4: f64,
                  approximation_scale: f64) -> Vec<(f64,f64)> {
    let mut points = vec![(x1, y1)];
    let tol = distance_tolerance_square(approximation_scale);
    recursive_bezier4(&mut points, tol, x1, y1, x2, y2, x3, y3, x4, y4, 0);
    points.push((x4, y4));
    points
}

#[allow(clippy::too_many_arguments)]
fn recursive_bezier4(points: &mut Vec<(f64,f64)>, tol: f64,
                     x1: f64, y1: f64, x2: f64, y2: f64,
                     x3: f64, y3: f64, x4: f64, y4: f64,
                     level: u32) {
    if level > CURVE_RECURSION_LIMIT {
        return;
    }
    let x12   = (x1 + x2) / 2.0;
    let y12   = (y1 + y2) / 2.0;
    let x23   = (x2 + x3) / 2.0;
    let y23   = (y2 + y3) / 2.0;
    let x34   = (x3 + x4) / 2.0;
    let y34   = (y3 + y4) / 2.0;
    let x123  = (x12 + x23) / 2.0;
    let y123  = (y12 + y23) / 2.0;
    let x234  = (x23 + x34) / 2.0;
    let y234  = (y23 + y34) / 2.0;
    let x1234 = (x123 + x234) / 2.0;
    let y1234 = (y123 + y234) / 2.0;

    let dx = x4 - x1;
    let dy = y4 - y1;
    let mut d2 = ((x2 - x4) * dy - (y2 - y4) * dx).abs();
    let mut d3 = ((x3 - x4) * dy - (y3 - y4) * dx).abs();

    match (d2 > CURVE_COLLINEARITY_EPSILON, d3 > CURVE_COLLINEARITY_EPSILON) {
        (false, false) => {
            // All collinear or p1 == p4
            let k = dx * dx + dy * dy;
            if k == 0.0 {
                d2 = calc_sq_distance(x1, y1, x2, y2);
                d3 = calc_sq_distance(x4, y4, x3, y3);
            } else {
                let k = 1.0 / k;
                d2 = k * ((x2 - x1) * dx + (y2 - y1) * dy);
                d3 = k * ((x3 - x1) * dx + (y3 - y1) * dy);
                if d2 > 0.0 && d2 < 1.0 && d3 > 0.0 && d3 < 1.0 {
                    // Simple collinear case, 1---2---3---4
                    return;
                }
                d2 = if d2 <= 0.0 {
                    calc_sq_distance(x2, y2, x1, y1)
                } else if d2 >= 1.0 {
                    calc_sq_distance(x2, y2, x4, y4)
                } else {
                    calc_sq_distance(x2, y2, x1 + d2 * dx, y1 + d2 * dy)
                };
                d3 = if d3 <= 0.0 {
                    calc_sq_distance(x3, y3, x1, y1)
                } else if d3 >= 1.0 {
                    calc_sq_distance(x3, y3, x4, y4)
                } else {
                    calc_sq_distance(x3, y3, x1 + d3 * dx, y1 + d3 * dy)
                };
            }
            if d2 > d3 {
                if d2 < tol {
                    points.push((x2, y2));
                    return;
                }
            } else if d3 < tol {
                points.push((x3, y3));
                return;
            }
        },
        (false, true) => {
            // p1,p2,p4 are collinear, p3 is significant
            if d3 * d3 <= tol * (dx * dx + dy * dy) {
                points.push((x23, y23));
                return;
            }
        },
        (true, false) => {
            // p1,p3,p4 are collinear, p2 is significant
            if d2 * d2 <= tol * (dx * dx + dy * dy) {
                points.push((x23, y23));
                return;
            }
        },
        (true, true) => {
            // Regular case
            if (d2 + d3) * (d2 + d3) <= tol * (dx * dx + dy * dy) {
                points.push((x23, y23));
                return;
            }
        },
    }
    recursive_bezier4(points, tol, x1, y1, x12, y12, x123, y123, x1234, y1234, level + 1);
    recursive_bezier4(points, tol, x1234, y1234, x234, y234, x34, y34, x4, y4, level + 1);
}

/// Replaces Curve3 and Curve4 vertices with line segments
#[derive(Debug)]
pub struct ConvCurve<T> {
    source: T,
    approximation_scale: f64,
    last: (f64, f64),
    points: Vec<(f64,f64)>,
    pos: usize,
}

impl<T: VertexSource> ConvCurve<T> {
    pub fn new(source: T) -> Self {
        Self { source, approximation_scale: 1.0,
               last: (0.0, 0.0), points: vec![], pos: 0 }
    }
    /// Scale of device units to curve units, larger values give more points
    pub fn approximation_scale(&mut self, scale: f64) {
        self.approximation_scale = scale;
    }
    /// Pull `n` more points of a curve segment
    fn pull(&mut self, n: usize) -> Option<Vec<(f64,f64)>> {
        let mut out = Vec::with_capacity(n);
        for _ in 0 .. n {
            let v = self.source.vertex();
            if ! v.cmd.is_vertex() {
                return None;
            }
            out.push((v.x, v.y));
        }
        Some(out)
    }
    fn next_point(&mut self) -> Option<Vertex<f64>> {
        let p = self.points.get(self.pos).copied();
        if let Some((x, y)) = p {
            self.pos += 1;
            Some(Vertex::line_to(x, y))
        } else {
            None
        }
    }
}

impl<T: VertexSource> VertexSource for ConvCurve<T> {
    fn rewind(&mut self, path_id: usize) {
        self.points.clear();
        self.pos = 0;
        self.last = (0.0, 0.0);
        self.source.rewind(path_id);
    }
    fn vertex(&mut self) -> Vertex<f64> {
        if let Some(v) = self.next_point() {
            return v;
        }
        let v = self.source.vertex();
        let (x0, y0) = self.last;
        let scale = self.approximation_scale;
        let flat = match v.cmd {
            PathCommand::MoveTo | PathCommand::LineTo => {
                self.last = (v.x, v.y);
                return v;
            },
            PathCommand::Stop | PathCommand::Close => return v,
            PathCommand::Curve3 => match self.pull(1) {
                Some(p) => curve3_div(x0, y0, v.x, v.y, p[0].0, p[0].1, scale),
                None => return Vertex::stop(),
            },
            PathCommand::Curve4 => match self.pull(2) {
                Some(p) => curve4_div(x0, y0, v.x, v.y, p[0].0, p[0].1, p[1].0, p[1].1, scale),
                None => return Vertex::stop(),
            },
        };
        // First point is the current point
        self.points = flat;
        self.pos = 1;
        if let Some(&end) = self.points.last() {
            self.last = end;
        }
        self.next_point().unwrap_or_else(Vertex::stop)
    }
}

impl<T: PathSource> PathSource for ConvCurve<T> {
    fn total_vertices(&self) -> usize { self.source.total_vertices() }
    fn has_curves(&self) -> bool { false }
    fn should_simplify(&self) -> bool { self.source.should_simplify() }
    fn simplify_threshold(&self) -> f64 { self.source.simplify_threshold() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::Path;

    #[test]
    fn quadratic_points_on_curve() {
        let pts = curve3_div(0.0, 0.0, 50.0, 100.0, 100.0, 0.0, 1.0);
        assert!(pts.len() > 4);
        assert_eq!(pts[0], (0.0, 0.0));
        assert_eq!(pts[pts.len()-1], (100.0, 0.0));
        // Peak of the curve is at y = 50
        let ymax = pts.iter().map(|p| p.1).fold(0.0, f64::max);
        assert!(ymax <= 50.0 && ymax > 49.0);
    }
    #[test]
    fn cubic_scale_adds_points() {
        let a = curve4_div(0.0, 0.0, 0.0, 100.0, 100.0, 100.0, 100.0, 0.0, 1.0);
        let b = curve4_div(0.0, 0.0, 0.0, 100.0, 100.0, 100.0, 100.0, 0.0, 4.0);
        assert!(b.len() > a.len());
    }
    #[test]
    fn straight_cubic() {
        let pts = curve4_div(0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 3.0, 0.0, 1.0);
        assert_eq!(pts, vec![(0.0, 0.0), (3.0, 0.0)]);
    }
    #[test]
    fn conv_curve_lines() {
        let mut p = Path::new();
        p.move_to(0.0, 0.0);
        p.curve3(50.0, 100.0, 100.0, 0.0);
        p.line_to(100.0, -10.0);
        let v = ConvCurve::new(p.iter()).xconvert();
        assert_eq!(v[0].cmd, PathCommand::MoveTo);
        assert!(v[1..].iter().all(|v| v.cmd == PathCommand::LineTo));
        let n = v.len();
        assert_eq!((v[n-2].x, v[n-2].y), (100.0, 0.0));
        assert_eq!((v[n-1].x, v[n-1].y), (100.0, -10.0));
    }
}
