//! Path simplification
//!
//! Runs of nearly collinear line segments are merged into a single
//! segment. A reference vector is started at the first segment of a run;
//! every following point whose perpendicular distance from that vector is
//! below the threshold is merged, keeping the point furthest along the
//! vector. Points are consumed only until something can be emitted, the
//! emitted vertices wait in a small queue.

use std::collections::VecDeque;

use crate::paths::{PathCommand, PathSource, Vertex};
use crate::VertexSource;

#[derive(Debug)]
pub struct PathSimplifier<T> {
    source: T,
    simplify: bool,
    /// Squared threshold
    threshold: f64,
    queue: VecDeque<Vertex<f64>>,
    done: bool,
    moveto: bool,
    after_moveto: bool,
    clipped: bool,
    last: (f64, f64),
    start: (f64, f64),
    orig_dx: f64,
    orig_dy: f64,
    orig_dnorm2: f64,
    dnorm2_max: f64,
    last_max: bool,
    next: (f64, f64),
    last_written: (f64, f64),
}

impl<T: VertexSource> PathSimplifier<T> {
    /// Create a simplifier, `threshold` is in pixels
    pub fn new(source: T, simplify: bool, threshold: f64) -> Self {
        Self { source, simplify,
               threshold: threshold * threshold,
               queue: VecDeque::new(),
               done: false,
               moveto: true, after_moveto: false, clipped: false,
               last: (0.0, 0.0), start: (0.0, 0.0),
               orig_dx: 0.0, orig_dy: 0.0, orig_dnorm2: 0.0,
               dnorm2_max: 0.0, last_max: false,
               next: (0.0, 0.0), last_written: (0.0, 0.0),
        }
    }
    fn queue_push(&mut self, cmd: PathCommand, x: f64, y: f64) {
        self.queue.push_back(Vertex::new(x, y, cmd));
    }
    /// Emit the line being built and start a new one towards (x,y)
    fn push(&mut self, x: f64, y: f64) {
        let (nx, ny) = self.next;
        self.queue_push(PathCommand::LineTo, nx, ny);
        let (lx, ly) = self.last;
        if self.clipped {
            self.queue_push(PathCommand::MoveTo, lx, ly);
        } else if ! self.last_max {
            // The last point was not the furthest, come back to it
            self.queue_push(PathCommand::LineTo, lx, ly);
        }
        self.orig_dx = x - lx;
        self.orig_dy = y - ly;
        self.orig_dnorm2 = self.orig_dx * self.orig_dx + self.orig_dy * self.orig_dy;
        self.dnorm2_max = self.orig_dnorm2;
        self.last_max = true;
        if let Some(v) = self.queue.back() {
            self.last_written = (v.x, v.y);
        }
        self.last = (x, y);
        self.next = (x, y);
        self.clipped = false;
    }
    fn finish(&mut self) {
        let cmd = if self.moveto || self.after_moveto {
            PathCommand::MoveTo
        } else {
            PathCommand::LineTo
        };
        if self.orig_dnorm2 != 0.0 {
            let (nx, ny) = self.next;
            self.queue_push(cmd, nx, ny);
        }
        let (lx, ly) = self.last;
        self.queue_push(cmd, lx, ly);
        self.moveto = false;
        self.done = true;
    }
}

impl<T: VertexSource> VertexSource for PathSimplifier<T> {
    fn rewind(&mut self, path_id: usize) {
        self.queue.clear();
        self.done = false;
        self.moveto = true;
        self.after_moveto = false;
        self.clipped = false;
        self.orig_dnorm2 = 0.0;
        self.source.rewind(path_id);
    }
    fn vertex(&mut self) -> Vertex<f64> {
        if ! self.simplify {
            return self.source.vertex();
        }
        if let Some(v) = self.queue.pop_front() {
            return v;
        }
        if self.done {
            return Vertex::stop();
        }
        loop {
            let v = self.source.vertex();
            let (x, y) = match v.cmd {
                PathCommand::Stop => {
                    self.finish();
                    break;
                },
                // Close becomes a line back to the start of the sub path
                PathCommand::Close => self.start,
                _ => (v.x, v.y),
            };
            if self.moveto || v.cmd == PathCommand::MoveTo {
                if self.orig_dnorm2 != 0.0 && ! self.after_moveto {
                    self.push(x, y);
                }
                self.after_moveto = true;
                self.last = (x, y);
                self.start = (x, y);
                self.moveto = false;
                self.orig_dnorm2 = 0.0;
                self.clipped = true;
                if ! self.queue.is_empty() {
                    break;
                }
                continue;
            }
            self.after_moveto = false;

            // Start a new reference vector
            if self.orig_dnorm2 == 0.0 {
                if self.clipped {
                    let (lx, ly) = self.last;
                    self.queue_push(PathCommand::MoveTo, lx, ly);
                    self.clipped = false;
                }
                self.orig_dx = x - self.last.0;
                self.orig_dy = y - self.last.1;
                self.orig_dnorm2 = self.orig_dx * self.orig_dx + self.orig_dy * self.orig_dy;
                self.dnorm2_max = self.orig_dnorm2;
                self.last_max = true;
                self.next = (x, y);
                self.last_written = (x, y);
                self.last = (x, y);
                continue;
            }

            // Perpendicular distance from the reference vector
            let totdx = x - self.last_written.0;
            let totdy = y - self.last_written.1;
            let totdot = self.orig_dx * totdx + self.orig_dy * totdy;
            let paradx = totdot * self.orig_dx / self.orig_dnorm2;
            let parady = totdot * self.orig_dy / self.orig_dnorm2;
            let perpdx = totdx - paradx;
            let perpdy = totdy - parady;
            let perpd_norm2 = perpdx * perpdx + perpdy * perpdy;

            if perpd_norm2 < self.threshold {
                let parad_norm2 = paradx * paradx + parady * parady;
                self.last_max = false;
                if totdot > 0.0 {
                    if parad_norm2 > self.dnorm2_max {
                        self.last_max = true;
                        self.dnorm2_max = parad_norm2;
                        self.next = (x, y);
                    }
                } else {
                    // Direction reversed
                    let (lx, ly) = self.last;
                    self.push(lx, ly);
                    self.push(x, y);
                    break;
                }
                self.last = (x, y);
                continue;
            }
            self.push(x, y);
            break;
        }
        self.queue.pop_front().unwrap_or_else(Vertex::stop)
    }
}

impl<T: PathSource> PathSource for PathSimplifier<T> {
    fn total_vertices(&self) -> usize { self.source.total_vertices() }
    fn has_curves(&self) -> bool { self.source.has_curves() }
    fn should_simplify(&self) -> bool { self.source.should_simplify() }
    fn simplify_threshold(&self) -> f64 { self.source.simplify_threshold() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::Path;

    #[test]
    fn collinear_collapses() {
        let pts : Vec<_> = (0..200).map(|i| (i as f64, 0.0)).collect();
        let p = Path::from_codes(&pts, None).unwrap();
        let v = PathSimplifier::new(p.iter(), true, 1.0/9.0).xconvert();
        assert!(v.len() <= 4);
        assert_eq!(v[0].cmd, PathCommand::MoveTo);
        assert_eq!((v[0].x, v[0].y), (0.0, 0.0));
        let last = v[v.len()-1];
        assert_eq!((last.x, last.y), (199.0, 0.0));
    }
    #[test]
    fn corner_kept() {
        let mut pts : Vec<_> = (0..100).map(|i| (i as f64, 0.0)).collect();
        pts.extend((1..100).map(|i| (99.0, i as f64)));
        let p = Path::from_codes(&pts, None).unwrap();
        let v = PathSimplifier::new(p.iter(), true, 1.0/9.0).xconvert();
        assert!(v.len() < 10);
        assert!(v.iter().any(|v| v.x == 99.0 && v.y == 0.0));
        let last = v[v.len()-1];
        assert_eq!((last.x, last.y), (99.0, 99.0));
    }
    #[test]
    fn stop_repeats() {
        let pts : Vec<_> = (0..10).map(|i| (i as f64, 0.0)).collect();
        let p = Path::from_codes(&pts, None).unwrap();
        let mut s = PathSimplifier::new(p.iter(), true, 1.0/9.0);
        let n = s.xconvert().len();
        assert_eq!(s.vertex().cmd, PathCommand::Stop);
        assert_eq!(s.xconvert().len(), n);
    }
    #[test]
    fn threshold_from_path() {
        let pts : Vec<_> = (0..200).map(|i| (i as f64, (i % 2) as f64 * 0.5)).collect();
        let mut p = Path::from_codes(&pts, None).unwrap();
        let fine = PathSimplifier::new(p.iter(), p.should_simplify(), p.simplify_threshold())
            .xconvert().len();
        p.set_simplify_threshold(2.0);
        let coarse = PathSimplifier::new(p.iter(), p.should_simplify(), p.simplify_threshold())
            .xconvert().len();
        assert!(coarse < fine, "{} {}", coarse, fine);
    }
    #[test]
    fn disabled_passthrough() {
        let pts : Vec<_> = (0..10).map(|i| (i as f64, 0.0)).collect();
        let p = Path::from_codes(&pts, None).unwrap();
        let v = PathSimplifier::new(p.iter(), false, 1.0/9.0).xconvert();
        assert_eq!(v.len(), 10);
    }
}
