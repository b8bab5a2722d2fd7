//! Removal of non-finite vertices

use smallvec::SmallVec;

use crate::paths::{PathCommand, PathSource, Vertex};
use crate::VertexSource;

/// Skips vertices with NaN or infinite coordinates
///
/// Without curves a bad vertex is dropped and the next finite vertex
/// starts a new sub path. With curves whole curve segments are dropped if
/// any of their points is not finite, drawing restarts with a move to.
#[derive(Debug)]
pub struct PathNanRemover<T> {
    source: T,
    remove_nans: bool,
    has_curves: bool,
    queue: SmallVec<[Vertex<f64>; 8]>,
    qpos: usize,
    needs_move_to: bool,
}

impl<T: VertexSource> PathNanRemover<T> {
    pub fn new(source: T, remove_nans: bool, has_curves: bool) -> Self {
        Self { source, remove_nans, has_curves,
               queue: SmallVec::new(), qpos: 0,
               needs_move_to: false }
    }
    fn queue_pop(&mut self) -> Option<Vertex<f64>> {
        let v = self.queue.get(self.qpos).copied();
        if v.is_some() {
            self.qpos += 1;
        }
        if self.qpos >= self.queue.len() {
            self.queue_clear();
        }
        v
    }
    fn queue_clear(&mut self) {
        self.queue.clear();
        self.qpos = 0;
    }
    fn extra_points(cmd: PathCommand) -> usize {
        match cmd {
            PathCommand::Curve3 => 1,
            PathCommand::Curve4 => 2,
            _ => 0,
        }
    }
    fn vertex_lines(&mut self) -> Vertex<f64> {
        let v = self.source.vertex();
        if ! v.cmd.is_vertex() || v.is_finite() {
            return v;
        }
        loop {
            let v = self.source.vertex();
            if ! v.cmd.is_vertex() {
                return v;
            }
            if v.is_finite() {
                return Vertex::move_to(v.x, v.y);
            }
        }
    }
    fn vertex_curves(&mut self) -> Vertex<f64> {
        if let Some(v) = self.queue_pop() {
            return v;
        }
        loop {
            let v = self.source.vertex();
            if ! v.cmd.is_vertex() {
                return v;
            }
            if self.needs_move_to {
                self.queue.push(Vertex::move_to(v.x, v.y));
            }
            let mut has_nan = ! v.is_finite();
            let mut last = v;
            self.queue.push(v);
            // Pull the remaining points of a curve, even after a NaN
            for _ in 0 .. Self::extra_points(v.cmd) {
                last = self.source.vertex();
                has_nan = has_nan || ! last.is_finite();
                self.queue.push(Vertex::new(last.x, last.y, v.cmd));
            }
            if ! has_nan {
                self.needs_move_to = false;
                break;
            }
            self.queue_clear();
            if last.is_finite() {
                self.queue.push(Vertex::move_to(last.x, last.y));
                self.needs_move_to = false;
            } else {
                self.needs_move_to = true;
            }
        }
        self.queue_pop().unwrap_or_else(Vertex::stop)
    }
}

impl<T: VertexSource> VertexSource for PathNanRemover<T> {
    fn rewind(&mut self, path_id: usize) {
        self.queue_clear();
        self.needs_move_to = false;
        self.source.rewind(path_id);
    }
    fn vertex(&mut self) -> Vertex<f64> {
        if ! self.remove_nans {
            self.source.vertex()
        } else if self.has_curves {
            self.vertex_curves()
        } else {
            self.vertex_lines()
        }
    }
}

impl<T: PathSource> PathSource for PathNanRemover<T> {
    fn total_vertices(&self) -> usize { self.source.total_vertices() }
    fn has_curves(&self) -> bool { self.source.has_curves() }
    fn should_simplify(&self) -> bool { self.source.should_simplify() }
    fn simplify_threshold(&self) -> f64 { self.source.simplify_threshold() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::Path;
    use std::f64::NAN;

    fn cmds(v: &[Vertex<f64>]) -> Vec<PathCommand> {
        v.iter().map(|v| v.cmd).collect()
    }
    #[test]
    fn lines_restart_after_nan() {
        let p = Path::from_codes(&[(0.,0.),(1.,1.),(NAN,2.),(3.,3.),(4.,4.)], None).unwrap();
        let v = PathNanRemover::new(p.iter(), true, false).xconvert();
        assert_eq!(v.len(), 4);
        assert_eq!(cmds(&v), vec![PathCommand::MoveTo, PathCommand::LineTo,
                                  PathCommand::MoveTo, PathCommand::LineTo]);
        assert_eq!((v[2].x, v[2].y), (3.0, 3.0));
    }
    #[test]
    fn all_nan() {
        let p = Path::from_codes(&[(NAN,0.),(1.,NAN)], None).unwrap();
        let v = PathNanRemover::new(p.iter(), true, false).xconvert();
        assert!(v.is_empty());
    }
    #[test]
    fn disabled() {
        let p = Path::from_codes(&[(0.,0.),(NAN,1.)], None).unwrap();
        let v = PathNanRemover::new(p.iter(), false, false).xconvert();
        assert_eq!(v.len(), 2);
    }
    #[test]
    fn curve_segment_dropped() {
        let mut p = Path::new();
        p.move_to(0.0, 0.0);
        p.curve3(NAN, 1.0, 2.0, 0.0);
        p.line_to(3.0, 0.0);
        let v = PathNanRemover::new(p.iter(), true, true).xconvert();
        assert_eq!(cmds(&v), vec![PathCommand::MoveTo, PathCommand::MoveTo, PathCommand::LineTo]);
        assert_eq!((v[1].x, v[1].y), (2.0, 0.0));
        assert_eq!((v[2].x, v[2].y), (3.0, 0.0));
    }
    #[test]
    fn curve_kept() {
        let mut p = Path::new();
        p.move_to(0.0, 0.0);
        p.curve4(1.0, 1.0, 2.0, 1.0, 3.0, 0.0);
        p.close_polygon();
        let v = PathNanRemover::new(p.iter(), true, true).xconvert();
        assert_eq!(cmds(&v), vec![PathCommand::MoveTo, PathCommand::Curve4, PathCommand::Curve4,
                                  PathCommand::Curve4, PathCommand::Close]);
    }
}
