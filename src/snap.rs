//! Snapping vertices to pixel centers

use std::str::FromStr;

use crate::error::RenderError;
use crate::math::mpl_round;
use crate::paths::{PathCommand, PathSource, Vertex};
use crate::VertexSource;

/// Paths longer than this are never snapped automatically
const SNAP_MAX_VERTICES : usize = 1024;

/// When vertices are snapped
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum SnapMode {
    /// Snap only paths of horizontal and vertical lines
    Auto,
    /// Always snap
    True,
    /// Never snap
    False,
}

impl Default for SnapMode {
    fn default() -> Self {
        SnapMode::Auto
    }
}

impl FromStr for SnapMode {
    type Err = RenderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(SnapMode::Auto),
            "true" => Ok(SnapMode::True),
            "false" => Ok(SnapMode::False),
            _ => Err(RenderError::InvalidSnap(s.to_string())),
        }
    }
}

impl From<Option<bool>> for SnapMode {
    fn from(v: Option<bool>) -> Self {
        match v {
            None => SnapMode::Auto,
            Some(true) => SnapMode::True,
            Some(false) => SnapMode::False,
        }
    }
}

/// Rounds vertices to pixel centers so thin straight lines stay crisp
///
/// Each vertex becomes floor(v + 0.5) + s, with s = 0.5 for odd stroke
/// widths and 0 for even widths
#[derive(Debug)]
pub struct PathSnapper<T> {
    source: T,
    snap: bool,
    snap_value: f64,
}

impl<T: VertexSource> PathSnapper<T> {
    /// Decide if the path is snapped; the source is scanned and rewound
    pub fn new(mut source: T, mode: SnapMode, total_vertices: usize, stroke_width: f64) -> Self {
        let snap = Self::should_snap(&mut source, mode, total_vertices);
        let snap_value = if snap && (mpl_round(stroke_width) as i64) % 2 != 0 {
            0.5
        } else {
            0.0
        };
        source.rewind(0);
        Self { source, snap, snap_value }
    }
    /// Vertices are being snapped
    pub fn is_snapping(&self) -> bool {
        self.snap
    }
    fn should_snap(path: &mut T, mode: SnapMode, total_vertices: usize) -> bool {
        match mode {
            SnapMode::True => return true,
            SnapMode::False => return false,
            SnapMode::Auto => {},
        }
        if total_vertices > SNAP_MAX_VERTICES {
            return false;
        }
        path.rewind(0);
        let first = path.vertex();
        if first.cmd == PathCommand::Stop {
            return false;
        }
        let (mut x0, mut y0) = (first.x, first.y);
        loop {
            let v = path.vertex();
            match v.cmd {
                PathCommand::Stop => break,
                PathCommand::Curve3 | PathCommand::Curve4 => return false,
                PathCommand::LineTo => {
                    if x0 != v.x && y0 != v.y {
                        return false;
                    }
                },
                PathCommand::MoveTo | PathCommand::Close => {},
            }
            if v.cmd.is_vertex() {
                x0 = v.x;
                y0 = v.y;
            }
        }
        true
    }
}

impl<T: VertexSource> VertexSource for PathSnapper<T> {
    fn rewind(&mut self, path_id: usize) {
        self.source.rewind(path_id);
    }
    fn vertex(&mut self) -> Vertex<f64> {
        let mut v = self.source.vertex();
        if self.snap && v.cmd.is_vertex() {
            v.x = (v.x + 0.5).floor() + self.snap_value;
            v.y = (v.y + 0.5).floor() + self.snap_value;
        }
        v
    }
}

impl<T: PathSource> PathSource for PathSnapper<T> {
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
    fn axis_aligned_snaps() {
        let p = Path::from_codes(&[(0.2, 5.3), (10.4, 5.3)], None).unwrap();
        let mut s = PathSnapper::new(p.iter(), SnapMode::Auto, 2, 1.0);
        assert!(s.is_snapping());
        let v = s.xconvert();
        assert_eq!((v[0].x, v[0].y), (0.5, 5.5));
        assert_eq!((v[1].x, v[1].y), (10.5, 5.5));
        // Even widths snap to pixel edges
        let mut s = PathSnapper::new(p.iter(), SnapMode::Auto, 2, 2.0);
        let v = s.xconvert();
        assert_eq!((v[0].x, v[0].y), (0.0, 5.0));
    }
    #[test]
    fn diagonal_not_snapped() {
        let p = Path::from_codes(&[(0.2, 0.2), (10.4, 5.3)], None).unwrap();
        let s = PathSnapper::new(p.iter(), SnapMode::Auto, 2, 1.0);
        assert!( ! s.is_snapping());
        let s = PathSnapper::new(p.iter(), SnapMode::True, 2, 1.0);
        assert!(s.is_snapping());
    }
    #[test]
    fn curves_and_size() {
        let mut p = Path::new();
        p.move_to(0.0, 0.0);
        p.curve3(1.0, 0.0, 1.0, 1.0);
        assert!( ! PathSnapper::new(p.iter(), SnapMode::Auto, 3, 1.0).is_snapping());
        let p = Path::from_codes(&[(0.0, 0.0), (1.0, 0.0)], None).unwrap();
        assert!( ! PathSnapper::new(p.iter(), SnapMode::Auto, 2000, 1.0).is_snapping());
    }
    #[test]
    fn parse_mode() {
        assert_eq!("auto".parse::<SnapMode>().unwrap(), SnapMode::Auto);
        assert!(matches!("maybe".parse::<SnapMode>(), Err(RenderError::InvalidSnap(_))));
        assert_eq!(SnapMode::from(Some(false)), SnapMode::False);
    }
}
