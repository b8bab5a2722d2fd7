//! Clipping of paths to a rectangle before rasterization

use std::collections::VecDeque;

use crate::clip::{clip_line_segment, Rectangle, SegmentClip};
use crate::paths::{PathCommand, PathSource, Vertex};
use crate::VertexSource;

/// How a path is clipped
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum ClipMode {
    /// Line segments are clipped individually, sub paths may be split
    Stroke,
    /// Sub paths are clipped as polygons and stay closed
    Fill,
}

/// One pass of Sutherland-Hodgman against an axis aligned half plane
fn clip_one_step<F, B>(polygon: &[(f64,f64)], inside: F, bisect: B) -> Vec<(f64,f64)>
    where F: Fn(f64, f64) -> bool,
          B: Fn(f64, f64, f64, f64) -> (f64, f64)
{
    let mut out = Vec::with_capacity(polygon.len());
    let (mut sx, mut sy) = match polygon.last() {
        Some(&p) => p,
        None => return out,
    };
    for &(px, py) in polygon {
        let sinside = inside(sx, sy);
        let pinside = inside(px, py);
        if sinside != pinside {
            out.push(bisect(sx, sy, px, py));
        }
        if pinside {
            out.push((px, py));
        }
        sx = px;
        sy = py;
    }
    out
}

/// Clip a closed polygon against the rectangle [xmin,xmax] x [ymin,ymax]
///
/// The four passes keep x <= xmax, x >= xmin, y <= ymax and y >= ymin.
/// Bounds are used as given, swapping min and max selects the outside
pub fn clip_polygon_to_rect(polygon: &[(f64,f64)],
                            xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Vec<(f64,f64)> {
    let bisect_x = |m: f64| move |sx: f64, sy: f64, px: f64, py: f64| {
        (m, sy + (py - sy) * ((m - sx) / (px - sx)))
    };
    let bisect_y = |m: f64| move |sx: f64, sy: f64, px: f64, py: f64| {
        (sx + (px - sx) * ((m - sy) / (py - sy)), m)
    };
    let p = clip_one_step(polygon, |x,_| x <= xmax, bisect_x(xmax));
    let p = clip_one_step(&p, |x,_| x >= xmin, bisect_x(xmin));
    let p = clip_one_step(&p, |_,y| y <= ymax, bisect_y(ymax));
    clip_one_step(&p, |_,y| y >= ymin, bisect_y(ymin))
}

/// Clips a path to a rectangle
///
/// Stroke mode clips each line segment, a segment whose start moved onto
/// the rectangle begins a new sub path; closing such a broken sub path
/// becomes a line back to its start. Fill mode clips each sub path as a
/// polygon and closes the result. Curves are passed through unclipped.
#[derive(Debug)]
pub struct PathClipper<T> {
    source: T,
    do_clipping: bool,
    mode: ClipMode,
    cliprect: Rectangle<f64>,
    queue: VecDeque<Vertex<f64>>,
    last: (f64, f64),
    init: Option<(f64, f64)>,
    moveto: bool,
    broke_path: bool,
    pending: Option<Vertex<f64>>,
}

impl<T: VertexSource> PathClipper<T> {
    /// Clip to the rectangle `rect`
    pub fn new(source: T, do_clipping: bool, mode: ClipMode, rect: Rectangle<f64>) -> Self {
        Self { source, do_clipping, mode, cliprect: rect,
               queue: VecDeque::new(),
               last: (0.0, 0.0), init: None,
               moveto: false, broke_path: false, pending: None }
    }
    /// Clip to a canvas of `width` x `height`, expanded by one pixel on each side
    pub fn with_size(source: T, do_clipping: bool, mode: ClipMode, width: f64, height: f64) -> Self {
        let rect = Rectangle::new(-1.0, -1.0, width + 1.0, height + 1.0);
        Self::new(source, do_clipping, mode, rect)
    }
    /// Clip a segment from the last point, queue the visible part
    fn segment(&mut self, x: f64, y: f64) {
        let (mut x0, mut y0) = self.last;
        let (mut x1, mut y1) = (x, y);
        self.last = (x, y);
        match clip_line_segment(&mut x0, &mut y0, &mut x1, &mut y1, &self.cliprect) {
            SegmentClip::Visible { first_moved, second_moved } => {
                if self.moveto || first_moved {
                    self.queue.push_back(Vertex::move_to(x0, y0));
                    self.moveto = false;
                }
                self.queue.push_back(Vertex::line_to(x1, y1));
                self.broke_path = self.broke_path || first_moved || second_moved;
            },
            SegmentClip::Outside => {
                self.broke_path = true;
            },
        }
    }
    fn vertex_stroke(&mut self) -> Vertex<f64> {
        loop {
            if let Some(v) = self.queue.pop_front() {
                return v;
            }
            let v = self.source.vertex();
            match v.cmd {
                PathCommand::Stop => return v,
                PathCommand::MoveTo => {
                    self.init = Some((v.x, v.y));
                    self.last = (v.x, v.y);
                    self.moveto = true;
                    self.broke_path = false;
                },
                PathCommand::LineTo => self.segment(v.x, v.y),
                PathCommand::Curve3 | PathCommand::Curve4 => {
                    if self.moveto {
                        let (x0, y0) = self.last;
                        self.queue.push_back(Vertex::move_to(x0, y0));
                        self.moveto = false;
                    }
                    self.last = (v.x, v.y);
                    self.queue.push_back(v);
                },
                PathCommand::Close => {
                    match self.init {
                        Some((ix, iy)) if self.broke_path => self.segment(ix, iy),
                        _ => {
                            if ! self.moveto {
                                self.queue.push_back(v);
                            }
                        }
                    }
                    if let Some(p) = self.init {
                        self.last = p;
                    }
                },
            }
        }
    }
    /// Read one sub path, clip it as a polygon and queue the result
    fn fill_subpath(&mut self) -> bool {
        let first = match self.pending.take() {
            Some(v) => v,
            None => self.source.vertex(),
        };
        let mut poly = vec![];
        match first.cmd {
            PathCommand::Stop => return false,
            PathCommand::Close => return true,
            _ => poly.push((first.x, first.y)),
        }
        loop {
            let v = self.source.vertex();
            match v.cmd {
                PathCommand::MoveTo | PathCommand::Stop => {
                    self.pending = Some(v);
                    break;
                },
                PathCommand::Close => break,
                _ => poly.push((v.x, v.y)),
            }
        }
        let r = &self.cliprect;
        let out = clip_polygon_to_rect(&poly, r.x1, r.y1, r.x2, r.y2);
        for (i, &(x, y)) in out.iter().enumerate() {
            let cmd = if i == 0 { PathCommand::MoveTo } else { PathCommand::LineTo };
            self.queue.push_back(Vertex::new(x, y, cmd));
        }
        if ! out.is_empty() {
            self.queue.push_back(Vertex::close_polygon(0.0, 0.0));
        }
        true
    }
    fn vertex_fill(&mut self) -> Vertex<f64> {
        loop {
            if let Some(v) = self.queue.pop_front() {
                return v;
            }
            if ! self.fill_subpath() {
                return Vertex::stop();
            }
        }
    }
}

impl<T: VertexSource> VertexSource for PathClipper<T> {
    fn rewind(&mut self, path_id: usize) {
        self.queue.clear();
        self.init = None;
        self.moveto = false;
        self.broke_path = false;
        self.pending = None;
        self.source.rewind(path_id);
    }
    fn vertex(&mut self) -> Vertex<f64> {
        if ! self.do_clipping {
            return self.source.vertex();
        }
        match self.mode {
            ClipMode::Stroke => self.vertex_stroke(),
            ClipMode::Fill => self.vertex_fill(),
        }
    }
}

impl<T: PathSource> PathSource for PathClipper<T> {
    fn total_vertices(&self) -> usize { self.source.total_vertices() }
    fn has_curves(&self) -> bool { self.source.has_curves() }
    fn should_simplify(&self) -> bool { self.source.should_simplify() }
    fn simplify_threshold(&self) -> f64 { self.source.simplify_threshold() }
}
