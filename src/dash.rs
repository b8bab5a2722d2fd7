//! Dashed lines
//!
//! # Example
//!
//!     use agg_backend::{Path, Dash, VertexSource, PathCommand};
//!
//!     let mut path = Path::new();
//!     path.move_to( 0.0, 0.0);
//!     path.line_to(10.0, 0.0);
//!
//!     let mut dash = Dash::new( path.iter() );
//!     dash.add_dash(2.0, 3.0);
//!     let v = dash.xconvert();
//!     // On from 0 to 2, off to 5, on to 7 and off to 10
//!     let on : Vec<_> = v.iter().filter(|v| v.cmd == PathCommand::LineTo)
//!         .map(|v| v.x).collect();
//!     assert_eq!(on, vec![2.0, 7.0]);
//!

use crate::paths::{len, split, PathCommand, Vertex};
use crate::VertexSource;

/// Splits each sub path into alternating on and off runs
///
/// Even entries of the pattern are drawn, odd entries are gaps. The
/// pattern restarts at the dash offset for every sub path. Drawn runs
/// start with a move to and continue with line tos, the result is meant to
/// be passed on to a [`Stroke`](../stroke/struct.Stroke.html).
#[derive(Debug)]
pub struct Dash<T> {
    source: T,
    /// Lengths of on, off, on, off, ...
    dashes: Vec<f64>,
    /// Offset into the pattern
    dash_start: f64,
    out: Vec<Vertex<f64>>,
    pos: usize,
}

impl<T: VertexSource> Dash<T> {
    /// Create a dash generator without any dashes
    pub fn new(source: T) -> Self {
        Self { source, dashes: vec![], dash_start: 0.0, out: vec![], pos: 0 }
    }
    /// Remove all dashes, the path is passed through unchanged
    pub fn remove_all_dashes(&mut self) {
        self.dashes.clear();
    }
    /// Add an on and off pair
    pub fn add_dash(&mut self, dash_len: f64, gap_len: f64) {
        self.dashes.push(dash_len.max(0.0));
        self.dashes.push(gap_len.max(0.0));
    }
    /// Offset into the dash pattern where each sub path begins
    pub fn dash_start(&mut self, ds: f64) {
        self.dash_start = ds;
    }
    fn total_dash_len(&self) -> f64 {
        self.dashes.iter().sum()
    }
    /// Position in the pattern: index and distance into that entry
    fn calc_dash_start(&self) -> (usize, f64) {
        let mut ds = self.dash_start.abs() % self.total_dash_len();
        let mut i = 0;
        while ds > 0.0 {
            if ds > self.dashes[i] {
                ds -= self.dashes[i];
                i = (i + 1) % self.dashes.len();
            } else {
                return (i, ds);
            }
        }
        (i, 0.0)
    }
    /// Dash a single sub path
    fn dash_subpath(&self, pts: &[Vertex<f64>], out: &mut Vec<Vertex<f64>>) {
        if pts.len() < 2 {
            return;
        }
        let (mut curr, mut curr_start) = self.calc_dash_start();
        out.push(Vertex::move_to(pts[0].x, pts[0].y));
        for w in pts.windows(2) {
            let (v1, v2) = (&w[0], &w[1]);
            let dist = len(v1, v2);
            let mut rest = dist;
            loop {
                let dash_rest = self.dashes[curr] - curr_start;
                let cmd = if curr % 2 == 1 { PathCommand::MoveTo } else { PathCommand::LineTo };
                if rest > dash_rest {
                    rest -= dash_rest;
                    curr = (curr + 1) % self.dashes.len();
                    curr_start = 0.0;
                    out.push(Vertex::new(v2.x - (v2.x - v1.x) * rest / dist,
                                         v2.y - (v2.y - v1.y) * rest / dist,
                                         cmd));
                } else {
                    curr_start += rest;
                    out.push(Vertex::new(v2.x, v2.y, cmd));
                    break;
                }
            }
        }
    }
    fn dash(&self, input: &[Vertex<f64>]) -> Vec<Vertex<f64>> {
        let mut out = vec![];
        for (m1, m2, closed) in split(input) {
            let mut pts : Vec<Vertex<f64>> = vec![];
            for p in &input[m1..m2] {
                match pts.last() {
                    Some(last) if len(last, p) < 1e-6 => {},
                    _ => pts.push(*p),
                }
            }
            if closed && pts.len() > 2 {
                let first = pts[0];
                pts.push(first);
            }
            self.dash_subpath(&pts, &mut out);
        }
        out
    }
}

impl<T: VertexSource> VertexSource for Dash<T> {
    fn rewind(&mut self, _path_id: usize) {
        let input = self.source.xconvert();
        self.out = if self.dashes.is_empty() || self.total_dash_len() <= 0.0 {
            input
        } else {
            self.dash(&input)
        };
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
