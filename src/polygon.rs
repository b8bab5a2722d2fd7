//! Conversion of paths to polygons and cleaned vertex lists

use log::trace;

use crate::bbox::Bbox;
use crate::clip::Rectangle;
use crate::curves::ConvCurve;
use crate::nan_remover::PathNanRemover;
use crate::path_clipper::{clip_polygon_to_rect, ClipMode, PathClipper};
use crate::paths::{Path, PathCommand, Vertex};
use crate::simplify::PathSimplifier;
use crate::snap::{PathSnapper, SnapMode};
use crate::transform::{ConvTransform, Transform};
use crate::VertexSource;

/// Clip every sub path of a path to a rectangle
///
/// Curves are flattened first. With `inside` false the bounds of the
/// rectangle are swapped. Sub paths clipped away completely are dropped;
/// the polygons returned are implicitly closed.
pub fn clip_path_to_rect(path: &Path, rect: &Bbox, inside: bool) -> Vec<Vec<(f64,f64)>> {
    let r = rect.normalized();
    let (xmin, ymin, xmax, ymax) = if inside {
        (r.x0, r.y0, r.x1, r.y1)
    } else {
        (r.x1, r.y1, r.x0, r.y0)
    };
    let mut out = vec![];
    let mut poly : Vec<(f64,f64)> = vec![];
    let mut emit = |poly: &mut Vec<(f64,f64)>| {
        if ! poly.is_empty() {
            let clipped = clip_polygon_to_rect(poly, xmin, ymin, xmax, ymax);
            if ! clipped.is_empty() {
                out.push(clipped);
            }
            poly.clear();
        }
    };
    let mut curve = ConvCurve::new(path.iter());
    curve.rewind(0);
    loop {
        let v = curve.vertex();
        match v.cmd {
            PathCommand::Stop => break,
            PathCommand::MoveTo => {
                emit(&mut poly);
                poly.push((v.x, v.y));
            },
            PathCommand::Close => emit(&mut poly),
            _ => poly.push((v.x, v.y)),
        }
    }
    emit(&mut poly);
    out
}

/// Convert a path into a list of polygons in device coordinates
///
/// The path is transformed, cleaned of NaNs, clipped to the canvas when
/// `width` and `height` are both non-zero, simplified and flattened. Closed
/// sub paths repeat their first point at the end.
pub fn convert_path_to_polygons(path: &Path, trans: &Transform,
                                width: f64, height: f64) -> Vec<Vec<(f64,f64)>> {
    let do_clip = width != 0.0 && height != 0.0;
    let t = ConvTransform::new(path.iter(), *trans);
    let n = PathNanRemover::new(t, true, path.has_curves());
    let c = PathClipper::with_size(n, do_clip, ClipMode::Stroke, width, height);
    let s = PathSimplifier::new(c, path.should_simplify(), path.simplify_threshold());
    let mut curve = ConvCurve::new(s);

    let mut out = vec![];
    let mut poly : Vec<(f64,f64)> = vec![];
    curve.rewind(0);
    loop {
        let v = curve.vertex();
        match v.cmd {
            PathCommand::Stop => break,
            PathCommand::MoveTo => {
                if ! poly.is_empty() {
                    out.push(std::mem::take(&mut poly));
                }
                poly.push((v.x, v.y));
            },
            PathCommand::Close => {
                if let Some(&first) = poly.first() {
                    poly.push(first);
                    out.push(std::mem::take(&mut poly));
                }
            },
            _ => poly.push((v.x, v.y)),
        }
    }
    if ! poly.is_empty() {
        out.push(poly);
    }
    trace!("convert_path_to_polygons: {} polygons", out.len());
    out
}

/// Options for [`cleanup_path`]
#[derive(Debug,Clone,Copy)]
pub struct CleanupOptions {
    /// Drop non-finite vertices
    pub remove_nans: bool,
    /// Clip line segments to this rectangle
    pub clip_rect: Option<Bbox>,
    /// Snap vertices to pixel centers
    pub snap_mode: SnapMode,
    /// Stroke width used to pick the snap offset
    pub stroke_width: f64,
    /// Simplify; `None` follows the path's own setting
    pub simplify: Option<bool>,
    /// Keep curves, otherwise they are flattened
    pub return_curves: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self { remove_nans: false, clip_rect: None, snap_mode: SnapMode::False,
               stroke_width: 1.0, simplify: Some(false), return_curves: true }
    }
}

/// Run a path through the drawing filters and return the vertices
///
/// The result ends with a Stop vertex
pub fn cleanup_path(path: &Path, trans: &Transform, opts: &CleanupOptions) -> Vec<Vertex<f64>> {
    let rect = opts.clip_rect.map(|b| Rectangle::new(b.x0, b.y0, b.x1, b.y1))
        .unwrap_or_default();
    let simplify = opts.simplify.unwrap_or_else(|| path.should_simplify());

    let t = ConvTransform::new(path.iter(), *trans);
    let n = PathNanRemover::new(t, opts.remove_nans, path.has_curves());
    let c = PathClipper::new(n, opts.clip_rect.is_some(), ClipMode::Stroke, rect);
    let s = PathSnapper::new(c, opts.snap_mode, path.total_vertices(), opts.stroke_width);
    let mut simp = PathSimplifier::new(s, simplify, path.simplify_threshold());

    let mut out = if opts.return_curves {
        simp.xconvert()
    } else {
        ConvCurve::new(simp).xconvert()
    };
    out.push(Vertex::stop());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_polygon_unchanged() {
        let pts = vec![(1.,1.),(4.,1.),(4.,4.),(1.,4.)];
        let p = Path::polygon(&pts);
        let out = clip_path_to_rect(&p, &Bbox::new(0., 0., 10., 10.), true);
        assert_eq!(out, vec![pts]);
    }
    #[test]
    fn clip_drops_outside() {
        let mut p = Path::polygon(&[(1.,1.),(4.,1.),(4.,4.)]);
        p.move_to(20., 20.);
        p.line_to(30., 20.);
        p.line_to(30., 30.);
        p.close_polygon();
        let out = clip_path_to_rect(&p, &Bbox::new(10., 10., 0., 0.), true);
        assert_eq!(out.len(), 1);
    }
    #[test]
    fn clip_cuts() {
        let p = Path::polygon(&[(-5.,-5.),(5.,-5.),(5.,5.),(-5.,5.)]);
        let out = clip_path_to_rect(&p, &Bbox::new(0., 0., 10., 10.), true);
        assert_eq!(out.len(), 1);
        for &(x, y) in &out[0] {
            assert!(x >= 0.0 && x <= 5.0 && y >= 0.0 && y <= 5.0);
        }
    }
    #[test]
    fn polygons() {
        let mut p = Path::polygon(&[(0.,0.),(2.,0.),(2.,2.)]);
        p.move_to(5., 5.);
        p.line_to(6., 6.);
        let out = convert_path_to_polygons(&p, &Transform::new_translate(1.0, 0.0), 0.0, 0.0);
        assert_eq!(out, vec![vec![(1.,0.),(3.,0.),(3.,2.),(1.,0.)],
                             vec![(6.,5.),(7.,6.)]]);
    }
    #[test]
    fn cleanup_ends_with_stop() {
        let p = Path::from_codes(&[(0.2, 0.2), (10.2, 0.2)], None).unwrap();
        let opts = CleanupOptions { snap_mode: SnapMode::True, ..Default::default() };
        let v = cleanup_path(&p, &Transform::new(), &opts);
        assert_eq!(v.len(), 3);
        assert_eq!((v[0].x, v[0].y), (0.5, 0.5));
        assert_eq!((v[1].x, v[1].y), (10.5, 0.5));
        assert_eq!(v[2].cmd, PathCommand::Stop);
    }
    #[test]
    fn cleanup_flattens() {
        let mut p = Path::new();
        p.move_to(0.0, 0.0);
        p.curve3(5.0, 10.0, 10.0, 0.0);
        let keep = cleanup_path(&p, &Transform::new(), &CleanupOptions::default());
        assert_eq!(keep.len(), 4);
        let opts = CleanupOptions { return_curves: false, ..Default::default() };
        let flat = cleanup_path(&p, &Transform::new(), &opts);
        assert!(flat.len() > 4);
        assert!(flat[1..flat.len()-1].iter().all(|v| v.cmd == PathCommand::LineTo));
    }
}
