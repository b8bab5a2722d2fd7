//! Hit testing and intersection of paths
//!
//! All tests run on the transformed, NaN free and flattened vertex stream.

use log::trace;

use crate::bbox::Bbox;
use crate::curves::ConvCurve;
use crate::nan_remover::PathNanRemover;
use crate::paths::{Path, PathCommand, PathIterator};
use crate::stroke::Stroke;
use crate::transform::{ConvTransform, Transform};
use crate::VertexSource;

/// Sub paths of a vertex stream as lists of points
///
/// Close vertices end a sub path; the closing edge is implied
fn subpaths<VS: VertexSource>(source: &mut VS) -> Vec<Vec<(f64,f64)>> {
    let mut out : Vec<Vec<(f64,f64)>> = vec![];
    let mut cur : Vec<(f64,f64)> = vec![];
    source.rewind(0);
    loop {
        let v = source.vertex();
        match v.cmd {
            PathCommand::Stop => break,
            PathCommand::MoveTo => {
                if ! cur.is_empty() {
                    out.push(std::mem::take(&mut cur));
                }
                cur.push((v.x, v.y));
            },
            PathCommand::Close => {
                if ! cur.is_empty() {
                    out.push(std::mem::take(&mut cur));
                }
            },
            _ => cur.push((v.x, v.y)),
        }
    }
    if ! cur.is_empty() {
        out.push(cur);
    }
    out
}

/// Ray casting in +x; every sub path is closed and tested on its own
///
/// A point is inside if any sub path contains it
fn points_in_source<VS: VertexSource>(points: &[(f64,f64)], source: &mut VS) -> Vec<bool> {
    let subs = subpaths(source);
    points.iter().map(|&(tx, ty)| {
        subs.iter().any(|sub| {
            let n = sub.len();
            let mut inside = false;
            for i in 0 .. n {
                let (x0, y0) = sub[i];
                let (x1, y1) = sub[(i + 1) % n];
                let yflag0 = y0 >= ty;
                let yflag1 = y1 >= ty;
                if yflag0 != yflag1 &&
                    (((y1 - ty) * (x0 - x1) >= (x1 - tx) * (y0 - y1)) == yflag1) {
                    inside = ! inside;
                }
            }
            inside
        })
    }).collect()
}

/// Transformed, NaN free and flattened vertices of a path
fn flattened<'a>(path: &'a Path, trans: &Transform)
                 -> ConvCurve<PathNanRemover<ConvTransform<PathIterator<'a>>>> {
    let t = ConvTransform::new(path.iter(), *trans);
    let n = PathNanRemover::new(t, true, path.has_curves());
    ConvCurve::new(n)
}

/// Test which points are inside a path
///
/// Paths with fewer than 3 vertices contain nothing
pub fn points_in_path(points: &[(f64,f64)], path: &Path, trans: &Transform) -> Vec<bool> {
    if path.total_vertices() < 3 {
        return vec![false; points.len()];
    }
    points_in_source(points, &mut flattened(path, trans))
}

/// Test if (`x`,`y`) is inside a path
pub fn point_in_path(x: f64, y: f64, path: &Path, trans: &Transform) -> bool {
    points_in_path(&[(x, y)], path, trans)[0]
}

/// Test if (`x`,`y`) is within `r` of the path outline
pub fn point_on_path(x: f64, y: f64, r: f64, path: &Path, trans: &Transform) -> bool {
    let mut stroke = Stroke::new(flattened(path, trans));
    stroke.width(r * 2.0);
    points_in_source(&[(x, y)], &mut stroke)[0]
}

/// Test if every vertex of path `b` is inside path `a`
pub fn path_in_path(a: &Path, atrans: &Transform, b: &Path, btrans: &Transform) -> bool {
    if a.total_vertices() < 3 {
        return false;
    }
    let mut bsrc = ConvCurve::new(ConvTransform::new(b.iter(), *btrans));
    let pts : Vec<_> = bsrc.xconvert().into_iter()
        .filter(|v| v.cmd.is_vertex())
        .map(|v| (v.x, v.y))
        .collect();
    points_in_path(&pts, a, atrans).into_iter().all(|inside| inside)
}

/// Test if segment 1-2 and segment 3-4 intersect
///
/// Parallel segments never intersect
#[allow(clippy::too_many_arguments)]
pub fn segments_intersect(x1: f64, y1: f64, x2: f64, y2: f64,
                          x3: f64, y3: f64, x4: f64, y4: f64) -> bool {
    let den = ((y4 - y3) * (x2 - x1)) - ((x4 - x3) * (y2 - y1));
    if den == 0.0 {
        return false;
    }
    let n1 = ((x4 - x3) * (y1 - y3)) - ((y4 - y3) * (x1 - x3));
    let n2 = ((x2 - x1) * (y1 - y3)) - ((y2 - y1) * (x1 - x3));
    let u1 = n1 / den;
    let u2 = n2 / den;
    (0.0 ..= 1.0).contains(&u1) && (0.0 ..= 1.0).contains(&u2)
}

/// Line segments of a flattened path, implied closing segments are not included
fn segments(path: &Path) -> Vec<(f64, f64, f64, f64)> {
    let mut out = vec![];
    for sub in subpaths(&mut ConvCurve::new(path.iter())) {
        for w in sub.windows(2) {
            out.push((w[0].0, w[0].1, w[1].0, w[1].1));
        }
    }
    out
}

/// Test if two paths cross
///
/// With `filled` a path lying completely inside the other also counts
pub fn path_intersects_path(p1: &Path, p2: &Path, filled: bool) -> bool {
    if p1.total_vertices() < 2 || p2.total_vertices() < 2 {
        return false;
    }
    let s2 = segments(p2);
    for &(x11, y11, x12, y12) in &segments(p1) {
        for &(x21, y21, x22, y22) in &s2 {
            if segments_intersect(x11, y11, x12, y12, x21, y21, x22, y22) {
                return true;
            }
        }
    }
    let ident = Transform::new();
    filled && (path_in_path(p1, &ident, p2, &ident) || path_in_path(p2, &ident, p1, &ident))
}

/// Count boxes overlapping `bbox`, touching boxes do not count
pub fn count_bboxes_overlapping_bbox(bbox: &Bbox, bboxes: &[Bbox]) -> usize {
    bboxes.iter().filter(|b| bbox.overlaps(b)).count()
}

/// Transform of item `i` of a collection
///
/// Per item arrays shorter than the collection repeat; the item transform
/// is applied before `master` and the offset, transformed by
/// `offset_trans`, is added last
pub fn collection_item_transform(master: &Transform, transforms: &[Transform],
                                 offsets: &[(f64,f64)], offset_trans: &Transform,
                                 i: usize) -> Transform {
    let mut trans = if transforms.is_empty() {
        *master
    } else {
        transforms[i % transforms.len()] * *master
    };
    if ! offsets.is_empty() {
        let (xo, yo) = offsets[i % offsets.len()];
        let (xo, yo) = offset_trans.transform(xo, yo);
        trans = trans * Transform::new_translate(xo, yo);
    }
    trans
}

/// Indices of the collection items hit by (`x`,`y`)
///
/// Filled items are hit inside, others within `r` of their outline
#[allow(clippy::too_many_arguments)]
pub fn point_in_path_collection(x: f64, y: f64, r: f64,
                                master: &Transform, paths: &[Path],
                                transforms: &[Transform],
                                offsets: &[(f64,f64)], offset_trans: &Transform,
                                filled: bool) -> Vec<usize> {
    if paths.is_empty() {
        return vec![];
    }
    let n = paths.len().max(offsets.len());
    let transforms = &transforms[.. transforms.len().min(n)];
    trace!("point_in_path_collection: {} items", n);
    (0 .. n).filter(|&i| {
        let path = &paths[i % paths.len()];
        let trans = collection_item_transform(master, transforms, offsets, offset_trans, i);
        if filled {
            point_in_path(x, y, path, &trans)
        } else {
            point_on_path(x, y, r, path, &trans)
        }
    }).collect()
}
