//! Extents of paths and path collections

use log::trace;

use crate::bbox::Bbox;
use crate::curves::ConvCurve;
use crate::geometry::collection_item_transform;
use crate::nan_remover::PathNanRemover;
use crate::paths::Path;
use crate::transform::{ConvTransform, Transform};
use crate::VertexSource;

/// Expand `bbox` and the minimum positive coordinates by a path
fn accumulate(path: &Path, trans: &Transform, bbox: &mut Bbox, minpos: &mut (f64, f64)) {
    let t = ConvTransform::new(path.iter(), *trans);
    let n = PathNanRemover::new(t, true, path.has_curves());
    let mut c = ConvCurve::new(n);
    for v in c.xconvert() {
        if ! v.cmd.is_vertex() {
            continue;
        }
        bbox.expand(v.x, v.y);
        if v.x > 0.0 && v.x < minpos.0 {
            minpos.0 = v.x;
        }
        if v.y > 0.0 && v.y < minpos.1 {
            minpos.1 = v.y;
        }
    }
}

/// Bounding box of the transformed path and the smallest positive x and y
///
/// Non-finite vertices are ignored; a path without finite vertices gives
/// [`Bbox::null`] and infinite minimum positive values
pub fn get_path_extents(path: &Path, trans: &Transform) -> (Bbox, (f64, f64)) {
    let mut bbox = Bbox::null();
    let mut minpos = (f64::INFINITY, f64::INFINITY);
    accumulate(path, trans, &mut bbox, &mut minpos);
    (bbox, minpos)
}

/// Grow existing extents by a path
///
/// With `ignore` the existing extents are discarded. An inverted axis of
/// `bbox` (x0 > x1 or y0 > y1) is treated as empty. Returns the new
/// extents, minimum positive values and whether anything changed.
pub fn update_path_extents(path: &Path, trans: &Transform, bbox: &Bbox,
                           minpos: (f64, f64), ignore: bool) -> (Bbox, (f64, f64), bool) {
    let (mut ext, mut mp) = if ignore {
        (Bbox::null(), (f64::INFINITY, f64::INFINITY))
    } else {
        let mut ext = *bbox;
        if ext.x0 > ext.x1 {
            ext.x0 = f64::INFINITY;
            ext.x1 = f64::NEG_INFINITY;
        }
        if ext.y0 > ext.y1 {
            ext.y0 = f64::INFINITY;
            ext.y1 = f64::NEG_INFINITY;
        }
        (ext, minpos)
    };
    accumulate(path, trans, &mut ext, &mut mp);
    let changed = ext != *bbox || mp != minpos;
    (ext, mp, changed)
}

/// Bounding box of all items of a collection
///
/// Items are laid out as for drawing, see
/// [`collection_item_transform`](../geometry/fn.collection_item_transform.html)
pub fn get_path_collection_extents(master: &Transform, paths: &[Path],
                                   transforms: &[Transform],
                                   offsets: &[(f64,f64)],
                                   offset_trans: &Transform) -> Bbox {
    let mut bbox = Bbox::null();
    if paths.is_empty() {
        return bbox;
    }
    let mut minpos = (f64::INFINITY, f64::INFINITY);
    let n = paths.len().max(offsets.len());
    let transforms = &transforms[.. transforms.len().min(n)];
    trace!("get_path_collection_extents: {} items", n);
    for i in 0 .. n {
        let trans = collection_item_transform(master, transforms, offsets, offset_trans, i);
        accumulate(&paths[i % paths.len()], &trans, &mut bbox, &mut minpos);
    }
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::NAN;

    #[test]
    fn extents_and_minpos() {
        let p = Path::from_codes(&[(-1.0, 2.0), (3.0, 0.5), (NAN, 9.0), (0.25, -4.0)], None).unwrap();
        let (b, mp) = get_path_extents(&p, &Transform::new());
        assert_eq!(b, Bbox::new(-1.0, -4.0, 3.0, 2.0));
        assert_eq!(mp, (0.25, 0.5));
    }
    #[test]
    fn all_nan() {
        let p = Path::from_codes(&[(NAN, NAN), (NAN, 1.0)], None).unwrap();
        let (b, _) = get_path_extents(&p, &Transform::new());
        assert_eq!(b.to_array(), [f64::INFINITY, f64::INFINITY,
                                  f64::NEG_INFINITY, f64::NEG_INFINITY]);
    }
    #[test]
    fn update() {
        let p = Path::from_codes(&[(1.0, 1.0), (2.0, 2.0)], None).unwrap();
        let t = Transform::new();
        let start = Bbox::new(0.0, 0.0, 5.0, 5.0);
        let (b, _, changed) = update_path_extents(&p, &t, &start, (0.5, 0.5), false);
        assert_eq!(b, start);
        assert!( ! changed);
        let (b, mp, changed) = update_path_extents(&p, &t, &start, (0.5, 0.5), true);
        assert_eq!(b, Bbox::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(mp, (1.0, 1.0));
        assert!(changed);
        // Inverted boxes are empty
        let (b, _, _) = update_path_extents(&p, &t, &Bbox::new(5.0, 5.0, 0.0, 0.0), (1.0, 1.0), false);
        assert_eq!(b, Bbox::new(1.0, 1.0, 2.0, 2.0));
    }
    #[test]
    fn collection() {
        let paths = vec![Path::polygon(&[(0.,0.),(1.,0.),(1.,1.)])];
        let trans = vec![Transform::new_scale(2.0, 2.0)];
        let offsets = vec![(0.0, 0.0), (10.0, 5.0)];
        let b = get_path_collection_extents(&Transform::new(), &paths, &trans,
                                            &offsets, &Transform::new());
        assert_eq!(b, Bbox::new(0.0, 0.0, 12.0, 7.0));
    }
}
