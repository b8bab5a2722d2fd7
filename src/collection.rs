//! Collections of paths and quadrilateral meshes
//!
//! Per item arrays shorter than the number of items repeat, item `i`
//! takes element `i % len`.

use log::{debug, warn};

use crate::color::{Rgba, Rgba8};
use crate::error::{RenderError, Result};
use crate::gc::{Dashes, GraphicsContext};
use crate::geometry::collection_item_transform;
use crate::math::mpl_round;
use crate::paths::Path;
use crate::renderer::RendererAgg;
use crate::transform::Transform;

/// Shapes drawn by [`RendererAgg::draw_path_collection`]
///
/// [`RendererAgg::draw_path_collection`]: ../renderer/struct.RendererAgg.html#method.draw_path_collection
#[derive(Debug,Clone)]
pub struct PathCollection<'a> {
    /// Applied to every path after its own transform
    pub master_transform: Transform,
    pub paths: &'a [Path],
    pub transforms: &'a [Transform],
    /// Offsets, transformed by `offset_trans`, are added last
    pub offsets: &'a [(f64, f64)],
    pub offset_trans: Transform,
    pub facecolors: &'a [Rgba],
    pub edgecolors: &'a [Rgba],
    /// Line widths in points
    pub linewidths: &'a [f64],
    pub linestyles: &'a [Dashes],
    pub antialiaseds: &'a [bool],
}

impl<'a> PathCollection<'a> {
    /// Collection of `paths` without offsets, colors or styles
    pub fn new(paths: &'a [Path]) -> Self {
        Self { master_transform: Transform::new(), paths,
               transforms: &[], offsets: &[], offset_trans: Transform::new(),
               facecolors: &[], edgecolors: &[], linewidths: &[],
               linestyles: &[], antialiaseds: &[] }
    }
}

/// Element `i` of a repeating array
fn cycle<T>(v: &[T], i: usize) -> Option<&T> {
    if v.is_empty() {
        None
    } else {
        Some(&v[i % v.len()])
    }
}

impl RendererAgg {
    /// Draw every item of a collection
    ///
    /// The number of items is the larger of the number of paths and
    /// offsets. Items are filled when face colors are given and stroked
    /// when edge colors are given; `gc` supplies everything not given per
    /// item.
    pub fn draw_path_collection(&mut self, gc: &GraphicsContext,
                                coll: &PathCollection) -> Result<()> {
        let npaths = coll.paths.len();
        let n = npaths.max(coll.offsets.len());
        if npaths == 0 || (coll.facecolors.is_empty() && coll.edgecolors.is_empty()) {
            warn!("draw_path_collection: nothing to draw");
            return Ok(());
        }
        debug!("draw_path_collection: {} items, {} paths", n, npaths);
        let transforms = &coll.transforms[.. coll.transforms.len().min(n)];
        let linestyles = &coll.linestyles[.. coll.linestyles.len().min(n)];

        let tile = match gc.hatch_path {
            Some(ref hatch) => Some(self.hatch_tile(hatch, Rgba8::from(gc.stroke_color()))),
            None => None,
        };
        let clip = match self.prepare_clip(gc) {
            Some(clip) => clip,
            None => return Ok(()),
        };
        for i in 0 .. n {
            let path = &coll.paths[i % npaths];
            let trans = collection_item_transform(&coll.master_transform, transforms,
                                                  coll.offsets, &coll.offset_trans, i);
            let trans = self.device_transform(&trans);

            let face = cycle(coll.facecolors, i).cloned();
            let mut style = self.style(gc, face, tile.as_ref());
            if let Some(&isaa) = cycle(coll.antialiaseds, i) {
                style.isaa = isaa;
            }
            match cycle(coll.edgecolors, i) {
                Some(&edge) => {
                    style.edge = Rgba8::from(gc.face_color(edge));
                    if let Some(&lw) = cycle(coll.linewidths, i) {
                        let lw = self.points_to_pixels(lw);
                        style.linewidth = if style.isaa || lw == 0.0 {
                            lw
                        } else {
                            mpl_round(lw).max(0.5)
                        };
                    }
                    if let Some(dashes) = cycle(linestyles, i) {
                        style.dashes = dashes;
                    }
                },
                None => style.linewidth = 0.0,
            }
            self.draw_shape(path, &trans, &style, &clip);
        }
        Ok(())
    }
    /// Draw a mesh of `mesh_width` x `mesh_height` quadrilaterals
    ///
    /// `coordinates` holds the (mesh_height + 1) rows of (mesh_width + 1)
    /// corners. Quads are filled with `facecolors` and, when given,
    /// outlined with `edgecolors`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_quad_mesh(&mut self, gc: &GraphicsContext, master: &Transform,
                          mesh_width: usize, mesh_height: usize,
                          coordinates: &[(f64, f64)],
                          offsets: &[(f64, f64)], offset_trans: &Transform,
                          facecolors: &[Rgba], antialiased: bool,
                          edgecolors: &[Rgba]) -> Result<()> {
        let expected = (mesh_width + 1) * (mesh_height + 1);
        if coordinates.len() != expected {
            return Err(RenderError::LengthMismatch { what: "quad mesh coordinates",
                                                     expected,
                                                     found: coordinates.len() });
        }
        debug!("draw_quad_mesh: {}x{}", mesh_width, mesh_height);
        let corner = |row: usize, col: usize| coordinates[row * (mesh_width + 1) + col];
        let mut paths = Vec::with_capacity(mesh_width * mesh_height);
        for row in 0 .. mesh_height {
            for col in 0 .. mesh_width {
                paths.push(Path::polygon(&[corner(row, col), corner(row, col + 1),
                                           corner(row + 1, col + 1), corner(row + 1, col)]));
            }
        }
        let linewidths = [gc.linewidth];
        let antialiaseds = [antialiased];
        let coll = PathCollection { master_transform: *master,
                                    paths: &paths,
                                    transforms: &[],
                                    offsets,
                                    offset_trans: *offset_trans,
                                    facecolors,
                                    edgecolors,
                                    linewidths: &linewidths,
                                    linestyles: &[],
                                    antialiaseds: &antialiaseds };
        self.draw_path_collection(gc, &coll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Path {
        Path::polygon(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])
    }
    #[test]
    fn offsets_broadcast_paths() {
        let mut ren = RendererAgg::new(10, 10, 72.0).unwrap();
        let paths = vec![unit()];
        let offsets = vec![(0.0, 0.0), (4.0, 0.0)];
        let faces = vec![Rgba::new(0.0, 0.0, 1.0, 1.0)];
        let mut coll = PathCollection::new(&paths);
        coll.offsets = &offsets;
        coll.facecolors = &faces;
        ren.draw_path_collection(&GraphicsContext::new(), &coll).unwrap();
        assert_eq!(ren.pixel(1, 9), Rgba8::new(0, 0, 255, 255));
        assert_eq!(ren.pixel(5, 9), Rgba8::new(0, 0, 255, 255));
        assert_eq!(ren.pixel(3, 9), Rgba8::new(255, 255, 255, 0));
    }
    #[test]
    fn no_colors_draws_nothing() {
        let mut ren = RendererAgg::new(4, 4, 72.0).unwrap();
        let paths = vec![unit()];
        ren.draw_path_collection(&GraphicsContext::new(), &PathCollection::new(&paths)).unwrap();
        assert!(ren.pixfmt().pixeldata().chunks(4).all(|p| p == [255, 255, 255, 0]));
    }
    #[test]
    fn quad_mesh() {
        let mut ren = RendererAgg::new(4, 4, 72.0).unwrap();
        let coords : Vec<_> = (0 .. 3).flat_map(|r| (0 .. 3).map(move |c| {
            (c as f64 * 2.0, r as f64 * 2.0)
        })).collect();
        let faces = vec![Rgba::new(1.0, 0.0, 0.0, 1.0), Rgba::new(0.0, 1.0, 0.0, 1.0)];
        let ident = Transform::new();
        ren.draw_quad_mesh(&GraphicsContext::new(), &ident, 2, 2, &coords, &[], &ident,
                           &faces, true, &[]).unwrap();
        // Quad 0 is bottom left, quad 1 bottom right, quad 2 top left
        assert_eq!(ren.pixel(1, 3), Rgba8::new(255, 0, 0, 255));
        assert_eq!(ren.pixel(3, 3), Rgba8::new(0, 255, 0, 255));
        assert_eq!(ren.pixel(1, 1), Rgba8::new(255, 0, 0, 255));
        let e = ren.draw_quad_mesh(&GraphicsContext::new(), &ident, 2, 2, &coords[1..], &[],
                                   &ident, &faces, true, &[]);
        assert!(matches!(e, Err(RenderError::LengthMismatch { .. })));
    }
}
