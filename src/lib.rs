//! Anti Grain Geometry rendering core for a 2D plotting backend
//!
//! Drawing commands (paths, markers, collections, images and glyph
//! bitmaps) given in user space are pushed through a chain of vertex
//! filters, scan converted into coverage cells and composited into an
//! RGBA8 buffer.
//!
//! # How does this work
//!
//!```text
//!    ren = RenAA( RenBase( Pixfmt( data ) ) )
//!    ras = Raster()
//!    sl  = Scanline()
//!
//!  Path filters (each wraps the previous one)
//!    PathIterator -> ConvTransform -> PathNanRemover -> PathClipper
//!      -> PathSnapper -> PathSimplifier -> ConvCurve [-> Dash] [-> Stroke]
//!  Raster Operations
//!    add_path
//!      move_to_d / line_to_d / close_polygon
//!        clip.line_to()
//!          line()                 -- cells with x, cover and area
//!  Render to Image
//!   render_scanlines(ras, sl, ren)
//!     rewind_scanlines           -- close_polygon(), sort_cells()
//!     sweep_scanline             -- one y row at a time
//!       render                   -- blend_solid_hspan / blend_hline
//!```
//!
//! # Example
//!
//!     use agg_backend::{RendererAgg, GraphicsContext, Path, Transform, Rgba};
//!
//!     let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
//!     let mut path = Path::new();
//!     path.move_to(0.0, 0.0);
//!     path.line_to(10.0, 0.0);
//!     path.line_to(10.0, 10.0);
//!     path.line_to(0.0, 10.0);
//!     path.close_polygon();
//!
//!     let mut gc = GraphicsContext::new();
//!     gc.linewidth = 0.0;
//!     let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
//!     ren.draw_path(&gc, &path, &Transform::new(), Some(red)).unwrap();
//!
//!     let px = ren.pixel(0, 19);
//!     assert_eq!((px.r, px.g, px.b, px.a), (255, 0, 0, 255));
//!

pub mod error;
pub mod logging;
pub mod math;
pub mod color;
pub mod buffer;
pub mod pixfmt;
pub mod base;
pub mod alphamask;
pub mod clip;
pub mod cell;
pub mod raster;
pub mod scan;
pub mod storage;
pub mod render;
pub mod paths;
pub mod transform;
pub mod nan_remover;
pub mod path_clipper;
pub mod snap;
pub mod simplify;
pub mod curves;
pub mod stroke;
pub mod dash;
pub mod bbox;
pub mod geometry;
pub mod extents;
pub mod polygon;
pub mod gc;
pub mod images;
pub mod region;
pub mod renderer;
pub mod collection;
pub mod export;

pub use crate::error::*;
pub use crate::logging::*;
pub use crate::color::*;
pub use crate::buffer::*;
pub use crate::pixfmt::*;
pub use crate::base::*;
pub use crate::alphamask::*;
pub use crate::clip::*;
pub use crate::cell::*;
pub use crate::raster::*;
pub use crate::scan::*;
pub use crate::storage::*;
pub use crate::render::*;
pub use crate::paths::*;
pub use crate::transform::*;
pub use crate::nan_remover::*;
pub use crate::path_clipper::*;
pub use crate::snap::*;
pub use crate::simplify::*;
pub use crate::curves::*;
pub use crate::stroke::*;
pub use crate::dash::*;
pub use crate::bbox::*;
pub use crate::geometry::*;
pub use crate::extents::*;
pub use crate::polygon::*;
pub use crate::gc::*;
pub use crate::images::*;
pub use crate::region::*;
pub use crate::renderer::*;
pub use crate::collection::*;
pub use crate::export::*;

const POLY_SUBPIXEL_SHIFT : i64 = 8;
const POLY_SUBPIXEL_SCALE : i64 = 1<<POLY_SUBPIXEL_SHIFT;
const POLY_SUBPIXEL_MASK  : i64 = POLY_SUBPIXEL_SCALE - 1;

/// Source of vertices
///
/// A vertex source is rewound to a sub path and then pulled one vertex at
/// a time until a [`PathCommand::Stop`] vertex is returned.
///
/// [`PathCommand::Stop`]: paths/enum.PathCommand.html
pub trait VertexSource {
    /// Restart iteration at sub path `path_id`
    fn rewind(&mut self, path_id: usize);
    /// Next vertex
    fn vertex(&mut self) -> Vertex<f64>;
    /// Rewind and collect all vertices up to, but not including, the Stop
    fn xconvert(&mut self) -> Vec<Vertex<f64>> {
        self.rewind(0);
        let mut out = vec![];
        loop {
            let v = self.vertex();
            if v.cmd == PathCommand::Stop {
                break;
            }
            out.push(v);
        }
        out
    }
}

impl<'a, T: VertexSource + ?Sized> VertexSource for &'a mut T {
    fn rewind(&mut self, path_id: usize) {
        (**self).rewind(path_id)
    }
    fn vertex(&mut self) -> Vertex<f64> {
        (**self).vertex()
    }
}

/// Access Color properties and compoents
pub trait Color: std::fmt::Debug + Copy {
    /// Get red value [0,1] as f64
    fn red(&self) -> f64;
    /// Get green value [0,1] as f64
    fn green(&self) -> f64;
    /// Get blue value [0,1] as f64
    fn blue(&self) -> f64;
    /// Get alpha value [0,1] as f64
    fn alpha(&self) -> f64;
    /// Get red value [0,255] as u8
    fn red8(&self) -> u8;
    /// Get green value [0,255] as u8
    fn green8(&self) -> u8;
    /// Get blue value [0,255] as u8
    fn blue8(&self) -> u8;
    /// Get alpha value [0,255] as u8
    fn alpha8(&self) -> u8;
    /// Return if the color is completely transparent, alpha = 0.0
    fn is_transparent(&self) -> bool { self.alpha8() == 0 }
    /// Return if the color is completely opaque, alpha = 1.0
    fn is_opaque(&self) -> bool { self.alpha8() == 255 }
}

/// Render scanlines to Image
pub trait Render {
    /// Render a single scanline to the image
    fn render(&mut self, sl: &ScanlineU8);
    /// Set the Color of the Renderer
    fn color<C: Color>(&mut self, color: &C);
    /// Prepare the Renderer
    fn prepare(&mut self) { }
}

/// Source of scanlines
///
/// Implemented by the cell rasterizer and by the serialized scanline
/// reader used to stamp markers.
pub trait Rasterize {
    /// Prepare to sweep, returns false if there is nothing to render
    fn rewind_scanlines(&mut self) -> bool;
    /// Fill `sl` with the next non-empty row, returns false when done
    fn sweep_scanline(&mut self, sl: &mut ScanlineU8) -> bool;
    /// Minimum x value of the rasterized data
    fn min_x(&self) -> i64;
    /// Maximum x value of the rasterized data
    fn max_x(&self) -> i64;
}

/// Access and blend individual pixels
pub trait Pixel {
    /// Bytes per pixel
    fn bpp() -> usize;
    /// Maximum coverage value
    fn cover_mask() -> u64 { 255 }
    /// Width of the underlying buffer in pixels
    fn width(&self) -> usize;
    /// Height of the underlying buffer in pixels
    fn height(&self) -> usize;
    /// Read a pixel
    fn get(&self, id: (usize, usize)) -> Rgba8;
    /// Copy a color into a pixel
    fn set<C: Color>(&mut self, id: (usize, usize), c: &C);
    /// Blend a color into a pixel with a coverage value
    fn blend_pix<C: Color>(&mut self, id: (usize, usize), c: &C, cover: u64);
    /// Copy or Blend a pixel with a color and coverage
    ///
    /// Fully opaque colors at full coverage are copied
    fn copy_or_blend_pix_with_cover<C: Color>(&mut self, id: (usize, usize), c: &C, cover: u64) {
        if ! c.is_transparent() {
            if c.is_opaque() && cover == Self::cover_mask() {
                self.set(id, c);
            } else {
                self.blend_pix(id, c, cover);
            }
        }
    }
    /// Blend `len` pixels starting at (`x`,`y`) with a single coverage
    ///
    /// The caller is responsible for clipping
    fn blend_hline<C: Color>(&mut self, x: i64, y: i64, len: i64, c: &C, cover: u64) {
        if c.is_transparent() {
            return;
        }
        for i in 0 .. len {
            self.copy_or_blend_pix_with_cover(((x+i) as usize, y as usize), c, cover);
        }
    }
    /// Blend `len` pixels starting at (`x`,`y`) with per pixel coverage
    fn blend_solid_hspan<C: Color>(&mut self, x: i64, y: i64, len: i64, c: &C, covers: &[u64]) {
        if c.is_transparent() {
            return;
        }
        for (i, &cover) in covers.iter().take(len as usize).enumerate() {
            self.copy_or_blend_pix_with_cover((x as usize + i, y as usize), c, cover);
        }
    }
    /// Blend `len` pixels of individual colors
    ///
    /// If `covers` is empty, `cover` is used for every pixel
    fn blend_color_hspan(&mut self, x: i64, y: i64, len: i64, colors: &[Rgba8], covers: &[u64], cover: u64) {
        for (i, c) in colors.iter().take(len as usize).enumerate() {
            let cover = if covers.is_empty() { cover } else { covers[i] };
            self.copy_or_blend_pix_with_cover((x as usize + i, y as usize), c, cover);
        }
    }
}

impl<'a, T: Pixel> Pixel for &'a mut T {
    fn bpp() -> usize { T::bpp() }
    fn cover_mask() -> u64 { T::cover_mask() }
    fn width(&self) -> usize {
        (**self).width()
    }
    fn height(&self) -> usize {
        (**self).height()
    }
    fn get(&self, id: (usize, usize)) -> Rgba8 {
        (**self).get(id)
    }
    fn set<C: Color>(&mut self, id: (usize, usize), c: &C) {
        (**self).set(id, c)
    }
    fn blend_pix<C: Color>(&mut self, id: (usize, usize), c: &C, cover: u64) {
        (**self).blend_pix(id, c, cover)
    }
    fn copy_or_blend_pix_with_cover<C: Color>(&mut self, id: (usize, usize), c: &C, cover: u64) {
        (**self).copy_or_blend_pix_with_cover(id, c, cover)
    }
}
