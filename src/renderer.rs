//! Drawing operations on an RGBA canvas
//!
//! Coordinates handed to the drawing operations have a bottom left
//! origin; the canvas itself stores rows top first, so every transform is
//! followed by a flip, `device_y = height - user_y`.

use log::{debug, trace, warn};

use crate::alphamask::{AlphaMaskAdaptor, ClipMask};
use crate::base::RenderingBase;
use crate::bbox::Bbox;
use crate::clip::Rectangle;
use crate::color::{Gray8, Rgba, Rgba8};
use crate::curves::ConvCurve;
use crate::dash::Dash;
use crate::error::{RenderError, Result};
use crate::gc::{points_to_pixels, Dashes, GraphicsContext};
use crate::images::{GlyphImage, Origin, RasterImage};
use crate::math::mpl_round;
use crate::nan_remover::PathNanRemover;
use crate::path_clipper::{ClipMode, PathClipper};
use crate::paths::{Path, PathIterator};
use crate::pixfmt::Pixfmt;
use crate::raster::RasterizerScanline;
use crate::region::BufferRegion;
use crate::render::{render_scanlines, render_scanlines_aa_solid, render_scanlines_bin_solid};
use crate::render::{RenderingScanlinePattern, RenderingScanlineSpanSolid};
use crate::scan::ScanlineU8;
use crate::simplify::PathSimplifier;
use crate::snap::{PathSnapper, SnapMode};
use crate::storage::{ScanlineBytes, ScanlineStorage};
use crate::storage::SerializedScanlines;
use crate::stroke::{LineCap, LineJoin, Stroke};
use crate::transform::{ConvTransform, Transform};

use crate::{Pixel, Rasterize, Render, VertexSource};

/// Width and height must be below this
const MAX_SIZE : usize = 1 << 15;
/// Largest hatch tile edge in pixels
const MAX_HATCH_SIZE : usize = 1 << 10;

/// Style of a single shape, lengths in device pixels
pub(crate) struct ShapeStyle<'a> {
    pub face: Option<Rgba8>,
    pub edge: Rgba8,
    pub linewidth: f64,
    pub dashes: &'a Dashes,
    pub isaa: bool,
    pub cap: LineCap,
    pub join: LineJoin,
    pub snap_mode: SnapMode,
    pub hatch: Option<&'a Pixfmt<Rgba8>>,
}

/// Where a drawing call may touch the canvas
#[derive(Debug,Clone,Copy)]
pub(crate) struct DrawClip {
    /// Half open, device pixels
    pub rect: Rectangle<i64>,
    /// Draw through the clip path mask
    pub masked: bool,
}

/// What rasterized coverage is filled with
enum Paint<'a> {
    Solid { color: Rgba8, isaa: bool },
    Pattern(&'a Pixfmt<Rgba8>),
}

/// Sweep `ras` into `pixf`, clipped to `rect`
fn paint_scanlines<RAS, T>(ras: &mut RAS, sl: &mut ScanlineU8, pixf: T,
                           rect: &Rectangle<i64>, paint: &Paint)
    where RAS: Rasterize, T: Pixel
{
    let mut base = RenderingBase::new(pixf);
    base.clip_box(rect.x1, rect.y1, rect.x2 - 1, rect.y2 - 1);
    match *paint {
        Paint::Solid { color, isaa: true } =>
            render_scanlines_aa_solid(ras, sl, &mut base, &color),
        Paint::Solid { color, isaa: false } =>
            render_scanlines_bin_solid(ras, sl, &mut base, &color),
        Paint::Pattern(tile) => {
            let mut ren = RenderingScanlinePattern::with_base(&mut base, tile);
            render_scanlines(ras, sl, &mut ren);
        },
    }
}

/// Sweep `ras` into the canvas, through `mask` if there is one
fn paint_into<RAS: Rasterize>(ras: &mut RAS, sl: &mut ScanlineU8,
                              pixf: &mut Pixfmt<Rgba8>, mask: Option<&Pixfmt<Gray8>>,
                              rect: &Rectangle<i64>, paint: &Paint) {
    match mask {
        Some(mask) => paint_scanlines(ras, sl, AlphaMaskAdaptor::new(pixf, mask), rect, paint),
        None => paint_scanlines(ras, sl, pixf, rect, paint),
    }
}

/// Stroke, and dash, a vertex source into the rasterizer
fn add_stroke<VS: VertexSource>(ras: &mut RasterizerScanline, source: VS,
                                style: &ShapeStyle, dpi: f64) {
    fn configure<T: VertexSource>(stroke: &mut Stroke<T>, style: &ShapeStyle) {
        stroke.width(style.linewidth);
        stroke.line_cap(style.cap);
        stroke.line_join(style.join);
    }
    if style.dashes.is_solid() {
        let mut stroke = Stroke::new(source);
        configure(&mut stroke, style);
        ras.add_path(&mut stroke);
    } else {
        let mut dash = Dash::new(source);
        style.dashes.apply(&mut dash, dpi, style.isaa);
        let mut stroke = Stroke::new(dash);
        configure(&mut stroke, style);
        ras.add_path(&mut stroke);
    }
}

/// Copy image rows onto the canvas, source alpha is the coverage
fn blit_image<T: Pixel>(pixf: T, rect: &Rectangle<i64>, image: &RasterImage,
                        x: f64, oy: f64, origin: Origin) {
    let mut base = RenderingBase::new(pixf);
    base.clip_box(rect.x1, rect.y1, rect.x2 - 1, rect.y2 - 1);
    let x0 = x.floor() as i64;
    for j in 0 .. image.rows {
        let row = match origin {
            Origin::Upper => oy + j as f64,
            Origin::Lower => oy - j as f64 - 0.5,
        };
        let colors : Vec<Rgba8> = (0 .. image.cols).map(|i| image.get(i, j)).collect();
        let covers : Vec<u64> = colors.iter().map(|c| u64::from(c.a)).collect();
        base.blend_color_hspan(x0, row.floor() as i64, image.cols as i64,
                               &colors, &covers, 255);
    }
}

type MarkerSource<'a> = ConvCurve<PathSnapper<PathNanRemover<ConvTransform<PathIterator<'a>>>>>;

/// Marker outline in device pixels, snapped as a whole
fn marker_source<'a>(marker: &'a Path, trans: Transform, style: &ShapeStyle) -> MarkerSource<'a> {
    let t = ConvTransform::new(marker.iter(), trans);
    let n = PathNanRemover::new(t, true, marker.has_curves());
    let s = PathSnapper::new(n, style.snap_mode, marker.total_vertices(), style.linewidth);
    ConvCurve::new(s)
}

/// Rasterizes drawing commands into an RGBA8 canvas
///
/// The canvas, rasterizer, scanline and clip path mask are owned by the
/// renderer and reused between calls
#[derive(Debug)]
pub struct RendererAgg {
    width: usize,
    height: usize,
    dpi: f64,
    pub(crate) pixf: Pixfmt<Rgba8>,
    clip_mask: ClipMask,
    ras: RasterizerScanline,
    sl: ScanlineU8,
    hatch_size: usize,
}

impl RendererAgg {
    /// Create a canvas cleared to transparent white
    ///
    /// Width and height must each be between 1 and 32767
    pub fn new(width: usize, height: usize, dpi: f64) -> Result<Self> {
        if width == 0 || height == 0 || width >= MAX_SIZE || height >= MAX_SIZE {
            return Err(RenderError::InvalidSize { width, height });
        }
        debug!("new renderer {}x{} at {} dpi", width, height, dpi);
        let mut ren = Self { width, height, dpi,
                             pixf: Pixfmt::<Rgba8>::new(width, height),
                             clip_mask: ClipMask::new(width, height),
                             ras: RasterizerScanline::new(),
                             sl: ScanlineU8::new(),
                             hatch_size: dpi.max(1.0).min(MAX_HATCH_SIZE as f64) as usize,
        };
        ren.clear();
        Ok(ren)
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn dpi(&self) -> f64 {
        self.dpi
    }
    /// The canvas
    pub fn pixfmt(&self) -> &Pixfmt<Rgba8> {
        &self.pixf
    }
    /// Pixel at (`x`,`y`), device coordinates with a top left origin
    pub fn pixel(&self, x: usize, y: usize) -> Rgba8 {
        self.pixf.get((x, y))
    }
    /// Clear to transparent white, rgba(1,1,1,0)
    pub fn clear(&mut self) {
        self.clear_to(Rgba::new(1.0, 1.0, 1.0, 0.0));
    }
    /// Set every pixel to `color`
    pub fn clear_to(&mut self, color: Rgba) {
        self.pixf.fill(&Rgba8::from(color));
    }
    /// Convert a length in points to pixels at the canvas resolution
    pub fn points_to_pixels(&self, points: f64) -> f64 {
        points_to_pixels(points, self.dpi)
    }
    /// User space transform followed by the flip to device coordinates
    pub(crate) fn device_transform(&self, trans: &Transform) -> Transform {
        *trans * Transform::new_scale(1.0, -1.0)
            * Transform::new_translate(0.0, self.height as f64)
    }
    /// Line width in pixels; without antialiasing it is rounded, and
    /// at least half a pixel
    fn line_width(&self, gc: &GraphicsContext) -> f64 {
        let lw = self.points_to_pixels(gc.linewidth);
        if gc.antialiased || lw == 0.0 {
            lw
        } else {
            mpl_round(lw).max(0.5)
        }
    }
    /// Style of a shape drawn with `gc`
    pub(crate) fn style<'a>(&self, gc: &'a GraphicsContext, face: Option<Rgba>,
                            hatch: Option<&'a Pixfmt<Rgba8>>) -> ShapeStyle<'a> {
        ShapeStyle { face: face.map(|f| Rgba8::from(gc.face_color(f))),
                     edge: Rgba8::from(gc.stroke_color()),
                     linewidth: self.line_width(gc),
                     dashes: &gc.dashes,
                     isaa: gc.antialiased,
                     cap: gc.cap,
                     join: gc.join,
                     snap_mode: gc.snap_mode,
                     hatch,
        }
    }
    /// Clip rectangle in device pixels, clamped to the canvas
    ///
    /// Returns None if nothing can be drawn
    fn clip_pixels(&self, cliprect: Option<&Bbox>) -> Option<Rectangle<i64>> {
        let (w, h) = (self.width as f64, self.height as f64);
        let (x1, y1, x2, y2) = match cliprect {
            None => (0.0, 0.0, w, h),
            Some(b) => {
                let b = b.normalized();
                ((b.x0 + 0.5).floor().max(0.0),
                 (h - b.y1 + 0.5).floor().max(0.0),
                 (b.x1 + 0.5).floor().min(w),
                 (h - b.y0 + 0.5).floor().min(h))
            },
        };
        if !(x1 < x2 && y1 < y2) {
            return None;
        }
        Some(Rectangle::new(x1 as i64, y1 as i64, x2 as i64, y2 as i64))
    }
    /// Render the clip path mask, set the rasterizer clip box and reset it
    ///
    /// Returns None, and warns, when the clip rectangle is empty
    pub(crate) fn prepare_clip(&mut self, gc: &GraphicsContext) -> Option<DrawClip> {
        let rect = match self.clip_pixels(gc.cliprect.as_ref()) {
            Some(rect) => rect,
            None => {
                warn!("clip rectangle {:?} is empty, nothing drawn", gc.cliprect);
                return None;
            },
        };
        let masked = self.render_clippath(gc.clippath.as_ref());
        self.ras.clip_box(rect.x1 as f64, rect.y1 as f64, rect.x2 as f64, rect.y2 as f64);
        Some(DrawClip { rect, masked })
    }
    /// Render a clip path into the mask
    ///
    /// The mask is kept when the path and transform are the same as the
    /// last ones rendered. Returns false if there is no clip path.
    pub fn render_clippath(&mut self, clippath: Option<&(Path, Transform)>) -> bool {
        let (path, trans) = match clippath {
            Some((path, trans)) => (path, trans),
            None => return false,
        };
        let trans = self.device_transform(trans);
        if self.clip_mask.is_current(path.id(), &trans) {
            trace!("clip mask reused");
            return true;
        }
        trace!("rendering clip mask, {} vertices", path.total_vertices());
        self.clip_mask.clear();
        let t = ConvTransform::new(path.iter(), trans);
        let n = PathNanRemover::new(t, true, path.has_curves());
        let mut curve = ConvCurve::new(n);
        self.ras.clip_box(0.0, 0.0, self.width as f64, self.height as f64);
        self.ras.gamma_linear();
        self.ras.add_path(&mut curve);
        {
            let mut base = RenderingBase::new(&mut self.clip_mask.mask);
            render_scanlines_aa_solid(&mut self.ras, &mut self.sl, &mut base, &Gray8::new(255));
        }
        self.clip_mask.set_key(path.id(), trans);
        true
    }
    /// Sweep the rasterizer into the canvas
    fn paint(&mut self, clip: &DrawClip, paint: &Paint) {
        match *paint {
            Paint::Solid { isaa: false, .. } => self.ras.gamma_threshold(0.5),
            _ => self.ras.gamma_linear(),
        }
        let mask = if clip.masked { Some(&self.clip_mask.mask) } else { None };
        paint_into(&mut self.ras, &mut self.sl, &mut self.pixf, mask, &clip.rect, paint);
    }
    /// Render a hatch path, in the unit square, into a tile of `hatch_size` pixels
    ///
    /// The tile is one inch wide, at most MAX_HATCH_SIZE pixels
    pub(crate) fn hatch_tile(&mut self, hatch: &Path, color: Rgba8) -> Pixfmt<Rgba8> {
        let hs = self.hatch_size as f64;
        let trans = Transform::new_scale(1.0, -1.0)
            * Transform::new_translate(0.0, 1.0)
            * Transform::new_scale(hs, hs);
        let t = ConvTransform::new(hatch.iter(), trans);
        let n = PathNanRemover::new(t, false, hatch.has_curves());
        let s = PathSnapper::new(n, SnapMode::True, hatch.total_vertices(), 1.0);
        let mut stroke = Stroke::new(ConvCurve::new(s));
        stroke.width(1.0);

        self.ras.clip_box(0.0, 0.0, hs, hs);
        self.ras.gamma_linear();
        self.ras.add_path(&mut stroke);
        let mut tile = RenderingBase::new(Pixfmt::<Rgba8>::new(self.hatch_size, self.hatch_size));
        render_scanlines_aa_solid(&mut self.ras, &mut self.sl, &mut tile, &color);
        tile.pixf
    }
    /// Draw a path, filled with `face` if given, and stroked if the line
    /// width is not zero
    ///
    /// # Example
    ///
    ///     use agg_backend::{RendererAgg, GraphicsContext, Path, Transform};
    ///
    ///     let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
    ///     let path = Path::from_codes(&[(0.0, 5.0), (10.0, 5.0)], None).unwrap();
    ///     let mut gc = GraphicsContext::new();
    ///     gc.antialiased = false;
    ///     ren.draw_path(&gc, &path, &Transform::new(), None).unwrap();
    ///     // Snapped to the center of row 15
    ///     assert_eq!(ren.pixel(5, 15).a, 255);
    ///     assert_eq!(ren.pixel(5, 14).a, 0);
    ///
    pub fn draw_path(&mut self, gc: &GraphicsContext, path: &Path,
                     trans: &Transform, face: Option<Rgba>) -> Result<()> {
        debug!("draw_path: {} vertices, face {:?}", path.total_vertices(), face);
        let tile = match gc.hatch_path {
            Some(ref hatch) => Some(self.hatch_tile(hatch, Rgba8::from(gc.stroke_color()))),
            None => None,
        };
        let clip = match self.prepare_clip(gc) {
            Some(clip) => clip,
            None => return Ok(()),
        };
        let style = self.style(gc, face, tile.as_ref());
        let trans = self.device_transform(trans);
        self.draw_shape(path, &trans, &style, &clip);
        Ok(())
    }
    /// Run a path through the filter chain and draw it
    ///
    /// `trans` maps to device coordinates
    pub(crate) fn draw_shape(&mut self, path: &Path, trans: &Transform,
                             style: &ShapeStyle, clip: &DrawClip) {
        let filled = style.face.is_some();
        let stroked = style.linewidth != 0.0;
        let do_clip = !path.has_curves() && style.hatch.is_none() && filled != stroked;
        let mode = if filled { ClipMode::Fill } else { ClipMode::Stroke };
        let simplify = path.should_simplify() && !filled;
        trace!("draw_shape: clip {} {:?}, simplify {}", do_clip, mode, simplify);

        let t = ConvTransform::new(path.iter(), *trans);
        let n = PathNanRemover::new(t, true, path.has_curves());
        let c = PathClipper::with_size(n, do_clip, mode, self.width as f64, self.height as f64);
        let s = PathSnapper::new(c, style.snap_mode, path.total_vertices(), style.linewidth);
        let simp = PathSimplifier::new(s, simplify, path.simplify_threshold());
        let mut curve = ConvCurve::new(simp);
        self.render_shape(&mut curve, style, clip);
    }
    /// Fill, hatch and stroke a device space vertex source
    fn render_shape<VS: VertexSource>(&mut self, source: &mut VS,
                                      style: &ShapeStyle, clip: &DrawClip) {
        if let Some(face) = style.face {
            self.ras.reset();
            self.ras.add_path(source);
            self.paint(clip, &Paint::Solid { color: face, isaa: style.isaa });
        }
        if let Some(tile) = style.hatch {
            self.ras.reset();
            self.ras.add_path(source);
            self.paint(clip, &Paint::Pattern(tile));
        }
        if style.linewidth != 0.0 {
            self.ras.reset();
            add_stroke(&mut self.ras, &mut *source, style, self.dpi);
            self.paint(clip, &Paint::Solid { color: style.edge, isaa: style.isaa });
        }
    }
    /// Integer device positions of the marker origins
    fn marker_positions(&self, path: &Path, trans: &Transform) -> Vec<(f64, f64)> {
        let trans = *trans * Transform::new_scale(1.0, -1.0)
            * Transform::new_translate(0.5, self.height as f64 + 0.5);
        let t = ConvTransform::new(path.iter(), trans);
        let mut n = PathNanRemover::new(t, true, path.has_curves());
        n.xconvert().into_iter()
            .filter(|v| v.cmd.is_vertex())
            .map(|v| (v.x.floor(), v.y.floor()))
            .collect()
    }
    /// Capture the rasterized coverage for replay
    fn cache_scanlines(&mut self, isaa: bool) -> (ScanlineBytes, Option<(i64,i64,i64,i64)>) {
        if isaa {
            self.ras.gamma_linear();
        } else {
            self.ras.gamma_threshold(0.5);
        }
        let mut storage = ScanlineStorage::new();
        render_scanlines(&mut self.ras, &mut self.sl, &mut storage);
        (storage.serialize(), storage.bounds())
    }
    /// Replay cached coverage at (`x`,`y`)
    fn stamp(&mut self, data: &[u8], x: i64, y: i64, clip: &DrawClip, paint: &Paint) {
        let mut ser = SerializedScanlines::new(data, x, y);
        let mask = if clip.masked { Some(&self.clip_mask.mask) } else { None };
        paint_into(&mut ser, &mut self.sl, &mut self.pixf, mask, &clip.rect, paint);
    }
    /// Draw `marker` at every vertex of `path`
    ///
    /// The marker is in device pixels relative to its origin, `marker_trans`
    /// is applied to it and `trans` to the positions. The marker is
    /// rasterized once and the coverage stamped at each position, rounded to
    /// whole pixels.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_markers(&mut self, gc: &GraphicsContext, marker: &Path, marker_trans: &Transform,
                        path: &Path, trans: &Transform, face: Option<Rgba>) -> Result<()> {
        debug!("draw_markers: {} vertices, {} positions", marker.total_vertices(),
               path.total_vertices());
        let clip = match self.prepare_clip(gc) {
            Some(clip) => clip,
            None => return Ok(()),
        };
        let style = self.style(gc, face, None);
        let positions = self.marker_positions(path, trans);
        let marker_trans = *marker_trans * Transform::new_scale(1.0, -1.0);

        self.ras.reset_clipping();
        let fill = match style.face {
            Some(_) => {
                self.ras.add_path(&mut marker_source(marker, marker_trans, &style));
                self.cache_scanlines(style.isaa)
            },
            None => (ScanlineBytes::new(), None),
        };
        let stroke = if style.linewidth != 0.0 {
            self.ras.reset();
            add_stroke(&mut self.ras, marker_source(marker, marker_trans, &style), &style, self.dpi);
            self.cache_scanlines(style.isaa)
        } else {
            (ScanlineBytes::new(), None)
        };
        trace!("marker cache: {} fill bytes, {} stroke bytes", fill.0.len(), stroke.0.len());

        // Union of the marker bounds, used to cull positions
        let bounds = [fill.1, stroke.1].iter()
            .filter_map(|b| *b)
            .fold(None, |acc: Option<(i64,i64,i64,i64)>, b| match acc {
                None => Some(b),
                Some(a) => Some((a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))),
            });
        let (bx1, by1, bx2, by2) = match bounds {
            Some(b) => b,
            None => return Ok(()),
        };
        let r = clip.rect;
        for (x, y) in positions {
            if x + (bx2 as f64) < r.x1 as f64 || x + (bx1 as f64) >= r.x2 as f64 ||
                y + (by2 as f64) < r.y1 as f64 || y + (by1 as f64) >= r.y2 as f64 {
                    continue;
                }
            let (x, y) = (x as i64, y as i64);
            if let Some(color) = style.face {
                self.stamp(&fill.0, x, y, &clip, &Paint::Solid { color, isaa: style.isaa });
            }
            if style.linewidth != 0.0 {
                self.stamp(&stroke.0, x, y, &clip, &Paint::Solid { color: style.edge,
                                                                    isaa: style.isaa });
            }
        }
        Ok(())
    }
    /// Draw `marker` at every vertex of `path`, rasterizing it each time
    ///
    /// Gives the same pixels as [`draw_markers`](#method.draw_markers)
    #[allow(clippy::too_many_arguments)]
    pub fn draw_markers_uncached(&mut self, gc: &GraphicsContext, marker: &Path,
                                 marker_trans: &Transform, path: &Path,
                                 trans: &Transform, face: Option<Rgba>) -> Result<()> {
        debug!("draw_markers_uncached: {} positions", path.total_vertices());
        let clip = match self.prepare_clip(gc) {
            Some(clip) => clip,
            None => return Ok(()),
        };
        let style = self.style(gc, face, None);
        let positions = self.marker_positions(path, trans);
        self.ras.reset_clipping();
        for (x, y) in positions {
            let mtrans = *marker_trans * Transform::new_scale(1.0, -1.0)
                * Transform::new_translate(x, y);
            let mut source = marker_source(marker, mtrans, &style);
            self.render_shape(&mut source, &style, &clip);
        }
        Ok(())
    }
    /// Draw an RGBA image
    ///
    /// With origin "upper" row 0 goes to device row `y`, rows going down;
    /// with "lower" row 0 goes to user row `y`, rows going up. Columns start
    /// at `x`. The alpha of each pixel is used as its coverage.
    pub fn draw_image(&mut self, gc: &GraphicsContext, x: f64, y: f64,
                      image: &RasterImage, origin: &str) -> Result<()> {
        let origin : Origin = origin.parse()?;
        let expected = image.rows * image.cols * 4;
        if image.data.len() != expected {
            return Err(RenderError::LengthMismatch { what: "image data", expected,
                                                     found: image.data.len() });
        }
        debug!("draw_image: {}x{} at ({}, {}) {:?}", image.cols, image.rows, x, y, origin);
        let clip = match self.prepare_clip(gc) {
            Some(clip) => clip,
            None => return Ok(()),
        };
        let oy = match origin {
            Origin::Upper => y,
            Origin::Lower => self.height as f64 - y,
        };
        if clip.masked {
            let pixf = AlphaMaskAdaptor::new(&mut self.pixf, &self.clip_mask.mask);
            blit_image(pixf, &clip.rect, image, x, oy, origin);
        } else {
            blit_image(&mut self.pixf, &clip.rect, image, x, oy, origin);
        }
        Ok(())
    }
    /// Draw a glyph bitmap in the stroke color
    ///
    /// Bitmap pixel (i,j) lands on device pixel (x + offset_x + i,
    /// y + offset_y + j). A non zero `angle`, in degrees counter clockwise,
    /// rotates the bitmap about (`x`,`y`). Only the clip rectangle applies.
    pub fn draw_text_image(&mut self, gc: &GraphicsContext, glyph: &GlyphImage,
                           x: f64, y: f64, angle: f64) -> Result<()> {
        debug!("draw_text_image: {}x{} at ({}, {}) angle {}", glyph.width, glyph.height,
               x, y, angle);
        glyph.check()?;
        let rect = match self.clip_pixels(gc.cliprect.as_ref()) {
            Some(rect) => rect,
            None => return Ok(()),
        };
        let color = Rgba8::from(gc.stroke_color());
        let mut base = RenderingBase::new(&mut self.pixf);
        base.clip_box(rect.x1, rect.y1, rect.x2 - 1, rect.y2 - 1);

        if angle == 0.0 {
            let x0 = mpl_round(x) as i64 + glyph.offset_x;
            let y0 = mpl_round(y) as i64 + glyph.offset_y;
            for j in 0 .. glyph.height {
                let row = &glyph.buffer[j * glyph.stride .. j * glyph.stride + glyph.width];
                let covers : Vec<u64> = row.iter().map(|&c| u64::from(c)).collect();
                base.blend_solid_hspan(x0, y0 + j as i64, glyph.width as i64, &color, &covers);
            }
            return Ok(());
        }
        let trans = Transform::new_translate(glyph.offset_x as f64, glyph.offset_y as f64)
            * Transform::new_rotate(-angle.to_radians())
            * Transform::new_translate(x, y);
        let inv = trans.invert()?;
        let (w, h) = (glyph.width as f64, glyph.height as f64);
        let outline = Path::polygon(&[(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)]);
        self.ras.clip_box(rect.x1 as f64, rect.y1 as f64, rect.x2 as f64, rect.y2 as f64);
        self.ras.gamma_linear();
        self.ras.add_path(&mut ConvTransform::new(outline.iter(), trans));

        let mut ren = RenderingScanlineSpanSolid::with_base(&mut base, |px, py| {
            let (u, v) = inv.transform(px as f64 + 0.5, py as f64 + 0.5);
            glyph.coverage(u.floor() as i64, v.floor() as i64)
        });
        ren.color(&color);
        render_scanlines(&mut self.ras, &mut self.sl, &mut ren);
        Ok(())
    }
    /// Save the pixels under `bbox`, given in user space
    pub fn copy_from_bbox(&self, bbox: &Bbox) -> BufferRegion {
        let b = bbox.normalized();
        let h = self.height as i64;
        let l = b.x0.floor() as i64;
        let bt = b.y0.floor() as i64;
        let r = b.x1.ceil() as i64;
        let t = b.y1.ceil() as i64;
        BufferRegion::copy_from(&self.pixf, Rectangle::new(l, h - t, r, h - bt))
    }
    /// Put a saved region back where it came from
    pub fn restore_region(&mut self, region: &BufferRegion) -> Result<()> {
        let mut base = RenderingBase::new(&mut self.pixf);
        region.restore(&mut base)
    }
    /// Put part of a saved region at (`x`,`y`)
    ///
    /// (`x1`,`y1`)-(`x2`,`y2`) is the part, half open device pixels inside
    /// the saved rectangle
    #[allow(clippy::too_many_arguments)]
    pub fn restore_region_rect(&mut self, region: &BufferRegion,
                               x1: i64, y1: i64, x2: i64, y2: i64,
                               x: i64, y: i64) -> Result<()> {
        let mut base = RenderingBase::new(&mut self.pixf);
        region.restore_rect(&mut base, Rectangle::new(x1, y1, x2, y2), x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, s: f64) -> Path {
        Path::polygon(&[(x, y), (x + s, y), (x + s, y + s), (x, y + s)])
    }
    fn red() -> Rgba {
        Rgba::new(1.0, 0.0, 0.0, 1.0)
    }
    #[test]
    fn size_limits() {
        assert!(RendererAgg::new(0, 10, 72.0).is_err());
        assert!(RendererAgg::new(10, 32768, 72.0).is_err());
        let ren = RendererAgg::new(3, 2, 72.0).unwrap();
        assert_eq!(ren.pixel(2, 1), Rgba8::new(255, 255, 255, 0));
        assert_eq!(ren.points_to_pixels(72.0), 72.0);
        assert_eq!((ren.width(), ren.height(), ren.dpi()), (3, 2, 72.0));
    }
    #[test]
    fn cliprect_limits_fill() {
        let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
        let mut gc = GraphicsContext::new();
        gc.linewidth = 0.0;
        gc.cliprect = Some(Bbox::new(0.0, 0.0, 5.0, 20.0));
        ren.draw_path(&gc, &square(0.0, 0.0, 20.0), &Transform::new(), Some(red())).unwrap();
        assert_eq!(ren.pixel(2, 10), Rgba8::new(255, 0, 0, 255));
        assert_eq!(ren.pixel(5, 10), Rgba8::new(255, 255, 255, 0));
    }
    #[test]
    fn empty_cliprect_draws_nothing() {
        let mut ren = RendererAgg::new(10, 10, 72.0).unwrap();
        let mut gc = GraphicsContext::new();
        gc.cliprect = Some(Bbox::new(20.0, 20.0, 30.0, 30.0));
        ren.draw_path(&gc, &square(0.0, 0.0, 10.0), &Transform::new(), Some(red())).unwrap();
        assert!(ren.pixfmt().pixeldata().chunks(4).all(|p| p == [255, 255, 255, 0]));
    }
    #[test]
    fn clip_path_masks() {
        let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
        let mut gc = GraphicsContext::new();
        gc.linewidth = 0.0;
        gc.clippath = Some((square(10.0, 0.0, 10.0), Transform::new()));
        ren.draw_path(&gc, &square(0.0, 0.0, 20.0), &Transform::new(), Some(red())).unwrap();
        assert_eq!(ren.pixel(15, 15), Rgba8::new(255, 0, 0, 255));
        assert_eq!(ren.pixel(5, 15), Rgba8::new(255, 255, 255, 0));
        assert_eq!(ren.pixel(15, 5), Rgba8::new(255, 255, 255, 0));
    }
    #[test]
    fn hatch_tiles() {
        let mut ren = RendererAgg::new(20, 20, 10.0).unwrap();
        let mut gc = GraphicsContext::new();
        gc.linewidth = 0.0;
        // Vertical line through the middle of each tile
        gc.hatch_path = Some(Path::from_codes(&[(0.5, 0.0), (0.5, 1.0)], None).unwrap());
        ren.draw_path(&gc, &square(0.0, 0.0, 20.0), &Transform::new(), None).unwrap();
        // Tiles are 10 pixels wide, the line is snapped to column 5
        assert_eq!(ren.pixel(5, 3).a, 255);
        assert_eq!(ren.pixel(15, 12).a, 255);
        assert_eq!(ren.pixel(2, 3), Rgba8::new(255, 255, 255, 0));
    }
    #[test]
    fn unrotated_glyph() {
        let mut ren = RendererAgg::new(10, 10, 72.0).unwrap();
        let mut glyph = GlyphImage::new(2, 1, 2, vec![255, 0]).unwrap();
        glyph.offset_x = 1;
        let gc = GraphicsContext::new();
        ren.draw_text_image(&gc, &glyph, 2.0, 3.0, 0.0).unwrap();
        assert_eq!(ren.pixel(3, 3), Rgba8::new(0, 0, 0, 255));
        assert_eq!(ren.pixel(4, 3), Rgba8::new(255, 255, 255, 0));
    }
    #[test]
    fn hatch_tile_capped() {
        let mut ren = RendererAgg::new(4, 4, 1e6).unwrap();
        assert_eq!(ren.hatch_size, MAX_HATCH_SIZE);
        let hatch = Path::from_codes(&[(0.5, 0.0), (0.5, 1.0)], None).unwrap();
        let tile = ren.hatch_tile(&hatch, Rgba8::new(0, 0, 0, 255));
        assert_eq!((tile.width(), tile.height()), (MAX_HATCH_SIZE, MAX_HATCH_SIZE));
        let ren = RendererAgg::new(4, 4, 0.1).unwrap();
        assert_eq!(ren.hatch_size, 1);
    }
    #[test]
    fn inconsistent_glyph_rejected() {
        let mut ren = RendererAgg::new(10, 10, 72.0).unwrap();
        let gc = GraphicsContext::new();
        let short = GlyphImage { width: 4, height: 4, stride: 4, offset_x: 0, offset_y: 0,
                                 buffer: vec![255; 8] };
        match ren.draw_text_image(&gc, &short, 2.0, 3.0, 0.0) {
            Err(RenderError::LengthMismatch { what, expected, found }) => {
                assert_eq!((what, expected, found), ("glyph buffer", 16, 8));
            },
            r => panic!("unexpected {:?}", r),
        }
        let narrow = GlyphImage { width: 4, height: 1, stride: 2, offset_x: 0, offset_y: 0,
                                  buffer: vec![255; 8] };
        assert!(ren.draw_text_image(&gc, &narrow, 2.0, 3.0, 30.0).is_err());
        assert!(ren.buffer_rgba().chunks(4).all(|p| p[3] == 0));
    }
    #[test]
    fn rotated_glyph() {
        let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
        let glyph = GlyphImage::new(4, 1, 4, vec![255; 4]).unwrap();
        let gc = GraphicsContext::new();
        // A horizontal bar turned to point up from (10,10)
        ren.draw_text_image(&gc, &glyph, 10.0, 10.0, 90.0).unwrap();
        assert_eq!(ren.pixel(10, 8), Rgba8::new(0, 0, 0, 255));
        assert_eq!(ren.pixel(12, 10), Rgba8::new(255, 255, 255, 0));
    }
    #[test]
    fn image_origins() {
        let mut ren = RendererAgg::new(4, 4, 72.0).unwrap();
        let mut data = vec![0u8; 2 * 2 * 4];
        // Row 0 red, row 1 blue
        data[..8].copy_from_slice(&[255, 0, 0, 255, 255, 0, 0, 255]);
        data[8..].copy_from_slice(&[0, 0, 255, 255, 0, 0, 255, 255]);
        let im = RasterImage::new(2, 2, data).unwrap();
        let gc = GraphicsContext::new();
        ren.draw_image(&gc, 0.0, 0.0, &im, "upper").unwrap();
        assert_eq!(ren.pixel(0, 0), Rgba8::new(255, 0, 0, 255));
        assert_eq!(ren.pixel(1, 1), Rgba8::new(0, 0, 255, 255));
        ren.draw_image(&gc, 2.0, 0.0, &im, "lower").unwrap();
        assert_eq!(ren.pixel(2, 3), Rgba8::new(255, 0, 0, 255));
        assert_eq!(ren.pixel(3, 2), Rgba8::new(0, 0, 255, 255));
        assert!(ren.draw_image(&gc, 0.0, 0.0, &im, "left").is_err());
    }
}
