
extern crate agg_backend;

use agg_backend::{Bbox, GlyphImage, GraphicsContext, Path, RasterImage, RenderError};
use agg_backend::{RendererAgg, Rgba, Rgba8, Transform};

const CLEAR : Rgba8 = Rgba8 { r: 255, g: 255, b: 255, a: 0 };
const RED : Rgba8 = Rgba8 { r: 255, g: 0, b: 0, a: 255 };

fn red() -> Rgba {
    Rgba::new(1.0, 0.0, 0.0, 1.0)
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
    Path::polygon(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

/// Triangle from y = 5 up to a point at (0, 15), far vertices well outside the canvas
fn check_wide_triangle(ren: &RendererAgg) {
    assert_eq!(ren.pixel(10, 9), RED);
    assert_eq!(ren.pixel(3, 12), RED);
    assert_eq!(ren.pixel(10, 2), CLEAR);
    assert_eq!(ren.pixel(10, 18), CLEAR);
}

#[test]
fn huge_filled_and_stroked() {
    let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
    let gc = GraphicsContext::new();
    let p = Path::polygon(&[(-1e17, 5.0), (1e17, 5.0), (0.0, 15.0)]);
    ren.draw_path(&gc, &p, &Transform::new(), Some(red())).unwrap();
    check_wide_triangle(&ren);
    // Edges are stroked in black
    assert!(ren.pixel(10, 15).r < 255);
}

#[test]
fn huge_curved() {
    let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
    let gc = GraphicsContext::new();
    let mut p = Path::new();
    p.move_to(-1e17, 5.0);
    p.curve3(0.0, 5.0, 1e17, 5.0);
    p.line_to(0.0, 15.0);
    p.close_polygon();
    ren.draw_path(&gc, &p, &Transform::new(), Some(red())).unwrap();
    check_wide_triangle(&ren);
}

#[test]
fn huge_hatched() {
    let mut ren = RendererAgg::new(20, 20, 10.0).unwrap();
    let mut gc = GraphicsContext::new();
    gc.linewidth = 0.0;
    gc.hatch_path = Some(Path::from_codes(&[(0.5, 0.0), (0.5, 1.0)], None).unwrap());
    ren.draw_path(&gc, &rect(-1e17, -1e17, 1e17, 1e17), &Transform::new(), None).unwrap();
    assert_eq!(ren.pixel(5, 3).a, 255);
    assert_eq!(ren.pixel(15, 12).a, 255);
    assert_eq!(ren.pixel(2, 3), CLEAR);
}

#[test]
fn huge_clip_path() {
    let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
    let mut gc = GraphicsContext::new();
    gc.linewidth = 0.0;
    gc.clippath = Some((rect(-1e30, -1e30, 10.0, 1e30), Transform::new()));
    ren.draw_path(&gc, &rect(0.0, 0.0, 20.0, 20.0), &Transform::new(), Some(red())).unwrap();
    for y in 0 .. 20 {
        assert_eq!(ren.pixel(3, y), RED, "row {}", y);
        assert_eq!(ren.pixel(9, y), RED, "row {}", y);
        assert_eq!(ren.pixel(10, y), CLEAR, "row {}", y);
    }
}

#[test]
fn usable_after_errors() {
    let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
    // Leave a clip rectangle and clip mask behind
    let mut clipped = GraphicsContext::new();
    clipped.linewidth = 0.0;
    clipped.cliprect = Some(Bbox::new(0.0, 0.0, 5.0, 5.0));
    clipped.clippath = Some((rect(0.0, 0.0, 5.0, 20.0), Transform::new()));
    let blue = Rgba::new(0.0, 0.0, 1.0, 1.0);
    ren.draw_path(&clipped, &rect(0.0, 0.0, 20.0, 20.0), &Transform::new(), Some(blue)).unwrap();

    let mut gc = GraphicsContext::new();
    let im = RasterImage::new(2, 2, vec![255; 16]).unwrap();
    match ren.draw_image(&gc, 0.0, 0.0, &im, "left") {
        Err(RenderError::InvalidOrigin(_)) => {},
        other => panic!("unexpected {:?}", other),
    }
    assert!(gc.set_dashes(0.0, &[1.0, 2.0, 3.0]).is_err());
    assert!(gc.dashes.is_solid());
    let glyph = GlyphImage { width: 3, height: 3, stride: 3, offset_x: 0, offset_y: 0,
                             buffer: vec![255; 4] };
    assert!(ren.draw_text_image(&gc, &glyph, 1.0, 1.0, 0.0).is_err());
    let coords = vec![(0.0, 0.0); 3];
    assert!(ren.draw_quad_mesh(&gc, &Transform::new(), 1, 1, &coords, &[],
                               &Transform::new(), &[red()], true, &[]).is_err());

    gc.linewidth = 0.0;
    ren.draw_path(&gc, &rect(10.0, 10.0, 15.0, 15.0), &Transform::new(), Some(red())).unwrap();
    for y in 0 .. 20 {
        for x in 0 .. 20 {
            let want = if x < 5 && y >= 15 {
                Rgba8::new(0, 0, 255, 255)
            } else if (10 .. 15).contains(&x) && (5 .. 10).contains(&y) {
                RED
            } else {
                CLEAR
            };
            assert_eq!(ren.pixel(x, y), want, "pixel {} {}", x, y);
        }
    }
}
