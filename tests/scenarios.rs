
extern crate agg_backend;

use agg_backend::{GraphicsContext, Path, PathCollection, RendererAgg, Rgba, Rgba8, Transform};

const CLEAR : Rgba8 = Rgba8 { r: 255, g: 255, b: 255, a: 0 };

fn square(x: f64, y: f64, s: f64) -> Path {
    Path::polygon(&[(x, y), (x + s, y), (x + s, y + s), (x, y + s)])
}

#[test]
fn filled_rectangle() {
    let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
    let mut gc = GraphicsContext::new();
    gc.linewidth = 0.0;
    let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
    ren.draw_path(&gc, &square(0.0, 0.0, 10.0), &Transform::new(), Some(red)).unwrap();
    for y in 0 .. 20 {
        for x in 0 .. 20 {
            // User y in [0,10) is device rows 10..20
            let want = if x < 10 && y >= 10 { Rgba8::new(255, 0, 0, 255) } else { CLEAR };
            assert_eq!(ren.pixel(x, y), want, "pixel {} {}", x, y);
        }
    }
}

#[test]
fn aliased_line_is_binary() {
    let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
    let mut gc = GraphicsContext::new();
    gc.antialiased = false;
    let path = Path::from_codes(&[(0.0, 5.0), (10.0, 5.0)], None).unwrap();
    ren.draw_path(&gc, &path, &Transform::new(), None).unwrap();
    for x in 2 .. 9 {
        assert_eq!(ren.pixel(x, 15), Rgba8::new(0, 0, 0, 255));
        assert_eq!(ren.pixel(x, 14), CLEAR);
        assert_eq!(ren.pixel(x, 16), CLEAR);
    }
    for p in ren.buffer_rgba().chunks(4) {
        assert!(p == [255, 255, 255, 0] || p == [0, 0, 0, 255], "{:?}", p);
    }
}

#[test]
fn cached_markers_match_uncached() {
    let marker = square(-2.0, -2.0, 4.0);
    let positions = Path::from_codes(&[(5.0, 5.0), (10.0, 12.0), (14.0, 6.0)], None).unwrap();
    let mut gc = GraphicsContext::new();
    gc.color = Rgba::new(0.0, 0.0, 1.0, 1.0);
    let face = Some(Rgba::new(1.0, 0.5, 0.0, 0.75));
    let ident = Transform::new();

    let mut cached = RendererAgg::new(20, 20, 72.0).unwrap();
    cached.draw_markers(&gc, &marker, &ident, &positions, &ident, face).unwrap();
    let mut direct = RendererAgg::new(20, 20, 72.0).unwrap();
    direct.draw_markers_uncached(&gc, &marker, &ident, &positions, &ident, face).unwrap();

    assert!(cached.buffer_rgba().chunks(4).any(|p| p[3] != 0));
    assert_eq!(cached.buffer_rgba(), direct.buffer_rgba());
}

#[test]
fn collection_colors_cycle() {
    let mut ren = RendererAgg::new(20, 4, 72.0).unwrap();
    let paths : Vec<Path> = (0 .. 5).map(|i| square(i as f64 * 4.0, 0.0, 2.0)).collect();
    let faces = vec![Rgba::new(1.0, 0.0, 0.0, 1.0), Rgba::new(0.0, 0.0, 1.0, 1.0)];
    let mut coll = PathCollection::new(&paths);
    coll.facecolors = &faces;
    ren.draw_path_collection(&GraphicsContext::new(), &coll).unwrap();
    for i in 0 .. 5 {
        let want = Rgba8::from(faces[i % 2]);
        assert_eq!(ren.pixel(i * 4 + 1, 3), want, "item {}", i);
        assert_eq!(ren.pixel(i * 4 + 3, 3), CLEAR);
    }
}
