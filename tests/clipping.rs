
extern crate agg_backend;

use agg_backend::{GraphicsContext, Path, RendererAgg, Rgba, Rgba8, Transform};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
    Path::polygon(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

#[test]
fn clip_mask_follows_path() {
    let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
    let mut gc = GraphicsContext::new();
    gc.linewidth = 0.0;
    let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
    let blue = Rgba::new(0.0, 0.0, 1.0, 1.0);
    let all = rect(0.0, 0.0, 20.0, 20.0);

    gc.clippath = Some((rect(0.0, 0.0, 10.0, 20.0), Transform::new()));
    ren.draw_path(&gc, &all, &Transform::new(), Some(red)).unwrap();
    // Same path again, the cached mask is reused
    ren.draw_path(&gc, &all, &Transform::new(), Some(red)).unwrap();
    assert_eq!(ren.pixel(3, 3), Rgba8::new(255, 0, 0, 255));
    assert_eq!(ren.pixel(15, 3), Rgba8::new(255, 255, 255, 0));

    // Equal geometry but a new path, and a different transform
    gc.clippath = Some((rect(0.0, 0.0, 10.0, 20.0), Transform::new_translate(10.0, 0.0)));
    ren.draw_path(&gc, &all, &Transform::new(), Some(blue)).unwrap();
    assert_eq!(ren.pixel(3, 3), Rgba8::new(255, 0, 0, 255));
    assert_eq!(ren.pixel(15, 3), Rgba8::new(0, 0, 255, 255));
}

#[test]
fn cliprect_and_clippath_combine() {
    let mut ren = RendererAgg::new(20, 20, 72.0).unwrap();
    let mut gc = GraphicsContext::new();
    gc.linewidth = 0.0;
    gc.clippath = Some((rect(0.0, 0.0, 10.0, 20.0), Transform::new()));
    gc.cliprect = Some(agg_backend::Bbox::new(0.0, 0.0, 20.0, 10.0));
    ren.draw_path(&gc, &rect(0.0, 0.0, 20.0, 20.0), &Transform::new(), Some(Rgba::black())).unwrap();
    assert_eq!(ren.pixel(5, 15), Rgba8::new(0, 0, 0, 255));
    assert_eq!(ren.pixel(5, 5).a, 0);
    assert_eq!(ren.pixel(15, 15).a, 0);
}
