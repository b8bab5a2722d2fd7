
extern crate agg_backend;

use agg_backend::{GraphicsContext, Path, RenderError, RendererAgg, Transform};

fn stroke(gc: &GraphicsContext) -> Vec<u8> {
    let mut ren = RendererAgg::new(30, 30, 72.0).unwrap();
    let path = Path::from_codes(&[(2.0, 3.0), (27.0, 20.0), (5.0, 25.0)], None).unwrap();
    ren.draw_path(gc, &path, &Transform::new(), None).unwrap();
    ren.buffer_rgba().to_vec()
}

#[test]
fn odd_dashes_rejected() {
    let mut gc = GraphicsContext::new();
    match gc.set_dashes(0.0, &[1.0, 2.0, 3.0]) {
        Err(RenderError::OddDashes(3)) => {},
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn empty_dashes_are_solid() {
    let mut gc = GraphicsContext::new();
    gc.linewidth = 2.0;
    let solid = stroke(&gc);
    gc.set_dashes(3.0, &[]).unwrap();
    assert_eq!(stroke(&gc), solid);
    gc.set_dashes(0.0, &[4.0, 4.0]).unwrap();
    assert_ne!(stroke(&gc), solid);
}

#[test]
fn style_names() {
    let mut gc = GraphicsContext::new();
    for name in &["butt", "round", "projecting"] {
        gc.set_capstyle(name).unwrap();
    }
    for name in &["miter", "round", "bevel"] {
        gc.set_joinstyle(name).unwrap();
    }
    let e = gc.set_capstyle("flat").unwrap_err();
    assert!(e.to_string().contains("flat"));
    assert!(gc.set_joinstyle("sharp").is_err());
}
