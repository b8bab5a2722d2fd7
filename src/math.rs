//! Fixed point helpers for 8 bit color math

/// Interpolate a value between two end points using fixed point math
///
/// See agg_color_rgba.h:454 of agg version 2.4
///
pub fn lerp_u8(p: u8, q: u8, a: u8) -> u8 {
    let base_shift = 8;
    let base_msb = 1 << (base_shift - 1);
    let v = if p > q { 1 } else { 0 };
    let (q,p,a) = (i32::from(q), i32::from(p), i32::from(a));
    let t0 : i32  = (q - p) * a + base_msb - v; // Signed multiplication
    let t1 : i32 = ((t0>>base_shift) + t0) >> base_shift;
    (p + t1) as u8
}

/// Interpolate with a premultiplied end point, p + q - p*a
pub fn prelerp_u8(p: u8, q: u8, a: u8) -> u8 {
    p.wrapping_add(q).wrapping_sub(multiply_u8(p,a))
}

/// Multiply two u8 values using fixed point math
///
/// Result is round(a * b / 255)
///
/// See agg_color_rgba.h:395
pub fn multiply_u8(a: u8, b: u8) -> u8 {
    let base_shift = 8;
    let base_msb = 1 << (base_shift - 1);
    let (a,b) = (u32::from(a), u32::from(b));
    let t : u32  = a * b + base_msb;
    let tt : u32 = ((t >> base_shift) + t) >> base_shift;
    tt as u8
}

/// Scale a coverage by a mask value, (255 + cover * mask) >> 8
pub fn mask_cover(cover: u64, mask: u8) -> u64 {
    (255 + cover * u64::from(mask)) >> 8
}

/// Round half away from zero
pub(crate) fn mpl_round(v: f64) -> f64 {
    if v >= 0.0 {
        (v + 0.5).floor()
    } else {
        (v - 0.5).ceil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn multiply() {
        assert_eq!(multiply_u8(255, 255), 255);
        assert_eq!(multiply_u8(128, 255), 128);
        assert_eq!(multiply_u8(128, 128), 64);
        assert_eq!(multiply_u8(0, 200), 0);
    }
    #[test]
    fn lerp() {
        assert_eq!(lerp_u8(255, 0, 128), 127);
        assert_eq!(lerp_u8(255, 0, 64), 191);
        assert_eq!(lerp_u8(0, 255, 255), 255);
        assert_eq!(lerp_u8(10, 10, 77), 10);
    }
    #[test]
    fn prelerp() {
        assert_eq!(prelerp_u8(128, 128, 128), 192);
        assert_eq!(prelerp_u8(0, 255, 255), 255);
    }
    #[test]
    fn mask() {
        assert_eq!(mask_cover(255, 255), 255);
        assert_eq!(mask_cover(255, 0), 0);
        assert_eq!(mask_cover(128, 255), 128);
    }
    #[test]
    fn round() {
        assert_eq!(mpl_round(0.5), 1.0);
        assert_eq!(mpl_round(1.4), 1.0);
        assert_eq!(mpl_round(-0.5), -1.0);
    }
}
