//! Premultiplied RGBA8 buffer helpers shared by the panel renderer and the
//! per-card compositing step.

use crate::error::{LexicardError, LexicardResult};

/// Convert straight RGBA8 to premultiplied RGBA8 in place.
pub(crate) fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255(px[0] as u16, a);
        px[1] = mul_div255(px[1] as u16, a);
        px[2] = mul_div255(px[2] as u16, a);
    }
}

/// Convert premultiplied RGBA8 back to straight RGBA8 in place.
pub(crate) fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in 0..3 {
            let v = (u16::from(px[c]) * 255 + a / 2) / a;
            px[c] = v.min(255) as u8;
        }
    }
}

/// Source-over composite `src` onto `dst`, both premultiplied RGBA8.
pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8]) -> LexicardResult<()> {
    if dst.len() != src.len() || dst.len() % 4 != 0 {
        return Err(LexicardError::render_failure(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3] as u16;
        if sa == 0 {
            continue;
        }
        let inv = 255 - sa;
        d[3] = (sa as u8).saturating_add(mul_div255(d[3] as u16, inv));
        for c in 0..3 {
            d[c] = s[c].saturating_add(mul_div255(d[c] as u16, inv));
        }
    }
    Ok(())
}

/// Scale the color channels of an opaque premultiplied buffer by `factor`
/// (0..=1). Used for per-theme background dimming.
pub(crate) fn dim_in_place(rgba: &mut [u8], factor: f32) {
    let factor = factor.clamp(0.0, 1.0);
    if (factor - 1.0).abs() < f32::EPSILON {
        return;
    }
    let q = (factor * 256.0).round() as u32;
    for px in rgba.chunks_exact_mut(4) {
        for c in 0..3 {
            px[c] = ((u32::from(px[c]) * q) >> 8).min(255) as u8;
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiply_zero_alpha_clears_color() {
        let mut px = vec![200u8, 100, 50, 0];
        premultiply_in_place(&mut px);
        assert_eq!(px, vec![0, 0, 0, 0]);
    }

    #[test]
    fn premultiply_then_unpremultiply_roundtrips_near() {
        let mut px = vec![200u8, 100, 50, 128];
        premultiply_in_place(&mut px);
        unpremultiply_in_place(&mut px);
        assert!((px[0] as i16 - 200).abs() <= 2);
        assert!((px[1] as i16 - 100).abs() <= 2);
        assert!((px[2] as i16 - 50).abs() <= 2);
        assert_eq!(px[3], 128);
    }

    #[test]
    fn over_transparent_src_is_noop() {
        let mut dst = vec![10u8, 20, 30, 255];
        over_in_place(&mut dst, &[0, 0, 0, 0]).unwrap();
        assert_eq!(dst, vec![10, 20, 30, 255]);
    }

    #[test]
    fn over_opaque_src_replaces_dst() {
        let mut dst = vec![10u8, 20, 30, 255];
        over_in_place(&mut dst, &[200, 150, 100, 255]).unwrap();
        assert_eq!(dst, vec![200, 150, 100, 255]);
    }

    #[test]
    fn over_rejects_mismatched_buffers() {
        let mut dst = vec![0u8; 8];
        assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    }

    #[test]
    fn dim_halves_color_and_keeps_alpha() {
        let mut px = vec![200u8, 100, 50, 255];
        dim_in_place(&mut px, 0.5);
        assert_eq!(px[3], 255);
        assert!((px[0] as i16 - 100).abs() <= 1);
        assert!((px[1] as i16 - 50).abs() <= 1);
        assert!((px[2] as i16 - 25).abs() <= 1);
    }

    #[test]
    fn dim_factor_one_is_identity() {
        let mut px = vec![200u8, 100, 50, 255];
        dim_in_place(&mut px, 1.0);
        assert_eq!(px, vec![200, 100, 50, 255]);
    }
}
