use super::*;

#[test]
fn kernel_taps_sum_to_one_q16() {
    for blur in [0.01, 3.0, 8.0, 24.0] {
        let k = Kernel::for_css_blur(blur);
        assert_eq!(k.taps.len(), 2 * k.radius + 1);
        assert_eq!(k.taps.iter().map(|&t| u64::from(t)).sum::<u64>(), 1 << 16);
        assert_eq!(k.taps.first(), k.taps.last());
    }
    assert_eq!(Kernel::for_css_blur(8.0).radius, 12);
}

#[test]
fn zero_blur_is_identity() {
    let src = vec![1, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(blur_rgba8_premul(&src, 2, 1, 0.0).unwrap(), src);
}

#[test]
fn blur_spreads_a_single_pixel_symmetrically() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let c = ((4 * w + 4) * 4) as usize;
    src[c..c + 4].copy_from_slice(&[255, 255, 255, 255]);
    let out = blur_rgba8_premul(&src, w, h, 4.0).unwrap();
    let at = |x: u32, y: u32| out[((y * w + x) * 4 + 3) as usize];
    assert!(at(4, 4) < 255);
    assert!(at(3, 4) > 0);
    assert_eq!(at(3, 4), at(5, 4));
    assert_eq!(at(4, 3), at(4, 5));
}

#[test]
fn non_finite_blur_is_identity() {
    let src = vec![9, 8, 7, 255];
    assert_eq!(blur_rgba8_premul(&src, 1, 1, f64::INFINITY).unwrap(), src);
}

#[test]
fn opaque_row_keeps_its_middle_and_fades_at_the_edges() {
    let (w, h) = (41u32, 1u32);
    let src = [255u8, 0, 0, 255].repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 4.0).unwrap();
    let alpha = |x: u32| out[(x * 4 + 3) as usize];
    assert!(alpha(0) < alpha(20));
    assert_eq!(alpha(0), alpha(40));
}

#[test]
fn length_mismatch_is_an_error() {
    assert!(blur_rgba8_premul(&[0; 7], 1, 2, 2.0).is_err());
}
