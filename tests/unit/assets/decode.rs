use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, vec![100, 50, 200, 128]);
    let prepared = decode_image(&buf).unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn encode_png_decodes_back_to_same_opaque_pixels() {
    let px = vec![10, 20, 30, 255, 40, 50, 60, 255];
    let png = encode_png_premul(2, 1, &px).unwrap();
    let back = decode_image(&png).unwrap();
    assert_eq!(back.rgba8_premul.as_slice(), px.as_slice());
}

#[test]
fn from_premul_checks_length() {
    assert!(PreparedImage::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(PreparedImage::from_premul(2, 2, vec![0; 16]).is_ok());
}
