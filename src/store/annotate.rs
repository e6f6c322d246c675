//! Text overlay using the font8x8 bitmap font

use crate::constants::{ANNOTATION_BASELINE, ANNOTATION_SCALE, ANNOTATION_X};
use font8x8::{
    UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, HIRAGANA_FONTS, LATIN_FONTS,
    MISC_FONTS,
};
use image::{Rgb, RgbImage};

const GLYPH_SIZE: u32 = 8;
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Draw `text` at the fixed overlay position. Pixels outside the image are clipped.
pub fn draw_label(image: &mut RgbImage, text: &str) {
    let top = ANNOTATION_BASELINE.saturating_sub(GLYPH_SIZE * ANNOTATION_SCALE);
    draw_text(image, ANNOTATION_X, top, ANNOTATION_SCALE, text);
}

fn draw_text(image: &mut RgbImage, left: u32, top: u32, scale: u32, text: &str) {
    let advance = GLYPH_SIZE * scale;
    let (width, height) = image.dimensions();

    for (i, ch) in text.chars().enumerate() {
        let bitmap = glyph(ch).or_else(|| glyph('?')).unwrap_or([0; 8]);
        let origin_x = left + i as u32 * advance;
        if origin_x >= width {
            break;
        }

        for (row, bits) in bitmap.into_iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // Bit 0 is the leftmost column
                if bits & (1u8 << col) == 0 {
                    continue;
                }
                let x0 = origin_x + col * scale;
                let y0 = top + row as u32 * scale;
                for y in y0..(y0 + scale).min(height) {
                    for x in x0..(x0 + scale).min(width) {
                        image.put_pixel(x, y, TEXT_COLOR);
                    }
                }
            }
        }
    }
}

/// Look `ch` up in every font8x8 table, ASCII first
fn glyph(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| BOX_FONTS.get(ch))
        .or_else(|| BLOCK_FONTS.get(ch))
        .or_else(|| HIRAGANA_FONTS.get(ch))
        .or_else(|| MISC_FONTS.get(ch))
}
