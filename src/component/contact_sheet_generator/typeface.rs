use ab_glyph::{FontVec, PxScale};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// 內建點陣字型的原始字寬（像素）
const BITMAP_GLYPH_SIZE: u32 = 8;

/// 預覽圖使用的字型
///
/// 優先使用系統的向量字型；都載入失敗時改用內建的 8x8 點陣字型，
/// 因此載入字型永遠不會失敗。
pub enum Typeface {
    Outline { font: FontVec, scale: PxScale },
    Bitmap { scale: u32 },
}

impl Typeface {
    #[must_use]
    pub fn load(size: f32, candidates: &[PathBuf]) -> Self {
        for path in candidates {
            let Ok(bytes) = fs::read(path) else {
                continue;
            };
            match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    debug!("使用字型: {}", path.display());
                    return Self::Outline {
                        font,
                        scale: PxScale::from(size),
                    };
                }
                Err(e) => debug!("無法載入字型 {}: {e}", path.display()),
            }
        }

        info!("找不到可用的系統字型，改用內建點陣字型");
        Self::builtin(size)
    }

    #[must_use]
    pub fn builtin(size: f32) -> Self {
        let scale = (size / BITMAP_GLYPH_SIZE as f32).floor().max(1.0) as u32;
        Self::Bitmap { scale }
    }

    /// 文字外框尺寸 (寬, 高)
    #[must_use]
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            Self::Outline { font, scale } => text_size(*scale, font, text),
            Self::Bitmap { scale } => {
                let chars = text.chars().count() as u32;
                if chars == 0 {
                    return (0, 0);
                }
                let cell = BITMAP_GLYPH_SIZE * scale;
                (chars * cell, cell)
            }
        }
    }

    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        match self {
            Self::Outline { font, scale } => draw_text_mut(canvas, color, x, y, *scale, font, text),
            Self::Bitmap { scale } => draw_bitmap_text(canvas, x, y, *scale, color, text),
        }
    }
}

fn bitmap_glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_bitmap_text(canvas: &mut RgbImage, x: i32, y: i32, scale: u32, color: Rgb<u8>, text: &str) {
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let scale = i64::from(scale);
    let advance = i64::from(BITMAP_GLYPH_SIZE) * scale;

    for (index, c) in text.chars().enumerate() {
        let origin_x = i64::from(x) + index as i64 * advance;
        if origin_x >= width {
            break;
        }

        // 每列一個位元組，最低位元是最左邊的像素
        for (row, bits) in bitmap_glyph(c).iter().enumerate() {
            for col in 0..8_u32 {
                if bits & (1_u8 << col) == 0 {
                    continue;
                }
                let block_x = origin_x + i64::from(col) * scale;
                let block_y = i64::from(y) + row as i64 * scale;
                for py in block_y..block_y + scale {
                    for px in block_x..block_x + scale {
                        if (0..width).contains(&px) && (0..height).contains(&py) {
                            canvas.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}
