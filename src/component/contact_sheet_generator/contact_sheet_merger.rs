use super::frame_sampler::SampledFrame;
use super::typeface::Typeface;
use crate::config::GridLayout;
use crate::error::SheetError;
use crate::tools::{VideoMetadata, format_duration_minutes, format_size_mib, format_timecode};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([245, 245, 245]);
const HEADER_TEXT_COLOR: Rgb<u8> = Rgb([50, 50, 50]);
const TIMECODE_TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const TIMECODE_BOX_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const TIMECODE_BOX_ALPHA: u8 = 180;

/// 網格中的位置，以欄、列表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    pub col: u32,
    pub row: u32,
}

/// 已放入畫布的格子
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCell {
    pub index: usize,
    pub position: GridPosition,
    pub timestamp: f64,
}

#[derive(Debug, Clone)]
pub struct ContactSheet {
    pub canvas: RgbImage,
    pub cells: Vec<PlacedCell>,
}

impl ContactSheet {
    /// 以 JPEG 寫入檔案
    pub fn save_jpeg(&self, path: &Path, quality: u8) -> Result<(), SheetError> {
        let write_error = |source| SheetError::Write {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(|e| write_error(image::ImageError::IoError(e)))?;
        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, quality)
            .encode_image(&self.canvas)
            .map_err(write_error)?;
        writer
            .flush()
            .map_err(|e| write_error(image::ImageError::IoError(e)))?;

        debug!("預覽圖已寫入: {}", path.display());
        Ok(())
    }
}

/// 第 `index` 張畫面的網格位置（列優先）
#[must_use]
pub const fn grid_position(index: usize, columns: u32) -> GridPosition {
    let index = index as u32;
    GridPosition {
        col: index % columns,
        row: index / columns,
    }
}

/// 格子在畫布上的左上角座標
#[must_use]
pub const fn cell_origin(position: GridPosition, layout: &GridLayout) -> (u32, u32) {
    (
        layout.margin + position.col * layout.thumb_width,
        layout.margin + layout.header_height + position.row * layout.thumb_height,
    )
}

/// 資訊區的文字行
#[must_use]
pub fn header_lines(info: &VideoMetadata) -> Vec<String> {
    vec![
        format!("File: {}", info.display_name),
        format!("Size: {} MiB", format_size_mib(info.file_size_bytes)),
        format!("Resolution: {}x{}", info.width, info.height),
        format!("Duration: {}", format_duration_minutes(info.duration_seconds)),
        format!("FPS: {:.2}", info.frame_rate),
        format!("Codec: {}", info.codec),
    ]
}

/// 將畫面合併為預覽圖
///
/// `None` 代表解碼失敗的畫面，該格保留背景色且不畫時間碼；
/// 超過網格容量的畫面會被忽略。每張畫面直接拉伸為縮圖尺寸，不補黑邊也不裁切。
#[must_use]
pub fn compose(
    frames: &[Option<SampledFrame>],
    layout: &GridLayout,
    info: Option<&VideoMetadata>,
    typeface: &Typeface,
) -> ContactSheet {
    let (width, height) = layout.canvas_size();
    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND_COLOR);

    if let Some(info) = info {
        for (i, line) in header_lines(info).iter().enumerate() {
            let y = layout.margin + i as u32 * layout.line_height;
            typeface.draw(
                &mut canvas,
                layout.margin as i32,
                y as i32,
                HEADER_TEXT_COLOR,
                line,
            );
        }
    }

    let mut cells = Vec::with_capacity(frames.len().min(layout.capacity()));

    for (index, frame) in frames.iter().enumerate().take(layout.capacity()) {
        let Some(frame) = frame else {
            continue;
        };

        let position = grid_position(index, layout.columns);
        let (x, y) = cell_origin(position, layout);

        let thumbnail = resize_to_cell(frame, layout);
        imageops::replace(&mut canvas, &thumbnail, i64::from(x), i64::from(y));
        draw_timecode(&mut canvas, typeface, x, y, layout, frame.timestamp);

        cells.push(PlacedCell {
            index,
            position,
            timestamp: frame.timestamp,
        });
    }

    debug!(
        "合併 {} 張畫面為 {}x{} 預覽圖 ({}x{})",
        cells.len(),
        layout.columns,
        layout.rows,
        width,
        height
    );

    ContactSheet { canvas, cells }
}

/// 轉為 RGB 並以 Lanczos 拉伸為縮圖尺寸
#[must_use]
pub fn resize_to_cell(frame: &SampledFrame, layout: &GridLayout) -> RgbImage {
    imageops::resize(
        &frame.image.to_rgb8(),
        layout.thumb_width,
        layout.thumb_height,
        FilterType::Lanczos3,
    )
}

/// 在格子左下角畫上半透明底框與時間碼
fn draw_timecode(
    canvas: &mut RgbImage,
    typeface: &Typeface,
    x: u32,
    y: u32,
    layout: &GridLayout,
    timestamp: f64,
) {
    let text = format_timecode(timestamp);
    let (text_width, text_height) = typeface.measure(&text);

    let bottom = (y + layout.thumb_height) as i64;
    let box_left = i64::from(x) + 5;
    let box_top = bottom - i64::from(text_height) - 8;
    let box_right = box_left + i64::from(text_width) + 8;
    let box_bottom = bottom - 5;

    blend_rect(
        canvas,
        (box_left, box_top),
        (box_right, box_bottom),
        TIMECODE_BOX_COLOR,
        TIMECODE_BOX_ALPHA,
    );

    typeface.draw(
        canvas,
        (i64::from(x) + 9) as i32,
        (bottom - i64::from(text_height) - 6) as i32,
        TIMECODE_TEXT_COLOR,
        &text,
    );
}

/// 以 alpha 混合填滿矩形，含兩端點
fn blend_rect(
    canvas: &mut RgbImage,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    color: Rgb<u8>,
    alpha: u8,
) {
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let alpha = u32::from(alpha);

    for py in top_left.1.max(0)..=bottom_right.1.min(height - 1) {
        for px in top_left.0.max(0)..=bottom_right.0.min(width - 1) {
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            for (channel, overlay) in pixel.0.iter_mut().zip(color.0) {
                let blended =
                    (u32::from(*channel) * (255 - alpha) + u32::from(overlay) * alpha) / 255;
                *channel = blended as u8;
            }
        }
    }
}
