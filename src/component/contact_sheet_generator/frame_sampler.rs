use super::timestamp_selector::select_timestamps;
use crate::config::DecoderTable;
use crate::error::SheetError;
use crate::tools::{GpuFrameCommand, VideoMetadata};
use image::{DynamicImage, ImageFormat};
use log::{debug, warn};
use std::path::Path;

/// 解碼成功的單一畫面
#[derive(Debug, Clone)]
pub struct SampledFrame {
    pub image: DynamicImage,
    pub timestamp: f64,
}

/// 硬體解碼器介面：在指定時間點解出一張畫面
///
/// 每次呼叫都是阻塞的，完成後才會處理下一個時間點。
pub trait FrameDecoder {
    fn decode_frame_at(
        &self,
        path: &Path,
        timestamp: f64,
        hw_decoder: &str,
    ) -> Result<DynamicImage, SheetError>;
}

/// 透過 ffmpeg CUDA/cuvid 解碼
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegGpuDecoder;

impl FrameDecoder for FfmpegGpuDecoder {
    fn decode_frame_at(
        &self,
        path: &Path,
        timestamp: f64,
        hw_decoder: &str,
    ) -> Result<DynamicImage, SheetError> {
        let command = GpuFrameCommand::new(path, timestamp, hw_decoder);
        debug!("執行擷取: ffmpeg {}", command.args().join(" "));

        let output = command.build_command().output().map_err(|e| SheetError::Decode {
            timestamp,
            reason: format!("無法執行 ffmpeg: {e}"),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SheetError::Decode {
                timestamp,
                reason: format!("ffmpeg 擷取失敗: {}", stderr.trim()),
            });
        }

        if output.stdout.is_empty() {
            return Err(SheetError::Decode {
                timestamp,
                reason: "ffmpeg 沒有輸出任何畫面".to_string(),
            });
        }

        image::load_from_memory_with_format(&output.stdout, ImageFormat::Jpeg).map_err(|e| {
            SheetError::Decode {
                timestamp,
                reason: format!("無法解析畫面: {e}"),
            }
        })
    }
}

/// 在均勻分布的時間點擷取畫面
///
/// 編碼不在能力表中時直接回傳空集合（軟性跳過）；
/// 單一時間點解碼失敗只記錄並略過，結果維持時間遞增順序。
pub fn sample_frames(
    decoder: &impl FrameDecoder,
    decoders: &DecoderTable,
    path: &Path,
    metadata: &VideoMetadata,
    count: usize,
) -> Vec<SampledFrame> {
    let Some(hw_decoder) = decoders.decoder_for(&metadata.codec) else {
        let skip = SheetError::UnsupportedCodec {
            codec: metadata.codec.clone(),
        };
        warn!("{} 自動跳過: {skip}", path.display());
        return Vec::new();
    };

    let timestamps = select_timestamps(metadata.duration_seconds, count);
    let mut frames = Vec::with_capacity(timestamps.len());

    for timestamp in timestamps {
        match decoder.decode_frame_at(path, timestamp, hw_decoder) {
            Ok(image) => frames.push(SampledFrame { image, timestamp }),
            Err(e) => warn!("{}: {e}", path.display()),
        }
    }

    debug!(
        "{}: 成功擷取 {}/{} 張畫面",
        path.display(),
        frames.len(),
        count
    );
    frames
}
