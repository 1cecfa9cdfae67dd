use crate::error::SheetError;
use log::debug;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// 單一影片的探測結果，只在該影片的處理流程中存在
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub duration_seconds: f64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    /// 未知時為 0
    pub frame_count: u64,
    pub file_size_bytes: u64,
    pub display_name: String,
    pub codec: String,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
    nb_frames: Option<String>,
}

/// 使用 ffprobe 取得影片資訊
pub fn get_video_info(path: &Path) -> Result<VideoMetadata, SheetError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| SheetError::probe(path, format!("無法執行 ffprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SheetError::probe(
            path,
            format!("ffprobe 執行失敗: {}", stderr.trim()),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let file_size_bytes = std::fs::metadata(path)
        .map_err(|e| SheetError::probe(path, format!("無法讀取檔案大小: {e}")))?
        .len();

    parse_probe_output(path, &stdout, file_size_bytes)
}

/// 從 ffprobe 的 JSON 輸出建立 [`VideoMetadata`]
pub fn parse_probe_output(
    path: &Path,
    json: &str,
    file_size_bytes: u64,
) -> Result<VideoMetadata, SheetError> {
    let probe: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| SheetError::probe(path, format!("無法解析 ffprobe 輸出: {e}")))?;

    // 找到第一個視訊串流
    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| SheetError::probe(path, "找不到視訊串流"))?;

    let width = video_stream
        .width
        .filter(|w| *w > 0)
        .ok_or_else(|| SheetError::probe(path, "無法取得影片寬度"))?;
    let height = video_stream
        .height
        .filter(|h| *h > 0)
        .ok_or_else(|| SheetError::probe(path, "無法取得影片高度"))?;

    // 影片長度優先取串流，其次取容器（mkv 的串流通常不帶 duration）
    let duration_seconds = video_stream
        .duration
        .as_ref()
        .or_else(|| probe.format.as_ref().and_then(|f| f.duration.as_ref()))
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| SheetError::probe(path, "無法取得有效的影片長度"))?;

    let frame_rate = video_stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .ok_or_else(|| {
            SheetError::probe(
                path,
                format!(
                    "無法解析幀率: {}",
                    video_stream.r_frame_rate.as_deref().unwrap_or("(缺少)")
                ),
            )
        })?;

    let frame_count = match video_stream.nb_frames.as_deref() {
        None => 0,
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| SheetError::probe(path, format!("無法解析總幀數: {raw}")))?,
    };

    let codec = video_stream
        .codec_name
        .clone()
        .ok_or_else(|| SheetError::probe(path, "無法取得影片編碼"))?;

    let display_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());

    debug!(
        "影片資訊 {display_name}: {duration_seconds:.2}s, {width}x{height}, {frame_rate:.2}fps, {codec}"
    );

    Ok(VideoMetadata {
        duration_seconds,
        width,
        height,
        frame_rate,
        frame_count,
        file_size_bytes,
        display_name,
        codec,
    })
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
///
/// 以分子分母直接相除，不做任何運算式求值。
#[must_use]
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let rate = rate.trim();
    let value = if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: u64 = num_str.trim().parse().ok()?;
        let den: u64 = den_str.trim().parse().ok()?;
        if den == 0 {
            return None;
        }
        num as f64 / den as f64
    } else {
        rate.parse::<f64>().ok()?
    };

    (value.is_finite() && value > 0.0).then_some(value)
}
