use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// 預覽圖網格配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    pub thumb_width: u32,
    pub thumb_height: u32,
    /// 畫布四周留白
    pub margin: u32,
    /// 頂部資訊區高度
    pub header_height: u32,
    /// 資訊區每行間距
    pub line_height: u32,
    pub font_size: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 4,
            thumb_width: 320,
            thumb_height: 180,
            margin: 10,
            header_height: 120,
            line_height: 24,
            font_size: 20.0,
        }
    }
}

impl GridLayout {
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// 畫布尺寸 (寬, 高)
    #[must_use]
    pub const fn canvas_size(&self) -> (u32, u32) {
        let width = self.columns * self.thumb_width + self.margin * 2;
        let height = self.rows * self.thumb_height + self.margin * 2 + self.header_height;
        (width, height)
    }

    /// 同 [`Self::canvas_size`]，溢位時回傳 `None`
    #[must_use]
    pub fn checked_canvas_size(&self) -> Option<(u32, u32)> {
        self.columns.checked_mul(self.rows)?;
        let margins = self.margin.checked_mul(2)?;
        let width = self
            .columns
            .checked_mul(self.thumb_width)?
            .checked_add(margins)?;
        let height = self
            .rows
            .checked_mul(self.thumb_height)?
            .checked_add(margins)?
            .checked_add(self.header_height)?;
        Some((width, height))
    }
}

/// 硬體解碼能力表：編碼名稱 -> ffmpeg 硬體解碼器名稱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecoderTable(BTreeMap<String, String>);

impl Default for DecoderTable {
    fn default() -> Self {
        Self(BTreeMap::from([
            ("h264".to_string(), "h264_cuvid".to_string()),
            ("hevc".to_string(), "hevc_cuvid".to_string()),
        ]))
    }
}

impl DecoderTable {
    #[must_use]
    pub fn decoder_for(&self, codec: &str) -> Option<&str> {
        self.0.get(codec).map(String::as_str)
    }

    #[must_use]
    pub fn codecs(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

impl FromIterator<(String, String)> for DecoderTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    /// 每部影片取樣的畫面數
    pub frame_count: usize,
    pub layout: GridLayout,
    /// JPEG 品質 (1-100)
    pub jpeg_quality: u8,
    /// 副檔名允許清單，格式為 ".mp4"
    pub video_extensions: Vec<String>,
    pub decoders: DecoderTable,
    /// 依序嘗試載入的字型檔
    pub font_paths: Vec<PathBuf>,
}

/// 不含字型清單，一律使用內建點陣字型，測試結果與系統字型無關；
/// 實際執行時的預設值來自 `data/default_settings.json`
impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            frame_count: 16,
            layout: GridLayout::default(),
            jpeg_quality: 95,
            video_extensions: [".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm"]
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            decoders: DecoderTable::default(),
            font_paths: Vec::new(),
        }
    }
}

impl SheetSettings {
    /// 小寫且帶前導點的副檔名集合，`"mp4"` 與 `".MP4"` 視為相同
    #[must_use]
    pub fn video_extensions_set(&self) -> HashSet<String> {
        self.video_extensions
            .iter()
            .map(|ext| format!(".{}", ext.trim().trim_start_matches('.').to_lowercase()))
            .collect()
    }

    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        let video_extensions = self.video_extensions_set();
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| video_extensions.contains(&format!(".{}", ext.to_lowercase())))
    }
}
