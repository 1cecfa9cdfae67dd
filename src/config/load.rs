use crate::config::types::SheetSettings;
use crate::error::SheetError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// 編譯時嵌入的預設設定（不需要外部檔案）
const DEFAULT_SETTINGS_JSON: &str = include_str!("../data/default_settings.json");

/// 未指定設定檔時，工作目錄下自動讀取的檔名
pub const LOCAL_SETTINGS_FILE: &str = "contact_sheet.json";

impl SheetSettings {
    /// 載入設定：嵌入的預設值，再由設定檔覆寫
    ///
    /// `path` 為 `None` 時嘗試讀取工作目錄下的 `contact_sheet.json`，不存在則使用預設值。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let local = Path::new(LOCAL_SETTINGS_FILE);
                if local.exists() {
                    Self::load_from_file(local)?
                } else {
                    Self::load_embedded()?
                }
            }
        };

        settings.validate()?;
        Ok(settings)
    }

    /// 從編譯時嵌入的 JSON 載入預設設定
    pub fn load_embedded() -> Result<Self> {
        serde_json::from_str(DEFAULT_SETTINGS_JSON).context("無法解析嵌入的預設設定")
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        // 設定檔只需列出要覆寫的欄位，其餘沿用嵌入的預設值
        let mut merged = serde_json::to_value(Self::load_embedded()?)?;
        let overrides: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;
        merge_json(&mut merged, overrides);

        serde_json::from_value(merged)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), SheetError> {
        let layout = &self.layout;
        if self.frame_count == 0 {
            return Err(SheetError::Config("frame_count 必須至少為 1".to_string()));
        }
        if layout.columns == 0 || layout.rows == 0 {
            return Err(SheetError::Config("網格欄數與列數必須至少為 1".to_string()));
        }
        if layout.thumb_width == 0 || layout.thumb_height == 0 {
            return Err(SheetError::Config("縮圖尺寸必須大於 0".to_string()));
        }
        if layout.checked_canvas_size().is_none() {
            return Err(SheetError::Config(format!(
                "網格畫布過大: {}x{} 格，每格 {}x{}",
                layout.columns, layout.rows, layout.thumb_width, layout.thumb_height
            )));
        }
        if self.frame_count > layout.capacity() {
            return Err(SheetError::Config(format!(
                "frame_count ({}) 不可超過網格格數 ({}x{} = {})",
                self.frame_count,
                layout.columns,
                layout.rows,
                layout.capacity()
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(SheetError::Config(format!(
                "jpeg_quality 必須介於 1 到 100，目前為 {}",
                self.jpeg_quality
            )));
        }
        if self.video_extensions.is_empty() {
            return Err(SheetError::Config("video_extensions 不可為空".to_string()));
        }
        Ok(())
    }
}

/// 以 `overrides` 遞迴覆寫 `base` 中的物件欄位
fn merge_json(base: &mut serde_json::Value, overrides: serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                // 能力表整張替換，才能移除預設的編碼
                if key == "decoders" {
                    base.insert(key, value);
                    continue;
                }
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overrides) => *base = overrides,
    }
}
