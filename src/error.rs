//! 預覽圖流程的錯誤分類
//!
//! 單一檔案範圍的錯誤（探測、解碼、取樣不足、寫入）只會讓該檔案失敗，
//! 不會中斷整批處理；只有 `NoAcceleratedDecoder` 與 `Interrupted` 會終止整批。

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    /// 無法讀取影片資訊（檔案無法開啟、沒有視訊串流、欄位缺失或無法解析）
    #[error("無法讀取影片資訊 {}: {reason}", path.display())]
    Probe { path: PathBuf, reason: String },

    /// 編碼不在硬體解碼能力表中，屬於軟性跳過
    #[error("編碼 {codec} 不支援 GPU 解碼")]
    UnsupportedCodec { codec: String },

    /// 單一時間點解碼失敗
    #[error("擷取 {timestamp:.3}s 的畫面失敗: {reason}")]
    Decode { timestamp: f64, reason: String },

    /// 沒有任何可用的畫面
    #[error("沒有成功擷取任何畫面: {}", path.display())]
    SampleExhaustion { path: PathBuf },

    /// 輸出檔案寫入失敗
    #[error("無法寫入預覽圖 {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("未偵測到 NVIDIA 顯卡或 nvidia-smi 不可用，無法使用 GPU 解碼")]
    NoAcceleratedDecoder,

    #[error("使用者中斷，已停止")]
    Interrupted,

    #[error("設定無效: {0}")]
    Config(String),
}

impl SheetError {
    pub fn probe(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Probe {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// 是否會終止整批處理
    #[must_use]
    pub const fn is_batch_fatal(&self) -> bool {
        matches!(self, Self::NoAcceleratedDecoder | Self::Interrupted)
    }
}
