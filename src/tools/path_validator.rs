use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

pub fn validate_path_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// 預覽圖輸出路徑：`<output_dir>/<原始檔名主幹>.jpg`
///
/// 輸出平放在目的資料夾，不保留輸入的子資料夾結構；檔名主幹大小寫保持原樣。
#[must_use]
pub fn contact_sheet_output_path(video_path: &Path, output_dir: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string());
    output_dir.join(format!("{stem}.jpg"))
}
