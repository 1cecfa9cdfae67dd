use crate::config::SheetSettings;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 遞迴掃描資料夾中副檔名符合允許清單的影片
///
/// 結果依路徑排序，讓批次處理順序固定。
#[must_use]
pub fn scan_video_files(directory: &Path, settings: &SheetSettings) -> Vec<PathBuf> {
    let mut video_files: Vec<PathBuf> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| settings.is_video_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    video_files.sort();
    video_files
}
