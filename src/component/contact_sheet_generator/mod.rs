//! 影片預覽圖生成元件
//!
//! 流程：
//! A. 取得影片資訊（ffprobe）
//! B. 均勻選取時間點
//! C. GPU 解碼擷取畫面
//! D. 合併為附資訊區與時間碼的網格預覽圖
//! E. 寫出 JPEG

mod contact_sheet_merger;
mod frame_sampler;
mod main;
mod timestamp_selector;
mod typeface;

pub use contact_sheet_merger::{
    BACKGROUND_COLOR, ContactSheet, GridPosition, PlacedCell, cell_origin, compose, grid_position,
    header_lines, resize_to_cell,
};
pub use frame_sampler::{FfmpegGpuDecoder, FrameDecoder, SampledFrame, sample_frames};
pub use main::{BatchTally, ContactSheetGenerator, FfprobeProber, MediaProber};
pub use timestamp_selector::select_timestamps;
pub use typeface::Typeface;
