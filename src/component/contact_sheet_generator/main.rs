use super::contact_sheet_merger::compose;
use super::frame_sampler::{FfmpegGpuDecoder, FrameDecoder, SampledFrame, sample_frames};
use super::typeface::Typeface;
use crate::config::SheetSettings;
use crate::error::SheetError;
use crate::tools::{
    VideoMetadata, contact_sheet_output_path, ensure_directory_exists, get_video_info,
    scan_video_files,
};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 影片資訊探測介面
pub trait MediaProber {
    fn probe(&self, path: &Path) -> Result<VideoMetadata, SheetError>;
}

/// 透過 ffprobe 探測
#[derive(Debug, Default, Clone, Copy)]
pub struct FfprobeProber;

impl MediaProber for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<VideoMetadata, SheetError> {
        get_video_info(path)
    }
}

/// 批次處理結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchTally {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failed_paths: Vec<PathBuf>,
}

impl BatchTally {
    pub fn record(&mut self, path: &Path, success: bool) {
        self.total += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.failed_paths.push(path.to_path_buf());
        }
    }
}

/// 預覽圖生成器
///
/// 每部影片依序經過：探測 -> 取樣 -> 合併 -> 寫檔，完成後才處理下一部。
/// 單一影片的錯誤只會讓該影片失敗；缺少硬體解碼器或使用者中斷才會終止整批。
pub struct ContactSheetGenerator<P = FfprobeProber, D = FfmpegGpuDecoder> {
    settings: SheetSettings,
    prober: P,
    decoder: D,
    typeface: Typeface,
    accelerated_decoder: bool,
    shutdown_signal: Arc<AtomicBool>,
}

impl ContactSheetGenerator {
    #[must_use]
    pub fn new(
        settings: SheetSettings,
        accelerated_decoder: bool,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self::with_collaborators(
            settings,
            FfprobeProber,
            FfmpegGpuDecoder,
            accelerated_decoder,
            shutdown_signal,
        )
    }
}

impl<P: MediaProber, D: FrameDecoder> ContactSheetGenerator<P, D> {
    #[must_use]
    pub fn with_collaborators(
        settings: SheetSettings,
        prober: P,
        decoder: D,
        accelerated_decoder: bool,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        let typeface = Typeface::load(settings.layout.font_size, &settings.font_paths);
        Self {
            settings,
            prober,
            decoder,
            typeface,
            accelerated_decoder,
            shutdown_signal,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &SheetSettings {
        &self.settings
    }

    /// 輸入為資料夾時批次處理，否則視為單一影片
    pub fn run(&self, input: &Path, output_dir: &Path) -> Result<BatchTally, SheetError> {
        if input.is_dir() {
            return self.run_all(input, output_dir);
        }

        self.ensure_accelerated_decoder()?;
        let mut tally = BatchTally::default();
        let success = self.run_one(input, output_dir);
        tally.record(input, success);
        self.check_interrupted()?;
        Ok(tally)
    }

    /// 遞迴處理資料夾下所有影片
    pub fn run_all(&self, input_root: &Path, output_dir: &Path) -> Result<BatchTally, SheetError> {
        self.ensure_accelerated_decoder()?;

        let videos = scan_video_files(input_root, &self.settings);
        println!(
            "{}",
            style(format!("找到 {} 個影片檔案", videos.len())).green()
        );

        let mut tally = BatchTally::default();
        if videos.is_empty() {
            return Ok(tally);
        }

        let progress_bar = ProgressBar::new(videos.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        progress_bar.set_message("生成預覽圖");

        for video in &videos {
            if self.is_interrupted() {
                progress_bar.abandon_with_message("操作已中斷");
                warn!("收到中斷訊號，停止處理");
                return Err(SheetError::Interrupted);
            }

            let success = progress_bar.suspend(|| self.run_one(video, output_dir));
            tally.record(video, success);
            progress_bar.inc(1);
        }

        // 最後一部影片處理期間收到的中斷
        if self.is_interrupted() {
            progress_bar.abandon_with_message("操作已中斷");
            warn!("收到中斷訊號，停止處理");
            return Err(SheetError::Interrupted);
        }

        progress_bar.finish_with_message("完成");
        self.print_summary(&tally);

        Ok(tally)
    }

    /// 處理單一影片，回傳是否成功
    pub fn run_one(&self, path: &Path, output_dir: &Path) -> bool {
        match self.process_video(path, output_dir) {
            Ok(output_path) => {
                info!("已保存: {}", output_path.display());
                true
            }
            Err(e) => {
                error!("處理失敗: {}, 錯誤: {e}", path.display());
                false
            }
        }
    }

    /// 探測 -> 取樣 -> 合併 -> 寫檔，回傳輸出路徑
    pub fn process_video(&self, path: &Path, output_dir: &Path) -> Result<PathBuf, SheetError> {
        let metadata = self.prober.probe(path)?;
        info!("正在處理: {}", path.display());

        let frames = sample_frames(
            &self.decoder,
            &self.settings.decoders,
            path,
            &metadata,
            self.settings.frame_count,
        );
        if frames.is_empty() {
            return Err(SheetError::SampleExhaustion {
                path: path.to_path_buf(),
            });
        }

        let frames: Vec<Option<SampledFrame>> = frames.into_iter().map(Some).collect();
        let sheet = compose(
            &frames,
            &self.settings.layout,
            Some(&metadata),
            &self.typeface,
        );

        // 中斷時 ffmpeg 也會收到訊號，畫面可能不完整，不寫出
        self.check_interrupted()?;

        ensure_directory_exists(output_dir).map_err(|e| SheetError::Write {
            path: output_dir.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?;
        let output_path = contact_sheet_output_path(path, output_dir);
        sheet.save_jpeg(&output_path, self.settings.jpeg_quality)?;

        Ok(output_path)
    }

    fn is_interrupted(&self) -> bool {
        self.shutdown_signal.load(Ordering::SeqCst)
    }

    fn check_interrupted(&self) -> Result<(), SheetError> {
        if self.is_interrupted() {
            warn!("收到中斷訊號，停止處理");
            Err(SheetError::Interrupted)
        } else {
            Ok(())
        }
    }

    fn ensure_accelerated_decoder(&self) -> Result<(), SheetError> {
        if self.accelerated_decoder {
            Ok(())
        } else {
            Err(SheetError::NoAcceleratedDecoder)
        }
    }

    fn print_summary(&self, tally: &BatchTally) {
        println!();
        println!("{}", style("=== 預覽圖生成摘要 ===").cyan().bold());
        println!("  總計: {} 個影片", tally.total);
        println!("  成功: {} 個", style(tally.succeeded).green());

        if tally.failed > 0 {
            println!("  失敗: {} 個", style(tally.failed).red());
            for path in &tally.failed_paths {
                println!("    {} {}", style("✗").red(), path.display());
            }
        }

        info!(
            "預覽圖生成完成 - 成功: {}, 失敗: {}",
            tally.succeeded, tally.failed
        );
    }
}
