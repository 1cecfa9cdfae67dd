//! 整合測試 - 以假的探測器與解碼器驅動完整批次流程
//!
//! 不需要 GPU、ffmpeg 或真實影片檔

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use video_contact_sheet::SheetError;
use video_contact_sheet::component::contact_sheet_generator::{
    BatchTally, ContactSheetGenerator, FrameDecoder, MediaProber,
};
use video_contact_sheet::config::SheetSettings;
use video_contact_sheet::tools::VideoMetadata;

/// 依檔名回傳預先設定的影片資訊
struct FakeProber {
    videos: HashMap<String, Result<VideoMetadata, String>>,
    probed: Rc<RefCell<Vec<String>>>,
}

impl FakeProber {
    fn new() -> Self {
        Self {
            videos: HashMap::new(),
            probed: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn with_video(mut self, name: &str, codec: &str, duration_seconds: f64) -> Self {
        self.videos.insert(
            name.to_string(),
            Ok(VideoMetadata {
                duration_seconds,
                width: 640,
                height: 480,
                frame_rate: 25.0,
                frame_count: 0,
                file_size_bytes: 2_097_152,
                display_name: name.to_string(),
                codec: codec.to_string(),
            }),
        );
        self
    }

    fn with_broken(mut self, name: &str, reason: &str) -> Self {
        self.videos.insert(name.to_string(), Err(reason.to_string()));
        self
    }
}

impl MediaProber for FakeProber {
    fn probe(&self, path: &Path) -> Result<VideoMetadata, SheetError> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.probed.borrow_mut().push(name.clone());
        match self.videos.get(&name) {
            Some(Ok(info)) => Ok(info.clone()),
            Some(Err(reason)) => Err(SheetError::probe(path, reason.clone())),
            None => Err(SheetError::probe(path, "unknown file")),
        }
    }
}

/// 計算呼叫次數，可設定某些檔案一律解碼失敗
struct CountingDecoder {
    calls: Rc<Cell<usize>>,
    failing_files: Vec<String>,
}

impl CountingDecoder {
    fn new() -> Self {
        Self {
            calls: Rc::new(Cell::new(0)),
            failing_files: Vec::new(),
        }
    }

    fn failing_on(mut self, name: &str) -> Self {
        self.failing_files.push(name.to_string());
        self
    }
}

impl FrameDecoder for CountingDecoder {
    fn decode_frame_at(
        &self,
        path: &Path,
        timestamp: f64,
        _hw_decoder: &str,
    ) -> Result<DynamicImage, SheetError> {
        self.calls.set(self.calls.get() + 1);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if self.failing_files.contains(&name) {
            return Err(SheetError::Decode {
                timestamp,
                reason: "decoder rejected stream".to_string(),
            });
        }
        // 非 16:9 的來源畫面
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            640,
            480,
            Rgb([30, 120, 200]),
        )))
    }
}

/// 解碼第一張畫面時模擬使用者按下 Ctrl-C
struct InterruptingDecoder {
    shutdown_signal: Arc<AtomicBool>,
}

impl FrameDecoder for InterruptingDecoder {
    fn decode_frame_at(
        &self,
        _path: &Path,
        timestamp: f64,
        _hw_decoder: &str,
    ) -> Result<DynamicImage, SheetError> {
        self.shutdown_signal.store(true, Ordering::SeqCst);
        // ffmpeg 與主程式同一個行程群組，也會被中斷
        Err(SheetError::Decode {
            timestamp,
            reason: "ffmpeg interrupted".to_string(),
        })
    }
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

fn generator(
    prober: FakeProber,
    decoder: CountingDecoder,
    accelerated_decoder: bool,
) -> ContactSheetGenerator<FakeProber, CountingDecoder> {
    ContactSheetGenerator::with_collaborators(
        SheetSettings::default(),
        prober,
        decoder,
        accelerated_decoder,
        Arc::new(AtomicBool::new(false)),
    )
}

/// 測試 1: 單一影片產生 1300x960 的預覽圖
#[test]
fn test_single_video_produces_contact_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("videos").join("sub").join("clip.MKV");
    touch(&video);
    let output_dir = dir.path().join("out").join("nested");

    let generator = generator(
        FakeProber::new().with_video("clip.MKV", "h264", 90.0),
        CountingDecoder::new(),
        true,
    );

    assert!(generator.run_one(&video, &output_dir));

    let output = output_dir.join("clip.jpg");
    assert!(output.exists(), "輸出應為 out/nested/clip.jpg");
    let sheet = image::open(&output).unwrap();
    assert_eq!(sheet.dimensions(), (1300, 960));

    println!("✓ 單一影片預覽圖測試通過");
}

/// 測試 2: 有問題的影片不影響同批次其他影片
#[test]
fn test_bad_file_does_not_halt_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    touch(&input.join("a_good.mp4"));
    touch(&input.join("b_no_duration.mp4"));
    touch(&input.join("deeper").join("c_good.mov"));
    touch(&input.join("readme.txt"));
    let output_dir = dir.path().join("sheets");

    let generator = generator(
        FakeProber::new()
            .with_video("a_good.mp4", "h264", 60.0)
            .with_broken("b_no_duration.mp4", "無法取得有效的影片長度")
            .with_video("c_good.mov", "hevc", 12.0),
        CountingDecoder::new(),
        true,
    );

    let tally = generator.run_all(&input, &output_dir).unwrap();

    assert_eq!(tally.total, 3);
    assert_eq!(tally.succeeded, 2);
    assert_eq!(tally.failed, 1);
    assert_eq!(tally.failed_paths, vec![input.join("b_no_duration.mp4")]);

    // 輸出平放在目的資料夾
    assert!(output_dir.join("a_good.jpg").exists());
    assert!(output_dir.join("c_good.jpg").exists());
    assert!(!output_dir.join("b_no_duration.jpg").exists());
    assert!(!output_dir.join("deeper").exists());
}

/// 測試 3: 不支援的編碼是軟性跳過，不會呼叫解碼器
#[test]
fn test_unsupported_codec_skips_without_decoding() {
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("clip.webm");
    touch(&video);
    let output_dir = dir.path().join("out");

    let decoder = CountingDecoder::new();
    let calls = Rc::clone(&decoder.calls);
    let generator = generator(
        FakeProber::new().with_video("clip.webm", "vp9", 30.0),
        decoder,
        true,
    );

    let err = generator.process_video(&video, &output_dir).unwrap_err();
    assert!(matches!(err, SheetError::SampleExhaustion { .. }));
    assert!(!generator.run_one(&video, &output_dir));
    assert!(!output_dir.join("clip.jpg").exists());
    assert_eq!(calls.get(), 0);
}

/// 測試 4: 所有時間點解碼失敗時該影片失敗
#[test]
fn test_all_decodes_failing_marks_file_failed() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    touch(&input.join("broken.mp4"));
    touch(&input.join("fine.mp4"));

    let generator = generator(
        FakeProber::new()
            .with_video("broken.mp4", "h264", 20.0)
            .with_video("fine.mp4", "h264", 20.0),
        CountingDecoder::new().failing_on("broken.mp4"),
        true,
    );

    let tally = generator.run_all(&input, &dir.path().join("out")).unwrap();
    assert_eq!(
        tally,
        BatchTally {
            total: 2,
            succeeded: 1,
            failed: 1,
            failed_paths: vec![input.join("broken.mp4")],
        }
    );
}

/// 測試 5: 沒有硬體解碼器時在處理任何檔案前就停止
#[test]
fn test_missing_accelerated_decoder_aborts_before_processing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    touch(&input.join("clip.mp4"));
    let output_dir = dir.path().join("out");

    let decoder = CountingDecoder::new();
    let calls = Rc::clone(&decoder.calls);
    let generator = generator(
        FakeProber::new().with_video("clip.mp4", "h264", 10.0),
        decoder,
        false,
    );

    let err = generator.run_all(&input, &output_dir).unwrap_err();
    assert!(matches!(err, SheetError::NoAcceleratedDecoder));

    let err = generator.run(&input.join("clip.mp4"), &output_dir).unwrap_err();
    assert!(matches!(err, SheetError::NoAcceleratedDecoder));
    assert!(!output_dir.exists());
    assert_eq!(calls.get(), 0);
}

/// 測試 6: 中斷旗標在檔案之間終止整批
#[test]
fn test_interrupt_aborts_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    touch(&input.join("a.mp4"));
    touch(&input.join("b.mp4"));
    let output_dir = dir.path().join("out");

    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let generator = ContactSheetGenerator::with_collaborators(
        SheetSettings::default(),
        FakeProber::new()
            .with_video("a.mp4", "h264", 10.0)
            .with_video("b.mp4", "h264", 10.0),
        CountingDecoder::new(),
        true,
        Arc::clone(&shutdown_signal),
    );

    shutdown_signal.store(true, Ordering::SeqCst);
    let err = generator.run_all(&input, &output_dir).unwrap_err();
    assert!(matches!(err, SheetError::Interrupted));
    assert!(err.is_batch_fatal());
    assert!(!output_dir.join("a.jpg").exists());
}

/// 測試 7: 單一檔案輸入不受副檔名限制
#[test]
fn test_run_with_single_file_input() {
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("recording.ts");
    touch(&video);
    let output_dir = dir.path().join("out");

    let generator = generator(
        FakeProber::new().with_video("recording.ts", "h264", 45.0),
        CountingDecoder::new(),
        true,
    );

    let tally = generator.run(&video, &output_dir).unwrap();
    assert_eq!(tally.total, 1);
    assert_eq!(tally.succeeded, 1);
    assert!(output_dir.join("recording.jpg").exists());
}

/// 測試 8: 空資料夾
#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(FakeProber::new(), CountingDecoder::new(), true);

    let tally = generator.run_all(dir.path(), &dir.path().join("out")).unwrap();
    assert_eq!(tally, BatchTally::default());
}

/// 測試 9: 依設定的畫面數解碼
#[test]
fn test_frame_count_setting_controls_decodes() {
    let dir = tempfile::tempdir().unwrap();
    let video: PathBuf = dir.path().join("clip.mp4");
    touch(&video);

    let mut settings = SheetSettings::default();
    settings.frame_count = 9;
    let decoder = CountingDecoder::new();
    let calls = Rc::clone(&decoder.calls);
    let generator = ContactSheetGenerator::with_collaborators(
        settings,
        FakeProber::new().with_video("clip.mp4", "hevc", 100.0),
        decoder,
        true,
        Arc::new(AtomicBool::new(false)),
    );

    assert!(generator.run_one(&video, &dir.path().join("out")));
    assert_eq!(generator.settings().frame_count, 9);
    assert_eq!(calls.get(), 9);
}

/// 測試 10: 處理中途收到中斷，不寫出不完整的預覽圖且不再處理下一部
#[test]
fn test_interrupt_during_file_stops_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    touch(&input.join("a.mp4"));
    touch(&input.join("b.mp4"));
    let output_dir = dir.path().join("out");

    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let prober = FakeProber::new()
        .with_video("a.mp4", "h264", 10.0)
        .with_video("b.mp4", "h264", 10.0);
    let probed = Rc::clone(&prober.probed);
    let generator = ContactSheetGenerator::with_collaborators(
        SheetSettings::default(),
        prober,
        InterruptingDecoder {
            shutdown_signal: Arc::clone(&shutdown_signal),
        },
        true,
        Arc::clone(&shutdown_signal),
    );

    let err = generator.run_all(&input, &output_dir).unwrap_err();
    assert!(matches!(err, SheetError::Interrupted));
    assert_eq!(*probed.borrow(), vec!["a.mp4".to_string()]);
    assert!(!output_dir.join("a.jpg").exists());
    assert!(!output_dir.join("b.jpg").exists());
}

/// 測試 11: 唯一的影片處理中收到中斷，即使畫面已擷取完成也不算成功
#[test]
fn test_interrupt_during_single_file_run() {
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("only.mp4");
    touch(&video);
    let output_dir = dir.path().join("out");

    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let generator = ContactSheetGenerator::with_collaborators(
        SheetSettings::default(),
        FakeProber::new().with_video("only.mp4", "h264", 10.0),
        InterruptingDecoder {
            shutdown_signal: Arc::clone(&shutdown_signal),
        },
        true,
        Arc::clone(&shutdown_signal),
    );

    let err = generator.run(&video, &output_dir).unwrap_err();
    assert!(matches!(err, SheetError::Interrupted));
    assert!(!output_dir.join("only.jpg").exists());

    // 資料夾中唯一的影片：迴圈結束後仍要回報中斷
    shutdown_signal.store(false, Ordering::SeqCst);
    let err = generator.run_all(dir.path(), &output_dir).unwrap_err();
    assert!(matches!(err, SheetError::Interrupted));
}

/// 測試 12: 畫面擷取成功後才收到中斷，預覽圖不寫出
#[test]
fn test_interrupt_after_decoding_skips_save() {
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("clip.mp4");
    touch(&video);
    let output_dir = dir.path().join("out");

    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let generator = ContactSheetGenerator::with_collaborators(
        SheetSettings::default(),
        FakeProber::new().with_video("clip.mp4", "h264", 10.0),
        CountingDecoder::new(),
        true,
        Arc::clone(&shutdown_signal),
    );

    // 第一次正常完成
    assert!(generator.run_one(&video, &output_dir));
    fs::remove_file(output_dir.join("clip.jpg")).unwrap();

    shutdown_signal.store(true, Ordering::SeqCst);
    let err = generator.process_video(&video, &output_dir).unwrap_err();
    assert!(matches!(err, SheetError::Interrupted));
    assert!(!output_dir.join("clip.jpg").exists());
}
