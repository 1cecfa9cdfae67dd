use std::path::{Path, PathBuf};
use std::process::Command;

/// 以 CUDA 硬體解碼擷取單一畫面的 ffmpeg 命令
///
/// 畫面以 MJPEG 寫到 stdout，不落地暫存檔。
pub struct GpuFrameCommand {
    source_path: PathBuf,
    timestamp: f64,
    hw_decoder: String,
}

impl GpuFrameCommand {
    #[must_use]
    pub fn new(source_path: &Path, timestamp: f64, hw_decoder: &str) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            timestamp,
            hw_decoder: hw_decoder.to_string(),
        }
    }

    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "-hide_banner",
            "-nostdin",
            "-loglevel", "error",
            "-hwaccel", "cuda",
            "-c:v", self.hw_decoder.as_str(),
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        // -ss 在 -i 前：直接跳到最近的關鍵幀再解碼
        args.push("-ss".to_string());
        args.push(format!("{:.3}", self.timestamp));
        args.push("-i".to_string());
        args.push(self.source_path.to_string_lossy().to_string());

        args.extend(
            [
                "-frames:v", "1",
                "-an", "-sn", "-dn",
                "-f", "image2pipe",
                "-c:v", "mjpeg",
                "-q:v", "2",
                "pipe:1",
            ]
            .iter()
            .map(ToString::to_string),
        );

        args
    }

    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(self.args());
        cmd
    }
}
