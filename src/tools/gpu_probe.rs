use log::debug;
use std::process::{Command, Stdio};

/// 檢查是否有可用的 NVIDIA 硬體解碼器
///
/// 以 `nvidia-smi` 的結束狀態判斷，執行失敗視為不可用。
#[must_use]
pub fn has_accelerated_decoder() -> bool {
    match Command::new("nvidia-smi")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) => {
            debug!("nvidia-smi 結束狀態: {status}");
            status.success()
        }
        Err(e) => {
            debug!("無法執行 nvidia-smi: {e}");
            false
        }
    }
}
