use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 使用者中斷時的結束狀態
pub const INTERRUPT_EXIT_CODE: u8 = 130;

/// 設定 Ctrl-C 處理器
///
/// 第一次中斷只設定旗標，目前的影片處理完後停止批次；
/// 再按一次則立即結束程式。
pub fn setup_shutdown_signal() -> Result<Arc<AtomicBool>> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    ctrlc::set_handler(move || {
        if signal_clone.swap(true, Ordering::SeqCst) {
            eprintln!("\n再次收到中斷信號，立即結束");
            std::process::exit(i32::from(INTERRUPT_EXIT_CODE));
        }
        eprintln!("\n收到中斷信號，目前的影片處理完後停止（再按一次立即結束）...");
    })
    .context("無法設定 Ctrl-C 處理器")?;

    Ok(shutdown_signal)
}
