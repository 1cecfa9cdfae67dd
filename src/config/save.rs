use crate::config::types::SheetSettings;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn save_settings(settings: &SheetSettings, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

/// 將目前生效的設定輸出為 JSON
pub fn write_settings<W: Write>(settings: &SheetSettings, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, settings).context("Failed to serialize settings")?;
    writeln!(writer)?;
    Ok(())
}
