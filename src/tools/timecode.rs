/// 格式化為 `HH:MM:SS`（捨去小數）
#[must_use]
pub fn format_timecode(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// 格式化為 `MM:SS`，分鐘數可超過 59
#[must_use]
pub fn format_duration_minutes(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// 位元組轉 MiB，保留兩位小數
#[must_use]
pub fn format_size_mib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0 / 1024.0)
}
