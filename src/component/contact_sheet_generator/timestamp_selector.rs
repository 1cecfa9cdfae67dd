/// 在影片長度內均勻選取 `count` 個時間點
///
/// 第 i 個時間點為 `duration × (i+1) / (count+1)`，
/// 排除頭尾 (t=0 與 t=duration)，避開黑場與不完整的畫面。
#[must_use]
pub fn select_timestamps(duration: f64, count: usize) -> Vec<f64> {
    if count == 0 || duration.is_nan() || duration <= 0.0 {
        return Vec::new();
    }

    let slots = (count + 1) as f64;
    (0..count)
        .map(|i| duration * (i + 1) as f64 / slots)
        .collect()
}
