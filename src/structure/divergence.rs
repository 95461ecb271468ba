use crate::model::Candle;
use serde::Serialize;
use std::fmt::Display;

/// 다이버전스 비교 구간 기본값
pub const DEFAULT_LOOKBACK: usize = 30;

/// 다이버전스 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DivergenceKind {
    /// 가격은 신고점이지만 모멘텀이 확인해 주지 않음
    Top,
    /// 가격은 신저점이지만 모멘텀이 확인해 주지 않음
    Bottom,
}

impl Display for DivergenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DivergenceKind::Top => write!(f, "top"),
            DivergenceKind::Bottom => write!(f, "bottom"),
        }
    }
}

/// 다이버전스 이벤트
///
/// 비교에 사용한 기준점(구간 극값)과 현재 봉의 가격/오실레이터 쌍을 함께 담아
/// 가격 차트와 오실레이터 차트에 연결선을 그릴 수 있게 합니다.
/// 저장하지 않고 요청마다 새로 계산합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivergenceEvent {
    pub kind: DivergenceKind,
    pub reference_index: usize,
    pub reference_price: f64,
    pub reference_oscillator: f64,
    pub current_index: usize,
    pub current_price: f64,
    pub current_oscillator: f64,
}

/// 인덱스 `index` 에서의 MACD 히스토그램 다이버전스 검출
///
/// 비교 구간은 `[index - lookback, index)` 이며 구간 안 극값은 처음 나온 위치를 씁니다.
/// 바닥 다이버전스를 먼저 확인합니다.
///
/// # Arguments
/// * `bars` - 원본 봉 시퀀스
/// * `hist` - `bars` 와 정렬된 MACD 히스토그램
/// * `index` - 검사할 봉 인덱스
/// * `lookback` - 비교 구간 길이
///
/// # Returns
/// * `Option<DivergenceEvent>` - 데이터가 부족하거나 조건을 만족하지 않으면 None
pub fn detect_divergence<C: Candle>(
    bars: &[C],
    hist: &[f64],
    index: usize,
    lookback: usize,
) -> Option<DivergenceEvent> {
    if lookback == 0 || index < lookback || index >= bars.len() || index >= hist.len() {
        return None;
    }

    let window = index - lookback..index;
    let current = &bars[index];
    let osc = hist[index];

    let lowest = window.clone().reduce(|best, j| {
        if bars[j].low_price() < bars[best].low_price() {
            j
        } else {
            best
        }
    })?;
    let lowest_price = bars[lowest].low_price();
    if current.low_price() < lowest_price && osc < 0.0 && osc > hist[lowest] {
        return Some(DivergenceEvent {
            kind: DivergenceKind::Bottom,
            reference_index: lowest,
            reference_price: lowest_price,
            reference_oscillator: hist[lowest],
            current_index: index,
            current_price: current.low_price(),
            current_oscillator: osc,
        });
    }

    let highest = window.reduce(|best, j| {
        if bars[j].high_price() > bars[best].high_price() {
            j
        } else {
            best
        }
    })?;
    let highest_price = bars[highest].high_price();
    if current.high_price() > highest_price && osc > 0.0 && osc < hist[highest] {
        return Some(DivergenceEvent {
            kind: DivergenceKind::Top,
            reference_index: highest,
            reference_price: highest_price,
            reference_oscillator: hist[highest],
            current_index: index,
            current_price: current.high_price(),
            current_oscillator: osc,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcCandle;
    use chrono::{TimeZone, Utc};

    fn bars_from_lows_highs(lows: &[f64], highs: &[f64]) -> Vec<OhlcCandle> {
        lows.iter()
            .zip(highs)
            .enumerate()
            .map(|(i, (&low, &high))| {
                let mid = (low + high) / 2.0;
                OhlcCandle::new(Utc.timestamp_opt(i as i64 * 86_400, 0).unwrap(), mid, high, low, mid)
            })
            .collect()
    }

    /// 하락 후 마지막 봉에서 신저점을 만드는 시퀀스
    fn falling_bars() -> Vec<OhlcCandle> {
        let lows = [10.0, 9.0, 8.0, 8.5, 7.5];
        let highs: Vec<f64> = lows.iter().map(|l| l + 1.0).collect();
        bars_from_lows_highs(&lows, &highs)
    }

    #[test]
    fn test_bottom_divergence() {
        let bars = falling_bars();
        let hist = [-0.5, -1.0, -2.0, -1.5, -0.8];
        let event = detect_divergence(&bars, &hist, 4, 4).unwrap();
        assert_eq!(event.kind, DivergenceKind::Bottom);
        assert_eq!(event.reference_index, 2);
        assert_eq!(event.reference_price, 8.0);
        assert_eq!(event.reference_oscillator, -2.0);
        assert_eq!(event.current_price, 7.5);
        assert_eq!(event.current_oscillator, -0.8);
    }

    #[test]
    fn test_histogram_confirming_new_low() {
        // 히스토그램이 더 낮아지면 모멘텀이 신저점을 확인한 것
        let bars = falling_bars();
        let hist = [-0.5, -1.0, -2.0, -2.5, -3.0];
        assert_eq!(detect_divergence(&bars, &hist, 4, 4), None);
    }

    #[test]
    fn test_rising_histogram_above_zero() {
        // 히스토그램이 0 이상으로 올라서면 바닥 다이버전스 조건(hist < 0)을 만족하지 않음
        let bars = falling_bars();
        let hist = [-2.0, -1.5, -1.0, -0.5, 0.0];
        assert_eq!(detect_divergence(&bars, &hist, 4, 4), None);
    }

    #[test]
    fn test_top_divergence() {
        let highs = [10.0, 11.0, 12.0, 11.5, 12.5];
        let lows: Vec<f64> = highs.iter().map(|h| h - 1.0).collect();
        let bars = bars_from_lows_highs(&lows, &highs);
        let hist = [0.5, 1.0, 2.0, 1.5, 0.8];
        let event = detect_divergence(&bars, &hist, 4, 4).unwrap();
        assert_eq!(event.kind, DivergenceKind::Top);
        assert_eq!(event.reference_index, 2);
        assert_eq!(event.current_price, 12.5);
    }

    #[test]
    fn test_mirror_swaps_kind() {
        let bars = falling_bars();
        let hist = [-0.5, -1.0, -2.0, -1.5, -0.8];
        let mirrored: Vec<OhlcCandle> = bars
            .iter()
            .map(|b| OhlcCandle::new(b.datetime, -b.open, -b.low, -b.high, -b.close))
            .collect();
        let mirrored_hist: Vec<f64> = hist.iter().map(|h| -h).collect();

        let original = detect_divergence(&bars, &hist, 4, 4).unwrap();
        let flipped = detect_divergence(&mirrored, &mirrored_hist, 4, 4).unwrap();
        assert_eq!(original.kind, DivergenceKind::Bottom);
        assert_eq!(flipped.kind, DivergenceKind::Top);
        assert_eq!(original.reference_index, flipped.reference_index);
        assert_eq!(original.current_price, -flipped.current_price);
    }

    #[test]
    fn test_insufficient_history() {
        let bars = falling_bars();
        let hist = [-0.5, -1.0, -2.0, -1.5, -0.8];
        assert_eq!(detect_divergence(&bars, &hist, 3, 4), None);
        assert_eq!(detect_divergence(&bars, &hist[..3], 4, 4), None);
        assert_eq!(detect_divergence(&bars, &hist, 4, 0), None);
    }

    #[test]
    fn test_window_uses_first_extreme() {
        let lows = [8.0, 9.0, 8.0, 9.0, 7.0];
        let highs: Vec<f64> = lows.iter().map(|l| l + 1.0).collect();
        let bars = bars_from_lows_highs(&lows, &highs);
        let hist = [-3.0, -1.0, -2.0, -1.0, -0.5];
        let event = detect_divergence(&bars, &hist, 4, 4).unwrap();
        assert_eq!(event.reference_index, 0);
    }
}
