use crate::model::{Candle, FractalKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 분형(分型)
///
/// `index` 는 포함 관계 처리된 봉 시퀀스 기준입니다.
/// 가격은 천정 분형이면 가운데 봉의 고가, 바닥 분형이면 저가입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fractal {
    pub index: usize,
    pub kind: FractalKind,
    pub price: f64,
    pub datetime: DateTime<Utc>,
}

impl Fractal {
    /// 같은 종류의 다른 분형보다 더 극단적인지 (천정은 더 높고, 바닥은 더 낮음)
    pub fn is_more_extreme_than(&self, other: &Fractal) -> bool {
        match self.kind {
            FractalKind::Top => self.price > other.price,
            FractalKind::Bottom => self.price < other.price,
        }
    }
}

/// 세 봉 창 (i-1, i, i+1) 에 대한 분형 판정
///
/// 천정 조건을 먼저 확인합니다. 두 조건 모두 아니면 None 입니다.
pub fn classify<C: Candle>(prev: &C, curr: &C, next: &C) -> Option<FractalKind> {
    if curr.high_price() > prev.high_price() && curr.high_price() > next.high_price() {
        Some(FractalKind::Top)
    } else if curr.low_price() < prev.low_price() && curr.low_price() < next.low_price() {
        Some(FractalKind::Bottom)
    } else {
        None
    }
}

/// 특정 인덱스(첫/마지막 제외)의 분형
pub fn fractal_at<C: Candle>(bars: &[C], index: usize) -> Option<Fractal> {
    if index == 0 || index + 1 >= bars.len() {
        return None;
    }

    let curr = &bars[index];
    let kind = classify(&bars[index - 1], curr, &bars[index + 1])?;
    let price = match kind {
        FractalKind::Top => curr.high_price(),
        FractalKind::Bottom => curr.low_price(),
    };

    Some(Fractal {
        index,
        kind,
        price,
        datetime: curr.datetime(),
    })
}

/// `index` 에서 끝나는 세 봉 창의 분형 (가운데 봉은 `index - 1`)
///
/// 현재 봉까지만 잘린 시퀀스에서 "지금 막 확정된" 분형을 확인할 때 사용합니다.
pub fn fractal_ending_at<C: Candle>(bars: &[C], index: usize) -> Option<Fractal> {
    fractal_at(bars, index.checked_sub(1)?)
}

/// 모든 내부 인덱스의 분형 검출
///
/// 봉이 3개 미만이면 빈 목록을 반환합니다.
pub fn detect_fractals<C: Candle>(bars: &[C]) -> Vec<Fractal> {
    (1..bars.len().saturating_sub(1))
        .filter_map(|i| fractal_at(bars, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcCandle;
    use chrono::TimeZone;

    fn ohlc(i: i64, open: f64, high: f64, low: f64, close: f64) -> OhlcCandle {
        OhlcCandle::new(Utc.timestamp_opt(i * 86_400, 0).unwrap(), open, high, low, close)
    }

    #[test]
    fn test_top_fractal_demo_bars() {
        let bars = vec![
            ohlc(0, 10.0, 12.0, 9.0, 11.0),
            ohlc(1, 11.0, 13.0, 10.0, 10.5),
            ohlc(2, 10.5, 11.5, 9.5, 10.0),
        ];
        let fractals = detect_fractals(&bars);
        assert_eq!(fractals.len(), 1);
        assert_eq!(fractals[0].index, 1);
        assert_eq!(fractals[0].kind, FractalKind::Top);
        assert_eq!(fractals[0].price, 13.0);
        assert_eq!(fractal_ending_at(&bars, 2), Some(fractals[0].clone()));
        assert_eq!(fractal_ending_at(&bars, 0), None);
    }

    #[test]
    fn test_bottom_fractal() {
        let bars = vec![
            ohlc(0, 11.0, 12.0, 10.0, 10.5),
            ohlc(1, 10.0, 11.0, 9.0, 9.5),
            ohlc(2, 9.5, 11.5, 9.8, 11.0),
        ];
        let fractal = fractal_at(&bars, 1).unwrap();
        assert_eq!(fractal.kind, FractalKind::Bottom);
        assert_eq!(fractal.price, 9.0);
    }

    #[test]
    fn test_top_checked_before_bottom() {
        // 가운데 봉이 양쪽보다 고가는 높고 저가는 낮은 (정규화되지 않은) 경우
        let bars = vec![
            ohlc(0, 10.0, 11.0, 9.0, 10.0),
            ohlc(1, 10.0, 12.0, 8.0, 10.0),
            ohlc(2, 10.0, 11.0, 9.0, 10.0),
        ];
        assert_eq!(fractal_at(&bars, 1).map(|f| f.kind), Some(FractalKind::Top));
    }

    #[test]
    fn test_insufficient_bars() {
        let bars = vec![ohlc(0, 10.0, 11.0, 9.0, 10.0), ohlc(1, 10.0, 12.0, 8.0, 10.0)];
        assert!(detect_fractals(&bars).is_empty());
        assert!(fractal_at(&bars, 0).is_none());
        assert!(detect_fractals::<OhlcCandle>(&[]).is_empty());
    }
}
