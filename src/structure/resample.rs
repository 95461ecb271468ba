use crate::config::AnalysisConfig;
use crate::indicator::IndicatorSet;
use crate::model::Candle;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 상위 타임프레임 봉
///
/// `start_index`/`end_index` 는 이 봉이 덮는 원본 시퀀스의 첫/마지막 인덱스입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResampledBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// 묶음 마지막 봉의 시각
    pub datetime: DateTime<Utc>,
    pub start_index: usize,
    pub end_index: usize,
}

impl ResampledBar {
    /// 원본 인덱스가 이 봉의 범위에 포함되는지 확인
    pub fn covers(&self, base_index: usize) -> bool {
        self.start_index <= base_index && base_index <= self.end_index
    }
}

impl Candle for ResampledBar {
    fn open_price(&self) -> f64 {
        self.open
    }

    fn high_price(&self) -> f64 {
        self.high
    }

    fn low_price(&self) -> f64 {
        self.low
    }

    fn close_price(&self) -> f64 {
        self.close
    }

    fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }
}

/// `period` 개씩 연속으로 묶어 상위 타임프레임 봉 생성
///
/// 마지막 묶음은 `period` 보다 짧을 수 있습니다. `period` 가 0 이면 빈 목록입니다.
pub fn resample<C: Candle>(bars: &[C], period: usize) -> Vec<ResampledBar> {
    if period == 0 {
        return Vec::new();
    }

    bars.chunks(period)
        .enumerate()
        .filter_map(|(n, chunk)| {
            let first = chunk.first()?;
            let last = chunk.last()?;
            let start_index = n * period;

            Some(ResampledBar {
                open: first.open_price(),
                high: chunk
                    .iter()
                    .map(|c| c.high_price())
                    .fold(f64::NEG_INFINITY, f64::max),
                low: chunk
                    .iter()
                    .map(|c| c.low_price())
                    .fold(f64::INFINITY, f64::min),
                close: last.close_price(),
                datetime: last.datetime(),
                start_index,
                end_index: start_index + chunk.len() - 1,
            })
        })
        .collect()
}

/// 상위 타임프레임 봉과 그 종가로 새로 계산한 지표 묶음
///
/// 지표 값은 리샘플링하지 않고 묶은 봉의 종가로 다시 계산합니다.
pub fn resample_with_indicators<C: Candle>(
    bars: &[C],
    period: usize,
    config: &AnalysisConfig,
) -> (Vec<ResampledBar>, IndicatorSet) {
    let resampled = resample(bars, period);
    let indicators =
        IndicatorSet::from_candles(&resampled, config.macd, config.ma_short, config.ma_long);
    (resampled, indicators)
}

/// 원본 인덱스를 포함하는 상위 타임프레임 봉의 위치 (처음 일치하는 봉)
pub fn locate(resampled: &[ResampledBar], base_index: usize) -> Option<usize> {
    resampled.iter().position(|bar| bar.covers(base_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcCandle;
    use chrono::TimeZone;

    fn bars(n: usize) -> Vec<OhlcCandle> {
        (0..n)
            .map(|i| {
                let base = 10.0 + i as f64;
                OhlcCandle::new(
                    Utc.timestamp_opt(i as i64 * 86_400, 0).unwrap(),
                    base,
                    base + 2.0,
                    base - 1.0,
                    base + 0.5,
                )
            })
            .collect()
    }

    #[test]
    fn test_resample_aggregates_chunks() {
        let data = bars(12);
        let weekly = resample(&data, 5);
        assert_eq!(weekly.len(), 3);

        let first = &weekly[0];
        assert_eq!(first.open, 10.0);
        assert_eq!(first.close, 14.5);
        assert_eq!(first.high, 16.0);
        assert_eq!(first.low, 9.0);
        assert_eq!((first.start_index, first.end_index), (0, 4));
        assert_eq!(first.datetime, data[4].datetime);

        // 마지막 묶음은 짧음
        assert_eq!((weekly[2].start_index, weekly[2].end_index), (10, 11));
    }

    #[test]
    fn test_every_index_covered_once() {
        let data = bars(23);
        let monthly = resample(&data, 7);
        for k in 0..data.len() {
            assert_eq!(monthly.iter().filter(|b| b.covers(k)).count(), 1);
        }
        assert_eq!(locate(&monthly, 6), Some(0));
        assert_eq!(locate(&monthly, 7), Some(1));
        assert_eq!(locate(&monthly, 22), Some(3));
        assert_eq!(locate(&monthly, 23), None);
    }

    #[test]
    fn test_zero_period_and_empty_input() {
        assert!(resample(&bars(5), 0).is_empty());
        assert!(resample::<OhlcCandle>(&[], 5).is_empty());
    }

    #[test]
    fn test_indicators_recomputed_on_resampled_closes() {
        let data = bars(30);
        let (weekly, indicators) = resample_with_indicators(&data, 5, &AnalysisConfig::default());
        assert_eq!(weekly.len(), 6);
        assert_eq!(indicators.len(), 6);
        // 첫 값은 묶은 봉 종가로 시드된 EMA 차이이므로 0
        assert_eq!(indicators.macd.dif[0], 0.0);
    }
}
