// 범용 수치 변환 지표 모듈
// 가격 시리즈를 같은 길이의 지표 시리즈로 변환합니다.
// 짧은 입력에 대해서는 예외 없이 중립값/항등값을 반환합니다.

pub mod bband;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod utils;

use crate::model::{Candle, Direction};
use bband::BollingerBands;
use macd::{MACDParams, MACDSeries};
use std::fmt::Display;

/// 볼린저 밴드 기본 기간
pub const DEFAULT_BBAND_PERIOD: usize = 20;
/// 볼린저 밴드 기본 표준편차 승수
pub const DEFAULT_BBAND_MULTIPLIER: f64 = 2.0;
/// RSI 기본 기간
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// 하나의 종가 시리즈에 대해 함께 계산한 지표 묶음
///
/// 타임프레임을 바꿀 때 지표 값을 리샘플링하지 않고 이 묶음을 새로 계산합니다.
#[derive(Clone, Debug)]
pub struct IndicatorSet {
    pub macd: MACDSeries,
    pub rsi: Vec<f64>,
    pub bbands: BollingerBands,
    /// 단기 이동평균 (기본 MA5)
    pub ma_short: Vec<f64>,
    /// 장기 이동평균 (기본 MA20)
    pub ma_long: Vec<f64>,
}

impl IndicatorSet {
    /// 종가 시리즈로 모든 지표 계산
    pub fn compute(
        closes: &[f64],
        macd_params: MACDParams,
        ma_short: usize,
        ma_long: usize,
    ) -> IndicatorSet {
        IndicatorSet {
            macd: MACDSeries::compute(closes, macd_params),
            rsi: rsi::rsi_series(closes, DEFAULT_RSI_PERIOD),
            bbands: BollingerBands::compute(
                closes,
                DEFAULT_BBAND_PERIOD,
                DEFAULT_BBAND_MULTIPLIER,
            ),
            ma_short: ma::sma_series(closes, ma_short),
            ma_long: ma::sma_series(closes, ma_long),
        }
    }

    /// 봉 데이터의 종가로 모든 지표 계산
    pub fn from_candles<C: Candle>(
        data: &[C],
        macd_params: MACDParams,
        ma_short: usize,
        ma_long: usize,
    ) -> IndicatorSet {
        let closes: Vec<f64> = data.iter().map(|c| c.close_price()).collect();
        Self::compute(&closes, macd_params, ma_short, ma_long)
    }

    /// 시리즈 길이
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    /// 시리즈가 비어 있는지 확인
    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }

    /// 특정 인덱스의 이동평균 추세 (단기 > 장기 이면 상승)
    pub fn trend_at(&self, index: usize) -> Option<Direction> {
        let short = self.ma_short.get(index)?;
        let long = self.ma_long.get(index)?;
        Some(ma::ma_trend(*short, *long))
    }
}

impl Display for IndicatorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IndicatorSet({}, {})", self.macd, self.bbands)
    }
}
