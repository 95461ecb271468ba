use crate::model::Candle;
use std::fmt::Display;
use std::marker::PhantomData;

/// 창이 채워지기 전 사용하는 중립 RSI 값
pub const NEUTRAL_RSI: f64 = 50.0;

/// Wilder 방식 RSI 시리즈 계산
///
/// 상승폭/하락폭을 `1 / period` 계수의 지수평균으로 평활화합니다.
/// 인덱스가 period 보다 작은 구간은 NaN 대신 50.0 을 반환합니다.
pub fn rsi_series(values: &[f64], period: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let period = period.max(1);
    let smoothing_factor = 1.0 / period as f64;
    let mut result = Vec::with_capacity(values.len());
    result.push(NEUTRAL_RSI);

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..values.len() {
        let change = values[i] - values[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i == 1 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = avg_gain * (1.0 - smoothing_factor) + gain * smoothing_factor;
            avg_loss = avg_loss * (1.0 - smoothing_factor) + loss * smoothing_factor;
        }

        if i < period {
            result.push(NEUTRAL_RSI);
            continue;
        }

        let rsi = if avg_loss < 0.000001 {
            if avg_gain < 0.000001 { NEUTRAL_RSI } else { 100.0 }
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        };
        result.push(rsi);
    }

    result
}

/// 상대강도지수(RSI) 빌더
#[derive(Debug)]
pub struct RSIBuilder<C: Candle> {
    period: usize,
    _phantom: PhantomData<C>,
}

/// 상대강도지수(RSI) 시리즈
#[derive(Clone, Debug)]
pub struct RSI {
    period: usize,
    /// 봉마다 계산된 RSI (0-100)
    pub values: Vec<f64>,
}

impl Display for RSI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}: {:.2})", self.period, self.last())
    }
}

impl RSI {
    /// 마지막 RSI 값 (데이터가 없으면 50.0)
    pub fn last(&self) -> f64 {
        self.values.last().copied().unwrap_or(NEUTRAL_RSI)
    }

    /// 마지막 RSI 가 과매수 상태인지 확인 (기본 70 이상)
    pub fn is_overbought(&self, threshold: Option<f64>) -> bool {
        self.last() >= threshold.unwrap_or(70.0)
    }

    /// 마지막 RSI 가 과매도 상태인지 확인 (기본 30 이하)
    pub fn is_oversold(&self, threshold: Option<f64>) -> bool {
        self.last() <= threshold.unwrap_or(30.0)
    }

    /// RSI 기간
    pub fn period(&self) -> usize {
        self.period
    }
}

impl<C> RSIBuilder<C>
where
    C: Candle,
{
    /// 새 RSI 빌더 생성
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("RSI 기간은 0보다 커야 합니다");
        }

        Self {
            period,
            _phantom: PhantomData,
        }
    }

    /// 봉 데이터의 종가로 RSI 시리즈 생성
    pub fn build(&self, data: &[C]) -> RSI {
        let closes: Vec<f64> = data.iter().map(|c| c.close_price()).collect();
        RSI {
            period: self.period,
            values: rsi_series(&closes, self.period),
        }
    }
}
