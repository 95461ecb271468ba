use crate::indicator::ma::ema_series;
use crate::model::Candle;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::marker::PhantomData;

/// MACD 매개변수를 정의하는 구조체
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MACDParams {
    /// 빠른 EMA 기간
    pub fast_period: usize,
    /// 느린 EMA 기간
    pub slow_period: usize,
    /// 시그널 라인 기간
    pub signal_period: usize,
}

impl Default for MACDParams {
    /// 표준 MACD(12, 26, 9)
    fn default() -> Self {
        MACDParams {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl MACDParams {
    /// 매개변수 유효성 검사
    pub fn validate(&self) -> Result<(), String> {
        if self.fast_period == 0 || self.slow_period == 0 || self.signal_period == 0 {
            return Err("MACD 기간은 0보다 커야 합니다".to_string());
        }

        if self.fast_period >= self.slow_period {
            return Err("빠른 기간은 느린 기간보다 작아야 합니다".to_string());
        }

        Ok(())
    }
}

impl Display for MACDParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({},{},{})",
            self.fast_period, self.slow_period, self.signal_period
        )
    }
}

/// MACD 세 시리즈 (DIF, DEA, HIST)
///
/// 세 시리즈는 입력 종가와 같은 길이로 정렬되어 있습니다.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MACDSeries {
    pub params: MACDParams,
    /// 빠른 EMA - 느린 EMA
    pub dif: Vec<f64>,
    /// DIF 의 EMA (시그널 라인)
    pub dea: Vec<f64>,
    /// (DIF - DEA) * 2
    pub hist: Vec<f64>,
}

impl MACDSeries {
    /// 종가 시리즈로 MACD 계산
    pub fn compute(closes: &[f64], params: MACDParams) -> MACDSeries {
        let fast = ema_series(closes, params.fast_period);
        let slow = ema_series(closes, params.slow_period);
        let dif: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let dea = ema_series(&dif, params.signal_period);
        let hist = dif.iter().zip(&dea).map(|(d, e)| (d - e) * 2.0).collect();

        MACDSeries {
            params,
            dif,
            dea,
            hist,
        }
    }

    /// 시리즈 길이
    pub fn len(&self) -> usize {
        self.hist.len()
    }

    /// 시리즈가 비어 있는지 확인
    pub fn is_empty(&self) -> bool {
        self.hist.is_empty()
    }

    /// 특정 인덱스의 히스토그램 값
    pub fn hist_at(&self, index: usize) -> Option<f64> {
        self.hist.get(index).copied()
    }
}

impl Display for MACDSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.dif.last(), self.dea.last(), self.hist.last()) {
            (Some(dif), Some(dea), Some(hist)) => write!(
                f,
                "{}: {:.2}, {:.2}, {:.2}",
                self.params, dif, dea, hist
            ),
            _ => write!(f, "{}: 데이터 없음", self.params),
        }
    }
}

/// 히스토그램 막대로 본 모멘텀 상태
///
/// 현재 막대를 직전 막대와 비교합니다. 0 이상은 상승 쪽 막대로 봅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    /// 0 위에서 막대가 길어짐
    BullishStrengthening,
    /// 0 위에서 막대가 짧아짐
    BullishFading,
    /// 0 아래에서 막대가 길어짐
    BearishStrengthening,
    /// 0 아래에서 막대가 짧아짐
    BearishFading,
}

impl Momentum {
    /// 직전/현재 히스토그램 값으로 모멘텀 분류
    pub fn classify(previous: f64, current: f64) -> Momentum {
        if current >= 0.0 {
            if current > previous {
                Momentum::BullishStrengthening
            } else {
                Momentum::BullishFading
            }
        } else if current < previous {
            Momentum::BearishStrengthening
        } else {
            Momentum::BearishFading
        }
    }

    /// 히스토그램 시리즈의 특정 인덱스 모멘텀 (직전 값이 없으면 None)
    pub fn at(hist: &[f64], index: usize) -> Option<Momentum> {
        let previous = hist.get(index.checked_sub(1)?)?;
        let current = hist.get(index)?;
        Some(Momentum::classify(*previous, *current))
    }

    /// 상승 쪽 막대인지
    pub fn is_bullish(&self) -> bool {
        matches!(self, Momentum::BullishStrengthening | Momentum::BullishFading)
    }

    /// 막대가 짧아지는 중인지
    pub fn is_fading(&self) -> bool {
        matches!(self, Momentum::BullishFading | Momentum::BearishFading)
    }
}

impl Display for Momentum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Momentum::BullishStrengthening => "0 위 막대 확대 (상승 모멘텀 강화)",
            Momentum::BullishFading => "0 위 막대 축소 (상승 모멘텀 둔화)",
            Momentum::BearishStrengthening => "0 아래 막대 확대 (하락 모멘텀 강화)",
            Momentum::BearishFading => "0 아래 막대 축소 (하락 모멘텀 둔화)",
        };
        write!(f, "{}", text)
    }
}

/// MACD(Moving Average Convergence Divergence) 계산을 위한 빌더
#[derive(Debug)]
pub struct MACDBuilder<C: Candle> {
    params: MACDParams,
    _phantom: PhantomData<C>,
}

impl<C> MACDBuilder<C>
where
    C: Candle,
{
    /// 새 MACD 빌더 생성
    ///
    /// # Panics
    /// * 유효하지 않은 기간이 제공되면 패닉 발생
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        let params = MACDParams {
            fast_period,
            slow_period,
            signal_period,
        };

        if let Err(msg) = params.validate() {
            panic!("{}", msg);
        }

        Self {
            params,
            _phantom: PhantomData,
        }
    }

    /// 매개변수 구조체로 빌더 생성
    pub fn from_params(params: MACDParams) -> Self {
        Self::new(params.fast_period, params.slow_period, params.signal_period)
    }

    /// 봉 데이터의 종가로 MACD 시리즈 생성
    pub fn build(&self, data: &[C]) -> MACDSeries {
        let closes: Vec<f64> = data.iter().map(|c| c.close_price()).collect();
        MACDSeries::compute(&closes, self.params)
    }
}
