use crate::indicator::utils::moving_average;
use crate::model::Candle;
use std::fmt::Display;
use std::marker::PhantomData;

/// 지수이동평균 시리즈 계산
///
/// 첫 값을 시드로 사용하고 평활화 계수는 `2 / (span + 1)` 입니다.
/// 입력과 같은 길이의 시리즈를 반환하며, 빈 입력은 빈 시리즈를 반환합니다.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&seed) = values.first() else {
        return Vec::new();
    };

    let alpha = moving_average::calculate_ema_alpha(span.max(1));
    let mut result = Vec::with_capacity(values.len());
    let mut ema = seed;
    result.push(ema);

    for &price in &values[1..] {
        ema = moving_average::calculate_ema_step(price, ema, alpha);
        result.push(ema);
    }

    result
}

/// 지수이동평균(EMA) 계산 빌더
#[derive(Debug)]
pub struct EMABuilder<C: Candle> {
    /// EMA 계산 기간
    pub period: usize,
    _phantom: PhantomData<C>,
}

/// 지수이동평균(EMA) 시리즈
#[derive(Clone, Debug)]
pub struct EMA {
    /// EMA 계산 기간
    period: usize,
    /// 봉마다 계산된 EMA 값
    pub values: Vec<f64>,
}

impl EMA {
    /// 계산 기간
    pub fn period(&self) -> usize {
        self.period
    }

    /// 마지막 EMA 값 (데이터가 없으면 0.0)
    pub fn last(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }
}

impl Display for EMA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}: {:.2})", self.period, self.last())
    }
}

impl<C> EMABuilder<C>
where
    C: Candle,
{
    /// 새 EMA 빌더 생성
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("EMA 기간은 0보다 커야 합니다");
        }

        EMABuilder {
            period,
            _phantom: PhantomData,
        }
    }

    /// 봉 데이터의 종가로 EMA 시리즈 생성
    pub fn build(&self, data: &[C]) -> EMA {
        let closes: Vec<f64> = data.iter().map(|c| c.close_price()).collect();
        EMA {
            period: self.period,
            values: ema_series(&closes, self.period),
        }
    }
}
