use crate::indicator::utils::moving_average;
use crate::model::Candle;
use std::fmt::{Debug, Display};
use std::marker::PhantomData;

/// 볼린저 밴드 시리즈 계산
///
/// 창이 채워지기 전에는 상단/중간/하단 모두 해당 가격을 반환합니다.
///
/// # Returns
/// * `(upper, middle, lower)` - 입력과 같은 길이의 세 시리즈
pub fn bollinger_series(
    values: &[f64],
    period: usize,
    multiplier: f64,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let period = period.max(1);
    let mut upper = Vec::with_capacity(values.len());
    let mut middle = Vec::with_capacity(values.len());
    let mut lower = Vec::with_capacity(values.len());

    for (i, &price) in values.iter().enumerate() {
        if i + 1 < period {
            upper.push(price);
            middle.push(price);
            lower.push(price);
            continue;
        }

        let window = &values[i + 1 - period..=i];
        let mean = moving_average::calculate_sma(window, period);
        let std_dev = moving_average::calculate_standard_deviation(window, period);

        if !mean.is_finite() || !std_dev.is_finite() {
            upper.push(price);
            middle.push(price);
            lower.push(price);
            continue;
        }

        upper.push(mean + std_dev * multiplier);
        middle.push(mean);
        lower.push(mean - std_dev * multiplier);
    }

    (upper, middle, lower)
}

/// 볼린저 밴드 시리즈
#[derive(Clone, Debug)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
    /// 계산 기간
    period: usize,
    /// 표준편차 승수
    multiplier: f64,
}

impl BollingerBands {
    /// 종가 시리즈로 볼린저 밴드 계산
    pub fn compute(closes: &[f64], period: usize, multiplier: f64) -> BollingerBands {
        let (upper, middle, lower) = bollinger_series(closes, period, multiplier);
        BollingerBands {
            upper,
            middle,
            lower,
            period,
            multiplier,
        }
    }

    /// 계산 기간
    pub fn period(&self) -> usize {
        self.period
    }

    /// 표준편차 승수
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// 특정 인덱스의 밴드폭 ((상단 - 하단) / 중간)
    pub fn bandwidth(&self, index: usize) -> f64 {
        match (self.upper.get(index), self.middle.get(index), self.lower.get(index)) {
            (Some(u), Some(m), Some(l)) if m.abs() >= f64::EPSILON => (u - l) / m,
            _ => 0.0,
        }
    }
}

impl Display for BollingerBands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.middle.last(), self.upper.last(), self.lower.last()) {
            (Some(m), Some(u), Some(l)) => write!(
                f,
                "BB({},{}: {:.2}, {:.2}, {:.2})",
                self.period, self.multiplier, m, u, l
            ),
            _ => write!(f, "BB({},{}: 데이터 없음)", self.period, self.multiplier),
        }
    }
}

/// 볼린저 밴드 계산 빌더
#[derive(Debug)]
pub struct BollingerBandsBuilder<C: Candle> {
    period: usize,
    multiplier: f64,
    _phantom: PhantomData<C>,
}

impl<C> BollingerBandsBuilder<C>
where
    C: Candle,
{
    /// 새 볼린저 밴드 빌더 생성
    ///
    /// # Panics
    /// * 유효하지 않은 매개변수가 제공되면 패닉 발생
    pub fn new(period: usize, multiplier: f64) -> Self {
        if period == 0 {
            panic!("볼린저 밴드 기간은 0보다 커야 합니다");
        }

        if multiplier <= 0.0 {
            panic!("볼린저 밴드 승수는 0보다 커야 합니다");
        }

        Self {
            period,
            multiplier,
            _phantom: PhantomData,
        }
    }

    /// 봉 데이터의 종가로 볼린저 밴드 생성
    pub fn build(&self, data: &[C]) -> BollingerBands {
        let closes: Vec<f64> = data.iter().map(|c| c.close_price()).collect();
        BollingerBands::compute(&closes, self.period, self.multiplier)
    }
}
