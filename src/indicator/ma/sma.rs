use crate::indicator::utils::moving_average;
use crate::model::Candle;
use std::fmt::Display;
use std::marker::PhantomData;

/// 단순이동평균 시리즈 계산
///
/// 창이 채워지기 전에는 그때까지의 값들의 평균을 사용합니다.
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| moving_average::calculate_sma(&values[..=i], period))
        .collect()
}

/// 단순이동평균(SMA) 계산 빌더
#[derive(Debug)]
pub struct SMABuilder<C: Candle> {
    /// SMA 계산 기간
    pub period: usize,
    _phantom: PhantomData<C>,
}

/// 단순이동평균(SMA) 시리즈
#[derive(Clone, Debug)]
pub struct SMA {
    period: usize,
    pub values: Vec<f64>,
}

impl SMA {
    /// 계산 기간
    pub fn period(&self) -> usize {
        self.period
    }

    /// 마지막 SMA 값 (데이터가 없으면 0.0)
    pub fn last(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }
}

impl Display for SMA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}: {:.2})", self.period, self.last())
    }
}

impl<C> SMABuilder<C>
where
    C: Candle,
{
    /// 새 SMA 빌더 생성
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("SMA 기간은 0보다 커야 합니다");
        }

        SMABuilder {
            period,
            _phantom: PhantomData,
        }
    }

    /// 봉 데이터의 종가로 SMA 시리즈 생성
    pub fn build(&self, data: &[C]) -> SMA {
        let closes: Vec<f64> = data.iter().map(|c| c.close_price()).collect();
        SMA {
            period: self.period,
            values: sma_series(&closes, self.period),
        }
    }
}
