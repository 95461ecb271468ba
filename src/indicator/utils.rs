/// 공통 이동평균 계산 함수들
pub mod moving_average {
    /// 단순이동평균(SMA) 계산 - 공통 유틸리티 함수
    ///
    /// 데이터가 period 보다 짧으면 있는 값들의 평균을 반환합니다.
    ///
    /// # Arguments
    /// * `values` - 가격 데이터 배열
    /// * `period` - 계산 기간
    ///
    /// # Returns
    /// * `f64` - 계산된 SMA 값 (데이터가 없거나 period가 0이면 0.0 반환)
    pub fn calculate_sma(values: &[f64], period: usize) -> f64 {
        if values.is_empty() || period == 0 {
            return 0.0;
        }

        if values.len() >= period {
            let start_idx = values.len() - period;
            let slice = &values[start_idx..];
            slice.iter().sum::<f64>() / period as f64
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    /// 지수이동평균(EMA) 계산을 위한 알파값 계산
    ///
    /// # Arguments
    /// * `period` - EMA 기간 (span)
    ///
    /// # Returns
    /// * `f64` - 알파값 (평활화 계수, 2 / (span + 1))
    pub fn calculate_ema_alpha(period: usize) -> f64 {
        2.0 / (period + 1) as f64
    }

    /// 지수이동평균(EMA) 한 스텝 계산
    pub fn calculate_ema_step(current_price: f64, previous_ema: f64, alpha: f64) -> f64 {
        alpha * current_price + (1.0 - alpha) * previous_ema
    }

    /// 모표준편차 계산 (마지막 period 개 값 기준)
    ///
    /// 데이터가 period 보다 짧으면 0.0 을 반환합니다.
    pub fn calculate_standard_deviation(values: &[f64], period: usize) -> f64 {
        if period == 0 || values.len() < period {
            return 0.0;
        }

        let slice = &values[values.len() - period..];
        let mean = slice.iter().sum::<f64>() / period as f64;
        let variance = slice
            .iter()
            .map(|&x| {
                let diff = x - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;

        variance.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::moving_average::*;

    #[test]
    fn test_calculate_sma_partial_window() {
        assert_eq!(calculate_sma(&[1.0, 2.0, 3.0, 4.0], 2), 3.5);
        assert_eq!(calculate_sma(&[1.0, 2.0], 5), 1.5);
        assert_eq!(calculate_sma(&[], 5), 0.0);
    }

    #[test]
    fn test_ema_alpha_and_step() {
        let alpha = calculate_ema_alpha(3);
        assert!((alpha - 0.5).abs() < 1e-12);
        assert!((calculate_ema_step(12.0, 10.0, alpha) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_deviation() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((calculate_standard_deviation(&values, 8) - 2.0).abs() < 1e-12);
        assert_eq!(calculate_standard_deviation(&values[..2], 5), 0.0);
    }
}
