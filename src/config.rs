use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use crate::indicator::macd::MACDParams;
use crate::structure::center::CenterSpan;
use serde::{Deserialize, Serialize};

/// 구조 분석 및 행동 평가 설정
///
/// 모든 필드는 기본값을 가지므로 설정 파일에는 바꾸려는 값만 적으면 됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 필(笔) 성립을 위한 반대 분형 간 최소 인덱스 차이
    pub stroke_min_separation: usize,
    /// 하이라이트 도형에서 분형을 잇는 선의 최소 인덱스 차이
    pub shape_min_separation: usize,
    /// 중추(中枢) 표시 구간
    pub center_span: CenterSpan,
    /// 일봉 다이버전스 비교 구간
    pub divergence_lookback: usize,
    /// 주봉/월봉 다이버전스 비교 구간
    pub level_divergence_lookback: usize,
    /// 단기 이동평균 기간
    pub ma_short: usize,
    /// 장기 이동평균 기간
    pub ma_long: usize,
    /// 주봉 하나에 묶을 일봉 수
    pub week_period: usize,
    /// 월봉 하나에 묶을 일봉 수
    pub month_period: usize,
    /// MACD 매개변수
    pub macd: MACDParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            stroke_min_separation: 4,
            shape_min_separation: 3,
            center_span: CenterSpan::Core,
            divergence_lookback: 30,
            level_divergence_lookback: 30,
            ma_short: 5,
            ma_long: 20,
            week_period: 5,
            month_period: 20,
            macd: MACDParams::default(),
        }
    }
}

impl ConfigValidation for AnalysisConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.stroke_min_separation == 0 || self.shape_min_separation == 0 {
            return Err(ConfigError::ValidationError(
                "분형 간 최소 간격은 0보다 커야 합니다".to_string(),
            ));
        }

        if self.divergence_lookback == 0 || self.level_divergence_lookback == 0 {
            return Err(ConfigError::ValidationError(
                "다이버전스 비교 구간은 0보다 커야 합니다".to_string(),
            ));
        }

        if self.ma_short == 0 || self.ma_short >= self.ma_long {
            return Err(ConfigError::ValidationError(format!(
                "단기 이동평균 기간({})은 0보다 크고 장기 기간({})보다 작아야 합니다",
                self.ma_short, self.ma_long
            )));
        }

        if self.week_period < 2 || self.month_period <= self.week_period {
            return Err(ConfigError::ValidationError(format!(
                "주봉({})/월봉({}) 묶음 크기가 올바르지 않습니다",
                self.week_period, self.month_period
            )));
        }

        self.macd
            .validate()
            .map_err(ConfigError::ValidationError)
    }
}
