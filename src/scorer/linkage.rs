use crate::config::AnalysisConfig;
use crate::indicator::IndicatorSet;
use crate::indicator::macd::Momentum;
use crate::model::{Candle, Direction, FractalKind, ScoreClass, TradeAction};
use crate::scorer::{ActionVerdict, score_action};
use crate::structure::divergence::{DivergenceKind, detect_divergence};
use crate::structure::fractal::fractal_ending_at;
use crate::structure::resample::{ResampledBar, locate, resample_with_indicators};
use log::debug;
use serde::Serialize;
use std::fmt::Display;

/// 상위 타임프레임 봉과 그 지표
#[derive(Debug, Clone, Copy)]
pub struct LevelSeries<'a> {
    pub bars: &'a [ResampledBar],
    pub indicators: &'a IndicatorSet,
}

/// 상위 타임프레임의 현재 위치 상태
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelStatus {
    /// 기준 인덱스를 포함하는 상위 봉 위치 (찾지 못하면 None)
    pub index: Option<usize>,
    pub trend: Option<Direction>,
    pub fractal: Option<FractalKind>,
    pub divergence: Option<DivergenceKind>,
    pub momentum: Option<Momentum>,
}

impl LevelStatus {
    /// 원본 인덱스를 포함하는 상위 봉에서 상태 계산
    ///
    /// 상위 봉 위치는 provenance 범위로 찾으며 처음 일치하는 봉을 씁니다.
    pub fn evaluate(level: LevelSeries<'_>, base_index: usize, lookback: usize) -> LevelStatus {
        let Some(index) = locate(level.bars, base_index) else {
            return LevelStatus::default();
        };
        let hist = &level.indicators.macd.hist;

        LevelStatus {
            index: Some(index),
            trend: level.indicators.trend_at(index),
            fractal: fractal_ending_at(level.bars, index).map(|f| f.kind),
            divergence: detect_divergence(level.bars, hist, index, lookback).map(|e| e.kind),
            momentum: Momentum::at(hist, index),
        }
    }
}

fn or_none<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "없음".to_string())
}

impl Display for LevelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "추세: {}, 분형: {}, 다이버전스: {}, 모멘텀: {}",
            or_none(&self.trend),
            or_none(&self.fractal),
            or_none(&self.divergence),
            or_none(&self.momentum)
        )
    }
}

/// 주봉 연동 규칙
#[derive(Debug, Clone, Copy)]
pub struct LinkageRule {
    pub name: &'static str,
    pub applies: fn(&LevelStatus) -> bool,
    /// +2 강한 공명, +1 약한 공명, -1/-2 충돌
    pub bonus: i8,
    pub narrative: &'static str,
}

fn week_bottom_divergence(week: &LevelStatus) -> bool {
    week.divergence == Some(DivergenceKind::Bottom)
}

fn week_top_divergence(week: &LevelStatus) -> bool {
    week.divergence == Some(DivergenceKind::Top)
}

fn week_any_divergence(week: &LevelStatus) -> bool {
    week.divergence.is_some()
}

fn week_always(_: &LevelStatus) -> bool {
    true
}

fn week_uptrend_bottom_fractal(week: &LevelStatus) -> bool {
    week.trend == Some(Direction::Up) && week.fractal == Some(FractalKind::Bottom)
}

fn week_downtrend_top_fractal(week: &LevelStatus) -> bool {
    week.trend == Some(Direction::Down) && week.fractal == Some(FractalKind::Top)
}

fn week_uptrend(week: &LevelStatus) -> bool {
    week.trend == Some(Direction::Up)
}

fn week_downtrend(week: &LevelStatus) -> bool {
    week.trend == Some(Direction::Down)
}

static BUY_LINKAGE: &[LinkageRule] = &[
    LinkageRule {
        name: "week_bottom_divergence",
        applies: week_bottom_divergence,
        bonus: 2,
        narrative: "주봉에서도 바닥 다이버전스가 나와 일봉 매수와 강하게 공명합니다.",
    },
    LinkageRule {
        name: "week_uptrend_bottom_fractal",
        applies: week_uptrend_bottom_fractal,
        bonus: 2,
        narrative: "주봉 상승 추세 속 바닥 분형이 확정되어 일봉 매수를 뒷받침합니다.",
    },
    LinkageRule {
        name: "week_top_divergence",
        applies: week_top_divergence,
        bonus: -2,
        narrative: "주봉 천정 다이버전스가 진행 중입니다. 상위 레벨이 매수와 정면으로 충돌합니다.",
    },
    LinkageRule {
        name: "week_downtrend_top_fractal",
        applies: week_downtrend_top_fractal,
        bonus: -2,
        narrative: "주봉 하락 추세 속 천정 분형이 확정되었습니다. 일봉 매수는 상위 레벨의 반등 매도 자리와 겹칩니다.",
    },
    LinkageRule {
        name: "week_uptrend",
        applies: week_uptrend,
        bonus: 1,
        narrative: "주봉 추세가 상승이라 매수 방향과 일치합니다.",
    },
    LinkageRule {
        name: "week_downtrend",
        applies: week_downtrend,
        bonus: -1,
        narrative: "주봉 추세가 하락입니다. 일봉 매수는 상위 추세를 거스릅니다.",
    },
];

static SELL_LINKAGE: &[LinkageRule] = &[
    LinkageRule {
        name: "week_top_divergence",
        applies: week_top_divergence,
        bonus: 2,
        narrative: "주봉에서도 천정 다이버전스가 나와 일봉 매도와 강하게 공명합니다.",
    },
    LinkageRule {
        name: "week_downtrend_top_fractal",
        applies: week_downtrend_top_fractal,
        bonus: 2,
        narrative: "주봉 하락 추세 속 천정 분형이 확정되어 일봉 매도를 뒷받침합니다.",
    },
    LinkageRule {
        name: "week_bottom_divergence",
        applies: week_bottom_divergence,
        bonus: -2,
        narrative: "주봉 바닥 다이버전스가 진행 중입니다. 상위 레벨이 매도와 정면으로 충돌합니다.",
    },
    LinkageRule {
        name: "week_uptrend_bottom_fractal",
        applies: week_uptrend_bottom_fractal,
        bonus: -2,
        narrative: "주봉 상승 추세 속 바닥 분형이 확정되었습니다. 일봉 매도는 상위 레벨의 눌림목 매수 자리와 겹칩니다.",
    },
    LinkageRule {
        name: "week_downtrend",
        applies: week_downtrend,
        bonus: 1,
        narrative: "주봉 추세가 하락이라 매도 방향과 일치합니다.",
    },
    LinkageRule {
        name: "week_uptrend",
        applies: week_uptrend,
        bonus: -1,
        narrative: "주봉 추세가 상승입니다. 일봉 매도는 상위 추세를 거스릅니다.",
    },
];

static HOLD_LINKAGE: &[LinkageRule] = &[LinkageRule {
    name: "week_divergence_ignored",
    applies: week_any_divergence,
    bonus: -1,
    narrative: "주봉 다이버전스가 살아 있어 관망은 상위 레벨의 기회를 놓칠 수 있습니다.",
}];

static WEEK_QUIET: LinkageRule = LinkageRule {
    name: "week_quiet",
    applies: week_always,
    bonus: 0,
    narrative: "주봉에는 뚜렷한 연동 신호가 없습니다.",
};

/// 행동과 주봉 상태로 연동 규칙 선택 (처음 맞는 규칙)
pub fn evaluate_linkage(action: TradeAction, week: &LevelStatus) -> &'static LinkageRule {
    let table = match action {
        TradeAction::Buy => BUY_LINKAGE,
        TradeAction::Sell => SELL_LINKAGE,
        TradeAction::Hold => HOLD_LINKAGE,
    };
    table
        .iter()
        .find(|rule| (rule.applies)(week))
        .unwrap_or(&WEEK_QUIET)
}

/// 기본 점수와 연동 가감점 결합
///
/// 양의 가점은 기본 점수가 0 이상이면 "근거 충분" 으로 올리고,
/// -2 이하의 감점은 기본 점수와 상관없이 "근거 없음" 으로 내립니다.
pub fn combine(base: ScoreClass, bonus: i8) -> ScoreClass {
    if bonus > 0 && base >= ScoreClass::Neutral {
        ScoreClass::Justified
    } else if bonus <= -2 {
        ScoreClass::Unjustified
    } else {
        base
    }
}

/// 일/주/월 연동 평가 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkageReport {
    /// 최종 점수와 전체 설명, 일봉 강조 도형
    pub verdict: ActionVerdict,
    /// 일봉 단독 점수
    pub base_score: ScoreClass,
    pub bonus: i8,
    /// 선택된 연동 규칙 이름
    pub rule: &'static str,
    pub week: LevelStatus,
    pub month: LevelStatus,
}

impl Display for LinkageReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (일봉 {}, 연동 {:+})",
            self.verdict, self.base_score, self.bonus
        )
    }
}

fn up_to<T>(items: &[T], index: usize) -> &[T] {
    &items[..items.len().min(index.saturating_add(1))]
}

/// 일/주/월 연동 행동 평가
///
/// # Arguments
/// * `action` - 사용자 행동
/// * `day_bars` - 일봉 (현재 인덱스 이후는 무시)
/// * `day_hist` - 일봉 MACD 히스토그램
/// * `week` - 주봉과 주봉 지표
/// * `month` - 월봉과 월봉 지표
/// * `index` - 현재 일봉 인덱스
/// * `config` - 분석 설정
///
/// # Returns
/// * `LinkageReport` - 최종 평가와 주/월 상태
pub fn score_linked<C: Candle>(
    action: TradeAction,
    day_bars: &[C],
    day_hist: &[f64],
    week: LevelSeries<'_>,
    month: LevelSeries<'_>,
    index: usize,
    config: &AnalysisConfig,
) -> LinkageReport {
    let base = score_action(
        action,
        up_to(day_bars, index),
        up_to(day_hist, index),
        config,
    );

    let week_status = LevelStatus::evaluate(week, index, config.level_divergence_lookback);
    let month_status = LevelStatus::evaluate(month, index, config.level_divergence_lookback);
    let rule = evaluate_linkage(action, &week_status);
    let score = combine(base.score, rule.bonus);

    debug!(
        "연동 평가: {} 일봉 {} + {} ({}) -> {}",
        action, base.score, rule.bonus, rule.name, score
    );

    let narrative = format!(
        "{}\n[주봉 연동] {}\n[주봉] {}\n[월봉] {}",
        base.narrative, rule.narrative, week_status, month_status
    );

    LinkageReport {
        verdict: ActionVerdict {
            score,
            narrative,
            highlights: base.highlights,
        },
        base_score: base.score,
        bonus: rule.bonus,
        rule: rule.name,
        week: week_status,
        month: month_status,
    }
}

/// 일봉만으로 연동 평가
///
/// 현재 인덱스까지 잘린 일봉으로 주봉/월봉을 만들고 지표를 새로 계산하므로
/// 미래 봉 정보가 섞이지 않습니다.
pub fn score_linked_from_daily<C: Candle>(
    action: TradeAction,
    day_bars: &[C],
    index: usize,
    config: &AnalysisConfig,
) -> LinkageReport {
    let days = up_to(day_bars, index);
    let day_indicators =
        IndicatorSet::from_candles(days, config.macd, config.ma_short, config.ma_long);
    let (week_bars, week_indicators) = resample_with_indicators(days, config.week_period, config);
    let (month_bars, month_indicators) =
        resample_with_indicators(days, config.month_period, config);

    score_linked(
        action,
        days,
        &day_indicators.macd.hist,
        LevelSeries {
            bars: &week_bars,
            indicators: &week_indicators,
        },
        LevelSeries {
            bars: &month_bars,
            indicators: &month_indicators,
        },
        index,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(trend: Option<Direction>, fractal: Option<FractalKind>) -> LevelStatus {
        LevelStatus {
            index: Some(0),
            trend,
            fractal,
            divergence: None,
            momentum: None,
        }
    }

    #[test]
    fn test_combine() {
        assert_eq!(combine(ScoreClass::Neutral, 1), ScoreClass::Justified);
        assert_eq!(combine(ScoreClass::Unjustified, 1), ScoreClass::Unjustified);
        assert_eq!(combine(ScoreClass::Justified, -2), ScoreClass::Unjustified);
        assert_eq!(combine(ScoreClass::Justified, -1), ScoreClass::Justified);
        assert_eq!(combine(ScoreClass::Neutral, 0), ScoreClass::Neutral);
    }

    #[test]
    fn test_buy_with_weekly_uptrend() {
        let week = status(Some(Direction::Up), None);
        let rule = evaluate_linkage(TradeAction::Buy, &week);
        assert_eq!(rule.bonus, 1);
        let rule = evaluate_linkage(TradeAction::Sell, &week);
        assert_eq!(rule.bonus, -1);
    }

    #[test]
    fn test_weekly_structure_beats_trend() {
        let week = status(Some(Direction::Down), Some(FractalKind::Top));
        assert_eq!(evaluate_linkage(TradeAction::Buy, &week).bonus, -2);
        assert_eq!(evaluate_linkage(TradeAction::Sell, &week).bonus, 2);
    }

    #[test]
    fn test_divergence_first() {
        let week = LevelStatus {
            divergence: Some(DivergenceKind::Bottom),
            ..status(Some(Direction::Down), Some(FractalKind::Top))
        };
        assert_eq!(evaluate_linkage(TradeAction::Buy, &week).name, "week_bottom_divergence");
        assert_eq!(evaluate_linkage(TradeAction::Hold, &week).bonus, -1);
    }

    #[test]
    fn test_quiet_week() {
        let week = LevelStatus::default();
        assert_eq!(evaluate_linkage(TradeAction::Buy, &week).bonus, 0);
        assert_eq!(evaluate_linkage(TradeAction::Hold, &week).name, "week_quiet");
    }

    #[test]
    fn test_up_to() {
        let items = [1, 2, 3];
        assert_eq!(up_to(&items, 1), &[1, 2]);
        assert_eq!(up_to(&items, 10), &[1, 2, 3]);
        assert_eq!(up_to(&items, usize::MAX), &[1, 2, 3]);
    }
}
