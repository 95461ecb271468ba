// 매매 행동 평가 모듈
// 사용자 행동(매수/매도/관망)이 현재 缠论 구조로 정당화되는지 판정표로 평가합니다.

pub mod linkage;
pub mod rules;

use crate::analyzer::chan_analyzer::ChanAnalyzer;
use crate::analyzer::shape::HighlightShape;
use crate::config::AnalysisConfig;
use crate::model::{Candle, ScoreClass, TradeAction};
use log::debug;
use rules::SignalContext;
use serde::Serialize;
use std::fmt::Display;

pub use linkage::{LevelStatus, LinkageReport, score_linked, score_linked_from_daily};

/// 행동 평가 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionVerdict {
    pub score: ScoreClass,
    pub narrative: String,
    pub highlights: Vec<HighlightShape>,
}

impl Display for ActionVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.score, self.narrative)
    }
}

/// 분석기의 마지막 봉 기준 신호 수집
pub fn signal_context<C: Candle>(action: TradeAction, analyzer: &ChanAnalyzer<C>) -> SignalContext {
    let Some(index) = analyzer.last_index() else {
        return SignalContext {
            action,
            divergence: None,
            fractal: None,
            trend: None,
            momentum: None,
        };
    };

    SignalContext {
        action,
        divergence: analyzer.divergence_at(index).map(|event| event.kind),
        fractal: analyzer.fractal_ending_at(index).map(|fractal| fractal.kind),
        trend: analyzer.trend_at(index),
        momentum: analyzer.momentum_at(index),
    }
}

/// 이미 만든 분석기로 행동 평가
///
/// 분석기의 마지막 봉을 현재 봉으로 봅니다.
pub fn score_with_analyzer<C: Candle>(
    action: TradeAction,
    analyzer: &ChanAnalyzer<C>,
) -> ActionVerdict {
    let ctx = signal_context(action, analyzer);
    let rule = rules::evaluate(&ctx);
    debug!("행동 평가: {} -> {} ({})", action, rule.name, rule.score);

    let (fractal, divergence) = match analyzer.last_index() {
        Some(index) => (
            analyzer.fractal_ending_at(index),
            analyzer.divergence_at(index),
        ),
        None => (None, None),
    };

    ActionVerdict {
        score: rule.score,
        narrative: rule.narrative.to_string(),
        highlights: analyzer.highlights(fractal.as_ref(), divergence.as_ref()),
    }
}

/// 단일 타임프레임 행동 평가
///
/// # Arguments
/// * `action` - 사용자 행동
/// * `bars` - 현재 봉까지 잘린 봉 시퀀스
/// * `hist` - `bars` 와 정렬된 MACD 히스토그램
/// * `config` - 분석 설정
///
/// # Returns
/// * `ActionVerdict` - 점수, 설명, 강조 도형
pub fn score_action<C: Candle>(
    action: TradeAction,
    bars: &[C],
    hist: &[f64],
    config: &AnalysisConfig,
) -> ActionVerdict {
    let analyzer = ChanAnalyzer::new(config.clone(), bars.to_vec()).with_oscillator(hist.to_vec());
    score_with_analyzer(action, &analyzer)
}
