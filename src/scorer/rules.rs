use crate::indicator::macd::Momentum;
use crate::model::{Direction, FractalKind, ScoreClass, TradeAction};
use crate::structure::divergence::DivergenceKind;

/// 행동 평가에 쓰는 현재 시점 신호
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalContext {
    pub action: TradeAction,
    pub divergence: Option<DivergenceKind>,
    pub fractal: Option<FractalKind>,
    pub trend: Option<Direction>,
    pub momentum: Option<Momentum>,
}

/// 판정 규칙 (조건, 점수, 설명)
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&SignalContext) -> bool,
    pub score: ScoreClass,
    pub narrative: &'static str,
}

fn bottom_divergence(ctx: &SignalContext) -> bool {
    ctx.divergence == Some(DivergenceKind::Bottom)
}

fn top_divergence(ctx: &SignalContext) -> bool {
    ctx.divergence == Some(DivergenceKind::Top)
}

fn bottom_fractal_in_uptrend(ctx: &SignalContext) -> bool {
    ctx.fractal == Some(FractalKind::Bottom) && ctx.trend == Some(Direction::Up)
}

fn top_fractal_in_downtrend(ctx: &SignalContext) -> bool {
    ctx.fractal == Some(FractalKind::Top) && ctx.trend == Some(Direction::Down)
}

fn bottom_fractal(ctx: &SignalContext) -> bool {
    ctx.fractal == Some(FractalKind::Bottom)
}

fn top_fractal(ctx: &SignalContext) -> bool {
    ctx.fractal == Some(FractalKind::Top)
}

fn counter_trend_fractal(ctx: &SignalContext) -> bool {
    matches!(
        (ctx.fractal, ctx.trend),
        (Some(FractalKind::Top), Some(Direction::Up))
            | (Some(FractalKind::Bottom), Some(Direction::Down))
    )
}

fn bearish_fading(ctx: &SignalContext) -> bool {
    ctx.momentum == Some(Momentum::BearishFading)
}

fn bullish_fading(ctx: &SignalContext) -> bool {
    ctx.momentum == Some(Momentum::BullishFading)
}

fn bullish_strengthening(ctx: &SignalContext) -> bool {
    ctx.momentum == Some(Momentum::BullishStrengthening)
}

fn bearish_strengthening(ctx: &SignalContext) -> bool {
    ctx.momentum == Some(Momentum::BearishStrengthening)
}

fn always(_: &SignalContext) -> bool {
    true
}

fn any_momentum_fading(ctx: &SignalContext) -> bool {
    ctx.momentum.is_some_and(|m| m.is_fading())
}

/// 매수 판정표 (위에서부터 처음 맞는 규칙 적용)
pub static BUY_RULES: &[Rule] = &[
    Rule {
        name: "buy_bottom_divergence",
        applies: bottom_divergence,
        score: ScoreClass::Justified,
        narrative: "바닥 다이버전스: 가격은 신저점이지만 매도 동력이 약해졌습니다. 반등을 노린 매수로 근거가 충분합니다.",
    },
    Rule {
        name: "buy_against_top_divergence",
        applies: top_divergence,
        score: ScoreClass::Unjustified,
        narrative: "천정 다이버전스: 신고점에서 상승 동력이 소진되는 중입니다. 이 자리의 매수는 고점 추격일 가능성이 큽니다.",
    },
    Rule {
        name: "buy_bottom_fractal_uptrend",
        applies: bottom_fractal_in_uptrend,
        score: ScoreClass::Justified,
        narrative: "상승 추세(MA 단기 > 장기) 속 바닥 분형: 눌림목 매수로 추세와 구조가 일치합니다.",
    },
    Rule {
        name: "buy_top_fractal_downtrend",
        applies: top_fractal_in_downtrend,
        score: ScoreClass::Unjustified,
        narrative: "하락 추세 속 천정 분형에서 매수했습니다. 반등이 끝나는 자리일 가능성이 큽니다.",
    },
    Rule {
        name: "buy_bottom_fractal_downtrend",
        applies: bottom_fractal,
        score: ScoreClass::Neutral,
        narrative: "바닥 분형은 나왔지만 이동평균 추세가 아직 하락입니다. 반등 시도로 볼 수 있으나 추세 확인이 필요합니다.",
    },
    Rule {
        name: "buy_bearish_momentum_fading",
        applies: bearish_fading,
        score: ScoreClass::Neutral,
        narrative: "0 아래 히스토그램이 짧아지며 하락 동력이 줄고 있습니다. 구조 신호는 없지만 바닥을 탐색하는 매수로 볼 수 있습니다.",
    },
    Rule {
        name: "buy_bullish_momentum",
        applies: bullish_strengthening,
        score: ScoreClass::Neutral,
        narrative: "0 위 히스토그램이 길어지며 상승 동력이 커지고 있습니다. 추세 추종 매수이나 구조적 근거는 약합니다.",
    },
    Rule {
        name: "buy_bearish_momentum",
        applies: bearish_strengthening,
        score: ScoreClass::Unjustified,
        narrative: "0 아래 히스토그램이 길어지는 하락 가속 구간에서 매수했습니다.",
    },
];

/// 매도 판정표
pub static SELL_RULES: &[Rule] = &[
    Rule {
        name: "sell_top_divergence",
        applies: top_divergence,
        score: ScoreClass::Justified,
        narrative: "천정 다이버전스: 가격은 신고점이지만 매수 동력이 약해졌습니다. 이익 실현/매도로 근거가 충분합니다.",
    },
    Rule {
        name: "sell_against_bottom_divergence",
        applies: bottom_divergence,
        score: ScoreClass::Unjustified,
        narrative: "바닥 다이버전스: 신저점에서 하락 동력이 소진되는 중입니다. 이 자리의 매도는 바닥 투매일 가능성이 큽니다.",
    },
    Rule {
        name: "sell_top_fractal_downtrend",
        applies: top_fractal_in_downtrend,
        score: ScoreClass::Justified,
        narrative: "하락 추세(MA 단기 < 장기) 속 천정 분형: 반등 매도로 추세와 구조가 일치합니다.",
    },
    Rule {
        name: "sell_bottom_fractal_uptrend",
        applies: bottom_fractal_in_uptrend,
        score: ScoreClass::Unjustified,
        narrative: "상승 추세 속 바닥 분형에서 매도했습니다. 눌림목에서 물량을 넘겼을 가능성이 큽니다.",
    },
    Rule {
        name: "sell_top_fractal_uptrend",
        applies: top_fractal,
        score: ScoreClass::Neutral,
        narrative: "천정 분형은 나왔지만 이동평균 추세가 아직 상승입니다. 일부 이익 실현으로 볼 수 있으나 추세 확인이 필요합니다.",
    },
    Rule {
        name: "sell_bullish_momentum_fading",
        applies: bullish_fading,
        score: ScoreClass::Neutral,
        narrative: "0 위 히스토그램이 짧아지며 상승 동력이 줄고 있습니다. 구조 신호는 없지만 방어적 매도로 볼 수 있습니다.",
    },
    Rule {
        name: "sell_bearish_momentum",
        applies: bearish_strengthening,
        score: ScoreClass::Neutral,
        narrative: "0 아래 히스토그램이 길어지며 하락 동력이 커지고 있습니다. 손실 제한 매도이나 구조적 근거는 약합니다.",
    },
    Rule {
        name: "sell_bullish_momentum",
        applies: bullish_strengthening,
        score: ScoreClass::Unjustified,
        narrative: "0 위 히스토그램이 길어지는 상승 가속 구간에서 매도했습니다.",
    },
];

/// 관망 판정표
///
/// 살아 있는 다이버전스를 두고 아무것도 하지 않으면 감점합니다.
pub static HOLD_RULES: &[Rule] = &[
    Rule {
        name: "hold_missed_bottom_divergence",
        applies: bottom_divergence,
        score: ScoreClass::Unjustified,
        narrative: "바닥 다이버전스가 나온 자리에서 관망했습니다. 구조적 매수 기회를 놓쳤습니다.",
    },
    Rule {
        name: "hold_missed_top_divergence",
        applies: top_divergence,
        score: ScoreClass::Unjustified,
        narrative: "천정 다이버전스가 나온 자리에서 관망했습니다. 구조적 매도 신호를 무시했습니다.",
    },
    Rule {
        name: "hold_bottom_fractal_uptrend",
        applies: bottom_fractal_in_uptrend,
        score: ScoreClass::Neutral,
        narrative: "상승 추세 속 바닥 분형이 나왔습니다. 관망도 가능하지만 눌림목 매수 자리였습니다.",
    },
    Rule {
        name: "hold_top_fractal_downtrend",
        applies: top_fractal_in_downtrend,
        score: ScoreClass::Neutral,
        narrative: "하락 추세 속 천정 분형이 나왔습니다. 관망도 가능하지만 반등 매도 자리였습니다.",
    },
    Rule {
        name: "hold_counter_trend_fractal",
        applies: counter_trend_fractal,
        score: ScoreClass::Justified,
        narrative: "추세와 반대되는 분형만 나온 자리입니다. 확인 전까지 관망하는 것이 타당합니다.",
    },
    Rule {
        name: "hold_momentum_fading",
        applies: any_momentum_fading,
        score: ScoreClass::Justified,
        narrative: "히스토그램이 짧아지며 모멘텀이 전환을 모색하는 구간입니다. 방향이 정해질 때까지 관망이 타당합니다.",
    },
];

/// 매수/매도에서 맞는 규칙이 없을 때
pub static NO_BASIS: Rule = Rule {
    name: "no_structural_basis",
    applies: always,
    score: ScoreClass::Unjustified,
    narrative: "구조적 근거가 없습니다: 다이버전스, 추세에 맞는 분형, 모멘텀 신호가 모두 없습니다.",
};

/// 관망에서 맞는 규칙이 없을 때
pub static QUIET_HOLD: Rule = Rule {
    name: "quiet_hold",
    applies: always,
    score: ScoreClass::Neutral,
    narrative: "뚜렷한 구조 신호가 없어 관망은 중립적인 선택입니다.",
};

/// 행동별 판정표
pub fn rules_for(action: TradeAction) -> &'static [Rule] {
    match action {
        TradeAction::Buy => BUY_RULES,
        TradeAction::Sell => SELL_RULES,
        TradeAction::Hold => HOLD_RULES,
    }
}

/// 처음 맞는 규칙 (없으면 행동별 기본 규칙)
pub fn evaluate(ctx: &SignalContext) -> &'static Rule {
    rules_for(ctx.action)
        .iter()
        .find(|rule| (rule.applies)(ctx))
        .unwrap_or(match ctx.action {
            TradeAction::Hold => &QUIET_HOLD,
            _ => &NO_BASIS,
        })
}
