use common_test_utils::*;

use chan_structure::analyzer::shape::{ColorHint, HighlightShape, Panel};
use chan_structure::analyzer::ChanAnalyzer;
use chan_structure::candle_store::CandleStore;
use chan_structure::config::AnalysisConfig;
use chan_structure::model::{ScoreClass, TradeAction};
use chan_structure::scorer::{score_action, score_with_analyzer};

/// 31봉 하락 후 마지막 봉에서 신고점 (천정 다이버전스 재료)
fn new_high_bars() -> Vec<TestCandle> {
    let mut ranges: Vec<(f64, f64)> = (0..31)
        .map(|i| {
            let high = 100.0 + i as f64 * 0.5;
            (high - 2.0, high)
        })
        .collect();
    ranges.push((117.0, 120.0));
    candles_from_ranges(&ranges)
}

fn weakening_positive_hist(len: usize) -> Vec<f64> {
    let mut hist = vec![1.0; len];
    hist[len - 2] = 3.0;
    hist[len - 1] = 0.5;
    hist
}

#[test]
fn test_sell_on_top_divergence() {
    let bars = new_high_bars();
    let hist = weakening_positive_hist(bars.len());
    let config = AnalysisConfig::default();

    let sell = score_action(TradeAction::Sell, &bars, &hist, &config);
    assert_eq!(sell.score, ScoreClass::Justified);

    let buy = score_action(TradeAction::Buy, &bars, &hist, &config);
    assert_eq!(buy.score, ScoreClass::Unjustified);

    let hold = score_action(TradeAction::Hold, &bars, &hist, &config);
    assert_eq!(hold.score, ScoreClass::Unjustified);

    let oscillator_lines: Vec<&HighlightShape> = sell
        .highlights
        .iter()
        .filter(|shape| shape.panel() == Panel::Oscillator)
        .collect();
    assert_eq!(oscillator_lines.len(), 1);
    assert_eq!(oscillator_lines[0].color(), ColorHint::TopDivergence);
}

#[test]
fn test_confirmed_high_is_not_divergence() {
    let bars = new_high_bars();
    // 히스토그램도 신고점: 모멘텀이 가격을 확인
    let mut hist = vec![1.0; bars.len()];
    hist[bars.len() - 1] = 4.0;
    let config = AnalysisConfig::default();

    let sell = score_action(TradeAction::Sell, &bars, &hist, &config);
    assert_ne!(sell.score, ScoreClass::Justified);
    assert!(sell.highlights.iter().all(|s| s.panel() == Panel::Price));
}

#[test]
fn test_lookback_longer_than_history_disables_divergence() {
    let bars = new_high_bars();
    let hist = weakening_positive_hist(bars.len());
    let config = AnalysisConfig {
        divergence_lookback: 40,
        ..AnalysisConfig::default()
    };
    let sell = score_action(TradeAction::Sell, &bars, &hist, &config);
    assert_ne!(sell.score, ScoreClass::Justified);
}

#[test]
fn test_bottom_fractal_in_uptrend_buy() {
    // 상승 추세 후 눌림: 마지막 세 봉이 바닥 분형
    let mut bars = create_uptrend_candles(30, 100.0, 1.0);
    let last = bars[29].clone();
    bars.push(TestCandle::new(30 * DAY, 126.0, 127.0, 125.0, 126.0));
    bars.push(TestCandle::new(31 * DAY, 127.0, 129.0, 126.0, 128.0));
    assert!(last.low > 125.0);

    let analyzer = ChanAnalyzer::new(AnalysisConfig::default(), bars);
    let index = analyzer.last_index().unwrap();
    assert_eq!(
        analyzer.fractal_ending_at(index).map(|f| f.index),
        Some(index - 1)
    );

    let verdict = score_with_analyzer(TradeAction::Buy, &analyzer);
    assert!(verdict.score >= ScoreClass::Neutral);
    assert!(
        verdict
            .highlights
            .iter()
            .any(|s| s.color() == ColorHint::BottomFractal)
    );
}

#[test]
fn test_scoring_from_store_snapshot() {
    let bars = create_zigzag_candles(80, 100.0, 1.0, 5);
    let mut store = CandleStore::new(Vec::new(), 200, true);
    for bar in bars.iter().take(50).cloned() {
        store.add(bar);
    }

    let from_store = ChanAnalyzer::from_storage(AnalysisConfig::default(), &store);
    let direct = ChanAnalyzer::new(AnalysisConfig::default(), bars[..50].to_vec());

    let a = score_with_analyzer(TradeAction::Hold, &from_store);
    let b = score_with_analyzer(TradeAction::Hold, &direct);
    assert_eq!(a, b);
    assert!(a.highlights.iter().any(|s| s.color() == ColorHint::Center));
}

#[test]
fn test_empty_sequence_is_neutral_hold_and_unjustified_trade() {
    let config = AnalysisConfig::default();
    let empty: Vec<TestCandle> = Vec::new();
    assert_eq!(
        score_action(TradeAction::Hold, &empty, &[], &config).score,
        ScoreClass::Neutral
    );
    assert_eq!(
        score_action(TradeAction::Buy, &empty, &[], &config).score,
        ScoreClass::Unjustified
    );
}
