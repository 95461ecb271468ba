use common_test_utils::*;

use chan_structure::model::{Candle, FractalKind};
use chan_structure::structure::center::{CenterSpan, build_centers};
use chan_structure::structure::divergence::{DivergenceKind, detect_divergence};
use chan_structure::structure::fractal::{classify, detect_fractals};
use chan_structure::structure::inclusion::normalize;
use chan_structure::structure::resample::{locate, resample};
use chan_structure::structure::stroke::{admit_fractals, build_strokes};
use proptest::prelude::*;

/// (저가, 폭) 쌍으로 만든 임의 봉 시퀀스
fn arb_candles(max_len: usize) -> impl Strategy<Value = Vec<TestCandle>> {
    prop::collection::vec((1.0f64..100.0, 0.1f64..10.0), 0..max_len).prop_map(|ranges| {
        let ranges: Vec<(f64, f64)> = ranges
            .into_iter()
            .map(|(low, width)| (low, low + width))
            .collect();
        candles_from_ranges(&ranges)
    })
}

/// 봉과 같은 길이의 임의 히스토그램
fn arb_candles_with_hist() -> impl Strategy<Value = (Vec<TestCandle>, Vec<f64>)> {
    prop::collection::vec((1.0f64..100.0, 0.1f64..10.0, -5.0f64..5.0), 2..80).prop_map(|rows| {
        let ranges: Vec<(f64, f64)> = rows.iter().map(|&(low, w, _)| (low, low + w)).collect();
        let hist = rows.iter().map(|&(_, _, h)| h).collect();
        (candles_from_ranges(&ranges), hist)
    })
}

fn mirror(candles: &[TestCandle]) -> Vec<TestCandle> {
    candles
        .iter()
        .map(|c| TestCandle::new(c.timestamp, -c.open, -c.low, -c.high, -c.close))
        .collect()
}

fn swap(kind: DivergenceKind) -> DivergenceKind {
    match kind {
        DivergenceKind::Top => DivergenceKind::Bottom,
        DivergenceKind::Bottom => DivergenceKind::Top,
    }
}

#[test]
fn test_demo_top_fractal() {
    let bars = vec![
        TestCandle::new(0, 10.0, 12.0, 9.0, 11.0),
        TestCandle::new(DAY, 11.0, 13.0, 10.0, 10.5),
        TestCandle::new(2 * DAY, 10.5, 11.5, 9.5, 10.0),
    ];
    let fractals = detect_fractals(&normalize(&bars));
    assert_eq!(fractals.len(), 1);
    assert_eq!(fractals[0].index, 1);
    assert_eq!(fractals[0].kind, FractalKind::Top);
    assert_eq!(fractals[0].price, 13.0);
}

#[test]
fn test_demo_inclusion_merge() {
    let bars = candles_from_ranges(&[(8.0, 12.0), (8.5, 11.5)]);
    let normalized = normalize(&bars);
    assert_eq!(normalized.len(), 1);
    assert_eq!(normalized[0].high, 12.0);
    assert_eq!(normalized[0].low, 8.5);
}

#[test]
fn test_zigzag_pipeline() {
    let bars = create_zigzag_candles(61, 100.0, 1.0, 5);
    let normalized = normalize(&bars);
    assert_eq!(normalized.len(), bars.len());

    let strokes = build_strokes(&detect_fractals(&normalized), 4);
    assert_eq!(strokes.len(), 10);
    assert_eq!(strokes[0].start_index, 5);
    assert_eq!(strokes[0].end_index, 10);

    let centers = build_centers(&strokes, CenterSpan::Core);
    assert_eq!(centers.len(), 1);
    assert_eq!(centers[0].range_high, 105.5);
    assert_eq!(centers[0].range_low, 99.5);
}

proptest! {
    #[test]
    fn prop_inclusion_idempotent(bars in arb_candles(120)) {
        let once = normalize(&bars);
        let twice = normalize(&once);
        prop_assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(&twice) {
            prop_assert_eq!(a.high, b.high);
            prop_assert_eq!(a.low, b.low);
        }
        for pair in once.windows(2) {
            prop_assert!(!pair[0].has_inclusion(&pair[1]));
        }
    }

    #[test]
    fn prop_fractal_exclusive_on_normalized(bars in arb_candles(120)) {
        let normalized = normalize(&bars);
        for w in normalized.windows(3) {
            let is_top = w[1].high_price() > w[0].high_price() && w[1].high_price() > w[2].high_price();
            let is_bottom = w[1].low_price() < w[0].low_price() && w[1].low_price() < w[2].low_price();
            prop_assert!(!(is_top && is_bottom));
            let expected = if is_top {
                Some(FractalKind::Top)
            } else if is_bottom {
                Some(FractalKind::Bottom)
            } else {
                None
            };
            prop_assert_eq!(classify(&w[0], &w[1], &w[2]), expected);
        }
    }

    #[test]
    fn prop_strokes_alternate_and_separate(bars in arb_candles(200), min_separation in 1usize..8) {
        let fractals = detect_fractals(&normalize(&bars));
        let admitted = admit_fractals(&fractals, min_separation);
        for pair in admitted.windows(2) {
            prop_assert_ne!(pair[0].kind, pair[1].kind);
            prop_assert!(pair[1].index >= pair[0].index + min_separation);
        }

        let strokes = build_strokes(&fractals, min_separation);
        prop_assert_eq!(strokes.len(), admitted.len().saturating_sub(1));
        for pair in strokes.windows(2) {
            prop_assert_ne!(pair[0].direction, pair[1].direction);
            prop_assert_eq!(pair[0].end_index, pair[1].start_index);
        }
    }

    #[test]
    fn prop_centers_valid_and_disjoint(bars in arb_candles(300), full in any::<bool>()) {
        let span = if full { CenterSpan::Full } else { CenterSpan::Core };
        let strokes = build_strokes(&detect_fractals(&normalize(&bars)), 4);
        let centers = build_centers(&strokes, span);
        for center in &centers {
            prop_assert!(center.range_high > center.range_low);
            prop_assert!(center.start_index <= center.end_index);
        }
        for pair in centers.windows(2) {
            prop_assert!(!pair[0].overlaps(&pair[1]));
            prop_assert!(pair[0].start_index <= pair[1].start_index);
        }
    }

    #[test]
    fn prop_divergence_mirror_symmetry((bars, hist) in arb_candles_with_hist(), lookback in 1usize..20) {
        let mirrored = mirror(&bars);
        let mirrored_hist: Vec<f64> = hist.iter().map(|h| -h).collect();
        for index in 0..bars.len() {
            let original = detect_divergence(&bars, &hist, index, lookback);
            let flipped = detect_divergence(&mirrored, &mirrored_hist, index, lookback);
            prop_assert_eq!(original.as_ref().map(|e| swap(e.kind)), flipped.as_ref().map(|e| e.kind));
            prop_assert_eq!(
                original.map(|e| e.reference_index),
                flipped.map(|e| e.reference_index)
            );
        }
    }

    #[test]
    fn prop_resample_provenance(bars in arb_candles(150), period in 1usize..25) {
        let resampled = resample(&bars, period);
        prop_assert_eq!(resampled.len(), bars.len().div_ceil(period));
        for k in 0..bars.len() {
            prop_assert_eq!(resampled.iter().filter(|b| b.covers(k)).count(), 1);
            let position = locate(&resampled, k);
            prop_assert_eq!(position, Some(k / period));
        }
        for bar in &resampled {
            let chunk = &bars[bar.start_index..=bar.end_index];
            prop_assert_eq!(bar.open, chunk[0].open);
            prop_assert_eq!(bar.close, chunk[chunk.len() - 1].close);
            prop_assert!(chunk.iter().all(|c| c.low >= bar.low && c.high <= bar.high));
        }
    }
}
