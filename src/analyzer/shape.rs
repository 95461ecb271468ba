use crate::model::{Candle, FractalKind};
use crate::structure::center::Center;
use crate::structure::divergence::{DivergenceEvent, DivergenceKind};
use crate::structure::fractal::Fractal;
use crate::structure::inclusion::NormalizedBar;
use crate::structure::stroke::admit_fractals;
use serde::Serialize;

/// 도형을 그릴 차트 패널
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    /// 가격 차트
    Price,
    /// MACD 히스토그램 차트
    Oscillator,
}

/// 색상 힌트 (실제 색은 화면 계층이 정함)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorHint {
    Rising,
    Falling,
    Center,
    TopFractal,
    BottomFractal,
    TopDivergence,
    BottomDivergence,
}

/// `(원본 봉 인덱스, 가격)` 좌표
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub index: usize,
    pub price: f64,
}

impl ChartPoint {
    pub fn new(index: usize, price: f64) -> Self {
        ChartPoint { index, price }
    }
}

/// 강조 도형
///
/// 데이터만 담고 그리기 부수효과는 없습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum HighlightShape {
    Line {
        panel: Panel,
        from: ChartPoint,
        to: ChartPoint,
        color: ColorHint,
    },
    Rect {
        panel: Panel,
        start_index: usize,
        end_index: usize,
        low: f64,
        high: f64,
        color: ColorHint,
    },
}

impl HighlightShape {
    pub fn panel(&self) -> Panel {
        match self {
            HighlightShape::Line { panel, .. } | HighlightShape::Rect { panel, .. } => *panel,
        }
    }

    pub fn color(&self) -> ColorHint {
        match self {
            HighlightShape::Line { color, .. } | HighlightShape::Rect { color, .. } => *color,
        }
    }
}

/// 정규화 인덱스를 원본 봉 인덱스로 변환 (범위를 벗어나면 그대로)
fn source_index(normalized: &[NormalizedBar], index: usize) -> usize {
    normalized
        .get(index)
        .map(|bar| bar.source_index)
        .unwrap_or(index)
}

/// 분형을 잇는 선
///
/// 필 생성과 같은 채택 규칙을 쓰지만 간격 기준은 `min_separation`(기본 3) 으로 따로 받습니다.
pub fn stroke_lines(
    normalized: &[NormalizedBar],
    fractals: &[Fractal],
    min_separation: usize,
) -> Vec<HighlightShape> {
    admit_fractals(fractals, min_separation)
        .windows(2)
        .filter(|pair| pair[0].kind != pair[1].kind)
        .map(|pair| {
            let (start, end) = (&pair[0], &pair[1]);
            HighlightShape::Line {
                panel: Panel::Price,
                from: ChartPoint::new(source_index(normalized, start.index), start.price),
                to: ChartPoint::new(source_index(normalized, end.index), end.price),
                color: if end.price > start.price {
                    ColorHint::Rising
                } else {
                    ColorHint::Falling
                },
            }
        })
        .collect()
}

/// 중추 사각형
pub fn center_rects(normalized: &[NormalizedBar], centers: &[Center]) -> Vec<HighlightShape> {
    centers
        .iter()
        .map(|center| HighlightShape::Rect {
            panel: Panel::Price,
            start_index: source_index(normalized, center.start_index),
            end_index: source_index(normalized, center.end_index),
            low: center.range_low,
            high: center.range_high,
            color: ColorHint::Center,
        })
        .collect()
}

fn fractal_color(kind: FractalKind) -> ColorHint {
    match kind {
        FractalKind::Top => ColorHint::TopFractal,
        FractalKind::Bottom => ColorHint::BottomFractal,
    }
}

/// 분형 세 봉 창의 (시작, 끝, 저가, 고가)
fn fractal_window<C: Candle>(bars: &[C], fractal: &Fractal) -> Option<(usize, usize, f64, f64)> {
    let start = fractal.index.checked_sub(1)?;
    let end = fractal.index + 1;
    let window = bars.get(start..=end)?;
    let low = window
        .iter()
        .map(|c| c.low_price())
        .fold(f64::INFINITY, f64::min);
    let high = window
        .iter()
        .map(|c| c.high_price())
        .fold(f64::NEG_INFINITY, f64::max);
    Some((start, end, low, high))
}

/// 분형 세 봉을 감싸는 상자
///
/// `bars` 는 분형을 찾은 시퀀스이며 인덱스는 그 시퀀스 기준입니다.
/// 세 봉 창이 범위를 벗어나면 None 입니다.
pub fn fractal_box<C: Candle>(bars: &[C], fractal: &Fractal) -> Option<HighlightShape> {
    let (start_index, end_index, low, high) = fractal_window(bars, fractal)?;
    Some(HighlightShape::Rect {
        panel: Panel::Price,
        start_index,
        end_index,
        low,
        high,
        color: fractal_color(fractal.kind),
    })
}

/// 정규화 시퀀스에서 찾은 분형 상자 (원본 인덱스로 변환)
pub fn fractal_boxes(normalized: &[NormalizedBar], fractals: &[Fractal]) -> Vec<HighlightShape> {
    fractals
        .iter()
        .filter_map(|fractal| {
            let (start, end, low, high) = fractal_window(normalized, fractal)?;
            Some(HighlightShape::Rect {
                panel: Panel::Price,
                start_index: source_index(normalized, start),
                end_index: source_index(normalized, end),
                low,
                high,
                color: fractal_color(fractal.kind),
            })
        })
        .collect()
}

/// 다이버전스 연결선 (가격 차트와 오실레이터 차트에 하나씩)
pub fn divergence_connectors(event: &DivergenceEvent) -> Vec<HighlightShape> {
    let color = match event.kind {
        DivergenceKind::Top => ColorHint::TopDivergence,
        DivergenceKind::Bottom => ColorHint::BottomDivergence,
    };

    vec![
        HighlightShape::Line {
            panel: Panel::Price,
            from: ChartPoint::new(event.reference_index, event.reference_price),
            to: ChartPoint::new(event.current_index, event.current_price),
            color,
        },
        HighlightShape::Line {
            panel: Panel::Oscillator,
            from: ChartPoint::new(event.reference_index, event.reference_oscillator),
            to: ChartPoint::new(event.current_index, event.current_oscillator),
            color,
        },
    ]
}
