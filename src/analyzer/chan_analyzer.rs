use crate::analyzer::shape::{self, HighlightShape};
use crate::candle_store::CandleStore;
use crate::config::AnalysisConfig;
use crate::indicator::IndicatorSet;
use crate::indicator::macd::Momentum;
use crate::model::{Candle, Direction};
use crate::structure::center::{Center, build_centers};
use crate::structure::divergence::{DivergenceEvent, detect_divergence};
use crate::structure::fractal::{Fractal, detect_fractals, fractal_ending_at};
use crate::structure::inclusion::{NormalizedBar, normalize};
use crate::structure::stroke::{Stroke, build_strokes};
use log::debug;
use serde::Serialize;
use std::fmt::Display;

/// 한 봉 시퀀스에 대한 缠论 구조
///
/// 분형/필/중추 인덱스는 모두 `normalized` 기준입니다.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChanStructure {
    pub normalized: Vec<NormalizedBar>,
    pub fractals: Vec<Fractal>,
    pub strokes: Vec<Stroke>,
    pub centers: Vec<Center>,
}

impl ChanStructure {
    /// 포함 관계 처리부터 중추까지 전체 구조 계산
    pub fn analyze<C: Candle>(bars: &[C], config: &AnalysisConfig) -> ChanStructure {
        let normalized = normalize(bars);
        let fractals = detect_fractals(&normalized);
        let strokes = build_strokes(&fractals, config.stroke_min_separation);
        let centers = build_centers(&strokes, config.center_span);

        debug!(
            "구조 분석: 봉 {} -> 정규화 {}, 분형 {}, 필 {}, 중추 {}",
            bars.len(),
            normalized.len(),
            fractals.len(),
            strokes.len(),
            centers.len()
        );

        ChanStructure {
            normalized,
            fractals,
            strokes,
            centers,
        }
    }

    /// 필 선과 중추 사각형
    pub fn highlights(&self, config: &AnalysisConfig) -> Vec<HighlightShape> {
        let mut shapes = shape::stroke_lines(
            &self.normalized,
            &self.fractals,
            config.shape_min_separation,
        );
        shapes.extend(shape::center_rects(&self.normalized, &self.centers));
        shapes
    }
}

impl Display for ChanStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "정규화 봉: {}, 분형: {}, 필: {}, 중추: {}",
            self.normalized.len(),
            self.fractals.len(),
            self.strokes.len(),
            self.centers.len()
        )
    }
}

/// 缠论 분석기
///
/// 봉 시퀀스 하나에 대해 구조와 지표를 한 번에 계산해 둡니다.
/// 다이버전스는 저장하지 않고 요청한 인덱스에서 새로 계산합니다.
#[derive(Debug, Clone)]
pub struct ChanAnalyzer<C: Candle> {
    pub config: AnalysisConfig,
    /// 원본 봉 (시간순)
    pub candles: Vec<C>,
    pub indicators: IndicatorSet,
    /// 다이버전스/모멘텀 판정에 쓰는 히스토그램 (기본은 `indicators.macd.hist`)
    pub oscillator: Vec<f64>,
    pub structure: ChanStructure,
}

impl<C: Candle> Display for ChanAnalyzer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.candles.last() {
            Some(last) => write!(
                f,
                "마지막 봉: {}, {}, {}",
                last.datetime(),
                self.structure,
                self.indicators
            ),
            None => write!(f, "데이터 없음"),
        }
    }
}

impl<C: Candle> ChanAnalyzer<C> {
    /// 새 분석기 생성
    ///
    /// # Arguments
    /// * `config` - 분석 설정
    /// * `candles` - 시간순 봉 시퀀스
    pub fn new(config: AnalysisConfig, candles: Vec<C>) -> ChanAnalyzer<C> {
        let indicators =
            IndicatorSet::from_candles(&candles, config.macd, config.ma_short, config.ma_long);
        let structure = ChanStructure::analyze(&candles, &config);
        let oscillator = indicators.macd.hist.clone();

        ChanAnalyzer {
            config,
            candles,
            indicators,
            oscillator,
            structure,
        }
    }

    /// 외부에서 받은 히스토그램으로 오실레이터 교체
    ///
    /// 길이가 봉 수와 다르면 범위를 벗어난 인덱스의 판정이 None 이 됩니다.
    pub fn with_oscillator(mut self, hist: Vec<f64>) -> ChanAnalyzer<C> {
        self.oscillator = hist;
        self
    }

    /// 봉 수
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// 봉이 없는지 확인
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 마지막 봉 인덱스
    pub fn last_index(&self) -> Option<usize> {
        self.candles.len().checked_sub(1)
    }

    /// 설정된 비교 구간으로 다이버전스 계산
    pub fn divergence_at(&self, index: usize) -> Option<DivergenceEvent> {
        self.divergence_within(index, self.config.divergence_lookback)
    }

    /// 지정한 비교 구간으로 다이버전스 계산
    pub fn divergence_within(&self, index: usize, lookback: usize) -> Option<DivergenceEvent> {
        detect_divergence(&self.candles, &self.oscillator, index, lookback)
    }

    /// `index` 에서 끝나는 원본 봉 세 개의 분형
    pub fn fractal_ending_at(&self, index: usize) -> Option<Fractal> {
        fractal_ending_at(&self.candles, index)
    }

    /// 이동평균 추세
    pub fn trend_at(&self, index: usize) -> Option<Direction> {
        self.indicators.trend_at(index)
    }

    /// 히스토그램 모멘텀
    pub fn momentum_at(&self, index: usize) -> Option<Momentum> {
        Momentum::at(&self.oscillator, index)
    }

    /// 구조 도형에 현재 분형 상자와 다이버전스 연결선을 더한 강조 도형
    pub fn highlights(
        &self,
        fractal: Option<&Fractal>,
        divergence: Option<&DivergenceEvent>,
    ) -> Vec<HighlightShape> {
        let mut shapes = self.structure.highlights(&self.config);
        if let Some(fractal) = fractal {
            shapes.extend(shape::fractal_box(&self.candles, fractal));
        }
        if let Some(event) = divergence {
            shapes.extend(shape::divergence_connectors(event));
        }
        shapes
    }
}

impl<C: Candle + PartialEq> ChanAnalyzer<C> {
    /// 봉 저장소의 시간순 사본으로 분석기 생성
    pub fn from_storage(config: AnalysisConfig, storage: &CandleStore<C>) -> ChanAnalyzer<C> {
        ChanAnalyzer::new(config, storage.get_time_ordered_items())
    }
}
