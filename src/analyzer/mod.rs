// 缠论 구조 분석기 모듈
// 봉 시퀀스 하나에 대한 구조/지표 계산과 차트 강조 도형 생성을 제공합니다.

pub mod chan_analyzer;
pub mod shape;

pub use chan_analyzer::{ChanAnalyzer, ChanStructure};
pub use shape::{ChartPoint, ColorHint, HighlightShape, Panel};
