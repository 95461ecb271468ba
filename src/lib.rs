pub mod analyzer;
pub mod candle_store;
pub mod config;
pub mod indicator;
pub mod model;
pub mod scorer;
pub mod structure;

/// 설정 로더
pub mod config_loader;

pub use analyzer::{ChanAnalyzer, ChanStructure, HighlightShape};
pub use config::AnalysisConfig;
pub use model::{Candle, Direction, FractalKind, OhlcCandle, ScoreClass, TradeAction};
pub use scorer::{ActionVerdict, LinkageReport, score_action, score_linked, score_linked_from_daily};
