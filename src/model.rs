use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// 캔들(봉) 데이터에 접근하기 위한 트레이트
///
/// 구조 분석 엔진의 모든 함수는 이 트레이트를 통해 봉 데이터를 읽습니다.
/// 엔진은 입력을 절대 수정하지 않습니다.
pub trait Candle: Clone + Debug {
    /// 시가
    fn open_price(&self) -> f64;
    /// 고가
    fn high_price(&self) -> f64;
    /// 저가
    fn low_price(&self) -> f64;
    /// 종가
    fn close_price(&self) -> f64;
    /// 봉 시각
    fn datetime(&self) -> DateTime<Utc>;
}

/// OHLC 봉
///
/// 상위 데이터 계층이 만들어 넘겨주는 기본 봉 타입입니다.
/// `high >= max(open, close)`, `low <= min(open, close)` 는 가정만 하고 검증하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcCandle {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcCandle {
    /// 새 봉 생성
    pub fn new(datetime: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        OhlcCandle {
            datetime,
            open,
            high,
            low,
            close,
        }
    }
}

impl Display for OhlcCandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Candle({}, o={:.2}, h={:.2}, l={:.2}, c={:.2})",
            self.datetime.format("%Y-%m-%d"),
            self.open,
            self.high,
            self.low,
            self.close
        )
    }
}

impl Candle for OhlcCandle {
    fn open_price(&self) -> f64 {
        self.open
    }

    fn high_price(&self) -> f64 {
        self.high
    }

    fn low_price(&self) -> f64 {
        self.low
    }

    fn close_price(&self) -> f64 {
        self.close
    }

    fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }
}

/// 가격 움직임 방향 (봉 병합 방향, 필(笔) 방향, 추세 방향에 공통 사용)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// 상승
    Up,
    /// 하락
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// 분형(分型) 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FractalKind {
    /// 천정 분형
    Top,
    /// 바닥 분형
    Bottom,
}

impl FractalKind {
    /// 반대 종류
    pub fn opposite(&self) -> FractalKind {
        match self {
            FractalKind::Top => FractalKind::Bottom,
            FractalKind::Bottom => FractalKind::Top,
        }
    }
}

impl Display for FractalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FractalKind::Top => write!(f, "top"),
            FractalKind::Bottom => write!(f, "bottom"),
        }
    }
}

/// 사용자가 시뮬레이터에서 취한 매매 행동
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    /// 매수
    Buy,
    /// 매도
    Sell,
    /// 관망(보유 유지)
    Hold,
}

impl Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "buy"),
            TradeAction::Sell => write!(f, "sell"),
            TradeAction::Hold => write!(f, "hold"),
        }
    }
}

impl std::str::FromStr for TradeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(TradeAction::Buy),
            "sell" => Ok(TradeAction::Sell),
            "hold" => Ok(TradeAction::Hold),
            _ => Err(format!("지원되지 않는 행동: {}", s)),
        }
    }
}

/// 행동 평가 점수 등급
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoreClass {
    /// 근거 없음 / 틀렸을 가능성이 높음 (-1)
    Unjustified,
    /// 중립 / 방어적 (0)
    Neutral,
    /// 근거가 충분함 (1)
    Justified,
}

impl ScoreClass {
    /// 정수 점수 (-1, 0, 1)
    pub fn as_i8(&self) -> i8 {
        match self {
            ScoreClass::Unjustified => -1,
            ScoreClass::Neutral => 0,
            ScoreClass::Justified => 1,
        }
    }
}

impl Display for ScoreClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}
