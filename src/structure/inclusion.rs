use crate::model::{Candle, Direction};
use chrono::{DateTime, Utc};
use log::trace;
use serde::Serialize;

/// 포함 관계 처리가 끝난 봉
///
/// 병합된 봉의 날짜와 원본 참조는 마지막으로 흡수된 원본 봉을 따릅니다.
/// 원본 봉은 표시용 역참조(`source_index`)로만 남고 수정되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedBar {
    pub high: f64,
    pub low: f64,
    /// 역참조 대상 원본 봉의 시가
    pub open: f64,
    /// 역참조 대상 원본 봉의 종가
    pub close: f64,
    pub datetime: DateTime<Utc>,
    /// 원본 봉 시퀀스에서의 인덱스
    pub source_index: usize,
}

impl NormalizedBar {
    fn from_candle<C: Candle>(candle: &C, source_index: usize) -> NormalizedBar {
        NormalizedBar {
            high: candle.high_price(),
            low: candle.low_price(),
            open: candle.open_price(),
            close: candle.close_price(),
            datetime: candle.datetime(),
            source_index,
        }
    }

    /// 두 봉 중 하나가 다른 하나를 완전히 포함하는지 (같은 경우 포함)
    pub fn has_inclusion(&self, other: &NormalizedBar) -> bool {
        (self.high >= other.high && self.low <= other.low)
            || (other.high >= self.high && other.low <= self.low)
    }
}

impl Candle for NormalizedBar {
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

/// 포함 관계 봉 병합
///
/// 마지막으로 내보낸 봉과 새 봉 사이에 포함 관계가 있으면 현재 방향에 따라 병합합니다.
/// 상승 방향은 고가/저가 모두 큰 쪽, 하락 방향은 모두 작은 쪽을 취합니다.
/// 포함 관계가 없으면 새 고가/새 저가로 방향을 갱신하고 새 봉을 내보냅니다.
/// 입력이 2개 미만이면 그대로 변환만 합니다.
pub fn normalize<C: Candle>(bars: &[C]) -> Vec<NormalizedBar> {
    let mut normalized: Vec<NormalizedBar> = Vec::with_capacity(bars.len());
    let mut direction = Direction::Up;

    for (index, bar) in bars.iter().enumerate() {
        let incoming = NormalizedBar::from_candle(bar, index);

        let Some(last) = normalized.last_mut() else {
            normalized.push(incoming);
            continue;
        };

        if last.has_inclusion(&incoming) {
            let (high, low) = match direction {
                Direction::Up => (last.high.max(incoming.high), last.low.max(incoming.low)),
                Direction::Down => (last.high.min(incoming.high), last.low.min(incoming.low)),
            };
            trace!(
                "포함 관계 병합: 원본 {} -> {} ({}), h={:.2}, l={:.2}",
                last.source_index, index, direction, high, low
            );
            *last = NormalizedBar {
                high,
                low,
                ..incoming
            };
            continue;
        }

        if incoming.high > last.high {
            direction = Direction::Up;
        } else if incoming.low < last.low {
            direction = Direction::Down;
        }
        normalized.push(incoming);
    }

    normalized
}
