use crate::structure::stroke::Stroke;
use chrono::{DateTime, Utc};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 중추 표시 구간 선택
///
/// `Core` 는 두 번째 필의 끝에서, `Full` 은 세 번째 필의 끝에서 중추를 닫습니다.
/// 세 번째 필은 중추를 빠져나가는 필이므로 기본값은 `Core` 입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CenterSpan {
    #[default]
    Core,
    Full,
}

/// 중추(中枢)
///
/// 가격 구간은 `[range_low, range_high]` (ZD, ZG) 이며 항상 `range_high > range_low` 입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Center {
    pub start_index: usize,
    pub end_index: usize,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    /// ZG
    pub range_high: f64,
    /// ZD
    pub range_low: f64,
}

impl Center {
    /// 연속된 세 필로 원시 중추 생성 (겹치는 구간이 없으면 None)
    pub fn from_triple(b1: &Stroke, b2: &Stroke, b3: &Stroke, span: CenterSpan) -> Option<Center> {
        let range_high = b1.high().min(b2.high()).min(b3.high());
        let range_low = b1.low().max(b2.low()).max(b3.low());
        if range_high <= range_low {
            return None;
        }

        let end = match span {
            CenterSpan::Core => b2,
            CenterSpan::Full => b3,
        };

        Some(Center {
            start_index: b1.end_index,
            end_index: end.end_index,
            start_datetime: b1.end_datetime,
            end_datetime: end.end_datetime,
            range_high,
            range_low,
        })
    }

    /// 두 중추의 가격 구간이 겹치는지 확인 (경계만 닿는 경우는 제외)
    pub fn overlaps(&self, other: &Center) -> bool {
        self.range_low.max(other.range_low) < self.range_high.min(other.range_high)
    }

    /// 다른 중추를 흡수 (가격 구간은 합집합, 시간 구간은 양쪽을 모두 덮도록 확장)
    fn absorb(&mut self, other: &Center) {
        self.range_high = self.range_high.max(other.range_high);
        self.range_low = self.range_low.min(other.range_low);
        if other.start_index < self.start_index {
            self.start_index = other.start_index;
            self.start_datetime = other.start_datetime;
        }
        if other.end_index > self.end_index {
            self.end_index = other.end_index;
            self.end_datetime = other.end_datetime;
        }
    }
}

impl Display for Center {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Center[{}..{}]: ZD={:.2}, ZG={:.2}",
            self.start_index, self.end_index, self.range_low, self.range_high
        )
    }
}

/// 연속된 모든 세 필 조합에서 원시 중추 생성
pub fn raw_centers(strokes: &[Stroke], span: CenterSpan) -> Vec<Center> {
    strokes
        .windows(3)
        .filter_map(|w| Center::from_triple(&w[0], &w[1], &w[2], span))
        .collect()
}

/// 원시 중추를 순서대로 병합
///
/// 마지막 중추(진행 중인 중추)와 겹치면 흡수하고, 아니면 새 중추를 시작합니다.
/// 흡수로 구간이 넓어져 직전에 닫힌 중추와 겹치게 되면 그 중추로 다시 합칩니다.
/// 결과 목록에서 이웃한 두 중추는 겹치지 않습니다.
pub fn merge_centers(raw: Vec<Center>) -> Vec<Center> {
    raw.into_iter().fold(Vec::new(), |mut merged: Vec<Center>, center| {
        let absorbed = match merged.last_mut() {
            Some(running) if running.overlaps(&center) => {
                running.absorb(&center);
                true
            }
            _ => false,
        };
        if !absorbed {
            merged.push(center);
            return merged;
        }

        while merged.len() >= 2 && merged[merged.len() - 2].overlaps(&merged[merged.len() - 1]) {
            let Some(grown) = merged.pop() else {
                break;
            };
            if let Some(previous) = merged.last_mut() {
                trace!("닫힌 중추 재병합: {} <- {}", previous, grown);
                previous.absorb(&grown);
            }
        }
        merged
    })
}

/// 필 목록에서 최종 중추 목록 생성
pub fn build_centers(strokes: &[Stroke], span: CenterSpan) -> Vec<Center> {
    merge_centers(raw_centers(strokes, span))
}
