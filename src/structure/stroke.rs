use crate::model::{Direction, FractalKind};
use crate::structure::fractal::Fractal;
use chrono::{DateTime, Utc};
use log::trace;
use serde::Serialize;

/// 필(笔) 성립에 필요한 반대 분형 간 기본 최소 인덱스 차이
pub const DEFAULT_STROKE_MIN_SEPARATION: usize = 4;

/// 필(笔)
///
/// 인덱스는 포함 관계 처리된 봉 시퀀스 기준입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub start_index: usize,
    pub start_price: f64,
    pub start_datetime: DateTime<Utc>,
    pub end_index: usize,
    pub end_price: f64,
    pub end_datetime: DateTime<Utc>,
    pub direction: Direction,
}

impl Stroke {
    fn between(start: &Fractal, end: &Fractal) -> Stroke {
        let direction = if end.price > start.price {
            Direction::Up
        } else {
            Direction::Down
        };

        Stroke {
            start_index: start.index,
            start_price: start.price,
            start_datetime: start.datetime,
            end_index: end.index,
            end_price: end.price,
            end_datetime: end.datetime,
            direction,
        }
    }

    /// 필의 가격 구간 상단
    pub fn high(&self) -> f64 {
        self.start_price.max(self.end_price)
    }

    /// 필의 가격 구간 하단
    pub fn low(&self) -> f64 {
        self.start_price.min(self.end_price)
    }
}

/// 분형 채택 규칙
///
/// * 같은 종류가 연속되면 더 극단적인 쪽으로 교체합니다 (추가하지 않음).
/// * 반대 종류는 마지막 채택 분형과의 인덱스 차이가 `min_separation` 이상이고,
///   천정이 바닥보다 높을 때만 새 끝점으로 채택합니다.
///
/// 상태는 마지막 채택 분형 하나뿐이므로 왼쪽에서 오른쪽으로 한 번 접어서 처리합니다.
pub fn admit_fractals(fractals: &[Fractal], min_separation: usize) -> Vec<Fractal> {
    fractals.iter().fold(Vec::new(), |mut admitted, fractal| {
        let Some(last) = admitted.last_mut() else {
            admitted.push(fractal.clone());
            return admitted;
        };

        if last.kind == fractal.kind {
            if fractal.is_more_extreme_than(last) {
                trace!(
                    "같은 종류 분형 교체: {} {} -> {}",
                    fractal.kind, last.index, fractal.index
                );
                *last = fractal.clone();
            }
            return admitted;
        }

        let separated = fractal.index >= last.index + min_separation;
        let ordered = match fractal.kind {
            FractalKind::Top => fractal.price > last.price,
            FractalKind::Bottom => fractal.price < last.price,
        };

        if separated && ordered {
            admitted.push(fractal.clone());
        }
        admitted
    })
}

/// 채택된 분형을 이어 필 목록 생성
pub fn connect_strokes(admitted: &[Fractal]) -> Vec<Stroke> {
    admitted
        .windows(2)
        .filter(|pair| pair[0].kind != pair[1].kind)
        .map(|pair| Stroke::between(&pair[0], &pair[1]))
        .collect()
}

/// 분형 목록에서 필 목록 생성
pub fn build_strokes(fractals: &[Fractal], min_separation: usize) -> Vec<Stroke> {
    connect_strokes(&admit_fractals(fractals, min_separation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fractal(index: usize, kind: FractalKind, price: f64) -> Fractal {
        Fractal {
            index,
            kind,
            price,
            datetime: Utc.timestamp_opt(index as i64 * 86_400, 0).unwrap(),
        }
    }

    #[test]
    fn test_same_kind_keeps_more_extreme() {
        let fractals = vec![
            fractal(1, FractalKind::Bottom, 10.0),
            fractal(3, FractalKind::Bottom, 9.0),
            fractal(5, FractalKind::Bottom, 9.5),
        ];
        let admitted = admit_fractals(&fractals, 4);
        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].index, 3);
        assert_eq!(admitted[0].price, 9.0);
    }

    #[test]
    fn test_min_separation() {
        let fractals = vec![
            fractal(1, FractalKind::Bottom, 10.0),
            fractal(4, FractalKind::Top, 12.0),
            fractal(5, FractalKind::Top, 12.5),
        ];
        let admitted = admit_fractals(&fractals, 4);
        // 4 는 간격 3 으로 거부, 5 는 간격 4 로 채택
        assert_eq!(admitted.len(), 2);
        assert_eq!(admitted[1].index, 5);
    }

    #[test]
    fn test_strokes_alternate() {
        let fractals = vec![
            fractal(1, FractalKind::Bottom, 10.0),
            fractal(6, FractalKind::Top, 14.0),
            fractal(11, FractalKind::Bottom, 11.0),
            fractal(16, FractalKind::Top, 15.0),
        ];
        let strokes = build_strokes(&fractals, 4);
        assert_eq!(strokes.len(), 3);
        assert_eq!(strokes[0].direction, Direction::Up);
        assert_eq!(strokes[1].direction, Direction::Down);
        assert_eq!(strokes[2].direction, Direction::Up);
        assert_eq!(strokes[1].high(), 14.0);
        assert_eq!(strokes[1].low(), 11.0);
    }

    #[test]
    fn test_inverted_opposite_fractal_rejected() {
        // 바닥보다 낮은 천정은 필의 끝점이 될 수 없음
        let fractals = vec![
            fractal(1, FractalKind::Bottom, 10.0),
            fractal(6, FractalKind::Top, 9.5),
            fractal(8, FractalKind::Bottom, 8.0),
        ];
        let admitted = admit_fractals(&fractals, 4);
        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].price, 8.0);
        assert!(build_strokes(&fractals, 4).is_empty());
    }

    #[test]
    fn test_empty() {
        assert!(build_strokes(&[], 4).is_empty());
    }
}
