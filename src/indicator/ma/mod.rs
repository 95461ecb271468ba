pub mod ema;
pub mod sma;

pub use ema::{EMA, EMABuilder, ema_series};
pub use sma::{SMA, SMABuilder, sma_series};

use crate::model::Direction;

/// 단기/장기 이동평균 비교로 추세 방향 판단
///
/// 단기 이동평균이 장기 이동평균보다 크면 상승, 아니면 (같은 경우 포함) 하락입니다.
pub fn ma_trend(short_ma: f64, long_ma: f64) -> Direction {
    if short_ma > long_ma {
        Direction::Up
    } else {
        Direction::Down
    }
}
