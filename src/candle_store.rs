use crate::model::Candle;
use std::cmp::PartialEq;

/// 제한된 크기의 봉 저장소
///
/// 상위 데이터/시뮬레이션 계층이 소유하고 갱신하는 봉 시퀀스입니다.
/// 최대 크기를 초과하면 가장 오래된 봉이 자동으로 제거됩니다.
/// 데이터는 datetime 기준으로 내림차순 정렬되어 저장됩니다 (최신 봉이 먼저 옴).
/// 분석 엔진은 `get_time_ordered_items` 로 시간순 사본만 읽습니다.
#[derive(Debug, Clone)]
pub struct CandleStore<T: Candle> {
    items: Vec<T>,
    pub max_size: usize,
    pub use_duplicated_filter: bool,
}

/// 저장소의 최신 봉이 data 와 동일한지 확인합니다.
fn is_same_item<T: PartialEq>(items: &[T], data: &T) -> bool {
    items.first() == Some(data)
}

impl<T> CandleStore<T>
where
    T: Candle + PartialEq,
{
    /// 새로운 CandleStore 인스턴스를 생성합니다.
    ///
    /// # Arguments
    /// * `items` - 초기 봉 목록 (순서 무관)
    /// * `max_size` - 저장소의 최대 크기
    /// * `use_duplicated_filter` - 중복 봉 필터링 사용 여부
    pub fn new(mut items: Vec<T>, max_size: usize, use_duplicated_filter: bool) -> CandleStore<T> {
        items.sort_by(|a, b| b.datetime().cmp(&a.datetime()));

        if items.len() > max_size {
            items.truncate(max_size);
        }

        CandleStore {
            items,
            max_size,
            use_duplicated_filter,
        }
    }

    /// 봉을 datetime 기준 내림차순 위치에 삽입합니다.
    ///
    /// 저장소가 최대 크기에 도달했다면 가장 오래된 봉이 제거됩니다.
    /// 중복 필터링이 활성화된 경우 최신 봉과 같은 봉은 무시합니다.
    pub fn add(&mut self, data: T) {
        if self.use_duplicated_filter && is_same_item(&self.items, &data) {
            return;
        }

        let insert_idx = self
            .items
            .binary_search_by(|item| data.datetime().cmp(&item.datetime()))
            .unwrap_or_else(|idx| idx);

        self.items.insert(insert_idx, data);

        if self.items.len() > self.max_size {
            self.items.truncate(self.max_size);
        }
    }

    /// 저장된 봉 수
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 저장소가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 가장 최신 봉
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// 최신 봉 기준 인덱스로 봉 조회 (0 = 최신)
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// 내부 슬라이스 (최신 봉이 먼저)
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// 저장된 봉을 시간 순서대로 정렬하여 반환합니다.
    pub fn get_time_ordered_items(&self) -> Vec<T> {
        let mut items = self.items.clone();
        items.reverse();
        items
    }

    /// 시간순 인덱스 `index` 까지 (포함) 잘라낸 시간순 봉 목록
    ///
    /// 시뮬레이터가 "현재 봉" 시점의 데이터만 분석기에 넘길 때 사용합니다.
    /// 인덱스가 범위를 벗어나면 전체를 반환합니다.
    pub fn truncated(&self, index: usize) -> Vec<T> {
        let mut items = self.get_time_ordered_items();
        items.truncate(index.saturating_add(1));
        items
    }
}
