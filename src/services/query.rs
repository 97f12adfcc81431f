//! # 노트 조회 조건 구성
//!
//! 목록 조회 파라미터(`ListNotesParams`)를 저장소가 이해하는 세 가지 요소로 바꿉니다.
//!
//! 1. `NoteFilter`: 조건(predicate)들의 AND 결합. 조건이 없으면 전체 일치
//! 2. `NoteSort`: 정렬 키 목록. 첫 번째 키는 항상 `is_pinned DESC`
//! 3. `PageWindow`: `skip = (page - 1) * limit`, `limit`
//!
//! 조회 결과와 전체 개수는 `PaginatedNotes::assemble()`로 응답 봉투에 담깁니다.

use crate::models::{ListNotesParams, Note, PaginatedNotes, SortBy, SortOrder};

/// 필터 조건 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotePredicate {
    /// 제목+본문 전문검색. 검색어 중 하나라도 포함된 노트가 일치합니다
    /// (토큰화 규칙과 관련도는 저장소 몫).
    TextSearch(String),
    /// 태그 목록에 이 문자열이 정확히 포함됨 (대소문자 구분, 부분 일치 없음)
    TagEquals(String),
    /// 고정 여부가 같음
    PinnedEquals(bool),
}

/// 조건들의 AND 결합
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    predicates: Vec<NotePredicate>,
}

impl NoteFilter {
    /// 모든 노트와 일치하는 빈 필터
    pub fn match_all() -> Self {
        Self::default()
    }

    /// 조건 하나를 추가한 새 필터 (빌더 패턴: self를 받아 self를 돌려줌)
    pub fn and(mut self, predicate: NotePredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[NotePredicate] {
        &self.predicates
    }

    /// 파라미터 중 값이 있는 것만 조건으로 추가합니다.
    /// 없는 파라미터는 `null`/`false` 비교가 아니라 조건 자체가 빠집니다.
    pub fn from_params(params: &ListNotesParams) -> Self {
        let mut filter = Self::match_all();
        if let Some(search) = &params.search {
            filter = filter.and(NotePredicate::TextSearch(search.clone()));
        }
        if let Some(tag) = &params.tag {
            filter = filter.and(NotePredicate::TagEquals(tag.clone()));
        }
        if let Some(is_pinned) = params.is_pinned {
            filter = filter.and(NotePredicate::PinnedEquals(is_pinned));
        }
        filter
    }
}

/// 정렬 가능한 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    IsPinned,
    CreatedAt,
    UpdatedAt,
    Title,
}

impl From<SortBy> for SortField {
    fn from(sort_by: SortBy) -> Self {
        match sort_by {
            SortBy::CreatedAt => SortField::CreatedAt,
            SortBy::UpdatedAt => SortField::UpdatedAt,
            SortBy::Title => SortField::Title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub order: SortOrder,
}

/// 정렬 키 목록 (앞쪽 키가 우선)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSort {
    keys: Vec<SortKey>,
}

impl NoteSort {
    /// 고정된 노트가 항상 먼저, 그 다음 요청한 필드/방향.
    ///
    /// 두 키가 모두 같은 노트끼리의 순서는 저장소의 자연 순서를 따릅니다.
    pub fn from_params(params: &ListNotesParams) -> Self {
        Self {
            // vec![]: 초기값을 가진 Vec을 만드는 매크로. 앞쪽 키일수록 우선순위가 높습니다.
            keys: vec![
                SortKey {
                    field: SortField::IsPinned,
                    order: SortOrder::Desc,
                },
                SortKey {
                    // From<SortBy> for SortField 구현 덕분에 .into()로 변환됩니다.
                    field: params.sort_by.into(),
                    order: params.sort_order,
                },
            ],
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }
}

/// 가져올 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: u64,
}

impl PageWindow {
    /// `page`는 1부터 시작합니다. 아주 큰 page 값은 u64 최대값으로 포화됩니다.
    pub fn new(page: u64, limit: u64) -> Self {
        // saturating_*: 오버플로 시 패닉하거나 값이 돌아가는 대신 최대/최소값에 멈춥니다.
        Self {
            skip: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }
}

/// `ceil(total / limit)`. total이 0이면 0페이지입니다 (최소 1페이지로 올리지 않음).
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    // div_ceil: 올림 나눗셈. (25, 10) → 3, (30, 10) → 3
    total.div_ceil(limit)
}

impl PaginatedNotes {
    /// 한 페이지의 노트와 전체 개수로 응답 봉투를 만듭니다.
    ///
    /// `total`은 같은 필터로 따로 센 값이라 `notes`와 같은 시점의 값이라는 보장은 없습니다.
    pub fn assemble(notes: Vec<Note>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = total_pages(total, limit);
        Self {
            notes,
            total,
            page,
            limit,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}
