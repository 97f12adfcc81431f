//! # 노트 목록 조회 모델
//!
//! `GET /api/v1/notes?search=..&tag=..&isPinned=..&page=..&limit=..&sortBy=..&sortOrder=..`
//!
//! - `NotesQuery`: URL 쿼리 문자열을 그대로 받은 값 (검증 전)
//! - `ListNotesParams`: 검증과 기본값 적용이 끝난 값 (조회 엔진 입력)
//! - `PaginatedNotes`: 페이지네이션 응답 봉투(envelope)

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::Note;
use crate::error::AppError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// 정렬 기준 필드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

/// 정렬 방향. asc = 값의 자연 순서, desc = 역순
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// URL 쿼리 파라미터 (검증 전)
///
/// 숫자 필드를 `i64`로 받는 이유: `page=0`이나 `limit=-5`도 일단 파싱한 뒤
/// 검증 에러로 돌려주기 위해서입니다. `?page=`처럼 값이 비어 있으면 없는 것으로 봅니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NotesQuery {
    #[validate(length(max = 100, message = "Search must not exceed 100 characters"))]
    pub search: Option<String>,
    #[validate(length(max = 30, message = "Tag must not exceed 30 characters"))]
    pub tag: Option<String>,
    pub is_pinned: Option<bool>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

impl NotesQuery {
    /// 공백 제거 → 검증 → 기본값 적용 순서로 `ListNotesParams`를 만듭니다.
    ///
    /// 공백만 있는 `search`/`tag`는 없는 것으로 취급합니다.
    pub fn into_params(self) -> Result<ListNotesParams, AppError> {
        let query = Self {
            search: non_blank(self.search),
            tag: non_blank(self.tag),
            ..self
        };
        query.validate()?;

        Ok(ListNotesParams {
            search: query.search,
            tag: query.tag,
            is_pinned: query.is_pinned,
            // 검증을 통과했으므로 양수입니다.
            page: query.page.map_or(DEFAULT_PAGE, |p| p as u64),
            limit: query.limit.map_or(DEFAULT_LIMIT, |l| l as u64),
            sort_by: query.sort_by.unwrap_or_default(),
            sort_order: query.sort_order.unwrap_or_default(),
        })
    }
}

/// 쿼리 문자열의 숫자 값을 읽습니다. 빈 값(`?page=`)은 `None`.
///
/// 쿼리 문자열의 값은 모두 문자열이므로 먼저 `Option<String>`으로 받은 뒤 직접 파싱합니다.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            // serde::de::Error::custom: 임의의 메시지로 역직렬화 에러를 만듭니다.
            .map_err(|_| serde::de::Error::custom(format!("invalid integer '{value}'"))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 검증과 기본값 적용이 끝난 목록 조회 파라미터
///
/// 조회 엔진은 이 값을 다시 검증하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNotesParams {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub is_pinned: Option<bool>,
    /// 1 이상
    pub page: u64,
    /// 1..=100
    pub limit: u64,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for ListNotesParams {
    fn default() -> Self {
        Self {
            search: None,
            tag: None,
            is_pinned: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// 페이지네이션 응답 봉투
///
/// ```json
/// { "notes": [...], "total": 25, "page": 3, "limit": 10,
///   "totalPages": 3, "hasNextPage": false, "hasPrevPage": true }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedNotes {
    pub notes: Vec<Note>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_gets_defaults() {
        let params = NotesQuery::default().into_params().unwrap();
        assert_eq!(params, ListNotesParams::default());
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert_eq!(params.sort_by, SortBy::CreatedAt);
        assert_eq!(params.sort_order, SortOrder::Desc);
    }

    #[test]
    fn limit_bounds_are_enforced() {
        for bad in [0, 101, -1] {
            let query = NotesQuery {
                limit: Some(bad),
                ..Default::default()
            };
            assert!(matches!(query.into_params(), Err(AppError::Validation(_))), "limit={bad}");
        }
        let query = NotesQuery {
            limit: Some(100),
            ..Default::default()
        };
        assert_eq!(query.into_params().unwrap().limit, 100);
    }

    #[test]
    fn page_must_be_positive() {
        let query = NotesQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(query.into_params().is_err());
    }

    #[test]
    fn blank_search_and_tag_are_dropped() {
        let query = NotesQuery {
            search: Some("   ".to_string()),
            tag: Some(" work ".to_string()),
            ..Default::default()
        };
        let params = query.into_params().unwrap();
        assert_eq!(params.search, None);
        assert_eq!(params.tag.as_deref(), Some("work"));
    }

    #[test]
    fn search_longer_than_100_chars_is_rejected() {
        let query = NotesQuery {
            search: Some("s".repeat(101)),
            ..Default::default()
        };
        assert!(query.into_params().is_err());
    }

    #[test]
    fn sort_enums_use_wire_names() {
        let by: SortBy = serde_json::from_str(r#""updatedAt""#).unwrap();
        let order: SortOrder = serde_json::from_str(r#""asc""#).unwrap();
        assert_eq!(by, SortBy::UpdatedAt);
        assert_eq!(order, SortOrder::Asc);
        assert!(serde_json::from_str::<SortBy>(r#""color""#).is_err());
    }

    /// 라우터와 같은 경로로 URL 쿼리 문자열을 파싱합니다.
    fn parse(uri: &str) -> Result<NotesQuery, axum::extract::rejection::QueryRejection> {
        let uri: axum::http::Uri = uri.parse().unwrap();
        axum::extract::Query::<NotesQuery>::try_from_uri(&uri).map(|q| q.0)
    }

    #[test]
    fn empty_page_and_limit_fall_back_to_defaults() {
        let query = parse("/notes?page=&limit=&search=").unwrap();
        let params = query.into_params().unwrap();
        assert_eq!(params.page, DEFAULT_PAGE);
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert_eq!(params.search, None);
    }

    #[test]
    fn numeric_strings_are_parsed_and_garbage_is_rejected() {
        let query = parse("/notes?page=3&limit=25&isPinned=true").unwrap();
        assert_eq!(query.page, Some(3));
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.is_pinned, Some(true));

        assert!(parse("/notes?page=abc").is_err());
    }
}
