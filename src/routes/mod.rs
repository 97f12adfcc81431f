//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! - `notes`: 노트 CRUD, 목록 조회, 태그 목록, 고정 토글
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `response`: 성공 응답 봉투 `ApiResponse`

pub mod health;
pub mod notes;
pub mod response;

use axum::{
    extract::OriginalUri,
    http::Method,
    routing::{get, patch},
    Router,
};

use crate::{error::AppError, services::NoteService};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `NoteService`는 내부적으로 `Arc`만 들고 있으므로 clone해도 저장소가 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
}

/// `/api/v1` 아래에 붙일 API 라우터를 만듭니다.
///
/// 경로 파라미터는 axum 0.8 문법(`{id}`)을 씁니다.
/// `/notes/tags`는 고정 경로이므로 `/notes/{id}`보다 우선 매칭됩니다.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route("/notes/tags", get(notes::list_tags))
        .route(
            "/notes/{id}",
            get(notes::get_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/notes/{id}/pin", patch(notes::toggle_pin))
        .route("/health", get(health::health_check))
        .with_state(state)
}

/// 전체 애플리케이션 라우터: API를 `/api/v1` 아래에 붙이고,
/// 일치하는 라우트가 없으면 JSON 404를 돌려줍니다.
///
/// 중첩(nest)된 라우터는 자기 fallback이 없으면 바깥 라우터의 fallback을 물려받으므로
/// `/api/v1/unknown`도 같은 응답을 받습니다.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_router(state))
        .fallback(route_not_found)
}

/// AppError는 IntoResponse를 구현하므로 핸들러가 그대로 반환할 수 있습니다.
///
/// `OriginalUri`: nest로 잘려 나간 접두사(`/api/v1`)까지 포함한 원래 요청 URI
async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::route_not_found(method.as_str(), &uri.to_string())
}
