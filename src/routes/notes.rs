//! # 노트(Note) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/notes`            → 노트 목록 (검색, 태그, 고정 여부 필터 + 정렬 + 페이지네이션)
//! - `POST   /api/v1/notes`            → 새 노트 생성 (201)
//! - `GET    /api/v1/notes/tags`       → 사용 중인 태그 목록
//! - `GET    /api/v1/notes/{id}`       → 단일 노트 조회
//! - `PATCH  /api/v1/notes/{id}`       → 노트 부분 수정
//! - `DELETE /api/v1/notes/{id}`       → 노트 삭제
//! - `PATCH  /api/v1/notes/{id}/pin`   → 고정 상태 토글
//!
//! ## 추출기(Extractor) 에러 처리
//! `Json<T>`, `Query<T>`를 `Result<_, Rejection>`으로 받으면 파싱 실패가 핸들러까지 전달됩니다.
//! `?`로 `AppError`로 바꿔서 다른 에러와 같은 JSON 모양으로 응답합니다.
//! 타입이 맞지 않는 값은 검증 실패, JSON으로 읽을 수 없는 본문은 `BadRequest`가 됩니다.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use uuid::Uuid;

use super::{response::ApiResponse, AppState};
use crate::{
    error::AppError,
    models::{CreateNoteRequest, Note, NotesQuery, PaginatedNotes, UpdateNoteRequest},
};

/// 경로의 노트 ID가 UUID 형식인지 확인합니다.
fn parse_note_id(id: &str) -> Result<(), AppError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| AppError::Validation(vec!["id: Invalid note id format".to_string()]))
}

/// `GET /notes`
///
/// 쿼리 문자열 검증과 기본값 적용은 `NotesQuery::into_params()`가 담당하고,
/// 실제 조회는 `NoteService::list_notes()`가 합니다.
pub async fn list_notes(
    State(state): State<AppState>,
    query: Result<Query<NotesQuery>, QueryRejection>,
) -> Result<ApiResponse<PaginatedNotes>, AppError> {
    let Query(query) = query?;
    let params = query.into_params()?;

    let result = state.notes.list_notes(&params).await?;
    Ok(ApiResponse::ok("Notes retrieved successfully", result))
}

/// `POST /notes` → 201 Created
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<ApiResponse<Note>, AppError> {
    let Json(req) = payload?;
    let draft = req.validated()?;

    let note = state.notes.create_note(draft).await?;
    Ok(ApiResponse::created("Note created successfully", note))
}

/// `GET /notes/tags`
pub async fn list_tags(State(state): State<AppState>) -> Result<ApiResponse<Vec<String>>, AppError> {
    let tags = state.notes.get_all_tags().await?;
    Ok(ApiResponse::ok("Tags retrieved successfully", tags))
}

/// `GET /notes/{id}`
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Note>, AppError> {
    parse_note_id(&id)?;
    let note = state.notes.get_note_by_id(&id).await?;
    Ok(ApiResponse::ok("Note retrieved successfully", note))
}

/// `PATCH /notes/{id}`
///
/// 본문에 들어 있는 필드만 바뀝니다. 빈 객체 `{}`는 검증 에러입니다.
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<ApiResponse<Note>, AppError> {
    parse_note_id(&id)?;
    let Json(req) = payload?;
    let req = req.validated()?;

    let note = state.notes.update_note(&id, req).await?;
    Ok(ApiResponse::ok("Note updated successfully", note))
}

/// `DELETE /notes/{id}`
///
/// `data`는 항상 `null`이고, 삭제된 노트의 제목은 메시지에 들어갑니다.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Option<Note>>, AppError> {
    parse_note_id(&id)?;
    let deleted = state.notes.delete_note(&id).await?;
    Ok(ApiResponse::ok(
        format!("Note '{}' deleted successfully", deleted.title),
        None,
    ))
}

/// `PATCH /notes/{id}/pin`
pub async fn toggle_pin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Note>, AppError> {
    parse_note_id(&id)?;
    let note = state.notes.toggle_pin_note(&id).await?;
    let message = if note.is_pinned { "Note pinned" } else { "Note unpinned" };
    Ok(ApiResponse::ok(message, note))
}
