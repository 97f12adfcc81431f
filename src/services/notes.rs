//! # 노트 서비스
//!
//! 라우트 핸들러가 호출하는 노트 기능의 진입점입니다.
//! 저장소(`NoteStore`)는 생성 시 주입받고, 그 외의 공유 상태는 없습니다.
//!
//! ## 존재 확인 후 쓰기
//! `update_note`와 `toggle_pin_note`는 "확인 → 쓰기" 두 번의 저장소 호출로 이루어지며
//! 트랜잭션으로 묶지 않습니다. 그 사이에 다른 요청이 노트를 지우면 쓰기 결과가 비는데,
//! 이 경우는 `NotFound`가 아니라 `Internal`로 구분해서 돌려줍니다.

use std::sync::Arc;

use chrono::Utc;

use super::query::{NoteFilter, NoteSort, PageWindow};
use crate::db::NoteStore;
use crate::error::AppError;
use crate::models::{
    ListNotesParams, NewNote, Note, NoteChanges, NoteDraft, PaginatedNotes, UpdateNoteRequest,
    DEFAULT_NOTE_COLOR,
};

/// 노트 조회/생성/수정/삭제 서비스
///
/// `Arc<dyn NoteStore>`만 들고 있으므로 clone 비용이 작고,
/// 여러 요청이 동시에 같은 인스턴스를 사용해도 됩니다.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// 필터, 정렬, 페이지네이션을 적용한 노트 목록을 조회합니다.
    ///
    /// ## 처리 흐름
    /// 1. 파라미터 → `NoteFilter` (없는 파라미터는 조건에서 빠짐)
    /// 2. 파라미터 → `NoteSort` (고정 노트 우선, 그 다음 sortBy/sortOrder)
    /// 3. `skip = (page - 1) * limit`
    /// 4. 페이지 조회와 전체 개수 조회를 동시에 실행
    /// 5. `totalPages`, `hasNextPage`, `hasPrevPage`를 계산해 응답 봉투에 담음
    ///
    /// 4번의 두 호출은 서로 독립적이어서, 동시에 쓰기가 일어나면
    /// `total`과 `notes`가 같은 시점의 값이 아닐 수 있습니다.
    pub async fn list_notes(&self, params: &ListNotesParams) -> Result<PaginatedNotes, AppError> {
        let filter = NoteFilter::from_params(params);
        let sort = NoteSort::from_params(params);
        let window = PageWindow::new(params.page, params.limit);

        tracing::debug!(?filter, ?sort, ?window, "listing notes");

        // tokio::try_join!: 두 Future를 동시에 기다리고, 하나라도 에러면 그 에러를 반환합니다.
        let (notes, total) = tokio::try_join!(
            self.store.find_many(&filter, &sort, window),
            self.store.count(&filter),
        )?;

        Ok(PaginatedNotes::assemble(notes, total, params.page, params.limit))
    }

    pub async fn get_note_by_id(&self, id: &str) -> Result<Note, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::note_not_found(id))
    }

    /// 검증된 요청으로 노트를 만듭니다. ID와 생성/수정 시각은 여기서 부여합니다.
    pub async fn create_note(&self, req: NoteDraft) -> Result<Note, AppError> {
        let now = Utc::now();
        let note = NewNote {
            id: uuid::Uuid::now_v7().to_string(),
            title: req.title,
            content: req.content,
            tags: req.tags,
            is_pinned: req.is_pinned,
            color: req.color.unwrap_or_else(|| DEFAULT_NOTE_COLOR.to_string()),
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert(note).await?;
        tracing::info!(id = %created.id, "note created");
        Ok(created)
    }

    /// 요청에 포함된 필드만 바꾸고 `updatedAt`을 갱신합니다.
    pub async fn update_note(&self, id: &str, req: UpdateNoteRequest) -> Result<Note, AppError> {
        if !self.store.exists_by_id(id).await? {
            return Err(AppError::note_not_found(id));
        }

        let changes = NoteChanges::from_request(req, Utc::now());
        let updated = self.store.update_by_id(id, changes).await?.ok_or_else(|| {
            tracing::warn!(id, "note vanished between existence check and update");
            AppError::Internal("Failed to update note. Please try again.".to_string())
        })?;

        tracing::info!(id, "note updated");
        Ok(updated)
    }

    /// 노트를 삭제하고 삭제된 노트를 반환합니다 (호출한 쪽에서 제목을 메시지에 사용).
    pub async fn delete_note(&self, id: &str) -> Result<Note, AppError> {
        let deleted = self
            .store
            .delete_by_id(id)
            .await?
            .ok_or_else(|| AppError::note_not_found(id))?;

        tracing::info!(id, "note deleted");
        Ok(deleted)
    }

    /// 고정 상태를 뒤집습니다.
    pub async fn toggle_pin_note(&self, id: &str) -> Result<Note, AppError> {
        let existing = self.get_note_by_id(id).await?;

        let changes = NoteChanges::pin(!existing.is_pinned, Utc::now());
        let updated = self.store.update_by_id(id, changes).await?.ok_or_else(|| {
            tracing::warn!(id, "note vanished between read and pin toggle");
            AppError::Internal("Failed to toggle pin. Please try again.".to_string())
        })?;

        tracing::info!(id, is_pinned = updated.is_pinned, "note pin toggled");
        Ok(updated)
    }

    /// 모든 노트에 쓰인 태그 (중복 없음)
    pub async fn get_all_tags(&self) -> Result<Vec<String>, AppError> {
        self.store.distinct_tags().await
    }
}
