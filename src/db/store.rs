//! # 노트 저장소 트레이트
//!
//! 서비스 계층이 의존하는 저장소 기능의 경계입니다.
//! 실제 구현은 `SqliteNoteStore`이고, 테스트에서는 감싸는 구현으로 바꿔 끼울 수 있습니다.
//!
//! `#[async_trait]`를 쓰는 이유: `Arc<dyn NoteStore>`처럼 트레이트 객체로 주입하려면
//! async 메서드가 박싱된 Future를 반환해야 합니다.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewNote, Note, NoteChanges};
use crate::services::query::{NoteFilter, NoteSort, PageWindow};

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// 노트를 저장하고 저장된 모습 그대로 반환합니다.
    async fn insert(&self, note: NewNote) -> Result<Note, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Note>, AppError>;

    /// 필터와 정렬을 적용한 뒤 `window` 구간만 반환합니다.
    async fn find_many(
        &self,
        filter: &NoteFilter,
        sort: &NoteSort,
        window: PageWindow,
    ) -> Result<Vec<Note>, AppError>;

    /// 필터와 일치하는 전체 노트 수 (페이지와 무관)
    async fn count(&self, filter: &NoteFilter) -> Result<u64, AppError>;

    /// 주어진 필드만 바꾼 뒤 갱신된 노트를 반환합니다. 노트가 없으면 `None`.
    async fn update_by_id(&self, id: &str, changes: NoteChanges) -> Result<Option<Note>, AppError>;

    /// 노트를 삭제하고 삭제된 노트를 반환합니다. 노트가 없으면 `None`.
    async fn delete_by_id(&self, id: &str) -> Result<Option<Note>, AppError>;

    async fn exists_by_id(&self, id: &str) -> Result<bool, AppError>;

    /// 모든 노트에 걸친 중복 없는 태그 목록
    async fn distinct_tags(&self) -> Result<Vec<String>, AppError>;
}
