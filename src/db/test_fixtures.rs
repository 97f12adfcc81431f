//! 테스트 공용 헬퍼: 마이그레이션된 메모리 DB와 노트 생성 함수

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use sqlx::sqlite::SqlitePoolOptions;

use super::SqliteNoteStore;
use crate::models::{NewNote, DEFAULT_NOTE_COLOR};

/// 기준 시각(2024-01-01T00:00:00Z)에서 `seconds`초 뒤
pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::seconds(seconds)
}

/// 메모리 DB는 연결마다 따로 생기므로 연결을 하나로 고정하고 끊기지 않게 합니다.
pub async fn memory_store() -> SqliteNoteStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    super::migrate(&pool).await.unwrap();
    SqliteNoteStore::new(pool)
}

pub fn new_note(title: &str, is_pinned: bool, created_at: DateTime<Utc>) -> NewNote {
    NewNote {
        id: uuid::Uuid::now_v7().to_string(),
        title: title.to_string(),
        content: format!("{title} content"),
        tags: Vec::new(),
        is_pinned,
        color: DEFAULT_NOTE_COLOR.to_string(),
        created_at,
        updated_at: created_at,
    }
}
