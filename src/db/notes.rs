//! # 노트 데이터베이스 쿼리 모듈
//!
//! `NoteStore` 트레이트의 SQLite 구현입니다.
//!
//! ## 테이블 구조
//! - `notes`: 노트 본체. 태그는 JSON 배열 텍스트로 저장합니다.
//! - `notes_fts`: 제목+본문 FTS5 외부 콘텐츠 인덱스. 트리거가 `notes`와 동기화합니다.
//!
//! ## 동적 쿼리
//! 필터 조건은 요청마다 달라지므로 `sqlx::QueryBuilder`로 WHERE 절을 조립합니다.
//! 값은 모두 `push_bind()`로 바인딩하고, 컬럼명과 정렬 방향은
//! 열거형에서 고정 문자열로만 만들어지므로 SQL 인젝션 여지가 없습니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::store::NoteStore;
use crate::error::AppError;
use crate::models::{NewNote, Note, NoteChanges, SortOrder};
use crate::services::query::{NoteFilter, NotePredicate, NoteSort, PageWindow, SortField};

const NOTE_COLUMNS: &str = "id, title, content, tags, is_pinned, color, created_at, updated_at";

/// `notes` 테이블 한 행. 태그(JSON)와 시각(텍스트)은 `Note`로 옮길 때 파싱합니다.
#[derive(Debug, sqlx::FromRow)]
struct NoteRow {
    id: String,
    title: String,
    content: String,
    tags: String,
    is_pinned: i64,
    color: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<NoteRow> for Note {
    type Error = AppError;

    fn try_from(row: NoteRow) -> Result<Self, Self::Error> {
        let tags: Vec<String> = serde_json::from_str(&row.tags)
            .map_err(|e| AppError::Data(format!("note {}: invalid tags: {e}", row.id)))?;
        let created_at = parse_timestamp(&row.id, &row.created_at)?;
        let updated_at = parse_timestamp(&row.id, &row.updated_at)?;

        Ok(Note {
            id: row.id,
            title: row.title,
            content: row.content,
            tags,
            is_pinned: row.is_pinned != 0,
            color: row.color,
            created_at,
            updated_at,
        })
    }
}

/// 고정 폭 RFC 3339 문자열 (마이크로초, UTC).
/// 폭이 항상 같아서 문자열 정렬 순서가 곧 시간 순서입니다.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

fn parse_timestamp(id: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AppError::Data(format!("note {id}: invalid timestamp '{value}': {e}")))
}

fn encode_tags(tags: &[String]) -> Result<String, AppError> {
    serde_json::to_string(tags).map_err(|e| AppError::Internal(format!("Failed to encode tags: {e}")))
}

/// 사용자 검색어를 FTS5 MATCH 식으로 바꿉니다.
///
/// 공백으로 나눈 각 단어를 큰따옴표 문자열로 감싸고 OR로 잇습니다.
/// 예: `rust "async"` → `"rust" OR """async"""`
/// 따옴표로 감싸면 `AND`, `NEAR`, `*` 같은 FTS5 문법이 그냥 단어로 취급됩니다.
/// 글자나 숫자가 하나도 없는 단어는 토큰이 되지 않으므로 버립니다.
/// 남는 단어가 없으면 `None`.
fn fts_match_expression(search: &str) -> Option<String> {
    let terms: Vec<String> = search
        .split_whitespace()
        .filter(|term| term.chars().any(char::is_alphanumeric))
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

/// SQLite 정수는 i64이므로 u64 값은 i64 최대값으로 잘라 바인딩합니다.
fn to_sql_int(value: u64) -> i64 {
    // try_from: 범위를 벗어나면 Err를 돌려주는 변환 (`as`처럼 조용히 잘리지 않음)
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::IsPinned => "notes.is_pinned",
        SortField::CreatedAt => "notes.created_at",
        SortField::UpdatedAt => "notes.updated_at",
        SortField::Title => "notes.title",
    }
}

/// WHERE 절을 붙입니다. 조건이 없으면 아무것도 붙이지 않습니다(전체 일치).
fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &NoteFilter) {
    // enumerate(): (인덱스, 값) 쌍으로 순회. 첫 조건 앞에만 WHERE, 나머지는 AND
    for (i, predicate) in filter.predicates().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        match predicate {
            NotePredicate::TextSearch(search) => match fts_match_expression(search) {
                Some(expression) => {
                    // push()는 SQL 조각을 그대로 붙이고, push_bind()는 `?` 자리표시자와 값을 붙입니다.
                    builder
                        .push("notes.seq IN (SELECT rowid FROM notes_fts WHERE notes_fts MATCH ")
                        .push_bind(expression)
                        .push(")");
                }
                // 검색할 단어가 없으면 어떤 노트도 일치하지 않습니다.
                None => {
                    builder.push("0 = 1");
                }
            },
            NotePredicate::TagEquals(tag) => {
                // json_each(): JSON 배열을 행으로 펼치는 SQLite 테이블 함수
                builder
                    .push("EXISTS (SELECT 1 FROM json_each(notes.tags) WHERE json_each.value = ")
                    .push_bind(tag.clone())
                    .push(")");
            }
            NotePredicate::PinnedEquals(is_pinned) => {
                builder.push("notes.is_pinned = ").push_bind(*is_pinned);
            }
        }
    }
}

/// ORDER BY 절을 붙입니다. 마지막 키로 삽입 순서(seq)를 두어 동률을 고정합니다.
fn push_order_by(builder: &mut QueryBuilder<'_, Sqlite>, sort: &NoteSort) {
    builder.push(" ORDER BY ");
    for key in sort.keys() {
        builder.push(sort_column(key.field));
        builder.push(match key.order {
            SortOrder::Asc => " ASC, ",
            SortOrder::Desc => " DESC, ",
        });
    }
    builder.push("notes.seq ASC");
}

/// SQLite 기반 노트 저장소
///
/// `SqlitePool`은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Debug, Clone)]
pub struct SqliteNoteStore {
    pool: SqlitePool,
}

impl SqliteNoteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn insert(&self, note: NewNote) -> Result<Note, AppError> {
        sqlx::query(
            r#"
            INSERT INTO notes (id, title, content, tags, is_pinned, color, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(encode_tags(&note.tags)?)
        .bind(note.is_pinned)
        .bind(&note.color)
        .bind(format_timestamp(&note.created_at))
        .bind(format_timestamp(&note.updated_at))
        .execute(&self.pool)
        .await?;

        // 저장된 그대로(정밀도가 잘린 시각 포함)를 돌려주기 위해 다시 조회합니다.
        self.find_by_id(&note.id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to retrieve created note".to_string()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Note>, AppError> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?");
        let row = sqlx::query_as::<_, NoteRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        // Option<Result<Note, _>> → Result<Option<Note>, _>
        // transpose(): 행이 없으면 Ok(None), 변환에 실패하면 Err로 뒤집습니다.
        row.map(Note::try_from).transpose()
    }

    async fn find_many(
        &self,
        filter: &NoteFilter,
        sort: &NoteSort,
        window: PageWindow,
    ) -> Result<Vec<Note>, AppError> {
        // QueryBuilder: 조건 개수가 요청마다 달라지는 SQL을 조각조각 이어 붙이는 빌더
        let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {NOTE_COLUMNS} FROM notes"));
        push_filter(&mut builder, filter);
        push_order_by(&mut builder, sort);
        builder
            .push(" LIMIT ")
            .push_bind(to_sql_int(window.limit))
            .push(" OFFSET ")
            .push_bind(to_sql_int(window.skip));

        tracing::debug!(sql = builder.sql(), "find_many");

        // build_query_as: 결과 행을 FromRow 구조체(NoteRow)로 바로 매핑합니다.
        let rows = builder
            .build_query_as::<NoteRow>()
            .fetch_all(&self.pool)
            .await?;

        // Iterator<Item = Result<T, E>>를 Result<Vec<T>, E>로 collect: 하나라도 실패하면 첫 에러를 반환
        rows.into_iter().map(Note::try_from).collect()
    }

    async fn count(&self, filter: &NoteFilter) -> Result<u64, AppError> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM notes");
        push_filter(&mut builder, filter);

        let total: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        // COUNT(*)는 음수가 될 수 없지만 SQLite 정수는 i64이므로 0 아래를 잘라낸 뒤 변환합니다.
        Ok(total.max(0) as u64)
    }

    async fn update_by_id(&self, id: &str, changes: NoteChanges) -> Result<Option<Note>, AppError> {
        // PATCH: 값이 있는 필드만 SET 절에 넣습니다. updated_at은 항상 갱신합니다.
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE notes SET updated_at = ");
        builder.push_bind(format_timestamp(&changes.updated_at));

        if let Some(title) = changes.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(content) = changes.content {
            builder.push(", content = ").push_bind(content);
        }
        if let Some(tags) = changes.tags {
            builder.push(", tags = ").push_bind(encode_tags(&tags)?);
        }
        if let Some(is_pinned) = changes.is_pinned {
            builder.push(", is_pinned = ").push_bind(is_pinned);
        }
        if let Some(color) = changes.color {
            builder.push(", color = ").push_bind(color);
        }

        builder.push(" WHERE id = ").push_bind(id.to_string());
        // RETURNING: 갱신된 행을 같은 문장에서 돌려받습니다. 행이 없으면 결과도 없습니다.
        builder.push(format!(" RETURNING {NOTE_COLUMNS}"));

        let row = builder
            .build_query_as::<NoteRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(Note::try_from).transpose()
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Note>, AppError> {
        let sql = format!("DELETE FROM notes WHERE id = ? RETURNING {NOTE_COLUMNS}");
        let row = sqlx::query_as::<_, NoteRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Note::try_from).transpose()
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, AppError> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(found != 0)
    }

    async fn distinct_tags(&self) -> Result<Vec<String>, AppError> {
        let tags: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT tag.value
            FROM notes, json_each(notes.tags) AS tag
            ORDER BY tag.value
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }
}
