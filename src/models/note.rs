//! # 노트 모델 정의
//!
//! 노트(Note)는 이 애플리케이션의 유일한 엔티티입니다.
//!
//! ## 구조체 역할
//! - `Note`: 저장소에 저장된 노트 (응답용)
//! - `NewNote`: 저장소에 삽입할 완성된 노트 (ID, 타임스탬프 포함)
//! - `NoteChanges`: 부분 업데이트에 쓰일 변경 필드 모음
//! - `CreateNoteRequest` / `UpdateNoteRequest`: 클라이언트가 보내는 JSON 본문
//!
//! 색상 팔레트(`NOTE_COLORS`)는 이 파일에 한 번만 정의하고
//! 검증과 기본값 적용 모두 이 상수를 참조합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// 노트에 허용되는 8가지 배경 색상
pub const NOTE_COLORS: [&str; 8] = [
    "#1A1A24", "#2A2410", "#0F2318", "#0F1A2E", "#2A0F0F", "#1A0F2A", "#2A1A0A", "#0A2020",
];

/// 색상을 지정하지 않았을 때 사용하는 팔레트의 첫 번째 색상
pub const DEFAULT_NOTE_COLOR: &str = NOTE_COLORS[0];

/// 태그 하나의 최대 길이 (문자 수)
pub const MAX_TAG_LENGTH: usize = 30;

/// 색상이 팔레트에 포함되어 있는지 확인합니다.
pub fn is_palette_color(color: &str) -> bool {
    NOTE_COLORS.contains(&color)
}

/// 노트 엔티티. DB의 `notes` 테이블 한 행(row)에 대응합니다.
///
/// JSON으로 나갈 때는 `isPinned`, `createdAt`처럼 camelCase 이름을 사용합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// 노트 고유 식별자 (UUIDv7 문자열). 생성 후 변경되지 않습니다.
    pub id: String,
    pub title: String,
    pub content: String,
    /// 입력 순서를 그대로 유지합니다 (중복 허용)
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub color: String,
    pub created_at: DateTime<Utc>,
    /// 모든 수정(부분 업데이트, 고정 토글)마다 갱신됩니다.
    pub updated_at: DateTime<Utc>,
}

/// 저장소에 삽입할 노트.
///
/// ID와 타임스탬프는 서비스 계층이 채웁니다. 저장소는 받은 값을 그대로 저장합니다.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 부분 업데이트로 바꿀 필드들. `None`인 필드는 변경하지 않습니다.
///
/// `updated_at`만은 항상 새 값으로 덮어씁니다.
#[derive(Debug, Clone)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
    pub color: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl NoteChanges {
    /// 고정 상태만 바꾸는 변경 묶음
    pub fn pin(is_pinned: bool, updated_at: DateTime<Utc>) -> Self {
        Self {
            title: None,
            content: None,
            tags: None,
            is_pinned: Some(is_pinned),
            color: None,
            updated_at,
        }
    }

    pub fn from_request(req: UpdateNoteRequest, updated_at: DateTime<Utc>) -> Self {
        Self {
            title: req.title,
            content: req.content,
            tags: req.tags,
            is_pinned: req.is_pinned,
            color: req.color,
            updated_at,
        }
    }
}

/// 노트 생성 요청: `POST /api/v1/notes`의 요청 본문
///
/// `title`/`content`를 Option으로 받는 이유: 필드가 빠진 본문도 일단 역직렬화한 뒤
/// `required` 검증으로 `"title: Title is required"` 같은 검증 에러를 돌려주기 위해서입니다.
///
/// 길이 제약은 필드 단위 derive로, 태그 항목 길이와 색상 팔레트 검사는
/// 구조체 단위 함수(`validate_create_note`)로 확인합니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_note", skip_on_field_errors = false))]
pub struct CreateNoteRequest {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Content is required"),
        length(min = 1, max = 10000, message = "Content must be between 1 and 10000 characters")
    )]
    pub content: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10, message = "A note can have at most 10 tags"))]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_pinned: bool,
    /// None이면 `DEFAULT_NOTE_COLOR`가 적용됩니다.
    pub color: Option<String>,
}

/// 검증을 통과한 생성 요청. 필수 필드가 채워져 있음이 타입으로 보장됩니다.
#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub color: Option<String>,
}

impl CreateNoteRequest {
    /// 앞뒤 공백을 제거한 뒤 검증합니다. 길이 제약은 공백 제거 후 기준입니다.
    pub fn validated(self) -> Result<NoteDraft, AppError> {
        let req = Self {
            title: self.title.map(|t| t.trim().to_string()),
            content: self.content.map(|c| c.trim().to_string()),
            tags: trim_tags(self.tags),
            ..self
        };
        req.validate()?;

        // `required` 검증을 통과했으므로 두 값 모두 Some입니다.
        // let-else: 패턴이 맞지 않으면 else 블록에서 반드시 함수를 빠져나가야 합니다.
        let (Some(title), Some(content)) = (req.title, req.content) else {
            return Err(AppError::Validation(vec![
                "title: Title is required".to_string(),
                "content: Content is required".to_string(),
            ]));
        };

        Ok(NoteDraft {
            title,
            content,
            tags: req.tags,
            is_pinned: req.is_pinned,
            color: req.color,
        })
    }
}

/// 노트 수정 요청: `PATCH /api/v1/notes/{id}`의 요청 본문
///
/// 모든 필드가 Option인 이유: 부분 업데이트이므로 보낸 필드만 바뀝니다.
/// 단, 최소한 하나의 필드는 있어야 합니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_note", skip_on_field_errors = false))]
pub struct UpdateNoteRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 10000, message = "Content must be between 1 and 10000 characters"))]
    pub content: Option<String>,
    #[validate(length(max = 10, message = "A note can have at most 10 tags"))]
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
    pub color: Option<String>,
}

impl UpdateNoteRequest {
    pub fn validated(self) -> Result<Self, AppError> {
        let req = Self {
            title: self.title.map(|t| t.trim().to_string()),
            content: self.content.map(|c| c.trim().to_string()),
            tags: self.tags.map(trim_tags),
            ..self
        };
        req.validate()?;
        Ok(req)
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.is_pinned.is_none()
            && self.color.is_none()
    }
}

fn trim_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter().map(|t| t.trim().to_string()).collect()
}

fn schema_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn check_tags(tags: &[String]) -> Result<(), ValidationError> {
    let out_of_range = tags.iter().any(|tag| {
        let len = tag.chars().count();
        len == 0 || len > MAX_TAG_LENGTH
    });
    if out_of_range {
        return Err(schema_error(
            "invalid_tag",
            "tags: Each tag must be between 1 and 30 characters",
        ));
    }
    Ok(())
}

fn check_color(color: &str) -> Result<(), ValidationError> {
    if !is_palette_color(color) {
        return Err(schema_error("invalid_color", "color: Invalid note color selected"));
    }
    Ok(())
}

fn validate_create_note(req: &CreateNoteRequest) -> Result<(), ValidationError> {
    check_tags(&req.tags)?;
    if let Some(color) = &req.color {
        check_color(color)?;
    }
    Ok(())
}

fn validate_update_note(req: &UpdateNoteRequest) -> Result<(), ValidationError> {
    if req.is_empty() {
        return Err(schema_error(
            "empty_update",
            "At least one field must be provided for update",
        ));
    }
    if let Some(tags) = &req.tags {
        check_tags(tags)?;
    }
    if let Some(color) = &req.color {
        check_color(color)?;
    }
    Ok(())
}
