//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//! - `From` 구현: 검증 에러, 요청 파싱 에러를 `?`로 바로 전파

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 노트가 존재하지 않음 (HTTP 404)
    #[error("{0}")]
    NotFound(String),

    /// 입력값이 스키마 제약(길이, 허용값, 개수)을 위반함 (HTTP 400)
    /// 위반 항목마다 `"필드: 메시지"` 문자열 하나씩 담깁니다.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// 잘못된 요청 (HTTP 400). JSON 파싱 실패처럼 검증 이전 단계의 오류
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 서버 내부 오류 (HTTP 500)
    /// 존재 확인은 통과했는데 쓰기 결과가 비어 있는 경우(동시 삭제 경쟁) 등
    #[error("Internal error: {0}")]
    Internal(String),

    /// 저장소(데이터베이스) 오류 (HTTP 500)
    /// #[from]: sqlx::Error → AppError::Database 자동 변환. 재시도 없이 그대로 전파합니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 저장된 행을 `Note`로 복원하지 못함 (HTTP 500)
    #[error("Corrupt note data: {0}")]
    Data(String),
}

impl AppError {
    /// 노트 ID에 대한 NotFound 에러를 만듭니다.
    pub fn note_not_found(id: &str) -> Self {
        AppError::NotFound(format!("Note with id '{id}' does not exist"))
    }

    /// 어떤 라우트와도 일치하지 않는 요청에 대한 NotFound 에러
    pub fn route_not_found(method: &str, uri: &str) -> Self {
        AppError::NotFound(format!("Route '{method} {uri}' does not exist"))
    }

    /// 에러 종류에 대응하는 HTTP 상태 코드
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::Database(_) | AppError::Data(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Data)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let status = self.status_code();

        // (message, errors) 쌍을 만듭니다. errors는 검증 실패일 때만 채워집니다.
        let (message, errors) = match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => (msg, Vec::new()),
            AppError::Validation(errors) => ("Validation failed".to_string(), errors),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (msg, Vec::new())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ("A database error occurred".to_string(), Vec::new())
            }
            AppError::Data(msg) => {
                tracing::error!("Corrupt note data: {}", msg);
                ("Internal server error".to_string(), Vec::new())
            }
        };

        // 결과: { "statusCode": 404, "success": false, "message": "...", "errors": [...] }
        // 성공 응답(`ApiResponse`)과 같은 최상위 키를 쓰므로 클라이언트는 `message`만 보면 됩니다.
        let body = Json(json!({
            "statusCode": status.as_u16(),
            "success": false,
            "message": message,
            "errors": errors
        }));

        (status, body).into_response()
    }
}

/// validator 크레이트의 에러 묶음을 `"필드: 메시지"` 목록으로 평탄화합니다.
///
/// 구조체 단위(schema) 검증 에러는 `__all__` 키로 들어오므로 필드명 없이 메시지만 남깁니다.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    if field == "__all__" {
                        message
                    } else {
                        format!("{field}: {message}")
                    }
                })
            })
            .collect();
        // HashMap 순회 순서는 매번 달라질 수 있으므로 정렬해서 응답을 안정화합니다.
        messages.sort();
        AppError::Validation(messages)
    }
}

/// JSON 본문 추출 실패
///
/// - 문법은 맞지만 타입이 맞지 않는 본문(`"title": 123` 등)은 검증 실패로 봅니다.
/// - JSON으로 읽을 수 없는 본문이나 Content-Type 누락만 `BadRequest`입니다.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // JsonRejection은 #[non_exhaustive]이므로 `_` 갈래가 필요합니다.
        match rejection {
            JsonRejection::JsonDataError(err) => AppError::Validation(vec![err.body_text()]),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

/// 쿼리 문자열 역직렬화 실패(`sortBy=color`, `page=abc` 등)는 검증 실패입니다.
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(vec![rejection.body_text()])
    }
}
