//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/v1/health` → `{ "status": "ok" }`
//!
//! 로드밸런서나 컨테이너 헬스체크에서 호출합니다. 데이터베이스는 확인하지 않습니다.

use axum::Json;
use serde_json::{json, Value};

/// 고정된 JSON만 반환하므로 실패하지 않습니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
