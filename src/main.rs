//! # notesd 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 읽기
//! 4. SQLite 연결 풀 생성과 마이그레이션
//! 5. 저장소 → 서비스 → 라우터 조립
//! 6. HTTP 서버 시작

// ── 모듈 선언 ──
// Rust에서는 파일 시스템 구조가 곧 모듈 구조입니다.
mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use config::Config;
use db::{NoteStore, SqliteNoteStore};
use routes::AppState;
use services::NoteService;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // RUST_LOG 환경변수가 없으면 notesd, tower_http, axum을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notesd=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting notesd on {}", config.bind_addr());

    // 파일 DB라면 상위 디렉토리를 먼저 만듭니다 (mkdir -p와 같음).
    if let Some(parent) = db::sqlite_file_path(&config.database_url)
        .as_deref()
        .and_then(|path| path.parent())
        .filter(|dir| !dir.as_os_str().is_empty())
    {
        if !parent.exists() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
            tracing::info!("Created database directory: {}", parent.display());
        }
    }

    let pool = db::connect(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    tracing::info!("Running database migrations...");
    db::migrate(&pool).await?;

    // 저장소는 트레이트 객체로 서비스에 주입합니다.
    let store: Arc<dyn NoteStore> = Arc::new(SqliteNoteStore::new(pool));
    let state = AppState {
        notes: NoteService::new(store),
    };

    // API는 /api/v1 아래에, 그 외 경로는 JSON 404로 응답합니다.
    let app = routes::app_router(state)
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// `CORS_ORIGIN`이 `*`이면 모든 출처를, 아니면 지정한 출처 하나만 허용합니다.
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allows_any_origin() {
        return Ok(cors.allow_origin(Any));
    }

    let origin = HeaderValue::from_str(config.cors_origin.trim())
        .with_context(|| format!("CORS_ORIGIN is not a valid origin: {}", config.cors_origin))?;
    Ok(cors.allow_origin(origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn config_with_origin(origin: &str) -> Config {
        Config::from_lookup(|key| (key == "CORS_ORIGIN").then(|| origin.to_string())).unwrap()
    }

    /// 브라우저의 사전 요청(preflight)을 흉내 냅니다.
    async fn preflight(config: &Config) -> axum::http::Response<Body> {
        let app = Router::new()
            .route("/api/v1/notes", get(|| async { "ok" }))
            .layer(cors_layer(config).unwrap());

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/v1/notes")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn preflight_allows_only_the_content_type_header() {
        let response = preflight(&config_with_origin("*")).await;
        let headers = response.headers();

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
        assert_eq!(allowed, "content-type");
    }

    #[tokio::test]
    async fn explicit_origin_is_echoed() {
        let response = preflight(&config_with_origin("http://localhost:5173")).await;
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
    }

    #[test]
    fn invalid_origin_is_rejected() {
        assert!(cors_layer(&config_with_origin("bad\norigin")).is_err());
    }
}
