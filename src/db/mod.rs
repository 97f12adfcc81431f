//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! - `store`: 서비스 계층이 의존하는 `NoteStore` 트레이트
//! - `notes`: `NoteStore`의 SQLite 구현 (`SqliteNoteStore`)
//!
//! 연결 풀 생성과 마이그레이션도 이 모듈에서 처리합니다.

pub mod notes;
pub mod store;

#[cfg(test)]
pub mod test_fixtures;

pub use notes::SqliteNoteStore;
pub use store::NoteStore;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;

/// SQLite 연결 풀을 만듭니다. 데이터베이스 파일이 없으면 새로 만듭니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// `./migrations` 폴더의 SQL 파일을 순서대로 적용합니다.
/// 이미 적용된 마이그레이션은 건너뜁니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// `sqlite:` URL에서 데이터베이스 파일 경로를 꺼냅니다.
///
/// 메모리 데이터베이스이면 `None`을 반환합니다.
/// 예: `sqlite:data/notes.db?mode=rwc` → `data/notes.db`
pub fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_path_is_extracted_from_url() {
        assert_eq!(sqlite_file_path("sqlite:data/notes.db"), Some(PathBuf::from("data/notes.db")));
        assert_eq!(
            sqlite_file_path("sqlite://data/notes.db?mode=rwc"),
            Some(PathBuf::from("data/notes.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/notes"), None);
    }
}
