//! # 비즈니스 로직 계층
//!
//! - `query`: 목록 조회 파라미터를 필터/정렬/페이지 구간으로 옮기는 조회 엔진
//! - `notes`: 라우트 핸들러가 호출하는 노트 서비스

pub mod notes;
pub mod query;

pub use notes::NoteService;
