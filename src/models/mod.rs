//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `note`: 노트(Note) 엔티티, 색상 팔레트, 생성/수정 요청 본문
//! - `query`: 노트 목록 조회용 쿼리 파라미터와 페이지네이션 응답
//!
//! `pub use X::*;`로 하위 모듈 항목을 재공개하여
//! `crate::models::Note`처럼 짧게 접근할 수 있게 합니다.

pub mod note;
pub mod query;

pub use note::*;
pub use query::*;
