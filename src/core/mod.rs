//! # Core Module
//!
//! 인증 계층 전반에서 공유하는 핵심 타입을 제공합니다.
//!
//! ## 모듈 구성
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 설정 에러와 인증 실패를 구분하는 전역 에러 타입
//! - **HTTP 통합**: Actix-Web `ResponseError` 구현 (401 + `WWW-Authenticate`)
//! - **AppResult**: `Result<T, AppError>` 별칭

pub mod errors;

pub use errors::*;
