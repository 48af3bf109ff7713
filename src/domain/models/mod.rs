//! # Domain Models Module
//!
//! 인증 미들웨어가 다루는 값 객체를 정의합니다.
//!
//! ```text
//! Domain Layer
//! └── models/
//!     └── auth/        ← AuthRequest, AuthConfig, Resource, Identity
//! ```
//!
//! 모든 모델은 요청 단위로 생성되고 요청이 끝나면 폐기됩니다.
//! 코어는 어떤 모델도 영속화하지 않습니다.

pub mod auth;
