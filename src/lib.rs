//! 플러그형 인증 게이트웨이
//!
//! 모든 요청을 가로채 인증 필요 여부를 판단하고, 교체 가능한 백엔드 전략으로
//! 자격 증명을 검증한 뒤, 결과 Identity를 요청 컨텍스트에 저장하는
//! Actix-web 미들웨어입니다.
//!
//! # Features
//!
//! - **백엔드 전략**: Token, Basic, JWT, Hawk, None, Introspection, Multi
//! - **실행 모드**: blocking / suspending 백엔드를 `Backend` 타입으로 구분
//! - **리소스 오버라이드**: 라우트별 백엔드, 면제 메서드, 인증 비활성화
//! - **WebSocket**: 업그레이드 요청의 인증 실패는 핸들러에 위임
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ AuthMiddleware  │ ← actix Transform
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ AuthDispatcher  │ ← 면제 판단, 결과 저장
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   resolution    │ ← 전역 설정 + 리소스 오버라이드
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     Backend     │ ← 자격 증명 검증
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use auth_gateway::domain::auth::AuthConfig;
//! use auth_gateway::middlewares::{AuthDispatcher, AuthMiddleware};
//! use auth_gateway::services::auth::{Backend, TokenAuthBackend};
//!
//! let dispatcher = AuthDispatcher::builder(Backend::blocking(TokenAuthBackend::with_tokens(["abc123"])))
//!     .exempt_routes(["/health"])
//!     .build()?;
//!
//! App::new().wrap(AuthMiddleware::new(dispatcher).resource("/public", AuthConfig::disabled()));
//! ```

pub mod core;
pub mod config;
pub mod domain;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
