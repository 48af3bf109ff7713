//! # HTTP Request Handlers Module
//!
//! 인증 미들웨어 뒤에 마운트되는 HTTP 핸들러 함수들입니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Client (Browser, Mobile App, API Client)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   AuthMiddleware - 면제 판단, 백엔드 인증          ← Middleware Layer
//! ├─────────────────────────────────────────────┤
//!   Handlers (이 모듈) - Identity 추출기 사용        ← Web Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 인증 정보 사용
//!
//! ```rust,ignore
//! #[get("/me")]
//! pub async fn me(identity: Identity) -> HttpResponse {
//!     // 미들웨어가 인증하지 않은 요청은 401로 거부됨
//!     HttpResponse::Ok().json(identity)
//! }
//!
//! #[get("/items")]
//! pub async fn list_items(identity: OptionalIdentity) -> HttpResponse {
//!     // 면제된 요청에서는 None
//! }
//! ```

pub mod api;
