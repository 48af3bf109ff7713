//! 미들웨어 모듈
//!
//! ActixWeb 요청 처리 파이프라인에 플러그형 인증을 추가합니다.
//!
//! # 구성
//!
//! - [`resolution`] - 전역 설정과 리소스 오버라이드 병합
//! - [`dispatcher`] - 면제 판단, 백엔드 호출, Identity 저장 (actix 독립)
//! - [`auth_middleware`] - 디스패처를 감싸는 actix `Transform`
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::{App, HttpServer};
//! use crate::middlewares::{AuthDispatcher, AuthMiddleware};
//!
//! let dispatcher = Arc::new(AuthDispatcher::builder(backend).exempt_routes(["/health"]).build()?);
//!
//! HttpServer::new(move || {
//!     App::new()
//!         .wrap(
//!             AuthMiddleware::shared(dispatcher.clone())
//!                 .resource("/api/v1/public", AuthConfig::disabled()),
//!         )
//!         .service(/* 라우트들 */)
//! })
//! ```

pub mod auth_middleware;
pub mod dispatcher;
pub mod resolution;
mod auth_inner;

// 미들웨어 재export
pub use auth_middleware::AuthMiddleware;
pub use auth_inner::ResourceRegistry;
pub use dispatcher::{AuthDispatcher, AuthDispatcherBuilder, DispatchOutcome};
pub use resolution::{EffectiveAuth, GlobalAuthSettings};
