//! # Domain Module
//!
//! 인증 계층의 도메인 모델을 모아두는 모듈입니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use auth_gateway::domain::auth::{AuthRequest, Identity};
//! use actix_web::http::Method;
//!
//! let req = AuthRequest::new(Method::GET, "/items")
//!     .with_uri_template("/items")
//!     .with_authorization("Bearer abc123");
//! ```

pub mod models;

pub use models::*;
