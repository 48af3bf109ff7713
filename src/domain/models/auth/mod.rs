//! 인증 도메인 모델
//!
//! - [`auth_request`] - 프레임워크 독립적인 인증 대상 요청
//! - [`auth_config`] - 리소스 단위 인증 설정과 `Resource` trait
//! - [`identity`] - 인증된 주체와 요청 컨텍스트

pub mod auth_config;
pub mod auth_request;
pub mod identity;

pub use auth_config::{AuthConfig, DefaultResource, Resource, RouteResource};
pub use auth_request::AuthRequest;
pub use identity::{Identity, OptionalIdentity, RequestContext, USER_CONTEXT_KEY};
