//! 인증 백엔드 모듈
//!
//! 요청에서 자격 증명을 추출하고 검증하여 Identity를 돌려주는 전략(백엔드)들을 제공합니다.
//! 모든 백엔드는 실행 모드가 명시된 [`Backend`] 핸들로 감싸 미들웨어에 등록합니다.
//!
//! # Backends
//!
//! | 백엔드 | 모드 | 헤더 |
//! |--------|------|------|
//! | [`TokenAuthBackend`] | blocking | `Bearer {token}` |
//! | [`BasicAuthBackend`] | blocking | `Basic base64(user:pass)` |
//! | [`JwtAuthBackend`] | blocking | `JWT {jwt}` |
//! | [`HawkAuthBackend`] | blocking | `Hawk id=.., ts=.., nonce=.., mac=..` |
//! | [`NoneAuthBackend`] | blocking | 없음 |
//! | [`IntrospectionAuthBackend`] | suspending | `Bearer {token}` |
//! | [`MultiAuthBackend`] | 구성에 따름 | 구성 백엔드 순서대로 |
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{Backend, JwtAuthBackend, TokenAuthBackend, claims_as_identity};
//!
//! let backend = Backend::multi(vec![
//!     Backend::blocking(TokenAuthBackend::with_tokens(["abc123"])),
//!     Backend::blocking(JwtAuthBackend::hmac(secret, Algorithm::HS256, claims_as_identity)?),
//! ])?;
//! ```

pub mod backend;
pub mod header;
pub mod token_backend;
pub mod basic_backend;
pub mod jwt_backend;
pub mod hawk_backend;
pub mod none_backend;
pub mod multi_backend;
pub mod introspection_backend;
pub mod factory;

pub use backend::*;
pub use header::*;
pub use token_backend::*;
pub use basic_backend::*;
pub use jwt_backend::*;
pub use hawk_backend::*;
pub use none_backend::*;
pub use multi_backend::*;
pub use introspection_backend::*;
pub use factory::*;
