//! 인증 로직을 담당하는 서비스 계층 모듈
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{backend_from_env, Backend};
//!
//! let backend: Backend = backend_from_env()?;
//! ```

pub mod auth;
