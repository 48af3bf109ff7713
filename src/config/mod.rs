//! # Configuration Module
//!
//! 인증 게이트웨이의 설정 관리를 담당하는 모듈입니다.
//! 모든 설정값은 환경 변수에서 읽으며, 누락된 값은 기본값으로 대체됩니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버 바인딩, Rate Limiting 설정
//! - [`auth_config`] - 인증 미들웨어 및 백엔드별 설정
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{AuthEnvConfig, Environment, ServerConfig};
//!
//! let env = Environment::current();
//! let bind_address = ServerConfig::bind_address();
//! let backend_kind = AuthEnvConfig::backend_kind();
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="8080"
//! export ENVIRONMENT="production"  # development, test, staging, production
//!
//! # 인증 설정
//! export AUTH_BACKEND="jwt"
//! export AUTH_EXEMPT_ROUTES="/health"
//! export JWT_SECRET="your-super-secret-key"
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
